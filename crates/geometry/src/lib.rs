//! Grain geometry: validated grain descriptions and their burn-back as a function
//! of regression depth.
//!
//! Every length is in millimetres, areas in mm² and volumes in mm³. Regression is
//! the distance the burning surface has receded, measured normal to the original
//! surface; it is tracked by the caller, never stored on the grain.

mod grain;
mod regression;

pub use grain::{
    Bates, EndBurner, Finocyl, GeometryError, GrainShape, GrainSpec, OffsetCore, RodAndTube,
    ShapeKind, Star,
};
pub use regression::GeometryState;

/// Evaluate the grain at the given regression depth.
///
/// Total over every input: negative, NaN or beyond-web regression all map to
/// [`GeometryState::BURNED_OUT`].
pub fn regress(spec: &GrainSpec, regression: f64) -> GeometryState {
    regression::evaluate(spec.shape(), regression)
}
