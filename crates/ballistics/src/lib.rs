//! Internal-ballistics engine: couples grain regression, burn rate, chamber
//! pressure and thrust over time, and summarizes the resulting traces.

pub mod pressure;
pub mod solver;
pub mod summary;

pub use facade::*;
pub use solver::{
    AbortDiagnostic, AbortReason, BallisticsSolver, Ceiling, Sample, SimulationConfig,
    SimulationRun, SimulationState, SolverError, SolverStatus, StepOutcome, Termination, run,
};
pub use srocket_geometry as geometry;
pub use srocket_propulsion as propulsion;
pub use summary::{ModelingWarning, SimulationResult, SummaryError, motor_class};

mod facade;

use srocket_geometry::GrainSpec;
use srocket_propulsion::{NozzleSpec, PropellantSpec};

/// A complete motor: one grain, one propellant, one nozzle.
#[derive(Debug, Clone, PartialEq)]
pub struct Motor {
    pub name: String,
    pub grain: GrainSpec,
    pub propellant: PropellantSpec,
    pub nozzle: NozzleSpec,
}
