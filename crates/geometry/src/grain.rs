use std::fmt;

use srocket_core::area;
use thiserror::Error;

/// Cylindrical-perforated (BATES) segments sharing one core diameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bates {
    pub outer_diameter: f64,
    pub core_diameter: f64,
    pub length: f64,
    pub segments: u32,
}

/// Single cylindrical-perforated segment with radial fin slots cut into the core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Finocyl {
    pub outer_diameter: f64,
    pub core_diameter: f64,
    pub length: f64,
    pub fin_count: u32,
    pub fin_width: f64,
    pub fin_height: f64,
}

/// Star-perforated grain. `point_depth` is the radial extent of the star points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub outer_diameter: f64,
    pub length: f64,
    pub point_count: u32,
    pub point_depth: f64,
    pub point_half_angle_deg: f64,
}

/// Moonburner: circular core displaced from the grain axis by `core_offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetCore {
    pub outer_diameter: f64,
    pub core_diameter: f64,
    pub core_offset: f64,
    pub length: f64,
}

/// Tube burning outward from its bore plus a free-standing central rod burning inward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RodAndTube {
    pub outer_diameter: f64,
    pub inner_diameter: f64,
    pub rod_diameter: f64,
    pub length: f64,
}

/// Cigarette burner: only the aft face burns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndBurner {
    pub diameter: f64,
    pub length: f64,
}

/// Closed set of supported grain shapes with their nominal dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrainShape {
    CylindricalPerforated(Bates),
    FinnedCylindrical(Finocyl),
    Star(Star),
    OffsetCore(OffsetCore),
    RodAndTube(RodAndTube),
    EndBurner(EndBurner),
}

/// Dimension-free tag for a [`GrainShape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    CylindricalPerforated,
    FinnedCylindrical,
    Star,
    OffsetCore,
    RodAndTube,
    EndBurner,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::CylindricalPerforated,
        ShapeKind::FinnedCylindrical,
        ShapeKind::Star,
        ShapeKind::OffsetCore,
        ShapeKind::RodAndTube,
        ShapeKind::EndBurner,
    ];

    /// Kebab-case identifier, matching the `shape` tag used in motor files.
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::CylindricalPerforated => "cylindrical-perforated",
            ShapeKind::FinnedCylindrical => "finned-cylindrical",
            ShapeKind::Star => "star",
            ShapeKind::OffsetCore => "offset-core",
            ShapeKind::RodAndTube => "rod-and-tube",
            ShapeKind::EndBurner => "end-burner",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl GrainShape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            GrainShape::CylindricalPerforated(_) => ShapeKind::CylindricalPerforated,
            GrainShape::FinnedCylindrical(_) => ShapeKind::FinnedCylindrical,
            GrainShape::Star(_) => ShapeKind::Star,
            GrainShape::OffsetCore(_) => ShapeKind::OffsetCore,
            GrainShape::RodAndTube(_) => ShapeKind::RodAndTube,
            GrainShape::EndBurner(_) => ShapeKind::EndBurner,
        }
    }
}

/// Errors raised while validating grain dimensions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("{field} must be a positive, finite dimension (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} must be finite and non-negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} ({value}) must be smaller than {limit_field} ({limit})")]
    NotSmaller {
        field: &'static str,
        value: f64,
        limit_field: &'static str,
        limit: f64,
    },
    #[error("{field} must be at least {minimum} (got {value})")]
    CountTooSmall {
        field: &'static str,
        value: u32,
        minimum: u32,
    },
    #[error(
        "core offset ({core_offset}) plus core radius ({core_radius}) exceeds outer radius ({outer_radius})"
    )]
    CoreOutsideCase {
        core_offset: f64,
        core_radius: f64,
        outer_radius: f64,
    },
    #[error("{field} must lie strictly between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Immutable, validated grain description.
///
/// Construction is the only place dimensions are checked; geometry queries
/// assume a valid spec.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrainSpec {
    shape: GrainShape,
}

impl GrainSpec {
    /// Validate `shape` and wrap it. Invalid cores are rejected, never clamped.
    pub fn new(shape: GrainShape) -> Result<Self, GeometryError> {
        match &shape {
            GrainShape::CylindricalPerforated(g) => validate_bates(g)?,
            GrainShape::FinnedCylindrical(g) => validate_finocyl(g)?,
            GrainShape::Star(g) => validate_star(g)?,
            GrainShape::OffsetCore(g) => validate_offset_core(g)?,
            GrainShape::RodAndTube(g) => validate_rod_and_tube(g)?,
            GrainShape::EndBurner(g) => validate_end_burner(g)?,
        }
        Ok(Self { shape })
    }

    pub fn shape(&self) -> &GrainShape {
        &self.shape
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Outer (case-bonded) diameter of the grain.
    pub fn outer_diameter(&self) -> f64 {
        match &self.shape {
            GrainShape::CylindricalPerforated(g) => g.outer_diameter,
            GrainShape::FinnedCylindrical(g) => g.outer_diameter,
            GrainShape::Star(g) => g.outer_diameter,
            GrainShape::OffsetCore(g) => g.outer_diameter,
            GrainShape::RodAndTube(g) => g.outer_diameter,
            GrainShape::EndBurner(g) => g.diameter,
        }
    }

    /// Total propellant length, all segments included.
    pub fn total_length(&self) -> f64 {
        match &self.shape {
            GrainShape::CylindricalPerforated(g) => g.length * g.segments as f64,
            GrainShape::FinnedCylindrical(g) => g.length,
            GrainShape::Star(g) => g.length,
            GrainShape::OffsetCore(g) => g.length,
            GrainShape::RodAndTube(g) => g.length,
            GrainShape::EndBurner(g) => g.length,
        }
    }

    /// Volume of the cylinder the grain occupies inside the case (mm³).
    pub fn envelope_volume(&self) -> f64 {
        area::circle(0.5 * self.outer_diameter()) * self.total_length()
    }

    /// Web thickness before any burning, i.e. the regression at which the grain burns out.
    pub fn initial_web(&self) -> f64 {
        match &self.shape {
            GrainShape::CylindricalPerforated(g) => 0.5 * (g.outer_diameter - g.core_diameter),
            GrainShape::FinnedCylindrical(g) => 0.5 * (g.outer_diameter - g.core_diameter),
            GrainShape::Star(g) => g.point_depth,
            GrainShape::OffsetCore(g) => {
                0.5 * (g.outer_diameter - g.core_diameter) - g.core_offset
            }
            GrainShape::RodAndTube(g) => {
                let tube = 0.5 * (g.outer_diameter - g.inner_diameter);
                let gap = 0.5 * (g.inner_diameter - g.rod_diameter);
                tube.min(gap)
            }
            GrainShape::EndBurner(g) => g.length,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), GeometryError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::NonPositive { field, value })
    }
}

fn smaller(
    field: &'static str,
    value: f64,
    limit_field: &'static str,
    limit: f64,
) -> Result<(), GeometryError> {
    if value < limit {
        Ok(())
    } else {
        Err(GeometryError::NotSmaller {
            field,
            value,
            limit_field,
            limit,
        })
    }
}

fn at_least(field: &'static str, value: u32, minimum: u32) -> Result<(), GeometryError> {
    if value >= minimum {
        Ok(())
    } else {
        Err(GeometryError::CountTooSmall {
            field,
            value,
            minimum,
        })
    }
}

fn validate_bates(g: &Bates) -> Result<(), GeometryError> {
    positive("outer_diameter", g.outer_diameter)?;
    positive("core_diameter", g.core_diameter)?;
    positive("length", g.length)?;
    at_least("segments", g.segments, 1)?;
    smaller(
        "core_diameter",
        g.core_diameter,
        "outer_diameter",
        g.outer_diameter,
    )
}

fn validate_finocyl(g: &Finocyl) -> Result<(), GeometryError> {
    positive("outer_diameter", g.outer_diameter)?;
    positive("core_diameter", g.core_diameter)?;
    positive("length", g.length)?;
    positive("fin_width", g.fin_width)?;
    positive("fin_height", g.fin_height)?;
    at_least("fin_count", g.fin_count, 1)?;
    // Fins taller than the web are allowed; they vanish with the base at burnout.
    smaller(
        "core_diameter",
        g.core_diameter,
        "outer_diameter",
        g.outer_diameter,
    )
}

fn validate_star(g: &Star) -> Result<(), GeometryError> {
    positive("outer_diameter", g.outer_diameter)?;
    positive("length", g.length)?;
    positive("point_depth", g.point_depth)?;
    at_least("point_count", g.point_count, 3)?;
    smaller(
        "point_depth",
        g.point_depth,
        "outer radius",
        0.5 * g.outer_diameter,
    )?;
    if g.point_half_angle_deg > 0.0 && g.point_half_angle_deg < 90.0 {
        Ok(())
    } else {
        Err(GeometryError::OutOfRange {
            field: "point_half_angle_deg",
            value: g.point_half_angle_deg,
            min: 0.0,
            max: 90.0,
        })
    }
}

fn validate_offset_core(g: &OffsetCore) -> Result<(), GeometryError> {
    positive("outer_diameter", g.outer_diameter)?;
    positive("core_diameter", g.core_diameter)?;
    positive("length", g.length)?;
    if !(g.core_offset >= 0.0 && g.core_offset.is_finite()) {
        return Err(GeometryError::Negative {
            field: "core_offset",
            value: g.core_offset,
        });
    }
    smaller(
        "core_diameter",
        g.core_diameter,
        "outer_diameter",
        g.outer_diameter,
    )?;
    let outer_radius = 0.5 * g.outer_diameter;
    let core_radius = 0.5 * g.core_diameter;
    if g.core_offset + core_radius > outer_radius {
        return Err(GeometryError::CoreOutsideCase {
            core_offset: g.core_offset,
            core_radius,
            outer_radius,
        });
    }
    Ok(())
}

fn validate_rod_and_tube(g: &RodAndTube) -> Result<(), GeometryError> {
    positive("outer_diameter", g.outer_diameter)?;
    positive("inner_diameter", g.inner_diameter)?;
    positive("rod_diameter", g.rod_diameter)?;
    positive("length", g.length)?;
    smaller(
        "inner_diameter",
        g.inner_diameter,
        "outer_diameter",
        g.outer_diameter,
    )?;
    smaller(
        "rod_diameter",
        g.rod_diameter,
        "inner_diameter",
        g.inner_diameter,
    )
}

fn validate_end_burner(g: &EndBurner) -> Result<(), GeometryError> {
    positive("diameter", g.diameter)?;
    positive("length", g.length)
}
