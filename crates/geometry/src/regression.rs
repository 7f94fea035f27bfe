use srocket_core::area;

use crate::grain::{Bates, EndBurner, Finocyl, GrainShape, OffsetCore, RodAndTube, Star};

/// Snapshot of a grain at one regression depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryState {
    pub burned_out: bool,
    /// Remaining thinnest web (mm).
    pub web_thickness: f64,
    /// Total burning surface (mm²).
    pub burn_area: f64,
    /// Free flow cross-section through the grain (mm²).
    pub port_area: f64,
    /// Remaining propellant (mm³).
    pub propellant_volume: f64,
}

impl GeometryState {
    /// Terminal state: every area and volume saturated to zero.
    pub const BURNED_OUT: GeometryState = GeometryState {
        burned_out: true,
        web_thickness: 0.0,
        burn_area: 0.0,
        port_area: 0.0,
        propellant_volume: 0.0,
    };
}

pub(crate) fn evaluate(shape: &GrainShape, regression: f64) -> GeometryState {
    // Also rejects NaN.
    if !(regression >= 0.0) {
        return GeometryState::BURNED_OUT;
    }
    match shape {
        GrainShape::CylindricalPerforated(g) => bates(g, regression),
        GrainShape::FinnedCylindrical(g) => finocyl(g, regression),
        GrainShape::Star(g) => star(g, regression),
        GrainShape::OffsetCore(g) => offset_core(g, regression),
        GrainShape::RodAndTube(g) => rod_and_tube(g, regression),
        GrainShape::EndBurner(g) => end_burner(g, regression),
    }
}

fn bates(g: &Bates, r: f64) -> GeometryState {
    let outer_radius = 0.5 * g.outer_diameter;
    let burned_radius = 0.5 * g.core_diameter + r;
    if burned_radius >= outer_radius {
        return GeometryState::BURNED_OUT;
    }

    let segments = g.segments as f64;
    let end_face = area::annulus(outer_radius, burned_radius);
    // Both end faces of every segment plus the bore.
    let burn_area = 2.0 * segments * end_face
        + segments * area::cylinder_lateral(burned_radius, g.length);

    GeometryState {
        burned_out: false,
        web_thickness: outer_radius - burned_radius,
        burn_area,
        port_area: area::circle(burned_radius),
        propellant_volume: end_face * g.length * segments,
    }
}

/// Fin slots are modelled as an additive surface on top of a single BATES segment.
///
/// Deliberate simplification: the fin term shrinks linearly with regression and the
/// slots are void once the bore reaches the case, whatever fin material would
/// physically remain.
fn finocyl(g: &Finocyl, r: f64) -> GeometryState {
    let base = bates(
        &Bates {
            outer_diameter: g.outer_diameter,
            core_diameter: g.core_diameter,
            length: g.length,
            segments: 1,
        },
        r,
    );
    if base.burned_out {
        return base;
    }

    // Each fin burns from both flanks, so its width is gone at half-width regression.
    let fins_consumed = r >= g.fin_height || 2.0 * r >= g.fin_width;
    let fin_area = if fins_consumed {
        0.0
    } else {
        let remaining_height = g.fin_height - r;
        let sides = 2.0 * g.fin_height * (g.length - 2.0 * r).max(0.0);
        let caps = 2.0 * g.fin_width * remaining_height;
        let rounded_edges = std::f64::consts::PI * r * remaining_height;
        g.fin_count as f64 * (sides + caps + rounded_edges)
    };

    GeometryState {
        burn_area: base.burn_area + fin_area,
        ..base
    }
}

/// Low-fidelity placeholder: the perimeter is the outer-circle chord polygon scaled
/// by the unburned fraction of the point depth. No point-collapse transition is
/// modelled.
fn star(g: &Star, r: f64) -> GeometryState {
    if r >= g.point_depth {
        return GeometryState::BURNED_OUT;
    }

    let outer_radius = 0.5 * g.outer_diameter;
    let remaining_fraction = 1.0 - r / g.point_depth;
    let perimeter = g.point_count as f64 * area::chord(outer_radius, g.point_count);
    // The propellant envelope is the annulus outside the circle through the star
    // tips; that circle grows with regression until it meets the case.
    let tip_radius = outer_radius - g.point_depth + r;
    let cross_section = area::annulus(outer_radius, tip_radius);

    GeometryState {
        burned_out: false,
        web_thickness: g.point_depth - r,
        burn_area: perimeter * g.length * remaining_fraction,
        port_area: area::circle(tip_radius),
        propellant_volume: cross_section * g.length,
    }
}

fn offset_core(g: &OffsetCore, r: f64) -> GeometryState {
    let outer_radius = 0.5 * g.outer_diameter;
    let core_radius = 0.5 * g.core_diameter;
    // Nearest approach of the core to the case wall.
    let min_web = outer_radius - core_radius - g.core_offset;
    if r >= min_web {
        return GeometryState::BURNED_OUT;
    }

    let burned_radius = core_radius + r;
    let end_face = area::annulus(outer_radius, burned_radius);

    GeometryState {
        burned_out: false,
        web_thickness: min_web - r,
        burn_area: area::cylinder_lateral(burned_radius, g.length) + 2.0 * end_face,
        port_area: area::circle(burned_radius),
        propellant_volume: end_face * g.length,
    }
}

fn rod_and_tube(g: &RodAndTube, r: f64) -> GeometryState {
    let outer_radius = 0.5 * g.outer_diameter;
    let inner_radius = 0.5 * g.inner_diameter;
    let rod_radius = 0.5 * g.rod_diameter;
    let min_web = (outer_radius - inner_radius).min(inner_radius - rod_radius);
    if r >= min_web {
        return GeometryState::BURNED_OUT;
    }

    let bore_radius = inner_radius + r;
    let burned_rod_radius = (rod_radius - r).max(0.0);

    let tube_end = area::annulus(outer_radius, bore_radius);
    let rod_end = area::circle(burned_rod_radius);
    let tube_area = area::cylinder_lateral(bore_radius, g.length) + 2.0 * tube_end;
    let rod_area = area::cylinder_lateral(burned_rod_radius, g.length) + 2.0 * rod_end;

    GeometryState {
        burned_out: false,
        web_thickness: min_web - r,
        burn_area: tube_area + rod_area,
        port_area: area::annulus(bore_radius, burned_rod_radius),
        propellant_volume: (tube_end + rod_end) * g.length,
    }
}

fn end_burner(g: &EndBurner, r: f64) -> GeometryState {
    if r >= g.length {
        return GeometryState::BURNED_OUT;
    }

    let face = area::circle(0.5 * g.diameter);
    let remaining_length = g.length - r;

    GeometryState {
        burned_out: false,
        web_thickness: remaining_length,
        burn_area: face,
        // Gas leaves through the empty case behind the face.
        port_area: face,
        propellant_volume: face * remaining_length,
    }
}
