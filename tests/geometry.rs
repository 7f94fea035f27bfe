use std::f64::consts::PI;

use srocket::geometry::{
    self, Bates, EndBurner, Finocyl, GeometryError, GeometryState, GrainShape, GrainSpec,
    OffsetCore, RodAndTube, ShapeKind, Star,
};

fn bates(outer: f64, core: f64, length: f64, segments: u32) -> GrainSpec {
    GrainSpec::new(GrainShape::CylindricalPerforated(Bates {
        outer_diameter: outer,
        core_diameter: core,
        length,
        segments,
    }))
    .expect("valid bates grain")
}

fn end_burner(diameter: f64, length: f64) -> GrainSpec {
    GrainSpec::new(GrainShape::EndBurner(EndBurner { diameter, length }))
        .expect("valid end burner")
}

fn rod_and_tube() -> GrainSpec {
    GrainSpec::new(GrainShape::RodAndTube(RodAndTube {
        outer_diameter: 100.0,
        inner_diameter: 60.0,
        rod_diameter: 20.0,
        length: 150.0,
    }))
    .expect("valid rod and tube")
}

fn every_shape() -> Vec<GrainSpec> {
    let shapes = vec![
        GrainShape::CylindricalPerforated(Bates {
            outer_diameter: 70.0,
            core_diameter: 20.0,
            length: 100.0,
            segments: 2,
        }),
        GrainShape::FinnedCylindrical(Finocyl {
            outer_diameter: 54.0,
            core_diameter: 20.0,
            length: 120.0,
            fin_count: 4,
            fin_width: 3.0,
            fin_height: 6.0,
        }),
        GrainShape::Star(Star {
            outer_diameter: 75.0,
            length: 300.0,
            point_count: 6,
            point_depth: 15.0,
            point_half_angle_deg: 30.0,
        }),
        GrainShape::OffsetCore(OffsetCore {
            outer_diameter: 54.0,
            core_diameter: 16.0,
            core_offset: 6.0,
            length: 150.0,
        }),
        GrainShape::RodAndTube(RodAndTube {
            outer_diameter: 100.0,
            inner_diameter: 60.0,
            rod_diameter: 20.0,
            length: 150.0,
        }),
        GrainShape::EndBurner(EndBurner {
            diameter: 50.0,
            length: 100.0,
        }),
    ];
    shapes
        .into_iter()
        .map(|shape| GrainSpec::new(shape).expect("valid grain"))
        .collect()
}

fn regression_grid(spec: &GrainSpec) -> Vec<f64> {
    let web = spec.initial_web();
    (0..=250).map(|i| web * 1.2 * i as f64 / 250.0).collect()
}

#[test]
fn every_shape_is_covered_once() {
    let kinds: Vec<ShapeKind> = every_shape().iter().map(GrainSpec::kind).collect();
    assert_eq!(kinds, ShapeKind::ALL);
}

#[test]
fn areas_and_volumes_are_non_negative_and_zero_after_burnout() {
    for spec in every_shape() {
        for r in regression_grid(&spec) {
            let state = geometry::regress(&spec, r);
            assert!(state.burn_area >= 0.0, "{} area at r={r}", spec.kind());
            assert!(state.propellant_volume >= 0.0, "{} volume at r={r}", spec.kind());
            if state.burned_out {
                assert_eq!(state, GeometryState::BURNED_OUT, "{} at r={r}", spec.kind());
            } else {
                assert!(state.burn_area > 0.0, "{} live grain with no area", spec.kind());
            }
        }
        assert!(geometry::regress(&spec, spec.initial_web()).burned_out);
        assert!(!geometry::regress(&spec, 0.0).burned_out);
    }
}

#[test]
fn volume_never_increases_for_cylindrical_families() {
    let monotone: Vec<GrainSpec> = every_shape()
        .into_iter()
        .filter(|spec| {
            matches!(
                spec.kind(),
                ShapeKind::CylindricalPerforated
                    | ShapeKind::RodAndTube
                    | ShapeKind::OffsetCore
                    | ShapeKind::EndBurner
            )
        })
        .collect();
    assert_eq!(monotone.len(), 4);

    for spec in monotone {
        let mut previous = f64::INFINITY;
        for r in regression_grid(&spec) {
            let volume = geometry::regress(&spec, r).propellant_volume;
            assert!(
                volume <= previous,
                "{} volume grew at r={r}: {volume} > {previous}",
                spec.kind()
            );
            previous = volume;
        }
    }
}

#[test]
fn bates_burns_out_when_core_reaches_case() {
    let spec = bates(100.0, 40.0, 150.0, 1);
    let state = geometry::regress(&spec, 30.0);
    assert!(state.burned_out);
    assert_eq!(state.burn_area, 0.0);
    assert_eq!(state.propellant_volume, 0.0);

    let live = geometry::regress(&spec, 29.9);
    assert!(!live.burned_out);
    assert!((live.web_thickness - 0.1).abs() < 1e-9);
}

#[test]
fn bates_initial_area_counts_bore_and_both_faces_of_each_segment() {
    let spec = bates(70.0, 20.0, 100.0, 2);
    let state = geometry::regress(&spec, 0.0);
    let face = PI * (35.0_f64.powi(2) - 10.0_f64.powi(2));
    let bore = 2.0 * PI * 10.0 * 100.0;
    assert!((state.burn_area - 2.0 * (2.0 * face + bore)).abs() < 1e-6);
    assert!((state.port_area - PI * 100.0).abs() < 1e-9);
    assert!((state.propellant_volume - 2.0 * face * 100.0).abs() < 1e-6);
    assert_eq!(spec.total_length(), 200.0);
}

#[test]
fn end_burner_face_holds_until_the_last_millimetre() {
    let spec = end_burner(50.0, 100.0);
    assert!(geometry::regress(&spec, 100.0).burned_out);

    let state = geometry::regress(&spec, 99.999);
    assert!(!state.burned_out);
    assert!((state.burn_area - 1963.5).abs() < 1e-1);
    assert!((state.propellant_volume - PI * 625.0 * 0.001).abs() < 1e-6);
}

#[test]
fn rod_and_tube_web_is_the_thinner_of_tube_and_gap() {
    let spec = rod_and_tube();
    assert_eq!(spec.initial_web(), 20.0);
    assert!(geometry::regress(&spec, 20.0).burned_out);

    let state = geometry::regress(&spec, 5.0);
    assert!(!state.burned_out);
    assert!((state.web_thickness - 15.0).abs() < 1e-12);
    // Bore grows to 35, rod shrinks to 5.
    assert!((state.port_area - PI * (35.0_f64.powi(2) - 5.0_f64.powi(2))).abs() < 1e-6);
}

#[test]
fn finocyl_fins_vanish_once_consumed() {
    let fin = GrainSpec::new(GrainShape::FinnedCylindrical(Finocyl {
        outer_diameter: 54.0,
        core_diameter: 20.0,
        length: 120.0,
        fin_count: 4,
        fin_width: 3.0,
        fin_height: 6.0,
    }))
    .expect("valid finocyl");
    let base = bates(54.0, 20.0, 120.0, 1);

    let early = geometry::regress(&fin, 0.5);
    assert!(early.burn_area > geometry::regress(&base, 0.5).burn_area);

    // Half the fin width is gone at r = 1.5.
    let late = geometry::regress(&fin, 1.5);
    assert_eq!(late, geometry::regress(&base, 1.5));
}

#[test]
fn finocyl_fins_taller_than_the_web_end_with_the_base() {
    let spec = GrainSpec::new(GrainShape::FinnedCylindrical(Finocyl {
        outer_diameter: 54.0,
        core_diameter: 20.0,
        length: 150.0,
        fin_count: 4,
        fin_width: 40.0,
        fin_height: 20.0,
    }))
    .expect("fin height above the web is valid");
    assert_eq!(spec.initial_web(), 17.0);

    let base = bates(54.0, 20.0, 150.0, 1);
    let before = geometry::regress(&spec, 16.9);
    assert!(!before.burned_out);
    assert!(before.burn_area > geometry::regress(&base, 16.9).burn_area);

    assert_eq!(geometry::regress(&spec, 17.0), GeometryState::BURNED_OUT);
}

#[test]
fn star_area_shrinks_linearly_with_point_depth() {
    let spec = GrainSpec::new(GrainShape::Star(Star {
        outer_diameter: 80.0,
        length: 100.0,
        point_count: 6,
        point_depth: 10.0,
        point_half_angle_deg: 30.0,
    }))
    .expect("valid star");
    let initial = geometry::regress(&spec, 0.0).burn_area;
    // Six chords of a 40 mm circle are each one radius long.
    assert!((initial - 6.0 * 40.0 * 100.0).abs() < 1e-6);

    let half = geometry::regress(&spec, 5.0).burn_area;
    assert!((half - 0.5 * initial).abs() < 1e-6);
    assert!(geometry::regress(&spec, 10.0).burned_out);
}

#[test]
fn offset_core_burns_out_at_the_thinnest_web() {
    let spec = GrainSpec::new(GrainShape::OffsetCore(OffsetCore {
        outer_diameter: 54.0,
        core_diameter: 16.0,
        core_offset: 6.0,
        length: 150.0,
    }))
    .expect("valid offset core");
    assert_eq!(spec.initial_web(), 13.0);
    assert!(!geometry::regress(&spec, 12.99).burned_out);
    assert!(geometry::regress(&spec, 13.0).burned_out);
}

#[test]
fn offset_core_touching_the_case_has_no_web() {
    let spec = GrainSpec::new(GrainShape::OffsetCore(OffsetCore {
        outer_diameter: 54.0,
        core_diameter: 16.0,
        core_offset: 19.0,
        length: 150.0,
    }))
    .expect("core tangent to the case is accepted");
    assert_eq!(spec.initial_web(), 0.0);
    assert_eq!(geometry::regress(&spec, 0.0), GeometryState::BURNED_OUT);

    let beyond = GrainSpec::new(GrainShape::OffsetCore(OffsetCore {
        outer_diameter: 54.0,
        core_diameter: 16.0,
        core_offset: 19.5,
        length: 150.0,
    }));
    assert!(matches!(
        beyond,
        Err(GeometryError::CoreOutsideCase { .. })
    ));
}

#[test]
fn regress_is_a_pure_function() {
    for spec in every_shape() {
        for r in regression_grid(&spec) {
            let first = geometry::regress(&spec, r);
            let second = geometry::regress(&spec, r);
            assert_eq!(first.burn_area.to_bits(), second.burn_area.to_bits());
            assert_eq!(first.port_area.to_bits(), second.port_area.to_bits());
            assert_eq!(
                first.propellant_volume.to_bits(),
                second.propellant_volume.to_bits()
            );
            assert_eq!(first.burned_out, second.burned_out);
        }
    }
}

#[test]
fn negative_or_nan_regression_reads_as_burned_out() {
    let spec = bates(70.0, 20.0, 100.0, 1);
    assert!(geometry::regress(&spec, -1.0).burned_out);
    assert!(geometry::regress(&spec, f64::NAN).burned_out);
}

#[test]
fn invalid_dimensions_are_rejected_with_the_offending_field() {
    let inverted = GrainSpec::new(GrainShape::CylindricalPerforated(Bates {
        outer_diameter: 40.0,
        core_diameter: 40.0,
        length: 100.0,
        segments: 1,
    }));
    assert!(matches!(
        inverted,
        Err(GeometryError::NotSmaller {
            field: "core_diameter",
            ..
        })
    ));

    let zero_length = GrainSpec::new(GrainShape::EndBurner(EndBurner {
        diameter: 50.0,
        length: 0.0,
    }));
    assert!(matches!(
        zero_length,
        Err(GeometryError::NonPositive { field: "length", .. })
    ));

    let two_points = GrainSpec::new(GrainShape::Star(Star {
        outer_diameter: 80.0,
        length: 100.0,
        point_count: 2,
        point_depth: 10.0,
        point_half_angle_deg: 30.0,
    }));
    assert!(matches!(
        two_points,
        Err(GeometryError::CountTooSmall {
            field: "point_count",
            ..
        })
    ));

    let rod_too_big = GrainSpec::new(GrainShape::RodAndTube(RodAndTube {
        outer_diameter: 100.0,
        inner_diameter: 60.0,
        rod_diameter: 60.0,
        length: 150.0,
    }));
    assert!(rod_too_big.is_err());

    let core_through_case = GrainSpec::new(GrainShape::OffsetCore(OffsetCore {
        outer_diameter: 54.0,
        core_diameter: 16.0,
        core_offset: 20.0,
        length: 150.0,
    }));
    assert!(matches!(
        core_through_case,
        Err(GeometryError::CoreOutsideCase { .. })
    ));

    let deep_fins = GrainSpec::new(GrainShape::FinnedCylindrical(Finocyl {
        outer_diameter: 54.0,
        core_diameter: 20.0,
        length: 120.0,
        fin_count: 4,
        fin_width: 3.0,
        fin_height: 17.0,
    }));
    assert!(deep_fins.is_err());
}
