//! End-to-end generation: parameters in, validated solid out.

mod support;

use hullforge::{
    errors::{HullError, ParameterError},
    hull::{
        FixedInterfaceSpec, ParameterSet, Preset, generate,
        params::PARAMETERS,
        pipeline::{Perturbation, SweepStatus, sweep},
        validate::{GeometrySignature, InvariantCategory, SignatureBand},
    },
};

use crate::support::{assert_sound_hull, default_hull, default_set, sleek_hull};

#[test]
fn reference_hull_passes_every_mechanical_category() {
    let hull = default_hull();
    for category in InvariantCategory::MECHANICAL {
        let failed: Vec<_> = hull.report.checks_in(category).filter(|c| !c.passed).collect();
        assert!(failed.is_empty(), "{category:?}: {failed:#?}");
    }
    assert!(hull.is_acceptable());
    assert_eq!(hull.report.topology.components, 1);
    assert_sound_hull(hull, "gcsc_default");
    assert_sound_hull(sleek_hull(), "sleek");
}

#[test]
fn reference_hull_reproduces_the_interface() {
    let hull = default_hull();
    let interface = FixedInterfaceSpec::CANONICAL;
    assert_eq!(hull.report.slots.len(), 4);
    for (slot, center) in hull.report.slots.iter().zip(interface.pivot_centers()) {
        assert!((slot.center[0] - center.x).abs() <= 0.01, "{slot:?}");
        assert!((slot.center[1] - center.y).abs() <= 0.01, "{slot:?}");
        assert!((slot.seat_z - center.z).abs() <= 0.01, "{slot:?}");
        assert!((slot.diameter_x - 7.5).abs() <= 0.01, "{slot:?}");
        assert!((slot.diameter_y - 7.5).abs() <= 0.01, "{slot:?}");
        assert!(slot.depth > interface.slot_radius());
    }
}

#[test]
fn reference_hull_keeps_its_walls() {
    let hull = default_hull();
    let params = &hull.params;
    for slot in &hull.report.slots {
        assert!(slot.outer_skin >= params.slot_outer_skin_min, "{slot:?}");
        assert!(slot.inner_skin >= params.slot_skin, "{slot:?}");
        assert!(slot.corridor_clearance >= params.corridor_clearance_min, "{slot:?}");
    }
    let floor = hull.report.check("floor_center").unwrap();
    assert!(floor.passed);
    assert!((floor.measured - params.floor_thickness).abs() < 0.05, "{floor:?}");
}

#[test]
fn reference_hull_dimensions() {
    let signature = &default_hull().report.signature;
    assert!((signature.extents[0] - 148.0).abs() < 1e-6, "{signature:?}");
    assert!(signature.extents[1] <= 79.5 + 1e-6);
    assert!(signature.extents[1] > 79.0);
    assert!(signature.min[2].abs() < 1e-6);
    assert!(signature.volume > 0.0);
}

#[test]
fn generation_is_deterministic() {
    let again = generate(&default_set(), &FixedInterfaceSpec::CANONICAL).unwrap();
    let first = default_hull();
    assert_eq!(again.report.signature, first.report.signature);
    assert_eq!(again.solid.polygons.len(), first.solid.polygons.len());
    assert_eq!(again.indexed(), first.indexed());
}

#[test]
fn interface_is_invariant_across_presets() {
    let (a, b) = (default_hull(), sleek_hull());
    assert!(b.is_acceptable(), "{:#?}", b.report.violations());
    assert!(a.report.signature.extents[0] < b.report.signature.extents[0]);
    for (x, y) in a.report.slots.iter().zip(&b.report.slots) {
        for (p, q) in [
            (x.center[0], y.center[0]),
            (x.center[1], y.center[1]),
            (x.seat_z, y.seat_z),
            (x.diameter_x, y.diameter_x),
            (x.diameter_y, y.diameter_y),
        ] {
            assert!((p - q).abs() <= 0.02, "{x:?} vs {y:?}");
        }
    }
}

#[test]
fn out_of_range_parameter_is_rejected_before_geometry() {
    let err = default_set().with_override("wall_thickness", 0.5).unwrap_err();
    assert!(matches!(err, ParameterError::OutOfRange { ref name, .. } if name == "wall_thickness"));

    let err = ParameterSet::from_values([("length", 148.0), ("beam", 79.5)]).unwrap_err();
    assert!(matches!(err, ParameterError::Missing { .. }));

    let err = ParameterSet::from_values([("hull_colour", 1.0)]).unwrap_err();
    assert!(matches!(err, ParameterError::Unknown { .. }));

    let err = default_set().with_override("slot_segments", 50.0).unwrap_err();
    assert!(matches!(err, ParameterError::NotInteger { .. }));
}

#[test]
fn cross_constraint_stops_generation() {
    let set = default_set().with_override("floor_thickness", 2.0).unwrap();
    // recess 1.2 mm plus 1.0 mm skin no longer fits under a 2 mm floor
    let err = generate(&set, &FixedInterfaceSpec::CANONICAL).unwrap_err();
    match err {
        HullError::Parameter(ParameterError::Constraint { name, .. }) => {
            assert_eq!(name, "foot_recess_depth")
        },
        other => panic!("expected a constraint error, got {other:?}"),
    }
}

#[test]
fn invalid_interface_stops_generation() {
    let interface = FixedInterfaceSpec { ball_diameter: 8.0, ..FixedInterfaceSpec::CANONICAL };
    let err = generate(&default_set(), &interface).unwrap_err();
    assert!(matches!(err, HullError::Parameter(ParameterError::InvalidInterface { .. })));
    let rebuilt = FixedInterfaceSpec::new(16.0, 33.0, 38.0, 7.5, 7.25, 17.0, 0.01).unwrap();
    assert!(rebuilt.is_canonical());
}

#[test]
fn every_parameter_has_a_usable_declaration() {
    let set = default_set();
    for spec in PARAMETERS {
        assert!(spec.min <= spec.max, "{}", spec.name);
        let value = set.get(spec.name).unwrap();
        assert!(value >= spec.min && value <= spec.max, "{} = {value}", spec.name);
        if let Some(default) = spec.default {
            assert!(spec.check(default).is_ok(), "{}", spec.name);
        }
    }
}

#[test]
fn presets_round_trip_through_json() {
    for name in Preset::BUILTIN {
        let preset = Preset::builtin(name).unwrap();
        let parsed = Preset::from_json(&preset.to_json().unwrap()).unwrap();
        assert_eq!(parsed, preset);
    }
    let custom = Preset::from_json(
        r#"{"name": "stubby", "parameters": {"length": 120, "beam": 76, "depth": 46,
            "wall_thickness": 8, "floor_thickness": 3.5, "flat_half_length": 30, "stop_x": 40,
            "foot_span": 0.3}}"#,
    )
    .unwrap();
    assert!(custom.description.is_empty());
    let set = custom.parameter_set().unwrap();
    assert_eq!(set.get("length"), Some(120.0));
    assert!(set.to_params().is_ok());
}

#[test]
fn sweep_records_every_scenario() {
    let perturbations = vec![
        Perturbation::new("thin_wall", &[("wall_thickness", 7.5)]),
        Perturbation::new("unreinforced", &[("reinforcement_on", 0.0)]),
        Perturbation::new("bad", &[("length", 500.0)]),
    ];
    let interface = FixedInterfaceSpec::CANONICAL;
    let summary =
        sweep(&default_set(), &interface, &perturbations, SignatureBand::default()).unwrap();

    assert_eq!(summary.outcomes.len(), 3);
    assert_eq!(summary.baseline, default_hull().report.signature);
    let thin = &summary.outcomes[0];
    assert_eq!(thin.status, SweepStatus::Accepted, "{:#?}", thin.violations);
    // thinner walls carry less material over the same envelope
    let thin_signature = thin.signature.as_ref().unwrap();
    assert!(thin_signature.volume < summary.baseline.volume);
    assert!((thin_signature.extents[0] - summary.baseline.extents[0]).abs() < 1e-6);
    assert!(thin.within_band.is_some());
    assert!(matches!(summary.outcomes[2].status, SweepStatus::Failed { .. }));
    assert!(summary.outcomes[2].signature.is_none());
    assert!(summary.accepted() >= 1);
}

#[test]
fn signature_compares_within_band() {
    let signature = default_hull().report.signature.clone();
    assert!(signature.matches(&signature, SignatureBand::default()));
    let mut shifted: GeometrySignature = signature.clone();
    shifted.volume *= 1.1;
    let deviations = shifted.compare(&signature, SignatureBand::default());
    assert!(deviations.iter().any(|d| d.field == "volume" && !d.passed));
    assert!(deviations.iter().filter(|d| d.field != "volume").all(|d| d.passed));
}
