mod support;

use hullforge::{
    float_types::Real,
    hull::{
        FixedInterfaceSpec, Solid, SurfaceTag,
        features::FeaturePlan,
        validate::{Bound, Criticality, InvariantCategory, Validator, manifold_checks},
    },
    mesh::polygon::Polygon,
};
use nalgebra::Point3;

use crate::support::{default_hull, default_params};

fn empty_plan() -> FeaturePlan {
    FeaturePlan { features: Vec::new(), slot_clearances: Vec::new() }
}

#[test]
fn open_cube_reports_boundary_edges() {
    let cube =
        Solid::block(Point3::origin(), Point3::new(10.0, 10.0, 10.0), Some(SurfaceTag::Exterior));
    let open: Vec<Polygon<SurfaceTag>> = cube.polygons[..5].to_vec();
    let topology = Solid::from_polygons(&open).topology();
    assert_eq!(topology.boundary_edges, 4);

    let checks = manifold_checks(&topology, 1);
    let failed: Vec<&str> = checks.iter().filter(|c| !c.passed).map(|c| c.name.as_str()).collect();
    assert!(failed.contains(&"boundary_edges"), "{failed:?}");
    assert!(checks.iter().all(|c| c.category == InvariantCategory::Manifold));
    assert!(checks.iter().all(|c| c.criticality == Criticality::MechanicalCritical));
}

#[test]
fn zero_height_box_has_zero_volume() {
    let flat =
        Solid::block(Point3::origin(), Point3::new(10.0, 10.0, 0.0), Some(SurfaceTag::Exterior));
    let checks = manifold_checks(&flat.topology(), 1);
    let volume = checks.iter().find(|c| c.name == "enclosed_volume").unwrap();
    assert!(!volume.passed);
    assert_eq!(volume.detail, "zero volume");
    assert_eq!(volume.bound, Bound::AtLeast(1.0e-6));
}

#[test]
fn plain_block_fails_interface_but_not_topology() {
    let params = default_params();
    let interface = FixedInterfaceSpec::CANONICAL;
    let block = Solid::block(
        Point3::new(-74.0, -40.0, 0.0),
        Point3::new(74.0, 40.0, 50.0),
        Some(SurfaceTag::Exterior),
    );
    let report = Validator::new(&params, &interface).validate(&block, &empty_plan());

    assert!(report.category_passed(InvariantCategory::Manifold));
    assert!(!report.category_passed(InvariantCategory::InterfaceCoordinates));
    assert!(!report.is_acceptable());
    assert_eq!(report.slots.len(), 4);
    assert!(report.slots.iter().all(|s| s.diameter_x.is_nan()));
    let violations = report.violations();
    assert!(violations.iter().any(|v| v.name == "slot_0_center_x"));
    assert!(violations.iter().all(|v| v.measured.is_nan() || !v.bound.admits(v.measured)));
}

#[test]
fn shifted_interface_is_rejected() {
    let hull = default_hull();
    let shifted = FixedInterfaceSpec { frame_x_offset: 16.5, ..FixedInterfaceSpec::CANONICAL };
    assert!(!shifted.is_canonical());
    let report = Validator::new(&hull.params, &shifted).validate(&hull.solid, &hull.features);

    assert!(!report.category_passed(InvariantCategory::InterfaceCoordinates));
    let center_x = report.check("slot_0_center_x").unwrap();
    assert!(!center_x.passed);
    assert!((center_x.measured - -16.0).abs() < 0.01);
    // advisory record of the interface drift
    let locked = report.check("interface_constants_locked").unwrap();
    assert_eq!(locked.criticality, Criticality::Advisory);
    assert!(!locked.passed);
}

#[test]
fn report_serializes_to_json() {
    let report = &default_hull().report;
    let json = serde_json::to_value(report).unwrap();
    let checks = json["checks"].as_array().unwrap();
    assert_eq!(checks.len(), report.checks.len());
    assert!(checks.iter().any(|c| c["name"] == "boundary_edges"));
    assert_eq!(json["slots"].as_array().unwrap().len(), 4);
    let volume: Real = json["signature"]["volume"].as_f64().unwrap();
    assert!(volume > 0.0);
}
