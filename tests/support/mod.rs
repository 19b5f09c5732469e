//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use hashbrown::HashSet;
use hullforge::{
    float_types::Real,
    hull::{FixedInterfaceSpec, GeneratedHull, HullParams, ParameterSet, Preset, generate},
    mesh::{manifold::IndexedTriangles, polygon::Polygon},
};
use std::fmt::Debug;
use std::sync::OnceLock;

/// Returns the approximate bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]`
/// for a set of polygons.
pub fn bounding_box<S: Clone + Debug + Send + Sync>(polygons: &[Polygon<S>]) -> [Real; 6] {
    let mut bb = [Real::MAX, Real::MAX, Real::MAX, Real::MIN, Real::MIN, Real::MIN];
    for poly in polygons {
        for v in &poly.vertices {
            let p = v.pos;
            bb[0] = bb[0].min(p.x);
            bb[1] = bb[1].min(p.y);
            bb[2] = bb[2].min(p.z);
            bb[3] = bb[3].max(p.x);
            bb[4] = bb[4].max(p.y);
            bb[5] = bb[5].max(p.z);
        }
    }
    bb
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

pub fn preset_set(name: &str) -> ParameterSet {
    Preset::builtin(name)
        .expect("built-in preset")
        .parameter_set()
        .expect("preset parameters are valid")
}

pub fn default_set() -> ParameterSet {
    preset_set("gcsc_default")
}

pub fn default_params() -> HullParams {
    default_set().to_params().expect("default parameters pass their constraints")
}

/// The reference hull, generated once per test binary.
pub fn default_hull() -> &'static GeneratedHull {
    static HULL: OnceLock<GeneratedHull> = OnceLock::new();
    HULL.get_or_init(|| {
        generate(&default_set(), &FixedInterfaceSpec::CANONICAL).expect("reference hull generates")
    })
}

/// The `sleek` preset hull, generated once per test binary.
pub fn sleek_hull() -> &'static GeneratedHull {
    static HULL: OnceLock<GeneratedHull> = OnceLock::new();
    HULL.get_or_init(|| {
        generate(&preset_set("sleek"), &FixedInterfaceSpec::CANONICAL)
            .expect("sleek hull generates")
    })
}

/// Every directed edge of the triangles is used once and its reverse exists,
/// so the mesh is closed exactly as exported.
pub fn assert_edges_paired(indexed: &IndexedTriangles, label: &str) {
    let mut directed = HashSet::new();
    for tri in &indexed.triangles {
        for k in 0..3 {
            let edge = (tri[k], tri[(k + 1) % 3]);
            assert!(edge.0 != edge.1, "{label}: degenerate triangle {tri:?}");
            assert!(directed.insert(edge), "{label}: edge {edge:?} used twice");
        }
    }
    let open = directed.iter().filter(|&&(u, v)| !directed.contains(&(v, u))).count();
    assert_eq!(open, 0, "{label}: {open} unpaired edges");
}

/// Manifold, closed as exported, and the four slots on the canonical centers.
pub fn assert_sound_hull(hull: &GeneratedHull, label: &str) {
    let topology = &hull.report.topology;
    assert!(topology.is_manifold(), "{label}: {topology:?}");
    assert_edges_paired(&hull.indexed(), label);

    let interface = FixedInterfaceSpec::CANONICAL;
    assert_eq!(hull.report.slots.len(), 4, "{label}");
    for (slot, center) in hull.report.slots.iter().zip(interface.pivot_centers()) {
        assert!((slot.center[0] - center.x).abs() <= 0.01, "{label}: {slot:?}");
        assert!((slot.center[1] - center.y).abs() <= 0.01, "{label}: {slot:?}");
        assert!((slot.seat_z - center.z).abs() <= 0.01, "{label}: {slot:?}");
    }
}
