//! Generation across the station grid and the style perturbations.

mod support;

use hullforge::hull::{
    FixedInterfaceSpec, GeneratedHull, generate,
    pipeline::{Perturbation, default_perturbations},
};

use crate::support::{assert_sound_hull, default_set};

fn generate_with(overrides: &[(&str, f64)]) -> GeneratedHull {
    let set = Perturbation::new("case", overrides).apply(&default_set()).unwrap();
    generate(&set, &FixedInterfaceSpec::CANONICAL)
        .unwrap_or_else(|e| panic!("{overrides:?}: {e}"))
}

fn every_station_count(cosine: bool) {
    let spacing = if cosine { 1.0 } else { 0.0 };
    for count in 9..=17 {
        let overrides = [("station_count", count as f64), ("station_spacing_cosine", spacing)];
        let hull = generate_with(&overrides);
        assert_eq!(hull.stations.outer.len(), count);
        assert_sound_hull(&hull, &format!("{count} stations, cosine {cosine}"));
    }
}

#[test]
fn uniform_spacing_generates_every_station_count() {
    every_station_count(false);
}

#[test]
fn cosine_spacing_generates_every_station_count() {
    every_station_count(true);
}

fn perturbation(name: &str) -> Perturbation {
    default_perturbations()
        .into_iter()
        .find(|p| p.name == name)
        .unwrap_or_else(|| panic!("no perturbation `{name}`"))
}

fn generate_perturbed(name: &str) -> GeneratedHull {
    let set = perturbation(name).apply(&default_set()).unwrap();
    generate(&set, &FixedInterfaceSpec::CANONICAL).unwrap_or_else(|e| panic!("{name}: {e}"))
}

#[test]
fn long_hull_is_manifold() {
    let hull = generate_perturbed("long");
    assert_sound_hull(&hull, "long");
    assert_eq!(hull.report.topology.non_manifold_edges, 0);
    assert!((hull.report.signature.extents[0] - 164.0).abs() < 1e-6);
}

#[test]
fn blunt_tips_are_manifold() {
    let hull = generate_perturbed("blunt_tips");
    assert_sound_hull(&hull, "blunt_tips");
    assert_eq!(hull.report.topology.components, 1);
}

#[test]
fn full_sections_are_closed_with_a_fixed_interface() {
    let hull = generate_perturbed("full_sections");
    assert_sound_hull(&hull, "full_sections");
    assert_eq!(hull.report.topology.boundary_edges, 0);
    for slot in &hull.report.slots {
        assert!((slot.diameter_x - 7.5).abs() <= 0.01, "{slot:?}");
        assert!((slot.diameter_y - 7.5).abs() <= 0.01, "{slot:?}");
    }
}

#[test]
fn remaining_perturbations_generate_sound_hulls() {
    // long, blunt_tips and full_sections have their own tests above
    let covered = ["long", "blunt_tips", "full_sections"];
    for p in default_perturbations().iter().filter(|p| !covered.contains(&p.name.as_str())) {
        let set = p.apply(&default_set()).unwrap();
        let hull = generate(&set, &FixedInterfaceSpec::CANONICAL)
            .unwrap_or_else(|e| panic!("{}: {e}", p.name));
        assert_sound_hull(&hull, &p.name);
    }
}
