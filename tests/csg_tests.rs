mod support;

use hullforge::{
    float_types::{Real, tolerance},
    hull::SurfaceTag,
    mesh::{Mesh, polygon::Polygon, query::SurfaceQuery},
    traits::CSGOps,
};
use nalgebra::Point3;

use crate::support::{approx_eq, bounding_box};

fn block(min: [Real; 3], max: [Real; 3], tag: SurfaceTag) -> Mesh<SurfaceTag> {
    Mesh::block(Point3::from(min), Point3::from(max), Some(tag))
}

fn volume(mesh: &Mesh<SurfaceTag>) -> Real {
    mesh.to_indexed(tolerance()).signed_volume()
}

#[test]
fn from_polygons_keeps_faces() {
    let poly: Polygon<SurfaceTag> = Polygon::from_points(
        &[Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
        Some(SurfaceTag::Exterior),
    );
    let mesh = Mesh::from_polygons(&[poly]);
    assert_eq!(mesh.polygons.len(), 1);
    assert_eq!(mesh.polygons[0].vertices.len(), 3);
    assert_eq!(mesh.polygons[0].metadata(), Some(&SurfaceTag::Exterior));
}

#[test]
fn block_volume_and_topology() {
    let a = block([0.0; 3], [2.0, 3.0, 4.0], SurfaceTag::Exterior);
    assert!(approx_eq(volume(&a), 24.0, 1e-9));
    assert!(a.is_manifold());
    let bb = bounding_box(&a.polygons);
    assert_eq!(bb, [0.0, 0.0, 0.0, 2.0, 3.0, 4.0]);
}

#[test]
fn boolean_volumes() {
    let a = block([0.0; 3], [2.0; 3], SurfaceTag::Exterior);
    let b = block([1.0, 0.5, 0.5], [3.0, 1.5, 1.5], SurfaceTag::SlotWall(0));

    let union = a.union(&b);
    let difference = a.difference(&b);
    let intersection = a.intersection(&b);

    assert!(approx_eq(volume(&union), 9.0, 1e-6), "union volume {}", volume(&union));
    assert!(approx_eq(volume(&difference), 7.0, 1e-6), "difference volume {}", volume(&difference));
    assert!(
        approx_eq(volume(&intersection), 1.0, 1e-6),
        "intersection volume {}",
        volume(&intersection)
    );

    let results = [("union", &union), ("difference", &difference), ("intersection", &intersection)];
    for (name, mesh) in results {
        let topology = mesh.topology();
        assert!(topology.is_manifold(), "{name}: {topology:?}");
    }
}

#[test]
fn difference_keeps_cutter_tags_on_cut_faces() {
    let body = block([0.0; 3], [4.0; 3], SurfaceTag::Exterior);
    let pocket = block([1.0, 1.0, 2.0], [3.0, 3.0, 5.0], SurfaceTag::FootRecess(2));
    let result = body.difference(&pocket);

    let pocket_faces: Vec<_> =
        result.polygons_where(|tag| *tag == SurfaceTag::FootRecess(2)).collect();
    assert!(!pocket_faces.is_empty());
    // pocket walls and floor lie inside the original box
    for poly in &pocket_faces {
        for v in &poly.vertices {
            assert!(v.pos.x >= 1.0 - 1e-9 && v.pos.x <= 3.0 + 1e-9);
            assert!(v.pos.z >= 2.0 - 1e-9 && v.pos.z <= 4.0 + 1e-9);
        }
    }
    let pocket_area: Real = pocket_faces.iter().map(|p| p.area()).sum();
    // four 2x2 walls and a 2x2 floor
    assert!(approx_eq(pocket_area, 20.0, 1e-6), "pocket area {pocket_area}");
    assert!(result.polygons_where(|tag| *tag == SurfaceTag::Exterior).count() > 0);
}

#[test]
fn disjoint_union_has_two_components() {
    let a = block([0.0; 3], [1.0; 3], SurfaceTag::Exterior);
    let b = block([5.0, 0.0, 0.0], [6.0, 1.0, 1.0], SurfaceTag::SeatStop(1));
    let union = a.union(&b);
    let topology = union.topology();
    assert_eq!(topology.components, 2);
    assert!(topology.is_manifold());
    assert!(approx_eq(topology.signed_volume, 2.0, 1e-9));
}

#[test]
fn bar_across_two_shells() {
    // most faces of the two shells lie outside the bar's box
    let shells = block([0.0; 3], [2.0; 3], SurfaceTag::Exterior)
        .union(&block([4.0, 0.0, 0.0], [6.0, 2.0, 2.0], SurfaceTag::Exterior));
    let bar = block([1.0, 0.5, 0.5], [5.0, 1.5, 1.5], SurfaceTag::Reinforcement(0));

    let joined = shells.union(&bar);
    let topology = joined.topology();
    assert!(topology.is_manifold(), "{topology:?}");
    assert_eq!(topology.components, 1);
    assert!(approx_eq(topology.signed_volume, 18.0, 1e-6), "{topology:?}");

    let notched = shells.difference(&bar);
    let topology = notched.topology();
    assert!(topology.is_manifold(), "{topology:?}");
    assert_eq!(topology.components, 2);
    assert!(approx_eq(topology.signed_volume, 14.0, 1e-6), "{topology:?}");
}

#[test]
fn inverse_flips_volume_sign() {
    let a = block([0.0; 3], [1.0; 3], SurfaceTag::Cavity);
    assert!(approx_eq(volume(&a.inverse()), -1.0, 1e-9));
}

#[test]
fn cylinder_and_lathe_are_closed() {
    let cylinder: Mesh<SurfaceTag> = Mesh::cylinder(2.0, -1.0, 3.0, 32, None).unwrap();
    let topology = cylinder.topology();
    assert!(topology.is_manifold(), "{topology:?}");
    // inscribed 32-gon area times height
    let expected = 0.5 * 32.0 * 4.0 * (std::f64::consts::TAU / 32.0).sin() * 4.0;
    assert!(approx_eq(topology.signed_volume, expected, 1e-6));

    let capsule: Mesh<SurfaceTag> =
        Mesh::lathe(&[(0.0, 0.0), (1.0, 1.0), (1.0, 2.0), (0.0, 3.0)], 24, None).unwrap();
    assert!(capsule.is_manifold());
    assert!(capsule.topology().signed_volume > 0.0);

    assert!(Mesh::<SurfaceTag>::cylinder(1.0, 0.0, 1.0, 2, None).is_err());
    assert!(Mesh::<SurfaceTag>::lathe(&[(1.0, 0.0), (0.0, 1.0), (1.0, 2.0)], 12, None).is_err());
}

#[test]
fn surface_query_through_difference() {
    let shell = block([-2.0; 3], [2.0; 3], SurfaceTag::Exterior)
        .difference(&block([-1.0; 3], [1.0; 3], SurfaceTag::Cavity));
    let query = SurfaceQuery::from_mesh(&shell).unwrap();

    assert!(!query.contains(&Point3::origin()));
    assert!(query.contains(&Point3::new(1.5, 0.1, 0.2)));
    let hits = query.hits(Point3::new(-3.0, 0.1, 0.2), nalgebra::Vector3::x(), 10.0);
    assert_eq!(hits.len(), 4);
    assert!(approx_eq(hits[0], 1.0, 1e-6));
    assert!(approx_eq(hits[1], 2.0, 1e-6));
    assert!(approx_eq(hits[2], 4.0, 1e-6));
    assert!(approx_eq(hits[3], 5.0, 1e-6));
}

#[test]
fn transform_moves_bounding_box() {
    let a = block([0.0; 3], [1.0; 3], SurfaceTag::Exterior).translate(2.0, -3.0, 0.5);
    let bb = a.bounding_box();
    assert!(approx_eq(bb.mins.x, 2.0, 1e-12));
    assert!(approx_eq(bb.mins.y, -3.0, 1e-12));
    assert!(approx_eq(bb.maxs.z, 1.5, 1e-12));
}
