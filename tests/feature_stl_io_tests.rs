#![cfg(feature = "stl-io")]

mod support;

use hullforge::{hull::Preset, io, mesh::Mesh};

use crate::support::default_hull;

#[test]
fn mesh_to_stl_ascii() {
    let cube: Mesh<()> = Mesh::cuboid(2.0, 2.0, 2.0, None);
    let stl_str = cube.to_stl_ascii("test_cube");
    assert!(stl_str.contains("solid test_cube"));
    assert!(stl_str.contains("endsolid test_cube"));
    assert_eq!(stl_str.matches("facet normal").count(), 12);
    assert_eq!(stl_str.matches("vertex").count(), 36);
}

#[test]
fn hull_stl_reads_back() -> Result<(), Box<dyn std::error::Error>> {
    let hull = default_hull();
    let path = std::env::temp_dir().join(format!("hullforge_{}.stl", std::process::id()));
    io::write_stl(&path, &hull.solid, "gcsc_default", false)?;

    let mut file = std::fs::File::open(&path)?;
    let read = stl_io::read_stl(&mut file)?;
    let _ = std::fs::remove_file(&path);

    // facets are the repaired triangles the validator analysed
    assert_eq!(read.faces.len(), hull.indexed().triangles.len());

    let (mut min_x, mut max_x) = (f32::MAX, f32::MIN);
    for v in &read.vertices {
        min_x = min_x.min(v[0]);
        max_x = max_x.max(v[0]);
    }
    assert!((max_x - min_x - 148.0).abs() < 1e-3, "length {}", max_x - min_x);
    Ok(())
}

#[test]
fn report_and_preset_files() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::temp_dir();
    let id = std::process::id();

    let report_path = dir.join(format!("hullforge_report_{id}.json"));
    io::write_json(&report_path, &default_hull().report)?;
    let text = std::fs::read_to_string(&report_path)?;
    let _ = std::fs::remove_file(&report_path);
    assert!(text.contains("\"boundary_edges\""));

    let preset_path = dir.join(format!("hullforge_preset_{id}.json"));
    let sleek = Preset::builtin("sleek").unwrap();
    std::fs::write(&preset_path, sleek.to_json()?)?;
    let read = io::read_preset(&preset_path)?;
    let _ = std::fs::remove_file(&preset_path);
    assert_eq!(read, sleek);
    Ok(())
}
