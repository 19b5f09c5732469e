//! Skinning station sequences into closed meshes.

use crate::errors::LoftDegeneracyError;
use crate::float_types::Real;
use crate::hull::stations::{Station, StationSet, Surface};
use crate::hull::{Solid, SurfaceTag};
use crate::mesh::polygon::Polygon;
use crate::traits::CSGOps;
use nalgebra::Point3;
use tracing::debug;

/// Smallest accepted end cap area, mm².
pub const MIN_CAP_AREA: Real = 1.0e-2;

/// The outer body and the cavity, each closed and outward facing.
#[derive(Debug, Clone)]
pub struct LoftedHull {
    pub outer: Solid,
    pub cavity: Solid,
}

impl LoftedHull {
    /// Outer body minus cavity.
    pub fn shell(&self) -> Solid {
        self.outer.difference(&self.cavity)
    }
}

/// Loft both surfaces of a station set.
pub fn loft(stations: &StationSet) -> Result<LoftedHull, LoftDegeneracyError> {
    let outer = loft_surface(&stations.outer, Surface::Outer, SurfaceTag::Exterior)?;
    let cavity = loft_surface(&stations.cavity, Surface::Cavity, SurfaceTag::Cavity)?;
    Ok(LoftedHull { outer, cavity })
}

/// Join adjacent stations with triangle strips and close the ends with caps.
///
/// Profiles are counter-clockwise seen from `+x`, so strip triangles face
/// outward, the last cap keeps profile order and the first is reversed.
pub fn loft_surface(
    stations: &[Station],
    surface: Surface,
    tag: SurfaceTag,
) -> Result<Solid, LoftDegeneracyError> {
    let label = surface.label();
    if stations.len() < 2 {
        return Err(LoftDegeneracyError::TooFewStations { surface: label, count: stations.len() });
    }
    let n = stations[0].profile.points.len();
    for (index, station) in stations.iter().enumerate() {
        let found = station.profile.points.len();
        if found != n || found < 3 {
            return Err(LoftDegeneracyError::InconsistentProfile {
                surface: label,
                index,
                expected: n,
                found,
            });
        }
    }

    let ring = |station: &Station| -> Vec<Point3<Real>> {
        station.profile.points.iter().map(|p| Point3::new(station.x, p.x, p.y)).collect()
    };
    let rings: Vec<Vec<Point3<Real>>> = stations.iter().map(ring).collect();

    let last = stations.len() - 1;
    for index in [0, last] {
        let area = stations[index].profile.area();
        if area.abs() < MIN_CAP_AREA {
            return Err(LoftDegeneracyError::ZeroAreaCap {
                surface: label,
                index,
                area,
                minimum: MIN_CAP_AREA,
            });
        }
    }

    let mut polygons = Vec::with_capacity(2 * n * last + 2);
    for pair in rings.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        for k in 0..n {
            let j = (k + 1) % n;
            polygons.push(Polygon::from_points(&[a[k], a[j], b[j]], Some(tag)));
            polygons.push(Polygon::from_points(&[a[k], b[j], b[k]], Some(tag)));
        }
    }
    let first_cap: Vec<Point3<Real>> = rings[0].iter().rev().copied().collect();
    polygons.push(Polygon::from_points(&first_cap, Some(tag)));
    polygons.push(Polygon::from_points(&rings[last], Some(tag)));

    let solid = Solid::from_polygons(&polygons);
    let topology = solid.topology();
    debug!(
        surface = label,
        faces = topology.faces,
        volume = topology.signed_volume,
        "lofted surface"
    );
    if !topology.is_closed() || !topology.is_consistently_oriented() {
        return Err(LoftDegeneracyError::OpenSurface {
            surface: label,
            boundary_edges: topology.boundary_edges,
            inconsistent_edges: topology.inconsistent_edges,
        });
    }
    if topology.signed_volume <= 0.0 {
        return Err(LoftDegeneracyError::InvertedVolume {
            surface: label,
            volume: topology.signed_volume,
        });
    }
    Ok(solid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hull::stations::Profile;

    fn station(index: usize, x: Real, half_width: Real) -> Station {
        Station {
            index,
            x,
            profile: Profile::superellipse(10.0, half_width, 8.0, 2.5, 16),
        }
    }

    #[test]
    fn two_stations_make_a_closed_prism() {
        let stations = [station(0, -5.0, 4.0), station(1, 5.0, 4.0)];
        let solid = loft_surface(&stations, Surface::Outer, SurfaceTag::Exterior).unwrap();
        let topology = solid.topology();
        assert!(topology.is_manifold());
        let expected = 10.0 * stations[0].profile.area();
        assert!((topology.signed_volume - expected).abs() < 1e-6 * expected);
    }

    #[test]
    fn single_station_is_rejected() {
        let err = loft_surface(&[station(0, 0.0, 4.0)], Surface::Outer, SurfaceTag::Exterior);
        assert!(matches!(err, Err(LoftDegeneracyError::TooFewStations { count: 1, .. })));
    }

    #[test]
    fn mismatched_profiles_are_rejected() {
        let mut odd = station(1, 5.0, 4.0);
        odd.profile = Profile::superellipse(10.0, 4.0, 8.0, 2.5, 18);
        let err = loft_surface(&[station(0, -5.0, 4.0), odd], Surface::Cavity, SurfaceTag::Cavity);
        assert!(matches!(
            err,
            Err(LoftDegeneracyError::InconsistentProfile { index: 1, expected: 17, found: 19, .. })
        ));
    }

    #[test]
    fn flat_cap_is_rejected() {
        let stations = [station(0, -5.0, 0.0), station(1, 5.0, 4.0)];
        let err = loft_surface(&stations, Surface::Outer, SurfaceTag::Exterior);
        assert!(matches!(err, Err(LoftDegeneracyError::ZeroAreaCap { index: 0, .. })));
    }

    #[test]
    fn reversed_stations_invert_the_volume() {
        let stations = [station(0, 5.0, 4.0), station(1, -5.0, 4.0)];
        let err = loft_surface(&stations, Surface::Outer, SurfaceTag::Exterior);
        assert!(matches!(err, Err(LoftDegeneracyError::InvertedVolume { .. })));
    }
}
