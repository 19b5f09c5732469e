//! Ray casts and distance queries against a welded mesh, backed by a parry `TriMesh`.

use crate::errors::MeshError;
use crate::float_types::{
    Real, tolerance,
    parry3d::{
        query::{PointQuery, Ray, RayCast},
        shape::TriMesh,
    },
};
use crate::mesh::Mesh;
use crate::mesh::manifold::IndexedTriangles;
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;

/// Distance a ray is advanced past a hit before searching for the next one.
const HIT_STEP: Real = 1e-6;

/// Upper bound on successive hits collected along one ray.
const MAX_HITS: usize = 256;

/// Spatial queries on a closed surface.
pub struct SurfaceQuery {
    trimesh: TriMesh,
    indexed: IndexedTriangles,
}

impl SurfaceQuery {
    pub fn new(indexed: IndexedTriangles) -> Result<Self, MeshError> {
        if indexed.triangles.is_empty() {
            return Err(MeshError::Empty);
        }
        let trimesh = TriMesh::new(indexed.vertices.clone(), indexed.triangles.clone())?;
        Ok(SurfaceQuery { trimesh, indexed })
    }

    pub fn from_mesh<S: Clone + Debug + Send + Sync>(mesh: &Mesh<S>) -> Result<Self, MeshError> {
        SurfaceQuery::new(mesh.to_indexed(tolerance()))
    }

    pub const fn indexed(&self) -> &IndexedTriangles {
        &self.indexed
    }

    /// Distance to the first surface crossing along `direction` (normalized internally).
    pub fn first_hit(
        &self,
        origin: Point3<Real>,
        direction: Vector3<Real>,
        max_distance: Real,
    ) -> Option<Real> {
        let dir = direction.try_normalize(Real::EPSILON)?;
        let ray = Ray::new(origin, dir);
        self.trimesh.cast_local_ray(&ray, max_distance, false)
    }

    /// Every surface crossing along the ray, in increasing distance.
    pub fn hits(
        &self,
        origin: Point3<Real>,
        direction: Vector3<Real>,
        max_distance: Real,
    ) -> Vec<Real> {
        let Some(dir) = direction.try_normalize(Real::EPSILON) else {
            return Vec::new();
        };
        let mut hits = Vec::new();
        let mut travelled = 0.0;
        while hits.len() < MAX_HITS && travelled < max_distance {
            let ray = Ray::new(origin + dir * travelled, dir);
            match self.trimesh.cast_local_ray(&ray, max_distance - travelled, false) {
                Some(t) => {
                    hits.push(travelled + t);
                    travelled += t + HIT_STEP;
                },
                None => break,
            }
        }
        hits
    }

    /// Unsigned distance from `point` to the surface.
    pub fn distance(&self, point: &Point3<Real>) -> Real {
        self.trimesh.distance_to_local_point(point, false)
    }

    /// Inside test by crossing parity along a skewed direction.
    pub fn contains(&self, point: &Point3<Real>) -> bool {
        let direction = Vector3::new(0.5773, 0.5774, 0.5775);
        self.hits(*point, direction, 1.0e6).len() % 2 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::CSGOps;

    #[test]
    fn rays_through_a_box() {
        let cube: Mesh<()> = Mesh::cuboid(2.0, 2.0, 2.0, None).translate(-1.0, -1.0, -1.0);
        let query = SurfaceQuery::from_mesh(&cube).unwrap();

        let hits = query.hits(Point3::new(0.1, 0.2, -5.0), Vector3::z(), 100.0);
        assert_eq!(hits.len(), 2);
        assert!((hits[0] - 4.0).abs() < 1e-9);
        assert!((hits[1] - 6.0).abs() < 1e-9);

        assert!(query.contains(&Point3::new(0.1, 0.2, 0.3)));
        assert!(!query.contains(&Point3::new(3.0, 0.2, 0.3)));
        assert!((query.distance(&Point3::new(0.0, 0.0, 0.25)) - 0.75).abs() < 1e-9);
    }
}
