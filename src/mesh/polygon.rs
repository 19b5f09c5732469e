//! Planar convex polygons carrying optional per-face metadata.

use crate::float_types::{
    Real,
    parry3d::bounding_volume::Aabb,
};
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;
use std::sync::OnceLock;

/// A convex, planar polygon. Every polygon produced by the shape builders and
/// the lofter is convex, so fan triangulation is exact.
#[derive(Debug, Clone)]
pub struct Polygon<S: Clone> {
    pub vertices: Vec<Vertex>,
    pub plane: Plane,
    pub bounding_box: OnceLock<Aabb>,
    pub metadata: Option<S>,
}

impl<S: Clone + Send + Sync + Debug> Polygon<S> {
    /// Create a polygon, computing its plane from the vertex loop.
    pub fn new(vertices: Vec<Vertex>, metadata: Option<S>) -> Self {
        let plane = Plane::from_vertices(&vertices);
        Polygon::with_plane(vertices, plane, metadata)
    }

    /// Create a polygon on a known plane (used for split fragments).
    pub const fn with_plane(vertices: Vec<Vertex>, plane: Plane, metadata: Option<S>) -> Self {
        Polygon {
            vertices,
            plane,
            bounding_box: OnceLock::new(),
            metadata,
        }
    }

    /// Polygon from bare positions; vertex normals are set to the face normal.
    pub fn from_points(points: &[Point3<Real>], metadata: Option<S>) -> Self {
        let mut vertices: Vec<Vertex> = points
            .iter()
            .map(|p| Vertex::new(*p, Vector3::zeros()))
            .collect();
        let plane = Plane::from_vertices(&vertices);
        for v in &mut vertices {
            v.normal = plane.normal;
        }
        Polygon::with_plane(vertices, plane, metadata)
    }

    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
            for v in &self.vertices {
                mins = mins.inf(&v.pos);
                maxs = maxs.sup(&v.pos);
            }
            Aabb::new(mins, maxs)
        })
    }

    /// Reverse winding, vertex normals and plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.vertices.iter_mut().for_each(Vertex::flip);
        self.plane.flip();
    }

    /// Area of the vertex loop (Newell).
    pub fn area(&self) -> Real {
        let mut normal = Vector3::zeros();
        for (i, current) in self.vertices.iter().enumerate() {
            let next = &self.vertices[(i + 1) % self.vertices.len()];
            normal += current.pos.coords.cross(&next.pos.coords);
        }
        normal.norm() * 0.5
    }

    pub const fn metadata(&self) -> Option<&S> {
        self.metadata.as_ref()
    }
}
