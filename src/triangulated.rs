//! A trait for any shape which can be represented by triangles
use crate::float_types::tolerance;
use crate::mesh::Mesh;
use crate::mesh::manifold::IndexedTriangles;
use crate::mesh::vertex::Vertex;
use nalgebra::Vector3;
use std::fmt::Debug;

/// A triangulated 3D surface.
///
/// Anything that can present itself as a bunch of triangles in 3D
/// can automatically use all the triangle-based IO backends.
pub trait Triangulated3D {
    /// Call `f` for each triangle.
    ///
    /// The triangle is `[v0, v1, v2]`; every vertex carries the facet normal.
    fn visit_triangles<F>(&self, f: F)
    where
        F: FnMut([Vertex; 3]);
}

impl Triangulated3D for IndexedTriangles {
    fn visit_triangles<F>(&self, mut f: F)
    where
        F: FnMut([Vertex; 3]),
    {
        for index in 0..self.triangles.len() {
            let [a, b, c] = self.triangle(index);
            let normal = (b - a)
                .cross(&(c - a))
                .try_normalize(0.0)
                .unwrap_or_else(Vector3::zeros);
            f([a, b, c].map(|pos| Vertex::new(pos, normal)));
        }
    }
}

/// Meshes are exported welded and with T-junctions repaired, so the facets
/// written out are exactly the triangles the topology checks analyse.
impl<S: Clone + Debug + Send + Sync> Triangulated3D for Mesh<S> {
    fn visit_triangles<F>(&self, f: F)
    where
        F: FnMut([Vertex; 3]),
    {
        self.to_indexed(tolerance()).visit_triangles(f)
    }
}
