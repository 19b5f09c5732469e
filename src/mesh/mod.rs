//! `Mesh` struct and implementations of the `CSGOps` trait for `Mesh`

use crate::float_types::{
    Real,
    parry3d::bounding_volume::{Aabb, BoundingVolume},
};
use crate::mesh::{bsp::Node, plane::Plane, polygon::Polygon};
use crate::traits::CSGOps;
use nalgebra::{Matrix4, Point3};
use std::{fmt::Debug, sync::OnceLock};

pub mod bsp;
pub mod manifold;
pub mod plane;
pub mod polygon;
pub mod query;
pub mod shapes;
pub mod vertex;

/// A boundary representation as a soup of planar convex polygons.
///
/// `S` is per-face metadata; it survives splitting, so faces can be traced
/// back to the primitive that produced them after any number of booleans.
#[derive(Clone, Debug)]
pub struct Mesh<S: Clone + Send + Sync + Debug> {
    /// 3D polygons for volumetric shapes
    pub polygons: Vec<Polygon<S>>,

    /// Lazily calculated AABB that spans `polygons`.
    pub bounding_box: OnceLock<Aabb>,
}

impl<S: Clone + Send + Sync + Debug> Mesh<S> {
    /// Build a Mesh from an existing polygon list
    pub fn from_polygons(polygons: &[Polygon<S>]) -> Self {
        let mut mesh = Mesh::new();
        mesh.polygons = polygons.to_vec();
        mesh
    }

    /// Split polygons into (may_touch, cannot_touch) using bounding‑box tests
    fn partition_polys(
        polys: &[Polygon<S>],
        other_bb: &Aabb,
    ) -> (Vec<Polygon<S>>, Vec<Polygon<S>>) {
        let mut maybe = Vec::new();
        let mut never = Vec::new();
        for p in polys {
            if p.bounding_box().intersects(other_bb) {
                maybe.push(p.clone());
            } else {
                never.push(p.clone());
            }
        }
        (maybe, never)
    }

    /// Polygons whose metadata satisfies `predicate`.
    pub fn polygons_where<F>(&self, predicate: F) -> impl Iterator<Item = &Polygon<S>>
    where
        F: Fn(&S) -> bool,
    {
        self.polygons
            .iter()
            .filter(move |p| p.metadata.as_ref().is_some_and(&predicate))
    }

    /// Total polygon area.
    pub fn surface_area(&self) -> Real {
        self.polygons.iter().map(Polygon::area).sum()
    }
}

impl<S: Clone + Send + Sync + Debug> CSGOps for Mesh<S> {
    /// Returns a new empty Mesh
    fn new() -> Self {
        Mesh {
            polygons: Vec::new(),
            bounding_box: OnceLock::new(),
        }
    }

    /// Return a new Mesh representing union of the two Meshes.
    ///
    /// ```text
    /// let c = a.union(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |       +----+
    ///     +----+--+    |       +----+       |
    ///          |   b   |            |   c   |
    ///          |       |            |       |
    ///          +-------+            +-------+
    /// ```
    fn union(&self, other: &Mesh<S>) -> Mesh<S> {
        if !self.bounding_box().intersects(&other.bounding_box()) {
            let mut polygons = self.polygons.clone();
            polygons.extend(other.polygons.iter().cloned());
            return Mesh { polygons, bounding_box: OnceLock::new() };
        }

        // faces outside the other operand's box cannot be inside it
        let (a_clip, a_passthru) =
            Self::partition_polys(&self.polygons, &other.bounding_box());
        let (b_clip, b_passthru) =
            Self::partition_polys(&other.polygons, &self.bounding_box());

        // trees span whole operands so that every clip sees a closed solid
        let a = Node::from_polygons(&self.polygons);
        let b = Node::from_polygons(&other.polygons);

        let mut final_polys = b.clip_polygons(&a_clip);
        let b_outside = a.clip_polygons(&b_clip);
        // faces of `other` lying on same-facing faces of `self` are dropped
        final_polys.extend(flipped(a.clip_polygons(&flipped(b_outside))));
        final_polys.extend(a_passthru);
        final_polys.extend(b_passthru);

        Mesh {
            polygons: final_polys,
            bounding_box: OnceLock::new(),
        }
    }

    /// Return a new Mesh representing difference of the two Meshes.
    ///
    /// ```text
    /// let c = a.difference(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |    +--+
    ///     +----+--+    |       +----+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn difference(&self, other: &Mesh<S>) -> Mesh<S> {
        if !self.bounding_box().intersects(&other.bounding_box()) {
            return Mesh { polygons: self.polygons.clone(), bounding_box: OnceLock::new() };
        }

        // faces outside the other operand's box cannot be inside it
        let (a_clip, a_passthru) =
            Self::partition_polys(&self.polygons, &other.bounding_box());
        let (b_clip, _b_passthru) =
            Self::partition_polys(&other.polygons, &self.bounding_box());

        let mut a_inverted = Node::from_polygons(&self.polygons);
        a_inverted.invert();
        let b = Node::from_polygons(&other.polygons);

        // faces of `self` outside `other`
        let mut final_polys = flipped(b.clip_polygons(&flipped(a_clip)));
        // faces of `other` inside `self`, turned to face into the hole
        let b_inside = a_inverted.clip_polygons(&b_clip);
        final_polys.extend(a_inverted.clip_polygons(&flipped(b_inside)));
        final_polys.extend(a_passthru);

        Mesh {
            polygons: final_polys,
            bounding_box: OnceLock::new(),
        }
    }

    /// Return a new Mesh representing intersection of the two Meshes.
    ///
    /// ```text
    /// let c = a.intersection(b);
    ///     +-------+
    ///     |       |
    ///     |   a   |
    ///     |    +--+----+   =   +--+
    ///     +----+--+    |       +--+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn intersection(&self, other: &Mesh<S>) -> Mesh<S> {
        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);

        a.invert();
        b.clip_to(&a);
        b.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        a.build(&b.all_polygons());
        a.invert();

        Mesh {
            polygons: a.all_polygons(),
            bounding_box: OnceLock::new(),
        }
    }

    /// Apply an affine 3D transform (as a 4x4 matrix) to the mesh.
    ///
    /// A singular matrix leaves normals untouched.
    fn transform(&self, mat: &Matrix4<Real>) -> Mesh<S> {
        let mat_inv_transpose = mat
            .try_inverse()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity);
        let mut mesh = self.clone();

        for poly in &mut mesh.polygons {
            for vert in &mut poly.vertices {
                let homog_pos = mat * vert.pos.to_homogeneous();
                if let Some(pos) = Point3::from_homogeneous(homog_pos) {
                    vert.pos = pos;
                }
                let normal = mat_inv_transpose.transform_vector(&vert.normal);
                if let Some(unit) = normal.try_normalize(Real::EPSILON) {
                    vert.normal = unit;
                }
            }

            // keep the cached plane consistent with the new vertex positions
            poly.plane = Plane::from_vertices(&poly.vertices);
            poly.bounding_box = OnceLock::new();
        }

        mesh.bounding_box = OnceLock::new();
        mesh
    }

    /// Returns a [`parry3d::bounding_volume::Aabb`] spanning all `polygons`.
    fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);

            for poly in &self.polygons {
                for v in &poly.vertices {
                    mins = mins.inf(&v.pos);
                    maxs = maxs.sup(&v.pos);
                }
            }

            // no polygons: trivial AABB at origin
            if mins.x > maxs.x {
                return Aabb::new(Point3::origin(), Point3::origin());
            }
            Aabb::new(mins, maxs)
        })
    }

    /// Invert this Mesh (flip inside vs. outside)
    fn inverse(&self) -> Mesh<S> {
        let mut mesh = self.clone();
        for p in &mut mesh.polygons {
            p.flip();
        }
        mesh
    }
}

fn flipped<S: Clone + Send + Sync + Debug>(mut polygons: Vec<Polygon<S>>) -> Vec<Polygon<S>> {
    polygons.iter_mut().for_each(Polygon::flip);
    polygons
}
