//! Oriented planes and the polygon splitter at the heart of the BSP kernel.

use crate::float_types::{EPSILON, Real};
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;

pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// A plane `normal · p = w` with a unit normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub normal: Vector3<Real>,
    pub w: Real,
}

impl Plane {
    /// Plane with the given (normalized) normal and offset.
    pub fn from_normal(normal: Vector3<Real>, offset: Real) -> Self {
        let len = normal.norm();
        if len < Real::EPSILON {
            return Plane { normal: Vector3::z(), w: offset };
        }
        Plane { normal: normal / len, w: offset / len }
    }

    /// Plane through three points, counter-clockwise seen from the front.
    pub fn from_points(a: &Point3<Real>, b: &Point3<Real>, c: &Point3<Real>) -> Self {
        let n = (b - a).cross(&(c - a));
        Plane::from_normal(n, n.dot(&a.coords))
    }

    /// Best-fit plane of a planar vertex loop using Newell's method.
    ///
    /// Falls back to the first vertex normal when the loop has no area.
    pub fn from_vertices(vertices: &[Vertex]) -> Self {
        let mut normal: Vector3<Real> = Vector3::zeros();
        let mut centroid = Vector3::zeros();
        for (i, current) in vertices.iter().enumerate() {
            let next = &vertices[(i + 1) % vertices.len()];
            let (c, n) = (current.pos, next.pos);
            normal.x += (c.y - n.y) * (c.z + n.z);
            normal.y += (c.z - n.z) * (c.x + n.x);
            normal.z += (c.x - n.x) * (c.y + n.y);
            centroid += c.coords;
        }
        if vertices.is_empty() {
            return Plane { normal: Vector3::z(), w: 0.0 };
        }
        centroid /= vertices.len() as Real;

        let len = normal.norm();
        let unit = if len > Real::EPSILON {
            normal / len
        } else {
            let fallback = vertices[0].normal;
            let fallback_len = fallback.norm();
            if fallback_len > Real::EPSILON {
                fallback / fallback_len
            } else {
                Vector3::z()
            }
        };
        Plane { normal: unit, w: unit.dot(&centroid) }
    }

    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Signed distance of `point` from the plane, positive in front.
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classify a point as `FRONT`, `BACK` or `COPLANAR` within [`EPSILON`].
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let t = self.signed_distance(point);
        if t < -EPSILON {
            BACK
        } else if t > EPSILON {
            FRONT
        } else {
            COPLANAR
        }
    }

    /// Union of the classifications of every polygon vertex.
    pub fn classify_polygon<S: Clone + Send + Sync + Debug>(&self, polygon: &Polygon<S>) -> i8 {
        polygon
            .vertices
            .iter()
            .fold(COPLANAR, |acc, v| acc | self.orient_point(&v.pos))
    }

    /// Splits a polygon by this plane, returning four buckets:
    /// `(coplanar_front, coplanar_back, front, back)`.
    ///
    /// Split pieces keep the parent polygon's plane and metadata.
    #[allow(clippy::type_complexity)]
    pub fn split_polygon<S: Clone + Send + Sync + Debug>(
        &self,
        polygon: &Polygon<S>,
    ) -> (Vec<Polygon<S>>, Vec<Polygon<S>>, Vec<Polygon<S>>, Vec<Polygon<S>>) {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|v| self.orient_point(&v.pos))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let count = polygon.vertices.len();
                let mut split_front = Vec::with_capacity(count + 1);
                let mut split_back = Vec::with_capacity(count + 1);

                for i in 0..count {
                    let j = (i + 1) % count;
                    let (type_i, type_j) = (types[i], types[j]);
                    let vertex_i = &polygon.vertices[i];
                    let vertex_j = &polygon.vertices[j];

                    if type_i != BACK {
                        split_front.push(vertex_i.clone());
                    }
                    if type_i != FRONT {
                        split_back.push(vertex_i.clone());
                    }

                    if (type_i | type_j) == SPANNING {
                        let denom = self.normal.dot(&(vertex_j.pos - vertex_i.pos));
                        if denom.abs() > Real::EPSILON {
                            let t = (self.w - self.normal.dot(&vertex_i.pos.coords)) / denom;
                            let vertex_new = vertex_i.interpolate(vertex_j, t.clamp(0.0, 1.0));
                            split_front.push(vertex_new.clone());
                            split_back.push(vertex_new);
                        }
                    }
                }

                if split_front.len() >= 3 {
                    front.push(Polygon::with_plane(
                        split_front,
                        polygon.plane.clone(),
                        polygon.metadata.clone(),
                    ));
                }
                if split_back.len() >= 3 {
                    back.push(Polygon::with_plane(
                        split_back,
                        polygon.plane.clone(),
                        polygon.metadata.clone(),
                    ));
                }
            },
        }

        (coplanar_front, coplanar_back, front, back)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(z: Real) -> Polygon<()> {
        let n = Vector3::z();
        Polygon::new(
            vec![
                Vertex::new(Point3::new(0.0, 0.0, z), n),
                Vertex::new(Point3::new(2.0, 0.0, z), n),
                Vertex::new(Point3::new(2.0, 2.0, z), n),
                Vertex::new(Point3::new(0.0, 2.0, z), n),
            ],
            None,
        )
    }

    #[test]
    fn newell_plane_of_square() {
        let plane = Plane::from_vertices(&square(3.0).vertices);
        assert!((plane.normal - Vector3::z()).norm() < 1e-12);
        assert!((plane.w - 3.0).abs() < 1e-12);
    }

    #[test]
    fn split_spanning_square_in_half() {
        let plane = Plane::from_normal(Vector3::x(), 1.0);
        let (cf, cb, front, back) = plane.split_polygon(&square(0.0));
        assert!(cf.is_empty() && cb.is_empty());
        assert_eq!(front.len(), 1);
        assert_eq!(back.len(), 1);
        assert!((front[0].area() - 2.0).abs() < 1e-12);
        assert!((back[0].area() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn coplanar_polygon_sorted_by_orientation() {
        let plane = Plane::from_normal(Vector3::z(), 0.0);
        let (cf, cb, _, _) = plane.split_polygon(&square(0.0));
        assert_eq!(cf.len(), 1);
        assert!(cb.is_empty());

        let mut flipped = square(0.0);
        flipped.flip();
        let (cf, cb, _, _) = plane.split_polygon(&flipped);
        assert!(cf.is_empty());
        assert_eq!(cb.len(), 1);
    }
}
