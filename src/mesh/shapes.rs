//! 3D shape builders: boxes and solids of revolution about +Z.

use crate::errors::MeshError;
use crate::float_types::{Real, TAU};
use crate::mesh::Mesh;
use crate::mesh::polygon::Polygon;
use crate::traits::CSGOps;
use nalgebra::Point3;
use std::fmt::Debug;

/// Rings with a smaller radius collapse to a pole.
const POLE_RADIUS: Real = 1e-9;

impl<S: Clone + Debug + Send + Sync> Mesh<S> {
    /// Axis-aligned box spanning `[0, width] × [0, length] × [0, height]`.
    pub fn cuboid(width: Real, length: Real, height: Real, metadata: Option<S>) -> Mesh<S> {
        let p = |x: Real, y: Real, z: Real| Point3::new(x * width, y * length, z * height);
        let faces = [
            [p(0., 0., 0.), p(0., 1., 0.), p(1., 1., 0.), p(1., 0., 0.)], // -z
            [p(0., 0., 1.), p(1., 0., 1.), p(1., 1., 1.), p(0., 1., 1.)], // +z
            [p(0., 0., 0.), p(1., 0., 0.), p(1., 0., 1.), p(0., 0., 1.)], // -y
            [p(0., 1., 0.), p(0., 1., 1.), p(1., 1., 1.), p(1., 1., 0.)], // +y
            [p(0., 0., 0.), p(0., 0., 1.), p(0., 1., 1.), p(0., 1., 0.)], // -x
            [p(1., 0., 0.), p(1., 1., 0.), p(1., 1., 1.), p(1., 0., 1.)], // +x
        ];
        let polygons: Vec<Polygon<S>> = faces
            .iter()
            .map(|face| Polygon::from_points(face, metadata.clone()))
            .collect();
        Mesh::from_polygons(&polygons)
    }

    /// Axis-aligned box between two opposite corners.
    pub fn block(min: Point3<Real>, max: Point3<Real>, metadata: Option<S>) -> Mesh<S> {
        let size = max - min;
        Mesh::cuboid(size.x, size.y, size.z, metadata).translate(min.x, min.y, min.z)
    }

    /// Revolve a `(radius, z)` profile, listed bottom to top, about the +Z axis.
    ///
    /// Rings of zero radius become poles; the first and last rings are closed
    /// with planar caps when their radius is positive. Every face is planar and
    /// convex, and faces point away from the enclosed volume.
    pub fn lathe(
        profile: &[(Real, Real)],
        segments: usize,
        metadata: Option<S>,
    ) -> Result<Mesh<S>, MeshError> {
        if segments < 3 {
            return Err(MeshError::TooFewSegments { segments });
        }
        if profile.len() < 2 {
            return Err(MeshError::DegenerateProfile(format!(
                "a revolved profile needs at least 2 points, got {}",
                profile.len()
            )));
        }
        let last = profile.len() - 1;
        for (k, &(r, z)) in profile.iter().enumerate() {
            if !r.is_finite() || !z.is_finite() || r < 0.0 {
                return Err(MeshError::DegenerateProfile(format!(
                    "profile point {k} ({r}, {z}) is not a valid radius/height pair"
                )));
            }
            if r <= POLE_RADIUS && k != 0 && k != last {
                return Err(MeshError::DegenerateProfile(format!(
                    "interior profile point {k} lies on the axis"
                )));
            }
        }

        let rings: Vec<Vec<Point3<Real>>> = profile
            .iter()
            .map(|&(r, z)| {
                if r <= POLE_RADIUS {
                    vec![Point3::new(0.0, 0.0, z)]
                } else {
                    (0..segments)
                        .map(|j| {
                            let theta = TAU * j as Real / segments as Real;
                            Point3::new(r * theta.cos(), r * theta.sin(), z)
                        })
                        .collect()
                }
            })
            .collect();
        let at = |ring: &Vec<Point3<Real>>, j: usize| {
            ring[if ring.len() == 1 { 0 } else { j % segments }]
        };

        let mut polygons = Vec::new();
        for k in 0..last {
            let (lower, upper) = (&rings[k], &rings[k + 1]);
            for j in 0..segments {
                let a = at(lower, j);
                let b = at(lower, j + 1);
                let c = at(upper, j + 1);
                let d = at(upper, j);
                let face = match (lower.len() == 1, upper.len() == 1) {
                    (true, true) => continue,
                    (true, false) => vec![a, c, d],
                    (false, true) => vec![a, b, c],
                    (false, false) => vec![a, b, c, d],
                };
                polygons.push(Polygon::from_points(&face, metadata.clone()));
            }
        }

        if rings[0].len() > 1 {
            let cap: Vec<Point3<Real>> = rings[0].iter().rev().copied().collect();
            polygons.push(Polygon::from_points(&cap, metadata.clone()));
        }
        if rings[last].len() > 1 {
            polygons.push(Polygon::from_points(&rings[last], metadata.clone()));
        }

        Ok(Mesh::from_polygons(&polygons))
    }

    /// Vertical cylinder of `radius` centered on the Z axis from `z0` to `z1`.
    pub fn cylinder(
        radius: Real,
        z0: Real,
        z1: Real,
        segments: usize,
        metadata: Option<S>,
    ) -> Result<Mesh<S>, MeshError> {
        Mesh::lathe(&[(radius, z0), (radius, z1)], segments, metadata)
    }
}
