//! Measurement of a finished solid against its mechanical invariants.
//!
//! Every check reports its measured value and bound. Failures are data:
//! nothing here corrects geometry or raises an error. A report is
//! acceptable when every mechanical-critical check passes.

use crate::errors::InvariantViolation;
use crate::float_types::{PI, Real, tolerance};
use crate::hull::features::{FeatureKind, FeaturePlan};
use crate::hull::params::{FixedInterfaceSpec, HullParams};
use crate::hull::{Solid, SurfaceTag};
use crate::mesh::manifold::{IndexedTriangles, TopologyReport};
use crate::mesh::query::SurfaceQuery;
use geo::{Area, ConvexHull, MultiPoint, Point};
use nalgebra::{Point3, Vector3};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

/// Smallest enclosed volume, mm³, accepted as non-degenerate.
pub const MIN_VOLUME: Real = 1.0e-6;

/// Samples along each slot's insertion corridor.
pub const CORRIDOR_SAMPLES: usize = 29;

/// Lateral samples of the frame clearance under each frame member.
const FRAME_SAMPLES: usize = 9;

/// Ray height above the seat center, clear of the equator ring.
const SEAT_RAY_LIFT: Real = 0.1;

/// Offset of vertical rays from feature axes, clear of fan diagonals.
const AXIS_RAY_OFFSET: (Real, Real) = (0.3, 0.2);

/// Start height of upward rays.
const BELOW_HULL: Real = -10.0;

/// Longest ray.
const RAY_REACH: Real = 1.0e3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InvariantCategory {
    Manifold,
    InterfaceCoordinates,
    MinimumWall,
    MinimumClearance,
    Manufacturability,
}

impl InvariantCategory {
    /// Categories whose checks gate acceptance.
    pub const MECHANICAL: [InvariantCategory; 4] = [
        InvariantCategory::Manifold,
        InvariantCategory::InterfaceCoordinates,
        InvariantCategory::MinimumWall,
        InvariantCategory::MinimumClearance,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Criticality {
    MechanicalCritical,
    Advisory,
}

/// Accepted range of a measured value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Bound {
    AtLeast(Real),
    AtMost(Real),
    Within { expected: Real, tolerance: Real },
}

impl Bound {
    /// NaN is never admitted.
    pub fn admits(&self, measured: Real) -> bool {
        match *self {
            Bound::AtLeast(min) => measured >= min,
            Bound::AtMost(max) => measured <= max,
            Bound::Within { expected, tolerance } => (measured - expected).abs() <= tolerance,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::AtLeast(v) => write!(f, ">= {v}"),
            Bound::AtMost(v) => write!(f, "<= {v}"),
            Bound::Within { expected, tolerance } => write!(f, "{expected} +/- {tolerance}"),
        }
    }
}

/// One measured invariant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvariantCheck {
    pub name: String,
    pub category: InvariantCategory,
    pub criticality: Criticality,
    pub measured: Real,
    pub bound: Bound,
    pub passed: bool,
    pub detail: String,
}

impl InvariantCheck {
    pub fn new(
        name: impl Into<String>,
        category: InvariantCategory,
        criticality: Criticality,
        measured: Real,
        bound: Bound,
        detail: impl Into<String>,
    ) -> Self {
        InvariantCheck {
            name: name.into(),
            category,
            criticality,
            measured,
            passed: bound.admits(measured),
            bound,
            detail: detail.into(),
        }
    }

    fn critical(
        name: impl Into<String>,
        category: InvariantCategory,
        measured: Real,
        bound: Bound,
    ) -> Self {
        Self::new(name, category, Criticality::MechanicalCritical, measured, bound, String::new())
    }

    fn advisory(name: impl Into<String>, measured: Real, bound: Bound) -> Self {
        Self::new(
            name,
            InvariantCategory::Manufacturability,
            Criticality::Advisory,
            measured,
            bound,
            String::new(),
        )
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn violation(&self) -> Option<InvariantViolation> {
        (!self.passed).then(|| InvariantViolation {
            name: self.name.clone(),
            category: self.category,
            criticality: self.criticality,
            measured: self.measured,
            bound: self.bound,
        })
    }
}

/// Size and shape summary of a solid, for regression comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeometrySignature {
    pub min: [Real; 3],
    pub max: [Real; 3],
    pub extents: [Real; 3],
    pub volume: Real,
    pub surface_area: Real,
    pub triangle_count: usize,
}

/// Allowed drift of a [`GeometrySignature`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignatureBand {
    pub relative: Real,
    /// Floor for extent drift, mm.
    pub absolute: Real,
}

impl Default for SignatureBand {
    fn default() -> Self {
        SignatureBand { relative: 0.03, absolute: 0.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignatureDeviation {
    pub field: &'static str,
    pub reference: Real,
    pub measured: Real,
    pub allowed: Real,
    pub passed: bool,
}

impl GeometrySignature {
    pub fn of(indexed: &IndexedTriangles) -> Self {
        let mut min = Point3::new(Real::MAX, Real::MAX, Real::MAX);
        let mut max = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
        for &[a, b, c] in &indexed.triangles {
            for v in [a, b, c] {
                let p = indexed.vertices[v as usize];
                min = min.inf(&p);
                max = max.sup(&p);
            }
        }
        if indexed.triangles.is_empty() {
            min = Point3::origin();
            max = Point3::origin();
        }
        GeometrySignature {
            min: min.coords.into(),
            max: max.coords.into(),
            extents: (max - min).into(),
            volume: indexed.signed_volume(),
            surface_area: indexed.surface_area(),
            triangle_count: indexed.triangles.len(),
        }
    }

    /// Compare against a reference. Extents may drift by the larger of the
    /// relative and absolute band; volume and area by the relative band.
    pub fn compare(
        &self,
        reference: &GeometrySignature,
        band: SignatureBand,
    ) -> Vec<SignatureDeviation> {
        let mut out = Vec::with_capacity(5);
        let mut push = |field, reference: Real, measured: Real, allowed: Real| {
            out.push(SignatureDeviation {
                field,
                reference,
                measured,
                allowed,
                passed: (measured - reference).abs() <= allowed,
            });
        };
        for (field, i) in [("extent_x", 0), ("extent_y", 1), ("extent_z", 2)] {
            let r = reference.extents[i];
            push(field, r, self.extents[i], band.absolute.max(band.relative * r.abs()));
        }
        push("volume", reference.volume, self.volume, band.relative * reference.volume.abs());
        push(
            "surface_area",
            reference.surface_area,
            self.surface_area,
            band.relative * reference.surface_area.abs(),
        );
        out
    }

    pub fn matches(&self, reference: &GeometrySignature, band: SignatureBand) -> bool {
        self.compare(reference, band).iter().all(|d| d.passed)
    }
}

/// Measured geometry of one pivot slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotMeasurement {
    pub index: u8,
    pub center: [Real; 2],
    pub seat_z: Real,
    pub diameter_x: Real,
    pub diameter_y: Real,
    /// Rim height above the seat center.
    pub depth: Real,
    pub outer_skin: Real,
    pub inner_skin: Real,
    pub corridor_clearance: Real,
}

/// The complete result of one validation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub checks: Vec<InvariantCheck>,
    pub topology: TopologyReport,
    pub signature: GeometrySignature,
    pub slots: Vec<SlotMeasurement>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn category_passed(&self, category: InvariantCategory) -> bool {
        self.checks.iter().filter(|c| c.category == category).all(|c| c.passed)
    }

    pub fn checks_in(&self, category: InvariantCategory) -> impl Iterator<Item = &InvariantCheck> {
        self.checks.iter().filter(move |c| c.category == category)
    }

    pub fn check(&self, name: &str) -> Option<&InvariantCheck> {
        self.checks.iter().find(|c| c.name == name)
    }

    pub fn violations(&self) -> Vec<InvariantViolation> {
        self.checks.iter().filter_map(InvariantCheck::violation).collect()
    }

    /// No mechanical-critical check failed.
    pub fn is_acceptable(&self) -> bool {
        self.checks
            .iter()
            .filter(|c| c.criticality == Criticality::MechanicalCritical)
            .all(|c| c.passed)
    }
}

/// Closedness, orientation and volume checks on any solid.
pub fn manifold_checks(
    topology: &TopologyReport,
    allowed_components: usize,
) -> Vec<InvariantCheck> {
    use InvariantCategory::Manifold;
    vec![
        InvariantCheck::critical(
            "boundary_edges",
            Manifold,
            topology.boundary_edges as Real,
            Bound::AtMost(0.0),
        ),
        InvariantCheck::critical(
            "inconsistent_edges",
            Manifold,
            topology.inconsistent_edges as Real,
            Bound::AtMost(0.0),
        ),
        InvariantCheck::critical(
            "non_manifold_edges",
            Manifold,
            topology.non_manifold_edges as Real,
            Bound::AtMost(0.0),
        ),
        InvariantCheck::critical(
            "components",
            Manifold,
            topology.components as Real,
            Bound::AtMost(allowed_components as Real),
        ),
        InvariantCheck::critical(
            "enclosed_volume",
            Manifold,
            topology.signed_volume,
            Bound::AtLeast(MIN_VOLUME),
        )
        .with_detail(if topology.signed_volume.abs() < MIN_VOLUME { "zero volume" } else { "" }),
    ]
}

/// Nearest-rank percentile of unsorted samples; NaN when empty.
pub fn percentile(samples: &mut [Real], pct: Real) -> Real {
    if samples.is_empty() {
        return Real::NAN;
    }
    samples.sort_by(|a, b| a.total_cmp(b));
    let rank = ((pct / 100.0) * samples.len() as Real).ceil() as usize;
    samples[rank.clamp(1, samples.len()) - 1]
}

/// Measures a generated hull.
pub struct Validator<'a> {
    params: &'a HullParams,
    interface: &'a FixedInterfaceSpec,
}

impl<'a> Validator<'a> {
    pub const fn new(params: &'a HullParams, interface: &'a FixedInterfaceSpec) -> Self {
        Validator { params, interface }
    }

    pub fn validate(&self, solid: &Solid, plan: &FeaturePlan) -> ValidationReport {
        let indexed = solid.to_indexed(tolerance());
        let topology = indexed.topology();
        let signature = GeometrySignature::of(&indexed);
        let mut checks = manifold_checks(&topology, self.params.allowed_components);

        let query = match SurfaceQuery::new(indexed) {
            Ok(query) => Some(query),
            Err(err) => {
                warn!(%err, "no queryable surface; geometric checks fail");
                None
            },
        };

        let slots = self.measure_slots(solid, plan, query.as_ref());
        checks.extend(self.interface_checks(&slots));
        checks.extend(self.wall_checks(&slots, plan, query.as_ref()));
        checks.extend(self.clearance_checks(&slots, query.as_ref()));
        checks.extend(self.manufacturability_checks(query.as_ref()));

        for check in checks.iter().filter(|c| !c.passed) {
            warn!(
                name = %check.name,
                category = ?check.category,
                measured = check.measured,
                bound = %check.bound,
                "invariant violated"
            );
        }
        let report = ValidationReport { checks, topology, signature, slots };
        info!(
            checks = report.checks.len(),
            violations = report.violations().len(),
            acceptable = report.is_acceptable(),
            "validation finished"
        );
        report
    }

    fn measure_slots(
        &self,
        solid: &Solid,
        plan: &FeaturePlan,
        query: Option<&SurfaceQuery>,
    ) -> Vec<SlotMeasurement> {
        let segments = self.params.slot_segments.max(1) as Real;
        (0..4u8)
            .map(|index| {
                let mut min = Point3::new(Real::MAX, Real::MAX, Real::MAX);
                let mut max = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
                let mut found = false;
                for poly in solid.polygons_where(|tag| *tag == SurfaceTag::SlotWall(index)) {
                    for v in &poly.vertices {
                        min = min.inf(&v.pos);
                        max = max.sup(&v.pos);
                        found = true;
                    }
                }
                if !found {
                    return SlotMeasurement {
                        index,
                        center: [Real::NAN; 2],
                        seat_z: Real::NAN,
                        diameter_x: Real::NAN,
                        diameter_y: Real::NAN,
                        depth: Real::NAN,
                        outer_skin: Real::NAN,
                        inner_skin: Real::NAN,
                        corridor_clearance: Real::NAN,
                    };
                }

                let center = [0.5 * (min.x + max.x), 0.5 * (min.y + max.y)];
                let diameter_x = max.x - min.x;
                let diameter_y = max.y - min.y;
                let seat_z = min.z + 0.5 * diameter_x;
                let entry_z = plan
                    .features
                    .iter()
                    .find_map(|f| match f.kind {
                        FeatureKind::PivotSlot { index: i, entry_z, .. } if i == index => {
                            Some(entry_z)
                        },
                        _ => None,
                    })
                    .unwrap_or(max.z);

                let (outer_skin, inner_skin, corridor_clearance) = match query {
                    Some(q) => {
                        let axis = Point3::new(center[0], center[1], seat_z);
                        let outward = center[1].signum();
                        // aim at facet middles so rays do not run along shaft edges
                        let half_step = PI / segments;
                        let out_dir = Vector3::new(half_step.sin(), outward * half_step.cos(), 0.0);
                        let in_dir = Vector3::new(half_step.sin(), -outward * half_step.cos(), 0.0);
                        let levels = [seat_z + SEAT_RAY_LIFT, 0.5 * (seat_z + entry_z)];
                        let skin = |dir: Vector3<Real>| {
                            levels
                                .iter()
                                .map(|&z| skin_along(q, Point3::new(axis.x, axis.y, z), dir))
                                .fold(Real::INFINITY, Real::min)
                        };
                        let corridor = (0..CORRIDOR_SAMPLES)
                            .map(|k| {
                                let t = k as Real / (CORRIDOR_SAMPLES - 1) as Real;
                                let z = seat_z + (entry_z - seat_z) * t;
                                let p = Point3::new(axis.x, axis.y, z);
                                let free = q.distance(&p);
                                let free = if q.contains(&p) { -free } else { free };
                                free - self.interface.ball_radius()
                            })
                            .fold(Real::INFINITY, Real::min);
                        (skin(out_dir), skin(in_dir), corridor)
                    },
                    None => (Real::NAN, Real::NAN, Real::NAN),
                };
                debug!(
                    slot = index,
                    ?center,
                    seat_z,
                    outer_skin,
                    inner_skin,
                    corridor_clearance,
                    "slot measured"
                );

                SlotMeasurement {
                    index,
                    center,
                    seat_z,
                    diameter_x,
                    diameter_y,
                    depth: entry_z - seat_z,
                    outer_skin,
                    inner_skin,
                    corridor_clearance,
                }
            })
            .collect()
    }

    fn interface_checks(&self, slots: &[SlotMeasurement]) -> Vec<InvariantCheck> {
        use InvariantCategory::InterfaceCoordinates as Category;
        let tol = self.interface.tolerance;
        let within = |expected| Bound::Within { expected, tolerance: tol };
        let mut checks = Vec::with_capacity(slots.len() * 5 + 1);
        for (slot, expected) in slots.iter().zip(self.interface.pivot_centers()) {
            let i = slot.index;
            let d = self.interface.slot_diameter;
            let check = |what: &str, measured, bound| {
                InvariantCheck::critical(format!("slot_{i}_{what}"), Category, measured, bound)
            };
            checks.push(check("center_x", slot.center[0], within(expected.x)));
            checks.push(check("center_y", slot.center[1], within(expected.y)));
            checks.push(check("seat_z", slot.seat_z, within(expected.z)));
            checks.push(check("diameter_x", slot.diameter_x, within(d)));
            checks.push(
                check("diameter_y", slot.diameter_y, within(d))
                    .with_detail(format!("depth {:.3} mm", slot.depth)),
            );
        }
        checks.push(
            InvariantCheck::new(
                "interface_constants_locked",
                Category,
                Criticality::Advisory,
                self.interface.max_deviation_from(&FixedInterfaceSpec::CANONICAL),
                Bound::AtMost(tol),
                "largest deviation from the canonical interface",
            ),
        );
        checks
    }

    fn wall_checks(
        &self,
        slots: &[SlotMeasurement],
        plan: &FeaturePlan,
        query: Option<&SurfaceQuery>,
    ) -> Vec<InvariantCheck> {
        use InvariantCategory::MinimumWall as Category;
        let p = self.params;
        let mut checks = Vec::new();

        let mut samples = query.map(|q| self.thickness_samples(q)).unwrap_or_default();
        let sampled = samples.len();
        checks.push(
            InvariantCheck::critical(
                format!("wall_thickness_p{}", p.thickness_sample_percentile),
                Category,
                percentile(&mut samples, p.thickness_sample_percentile),
                Bound::AtLeast(p.min_wall),
            )
            .with_detail(format!("{sampled} samples")),
        );

        for slot in slots {
            let i = slot.index;
            checks.push(InvariantCheck::critical(
                format!("slot_{i}_outer_skin"),
                Category,
                slot.outer_skin,
                Bound::AtLeast(p.slot_outer_skin_min),
            ));
            checks.push(InvariantCheck::critical(
                format!("slot_{i}_inner_skin"),
                Category,
                slot.inner_skin,
                Bound::AtLeast(p.slot_skin),
            ));
        }

        let (ox, oy) = AXIS_RAY_OFFSET;
        let floor = query
            .map(|q| skin_along(q, Point3::new(ox, oy, BELOW_HULL), Vector3::z()))
            .unwrap_or(Real::NAN);
        let floor_bound = Bound::AtLeast(p.min_floor);
        checks.push(InvariantCheck::critical("floor_center", Category, floor, floor_bound));

        for feature in &plan.features {
            if let FeatureKind::FootRecess { index, center, .. } = feature.kind {
                let skin = query
                    .map(|q| {
                        let origin = Point3::new(center[0] + ox, center[1] + oy, BELOW_HULL);
                        skin_along(q, origin, Vector3::z())
                    })
                    .unwrap_or(Real::NAN);
                checks.push(InvariantCheck::critical(
                    format!("recess_{index}_skin"),
                    Category,
                    skin,
                    Bound::AtLeast(p.foot_recess_skin),
                ));
            }
        }
        checks
    }

    /// Area-weighted local thickness samples: from triangle centroids,
    /// inward along the face normal, ignoring the first `noise_floor` mm.
    fn thickness_samples(&self, query: &SurfaceQuery) -> Vec<Real> {
        let p = self.params;
        let indexed = query.indexed();
        let faces: Vec<(Point3<Real>, Vector3<Real>, Real)> = (0..indexed.triangles.len())
            .filter_map(|i| {
                let [a, b, c] = indexed.triangle(i);
                let cross = (b - a).cross(&(c - a));
                let area = 0.5 * cross.norm();
                let normal = cross.try_normalize(Real::EPSILON)?;
                Some((Point3::from((a.coords + b.coords + c.coords) / 3.0), normal, area))
            })
            .collect();
        let total: Real = faces.iter().map(|f| f.2).sum();
        if faces.is_empty() || total <= 0.0 {
            return Vec::new();
        }

        let count = p.thickness_sample_count;
        let mut samples = Vec::with_capacity(count);
        let mut cumulative = 0.0;
        let mut next = 0usize;
        for (centroid, normal, area) in &faces {
            cumulative += area;
            while next < count && (next as Real + 0.5) / count as Real * total <= cumulative {
                let origin = centroid - normal * p.thickness_noise_floor;
                if let Some(t) = query.first_hit(origin, -normal, RAY_REACH) {
                    samples.push(t + p.thickness_noise_floor);
                }
                next += 1;
            }
        }
        samples
    }

    fn clearance_checks(
        &self,
        slots: &[SlotMeasurement],
        query: Option<&SurfaceQuery>,
    ) -> Vec<InvariantCheck> {
        use InvariantCategory::MinimumClearance as Category;
        let p = self.params;
        let iface = self.interface;
        let mut checks = Vec::new();

        for (side, sx) in [("stern", -iface.frame_x_offset), ("bow", iface.frame_x_offset)] {
            let clearance = query.map_or(Real::NAN, |q| {
                let reach = 0.5 * (iface.slot_y_position - iface.slot_radius());
                (0..FRAME_SAMPLES)
                    .map(|k| {
                        let y = -reach + 2.0 * reach * (k as Real + 0.5) / FRAME_SAMPLES as Real;
                        let origin = Point3::new(sx, y, iface.frame_bottom_z);
                        if q.contains(&origin) {
                            -q.distance(&origin)
                        } else {
                            q.first_hit(origin, -Vector3::z(), RAY_REACH)
                                .unwrap_or(Real::INFINITY)
                        }
                    })
                    .fold(Real::INFINITY, Real::min)
            });
            checks.push(InvariantCheck::critical(
                format!("frame_floor_clearance_{side}"),
                Category,
                clearance,
                Bound::AtLeast(p.min_floor_clearance),
            ));
        }

        for slot in slots {
            checks.push(
                InvariantCheck::critical(
                    format!("slot_{}_corridor", slot.index),
                    Category,
                    slot.corridor_clearance,
                    Bound::AtLeast(p.corridor_clearance_min),
                )
                .with_detail(format!("ball radius {}", iface.ball_radius())),
            );
        }
        checks
    }

    fn manufacturability_checks(&self, query: Option<&SurfaceQuery>) -> Vec<InvariantCheck> {
        let p = self.params;
        let Some(indexed) = query.map(SurfaceQuery::indexed) else {
            return vec![
                InvariantCheck::advisory(
                    "overhang_ratio",
                    Real::NAN,
                    Bound::AtMost(p.max_overhang_ratio),
                ),
                InvariantCheck::advisory(
                    "contact_area",
                    Real::NAN,
                    Bound::AtLeast(p.min_contact_area),
                ),
            ];
        };
        let min_z = indexed.vertices.iter().map(|v| v.z).fold(Real::INFINITY, Real::min);
        let plate = min_z + p.contact_tolerance;

        let threshold = -p.overhang_angle.to_radians().cos();
        let (mut overhang, mut total) = (0.0, 0.0);
        for i in 0..indexed.triangles.len() {
            let [a, b, c] = indexed.triangle(i);
            let cross = (b - a).cross(&(c - a));
            let area = 0.5 * cross.norm();
            total += area;
            let on_plate = a.z.max(b.z).max(c.z) <= plate;
            if let Some(n) = cross.try_normalize(Real::EPSILON) {
                if n.z < threshold && !on_plate {
                    overhang += area;
                }
            }
        }
        let ratio = if total > 0.0 { overhang / total } else { Real::NAN };

        let contact: Vec<Point<Real>> = indexed
            .vertices
            .iter()
            .filter(|v| v.z <= plate)
            .map(|v| Point::new(v.x, v.y))
            .collect();
        let span = |f: fn(&Point<Real>) -> Real| {
            let lo = contact.iter().map(f).fold(Real::INFINITY, Real::min);
            let hi = contact.iter().map(f).fold(Real::NEG_INFINITY, Real::max);
            if contact.is_empty() { 0.0 } else { hi - lo }
        };
        let span_x = span(|q| q.x());
        let span_y = span(|q| q.y());
        let area = MultiPoint::from(contact.clone()).convex_hull().unsigned_area();

        vec![
            InvariantCheck::advisory("overhang_ratio", ratio, Bound::AtMost(p.max_overhang_ratio))
                .with_detail(format!(
                    "faces flatter than {} degrees facing down",
                    p.overhang_angle
                )),
            InvariantCheck::advisory("contact_area", area, Bound::AtLeast(p.min_contact_area))
                .with_detail(format!("{} contact vertices", contact.len())),
            InvariantCheck::advisory(
                "contact_span_x",
                span_x,
                Bound::AtLeast(p.min_contact_span_x),
            ),
            InvariantCheck::advisory(
                "contact_span_y",
                span_y,
                Bound::AtLeast(p.min_contact_span_y),
            ),
        ]
    }
}

/// Material between the first and second surface crossings along a ray.
fn skin_along(query: &SurfaceQuery, origin: Point3<Real>, direction: Vector3<Real>) -> Real {
    let hits = query.hits(origin, direction, RAY_REACH);
    match hits.as_slice() {
        [first, second, ..] => second - first,
        _ => Real::NAN,
    }
}
