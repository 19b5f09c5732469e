//! Mechanical interface features and the order they are applied in.
//!
//! Positions come from the [`FixedInterfaceSpec`] and never from style
//! parameters. Application order is fixed:
//!
//! 1. slot reinforcement bands, merged through
//!    `(outer - cavity) | (outer & band) == outer - (cavity - band)` so band
//!    faces never lie on hull faces;
//! 2. seat stops (union);
//! 3. pivot slots (subtract);
//! 4. foot recesses (subtract).
//!
//! Each group is gathered into a single operand and applied with one
//! boolean, which equals applying its features one at a time.

use crate::errors::{HullError, LoftDegeneracyError, ParameterError};
use crate::float_types::{FRAC_PI_2, Real};
use crate::hull::curves::HullCurves;
use crate::hull::loft::LoftedHull;
use crate::hull::params::{FixedInterfaceSpec, HullParams};
use crate::hull::stations::{StationSet, bottom_at, half_width_at};
use crate::hull::{Solid, SurfaceTag};
use crate::traits::CSGOps;
use nalgebra::Point3;
use serde::Serialize;
use tracing::{debug, info};

/// Depth the seat stops are sunk into the floor.
pub const STOP_SINK: Real = 1.0;

/// Clearance of cutter lids above the highest rim point they cross.
const CUTTER_LID_MARGIN: Real = 2.0;

/// Band lids sit this far above the cavity top.
const BAND_LID_MARGIN: Real = 1.0;

/// Samples per axis of the slot-to-cavity clearance measurement.
const CLEARANCE_SAMPLES: usize = 9;

/// Rings in a reinforcement gusset.
const GUSSET_RINGS: usize = 6;

/// Gusset radius at its lowest ring, as a fraction of the band radius.
const GUSSET_ROOT: Real = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BooleanOp {
    Union,
    Subtract,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FeatureKind {
    Reinforcement {
        slot: u8,
        center: [Real; 2],
        radius: Real,
        z_low: Real,
        z_high: Real,
        /// Slot-to-cavity clearance measured before the band.
        clearance: Real,
    },
    SeatStop {
        index: u8,
        min: [Real; 3],
        max: [Real; 3],
    },
    PivotSlot {
        index: u8,
        center: [Real; 3],
        radius: Real,
        /// Rim height above the slot center.
        entry_z: Real,
    },
    FootRecess {
        index: u8,
        center: [Real; 2],
        radius: Real,
        top_z: Real,
    },
}

impl FeatureKind {
    /// Application group, in plan order.
    pub const fn group(&self) -> &'static str {
        match self {
            FeatureKind::Reinforcement { .. } => "reinforcement",
            FeatureKind::SeatStop { .. } => "seat_stops",
            FeatureKind::PivotSlot { .. } => "pivot_slots",
            FeatureKind::FootRecess { .. } => "foot_recesses",
        }
    }
}

/// A positioned sub-solid and how it combines with the hull.
#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    pub name: String,
    pub kind: FeatureKind,
    pub op: BooleanOp,
    #[serde(skip)]
    pub solid: Solid,
}

/// Every planned feature, in application order.
#[derive(Debug, Clone, Serialize)]
pub struct FeaturePlan {
    pub features: Vec<Feature>,
    /// Slot-to-cavity clearance per slot, before reinforcement.
    pub slot_clearances: Vec<Real>,
}

impl FeaturePlan {
    pub fn plan(
        params: &HullParams,
        interface: &FixedInterfaceSpec,
        curves: &HullCurves<'_>,
        stations: &StationSet,
    ) -> Result<FeaturePlan, HullError> {
        let mut features = Vec::new();
        let mut slot_clearances = Vec::with_capacity(4);
        let radius = interface.slot_radius();

        for (i, center) in interface.pivot_centers().iter().enumerate() {
            let rim = curves.top_z(center.x);
            let clearance = slot_cavity_clearance(stations, center, radius, rim);
            slot_clearances.push(clearance);
            debug!(slot = i, clearance, "slot to cavity clearance");
            if params.reinforcement_on && clearance < params.slot_skin {
                let band = reinforcement(params, interface, curves, i as u8, center, clearance)?;
                features.push(band);
            }
        }

        if params.seat_stops_on {
            for (i, sign) in [-1.0, 1.0].into_iter().enumerate() {
                features.push(seat_stop(params, stations, i as u8, sign * params.stop_x)?);
            }
        }

        for (i, center) in interface.pivot_centers().iter().enumerate() {
            features.push(pivot_slot(params, interface, curves, i as u8, center)?);
        }

        if params.feet_on {
            let x = params.foot_span * params.half_length();
            let y = params.foot_offset;
            let corners = [(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)];
            for (i, (sx, sy)) in corners.into_iter().enumerate() {
                features.push(foot_recess(params, stations, i as u8, sx * x, sy * y)?);
            }
        }

        Ok(FeaturePlan { features, slot_clearances })
    }

    pub fn iter_kind<'a, F>(&'a self, filter: F) -> impl Iterator<Item = &'a Feature>
    where
        F: Fn(&FeatureKind) -> bool + 'a,
    {
        self.features.iter().filter(move |f| filter(&f.kind))
    }

    /// Apply the plan to a lofted hull.
    pub fn apply(&self, hull: &LoftedHull) -> Result<Solid, LoftDegeneracyError> {
        let mut groups = self
            .features
            .chunk_by(|a, b| a.kind.group() == b.kind.group())
            .peekable();

        let mut cavity = hull.cavity.clone();
        let bands = groups
            .next_if(|group| matches!(group[0].kind, FeatureKind::Reinforcement { .. }))
            .and_then(union_all);
        if let Some(bands) = bands {
            cavity = cavity.difference(&bands);
            debug!(polygons = cavity.polygons.len(), "reinforcement carved from cavity");
        }
        let mut solid = hull.outer.difference(&cavity);
        non_empty(&solid, "shell")?;

        for group in groups {
            let Some(operand) = union_all(group) else {
                continue;
            };
            let (op, name) = (group[0].op, group[0].kind.group());
            solid = match op {
                BooleanOp::Union => solid.union(&operand),
                BooleanOp::Subtract => solid.difference(&operand),
            };
            non_empty(&solid, name)?;
            debug!(
                group = name,
                op = ?op,
                features = group.len(),
                polygons = solid.polygons.len(),
                "features applied"
            );
        }
        info!(features = self.features.len(), polygons = solid.polygons.len(), "features applied");
        Ok(solid)
    }
}

/// One operand holding every solid of a feature group.
fn union_all(group: &[Feature]) -> Option<Solid> {
    group.iter().map(|f| f.solid.clone()).reduce(|acc, next| acc.union(&next))
}

fn non_empty(solid: &Solid, stage: &str) -> Result<(), LoftDegeneracyError> {
    if solid.polygons.is_empty() {
        Err(LoftDegeneracyError::EmptyResult { stage: stage.to_string() })
    } else {
        Ok(())
    }
}

/// Smallest horizontal gap between a slot's inner edge and the generated
/// cavity wall, over the slot's x-span and from the bottom of its seat up
/// to the rim. Infinite when the cavity never reaches the slot.
pub fn slot_cavity_clearance(
    stations: &StationSet,
    center: &Point3<Real>,
    radius: Real,
    rim_z: Real,
) -> Real {
    let inward = center.y.abs();
    let mut clearance = Real::INFINITY;
    for i in 0..CLEARANCE_SAMPLES {
        let t = i as Real / (CLEARANCE_SAMPLES - 1) as Real;
        let dx = radius * (2.0 * t - 1.0);
        let Some(section) = stations.cavity_section(center.x + dx) else {
            continue;
        };
        let edge = inward - (radius * radius - dx * dx).max(0.0).sqrt();
        let z_low = center.z - radius;
        for j in 0..CLEARANCE_SAMPLES {
            let z = z_low + (rim_z - z_low) * j as Real / (CLEARANCE_SAMPLES - 1) as Real;
            if let Some(wall) = half_width_at(&section, z) {
                clearance = clearance.min(edge - wall);
            }
        }
    }
    clearance
}

/// Highest rim point over `[x0, x1]`.
fn rim_max(curves: &HullCurves<'_>, x0: Real, x1: Real) -> Real {
    (0..=CLEARANCE_SAMPLES)
        .map(|i| curves.top_z(x0 + (x1 - x0) * i as Real / CLEARANCE_SAMPLES as Real))
        .fold(Real::NEG_INFINITY, Real::max)
}

/// A revolved band around the slot, flaring out of a gusset below the seat
/// and rising above the cavity top.
fn reinforcement(
    params: &HullParams,
    interface: &FixedInterfaceSpec,
    curves: &HullCurves<'_>,
    slot: u8,
    center: &Point3<Real>,
    clearance: Real,
) -> Result<Feature, HullError> {
    let r_slot = interface.slot_radius();
    let radius = r_slot + params.slot_skin + params.reinforcement_margin;
    let z_low = center.z - r_slot - params.slot_skin;
    let rim = rim_max(curves, center.x - radius, center.x + radius);
    let z_high = rim + params.cavity_overcut + BAND_LID_MARGIN;
    let gusset = params.reinforcement_gusset_ratio * radius;

    let mut profile = Vec::with_capacity(GUSSET_RINGS + 2);
    if gusset > 0.0 {
        for k in 0..GUSSET_RINGS {
            let t = k as Real / GUSSET_RINGS as Real;
            let flare = t.powf(params.reinforcement_exponent);
            let r = radius * (GUSSET_ROOT + (1.0 - GUSSET_ROOT) * flare);
            profile.push((r, z_low - gusset * (1.0 - t)));
        }
    }
    profile.push((radius, z_low));
    profile.push((radius, z_high));

    let tag = Some(SurfaceTag::Reinforcement(slot));
    let solid =
        Solid::lathe(&profile, params.slot_segments, tag)?.translate(center.x, center.y, 0.0);
    Ok(Feature {
        name: format!("reinforcement_{slot}"),
        kind: FeatureKind::Reinforcement {
            slot,
            center: [center.x, center.y],
            radius,
            z_low: z_low - gusset,
            z_high,
            clearance,
        },
        op: BooleanOp::Union,
        solid,
    })
}

/// A box on the cavity floor centered at `x`, sunk into the floor.
fn seat_stop(
    params: &HullParams,
    stations: &StationSet,
    index: u8,
    x: Real,
) -> Result<Feature, HullError> {
    let half_l = params.stop_length * 0.5;
    let half_w = params.stop_width * 0.5;
    let floor_at = |px: Real, py: Real| {
        stations.cavity_section(px).and_then(|section| bottom_at(&section, py))
    };
    let outside = || {
        HullError::Parameter(ParameterError::Constraint {
            name: "stop_x".into(),
            value: x.abs() + half_l,
            bound: stations.cavity_extent.1.min(-stations.cavity_extent.0),
            constraint: "seat stops lie on the cavity floor".into(),
        })
    };

    let center_floor = floor_at(x, 0.0).ok_or_else(outside)?;
    let mut lowest = center_floor;
    let corners = [
        (x - half_l, -half_w),
        (x - half_l, half_w),
        (x + half_l, -half_w),
        (x + half_l, half_w),
    ];
    for (px, py) in corners {
        lowest = lowest.min(floor_at(px, py).ok_or_else(outside)?);
    }
    let top = params.stop_target_z.unwrap_or(center_floor + params.stop_height);
    if top <= center_floor {
        return Err(HullError::Parameter(ParameterError::Constraint {
            name: "stop_target_z".into(),
            value: top,
            bound: center_floor,
            constraint: "stop top above the cavity floor".into(),
        }));
    }

    let min = Point3::new(x - half_l, -half_w, lowest - STOP_SINK);
    let max = Point3::new(x + half_l, half_w, top);
    Ok(Feature {
        name: format!("seat_stop_{index}"),
        kind: FeatureKind::SeatStop { index, min: min.coords.into(), max: max.coords.into() },
        op: BooleanOp::Union,
        solid: Solid::block(min, max, Some(SurfaceTag::SeatStop(index))),
    })
}

/// One closed revolved cutter: hemispherical seat centered on the seat
/// height, then a straight shaft out through the rim.
fn pivot_slot(
    params: &HullParams,
    interface: &FixedInterfaceSpec,
    curves: &HullCurves<'_>,
    index: u8,
    center: &Point3<Real>,
) -> Result<Feature, HullError> {
    let r = interface.slot_radius();
    let stacks = params.seat_stacks;
    let lid = rim_max(curves, center.x - r, center.x + r) + CUTTER_LID_MARGIN;

    let mut profile = Vec::with_capacity(stacks + 2);
    profile.push((0.0, center.z - r));
    for k in 1..=stacks {
        let phi = -FRAC_PI_2 + FRAC_PI_2 * k as Real / stacks as Real;
        let (r_k, z_k) = if k == stacks {
            (r, center.z)
        } else {
            (r * phi.cos(), center.z + r * phi.sin())
        };
        profile.push((r_k, z_k));
    }
    profile.push((r, lid));

    let tag = Some(SurfaceTag::SlotWall(index));
    let solid =
        Solid::lathe(&profile, params.slot_segments, tag)?.translate(center.x, center.y, 0.0);
    Ok(Feature {
        name: format!("pivot_slot_{index}"),
        kind: FeatureKind::PivotSlot {
            index,
            center: center.coords.into(),
            radius: r,
            entry_z: curves.top_z(center.x),
        },
        op: BooleanOp::Subtract,
        solid,
    })
}

/// A shallow cylinder rising `foot_recess_depth` above the lofted bottom.
fn foot_recess(
    params: &HullParams,
    stations: &StationSet,
    index: u8,
    x: Real,
    y: Real,
) -> Result<Feature, HullError> {
    let radius = params.foot_diameter * 0.5;
    let bottom = stations
        .outer_section(x)
        .and_then(|section| bottom_at(&section, y))
        .ok_or_else(|| {
            HullError::Parameter(ParameterError::Constraint {
                name: "foot_offset".into(),
                value: y,
                bound: params.beam * 0.5,
                constraint: "foot recesses lie under the hull".into(),
            })
        })?;
    let top_z = bottom + params.foot_recess_depth;
    let solid = Solid::cylinder(
        radius,
        -1.0,
        top_z,
        params.slot_segments,
        Some(SurfaceTag::FootRecess(index)),
    )?
    .translate(x, y, 0.0);
    Ok(Feature {
        name: format!("foot_recess_{index}"),
        kind: FeatureKind::FootRecess { index, center: [x, y], radius, top_z },
        op: BooleanOp::Subtract,
        solid,
    })
}
