//! The parameter table, validated parameter sets, typed hull parameters,
//! presets and the fixed mechanical interface.
//!
//! Every tunable value is declared exactly once in [`PARAMETERS`] with its
//! default, range and unit. A [`ParameterSet`] is only ever built through
//! [`ParameterSet::from_values`], which rejects out-of-range, unknown, missing
//! and mistyped values; nothing is clamped.

use crate::errors::ParameterError;
use crate::float_types::Real;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unit {
    Millimetre,
    SquareMillimetre,
    Fraction,
    Exponent,
    Count,
    Flag,
    Percent,
    Degrees,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParamKind {
    Real,
    Integer { multiple_of: u32 },
    Flag,
}

/// Declaration of one tunable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    /// `None` marks a required parameter.
    pub default: Option<Real>,
    pub min: Real,
    pub max: Real,
    pub unit: Unit,
    pub kind: ParamKind,
    pub doc: &'static str,
}

const fn real(
    name: &'static str,
    default: Option<Real>,
    min: Real,
    max: Real,
    unit: Unit,
    doc: &'static str,
) -> ParamSpec {
    ParamSpec { name, default, min, max, unit, kind: ParamKind::Real, doc }
}

const fn int(
    name: &'static str,
    default: Real,
    min: Real,
    max: Real,
    multiple_of: u32,
    doc: &'static str,
) -> ParamSpec {
    ParamSpec {
        name,
        default: Some(default),
        min,
        max,
        unit: Unit::Count,
        kind: ParamKind::Integer { multiple_of },
        doc,
    }
}

const fn flag(name: &'static str, default: bool, doc: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        default: Some(if default { 1.0 } else { 0.0 }),
        min: 0.0,
        max: 1.0,
        unit: Unit::Flag,
        kind: ParamKind::Flag,
        doc,
    }
}

use Unit::{Degrees, Exponent, Fraction, Millimetre, Percent, SquareMillimetre};

/// The complete parameter table.
pub const PARAMETERS: &[ParamSpec] = &[
    // principal dimensions
    real("length", None, 100.0, 220.0, Millimetre, "overall length"),
    real("beam", None, 50.0, 110.0, Millimetre, "maximum beam"),
    real("depth", None, 30.0, 70.0, Millimetre, "rim height above the flat keel at midship"),
    real("wall_thickness", None, 1.2, 12.0, Millimetre, "side wall thickness at midship"),
    real("floor_thickness", None, 1.5, 10.0, Millimetre, "floor thickness"),
    real("min_wall", Some(1.2), 0.8, 3.0, Millimetre, "absolute minimum wall"),
    real("min_floor", Some(1.5), 0.8, 5.0, Millimetre, "minimum floor thickness"),
    // sheer
    real("sheer_rise_bow", Some(10.0), 0.0, 30.0, Millimetre, "gunwale rise at the bow tip"),
    real("sheer_rise_stern", Some(7.0), 0.0, 30.0, Millimetre, "gunwale rise at the stern tip"),
    real("sheer_exponent_bow", Some(2.4), 1.5, 4.0, Exponent, "sheer power law, bow"),
    real("sheer_exponent_stern", Some(2.0), 1.5, 4.0, Exponent, "sheer power law, stern"),
    real("sheer_plateau", Some(0.25), 0.0, 0.6, Fraction, "flat sheer half-width over half-length"),
    // keel
    real(
        "flat_half_length",
        Some(40.0),
        10.0,
        80.0,
        Millimetre,
        "half width of the flat keel zone",
    ),
    real("rocker_bow", Some(8.0), 0.0, 25.0, Millimetre, "keel lift at the bow tip"),
    real("rocker_stern", Some(6.0), 0.0, 25.0, Millimetre, "keel lift at the stern tip"),
    real("rocker_exponent", Some(2.2), 1.5, 4.0, Exponent, "keel lift power law"),
    // plan-form
    real("beam_max_offset", Some(0.0), -20.0, 20.0, Millimetre, "x of the widest station"),
    real(
        "bow_taper_ratio",
        Some(0.30),
        0.1,
        0.9,
        Fraction,
        "beam fraction at the bow before the tip envelope",
    ),
    real(
        "stern_taper_ratio",
        Some(0.38),
        0.1,
        0.9,
        Fraction,
        "beam fraction at the stern before the tip envelope",
    ),
    real("bow_taper_exponent", Some(2.6), 1.5, 4.0, Exponent, "beam taper power law, bow"),
    real("stern_taper_exponent", Some(2.3), 1.5, 4.0, Exponent, "beam taper power law, stern"),
    real("wall_end_ratio", Some(0.45), 0.2, 1.0, Fraction, "wall scale at the tips"),
    real("wall_taper_exponent", Some(2.0), 1.0, 4.0, Exponent, "wall taper power law"),
    real("tip_zone", Some(0.22), 0.05, 0.4, Fraction, "tip envelope zone over half-length"),
    real("tip_exponent", Some(1.6), 1.2, 2.0, Exponent, "tip envelope rounding exponent"),
    real("tip_min_radius", Some(2.5), 1.0, 8.0, Millimetre, "smallest tip semi-axis"),
    // sections
    real("shape_exponent_mid", Some(3.2), 2.0, 6.0, Exponent, "superellipse exponent amidships"),
    real("shape_exponent_tip", Some(2.2), 2.0, 6.0, Exponent, "superellipse exponent at the tips"),
    real("shape_blend_exponent", Some(1.5), 1.0, 4.0, Exponent, "exponent blend law"),
    int("station_count", 13.0, 9.0, 17.0, 1, "stations per loft"),
    int("profile_segments", 40.0, 16.0, 96.0, 2, "arc segments per station profile"),
    flag("station_spacing_cosine", true, "cluster stations toward the tips"),
    real("cavity_overcut", Some(3.0), 1.0, 10.0, Millimetre, "cavity extension above the rim"),
    real(
        "cavity_min_half_width",
        Some(3.0),
        1.0,
        10.0,
        Millimetre,
        "smallest cavity semi-axis at its ends",
    ),
    // slot reinforcement
    flag("reinforcement_on", true, "add bands where a slot approaches the cavity"),
    real(
        "slot_skin",
        Some(2.0),
        1.0,
        4.0,
        Millimetre,
        "minimum skin between a slot and the cavity",
    ),
    real(
        "slot_outer_skin_min",
        Some(1.5),
        0.8,
        4.0,
        Millimetre,
        "minimum skin between a slot and the exterior",
    ),
    real("reinforcement_margin", Some(0.4), 0.0, 2.0, Millimetre, "extra band radius"),
    real(
        "reinforcement_gusset_ratio",
        Some(0.7),
        0.0,
        2.0,
        Fraction,
        "gusset height over band radius",
    ),
    real("reinforcement_exponent", Some(1.6), 1.2, 2.0, Exponent, "gusset flare exponent"),
    int("slot_segments", 48.0, 24.0, 96.0, 4, "slot tessellation"),
    int("seat_stacks", 12.0, 4.0, 24.0, 1, "latitude steps of the hemispherical seat"),
    // seat stops
    flag("seat_stops_on", true, "add seat stops on the floor"),
    real("stop_x", Some(44.0), 10.0, 70.0, Millimetre, "stop station (symmetric)"),
    real("stop_length", Some(6.0), 2.0, 20.0, Millimetre, "stop length along x"),
    real("stop_width", Some(12.0), 4.0, 30.0, Millimetre, "stop width along y"),
    real("stop_height", Some(6.0), 1.0, 20.0, Millimetre, "stop height above the floor"),
    real(
        "stop_target_z",
        Some(0.0),
        0.0,
        40.0,
        Millimetre,
        "absolute stop top; 0 derives it from stop_height",
    ),
    // feet
    flag("feet_on", true, "cut foot recesses into the exterior floor"),
    real("foot_span", Some(0.45), 0.1, 0.8, Fraction, "recess x over half-length"),
    real("foot_offset", Some(12.0), 4.0, 30.0, Millimetre, "recess lateral offset"),
    real("foot_diameter", Some(10.0), 4.0, 20.0, Millimetre, "recess diameter"),
    real("foot_recess_depth", Some(1.2), 0.2, 4.0, Millimetre, "recess depth"),
    real("foot_recess_skin", Some(1.0), 0.6, 4.0, Millimetre, "minimum floor skin above a recess"),
    // validation
    int("allowed_components", 1.0, 1.0, 4.0, 1, "number of shells the solid may have"),
    real(
        "min_floor_clearance",
        Some(2.0),
        0.5,
        10.0,
        Millimetre,
        "clearance under the mating frame",
    ),
    real(
        "corridor_clearance_min",
        Some(0.08),
        0.0,
        1.0,
        Millimetre,
        "ball clearance along the slot corridor",
    ),
    int("thickness_sample_count", 600.0, 50.0, 5000.0, 1, "sampled wall rays"),
    real("thickness_sample_percentile", Some(5.0), 0.0, 50.0, Percent, "robust sample percentile"),
    real(
        "thickness_noise_floor",
        Some(0.25),
        0.0,
        1.0,
        Millimetre,
        "ray hits closer than this are ignored",
    ),
    real("max_overhang_ratio", Some(0.35), 0.0, 1.0, Fraction, "advisory overhang area ratio"),
    real("overhang_angle", Some(45.0), 10.0, 80.0, Degrees, "overhang threshold from horizontal"),
    real("contact_tolerance", Some(0.2), 0.01, 2.0, Millimetre, "contact footprint height band"),
    real(
        "min_contact_area",
        Some(700.0),
        0.0,
        20000.0,
        SquareMillimetre,
        "advisory footprint area",
    ),
    real(
        "min_contact_span_x",
        Some(60.0),
        0.0,
        200.0,
        Millimetre,
        "advisory footprint span along x",
    ),
    real(
        "min_contact_span_y",
        Some(14.0),
        0.0,
        100.0,
        Millimetre,
        "advisory footprint span along y",
    ),
];

/// Look up a parameter declaration by name.
pub fn spec(name: &str) -> Option<&'static ParamSpec> {
    PARAMETERS.iter().find(|p| p.name == name)
}

impl ParamSpec {
    /// Check `value` against the declared range and kind.
    pub fn check(&self, value: Real) -> Result<Real, ParameterError> {
        let name = self.name.to_string();
        if !value.is_finite() {
            return Err(ParameterError::NotFinite { name });
        }
        if value < self.min || value > self.max {
            return Err(ParameterError::OutOfRange { name, value, min: self.min, max: self.max });
        }
        match self.kind {
            ParamKind::Real => {},
            ParamKind::Flag => {
                if value != 0.0 && value != 1.0 {
                    return Err(ParameterError::NotFlag { name, value });
                }
            },
            ParamKind::Integer { multiple_of } => {
                if value.fract() != 0.0 || (value as u64) % u64::from(multiple_of) != 0 {
                    return Err(ParameterError::NotInteger { name, value });
                }
            },
        }
        Ok(value)
    }
}

/// A complete, range-checked assignment of every declared parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSet {
    values: BTreeMap<&'static str, Real>,
}

impl ParameterSet {
    /// Build a set from explicit values; undeclared names are rejected and
    /// declared defaults fill the rest.
    pub fn from_values<I, K>(values: I) -> Result<Self, ParameterError>
    where
        I: IntoIterator<Item = (K, Real)>,
        K: AsRef<str>,
    {
        let mut checked = BTreeMap::new();
        for (key, value) in values {
            let spec = spec(key.as_ref())
                .ok_or_else(|| ParameterError::Unknown { name: key.as_ref().to_string() })?;
            checked.insert(spec.name, spec.check(value)?);
        }
        for spec in PARAMETERS {
            if !checked.contains_key(spec.name) {
                let value = spec
                    .default
                    .ok_or_else(|| ParameterError::Missing { name: spec.name.to_string() })?;
                checked.insert(spec.name, value);
            }
        }
        Ok(ParameterSet { values: checked })
    }

    pub fn get(&self, name: &str) -> Option<Real> {
        self.values.get(name).copied()
    }

    fn require(&self, name: &'static str) -> Result<Real, ParameterError> {
        self.get(name).ok_or_else(|| ParameterError::Missing { name: name.to_string() })
    }

    /// Copy of this set with one value replaced (re-validated).
    pub fn with_override(&self, name: &str, value: Real) -> Result<Self, ParameterError> {
        let spec = spec(name).ok_or_else(|| ParameterError::Unknown { name: name.to_string() })?;
        let mut values = self.values.clone();
        values.insert(spec.name, spec.check(value)?);
        Ok(ParameterSet { values })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Real)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    /// Typed parameters, after cross-parameter constraints.
    pub fn to_params(&self) -> Result<HullParams, ParameterError> {
        HullParams::try_from(self)
    }
}

/// Typed view of a [`ParameterSet`]; the only form later stages consume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HullParams {
    pub length: Real,
    pub beam: Real,
    pub depth: Real,
    pub wall_thickness: Real,
    pub floor_thickness: Real,
    pub min_wall: Real,
    pub min_floor: Real,

    pub sheer_rise_bow: Real,
    pub sheer_rise_stern: Real,
    pub sheer_exponent_bow: Real,
    pub sheer_exponent_stern: Real,
    pub sheer_plateau: Real,

    pub flat_half_length: Real,
    pub rocker_bow: Real,
    pub rocker_stern: Real,
    pub rocker_exponent: Real,

    pub beam_max_offset: Real,
    pub bow_taper_ratio: Real,
    pub stern_taper_ratio: Real,
    pub bow_taper_exponent: Real,
    pub stern_taper_exponent: Real,
    pub wall_end_ratio: Real,
    pub wall_taper_exponent: Real,
    pub tip_zone: Real,
    pub tip_exponent: Real,
    pub tip_min_radius: Real,

    pub shape_exponent_mid: Real,
    pub shape_exponent_tip: Real,
    pub shape_blend_exponent: Real,
    pub station_count: usize,
    pub profile_segments: usize,
    pub station_spacing_cosine: bool,
    pub cavity_overcut: Real,
    pub cavity_min_half_width: Real,

    pub reinforcement_on: bool,
    pub slot_skin: Real,
    pub slot_outer_skin_min: Real,
    pub reinforcement_margin: Real,
    pub reinforcement_gusset_ratio: Real,
    pub reinforcement_exponent: Real,
    pub slot_segments: usize,
    pub seat_stacks: usize,

    pub seat_stops_on: bool,
    pub stop_x: Real,
    pub stop_length: Real,
    pub stop_width: Real,
    pub stop_height: Real,
    pub stop_target_z: Option<Real>,

    pub feet_on: bool,
    pub foot_span: Real,
    pub foot_offset: Real,
    pub foot_diameter: Real,
    pub foot_recess_depth: Real,
    pub foot_recess_skin: Real,

    pub allowed_components: usize,
    pub min_floor_clearance: Real,
    pub corridor_clearance_min: Real,
    pub thickness_sample_count: usize,
    pub thickness_sample_percentile: Real,
    pub thickness_noise_floor: Real,
    pub max_overhang_ratio: Real,
    pub overhang_angle: Real,
    pub contact_tolerance: Real,
    pub min_contact_area: Real,
    pub min_contact_span_x: Real,
    pub min_contact_span_y: Real,
}

impl HullParams {
    pub const fn half_length(&self) -> Real {
        self.length * 0.5
    }

    /// x where the tip envelope begins, as a distance from midship.
    pub const fn tip_zone_start(&self) -> Real {
        self.half_length() * (1.0 - self.tip_zone)
    }

    fn check_constraints(&self) -> Result<(), ParameterError> {
        let violated = |name: &str, value: Real, bound: Real, constraint: &str| {
            Err(ParameterError::Constraint {
                name: name.to_string(),
                value,
                bound,
                constraint: constraint.to_string(),
            })
        };

        if self.wall_thickness < self.min_wall {
            return violated(
                "wall_thickness",
                self.wall_thickness,
                self.min_wall,
                "wall_thickness >= min_wall",
            );
        }
        if self.floor_thickness < self.min_floor {
            return violated(
                "floor_thickness",
                self.floor_thickness,
                self.min_floor,
                "floor_thickness >= min_floor",
            );
        }
        let flat_limit = self.tip_zone_start() - 1.0;
        if self.flat_half_length > flat_limit {
            return violated(
                "flat_half_length",
                self.flat_half_length,
                flat_limit,
                "flat_half_length <= length/2 * (1 - tip_zone) - 1",
            );
        }
        let recess_limit = self.floor_thickness - self.foot_recess_skin;
        if self.feet_on && self.foot_recess_depth > recess_limit {
            return violated(
                "foot_recess_depth",
                self.foot_recess_depth,
                recess_limit,
                "foot_recess_depth <= floor_thickness - foot_recess_skin",
            );
        }
        let foot_reach = self.foot_span * self.half_length() + self.foot_diameter * 0.5;
        if self.feet_on && foot_reach > self.flat_half_length {
            return violated(
                "foot_span",
                foot_reach,
                self.flat_half_length,
                "foot_span * length/2 + foot_diameter/2 <= flat_half_length",
            );
        }
        let stop_reach = self.stop_x + self.stop_length * 0.5;
        if self.seat_stops_on && stop_reach > self.tip_zone_start() {
            return violated(
                "stop_x",
                stop_reach,
                self.tip_zone_start(),
                "stop_x + stop_length/2 <= length/2 * (1 - tip_zone)",
            );
        }
        if self.cavity_min_half_width >= self.beam * 0.5 - self.wall_thickness {
            return violated(
                "wall_thickness",
                self.wall_thickness,
                self.beam * 0.5 - self.cavity_min_half_width,
                "beam/2 - wall_thickness > cavity_min_half_width",
            );
        }
        Ok(())
    }
}

impl TryFrom<&ParameterSet> for HullParams {
    type Error = ParameterError;

    fn try_from(set: &ParameterSet) -> Result<Self, Self::Error> {
        let r = |name: &'static str| set.require(name);
        let n = |name: &'static str| set.require(name).map(|v| v as usize);
        let b = |name: &'static str| set.require(name).map(|v| v != 0.0);

        let stop_target_z = r("stop_target_z")?;
        let params = HullParams {
            length: r("length")?,
            beam: r("beam")?,
            depth: r("depth")?,
            wall_thickness: r("wall_thickness")?,
            floor_thickness: r("floor_thickness")?,
            min_wall: r("min_wall")?,
            min_floor: r("min_floor")?,
            sheer_rise_bow: r("sheer_rise_bow")?,
            sheer_rise_stern: r("sheer_rise_stern")?,
            sheer_exponent_bow: r("sheer_exponent_bow")?,
            sheer_exponent_stern: r("sheer_exponent_stern")?,
            sheer_plateau: r("sheer_plateau")?,
            flat_half_length: r("flat_half_length")?,
            rocker_bow: r("rocker_bow")?,
            rocker_stern: r("rocker_stern")?,
            rocker_exponent: r("rocker_exponent")?,
            beam_max_offset: r("beam_max_offset")?,
            bow_taper_ratio: r("bow_taper_ratio")?,
            stern_taper_ratio: r("stern_taper_ratio")?,
            bow_taper_exponent: r("bow_taper_exponent")?,
            stern_taper_exponent: r("stern_taper_exponent")?,
            wall_end_ratio: r("wall_end_ratio")?,
            wall_taper_exponent: r("wall_taper_exponent")?,
            tip_zone: r("tip_zone")?,
            tip_exponent: r("tip_exponent")?,
            tip_min_radius: r("tip_min_radius")?,
            shape_exponent_mid: r("shape_exponent_mid")?,
            shape_exponent_tip: r("shape_exponent_tip")?,
            shape_blend_exponent: r("shape_blend_exponent")?,
            station_count: n("station_count")?,
            profile_segments: n("profile_segments")?,
            station_spacing_cosine: b("station_spacing_cosine")?,
            cavity_overcut: r("cavity_overcut")?,
            cavity_min_half_width: r("cavity_min_half_width")?,
            reinforcement_on: b("reinforcement_on")?,
            slot_skin: r("slot_skin")?,
            slot_outer_skin_min: r("slot_outer_skin_min")?,
            reinforcement_margin: r("reinforcement_margin")?,
            reinforcement_gusset_ratio: r("reinforcement_gusset_ratio")?,
            reinforcement_exponent: r("reinforcement_exponent")?,
            slot_segments: n("slot_segments")?,
            seat_stacks: n("seat_stacks")?,
            seat_stops_on: b("seat_stops_on")?,
            stop_x: r("stop_x")?,
            stop_length: r("stop_length")?,
            stop_width: r("stop_width")?,
            stop_height: r("stop_height")?,
            stop_target_z: (stop_target_z > 0.0).then_some(stop_target_z),
            feet_on: b("feet_on")?,
            foot_span: r("foot_span")?,
            foot_offset: r("foot_offset")?,
            foot_diameter: r("foot_diameter")?,
            foot_recess_depth: r("foot_recess_depth")?,
            foot_recess_skin: r("foot_recess_skin")?,
            allowed_components: n("allowed_components")?,
            min_floor_clearance: r("min_floor_clearance")?,
            corridor_clearance_min: r("corridor_clearance_min")?,
            thickness_sample_count: n("thickness_sample_count")?,
            thickness_sample_percentile: r("thickness_sample_percentile")?,
            thickness_noise_floor: r("thickness_noise_floor")?,
            max_overhang_ratio: r("max_overhang_ratio")?,
            overhang_angle: r("overhang_angle")?,
            contact_tolerance: r("contact_tolerance")?,
            min_contact_area: r("min_contact_area")?,
            min_contact_span_x: r("min_contact_span_x")?,
            min_contact_span_y: r("min_contact_span_y")?,
        };
        params.check_constraints()?;
        Ok(params)
    }
}

/// A named set of parameter values as stored in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub parameters: BTreeMap<String, Real>,
}

impl Preset {
    pub const BUILTIN: &'static [&'static str] = &["gcsc_default", "sleek"];

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// A preset shipped with the crate.
    pub fn builtin(name: &str) -> Option<Preset> {
        let (description, values): (&str, &[(&str, Real)]) = match name {
            "gcsc_default" => (
                "reference hull",
                &[
                    ("length", 148.0),
                    ("beam", 79.5),
                    ("depth", 50.0),
                    ("wall_thickness", 9.0),
                    ("floor_thickness", 3.5),
                ],
            ),
            "sleek" => (
                "longer, finer-ended variant with the same interface",
                &[
                    ("length", 156.0),
                    ("beam", 80.0),
                    ("depth", 50.0),
                    ("wall_thickness", 8.0),
                    ("floor_thickness", 3.0),
                    ("sheer_rise_bow", 14.0),
                    ("sheer_exponent_bow", 2.0),
                    ("rocker_bow", 10.0),
                    ("bow_taper_ratio", 0.24),
                    ("bow_taper_exponent", 3.0),
                    ("shape_exponent_mid", 3.6),
                    ("tip_zone", 0.26),
                    ("tip_exponent", 1.8),
                    ("foot_span", 0.42),
                ],
            ),
            _ => return None,
        };
        Some(Preset {
            name: name.to_string(),
            description: description.to_string(),
            parameters: values.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        })
    }

    pub fn parameter_set(&self) -> Result<ParameterSet, ParameterError> {
        ParameterSet::from_values(self.parameters.iter().map(|(k, v)| (k.as_str(), *v)))
    }
}

/// The locked mechanical interface that generated geometry must reproduce.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedInterfaceSpec {
    /// Slot centers sit at `x = ±frame_x_offset`.
    pub frame_x_offset: Real,
    /// Slot centers sit at `y = ±slot_y_position`.
    pub slot_y_position: Real,
    /// Height of the seat sphere center.
    pub seat_z: Real,
    pub slot_diameter: Real,
    pub ball_diameter: Real,
    /// Lowest point of the mating frame.
    pub frame_bottom_z: Real,
    /// Allowed deviation of every measured interface value.
    pub tolerance: Real,
}

impl Default for FixedInterfaceSpec {
    fn default() -> Self {
        Self::CANONICAL
    }
}

impl FixedInterfaceSpec {
    pub const CANONICAL: FixedInterfaceSpec = FixedInterfaceSpec {
        frame_x_offset: 16.0,
        slot_y_position: 33.0,
        seat_z: 38.0,
        slot_diameter: 7.5,
        ball_diameter: 7.25,
        frame_bottom_z: 17.0,
        tolerance: 0.01,
    };

    /// Validated interface.
    pub fn new(
        frame_x_offset: Real,
        slot_y_position: Real,
        seat_z: Real,
        slot_diameter: Real,
        ball_diameter: Real,
        frame_bottom_z: Real,
        tolerance: Real,
    ) -> Result<Self, ParameterError> {
        let spec = FixedInterfaceSpec {
            frame_x_offset,
            slot_y_position,
            seat_z,
            slot_diameter,
            ball_diameter,
            frame_bottom_z,
            tolerance,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        let invalid = |name: &str, value: Real, reason: &str| {
            Err(ParameterError::InvalidInterface {
                name: name.to_string(),
                value,
                reason: reason.to_string(),
            })
        };
        for (name, value) in [
            ("frame_x_offset", self.frame_x_offset),
            ("slot_y_position", self.slot_y_position),
            ("seat_z", self.seat_z),
            ("slot_diameter", self.slot_diameter),
            ("ball_diameter", self.ball_diameter),
            ("tolerance", self.tolerance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return invalid(name, value, "must be positive");
            }
        }
        if !self.frame_bottom_z.is_finite() {
            return invalid("frame_bottom_z", self.frame_bottom_z, "must be finite");
        }
        if self.ball_diameter >= self.slot_diameter {
            return invalid(
                "ball_diameter",
                self.ball_diameter,
                "ball must be smaller than the slot",
            );
        }
        if self.slot_y_position <= self.slot_radius() {
            return invalid(
                "slot_y_position",
                self.slot_y_position,
                "slots must not cross the centerline",
            );
        }
        if self.frame_x_offset <= self.slot_radius() {
            return invalid("frame_x_offset", self.frame_x_offset, "slots must not cross midship");
        }
        Ok(())
    }

    pub const fn slot_radius(&self) -> Real {
        self.slot_diameter * 0.5
    }

    pub const fn ball_radius(&self) -> Real {
        self.ball_diameter * 0.5
    }

    /// Pivot centers in slot order: (-x,-y), (-x,+y), (+x,-y), (+x,+y).
    pub fn pivot_centers(&self) -> [Point3<Real>; 4] {
        let (x, y, z) = (self.frame_x_offset, self.slot_y_position, self.seat_z);
        [
            Point3::new(-x, -y, z),
            Point3::new(-x, y, z),
            Point3::new(x, -y, z),
            Point3::new(x, y, z),
        ]
    }

    /// Whether every value equals the canonical interface.
    pub fn is_canonical(&self) -> bool {
        self.max_deviation_from(&Self::CANONICAL) <= Real::EPSILON
    }

    pub fn max_deviation_from(&self, other: &FixedInterfaceSpec) -> Real {
        [
            self.frame_x_offset - other.frame_x_offset,
            self.slot_y_position - other.slot_y_position,
            self.seat_z - other.seat_z,
            self.slot_diameter - other.slot_diameter,
            self.ball_diameter - other.ball_diameter,
            self.frame_bottom_z - other.frame_bottom_z,
        ]
        .iter()
        .fold(0.0, |acc: Real, d| acc.max(d.abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required() -> Vec<(&'static str, Real)> {
        vec![
            ("length", 148.0),
            ("beam", 79.5),
            ("depth", 50.0),
            ("wall_thickness", 9.0),
            ("floor_thickness", 3.5),
        ]
    }

    #[test]
    fn every_default_lies_in_its_range() {
        for spec in PARAMETERS {
            if let Some(default) = spec.default {
                assert!(spec.check(default).is_ok(), "{} default {}", spec.name, default);
            }
        }
    }

    #[test]
    fn parameter_names_are_unique() {
        let mut names: Vec<_> = PARAMETERS.iter().map(|p| p.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), PARAMETERS.len());
    }

    #[test]
    fn out_of_range_is_rejected_not_clamped() {
        let mut values = required();
        values.push(("station_count", 25.0));
        let err = ParameterSet::from_values(values).unwrap_err();
        assert!(matches!(
            err,
            ParameterError::OutOfRange { ref name, .. } if name == "station_count"
        ));
    }

    #[test]
    fn missing_required_key_fails() {
        let values: Vec<_> = required().into_iter().filter(|(k, _)| *k != "beam").collect();
        let err = ParameterSet::from_values(values).unwrap_err();
        assert_eq!(err, ParameterError::Missing { name: "beam".into() });
    }

    #[test]
    fn unknown_and_mistyped_keys_fail() {
        let mut values = required();
        values.push(("hull_colour", 3.0));
        assert!(matches!(
            ParameterSet::from_values(values),
            Err(ParameterError::Unknown { .. })
        ));

        let mut values = required();
        values.push(("profile_segments", 41.0));
        assert!(matches!(
            ParameterSet::from_values(values),
            Err(ParameterError::NotInteger { .. })
        ));

        let mut values = required();
        values.push(("feet_on", 0.5));
        assert!(matches!(ParameterSet::from_values(values), Err(ParameterError::NotFlag { .. })));
    }

    #[test]
    fn recess_deeper_than_floor_allows_is_a_constraint_error() {
        let mut values = required();
        values.push(("foot_recess_depth", 3.0));
        let set = ParameterSet::from_values(values).unwrap();
        assert!(matches!(
            set.to_params(),
            Err(ParameterError::Constraint { ref name, .. }) if name == "foot_recess_depth"
        ));
    }

    #[test]
    fn builtin_presets_convert() {
        for name in Preset::BUILTIN {
            let preset = Preset::builtin(name).unwrap();
            let params = preset.parameter_set().unwrap().to_params().unwrap();
            assert!(params.length > 0.0);
        }
    }

    #[test]
    fn preset_json_round_trip_keeps_values() {
        let preset = Preset::builtin("gcsc_default").unwrap();
        let parsed = Preset::from_json(&preset.to_json().unwrap()).unwrap();
        assert_eq!(parsed, preset);
    }

    #[test]
    fn interface_rejects_oversized_ball() {
        let err = FixedInterfaceSpec::new(16.0, 33.0, 38.0, 7.5, 7.6, 17.0, 0.01).unwrap_err();
        assert!(matches!(
            err,
            ParameterError::InvalidInterface { ref name, .. } if name == "ball_diameter"
        ));
        assert!(FixedInterfaceSpec::default().is_canonical());
    }
}
