//! End-to-end generation and robustness sweeps.

use crate::errors::{HullError, InvariantViolation};
use crate::float_types::{Real, tolerance};
use crate::hull::Solid;
use crate::hull::curves::HullCurves;
use crate::hull::features::FeaturePlan;
use crate::hull::loft::loft;
use crate::hull::params::{FixedInterfaceSpec, HullParams, ParameterSet};
use crate::hull::stations::StationSet;
use crate::hull::validate::{GeometrySignature, SignatureBand, ValidationReport, Validator};
use crate::mesh::manifold::IndexedTriangles;
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Everything one generation run produced.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedHull {
    pub params: HullParams,
    pub interface: FixedInterfaceSpec,
    pub stations: StationSet,
    pub features: FeaturePlan,
    #[serde(skip)]
    pub solid: Solid,
    pub report: ValidationReport,
}

impl GeneratedHull {
    /// Welded triangles with T-junctions repaired, as written to STL.
    pub fn indexed(&self) -> IndexedTriangles {
        self.solid.to_indexed(tolerance())
    }

    pub fn is_acceptable(&self) -> bool {
        self.report.is_acceptable()
    }
}

/// Run every stage: parameters, curves, stations, loft, features, validation.
///
/// Structural failures stop the run and no solid is returned. Invariant
/// failures are recorded in the report.
pub fn generate(
    set: &ParameterSet,
    interface: &FixedInterfaceSpec,
) -> Result<GeneratedHull, HullError> {
    let _span = info_span!("generate").entered();
    interface.validate()?;
    let params = set.to_params()?;

    let curves = HullCurves::new(&params);
    curves.check_continuity()?;

    let stations = StationSet::generate(&curves)?;
    debug!(
        outer = stations.outer.len(),
        cavity = stations.cavity.len(),
        cavity_extent = ?stations.cavity_extent,
        "stations generated"
    );

    let lofted = loft(&stations)?;
    let features = FeaturePlan::plan(&params, interface, &curves, &stations)?;
    let solid = features.apply(&lofted)?;
    let report = Validator::new(&params, interface).validate(&solid, &features);

    info!(
        length = params.length,
        beam = params.beam,
        triangles = report.signature.triangle_count,
        volume = report.signature.volume,
        acceptable = report.is_acceptable(),
        "hull generated"
    );
    Ok(GeneratedHull { params, interface: *interface, stations, features, solid, report })
}

/// A named set of parameter overrides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Perturbation {
    pub name: String,
    pub overrides: Vec<(String, Real)>,
}

impl Perturbation {
    pub fn new(name: &str, overrides: &[(&str, Real)]) -> Self {
        Perturbation {
            name: name.to_string(),
            overrides: overrides.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    pub fn apply(&self, base: &ParameterSet) -> Result<ParameterSet, HullError> {
        let mut set = base.clone();
        for (name, value) in &self.overrides {
            set = set.with_override(name, *value)?;
        }
        Ok(set)
    }
}

/// Scenarios exercised by `hullforge sweep` when none are given.
pub fn default_perturbations() -> Vec<Perturbation> {
    vec![
        Perturbation::new("thin_wall", &[("wall_thickness", 7.5)]),
        Perturbation::new("wide_beam", &[("beam", 84.0)]),
        Perturbation::new("long", &[("length", 164.0), ("flat_half_length", 44.0)]),
        Perturbation::new("high_sheer", &[("sheer_rise_bow", 16.0), ("sheer_rise_stern", 12.0)]),
        Perturbation::new("deep_rocker", &[("rocker_bow", 14.0), ("rocker_stern", 10.0)]),
        Perturbation::new("full_sections", &[("shape_exponent_mid", 4.5)]),
        Perturbation::new("blunt_tips", &[("tip_exponent", 2.0), ("tip_zone", 0.18)]),
        Perturbation::new("coarse", &[("station_count", 11.0), ("profile_segments", 32.0)]),
        Perturbation::new("unreinforced", &[("reinforcement_on", 0.0)]),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SweepStatus {
    /// Generated and every mechanical-critical check passed.
    Accepted,
    /// Generated with mechanical-critical violations.
    Rejected,
    /// Stopped by a structural error.
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepOutcome {
    pub scenario: String,
    pub status: SweepStatus,
    pub violations: Vec<InvariantViolation>,
    pub signature: Option<GeometrySignature>,
    /// Whether the signature stayed within the band around the baseline.
    pub within_band: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepSummary {
    pub baseline: GeometrySignature,
    pub outcomes: Vec<SweepOutcome>,
}

impl SweepSummary {
    pub fn accepted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status == SweepStatus::Accepted).count()
    }
}

/// Generate the baseline, then every perturbation of it.
///
/// The baseline must generate; scenario failures are recorded as outcomes.
pub fn sweep(
    base: &ParameterSet,
    interface: &FixedInterfaceSpec,
    perturbations: &[Perturbation],
    band: SignatureBand,
) -> Result<SweepSummary, HullError> {
    let _span = info_span!("sweep", scenarios = perturbations.len()).entered();
    let baseline = generate(base, interface)?.report.signature;

    let run = |perturbation: &Perturbation| {
        let result = perturbation.apply(base).and_then(|set| generate(&set, interface));
        let outcome = match result {
            Ok(hull) => {
                let status = if hull.is_acceptable() {
                    SweepStatus::Accepted
                } else {
                    SweepStatus::Rejected
                };
                let signature = hull.report.signature.clone();
                SweepOutcome {
                    scenario: perturbation.name.clone(),
                    status,
                    violations: hull.report.violations(),
                    within_band: Some(signature.matches(&baseline, band)),
                    signature: Some(signature),
                }
            },
            Err(err) => {
                warn!(scenario = %perturbation.name, %err, "scenario failed");
                SweepOutcome {
                    scenario: perturbation.name.clone(),
                    status: SweepStatus::Failed { error: err.to_string() },
                    violations: Vec::new(),
                    signature: None,
                    within_band: None,
                }
            },
        };
        debug!(scenario = %outcome.scenario, status = ?outcome.status, "scenario finished");
        outcome
    };

    #[cfg(feature = "parallel")]
    let outcomes: Vec<SweepOutcome> = perturbations.par_iter().map(run).collect();
    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<SweepOutcome> = perturbations.iter().map(run).collect();

    let summary = SweepSummary { baseline, outcomes };
    info!(accepted = summary.accepted(), total = summary.outcomes.len(), "sweep finished");
    Ok(summary)
}
