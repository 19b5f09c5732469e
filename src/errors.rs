//! Error taxonomy.
//!
//! Structural errors ([`ParameterError`], [`ContinuityError`],
//! [`LoftDegeneracyError`]) halt generation and no partial solid is returned.
//! [`InvariantViolation`] is data: it is reported by the validator and never
//! raised on its own.

use crate::float_types::Real;
use crate::hull::validate::{Bound, Criticality, InvariantCategory};
use serde::Serialize;

/// Top-level error of the generation pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HullError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    #[error(transparent)]
    Continuity(#[from] ContinuityError),
    #[error(transparent)]
    Loft(#[from] LoftDegeneracyError),
    #[error("feature geometry could not be built: {0}")]
    Feature(#[from] MeshError),
}

/// A parameter, preset or interface value was rejected before any geometry was built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    #[error("parameter `{name}` = {value} is outside its declared range [{min}, {max}]")]
    OutOfRange { name: String, value: Real, min: Real, max: Real },
    #[error("required parameter `{name}` is missing and has no declared default")]
    Missing { name: String },
    #[error("unknown parameter `{name}`")]
    Unknown { name: String },
    #[error("parameter `{name}` = {value} is not a whole multiple of its declared step")]
    NotInteger { name: String, value: Real },
    #[error("parameter `{name}` = {value} must be 0 or 1")]
    NotFlag { name: String, value: Real },
    #[error("parameter `{name}` is not a finite number")]
    NotFinite { name: String },
    #[error("parameter `{name}` = {value} violates `{constraint}` (bound {bound})")]
    Constraint { name: String, value: Real, bound: Real, constraint: String },
    #[error("interface value `{name}` = {value} is invalid: {reason}")]
    InvalidInterface { name: String, value: Real, reason: String },
}

/// A curve or station sequence would produce a discontinuous or crossing loft.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContinuityError {
    #[error("curve `{function}` jumps by {delta} at x = {x} (limit {limit})")]
    CurveJump { function: &'static str, x: Real, delta: Real, limit: Real },
    #[error("station {index} at x = {x} does not follow x = {previous}")]
    NonIncreasingStations { index: usize, x: Real, previous: Real },
    #[error(
        "station {index}: `{attribute}` changes by {delta} from the previous station \
         (limit {limit})"
    )]
    Discontinuity { index: usize, attribute: &'static str, delta: Real, limit: Real },
    #[error(
        "cavity station {index} at x = {x} crosses the outer profile: \
         `{attribute}` margin {margin} < {required}"
    )]
    ProfileCrossing {
        index: usize,
        x: Real,
        attribute: &'static str,
        margin: Real,
        required: Real,
    },
    #[error("station {index}: `{attribute}` is not finite")]
    NonFinite { index: usize, attribute: &'static str },
    #[error("the cavity collapses at x = {x}: no room inside the wall and floor")]
    CavityCollapsed { x: Real },
}

/// The skinning step would produce an invalid or degenerate surface.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoftDegeneracyError {
    #[error("{surface}: a loft needs at least 2 stations, got {count}")]
    TooFewStations { surface: &'static str, count: usize },
    #[error("{surface}: station {index} has {found} profile points, expected {expected}")]
    InconsistentProfile { surface: &'static str, index: usize, expected: usize, found: usize },
    #[error("{surface}: end cap at station {index} has area {area} (minimum {minimum})")]
    ZeroAreaCap { surface: &'static str, index: usize, area: Real, minimum: Real },
    #[error(
        "{surface}: skinned surface is not closed \
         ({boundary_edges} boundary, {inconsistent_edges} misoriented edges)"
    )]
    OpenSurface { surface: &'static str, boundary_edges: usize, inconsistent_edges: usize },
    #[error("{surface}: enclosed volume {volume} is not positive")]
    InvertedVolume { surface: &'static str, volume: Real },
    #[error("boolean stage `{stage}` produced an empty solid")]
    EmptyResult { stage: String },
}

/// Shape builder failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("a solid of revolution needs at least 3 segments, got {segments}")]
    TooFewSegments { segments: usize },
    #[error("degenerate profile: {0}")]
    DegenerateProfile(String),
    #[error("mesh has no triangles")]
    Empty,
    #[error(transparent)]
    TriMesh(#[from] crate::float_types::parry3d::shape::TriMeshBuilderError),
}

/// A measured invariant fell outside its bound.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{category:?} invariant `{name}` failed: measured {measured}, required {bound}")]
pub struct InvariantViolation {
    pub name: String,
    pub category: InvariantCategory,
    pub criticality: Criticality,
    pub measured: Real,
    pub bound: Bound,
}
