//! Parametric hull generation.
//!
//! The pipeline runs leaves first: a validated [`params::ParameterSet`] is
//! turned into [`params::HullParams`], the [`curves`] shape the stations, the
//! [`loft`] skins them into closed meshes, the [`features`] layer cuts and
//! adds the mechanical interface, and [`validate`] measures the result.
//! [`pipeline::generate`] runs all of it.

pub mod curves;
pub mod features;
pub mod loft;
pub mod params;
pub mod pipeline;
pub mod stations;
pub mod validate;

use crate::mesh::Mesh;
use serde::Serialize;

pub use params::{FixedInterfaceSpec, HullParams, ParameterSet, Preset};
pub use pipeline::{GeneratedHull, generate};
pub use validate::ValidationReport;

/// Origin of a face, carried through every boolean so features can be found
/// and measured on the finished solid.
///
/// Indexed variants name the slot, stop or recess they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SurfaceTag {
    Exterior,
    Cavity,
    Reinforcement(u8),
    SlotWall(u8),
    SeatStop(u8),
    FootRecess(u8),
}

/// A closed boundary whose faces are tagged by origin.
pub type Solid = Mesh<SurfaceTag>;
