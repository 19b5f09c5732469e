//! Parametric hull generation on a **Constructive Solid Geometry (CSG)** kernel,
//! built around Boolean operations (*union*, *difference*, *intersection*) on
//! sets of polygons stored in [BSP](mesh::bsp) trees.
//!
//! A bounded [parameter table](hull::params::PARAMETERS) drives scalar
//! [shaping curves](hull::curves), which place superellipse
//! [stations](hull::stations) along the hull. The stations are
//! [lofted](hull::loft) into a closed outer body and cavity, the
//! [feature layer](hull::features) cuts the fixed mechanical interface (pivot
//! slots, seat stops, foot recesses) into the shell, and the
//! [validator](hull::validate) measures every invariant of the result.
//!
//! ```no_run
//! use hullforge::hull::{FixedInterfaceSpec, Preset, generate};
//!
//! let preset = Preset::builtin("gcsc_default").unwrap();
//! let set = preset.parameter_set().unwrap();
//! let hull = generate(&set, &FixedInterfaceSpec::CANONICAL).unwrap();
//! assert!(hull.report.is_acceptable());
//! ```
//!
//! # Features
//! #### Default
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` export
//!
//! #### Optional
//! - **parallel**: use rayon for station generation and sweeps

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod errors;
pub mod float_types;
pub mod hull;
pub mod io;
pub mod mesh;
pub mod traits;
pub mod triangulated;

pub use errors::HullError;
pub use hull::{
    FixedInterfaceSpec, GeneratedHull, ParameterSet, Preset, Solid, SurfaceTag, generate,
};
pub use mesh::Mesh;
pub use traits::CSGOps;
