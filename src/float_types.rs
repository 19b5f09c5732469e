// Re-export parry for the crate's float size
pub use parry3d_f64 as parry3d;

// Our Real scalar type:
pub type Real = f64;

use core::str::FromStr;
use std::sync::OnceLock;

/// Plane-side classification epsilon used by the BSP splitter.
pub const EPSILON: Real = 1e-5;

/// Lazily-initialized weld tolerance used by topology analysis and export.
/// Defaults to `1e-5` mm; set `HULLFORGE_TOLERANCE` at build time to override
/// it (e.g. `HULLFORGE_TOLERANCE=1e-6 cargo build`).
static TOLERANCE_CELL: OnceLock<Real> = OnceLock::new();

#[inline]
const fn default_tolerance() -> Real {
    1e-5
}

/// Returns the current weld tolerance.
pub fn tolerance() -> Real {
    *TOLERANCE_CELL.get_or_init(|| {
        if let Some(environment_variable) = option_env!("HULLFORGE_TOLERANCE") {
            if let Ok(value) = Real::from_str(environment_variable) {
                return value.max(Real::EPSILON);
            }
        }
        default_tolerance()
    })
}

/// Archimedes' constant (π)
pub const PI: Real = core::f64::consts::PI;

/// π/2
pub const FRAC_PI_2: Real = core::f64::consts::FRAC_PI_2;

/// The full circle constant (τ)
pub const TAU: Real = core::f64::consts::TAU;

