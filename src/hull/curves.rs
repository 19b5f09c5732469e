//! Scalar shaping curves along the hull length.
//!
//! Every function takes a longitudinal position `x` in millimetres, with the
//! bow at `+length/2` and the stern at `-length/2`, and is pure.

use crate::errors::ContinuityError;
use crate::float_types::Real;
use crate::hull::params::HullParams;

/// Samples used by [`HullCurves::check_continuity`].
pub const CONTINUITY_SAMPLES: usize = 2001;

/// Largest allowed change between adjacent continuity samples, as a fraction
/// of each curve's characteristic magnitude.
const JUMP_FRACTION: Real = 0.25;

/// Curve evaluator bound to one parameter set.
#[derive(Debug, Clone, Copy)]
pub struct HullCurves<'a> {
    params: &'a HullParams,
}

impl<'a> HullCurves<'a> {
    pub const fn new(params: &'a HullParams) -> Self {
        HullCurves { params }
    }

    pub const fn params(&self) -> &'a HullParams {
        self.params
    }

    /// Normalized distance from midship, clamped to `[0, 1]`.
    fn u(&self, x: Real) -> Real {
        (x.abs() / self.params.half_length()).min(1.0)
    }

    /// Gunwale rise above `depth`.
    pub fn sheer_rise(&self, x: Real) -> Real {
        let p = self.params;
        let (rise, exponent) = if x >= 0.0 {
            (p.sheer_rise_bow, p.sheer_exponent_bow)
        } else {
            (p.sheer_rise_stern, p.sheer_exponent_stern)
        };
        let s = ((self.u(x) - p.sheer_plateau) / (1.0 - p.sheer_plateau)).max(0.0);
        rise * s.powf(exponent)
    }

    /// Keel height above the flat. Exactly zero on the flat zone.
    pub fn keel_lift(&self, x: Real) -> Real {
        let p = self.params;
        let flat = p.flat_half_length;
        if x.abs() <= flat {
            return 0.0;
        }
        let rocker = if x >= 0.0 { p.rocker_bow } else { p.rocker_stern };
        let v = ((x.abs() - flat) / (p.half_length() - flat)).min(1.0);
        rocker * v.powf(p.rocker_exponent)
    }

    /// Plan-form beam fraction; 1 at `beam_max_offset`, non-increasing away from it.
    pub fn beam_scale(&self, x: Real) -> Real {
        let p = self.params;
        let hl = p.half_length();
        let offset = p.beam_max_offset;
        let (w, ratio, exponent) = if x >= offset {
            ((x - offset) / (hl - offset), p.bow_taper_ratio, p.bow_taper_exponent)
        } else {
            ((offset - x) / (hl + offset), p.stern_taper_ratio, p.stern_taper_exponent)
        };
        1.0 - (1.0 - ratio) * w.clamp(0.0, 1.0).powf(exponent)
    }

    /// Wall scale fraction; 1 at midship, `wall_end_ratio` at the tips.
    pub fn wall_taper(&self, x: Real) -> Real {
        let p = self.params;
        1.0 - (1.0 - p.wall_end_ratio) * self.u(x).powf(p.wall_taper_exponent)
    }

    /// Superelliptic closure of the section near the tips.
    ///
    /// 1 outside the tip zone, 0 at the tip, with zero slope where it meets the body.
    pub fn tip_envelope(&self, x: Real) -> Real {
        let p = self.params;
        let u0 = 1.0 - p.tip_zone;
        let u = self.u(x);
        if u <= u0 {
            return 1.0;
        }
        let v = ((u - u0) / (1.0 - u0)).min(1.0);
        let e = p.tip_exponent;
        (1.0 - v.powf(e)).max(0.0).powf(1.0 / e)
    }

    /// Tapered side wall, never below `min_wall`.
    pub fn wall_thickness(&self, x: Real) -> Real {
        let p = self.params;
        (p.wall_thickness * self.wall_taper(x)).max(p.min_wall)
    }

    pub fn half_beam(&self, x: Real) -> Real {
        let p = self.params;
        let tip = p.tip_min_radius;
        tip + (p.beam * 0.5 * self.beam_scale(x) - tip) * self.tip_envelope(x)
    }

    /// Rim height.
    pub fn top_z(&self, x: Real) -> Real {
        self.params.depth + self.sheer_rise(x)
    }

    /// Lowest point of the outer section.
    pub fn bottom_z(&self, x: Real) -> Real {
        let tip = self.params.tip_min_radius;
        let top = self.top_z(x);
        top - (tip + (top - self.keel_lift(x) - tip) * self.tip_envelope(x))
    }

    /// Superellipse exponent, blending from the tips to midship.
    pub fn shape_exponent(&self, x: Real) -> Real {
        let p = self.params;
        p.shape_exponent_tip
            + (p.shape_exponent_mid - p.shape_exponent_tip)
                * (1.0 - self.u(x).powf(p.shape_blend_exponent))
    }

    /// Sample every curve densely over the hull length and reject non-finite
    /// values and jumps.
    pub fn check_continuity(&self) -> Result<(), ContinuityError> {
        let p = self.params;
        let hl = p.half_length();
        let height = p.depth + p.sheer_rise_bow.max(p.sheer_rise_stern);
        type Curve<'c> = (&'static str, Real, Box<dyn Fn(Real) -> Real + 'c>);
        let curves: [Curve<'_>; 9] = [
            ("sheer_rise", height, Box::new(|x| self.sheer_rise(x))),
            ("keel_lift", height, Box::new(|x| self.keel_lift(x))),
            ("beam_scale", 1.0, Box::new(|x| self.beam_scale(x))),
            ("wall_taper", 1.0, Box::new(|x| self.wall_taper(x))),
            ("tip_envelope", 1.0, Box::new(|x| self.tip_envelope(x))),
            ("half_beam", p.beam * 0.5, Box::new(|x| self.half_beam(x))),
            ("top_z", height, Box::new(|x| self.top_z(x))),
            ("bottom_z", height, Box::new(|x| self.bottom_z(x))),
            ("shape_exponent", p.shape_exponent_mid.max(p.shape_exponent_tip), Box::new(|x| {
                self.shape_exponent(x)
            })),
        ];

        let step = 2.0 * hl / (CONTINUITY_SAMPLES - 1) as Real;
        for (name, scale, f) in &curves {
            let function: &'static str = *name;
            let limit = JUMP_FRACTION * scale;
            let mut previous: Option<Real> = None;
            for i in 0..CONTINUITY_SAMPLES {
                let x = -hl + step * i as Real;
                let value = f(x);
                if !value.is_finite() {
                    return Err(ContinuityError::CurveJump { function, x, delta: Real::NAN, limit });
                }
                if let Some(prev) = previous {
                    let delta = (value - prev).abs();
                    if delta > limit {
                        return Err(ContinuityError::CurveJump { function, x, delta, limit });
                    }
                }
                previous = Some(value);
            }
        }
        Ok(())
    }
}
