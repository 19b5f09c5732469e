//! Shaping-curve tests, including property-based checks over the parameter ranges.
//!
//! Run with: cargo test --test curves_tests

mod support;

use hullforge::{
    errors::ContinuityError,
    float_types::Real,
    hull::{HullParams, curves::HullCurves},
};
use proptest::prelude::*;

use crate::support::{approx_eq, default_params, default_set};

// =============================================================================
// Strategies
// =============================================================================

/// Shape parameters drawn from their declared ranges; combinations that fail
/// the cross-parameter constraints are discarded.
fn arb_params() -> impl Strategy<Value = HullParams> {
    (
        (120.0..200.0f64, 60.0..100.0f64, 35.0..65.0f64),
        (0.0..30.0f64, 0.0..30.0f64, 1.5..4.0f64, 0.0..0.6f64),
        (10.0..60.0f64, 0.0..25.0f64, 1.5..4.0f64),
        (-20.0..20.0f64, 0.1..0.9f64, 1.5..4.0f64, 0.05..0.4f64, 1.2..2.0f64),
    )
        .prop_filter_map(
            "parameters violate a cross constraint",
            |(
                (length, beam, depth),
                (sheer_bow, sheer_stern, sheer_exp, plateau),
                (flat, rocker, rocker_exp),
                (offset, taper, taper_exp, tip_zone, tip_exp),
            )| {
                let overrides = [
                    ("length", length),
                    ("beam", beam),
                    ("depth", depth),
                    ("sheer_rise_bow", sheer_bow),
                    ("sheer_rise_stern", sheer_stern),
                    ("sheer_exponent_bow", sheer_exp),
                    ("sheer_plateau", plateau),
                    ("flat_half_length", flat),
                    ("rocker_bow", rocker),
                    ("rocker_exponent", rocker_exp),
                    ("beam_max_offset", offset),
                    ("bow_taper_ratio", taper),
                    ("bow_taper_exponent", taper_exp),
                    ("tip_zone", tip_zone),
                    ("tip_exponent", tip_exp),
                    ("feet_on", 0.0),
                    ("seat_stops_on", 0.0),
                ];
                let mut set = default_set();
                for (name, value) in overrides {
                    set = set.with_override(name, value).ok()?;
                }
                set.to_params().ok()
            },
        )
}

fn samples(params: &HullParams, n: usize) -> impl Iterator<Item = Real> + '_ {
    let hl = params.half_length();
    (0..=n).map(move |i| -hl + 2.0 * hl * i as Real / n as Real)
}

// =============================================================================
// Reference curves
// =============================================================================

#[test]
fn reference_curves_at_midship() {
    let params = default_params();
    let curves = HullCurves::new(&params);
    assert_eq!(curves.sheer_rise(0.0), 0.0);
    assert_eq!(curves.keel_lift(0.0), 0.0);
    assert_eq!(curves.beam_scale(0.0), 1.0);
    assert_eq!(curves.tip_envelope(0.0), 1.0);
    assert!(approx_eq(curves.half_beam(0.0), 79.5 / 2.0, 1e-12));
    assert!(approx_eq(curves.top_z(0.0), 50.0, 1e-12));
    assert!(approx_eq(curves.bottom_z(0.0), 0.0, 1e-12));
    assert!(approx_eq(curves.wall_thickness(0.0), 9.0, 1e-12));
    assert!(approx_eq(curves.shape_exponent(0.0), params.shape_exponent_mid, 1e-12));
}

#[test]
fn reference_curves_at_the_tips() {
    let params = default_params();
    let curves = HullCurves::new(&params);
    let hl = params.half_length();

    assert!(approx_eq(curves.sheer_rise(hl), params.sheer_rise_bow, 1e-9));
    assert!(approx_eq(curves.sheer_rise(-hl), params.sheer_rise_stern, 1e-9));
    assert!(approx_eq(curves.keel_lift(hl), params.rocker_bow, 1e-9));
    assert!(approx_eq(curves.keel_lift(-hl), params.rocker_stern, 1e-9));
    assert_eq!(curves.tip_envelope(hl), 0.0);
    assert!(approx_eq(curves.half_beam(hl), params.tip_min_radius, 1e-9));
    let tip_wall = (9.0 * params.wall_end_ratio).max(params.min_wall);
    assert!(approx_eq(curves.wall_thickness(hl), tip_wall, 1e-9));
    assert!(approx_eq(curves.shape_exponent(-hl), params.shape_exponent_tip, 1e-9));
    // the tip collapses to a small round section
    assert!(approx_eq(curves.top_z(hl) - curves.bottom_z(hl), params.tip_min_radius, 1e-9));
}

#[test]
fn reference_curves_are_continuous() {
    let params = default_params();
    assert!(HullCurves::new(&params).check_continuity().is_ok());
}

#[test]
fn curves_are_pure() {
    let params = default_params();
    let curves = HullCurves::new(&params);
    for x in [-70.0, -12.5, 0.0, 33.3, 71.0] {
        assert_eq!(curves.half_beam(x).to_bits(), curves.half_beam(x).to_bits());
        assert_eq!(curves.bottom_z(x).to_bits(), curves.bottom_z(x).to_bits());
    }
}

#[test]
fn non_finite_curve_is_rejected() {
    let mut params = default_params();
    params.sheer_rise_bow = Real::NAN;
    match HullCurves::new(&params).check_continuity() {
        Err(ContinuityError::CurveJump { function, delta, .. }) => {
            assert_eq!(function, "sheer_rise");
            assert!(delta.is_nan());
        },
        other => panic!("expected a curve jump, got {other:?}"),
    }
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    /// The keel is exactly flat over the flat zone.
    #[test]
    fn proptest_flat_zone_is_exact(params in arb_params(), t in -1.0..=1.0f64) {
        let curves = HullCurves::new(&params);
        let x = t * params.flat_half_length;
        prop_assert_eq!(curves.keel_lift(x), 0.0);
        prop_assert!(curves.bottom_z(x).abs() < 1e-9);
    }

    /// Beam never grows moving away from the widest station.
    #[test]
    fn proptest_beam_taper_is_monotonic(params in arb_params()) {
        let curves = HullCurves::new(&params);
        let hl = params.half_length();
        let offset = params.beam_max_offset;
        let n = 200;
        let mut previous = curves.beam_scale(offset);
        for i in 1..=n {
            let x = offset + (hl - offset) * i as Real / n as Real;
            let scale = curves.beam_scale(x);
            prop_assert!(scale <= previous + 1e-12, "bow side grows at x = {}", x);
            previous = scale;
        }
        previous = curves.beam_scale(offset);
        for i in 1..=n {
            let x = offset - (hl + offset) * i as Real / n as Real;
            let scale = curves.beam_scale(x);
            prop_assert!(scale <= previous + 1e-12, "stern side grows at x = {}", x);
            previous = scale;
        }
    }

    /// Sections stay open and walls respect the floor value everywhere.
    #[test]
    fn proptest_sections_are_well_formed(params in arb_params()) {
        let curves = HullCurves::new(&params);
        for x in samples(&params, 400) {
            prop_assert!(curves.top_z(x) > curves.bottom_z(x));
            prop_assert!(curves.half_beam(x) >= params.tip_min_radius - 1e-9);
            prop_assert!(curves.wall_thickness(x) >= params.min_wall);
            let envelope = curves.tip_envelope(x);
            prop_assert!((0.0..=1.0).contains(&envelope));
        }
    }

    /// Every in-range parameter combination yields continuous curves.
    #[test]
    fn proptest_curves_are_continuous(params in arb_params()) {
        prop_assert!(HullCurves::new(&params).check_continuity().is_ok());
    }
}
