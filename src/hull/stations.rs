//! Superellipse cross sections placed along the hull length.
//!
//! A [`Profile`] is a closed, convex, counter-clockwise polygon in the `(y, z)`
//! plane: the lower half of a superellipse centered on the rim, closed across
//! the top. Cavity profiles are insets of the lofted outer section at their
//! `x`, so the cavity nests in the piecewise-linear shell it is subtracted
//! from. They carry a lid above the rim so the subtracted cavity opens the
//! deck.

use crate::errors::ContinuityError;
use crate::float_types::{PI, Real};
use crate::hull::curves::HullCurves;
use nalgebra::Point2;
use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Step count of the cavity end scan, per half length.
const EXTENT_SCAN_STEPS: usize = 400;

/// Bisection rounds after the scan brackets a cavity end.
const EXTENT_BISECTION_ROUNDS: usize = 48;

/// Sub-intervals sampled between neighbouring stations when measuring how far
/// the generating curves move.
const JUMP_SUBSTEPS: usize = 8;

/// Allowed station-to-station change, relative to the change of the curves
/// over the same interval.
const JUMP_SLACK: Real = 1.5;

/// Absolute allowance on top of the slack, for attributes held constant.
const JUMP_FLOOR: Real = 1e-6;

/// Relative heights (rim = 1) where the cavity is checked against the outer loft.
const CROSSING_LEVELS: [Real; 5] = [0.05, 0.25, 0.5, 0.75, 0.95];

/// Which lofted surface a station belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Surface {
    Outer,
    Cavity,
}

impl Surface {
    pub const fn label(self) -> &'static str {
        match self {
            Surface::Outer => "outer",
            Surface::Cavity => "cavity",
        }
    }
}

/// One cross section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    /// Rim height; the superellipse center.
    pub center_z: Real,
    pub half_width: Real,
    /// Vertical semi-axis, from the rim down.
    pub height: Real,
    pub exponent: Real,
    /// Straight extension above the rim.
    pub top_extension: Real,
    pub points: Vec<Point2<Real>>,
}

/// `sign(v) * |v|^e`, snapping values within rounding of zero.
fn signed_pow(v: Real, e: Real) -> Real {
    if v.abs() < 1e-12 { 0.0 } else { v.signum() * v.abs().powf(e) }
}

impl Profile {
    /// Lower half superellipse with `segments` arc segments, listed from
    /// `(-half_width, center_z)` through the bottom to `(half_width, center_z)`.
    pub fn superellipse(
        center_z: Real,
        half_width: Real,
        height: Real,
        exponent: Real,
        segments: usize,
    ) -> Profile {
        let e = 2.0 / exponent;
        let points = (0..=segments)
            .map(|k| {
                let theta = PI + PI * k as Real / segments as Real;
                let (s, c) = if k == 0 || k == segments {
                    (0.0, theta.cos().signum())
                } else {
                    theta.sin_cos()
                };
                Point2::new(half_width * signed_pow(c, e), center_z + height * signed_pow(s, e))
            })
            .collect();
        Profile { center_z, half_width, height, exponent, top_extension: 0.0, points }
    }

    /// This rim-closed profile shrunk by `wall` at the rim and by `floor` at
    /// the bottom, scaled about the rim center, with a lid `top_extension`
    /// above the rim.
    ///
    /// The inset keeps the point count. Its rim corners give way to the lid
    /// corners, so no inset vertex lies on the rim line of `self`. `None`
    /// once either axis collapses.
    pub fn inset(&self, wall: Real, floor: Real, top_extension: Real) -> Option<Profile> {
        let half_width = self.half_width - wall;
        let height = self.height - floor;
        if half_width <= 0.0 || height <= 0.0 || self.points.len() < 3 {
            return None;
        }
        let (sy, sz) = (half_width / self.half_width, height / self.height);
        let last = self.points.len() - 1;
        let mut points: Vec<Point2<Real>> = self.points[1..last]
            .iter()
            .map(|q| Point2::new(q.x * sy, self.center_z + (q.y - self.center_z) * sz))
            .collect();
        let lid = self.center_z + top_extension;
        points.push(Point2::new(half_width, lid));
        points.push(Point2::new(-half_width, lid));
        Some(Profile {
            center_z: self.center_z,
            half_width,
            height,
            exponent: self.exponent,
            top_extension,
            points,
        })
    }

    pub fn bottom_z(&self) -> Real {
        self.center_z - self.height
    }

    /// Signed shoelace area; positive for counter-clockwise loops.
    pub fn area(&self) -> Real {
        polygon_area(&self.points)
    }
}

/// Signed area of a closed `(y, z)` loop.
pub fn polygon_area(points: &[Point2<Real>]) -> Real {
    let n = points.len();
    (0..n)
        .map(|i| {
            let (p, q) = (points[i], points[(i + 1) % n]);
            p.x * q.y - q.x * p.y
        })
        .sum::<Real>()
        * 0.5
}

/// Largest `y` where the closed loop crosses height `z`.
pub fn half_width_at(points: &[Point2<Real>], z: Real) -> Option<Real> {
    let n = points.len();
    let mut best: Option<Real> = None;
    for i in 0..n {
        let (p, q) = (points[i], points[(i + 1) % n]);
        if (p.y - z) * (q.y - z) > 0.0 {
            continue;
        }
        let y = if (q.y - p.y).abs() < Real::EPSILON {
            p.x.max(q.x)
        } else {
            p.x + (q.x - p.x) * (z - p.y) / (q.y - p.y)
        };
        best = Some(best.map_or(y, |b| b.max(y)));
    }
    best
}

/// Lowest `z` where the closed loop crosses lateral position `y`.
pub fn bottom_at(points: &[Point2<Real>], y: Real) -> Option<Real> {
    let n = points.len();
    let mut best: Option<Real> = None;
    for i in 0..n {
        let (p, q) = (points[i], points[(i + 1) % n]);
        if (p.x - y) * (q.x - y) > 0.0 {
            continue;
        }
        let z = if (q.x - p.x).abs() < Real::EPSILON {
            p.y.min(q.y)
        } else {
            p.y + (q.y - p.y) * (y - p.x) / (q.x - p.x)
        };
        best = Some(best.map_or(z, |b| b.min(z)));
    }
    best
}

/// A profile placed at a longitudinal position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub index: usize,
    pub x: Real,
    pub profile: Profile,
}

/// `count` positions from `start` to `end`, endpoints exact.
///
/// Cosine spacing clusters positions toward both ends, where the tip envelope
/// changes fastest.
pub fn station_positions(start: Real, end: Real, count: usize, cosine: bool) -> Vec<Real> {
    let last = count.saturating_sub(1).max(1) as Real;
    let mid = 0.5 * (start + end);
    let half = 0.5 * (end - start);
    (0..count)
        .map(|i| {
            if i == 0 {
                start
            } else if i + 1 == count {
                end
            } else if cosine {
                mid - half * (PI * i as Real / last).cos()
            } else {
                start + (end - start) * i as Real / last
            }
        })
        .collect()
}

/// Longitudinal extent `(stern_end, bow_end)` of the cavity inside the
/// lofted `outer` stations.
///
/// Each end is the furthest position where the inset loft section keeps at
/// least `cavity_min_half_width` in both directions, limited so the end wall
/// is no thinner than the tapered wall at the tip.
pub fn cavity_extent(
    curves: &HullCurves<'_>,
    outer: &[Station],
) -> Result<(Real, Real), ContinuityError> {
    let p = curves.params();
    let hl = p.half_length();
    let room = |x: Real| {
        section_at(outer, x).map_or(Real::NEG_INFINITY, |section| {
            let lateral = section.half_width - curves.wall_thickness(x);
            let vertical = section.height - p.floor_thickness;
            lateral.min(vertical) - p.cavity_min_half_width
        })
    };
    if room(0.0) < 0.0 {
        return Err(ContinuityError::CavityCollapsed { x: 0.0 });
    }

    let end_for = |direction: Real| {
        let step = hl / EXTENT_SCAN_STEPS as Real;
        let mut inside = 0.0;
        let mut found = hl;
        for i in 1..=EXTENT_SCAN_STEPS {
            let d = step * i as Real;
            if room(direction * d) < 0.0 {
                let mut outside = d;
                for _ in 0..EXTENT_BISECTION_ROUNDS {
                    let mid = 0.5 * (inside + outside);
                    if room(direction * mid) >= 0.0 {
                        inside = mid;
                    } else {
                        outside = mid;
                    }
                }
                found = inside;
                break;
            }
            inside = d;
        }
        let end_wall = curves.wall_thickness(direction * hl);
        found.min(hl - end_wall)
    };

    Ok((-end_for(-1.0), end_for(1.0)))
}

/// Neighbouring stations around `x` and the blend factor between them.
fn bracket(stations: &[Station], x: Real) -> Option<(&Station, &Station, Real)> {
    let first = stations.first()?;
    let last = stations.last()?;
    if x < first.x || x > last.x {
        return None;
    }
    let upper = stations.iter().position(|s| s.x >= x)?;
    if upper == 0 {
        return Some((first, first, 0.0));
    }
    let (a, b) = (&stations[upper - 1], &stations[upper]);
    Some((a, b, (x - a.x) / (b.x - a.x)))
}

fn blend(a: &[Point2<Real>], b: &[Point2<Real>], t: Real) -> Vec<Point2<Real>> {
    a.iter().zip(b).map(|(p, q)| p + (q - p) * t).collect()
}

/// Pointwise linear interpolation of a station sequence at `x`, the same
/// blend the loft uses between neighbouring stations.
pub fn interpolate(stations: &[Station], x: Real) -> Option<Vec<Point2<Real>>> {
    let (a, b, t) = bracket(stations, x)?;
    Some(blend(&a.profile.points, &b.profile.points, t))
}

/// Loft section at `x` of a sequence of rim-closed profiles, as a profile.
pub fn section_at(stations: &[Station], x: Real) -> Option<Profile> {
    let (a, b, t) = bracket(stations, x)?;
    let points = blend(&a.profile.points, &b.profile.points, t);
    let center_z = points.first()?.y;
    let half_width = points.last()?.x;
    let bottom = points.iter().map(|q| q.y).fold(Real::INFINITY, Real::min);
    Some(Profile {
        center_z,
        half_width,
        height: center_z - bottom,
        exponent: a.profile.exponent + (b.profile.exponent - a.profile.exponent) * t,
        top_extension: 0.0,
        points,
    })
}

/// Outer and cavity station sequences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationSet {
    pub outer: Vec<Station>,
    pub cavity: Vec<Station>,
    /// `(stern_end, bow_end)` of the cavity.
    pub cavity_extent: (Real, Real),
}

impl StationSet {
    /// Build and check both station sequences.
    pub fn generate(curves: &HullCurves<'_>) -> Result<Self, ContinuityError> {
        let p = curves.params();
        let hl = p.half_length();
        let segments = p.profile_segments;
        let cosine = p.station_spacing_cosine;

        let outer_x = station_positions(-hl, hl, p.station_count, cosine);
        let outer = build_stations(&outer_x, |x| {
            let top = curves.top_z(x);
            Ok(Profile::superellipse(
                top,
                curves.half_beam(x),
                top - curves.bottom_z(x),
                curves.shape_exponent(x),
                segments,
            ))
        })?;
        check_sequence(&outer, |x| {
            Some([
                curves.half_beam(x),
                curves.top_z(x) - curves.bottom_z(x),
                curves.shape_exponent(x),
            ])
        })?;

        let cavity_extent = cavity_extent(curves, &outer)?;
        let cavity_profile = |x: Real| {
            section_at(&outer, x).and_then(|section| {
                section.inset(curves.wall_thickness(x), p.floor_thickness, p.cavity_overcut)
            })
        };
        let cavity_x = station_positions(cavity_extent.0, cavity_extent.1, p.station_count, cosine);
        let cavity = build_stations(&cavity_x, |x| {
            cavity_profile(x).ok_or(ContinuityError::CavityCollapsed { x })
        })?;
        check_sequence(&cavity, |x| {
            cavity_profile(x).map(|c| [c.half_width, c.height, c.exponent])
        })?;

        let set = StationSet { outer, cavity, cavity_extent };
        set.check_cavity_inside(p.min_wall * 0.5)?;
        Ok(set)
    }

    /// Outer loft section at `x`, if `x` lies on the hull.
    pub fn outer_section(&self, x: Real) -> Option<Vec<Point2<Real>>> {
        interpolate(&self.outer, x)
    }

    /// Cavity loft section at `x`, if `x` lies within the cavity.
    pub fn cavity_section(&self, x: Real) -> Option<Vec<Point2<Real>>> {
        interpolate(&self.cavity, x)
    }

    /// The cavity loft must sit inside the outer loft with `required`
    /// millimetres to spare, laterally and under the floor, at every cavity
    /// station and halfway to the next.
    fn check_cavity_inside(&self, required: Real) -> Result<(), ContinuityError> {
        for (i, station) in self.cavity.iter().enumerate() {
            self.check_section_inside(station.index, station.x, required)?;
            if let Some(next) = self.cavity.get(i + 1) {
                self.check_section_inside(station.index, 0.5 * (station.x + next.x), required)?;
            }
        }
        Ok(())
    }

    fn check_section_inside(
        &self,
        index: usize,
        x: Real,
        required: Real,
    ) -> Result<(), ContinuityError> {
        let crossing = |attribute, margin: Real| {
            if margin < required {
                Err(ContinuityError::ProfileCrossing { index, x, attribute, margin, required })
            } else {
                Ok(())
            }
        };
        let (Some(outer), Some(inner)) = (self.outer_section(x), self.cavity_section(x)) else {
            return crossing("extent", Real::NEG_INFINITY);
        };

        let floor = match (bottom_at(&inner, 0.0), bottom_at(&outer, 0.0)) {
            (Some(a), Some(b)) => a - b,
            _ => Real::NEG_INFINITY,
        };
        crossing("floor", floor)?;

        let bottom = inner.iter().map(|q| q.y).fold(Real::INFINITY, Real::min);
        let rim = outer.first().map_or(bottom, |q| q.y);
        for level in CROSSING_LEVELS {
            let z = bottom + (rim - bottom) * level;
            let lateral = match (half_width_at(&outer, z), half_width_at(&inner, z)) {
                (Some(a), Some(b)) => a - b,
                _ => Real::NEG_INFINITY,
            };
            crossing("half_width", lateral)?;
        }
        Ok(())
    }
}

fn build_stations<F>(xs: &[Real], profile: F) -> Result<Vec<Station>, ContinuityError>
where
    F: Fn(Real) -> Result<Profile, ContinuityError> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    let iter = xs.par_iter().enumerate();
    #[cfg(not(feature = "parallel"))]
    let iter = xs.iter().enumerate();

    iter.map(|(index, &x)| Ok(Station { index, x, profile: profile(x)? })).collect()
}

/// Variation of each reference attribute over `[from, to]`.
fn reference_variation<F>(reference: &F, from: Real, to: Real) -> Option<[Real; 3]>
where
    F: Fn(Real) -> Option<[Real; 3]>,
{
    let mut total = [0.0; 3];
    let mut previous = reference(from)?;
    for j in 1..=JUMP_SUBSTEPS {
        let current = reference(from + (to - from) * j as Real / JUMP_SUBSTEPS as Real)?;
        for k in 0..3 {
            total[k] += (current[k] - previous[k]).abs();
        }
        previous = current;
    }
    Some(total)
}

/// Check a station sequence for non-finite values, ordering and jumps.
///
/// `reference(x)` gives `[half_width, height, exponent]` of the profile the
/// curves call for at `x`. Neighbouring stations may differ in an attribute by
/// at most `JUMP_SLACK` times the variation of the reference between them, so
/// steep tips pass while a station that strays from the curves does not.
pub fn check_sequence<F>(stations: &[Station], reference: F) -> Result<(), ContinuityError>
where
    F: Fn(Real) -> Option<[Real; 3]>,
{
    for (i, station) in stations.iter().enumerate() {
        let p = &station.profile;
        for (attribute, value) in [
            ("x", station.x),
            ("center_z", p.center_z),
            ("half_width", p.half_width),
            ("height", p.height),
            ("exponent", p.exponent),
        ] {
            if !value.is_finite() {
                return Err(ContinuityError::NonFinite { index: i, attribute });
            }
        }
        if p.points.iter().any(|q| !q.x.is_finite() || !q.y.is_finite()) {
            return Err(ContinuityError::NonFinite { index: i, attribute: "points" });
        }

        let Some(prev) = i.checked_sub(1).map(|j| &stations[j]) else {
            continue;
        };
        if station.x <= prev.x {
            return Err(ContinuityError::NonIncreasingStations {
                index: i,
                x: station.x,
                previous: prev.x,
            });
        }
        let variation = reference_variation(&reference, prev.x, station.x)
            .ok_or(ContinuityError::NonFinite { index: i, attribute: "reference" })?;
        for (k, (attribute, delta)) in [
            ("half_width", p.half_width - prev.profile.half_width),
            ("height", p.height - prev.profile.height),
            ("exponent", p.exponent - prev.profile.exponent),
        ]
        .into_iter()
        .enumerate()
        {
            let limit = JUMP_SLACK * variation[k] + JUMP_FLOOR;
            if delta.abs() > limit {
                return Err(ContinuityError::Discontinuity {
                    index: i,
                    attribute,
                    delta: delta.abs(),
                    limit,
                });
            }
        }
    }
    Ok(())
}
