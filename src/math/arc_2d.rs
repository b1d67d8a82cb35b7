//! 2D arc/bulge math utilities.
//!
//! Bulge convention: `bulge = tan(sweep_angle / 4)`.
//! - `bulge = 0`: straight line
//! - `bulge > 0`: counter-clockwise arc
//! - `bulge < 0`: clockwise arc
//! - `|bulge| = 1`: semicircle
use std::f64::consts::TAU;

use super::{Point2, Vector2, BULGE_EPSILON};

/// A circular arc recovered from a bulge-encoded edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulgeArc {
    pub center: Point2,
    pub radius: f64,
    /// Angle of the edge's start point around `center`.
    pub start_angle: f64,
    /// Signed sweep; positive is counter-clockwise.
    pub sweep: f64,
}

impl BulgeArc {
    /// Evaluates a point on the arc at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        let angle = self.start_angle + self.sweep * t;
        Point2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    /// Unit tangent at parameter `t`, pointing in the direction of increasing `t`.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vector2 {
        let angle = self.start_angle + self.sweep * t;
        let sign = if self.sweep >= 0.0 { 1.0 } else { -1.0 };
        // Tangent to circle at angle θ is (-sin θ, cos θ) for CCW; negate for CW.
        Vector2::new(-sign * angle.sin(), sign * angle.cos())
    }

    /// Arc length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius * self.sweep.abs()
    }
}

/// Converts a bulge-defined edge to center-radius-angle form.
///
/// Zero-length chords give a zero-radius arc centred on `p0`.
#[must_use]
pub fn arc_from_bulge(p0: &Point2, p1: &Point2, bulge: f64) -> BulgeArc {
    let chord = p1 - p0;
    let chord_len = chord.norm();

    if chord_len < BULGE_EPSILON || bulge.abs() < BULGE_EPSILON {
        return BulgeArc {
            center: *p0,
            radius: 0.0,
            start_angle: 0.0,
            sweep: 0.0,
        };
    }

    // Distance from chord midpoint to center, as a multiple of half the chord.
    let sagitta_ratio = (1.0 - bulge * bulge) / (2.0 * bulge);
    let mid = nalgebra::center(p0, p1);

    // Normal to chord pointing toward center (for positive bulge, center is left of chord).
    let normal = Vector2::new(-chord.y, chord.x) / chord_len;
    let center = mid + normal * (sagitta_ratio * chord_len * 0.5);

    // r = d*(1+b²)/(4*|b|) derived from r = d/(2*sin(θ/2)) with θ=4*atan(b)
    let radius = (chord_len * 0.5) * (1.0 + bulge * bulge) / (2.0 * bulge.abs());
    let start_angle = (p0.y - center.y).atan2(p0.x - center.x);

    BulgeArc {
        center,
        radius,
        start_angle,
        sweep: 4.0 * bulge.atan(),
    }
}

/// Bulge of an edge sweeping `sweep` radians (signed).
#[must_use]
pub fn bulge_from_sweep(sweep: f64) -> f64 {
    (sweep / 4.0).tan()
}

/// Normalizes an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Signed area between an arc edge and its chord (the circular segment).
///
/// Positive for counter-clockwise arcs. Adding this to the shoelace area of
/// the vertex polygon gives the exact area enclosed by a bulge loop.
#[must_use]
pub fn arc_segment_area(p0: &Point2, p1: &Point2, bulge: f64) -> f64 {
    if bulge.abs() < BULGE_EPSILON {
        return 0.0;
    }
    let arc = arc_from_bulge(p0, p1, bulge);
    let theta = arc.sweep;
    0.5 * arc.radius * arc.radius * (theta - theta.sin())
}

/// Offsets an arc edge by `distance` to the left of its traversal direction.
///
/// Left of a counter-clockwise arc is toward the centre, so its radius
/// shrinks; a clockwise arc grows. Returns `None` if the offset radius would
/// be ≤ 0 (arc collapses).
///
/// Returns `(start, end, bulge)`; the bulge is unchanged because the sweep is.
#[must_use]
pub fn offset_arc_segment(
    p0: &Point2,
    p1: &Point2,
    bulge: f64,
    distance: f64,
) -> Option<(Point2, Point2, f64)> {
    let arc = arc_from_bulge(p0, p1, bulge);
    if arc.radius < BULGE_EPSILON {
        return None;
    }

    let sign = if bulge > 0.0 { 1.0 } else { -1.0 };
    let new_radius = arc.radius - sign * distance;
    if new_radius <= BULGE_EPSILON {
        return None;
    }

    let shifted = BulgeArc {
        radius: new_radius,
        ..arc
    };
    Some((shifted.point_at(0.0), shifted.point_at(1.0), bulge))
}
