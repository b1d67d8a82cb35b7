use std::f64::consts::TAU;

use super::arc_2d::{arc_from_bulge, BulgeArc};
use super::{Point2, Vector2, BULGE_EPSILON, TOLERANCE};

/// An intersection between two edges: the point and the parameter on each.
pub type EdgeHit = (Point2, f64, f64);

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = d1.perp(d2);
    if cross.abs() < TOLERANCE {
        return None;
    }
    let delta = p2 - p1;
    let t = delta.perp(d2) / cross;
    let u = delta.perp(d1) / cross;
    Some((t, u))
}

/// Bounded segment-segment intersection.
///
/// Returns `(intersection_point, t, u)` where `t` and `u` are in `[0, 1]`.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<EdgeHit> {
    let da = a1 - a0;
    let db = b1 - b0;
    let (t, u) = line_line_intersect_2d(a0, &da, b0, &db)?;

    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t = t.clamp(0.0, 1.0);
        Some((a0 + da * t, t, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Intersection of the segment `a0 → a1` with a circular arc.
///
/// Returns `(point, t_seg, t_arc)` hits with both parameters in `[0, 1]`.
#[must_use]
pub fn line_arc_intersect_2d(a0: &Point2, a1: &Point2, arc: &BulgeArc) -> Vec<EdgeHit> {
    let mut results = Vec::new();
    if arc.radius < TOLERANCE || arc.sweep.abs() < TOLERANCE {
        return results;
    }

    let d = a1 - a0;
    let seg_len_sq = d.norm_squared();
    if seg_len_sq < TOLERANCE * TOLERANCE {
        return results;
    }

    // Substitute the parametric line into the circle equation.
    let f = a0 - arc.center;
    let a = seg_len_sq;
    let b = 2.0 * f.dot(&d);
    let c = f.norm_squared() - arc.radius * arc.radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < -TOLERANCE {
        return results;
    }
    let disc_sqrt = discriminant.max(0.0).sqrt();

    let roots = if disc_sqrt < TOLERANCE * 100.0 {
        vec![-b / (2.0 * a)]
    } else {
        vec![(-b - disc_sqrt) / (2.0 * a), (-b + disc_sqrt) / (2.0 * a)]
    };

    for t_seg in roots {
        if t_seg < -TOLERANCE || t_seg > 1.0 + TOLERANCE {
            continue;
        }
        let t_seg = t_seg.clamp(0.0, 1.0);
        let pt = a0 + d * t_seg;
        let angle = (pt.y - arc.center.y).atan2(pt.x - arc.center.x);
        if let Some(t_arc) = angle_to_arc_param(angle, arc.start_angle, arc.sweep) {
            results.push((pt, t_seg, t_arc));
        }
    }

    results
}

/// Intersection of two circular arcs.
///
/// Returns `(point, t1, t2)` hits with arc parameters in `[0, 1]`.
#[must_use]
pub fn arc_arc_intersect_2d(arc1: &BulgeArc, arc2: &BulgeArc) -> Vec<EdgeHit> {
    let mut results = Vec::new();
    let (r1, r2) = (arc1.radius, arc2.radius);
    if r1 < TOLERANCE || r2 < TOLERANCE {
        return results;
    }

    let delta = arc2.center - arc1.center;
    let dist_sq = delta.norm_squared();
    let dist = dist_sq.sqrt();

    // Concentric circles have no isolated intersection points.
    if dist < TOLERANCE {
        return results;
    }
    if dist > r1 + r2 + TOLERANCE || dist < (r1 - r2).abs() - TOLERANCE {
        return results;
    }

    // Distance from centre 1 along the centre line to the radical line.
    let a = (r1 * r1 - r2 * r2 + dist_sq) / (2.0 * dist);
    let h_sq = r1 * r1 - a * a;
    if h_sq < -TOLERANCE {
        return results;
    }
    let h = h_sq.max(0.0).sqrt();

    let axis = delta / dist;
    let mid = arc1.center + axis * a;
    let perp = Vector2::new(-axis.y, axis.x);

    let candidates = if h < TOLERANCE {
        vec![mid]
    } else {
        vec![mid + perp * h, mid - perp * h]
    };

    for pt in candidates {
        let angle1 = (pt.y - arc1.center.y).atan2(pt.x - arc1.center.x);
        let angle2 = (pt.y - arc2.center.y).atan2(pt.x - arc2.center.x);
        let t1 = angle_to_arc_param(angle1, arc1.start_angle, arc1.sweep);
        let t2 = angle_to_arc_param(angle2, arc2.start_angle, arc2.sweep);
        if let (Some(t1), Some(t2)) = (t1, t2) {
            results.push((pt, t1, t2));
        }
    }

    results
}

/// Intersects two bulge edges `a0 → a1` (bulge `ba`) and `b0 → b1` (bulge `bb`).
///
/// Dispatches to the line-line, line-arc or arc-arc routine. Parameters are
/// reported in the order of the arguments.
#[must_use]
pub fn edge_edge_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    ba: f64,
    b0: &Point2,
    b1: &Point2,
    bb: f64,
) -> Vec<EdgeHit> {
    let a_is_arc = ba.abs() >= BULGE_EPSILON;
    let b_is_arc = bb.abs() >= BULGE_EPSILON;
    match (a_is_arc, b_is_arc) {
        (false, false) => segment_segment_intersect_2d(a0, a1, b0, b1)
            .into_iter()
            .collect(),
        (false, true) => line_arc_intersect_2d(a0, a1, &arc_from_bulge(b0, b1, bb)),
        (true, false) => line_arc_intersect_2d(b0, b1, &arc_from_bulge(a0, a1, ba))
            .into_iter()
            .map(|(pt, t_line, t_arc)| (pt, t_arc, t_line))
            .collect(),
        (true, true) => {
            arc_arc_intersect_2d(&arc_from_bulge(a0, a1, ba), &arc_from_bulge(b0, b1, bb))
        }
    }
}

/// Converts an absolute angle to an arc parameter `t` in `[0, 1]`.
///
/// Returns `None` if the angle is not within the arc's angular range.
pub(crate) fn angle_to_arc_param(angle: f64, start_angle: f64, sweep: f64) -> Option<f64> {
    let eps = TOLERANCE * 100.0;
    let mut delta = angle - start_angle;

    if sweep > 0.0 {
        while delta < -eps {
            delta += TAU;
        }
        while delta > TAU + eps {
            delta -= TAU;
        }
    } else {
        while delta > eps {
            delta -= TAU;
        }
        while delta < -TAU - eps {
            delta += TAU;
        }
    }

    let t = delta / sweep;
    if t >= -eps && t <= 1.0 + eps {
        Some(t.clamp(0.0, 1.0))
    } else {
        None
    }
}
