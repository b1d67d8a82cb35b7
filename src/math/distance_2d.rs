use super::arc_2d::BulgeArc;
use super::intersect_2d::angle_to_arc_param;
use super::Point2;

/// Returns the minimum distance from `pt` to the segment `a → b`.
#[must_use]
pub fn point_to_segment_dist(pt: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < 1e-20 {
        return (pt - a).norm();
    }

    // Project onto the infinite line, clamp to the segment.
    let t = ((pt - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    (pt - (a + d * t)).norm()
}

/// Returns the minimum distance from `pt` to a circular arc.
///
/// Inside the arc's angular range the distance is `||pt - center| - radius|`;
/// outside it is the distance to the nearer arc endpoint.
#[must_use]
pub fn point_to_arc_dist(pt: &Point2, arc: &BulgeArc) -> f64 {
    let offset = pt - arc.center;
    let angle = offset.y.atan2(offset.x);
    if angle_to_arc_param(angle, arc.start_angle, arc.sweep).is_some() {
        return (offset.norm() - arc.radius).abs();
    }

    let d0 = (pt - arc.point_at(0.0)).norm();
    let d1 = (pt - arc.point_at(1.0)).norm();
    d0.min(d1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const TOL: f64 = 1e-10;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn upper_semicircle() -> BulgeArc {
        BulgeArc {
            center: p(0.0, 0.0),
            radius: 1.0,
            start_angle: 0.0,
            sweep: PI,
        }
    }

    #[test]
    fn segment_dist_perpendicular_projection() {
        let d = point_to_segment_dist(&p(1.0, 1.0), &p(0.0, 0.0), &p(2.0, 0.0));
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn segment_dist_endpoint_closest() {
        let d = point_to_segment_dist(&p(-1.0, 0.0), &p(0.0, 0.0), &p(2.0, 0.0));
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn segment_dist_degenerate() {
        let d = point_to_segment_dist(&p(3.0, 4.0), &p(0.0, 0.0), &p(0.0, 0.0));
        assert!((d - 5.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn arc_dist_in_range() {
        let d = point_to_arc_dist(&p(0.0, 2.0), &upper_semicircle());
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn arc_dist_outside_range() {
        // Below the upper half: nearest points are the endpoints (±1, 0).
        let d = point_to_arc_dist(&p(0.0, -2.0), &upper_semicircle());
        assert!((d - 5.0_f64.sqrt()).abs() < 1e-6, "d={d}");
    }

    #[test]
    fn arc_dist_at_center() {
        let d = point_to_arc_dist(&p(0.0, 0.0), &upper_semicircle());
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }
}
