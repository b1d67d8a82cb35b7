use crate::error::{GeometryError, Result};
use crate::math::arc_2d::{arc_from_bulge, bulge_from_sweep, normalize_angle};
use crate::math::{points_coincide, Point2, Vector2, BULGE_EPSILON, TOLERANCE};

/// Orientation of an arc's plane normal relative to the working plane (+Z).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalSign {
    Positive,
    Negative,
}

impl NormalSign {
    /// Returns `1.0` or `-1.0`.
    #[must_use]
    pub fn signum(self) -> f64 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
        }
    }

    /// Classifies the z component of a plane normal.
    #[must_use]
    pub fn from_z(z: f64) -> Self {
        if z < 0.0 {
            Self::Negative
        } else {
            Self::Positive
        }
    }
}

/// Direction in which a fragment is walked when it is added to a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    Forward,
    Reversed,
}

/// A straight line fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentFragment {
    start: Point2,
    end: Point2,
}

impl SegmentFragment {
    /// Creates a segment.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for NaN/infinite coordinates and
    /// `GeometryError::Degenerate` if the endpoints coincide.
    pub fn new(start: Point2, end: Point2) -> Result<Self> {
        if !(start.x.is_finite() && start.y.is_finite() && end.x.is_finite() && end.y.is_finite()) {
            return Err(GeometryError::NonFinite("segment endpoint").into());
        }
        if points_coincide(&start, &end, TOLERANCE) {
            return Err(GeometryError::Degenerate("segment endpoints coincide".into()).into());
        }
        Ok(Self { start, end })
    }
}

/// A circular arc fragment.
///
/// Angles are measured in the arc's own plane and sweep counter-clockwise
/// about its normal from `start_angle` to `end_angle`. With a negative normal
/// the plane's x axis is mirrored, so the arc runs clockwise in the working
/// plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcFragment {
    center: Point2,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    normal: NormalSign,
    start: Point2,
    end: Point2,
}

impl ArcFragment {
    /// Creates an arc from its centre (in the working plane), radius, plane
    /// angles and normal orientation.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for non-finite input and
    /// `GeometryError::Degenerate` for a non-positive radius, or when the
    /// start and end points coincide (zero sweep or a full circle).
    pub fn new(
        center: Point2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        normal: NormalSign,
    ) -> Result<Self> {
        if ![center.x, center.y, radius, start_angle, end_angle]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(GeometryError::NonFinite("arc").into());
        }
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("arc radius must be positive".into()).into());
        }

        let start = plane_point(&center, radius, start_angle, normal);
        let end = plane_point(&center, radius, end_angle, normal);
        if points_coincide(&start, &end, TOLERANCE) {
            return Err(GeometryError::Degenerate("arc endpoints coincide".into()).into());
        }

        Ok(Self {
            center,
            radius,
            start_angle,
            end_angle,
            normal,
            start,
            end,
        })
    }

    /// Returns the arc centre.
    #[must_use]
    pub fn center(&self) -> &Point2 {
        &self.center
    }

    /// Returns the arc radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the plane normal orientation.
    #[must_use]
    pub fn normal(&self) -> NormalSign {
        self.normal
    }

    /// Swept angle in `[0, 2π)`, measured about the arc's own normal.
    #[must_use]
    pub fn included_angle(&self) -> f64 {
        normalize_angle(self.end_angle - self.start_angle)
    }

    /// Signed sweep in the working plane (negative when the normal is flipped).
    #[must_use]
    pub fn signed_sweep(&self) -> f64 {
        self.normal.signum() * self.included_angle()
    }
}

/// Maps a plane angle to a point in the working plane.
///
/// A `-Z` normal gives the plane x axis `(-1, 0)` and y axis `(0, 1)`.
fn plane_point(center: &Point2, radius: f64, angle: f64, normal: NormalSign) -> Point2 {
    Point2::new(
        center.x + normal.signum() * radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

/// A curve fragment: either a straight segment or a circular arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveFragment {
    Segment(SegmentFragment),
    Arc(ArcFragment),
}

impl CurveFragment {
    /// Creates a segment fragment. See [`SegmentFragment::new`].
    ///
    /// # Errors
    ///
    /// Returns an error if the segment is degenerate.
    pub fn segment(start: Point2, end: Point2) -> Result<Self> {
        SegmentFragment::new(start, end).map(Self::Segment)
    }

    /// Creates an arc fragment. See [`ArcFragment::new`].
    ///
    /// # Errors
    ///
    /// Returns an error if the arc is degenerate.
    pub fn arc(
        center: Point2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        normal: NormalSign,
    ) -> Result<Self> {
        ArcFragment::new(center, radius, start_angle, end_angle, normal).map(Self::Arc)
    }

    /// Builds the fragment for a bulge-encoded edge `start → end`.
    ///
    /// Clockwise arcs (negative bulge) are expressed with a negative normal so
    /// their stored direction still runs from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is degenerate.
    pub fn from_bulge(start: Point2, end: Point2, bulge: f64) -> Result<Self> {
        if bulge.abs() < BULGE_EPSILON {
            return Self::segment(start, end);
        }
        let arc = arc_from_bulge(&start, &end, bulge);
        let normal = NormalSign::from_z(bulge);
        let unmirror = normal.signum();
        let plane_angle = |p: &Point2| (p.y - arc.center.y).atan2(unmirror * (p.x - arc.center.x));
        let start_angle = plane_angle(&start);
        let end_angle = plane_angle(&end);
        let mut fragment = ArcFragment::new(arc.center, arc.radius, start_angle, end_angle, normal)?;
        // Pin the endpoints to the exact input so chained edges still meet.
        fragment.start = start;
        fragment.end = end;
        Ok(Self::Arc(fragment))
    }

    /// Stored start point.
    #[must_use]
    pub fn start(&self) -> Point2 {
        match self {
            Self::Segment(s) => s.start,
            Self::Arc(a) => a.start,
        }
    }

    /// Stored end point.
    #[must_use]
    pub fn end(&self) -> Point2 {
        match self {
            Self::Segment(s) => s.end,
            Self::Arc(a) => a.end,
        }
    }

    /// Endpoints in the given traversal order.
    #[must_use]
    pub fn endpoints(&self, traversal: Traversal) -> (Point2, Point2) {
        match traversal {
            Traversal::Forward => (self.start(), self.end()),
            Traversal::Reversed => (self.end(), self.start()),
        }
    }

    /// Bulge for the edge this fragment contributes when walked in `traversal`.
    ///
    /// Segments are always 0. For arcs, `tan(Δθ/4)` with Δθ the included
    /// angle, negated for a negative normal and again for reversed traversal.
    #[must_use]
    pub fn bulge(&self, traversal: Traversal) -> f64 {
        match self {
            Self::Segment(_) => 0.0,
            Self::Arc(a) => {
                let b = bulge_from_sweep(a.signed_sweep());
                match traversal {
                    Traversal::Forward => b,
                    Traversal::Reversed => -b,
                }
            }
        }
    }

    /// Curve length.
    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Self::Segment(s) => (s.end - s.start).norm(),
            Self::Arc(a) => a.radius * a.included_angle(),
        }
    }

    /// Point halfway along the curve.
    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        match self {
            Self::Segment(s) => nalgebra::center(&s.start, &s.end),
            Self::Arc(a) => {
                let mid_angle = a.start_angle + a.included_angle() * 0.5;
                plane_point(&a.center, a.radius, mid_angle, a.normal)
            }
        }
    }

    /// Unit tangent at the curve midpoint, in stored direction.
    #[must_use]
    pub fn midpoint_tangent(&self) -> Vector2 {
        match self {
            Self::Segment(s) => (s.end - s.start).normalize(),
            Self::Arc(a) => {
                let radial = self.midpoint() - a.center;
                // Rotate the radius 90° in the arc's working-plane direction.
                let tangent = Vector2::new(-radial.y, radial.x) * a.normal.signum();
                tangent / a.radius
            }
        }
    }

    /// Returns `true` if both endpoints lie within `tolerance` of each other.
    #[must_use]
    pub fn is_degenerate(&self, tolerance: f64) -> bool {
        points_coincide(&self.start(), &self.end(), tolerance)
    }

    /// Returns `true` for arc fragments.
    #[must_use]
    pub fn is_arc(&self) -> bool {
        matches!(self, Self::Arc(_))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn segment_rejects_coincident_endpoints() {
        assert!(CurveFragment::segment(p(1.0, 1.0), p(1.0, 1.0)).is_err());
    }

    #[test]
    fn segment_rejects_nan() {
        assert!(CurveFragment::segment(p(f64::NAN, 0.0), p(1.0, 1.0)).is_err());
    }

    #[test]
    fn segment_has_zero_bulge_both_ways() {
        let s = CurveFragment::segment(p(0.0, 0.0), p(3.0, 4.0)).unwrap();
        assert!(s.bulge(Traversal::Forward).abs() < 1e-15);
        assert!(s.bulge(Traversal::Reversed).abs() < 1e-15);
        assert_abs_diff_eq!(s.length(), 5.0, epsilon = 1e-12);
        let t = s.midpoint_tangent();
        assert_abs_diff_eq!(t.x, 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(t.y, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn ccw_quarter_arc_bulge() {
        let a = CurveFragment::arc(p(0.0, 0.0), 1.0, 0.0, FRAC_PI_2, NormalSign::Positive).unwrap();
        assert_abs_diff_eq!(a.start().x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(a.end().y, 1.0, epsilon = 1e-12);
        let expected = (PI / 8.0).tan();
        assert_abs_diff_eq!(a.bulge(Traversal::Forward), expected, epsilon = 1e-12);
        assert_abs_diff_eq!(a.bulge(Traversal::Reversed), -expected, epsilon = 1e-12);
    }

    #[test]
    fn included_angle_wraps_across_zero() {
        // 3π/2 → π/2 counter-clockwise is a half turn through angle 0.
        let a = CurveFragment::arc(p(0.0, 0.0), 2.0, 1.5 * PI, 0.5 * PI, NormalSign::Positive)
            .unwrap();
        assert_abs_diff_eq!(a.bulge(Traversal::Forward), 1.0, epsilon = 1e-12);
        let mid = a.midpoint();
        assert_abs_diff_eq!(mid.x, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mid.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn negative_normal_flips_bulge_and_mirrors_points() {
        let a = CurveFragment::arc(p(0.0, 0.0), 1.0, 0.0, FRAC_PI_2, NormalSign::Negative).unwrap();
        // Plane x axis is (-1, 0): angle 0 lands at (-1, 0).
        assert_abs_diff_eq!(a.start().x, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(a.end().y, 1.0, epsilon = 1e-12);
        let expected = -(PI / 8.0).tan();
        assert_abs_diff_eq!(a.bulge(Traversal::Forward), expected, epsilon = 1e-12);
        // Going (-1,0) → (0,1) clockwise means the tangent at the midpoint points up-right.
        let t = a.midpoint_tangent();
        assert!(t.x > 0.0 && t.y > 0.0, "t={t:?}");
    }

    #[test]
    fn from_bulge_matches_edge() {
        for bulge in [0.5, -0.5, 1.0, -1.0, 2.0] {
            let f = CurveFragment::from_bulge(p(0.0, 0.0), p(2.0, 0.0), bulge).unwrap();
            assert!(f.is_arc());
            assert_abs_diff_eq!(f.bulge(Traversal::Forward), bulge, epsilon = 1e-9);
            assert_abs_diff_eq!(f.start().x, 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(f.end().x, 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn from_bulge_zero_is_segment() {
        let f = CurveFragment::from_bulge(p(0.0, 0.0), p(1.0, 0.0), 0.0).unwrap();
        assert!(!f.is_arc());
    }

    #[test]
    fn arc_with_full_sweep_is_degenerate() {
        assert!(CurveFragment::arc(p(0.0, 0.0), 1.0, 0.0, 2.0 * PI, NormalSign::Positive).is_err());
    }
}
