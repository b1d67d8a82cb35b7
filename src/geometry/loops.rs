use crate::error::Result;
use crate::geometry::fragment::CurveFragment;
use crate::math::arc_2d::{arc_from_bulge, arc_segment_area};
use crate::math::intersect_2d::edge_edge_intersect_2d;
use crate::math::polygon_2d::{point_in_polygon, signed_area_2d};
use crate::math::{points_coincide, Point2, BULGE_EPSILON, TOLERANCE};

/// Bulge-encoded loop vertex for mixed line/arc edges.
///
/// `bulge = tan(sweep_angle / 4)` describes the edge to the *next* vertex:
/// - `0` = straight line to next vertex
/// - `> 0` = counter-clockwise arc to next vertex
/// - `< 0` = clockwise arc to next vertex
/// - `|bulge| = 1` = semicircle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopVertex {
    pub x: f64,
    pub y: f64,
    pub bulge: f64,
}

impl LoopVertex {
    /// Creates a new vertex with the given coordinates and bulge.
    #[must_use]
    pub fn new(x: f64, y: f64, bulge: f64) -> Self {
        Self { x, y, bulge }
    }

    /// Creates a line vertex (bulge = 0).
    #[must_use]
    pub fn line(x: f64, y: f64) -> Self {
        Self { x, y, bulge: 0.0 }
    }

    /// Vertex position.
    #[must_use]
    pub fn point(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Returns `true` if the edge leaving this vertex is an arc.
    #[must_use]
    pub fn is_arc(&self) -> bool {
        self.bulge.abs() >= BULGE_EPSILON
    }
}

/// An ordered boundary of line and arc edges.
///
/// Vertices form an open array: a closed loop of N vertices has N edges,
/// edge `i` running from vertex `i` to vertex `(i + 1) % N` with vertex `i`'s
/// bulge. The closing vertex is never repeated.
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    pub vertices: Vec<LoopVertex>,
    pub closed: bool,
}

/// Winding direction of a closed loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
}

impl Loop {
    /// Creates a closed loop from vertices.
    #[must_use]
    pub fn closed(vertices: Vec<LoopVertex>) -> Self {
        Self {
            vertices,
            closed: true,
        }
    }

    /// Creates a closed, line-only loop from points.
    #[must_use]
    pub fn from_points(points: &[Point2]) -> Self {
        Self::closed(points.iter().map(|p| LoopVertex::line(p.x, p.y)).collect())
    }

    /// Returns the number of edges in this loop.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        let n = self.vertices.len();
        if n < 2 {
            return 0;
        }
        if self.closed {
            n
        } else {
            n - 1
        }
    }

    /// Start point, end point and bulge of edge `i`.
    #[must_use]
    pub fn edge(&self, i: usize) -> (Point2, Point2, f64) {
        let n = self.vertices.len();
        let v0 = &self.vertices[i];
        let v1 = &self.vertices[(i + 1) % n];
        (v0.point(), v1.point(), v0.bulge)
    }

    /// Iterates `(start, end, bulge)` over every edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point2, Point2, f64)> + '_ {
        (0..self.segment_count()).map(|i| self.edge(i))
    }

    /// Signed enclosed area, exact for arc edges.
    ///
    /// Shoelace over the vertex polygon plus each arc's circular segment.
    /// Positive for counter-clockwise loops; 0 for open loops.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        if !self.closed || self.vertices.len() < 2 {
            return 0.0;
        }
        let points: Vec<Point2> = self.vertices.iter().map(LoopVertex::point).collect();
        let polygon = signed_area_2d(&points);
        let arcs: f64 = self
            .edges()
            .map(|(p0, p1, bulge)| arc_segment_area(&p0, &p1, bulge))
            .sum();
        polygon + arcs
    }

    /// Absolute enclosed area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Winding direction, or `None` for loops without area.
    #[must_use]
    pub fn orientation(&self) -> Option<Orientation> {
        let a = self.signed_area();
        if a > TOLERANCE {
            Some(Orientation::CounterClockwise)
        } else if a < -TOLERANCE {
            Some(Orientation::Clockwise)
        } else {
            None
        }
    }

    /// Number of vertices not within `tolerance` of their predecessor.
    #[must_use]
    pub fn distinct_vertex_count(&self, tolerance: f64) -> usize {
        let n = self.vertices.len();
        if n == 0 {
            return 0;
        }
        let mut count = 1;
        for i in 1..n {
            if !points_coincide(&self.vertices[i].point(), &self.vertices[i - 1].point(), tolerance) {
                count += 1;
            }
        }
        if self.closed
            && n > 1
            && points_coincide(&self.vertices[n - 1].point(), &self.vertices[0].point(), tolerance)
        {
            count -= 1;
        }
        count
    }

    /// Returns a new loop with vertices in reverse order and negated bulges.
    ///
    /// For closed loops the edge `v[i] → v[i+1]` with bulge `b` becomes
    /// `v[i+1] → v[i]` with bulge `-b`, and the start vertex is preserved.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let m = self.vertices.len();
        if m == 0 {
            return self.clone();
        }
        let mut vertices = Vec::with_capacity(m);
        if self.closed {
            // Walk v0, v[m-1], ..., v1; the edge leaving v[k] backwards is edge k-1.
            for j in 0..m {
                let k = (m - j) % m;
                let prev = (k + m - 1) % m;
                let v = &self.vertices[k];
                vertices.push(LoopVertex::new(v.x, v.y, -self.vertices[prev].bulge));
            }
        } else {
            for j in 0..m {
                let orig = m - 1 - j;
                let bulge = if j < m - 1 {
                    -self.vertices[m - 2 - j].bulge
                } else {
                    0.0
                };
                let v = &self.vertices[orig];
                vertices.push(LoopVertex::new(v.x, v.y, bulge));
            }
        }
        Self {
            vertices,
            closed: self.closed,
        }
    }

    /// Returns this loop wound in `orientation` (reversing if needed).
    #[must_use]
    pub fn oriented(&self, orientation: Orientation) -> Self {
        match self.orientation() {
            Some(current) if current != orientation => self.reversed(),
            _ => self.clone(),
        }
    }

    /// Converts this loop to points by tessellating arcs into chords.
    ///
    /// `tolerance` is the maximum sagitta between an arc and its chords. The
    /// closing vertex is not repeated for closed loops.
    #[must_use]
    pub fn to_points(&self, tolerance: f64) -> Vec<Point2> {
        let n = self.vertices.len();
        if n == 0 {
            return Vec::new();
        }

        let mut points = Vec::with_capacity(n * 2);
        points.push(self.vertices[0].point());

        for (i, (p0, p1, bulge)) in self.edges().enumerate() {
            let is_closing_edge = self.closed && i == n - 1;
            if bulge.abs() >= BULGE_EPSILON {
                let arc = arc_from_bulge(&p0, &p1, bulge);
                if arc.radius >= BULGE_EPSILON {
                    let n_sub = arc_subdivision_count(arc.radius, arc.sweep.abs(), tolerance);
                    for j in 1..n_sub {
                        points.push(arc.point_at(f64::from(j) / f64::from(n_sub)));
                    }
                }
            }
            if !is_closing_edge {
                points.push(p1);
            }
        }

        points
    }

    /// Point halfway along edge `i`.
    #[must_use]
    pub fn edge_midpoint(&self, i: usize) -> Point2 {
        let (p0, p1, bulge) = self.edge(i);
        if bulge.abs() < BULGE_EPSILON {
            nalgebra::center(&p0, &p1)
        } else {
            arc_from_bulge(&p0, &p1, bulge).point_at(0.5)
        }
    }

    /// Even-odd containment test against the tessellated boundary.
    #[must_use]
    pub fn contains_point(&self, pt: &Point2, tolerance: f64) -> bool {
        self.closed && point_in_polygon(pt, &self.to_points(tolerance))
    }

    /// Returns `true` if this loop lies inside `outer`.
    ///
    /// Assumes the two boundaries do not cross; the first edge midpoint of
    /// this loop is tested against `outer`.
    #[must_use]
    pub fn is_hole_of(&self, outer: &Loop, tolerance: f64) -> bool {
        if self.segment_count() == 0 || outer.area() <= self.area() {
            return false;
        }
        outer.contains_point(&self.edge_midpoint(0), tolerance)
    }

    /// Returns `true` if any edge of this loop touches or crosses any edge of `other`.
    #[must_use]
    pub fn intersects(&self, other: &Loop) -> bool {
        self.edges().any(|(a0, a1, ba)| {
            other
                .edges()
                .any(|(b0, b1, bb)| !edge_edge_intersect_2d(&a0, &a1, ba, &b0, &b1, bb).is_empty())
        })
    }

    /// Decomposes the loop into one fragment per non-degenerate edge.
    ///
    /// # Errors
    ///
    /// Propagates fragment construction failures for non-finite vertices.
    pub fn to_fragments(&self) -> Result<Vec<CurveFragment>> {
        let mut out = Vec::with_capacity(self.segment_count());
        for (p0, p1, bulge) in self.edges() {
            if points_coincide(&p0, &p1, TOLERANCE) {
                continue;
            }
            out.push(CurveFragment::from_bulge(p0, p1, bulge)?);
        }
        Ok(out)
    }
}

impl AsRef<Loop> for Loop {
    fn as_ref(&self) -> &Loop {
        self
    }
}

/// Computes the number of line segments needed to approximate an arc
/// within the given tolerance.
fn arc_subdivision_count(radius: f64, abs_sweep: f64, tolerance: f64) -> u32 {
    if radius < 1e-12 || abs_sweep < 1e-12 || tolerance <= 0.0 {
        return 1;
    }
    // From the sagitta formula: sagitta = r * (1 - cos(θ/2))
    let max_angle = if tolerance >= radius {
        std::f64::consts::PI
    } else {
        2.0 * (1.0 - tolerance / radius).acos()
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (abs_sweep / max_angle).ceil() as u32;
    n.max(1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn square(x0: f64, y0: f64, size: f64) -> Loop {
        Loop::from_points(&[
            Point2::new(x0, y0),
            Point2::new(x0 + size, y0),
            Point2::new(x0 + size, y0 + size),
            Point2::new(x0, y0 + size),
        ])
    }

    /// Two horizontal lines joined by outward semicircles, wound CCW.
    fn rounded_rect() -> Loop {
        Loop::closed(vec![
            LoopVertex::line(0.0, 0.0),
            LoopVertex::new(10.0, 0.0, 1.0),
            LoopVertex::line(10.0, 4.0),
            LoopVertex::new(0.0, 4.0, 1.0),
        ])
    }

    #[test]
    fn square_area_and_orientation() {
        let sq = square(0.0, 0.0, 10.0);
        assert_abs_diff_eq!(sq.signed_area(), 100.0, epsilon = 1e-9);
        assert_eq!(sq.orientation(), Some(Orientation::CounterClockwise));
        assert_eq!(sq.reversed().orientation(), Some(Orientation::Clockwise));
    }

    #[test]
    fn rounded_rect_area_includes_arc_segments() {
        // 10x4 rectangle plus two radius-2 half discs.
        assert_abs_diff_eq!(rounded_rect().signed_area(), 40.0 + 4.0 * PI, epsilon = 1e-9);
    }

    #[test]
    fn circle_from_two_semicircles() {
        let circle = Loop::closed(vec![LoopVertex::new(0.0, 0.0, 1.0), LoopVertex::new(2.0, 0.0, 1.0)]);
        assert_abs_diff_eq!(circle.signed_area(), PI, epsilon = 1e-9);
        assert_eq!(circle.distinct_vertex_count(1e-9), 2);
    }

    #[test]
    fn reversed_closed_keeps_start_and_negates_area() {
        let rr = rounded_rect();
        let rev = rr.reversed();
        assert_eq!(rev.vertices.len(), 4);
        assert_abs_diff_eq!(rev.vertices[0].x, 0.0, epsilon = 1e-12);
        // Edge (0,0) → (0,4) in reverse is the arc that used to run (0,4) → (0,0).
        assert_abs_diff_eq!(rev.vertices[0].bulge, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rev.vertices[1].y, 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rev.signed_area(), -rr.signed_area(), epsilon = 1e-9);
    }

    #[test]
    fn reversed_open_with_arc() {
        let open = Loop {
            vertices: vec![
                LoopVertex::line(0.0, 0.0),
                LoopVertex::new(2.0, 0.0, 1.0),
                LoopVertex::line(4.0, 0.0),
            ],
            closed: false,
        };
        let rev = open.reversed();
        assert_abs_diff_eq!(rev.vertices[0].x, 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rev.vertices[0].bulge, -1.0, epsilon = 1e-12);
        assert!(rev.vertices[1].bulge.abs() < 1e-12);
    }

    #[test]
    fn to_points_tessellates_arcs_without_repeating_start() {
        let pts = rounded_rect().to_points(0.01);
        assert!(pts.len() > 8, "expected arcs to be subdivided, got {}", pts.len());
        let first = pts[0];
        let last = pts[pts.len() - 1];
        assert!((first - last).norm() > 1e-6);
        let approx_area = signed_area_2d(&pts);
        assert!((approx_area - rounded_rect().signed_area()).abs() < 0.1);
    }

    #[test]
    fn containment_and_holes() {
        let outer = square(0.0, 0.0, 10.0);
        let inner = square(4.0, 4.0, 2.0);
        assert!(outer.contains_point(&Point2::new(5.0, 5.0), 1e-3));
        assert!(inner.is_hole_of(&outer, 1e-3));
        assert!(!outer.is_hole_of(&inner, 1e-3));
        assert!(!inner.intersects(&outer));
        assert!(square(8.0, 8.0, 4.0).intersects(&outer));
    }

    #[test]
    fn to_fragments_round_trips_bulges() {
        let frags = rounded_rect().to_fragments().unwrap();
        assert_eq!(frags.len(), 4);
        assert_eq!(frags.iter().filter(|f| f.is_arc()).count(), 2);
    }

    #[test]
    fn arc_subdivision_count_tracks_tolerance() {
        assert_eq!(arc_subdivision_count(1.0, PI, 10.0), 1);
        assert!(arc_subdivision_count(1.0, PI, 0.001) > 10);
    }
}
