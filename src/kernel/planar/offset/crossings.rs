use crate::geometry::Loop;
use crate::math::intersect_2d::edge_edge_intersect_2d;
use crate::math::{Point2, TOLERANCE};

/// A self-intersection between two edges of a loop.
#[derive(Debug, Clone)]
pub(crate) struct Crossing {
    /// Index of the first edge.
    pub edge_a: usize,
    /// Index of the second edge (always > `edge_a`).
    pub edge_b: usize,
    /// Parameter on edge a (0..1).
    pub t_a: f64,
    /// Parameter on edge b (0..1).
    pub t_b: f64,
    pub point: Point2,
}

/// Finds all crossings between non-adjacent edges of a loop.
///
/// Touches at an edge endpoint are not crossings.
#[must_use]
pub(crate) fn find_all(outline: &Loop) -> Vec<Crossing> {
    let count = outline.segment_count();
    if count < 3 {
        return Vec::new();
    }

    let eps = TOLERANCE * 100.0;
    let mut results = Vec::new();

    for i in 0..count {
        let (a0, a1, ba) = outline.edge(i);
        for j in (i + 2)..count {
            if outline.closed && i == 0 && j == count - 1 {
                continue;
            }
            let (b0, b1, bb) = outline.edge(j);

            for (point, t, u) in edge_edge_intersect_2d(&a0, &a1, ba, &b0, &b1, bb) {
                let t_at_end = t < eps || t > 1.0 - eps;
                let u_at_end = u < eps || u > 1.0 - eps;
                if t_at_end || u_at_end {
                    continue;
                }
                results.push(Crossing {
                    edge_a: i,
                    edge_b: j,
                    t_a: t,
                    t_b: u,
                    point,
                });
            }
        }
    }

    results.sort_by(|a, b| a.edge_a.cmp(&b.edge_a).then(a.t_a.total_cmp(&b.t_a)));
    results
}
