use crate::geometry::{Loop, LoopVertex};
use crate::math::{Point2, BULGE_EPSILON};

use super::crossings::Crossing;

/// A cut position: edge index, parameter along it, and the shared point.
#[derive(Debug, Clone, Copy)]
struct Split {
    edge: usize,
    t: f64,
    point: Point2,
}

/// Cuts a closed loop at every crossing, producing open sub-paths.
///
/// Each crossing splits both of its edges; consecutive split points around
/// the loop bound one slice. Arc edges keep their curvature through sub-arc
/// bulges. Both slices meeting at a crossing end on the same point.
#[must_use]
pub(super) fn build(outline: &Loop, crossings: &[Crossing]) -> Vec<Loop> {
    if crossings.is_empty() || outline.vertices.is_empty() {
        return Vec::new();
    }

    let mut splits: Vec<Split> = crossings
        .iter()
        .flat_map(|c| {
            [
                Split { edge: c.edge_a, t: c.t_a, point: c.point },
                Split { edge: c.edge_b, t: c.t_b, point: c.point },
            ]
        })
        .collect();
    splits.sort_by(|a, b| a.edge.cmp(&b.edge).then(a.t.total_cmp(&b.t)));

    let total = splits.len();
    let mut slices = Vec::with_capacity(total);
    for i in 0..total {
        let vertices = slice_vertices(outline, splits[i], splits[(i + 1) % total]);
        if vertices.len() >= 2 {
            slices.push(Loop {
                vertices,
                closed: false,
            });
        }
    }
    slices
}

/// Vertices of the path from split `start` to split `end`.
fn slice_vertices(outline: &Loop, start: Split, end: Split) -> Vec<LoopVertex> {
    let count = outline.segment_count();
    let mut vertices = Vec::new();

    if start.edge == end.edge && start.t <= end.t {
        let bulge = sub_bulge(outline.vertices[start.edge].bulge, start.t, end.t);
        vertices.push(LoopVertex::new(start.point.x, start.point.y, bulge));
        vertices.push(LoopVertex::line(end.point.x, end.point.y));
        return vertices;
    }

    let bulge = sub_bulge(outline.vertices[start.edge].bulge, start.t, 1.0);
    vertices.push(LoopVertex::new(start.point.x, start.point.y, bulge));

    // Whole edges in between keep their bulge.
    let mut seg = (start.edge + 1) % count;
    while seg != end.edge {
        vertices.push(outline.vertices[seg]);
        seg = (seg + 1) % count;
    }

    let v = outline.vertices[end.edge];
    vertices.push(LoopVertex::new(v.x, v.y, sub_bulge(v.bulge, 0.0, end.t)));
    vertices.push(LoopVertex::line(end.point.x, end.point.y));
    vertices
}

/// Bulge of the part of an edge between `t_start` and `t_end`.
fn sub_bulge(bulge: f64, t_start: f64, t_end: f64) -> f64 {
    if bulge.abs() < BULGE_EPSILON {
        return 0.0;
    }
    let sweep = 4.0 * bulge.atan();
    (sweep * (t_end - t_start) / 4.0).tan()
}
