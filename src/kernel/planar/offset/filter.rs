use crate::geometry::Loop;
use crate::math::arc_2d::arc_from_bulge;
use crate::math::distance_2d::{point_to_arc_dist, point_to_segment_dist};
use crate::math::{Point2, BULGE_EPSILON};

/// Keeps paths that stay a full `|distance|` away from the source loop.
///
/// Each path is probed at the midpoint of its longest edge. Pieces of a raw
/// offset that fold back over the source come closer than the offset
/// distance and are dropped.
#[must_use]
pub(super) fn apply(paths: Vec<Loop>, source: &Loop, distance: f64, tolerance: f64) -> Vec<Loop> {
    paths
        .into_iter()
        .filter(|p| clears_source(p, source, distance, tolerance))
        .collect()
}

/// Returns `true` if `path` keeps its distance from `source`.
#[must_use]
pub(super) fn clears_source(path: &Loop, source: &Loop, distance: f64, tolerance: f64) -> bool {
    let Some(probe) = probe_point(path) else {
        return false;
    };
    min_distance(&probe, source) >= distance.abs() - tolerance
}

/// Midpoint of the longest edge.
fn probe_point(path: &Loop) -> Option<Point2> {
    (0..path.segment_count())
        .map(|i| (i, edge_length(path, i)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| path.edge_midpoint(i))
}

fn edge_length(path: &Loop, i: usize) -> f64 {
    let (p0, p1, bulge) = path.edge(i);
    if bulge.abs() < BULGE_EPSILON {
        (p1 - p0).norm()
    } else {
        arc_from_bulge(&p0, &p1, bulge).length()
    }
}

/// Minimum distance from a point to any edge of `outline`.
fn min_distance(pt: &Point2, outline: &Loop) -> f64 {
    outline
        .edges()
        .map(|(p0, p1, bulge)| {
            if bulge.abs() < BULGE_EPSILON {
                point_to_segment_dist(pt, &p0, &p1)
            } else {
                point_to_arc_dist(pt, &arc_from_bulge(&p0, &p1, bulge))
            }
        })
        .fold(f64::MAX, f64::min)
}
