use crate::error::KernelError;
use crate::geometry::{Loop, LoopVertex};
use crate::math::arc_2d::{arc_from_bulge, offset_arc_segment};
use crate::math::intersect_2d::line_line_intersect_2d;
use crate::math::polygon_2d::{left_normal, segment_direction};
use crate::math::{points_coincide, Point2, Vector2, BULGE_EPSILON, TOLERANCE};

/// Maximum miter distance as a multiple of `|distance|`.
const MITER_LIMIT: f64 = 4.0;

/// Threshold for flat cap: `cos(angle) < this` → near-180° reversal.
const FLAT_CAP_COS: f64 = -0.98;

/// Cross product below which two unit tangents count as continuous.
const TANGENT_EPSILON: f64 = 1e-9;

/// One source edge moved sideways, with its tangent at both ends.
struct OffsetEdge {
    /// Start of the source edge (the corner the join is measured from).
    origin: Point2,
    start: Point2,
    end: Point2,
    bulge: f64,
    start_dir: Vector2,
    end_dir: Vector2,
}

impl OffsetEdge {
    fn is_arc(&self) -> bool {
        self.bulge.abs() >= BULGE_EPSILON
    }
}

/// Builds the untrimmed offset of a closed loop by moving every edge
/// `distance` to its left and joining neighbours at the corners.
///
/// Returns `Ok(None)` when an arc edge collapses (offset radius ≤ 0).
///
/// # Errors
///
/// Returns [`KernelError::InvalidLoop`] if the loop has no edge of non-zero
/// length.
pub(super) fn build(outline: &Loop, distance: f64) -> Result<Option<Loop>, KernelError> {
    let mut edges: Vec<OffsetEdge> = Vec::with_capacity(outline.segment_count());

    for (p0, p1, bulge) in outline.edges() {
        if points_coincide(&p0, &p1, TOLERANCE) {
            continue;
        }
        if bulge.abs() < BULGE_EPSILON {
            let dir = segment_direction(&p0, &p1)
                .map_err(|err| KernelError::InvalidLoop(err.to_string()))?;
            let shift = left_normal(dir) * distance;
            edges.push(OffsetEdge {
                origin: p0,
                start: p0 + shift,
                end: p1 + shift,
                bulge: 0.0,
                start_dir: dir,
                end_dir: dir,
            });
        } else {
            // Arc edge: radius changes, sweep is preserved.
            let Some((start, end, bulge)) = offset_arc_segment(&p0, &p1, bulge, distance) else {
                return Ok(None);
            };
            let arc = arc_from_bulge(&start, &end, bulge);
            edges.push(OffsetEdge {
                origin: p0,
                start,
                end,
                bulge,
                start_dir: arc.tangent_at(0.0),
                end_dir: arc.tangent_at(1.0),
            });
        }
    }

    if edges.is_empty() {
        return Err(KernelError::InvalidLoop(
            "no edge of non-zero length to offset".into(),
        ));
    }

    let count = edges.len();
    let mut vertices = Vec::with_capacity(count * 2);
    for i in 0..count {
        let prev = &edges[(i + count - 1) % count];
        push_corner(&mut vertices, prev, &edges[i], distance);
    }

    Ok(Some(Loop::closed(vertices)))
}

/// Pushes the join between two consecutive offset edges; the last pushed
/// vertex carries the next edge's bulge.
///
/// 1. Near-antiparallel (>~169°): flat cap (two vertices)
/// 2. Tangent-continuous: the next edge's start
/// 3. Arc edge at a sharp corner: straight bevel (two vertices)
/// 4. Miter too long: bevel (two vertices)
/// 5. Otherwise: single miter intersection point
fn push_corner(vertices: &mut Vec<LoopVertex>, prev: &OffsetEdge, next: &OffsetEdge, distance: f64) {
    let cos_angle = prev.end_dir.dot(&next.start_dir);
    let bevel = |vertices: &mut Vec<LoopVertex>| {
        vertices.push(LoopVertex::line(prev.end.x, prev.end.y));
        vertices.push(LoopVertex::new(next.start.x, next.start.y, next.bulge));
    };

    if cos_angle < FLAT_CAP_COS {
        bevel(vertices);
        return;
    }

    if prev.end_dir.perp(&next.start_dir).abs() < TANGENT_EPSILON {
        vertices.push(LoopVertex::new(next.start.x, next.start.y, next.bulge));
        return;
    }

    // Moving an arc endpoint to a miter point would change its radius.
    if prev.is_arc() || next.is_arc() {
        bevel(vertices);
        return;
    }

    match line_line_intersect_2d(&prev.end, &prev.end_dir, &next.start, &next.start_dir) {
        Some((t, _)) => {
            let corner = prev.end + prev.end_dir * t;
            let limit = MITER_LIMIT * distance.abs();
            if (corner - next.origin).norm_squared() > limit * limit {
                bevel(vertices);
            } else {
                vertices.push(LoopVertex::new(corner.x, corner.y, next.bulge));
            }
        }
        None => vertices.push(LoopVertex::new(next.start.x, next.start.y, next.bulge)),
    }
}
