use tracing::{debug, warn};

use crate::error::CompositionError;
use crate::geometry::{Loop, Orientation};
use crate::kernel::OffsetKernel;
use crate::operations::nesting::NestingOptions;

/// Which signed distance produced the accepted offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetSide {
    /// The distance as requested.
    Requested,
    /// The requested offset grew, so the negated distance was used.
    Flipped,
}

/// A source loop and its inward offset.
#[derive(Debug, Clone)]
pub struct OffsetPair {
    pub source: Loop,
    pub offset: Loop,
    pub side: OffsetSide,
    /// Signed distance actually passed to the kernel.
    pub distance: f64,
}

/// Outer ring plus one hole, used only as a fill boundary.
#[derive(Debug, Clone)]
pub struct BandBoundary {
    /// Counter-clockwise.
    pub outer: Loop,
    /// Clockwise.
    pub hole: Loop,
}

impl BandBoundary {
    /// Area between the two rings.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.outer.area() - self.hole.area()
    }
}

/// Offsets `source` inward by `distance`.
///
/// The kernel's sign convention is not trusted. The offset at `+distance` is
/// kept if it encloses less area than the source; otherwise it is discarded
/// and `-distance` is requested instead. A kernel failure counts as an empty
/// result for that direction. When the kernel returns several loops the
/// largest is taken.
///
/// Returns `None` when neither direction yields a loop smaller than the
/// source.
pub fn offset_inward<K: OffsetKernel>(kernel: &K, source: &Loop, distance: f64) -> Option<OffsetPair> {
    let source_area = source.area();

    if let Some(offset) = largest_offset(kernel, source, distance) {
        if offset.area() < source_area {
            return Some(OffsetPair {
                source: source.clone(),
                offset,
                side: OffsetSide::Requested,
                distance,
            });
        }
        debug!(
            distance,
            source_area,
            offset_area = offset.area(),
            "offset grew, retrying with the opposite sign"
        );
    }

    let Some(offset) = largest_offset(kernel, source, -distance) else {
        debug!(distance, "no offset available in either direction");
        return None;
    };
    if offset.area() >= source_area {
        warn!(
            distance,
            source_area,
            offset_area = offset.area(),
            "neither offset direction shrinks the source"
        );
        return None;
    }
    Some(OffsetPair {
        source: source.clone(),
        offset,
        side: OffsetSide::Flipped,
        distance: -distance,
    })
}

fn largest_offset<K: OffsetKernel>(kernel: &K, source: &Loop, distance: f64) -> Option<Loop> {
    match kernel.offset(source, distance) {
        Ok(loops) => loops.into_iter().max_by(|a, b| a.area().total_cmp(&b.area())),
        Err(err) => {
            warn!(distance, %err, "offset kernel failed");
            None
        }
    }
}

/// Pairs a loop with a smaller loop inside it as a fill boundary.
///
/// Rings are re-oriented: outer counter-clockwise, hole clockwise.
///
/// # Errors
///
/// Returns [`CompositionError::InvalidBand`] if either loop is open, or the
/// inner loop is not strictly smaller than and inside the outer loop.
pub fn fill_band(outer: &Loop, inner: &Loop) -> Result<BandBoundary, CompositionError> {
    if !outer.closed || !inner.closed {
        return Err(CompositionError::InvalidBand("band rings must be closed".into()));
    }
    let (outer_area, inner_area) = (outer.area(), inner.area());
    if inner_area >= outer_area {
        return Err(CompositionError::InvalidBand(format!(
            "inner area {inner_area} is not smaller than outer area {outer_area}"
        )));
    }
    if !inner.is_hole_of(outer, NestingOptions::default().tessellation_tolerance) {
        return Err(CompositionError::InvalidBand("inner ring lies outside the outer ring".into()));
    }
    Ok(BandBoundary {
        outer: outer.oriented(Orientation::CounterClockwise),
        hole: inner.oriented(Orientation::Clockwise),
    })
}

/// Successive inward offsets of one loop and the bands between them.
#[derive(Debug, Clone, Default)]
pub struct ConcentricBands {
    /// Offset rings, outermost first.
    pub rings: Vec<OffsetPair>,
    /// Band between each ring's source and offset.
    pub bands: Vec<BandBoundary>,
}

/// Offsets `source` inward repeatedly, at most `max_rings` times.
///
/// Stops early when no inward offset is available, or when a ring cannot
/// form a band with its source.
pub fn concentric_bands<K: OffsetKernel>(
    kernel: &K,
    source: &Loop,
    distance: f64,
    max_rings: usize,
) -> ConcentricBands {
    let mut out = ConcentricBands::default();
    let mut current = source.clone();

    for ring in 0..max_rings {
        let Some(pair) = offset_inward(kernel, &current, distance) else {
            break;
        };
        let band = match fill_band(&pair.source, &pair.offset) {
            Ok(band) => band,
            Err(err) => {
                warn!(ring, %err, "stopping at an offset that cannot bound a band");
                break;
            }
        };
        current = pair.offset.clone();
        out.bands.push(band);
        out.rings.push(pair);
    }

    debug!(rings = out.rings.len(), max_rings, "concentric offsets finished");
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::KernelError;
    use crate::math::Point2;
    use approx::assert_abs_diff_eq;

    /// Insets the loop's bounding box; `outward` flips the sign convention.
    struct BoxOffset {
        outward: bool,
        fail_positive: bool,
    }

    impl OffsetKernel for BoxOffset {
        fn offset(&self, outline: &Loop, distance: f64) -> Result<Vec<Loop>, KernelError> {
            if self.fail_positive && distance > 0.0 {
                return Err(KernelError::Failed("positive offsets unsupported".into()));
            }
            let inset = if self.outward { -distance } else { distance };
            let xs = outline.vertices.iter().map(|v| v.x);
            let ys = outline.vertices.iter().map(|v| v.y);
            let (x0, x1) = xs.fold((f64::MAX, f64::MIN), |(lo, hi), x| (lo.min(x), hi.max(x)));
            let (y0, y1) = ys.fold((f64::MAX, f64::MIN), |(lo, hi), y| (lo.min(y), hi.max(y)));
            let (x0, x1, y0, y1) = (x0 + inset, x1 - inset, y0 + inset, y1 - inset);
            if x1 <= x0 || y1 <= y0 {
                return Ok(Vec::new());
            }
            Ok(vec![square(x0, y0, x1 - x0)])
        }
    }

    /// Returns a second, smaller loop ahead of the box inset.
    struct SplitOffset;

    impl OffsetKernel for SplitOffset {
        fn offset(&self, outline: &Loop, distance: f64) -> Result<Vec<Loop>, KernelError> {
            let inset = BoxOffset { outward: false, fail_positive: false }.offset(outline, distance)?;
            let mut loops = vec![square(20.0, 20.0, 1.0)];
            loops.extend(inset);
            Ok(loops)
        }
    }

    struct NoOffset;

    impl OffsetKernel for NoOffset {
        fn offset(&self, _outline: &Loop, _distance: f64) -> Result<Vec<Loop>, KernelError> {
            Ok(Vec::new())
        }
    }

    fn square(x0: f64, y0: f64, size: f64) -> Loop {
        Loop::from_points(&[
            Point2::new(x0, y0),
            Point2::new(x0 + size, y0),
            Point2::new(x0 + size, y0 + size),
            Point2::new(x0, y0 + size),
        ])
    }

    #[test]
    fn keeps_requested_side_when_it_shrinks() {
        let kernel = BoxOffset { outward: false, fail_positive: false };
        let pair = offset_inward(&kernel, &square(0.0, 0.0, 10.0), 1.0).unwrap();
        assert_eq!(pair.side, OffsetSide::Requested);
        assert_abs_diff_eq!(pair.offset.area(), 64.0, epsilon = 1e-9);
    }

    #[test]
    fn flips_when_requested_side_grows() {
        let kernel = BoxOffset { outward: true, fail_positive: false };
        let pair = offset_inward(&kernel, &square(0.0, 0.0, 10.0), 1.0).unwrap();
        assert_eq!(pair.side, OffsetSide::Flipped);
        assert_abs_diff_eq!(pair.distance, -1.0);
        assert_abs_diff_eq!(pair.offset.area(), 64.0, epsilon = 1e-9);
    }

    #[test]
    fn kernel_failure_falls_back_to_other_side() {
        let kernel = BoxOffset { outward: true, fail_positive: true };
        let pair = offset_inward(&kernel, &square(0.0, 0.0, 10.0), 1.0).unwrap();
        assert_eq!(pair.side, OffsetSide::Flipped);
        assert!(pair.offset.area() < 100.0);
    }

    #[test]
    fn growing_flipped_offset_is_no_offset() {
        // `+d` fails and `-d` grows the box.
        let kernel = BoxOffset { outward: false, fail_positive: true };
        assert!(offset_inward(&kernel, &square(0.0, 0.0, 10.0), 1.0).is_none());
    }

    #[test]
    fn growing_offsets_in_both_directions_stop_concentric_bands() {
        let kernel = BoxOffset { outward: false, fail_positive: true };
        let result = concentric_bands(&kernel, &square(0.0, 0.0, 10.0), 1.0, 4);
        assert!(result.rings.is_empty());
        assert!(result.bands.is_empty());
    }

    #[test]
    fn largest_of_several_results_is_used() {
        let pair = offset_inward(&SplitOffset, &square(0.0, 0.0, 10.0), 1.0).unwrap();
        assert_eq!(pair.side, OffsetSide::Requested);
        assert_abs_diff_eq!(pair.offset.area(), 64.0, epsilon = 1e-9);
    }

    #[test]
    fn empty_kernel_means_no_offset() {
        assert!(offset_inward(&NoOffset, &square(0.0, 0.0, 10.0), 1.0).is_none());
    }

    #[test]
    fn band_rings_are_oriented() {
        let band = fill_band(&square(0.0, 0.0, 10.0).reversed(), &square(1.0, 1.0, 8.0)).unwrap();
        assert_eq!(band.outer.orientation(), Some(Orientation::CounterClockwise));
        assert_eq!(band.hole.orientation(), Some(Orientation::Clockwise));
        assert_abs_diff_eq!(band.area(), 36.0, epsilon = 1e-9);
    }

    #[test]
    fn band_rejects_inner_not_smaller() {
        let err = fill_band(&square(0.0, 0.0, 2.0), &square(0.0, 0.0, 5.0)).unwrap_err();
        assert!(matches!(err, CompositionError::InvalidBand(_)));
        let err = fill_band(&square(0.0, 0.0, 5.0), &square(20.0, 0.0, 1.0)).unwrap_err();
        assert!(matches!(err, CompositionError::InvalidBand(_)));
    }

    #[test]
    fn concentric_bands_stop_when_offset_vanishes() {
        let kernel = BoxOffset { outward: false, fail_positive: false };
        let result = concentric_bands(&kernel, &square(0.0, 0.0, 10.0), 2.0, 10);
        // Sides 6 and 2; the next inset would be negative.
        assert_eq!(result.rings.len(), 2);
        assert_eq!(result.bands.len(), 2);
        assert_abs_diff_eq!(result.rings[1].offset.area(), 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.bands[0].area(), 64.0, epsilon = 1e-9);
    }

    #[test]
    fn concentric_bands_respect_ring_limit() {
        let kernel = BoxOffset { outward: true, fail_positive: false };
        let result = concentric_bands(&kernel, &square(0.0, 0.0, 100.0), 1.0, 3);
        assert_eq!(result.rings.len(), 3);
    }
}
