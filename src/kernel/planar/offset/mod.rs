//! Slice-and-filter offset for closed bulge loops.
//!
//! 1. Move every edge sideways and join the corners ([`raw`]).
//! 2. Find the raw loop's self-crossings ([`crossings`]).
//! 3. Cut it at the crossings ([`slice`]).
//! 4. Drop the pieces that come too close to the source ([`filter`]).
//! 5. Re-stitch the survivors with the loop assembler.
//!
//! Positive distances move to the left of the traversal direction: inward
//! for a counter-clockwise loop, outward for a clockwise one.

pub(crate) mod crossings;
mod filter;
mod raw;
mod slice;

use tracing::{debug, trace};

use crate::error::KernelError;
use crate::geometry::Loop;
use crate::math::TOLERANCE;
use crate::operations::assemble::{AssembleOptions, LoopAssembler};

use super::PlanarKernelOptions;

/// Offsets a closed loop, returning every resulting loop.
///
/// An empty result means the offset collapsed.
///
/// # Errors
///
/// Returns [`KernelError::InvalidLoop`] for open or zero-area loops.
pub(super) fn offset_loop(
    outline: &Loop,
    distance: f64,
    options: &PlanarKernelOptions,
) -> Result<Vec<Loop>, KernelError> {
    if !outline.closed {
        return Err(KernelError::InvalidLoop("offset requires a closed loop".into()));
    }
    let Some(orientation) = outline.orientation() else {
        return Err(KernelError::InvalidLoop("loop encloses no area".into()));
    };
    if distance.abs() < TOLERANCE {
        return Ok(vec![outline.clone()]);
    }

    let Some(raw) = raw::build(outline, distance)? else {
        debug!(distance, "arc edge collapsed during offset");
        return Ok(Vec::new());
    };

    let slack = options.stitch_tolerance.max(distance.abs() * 1e-6);
    let hits = crossings::find_all(&raw);
    trace!(crossings = hits.len(), "raw offset built");

    let candidates = if hits.is_empty() {
        vec![raw]
    } else {
        let slices = slice::build(&raw, &hits);
        let kept = filter::apply(slices, outline, distance, slack);
        stitch(kept, options)?
    };

    let result: Vec<Loop> = candidates
        .into_iter()
        .filter(|c| c.orientation() == Some(orientation))
        .filter(|c| filter::clears_source(c, outline, distance, slack))
        .collect();

    if result.is_empty() {
        debug!(distance, "offset collapsed");
    }
    Ok(result)
}

/// Joins open slices end to end into closed loops.
fn stitch(slices: Vec<Loop>, options: &PlanarKernelOptions) -> Result<Vec<Loop>, KernelError> {
    let mut fragments = Vec::new();
    for slice in &slices {
        let pieces = slice
            .to_fragments()
            .map_err(|err| KernelError::Failed(err.to_string()))?;
        fragments.extend(pieces);
    }

    let assembly = LoopAssembler::new(fragments)
        .with_options(AssembleOptions {
            tolerance: options.stitch_tolerance,
            min_area: TOLERANCE,
        })
        .execute();
    Ok(assembly.into_complete_loops())
}
