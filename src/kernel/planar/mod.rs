//! Built-in region and offset kernel for planar bulge loops.
//!
//! Booleans are limited to boundaries that do not cross: an operand either
//! encloses, sits inside, or stays clear of every ring of the target. That
//! covers outer-contour-with-holes composition. Crossing boundaries are
//! reported as [`KernelError::Unsupported`].

mod offset;
mod region;

pub use region::PlanarRegion;

use tracing::{trace, warn};

use crate::error::KernelError;
use crate::geometry::{CurveFragment, Loop, Orientation};

use super::{OffsetKernel, RegionKernel};

/// Parameters for [`PlanarKernel`].
#[derive(Debug, Clone, Copy)]
pub struct PlanarKernelOptions {
    /// Chord tolerance for containment tests on arc edges.
    pub tessellation_tolerance: f64,
    /// Endpoint tolerance when re-stitching trimmed offset pieces.
    pub stitch_tolerance: f64,
}

impl Default for PlanarKernelOptions {
    fn default() -> Self {
        Self {
            tessellation_tolerance: 1e-3,
            stitch_tolerance: 1e-6,
        }
    }
}

/// In-crate implementation of the kernel traits.
#[derive(Debug, Clone, Default)]
pub struct PlanarKernel {
    options: PlanarKernelOptions,
}

impl PlanarKernel {
    /// Creates a kernel with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets custom kernel options.
    #[must_use]
    pub fn with_options(mut self, options: PlanarKernelOptions) -> Self {
        self.options = options;
        self
    }

    /// Validates an operand and classifies it against `target`.
    ///
    /// Returns the operand ring and whether it lies in material.
    fn prepare(&self, target: &PlanarRegion, operand: PlanarRegion) -> Result<(Loop, bool), KernelError> {
        let mut rings = operand.into_rings();
        if rings.len() != 1 {
            return Err(KernelError::Unsupported(format!(
                "operand with {} rings",
                rings.len()
            )));
        }
        let ring = rings.remove(0);
        if target.crosses(&ring) {
            return Err(KernelError::Unsupported("crossing boundaries".into()));
        }
        let in_material = target.encloses(&ring, self.options.tessellation_tolerance);
        Ok((ring, in_material))
    }
}

impl RegionKernel for PlanarKernel {
    type Region = PlanarRegion;

    fn region_from_loop(&self, outline: &Loop) -> Result<PlanarRegion, KernelError> {
        if !outline.closed {
            return Err(KernelError::InvalidLoop("region boundary must be closed".into()));
        }
        if outline.orientation().is_none() {
            return Err(KernelError::InvalidLoop("region boundary encloses no area".into()));
        }
        if !offset::crossings::find_all(outline).is_empty() {
            return Err(KernelError::SelfIntersecting);
        }
        Ok(PlanarRegion::from_outer(outline))
    }

    fn subtract(&self, target: &mut PlanarRegion, operand: PlanarRegion) -> Result<(), KernelError> {
        let (ring, in_material) = self.prepare(target, operand)?;
        let tol = self.options.tessellation_tolerance;
        target.remove_inside(&ring, tol);
        if in_material {
            target.push_ring(ring, Orientation::Clockwise);
        }
        trace!(rings = target.rings().len(), in_material, "subtracted ring");
        Ok(())
    }

    fn unite(&self, target: &mut PlanarRegion, operand: PlanarRegion) -> Result<(), KernelError> {
        let (ring, in_material) = self.prepare(target, operand)?;
        let tol = self.options.tessellation_tolerance;
        target.remove_inside(&ring, tol);
        if !in_material {
            target.push_ring(ring, Orientation::CounterClockwise);
        }
        trace!(rings = target.rings().len(), in_material, "united ring");
        Ok(())
    }

    fn decompose(&self, region: &PlanarRegion) -> Vec<CurveFragment> {
        let mut fragments = Vec::new();
        for ring in region.rings() {
            match ring.to_fragments() {
                Ok(pieces) => fragments.extend(pieces),
                Err(err) => warn!(%err, "dropping ring that cannot be decomposed"),
            }
        }
        fragments
    }

    fn area(&self, region: &PlanarRegion) -> f64 {
        region.area()
    }
}

impl OffsetKernel for PlanarKernel {
    fn offset(&self, outline: &Loop, distance: f64) -> Result<Vec<Loop>, KernelError> {
        offset::offset_loop(outline, distance, &self.options)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::LoopVertex;
    use crate::math::Point2;
    use crate::operations::assemble::LoopAssembler;
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

    fn region(kernel: &PlanarKernel, outline: &Loop) -> PlanarRegion {
        kernel.region_from_loop(outline).unwrap()
    }

    #[test]
    fn region_is_stored_counter_clockwise() {
        let kernel = PlanarKernel::new();
        let r = region(&kernel, &square(0.0, 0.0, 4.0).reversed());
        assert_eq!(r.outer_rings().count(), 1);
        assert_abs_diff_eq!(kernel.area(&r), 16.0, epsilon = 1e-9);
    }

    #[test]
    fn rejects_bad_boundaries() {
        let kernel = PlanarKernel::new();
        let bow_tie = Loop::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 2.0),
        ]);
        assert!(matches!(
            kernel.region_from_loop(&bow_tie),
            Err(KernelError::SelfIntersecting)
        ));
        let open = Loop {
            vertices: square(0.0, 0.0, 1.0).vertices,
            closed: false,
        };
        assert!(matches!(
            kernel.region_from_loop(&open),
            Err(KernelError::InvalidLoop(_))
        ));
    }

    #[test]
    fn subtract_inner_loop_makes_hole() {
        let kernel = PlanarKernel::new();
        let mut r = region(&kernel, &square(0.0, 0.0, 10.0));
        kernel.subtract(&mut r, region(&kernel, &square(3.0, 3.0, 2.0))).unwrap();
        assert_eq!(r.holes().count(), 1);
        assert_abs_diff_eq!(kernel.area(&r), 96.0, epsilon = 1e-9);
    }

    #[test]
    fn crossing_subtract_leaves_target_untouched() {
        let kernel = PlanarKernel::new();
        let mut r = region(&kernel, &square(0.0, 0.0, 10.0));
        let before = r.clone();
        let err = kernel
            .subtract(&mut r, region(&kernel, &square(8.0, 8.0, 4.0)))
            .unwrap_err();
        assert!(matches!(err, KernelError::Unsupported(_)));
        assert_eq!(r, before);
    }

    #[test]
    fn subtract_enclosing_loop_empties_region() {
        let kernel = PlanarKernel::new();
        let mut r = region(&kernel, &square(1.0, 1.0, 2.0));
        kernel.subtract(&mut r, region(&kernel, &square(0.0, 0.0, 10.0))).unwrap();
        assert!(r.is_empty());
        assert_abs_diff_eq!(kernel.area(&r), 0.0);
    }

    #[test]
    fn subtract_outside_material_is_a_no_op() {
        let kernel = PlanarKernel::new();
        let mut r = region(&kernel, &square(0.0, 0.0, 10.0));
        kernel.subtract(&mut r, region(&kernel, &square(20.0, 0.0, 2.0))).unwrap();
        assert_abs_diff_eq!(kernel.area(&r), 100.0, epsilon = 1e-9);
        assert_eq!(r.rings().len(), 1);
    }

    #[test]
    fn unite_adds_disjoint_and_island_rings() {
        let kernel = PlanarKernel::new();
        let mut r = region(&kernel, &square(0.0, 0.0, 10.0));
        kernel.subtract(&mut r, region(&kernel, &square(2.0, 2.0, 6.0))).unwrap();
        kernel.unite(&mut r, region(&kernel, &square(4.0, 4.0, 2.0))).unwrap();
        kernel.unite(&mut r, region(&kernel, &square(20.0, 0.0, 3.0))).unwrap();
        assert_eq!(r.outer_rings().count(), 3);
        assert_abs_diff_eq!(kernel.area(&r), 64.0 + 4.0 + 9.0, epsilon = 1e-9);
    }

    #[test]
    fn unite_inside_material_is_absorbed() {
        let kernel = PlanarKernel::new();
        let mut r = region(&kernel, &square(0.0, 0.0, 10.0));
        kernel.subtract(&mut r, region(&kernel, &square(2.0, 2.0, 2.0))).unwrap();
        // Covers the hole and stays inside the outer ring.
        kernel.unite(&mut r, region(&kernel, &square(1.0, 1.0, 5.0))).unwrap();
        assert_eq!(r.rings().len(), 1);
        assert_abs_diff_eq!(kernel.area(&r), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn multi_ring_operand_is_unsupported() {
        let kernel = PlanarKernel::new();
        let mut operand = region(&kernel, &square(0.0, 0.0, 10.0));
        kernel.subtract(&mut operand, region(&kernel, &square(2.0, 2.0, 2.0))).unwrap();
        let mut target = region(&kernel, &square(-5.0, -5.0, 30.0));
        assert!(matches!(
            kernel.subtract(&mut target, operand),
            Err(KernelError::Unsupported(_))
        ));
    }

    #[test]
    fn decomposed_region_reassembles_to_same_area() {
        let kernel = PlanarKernel::new();
        let mut r = region(&kernel, &square(0.0, 0.0, 10.0));
        let disk = Loop::closed(vec![LoopVertex::new(4.0, 5.0, 1.0), LoopVertex::new(6.0, 5.0, 1.0)]);
        kernel.subtract(&mut r, region(&kernel, &disk)).unwrap();
        assert_abs_diff_eq!(kernel.area(&r), 100.0 - PI, epsilon = 1e-9);

        let loops = LoopAssembler::new(kernel.decompose(&r)).execute().into_complete_loops();
        assert_eq!(loops.len(), 2);
        let total: f64 = loops.iter().map(Loop::signed_area).sum();
        assert_abs_diff_eq!(total, 100.0 - PI, epsilon = 1e-9);
    }

    #[test]
    fn offset_goes_through_the_slice_pipeline() {
        let kernel = PlanarKernel::new();
        let result = kernel.offset(&square(0.0, 0.0, 10.0), 2.0).unwrap();
        assert_abs_diff_eq!(result[0].area(), 36.0, epsilon = 1e-9);
    }
}
