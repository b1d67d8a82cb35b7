//! Collaborator interfaces the core sequences but does not implement.
//!
//! A host application plugs its own geometry kernel and drawing database in
//! through these traits. [`planar`] provides an in-crate implementation.

pub mod planar;
mod sink;

pub use sink::{PersistedEntity, RecordingSink};

use crate::error::{KernelError, SinkError};
use crate::geometry::{CurveFragment, Loop};
use crate::operations::band::BandBoundary;

/// Boolean-composable regions.
///
/// Operands are taken by value: the kernel owns and releases them whether
/// the operation succeeds or fails. A failed operation must leave `target`
/// unchanged.
pub trait RegionKernel {
    type Region;

    /// Builds a region bounded by one closed loop.
    ///
    /// # Errors
    ///
    /// Returns a [`KernelError`] if the loop cannot bound a region.
    fn region_from_loop(&self, outline: &Loop) -> Result<Self::Region, KernelError>;

    /// Removes `operand` from `target` in place.
    ///
    /// # Errors
    ///
    /// Returns a [`KernelError`] if the boolean fails.
    fn subtract(&self, target: &mut Self::Region, operand: Self::Region) -> Result<(), KernelError>;

    /// Adds `operand` to `target` in place.
    ///
    /// # Errors
    ///
    /// Returns a [`KernelError`] if the boolean fails.
    fn unite(&self, target: &mut Self::Region, operand: Self::Region) -> Result<(), KernelError>;

    /// Returns the region's boundary as fragments.
    fn decompose(&self, region: &Self::Region) -> Vec<CurveFragment>;

    /// Enclosed area of the region.
    fn area(&self, region: &Self::Region) -> f64;
}

/// Curve offsetting.
pub trait OffsetKernel {
    /// Offsets a closed loop by a signed distance.
    ///
    /// The sign convention is kernel-defined; callers that need a specific
    /// side must check the result. An empty vector means no offset exists.
    ///
    /// # Errors
    ///
    /// Returns a [`KernelError`] if the offset fails.
    fn offset(&self, outline: &Loop, distance: f64) -> Result<Vec<Loop>, KernelError>;
}

/// Fill applied to a persisted entity.
#[derive(Debug, Clone, PartialEq)]
pub enum FillPattern {
    None,
    Solid,
    Hatch {
        pattern: String,
        scale: f64,
        angle: f64,
    },
}

/// Display attributes handed to the persistence sink.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayStyle {
    /// Host color index.
    pub color_index: u8,
    pub fill: FillPattern,
}

impl Default for DisplayStyle {
    fn default() -> Self {
        Self {
            color_index: 7,
            fill: FillPattern::None,
        }
    }
}

impl DisplayStyle {
    /// An unfilled style with the given color.
    #[must_use]
    pub fn outline(color_index: u8) -> Self {
        Self {
            color_index,
            fill: FillPattern::None,
        }
    }

    /// A hatch-filled style.
    #[must_use]
    pub fn hatch(color_index: u8, pattern: impl Into<String>, scale: f64) -> Self {
        Self {
            color_index,
            fill: FillPattern::Hatch {
                pattern: pattern.into(),
                scale,
                angle: 0.0,
            },
        }
    }
}

/// Receives finished loops, regions and bands.
pub trait PersistenceSink<R> {
    /// Persists a loop as a boundary entity.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] if the sink rejects the entity.
    fn persist_loop(&mut self, outline: &Loop, style: &DisplayStyle) -> Result<(), SinkError>;

    /// Persists a composed region, taking ownership of it.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] if the sink rejects the entity.
    fn persist_region(&mut self, region: R, style: &DisplayStyle) -> Result<(), SinkError>;

    /// Persists a band fill.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] if the sink rejects the entity.
    fn persist_band(&mut self, band: BandBoundary, style: &DisplayStyle) -> Result<(), SinkError>;
}
