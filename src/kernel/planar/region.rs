use crate::geometry::{Loop, Orientation};

/// A planar region bounded by non-crossing rings.
///
/// Outer rings run counter-clockwise and holes clockwise, so the enclosed
/// area is the sum of the signed ring areas.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarRegion {
    rings: Vec<Loop>,
}

impl PlanarRegion {
    /// Creates a region with a single outer ring.
    pub(super) fn from_outer(outline: &Loop) -> Self {
        Self {
            rings: vec![outline.oriented(Orientation::CounterClockwise)],
        }
    }

    /// All boundary rings.
    #[must_use]
    pub fn rings(&self) -> &[Loop] {
        &self.rings
    }

    /// Counter-clockwise rings.
    pub fn outer_rings(&self) -> impl Iterator<Item = &Loop> {
        self.rings
            .iter()
            .filter(|r| r.orientation() == Some(Orientation::CounterClockwise))
    }

    /// Clockwise rings.
    pub fn holes(&self) -> impl Iterator<Item = &Loop> {
        self.rings
            .iter()
            .filter(|r| r.orientation() == Some(Orientation::Clockwise))
    }

    /// Enclosed area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.rings.iter().map(Loop::signed_area).sum()
    }

    /// Returns `true` if the region has no boundary left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Returns `true` if `operand` touches or crosses any ring.
    pub(super) fn crosses(&self, operand: &Loop) -> bool {
        self.rings.iter().any(|r| r.intersects(operand))
    }

    /// Returns `true` if `operand` lies in material.
    ///
    /// Material is where an odd number of rings enclose the point.
    pub(super) fn encloses(&self, operand: &Loop, tolerance: f64) -> bool {
        let probe = operand.edge_midpoint(0);
        let depth = self
            .rings
            .iter()
            .filter(|r| !r.is_hole_of(operand, tolerance))
            .filter(|r| r.contains_point(&probe, tolerance))
            .count();
        depth % 2 == 1
    }

    /// Removes every ring that lies inside `operand`.
    pub(super) fn remove_inside(&mut self, operand: &Loop, tolerance: f64) {
        self.rings.retain(|r| !r.is_hole_of(operand, tolerance));
    }

    pub(super) fn push_ring(&mut self, ring: Loop, orientation: Orientation) {
        self.rings.push(ring.oriented(orientation));
    }

    pub(super) fn into_rings(self) -> Vec<Loop> {
        self.rings
    }
}
