use tracing::{debug, warn};

use crate::geometry::fragment::{CurveFragment, Traversal};
use crate::geometry::loops::{Loop, LoopVertex};
use crate::math::{points_coincide, Point2};

/// Parameters controlling loop assembly.
#[derive(Debug, Clone, Copy)]
pub struct AssembleOptions {
    /// Endpoint matching distance (ε).
    pub tolerance: f64,
    /// Loops enclosing less area than this are flagged incomplete.
    pub min_area: f64,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            min_area: 1e-9,
        }
    }
}

/// Why an assembled loop is not a valid closed boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncompleteReason {
    /// No connecting fragment was found before the chain returned to its start.
    OpenChain,
    /// Fewer than three distinct vertices.
    ///
    /// A two-vertex loop with an arc edge, such as two semicircles, is not
    /// flagged: it keeps one vertex per fragment and still encloses area.
    TooFewVertices,
    /// Enclosed area below [`AssembleOptions::min_area`].
    BelowMinimumArea,
}

/// Validity of an assembled loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStatus {
    Complete,
    Incomplete(IncompleteReason),
}

/// A sealed loop together with the number of fragments it consumed.
#[derive(Debug, Clone)]
pub struct AssembledLoop {
    pub outline: Loop,
    pub fragment_count: usize,
    pub status: LoopStatus,
}

impl AssembledLoop {
    /// Returns `true` if the loop closed back on itself with enough area.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == LoopStatus::Complete
    }
}

impl AsRef<Loop> for AssembledLoop {
    fn as_ref(&self) -> &Loop {
        &self.outline
    }
}

/// Output of [`LoopAssembler::execute`].
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    /// Loops in discovery order, complete and incomplete.
    pub loops: Vec<AssembledLoop>,
    /// Input fragments shorter than the matching tolerance.
    pub skipped_degenerate: usize,
}

impl Assembly {
    /// Loops that closed properly.
    pub fn complete(&self) -> impl Iterator<Item = &AssembledLoop> {
        self.loops.iter().filter(|l| l.is_complete())
    }

    /// Loops flagged for caller inspection.
    pub fn incomplete(&self) -> impl Iterator<Item = &AssembledLoop> {
        self.loops.iter().filter(|l| !l.is_complete())
    }

    /// Total fragments consumed by the loops.
    #[must_use]
    pub fn consumed_fragments(&self) -> usize {
        self.loops.iter().map(|l| l.fragment_count).sum()
    }

    /// Drops bookkeeping and returns only the complete loops.
    #[must_use]
    pub fn into_complete_loops(self) -> Vec<Loop> {
        self.loops
            .into_iter()
            .filter(AssembledLoop::is_complete)
            .map(|l| l.outline)
            .collect()
    }
}

/// Rebuilds closed loops from an unordered set of line/arc fragments.
///
/// # Algorithm
///
/// 1. Seed a loop with the first remaining fragment in stored direction.
/// 2. From the loop's last vertex, take the first remaining fragment whose
///    start (forward) or end (reversed, bulge negated) lies within ε.
/// 3. Seal when the chain returns to its seed vertex, when a fragment closes
///    on itself at the last vertex, or when nothing connects.
///
/// Every non-degenerate fragment is consumed exactly once. The endpoint scan
/// is quadratic in the fragment count.
#[derive(Debug)]
pub struct LoopAssembler {
    fragments: Vec<CurveFragment>,
    options: AssembleOptions,
}

impl LoopAssembler {
    /// Creates an assembler that will drain `fragments`.
    #[must_use]
    pub fn new(fragments: Vec<CurveFragment>) -> Self {
        Self {
            fragments,
            options: AssembleOptions::default(),
        }
    }

    /// Sets custom assembly options.
    #[must_use]
    pub fn with_options(mut self, options: AssembleOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs the assembly. Empty input yields an empty [`Assembly`].
    #[must_use]
    pub fn execute(self) -> Assembly {
        let tol = self.options.tolerance;
        let total = self.fragments.len();
        let mut remaining: Vec<CurveFragment> = Vec::with_capacity(total);
        for f in self.fragments {
            if !f.is_degenerate(tol) {
                remaining.push(f);
            }
        }
        let skipped_degenerate = total - remaining.len();
        if skipped_degenerate > 0 {
            debug!(skipped_degenerate, "skipped fragments shorter than the matching tolerance");
        }

        let mut loops = Vec::new();
        while !remaining.is_empty() {
            let seed = remaining.remove(0);
            loops.push(grow_loop(seed, &mut remaining, &self.options));
        }

        Assembly {
            loops,
            skipped_degenerate,
        }
    }
}

/// Grows one loop from `seed`, consuming connecting fragments from `remaining`.
fn grow_loop(
    seed: CurveFragment,
    remaining: &mut Vec<CurveFragment>,
    options: &AssembleOptions,
) -> AssembledLoop {
    let tol = options.tolerance;
    let first = seed.start();
    let mut vertices = vec![
        LoopVertex::new(first.x, first.y, seed.bulge(Traversal::Forward)),
        LoopVertex::line(seed.end().x, seed.end().y),
    ];
    let mut fragment_count = 1;
    let mut closed_back = false;

    loop {
        let last = vertices[vertices.len() - 1].point();
        if points_coincide(&last, &first, tol) {
            closed_back = true;
            break;
        }

        let Some((idx, traversal)) = find_connection(remaining, &last, tol) else {
            break;
        };
        let fragment = remaining.remove(idx);
        fragment_count += 1;

        let Some(traversal) = traversal else {
            // Both ends sit on the last vertex: the fragment closes on itself.
            break;
        };

        let (_, far) = fragment.endpoints(traversal);
        let n = vertices.len();
        vertices[n - 1].bulge = fragment.bulge(traversal);
        vertices.push(LoopVertex::line(far.x, far.y));
    }

    if closed_back {
        // The repeat of the seed vertex carries no edge of its own.
        vertices.pop();
    }

    let outline = Loop::closed(vertices);
    let status = classify(&outline, closed_back, options);
    let area = outline.signed_area();
    match status {
        LoopStatus::Complete => {
            debug!(vertices = outline.vertices.len(), fragment_count, area, "sealed loop");
        }
        LoopStatus::Incomplete(reason) => {
            warn!(?reason, vertices = outline.vertices.len(), fragment_count, area, "sealed incomplete loop");
        }
    }

    AssembledLoop {
        outline,
        fragment_count,
        status,
    }
}

/// Finds the first fragment touching `last`.
///
/// Returns the index and traversal, with `None` traversal for a fragment
/// whose both endpoints lie on `last`.
fn find_connection(
    remaining: &[CurveFragment],
    last: &Point2,
    tol: f64,
) -> Option<(usize, Option<Traversal>)> {
    remaining.iter().enumerate().find_map(|(idx, f)| {
        let at_start = points_coincide(&f.start(), last, tol);
        let at_end = points_coincide(&f.end(), last, tol);
        match (at_start, at_end) {
            (true, true) => Some((idx, None)),
            (true, false) => Some((idx, Some(Traversal::Forward))),
            (false, true) => Some((idx, Some(Traversal::Reversed))),
            (false, false) => None,
        }
    })
}

fn classify(outline: &Loop, closed_back: bool, options: &AssembleOptions) -> LoopStatus {
    if !closed_back {
        return LoopStatus::Incomplete(IncompleteReason::OpenChain);
    }
    let distinct = outline.distinct_vertex_count(options.tolerance);
    let has_arc = outline.vertices.iter().any(LoopVertex::is_arc);
    if distinct < 3 && !(distinct == 2 && has_arc) {
        return LoopStatus::Incomplete(IncompleteReason::TooFewVertices);
    }
    if outline.area() < options.min_area {
        return LoopStatus::Incomplete(IncompleteReason::BelowMinimumArea);
    }
    LoopStatus::Complete
}
