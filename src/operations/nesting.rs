use tracing::debug;

use crate::error::CompositionError;
use crate::geometry::Loop;

/// Parameters controlling ranking and containment.
#[derive(Debug, Clone, Copy)]
pub struct NestingOptions {
    /// Relative slack when checking that a designated main loop is the largest.
    pub area_tolerance: f64,
    /// Chord tolerance for point-in-loop tests on arc edges.
    pub tessellation_tolerance: f64,
}

impl Default for NestingOptions {
    fn default() -> Self {
        Self {
            area_tolerance: 1e-9,
            tessellation_tolerance: 1e-3,
        }
    }
}

/// Sorts loops by enclosed area, largest first.
///
/// The sort is stable: loops of equal area keep their input order.
#[must_use]
pub fn rank_by_area<T: AsRef<Loop>>(mut loops: Vec<T>) -> Vec<T> {
    loops.sort_by(|a, b| b.as_ref().area().total_cmp(&a.as_ref().area()));
    loops
}

/// The main (outer) loop and the remaining loops, largest first.
#[derive(Debug, Clone)]
pub struct Nesting<T> {
    pub main: T,
    pub others: Vec<T>,
}

impl<T: AsRef<Loop>> Nesting<T> {
    /// Picks the main loop with default options. See [`Nesting::classify_with`].
    ///
    /// # Errors
    ///
    /// See [`Nesting::classify_with`].
    pub fn classify(loops: Vec<T>, main_hint: Option<usize>) -> Result<Self, CompositionError> {
        Self::classify_with(loops, main_hint, &NestingOptions::default())
    }

    /// Picks the main loop.
    ///
    /// Without a hint the largest loop is the main loop. With a hint (an index
    /// into `loops`), the designated loop must be the largest; it is never
    /// silently replaced.
    ///
    /// # Errors
    ///
    /// - [`CompositionError::EmptyInput`] if `loops` is empty.
    /// - [`CompositionError::MainOutOfRange`] if the hint is not a valid index.
    /// - [`CompositionError::AmbiguousMain`] if the hinted loop is not the largest.
    pub fn classify_with(
        mut loops: Vec<T>,
        main_hint: Option<usize>,
        options: &NestingOptions,
    ) -> Result<Self, CompositionError> {
        if loops.is_empty() {
            return Err(CompositionError::EmptyInput);
        }

        if let Some(index) = main_hint {
            if index >= loops.len() {
                return Err(CompositionError::MainOutOfRange {
                    index,
                    count: loops.len(),
                });
            }
            let hinted_area = loops[index].as_ref().area();
            let max_area = loops
                .iter()
                .map(|l| l.as_ref().area())
                .fold(0.0_f64, f64::max);
            if max_area - hinted_area > options.area_tolerance * max_area.max(1.0) {
                return Err(CompositionError::AmbiguousMain {
                    hinted_area,
                    max_area,
                });
            }
            let main = loops.remove(index);
            return Ok(Self {
                main,
                others: rank_by_area(loops),
            });
        }

        let mut ranked = rank_by_area(loops).into_iter();
        let Some(main) = ranked.next() else {
            return Err(CompositionError::EmptyInput);
        };
        debug!(area = main.as_ref().area(), others = ranked.len(), "classified main loop");
        Ok(Self {
            main,
            others: ranked.collect(),
        })
    }
}

/// Position of a loop in the containment hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestNode {
    /// Index of the smallest loop that contains this one.
    pub parent: Option<usize>,
    /// Number of enclosing loops.
    pub depth: usize,
}

/// Builds the containment hierarchy of non-crossing loops.
///
/// Entry `i` of the result describes `loops[i]`.
#[must_use]
pub fn containment_tree<T: AsRef<Loop>>(loops: &[T], options: &NestingOptions) -> Vec<NestNode> {
    let tol = options.tessellation_tolerance;
    let parents: Vec<Option<usize>> = loops
        .iter()
        .enumerate()
        .map(|(i, inner)| {
            let inner = inner.as_ref();
            loops
                .iter()
                .enumerate()
                .filter(|&(j, outer)| j != i && inner.is_hole_of(outer.as_ref(), tol))
                .min_by(|(_, a), (_, b)| a.as_ref().area().total_cmp(&b.as_ref().area()))
                .map(|(j, _)| j)
        })
        .collect();

    // Parents are strictly larger, so every chain terminates.
    parents
        .iter()
        .map(|&parent| {
            let mut depth = 0;
            let mut cursor = parent;
            while let Some(p) = cursor {
                depth += 1;
                cursor = parents[p];
            }
            NestNode { parent, depth }
        })
        .collect()
}

/// An outer contour with the holes directly inside it.
#[derive(Debug, Clone)]
pub struct Outline<T> {
    pub outer: T,
    pub holes: Vec<T>,
}

/// Groups loops into outlines by containment parity.
///
/// Loops at even depth become outer contours; loops at odd depth become holes
/// of their parent. An island inside a hole starts a new outline. Outlines are
/// returned largest outer first.
#[must_use]
pub fn group_outlines<T: AsRef<Loop>>(loops: Vec<T>, options: &NestingOptions) -> Vec<Outline<T>> {
    let tree = containment_tree(&loops, options);
    let mut order: Vec<usize> = (0..loops.len()).collect();
    order.sort_by(|&a, &b| loops[b].as_ref().area().total_cmp(&loops[a].as_ref().area()));

    let mut slots: Vec<Option<T>> = loops.into_iter().map(Some).collect();
    let mut outline_of: Vec<Option<usize>> = vec![None; slots.len()];
    let mut outlines: Vec<Outline<T>> = Vec::new();

    for i in order {
        let Some(item) = slots[i].take() else {
            continue;
        };
        let node = tree[i];
        let hole_target = if node.depth % 2 == 1 {
            node.parent.and_then(|p| outline_of[p])
        } else {
            None
        };
        match hole_target {
            Some(o) => outlines[o].holes.push(item),
            None => {
                outline_of[i] = Some(outlines.len());
                outlines.push(Outline {
                    outer: item,
                    holes: Vec::new(),
                });
            }
        }
    }

    outlines
}
