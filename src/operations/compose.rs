use tracing::{debug, warn};

use crate::error::{CompositionError, KernelError};
use crate::geometry::Loop;
use crate::kernel::RegionKernel;
use crate::operations::nesting::Outline;

/// A composed region and the operands that could not be applied.
#[derive(Debug)]
pub struct Composition<R> {
    pub region: R,
    /// Operand index and the kernel error that made it skip.
    pub skipped: Vec<(usize, KernelError)>,
}

impl<R> Composition<R> {
    /// Returns `true` if every operand was applied.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Builds a region from `main` and subtracts every loop in `subtract`.
///
/// A subtrahend whose region cannot be built, or whose subtraction fails, is
/// logged and skipped; the region keeps the result of the operations applied
/// before it.
///
/// # Errors
///
/// Returns [`CompositionError::MainRegion`] if the main loop cannot become a
/// region.
pub fn compose<K, T>(
    kernel: &K,
    main: &Loop,
    subtract: &[T],
) -> Result<Composition<K::Region>, CompositionError>
where
    K: RegionKernel,
    T: AsRef<Loop>,
{
    let region = kernel
        .region_from_loop(main)
        .map_err(CompositionError::MainRegion)?;
    Ok(apply_all(kernel, region, subtract, Operator::Subtract))
}

/// Unites all loops into one region, starting from the first.
///
/// Operands after the first follow the same skip policy as [`compose`].
///
/// # Errors
///
/// - [`CompositionError::EmptyInput`] if `loops` is empty.
/// - [`CompositionError::MainRegion`] if the first loop cannot become a region.
pub fn unite<K, T>(kernel: &K, loops: &[T]) -> Result<Composition<K::Region>, CompositionError>
where
    K: RegionKernel,
    T: AsRef<Loop>,
{
    let Some((first, rest)) = loops.split_first() else {
        return Err(CompositionError::EmptyInput);
    };
    let region = kernel
        .region_from_loop(first.as_ref())
        .map_err(CompositionError::MainRegion)?;
    let mut composition = apply_all(kernel, region, rest, Operator::Unite);
    // Report indices relative to `loops`.
    for (index, _) in &mut composition.skipped {
        *index += 1;
    }
    Ok(composition)
}

/// Composes an outer contour with its holes.
///
/// # Errors
///
/// See [`compose`].
pub fn compose_outline<K, T>(
    kernel: &K,
    outline: &Outline<T>,
) -> Result<Composition<K::Region>, CompositionError>
where
    K: RegionKernel,
    T: AsRef<Loop>,
{
    compose(kernel, outline.outer.as_ref(), &outline.holes)
}

#[derive(Debug, Clone, Copy)]
enum Operator {
    Subtract,
    Unite,
}

fn apply_all<K, T>(
    kernel: &K,
    mut region: K::Region,
    operands: &[T],
    operator: Operator,
) -> Composition<K::Region>
where
    K: RegionKernel,
    T: AsRef<Loop>,
{
    let mut skipped = Vec::new();
    for (index, operand) in operands.iter().enumerate() {
        let applied = kernel
            .region_from_loop(operand.as_ref())
            .and_then(|operand| match operator {
                Operator::Subtract => kernel.subtract(&mut region, operand),
                Operator::Unite => kernel.unite(&mut region, operand),
            });
        if let Err(err) = applied {
            warn!(index, ?operator, %err, "skipping operand the kernel could not apply");
            skipped.push((index, err));
        }
    }
    debug!(
        operands = operands.len(),
        skipped = skipped.len(),
        area = kernel.area(&region),
        "composition finished"
    );
    Composition { region, skipped }
}
