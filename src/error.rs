use thiserror::Error;

/// Top-level error type for loopweave.
#[derive(Debug, Error)]
pub enum LoopweaveError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error(transparent)]
    Composition(#[from] CompositionError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Errors related to fragment and loop geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("non-finite coordinate in {0}")]
    NonFinite(&'static str),
}

/// Errors reported by a region or offset kernel.
///
/// These are operand-level failures: composition catches them and skips the
/// offending operand.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("invalid loop: {0}")]
    InvalidLoop(String),

    #[error("loop is self-intersecting")]
    SelfIntersecting,

    #[error("unsupported operation: {0}")]
    Unsupported(String),

    #[error("kernel operation failed: {0}")]
    Failed(String),
}

/// Errors raised while ranking or composing loops.
#[derive(Debug, Error)]
pub enum CompositionError {
    #[error("no loops to compose")]
    EmptyInput,

    #[error("designated main loop has area {hinted_area} but the largest loop has area {max_area}")]
    AmbiguousMain { hinted_area: f64, max_area: f64 },

    #[error("main loop index {index} is out of range for {count} loops")]
    MainOutOfRange { index: usize, count: usize },

    #[error("main loop could not be turned into a region: {0}")]
    MainRegion(#[source] KernelError),

    #[error("invalid band: {0}")]
    InvalidBand(String),
}

/// Whole-pipeline failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no usable loops: {fragments} fragments produced {incomplete} incomplete loops")]
    NoUsableLoops { fragments: usize, incomplete: usize },
}

/// Errors reported by a persistence sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink rejected entity: {0}")]
    Rejected(String),
}

/// Convenience type alias for results using [`LoopweaveError`].
pub type Result<T> = std::result::Result<T, LoopweaveError>;
