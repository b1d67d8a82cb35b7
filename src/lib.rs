pub mod error;
pub mod geometry;
pub mod kernel;
pub mod math;
pub mod operations;

pub use error::{LoopweaveError, Result};
