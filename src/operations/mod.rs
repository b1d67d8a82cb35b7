pub mod assemble;
pub mod band;
pub mod compose;
pub mod nesting;
pub mod pipeline;

pub use assemble::{
    AssembleOptions, AssembledLoop, Assembly, IncompleteReason, LoopAssembler, LoopStatus,
};
pub use band::{
    concentric_bands, fill_band, offset_inward, BandBoundary, ConcentricBands, OffsetPair,
    OffsetSide,
};
pub use compose::{compose, compose_outline, unite, Composition};
pub use nesting::{
    containment_tree, group_outlines, rank_by_area, NestNode, Nesting, NestingOptions, Outline,
};
pub use pipeline::{
    BandConfig, BandHatch, BandReport, RebuildConfig, RebuildOutline, RebuildReport,
};
