use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::geometry::{CurveFragment, Loop};
use crate::kernel::{DisplayStyle, OffsetKernel, PersistenceSink, RegionKernel};
use crate::operations::assemble::{AssembleOptions, LoopAssembler};
use crate::operations::band::concentric_bands;
use crate::operations::compose::{compose, compose_outline};
use crate::operations::nesting::{group_outlines, Nesting, NestingOptions};

/// Configuration for [`RebuildOutline`].
#[derive(Debug, Clone, Default)]
pub struct RebuildConfig {
    pub assemble: AssembleOptions,
    pub nesting: NestingOptions,
    /// Style applied to every persisted region.
    pub style: DisplayStyle,
}

/// Counts reported by [`RebuildOutline::execute`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildReport {
    /// Regions handed to the sink.
    pub regions: usize,
    /// Loops sealed by the assembler, complete or not.
    pub loops_assembled: usize,
    /// Loops flagged incomplete and left out of composition.
    pub incomplete: usize,
    /// Fragments shorter than the matching tolerance.
    pub skipped_degenerate: usize,
    /// Holes the kernel could not subtract.
    pub skipped_subtrahends: usize,
}

/// Rebuilds outer-contour-with-holes regions from loose fragments.
///
/// Fragments are assembled into loops, grouped by containment, composed
/// through the region kernel and persisted. With a main hint the grouping
/// step is replaced by a single region: the designated loop minus every
/// other loop.
#[derive(Debug)]
pub struct RebuildOutline {
    fragments: Vec<CurveFragment>,
    config: RebuildConfig,
    main_hint: Option<usize>,
}

impl RebuildOutline {
    /// Creates a rebuild over `fragments` with default configuration.
    #[must_use]
    pub fn new(fragments: Vec<CurveFragment>) -> Self {
        Self {
            fragments,
            config: RebuildConfig::default(),
            main_hint: None,
        }
    }

    /// Sets a custom configuration.
    #[must_use]
    pub fn with_config(mut self, config: RebuildConfig) -> Self {
        self.config = config;
        self
    }

    /// Designates the main loop by its index among the complete loops, in
    /// assembly order.
    #[must_use]
    pub fn with_main_hint(mut self, index: usize) -> Self {
        self.main_hint = Some(index);
        self
    }

    /// Runs the rebuild.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::NoUsableLoops`] if no loop closed properly.
    /// - [`crate::error::CompositionError::MainOutOfRange`] or
    ///   [`crate::error::CompositionError::AmbiguousMain`] if the main hint
    ///   does not name the largest loop.
    /// - [`crate::error::CompositionError::MainRegion`] if an outer contour
    ///   cannot become a region.
    /// - [`crate::error::SinkError`] if the sink rejects a region.
    pub fn execute<K, S>(self, kernel: &K, sink: &mut S) -> Result<RebuildReport>
    where
        K: RegionKernel,
        S: PersistenceSink<K::Region>,
    {
        let fragments = self.fragments.len();
        let assembly = LoopAssembler::new(self.fragments)
            .with_options(self.config.assemble)
            .execute();

        let mut report = RebuildReport {
            loops_assembled: assembly.loops.len(),
            incomplete: assembly.incomplete().count(),
            skipped_degenerate: assembly.skipped_degenerate,
            ..RebuildReport::default()
        };

        let loops = assembly.into_complete_loops();
        if loops.is_empty() {
            return Err(PipelineError::NoUsableLoops {
                fragments,
                incomplete: report.incomplete,
            }
            .into());
        }

        if let Some(index) = self.main_hint {
            let nesting = Nesting::classify_with(loops, Some(index), &self.config.nesting)?;
            let composition = compose(kernel, &nesting.main, &nesting.others)?;
            report.skipped_subtrahends = composition.skipped.len();
            sink.persist_region(composition.region, &self.config.style)?;
            report.regions = 1;
            info!(main = index, loops = report.loops_assembled, "outline rebuild finished");
            return Ok(report);
        }

        for outline in group_outlines(loops, &self.config.nesting) {
            let composition = compose_outline(kernel, &outline)?;
            report.skipped_subtrahends += composition.skipped.len();
            sink.persist_region(composition.region, &self.config.style)?;
            report.regions += 1;
        }

        info!(
            regions = report.regions,
            loops = report.loops_assembled,
            incomplete = report.incomplete,
            "outline rebuild finished"
        );
        Ok(report)
    }
}

/// Configuration for [`BandHatch`].
#[derive(Debug, Clone)]
pub struct BandConfig {
    /// Inward offset distance between rings.
    pub distance: f64,
    /// Maximum number of rings per source loop.
    pub max_rings: usize,
    /// Style of persisted offset loops.
    pub ring_style: DisplayStyle,
    /// Style of persisted bands.
    pub band_style: DisplayStyle,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            distance: 1.0,
            max_rings: 1,
            ring_style: DisplayStyle::outline(1),
            band_style: DisplayStyle::hatch(2, "ANSI31", 1.0),
        }
    }
}

/// Counts reported by [`BandHatch::execute`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BandReport {
    pub bands: usize,
    pub rings: usize,
    /// Source loops that had no inward offset at all.
    pub without_offset: usize,
}

/// Offsets loops inward and fills the bands between successive rings.
#[derive(Debug)]
pub struct BandHatch {
    loops: Vec<Loop>,
    config: BandConfig,
}

impl BandHatch {
    /// Creates a band fill over `loops` with default configuration.
    #[must_use]
    pub fn new(loops: Vec<Loop>) -> Self {
        Self {
            loops,
            config: BandConfig::default(),
        }
    }

    /// Sets a custom configuration.
    #[must_use]
    pub fn with_config(mut self, config: BandConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs the band fill.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SinkError`] if the sink rejects a ring or band.
    pub fn execute<K, S>(self, kernel: &K, sink: &mut S) -> Result<BandReport>
    where
        K: OffsetKernel + RegionKernel,
        S: PersistenceSink<K::Region>,
    {
        let mut report = BandReport::default();
        for (index, source) in self.loops.iter().enumerate() {
            let result = concentric_bands(kernel, source, self.config.distance, self.config.max_rings);
            if result.rings.is_empty() {
                debug!(index, "no inward offset available");
                report.without_offset += 1;
                continue;
            }
            for pair in &result.rings {
                sink.persist_loop(&pair.offset, &self.config.ring_style)?;
                report.rings += 1;
            }
            for band in result.bands {
                sink.persist_band(band, &self.config.band_style)?;
                report.bands += 1;
            }
        }

        info!(
            bands = report.bands,
            rings = report.rings,
            without_offset = report.without_offset,
            "band fill finished"
        );
        Ok(report)
    }
}
