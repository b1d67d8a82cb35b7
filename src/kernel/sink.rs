use crate::error::SinkError;
use crate::geometry::Loop;
use crate::operations::band::BandBoundary;

use super::{DisplayStyle, PersistenceSink};

/// An entity captured by [`RecordingSink`].
#[derive(Debug, Clone)]
pub enum PersistedEntity<R> {
    Loop(Loop, DisplayStyle),
    Region(R, DisplayStyle),
    Band(BandBoundary, DisplayStyle),
}

/// In-memory sink that keeps everything it is given, in order.
#[derive(Debug, Clone)]
pub struct RecordingSink<R> {
    pub entities: Vec<PersistedEntity<R>>,
}

impl<R> Default for RecordingSink<R> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
        }
    }
}

impl<R> RecordingSink<R> {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Persisted regions, in order.
    pub fn regions(&self) -> impl Iterator<Item = &R> {
        self.entities.iter().filter_map(|e| match e {
            PersistedEntity::Region(r, _) => Some(r),
            _ => None,
        })
    }

    /// Persisted loops, in order.
    pub fn loops(&self) -> impl Iterator<Item = &Loop> {
        self.entities.iter().filter_map(|e| match e {
            PersistedEntity::Loop(l, _) => Some(l),
            _ => None,
        })
    }

    /// Persisted bands, in order.
    pub fn bands(&self) -> impl Iterator<Item = &BandBoundary> {
        self.entities.iter().filter_map(|e| match e {
            PersistedEntity::Band(b, _) => Some(b),
            _ => None,
        })
    }
}

impl<R> PersistenceSink<R> for RecordingSink<R> {
    fn persist_loop(&mut self, outline: &Loop, style: &DisplayStyle) -> Result<(), SinkError> {
        if !outline.closed {
            return Err(SinkError::Rejected("open loop".into()));
        }
        self.entities
            .push(PersistedEntity::Loop(outline.clone(), style.clone()));
        Ok(())
    }

    fn persist_region(&mut self, region: R, style: &DisplayStyle) -> Result<(), SinkError> {
        self.entities
            .push(PersistedEntity::Region(region, style.clone()));
        Ok(())
    }

    fn persist_band(&mut self, band: BandBoundary, style: &DisplayStyle) -> Result<(), SinkError> {
        self.entities.push(PersistedEntity::Band(band, style.clone()));
        Ok(())
    }
}
