use crate::pipeline::engine::{EngineError, EngineParams, IndicatorEngine};
use crate::pipeline::row::Row;
use crate::store::{SeriesStore, StoreError};
use crate::utilities::input::{parse_input_batch, RejectedToken};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppendReport {
    pub appended: usize,
    pub total: usize,
    pub rejected: Vec<RejectedToken>,
}

/// Engine bound to a store. Every successful append is persisted before it
/// returns.
pub struct Session<'s, S: SeriesStore> {
    store: &'s mut S,
    engine: IndicatorEngine,
    in_sync: bool,
}

impl<'s, S: SeriesStore> Session<'s, S> {
    pub fn open(store: &'s mut S, params: EngineParams) -> Result<Self, SessionError> {
        let stored = store.load()?;
        let engine = IndicatorEngine::restore(params, &stored)?;
        let in_sync = stored.len() == engine.len()
            && stored.iter().zip(engine.rows()).all(|(a, b)| a.same_as(b));
        if !in_sync {
            debug!(rows = stored.len(), "session: stored rows differ from recomputed rows");
        }
        Ok(Self {
            store,
            engine,
            in_sync,
        })
    }

    /// Appends `values` and returns the full history.
    pub fn append(&mut self, values: &[f64]) -> Result<&[Row], SessionError> {
        if values.is_empty() {
            return Ok(self.engine.rows());
        }
        let checkpoint = self.engine.checkpoint();
        let start = self.engine.len();
        self.engine.extend(values)?;
        let written = if self.in_sync {
            self.store.append(&self.engine.rows()[start..]).map(|_| ())
        } else {
            self.store.save(self.engine.rows())
        };
        if let Err(e) = written {
            warn!(rejected = values.len(), "session: store write failed, batch not applied");
            self.engine.rollback(checkpoint);
            self.in_sync = false;
            return Err(e.into());
        }
        self.in_sync = true;
        info!(appended = values.len(), rows = self.engine.len(), "session: appended batch");
        Ok(self.engine.rows())
    }

    /// Parses one reading per line and appends the valid ones.
    pub fn append_text(&mut self, text: &str) -> Result<AppendReport, SessionError> {
        let batch = parse_input_batch(text);
        let total = self.append(&batch.values)?.len();
        Ok(AppendReport {
            appended: batch.values.len(),
            total,
            rejected: batch.rejected,
        })
    }

    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.store.clear()?;
        self.engine.clear();
        self.in_sync = true;
        Ok(())
    }

    /// Writes the full table as computed under the session's parameters.
    pub fn recompute(&mut self) -> Result<&[Row], SessionError> {
        self.store.save(self.engine.rows())?;
        self.in_sync = true;
        Ok(self.engine.rows())
    }

    #[inline]
    pub fn rows(&self) -> &[Row] {
        self.engine.rows()
    }

    #[inline]
    pub fn engine(&self) -> &IndicatorEngine {
        &self.engine
    }

    #[inline]
    pub fn is_in_sync(&self) -> bool {
        self.in_sync
    }
}
