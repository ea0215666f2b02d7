//! # Indicator Engine
//!
//! Owns the growing row history and the O(1) streams behind it. Each reading
//! goes through the feature panel, the classifier and the probability model,
//! and lands as one [`Row`].
//!
//! ## Parameters
//! - **mean_mode**: [`MeanMode`] (defaults to `PairwiseLag`).
//! - **threshold**: decision cut-off (defaults to 0.55, clamped to [0.40, 0.80]).
//! - **scoring**: [`ScoringVariant`] (defaults to `Composite`).
//!
//! ## Errors
//! - **Feature**: engine: a reading is `NaN` or infinite. The whole batch is refused.
//! - **Probability**: engine: the threshold is not finite.
//!
//! ## Developer Notes
//! - [`compute_rows`] is the batch reference over a full series and
//!   agrees with the incremental engine to within 1e-9 on every numeric field.
//! - [`IndicatorEngine::restore`] replays stored targets under the current
//!   parameters. Stored lag snapshots win over recomputed lags, since a lag
//!   field records what was current when its row was first appended.

use crate::indicators::classifier::{classify, color_band, remarks, ClassifierStream};
use crate::indicators::features::{features, FeatureError, FeatureInput, FeatureParams, FeatureRow, FeatureStream};
use crate::indicators::probability::{
    probability, ProbabilityError, ProbabilityInput, ProbabilityModel, ProbabilityParams,
    DEFAULT_THRESHOLD,
};
use crate::pipeline::row::Row;
use crate::utilities::enums::{MeanMode, ScoringVariant};
use crate::utilities::helpers::first_non_finite;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineParams {
    pub mean_mode: Option<MeanMode>,
    pub threshold: Option<f64>,
    pub scoring: Option<ScoringVariant>,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            mean_mode: Some(MeanMode::PairwiseLag),
            threshold: Some(DEFAULT_THRESHOLD),
            scoring: Some(ScoringVariant::Composite),
        }
    }
}

impl EngineParams {
    #[inline]
    pub fn feature_params(&self) -> FeatureParams {
        FeatureParams {
            mean_mode: self.mean_mode,
        }
    }
    #[inline]
    pub fn probability_params(&self) -> ProbabilityParams {
        ProbabilityParams {
            threshold: self.threshold,
            variant: self.scoring,
        }
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct EngineBuilder {
    mean_mode: Option<MeanMode>,
    threshold: Option<f64>,
    scoring: Option<ScoringVariant>,
}

impl EngineBuilder {
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }
    #[inline(always)]
    pub fn mean_mode(mut self, mode: MeanMode) -> Self {
        self.mean_mode = Some(mode);
        self
    }
    #[inline(always)]
    pub fn threshold(mut self, t: f64) -> Self {
        self.threshold = Some(t);
        self
    }
    #[inline(always)]
    pub fn scoring(mut self, variant: ScoringVariant) -> Self {
        self.scoring = Some(variant);
        self
    }
    #[inline(always)]
    pub fn params(self) -> EngineParams {
        EngineParams {
            mean_mode: self.mean_mode,
            threshold: self.threshold,
            scoring: self.scoring,
        }
    }
    pub fn apply_slice(self, data: &[f64]) -> Result<Vec<Row>, EngineError> {
        compute_rows(data, &self.params())
    }
    pub fn into_engine(self) -> Result<IndicatorEngine, EngineError> {
        IndicatorEngine::try_new(self.params())
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine: {0}")]
    Feature(#[from] FeatureError),
    #[error("engine: {0}")]
    Probability(#[from] ProbabilityError),
}

/// Batch computation of the full table for `readings`.
pub fn compute_rows(readings: &[f64], params: &EngineParams) -> Result<Vec<Row>, EngineError> {
    let panel = features(&FeatureInput::from_slice(readings, params.feature_params()))?;
    let classified = classify(&panel.rows);
    let scored = probability(&ProbabilityInput::from_slices(
        &panel.rows,
        &classified.signals,
        params.probability_params(),
    ))?;
    let rows = panel
        .rows
        .iter()
        .enumerate()
        .map(|(i, f)| {
            Row::assemble(
                f,
                classified.signals[i],
                scored.probabilities[i],
                scored.predictions[i],
                classified.remarks[i],
                classified.colors[i],
            )
        })
        .collect();
    Ok(rows)
}

/// Stream state at a given history length. Restoring it drops every row
/// appended after it was taken.
#[derive(Debug, Clone)]
pub struct EngineCheckpoint {
    features: FeatureStream,
    classifier: ClassifierStream,
    len: usize,
}

#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    params: EngineParams,
    features: FeatureStream,
    classifier: ClassifierStream,
    model: ProbabilityModel,
    rows: Vec<Row>,
}

impl IndicatorEngine {
    pub fn try_new(params: EngineParams) -> Result<Self, EngineError> {
        let model = ProbabilityModel::try_new(params.probability_params())?;
        Ok(Self {
            params,
            features: FeatureStream::new(params.feature_params()),
            classifier: ClassifierStream::new(),
            model,
            rows: Vec::new(),
        })
    }

    /// Rebuilds the engine from persisted rows.
    pub fn restore(params: EngineParams, stored: &[Row]) -> Result<Self, EngineError> {
        let mut engine = Self::try_new(params)?;
        engine.rows.reserve(stored.len());
        for row in stored {
            let f = engine.features.update_with_lags(row.target, row.lag_snapshot())?;
            let row = engine.finish(&f);
            engine.rows.push(row);
        }
        debug!(rows = engine.rows.len(), "engine: restored history");
        Ok(engine)
    }

    pub fn push(&mut self, value: f64) -> Result<&Row, EngineError> {
        let f = self.features.update(value)?;
        let row = self.finish(&f);
        self.rows.push(row);
        let last = self.rows.len() - 1;
        Ok(&self.rows[last])
    }

    /// Appends a batch and returns the new rows. A non-finite value anywhere
    /// in the batch rejects the batch before any row is added.
    pub fn extend(&mut self, values: &[f64]) -> Result<&[Row], EngineError> {
        if let Some((offset, value)) = first_non_finite(values) {
            return Err(FeatureError::NonFiniteReading {
                index: self.rows.len() + offset,
                value,
            }
            .into());
        }
        let start = self.rows.len();
        self.rows.reserve(values.len());
        for &v in values {
            let f = self.features.update(v)?;
            let row = self.finish(&f);
            self.rows.push(row);
        }
        Ok(&self.rows[start..])
    }

    #[inline]
    fn finish(&mut self, f: &FeatureRow) -> Row {
        let signals = self.classifier.update(f);
        let p = self.model.probability(&signals, f);
        Row::assemble(
            f,
            signals,
            p,
            self.model.predict(p),
            remarks(f.vstatus, f.vstatus_lv),
            color_band(f.target),
        )
    }

    #[inline(always)]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline(always)]
    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    #[inline(always)]
    pub fn model(&self) -> &ProbabilityModel {
        &self.model
    }

    pub fn checkpoint(&self) -> EngineCheckpoint {
        EngineCheckpoint {
            features: self.features.clone(),
            classifier: self.classifier.clone(),
            len: self.rows.len(),
        }
    }

    pub fn rollback(&mut self, checkpoint: EngineCheckpoint) {
        self.features = checkpoint.features;
        self.classifier = checkpoint.classifier;
        self.rows.truncate(checkpoint.len);
        debug!(rows = checkpoint.len, "engine: rolled back to checkpoint");
    }

    pub fn clear(&mut self) {
        self.features = FeatureStream::new(self.params.feature_params());
        self.classifier = ClassifierStream::new();
        self.rows.clear();
    }
}
