//! # Probability Model
//!
//! Maps a row's score through the logistic transform and thresholds it into a
//! [`Prediction`] of whether the next value will exceed 3.
//!
//! Two scoring variants, selected by [`ScoringVariant`]:
//! - **Composite** (default): `probability = sigmoid(indicator_score)` with the
//!   0..=3 flag sum from the classifier. Strictly increasing in the score.
//! - **RawWeighted**: `score = 0.4|vstatus| + 0.4|vstatus_lv| + 0.2|momentum_raw|`,
//!   `probability = sigmoid(3 - score)`. Large deviations count against a
//!   value above 3.
//!
//! ## Parameters
//! - **threshold**: decision cut-off, defaults to 0.55. Values outside
//!   [0.40, 0.80] are clamped into that range.
//! - **variant**: [`ScoringVariant`] (defaults to `Composite`).
//!
//! ## Errors
//! - **InvalidThreshold**: probability: threshold is `NaN` or infinite.
//! - **LengthMismatch**: probability: feature rows and signals differ in length.
//! - **InvalidRange**: probability batch: empty or malformed threshold sweep.
//!
//! ## Developer Notes
//! - The threshold sweep follows the usual batch layout: a flat row-major
//!   matrix, one row per threshold, rows filled in parallel.

use crate::indicators::classifier::Signals;
use crate::indicators::features::FeatureRow;
use crate::utilities::enums::{Prediction, ScoringVariant};
use crate::utilities::math_functions::sigmoid;
use rayon::prelude::*;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_THRESHOLD: f64 = 0.55;
pub const MIN_THRESHOLD: f64 = 0.40;
pub const MAX_THRESHOLD: f64 = 0.80;
/// Upper bound on the number of thresholds in one sweep.
pub const MAX_SWEEP_ROWS: usize = 10_000;

const RAW_WEIGHT_VSTATUS: f64 = 0.4;
const RAW_WEIGHT_VSTATUS_LV: f64 = 0.4;
const RAW_WEIGHT_MOMENTUM: f64 = 0.2;
const RAW_PIVOT: f64 = 3.0;

#[derive(Debug, Clone)]
pub struct ProbabilityParams {
    pub threshold: Option<f64>,
    pub variant: Option<ScoringVariant>,
}

impl Default for ProbabilityParams {
    fn default() -> Self {
        Self {
            threshold: Some(DEFAULT_THRESHOLD),
            variant: Some(ScoringVariant::Composite),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProbabilityError {
    #[error("probability: threshold must be finite, got {threshold}")]
    InvalidThreshold { threshold: f64 },
    #[error("probability: {rows} feature rows but {signals} signal rows")]
    LengthMismatch { rows: usize, signals: usize },
    #[error("probability: invalid threshold sweep: start={start}, end={end}, step={step}")]
    InvalidRange { start: f64, end: f64, step: f64 },
}

/// Weighted magnitude score used by [`ScoringVariant::RawWeighted`].
#[inline(always)]
pub fn raw_weighted_score(vstatus: f64, vstatus_lv: f64, momentum_raw: f64) -> f64 {
    RAW_WEIGHT_VSTATUS * vstatus.abs()
        + RAW_WEIGHT_VSTATUS_LV * vstatus_lv.abs()
        + RAW_WEIGHT_MOMENTUM * momentum_raw.abs()
}

#[derive(Debug, Clone, Copy)]
pub struct ProbabilityModel {
    threshold: f64,
    variant: ScoringVariant,
}

impl Default for ProbabilityModel {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            variant: ScoringVariant::Composite,
        }
    }
}

impl ProbabilityModel {
    pub fn try_new(params: ProbabilityParams) -> Result<Self, ProbabilityError> {
        let requested = params.threshold.unwrap_or(DEFAULT_THRESHOLD);
        let threshold = clamp_threshold(requested)?;
        Ok(Self {
            threshold,
            variant: params.variant.unwrap_or_default(),
        })
    }

    #[inline(always)]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[inline(always)]
    pub fn variant(&self) -> ScoringVariant {
        self.variant
    }

    /// Argument handed to the sigmoid for this row.
    #[inline]
    pub fn logit(&self, signals: &Signals, row: &FeatureRow) -> f64 {
        match self.variant {
            ScoringVariant::Composite => signals.score() as f64,
            ScoringVariant::RawWeighted => {
                RAW_PIVOT - raw_weighted_score(row.vstatus, row.vstatus_lv, row.momentum_raw)
            }
        }
    }

    #[inline]
    pub fn probability(&self, signals: &Signals, row: &FeatureRow) -> f64 {
        sigmoid(self.logit(signals, row))
    }

    #[inline(always)]
    pub fn predict(&self, probability: f64) -> Prediction {
        decide(probability, self.threshold)
    }
}

#[inline(always)]
fn decide(probability: f64, threshold: f64) -> Prediction {
    if probability >= threshold {
        Prediction::Yes
    } else {
        Prediction::No
    }
}

fn clamp_threshold(threshold: f64) -> Result<f64, ProbabilityError> {
    if !threshold.is_finite() {
        return Err(ProbabilityError::InvalidThreshold { threshold });
    }
    let clamped = threshold.clamp(MIN_THRESHOLD, MAX_THRESHOLD);
    if clamped != threshold {
        warn!(
            requested = threshold,
            used = clamped,
            "probability: threshold outside [0.40, 0.80], clamped"
        );
    }
    Ok(clamped)
}

#[derive(Debug, Clone)]
pub struct ProbabilityInput<'a> {
    pub rows: &'a [FeatureRow],
    pub signals: &'a [Signals],
    pub params: ProbabilityParams,
}

impl<'a> ProbabilityInput<'a> {
    #[inline]
    pub fn from_slices(rows: &'a [FeatureRow], signals: &'a [Signals], params: ProbabilityParams) -> Self {
        Self { rows, signals, params }
    }
}

#[derive(Debug, Clone)]
pub struct ProbabilityOutput {
    pub probabilities: Vec<f64>,
    pub predictions: Vec<Prediction>,
}

pub fn probability(input: &ProbabilityInput) -> Result<ProbabilityOutput, ProbabilityError> {
    if input.rows.len() != input.signals.len() {
        return Err(ProbabilityError::LengthMismatch {
            rows: input.rows.len(),
            signals: input.signals.len(),
        });
    }
    let model = ProbabilityModel::try_new(input.params.clone())?;
    let probabilities: Vec<f64> = input
        .rows
        .iter()
        .zip(input.signals)
        .map(|(row, signals)| model.probability(signals, row))
        .collect();
    let predictions = probabilities.iter().map(|&p| model.predict(p)).collect();
    Ok(ProbabilityOutput {
        probabilities,
        predictions,
    })
}

// --- Threshold sweep ---

#[derive(Clone, Debug)]
pub struct ThresholdRange {
    pub threshold: (f64, f64, f64),
}

impl Default for ThresholdRange {
    fn default() -> Self {
        Self {
            threshold: (MIN_THRESHOLD, MAX_THRESHOLD, 0.05),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ThresholdSweepBuilder {
    range: ThresholdRange,
}

impl ThresholdSweepBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    #[inline]
    pub fn threshold_range(mut self, start: f64, end: f64, step: f64) -> Self {
        self.range.threshold = (start, end, step);
        self
    }
    #[inline]
    pub fn threshold_static(mut self, t: f64) -> Self {
        self.range.threshold = (t, t, 0.0);
        self
    }
    pub fn apply_slice(self, probabilities: &[f64]) -> Result<ThresholdSweepOutput, ProbabilityError> {
        threshold_sweep(probabilities, &self.range)
    }
}

#[derive(Clone, Debug)]
pub struct ThresholdSweepOutput {
    pub values: Vec<Prediction>,
    pub thresholds: Vec<f64>,
    pub rows: usize,
    pub cols: usize,
}

impl ThresholdSweepOutput {
    pub fn row_for_threshold(&self, t: f64) -> Option<usize> {
        self.thresholds.iter().position(|&x| (x - t).abs() < 1e-12)
    }
    pub fn values_for(&self, t: f64) -> Option<&[Prediction]> {
        self.row_for_threshold(t).map(|row| {
            let start = row * self.cols;
            &self.values[start..start + self.cols]
        })
    }
    /// Number of `Yes` predictions in each row.
    pub fn yes_counts(&self) -> Vec<usize> {
        if self.cols == 0 {
            return vec![0; self.rows];
        }
        self.values
            .chunks(self.cols)
            .map(|row| row.iter().filter(|p| p.is_yes()).count())
            .collect()
    }
}

#[inline(always)]
fn expand_grid(r: &ThresholdRange) -> Result<Vec<f64>, ProbabilityError> {
    let (start, end, step) = r.threshold;
    let bad = || ProbabilityError::InvalidRange { start, end, step };
    if !(start.is_finite() && end.is_finite() && step.is_finite()) || step < 0.0 {
        return Err(bad());
    }
    if step.abs() < 1e-12 || (start - end).abs() < 1e-12 {
        return Ok(vec![start]);
    }
    if end < start || (end - start) / step > MAX_SWEEP_ROWS as f64 {
        return Err(bad());
    }
    let mut v = Vec::new();
    let mut k = 0usize;
    loop {
        let x = start + step * k as f64;
        if x > end + 1e-12 {
            break;
        }
        v.push(x);
        k += 1;
    }
    Ok(v)
}

/// Predictions for every threshold of the sweep. Thresholds are used as given,
/// without clamping, so the sweep can probe outside the configured range.
pub fn threshold_sweep(
    probabilities: &[f64],
    sweep: &ThresholdRange,
) -> Result<ThresholdSweepOutput, ProbabilityError> {
    let thresholds = expand_grid(sweep)?;
    let rows = thresholds.len();
    let cols = probabilities.len();
    let mut values = vec![Prediction::No; rows * cols];
    if cols > 0 {
        values
            .par_chunks_mut(cols)
            .zip(thresholds.par_iter())
            .for_each(|(out_row, &t)| {
                for (o, &p) in out_row.iter_mut().zip(probabilities) {
                    *o = decide(p, t);
                }
            });
    }
    Ok(ThresholdSweepOutput {
        values,
        thresholds,
        rows,
        cols,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::classifier::classify;
    use crate::indicators::features::{features, FeatureInput};
    use proptest::prelude::*;

    #[test]
    fn test_default_params() {
        let model = ProbabilityModel::try_new(ProbabilityParams::default()).unwrap();
        assert_eq!(model.threshold(), 0.55);
        assert_eq!(model.variant(), ScoringVariant::Composite);
        let model = ProbabilityModel::try_new(ProbabilityParams {
            threshold: None,
            variant: None,
        })
        .unwrap();
        assert_eq!(model.threshold(), DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_threshold_clamped_and_validated() {
        let hi = ProbabilityModel::try_new(ProbabilityParams {
            threshold: Some(0.95),
            variant: None,
        })
        .unwrap();
        assert_eq!(hi.threshold(), MAX_THRESHOLD);
        let lo = ProbabilityModel::try_new(ProbabilityParams {
            threshold: Some(0.1),
            variant: None,
        })
        .unwrap();
        assert_eq!(lo.threshold(), MIN_THRESHOLD);
        let err = ProbabilityModel::try_new(ProbabilityParams {
            threshold: Some(f64::NAN),
            variant: None,
        })
        .unwrap_err();
        assert!(err.to_string().contains("threshold must be finite"));
    }

    #[test]
    fn test_composite_probability_strictly_increasing() {
        let model = ProbabilityModel::default();
        let row = features(&FeatureInput::with_default_slice(&[1.0])).unwrap().rows[0];
        let mut last = 0.0;
        for score in 0..=3u8 {
            let signals = Signals {
                momentum: score >= 1,
                low_volatility: score >= 2,
                stable_status: score >= 3,
            };
            let p = model.probability(&signals, &row);
            assert!(p > last && p > 0.0 && p < 1.0, "score {} -> {}", score, p);
            last = p;
        }
        // sigmoid(0) = 0.5 < 0.55, sigmoid(1) ≈ 0.731
        assert_eq!(model.predict(0.5), Prediction::No);
        assert_eq!(model.predict(0.7310585786300049), Prediction::Yes);
    }

    #[test]
    fn test_raw_weighted_variant() {
        let model = ProbabilityModel::try_new(ProbabilityParams {
            threshold: None,
            variant: Some(ScoringVariant::RawWeighted),
        })
        .unwrap();
        let rows = features(&FeatureInput::with_default_slice(&[1.0, 5.0, 2.0])).unwrap().rows;
        let signals = Signals::default();
        // row 2: vstatus = 1, vstatus_lv = 4, momentum_raw = -7
        let score = raw_weighted_score(1.0, 4.0, -7.0);
        assert!((score - 3.4).abs() < 1e-12);
        let p = model.probability(&signals, &rows[2]);
        assert!((p - sigmoid(3.0 - 3.4)).abs() < 1e-12);
        assert_eq!(model.predict(p), Prediction::No);
        // flat history: score 0 -> sigmoid(3)
        let p0 = model.probability(&signals, &rows[0]);
        assert!((p0 - sigmoid(3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_batch_probability() {
        let rows = features(&FeatureInput::with_default_slice(&[1.0, 5.0, 2.0, 2.1])).unwrap().rows;
        let cls = classify(&rows);
        let out = probability(&ProbabilityInput::from_slices(
            &rows,
            &cls.signals,
            ProbabilityParams::default(),
        ))
        .unwrap();
        assert_eq!(out.probabilities.len(), 4);
        for (i, s) in cls.signals.iter().enumerate() {
            assert_eq!(out.probabilities[i], sigmoid(s.score() as f64));
        }
        let err = probability(&ProbabilityInput::from_slices(
            &rows,
            &cls.signals[..2],
            ProbabilityParams::default(),
        ))
        .unwrap_err();
        assert!(matches!(err, ProbabilityError::LengthMismatch { rows: 4, signals: 2 }));
    }

    #[test]
    fn test_sweep_grid_and_lookup() {
        let probs = [sigmoid(0.0), sigmoid(1.0), sigmoid(2.0), sigmoid(3.0)];
        let out = ThresholdSweepBuilder::new()
            .threshold_range(0.40, 0.80, 0.10)
            .apply_slice(&probs)
            .unwrap();
        assert_eq!(out.rows, 5);
        assert_eq!(out.cols, 4);
        let at_half = out.values_for(0.50).expect("row for 0.50");
        assert_eq!(at_half, &[Prediction::Yes, Prediction::Yes, Prediction::Yes, Prediction::Yes]);
        let at_top = out.values_for(0.80).expect("row for 0.80");
        assert_eq!(at_top, &[Prediction::No, Prediction::No, Prediction::Yes, Prediction::Yes]);
        assert_eq!(out.yes_counts(), vec![4, 4, 3, 3, 2]);
    }

    #[test]
    fn test_sweep_invalid_range() {
        assert!(ThresholdSweepBuilder::new()
            .threshold_range(0.8, 0.4, 0.1)
            .apply_slice(&[0.5])
            .is_err());
        assert!(ThresholdSweepBuilder::new()
            .threshold_range(0.4, 0.8, f64::NAN)
            .apply_slice(&[0.5])
            .is_err());
        assert!(ThresholdSweepBuilder::new()
            .threshold_range(0.4, 0.8, 1e-11)
            .apply_slice(&[0.5])
            .is_err());
        let widest = ThresholdSweepBuilder::new()
            .threshold_range(0.0, 0.5, 1e-4)
            .apply_slice(&[0.5])
            .unwrap();
        assert!(widest.rows > 4_900 && widest.rows <= MAX_SWEEP_ROWS);
        let single = ThresholdSweepBuilder::new().threshold_static(0.6).apply_slice(&[]).unwrap();
        assert_eq!((single.rows, single.cols), (1, 0));
        assert_eq!(single.yes_counts(), vec![0]);
    }

    proptest! {
        #[test]
        fn raising_threshold_never_revives_yes(scores in prop::collection::vec(0u8..=3, 1..200)) {
            let probs: Vec<f64> = scores.iter().map(|&s| sigmoid(s as f64)).collect();
            let out = ThresholdSweepBuilder::new()
                .threshold_range(0.40, 0.80, 0.01)
                .apply_slice(&probs)
                .unwrap();
            for col in 0..out.cols {
                let mut seen_no = false;
                for row in 0..out.rows {
                    let p = out.values[row * out.cols + col];
                    if seen_no {
                        prop_assert_eq!(p, Prediction::No);
                    }
                    seen_no |= !p.is_yes();
                }
            }
        }
    }
}
