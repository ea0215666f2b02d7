//! # Feature Panel
//!
//! Turns the ordered readings into every derived numeric column:
//! `mean`, `variation`, `variation_tv`, `vstatus`, the three snapshot lags,
//! `vstatus_lv`, the two expanding standard deviations and `ave_mean`. It also
//! carries `momentum_raw` (the change in `variation_tv`) for raw-weighted scoring.
//!
//! ## Parameters
//! - **mean_mode**: [`MeanMode`] for the `mean` column (defaults to `PairwiseLag`).
//!
//! ## Errors
//! - **NonFiniteReading**: features: a reading is `NaN` or infinite.
//! - **Mean** / **Variation**: propagated from the column indicators.
//!
//! ## Returns
//! - `Ok(FeatureOutput)` with one [`FeatureRow`] per reading; empty input gives no rows.
//!
//! ## Developer Notes
//! - The batch path computes each column independently and pads the columns to a
//!   common length before zipping them into rows. The lag columns are the ones
//!   that start late, so the padding is what keeps rows aligned.
//! - [`FeatureStream`] is the O(1) per-append path. For identical readings it
//!   matches the batch path to within 1e-9. Only the Welford std differs from
//!   the batch path in rounding; the other columns are bitwise equal.

use crate::indicators::cumsum::{cumsum, CumSumInput, CumSumStream};
use crate::indicators::expanding_mean::{expanding_mean, ExpandingMeanInput, ExpandingMeanStream};
use crate::indicators::expanding_std::{expanding_std, ExpandingStdInput, ExpandingStdStream};
use crate::indicators::lag::{lag_snapshot, LagInput, LagStream};
use crate::indicators::running_mean::{
    running_mean, RunningMeanError, RunningMeanInput, RunningMeanParams, RunningMeanStream,
};
use crate::indicators::variation::{variation, VariationError, VariationInput, VariationStream};
use crate::utilities::enums::MeanMode;
use crate::utilities::helpers::{equalize_column_lengths, first_non_finite};
use thiserror::Error;
use tracing::debug;

/// Every numeric feature of one reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow {
    pub target: f64,
    pub mean: f64,
    pub variation: f64,
    pub variation_tv: f64,
    pub vstatus: f64,
    pub lag_target: f64,
    pub lag_mean: f64,
    pub lag_variation: f64,
    pub vstatus_lv: f64,
    pub std_tv: f64,
    pub std_dev_variation: f64,
    pub ave_mean: f64,
    pub momentum_raw: f64,
}

/// Lag values already snapshotted for a row. A `NaN` field means "no snapshot";
/// the freshly computed lag is used instead.
#[derive(Debug, Clone, Copy)]
pub struct LagSnapshot {
    pub lag_target: f64,
    pub lag_mean: f64,
    pub lag_variation: f64,
}

impl Default for LagSnapshot {
    fn default() -> Self {
        Self {
            lag_target: f64::NAN,
            lag_mean: f64::NAN,
            lag_variation: f64::NAN,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeatureParams {
    pub mean_mode: Option<MeanMode>,
}

impl Default for FeatureParams {
    fn default() -> Self {
        Self {
            mean_mode: Some(MeanMode::PairwiseLag),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeatureInput<'a> {
    pub data: &'a [f64],
    pub params: FeatureParams,
}

impl<'a> FeatureInput<'a> {
    #[inline]
    pub fn from_slice(data: &'a [f64], params: FeatureParams) -> Self {
        Self { data, params }
    }
    #[inline]
    pub fn with_default_slice(data: &'a [f64]) -> Self {
        Self::from_slice(data, FeatureParams::default())
    }
    #[inline]
    pub fn get_mean_mode(&self) -> MeanMode {
        self.params.mean_mode.unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct FeatureOutput {
    pub rows: Vec<FeatureRow>,
}

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("features: non-finite reading at index {index}: {value}")]
    NonFiniteReading { index: usize, value: f64 },
    #[error(transparent)]
    Mean(#[from] RunningMeanError),
    #[error(transparent)]
    Variation(#[from] VariationError),
}

const COLUMN_COUNT: usize = 13;

pub fn features(input: &FeatureInput) -> Result<FeatureOutput, FeatureError> {
    let target = input.data;
    if let Some((index, value)) = first_non_finite(target) {
        return Err(FeatureError::NonFiniteReading { index, value });
    }
    if target.is_empty() {
        return Ok(FeatureOutput { rows: Vec::new() });
    }

    let mean = running_mean(&RunningMeanInput::from_slice(
        target,
        RunningMeanParams {
            mode: Some(input.get_mean_mode()),
        },
    ))?
    .values;
    let var = variation(&VariationInput::from_slices(target, &mean))?;
    let vstatus = cumsum(&CumSumInput::from_slice(&var.variation_tv)).values;

    let lag_target = lag_snapshot(&LagInput::from_slice(target)).values;
    let lag_mean = lag_snapshot(&LagInput::from_slice(&mean)).values;
    let lag_variation = lag_snapshot(&LagInput::from_slice(&var.variation_tv)).values;
    let vstatus_lv = cumsum(&CumSumInput::from_slice(&lag_variation)).values;

    let std_tv = expanding_std(&ExpandingStdInput::from_slice(&var.variation_tv)).values;
    let std_dev_variation = expanding_std(&ExpandingStdInput::from_slice(&var.variation)).values;
    let ave_mean = expanding_mean(&ExpandingMeanInput::from_slice(target)).values;

    let mut momentum_raw = Vec::with_capacity(target.len());
    momentum_raw.push(0.0);
    momentum_raw.extend(var.variation_tv.windows(2).map(|w| w[1] - w[0]));

    let mut columns: Vec<Vec<f64>> = vec![
        target.to_vec(),
        mean,
        var.variation,
        var.variation_tv,
        vstatus,
        lag_target,
        lag_mean,
        lag_variation,
        vstatus_lv,
        std_tv,
        std_dev_variation,
        ave_mean,
        momentum_raw,
    ];
    debug_assert_eq!(columns.len(), COLUMN_COUNT);
    let padded = equalize_column_lengths(&mut columns);
    if padded > 0 {
        debug!(padded, "features: padded short columns before assembling rows");
    }

    let rows = (0..columns[0].len())
        .map(|i| FeatureRow {
            target: columns[0][i],
            mean: columns[1][i],
            variation: columns[2][i],
            variation_tv: columns[3][i],
            vstatus: columns[4][i],
            lag_target: columns[5][i],
            lag_mean: columns[6][i],
            lag_variation: columns[7][i],
            vstatus_lv: columns[8][i],
            std_tv: columns[9][i],
            std_dev_variation: columns[10][i],
            ave_mean: columns[11][i],
            momentum_raw: columns[12][i],
        })
        .collect();

    Ok(FeatureOutput { rows })
}

/// Incremental feature panel. Every update is O(1).
#[derive(Debug, Clone)]
pub struct FeatureStream {
    mean: RunningMeanStream,
    variation: VariationStream,
    vstatus: CumSumStream,
    vstatus_lv: CumSumStream,
    lag_target: LagStream,
    lag_mean: LagStream,
    lag_variation: LagStream,
    std_tv: ExpandingStdStream,
    std_dev_variation: ExpandingStdStream,
    ave_mean: ExpandingMeanStream,
    prev_variation_tv: f64,
    len: usize,
}

impl FeatureStream {
    pub fn new(params: FeatureParams) -> Self {
        Self {
            mean: RunningMeanStream::new(RunningMeanParams {
                mode: params.mean_mode,
            }),
            variation: VariationStream::new(),
            vstatus: CumSumStream::new(),
            vstatus_lv: CumSumStream::new(),
            lag_target: LagStream::new(),
            lag_mean: LagStream::new(),
            lag_variation: LagStream::new(),
            std_tv: ExpandingStdStream::new(),
            std_dev_variation: ExpandingStdStream::new(),
            ave_mean: ExpandingMeanStream::new(),
            prev_variation_tv: 0.0,
            len: 0,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn update(&mut self, target: f64) -> Result<FeatureRow, FeatureError> {
        self.update_with_lags(target, LagSnapshot::default())
    }

    /// Appends one reading. Non-missing fields of `snapshot` replace the
    /// computed lags, so rows restored from storage keep what was recorded
    /// when they were first appended.
    pub fn update_with_lags(
        &mut self,
        target: f64,
        snapshot: LagSnapshot,
    ) -> Result<FeatureRow, FeatureError> {
        if !target.is_finite() {
            return Err(FeatureError::NonFiniteReading {
                index: self.len,
                value: target,
            });
        }

        let mean = self.mean.update(target);
        let (variation, variation_tv) = self.variation.update(target, mean);
        let vstatus = self.vstatus.update(variation_tv);

        let lag_target = keep_snapshot(snapshot.lag_target, self.lag_target.update(target));
        let lag_mean = keep_snapshot(snapshot.lag_mean, self.lag_mean.update(mean));
        let lag_variation =
            keep_snapshot(snapshot.lag_variation, self.lag_variation.update(variation_tv));
        let vstatus_lv = self.vstatus_lv.update(lag_variation);

        let std_tv = self.std_tv.update(variation_tv);
        let std_dev_variation = self.std_dev_variation.update(variation);
        let ave_mean = self.ave_mean.update(target);

        let momentum_raw = variation_tv - self.prev_variation_tv;
        self.prev_variation_tv = variation_tv;
        self.len += 1;

        Ok(FeatureRow {
            target,
            mean,
            variation,
            variation_tv,
            vstatus,
            lag_target,
            lag_mean,
            lag_variation,
            vstatus_lv,
            std_tv,
            std_dev_variation,
            ave_mean,
            momentum_raw,
        })
    }
}

#[inline(always)]
fn keep_snapshot(snapshot: f64, computed: f64) -> f64 {
    if snapshot.is_nan() {
        computed
    } else {
        snapshot
    }
}
