//! # Running Mean
//!
//! Central value attached to every reading. Two definitions are supported and
//! selected through [`MeanMode`]:
//!
//! - **PairwiseLag**: `mean[i] = (target[i-1] + target[i]) / 2`, with
//!   `mean[0] = target[0] / 2` (the missing predecessor counts as zero).
//! - **ExpandingAverage**: `mean[i] = sum(target[0..=i]) / (i + 1)`.
//!
//! ## Parameters
//! - **mode**: [`MeanMode`] (defaults to `PairwiseLag`).
//!
//! ## Errors
//! - **NonFiniteValue**: running_mean: a reading is `NaN` or infinite.
//!
//! ## Returns
//! - `Ok(RunningMeanOutput)` with one value per reading. Empty input gives empty output.
//! - `Err(RunningMeanError)` otherwise.

use crate::utilities::enums::MeanMode;
use crate::utilities::helpers::first_non_finite;
use std::convert::AsRef;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct RunningMeanOutput {
    pub values: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct RunningMeanParams {
    pub mode: Option<MeanMode>,
}

impl Default for RunningMeanParams {
    fn default() -> Self {
        Self {
            mode: Some(MeanMode::PairwiseLag),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunningMeanInput<'a> {
    pub data: &'a [f64],
    pub params: RunningMeanParams,
}

impl<'a> AsRef<[f64]> for RunningMeanInput<'a> {
    #[inline(always)]
    fn as_ref(&self) -> &[f64] {
        self.data
    }
}

impl<'a> RunningMeanInput<'a> {
    #[inline]
    pub fn from_slice(data: &'a [f64], params: RunningMeanParams) -> Self {
        Self { data, params }
    }
    #[inline]
    pub fn with_default_slice(data: &'a [f64]) -> Self {
        Self::from_slice(data, RunningMeanParams::default())
    }
    #[inline]
    pub fn get_mode(&self) -> MeanMode {
        self.params.mode.unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct RunningMeanBuilder {
    mode: Option<MeanMode>,
}

impl RunningMeanBuilder {
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }
    #[inline(always)]
    pub fn mode(mut self, mode: MeanMode) -> Self {
        self.mode = Some(mode);
        self
    }
    #[inline(always)]
    pub fn apply_slice(self, data: &[f64]) -> Result<RunningMeanOutput, RunningMeanError> {
        let params = RunningMeanParams { mode: self.mode };
        running_mean(&RunningMeanInput::from_slice(data, params))
    }
    #[inline(always)]
    pub fn into_stream(self) -> RunningMeanStream {
        RunningMeanStream::new(RunningMeanParams { mode: self.mode })
    }
}

#[derive(Debug, Error)]
pub enum RunningMeanError {
    #[error("running_mean: non-finite reading at index {index}: {value}")]
    NonFiniteValue { index: usize, value: f64 },
}

pub fn running_mean(input: &RunningMeanInput) -> Result<RunningMeanOutput, RunningMeanError> {
    let data: &[f64] = input.as_ref();
    if let Some((index, value)) = first_non_finite(data) {
        return Err(RunningMeanError::NonFiniteValue { index, value });
    }
    let mut out = vec![0.0; data.len()];
    running_mean_scalar(data, input.get_mode(), &mut out);
    Ok(RunningMeanOutput { values: out })
}

#[inline(always)]
pub fn running_mean_scalar(data: &[f64], mode: MeanMode, out: &mut [f64]) {
    match mode {
        MeanMode::PairwiseLag => {
            let mut prev = 0.0;
            for (o, &v) in out.iter_mut().zip(data) {
                *o = (prev + v) / 2.0;
                prev = v;
            }
        }
        MeanMode::ExpandingAverage => {
            let mut sum = 0.0;
            for (i, (o, &v)) in out.iter_mut().zip(data).enumerate() {
                sum += v;
                *o = sum / (i + 1) as f64;
            }
        }
    }
}

/// O(1) running mean. Uses the same operation order as [`running_mean_scalar`].
#[derive(Debug, Clone)]
pub struct RunningMeanStream {
    mode: MeanMode,
    prev: f64,
    sum: f64,
    count: usize,
}

impl RunningMeanStream {
    pub fn new(params: RunningMeanParams) -> Self {
        Self {
            mode: params.mode.unwrap_or_default(),
            prev: 0.0,
            sum: 0.0,
            count: 0,
        }
    }

    #[inline(always)]
    pub fn update(&mut self, value: f64) -> f64 {
        self.count += 1;
        match self.mode {
            MeanMode::PairwiseLag => {
                let m = (self.prev + value) / 2.0;
                self.prev = value;
                m
            }
            MeanMode::ExpandingAverage => {
                self.sum += value;
                self.sum / self.count as f64
            }
        }
    }

    #[inline(always)]
    pub fn mode(&self) -> MeanMode {
        self.mode
    }
}
