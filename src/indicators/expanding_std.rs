//! # Expanding Standard Deviation
//!
//! Sample standard deviation (`ddof = 1`, divisor `n - 1`) over every value
//! from the start of the series through the current one. Missing (`NaN`)
//! while fewer than two observations exist.
//!
//! ## Developer Notes
//! - The batch function is the reference definition: a two-pass std over each
//!   prefix, O(n²) over the series. It exists for verification and one-shot use.
//! - [`ExpandingStdStream`] uses Welford's update and is O(1) per value. The two
//!   agree to well within 1e-9 for readings of realistic magnitude.

use crate::utilities::helpers::alloc_with_nan_prefix;
use crate::utilities::math_functions::sample_std;

#[derive(Debug, Clone)]
pub struct ExpandingStdInput<'a> {
    pub data: &'a [f64],
}

impl<'a> ExpandingStdInput<'a> {
    #[inline]
    pub fn from_slice(data: &'a [f64]) -> Self {
        Self { data }
    }
}

#[derive(Debug, Clone)]
pub struct ExpandingStdOutput {
    pub values: Vec<f64>,
}

pub fn expanding_std(input: &ExpandingStdInput) -> ExpandingStdOutput {
    let data = input.data;
    let mut out = alloc_with_nan_prefix(data.len(), 1);
    for i in 1..data.len() {
        out[i] = sample_std(&data[..=i]);
    }
    ExpandingStdOutput { values: out }
}

#[derive(Debug, Clone, Default)]
pub struct ExpandingStdStream {
    count: u64,
    mean: f64,
    m2: f64,
}

impl ExpandingStdStream {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn update(&mut self, value: f64) -> f64 {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
        self.current()
    }

    #[inline(always)]
    pub fn current(&self) -> f64 {
        if self.count < 2 {
            f64::NAN
        } else {
            (self.m2.max(0.0) / (self.count - 1) as f64).sqrt()
        }
    }
}
