//! # Variation
//!
//! Two deviations per reading:
//! - **variation_tv**: first difference `target[i] - target[i-1]`, `0` at `i = 0`.
//!   This is the velocity signal everything downstream keys on.
//! - **variation**: `target[i] - mean[i]`, against whichever running mean was chosen.
//!
//! ## Errors
//! - **LengthMismatch**: variation: `target` and `mean` differ in length.
//!
//! ## Returns
//! - `Ok(VariationOutput)` with both columns, each as long as the input.

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct VariationInput<'a> {
    pub target: &'a [f64],
    pub mean: &'a [f64],
}

impl<'a> VariationInput<'a> {
    #[inline]
    pub fn from_slices(target: &'a [f64], mean: &'a [f64]) -> Self {
        Self { target, mean }
    }
}

#[derive(Debug, Clone)]
pub struct VariationOutput {
    pub variation: Vec<f64>,
    pub variation_tv: Vec<f64>,
}

#[derive(Debug, Error)]
pub enum VariationError {
    #[error("variation: target length {target_len} does not match mean length {mean_len}")]
    LengthMismatch { target_len: usize, mean_len: usize },
}

pub fn variation(input: &VariationInput) -> Result<VariationOutput, VariationError> {
    let (target, mean) = (input.target, input.mean);
    if target.len() != mean.len() {
        return Err(VariationError::LengthMismatch {
            target_len: target.len(),
            mean_len: mean.len(),
        });
    }
    let variation = target.iter().zip(mean).map(|(&t, &m)| t - m).collect();
    Ok(VariationOutput {
        variation,
        variation_tv: first_difference(target),
    })
}

/// `out[0] = 0`, `out[i] = data[i] - data[i-1]`.
#[inline]
pub fn first_difference(data: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(data.len());
    if data.is_empty() {
        return out;
    }
    out.push(0.0);
    for w in data.windows(2) {
        out.push(w[1] - w[0]);
    }
    out
}

/// One step of both variations.
#[derive(Debug, Clone, Default)]
pub struct VariationStream {
    prev_target: Option<f64>,
}

impl VariationStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `(variation, variation_tv)`.
    #[inline(always)]
    pub fn update(&mut self, target: f64, mean: f64) -> (f64, f64) {
        let tv = match self.prev_target {
            Some(prev) => target - prev,
            None => 0.0,
        };
        self.prev_target = Some(target);
        (target - mean, tv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_first_difference_definition() {
        assert!(first_difference(&[]).is_empty());
        assert_eq!(first_difference(&[3.0]), vec![0.0]);
        assert_eq!(first_difference(&[1.0, 5.0, 2.0]), vec![0.0, 4.0, -3.0]);
    }

    #[test]
    fn test_variation_against_mean() {
        let target = [1.0, 5.0, 2.0];
        let mean = [0.5, 3.0, 3.5];
        let out = variation(&VariationInput::from_slices(&target, &mean)).unwrap();
        assert_eq!(out.variation, vec![0.5, 2.0, -1.5]);
        assert_eq!(out.variation_tv, vec![0.0, 4.0, -3.0]);
    }

    #[test]
    fn test_variation_length_mismatch() {
        let res = variation(&VariationInput::from_slices(&[1.0, 2.0], &[1.0]));
        let err = res.unwrap_err();
        assert!(err.to_string().contains("does not match"), "got: {}", err);
        assert!(err.source().is_none());
    }

    #[test]
    fn test_variation_streaming_matches_batch() {
        let target = [2.5, 1.0, 1.0, 9.75, 3.5];
        let mean = [1.25, 1.75, 1.0, 5.375, 6.625];
        let batch = variation(&VariationInput::from_slices(&target, &mean)).unwrap();
        let mut stream = VariationStream::new();
        for i in 0..target.len() {
            let (v, tv) = stream.update(target[i], mean[i]);
            assert_eq!(v.to_bits(), batch.variation[i].to_bits());
            assert_eq!(tv.to_bits(), batch.variation_tv[i].to_bits());
        }
    }
}
