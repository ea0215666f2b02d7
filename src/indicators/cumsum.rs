//! # Cumulative Sum
//!
//! Running total of a column, reset only by clearing the history. Missing
//! (`NaN`) entries contribute `0`, so a column whose first entries are missing
//! (the lag columns) still yields a defined total from the first row on.
//!
//! Used for `vstatus = cumsum(variation_tv)` and `vstatus_lv = cumsum(lag_variation)`.

#[derive(Debug, Clone)]
pub struct CumSumInput<'a> {
    pub data: &'a [f64],
}

impl<'a> CumSumInput<'a> {
    #[inline]
    pub fn from_slice(data: &'a [f64]) -> Self {
        Self { data }
    }
}

#[derive(Debug, Clone)]
pub struct CumSumOutput {
    pub values: Vec<f64>,
}

#[inline]
pub fn cumsum(input: &CumSumInput) -> CumSumOutput {
    let mut acc = 0.0;
    let values = input
        .data
        .iter()
        .map(|&v| {
            if !v.is_nan() {
                acc += v;
            }
            acc
        })
        .collect();
    CumSumOutput { values }
}

#[derive(Debug, Clone, Default)]
pub struct CumSumStream {
    total: f64,
}

impl CumSumStream {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn update(&mut self, value: f64) -> f64 {
        if !value.is_nan() {
            self.total += value;
        }
        self.total
    }

    #[inline(always)]
    pub fn total(&self) -> f64 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cumsum_running_total() {
        let out = cumsum(&CumSumInput::from_slice(&[0.0, 4.0, -3.0]));
        assert_eq!(out.values, vec![0.0, 4.0, 1.0]);
    }

    #[test]
    fn test_cumsum_treats_missing_as_zero() {
        let out = cumsum(&CumSumInput::from_slice(&[f64::NAN, 0.0, 4.0, f64::NAN, -3.0]));
        assert_eq!(out.values, vec![0.0, 0.0, 4.0, 4.0, 1.0]);
    }

    #[test]
    fn test_cumsum_stream_matches_batch() {
        let data = [f64::NAN, 0.25, -1.5, 3.125, f64::NAN, 0.1];
        let batch = cumsum(&CumSumInput::from_slice(&data)).values;
        let mut stream = CumSumStream::new();
        for (i, &v) in data.iter().enumerate() {
            assert_eq!(stream.update(v).to_bits(), batch[i].to_bits(), "idx {}", i);
        }
        assert_eq!(stream.total().to_bits(), batch[data.len() - 1].to_bits());
    }
}
