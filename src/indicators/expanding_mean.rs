//! # Expanding Mean (`ave_mean`)
//!
//! Arithmetic mean of every reading from the start of the series up to and
//! including the current one. Defined from the first observation.

#[derive(Debug, Clone)]
pub struct ExpandingMeanInput<'a> {
    pub data: &'a [f64],
}

impl<'a> ExpandingMeanInput<'a> {
    #[inline]
    pub fn from_slice(data: &'a [f64]) -> Self {
        Self { data }
    }
}

#[derive(Debug, Clone)]
pub struct ExpandingMeanOutput {
    pub values: Vec<f64>,
}

#[inline]
pub fn expanding_mean(input: &ExpandingMeanInput) -> ExpandingMeanOutput {
    let mut sum = 0.0;
    let values = input
        .data
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            sum += v;
            sum / (i + 1) as f64
        })
        .collect();
    ExpandingMeanOutput { values }
}

#[derive(Debug, Clone, Default)]
pub struct ExpandingMeanStream {
    sum: f64,
    count: usize,
}

impl ExpandingMeanStream {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn update(&mut self, value: f64) -> f64 {
        self.sum += value;
        self.count += 1;
        self.sum / self.count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expanding_mean_values() {
        let out = expanding_mean(&ExpandingMeanInput::from_slice(&[1.0, 5.0, 2.0]));
        assert_eq!(out.values[0], 1.0);
        assert_eq!(out.values[1], 3.0);
        assert!((out.values[2] - 2.667).abs() < 1e-3);
    }

    #[test]
    fn test_expanding_mean_stream_parity() {
        let data = [3.3, 1.01, 12.0, 1.5, 1.5, 2.2];
        let batch = expanding_mean(&ExpandingMeanInput::from_slice(&data)).values;
        let mut stream = ExpandingMeanStream::new();
        for (i, &v) in data.iter().enumerate() {
            assert_eq!(stream.update(v).to_bits(), batch[i].to_bits());
        }
    }
}
