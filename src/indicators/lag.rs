//! # Snapshot Lag
//!
//! A lag field is taken at append time: when the history reaches length `n`,
//! the new row records `series[n - 2]` (missing while `n <= 1`). The value is a
//! snapshot. Once written it is never recomputed, even if the lagged series is
//! later recomputed under different settings.
//!
//! For a strictly append-only history the snapshot coincides with
//! `series[i - 1]`, so the batch function below replays the appends one length
//! at a time instead of shifting the final array.

#[derive(Debug, Clone)]
pub struct LagInput<'a> {
    pub data: &'a [f64],
}

impl<'a> LagInput<'a> {
    #[inline]
    pub fn from_slice(data: &'a [f64]) -> Self {
        Self { data }
    }
}

#[derive(Debug, Clone)]
pub struct LagOutput {
    pub values: Vec<f64>,
}

#[inline]
pub fn lag_snapshot(input: &LagInput) -> LagOutput {
    let data = input.data;
    let values = (1..=data.len())
        .map(|n| {
            let history = &data[..n];
            if history.len() > 1 {
                history[history.len() - 2]
            } else {
                f64::NAN
            }
        })
        .collect();
    LagOutput { values }
}

/// Holds the previous tail so each append can snapshot it in O(1).
#[derive(Debug, Clone)]
pub struct LagStream {
    prev: f64,
}

impl Default for LagStream {
    fn default() -> Self {
        Self { prev: f64::NAN }
    }
}

impl LagStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` as the new tail and returns the snapshot for its row.
    #[inline(always)]
    pub fn update(&mut self, value: f64) -> f64 {
        std::mem::replace(&mut self.prev, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lag_snapshot_first_is_missing() {
        let out = lag_snapshot(&LagInput::from_slice(&[7.0]));
        assert_eq!(out.values.len(), 1);
        assert!(out.values[0].is_nan());
        assert!(lag_snapshot(&LagInput::from_slice(&[])).values.is_empty());
    }

    #[test]
    fn test_lag_snapshot_is_previous_tail() {
        let out = lag_snapshot(&LagInput::from_slice(&[1.0, 5.0, 2.0, 8.0]));
        assert!(out.values[0].is_nan());
        assert_eq!(&out.values[1..], &[1.0, 5.0, 2.0]);
    }

    #[test]
    fn test_lag_stream_replays_appends() {
        let data = [1.0, 5.0, 2.0, 8.0, 0.5];
        let batch = lag_snapshot(&LagInput::from_slice(&data)).values;
        let mut stream = LagStream::new();
        for (i, &v) in data.iter().enumerate() {
            let s = stream.update(v);
            assert!(
                (s.is_nan() && batch[i].is_nan()) || s == batch[i],
                "lag mismatch at {}: {} vs {}",
                i,
                s,
                batch[i]
            );
        }
    }
}
