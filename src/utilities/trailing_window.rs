/// Fixed-capacity ring of the last `N` values, used for short trailing
/// statistics that must update in O(1).
#[derive(Clone, Debug)]
pub struct TrailingWindow<const N: usize> {
    buf: [f64; N],
    head: usize,
    len: usize,
}

impl<const N: usize> Default for TrailingWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TrailingWindow<N> {
    pub const fn new() -> Self {
        Self { buf: [f64::NAN; N], head: 0, len: 0 }
    }

    #[inline(always)]
    pub fn push(&mut self, value: f64) {
        self.buf[self.head] = value;
        let next = self.head + 1;
        self.head = if next == N { 0 } else { next };
        if self.len < N {
            self.len += 1;
        }
    }

    /// Mean of the non-`NaN` values held; `NaN` if none. Matches a trailing
    /// window with `min_periods = 1` that is clamped at the series start.
    #[inline]
    pub fn nan_mean(&self) -> f64 {
        let mut sum = 0.0;
        let mut count = 0usize;
        // Oldest to newest so the summation order matches a slice walk.
        let start = (self.head + N - self.len) % N;
        for k in 0..self.len {
            let v = self.buf[(start + k) % N];
            if !v.is_nan() {
                sum += v;
                count += 1;
            }
        }
        if count == 0 {
            f64::NAN
        } else {
            sum / count as f64
        }
    }
}
