/// Standard logistic `1 / (1 + e^-x)`, evaluated on the side of zero that keeps
/// `exp` from overflowing.
#[inline(always)]
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Two-pass sample standard deviation (`ddof = 1`). `NaN` for fewer than two points.
#[inline]
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let ssd: f64 = values.iter().map(|&v| (v - mean) * (v - mean)).sum();
    (ssd / (n - 1) as f64).sqrt()
}

/// Mean over the finite entries of `values`; `NaN` when there are none.
#[inline]
pub fn nan_mean(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for &v in values {
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
