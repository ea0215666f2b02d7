/// Output buffer whose first `warmup` slots are `NaN`; the rest are zeroed and
/// expected to be overwritten.
#[inline]
pub fn alloc_with_nan_prefix(len: usize, warmup: usize) -> Vec<f64> {
    let warm = warmup.min(len);
    let mut out = vec![0.0; len];
    for v in &mut out[..warm] {
        *v = f64::NAN;
    }
    out
}

/// Pads every column with `NaN` up to the longest column so the columns can be
/// zipped into rows without dropping data. Returns the number of cells padded.
pub fn equalize_column_lengths(columns: &mut [Vec<f64>]) -> usize {
    let max_len = columns.iter().map(Vec::len).max().unwrap_or(0);
    let mut padded = 0;
    for col in columns.iter_mut() {
        let missing = max_len - col.len();
        if missing > 0 {
            col.resize(max_len, f64::NAN);
            padded += missing;
        }
    }
    padded
}

/// Index and value of the first non-finite entry, if any.
#[inline]
pub fn first_non_finite(data: &[f64]) -> Option<(usize, f64)> {
    data.iter()
        .position(|v| !v.is_finite())
        .map(|idx| (idx, data[idx]))
}

/// Bitwise equality that also treats two `NaN`s as the same missing marker.
#[inline(always)]
pub fn same_value(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
}
