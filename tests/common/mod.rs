use series_ta::pipeline::Row;

/// Compare two arrays with a tolerance
pub fn assert_array_close(actual: &[f64], expected: &[f64], rtol: f64, atol: f64, name: &str) {
    assert_eq!(actual.len(), expected.len(),
        "{}: Length mismatch: actual {} vs expected {}", name, actual.len(), expected.len());

    for (i, (&a, &e)) in actual.iter().zip(expected.iter()).enumerate() {
        if a.is_nan() && e.is_nan() {
            continue;
        }

        let diff = (a - e).abs();
        let tol = atol + rtol * e.abs();

        assert!(diff <= tol,
            "{}: Value mismatch at index {}: actual {} vs expected {} (diff: {}, tol: {})",
            name, i, a, e, diff, tol);
    }
}

/// Compare every numeric column of two tables
#[allow(dead_code)]
pub fn assert_rows_close(actual: &[Row], expected: &[Row], atol: f64, name: &str) {
    assert_eq!(actual.len(), expected.len(), "{}: row count mismatch", name);
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert_array_close(&a.numeric_fields(), &e.numeric_fields(), 0.0, atol, &format!("{} row {}", name, i));
        assert_eq!(a.prediction, e.prediction, "{}: prediction mismatch at row {}", name, i);
    }
}

/// Readings that exercise all three color bands
#[allow(dead_code)]
pub const SAMPLE_READINGS: [f64; 16] = [
    1.0, 5.0, 2.0, 1.37, 12.5, 3.01, 1.0, 7.25, 1.11, 2.4, 2.4, 30.0, 1.02, 1.5, 4.4, 1.9,
];
