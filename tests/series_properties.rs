mod common;

use common::{assert_array_close, assert_rows_close, SAMPLE_READINGS};
use proptest::prelude::*;
use series_ta::indicators::classifier::Signals;
use series_ta::indicators::probability::{ProbabilityModel, ProbabilityParams, ThresholdSweepBuilder};
use series_ta::indicators::features::FeatureRow;
use series_ta::pipeline::{compute_rows, EngineBuilder, EngineParams, IndicatorEngine, Row};
use series_ta::utilities::enums::{MeanMode, Prediction, ScoringVariant};
use std::error::Error;

fn column(rows: &[Row], f: impl Fn(&Row) -> f64) -> Vec<f64> {
    rows.iter().map(f).collect()
}

fn incremental(readings: &[f64], params: EngineParams) -> Result<Vec<Row>, Box<dyn Error>> {
    let mut engine = IndicatorEngine::try_new(params)?;
    for &v in readings {
        engine.push(v)?;
    }
    Ok(engine.rows().to_vec())
}

#[test]
fn vstatus_is_prefix_sum_of_variation_tv() -> Result<(), Box<dyn Error>> {
    for mode in [MeanMode::PairwiseLag, MeanMode::ExpandingAverage] {
        let rows = EngineBuilder::new().mean_mode(mode).apply_slice(&SAMPLE_READINGS)?;
        let mut total = 0.0;
        for (i, r) in rows.iter().enumerate() {
            total += r.variation_tv;
            assert!((r.vstatus - total).abs() < 1e-9, "vstatus at {}: {} vs {}", i, r.vstatus, total);
        }
    }
    Ok(())
}

#[test]
fn variation_tv_is_first_difference() -> Result<(), Box<dyn Error>> {
    let rows = compute_rows(&SAMPLE_READINGS, &EngineParams::default())?;
    assert_eq!(rows[0].variation_tv, 0.0);
    for i in 1..rows.len() {
        assert_eq!(rows[i].variation_tv, SAMPLE_READINGS[i] - SAMPLE_READINGS[i - 1]);
    }
    Ok(())
}

#[test]
fn lag_fields_snapshot_previous_reading() -> Result<(), Box<dyn Error>> {
    let rows = incremental(&SAMPLE_READINGS, EngineParams::default())?;
    assert!(rows[0].lag_target.is_nan() && rows[0].lag_mean.is_nan() && rows[0].lag_variation.is_nan());
    for i in 1..rows.len() {
        assert_eq!(rows[i].lag_target, rows[i - 1].target);
        assert_eq!(rows[i].lag_mean, rows[i - 1].mean);
        assert_eq!(rows[i].lag_variation, rows[i - 1].variation_tv);
    }
    Ok(())
}

#[test]
fn single_reading_boundary() -> Result<(), Box<dyn Error>> {
    for mode in [MeanMode::PairwiseLag, MeanMode::ExpandingAverage] {
        let rows = incremental(&[3.3], EngineBuilder::new().mean_mode(mode).params())?;
        let r = &rows[0];
        assert!(r.std_tv.is_nan() && r.std_dev_variation.is_nan());
        assert!(r.lag_target.is_nan() && r.lag_mean.is_nan() && r.lag_variation.is_nan());
        assert_eq!(r.vstatus, 0.0);
        assert_eq!(r.variation_tv, 0.0);
        assert_eq!(r.vstatus_lv, 0.0);
        assert_eq!(r.ave_mean, 3.3);
    }
    Ok(())
}

#[test]
fn empty_history_has_no_rows() -> Result<(), Box<dyn Error>> {
    assert!(compute_rows(&[], &EngineParams::default())?.is_empty());
    Ok(())
}

#[test]
fn expanding_average_scenario() -> Result<(), Box<dyn Error>> {
    let rows = EngineBuilder::new()
        .mean_mode(MeanMode::ExpandingAverage)
        .apply_slice(&[1.0, 5.0, 2.0])?;
    assert_array_close(&column(&rows, |r| r.target), &[1.0, 5.0, 2.0], 0.0, 1e-12, "target");
    assert_array_close(&column(&rows, |r| r.variation_tv), &[0.0, 4.0, -3.0], 0.0, 1e-12, "variation_tv");
    assert_array_close(&column(&rows, |r| r.vstatus), &[0.0, 4.0, 1.0], 0.0, 1e-12, "vstatus");
    assert_array_close(&column(&rows, |r| r.ave_mean), &[1.0, 3.0, 2.667], 0.0, 1e-3, "ave_mean");
    let momentum: Vec<bool> = rows.iter().map(|r| r.momentum).collect();
    assert_eq!(momentum, vec![false, true, false]);
    Ok(())
}

#[test]
fn composite_probability_is_strictly_increasing() {
    let model = ProbabilityModel::default();
    let row = FeatureRow {
        target: 1.0,
        mean: 0.5,
        variation: 0.5,
        variation_tv: 0.0,
        vstatus: 0.0,
        lag_target: f64::NAN,
        lag_mean: f64::NAN,
        lag_variation: f64::NAN,
        vstatus_lv: 0.0,
        std_tv: f64::NAN,
        std_dev_variation: f64::NAN,
        ave_mean: 1.0,
        momentum_raw: 0.0,
    };
    let flags = [
        Signals { momentum: false, low_volatility: false, stable_status: false },
        Signals { momentum: true, low_volatility: false, stable_status: false },
        Signals { momentum: true, low_volatility: true, stable_status: false },
        Signals { momentum: true, low_volatility: true, stable_status: true },
    ];
    let probs: Vec<f64> = flags.iter().map(|s| model.probability(s, &row)).collect();
    for w in probs.windows(2) {
        assert!(w[0] < w[1], "{} !< {}", w[0], w[1]);
    }
    assert!(probs.iter().all(|&p| p > 0.0 && p < 1.0));
}

#[test]
fn raw_weighted_probability_stays_in_unit_interval() -> Result<(), Box<dyn Error>> {
    let params = EngineBuilder::new().scoring(ScoringVariant::RawWeighted).params();
    let rows = compute_rows(&SAMPLE_READINGS, &params)?;
    assert!(rows.iter().all(|r| r.probability > 0.0 && r.probability < 1.0));
    let model = ProbabilityModel::try_new(ProbabilityParams {
        threshold: None,
        variant: Some(ScoringVariant::RawWeighted),
    })?;
    assert_eq!(model.variant(), ScoringVariant::RawWeighted);
    Ok(())
}

#[test]
fn threshold_sweep_never_revives_a_no() -> Result<(), Box<dyn Error>> {
    let probs = column(&compute_rows(&SAMPLE_READINGS, &EngineParams::default())?, |r| r.probability);
    let sweep = ThresholdSweepBuilder::new()
        .threshold_range(0.40, 0.80, 0.05)
        .apply_slice(&probs)?;
    assert_eq!(sweep.rows, 9);
    for col in 0..sweep.cols {
        let mut seen_no = false;
        for row in 0..sweep.rows {
            let p = sweep.values[row * sweep.cols + col];
            if seen_no {
                assert_eq!(p, Prediction::No, "column {} revived at threshold {}", col, sweep.thresholds[row]);
            }
            seen_no |= p == Prediction::No;
        }
    }
    let counts = sweep.yes_counts();
    assert!(counts.windows(2).all(|w| w[0] >= w[1]));
    Ok(())
}

proptest! {
    #[test]
    fn incremental_matches_batch(
        readings in prop::collection::vec(0.5f64..60.0, 5..80),
        expanding in any::<bool>(),
        raw_weighted in any::<bool>(),
    ) {
        let mode = if expanding { MeanMode::ExpandingAverage } else { MeanMode::PairwiseLag };
        let scoring = if raw_weighted { ScoringVariant::RawWeighted } else { ScoringVariant::Composite };
        let params = EngineBuilder::new().mean_mode(mode).scoring(scoring).params();
        let batch = compute_rows(&readings, &params).unwrap();
        let stream = incremental(&readings, params).unwrap();
        assert_rows_close(&stream, &batch, 1e-9, "incremental");
    }

    #[test]
    fn vstatus_tracks_prefix_sum(readings in prop::collection::vec(-100.0f64..100.0, 1..120)) {
        let rows = compute_rows(&readings, &EngineParams::default()).unwrap();
        let mut total = 0.0;
        for r in &rows {
            total += r.variation_tv;
            prop_assert!((r.vstatus - total).abs() < 1e-9);
        }
    }
}
