use crate::indicators::classifier::{Remarks, Signals};
use crate::indicators::features::{FeatureRow, LagSnapshot};
use crate::utilities::enums::{ColorBand, Prediction};
use crate::utilities::helpers::same_value;
use crate::utilities::serde_fields::{empty_as_default, flag, missing, missing_f64};
use serde::{Deserialize, Serialize};

/// One fully computed row of the panel, in persisted column order.
///
/// Missing numeric values are `NaN`. The aliases accept the headers written by
/// the earlier dashboard export so old tables still load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row {
    #[serde(alias = "Target")]
    pub target: f64,
    #[serde(alias = "Mean", default = "missing", with = "missing_f64")]
    pub mean: f64,
    #[serde(alias = "Variation", default = "missing", with = "missing_f64")]
    pub variation: f64,
    #[serde(alias = "Variation_Tv", default = "missing", with = "missing_f64")]
    pub variation_tv: f64,
    #[serde(alias = "Vstatus", default = "missing", with = "missing_f64")]
    pub vstatus: f64,
    #[serde(alias = "lag_Target", default = "missing", with = "missing_f64")]
    pub lag_target: f64,
    #[serde(alias = "lag_Mean", default = "missing", with = "missing_f64")]
    pub lag_mean: f64,
    #[serde(alias = "lag_Variation", default = "missing", with = "missing_f64")]
    pub lag_variation: f64,
    #[serde(alias = "Vstatus_LV", default = "missing", with = "missing_f64")]
    pub vstatus_lv: f64,
    #[serde(alias = "Std_Tv", default = "missing", with = "missing_f64")]
    pub std_tv: f64,
    #[serde(alias = "StdDev_Variation", default = "missing", with = "missing_f64")]
    pub std_dev_variation: f64,
    #[serde(alias = "Ave_mean", default = "missing", with = "missing_f64")]
    pub ave_mean: f64,
    #[serde(default, with = "flag")]
    pub momentum: bool,
    #[serde(default, with = "flag")]
    pub low_volatility: bool,
    #[serde(default, with = "flag")]
    pub stable_status: bool,
    #[serde(default, deserialize_with = "empty_as_default")]
    pub indicator_score: u8,
    #[serde(default = "missing", with = "missing_f64")]
    pub probability: f64,
    #[serde(default, deserialize_with = "empty_as_default")]
    pub prediction: Prediction,
    #[serde(alias = "Remarks", default)]
    pub remark: String,
    #[serde(alias = "Remarks2", default)]
    pub remark2: String,
    #[serde(alias = "Remarks3", default)]
    pub remark3: String,
    #[serde(alias = "Color", default, deserialize_with = "empty_as_default")]
    pub color: ColorBand,
}

impl Row {
    /// Header of the persisted table; matches the field order above.
    pub const COLUMNS: [&'static str; 22] = [
        "target",
        "mean",
        "variation",
        "variation_tv",
        "vstatus",
        "lag_target",
        "lag_mean",
        "lag_variation",
        "vstatus_lv",
        "std_tv",
        "std_dev_variation",
        "ave_mean",
        "momentum",
        "low_volatility",
        "stable_status",
        "indicator_score",
        "probability",
        "prediction",
        "remark",
        "remark2",
        "remark3",
        "color",
    ];

    /// A row holding only a raw reading; every derived field is missing.
    pub fn from_target(target: f64) -> Self {
        Self {
            target,
            mean: f64::NAN,
            variation: f64::NAN,
            variation_tv: f64::NAN,
            vstatus: f64::NAN,
            lag_target: f64::NAN,
            lag_mean: f64::NAN,
            lag_variation: f64::NAN,
            vstatus_lv: f64::NAN,
            std_tv: f64::NAN,
            std_dev_variation: f64::NAN,
            ave_mean: f64::NAN,
            momentum: false,
            low_volatility: false,
            stable_status: false,
            indicator_score: 0,
            probability: f64::NAN,
            prediction: Prediction::No,
            remark: String::new(),
            remark2: String::new(),
            remark3: String::new(),
            color: ColorBand::default(),
        }
    }

    pub fn assemble(
        f: &FeatureRow,
        signals: Signals,
        probability: f64,
        prediction: Prediction,
        remarks: Remarks,
        color: ColorBand,
    ) -> Self {
        Self {
            target: f.target,
            mean: f.mean,
            variation: f.variation,
            variation_tv: f.variation_tv,
            vstatus: f.vstatus,
            lag_target: f.lag_target,
            lag_mean: f.lag_mean,
            lag_variation: f.lag_variation,
            vstatus_lv: f.vstatus_lv,
            std_tv: f.std_tv,
            std_dev_variation: f.std_dev_variation,
            ave_mean: f.ave_mean,
            momentum: signals.momentum,
            low_volatility: signals.low_volatility,
            stable_status: signals.stable_status,
            indicator_score: signals.score(),
            probability,
            prediction,
            remark: remarks.remark.to_owned(),
            remark2: remarks.remark2.to_owned(),
            remark3: remarks.remark3.to_owned(),
            color,
        }
    }

    #[inline]
    pub fn lag_snapshot(&self) -> LagSnapshot {
        LagSnapshot {
            lag_target: self.lag_target,
            lag_mean: self.lag_mean,
            lag_variation: self.lag_variation,
        }
    }

    /// Numeric fields in column order (flags and score as 0/1 and 0..=3).
    pub fn numeric_fields(&self) -> [f64; 17] {
        [
            self.target,
            self.mean,
            self.variation,
            self.variation_tv,
            self.vstatus,
            self.lag_target,
            self.lag_mean,
            self.lag_variation,
            self.vstatus_lv,
            self.std_tv,
            self.std_dev_variation,
            self.ave_mean,
            self.momentum as u8 as f64,
            self.low_volatility as u8 as f64,
            self.stable_status as u8 as f64,
            self.indicator_score as f64,
            self.probability,
        ]
    }

    /// Field-by-field identity, treating `NaN` as equal to `NaN`.
    pub fn same_as(&self, other: &Row) -> bool {
        self.numeric_fields()
            .iter()
            .zip(other.numeric_fields().iter())
            .all(|(&a, &b)| same_value(a, b))
            && self.prediction == other.prediction
            && self.remark == other.remark
            && self.remark2 == other.remark2
            && self.remark3 == other.remark3
            && self.color == other.color
    }
}
