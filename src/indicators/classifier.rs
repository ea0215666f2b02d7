//! # Indicator Classifier
//!
//! Three independent boolean signals per row, summed into a 0..=3 composite score:
//!
//! - **momentum**: `variation_tv > 0`.
//! - **low_volatility**: `std_tv` is below its own trailing mean over the last
//!   three rows. The window is clamped at the series start and skips missing
//!   values. A missing `std_tv` never counts as low volatility.
//! - **stable_status**: `|vstatus| < 0.7` and `|vstatus_lv| < 0.9`.
//!
//! Also derives the diagnostic remarks (not used for prediction) and the
//! color band of the raw target.

use crate::indicators::features::FeatureRow;
use crate::utilities::enums::ColorBand;
use crate::utilities::math_functions::nan_mean;
use crate::utilities::trailing_window::TrailingWindow;

pub const LOW_VOLATILITY_WINDOW: usize = 3;
pub const STABLE_VSTATUS_LIMIT: f64 = 0.7;
pub const STABLE_VSTATUS_LV_LIMIT: f64 = 0.9;

pub const REMARK_NEGATIVE: &str = "Vstatus < 0";
pub const REMARK_CONDITION_MET: &str = "Condition Met";
pub const REMARK_CM: &str = "CM";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub momentum: bool,
    pub low_volatility: bool,
    pub stable_status: bool,
}

impl Signals {
    #[inline(always)]
    pub fn score(&self) -> u8 {
        self.momentum as u8 + self.low_volatility as u8 + self.stable_status as u8
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Remarks {
    pub remark: &'static str,
    pub remark2: &'static str,
    pub remark3: &'static str,
}

#[derive(Debug, Clone)]
pub struct ClassifierOutput {
    pub signals: Vec<Signals>,
    pub remarks: Vec<Remarks>,
    pub colors: Vec<ColorBand>,
}

#[inline(always)]
fn momentum(row: &FeatureRow) -> bool {
    row.variation_tv > 0.0
}

#[inline(always)]
fn stable_status(row: &FeatureRow) -> bool {
    row.vstatus.abs() < STABLE_VSTATUS_LIMIT && row.vstatus_lv.abs() < STABLE_VSTATUS_LV_LIMIT
}

#[inline]
pub fn remarks(vstatus: f64, vstatus_lv: f64) -> Remarks {
    let within = |v: f64, lim: f64| (-lim..=lim).contains(&v);
    Remarks {
        remark: if vstatus < 0.0 { REMARK_NEGATIVE } else { "" },
        remark2: if within(vstatus, 0.30) && within(vstatus_lv, 0.90) {
            REMARK_CONDITION_MET
        } else {
            ""
        },
        remark3: if within(vstatus, 0.7) && within(vstatus_lv, 0.9) {
            REMARK_CM
        } else {
            ""
        },
    }
}

#[inline]
pub fn color_band(target: f64) -> ColorBand {
    if target < 2.0 {
        ColorBand::Blue
    } else if target < 10.0 {
        ColorBand::Purple
    } else {
        ColorBand::Pink
    }
}

pub fn classify(rows: &[FeatureRow]) -> ClassifierOutput {
    let std_tv: Vec<f64> = rows.iter().map(|r| r.std_tv).collect();
    let mut signals = Vec::with_capacity(rows.len());
    let mut notes = Vec::with_capacity(rows.len());
    let mut colors = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let lo = (i + 1).saturating_sub(LOW_VOLATILITY_WINDOW);
        let trailing = nan_mean(&std_tv[lo..=i]);
        signals.push(Signals {
            momentum: momentum(row),
            low_volatility: row.std_tv < trailing,
            stable_status: stable_status(row),
        });
        notes.push(remarks(row.vstatus, row.vstatus_lv));
        colors.push(color_band(row.target));
    }
    ClassifierOutput {
        signals,
        remarks: notes,
        colors,
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClassifierStream {
    std_window: TrailingWindow<LOW_VOLATILITY_WINDOW>,
}

impl ClassifierStream {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn update(&mut self, row: &FeatureRow) -> Signals {
        self.std_window.push(row.std_tv);
        Signals {
            momentum: momentum(row),
            low_volatility: row.std_tv < self.std_window.nan_mean(),
            stable_status: stable_status(row),
        }
    }
}
