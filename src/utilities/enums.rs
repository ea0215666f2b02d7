use serde::{Deserialize, Serialize};
use std::fmt;

/// How the `mean` column is derived from the targets.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum MeanMode {
	/// `(target[i-1] + target[i]) / 2`, with `mean[0] = target[0] / 2`.
	PairwiseLag,
	/// Arithmetic mean of `target[0..=i]`.
	ExpandingAverage,
}

impl Default for MeanMode {
	fn default() -> Self {
		MeanMode::PairwiseLag
	}
}

/// Which score feeds the logistic transform.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ScoringVariant {
	/// `sigmoid(indicator_score)` over the 0..=3 flag sum.
	Composite,
	/// `sigmoid(3 - (0.4|vstatus| + 0.4|vstatus_lv| + 0.2|momentum_raw|))`.
	RawWeighted,
}

impl Default for ScoringVariant {
	fn default() -> Self {
		ScoringVariant::Composite
	}
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Prediction {
	Yes,
	No,
}

impl Default for Prediction {
	fn default() -> Self {
		Prediction::No
	}
}

impl Prediction {
	#[inline(always)]
	pub const fn is_yes(self) -> bool {
		matches!(self, Prediction::Yes)
	}
}

impl fmt::Display for Prediction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Prediction::Yes => f.pad("Yes"),
			Prediction::No => f.pad("No"),
		}
	}
}

/// Band of the raw target, as shown by the dashboard badges.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ColorBand {
	Blue,
	Purple,
	Pink,
}

impl Default for ColorBand {
	fn default() -> Self {
		ColorBand::Blue
	}
}

impl fmt::Display for ColorBand {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ColorBand::Blue => f.pad("Blue"),
			ColorBand::Purple => f.pad("Purple"),
			ColorBand::Pink => f.pad("Pink"),
		}
	}
}
