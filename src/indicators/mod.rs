pub mod classifier;
pub mod cumsum;
pub mod expanding_mean;
pub mod expanding_std;
pub mod features;
pub mod lag;
pub mod probability;
pub mod running_mean;
pub mod variation;

pub use classifier::{classify, color_band, remarks, ClassifierOutput, ClassifierStream, Remarks, Signals};
pub use cumsum::{cumsum, CumSumInput, CumSumOutput, CumSumStream};
pub use expanding_mean::{expanding_mean, ExpandingMeanInput, ExpandingMeanOutput, ExpandingMeanStream};
pub use expanding_std::{expanding_std, ExpandingStdInput, ExpandingStdOutput, ExpandingStdStream};
pub use features::{
	features, FeatureError, FeatureInput, FeatureOutput, FeatureParams, FeatureRow, FeatureStream,
	LagSnapshot,
};
pub use lag::{lag_snapshot, LagInput, LagOutput, LagStream};
pub use probability::{
	probability, raw_weighted_score, threshold_sweep, ProbabilityError, ProbabilityInput,
	ProbabilityModel, ProbabilityOutput, ProbabilityParams, ThresholdRange, ThresholdSweepBuilder,
	ThresholdSweepOutput,
};
pub use running_mean::{
	running_mean, RunningMeanBuilder, RunningMeanError, RunningMeanInput, RunningMeanOutput,
	RunningMeanParams, RunningMeanStream,
};
pub use variation::{first_difference, variation, VariationError, VariationInput, VariationOutput, VariationStream};
