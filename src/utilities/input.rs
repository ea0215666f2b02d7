//! Line-oriented reading batches: one number per line, blank lines ignored.

use std::fmt;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
	NotNumeric,
	NonFinite,
}

impl fmt::Display for RejectReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RejectReason::NotNumeric => write!(f, "not a number"),
			RejectReason::NonFinite => write!(f, "not finite"),
		}
	}
}

/// A line that could not be used as a reading. `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("input: line {line}: {token:?} is {reason}")]
pub struct RejectedToken {
	pub line: usize,
	pub token: String,
	pub reason: RejectReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedBatch {
	pub values: Vec<f64>,
	pub rejected: Vec<RejectedToken>,
}

pub fn parse_input_batch(text: &str) -> ParsedBatch {
	let mut batch = ParsedBatch::default();
	for (i, raw) in text.lines().enumerate() {
		let token = raw.trim();
		if token.is_empty() {
			continue;
		}
		let reason = match token.parse::<f64>() {
			Ok(v) if v.is_finite() => {
				batch.values.push(v);
				continue;
			}
			Ok(_) => RejectReason::NonFinite,
			Err(_) => RejectReason::NotNumeric,
		};
		let rejected = RejectedToken {
			line: i + 1,
			token: token.to_owned(),
			reason,
		};
		warn!(line = rejected.line, token = %rejected.token, "input: skipping token ({})", reason);
		batch.rejected.push(rejected);
	}
	batch
}
