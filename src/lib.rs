#![allow(clippy::needless_range_loop)]

pub mod indicators;
pub mod pipeline;
pub mod store;
pub mod utilities;

pub use pipeline::{compute_rows, EngineBuilder, EngineParams, IndicatorEngine, Row, Session};
pub use store::{CsvStore, MemoryStore, SeriesStore, StoreError};
pub use utilities::enums::{ColorBand, MeanMode, Prediction, ScoringVariant};
