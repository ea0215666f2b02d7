pub mod engine;
pub mod row;
pub mod session;

pub use engine::{compute_rows, EngineBuilder, EngineError, EngineParams, IndicatorEngine};
pub use row::Row;
pub use session::{AppendReport, Session, SessionError};
