//! Pool analysis: gathers on-chain and market data into a snapshot and
//! scores it with the IL and fee APR engines.

pub mod error;
pub mod pipeline;
pub mod prelude;
pub mod report;
pub mod volume;

pub use error::AnalysisError;
pub use pipeline::{AnalyzeOptions, PoolAnalyzer};
