pub use crate::error::AnalysisError;
pub use crate::pipeline::{AnalyzeOptions, ComparedPool, PoolAnalyzer, PoolComparison, PoolSummary};
pub use crate::report::{EstimateReport, PoolInfo, PositionReport, interpretation_notes};
pub use crate::volume::{TvlMultipleVolume, VolumeModel};
