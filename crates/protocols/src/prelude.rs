pub use crate::PoolContract;
pub use crate::classifier::{PoolTypeClassifier, Probe, ProbeOutcome};
pub use crate::error::CallError;
pub use crate::fee_tier::{FeeTierResolver, ResolvedFee};
pub use crate::reader::PoolReader;
pub use crate::rpc::EvmRpcClient;
