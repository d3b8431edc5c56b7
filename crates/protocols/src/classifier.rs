//! Pool family detection by interface probing.
//!
//! Probes run in a fixed order and the first one whose call succeeds decides
//! the family. A probe that reverts or returns nothing moves on to the next
//! one. Any other failure aborts classification: a node that cannot answer
//! says nothing about the pool.

use crate::PoolContract;
use crate::error::CallError;
use lp_il_domain::PoolType;
use std::sync::Arc;
use tracing::debug;

/// One interface check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// `getReserves()` answers: a constant-product pair.
    ConstantProductPair,
    /// `liquidity()` answers: a concentrated-liquidity pool.
    ConcentratedLiquidity,
}

/// Result of a probe that reached the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Confirmed,
    Mismatch(CallError),
}

impl Probe {
    /// Probes in the order they are tried.
    pub const ORDER: [Probe; 2] = [Probe::ConstantProductPair, Probe::ConcentratedLiquidity];

    /// Family reported when this probe confirms.
    #[must_use]
    pub fn pool_type(&self) -> PoolType {
        match self {
            Probe::ConstantProductPair => PoolType::UniswapV2,
            Probe::ConcentratedLiquidity => PoolType::UniswapV3,
        }
    }

    /// Runs the probe.
    ///
    /// # Errors
    /// Propagates call errors that are not interface mismatches.
    pub async fn run(
        &self,
        contract: &dyn PoolContract,
        pool: &str,
    ) -> Result<ProbeOutcome, CallError> {
        let result = match self {
            Probe::ConstantProductPair => contract.get_reserves(pool).await.map(|_| ()),
            Probe::ConcentratedLiquidity => contract.liquidity(pool).await.map(|_| ()),
        };
        match result {
            Ok(()) => Ok(ProbeOutcome::Confirmed),
            Err(e) if e.is_interface_mismatch() => Ok(ProbeOutcome::Mismatch(e)),
            Err(e) => Err(e),
        }
    }
}

pub struct PoolTypeClassifier {
    contract: Arc<dyn PoolContract>,
}

impl PoolTypeClassifier {
    pub fn new(contract: Arc<dyn PoolContract>) -> Self {
        Self { contract }
    }

    /// Classifies `pool`, returning `Unknown` when no probe confirms.
    ///
    /// Constant-product forks (SushiSwap) share the pair interface and are
    /// reported as `UniswapV2`. Weighted and stable pools are never detected
    /// here; callers pass them explicitly.
    ///
    /// # Errors
    /// Returns the first non-mismatch error a probe hits.
    pub async fn classify(&self, pool: &str) -> Result<PoolType, CallError> {
        for probe in Probe::ORDER {
            match probe.run(self.contract.as_ref(), pool).await? {
                ProbeOutcome::Confirmed => {
                    debug!(pool, ?probe, "pool type confirmed");
                    return Ok(probe.pool_type());
                }
                ProbeOutcome::Mismatch(reason) => {
                    debug!(pool, ?probe, %reason, "probe did not match");
                }
            }
        }
        Ok(PoolType::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPoolContract;
    use primitive_types::U256;

    const V2: &str = "0x0000000000000000000000000000000000000002";
    const V3: &str = "0x0000000000000000000000000000000000000003";
    const T0: &str = "0x00000000000000000000000000000000000000a0";
    const T1: &str = "0x00000000000000000000000000000000000000a1";

    fn contract() -> MockPoolContract {
        MockPoolContract::new()
            .with_v2_pool(V2, T0, T1, U256::from(1_000), U256::from(2_000))
            .with_v3_pool(V3, T0, T1, 500)
    }

    #[tokio::test]
    async fn test_classifies_pair() {
        let classifier = PoolTypeClassifier::new(Arc::new(contract()));
        assert_eq!(classifier.classify(V2).await.unwrap(), PoolType::UniswapV2);
    }

    #[tokio::test]
    async fn test_classifies_concentrated_pool() {
        let classifier = PoolTypeClassifier::new(Arc::new(contract()));
        assert_eq!(classifier.classify(V3).await.unwrap(), PoolType::UniswapV3);
    }

    #[tokio::test]
    async fn test_unrecognized_contract_is_unknown() {
        let classifier = PoolTypeClassifier::new(Arc::new(contract()));
        let other = "0x00000000000000000000000000000000000000ff";
        assert_eq!(classifier.classify(other).await.unwrap(), PoolType::Unknown);
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_a_classification() {
        let classifier = PoolTypeClassifier::new(Arc::new(contract().offline()));
        let err = classifier.classify(V2).await.unwrap_err();
        assert!(matches!(err, CallError::Transport(_)));
    }
}
