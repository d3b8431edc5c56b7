use crate::PoolContract;
use lp_il_domain::{FeeTier, PoolType};
use std::sync::Arc;
use tracing::warn;

/// A pool fee and whether it was substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedFee {
    pub fee_tier: FeeTier,
    /// True when the on-chain read failed and the fallback was used.
    pub defaulted: bool,
}

impl ResolvedFee {
    #[must_use]
    pub fn fraction(&self) -> f64 {
        self.fee_tier.fraction()
    }
}

/// Determines the fee fraction of a classified pool.
pub struct FeeTierResolver {
    contract: Arc<dyn PoolContract>,
}

impl FeeTierResolver {
    pub fn new(contract: Arc<dyn PoolContract>) -> Self {
        Self { contract }
    }

    /// Fixed families get their constant fee without touching the chain.
    /// Concentrated-liquidity pools are read; a failed read falls back to
    /// [`FeeTier::FALLBACK`] and is flagged as defaulted.
    pub async fn resolve(&self, pool: &str, pool_type: PoolType) -> ResolvedFee {
        if let Some(fee_tier) = FeeTier::fixed_for(pool_type) {
            return ResolvedFee {
                fee_tier,
                defaulted: false,
            };
        }
        match self.contract.fee(pool).await {
            Ok(raw) => ResolvedFee {
                fee_tier: FeeTier::from_hundredths_bip(raw),
                defaulted: false,
            },
            Err(error) => {
                warn!(pool, %error, "fee read failed, using fallback tier");
                ResolvedFee {
                    fee_tier: FeeTier::FALLBACK,
                    defaulted: true,
                }
            }
        }
    }
}
