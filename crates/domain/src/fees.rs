use crate::enums::PoolType;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A pool fee expressed in hundredths of a basis point, the unit
/// concentrated-liquidity pools store on-chain (3000 = 0.3%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeeTier {
    pub hundredths_bip: u32,
}

impl FeeTier {
    /// Fixed fee of constant-product pairs and their forks.
    pub const CONSTANT_PRODUCT: FeeTier = FeeTier::from_hundredths_bip(3_000);
    /// Default assumed for weighted pools; not read on-chain.
    pub const WEIGHTED_DEFAULT: FeeTier = FeeTier::from_hundredths_bip(3_000);
    /// Default assumed for stable pools; not read on-chain.
    pub const STABLE_DEFAULT: FeeTier = FeeTier::from_hundredths_bip(400);
    /// Used for unclassified pools and failed fee reads.
    pub const FALLBACK: FeeTier = FeeTier::from_hundredths_bip(3_000);

    #[must_use]
    pub const fn from_hundredths_bip(hundredths_bip: u32) -> Self {
        Self { hundredths_bip }
    }

    /// Exact decimal fraction (3000 -> 0.003).
    #[must_use]
    pub fn as_decimal(&self) -> Decimal {
        Decimal::new(i64::from(self.hundredths_bip), 6)
    }

    /// Fraction of volume retained as fee.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        self.as_decimal().to_f64().unwrap_or(0.0)
    }

    /// Fee as a percentage (3000 -> 0.3).
    #[must_use]
    pub fn percent(&self) -> f64 {
        (self.as_decimal() * Decimal::ONE_HUNDRED)
            .to_f64()
            .unwrap_or(0.0)
    }

    /// Fixed fee for families whose fee is not read on-chain.
    ///
    /// Returns `None` for `UniswapV3`, whose fee lives in the pool contract.
    #[must_use]
    pub fn fixed_for(pool_type: PoolType) -> Option<FeeTier> {
        match pool_type {
            PoolType::UniswapV3 => None,
            PoolType::UniswapV2 | PoolType::SushiSwap => Some(Self::CONSTANT_PRODUCT),
            PoolType::Balancer => Some(Self::WEIGHTED_DEFAULT),
            PoolType::Curve => Some(Self::STABLE_DEFAULT),
            PoolType::Unknown => Some(Self::FALLBACK),
        }
    }
}

/// Labeled tiers used by fee-tier comparison, ascending.
pub const COMPARISON_TIERS: [(&str, FeeTier); 3] = [
    ("0.05%", FeeTier::from_hundredths_bip(500)),
    ("0.3%", FeeTier::from_hundredths_bip(3_000)),
    ("1.0%", FeeTier::from_hundredths_bip(10_000)),
];

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fee_tier_conversion() {
        let tier = FeeTier::from_hundredths_bip(3_000);
        assert_eq!(tier.as_decimal(), dec!(0.003));
        assert!((tier.fraction() - 0.003).abs() < 1e-15);
        assert!((tier.percent() - 0.3).abs() < 1e-12);

        let low = FeeTier::from_hundredths_bip(100);
        assert_eq!(low.as_decimal(), dec!(0.0001));
    }

    #[test]
    fn test_fixed_fees_by_family() {
        assert_eq!(FeeTier::fixed_for(PoolType::UniswapV3), None);
        assert_eq!(
            FeeTier::fixed_for(PoolType::SushiSwap).map(|t| t.as_decimal()),
            Some(dec!(0.003))
        );
        assert_eq!(
            FeeTier::fixed_for(PoolType::Curve).map(|t| t.as_decimal()),
            Some(dec!(0.0004))
        );
        assert_eq!(
            FeeTier::fixed_for(PoolType::Balancer).map(|t| t.as_decimal()),
            Some(dec!(0.003))
        );
    }

    #[test]
    fn test_comparison_tiers_ascending() {
        let fractions: Vec<f64> = COMPARISON_TIERS.iter().map(|(_, t)| t.fraction()).collect();
        assert!(fractions.windows(2).all(|w| w[0] < w[1]));
    }
}
