use crate::value_objects::PriceMap;
use serde::{Deserialize, Serialize};

pub mod fees;
pub mod impermanent_loss;

/// Which IL formula produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IlFormula {
    /// `2·√r / (1 + r) − 1` on the relative ratio of a 50/50 pair.
    Balanced,
    /// Two-asset weighted formula.
    WeightedPair,
    /// Weighted geometric over weighted arithmetic mean.
    MultiAsset,
}

/// Reason a formula result was forced to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MathGuard {
    /// A price ratio was zero, negative or NaN.
    NonPositiveRatio,
    /// The weighted denominator was zero.
    ZeroDenominator,
    /// An intermediate value overflowed to infinity or NaN.
    NonFinite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ILResult {
    /// Signed IL in percent; negative means loss versus holding.
    pub il_percent: f64,
    pub price_ratios: PriceMap,
    /// Weights normalized to 100.
    pub weights: Vec<f64>,
    /// `50/50`, `W0/W1` or `multi-asset`, from the weight shape only.
    pub pool_type_label: String,
    pub formula: IlFormula,
    /// Set when `il_percent` is a guarded zero rather than a computed value.
    pub guard: Option<MathGuard>,
}

impl ILResult {
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.guard.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeAprResult {
    pub fee_apr_est: f64,
    pub fees_earned: f64,
    pub volume_window: f64,
    pub tvl_avg: f64,
    pub fee_tier: f64,
    pub window_hours: u32,
    /// False when the inputs could not be annualized; every number is then zero.
    pub annualized: bool,
}

impl FeeAprResult {
    #[must_use]
    pub fn zeroed() -> Self {
        Self {
            fee_apr_est: 0.0,
            fees_earned: 0.0,
            volume_window: 0.0,
            tvl_avg: 0.0,
            fee_tier: 0.0,
            window_hours: 0,
            annualized: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionEarnings {
    pub position_size_usd: f64,
    pub pool_share_percent: f64,
    pub earnings_window: f64,
    pub earnings_daily: f64,
    pub earnings_annual: f64,
    pub apr_percent: f64,
}

impl PositionEarnings {
    /// Zero earnings for a position that cannot be valued.
    #[must_use]
    pub fn zeroed(position_size_usd: f64) -> Self {
        Self {
            position_size_usd,
            pool_share_percent: 0.0,
            earnings_window: 0.0,
            earnings_daily: 0.0,
            earnings_annual: 0.0,
            apr_percent: 0.0,
        }
    }
}

/// APR a pool would earn at one fee tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierApr {
    pub label: String,
    pub fee_tier: f64,
    pub apr: f64,
}

/// IL for a single-token price move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IlScenario {
    pub label: String,
    pub price_ratio: f64,
    pub il_percent: f64,
}
