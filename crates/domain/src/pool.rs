use crate::enums::{DataQuality, PoolType, VolumeSource};
use crate::error::SnapshotError;
use crate::token::TokenInfo;
use crate::value_objects::{PoolWeights, PriceMap};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// The two tokens of a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolTokens {
    pub token0: TokenInfo,
    pub token1: TokenInfo,
    /// True when a symbol or decimals value was substituted.
    pub metadata_defaulted: bool,
}

impl PoolTokens {
    /// Price-map keys for both tokens. A repeated symbol is suffixed with the
    /// token address so the second entry does not overwrite the first.
    #[must_use]
    pub fn keys(&self) -> [String; 2] {
        let first = self.token0.symbol.clone();
        let second = if self.token1.symbol == first {
            format!("{}@{}", self.token1.symbol, self.token1.address)
        } else {
            self.token1.symbol.clone()
        };
        [first, second]
    }
}

/// Raw reserve balances as read from chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolReserves {
    pub reserve0: U256,
    pub reserve1: U256,
    /// `blockTimestampLast` when the pool reports one.
    pub timestamp: Option<u32>,
}

impl PoolReserves {
    /// USD value of both reserves at the given prices.
    #[must_use]
    pub fn tvl_usd(&self, tokens: &PoolTokens, price0: f64, price1: f64) -> f64 {
        tokens.token0.normalize(self.reserve0) * price0
            + tokens.token1.normalize(self.reserve1) * price1
    }
}

/// A trading-volume figure together with how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeEstimate {
    pub volume_usd: f64,
    pub source: VolumeSource,
}

/// Everything the pipeline gathered for one pool, before normalization.
#[derive(Debug, Clone)]
pub struct SnapshotInputs {
    pub pool_address: String,
    pub pool_type: PoolType,
    pub tokens: PoolTokens,
    pub current_prices: [f64; 2],
    /// `None` where the historical price was unavailable.
    pub historical_prices: [Option<f64>; 2],
    pub reserves: PoolReserves,
    pub tvl_usd: f64,
    pub volume: VolumeEstimate,
    pub fee_tier: f64,
    /// True when the fee tier fell back to the default.
    pub fee_tier_defaulted: bool,
    pub window_hours: u32,
    pub weights: PoolWeights,
}

/// Canonical result of one pool analysis. Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pool_address: String,
    pool_type: PoolType,
    token0: TokenInfo,
    token1: TokenInfo,
    weights: PoolWeights,
    fee_tier: f64,
    tvl_usd: f64,
    volume_window: f64,
    volume_source: VolumeSource,
    window_hours: u32,
    initial_prices: PriceMap,
    current_prices: PriceMap,
    price_changes: PriceMap,
    data_quality: DataQuality,
    reserves_timestamp: Option<u32>,
}

impl PoolSnapshot {
    /// Normalizes gathered inputs into a snapshot.
    ///
    /// Missing or non-positive historical prices are replaced by the current
    /// price (ratio 1.0) and downgrade the data quality to `Limited`, as do
    /// defaulted token metadata and a defaulted fee tier.
    ///
    /// # Errors
    /// Returns an error when a current price is not positive or the weight
    /// count does not match the token count.
    pub fn assemble(inputs: SnapshotInputs) -> Result<Self, SnapshotError> {
        let SnapshotInputs {
            pool_address,
            pool_type,
            tokens,
            current_prices,
            historical_prices,
            reserves,
            tvl_usd,
            volume,
            fee_tier,
            fee_tier_defaulted,
            window_hours,
            weights,
        } = inputs;

        if weights.len() != 2 {
            return Err(SnapshotError::WeightCount {
                expected: 2,
                got: weights.len(),
            });
        }

        let symbols = [&tokens.token0.symbol, &tokens.token1.symbol];
        for (symbol, price) in symbols.iter().zip(current_prices) {
            if !(price.is_finite() && price > 0.0) {
                return Err(SnapshotError::InvalidCurrentPrice {
                    symbol: (*symbol).clone(),
                    price,
                });
            }
        }

        let mut historical_missing = false;
        let keys = tokens.keys();
        let mut initial_map = PriceMap::new();
        let mut current_map = PriceMap::new();
        let mut change_map = PriceMap::new();

        for ((key, current), historical) in keys.iter().zip(current_prices).zip(historical_prices) {
            let initial = match historical.filter(|p| p.is_finite() && *p > 0.0) {
                Some(p) => p,
                None => {
                    historical_missing = true;
                    current
                }
            };
            let ratio = if initial > 0.0 { current / initial } else { 1.0 };

            initial_map.insert(key.clone(), initial);
            current_map.insert(key.clone(), current);
            change_map.insert(key.clone(), ratio);
        }

        let data_quality = if historical_missing || tokens.metadata_defaulted || fee_tier_defaulted
        {
            DataQuality::Limited
        } else {
            DataQuality::Estimated
        };

        Ok(Self {
            pool_address,
            pool_type,
            token0: tokens.token0,
            token1: tokens.token1,
            weights,
            fee_tier,
            tvl_usd,
            volume_window: volume.volume_usd,
            volume_source: volume.source,
            window_hours,
            initial_prices: initial_map,
            current_prices: current_map,
            price_changes: change_map,
            data_quality,
            reserves_timestamp: reserves.timestamp,
        })
    }

    pub fn pool_address(&self) -> &str {
        &self.pool_address
    }

    pub fn pool_type(&self) -> PoolType {
        self.pool_type
    }

    pub fn token0(&self) -> &TokenInfo {
        &self.token0
    }

    pub fn token1(&self) -> &TokenInfo {
        &self.token1
    }

    pub fn weights(&self) -> &PoolWeights {
        &self.weights
    }

    pub fn fee_tier(&self) -> f64 {
        self.fee_tier
    }

    pub fn tvl_usd(&self) -> f64 {
        self.tvl_usd
    }

    /// Average TVL over the window; the current TVL stands in for it.
    pub fn tvl_avg(&self) -> f64 {
        self.tvl_usd
    }

    /// Estimated volume over the window. See [`Self::volume_source`].
    pub fn volume_window(&self) -> f64 {
        self.volume_window
    }

    pub fn volume_source(&self) -> VolumeSource {
        self.volume_source
    }

    pub fn window_hours(&self) -> u32 {
        self.window_hours
    }

    pub fn initial_prices(&self) -> &PriceMap {
        &self.initial_prices
    }

    pub fn current_prices(&self) -> &PriceMap {
        &self.current_prices
    }

    pub fn price_changes(&self) -> &PriceMap {
        &self.price_changes
    }

    pub fn data_quality(&self) -> DataQuality {
        self.data_quality
    }

    pub fn reserves_timestamp(&self) -> Option<u32> {
        self.reserves_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> PoolTokens {
        PoolTokens {
            token0: TokenInfo::new("0xweth", "WETH", 18),
            token1: TokenInfo::new("0xusdc", "USDC", 6),
            metadata_defaulted: false,
        }
    }

    fn inputs() -> SnapshotInputs {
        let reserves = PoolReserves {
            reserve0: U256::from(1_000_000_000_000_000_000_000u128), // 1000 WETH
            reserve1: U256::from(2_000_000_000_000u64),              // 2,000,000 USDC
            timestamp: Some(1_700_000_000),
        };
        let tokens = tokens();
        let tvl_usd = reserves.tvl_usd(&tokens, 2_000.0, 1.0);
        SnapshotInputs {
            pool_address: "0xpool".to_string(),
            pool_type: PoolType::UniswapV2,
            tokens,
            current_prices: [2_000.0, 1.0],
            historical_prices: [Some(1_000.0), Some(1.0)],
            reserves,
            tvl_usd,
            volume: VolumeEstimate {
                volume_usd: tvl_usd,
                source: VolumeSource::TvlHeuristic { multiplier: 1.0 },
            },
            fee_tier: 0.003,
            fee_tier_defaulted: false,
            window_hours: 24,
            weights: PoolWeights::balanced(),
        }
    }

    #[test]
    fn test_assemble_computes_ratios_and_tvl() {
        let snapshot = PoolSnapshot::assemble(inputs()).unwrap();
        assert!((snapshot.tvl_usd() - 4_000_000.0).abs() < 1e-6);
        assert_eq!(snapshot.price_changes().get("WETH"), Some(2.0));
        assert_eq!(snapshot.price_changes().get("USDC"), Some(1.0));
        assert_eq!(snapshot.data_quality(), DataQuality::Estimated);
        assert_eq!(snapshot.reserves_timestamp(), Some(1_700_000_000));
    }

    #[test]
    fn test_missing_history_falls_back_to_current() {
        let mut inputs = inputs();
        inputs.historical_prices = [None, Some(-3.0)];
        let snapshot = PoolSnapshot::assemble(inputs).unwrap();

        assert_eq!(snapshot.initial_prices().get("WETH"), Some(2_000.0));
        assert_eq!(snapshot.price_changes().get("WETH"), Some(1.0));
        assert_eq!(snapshot.price_changes().get("USDC"), Some(1.0));
        assert_eq!(snapshot.data_quality(), DataQuality::Limited);
    }

    #[test]
    fn test_defaulted_metadata_limits_quality() {
        let mut inputs = inputs();
        inputs.tokens.metadata_defaulted = true;
        let snapshot = PoolSnapshot::assemble(inputs).unwrap();
        assert_eq!(snapshot.data_quality(), DataQuality::Limited);
    }

    #[test]
    fn test_rejects_non_positive_current_price() {
        let mut inputs = inputs();
        inputs.current_prices = [0.0, 1.0];
        assert!(matches!(
            PoolSnapshot::assemble(inputs),
            Err(SnapshotError::InvalidCurrentPrice { .. })
        ));
    }

    #[test]
    fn test_rejects_three_weights_for_a_pair() {
        let mut inputs = inputs();
        inputs.weights = PoolWeights::new(&[1.0, 1.0, 1.0]).unwrap();
        assert_eq!(
            PoolSnapshot::assemble(inputs),
            Err(SnapshotError::WeightCount {
                expected: 2,
                got: 3
            })
        );
    }

    #[test]
    fn test_duplicate_symbols_get_distinct_keys() {
        let mut inputs = inputs();
        inputs.tokens.token0 = TokenInfo::with_defaults("0xa");
        inputs.tokens.token1 = TokenInfo::with_defaults("0xb");
        inputs.tokens.metadata_defaulted = true;
        let snapshot = PoolSnapshot::assemble(inputs).unwrap();
        assert_eq!(snapshot.price_changes().len(), 2);
        assert!(snapshot.price_changes().contains("UNKNOWN@0xb"));
    }
}
