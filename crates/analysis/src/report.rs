//! Response records combining a snapshot with engine results.

use chrono::{DateTime, Utc};
use lp_il_domain::metrics::{FeeAprResult, ILResult, PositionEarnings};
use lp_il_domain::{Chain, DataQuality, PoolSnapshot, PoolType, PoolWeights, PriceMap, VolumeSource};
use serde::{Deserialize, Serialize};

pub const NOTE_MINIMAL_IL: &str = "Minimal impermanent loss detected (<1%)";
pub const NOTE_HIGH_IL: &str =
    "WARNING: High impermanent loss (>10%). Consider if fee APR compensates.";
pub const NOTE_NET_POSITIVE: &str = "Fee earnings exceed impermanent loss - net positive position";
pub const NOTE_NET_NEGATIVE: &str = "Fee earnings do not fully compensate for impermanent loss";
pub const NOTE_LIMITED_DATA: &str =
    "Limited historical data available - estimates may be less accurate";
pub const NOTE_CURVE: &str = "Curve stablecoin pool - IL typically minimal";
pub const NOTE_UNISWAP_V3: &str =
    "Uniswap V3 concentrated liquidity - IL can be higher if price moves out of range";

/// Identity and size of the analyzed pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolInfo {
    pub pool_address: String,
    #[serde(rename = "type")]
    pub pool_type: PoolType,
    pub token0: String,
    pub token1: String,
    pub fee_tier_percent: f64,
    pub tvl_usd: f64,
    pub weights: Vec<f64>,
}

impl PoolInfo {
    #[must_use]
    pub fn from_snapshot(snapshot: &PoolSnapshot) -> Self {
        Self {
            pool_address: snapshot.pool_address().to_string(),
            pool_type: snapshot.pool_type(),
            token0: snapshot.token0().symbol.clone(),
            token1: snapshot.token1().symbol.clone(),
            fee_tier_percent: snapshot.fee_tier() * 100.0,
            tvl_usd: snapshot.tvl_usd(),
            weights: snapshot.weights().as_slice().to_vec(),
        }
    }
}

/// IL and fee APR of one pool over one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateReport {
    #[serde(rename = "IL_percent")]
    pub il_percent: f64,
    pub fee_apr_est: f64,
    pub volume_window: f64,
    pub volume_source: VolumeSource,
    pub pool_info: PoolInfo,
    pub price_changes: PriceMap,
    pub chain: Chain,
    pub window_hours: u32,
    pub data_quality: DataQuality,
    pub impermanent_loss: ILResult,
    pub fees: FeeAprResult,
    pub notes: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl EstimateReport {
    #[must_use]
    pub fn new(chain: Chain, snapshot: &PoolSnapshot, il: ILResult, fees: FeeAprResult) -> Self {
        let notes = interpretation_notes(
            snapshot.pool_type(),
            snapshot.weights(),
            il.il_percent,
            fees.fee_apr_est,
            snapshot.data_quality(),
        );
        Self {
            il_percent: il.il_percent,
            fee_apr_est: fees.fee_apr_est,
            volume_window: snapshot.volume_window(),
            volume_source: snapshot.volume_source(),
            pool_info: PoolInfo::from_snapshot(snapshot),
            price_changes: snapshot.price_changes().clone(),
            chain,
            window_hours: snapshot.window_hours(),
            data_quality: snapshot.data_quality(),
            impermanent_loss: il,
            fees,
            notes,
            timestamp: Utc::now(),
        }
    }
}

/// Fee earnings of a position of a given size, next to the pool's IL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionReport {
    pub pool_info: PoolInfo,
    pub chain: Chain,
    pub window_hours: u32,
    #[serde(rename = "IL_percent")]
    pub il_percent: f64,
    pub earnings: PositionEarnings,
    pub data_quality: DataQuality,
    pub timestamp: DateTime<Utc>,
}

impl PositionReport {
    #[must_use]
    pub fn new(
        chain: Chain,
        snapshot: &PoolSnapshot,
        il: &ILResult,
        earnings: PositionEarnings,
    ) -> Self {
        Self {
            pool_info: PoolInfo::from_snapshot(snapshot),
            chain,
            window_hours: snapshot.window_hours(),
            il_percent: il.il_percent,
            earnings,
            data_quality: snapshot.data_quality(),
            timestamp: Utc::now(),
        }
    }
}

/// Human-readable notes on an estimate.
///
/// Fee APR is compared with the magnitude of IL, so a pool with a loss of
/// 5% needs more than 5% APR to count as net positive.
#[must_use]
pub fn interpretation_notes(
    pool_type: PoolType,
    weights: &PoolWeights,
    il_percent: f64,
    fee_apr: f64,
    data_quality: DataQuality,
) -> Vec<String> {
    let mut notes = Vec::new();
    let il_magnitude = il_percent.abs();

    if il_magnitude < 1.0 {
        notes.push(NOTE_MINIMAL_IL.to_string());
    } else if il_magnitude > 10.0 {
        notes.push(NOTE_HIGH_IL.to_string());
    }

    // Strict: APR equal to the loss does not count as net positive.
    if fee_apr > il_magnitude {
        notes.push(NOTE_NET_POSITIVE.to_string());
    } else {
        notes.push(NOTE_NET_NEGATIVE.to_string());
    }

    if data_quality == DataQuality::Limited {
        notes.push(NOTE_LIMITED_DATA.to_string());
    }

    match pool_type {
        PoolType::Curve => notes.push(NOTE_CURVE.to_string()),
        PoolType::Balancer => notes.push(format!(
            "Balancer weighted pool - weights: {}",
            weights.label()
        )),
        PoolType::UniswapV3 => notes.push(NOTE_UNISWAP_V3.to_string()),
        PoolType::UniswapV2 | PoolType::SushiSwap | PoolType::Unknown => {}
    }

    notes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes(pool_type: PoolType, il: f64, apr: f64, quality: DataQuality) -> Vec<String> {
        interpretation_notes(pool_type, &PoolWeights::balanced(), il, apr, quality)
    }

    #[test]
    fn test_minimal_il_net_positive() {
        let notes = notes(PoolType::UniswapV2, -0.2, 15.0, DataQuality::Estimated);
        assert_eq!(notes, vec![NOTE_MINIMAL_IL, NOTE_NET_POSITIVE]);
    }

    #[test]
    fn test_high_il_compares_magnitude() {
        let notes = notes(PoolType::UniswapV2, -25.0, 20.0, DataQuality::Estimated);
        assert_eq!(notes, vec![NOTE_HIGH_IL, NOTE_NET_NEGATIVE]);
    }

    #[test]
    fn test_net_note_boundary_uses_loss_magnitude() {
        let below = notes(PoolType::UniswapV2, -5.0, 4.9, DataQuality::Estimated);
        assert_eq!(below, vec![NOTE_NET_NEGATIVE]);

        let equal = notes(PoolType::UniswapV2, -5.0, 5.0, DataQuality::Estimated);
        assert_eq!(equal, vec![NOTE_NET_NEGATIVE]);

        let above = notes(PoolType::UniswapV2, -5.0, 5.1, DataQuality::Estimated);
        assert_eq!(above, vec![NOTE_NET_POSITIVE]);
    }

    #[test]
    fn test_moderate_il_has_no_size_note() {
        let notes = notes(PoolType::SushiSwap, -5.0, 6.0, DataQuality::Estimated);
        assert_eq!(notes, vec![NOTE_NET_POSITIVE]);
    }

    #[test]
    fn test_limited_and_family_notes() {
        let notes = notes(PoolType::UniswapV3, 0.0, 0.0, DataQuality::Limited);
        assert_eq!(
            notes,
            vec![NOTE_MINIMAL_IL, NOTE_NET_NEGATIVE, NOTE_LIMITED_DATA, NOTE_UNISWAP_V3]
        );

        let curve = interpretation_notes(
            PoolType::Curve,
            &PoolWeights::balanced(),
            0.0,
            1.0,
            DataQuality::Estimated,
        );
        assert_eq!(curve.last().map(String::as_str), Some(NOTE_CURVE));
    }

    #[test]
    fn test_balancer_note_names_weights() {
        let weights = PoolWeights::new(&[80.0, 20.0]).unwrap();
        let notes = interpretation_notes(
            PoolType::Balancer,
            &weights,
            -2.0,
            5.0,
            DataQuality::Estimated,
        );
        assert_eq!(
            notes.last().map(String::as_str),
            Some("Balancer weighted pool - weights: 80/20")
        );
    }
}
