//! Fee APR engine.
//!
//! Every function is pure and total: degenerate inputs (non-positive TVL, a
//! zero-hour window, non-finite values) return zeroed results, never NaN or
//! infinity.

use super::{FeeAprResult, PositionEarnings, TierApr};
use crate::fees::COMPARISON_TIERS;

pub const HOURS_PER_YEAR: f64 = 365.0 * 24.0;
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Number of `window_hours` windows in a year, `None` for an empty window.
fn periods_per_year(window_hours: u32) -> Option<f64> {
    (window_hours > 0).then(|| HOURS_PER_YEAR / f64::from(window_hours))
}

fn is_positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

/// Calculates the fee APR implied by one window of trading.
///
/// formula: APR = (volume * fee_tier / tvl) * (8760 / window_hours) * 100
///
/// # Arguments
///
/// * `volume_window` - Trading volume in the window (USD)
/// * `tvl_avg` - Average TVL in the window (USD)
/// * `fee_tier` - Fee fraction (e.g. 0.003 for 0.3%)
/// * `window_hours` - Window length
///
/// # Returns
///
/// * `FeeAprResult` - zeroed with `annualized = false` when `tvl_avg <= 0` or
///   the window is empty
pub fn estimate_apr(
    volume_window: f64,
    tvl_avg: f64,
    fee_tier: f64,
    window_hours: u32,
) -> FeeAprResult {
    let Some(periods) = periods_per_year(window_hours) else {
        return FeeAprResult::zeroed();
    };
    if !is_positive(tvl_avg) {
        return FeeAprResult::zeroed();
    }

    let fees_earned = volume_window * fee_tier;
    let fee_apr_est = fees_earned / tvl_avg * periods * 100.0;
    if !fee_apr_est.is_finite() {
        return FeeAprResult::zeroed();
    }

    FeeAprResult {
        fee_apr_est,
        fees_earned,
        volume_window,
        tvl_avg,
        fee_tier,
        window_hours,
        annualized: true,
    }
}

/// Fees earned in one day of `volume_24h`.
#[must_use]
pub fn estimate_daily_fees(volume_24h: f64, fee_tier: f64) -> f64 {
    volume_24h * fee_tier
}

/// A year of constant daily volume. Linear; fees are not compounded.
#[must_use]
pub fn estimate_annual_fees(volume_24h: f64, fee_tier: f64) -> f64 {
    estimate_daily_fees(volume_24h, fee_tier) * DAYS_PER_YEAR
}

/// `x` when finite, otherwise zero.
fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() { x } else { 0.0 }
}

/// Annualized volume/TVL turnover.
#[must_use]
pub fn calculate_fee_velocity(volume_window: f64, tvl_avg: f64, window_hours: u32) -> f64 {
    match periods_per_year(window_hours) {
        Some(periods) if is_positive(tvl_avg) => {
            finite_or_zero(volume_window / tvl_avg * periods)
        }
        _ => 0.0,
    }
}

/// Earnings of a position that owns `position_size_usd / tvl_avg` of the pool.
pub fn estimate_position_earnings(
    position_size_usd: f64,
    volume_window: f64,
    tvl_avg: f64,
    fee_tier: f64,
    window_hours: u32,
) -> PositionEarnings {
    let Some(periods) = periods_per_year(window_hours) else {
        return PositionEarnings::zeroed(finite_or_zero(position_size_usd));
    };
    if !is_positive(tvl_avg) || !position_size_usd.is_finite() || !volume_window.is_finite() {
        return PositionEarnings::zeroed(finite_or_zero(position_size_usd));
    }

    let pool_share = position_size_usd / tvl_avg;
    let earnings_window = volume_window * fee_tier * pool_share;
    let earnings_annual = earnings_window * periods;
    let earnings_daily = earnings_annual / DAYS_PER_YEAR;
    let apr_percent = if is_positive(position_size_usd) {
        earnings_annual / position_size_usd * 100.0
    } else {
        0.0
    };

    let earnings = PositionEarnings {
        position_size_usd,
        pool_share_percent: pool_share * 100.0,
        earnings_window,
        earnings_daily,
        earnings_annual,
        apr_percent,
    };
    let values = [
        earnings.pool_share_percent,
        earnings.earnings_window,
        earnings.earnings_daily,
        earnings.earnings_annual,
        earnings.apr_percent,
    ];
    if values.iter().all(|v| v.is_finite()) {
        earnings
    } else {
        PositionEarnings::zeroed(position_size_usd)
    }
}

/// APR at each standard tier (0.05%, 0.3%, 1.0%), ascending by tier.
pub fn compare_fee_tiers(volume_window: f64, tvl_avg: f64, window_hours: u32) -> Vec<TierApr> {
    COMPARISON_TIERS
        .iter()
        .map(|(label, tier)| TierApr {
            label: (*label).to_string(),
            fee_tier: tier.fraction(),
            apr: estimate_apr(volume_window, tvl_avg, tier.fraction(), window_hours).fee_apr_est,
        })
        .collect()
}

/// Volume per window needed to reach `target_apr` percent; the inverse of
/// [`estimate_apr`].
#[must_use]
pub fn calculate_breakeven_volume(
    tvl_avg: f64,
    fee_tier: f64,
    target_apr: f64,
    window_hours: u32,
) -> f64 {
    match periods_per_year(window_hours) {
        Some(periods) if is_positive(tvl_avg) && is_positive(fee_tier) => {
            finite_or_zero((target_apr / 100.0 * tvl_avg) / (fee_tier * periods))
        }
        _ => 0.0,
    }
}
