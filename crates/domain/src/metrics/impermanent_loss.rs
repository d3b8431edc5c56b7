use super::{ILResult, IlFormula, IlScenario, MathGuard};
use crate::error::IlInputError;
use crate::value_objects::{PoolWeights, PriceMap};

/// Single-token price moves reported by [`il_scenarios`].
const SCENARIOS: [(&str, f64); 9] = [
    ("2x price increase", 2.0),
    ("2x price decrease", 0.5),
    ("3x price increase", 3.0),
    ("4x price increase", 4.0),
    ("5x price increase", 5.0),
    ("10% increase", 1.1),
    ("10% decrease", 0.9),
    ("25% increase", 1.25),
    ("25% decrease", 0.75),
];

/// Calculates impermanent loss for a set of price-change ratios and weights.
///
/// The n-th ratio is paired with the n-th weight. Weights may be raw or
/// already normalized. Dispatch:
/// - two weights within one point of 50/50: balanced formula
/// - two other weights: weighted two-asset formula
/// - three or more: generalized multi-asset formula
///
/// # Arguments
///
/// * `price_changes` - `current / initial` price per token, in pool order
/// * `weights` - Token weights (e.g. `[50, 50]` or `[80, 20]`)
///
/// # Returns
///
/// * `ILResult` - IL in percent. Degenerate math yields `il_percent = 0` with
///   `guard` set instead of an error.
///
/// # Errors
///
/// Returns an error when ratio and weight counts differ or the weights are
/// invalid.
pub fn compute_il(price_changes: &PriceMap, weights: &[f64]) -> Result<ILResult, IlInputError> {
    if price_changes.len() != weights.len() {
        return Err(IlInputError::LengthMismatch {
            ratios: price_changes.len(),
            weights: weights.len(),
        });
    }

    let weights = PoolWeights::new(weights)?;
    let ratios: Vec<f64> = price_changes.values().collect();

    let (formula, outcome) = if weights.is_balanced_pair() {
        (IlFormula::Balanced, balanced_il(ratios[0], ratios[1]))
    } else if weights.len() == 2 {
        let w: Vec<f64> = weights.fractions().collect();
        (
            IlFormula::WeightedPair,
            weighted_pair_il(ratios[0], ratios[1], w[0], w[1]),
        )
    } else {
        let w: Vec<f64> = weights.fractions().collect();
        (IlFormula::MultiAsset, multi_asset_il(&ratios, &w))
    };

    let (il_percent, guard) = match outcome {
        Ok(il) => (il, None),
        Err(guard) => (0.0, Some(guard)),
    };

    Ok(ILResult {
        il_percent,
        price_ratios: price_changes.clone(),
        pool_type_label: weights.label(),
        weights: weights.into(),
        formula,
        guard,
    })
}

/// IL when one token moves from `initial_price` to `current_price` and the
/// other stays flat.
///
/// # Errors
///
/// Returns an error unless exactly two valid weights are given.
pub fn il_from_price_change(
    initial_price: f64,
    current_price: f64,
    weights: &[f64],
) -> Result<ILResult, IlInputError> {
    // Non-positive prices leave the ratio undefined; 0.0 trips the ratio guard.
    let ratio = if is_positive(initial_price) && is_positive(current_price) {
        current_price / initial_price
    } else {
        0.0
    };
    let changes: PriceMap = [("base", 1.0), ("quote", ratio)].into_iter().collect();
    compute_il(&changes, weights)
}

/// IL for common single-token price moves.
///
/// # Errors
///
/// Returns an error unless exactly two valid weights are given.
pub fn il_scenarios(weights: &[f64]) -> Result<Vec<IlScenario>, IlInputError> {
    SCENARIOS
        .iter()
        .map(|(label, ratio)| {
            il_from_price_change(1.0, *ratio, weights).map(|result| IlScenario {
                label: (*label).to_string(),
                price_ratio: *ratio,
                il_percent: result.il_percent,
            })
        })
        .collect()
}

/// formula: 2 * sqrt(r) / (1 + r) - 1, with r = ratio_1 / ratio_0
fn balanced_il(ratio_0: f64, ratio_1: f64) -> Result<f64, MathGuard> {
    if !is_positive(ratio_0) || !is_positive(ratio_1) {
        return Err(MathGuard::NonPositiveRatio);
    }
    let r = ratio_1 / ratio_0;
    let il = (2.0 * r.sqrt() / (1.0 + r) - 1.0) * 100.0;
    // AM-GM bounds this at zero; clamp float noise around r = 1.
    finite(il).map(|il| il.min(0.0))
}

/// formula: (w0 * r0^w0 + w1 * r1^w1) / (w0 * r0 + w1 * r1) - 1
fn weighted_pair_il(r0: f64, r1: f64, w0: f64, w1: f64) -> Result<f64, MathGuard> {
    if !is_positive(r0) || !is_positive(r1) {
        return Err(MathGuard::NonPositiveRatio);
    }
    let numerator = w0 * r0.powf(w0) + w1 * r1.powf(w1);
    let denominator = w0 * r0 + w1 * r1;
    if denominator == 0.0 {
        return Err(MathGuard::ZeroDenominator);
    }
    finite((numerator / denominator - 1.0) * 100.0)
}

/// formula: prod(r_i ^ w_i) / sum(w_i * r_i) - 1
fn multi_asset_il(ratios: &[f64], weights: &[f64]) -> Result<f64, MathGuard> {
    if ratios.iter().any(|r| !is_positive(*r)) {
        return Err(MathGuard::NonPositiveRatio);
    }
    let geometric: f64 = ratios
        .iter()
        .zip(weights)
        .map(|(r, w)| r.powf(*w))
        .product();
    let arithmetic: f64 = ratios.iter().zip(weights).map(|(r, w)| w * r).sum();
    if arithmetic == 0.0 {
        return Err(MathGuard::ZeroDenominator);
    }
    finite((geometric / arithmetic - 1.0) * 100.0)
}

fn is_positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

fn finite(x: f64) -> Result<f64, MathGuard> {
    if x.is_finite() {
        Ok(x)
    } else {
        Err(MathGuard::NonFinite)
    }
}
