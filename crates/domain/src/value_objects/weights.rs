use crate::error::WeightError;
use serde::{Deserialize, Serialize};

/// Tolerance, in percentage points, within which a pair counts as 50/50.
const BALANCE_TOLERANCE: f64 = 1.0;

/// Pool weights normalized to sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct PoolWeights(Vec<f64>);

// Never empty: construction needs at least two weights.
#[allow(clippy::len_without_is_empty)]
impl PoolWeights {
    /// Validates and normalizes raw weights (`[80, 20]`, `[0.8, 0.2]` and
    /// `[4, 1]` all give `[80, 20]`).
    ///
    /// # Errors
    /// Returns an error for fewer than two weights, a negative or non-finite
    /// weight, or a zero sum.
    pub fn new(raw: &[f64]) -> Result<Self, WeightError> {
        if raw.len() < 2 {
            return Err(WeightError::TooFewAssets(raw.len()));
        }
        if let Some((index, &value)) = raw
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(WeightError::InvalidWeight { index, value });
        }

        let total: f64 = raw.iter().sum();
        if !(total.is_finite() && total > 0.0) {
            return Err(WeightError::NonPositiveSum);
        }

        Ok(Self(raw.iter().map(|w| w / total * 100.0).collect()))
    }

    /// The default two-asset split.
    #[must_use]
    pub fn balanced() -> Self {
        Self(vec![50.0, 50.0])
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Weights as fractions of one.
    pub fn fractions(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(|w| w / 100.0)
    }

    /// Two assets, each strictly within one point of 50.
    #[must_use]
    pub fn is_balanced_pair(&self) -> bool {
        self.0.len() == 2
            && self
                .0
                .iter()
                .all(|w| (w - 50.0).abs() < BALANCE_TOLERANCE)
    }

    /// Label derived from the weight shape: `50/50`, `80/20` or `multi-asset`.
    #[must_use]
    pub fn label(&self) -> String {
        match self.0.as_slice() {
            [_, _] if self.is_balanced_pair() => "50/50".to_string(),
            [w0, w1] => format!("{}/{}", w0.trunc() as i64, w1.trunc() as i64),
            _ => "multi-asset".to_string(),
        }
    }
}

impl Default for PoolWeights {
    fn default() -> Self {
        Self::balanced()
    }
}

impl TryFrom<Vec<f64>> for PoolWeights {
    type Error = WeightError;

    fn try_from(raw: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(&raw)
    }
}

impl From<PoolWeights> for Vec<f64> {
    fn from(weights: PoolWeights) -> Self {
        weights.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_raw_and_fractional_weights() {
        let raw = PoolWeights::new(&[4.0, 1.0]).unwrap();
        let fractional = PoolWeights::new(&[0.8, 0.2]).unwrap();
        assert!((raw.as_slice()[0] - 80.0).abs() < 1e-9);
        assert!((fractional.as_slice()[1] - 20.0).abs() < 1e-9);
        assert!((raw.as_slice().iter().sum::<f64>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_invalid_weights() {
        assert_eq!(PoolWeights::new(&[100.0]), Err(WeightError::TooFewAssets(1)));
        assert_eq!(
            PoolWeights::new(&[60.0, -10.0]),
            Err(WeightError::InvalidWeight {
                index: 1,
                value: -10.0
            })
        );
        assert_eq!(PoolWeights::new(&[0.0, 0.0]), Err(WeightError::NonPositiveSum));
        assert!(PoolWeights::new(&[f64::NAN, 1.0]).is_err());
    }

    #[test]
    fn test_balance_tolerance_is_strict() {
        assert!(PoolWeights::new(&[50.9, 49.1]).unwrap().is_balanced_pair());
        assert!(!PoolWeights::new(&[51.0, 49.0]).unwrap().is_balanced_pair());
    }

    #[test]
    fn test_labels() {
        assert_eq!(PoolWeights::balanced().label(), "50/50");
        assert_eq!(PoolWeights::new(&[80.0, 20.0]).unwrap().label(), "80/20");
        assert_eq!(PoolWeights::new(&[2.0, 1.0]).unwrap().label(), "66/33");
        assert_eq!(
            PoolWeights::new(&[1.0, 1.0, 1.0]).unwrap().label(),
            "multi-asset"
        );
    }

    #[test]
    fn test_serde_validates() {
        let weights: PoolWeights = serde_json::from_str("[80, 20]").unwrap();
        assert_eq!(weights.label(), "80/20");
        assert!(serde_json::from_str::<PoolWeights>("[-1, 2]").is_err());
    }
}
