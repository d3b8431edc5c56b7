use lp_il_domain::{VolumeEstimate, VolumeSource};

/// Daily turnover assumed when no indexer data is available.
pub const DEFAULT_DAILY_TURNOVER: f64 = 1.0;

/// Trait for estimating trading volume over a window.
pub trait VolumeModel: Send + Sync {
    fn estimate(&self, tvl_usd: f64, window_hours: u32) -> VolumeEstimate;
}

/// Volume as a fixed multiple of TVL per day.
///
/// This is a placeholder for indexed volume: the estimate scales with TVL by
/// construction, so the fee APR it implies depends only on the multiplier
/// and fee tier. Results are tagged [`VolumeSource::TvlHeuristic`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TvlMultipleVolume {
    pub daily_multiplier: f64,
}

impl Default for TvlMultipleVolume {
    fn default() -> Self {
        Self {
            daily_multiplier: DEFAULT_DAILY_TURNOVER,
        }
    }
}

impl VolumeModel for TvlMultipleVolume {
    fn estimate(&self, tvl_usd: f64, window_hours: u32) -> VolumeEstimate {
        let volume_usd = tvl_usd.max(0.0) * self.daily_multiplier * f64::from(window_hours) / 24.0;
        VolumeEstimate {
            volume_usd,
            source: VolumeSource::TvlHeuristic {
                multiplier: self.daily_multiplier,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scales_with_window() {
        let model = TvlMultipleVolume::default();
        assert_eq!(model.estimate(1_000_000.0, 24).volume_usd, 1_000_000.0);
        assert_eq!(model.estimate(1_000_000.0, 168).volume_usd, 7_000_000.0);
        assert_eq!(model.estimate(1_000_000.0, 12).volume_usd, 500_000.0);
    }

    #[test]
    fn test_is_tagged_as_heuristic() {
        let estimate = TvlMultipleVolume { daily_multiplier: 2.5 }.estimate(10.0, 24);
        assert_eq!(estimate.volume_usd, 25.0);
        assert_eq!(estimate.source, VolumeSource::TvlHeuristic { multiplier: 2.5 });
    }

    #[test]
    fn test_negative_tvl_gives_no_volume() {
        assert_eq!(TvlMultipleVolume::default().estimate(-5.0, 24).volume_usd, 0.0);
    }
}
