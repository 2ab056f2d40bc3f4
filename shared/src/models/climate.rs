//! Climate trend signals from land-surface temperature

use serde::{Deserialize, Serialize};

/// Bin count for the frequent-temperature histogram
pub const HISTOGRAM_BINS: usize = 50;

/// Fitted slope (°C per year) separating moderate from strong trends
pub const STRONG_TREND_SLOPE: f64 = 0.1;

/// Five-level ordinal for a fitted temperature trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum TrendLevel {
    StrongCooling,
    Cooling,
    Stable,
    Warming,
    StrongWarming,
}

impl TrendLevel {
    pub fn value(&self) -> i8 {
        match self {
            TrendLevel::StrongCooling => -2,
            TrendLevel::Cooling => -1,
            TrendLevel::Stable => 0,
            TrendLevel::Warming => 1,
            TrendLevel::StrongWarming => 2,
        }
    }

    /// Map a fitted slope to its level
    pub fn from_slope(slope: f64) -> Self {
        if slope > STRONG_TREND_SLOPE {
            TrendLevel::StrongWarming
        } else if slope > 0.0 {
            TrendLevel::Warming
        } else if slope < -STRONG_TREND_SLOPE {
            TrendLevel::StrongCooling
        } else if slope < 0.0 {
            TrendLevel::Cooling
        } else {
            TrendLevel::Stable
        }
    }
}

impl From<TrendLevel> for i8 {
    fn from(level: TrendLevel) -> Self {
        level.value()
    }
}

impl TryFrom<i8> for TrendLevel {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -2 => Ok(TrendLevel::StrongCooling),
            -1 => Ok(TrendLevel::Cooling),
            0 => Ok(TrendLevel::Stable),
            1 => Ok(TrendLevel::Warming),
            2 => Ok(TrendLevel::StrongWarming),
            other => Err(format!("trend level out of range: {}", other)),
        }
    }
}

/// Min, max and mean land-surface temperature for one year, °C
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct YearlyStats {
    pub year: i32,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

/// Climate signals for a point. Every field is absent when the analysis failed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ClimateSignals {
    /// Most frequent daytime surface temperature in the analysis year, °C
    pub frequent_day_temp: Option<f64>,
    /// Most frequent nighttime surface temperature in the analysis year, °C
    pub frequent_night_temp: Option<f64>,
    pub trend_max: Option<TrendLevel>,
    pub trend_mean: Option<TrendLevel>,
    pub trend_min: Option<TrendLevel>,
}

impl ClimateSignals {
    /// Trend of yearly maxima, 0 when absent
    pub fn trend_max_value(&self) -> i8 {
        self.trend_max.map(|t| t.value()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        *self == ClimateSignals::default()
    }
}

/// Midpoint of the modal bin of a fixed 50-bin histogram over the observed
/// range. Nulls and non-finite samples are discarded; `None` when nothing
/// remains.
pub fn frequent_temperature(samples: &[Option<f64>]) -> Option<f64> {
    let values: Vec<f64> = samples
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .collect();

    if values.is_empty() {
        return None;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == min {
        return Some(min);
    }

    let width = (max - min) / HISTOGRAM_BINS as f64;
    let mut counts = [0usize; HISTOGRAM_BINS];
    for v in &values {
        // The last bin is closed on the right
        let idx = (((v - min) / width) as usize).min(HISTOGRAM_BINS - 1);
        counts[idx] += 1;
    }

    // First bin with the highest count
    let mut modal = 0;
    for (idx, count) in counts.iter().enumerate() {
        if *count > counts[modal] {
            modal = idx;
        }
    }

    Some(min + width * (modal as f64 + 0.5))
}

/// Ordinary least-squares slope of values against their index
pub fn ols_slope(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n;

    let (mut num, mut den) = (0.0, 0.0);
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        num += dx * (y - y_mean);
        den += dx * dx;
    }

    Some(num / den)
}

/// Trend level of a yearly series. Nulls are dropped before fitting, and
/// fewer than two values yield `Stable`.
pub fn trend_from_series(series: &[Option<f64>]) -> TrendLevel {
    let values: Vec<f64> = series.iter().flatten().copied().collect();
    ols_slope(&values)
        .map(TrendLevel::from_slope)
        .unwrap_or(TrendLevel::Stable)
}

/// Combine histogram samples and yearly statistics into climate signals
pub fn climate_signals(
    day_samples: &[Option<f64>],
    night_samples: &[Option<f64>],
    yearly: &[YearlyStats],
) -> ClimateSignals {
    let mut yearly: Vec<YearlyStats> = yearly.to_vec();
    yearly.sort_by_key(|s| s.year);

    let series = |pick: fn(&YearlyStats) -> Option<f64>| -> Vec<Option<f64>> {
        yearly.iter().map(pick).collect()
    };

    ClimateSignals {
        frequent_day_temp: frequent_temperature(day_samples),
        frequent_night_temp: frequent_temperature(night_samples),
        trend_max: Some(trend_from_series(&series(|s| s.max))),
        trend_mean: Some(trend_from_series(&series(|s| s.mean))),
        trend_min: Some(trend_from_series(&series(|s| s.min))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_level_boundaries() {
        assert_eq!(TrendLevel::from_slope(0.25), TrendLevel::StrongWarming);
        assert_eq!(TrendLevel::from_slope(0.1), TrendLevel::Warming);
        assert_eq!(TrendLevel::from_slope(0.0001), TrendLevel::Warming);
        assert_eq!(TrendLevel::from_slope(0.0), TrendLevel::Stable);
        assert_eq!(TrendLevel::from_slope(-0.1), TrendLevel::Cooling);
        assert_eq!(TrendLevel::from_slope(-0.1001), TrendLevel::StrongCooling);
    }

    #[test]
    fn test_trend_level_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&TrendLevel::StrongWarming).unwrap(), "2");
        let level: TrendLevel = serde_json::from_str("-1").unwrap();
        assert_eq!(level, TrendLevel::Cooling);
        assert!(serde_json::from_str::<TrendLevel>("3").is_err());
    }

    #[test]
    fn test_ols_slope_linear() {
        let values = [20.0, 20.5, 21.0, 21.5];
        let slope = ols_slope(&values).unwrap();
        assert!((slope - 0.5).abs() < 1e-12);
        assert!(ols_slope(&[1.0]).is_none());
    }

    #[test]
    fn test_trend_needs_two_values() {
        assert_eq!(trend_from_series(&[]), TrendLevel::Stable);
        assert_eq!(trend_from_series(&[Some(30.0), None, None]), TrendLevel::Stable);
        assert_eq!(
            trend_from_series(&[Some(30.0), None, Some(31.0)]),
            TrendLevel::StrongWarming
        );
        assert_eq!(trend_from_series(&[Some(30.0), Some(30.0)]), TrendLevel::Stable);
    }

    #[test]
    fn test_frequent_temperature_modal_bin() {
        // Range 0..50 gives 1 °C bins; three samples land in [10, 11)
        let samples = [
            Some(0.0),
            Some(10.2),
            Some(10.4),
            Some(10.9),
            None,
            Some(30.0),
            Some(50.0),
        ];
        let freq = frequent_temperature(&samples).unwrap();
        assert!((freq - 10.5).abs() < 1e-9, "got {}", freq);
    }

    #[test]
    fn test_frequent_temperature_edge_cases() {
        assert_eq!(frequent_temperature(&[]), None);
        assert_eq!(frequent_temperature(&[None, None]), None);
        assert_eq!(frequent_temperature(&[Some(21.5), Some(21.5)]), Some(21.5));
    }

    #[test]
    fn test_climate_signals_sorts_years() {
        let yearly = vec![
            YearlyStats { year: 2012, min: Some(5.0), max: Some(32.0), mean: Some(20.0) },
            YearlyStats { year: 2010, min: Some(5.0), max: Some(30.0), mean: Some(20.0) },
            YearlyStats { year: 2011, min: Some(5.0), max: Some(31.0), mean: Some(20.0) },
        ];
        let signals = climate_signals(&[Some(25.0)], &[], &yearly);
        assert_eq!(signals.trend_max, Some(TrendLevel::StrongWarming));
        assert_eq!(signals.trend_mean, Some(TrendLevel::Stable));
        assert_eq!(signals.frequent_day_temp, Some(25.0));
        assert_eq!(signals.frequent_night_temp, None);
        assert_eq!(signals.trend_max_value(), 2);
    }

    #[test]
    fn test_empty_signals_read_as_zero() {
        let signals = ClimateSignals::default();
        assert!(signals.is_empty());
        assert_eq!(signals.trend_max_value(), 0);
    }
}
