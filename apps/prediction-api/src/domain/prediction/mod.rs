//! Trend Estimation
//!
//! A deliberately naive projection: extrapolate the mean daily percent
//! change seven periods forward, add a damped momentum term for the most
//! recent period, and derive a confidence score from historical
//! volatility. The confidence score is a heuristic inversely related to
//! volatility, not a statistical probability.
//!
//! The estimator performs no I/O and does not fail; callers are
//! responsible for supplying positive prices.

use serde::{Deserialize, Serialize};

use crate::domain::market::{PricePoint, StockData, Symbol};

// =============================================================================
// Model Constants
// =============================================================================

/// Projection horizon in trading days.
pub const PROJECTION_DAYS: f64 = 7.0;

/// Damping applied to the most recent period's percent change.
pub const MOMENTUM_WEIGHT: f64 = 0.3;

/// Confidence before the volatility penalty.
pub const BASE_CONFIDENCE: f64 = 85.0;

/// Cap on the volatility penalty.
pub const MAX_VOLATILITY_PENALTY: f64 = 20.0;

/// Human-readable horizon label attached to predictions.
pub const TIMEFRAME: &str = "7 Days";

// =============================================================================
// Estimator
// =============================================================================

/// Mean of day-over-day percent changes.
///
/// Zero for histories shorter than two prices.
#[must_use]
pub fn average_daily_change(closes: &[f64]) -> f64 {
    let changes = percent_changes(closes);
    if changes.is_empty() {
        return 0.0;
    }
    changes.iter().sum::<f64>() / changes.len() as f64
}

/// Population standard deviation of day-over-day percent changes.
///
/// Zero for histories shorter than two prices.
#[must_use]
pub fn volatility(closes: &[f64]) -> f64 {
    let changes = percent_changes(closes);
    if changes.is_empty() {
        return 0.0;
    }

    let mean = changes.iter().sum::<f64>() / changes.len() as f64;
    let variance =
        changes.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / changes.len() as f64;
    variance.sqrt()
}

fn percent_changes(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0] * 100.0)
        .collect()
}

/// Outcome of the trend estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendEstimate {
    /// Projected price seven periods ahead.
    pub predicted_price: f64,
    /// Heuristic confidence score in `[60, 100]`.
    pub confidence: u8,
}

/// Project a price seven periods forward from the close history.
///
/// Histories shorter than two entries carry no trend signal: the estimate
/// is the current price itself at base confidence, and the momentum term
/// is not applied.
#[must_use]
pub fn estimate(closes: &[f64], current_price: f64, change_percent: f64) -> TrendEstimate {
    let predicted_price = if closes.len() < 2 {
        current_price
    } else {
        let trend_factor = average_daily_change(closes) * PROJECTION_DAYS;
        let momentum_factor = change_percent * MOMENTUM_WEIGHT;
        let predicted_change = trend_factor + momentum_factor;
        current_price * (1.0 + predicted_change / 100.0)
    };

    let penalty = (volatility(closes) * 2.0).min(MAX_VOLATILITY_PENALTY);
    let confidence = (BASE_CONFIDENCE - penalty).round().clamp(60.0, 100.0) as u8;

    TrendEstimate {
        predicted_price,
        confidence,
    }
}

// =============================================================================
// Prediction
// =============================================================================

/// A computed prediction for one symbol.
///
/// Derived purely from a quote and its history; recomputed on every query
/// with no persisted identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Ticker the prediction answers for.
    pub symbol: Symbol,
    /// Latest trading price.
    pub current_price: f64,
    /// Projected price at the end of the timeframe.
    pub predicted_price: f64,
    /// Heuristic confidence score in `[60, 100]`.
    pub confidence: u8,
    /// Horizon label, always "7 Days".
    pub timeframe: String,
    /// Absolute change since the previous close.
    pub change: f64,
    /// Percent change since the previous close.
    pub change_percent: f64,
    /// The history the projection was derived from.
    pub historical_data: Vec<PricePoint>,
}

impl Prediction {
    /// Derive a prediction from freshly fetched stock data.
    #[must_use]
    pub fn from_stock_data(data: &StockData) -> Self {
        let closes = data.closes();
        let TrendEstimate {
            predicted_price,
            confidence,
        } = estimate(&closes, data.quote.current_price, data.quote.change_percent);

        Self {
            symbol: data.quote.symbol.clone(),
            current_price: data.quote.current_price,
            predicted_price,
            confidence,
            timeframe: TIMEFRAME.to_string(),
            change: data.quote.change,
            change_percent: data.quote.change_percent,
            historical_data: data.historical_data.clone(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use test_case::test_case;

    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn constant_history_has_no_trend() {
        let closes = [100.0, 100.0, 100.0, 100.0];
        assert!(average_daily_change(&closes).abs() < EPSILON);
        assert!(volatility(&closes).abs() < EPSILON);
    }

    #[test]
    fn constant_history_prediction_is_pure_momentum() {
        let closes = [100.0; 5];
        let result = estimate(&closes, 100.0, 2.0);

        // trend is zero, momentum is 2 * 0.3 = 0.6 percent
        assert!((result.predicted_price - 100.0 * 1.006).abs() < EPSILON);
        assert_eq!(result.confidence, 85);
    }

    #[test_case(&[]; "empty history")]
    #[test_case(&[123.45]; "single close")]
    fn short_history_returns_current_price(closes: &[f64]) {
        let result = estimate(closes, 250.0, 4.2);
        assert!((result.predicted_price - 250.0).abs() < EPSILON);
        assert_eq!(result.confidence, 85);
    }

    #[test]
    fn worked_example_matches_hand_computation() {
        // day changes: +2.0%, -0.9804%, +1.9802%
        let closes = [100.0, 102.0, 101.0, 103.0];
        let current = 103.0;

        let avg = average_daily_change(&closes);
        assert!((avg - 0.999_935_287_646_411_7).abs() < 1e-12);

        let result = estimate(&closes, current, 2.0);
        let expected_change = avg * 7.0 + 0.6;
        assert!((expected_change - 7.599_546_9).abs() < 1e-6);
        assert!((result.predicted_price - current * (1.0 + expected_change / 100.0)).abs() < EPSILON);
    }

    #[test]
    fn volatility_is_population_standard_deviation() {
        // changes: +100%, -50% → mean 25, deviations ±75 → stddev 75
        let closes = [1.0, 2.0, 1.0];
        assert!((volatility(&closes) - 75.0).abs() < EPSILON);
    }

    #[test]
    fn volatility_penalty_is_capped() {
        // wildly volatile history: penalty saturates at 20, confidence 65
        let closes = [1.0, 3.0, 1.0, 3.0, 1.0];
        let result = estimate(&closes, 2.0, 0.0);
        assert_eq!(result.confidence, 65);
    }

    #[test]
    fn higher_volatility_never_raises_confidence() {
        let calm = estimate(&[100.0, 100.5, 101.0, 100.8], 100.8, 0.0);
        let jumpy = estimate(&[100.0, 110.0, 95.0, 108.0], 108.0, 0.0);
        assert!(jumpy.confidence <= calm.confidence);
    }

    #[test]
    fn downtrend_projects_below_current_price() {
        let closes = [110.0, 108.0, 105.0, 101.0];
        let result = estimate(&closes, 101.0, -1.0);
        assert!(result.predicted_price < 101.0);
    }

    #[test]
    fn prediction_assembles_quote_fields() {
        let data = StockData {
            quote: crate::domain::market::Quote {
                symbol: Symbol::new("AAPL"),
                current_price: 103.0,
                previous_close: 101.0,
                change: 2.0,
                change_percent: 1.98,
                volume: 1_000_000,
                high: 104.0,
                low: 100.5,
            },
            historical_data: vec![
                PricePoint {
                    date: "2024-01-02".parse().unwrap(),
                    open: 100.0,
                    high: 101.0,
                    low: 99.0,
                    close: 100.0,
                    volume: 900_000,
                },
                PricePoint {
                    date: "2024-01-03".parse().unwrap(),
                    open: 100.0,
                    high: 103.0,
                    low: 100.0,
                    close: 102.0,
                    volume: 950_000,
                },
            ],
        };

        let prediction = Prediction::from_stock_data(&data);
        assert_eq!(prediction.symbol.as_str(), "AAPL");
        assert_eq!(prediction.timeframe, "7 Days");
        assert_eq!(prediction.change, 2.0);
        assert_eq!(prediction.historical_data.len(), 2);
        assert!((60..=100).contains(&prediction.confidence));
    }

    #[test]
    fn prediction_serializes_with_camel_case_keys() {
        let data = StockData {
            quote: crate::domain::market::Quote {
                symbol: Symbol::new("MSFT"),
                current_price: 400.0,
                previous_close: 398.0,
                change: 2.0,
                change_percent: 0.5,
                volume: 0,
                high: 401.0,
                low: 397.0,
            },
            historical_data: vec![],
        };

        let json = serde_json::to_value(Prediction::from_stock_data(&data)).unwrap();
        assert_eq!(json["predictedPrice"], 400.0);
        assert_eq!(json["confidence"], 85);
        assert_eq!(json["timeframe"], "7 Days");
        assert_eq!(json["changePercent"], 0.5);
    }

    proptest! {
        #[test]
        fn confidence_is_always_in_bounds(
            closes in prop::collection::vec(0.01f64..10_000.0, 0..60),
            current in 0.01f64..10_000.0,
            change_percent in -50.0f64..50.0,
        ) {
            let result = estimate(&closes, current, change_percent);
            prop_assert!((60..=100).contains(&result.confidence));
        }

        #[test]
        fn short_histories_echo_current_price(
            closes in prop::collection::vec(0.01f64..10_000.0, 0..2),
            current in 0.01f64..10_000.0,
            change_percent in -50.0f64..50.0,
        ) {
            let result = estimate(&closes, current, change_percent);
            prop_assert_eq!(result.predicted_price, current);
            prop_assert_eq!(result.confidence, 85);
        }
    }
}
