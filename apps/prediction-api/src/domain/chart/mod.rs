//! Chart Path Generation
//!
//! Produces the day-by-day series behind the prediction chart: the
//! historical closes (or a fabricated stand-in when no history is
//! available), the current price, and a seven-day segment that walks a
//! straight line toward the predicted price with bounded uniform noise
//! for visual texture.
//!
//! This is a randomized linear interpolation, not a forecast. The noise
//! source is supplied by the caller, so a seeded RNG reproduces a path
//! exactly; production call sites draw from ambient randomness per
//! render.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::market::PricePoint;

// =============================================================================
// Path Constants
// =============================================================================

/// Fabricated historical points when no real history is available.
pub const FALLBACK_HISTORY_DAYS: u32 = 30;

/// Projected points after the current day.
pub const PREDICTION_DAYS: u32 = 7;

/// Fraction of the current price the fabricated history starts from.
const FALLBACK_START_RATIO: f64 = 0.95;

/// Price-relative volatility when real history backs the chart.
const HISTORY_VOLATILITY_RATIO: f64 = 0.01;

/// Price-relative volatility for the fabricated fallback path.
const FALLBACK_VOLATILITY_RATIO: f64 = 0.02;

// =============================================================================
// Chart Points
// =============================================================================

/// Which segment of the chart a point belongs to.
///
/// The generator owns this tag so the rendering layer can apply different
/// stroke styles without re-deriving the classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    /// A past close (real or fabricated).
    Historical,
    /// The single point carrying today's price.
    Current,
    /// A projected future day.
    Prediction,
}

/// A single point on the prediction chart.
///
/// Historical and current points carry `price`; prediction points carry
/// `predicted`. A point never carries both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// 1-based day index across the whole path.
    pub day: u32,
    /// Price for historical and current points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Projected price for prediction points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted: Option<f64>,
    /// Segment tag.
    #[serde(rename = "type")]
    pub kind: PointKind,
}

// =============================================================================
// Generator
// =============================================================================

/// Generate the full chart path for a prediction.
///
/// With a non-empty `history` the path covers one point per historical
/// close, the current price, and seven projected days. With an empty one,
/// thirty fabricated days stand in for the missing history: a linear ramp
/// from 95% of the current price, perturbed by uniform noise.
///
/// Output length is `history.len() + 8`, or 38 in the fallback case. The
/// `current` point is unique and sits immediately between the segments.
pub fn generate<R: Rng + ?Sized>(
    current_price: f64,
    predicted_price: f64,
    history: &[PricePoint],
    rng: &mut R,
) -> Vec<ChartPoint> {
    let capacity =
        history.len().max(FALLBACK_HISTORY_DAYS as usize) + 1 + PREDICTION_DAYS as usize;
    let mut points = Vec::with_capacity(capacity);

    let volatility = if history.is_empty() {
        let volatility = current_price * FALLBACK_VOLATILITY_RATIO;
        let start_price = current_price * FALLBACK_START_RATIO;

        for day in 0..FALLBACK_HISTORY_DAYS {
            let progress = f64::from(day) / f64::from(FALLBACK_HISTORY_DAYS);
            let trend = (current_price - start_price) * progress;
            let noise = rng.random_range(-0.5..0.5) * volatility;
            points.push(ChartPoint {
                day: day + 1,
                price: Some(start_price + trend + noise),
                predicted: None,
                kind: PointKind::Historical,
            });
        }

        volatility
    } else {
        for (index, bar) in history.iter().enumerate() {
            points.push(ChartPoint {
                day: index as u32 + 1,
                price: Some(bar.close),
                predicted: None,
                kind: PointKind::Historical,
            });
        }

        current_price * HISTORY_VOLATILITY_RATIO
    };

    let current_day = points.len() as u32 + 1;
    points.push(ChartPoint {
        day: current_day,
        price: Some(current_price),
        predicted: None,
        kind: PointKind::Current,
    });

    for step in 1..=PREDICTION_DAYS {
        let progress = f64::from(step) / f64::from(PREDICTION_DAYS);
        let trend = (predicted_price - current_price) * progress;
        let noise = rng.random_range(-0.5..0.5) * volatility * 0.5;
        points.push(ChartPoint {
            day: current_day + step,
            price: None,
            predicted: Some(current_price + trend + noise),
            kind: PointKind::Prediction,
        });
    }

    points
}

// =============================================================================
// Tests
// =============================================================================
