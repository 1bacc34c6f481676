//! Derived statistics models.

use serde::{Deserialize, Serialize};

/// Aggregate statistics for one country.
///
/// Computed on demand from a player snapshot and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistic {
    /// Country code the statistic covers
    pub country_code: String,

    /// Mean win rate of the country's players (0.0 to 100.0)
    pub win_ratio: f64,

    /// Mean BMI over players with weight and height
    pub average_bmi: f64,

    /// Median height in centimeters
    pub median_height: f64,
}

impl Statistic {
    pub fn new(
        country_code: impl Into<String>,
        win_ratio: f64,
        average_bmi: f64,
        median_height: f64,
    ) -> Self {
        Self {
            country_code: country_code.into(),
            win_ratio,
            average_bmi,
            median_height,
        }
    }
}
