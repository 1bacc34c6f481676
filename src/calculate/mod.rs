//! Statistics calculation engine.
//!
//! Pure functions over player snapshots:
//! - Win rate from recent match history
//! - BMI from weight and height
//! - Per-country aggregates (average win ratio, average BMI, median height)
//! - Best country by win ratio

use std::collections::HashMap;

use thiserror::Error;

use crate::models::{Player, PlayerData, Statistic};

/// Text returned by [`bmi_text`] when BMI cannot be computed.
pub const BMI_NOT_AVAILABLE: &str = "N/A";

/// Errors raised by aggregate computations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("No statistic available")]
    NoStatisticAvailable,
}

/// Win rate in percent (0.0 to 100.0) over the recent match history.
pub fn win_rate(data: &PlayerData) -> f64 {
    if data.last.is_empty() {
        return 0.0;
    }
    let wins = data.last.iter().filter(|&&result| result == 1).count();
    wins as f64 / data.last.len() as f64 * 100.0
}

/// Win rate of a player, 0.0 when the player has no data.
pub fn player_win_rate(player: &Player) -> f64 {
    player.data.as_ref().map(win_rate).unwrap_or(0.0)
}

/// Body mass index (kg/m²), 0.0 unless weight and a non-zero height are known.
pub fn bmi(player: &Player) -> f64 {
    match &player.data {
        Some(data) if data.has_valid_bmi_data() => raw_bmi(data),
        _ => 0.0,
    }
}

/// BMI rendered with two decimals (halves rounded up), or [`BMI_NOT_AVAILABLE`].
pub fn bmi_text(data: &PlayerData) -> String {
    if !data.has_valid_bmi_data() {
        return BMI_NOT_AVAILABLE.to_string();
    }
    format!("{:.2}", round2(raw_bmi(data)))
}

fn raw_bmi(data: &PlayerData) -> f64 {
    let height = data.height_in_meters();
    data.weight_in_kg() / (height * height)
}

/// Round to two decimal places, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Median height in centimeters over players that have data and a height.
pub fn median_height<'a>(players: impl IntoIterator<Item = &'a Player>) -> f64 {
    let mut heights: Vec<u32> = players
        .into_iter()
        .filter_map(|p| p.data.as_ref().and_then(|d| d.height))
        .collect();

    if heights.is_empty() {
        return 0.0;
    }

    heights.sort_unstable();
    let mid = heights.len() / 2;
    if heights.len() % 2 == 0 {
        (heights[mid - 1] as f64 + heights[mid] as f64) / 2.0
    } else {
        heights[mid] as f64
    }
}

/// Aggregate statistic for the players of one country.
///
/// Only players with data contribute. The caller decides which players
/// belong to the country.
pub fn country_statistic(country_code: &str, players: &[&Player]) -> Statistic {
    let with_data: Vec<&Player> = players.iter().copied().filter(|p| p.has_data()).collect();

    let win_ratio = mean(with_data.iter().map(|p| player_win_rate(p)));
    let average_bmi = mean(
        with_data
            .iter()
            .filter(|p| p.has_valid_bmi_data())
            .map(|p| bmi(p)),
    );
    let median = median_height(with_data.iter().copied());

    Statistic::new(country_code, win_ratio, average_bmi, median)
}

/// Group players with a valid country by code, in first-seen order.
pub fn group_by_country(players: &[Player]) -> Vec<(String, Vec<&Player>)> {
    let mut groups: Vec<(String, Vec<&Player>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for player in players.iter().filter(|p| p.has_valid_country()) {
        let Some(country) = player.country.as_ref() else {
            continue;
        };
        match index.get(country.code.as_str()) {
            Some(&i) => groups[i].1.push(player),
            None => {
                index.insert(country.code.as_str(), groups.len());
                groups.push((country.code.clone(), vec![player]));
            }
        }
    }

    groups
}

/// Statistics for every country represented in the snapshot, first-seen order.
pub fn country_statistics(players: &[Player]) -> Vec<Statistic> {
    group_by_country(players)
        .iter()
        .map(|(code, members)| country_statistic(code, members))
        .collect()
}

/// The country with the highest average win ratio.
///
/// Ties go to the country encountered first.
pub fn best_country_by_win_ratio(players: &[Player]) -> Result<Statistic, StatsError> {
    country_statistics(players)
        .into_iter()
        .fold(None, |best: Option<Statistic>, stat| match best {
            Some(b) if b.win_ratio >= stat.win_ratio => Some(b),
            _ => Some(stat),
        })
        .ok_or(StatsError::NoStatisticAvailable)
}
