//! Groups 3-hour forecast samples into daily summaries.

use std::collections::HashMap;

use crate::types::{DailyForecast, ForecastItem, ForecastResponse, WeatherCondition};

/// Number of days kept from a forecast.
pub const MAX_FORECAST_DAYS: usize = 5;

/// Group forecast samples by calendar date and summarize each day.
///
/// Days come out in the order their first sample appears in `forecast.list`,
/// and only the first [`MAX_FORECAST_DAYS`] of them are kept. The input is not
/// sorted first, so an out-of-order list keeps its first-seen day order.
pub fn group_by_day(forecast: &ForecastResponse) -> Vec<DailyForecast> {
    let mut buckets: Vec<(String, Vec<ForecastItem>)> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for item in &forecast.list {
        let date = item.date_key();
        let slot = match slots.get(date) {
            Some(&slot) => slot,
            None => {
                buckets.push((date.to_string(), Vec::new()));
                slots.insert(date.to_string(), buckets.len() - 1);
                buckets.len() - 1
            }
        };
        buckets[slot].1.push(item.clone());
    }

    tracing::debug!(
        "Grouped {} samples into {} days",
        forecast.list.len(),
        buckets.len()
    );

    buckets
        .into_iter()
        .take(MAX_FORECAST_DAYS)
        .map(|(date, items)| summarize_day(date, items))
        .collect()
}

/// Build the summary of one non-empty bucket.
fn summarize_day(date: String, items: Vec<ForecastItem>) -> DailyForecast {
    let count = items.len() as f64;

    let temp_min = items
        .iter()
        .map(|item| item.main.temp)
        .fold(f64::INFINITY, f64::min);
    let temp_max = items
        .iter()
        .map(|item| item.main.temp)
        .fold(f64::NEG_INFINITY, f64::max);

    let avg_humidity = items
        .iter()
        .map(|item| f64::from(item.main.humidity))
        .sum::<f64>()
        / count;
    let avg_wind = items.iter().map(|item| item.wind.speed).sum::<f64>() / count;
    let max_pop = items
        .iter()
        .map(|item| item.pop)
        .fold(f64::NEG_INFINITY, f64::max);

    DailyForecast {
        weather: dominant_condition(&items),
        date,
        temp_min,
        temp_max,
        humidity: avg_humidity.round() as u8,
        wind_speed: (avg_wind * 10.0).round() / 10.0,
        pop: (max_pop * 100.0).round() as u8,
        hourly_forecasts: items,
    }
}

/// Most frequent condition category; ties go to the category seen first.
fn dominant_condition(items: &[ForecastItem]) -> WeatherCondition {
    let mut tallies: Vec<(&WeatherCondition, usize)> = Vec::new();

    for condition in items.iter().filter_map(ForecastItem::condition) {
        match tallies.iter_mut().find(|(seen, _)| seen.main == condition.main) {
            Some((_, count)) => *count += 1,
            None => tallies.push((condition, 1)),
        }
    }

    let mut best: Option<(&WeatherCondition, usize)> = None;
    for (condition, count) in tallies {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((condition, count));
        }
    }

    best.map(|(condition, _)| condition.clone())
        .unwrap_or_default()
}
