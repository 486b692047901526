//! Plain-text views of the forecast: the day list and the hourly table.

use chrono::NaiveDate;
use skycast_weather::{
    day_name, format_date, format_short_date, format_temp, format_time, DailyForecast,
    ForecastItem, WeatherState,
};

/// Heading plus one card per day, or a hint when there is nothing to show.
pub fn forecast_list(state: &WeatherState, today: NaiveDate) -> String {
    if state.daily_forecasts.is_empty() {
        return "No forecast data available. Search for a city or use your location.\n"
            .to_string();
    }

    let mut lines = Vec::new();
    if let Some(location) = &state.current_location {
        lines.push(format!(
            "5-Day Forecast for {}, {}",
            location.city, location.country
        ));
        lines.push(String::new());
    }

    for (i, day) in state.daily_forecasts.iter().enumerate() {
        lines.push(format!("[{}] {}", i + 1, day_card(day, today)));
    }
    lines.push("Use --day <N|YYYY-MM-DD> for hourly details.".to_string());

    lines.join("\n") + "\n"
}

/// Summary card of one day.
pub fn day_card(day: &DailyForecast, today: NaiveDate) -> String {
    let name = day_name(&day.date, today).unwrap_or_else(|_| day.date.clone());
    let short = format_short_date(&day.date).unwrap_or_default();

    let mut details = vec![
        format!("Humidity {}%", day.humidity),
        format!("Wind {} m/s", day.wind_speed),
    ];
    if day.pop > 0 {
        details.push(format!("Rain {}%", day.pop));
    }

    let mut lines = vec![
        format!("{} ({})", name, short),
        format!("    {}", day.weather.main),
        format!(
            "    {} / {}",
            format_temp(day.temp_max),
            format_temp(day.temp_min)
        ),
        format!("    {}", details.join("  ")),
    ];
    if !day.weather.icon.is_empty() {
        lines.push(format!("    {}", day.weather.icon_url()));
    }
    lines.push(String::new());

    lines.join("\n")
}

/// Hourly breakdown of one day.
pub fn hourly_table(day: &DailyForecast) -> String {
    let title = format_date(&day.date).unwrap_or_else(|_| day.date.clone());

    let mut lines = vec![
        format!("Hourly Forecast - {}", title),
        format!(
            "{:<9} {:<24} {:>6} {:>6} {:>9} {:>9} {:>6}",
            "Time", "Weather", "Temp", "Feels", "Humidity", "Wind", "Rain"
        ),
    ];
    lines.extend(day.hourly_forecasts.iter().map(hourly_row));

    lines.join("\n") + "\n"
}

fn hourly_row(item: &ForecastItem) -> String {
    let time = format_time(&item.dt_txt).unwrap_or_else(|_| item.dt_txt.clone());
    let description = item
        .condition()
        .map_or("-", |c| c.description.as_str());
    let wind = (item.wind.speed * 10.0).round() / 10.0;

    format!(
        "{:<9} {:<24} {:>6} {:>6} {:>9} {:>9} {:>6}",
        time,
        description,
        format_temp(item.main.temp),
        format_temp(item.main.feels_like),
        format!("{}%", item.main.humidity),
        format!("{} m/s", wind),
        format!("{}%", (item.pop * 100.0).round() as i64),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycast_weather::{CurrentLocation, MainWeatherData, WeatherCondition, Wind};

    fn sample(dt_txt: &str, temp: f64) -> ForecastItem {
        ForecastItem {
            dt_txt: dt_txt.to_string(),
            main: MainWeatherData {
                temp,
                feels_like: temp - 1.2,
                humidity: 71,
                ..Default::default()
            },
            weather: vec![WeatherCondition {
                id: 500,
                main: "Rain".into(),
                description: "light rain".into(),
                icon: "10d".into(),
            }],
            wind: Wind {
                speed: 4.04,
                ..Default::default()
            },
            pop: 0.35,
            ..Default::default()
        }
    }

    fn day() -> DailyForecast {
        DailyForecast {
            date: "2024-01-15".into(),
            temp_min: -0.4,
            temp_max: 6.5,
            weather: WeatherCondition {
                id: 500,
                main: "Rain".into(),
                description: "light rain".into(),
                icon: "10d".into(),
            },
            humidity: 71,
            wind_speed: 4.0,
            pop: 35,
            hourly_forecasts: vec![
                sample("2024-01-15 09:00:00", 3.0),
                sample("2024-01-15 15:00:00", 6.5),
            ],
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_day_card() {
        let card = day_card(&day(), today());

        assert!(card.starts_with("Today (Jan 15)"));
        assert!(card.contains("Rain"));
        assert!(card.contains("7°C / 0°C"));
        assert!(card.contains("Humidity 71%"));
        assert!(card.contains("Wind 4 m/s"));
        assert!(card.contains("Rain 35%"));
        assert!(card.contains("https://openweathermap.org/img/wn/10d@2x.png"));
    }

    #[test]
    fn test_day_card_hides_zero_pop() {
        let mut dry = day();
        dry.pop = 0;
        assert!(!day_card(&dry, today()).contains("Rain 0%"));
    }

    #[test]
    fn test_forecast_list() {
        let state = WeatherState {
            daily_forecasts: vec![day()],
            current_location: Some(CurrentLocation {
                city: "Bergen".into(),
                country: "NO".into(),
            }),
            ..Default::default()
        };

        let out = forecast_list(&state, today());

        assert!(out.starts_with("5-Day Forecast for Bergen, NO"));
        assert!(out.contains("[1] Today (Jan 15)"));
    }

    #[test]
    fn test_forecast_list_empty() {
        let out = forecast_list(&WeatherState::default(), today());
        assert!(out.starts_with("No forecast data available"));
    }

    #[test]
    fn test_hourly_table() {
        let table = hourly_table(&day());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "Hourly Forecast - Monday, Jan 15");
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("09:00 AM"));
        assert!(lines[2].contains("light rain"));
        assert!(lines[2].contains("3°C"));
        assert!(lines[2].contains("2°C"));
        assert!(lines[2].contains("4 m/s"));
        assert!(lines[2].contains("35%"));
        assert!(lines[3].starts_with("03:00 PM"));
    }
}
