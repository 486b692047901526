//! OpenWeatherMap forecast response types and the daily view model built from them.

use serde::{Deserialize, Serialize};

/// Geographic coordinates as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One weather descriptor of a forecast sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WeatherCondition {
    /// Provider condition code (e.g. 800 for clear sky)
    pub id: i32,
    /// Short category name ("Clear", "Clouds", "Rain", ...)
    pub main: String,
    /// Long description ("few clouds")
    pub description: String,
    /// Icon identifier ("01d")
    pub icon: String,
}

impl WeatherCondition {
    /// Image URL for this condition's icon
    pub fn icon_url(&self) -> String {
        crate::provider::icon_url(&self.icon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MainWeatherData {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    #[serde(default)]
    pub pressure: f64,
    pub humidity: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sea_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grnd_level: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Wind {
    /// Speed in m/s
    pub speed: f64,
    /// Direction in degrees
    #[serde(default)]
    pub deg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Clouds {
    pub all: u8,
}

/// Rain or snow volume for the last 3 hours, in mm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Precipitation {
    #[serde(rename = "3h", default, skip_serializing_if = "Option::is_none")]
    pub three_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ForecastSys {
    /// Part of day: "d" or "n"
    pub pod: String,
}

/// A single 3-hour forecast sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ForecastItem {
    /// Forecast time, unix seconds
    pub dt: i64,
    pub main: MainWeatherData,
    pub weather: Vec<WeatherCondition>,
    #[serde(default)]
    pub clouds: Clouds,
    pub wind: Wind,
    /// Visibility in meters
    #[serde(default)]
    pub visibility: u32,
    /// Probability of precipitation, 0.0..=1.0
    #[serde(default)]
    pub pop: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain: Option<Precipitation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snow: Option<Precipitation>,
    #[serde(default)]
    pub sys: ForecastSys,
    /// Forecast time as "YYYY-MM-DD HH:MM:SS"
    pub dt_txt: String,
}

impl ForecastItem {
    /// Calendar date portion of `dt_txt`, used as the day bucket key.
    pub fn date_key(&self) -> &str {
        self.dt_txt
            .split_once(' ')
            .map_or(self.dt_txt.as_str(), |(date, _)| date)
    }

    /// The authoritative (first) weather descriptor, if any.
    pub fn condition(&self) -> Option<&WeatherCondition> {
        self.weather.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct City {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub coord: Coordinates,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub population: u64,
    /// Shift in seconds from UTC
    #[serde(default)]
    pub timezone: i32,
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
}

/// Root of the `/forecast` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ForecastResponse {
    #[serde(default)]
    pub cod: String,
    #[serde(default)]
    pub message: f64,
    #[serde(default)]
    pub cnt: u32,
    pub list: Vec<ForecastItem>,
    pub city: City,
}

/// One calendar day's aggregate of forecast samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DailyForecast {
    /// "YYYY-MM-DD"
    pub date: String,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Dominant condition of the day
    pub weather: WeatherCondition,
    /// Mean humidity, percent
    pub humidity: u8,
    /// Mean wind speed in m/s, one decimal
    pub wind_speed: f64,
    /// Peak precipitation probability, percent
    pub pop: u8,
    #[serde(rename = "hourlyForecasts")]
    pub hourly_forecasts: Vec<ForecastItem>,
}

/// Location label shown above the forecast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentLocation {
    pub city: String,
    pub country: String,
}

/// Geographic position resolved for a "use my location" request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: Option<f64>,
    pub city_name: Option<String>,
}
