//! OpenWeatherMap 5-day / 3-hour forecast client.

use reqwest::{Client, Response};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::error::{WeatherError, FETCH_FAILED_MESSAGE};
use crate::types::ForecastResponse;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";
const UNITS: &str = "metric";

/// What to fetch a forecast for
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastQuery {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
}

impl WeatherProvider {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the forecast for a query.
    pub async fn fetch(&self, query: &ForecastQuery) -> Result<ForecastResponse, WeatherError> {
        match query {
            ForecastQuery::City(city) => self.forecast_by_city(city).await,
            ForecastQuery::Coordinates { lat, lon } => {
                self.forecast_by_coordinates(*lat, *lon).await
            }
        }
    }

    /// Fetch the 5-day forecast for a city name.
    #[instrument(skip(self), level = "info")]
    pub async fn forecast_by_city(&self, city: &str) -> Result<ForecastResponse, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::InvalidQuery(
                "Please enter a city name".to_string(),
            ));
        }

        let response = self
            .client
            .get(self.forecast_url())
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", UNITS)])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Fetch the 5-day forecast for a position.
    #[instrument(skip(self), level = "info")]
    pub async fn forecast_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<ForecastResponse, WeatherError> {
        let (lat, lon) = (lat.to_string(), lon.to_string());
        let response = self
            .client
            .get(self.forecast_url())
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", UNITS),
            ])
            .send()
            .await?;

        self.handle_response(response).await
    }

    fn forecast_url(&self) -> String {
        format!("{}/forecast", self.base_url)
    }

    /// Helper to handle API responses and errors.
    async fn handle_response(&self, response: Response) -> Result<ForecastResponse, WeatherError> {
        let status = response.status();

        if status.is_success() {
            let forecast: ForecastResponse = response
                .json()
                .await
                .map_err(|e| WeatherError::Parse(format!("JSON parse error: {}", e)))?;
            tracing::info!(
                "Fetched {} forecast samples for {}",
                forecast.list.len(),
                forecast.city.name
            );
            Ok(forecast)
        } else {
            let message = error_message(response).await;
            tracing::warn!("Forecast request failed with {}: {}", status, message);
            Err(WeatherError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Extract a displayable message from a failed response.
///
/// The body is read as JSON whatever its content type; its `message` field is
/// used when present and non-empty, otherwise [`FETCH_FAILED_MESSAGE`].
pub async fn error_message(response: Response) -> String {
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!("Failed to read error body: {}", e);
            return FETCH_FAILED_MESSAGE.to_string();
        }
    };

    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(body) => body
            .get("message")
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .map_or_else(|| FETCH_FAILED_MESSAGE.to_string(), str::to_string),
        Err(e) => {
            tracing::debug!("Error body was not valid JSON: {}", e);
            FETCH_FAILED_MESSAGE.to_string()
        }
    }
}

/// Image URL for a condition icon identifier
pub fn icon_url(icon: &str) -> String {
    format!("{}/{}@2x.png", ICON_BASE_URL, icon)
}
