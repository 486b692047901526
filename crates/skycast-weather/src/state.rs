//! Forecast view state and its transitions.

use crate::aggregate::group_by_day;
use crate::error::FETCH_FAILED_MESSAGE;
use crate::types::{CurrentLocation, DailyForecast, ForecastResponse};

/// Everything the forecast views render from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherState {
    pub forecast: Option<ForecastResponse>,
    pub daily_forecasts: Vec<DailyForecast>,
    pub selected_day: Option<DailyForecast>,
    pub loading: bool,
    pub error: Option<String>,
    pub current_location: Option<CurrentLocation>,
}

/// State transitions
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherAction {
    /// A fetch was issued
    FetchStarted,
    /// A fetch returned a forecast
    FetchSucceeded(ForecastResponse),
    /// A fetch failed with a displayable message
    FetchFailed(String),
    /// Open the hourly view of the day with this date key, or close it
    SelectDay(Option<String>),
    ClearError,
}

impl WeatherState {
    /// Apply one action in place.
    pub fn apply(&mut self, action: WeatherAction) {
        match action {
            WeatherAction::FetchStarted => {
                self.loading = true;
                self.error = None;
            }
            WeatherAction::FetchSucceeded(forecast) => {
                self.loading = false;
                self.daily_forecasts = group_by_day(&forecast);
                self.current_location = Some(CurrentLocation {
                    city: forecast.city.name.clone(),
                    country: forecast.city.country.clone(),
                });
                self.forecast = Some(forecast);
                self.selected_day = None;
            }
            WeatherAction::FetchFailed(message) => {
                self.loading = false;
                self.error = Some(if message.is_empty() {
                    FETCH_FAILED_MESSAGE.to_string()
                } else {
                    message
                });
            }
            WeatherAction::SelectDay(Some(date)) => {
                self.selected_day = self
                    .daily_forecasts
                    .iter()
                    .find(|day| day.date == date)
                    .cloned();
                if self.selected_day.is_none() {
                    tracing::warn!("No forecast for selected day {}", date);
                }
            }
            WeatherAction::SelectDay(None) => {
                self.selected_day = None;
            }
            WeatherAction::ClearError => {
                self.error = None;
            }
        }
    }

    /// Consume the state and return it with `action` applied.
    #[must_use]
    pub fn reduce(mut self, action: WeatherAction) -> Self {
        self.apply(action);
        self
    }
}
