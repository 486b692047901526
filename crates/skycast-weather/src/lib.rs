//! Forecast library for Skycast
//!
//! Fetches the OpenWeatherMap 5-day / 3-hour forecast, groups it into daily
//! summaries and provides the display helpers and view state built on them.

pub mod aggregate;
pub mod error;
pub mod format;
pub mod location;
pub mod provider;
pub mod service;
pub mod state;
pub mod types;

pub use aggregate::{group_by_day, MAX_FORECAST_DAYS};
pub use error::{LocationError, WeatherError, FETCH_FAILED_MESSAGE};
pub use format::{day_name, format_date, format_short_date, format_temp, format_time, get_day_name};
pub use location::{get_current_location, is_secure_context, FixedPosition, PositionSource};
pub use provider::{ForecastQuery, WeatherProvider};
pub use service::request_fetch;
pub use state::{WeatherAction, WeatherState};
pub use types::*;
