//! Weather-specific error types.

use thiserror::Error;

/// Message used whenever the provider gives no usable error text.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch weather data";

/// Location service errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location requires a secure connection")]
    InsecureContext,
    #[error("Location is not supported")]
    Unsupported,
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}

impl LocationError {
    /// User-friendly error message for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::InsecureContext => {
                "Location is only available over a secure (HTTPS) connection.".to_string()
            }
            Self::Unsupported => "Location is not supported on this system.".to_string(),
            Self::PermissionDenied => {
                "Error getting location: permission denied.".to_string()
            }
            Self::ServiceUnavailable => {
                "Error getting location: position unavailable.".to_string()
            }
            Self::Timeout => "Error getting location: request timed out.".to_string(),
            Self::Other(msg) => format!("Error getting location: {}", msg),
        }
    }
}

/// Weather provider errors
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Weather API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Location error: {0}")]
    Location(#[from] LocationError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl WeatherError {
    /// User-friendly error message for display.
    ///
    /// API errors surface the provider's own message (e.g. "city not found").
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => format!("{}. Check your connection.", FETCH_FAILED_MESSAGE),
            Self::Api { message, .. } => message.clone(),
            Self::Location(e) => e.user_message(),
            Self::Parse(_) => FETCH_FAILED_MESSAGE.to_string(),
            Self::InvalidQuery(msg) => msg.clone(),
        }
    }
}
