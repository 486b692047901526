use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use skycast_weather::provider::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use skycast_weather::{is_secure_context, FixedPosition};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Prefix of environment overrides, e.g. `SKYCAST_WEATHER__API_KEY`
pub const ENV_PREFIX: &str = "SKYCAST";

/// Placeholder key used when none is configured
pub const DEMO_API_KEY: &str = "demo";

/// Environment variable read when no key is configured
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding config.toml
    #[serde(skip)]
    pub config_dir: PathBuf,

    /// Forecast provider settings
    pub weather: WeatherConfig,

    /// Fixed position used for "use my location"
    pub location: LocationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key, see [`WeatherConfig::api_key`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Provider base URL
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl WeatherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Key sent to the provider.
    ///
    /// The configured key wins, then `$OPENWEATHER_API_KEY`, then [`DEMO_API_KEY`].
    /// The fallbacks are resolved on every call and never written to disk.
    pub fn api_key(&self) -> String {
        resolve_api_key(self.api_key.as_deref(), std::env::var(API_KEY_ENV).ok())
    }
}

fn resolve_api_key(configured: Option<&str>, from_env: Option<String>) -> String {
    match configured {
        Some(key) => key.to_string(),
        None => from_env
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| DEMO_API_KEY.to_string()),
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Display name for the position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl LocationConfig {
    /// Position source for the configured coordinates, if both are set
    pub fn position_source(&self) -> Option<FixedPosition> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(FixedPosition::new(lat, lon, self.name.clone())),
            _ => None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skycast");

        Self {
            config_dir,
            weather: WeatherConfig::default(),
            location: LocationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::default().save_to(&config_path)?;
            tracing::info!("Wrote default config to {}", config_path.display());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from `path` with environment overrides applied.
    ///
    /// A missing file is treated as empty.
    pub fn load_from(path: &Path) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to read config file")?;

        let mut config: Config = settings
            .try_deserialize()
            .context("Failed to parse config file")?;

        if let Some(parent) = path.parent() {
            config.config_dir = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(crate::ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.base_url, "weather.base_url", &mut result);

        let api_key = self.weather.api_key();
        if api_key.trim().is_empty() {
            result.add_error("weather.api_key", "API key must not be empty");
        } else if api_key == DEMO_API_KEY {
            result.add_warning(
                "weather.api_key",
                "Using the demo API key - set OPENWEATHER_API_KEY or weather.api_key",
            );
        }

        if self.weather.timeout_secs == 0 {
            result.add_error("weather.timeout_secs", "Timeout must be greater than 0");
        } else if self.weather.timeout_secs > 120 {
            result.add_warning("weather.timeout_secs", "Timeout is unusually long (>120s)");
        }

        match (self.location.latitude, self.location.longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    result.add_error("location.latitude", "Latitude must be between -90 and 90");
                }
                if !(-180.0..=180.0).contains(&lon) {
                    result.add_error(
                        "location.longitude",
                        "Longitude must be between -180 and 180",
                    );
                }
            }
            (Some(_), None) => {
                result.add_error("location.longitude", "Longitude is required with latitude");
            }
            (None, Some(_)) => {
                result.add_error("location.latitude", "Latitude is required with longitude");
            }
            (None, None) => {}
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                // Check scheme
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                    return;
                }

                // Check host
                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                    return;
                }

                if !is_secure_context(url_str) {
                    result.add_warning(
                        field_name,
                        "Plain http endpoint - location lookups will be refused",
                    );
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skycast");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.weather.api_key = Some("abc123".to_string());
        config
    }

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        // Default config should be valid (only warnings, no errors)
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_invalid_url() {
        let mut config = valid_config();
        config.weather.base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = valid_config();
        config.weather.base_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_plain_http_endpoint_is_warning() {
        let mut config = valid_config();
        config.weather.base_url = "http://weather.example.com/data/2.5".to_string();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "weather.base_url"));

        config.weather.base_url = "http://localhost:8080".to_string();
        assert!(config.validate().warnings.iter().all(|w| w.field != "weather.base_url"));
    }

    #[test]
    fn test_empty_api_key_is_error() {
        let mut config = valid_config();
        config.weather.api_key = Some("  ".to_string());
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "weather.api_key"));
    }

    #[test]
    fn test_demo_api_key_is_warning() {
        let mut config = valid_config();
        config.weather.api_key = Some(DEMO_API_KEY.to_string());
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "weather.api_key"));
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = valid_config();
        config.weather.timeout_secs = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.timeout_secs"));
    }

    #[test]
    fn test_coordinates_out_of_range() {
        let mut config = valid_config();
        config.location.latitude = Some(91.0);
        config.location.longitude = Some(-181.0);
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "location.latitude"));
        assert!(result.errors.iter().any(|e| e.field == "location.longitude"));
    }

    #[test]
    fn test_half_set_coordinates() {
        let mut config = valid_config();
        config.location.latitude = Some(10.0);
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(config.location.position_source().is_none());
    }

    #[test]
    fn test_position_source_from_coordinates() {
        let mut config = valid_config();
        config.location.latitude = Some(59.9);
        config.location.longitude = Some(10.7);
        config.location.name = Some("Oslo".into());

        let source = config.location.position_source().unwrap();
        assert_eq!(source.0.latitude, 59.9);
        assert_eq!(source.0.city_name.as_deref(), Some("Oslo"));
    }

    #[test]
    fn test_api_key_resolution_order() {
        assert_eq!(
            resolve_api_key(Some("configured"), Some("from_env".into())),
            "configured"
        );
        assert_eq!(resolve_api_key(None, Some("from_env".into())), "from_env");
        assert_eq!(resolve_api_key(None, Some("  ".into())), DEMO_API_KEY);
        assert_eq!(resolve_api_key(None, None), DEMO_API_KEY);
    }

    #[test]
    fn test_default_config_does_not_persist_api_key() {
        let contents = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(!contents.contains("api_key"));
        assert!(contents.contains("timeout_secs = 10"));
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
