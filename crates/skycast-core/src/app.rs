use std::sync::Arc;

use skycast_weather::{
    get_current_location, is_secure_context, request_fetch, ForecastQuery, Location,
    PositionSource, WeatherAction, WeatherError, WeatherProvider, WeatherState,
    FETCH_FAILED_MESSAGE,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::{AppError, Config};

/// Owns the forecast state and applies every action to it.
///
/// Fetches run on tokio tasks and report back through a channel; `settle`
/// drains them so state is only ever mutated here.
pub struct App {
    config: Arc<Config>,
    provider: Arc<WeatherProvider>,
    state: WeatherState,
    tx: UnboundedSender<WeatherAction>,
    rx: UnboundedReceiver<WeatherAction>,
    pending: Vec<JoinHandle<()>>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Result<Self, AppError> {
        let provider = WeatherProvider::new(
            &config.weather.api_key(),
            &config.weather.base_url,
            config.weather.timeout(),
        )?;
        let (tx, rx) = mpsc::unbounded_channel();

        Ok(Self {
            config: Arc::new(config),
            provider: Arc::new(provider),
            state: WeatherState::default(),
            tx,
            rx,
            pending: Vec::new(),
        })
    }

    /// Apply an action to the state
    pub fn dispatch(&mut self, action: WeatherAction) {
        tracing::debug!("Dispatching {}", action_name(&action));
        self.state.apply(action);
    }

    /// Start a forecast search by city name
    pub fn search_city(&mut self, city: &str) -> Result<(), AppError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::InvalidQuery("Please enter a city name".to_string()).into());
        }

        self.start_fetch(ForecastQuery::City(city.to_string()));
        Ok(())
    }

    /// Start a forecast search by coordinates
    pub fn search_coordinates(&mut self, lat: f64, lon: f64) {
        self.start_fetch(ForecastQuery::Coordinates { lat, lon });
    }

    /// Resolve the current position and search for it.
    ///
    /// Location failures are returned and leave the forecast state untouched.
    pub async fn use_my_location<S: PositionSource>(
        &mut self,
        source: Option<&S>,
    ) -> Result<Location, AppError> {
        let secure = is_secure_context(self.provider.base_url());
        let location = get_current_location(source, secure).await?;

        self.search_coordinates(location.latitude, location.longitude);
        Ok(location)
    }

    /// Wait for every in-flight fetch and apply the results in arrival order.
    ///
    /// A fetch task that panicked or was aborted counts as a failed fetch.
    pub async fn settle(&mut self) {
        for handle in std::mem::take(&mut self.pending) {
            if let Err(e) = handle.await {
                tracing::error!("Forecast task ended without a result: {}", e);
                self.dispatch(WeatherAction::FetchFailed(
                    FETCH_FAILED_MESSAGE.to_string(),
                ));
            }
        }

        while let Ok(action) = self.rx.try_recv() {
            self.dispatch(action);
        }
    }

    /// Open the hourly view for a date key, or close it with `None`
    pub fn select_day(&mut self, date: Option<&str>) {
        self.dispatch(WeatherAction::SelectDay(date.map(str::to_string)));
    }

    pub fn clear_error(&mut self) {
        self.dispatch(WeatherAction::ClearError);
    }

    /// Current forecast state
    pub fn state(&self) -> &WeatherState {
        &self.state
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn start_fetch(&mut self, query: ForecastQuery) {
        tracing::info!("Requesting forecast for {:?}", query);
        self.dispatch(WeatherAction::FetchStarted);
        let handle = request_fetch(&self.tx, self.provider.clone(), query);
        self.pending.push(handle);
    }
}

fn action_name(action: &WeatherAction) -> &'static str {
    match action {
        WeatherAction::FetchStarted => "FetchStarted",
        WeatherAction::FetchSucceeded(_) => "FetchSucceeded",
        WeatherAction::FetchFailed(_) => "FetchFailed",
        WeatherAction::SelectDay(_) => "SelectDay",
        WeatherAction::ClearError => "ClearError",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycast_weather::{FixedPosition, LocationError};

    fn app_with_base_url(base_url: &str) -> App {
        let mut config = Config::default();
        config.weather.api_key = Some("test_key".into());
        config.weather.base_url = base_url.into();
        App::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_blank_search_is_rejected() {
        let mut app = app_with_base_url("http://127.0.0.1:9");
        let result = app.search_city("   ");

        assert!(matches!(
            result,
            Err(AppError::Weather(WeatherError::InvalidQuery(_)))
        ));
        assert!(!app.state().loading);
    }

    #[tokio::test]
    async fn test_insecure_endpoint_refuses_location() {
        let mut app = app_with_base_url("http://weather.example.com");
        let source = FixedPosition::new(1.0, 2.0, None);

        let result = app.use_my_location(Some(&source)).await;

        assert!(matches!(
            result,
            Err(AppError::Weather(WeatherError::Location(LocationError::InsecureContext)))
        ));
        assert!(!app.state().loading);
        assert!(app.state().error.is_none());
    }

    #[tokio::test]
    async fn test_missing_position_source_is_unsupported() {
        let mut app = app_with_base_url("https://api.openweathermap.org/data/2.5");

        let result = app.use_my_location::<FixedPosition>(None).await;

        assert!(matches!(
            result,
            Err(AppError::Weather(WeatherError::Location(LocationError::Unsupported)))
        ));
    }

    #[tokio::test]
    async fn test_settle_without_fetches_returns() {
        let mut app = app_with_base_url("http://127.0.0.1:9");
        app.settle().await;
        assert_eq!(app.state(), &WeatherState::default());
    }

    #[tokio::test]
    async fn test_settle_survives_a_panicked_fetch() {
        let mut app = app_with_base_url("http://127.0.0.1:9");
        app.dispatch(WeatherAction::FetchStarted);
        app.pending.push(tokio::spawn(async {
            panic!("fetch task crashed");
        }));

        tokio::time::timeout(std::time::Duration::from_secs(5), app.settle())
            .await
            .unwrap();

        assert!(!app.state().loading);
        assert_eq!(app.state().error.as_deref(), Some(FETCH_FAILED_MESSAGE));
        assert!(app.pending.is_empty());
    }

    #[tokio::test]
    async fn test_settle_survives_an_aborted_fetch() {
        let mut app = app_with_base_url("http://127.0.0.1:9");
        app.dispatch(WeatherAction::FetchStarted);
        let handle = tokio::spawn(std::future::pending::<()>());
        handle.abort();
        app.pending.push(handle);

        tokio::time::timeout(std::time::Duration::from_secs(5), app.settle())
            .await
            .unwrap();

        assert!(!app.state().loading);
        assert!(app.state().error.is_some());
    }

    #[test]
    fn test_clear_error() {
        let mut app = app_with_base_url("http://127.0.0.1:9");
        app.dispatch(WeatherAction::FetchFailed("boom".into()));
        assert!(app.state().error.is_some());

        app.clear_error();
        assert!(app.state().error.is_none());
    }
}
