//! Fetch dispatch: network work runs on a tokio task and the outcome comes
//! back as a [`WeatherAction`] over mpsc.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::provider::{ForecastQuery, WeatherProvider};
use crate::state::WeatherAction;

/// Spawn one forecast fetch.
///
/// Sends exactly one `FetchSucceeded` or `FetchFailed` on `tx`. Overlapping
/// requests are neither merged nor cancelled.
pub fn request_fetch(
    tx: &UnboundedSender<WeatherAction>,
    provider: Arc<WeatherProvider>,
    query: ForecastQuery,
) -> JoinHandle<()> {
    let tx = tx.clone();

    tokio::spawn(async move {
        let action = match provider.fetch(&query).await {
            Ok(forecast) => WeatherAction::FetchSucceeded(forecast),
            Err(e) => {
                tracing::warn!("Forecast fetch for {:?} failed: {}", query, e);
                WeatherAction::FetchFailed(e.user_message())
            }
        };

        if tx.send(action).is_err() {
            tracing::debug!("Forecast result dropped; receiver closed");
        }
    })
}
