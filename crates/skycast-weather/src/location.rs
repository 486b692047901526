//! One-shot position lookup for "use my location".

use std::future::Future;
use std::net::IpAddr;

use url::{Host, Url};

use crate::error::LocationError;
use crate::types::Location;

/// Something that can report the current position once.
pub trait PositionSource {
    fn current_position(&self) -> impl Future<Output = Result<Location, LocationError>> + Send;
}

/// Position taken from configuration rather than hardware.
#[derive(Debug, Clone)]
pub struct FixedPosition(pub Location);

impl FixedPosition {
    pub fn new(latitude: f64, longitude: f64, city_name: Option<String>) -> Self {
        Self(Location {
            latitude,
            longitude,
            accuracy_meters: None,
            city_name,
        })
    }
}

impl PositionSource for FixedPosition {
    fn current_position(&self) -> impl Future<Output = Result<Location, LocationError>> + Send {
        let location = self.0.clone();
        async move { Ok(location) }
    }
}

/// Resolve the current position.
///
/// Positions are only released in a secure context, and `None` means no
/// position capability exists at all. No timeout is applied here; a source
/// that gives up reports [`LocationError::Timeout`] itself.
pub async fn get_current_location<S: PositionSource>(
    source: Option<&S>,
    secure_context: bool,
) -> Result<Location, LocationError> {
    if !secure_context {
        tracing::warn!("Refusing location request outside a secure context");
        return Err(LocationError::InsecureContext);
    }

    let source = source.ok_or(LocationError::Unsupported)?;
    let location = source.current_position().await?;
    tracing::info!("Got location: {}, {}", location.latitude, location.longitude);
    Ok(location)
}

/// Whether coordinates may be sent to `url`: https, or plain http on loopback.
pub fn is_secure_context(url: &str) -> bool {
    let Ok(url) = Url::parse(url) else {
        return false;
    };

    match url.scheme() {
        "https" => true,
        "http" => match url.host() {
            Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
            Some(Host::Ipv4(ip)) => IpAddr::V4(ip).is_loopback(),
            Some(Host::Ipv6(ip)) => IpAddr::V6(ip).is_loopback(),
            None => false,
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSource(LocationError);

    impl PositionSource for FailingSource {
        fn current_position(
            &self,
        ) -> impl Future<Output = Result<Location, LocationError>> + Send {
            let err = self.0.clone();
            async move { Err(err) }
        }
    }

    #[tokio::test]
    async fn test_fixed_position_resolves() {
        let source = FixedPosition::new(47.6062, -122.3321, Some("Seattle".into()));
        let location = get_current_location(Some(&source), true).await.unwrap();
        assert_eq!(location.latitude, 47.6062);
        assert_eq!(location.city_name.as_deref(), Some("Seattle"));
    }

    #[tokio::test]
    async fn test_insecure_context_is_refused_first() {
        let source = FixedPosition::new(1.0, 2.0, None);
        let result = get_current_location(Some(&source), false).await;
        assert_eq!(result, Err(LocationError::InsecureContext));

        let result = get_current_location::<FixedPosition>(None, false).await;
        assert_eq!(result, Err(LocationError::InsecureContext));
    }

    #[tokio::test]
    async fn test_missing_source_is_unsupported() {
        let result = get_current_location::<FixedPosition>(None, true).await;
        assert_eq!(result, Err(LocationError::Unsupported));
    }

    #[tokio::test]
    async fn test_source_failure_is_passed_through() {
        let source = FailingSource(LocationError::PermissionDenied);
        let result = get_current_location(Some(&source), true).await;
        assert_eq!(result, Err(LocationError::PermissionDenied));
    }

    #[test]
    fn test_secure_context() {
        assert!(is_secure_context("https://api.openweathermap.org/data/2.5"));
        assert!(is_secure_context("http://localhost:8080"));
        assert!(is_secure_context("http://127.0.0.1:9000/data"));
        assert!(is_secure_context("http://[::1]:9000"));
        assert!(!is_secure_context("http://api.openweathermap.org/data/2.5"));
        assert!(!is_secure_context("ftp://localhost"));
        assert!(!is_secure_context("not a url"));
    }
}
