use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    entities::{Coordinates, GeocodedResult, LocationFailure, LocationFix},
    error::Error,
    external::{
        geolocation::{DynGeolocator, PositionOptions},
        nominatim::{Nominatim, SEARCH_LIMIT},
    },
};

pub const MIN_QUERY_CHARS: usize = 3;
pub const UNKNOWN_PLACE: &str = "Localização Desconhecida";

/// Raw geocoding backend. Errors are absorbed by `LocationService`.
#[async_trait]
pub trait Geocoder {
    async fn reverse(&self, lat: f64, lon: f64) -> Result<Option<String>, Error>;
    async fn search(&self, query: &str) -> Result<Vec<GeocodedResult>, Error>;
}

pub type DynGeocoder = Arc<dyn Geocoder + Send + Sync>;

#[async_trait]
impl Geocoder for Nominatim {
    async fn reverse(&self, lat: f64, lon: f64) -> Result<Option<String>, Error> {
        Nominatim::reverse(self, lat, lon).await
    }

    async fn search(&self, query: &str) -> Result<Vec<GeocodedResult>, Error> {
        Nominatim::search(self, query).await
    }
}

/// Device position and geocoding, normalised and failure-free for callers.
#[derive(Clone)]
pub struct LocationService {
    geolocator: Option<DynGeolocator>,
    geocoder: DynGeocoder,
    options: PositionOptions,
}

impl LocationService {
    /// `geolocator` is `None` when the runtime has no positioning capability.
    pub fn new(geolocator: Option<DynGeolocator>, geocoder: DynGeocoder) -> Self {
        Self {
            geolocator,
            geocoder,
            options: PositionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PositionOptions) -> Self {
        self.options = options;
        self
    }

    #[tracing::instrument(skip(self))]
    pub async fn current_position(&self) -> LocationFix {
        let geolocator = match &self.geolocator {
            Some(geolocator) => geolocator,
            None => return Err(LocationFailure::Unsupported),
        };

        let fix = tokio::time::timeout(
            self.options.timeout,
            geolocator.current_position(&self.options),
        )
        .await
        .unwrap_or(Err(LocationFailure::Timeout));

        if let Err(reason) = &fix {
            tracing::warn!("position fix failed: {:?}", reason);
        }

        fix
    }

    #[tracing::instrument(skip(self))]
    pub async fn reverse_geocode(&self, lat: f64, lon: f64) -> String {
        match self.geocoder.reverse(lat, lon).await {
            Ok(Some(name)) => name,
            Ok(None) => UNKNOWN_PLACE.into(),
            Err(err) => {
                tracing::warn!("reverse geocoding failed: {}", err);
                Coordinates::new(lat, lon).rounded_label()
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn search_address(&self, query: &str) -> Vec<GeocodedResult> {
        if query.chars().count() < MIN_QUERY_CHARS {
            return vec![];
        }

        match self.geocoder.search(query).await {
            Ok(mut results) => {
                results.truncate(SEARCH_LIMIT);
                results
            }
            Err(err) => {
                tracing::warn!("geocoding search failed: {}", err);
                vec![]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::error::upstream_error;
    use crate::external::geolocation::{FixedGeolocator, Geolocator};

    struct Stalled;

    #[async_trait]
    impl Geolocator for Stalled {
        async fn current_position(&self, _options: &PositionOptions) -> LocationFix {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err(LocationFailure::Unknown)
        }
    }

    struct Denied;

    #[async_trait]
    impl Geolocator for Denied {
        async fn current_position(&self, _options: &PositionOptions) -> LocationFix {
            Err(LocationFailure::PermissionDenied)
        }
    }

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Geocoder for Counting {
        async fn reverse(&self, _lat: f64, _lon: f64) -> Result<Option<String>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(upstream_error());
            }
            Ok(None)
        }

        async fn search(&self, query: &str) -> Result<Vec<GeocodedResult>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(upstream_error());
            }
            Ok((0..8)
                .map(|i| GeocodedResult {
                    display_name: format!("{} {}", query, i),
                    lat: -23.5 - i as f64 / 100.0,
                    lon: -46.6,
                })
                .collect())
        }
    }

    fn service(geolocator: Option<DynGeolocator>, geocoder: Arc<Counting>) -> LocationService {
        LocationService::new(geolocator, geocoder)
    }

    #[tokio::test]
    async fn missing_geolocation_is_unsupported() {
        let service = service(None, Arc::new(Counting::default()));
        assert_eq!(
            service.current_position().await,
            Err(LocationFailure::Unsupported)
        );
    }

    #[tokio::test]
    async fn stalled_fix_times_out() {
        let service = service(Some(Arc::new(Stalled)), Arc::new(Counting::default()))
            .with_options(PositionOptions {
                timeout: Duration::from_millis(50),
                ..PositionOptions::default()
            });
        assert_eq!(
            service.current_position().await,
            Err(LocationFailure::Timeout)
        );
    }

    #[tokio::test]
    async fn failures_keep_their_reason() {
        let denied = service(Some(Arc::new(Denied)), Arc::new(Counting::default()));
        assert_eq!(
            denied.current_position().await,
            Err(LocationFailure::PermissionDenied)
        );

        let fixed = FixedGeolocator::new(Coordinates::new(-23.55, -46.63));
        let located = service(Some(Arc::new(fixed)), Arc::new(Counting::default()));
        assert_eq!(
            located.current_position().await,
            Ok(Coordinates::new(-23.55, -46.63))
        );
    }

    #[tokio::test]
    async fn short_queries_skip_the_network() {
        let geocoder = Arc::new(Counting::default());
        let service = service(None, geocoder.clone());

        assert!(service.search_address("ab").await.is_empty());
        assert!(service.search_address("").await.is_empty());
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);

        let results = service.search_address("Paulista").await;
        assert_eq!(results.len(), 5);
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn geocoding_failures_fall_back() {
        let geocoder = Arc::new(Counting {
            fail: true,
            ..Default::default()
        });
        let service = service(None, geocoder);

        assert!(service.search_address("Paulista").await.is_empty());
        assert_eq!(
            service.reverse_geocode(-23.561414, -46.655881).await,
            "-23.5614, -46.6559"
        );
    }

    #[tokio::test]
    async fn nameless_reverse_result_is_unknown_place() {
        let service = service(None, Arc::new(Counting::default()));
        assert_eq!(service.reverse_geocode(1.0, 2.0).await, UNKNOWN_PLACE);
    }
}
