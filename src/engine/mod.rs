mod catalog_api;
mod dashboard_api;
mod route_planning_api;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    api::API,
    config::Config,
    dashboard::Dashboard,
    entities::SavedRoute,
    error::Error,
    external::{
        gemini::Gemini,
        geolocation::{DynGeolocator, FixedGeolocator},
        nominatim::Nominatim,
    },
    map::MapScene,
    planner::RoutePlanner,
    services::{LocationService, RiskAdvisoryService},
    storage::{RouteStore, SqliteStore},
};

pub struct Engine {
    location: LocationService,
    advisor: RiskAdvisoryService,
    store: RouteStore,
    planner: Mutex<RoutePlanner>,
    dashboard: Mutex<Dashboard>,
}

impl Engine {
    /// Loads the saved routes once and builds both view-models.
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub async fn new(
        location: LocationService,
        advisor: RiskAdvisoryService,
        store: RouteStore,
    ) -> Self {
        let saved_routes = store.load_saved_routes().await;
        tracing::info!("loaded {} saved routes", saved_routes.len());

        Self {
            location,
            advisor,
            store,
            planner: Mutex::new(RoutePlanner::new(MapScene::default(), saved_routes)),
            dashboard: Mutex::new(Dashboard::default()),
        }
    }

    #[tracing::instrument(name = "Engine::from_config", skip_all)]
    pub async fn from_config(config: &Config) -> Result<Self, Error> {
        let geolocator = config
            .device_position
            .map(|position| Arc::new(FixedGeolocator::new(position)) as DynGeolocator);

        if geolocator.is_none() {
            tracing::warn!("no device position configured, geolocation is unsupported");
        }

        if config.gemini.api_key.is_none() {
            tracing::warn!("no advisory API key configured, risk analysis will fall back");
        }

        let location = LocationService::new(
            geolocator,
            Arc::new(Nominatim::new(config.geocoding.clone())),
        );
        let advisor = RiskAdvisoryService::new(Arc::new(Gemini::new(config.gemini.clone())));
        let store = RouteStore::new(Arc::new(SqliteStore::new(&config.database_url, 1).await?));

        Ok(Self::new(location, advisor, store).await)
    }

    /// Rewrites the full list. Write failures keep the in-memory list and are
    /// only logged.
    async fn persist(&self, routes: &[SavedRoute]) {
        if let Err(err) = self.store.store_saved_routes(routes).await {
            tracing::warn!("failed to persist saved routes: {}", err);
        }
    }
}

impl API for Engine {}

#[test]
fn new_engine() {
    use crate::external::nominatim::Nominatim;
    use crate::services::DynGeocoder;
    use tokio_test::block_on;

    let store = block_on(SqliteStore::in_memory()).unwrap();
    let location = LocationService::new(
        None,
        Arc::new(Nominatim::new(Default::default())) as DynGeocoder,
    );
    let advisor = RiskAdvisoryService::new(Arc::new(Gemini::new(crate::config::GeminiConfig {
        api_key: None,
        base_url: "http://127.0.0.1:9".into(),
        model: "gemini-3-flash-preview".into(),
    })));

    let engine = block_on(Engine::new(
        location,
        advisor,
        RouteStore::new(Arc::new(store)),
    ));

    assert!(block_on(engine.planner.lock()).saved_routes().is_empty());
}
