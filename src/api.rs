use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    catalog::{AlertsView, MobilityTab, MobilityView, ProfileView, ShellView},
    dashboard::DashboardView,
    entities::{GeocodedResult, View},
    error::Error,
    planner::RoutesView,
};

#[async_trait]
pub trait DashboardAPI {
    async fn dashboard(&self) -> Result<DashboardView, Error>;

    async fn refresh_dashboard(&self, force_location: bool) -> Result<DashboardView, Error>;

    async fn dismiss_dashboard_banner(&self) -> Result<DashboardView, Error>;
}

#[async_trait]
pub trait RoutePlanningAPI {
    async fn routes(&self) -> Result<RoutesView, Error>;

    async fn locate(&self) -> Result<RoutesView, Error>;

    async fn dismiss_routes_banner(&self) -> Result<RoutesView, Error>;

    async fn search(&self, query: String) -> Result<RoutesView, Error>;

    async fn add_waypoint(&self, result: GeocodedResult) -> Result<RoutesView, Error>;

    async fn remove_waypoint(&self, index: usize) -> Result<RoutesView, Error>;

    async fn reset_route(&self) -> Result<RoutesView, Error>;

    async fn set_save_dialog(&self, open: bool) -> Result<RoutesView, Error>;

    async fn save_current_route(&self, name: String) -> Result<RoutesView, Error>;

    async fn delete_saved_route(&self, id: String) -> Result<RoutesView, Error>;

    async fn load_saved_route(&self, id: String) -> Result<RoutesView, Error>;

    async fn start_navigation(&self) -> Result<Option<String>, Error>;
}

#[async_trait]
pub trait CatalogAPI {
    async fn shell(&self, active: View) -> Result<ShellView, Error>;

    async fn alerts(&self) -> Result<AlertsView, Error>;

    async fn mobility(&self, tab: MobilityTab) -> Result<MobilityView, Error>;

    async fn profile(&self) -> Result<ProfileView, Error>;
}

pub trait API: DashboardAPI + RoutePlanningAPI + CatalogAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
