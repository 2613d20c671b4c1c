use super::Engine;

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    api::CatalogAPI,
    catalog::{self, AlertsView, MobilityTab, MobilityView, ProfileView, ShellView},
    entities::View,
    error::Error,
};

#[async_trait]
impl CatalogAPI for Engine {
    async fn shell(&self, active: View) -> Result<ShellView, Error> {
        Ok(catalog::shell(active))
    }

    async fn alerts(&self) -> Result<AlertsView, Error> {
        Ok(catalog::alerts_view(Utc::now()))
    }

    async fn mobility(&self, tab: MobilityTab) -> Result<MobilityView, Error> {
        Ok(catalog::mobility(tab))
    }

    async fn profile(&self) -> Result<ProfileView, Error> {
        Ok(catalog::profile())
    }
}
