use super::Engine;

use async_trait::async_trait;

use crate::{
    api::DashboardAPI,
    dashboard::{DashboardView, LocationOutcome},
    error::Error,
};

#[async_trait]
impl DashboardAPI for Engine {
    async fn dashboard(&self) -> Result<DashboardView, Error> {
        Ok(self.dashboard.lock().await.view())
    }

    #[tracing::instrument(skip(self))]
    async fn refresh_dashboard(&self, force_location: bool) -> Result<DashboardView, Error> {
        let token = self.dashboard.lock().await.begin_refresh(force_location);

        let outcome = match self.location.current_position().await {
            Ok(position) => {
                let place = self
                    .location
                    .reverse_geocode(position.lat, position.lng)
                    .await;
                LocationOutcome::Located { position, place }
            }
            Err(reason) => LocationOutcome::Failed(reason),
        };

        let advisory = self.advisor.get_risk_analysis(&outcome.context()).await;

        let mut dashboard = self.dashboard.lock().await;
        dashboard.finish_refresh(token, outcome, advisory);

        Ok(dashboard.view())
    }

    async fn dismiss_dashboard_banner(&self) -> Result<DashboardView, Error> {
        let mut dashboard = self.dashboard.lock().await;
        dashboard.dismiss_location_error();

        Ok(dashboard.view())
    }
}
