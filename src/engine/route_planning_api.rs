use super::Engine;

use async_trait::async_trait;
use chrono::Local;

use crate::{
    api::RoutePlanningAPI,
    entities::GeocodedResult,
    error::{not_found_error, Error},
    planner::RoutesView,
};

#[async_trait]
impl RoutePlanningAPI for Engine {
    async fn routes(&self) -> Result<RoutesView, Error> {
        Ok(self.planner.lock().await.view())
    }

    #[tracing::instrument(skip(self))]
    async fn locate(&self) -> Result<RoutesView, Error> {
        let token = self.planner.lock().await.begin_locate();
        let fix = self.location.current_position().await;

        let mut planner = self.planner.lock().await;
        planner.finish_locate(token, fix);

        Ok(planner.view())
    }

    async fn dismiss_routes_banner(&self) -> Result<RoutesView, Error> {
        let mut planner = self.planner.lock().await;
        planner.dismiss_location_error();

        Ok(planner.view())
    }

    #[tracing::instrument(skip(self))]
    async fn search(&self, query: String) -> Result<RoutesView, Error> {
        let token = self.planner.lock().await.begin_search(query.clone());

        if let Some(token) = token {
            let results = self.location.search_address(&query).await;
            self.planner.lock().await.finish_search(token, results);
        }

        Ok(self.planner.lock().await.view())
    }

    #[tracing::instrument(skip(self))]
    async fn add_waypoint(&self, result: GeocodedResult) -> Result<RoutesView, Error> {
        let mut planner = self.planner.lock().await;
        planner.add_waypoint(result);

        Ok(planner.view())
    }

    #[tracing::instrument(skip(self))]
    async fn remove_waypoint(&self, index: usize) -> Result<RoutesView, Error> {
        let mut planner = self.planner.lock().await;

        if !planner.remove_waypoint(index) {
            tracing::debug!("no waypoint at index {}", index);
        }

        Ok(planner.view())
    }

    #[tracing::instrument(skip(self))]
    async fn reset_route(&self) -> Result<RoutesView, Error> {
        let token = self.planner.lock().await.reset_route();
        let fix = self.location.current_position().await;

        let mut planner = self.planner.lock().await;
        planner.finish_locate(token, fix);

        Ok(planner.view())
    }

    async fn set_save_dialog(&self, open: bool) -> Result<RoutesView, Error> {
        let mut planner = self.planner.lock().await;

        if open {
            planner.open_save_dialog();
        } else {
            planner.close_save_dialog();
        }

        Ok(planner.view())
    }

    #[tracing::instrument(skip(self))]
    async fn save_current_route(&self, name: String) -> Result<RoutesView, Error> {
        let mut planner = self.planner.lock().await;
        planner.set_pending_route_name(name.clone());

        match planner.save_current_route(&name, Local::now()) {
            Some(route) => {
                tracing::info!("saved route {} ({} stops)", route.id, route.stop_count());
                self.persist(planner.saved_routes()).await;
            }
            None => tracing::debug!("nothing to save"),
        }

        Ok(planner.view())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_saved_route(&self, id: String) -> Result<RoutesView, Error> {
        let mut planner = self.planner.lock().await;

        if planner.delete_saved_route(&id) {
            self.persist(planner.saved_routes()).await;
        }

        Ok(planner.view())
    }

    #[tracing::instrument(skip(self))]
    async fn load_saved_route(&self, id: String) -> Result<RoutesView, Error> {
        let mut planner = self.planner.lock().await;

        let route = planner
            .find_saved_route(&id)
            .cloned()
            .ok_or_else(not_found_error)?;
        planner.load_saved_route(&route);

        Ok(planner.view())
    }

    async fn start_navigation(&self) -> Result<Option<String>, Error> {
        Ok(self.planner.lock().await.start_navigation())
    }
}
