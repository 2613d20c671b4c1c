use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::{
    entities::{
        Coordinates, GeocodedResult, Location, LocationBanner, LocationFailure, LocationFix,
        SavedRoute,
    },
    map::{MapOwner, MapScene, MapSurface},
    services::MIN_QUERY_CHARS,
    tokens::{RequestToken, TokenSlot},
};

/// Origin name stored when a route is saved with a location fix.
pub const STARTING_POINT: &str = "Starting Point";
/// Origin name stored when a route is saved without one; its coordinates are
/// a `(0, 0)` placeholder.
pub const UNKNOWN_START: &str = "Unknown Start";

/// The route currently being built or viewed on the map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveRouteState {
    pub origin: Option<Coordinates>,
    pub waypoints: Vec<GeocodedResult>,
}

/// Render state of the Routes screen.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoutesView {
    pub route: ActiveRouteState,
    pub map: MapScene,
    pub search_query: String,
    pub search_results: Vec<GeocodedResult>,
    pub searching: bool,
    pub locating: bool,
    pub location_banner: Option<LocationBanner>,
    pub saved_routes: Vec<SavedRoute>,
    pub save_dialog_open: bool,
    pub pending_route_name: String,
}

pub struct RoutePlanner<S: MapSurface = MapScene> {
    route: ActiveRouteState,
    search_query: String,
    search_results: Vec<GeocodedResult>,
    searching: bool,
    locating: bool,
    location_error: Option<LocationFailure>,
    saved_routes: Vec<SavedRoute>,
    save_dialog_open: bool,
    pending_route_name: String,
    last_route_id: i64,
    location_slot: TokenSlot,
    search_slot: TokenSlot,
    map: MapOwner<S>,
}

impl<S: MapSurface> RoutePlanner<S> {
    pub fn new(surface: S, saved_routes: Vec<SavedRoute>) -> Self {
        let last_route_id = saved_routes
            .iter()
            .filter_map(|route| route.id.parse::<i64>().ok())
            .max()
            .unwrap_or_default();

        let mut planner = Self {
            route: ActiveRouteState::default(),
            search_query: String::new(),
            search_results: vec![],
            searching: false,
            locating: false,
            location_error: None,
            saved_routes,
            save_dialog_open: false,
            pending_route_name: String::new(),
            last_route_id,
            location_slot: TokenSlot::default(),
            search_slot: TokenSlot::default(),
            map: MapOwner::new(surface),
        };
        planner.sync_map();
        planner
    }

    pub fn route(&self) -> &ActiveRouteState {
        &self.route
    }

    pub fn waypoints(&self) -> &[GeocodedResult] {
        &self.route.waypoints
    }

    pub fn saved_routes(&self) -> &[SavedRoute] {
        &self.saved_routes
    }

    pub fn search_results(&self) -> &[GeocodedResult] {
        &self.search_results
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn location_error(&self) -> Option<LocationFailure> {
        self.location_error
    }

    pub fn is_save_dialog_open(&self) -> bool {
        self.save_dialog_open
    }

    pub fn map(&self) -> &S {
        self.map.surface()
    }

    pub fn find_saved_route(&self, id: &str) -> Option<&SavedRoute> {
        self.saved_routes.iter().find(|route| route.id == id)
    }

    fn sync_map(&mut self) {
        self.map.sync(self.route.origin, &self.route.waypoints);
    }

    /// Starts a position request. Pair with `finish_locate`.
    pub fn begin_locate(&mut self) -> RequestToken {
        self.locating = true;
        self.location_slot.issue()
    }

    /// Applies a position fix if no newer location request or restore
    /// happened meanwhile. Returns whether the fix was applied.
    pub fn finish_locate(&mut self, token: RequestToken, fix: LocationFix) -> bool {
        if !self.location_slot.is_latest(token) {
            tracing::debug!("dropping superseded location fix");
            return false;
        }

        self.locating = false;

        match fix {
            Ok(origin) => {
                self.route.origin = Some(origin);
                self.location_error = None;
                self.map.recenter(origin);
                self.sync_map();
            }
            Err(reason) => {
                self.location_error = Some(reason);
            }
        }

        true
    }

    pub fn dismiss_location_error(&mut self) {
        self.location_error = None;
    }

    /// Starts a search for `query`. Queries too short to geocode issue no
    /// request and return `None`.
    pub fn begin_search(&mut self, query: impl Into<String>) -> Option<RequestToken> {
        self.search_query = query.into();

        if self.search_query.chars().count() < MIN_QUERY_CHARS {
            return None;
        }

        self.searching = true;
        Some(self.search_slot.issue())
    }

    pub fn finish_search(&mut self, token: RequestToken, results: Vec<GeocodedResult>) -> bool {
        if !self.search_slot.is_latest(token) {
            tracing::debug!("dropping superseded search results");
            return false;
        }

        self.searching = false;
        self.search_results = results;
        true
    }

    /// Appends a stop. The search is single-use, so the query, the results
    /// and any search still in flight are discarded.
    pub fn add_waypoint(&mut self, result: GeocodedResult) {
        self.route.waypoints.push(result);
        self.search_query.clear();
        self.search_results.clear();
        self.searching = false;
        self.search_slot.issue();
        self.sync_map();
    }

    /// Removes the stop at `index`. Out of range indexes are ignored.
    pub fn remove_waypoint(&mut self, index: usize) -> bool {
        if index >= self.route.waypoints.len() {
            return false;
        }

        self.route.waypoints.remove(index);
        self.sync_map();
        true
    }

    /// Clears the stops and starts a fresh position request. Saved routes are
    /// left alone.
    pub fn reset_route(&mut self) -> RequestToken {
        self.route.waypoints.clear();
        self.search_query.clear();
        self.sync_map();
        self.begin_locate()
    }

    pub fn open_save_dialog(&mut self) {
        self.save_dialog_open = true;
    }

    pub fn close_save_dialog(&mut self) {
        self.save_dialog_open = false;
    }

    pub fn set_pending_route_name(&mut self, name: impl Into<String>) {
        self.pending_route_name = name.into();
    }

    fn next_route_id(&mut self, now_millis: i64) -> String {
        self.last_route_id = now_millis.max(self.last_route_id.saturating_add(1));
        self.last_route_id.to_string()
    }

    /// Saves the current sequence as the newest entry. A blank name or an
    /// empty route saves nothing and leaves the dialog as it was.
    pub fn save_current_route<Tz: TimeZone>(
        &mut self,
        name: &str,
        now: DateTime<Tz>,
    ) -> Option<SavedRoute>
    where
        Tz::Offset: std::fmt::Display,
    {
        let name = name.trim();
        if name.is_empty() || self.route.waypoints.is_empty() {
            return None;
        }

        let origin = match self.route.origin {
            Some(origin) => Location::new(origin, STARTING_POINT.into()),
            None => Location::new(Coordinates::new(0.0, 0.0), UNKNOWN_START.into()),
        };

        let id = self.next_route_id(now.timestamp_millis());
        let label = now.format("%H:%M").to_string();

        let route =
            SavedRoute::from_sequence(id, name.into(), origin, &self.route.waypoints, label)?;

        self.saved_routes.insert(0, route.clone());
        self.save_dialog_open = false;
        self.pending_route_name.clear();

        Some(route)
    }

    pub fn delete_saved_route(&mut self, id: &str) -> bool {
        let before = self.saved_routes.len();
        self.saved_routes.retain(|route| route.id != id);
        self.saved_routes.len() != before
    }

    /// Restores a saved planning session. Any position request still in
    /// flight is superseded so it cannot overwrite the restored origin. A
    /// placeholder origin restores as no origin at all.
    pub fn load_saved_route(&mut self, route: &SavedRoute) {
        self.location_slot.issue();
        self.locating = false;

        self.route.origin = restored_origin(route);
        self.route.waypoints = route.stops();
        self.sync_map();
    }

    /// Acknowledgment shown when navigation starts; nothing to navigate
    /// without stops.
    pub fn start_navigation(&self) -> Option<String> {
        match self.route.waypoints.len() {
            0 => None,
            stops => Some(format!(
                "Starting navigation for {} stops! Safe travels.",
                stops
            )),
        }
    }
}

fn restored_origin(route: &SavedRoute) -> Option<Coordinates> {
    let origin = &route.origin;
    let placeholder = origin.name == UNKNOWN_START && origin.lat == 0.0 && origin.lng == 0.0;

    (!placeholder).then(|| Coordinates::from(origin))
}

impl RoutePlanner<MapScene> {
    pub fn view(&self) -> RoutesView {
        RoutesView {
            route: self.route.clone(),
            map: self.map.surface().clone(),
            search_query: self.search_query.clone(),
            search_results: self.search_results.clone(),
            searching: self.searching,
            locating: self.locating,
            location_banner: self.location_error.map(LocationBanner::from),
            saved_routes: self.saved_routes.clone(),
            save_dialog_open: self.save_dialog_open,
            pending_route_name: self.pending_route_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, Utc};

    use super::*;
    use crate::map::{MarkerKind, Viewport};

    fn stop(name: &str, lat: f64, lon: f64) -> GeocodedResult {
        GeocodedResult {
            display_name: name.into(),
            lat,
            lon,
        }
    }

    fn planner() -> RoutePlanner {
        RoutePlanner::new(MapScene::default(), vec![])
    }

    fn names(planner: &RoutePlanner) -> Vec<String> {
        planner
            .waypoints()
            .iter()
            .map(|wp| wp.display_name.clone())
            .collect()
    }

    #[test]
    fn add_and_remove_apply_in_call_order() {
        let mut planner = planner();
        planner.add_waypoint(stop("A", 1.0, 1.0));
        planner.add_waypoint(stop("B", 2.0, 2.0));
        planner.add_waypoint(stop("C", 3.0, 3.0));
        assert!(planner.remove_waypoint(0));
        planner.add_waypoint(stop("D", 4.0, 4.0));
        assert!(planner.remove_waypoint(1));

        assert_eq!(names(&planner), vec!["B", "D"]);
    }

    #[test]
    fn invalid_index_is_a_no_op() {
        let mut planner = planner();
        planner.add_waypoint(stop("A", 1.0, 1.0));

        assert!(!planner.remove_waypoint(1));
        assert!(!planner.remove_waypoint(usize::MAX));
        assert_eq!(names(&planner), vec!["A"]);
    }

    #[test]
    fn adding_a_result_consumes_the_search() {
        let mut planner = planner();
        let token = planner.begin_search("Avenida Paulista").unwrap();
        assert!(planner.finish_search(token, vec![stop("Avenida Paulista", 1.0, 1.0)]));

        let picked = planner.search_results()[0].clone();
        planner.add_waypoint(picked);

        assert!(planner.search_query().is_empty());
        assert!(planner.search_results().is_empty());
    }

    #[test]
    fn short_queries_issue_no_request() {
        let mut planner = planner();
        assert!(planner.begin_search("ab").is_none());
        assert_eq!(planner.search_query(), "ab");
    }

    #[test]
    fn stale_search_results_are_dropped() {
        let mut planner = planner();
        let slow = planner.begin_search("Paulista").unwrap();
        let fast = planner.begin_search("Pinheiros").unwrap();

        assert!(planner.finish_search(fast, vec![stop("Pinheiros", 1.0, 1.0)]));
        assert!(!planner.finish_search(slow, vec![stop("Paulista", 2.0, 2.0)]));
        assert_eq!(planner.search_results()[0].display_name, "Pinheiros");
    }

    #[test]
    fn results_arriving_after_an_add_are_ignored() {
        let mut planner = planner();
        let token = planner.begin_search("Paulista").unwrap();
        planner.add_waypoint(stop("Sé", 1.0, 1.0));

        assert!(!planner.finish_search(token, vec![stop("Paulista", 2.0, 2.0)]));
        assert!(planner.search_results().is_empty());
    }

    #[test]
    fn locate_sets_origin_and_recenters() {
        let mut planner = planner();
        let token = planner.begin_locate();
        let here = Coordinates::new(-23.55, -46.63);
        assert!(planner.finish_locate(token, Ok(here)));

        assert_eq!(planner.route().origin, Some(here));
        assert_eq!(
            planner.map().viewport,
            Viewport::Centered {
                center: here,
                zoom: 15
            }
        );
        assert_eq!(planner.map().markers[0].kind, MarkerKind::Origin);
    }

    #[test]
    fn failed_locate_keeps_origin_and_reports_reason() {
        let mut planner = planner();
        let here = Coordinates::new(-23.55, -46.63);
        let token = planner.begin_locate();
        planner.finish_locate(token, Ok(here));

        let token = planner.begin_locate();
        planner.finish_locate(token, Err(LocationFailure::PermissionDenied));

        assert_eq!(planner.route().origin, Some(here));
        assert_eq!(
            planner.location_error(),
            Some(LocationFailure::PermissionDenied)
        );
        assert_eq!(
            planner.view().location_banner.unwrap().reason,
            LocationFailure::PermissionDenied
        );
    }

    #[test]
    fn late_fix_cannot_overwrite_a_newer_one() {
        let mut planner = planner();
        let slow = planner.begin_locate();
        let fast = planner.begin_locate();

        assert!(planner.finish_locate(fast, Ok(Coordinates::new(1.0, 1.0))));
        assert!(!planner.finish_locate(slow, Ok(Coordinates::new(9.0, 9.0))));
        assert_eq!(planner.route().origin, Some(Coordinates::new(1.0, 1.0)));
    }

    #[test]
    fn reset_clears_stops_but_not_saved_routes() {
        let mut planner = planner();
        planner.add_waypoint(stop("A", 1.0, 1.0));
        planner.save_current_route("Errand", Utc::now()).unwrap();
        planner.add_waypoint(stop("B", 2.0, 2.0));

        let token = planner.reset_route();
        assert!(planner.waypoints().is_empty());
        assert_eq!(planner.saved_routes().len(), 1);
        assert!(planner.map().markers.is_empty());
        assert!(planner.finish_locate(token, Err(LocationFailure::Timeout)));
    }

    #[test]
    fn rejected_saves_change_nothing() {
        let mut planner = planner();
        planner.open_save_dialog();

        assert!(planner.save_current_route("Morning Commute", Utc::now()).is_none());

        planner.add_waypoint(stop("A", 1.0, 1.0));
        assert!(planner.save_current_route("", Utc::now()).is_none());
        assert!(planner.save_current_route("  ", Utc::now()).is_none());

        assert!(planner.saved_routes().is_empty());
        assert!(planner.is_save_dialog_open());
    }

    #[test]
    fn saves_are_newest_first_with_unique_ids() {
        let mut planner = planner();
        planner.add_waypoint(stop("A", 1.0, 1.0));
        planner.open_save_dialog();

        let now = Utc::now();
        let first = planner.save_current_route(" Morning ", now).unwrap();
        let second = planner.save_current_route("Evening", now).unwrap();

        assert_eq!(first.name, "Morning");
        assert_ne!(first.id, second.id);
        assert_eq!(planner.saved_routes()[0].id, second.id);
        assert!(!planner.is_save_dialog_open());
    }

    #[test]
    fn destination_mirrors_last_waypoint() {
        let mut planner = planner();
        planner.add_waypoint(stop("Luz", 1.0, 1.0));
        planner.add_waypoint(stop("Sé", 2.0, 2.0));

        let route = planner.save_current_route("Downtown", Local::now()).unwrap();
        assert_eq!(route.waypoints.len(), 2);
        assert_eq!(route.destination, route.waypoints[1]);
        assert_eq!(route.origin.name, UNKNOWN_START);
    }

    #[test]
    fn save_then_load_restores_the_session() {
        let mut planner = planner();
        let token = planner.begin_locate();
        planner.finish_locate(token, Ok(Coordinates::new(-23.55, -46.63)));
        planner.add_waypoint(stop("Luz", -23.534, -46.635));
        planner.add_waypoint(stop("Sé", -23.550, -46.634));
        planner.add_waypoint(stop("Liberdade", -23.555, -46.636));
        let before = planner.route().clone();

        let saved = planner.save_current_route("Centro", Utc::now()).unwrap();
        planner.reset_route();
        planner.load_saved_route(&saved);

        assert_eq!(planner.route(), &before);
        assert_eq!(planner.map().markers.len(), 4);
        assert_eq!(planner.map().path.len(), 4);
    }

    #[test]
    fn load_supersedes_pending_locate() {
        let mut planner = planner();
        planner.add_waypoint(stop("Luz", 1.0, 1.0));
        let saved = planner.save_current_route("Luz", Utc::now()).unwrap();

        let pending = planner.reset_route();
        planner.load_saved_route(&saved);

        assert!(!planner.finish_locate(pending, Ok(Coordinates::new(5.0, 5.0))));
        assert_eq!(planner.route().origin, None);
    }

    #[test]
    fn placeholder_origin_is_not_drawn() {
        let mut planner = planner();
        planner.add_waypoint(stop("Luz", -23.534, -46.635));
        let saved = planner.save_current_route("No fix", Utc::now()).unwrap();
        assert_eq!(saved.origin.name, UNKNOWN_START);

        planner.reset_route();
        planner.load_saved_route(&saved);

        let scene = planner.map();
        assert!(planner.route().origin.is_none());
        assert_eq!(scene.markers.len(), 1);
        assert_eq!(scene.markers[0].kind, MarkerKind::Stop { number: 1 });
        assert!(scene.path.is_empty());
    }

    #[test]
    fn route_ids_saturate_instead_of_overflowing() {
        let mut seed = planner();
        seed.add_waypoint(stop("A", 1.0, 1.0));
        let mut saved = seed.save_current_route("Old", Utc::now()).unwrap();
        saved.id = i64::MAX.to_string();

        let mut planner = RoutePlanner::new(MapScene::default(), vec![saved]);
        planner.add_waypoint(stop("B", 2.0, 2.0));
        let route = planner.save_current_route("New", Utc::now()).unwrap();

        assert_eq!(route.id, i64::MAX.to_string());
        assert_eq!(planner.saved_routes().len(), 2);
    }

    #[test]
    fn delete_removes_only_the_matching_id() {
        let mut planner = planner();
        planner.add_waypoint(stop("A", 1.0, 1.0));
        let first = planner.save_current_route("One", Utc::now()).unwrap();
        let second = planner.save_current_route("Two", Utc::now()).unwrap();

        assert!(!planner.delete_saved_route("missing"));
        assert!(planner.delete_saved_route(&first.id));
        assert!(planner.find_saved_route(&first.id).is_none());
        assert!(planner.find_saved_route(&second.id).is_some());
    }

    #[test]
    fn navigation_needs_stops() {
        let mut planner = planner();
        assert!(planner.start_navigation().is_none());

        planner.add_waypoint(stop("A", 1.0, 1.0));
        planner.add_waypoint(stop("B", 2.0, 2.0));
        assert_eq!(
            planner.start_navigation().unwrap(),
            "Starting navigation for 2 stops! Safe travels."
        );
    }
}
