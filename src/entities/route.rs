use serde::{Deserialize, Serialize};

use crate::entities::{GeocodedResult, Location};

/// A named, persisted snapshot of a planned waypoint sequence.
///
/// `destination` is always derived from the last waypoint at save time and
/// `waypoints` mirrors the whole sequence, destination included.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRoute {
    pub id: String,
    pub name: String,
    pub origin: Location,
    pub destination: Location,
    #[serde(default)]
    pub waypoints: Vec<Location>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(rename = "time", default)]
    pub created_at_label: String,
}

fn default_active() -> bool {
    true
}

impl SavedRoute {
    /// Builds a route from the current planning sequence. Returns `None` when
    /// there is nothing to save.
    pub fn from_sequence(
        id: String,
        name: String,
        origin: Location,
        sequence: &[GeocodedResult],
        created_at_label: String,
    ) -> Option<Self> {
        let last = sequence.last()?;

        Some(Self {
            id,
            name,
            origin,
            destination: Location::from(last),
            waypoints: sequence.iter().map(Location::from).collect(),
            is_active: true,
            created_at_label,
        })
    }

    /// The stop sequence to restore into the planner. Falls back to the
    /// destination alone for entries written without a waypoint list.
    pub fn stops(&self) -> Vec<GeocodedResult> {
        if self.waypoints.is_empty() {
            vec![GeocodedResult::from(&self.destination)]
        } else {
            self.waypoints.iter().map(GeocodedResult::from).collect()
        }
    }

    pub fn stop_count(&self) -> usize {
        self.waypoints.len().max(1)
    }
}

#[test]
fn parses_entries_without_waypoints() {
    let raw = r#"{
        "id": "1700000000000",
        "name": "Gym",
        "origin": {"lat": 0.0, "lng": 0.0, "name": "Unknown Start"},
        "destination": {"lat": -23.5, "lng": -46.6, "name": "Smart Fit"},
        "isActive": true,
        "time": "07:15"
    }"#;

    let route: SavedRoute = serde_json::from_str(raw).unwrap();
    assert!(route.waypoints.is_empty());
    assert_eq!(route.created_at_label, "07:15");
    assert_eq!(route.stops().len(), 1);
    assert_eq!(route.stops()[0].display_name, "Smart Fit");
}

#[test]
fn single_stop_route_keeps_one_waypoint() {
    let stop = GeocodedResult {
        display_name: "Ibirapuera Park".into(),
        lat: -23.587,
        lon: -46.657,
    };
    let origin = Location {
        lat: 0.0,
        lng: 0.0,
        name: "Unknown Start".into(),
    };

    let route =
        SavedRoute::from_sequence("1".into(), "Park".into(), origin, &[stop.clone()], "".into())
            .unwrap();

    assert_eq!(route.waypoints.len(), 1);
    assert_eq!(route.destination, route.waypoints[0]);
    assert_eq!(route.stops(), vec![stop]);
}
