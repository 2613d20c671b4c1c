use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Deterministic label used when no place name can be resolved.
    pub fn rounded_label(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lng)
    }
}

impl From<&Location> for Coordinates {
    fn from(location: &Location) -> Self {
        Self {
            lat: location.lat,
            lng: location.lng,
        }
    }
}

/// A named point as persisted inside a saved route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub name: String,
}

impl Location {
    pub fn new(coordinates: Coordinates, name: String) -> Self {
        Self {
            lat: coordinates.lat,
            lng: coordinates.lng,
            name,
        }
    }
}

/// A geocoding hit. Waypoints of the active route are kept in this shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeocodedResult {
    pub display_name: String,
    pub lat: f64,
    pub lon: f64,
}

impl GeocodedResult {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }

    /// First comma separated part of the display name.
    pub fn short_name(&self) -> &str {
        self.display_name
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
    }
}

impl From<&GeocodedResult> for Location {
    fn from(result: &GeocodedResult) -> Self {
        Self {
            lat: result.lat,
            lng: result.lon,
            name: result.display_name.clone(),
        }
    }
}

impl From<&Location> for GeocodedResult {
    fn from(location: &Location) -> Self {
        Self {
            display_name: location.name.clone(),
            lat: location.lat,
            lon: location.lng,
        }
    }
}

#[test]
fn rounded_label_uses_four_decimals() {
    let coordinates = Coordinates::new(-23.561414, -46.6558819);
    assert_eq!(coordinates.rounded_label(), "-23.5614, -46.6559");
}

#[test]
fn location_and_geocoded_result_swap_field_names() {
    let result = GeocodedResult {
        display_name: "MASP, Avenida Paulista, São Paulo".into(),
        lat: -23.5614,
        lon: -46.6559,
    };

    let location = Location::from(&result);
    assert_eq!(location.lng, -46.6559);
    assert_eq!(GeocodedResult::from(&location), result);
    assert_eq!(result.short_name(), "MASP");
}
