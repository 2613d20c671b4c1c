use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, GeocodedResult};

pub const RECENTER_ZOOM: u8 = 15;
pub const FIT_PADDING: u32 = 80;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerKind {
    Origin,
    Stop { number: usize },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    #[serde(flatten)]
    pub kind: MarkerKind,
    pub point: Coordinates,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Viewport {
    Unset,
    Centered { center: Coordinates, zoom: u8 },
    Fitted { points: Vec<Coordinates>, padding: u32 },
}

/// The handle of an interactive map. Only `MapOwner` writes to it.
pub trait MapSurface {
    fn set_markers(&mut self, markers: &[Marker]);
    fn set_path(&mut self, points: &[Coordinates]);
    fn fit_to(&mut self, points: &[Coordinates], padding: u32);
    fn recenter(&mut self, point: Coordinates, zoom: u8);
    fn dispose(&mut self);
}

/// In-memory scene handed to the client for rendering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapScene {
    pub markers: Vec<Marker>,
    pub path: Vec<Coordinates>,
    pub viewport: Viewport,
    pub disposed: bool,
}

impl Default for MapScene {
    fn default() -> Self {
        Self {
            markers: vec![],
            path: vec![],
            viewport: Viewport::Unset,
            disposed: false,
        }
    }
}

impl MapSurface for MapScene {
    fn set_markers(&mut self, markers: &[Marker]) {
        self.markers = markers.to_vec();
    }

    fn set_path(&mut self, points: &[Coordinates]) {
        self.path = points.to_vec();
    }

    fn fit_to(&mut self, points: &[Coordinates], padding: u32) {
        self.viewport = Viewport::Fitted {
            points: points.to_vec(),
            padding,
        };
    }

    fn recenter(&mut self, point: Coordinates, zoom: u8) {
        self.viewport = Viewport::Centered {
            center: point,
            zoom,
        };
    }

    fn dispose(&mut self) {
        self.markers.clear();
        self.path.clear();
        self.viewport = Viewport::Unset;
        self.disposed = true;
    }
}

/// Component-scoped owner of a map surface; the surface is disposed when the
/// owner goes away.
pub struct MapOwner<S: MapSurface> {
    surface: S,
}

impl<S: MapSurface> MapOwner<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn recenter(&mut self, point: Coordinates) {
        self.surface.recenter(point, RECENTER_ZOOM);
    }

    /// Rebuilds every visual element from the given route state. Markers are
    /// the origin (when known) followed by one per waypoint in order, the path
    /// joins the same points, and two or more points fit the viewport.
    pub fn sync(&mut self, origin: Option<Coordinates>, waypoints: &[GeocodedResult]) {
        let mut markers = Vec::with_capacity(waypoints.len() + 1);
        let mut points = Vec::with_capacity(waypoints.len() + 1);

        if let Some(origin) = origin {
            markers.push(Marker {
                kind: MarkerKind::Origin,
                point: origin,
                label: "Origin Point".into(),
            });
            points.push(origin);
        }

        for (index, waypoint) in waypoints.iter().enumerate() {
            let point = waypoint.coordinates();
            markers.push(Marker {
                kind: MarkerKind::Stop { number: index + 1 },
                point,
                label: format!("Stop {}: {}", index + 1, waypoint.short_name()),
            });
            points.push(point);
        }

        self.surface.set_markers(&markers);

        if points.len() > 1 {
            self.surface.set_path(&points);
            self.surface.fit_to(&points, FIT_PADDING);
        } else {
            self.surface.set_path(&[]);
        }
    }
}

impl<S: MapSurface> Drop for MapOwner<S> {
    fn drop(&mut self) {
        self.surface.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(name: &str, lat: f64, lon: f64) -> GeocodedResult {
        GeocodedResult {
            display_name: name.into(),
            lat,
            lon,
        }
    }

    #[test]
    fn sync_replaces_previous_elements() {
        let mut owner = MapOwner::new(MapScene::default());
        let origin = Coordinates::new(-23.55, -46.63);

        owner.sync(
            Some(origin),
            &[
                stop("Pinacoteca, Luz", -23.534, -46.634),
                stop("Mercadão, Centro", -23.541, -46.629),
            ],
        );
        assert_eq!(owner.surface().markers.len(), 3);
        assert_eq!(owner.surface().path.len(), 3);
        assert_eq!(owner.surface().markers[1].label, "Stop 1: Pinacoteca");

        owner.sync(Some(origin), &[]);
        let scene = owner.surface();
        assert_eq!(scene.markers.len(), 1);
        assert_eq!(scene.markers[0].kind, MarkerKind::Origin);
        assert!(scene.path.is_empty());
    }

    #[test]
    fn two_points_fit_the_viewport() {
        let mut owner = MapOwner::new(MapScene::default());
        owner.recenter(Coordinates::new(-23.55, -46.63));
        assert!(matches!(
            owner.surface().viewport,
            Viewport::Centered { zoom: 15, .. }
        ));

        owner.sync(None, &[stop("A", 1.0, 1.0), stop("B", 2.0, 2.0)]);
        assert_eq!(
            owner.surface().viewport,
            Viewport::Fitted {
                points: vec![Coordinates::new(1.0, 1.0), Coordinates::new(2.0, 2.0)],
                padding: FIT_PADDING,
            }
        );
    }

    struct Recorder(std::rc::Rc<std::cell::Cell<bool>>);

    impl MapSurface for Recorder {
        fn set_markers(&mut self, _markers: &[Marker]) {}
        fn set_path(&mut self, _points: &[Coordinates]) {}
        fn fit_to(&mut self, _points: &[Coordinates], _padding: u32) {}
        fn recenter(&mut self, _point: Coordinates, _zoom: u8) {}

        fn dispose(&mut self) {
            self.0.set(true);
        }
    }

    #[test]
    fn dropping_the_owner_disposes_the_surface() {
        let disposed = std::rc::Rc::new(std::cell::Cell::new(false));
        let owner = MapOwner::new(Recorder(disposed.clone()));
        assert!(!disposed.get());

        drop(owner);
        assert!(disposed.get());
    }
}
