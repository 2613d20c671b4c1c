use std::time::Duration;

use async_trait::async_trait;

use crate::entities::{Coordinates, LocationFix};

/// Options for a single on-demand fix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout: Duration,
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_millis(5000),
            maximum_age: Duration::ZERO,
        }
    }
}

/// A device capability able to produce one position fix on request.
#[async_trait]
pub trait Geolocator {
    async fn current_position(&self, options: &PositionOptions) -> LocationFix;
}

pub type DynGeolocator = std::sync::Arc<dyn Geolocator + Send + Sync>;

/// A device pinned to a configured position.
#[derive(Clone, Debug)]
pub struct FixedGeolocator {
    position: Coordinates,
}

impl FixedGeolocator {
    pub fn new(position: Coordinates) -> Self {
        Self { position }
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self, _options: &PositionOptions) -> LocationFix {
        Ok(self.position)
    }
}
