mod advisory;
mod location;

pub use advisory::{
    AnalysisBackend, DynAnalysisBackend, RiskAdvisoryService, DEFAULT_CONTEXT,
};
pub use location::{DynGeocoder, Geocoder, LocationService, MIN_QUERY_CHARS, UNKNOWN_PLACE};
