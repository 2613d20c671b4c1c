mod alert;
mod commute;
mod location;
mod position;
mod profile;
mod risk;
mod route;
mod view;

pub use alert::{Alert, AlertKind, Severity};
pub use commute::{CommuteEntry, CommuteType, DailyCost, DistributionSlice, TransportMode};
pub use location::{Coordinates, GeocodedResult, Location};
pub use position::{LocationBanner, LocationFailure, LocationFix};
pub use profile::UserProfile;
pub use risk::{Advisory, RiskAnalysis, RiskFactors, RiskLevel};
pub use route::SavedRoute;
pub use view::View;
