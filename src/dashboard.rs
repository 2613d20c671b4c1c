use serde::{Deserialize, Serialize};

use crate::{
    entities::{Advisory, Coordinates, LocationBanner, LocationFailure, RiskLevel},
    tokens::{RequestToken, TokenSlot},
};

pub const DETECTING_LOCATION: &str = "Detectando...";
pub const DEFAULT_LOCATION_NAME: &str = "São Paulo, SP (Default)";
pub const FALLBACK_CONTEXT: &str =
    "A metropolitan capital city like São Paulo. General mobility risk analysis.";

/// Advisory context for a resolved position.
pub fn located_context(position: Coordinates, place: &str) -> String {
    format!(
        "At coordinates ({}, {}), near {}. Current urban mobility risk assessment.",
        position.lat, position.lng, place
    )
}

/// Keeps the first two comma separated parts of a reverse-geocoded name.
pub fn short_place_name(place: &str) -> String {
    let mut parts = place.split(',');
    let first = parts.next().unwrap_or_default();

    match parts.next() {
        Some(second) if !second.trim().is_empty() => format!("{},{}", first, second),
        _ => first.to_string(),
    }
}

/// Outcome of the locate and reverse-geocode step of a refresh.
#[derive(Clone, Debug)]
pub enum LocationOutcome {
    Located { position: Coordinates, place: String },
    Failed(LocationFailure),
}

impl LocationOutcome {
    pub fn context(&self) -> String {
        match self {
            Self::Located { position, place } => located_context(*position, place),
            Self::Failed(_) => FALLBACK_CONTEXT.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RiskGauge {
    pub score: u8,
    pub level: RiskLevel,
    pub label: String,
    pub color: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DashboardView {
    pub location_name: String,
    pub location_banner: Option<LocationBanner>,
    pub loading: bool,
    pub context: Option<String>,
    pub gauge: Option<RiskGauge>,
    pub advisory: Option<Advisory>,
}

pub struct Dashboard {
    location_name: String,
    location_error: Option<LocationFailure>,
    loading: bool,
    context: Option<String>,
    advisory: Option<Advisory>,
    analysis_slot: TokenSlot,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            location_name: DETECTING_LOCATION.into(),
            location_error: None,
            loading: false,
            context: None,
            advisory: None,
            analysis_slot: TokenSlot::default(),
        }
    }
}

impl Dashboard {
    pub fn location_name(&self) -> &str {
        &self.location_name
    }

    pub fn location_error(&self) -> Option<LocationFailure> {
        self.location_error
    }

    pub fn advisory(&self) -> Option<&Advisory> {
        self.advisory.as_ref()
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Starts a refresh. A forced refresh (the retry action) clears the
    /// location banner up front.
    pub fn begin_refresh(&mut self, force_location: bool) -> RequestToken {
        self.loading = true;
        if force_location {
            self.location_error = None;
        }
        self.analysis_slot.issue()
    }

    /// Applies a completed refresh unless a newer one was started.
    pub fn finish_refresh(
        &mut self,
        token: RequestToken,
        location: LocationOutcome,
        advisory: Advisory,
    ) -> bool {
        if !self.analysis_slot.is_latest(token) {
            tracing::debug!("dropping superseded risk analysis");
            return false;
        }

        self.context = Some(location.context());

        match location {
            LocationOutcome::Located { place, .. } => {
                self.location_name = short_place_name(&place);
                self.location_error = None;
            }
            LocationOutcome::Failed(reason) => {
                self.location_name = DEFAULT_LOCATION_NAME.into();
                self.location_error = Some(reason);
            }
        }

        self.advisory = Some(advisory);
        self.loading = false;
        true
    }

    pub fn dismiss_location_error(&mut self) {
        self.location_error = None;
    }

    pub fn view(&self) -> DashboardView {
        let gauge = self.advisory.as_ref().map(|advisory| {
            let level = advisory.level();
            RiskGauge {
                score: advisory.score,
                level,
                label: level.label().into(),
                color: level.color().into(),
            }
        });

        DashboardView {
            location_name: self.location_name.clone(),
            location_banner: self.location_error.map(LocationBanner::from),
            loading: self.loading,
            context: self.context.clone(),
            gauge,
            advisory: self.advisory.clone(),
        }
    }
}

#[test]
fn short_place_name_keeps_two_parts() {
    assert_eq!(
        short_place_name("MASP, Avenida Paulista, Bela Vista, São Paulo"),
        "MASP, Avenida Paulista"
    );
    assert_eq!(short_place_name("Somewhere"), "Somewhere");
    assert_eq!(short_place_name("Rua Augusta,,São Paulo"), "Rua Augusta");
    assert_eq!(short_place_name("Rua Augusta, , São Paulo"), "Rua Augusta");
}

#[test]
fn failed_location_uses_default_context_and_banner() {
    let mut dashboard = Dashboard::default();
    assert_eq!(dashboard.location_name(), DETECTING_LOCATION);

    let token = dashboard.begin_refresh(false);
    dashboard.finish_refresh(
        token,
        LocationOutcome::Failed(LocationFailure::PermissionDenied),
        Advisory::fallback(),
    );

    let view = dashboard.view();
    assert_eq!(view.context.as_deref(), Some(FALLBACK_CONTEXT));
    assert_eq!(view.location_name, DEFAULT_LOCATION_NAME);
    assert_eq!(
        view.location_banner.unwrap().reason,
        LocationFailure::PermissionDenied
    );
    assert_eq!(view.gauge.unwrap().label, "Moderate Risk");
}

#[test]
fn newer_refresh_wins() {
    let mut dashboard = Dashboard::default();
    let slow = dashboard.begin_refresh(false);
    let fast = dashboard.begin_refresh(true);

    let here = Coordinates::new(-23.5614, -46.6559);
    assert!(dashboard.finish_refresh(
        fast,
        LocationOutcome::Located {
            position: here,
            place: "MASP, Avenida Paulista, São Paulo".into(),
        },
        Advisory::fallback(),
    ));
    assert!(!dashboard.finish_refresh(
        slow,
        LocationOutcome::Failed(LocationFailure::Timeout),
        Advisory::fallback(),
    ));

    assert_eq!(dashboard.location_name(), "MASP, Avenida Paulista");
    assert!(dashboard.location_error().is_none());
    assert_eq!(
        dashboard.context().unwrap(),
        "At coordinates (-23.5614, -46.6559), near MASP, Avenida Paulista, São Paulo. Current urban mobility risk assessment."
    );
}

#[test]
fn dismissing_clears_only_the_banner() {
    let mut dashboard = Dashboard::default();
    let token = dashboard.begin_refresh(false);
    dashboard.finish_refresh(
        token,
        LocationOutcome::Failed(LocationFailure::Timeout),
        Advisory::fallback(),
    );

    dashboard.dismiss_location_error();

    let view = dashboard.view();
    assert!(view.location_banner.is_none());
    assert_eq!(view.location_name, DEFAULT_LOCATION_NAME);
    assert_eq!(view.context.as_deref(), Some(FALLBACK_CONTEXT));
}
