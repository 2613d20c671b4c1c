use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

/// Why a device position fix could not be obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationFailure {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unsupported,
    Unknown,
}

impl LocationFailure {
    pub fn message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => {
                "Permissão de localização negada. Verifique as configurações do navegador."
            }
            Self::PositionUnavailable => "Informações de localização indisponíveis no momento.",
            Self::Timeout => "Tempo esgotado ao tentar obter localização.",
            Self::Unsupported => "Seu navegador não suporta geolocalização.",
            Self::Unknown => "Ocorreu um erro desconhecido ao obter a localização.",
        }
    }
}

pub type LocationFix = Result<Coordinates, LocationFailure>;

/// Dismissible inline banner describing the last location failure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationBanner {
    pub reason: LocationFailure,
    pub message: String,
}

impl From<LocationFailure> for LocationBanner {
    fn from(reason: LocationFailure) -> Self {
        Self {
            reason,
            message: reason.message().into(),
        }
    }
}

#[test]
fn failure_serializes_as_snake_case_tag() {
    let value = serde_json::to_value(LocationFailure::PermissionDenied).unwrap();
    assert_eq!(value, serde_json::json!("permission_denied"));

    let banner = LocationBanner::from(LocationFailure::Timeout);
    assert_eq!(banner.message, LocationFailure::Timeout.message());
}

#[test]
fn banner_messages_are_in_portuguese() {
    assert_eq!(
        LocationBanner::from(LocationFailure::PermissionDenied).message,
        "Permissão de localização negada. Verifique as configurações do navegador."
    );
    assert_eq!(
        LocationFailure::Unsupported.message(),
        "Seu navegador não suporta geolocalização."
    );
}
