use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommuteType {
    Office,
    Home,
    Hybrid,
}

impl CommuteType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Office => "Office",
            Self::Home => "Home",
            Self::Hybrid => "Hybrid",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Office => "#3b82f6",
            Self::Home => "#10b981",
            Self::Hybrid => "#f59e0b",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Car,
    Public,
    Bike,
    Walk,
}

/// One recorded commute.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommuteEntry {
    pub id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: CommuteType,
    pub mode: TransportMode,
    /// Kilometres.
    pub distance: f64,
    pub cost: f64,
    /// Minutes.
    pub duration: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DailyCost {
    pub name: String,
    pub cost: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DistributionSlice {
    pub kind: CommuteType,
    pub name: String,
    pub value: u32,
    pub color: String,
    pub share: f64,
}
