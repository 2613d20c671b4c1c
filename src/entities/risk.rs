use std::ops::Deref;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub weather: u8,
    pub traffic: u8,
    pub events: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub score: u8,
    pub factors: RiskFactors,
    pub recommendations: Vec<String>,
}

impl RiskAnalysis {
    /// Static payload served whenever the advisory backend cannot answer.
    pub fn fallback() -> Self {
        Self {
            score: 45,
            factors: RiskFactors {
                weather: 15,
                traffic: 20,
                events: 10,
            },
            recommendations: vec![
                "Stay updated with traffic alerts".into(),
                "Consider public transport".into(),
            ],
        }
    }

    pub fn level(&self) -> RiskLevel {
        RiskLevel::from_score(self.score)
    }
}

/// A risk analysis tagged with where it came from. Both variants carry a
/// valid analysis; callers that only render can deref straight through.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "analysis", rename_all = "snake_case")]
pub enum Advisory {
    Live(RiskAnalysis),
    Fallback(RiskAnalysis),
}

impl Advisory {
    pub fn fallback() -> Self {
        Self::Fallback(RiskAnalysis::fallback())
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    pub fn analysis(&self) -> &RiskAnalysis {
        match self {
            Self::Live(analysis) | Self::Fallback(analysis) => analysis,
        }
    }

    pub fn into_analysis(self) -> RiskAnalysis {
        match self {
            Self::Live(analysis) | Self::Fallback(analysis) => analysis,
        }
    }
}

impl Deref for Advisory {
    type Target = RiskAnalysis;

    fn deref(&self) -> &RiskAnalysis {
        self.analysis()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=39 => Self::Low,
            40..=69 => Self::Moderate,
            _ => Self::High,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Moderate => "Moderate Risk",
            Self::High => "High Risk",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "#10b981",
            Self::Moderate => "#f59e0b",
            Self::High => "#ef4444",
        }
    }
}

#[test]
fn level_thresholds() {
    assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
    assert_eq!(RiskLevel::from_score(39), RiskLevel::Low);
    assert_eq!(RiskLevel::from_score(40), RiskLevel::Moderate);
    assert_eq!(RiskLevel::from_score(69), RiskLevel::Moderate);
    assert_eq!(RiskLevel::from_score(70), RiskLevel::High);
    assert_eq!(RiskLevel::from_score(100).label(), "High Risk");
}

#[test]
fn fallback_derefs_to_static_payload() {
    let advisory = Advisory::fallback();
    assert!(advisory.is_fallback());
    assert_eq!(advisory.score, 45);
    assert_eq!(advisory.level(), RiskLevel::Moderate);
}
