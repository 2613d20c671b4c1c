use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    entities::{Advisory, RiskAnalysis},
    error::Error,
    external::gemini::Gemini,
};

pub const DEFAULT_CONTEXT: &str = "Normal weekday afternoon in a busy metropolitan city";

/// Structured-output AI backend.
#[async_trait]
pub trait AnalysisBackend {
    async fn analyze(&self, context: &str) -> Result<RiskAnalysis, Error>;
}

pub type DynAnalysisBackend = Arc<dyn AnalysisBackend + Send + Sync>;

#[async_trait]
impl AnalysisBackend for Gemini {
    async fn analyze(&self, context: &str) -> Result<RiskAnalysis, Error> {
        self.generate_analysis(context).await
    }
}

#[derive(Clone)]
pub struct RiskAdvisoryService {
    backend: DynAnalysisBackend,
}

impl RiskAdvisoryService {
    pub fn new(backend: DynAnalysisBackend) -> Self {
        Self { backend }
    }

    /// Never fails: any backend error yields `Advisory::Fallback`.
    #[tracing::instrument(skip(self))]
    pub async fn get_risk_analysis(&self, context: &str) -> Advisory {
        match self.backend.analyze(context).await {
            Ok(analysis) => Advisory::Live(analysis),
            Err(err) => {
                tracing::warn!("risk analysis failed, serving fallback: {}", err);
                Advisory::fallback()
            }
        }
    }

    pub async fn get_default_risk_analysis(&self) -> Advisory {
        self.get_risk_analysis(DEFAULT_CONTEXT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::RiskFactors;
    use crate::error::reqwest_error;

    struct Unreachable;

    #[async_trait]
    impl AnalysisBackend for Unreachable {
        async fn analyze(&self, _context: &str) -> Result<RiskAnalysis, Error> {
            // a connection refused on a closed local port
            let err = reqwest::Client::new()
                .get("http://127.0.0.1:9/")
                .send()
                .await
                .unwrap_err();
            Err(reqwest_error(err))
        }
    }

    struct Echo;

    #[async_trait]
    impl AnalysisBackend for Echo {
        async fn analyze(&self, context: &str) -> Result<RiskAnalysis, Error> {
            Ok(RiskAnalysis {
                score: 80,
                factors: RiskFactors {
                    weather: 25,
                    traffic: 30,
                    events: 15,
                },
                recommendations: vec![context.to_string()],
            })
        }
    }

    #[tokio::test]
    async fn transport_error_resolves_to_fallback() {
        let service = RiskAdvisoryService::new(Arc::new(Unreachable));
        let advisory = service.get_risk_analysis("Rush hour on Marginal Tietê").await;

        assert!(advisory.is_fallback());
        assert_eq!(
            advisory.into_analysis(),
            RiskAnalysis {
                score: 45,
                factors: RiskFactors {
                    weather: 15,
                    traffic: 20,
                    events: 10,
                },
                recommendations: vec![
                    "Stay updated with traffic alerts".to_string(),
                    "Consider public transport".to_string(),
                ],
            }
        );
    }

    #[tokio::test]
    async fn live_results_pass_through() {
        let service = RiskAdvisoryService::new(Arc::new(Echo));
        let advisory = service.get_default_risk_analysis().await;

        assert!(!advisory.is_fallback());
        assert_eq!(advisory.recommendations, vec![DEFAULT_CONTEXT.to_string()]);
    }
}
