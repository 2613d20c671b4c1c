use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    config::GeminiConfig,
    entities::{RiskAnalysis, RiskFactors},
    error::{config_error, invalid_input_error, malformed_payload_error, upstream_error, Error},
};

#[derive(Clone, Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Clone, Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Clone, Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Clone, Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// The structured output exactly as the model returns it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawAnalysis {
    pub score: f64,
    pub recommendations: Vec<String>,
    pub factors: RawFactors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawFactors {
    pub weather: f64,
    pub traffic: f64,
    pub events: f64,
}

#[derive(Clone, Debug)]
pub struct Gemini {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl Gemini {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn generate_analysis(&self, context: &str) -> Result<RiskAnalysis, Error> {
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| config_error("no advisory API key configured"))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );

        let res = self
            .client
            .post(url)
            .header("x-goog-api-key", key)
            .json(&request_body(context))
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if (400..500).contains(&status_code) {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: GenerateContentResponse = res.json().await?;

        let text = data
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .find_map(|part| part.text)
            .ok_or_else(upstream_error)?;

        let raw: RawAnalysis = serde_json::from_str(&text)?;

        validate(raw)
    }
}

pub fn prompt(context: &str) -> String {
    format!(
        "Perform a mobility risk analysis (0-100 score) for the following context: {}. Return the result in JSON format.",
        context
    )
}

fn request_body(context: &str) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": prompt(context) }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "score": { "type": "NUMBER", "description": "Total risk score from 0 to 100" },
                    "recommendations": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" },
                        "description": "Actionable recommendations for the commuter"
                    },
                    "factors": {
                        "type": "OBJECT",
                        "properties": {
                            "weather": { "type": "NUMBER", "description": "Risk contribution from weather (0-30)" },
                            "traffic": { "type": "NUMBER", "description": "Risk contribution from traffic (0-30)" },
                            "events": { "type": "NUMBER", "description": "Risk contribution from public events (0-20)" }
                        },
                        "required": ["weather", "traffic", "events"]
                    }
                },
                "required": ["score", "recommendations", "factors"]
            }
        }
    })
}

/// Enforces the schema bounds and converts to whole-number scores.
pub fn validate(raw: RawAnalysis) -> Result<RiskAnalysis, Error> {
    let bounded = |value: f64, max: f64, field: &str| -> Result<u8, Error> {
        if value.is_finite() && (0.0..=max).contains(&value) {
            Ok(value.round() as u8)
        } else {
            Err(malformed_payload_error(format!("{} out of range: {}", field, value)))
        }
    };

    Ok(RiskAnalysis {
        score: bounded(raw.score, 100.0, "score")?,
        factors: RiskFactors {
            weather: bounded(raw.factors.weather, 30.0, "factors.weather")?,
            traffic: bounded(raw.factors.traffic, 30.0, "factors.traffic")?,
            events: bounded(raw.factors.events, 20.0, "factors.events")?,
        },
        recommendations: raw.recommendations,
    })
}

#[test]
fn validate_rejects_out_of_range_factors() {
    let raw = RawAnalysis {
        score: 62.4,
        recommendations: vec!["Leave before 5 PM".into()],
        factors: RawFactors {
            weather: 12.0,
            traffic: 28.0,
            events: 25.0,
        },
    };
    assert!(validate(raw.clone()).is_err());

    let ok = RawAnalysis {
        factors: RawFactors {
            events: 8.0,
            ..raw.factors
        },
        ..raw
    };
    let analysis = validate(ok).unwrap();
    assert_eq!(analysis.score, 62);
    assert_eq!(analysis.factors.traffic, 28);
}

#[test]
fn request_embeds_context_in_prompt() {
    let body = request_body("Rainy Monday in Curitiba");
    let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();

    assert!(text.contains("Rainy Monday in Curitiba"));
    assert_eq!(
        body["generationConfig"]["responseMimeType"],
        json!("application/json")
    );
}
