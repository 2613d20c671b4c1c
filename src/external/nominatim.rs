use serde::Deserialize;

use crate::{
    config::GeocodingConfig,
    entities::GeocodedResult,
    error::{invalid_input_error, upstream_error, Error},
};

pub const SEARCH_LIMIT: usize = 5;

#[derive(Clone, Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct SearchHit {
    display_name: String,
    lat: Coordinate,
    lon: Coordinate,
}

// Nominatim sends coordinates as strings, some mirrors send numbers.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Text(String),
    Number(f64),
}

impl Coordinate {
    fn value(&self) -> Option<f64> {
        match self {
            Self::Text(text) => text.trim().parse().ok(),
            Self::Number(number) => Some(*number),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Nominatim {
    client: reqwest::Client,
    config: GeocodingConfig,
}

impl Nominatim {
    pub fn new(config: GeocodingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Reverse lookup. `Ok(None)` means the service answered without a name.
    #[tracing::instrument(skip(self))]
    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<Option<String>, Error> {
        let res = self
            .client
            .get(self.endpoint("reverse"))
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .header(reqwest::header::ACCEPT_LANGUAGE, &self.config.accept_language)
            .query(&[("format", "json")])
            .query(&[("lat", lat), ("lon", lon)])
            .query(&[("zoom", 18), ("addressdetails", 1)])
            .send()
            .await?;

        check_status(res.status().as_u16())?;

        let data: ReverseResponse = res.json().await?;

        Ok(data.display_name.filter(|name| !name.trim().is_empty()))
    }

    /// Forward search, capped at five hits.
    #[tracing::instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<GeocodedResult>, Error> {
        let res = self
            .client
            .get(self.endpoint("search"))
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .header(reqwest::header::ACCEPT_LANGUAGE, &self.config.accept_language)
            .query(&[("format", "json"), ("q", query)])
            .query(&[("limit", SEARCH_LIMIT)])
            .send()
            .await?;

        check_status(res.status().as_u16())?;

        let hits: Vec<SearchHit> = res.json().await?;

        Ok(hits
            .into_iter()
            .filter_map(|hit| {
                Some(GeocodedResult {
                    lat: hit.lat.value()?,
                    lon: hit.lon.value()?,
                    display_name: hit.display_name,
                })
            })
            .take(SEARCH_LIMIT)
            .collect())
    }
}

fn check_status(status_code: u16) -> Result<(), Error> {
    if (400..500).contains(&status_code) {
        return Err(invalid_input_error());
    } else if status_code != 200 {
        return Err(upstream_error());
    }

    Ok(())
}

#[test]
fn coordinates_accept_strings_and_numbers() {
    let hits: Vec<SearchHit> = serde_json::from_str(
        r#"[
            {"display_name": "Avenida Paulista", "lat": "-23.5613", "lon": "-46.6565"},
            {"display_name": "Paulista, PE", "lat": -7.9408, "lon": -34.8731},
            {"display_name": "Broken", "lat": "n/a", "lon": "0"}
        ]"#,
    )
    .unwrap();

    let values: Vec<Option<f64>> = hits.iter().map(|hit| hit.lat.value()).collect();
    assert_eq!(values, vec![Some(-23.5613), Some(-7.9408), None]);
}
