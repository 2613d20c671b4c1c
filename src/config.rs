use std::env;
use std::net::SocketAddr;

use directories::ProjectDirs;

use crate::entities::Coordinates;
use crate::error::{config_error, Error};

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

#[derive(Clone, Debug)]
pub struct GeocodingConfig {
    pub base_url: String,
    pub user_agent: String,
    pub accept_language: String,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".into(),
            user_agent: "UrbanMobiAlert/1.0".into(),
            accept_language: "pt-BR,pt;q=0.5".into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub database_url: String,
    pub gemini: GeminiConfig,
    pub geocoding: GeocodingConfig,
    pub device_position: Option<Coordinates>,
}

impl Config {
    /// Reads `.env` (when present) and the process environment.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        let listen_addr = optional("URBAN_MOBI_LISTEN_ADDR")?
            .unwrap_or_else(|| "127.0.0.1:3000".into())
            .parse()
            .map_err(|_| config_error("URBAN_MOBI_LISTEN_ADDR is not a socket address"))?;

        let database_url = match optional("URBAN_MOBI_DATABASE_URL")? {
            Some(url) => url,
            None => default_database_url()?,
        };

        let api_key = match optional("API_KEY")? {
            Some(key) => Some(key),
            None => optional("GEMINI_API_KEY")?,
        };

        let gemini = GeminiConfig {
            api_key,
            base_url: optional("GEMINI_API_BASE_URL")?
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com".into()),
            model: optional("GEMINI_MODEL")?.unwrap_or_else(|| "gemini-3-flash-preview".into()),
        };

        let defaults = GeocodingConfig::default();
        let geocoding = GeocodingConfig {
            base_url: optional("NOMINATIM_BASE_URL")?.unwrap_or(defaults.base_url),
            user_agent: optional("URBAN_MOBI_USER_AGENT")?.unwrap_or(defaults.user_agent),
            accept_language: optional("URBAN_MOBI_ACCEPT_LANGUAGE")?
                .unwrap_or(defaults.accept_language),
        };

        let device_position = optional("URBAN_MOBI_DEVICE_POSITION")?
            .map(|raw| parse_position(&raw))
            .transpose()?;

        Ok(Self {
            listen_addr,
            database_url,
            gemini,
            geocoding,
            device_position,
        })
    }
}

fn optional(key: &str) -> Result<Option<String>, Error> {
    match env::var(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn default_database_url() -> Result<String, Error> {
    let dirs = ProjectDirs::from("", "", "urban_mobi")
        .ok_or_else(|| config_error("unable to determine the app data directory"))?;

    let dir = dirs.data_local_dir();
    std::fs::create_dir_all(dir)
        .map_err(|_| config_error(format!("unable to create {}", dir.display())))?;

    Ok(format!(
        "sqlite://{}?mode=rwc",
        dir.join("urban_mobi.sqlite").display()
    ))
}

/// Parses a `"lat,lng"` pair.
pub fn parse_position(raw: &str) -> Result<Coordinates, Error> {
    let invalid = || config_error(format!("invalid position {:?}, expected \"lat,lng\"", raw));

    let (lat, lng) = raw.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(invalid());
    }

    Ok(Coordinates::new(lat, lng))
}

#[test]
fn parses_device_position() {
    let position = parse_position("-23.5614, -46.6559").unwrap();
    assert_eq!(position, Coordinates::new(-23.5614, -46.6559));

    assert!(parse_position("-23.5614").is_err());
    assert!(parse_position("north,south").is_err());
    assert!(parse_position("123.0,0.0").is_err());
}
