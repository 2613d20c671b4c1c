#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;

use urban_mobi::entities::{GeocodedResult, LocationFailure, LocationFix, RiskAnalysis};
use urban_mobi::error::{upstream_error, Error};
use urban_mobi::external::geolocation::{Geolocator, PositionOptions};
use urban_mobi::services::{AnalysisBackend, Geocoder};

/// Serves `router` on an ephemeral local port and returns its base URL.
pub fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock upstream");
    let addr = listener.local_addr().expect("mock upstream address");

    tokio::spawn(async move {
        axum::Server::from_tcp(listener)
            .expect("mock upstream listener")
            .serve(router.into_make_service())
            .await
            .expect("mock upstream stopped");
    });

    format!("http://{}", addr)
}

/// Shared request log for a mock upstream.
#[derive(Clone, Default)]
pub struct Hits {
    count: Arc<AtomicUsize>,
    user_agents: Arc<Mutex<Vec<String>>>,
}

impl Hits {
    pub fn record(&self, user_agent: Option<&str>) {
        self.count.fetch_add(1, Ordering::SeqCst);
        if let Some(user_agent) = user_agent {
            self.user_agents.lock().unwrap().push(user_agent.to_string());
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn user_agents(&self) -> Vec<String> {
        self.user_agents.lock().unwrap().clone()
    }
}

pub fn stop(name: &str, lat: f64, lon: f64) -> GeocodedResult {
    GeocodedResult {
        display_name: name.into(),
        lat,
        lon,
    }
}

/// Device that always answers with the same fix.
pub struct Device(pub LocationFix);

#[async_trait]
impl Geolocator for Device {
    async fn current_position(&self, _options: &PositionOptions) -> LocationFix {
        self.0
    }
}

pub fn denied_device() -> Device {
    Device(Err(LocationFailure::PermissionDenied))
}

/// Geocoder answering from a fixed list.
pub struct Gazetteer(pub Vec<GeocodedResult>);

#[async_trait]
impl Geocoder for Gazetteer {
    async fn reverse(&self, _lat: f64, _lon: f64) -> Result<Option<String>, Error> {
        Ok(Some("MASP, Avenida Paulista, Bela Vista, São Paulo".into()))
    }

    async fn search(&self, query: &str) -> Result<Vec<GeocodedResult>, Error> {
        Ok(self
            .0
            .iter()
            .filter(|result| result.display_name.contains(query))
            .cloned()
            .collect())
    }
}

/// Advisory backend that is always down.
pub struct Offline;

#[async_trait]
impl AnalysisBackend for Offline {
    async fn analyze(&self, _context: &str) -> Result<RiskAnalysis, Error> {
        Err(upstream_error())
    }
}
