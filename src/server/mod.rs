mod handlers;

use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{delete, get, patch, post},
    Router,
};

use crate::api::{DynAPI, API};
use crate::error::{server_error, Error};
use crate::server::handlers::{catalog, dashboard, routes};

pub fn router(api: DynAPI) -> Router {
    Router::new()
        .route("/", get(catalog::shell))
        .route("/views/:name", get(catalog::resolve))
        .route("/dashboard", get(dashboard::find))
        .route("/dashboard/refresh", post(dashboard::refresh))
        .route("/dashboard/banner", delete(dashboard::dismiss_banner))
        .route("/routes", get(routes::find))
        .route("/routes/locate", post(routes::locate))
        .route("/routes/banner", delete(routes::dismiss_banner))
        .route("/routes/search", post(routes::search))
        .route("/routes/waypoints", post(routes::add_waypoint))
        .route("/routes/waypoints/:index", delete(routes::remove_waypoint))
        .route("/routes/reset", post(routes::reset))
        .route("/routes/save_dialog", patch(routes::save_dialog))
        .route("/routes/saved", post(routes::save))
        .route("/routes/saved/:id", delete(routes::delete_saved))
        .route("/routes/saved/:id/load", post(routes::load_saved))
        .route("/routes/navigation", post(routes::start_navigation))
        .route("/mobility", get(catalog::mobility))
        .route("/alerts", get(catalog::alerts))
        .route("/profile", get(catalog::profile))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) -> Result<(), Error> {
    let listener = TcpListener::bind(addr).map_err(|err| {
        tracing::error!("unable to bind {}: {}", addr, err);
        server_error()
    })?;

    serve_listener(Arc::new(api) as DynAPI, listener).await
}

/// Serves on an already bound listener.
pub async fn serve_listener(api: DynAPI, listener: TcpListener) -> Result<(), Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("listening on {}", addr);
    }

    axum::Server::from_tcp(listener)
        .map_err(|err| {
            tracing::error!("unable to start server: {}", err);
            server_error()
        })?
        .serve(router(api).into_make_service())
        .await
        .map_err(|err| {
            tracing::error!("server stopped: {}", err);
            server_error()
        })
}
