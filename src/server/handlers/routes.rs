use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};

use crate::{api::DynAPI, entities::GeocodedResult, error::Error, planner::RoutesView};

#[derive(Serialize, Deserialize)]
pub struct SearchParams {
    query: String,
}

#[derive(Serialize, Deserialize)]
pub struct SaveDialogParams {
    open: bool,
}

#[derive(Serialize, Deserialize)]
pub struct SaveParams {
    name: String,
}

#[derive(Serialize, Deserialize)]
pub struct NavigationAck {
    started: bool,
    message: Option<String>,
}

pub async fn find(Extension(api): Extension<DynAPI>) -> Result<Json<RoutesView>, Error> {
    let view = api.routes().await?;

    Ok(view.into())
}

pub async fn locate(Extension(api): Extension<DynAPI>) -> Result<Json<RoutesView>, Error> {
    let view = api.locate().await?;

    Ok(view.into())
}

pub async fn dismiss_banner(
    Extension(api): Extension<DynAPI>,
) -> Result<Json<RoutesView>, Error> {
    let view = api.dismiss_routes_banner().await?;

    Ok(view.into())
}

pub async fn search(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<SearchParams>,
) -> Result<Json<RoutesView>, Error> {
    let view = api.search(params.query).await?;

    Ok(view.into())
}

pub async fn add_waypoint(
    Extension(api): Extension<DynAPI>,
    Json(result): Json<GeocodedResult>,
) -> Result<Json<RoutesView>, Error> {
    let view = api.add_waypoint(result).await?;

    Ok(view.into())
}

pub async fn remove_waypoint(
    Extension(api): Extension<DynAPI>,
    Path(index): Path<usize>,
) -> Result<Json<RoutesView>, Error> {
    let view = api.remove_waypoint(index).await?;

    Ok(view.into())
}

pub async fn reset(Extension(api): Extension<DynAPI>) -> Result<Json<RoutesView>, Error> {
    let view = api.reset_route().await?;

    Ok(view.into())
}

pub async fn save_dialog(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<SaveDialogParams>,
) -> Result<Json<RoutesView>, Error> {
    let view = api.set_save_dialog(params.open).await?;

    Ok(view.into())
}

pub async fn save(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<SaveParams>,
) -> Result<Json<RoutesView>, Error> {
    let view = api.save_current_route(params.name).await?;

    Ok(view.into())
}

pub async fn delete_saved(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<String>,
) -> Result<Json<RoutesView>, Error> {
    let view = api.delete_saved_route(id).await?;

    Ok(view.into())
}

pub async fn load_saved(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<String>,
) -> Result<Json<RoutesView>, Error> {
    let view = api.load_saved_route(id).await?;

    Ok(view.into())
}

pub async fn start_navigation(
    Extension(api): Extension<DynAPI>,
) -> Result<Json<NavigationAck>, Error> {
    let message = api.start_navigation().await?;

    Ok(NavigationAck {
        started: message.is_some(),
        message,
    }
    .into())
}
