use axum::extract::{Extension, Json, Path, Query};
use serde::{Deserialize, Serialize};

use crate::{
    api::DynAPI,
    catalog::{AlertsView, MobilityTab, MobilityView, ProfileView, ShellView},
    entities::View,
    error::Error,
};

#[derive(Serialize, Deserialize)]
pub struct MobilityParams {
    #[serde(default)]
    tab: MobilityTab,
}

pub async fn shell(Extension(api): Extension<DynAPI>) -> Result<Json<ShellView>, Error> {
    let view = api.shell(View::default()).await?;

    Ok(view.into())
}

pub async fn resolve(
    Extension(api): Extension<DynAPI>,
    Path(name): Path<String>,
) -> Result<Json<ShellView>, Error> {
    let view = api.shell(View::from_path(&name)).await?;

    Ok(view.into())
}

pub async fn mobility(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<MobilityParams>,
) -> Result<Json<MobilityView>, Error> {
    let view = api.mobility(params.tab).await?;

    Ok(view.into())
}

pub async fn alerts(Extension(api): Extension<DynAPI>) -> Result<Json<AlertsView>, Error> {
    let view = api.alerts().await?;

    Ok(view.into())
}

pub async fn profile(Extension(api): Extension<DynAPI>) -> Result<Json<ProfileView>, Error> {
    let view = api.profile().await?;

    Ok(view.into())
}
