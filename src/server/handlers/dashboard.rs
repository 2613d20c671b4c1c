use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::{api::DynAPI, dashboard::DashboardView, error::Error};

#[derive(Serialize, Deserialize)]
pub struct RefreshParams {
    #[serde(default)]
    force: bool,
}

pub async fn find(Extension(api): Extension<DynAPI>) -> Result<Json<DashboardView>, Error> {
    let view = api.dashboard().await?;

    Ok(view.into())
}

pub async fn dismiss_banner(
    Extension(api): Extension<DynAPI>,
) -> Result<Json<DashboardView>, Error> {
    let view = api.dismiss_dashboard_banner().await?;

    Ok(view.into())
}

pub async fn refresh(
    Extension(api): Extension<DynAPI>,
    params: Option<Json<RefreshParams>>,
) -> Result<Json<DashboardView>, Error> {
    let force = params.map(|Json(params)| params.force).unwrap_or(false);
    let view = api.refresh_dashboard(force).await?;

    Ok(view.into())
}
