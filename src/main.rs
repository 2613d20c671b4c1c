use urban_mobi::api::{DashboardAPI, RoutePlanningAPI};
use urban_mobi::config::Config;
use urban_mobi::engine::Engine;
use urban_mobi::error::Error;
use urban_mobi::server::serve;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let engine = Engine::from_config(&config).await?;

    // what the dashboard and the route map do when first shown
    engine.refresh_dashboard(false).await?;
    engine.locate().await?;

    serve(engine, config.listen_addr).await
}
