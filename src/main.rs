use flood_backend::{router, AppConfig, AppState, StationDirectory};
use log::info;
use std::sync::Arc;

const BIND_ADDR: &str = "0.0.0.0:8118";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let config = AppConfig::from_env();
    info!("Starting {}", config.app_name);

    let stations = StationDirectory::bundled()?;
    info!("Loaded {} reference stations", stations.stations().len());

    let state = Arc::new(AppState::new(config, stations));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(BIND_ADDR).await?;
    info!("Listening on {BIND_ADDR}");
    axum::serve(listener, app).await?;
    Ok(())
}
