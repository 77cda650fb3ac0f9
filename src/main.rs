use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use clinic_front::app;
use clinic_front::config::AppConfig;
use clinic_front::db;
use clinic_front::services::backend::HttpAppointmentApi;
use clinic_front::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    tracing::info!("account store ready at {}", config.database_url);

    tracing::info!("using appointment API at {}", config.backend_api);
    let api = HttpAppointmentApi::new(config.backend_api.clone());

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        api: Box::new(api),
    });

    let app = app::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
