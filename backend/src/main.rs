//! GeoRisk - Backend Server

use std::{net::SocketAddr, sync::Arc};

use georisk_backend::{
    create_app,
    external::{CatalogSet, GeospatialClient},
    services::{ProviderLimits, RiskEngine},
    AppState, Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "georisk_server=debug,georisk_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting GeoRisk Server");
    tracing::info!("Environment: {}", config.environment);

    // Load feature catalogs
    let catalogs = Arc::new(CatalogSet::load(&config.catalogs)?);

    // Measurement backend
    let client = GeospatialClient::new(
        config.provider.endpoint.clone(),
        config.provider.api_key.clone(),
        config.provider.timeout(),
        Arc::clone(&catalogs),
    )?;
    tracing::info!("Measurement provider: {}", config.provider.endpoint);

    let limits = ProviderLimits {
        max_concurrency: config.provider.max_concurrency,
        timeout: config.provider.timeout(),
    };
    let engine = RiskEngine::new(Arc::new(client), config.engine_settings(), limits)?;

    // Create application state
    let state = AppState {
        engine: Arc::new(engine),
        catalogs,
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
