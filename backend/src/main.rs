//! SpatialGPT server binary

use std::{net::SocketAddr, sync::Arc};

use spatialgpt_backend::{
    create_app,
    external::{NominatimClient, OpenMeteoClient, OverpassClient},
    services::{
        llm::ModelRegistry, ChatService, LocalBlobStore, PlacesService, VisualizationService,
    },
    tools::ToolRegistry,
    AppState, Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "spatialgpt_server=debug,spatialgpt_backend=debug,tower_http=debug".into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    if config.log.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting SpatialGPT Server");
    tracing::info!("Environment: {}", config.environment);
    if config.llm.api_key.is_empty() {
        tracing::warn!("LLM API key is not set; chat requests will fail");
    }

    // One connection pool for every provider
    let http = reqwest::Client::new();
    let open_meteo = OpenMeteoClient::with_client(http.clone(), config.open_meteo.clone());
    let nominatim = NominatimClient::with_client(http.clone(), &config.geocoding);
    let overpass = OverpassClient::with_client(http.clone(), &config.overpass);

    let models = ModelRegistry::from_config(&config.llm, http);
    let tools = ToolRegistry::standard(open_meteo.clone(), nominatim.clone(), overpass.clone());

    // Create application state
    let state = AppState {
        config: Arc::new(config.clone()),
        chat: ChatService::new(models, tools, config.llm.max_steps),
        visualization: VisualizationService::new(open_meteo, &config.cache),
        places: PlacesService::new(nominatim, overpass),
        blobs: Arc::new(LocalBlobStore::new(&config.storage)),
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
