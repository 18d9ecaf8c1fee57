use axum::Router;
use shaperoute::config::Config;
use shaperoute::graph::{FsGraphProvider, GraphCache};
use shaperoute::output::FsOutputSink;
use shaperoute::services::RouteGenerator;
use shaperoute::template::FsTemplateStore;
use shaperoute::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shaperoute=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting ShapeRoute API server");
    config.ensure_dirs()?;
    tracing::info!("Data directories ready under {}", config.data_dir.display());

    // Wire collaborators
    let templates = Arc::new(FsTemplateStore::new(config.svg_dir()));
    let provider = Arc::new(FsGraphProvider::new(config.cache_dir()));
    let graphs = Arc::new(GraphCache::new(provider));
    let output = Arc::new(FsOutputSink::new(config.generated_dir()));
    let generator = RouteGenerator::new(templates, graphs, output);

    // Create application state
    let state = Arc::new(AppState { generator });

    // Build router with CORS and tracing
    let app = Router::new()
        .merge(shaperoute::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
