use anyhow::Context;
use codegen_gateway::{
    build_router,
    config::Config,
    generator::CodeGenerator,
    groq::GroqClient,
    store::{MemoryStatusStore, MongoStatusStore, StatusStore},
    AppState,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Init tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = Config::from_env().context("invalid configuration")?;
    tracing::info!("Using API key: {}", config.masked_api_key());

    let store: Arc<dyn StatusStore> = match &config.mongo {
        Some(mongo) => Arc::new(MongoStatusStore::connect(&mongo.url, &mongo.database).await?),
        None => {
            tracing::warn!("MONGO_URL not set, status checks are kept in memory");
            Arc::new(MemoryStatusStore::new())
        }
    };
    let client = GroqClient::new(config.groq_api_key.clone(), config.groq_api_base.clone());
    let state = AppState {
        store: store.clone(),
        generator: Arc::new(CodeGenerator::new(Arc::new(client), config.groq_model.clone())),
    };

    tracing::info!("Upstream model: {}", state.generator.model());
    let app = build_router(state);

    let addr = SocketAddr::from(([0,0,0,0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await.with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "Starting server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => { sig.recv().await; }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
