use std::sync::Arc;
use tokio::net::TcpListener;
use yt_summarizer::{
    config::Config,
    api::routes::create_router,
    llm::GeminiClient,
    setup_logging,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging();

    let config = Config::load()?;
    tracing::debug!(?config, "Loaded configuration");
    let server_addr = config.server_addr;

    // One client for the whole process
    let gemini = GeminiClient::from_config(&config)?;
    tracing::info!(model = gemini.model(), "Using Gemini model");

    let app_state = AppState {
        config: Arc::new(config),
        summarizer: Arc::new(gemini),
    };

    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    tracing::info!("Listening on {}", server_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
