pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod templates;

use std::sync::Arc;
use config::Config;
use llm::Summarizer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub summarizer: Arc<dyn Summarizer>,
}

/// Installs the global tracing subscriber. Safe to call more than once.
pub fn setup_logging() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}
