use std::sync::Arc;

use crate::config::Config;
use formulaire2086_core::disposals::{DisposalService, DisposalServiceTrait};
use formulaire2086_storage_sqlite::{db, disposals::DisposalRepository};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub disposal_service: Arc<dyn DisposalServiceTrait + Send + Sync>,
}

/// Installs the global subscriber. `F2086_LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing() {
    let log_format = std::env::var("F2086_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
        if !log_format.eq_ignore_ascii_case("text") {
            tracing::warn!("Unknown F2086_LOG_FORMAT '{}', using text", log_format);
        }
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone())?;

    let repository = Arc::new(DisposalRepository::new(pool, writer));
    let disposal_service = Arc::new(DisposalService::new(repository));

    Ok(Arc::new(AppState { disposal_service }))
}
