use std::sync::Arc;

use anyhow::Context;

use classroom_api::app::{self, services::AppServices};
use classroom_api::config::ApiConfig;
use classroom_infra::{CatalogSeed, InMemoryCatalog};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env().context("invalid configuration")?;
    classroom_observability::init_with(config.log_format);

    let catalog = match &config.seed_file {
        Some(path) => {
            let catalog = CatalogSeed::from_path(path)
                .and_then(CatalogSeed::into_catalog)
                .with_context(|| format!("failed to load catalog seed {}", path.display()))?;
            tracing::info!(path = %path.display(), "catalog seeded");
            catalog
        }
        None => {
            tracing::warn!("no catalog seed configured; starting with an empty catalog");
            InMemoryCatalog::new()
        }
    };

    let services = Arc::new(AppServices::new(catalog));
    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
