//! Process bootstrap
//!
//! Builds the single store instance a process uses, from validated config.

use std::sync::Arc;

use configs::AppConfig;
use models::db::{prepare, DatabaseConfig};
use tracing::info;

use crate::product::{ProductService, SeaOrmProductRepository};

/// Connect, migrate, and construct the product service once.
pub async fn bootstrap(cfg: &AppConfig) -> anyhow::Result<ProductService<SeaOrmProductRepository>> {
    common::env::ensure_data_dir(&cfg.database.url).await?;
    let db = prepare(&DatabaseConfig::from(&cfg.database)).await?;
    models::db::test_connection(&db).await?;
    info!(sqlite = cfg.database.is_sqlite(), "product store constructed");
    Ok(ProductService::new(Arc::new(SeaOrmProductRepository::new(db))))
}
