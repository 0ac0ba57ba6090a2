


use anyhow::Result;
use sea_orm::DatabaseConnection;

use crate::db::{prepare, DatabaseConfig};
use crate::product::ProductFields;

/// Fresh in-memory SQLite with migrations applied.
pub(crate) async fn setup_sqlite() -> Result<DatabaseConnection> {
    prepare(&DatabaseConfig::in_memory_sqlite()).await
}

pub(crate) fn fields(name: &str, price: f64) -> ProductFields {
    ProductFields { name: name.to_string(), description: None, price, quantity: 0 }
}
