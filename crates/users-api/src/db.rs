use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::ApiConfig;
use crate::error::ApiError;

pub async fn db_connect(config: &ApiConfig) -> Result<DatabaseConnection, ApiError> {
    let mut options = ConnectOptions::new(config.database_url.clone());

    // Keep the pool small and timeouts short. An in-memory SQLite database
    // lives only as long as its connection, so at least one stays open.
    options.max_connections(config.db_max_connections);
    options.min_connections(1);
    options.connect_timeout(config.db_timeout);
    options.acquire_timeout(config.db_timeout);
    options.idle_timeout(Duration::from_secs(300));
    options.sqlx_logging(false);

    tracing::debug!(max_connections = config.db_max_connections, "opening database pool");
    Ok(Database::connect(options).await?)
}
