use sea_orm::DatabaseConnection;
use serde::Serialize;

use migration::{Migrator, MigratorTrait};

use crate::error::{internal_error, ApiResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationSummary {
    pub applied: usize,
    pub pending: usize,
    pub applied_now: usize,
    pub done: bool,
    pub next: Option<String>,
}

async fn summarize(db: &DatabaseConnection, applied_now: usize) -> ApiResult<MigrationSummary> {
    let applied = Migrator::get_applied_migrations(db)
        .await
        .map_err(|e| internal_error("Failed to read applied migrations", &e))?;
    let pending = Migrator::get_pending_migrations(db)
        .await
        .map_err(|e| internal_error("Failed to read pending migrations", &e))?;

    Ok(MigrationSummary {
        applied: applied.len(),
        pending: pending.len(),
        applied_now,
        done: pending.is_empty(),
        next: pending.first().map(|m| m.name().to_string()),
    })
}

pub async fn migration_status(db: &DatabaseConnection) -> ApiResult<MigrationSummary> {
    summarize(db, 0).await
}

/// Applies up to `steps` pending migrations, or all of them.
pub async fn migrate_up(
    db: &DatabaseConnection,
    steps: Option<u32>,
) -> ApiResult<MigrationSummary> {
    let pending_before = Migrator::get_pending_migrations(db)
        .await
        .map_err(|e| internal_error("Failed to read pending migrations", &e))?;

    if !pending_before.is_empty() {
        Migrator::up(db, steps)
            .await
            .map_err(|e| internal_error("Failed to apply migrations", &e))?;
    }

    let pending_after = Migrator::get_pending_migrations(db)
        .await
        .map_err(|e| internal_error("Failed to read pending migrations", &e))?;
    let applied_now = pending_before.len().saturating_sub(pending_after.len());

    tracing::info!(applied_now, pending = pending_after.len(), "migrations applied");
    summarize(db, applied_now).await
}

/// Rolls back `steps` migrations (default 1). The preprint divorce refuses.
pub async fn migrate_down(
    db: &DatabaseConnection,
    steps: Option<u32>,
) -> ApiResult<MigrationSummary> {
    let steps = steps.filter(|n| *n > 0).unwrap_or(1);
    Migrator::down(db, Some(steps))
        .await
        .map_err(|e| internal_error("Failed to roll back migrations", &e))?;

    tracing::info!(steps, "migrations rolled back");
    summarize(db, 0).await
}
