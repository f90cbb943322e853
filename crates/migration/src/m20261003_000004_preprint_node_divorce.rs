use sea_orm_migration::prelude::*;

use crate::preprint_divorce::{divorce_preprints_from_nodes, BATCH_SIZE};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Must run after m20261002_000003_preprint_tables, exactly once.
        let report = divorce_preprints_from_nodes(manager.get_connection(), BATCH_SIZE).await?;

        tracing::info!(
            preprints = report.preprints_rehomed,
            backfilled = report.preprints_backfilled,
            contributors = report.contributors_created,
            memberships = report.group_memberships_added,
            batches = report.insert_batches.len(),
            links = report.links_severed,
            "preprint/node divorce applied"
        );

        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        Err(DbErr::Migration(
            "preprint/node divorce is a forward-only data migration".to_string(),
        ))
    }
}
