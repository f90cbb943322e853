pub use sea_orm_migration::prelude::*;

mod m20261001_000001_users_tables;
mod m20261001_000002_nodes_tables;
mod m20261002_000003_preprint_tables;
mod m20261003_000004_preprint_node_divorce;

pub mod preprint_divorce;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_users_tables::Migration),
            Box::new(m20261001_000002_nodes_tables::Migration),
            Box::new(m20261002_000003_preprint_tables::Migration),
            Box::new(m20261003_000004_preprint_node_divorce::Migration),
        ]
    }
}
