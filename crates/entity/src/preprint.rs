use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Preprint submission. Descriptive fields were historically read from the
/// linked node and are owned by the preprint after the divorce migration.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "preprints")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: Option<String>,
    pub description: Option<String>,
    pub creator_id: Option<String>,

    pub is_published: bool,

    /// Unix timestamp (seconds).
    pub created: i64,

    /// Unix timestamp (seconds).
    pub modified: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
