use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Project container. Registrations are nodes with `is_registration` set.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "nodes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,
    pub description: Option<String>,
    pub creator_id: Option<String>,

    pub is_registration: bool,
    pub is_deleted: bool,

    /// Unix timestamp (seconds).
    pub created: i64,

    /// Unix timestamp (seconds).
    pub modified: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
