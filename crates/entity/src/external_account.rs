use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// OAuth account on a third-party storage provider, owned by one user.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "external_accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub owner_id: String,

    /// Addon short name, e.g. `github`.
    pub provider: String,
    pub provider_id: String,
    pub display_name: Option<String>,

    /// Unix timestamp (seconds).
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
