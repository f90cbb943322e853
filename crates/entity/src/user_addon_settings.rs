use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-user addon configuration.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_addon_settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub owner_id: String,
    pub provider: String,

    pub has_auth: bool,

    /// Addon authorizes through `external_accounts`.
    pub uses_external_accounts: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
