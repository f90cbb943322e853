use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-node addon configuration, optionally attached to an external account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "node_addon_settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub node_id: String,
    pub provider: String,
    pub external_account_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
