use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Permission tier of one preprint (`admin`, `write` or `read`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "permission_groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// `preprint_<preprint id>_<permission>`.
    #[sea_orm(unique)]
    pub name: String,

    pub preprint_id: String,
    pub permission: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
