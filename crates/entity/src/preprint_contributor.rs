use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Contributor of a preprint. Permissions live in `permission_groups`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "preprint_contributors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub preprint_id: String,
    pub user_id: String,

    pub visible: bool,
    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
