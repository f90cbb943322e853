use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Contributor of a node. Exactly one of `admin`/`write`/`read` is expected
/// to be set; readers of this table apply admin > write > read precedence.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "node_contributors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub node_id: String,
    pub user_id: String,

    pub admin: bool,
    pub write: bool,
    pub read: bool,

    /// Listed in bibliographic citations.
    pub visible: bool,

    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
