use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Legacy node <-> preprint linkage (node_preprints).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "node_preprints")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub node_id: String,

    #[sea_orm(primary_key, auto_increment = false)]
    pub preprint_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
