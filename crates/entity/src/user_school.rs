use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Education history entry.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_schools")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub user_id: String,

    pub institution: String,
    pub department: String,
    pub degree: String,

    pub start_month: Option<i32>,
    pub start_year: Option<i32>,
    pub end_month: Option<i32>,
    pub end_year: Option<i32>,
    pub ongoing: bool,

    /// Display position within the user's list.
    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
