use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A person with a profile. Unregistered users are placeholders created by
/// another user (e.g. when adding a contributor by email).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Primary email, lowercased. Unregistered users may have none.
    #[sea_orm(unique)]
    pub username: Option<String>,

    pub fullname: String,

    // Bibliographic name parts.
    pub given_name: String,
    pub middle_names: String,
    pub family_name: String,
    pub suffix: String,

    pub timezone: String,
    pub locale: String,

    /// Provider key -> handle or list of handles.
    pub social: Json,

    /// Verification token -> unconfirmed email.
    pub email_verifications: Json,

    pub is_registered: bool,
    pub registered_by_id: Option<String>,

    /// Unix timestamp (seconds).
    pub date_registered: i64,
    pub date_confirmed: Option<i64>,
    pub date_disabled: Option<i64>,

    /// Unix timestamp (seconds).
    pub created_at: i64,

    /// Unix timestamp (seconds).
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_disabled(&self) -> bool {
        self.date_disabled.is_some()
    }

    pub fn is_confirmed(&self) -> bool {
        self.date_confirmed.is_some()
    }

    /// Registered, confirmed and not disabled.
    pub fn is_active(&self) -> bool {
        self.is_registered && self.is_confirmed() && !self.is_disabled()
    }
}
