#![allow(dead_code)]

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ConnectOptions, Database, DatabaseConnection, Set,
};

use entity::{
    external_account, institution, node, node_addon_settings, node_contributor, user,
    user_addon_settings, user_institution,
};
use users_api::config::ApiConfig;
use users_api::context::RequestContext;

pub async fn test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("apply migrations");
    db
}

pub fn config(dev_mode: bool) -> Arc<ApiConfig> {
    let mut cfg = ApiConfig::new("sqlite::memory:");
    cfg.api_base_url = "https://api.example.org/v2/".to_string();
    cfg.web_base_url = "https://example.org/".to_string();
    cfg.dev_mode = dev_mode;
    Arc::new(cfg)
}

pub fn ctx_as(actor: &user::Model) -> RequestContext {
    RequestContext::new(config(false)).with_actor(actor.clone())
}

pub fn anonymous() -> RequestContext {
    RequestContext::new(config(false))
}

pub async fn add_user(db: &DatabaseConnection, id: &str) -> user::Model {
    user::ActiveModel {
        id: Set(id.to_string()),
        username: Set(Some(format!("{id}@example.org"))),
        fullname: Set(format!("User {id}")),
        given_name: Set("User".to_string()),
        middle_names: Set(String::new()),
        family_name: Set(id.to_string()),
        suffix: Set(String::new()),
        timezone: Set("Etc/UTC".to_string()),
        locale: Set("en_US".to_string()),
        social: Set(serde_json::json!({})),
        email_verifications: Set(serde_json::json!({})),
        is_registered: Set(true),
        registered_by_id: Set(None),
        date_registered: Set(1_500_000_000),
        date_confirmed: Set(Some(1_500_000_000)),
        date_disabled: Set(None),
        created_at: Set(1_500_000_000),
        updated_at: Set(1_500_000_000),
    }
    .insert(db)
    .await
    .expect("insert user")
}

pub async fn add_node(db: &DatabaseConnection, id: &str, deleted: bool) {
    node::ActiveModel {
        id: Set(id.to_string()),
        title: Set(format!("Project {id}")),
        description: Set(None),
        creator_id: Set(None),
        is_registration: Set(false),
        is_deleted: Set(deleted),
        created: Set(1_600_000_000),
        modified: Set(1_600_000_000),
    }
    .insert(db)
    .await
    .expect("insert node");
}

pub async fn add_contributor(db: &DatabaseConnection, node_id: &str, user_id: &str) {
    node_contributor::ActiveModel {
        id: NotSet,
        node_id: Set(node_id.to_string()),
        user_id: Set(user_id.to_string()),
        admin: Set(false),
        write: Set(true),
        read: Set(true),
        visible: Set(true),
        sort_order: Set(0),
    }
    .insert(db)
    .await
    .expect("insert contributor");
}

pub async fn add_institution(db: &DatabaseConnection, id: &str, name: &str) {
    institution::ActiveModel {
        id: Set(id.to_string()),
        name: Set(name.to_string()),
        created_at: Set(1_500_000_000),
    }
    .insert(db)
    .await
    .expect("insert institution");
}

pub async fn affiliate(db: &DatabaseConnection, user_id: &str, institution_id: &str) {
    user_institution::ActiveModel {
        user_id: Set(user_id.to_string()),
        institution_id: Set(institution_id.to_string()),
    }
    .insert(db)
    .await
    .expect("insert affiliation");
}

pub async fn add_user_addon(
    db: &DatabaseConnection,
    owner_id: &str,
    provider: &str,
    uses_external_accounts: bool,
) {
    user_addon_settings::ActiveModel {
        id: NotSet,
        owner_id: Set(owner_id.to_string()),
        provider: Set(provider.to_string()),
        has_auth: Set(true),
        uses_external_accounts: Set(uses_external_accounts),
    }
    .insert(db)
    .await
    .expect("insert user addon");
}

pub async fn add_external_account(db: &DatabaseConnection, id: &str, owner_id: &str, provider: &str) {
    external_account::ActiveModel {
        id: Set(id.to_string()),
        owner_id: Set(owner_id.to_string()),
        provider: Set(provider.to_string()),
        provider_id: Set(format!("remote-{id}")),
        display_name: Set(None),
        created_at: Set(1_500_000_000),
    }
    .insert(db)
    .await
    .expect("insert external account");
}

pub async fn connect_node_addon(
    db: &DatabaseConnection,
    node_id: &str,
    provider: &str,
    account_id: &str,
) {
    node_addon_settings::ActiveModel {
        id: NotSet,
        node_id: Set(node_id.to_string()),
        provider: Set(provider.to_string()),
        external_account_id: Set(Some(account_id.to_string())),
    }
    .insert(db)
    .await
    .expect("insert node addon");
}
