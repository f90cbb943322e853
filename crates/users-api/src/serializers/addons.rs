use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use serde_json::{Map, Value};

use entity::{external_account, node_addon_settings, user_addon_settings};

use crate::context::RequestContext;
use crate::error::ApiResult;

pub const USER_ADDON_TYPE: &str = "user_addons";

/// `{account_id: {"account": url, "nodes_connected": [urls]}}` for an addon
/// backed by external accounts.
async fn account_links<C>(
    db: &C,
    ctx: &RequestContext,
    settings: &user_addon_settings::Model,
) -> ApiResult<Value>
where
    C: ConnectionTrait,
{
    let mut out = Map::new();
    if !settings.uses_external_accounts {
        return Ok(Value::Object(out));
    }

    let urls = ctx.urls();
    let accounts = external_account::Entity::find()
        .filter(external_account::Column::OwnerId.eq(settings.owner_id.as_str()))
        .filter(external_account::Column::Provider.eq(settings.provider.as_str()))
        .order_by_asc(external_account::Column::CreatedAt)
        .all(db)
        .await?;

    for account in accounts {
        let nodes_connected: Vec<String> = node_addon_settings::Entity::find()
            .filter(node_addon_settings::Column::ExternalAccountId.eq(account.id.as_str()))
            .filter(node_addon_settings::Column::Provider.eq(settings.provider.as_str()))
            .order_by_asc(node_addon_settings::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(|n| urls.node_detail(&n.node_id))
            .collect();

        out.insert(
            account.id.clone(),
            serde_json::json!({
                "account": urls.user_external_account_detail(
                    &settings.owner_id,
                    &settings.provider,
                    &account.id,
                ),
                "nodes_connected": nodes_connected,
            }),
        );
    }

    Ok(Value::Object(out))
}

/// JSON-API `user_addons` resource, keyed by provider name.
pub async fn user_addon_json<C>(
    db: &C,
    ctx: &RequestContext,
    settings: &user_addon_settings::Model,
) -> ApiResult<Value>
where
    C: ConnectionTrait,
{
    let user_id = ctx.path_param("user_id")?;
    let accounts = account_links(db, ctx, settings).await?;

    Ok(serde_json::json!({
        "id": settings.provider,
        "type": USER_ADDON_TYPE,
        "attributes": {
            "user_has_auth": settings.has_auth,
        },
        "links": {
            "self": ctx.urls().user_addon_detail(user_id, &settings.provider),
            "accounts": accounts,
        },
    }))
}
