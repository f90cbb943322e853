use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use serde_json::Value;

use entity::user_addon_settings;

use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::serializers::addons::user_addon_json;

/// Addon settings are private to their owner.
pub async fn list_user_addons<C>(db: &C, ctx: &RequestContext) -> ApiResult<Vec<Value>>
where
    C: ConnectionTrait,
{
    let user_id = ctx.path_param("user_id")?;
    ctx.require_self(user_id)?;

    let settings = user_addon_settings::Entity::find()
        .filter(user_addon_settings::Column::OwnerId.eq(user_id))
        .order_by_asc(user_addon_settings::Column::Provider)
        .all(db)
        .await?;

    let mut out = Vec::with_capacity(settings.len());
    for s in &settings {
        out.push(user_addon_json(db, ctx, s).await?);
    }
    Ok(out)
}

pub async fn get_user_addon<C>(db: &C, ctx: &RequestContext, provider: &str) -> ApiResult<Value>
where
    C: ConnectionTrait,
{
    let user_id = ctx.path_param("user_id")?;
    ctx.require_self(user_id)?;

    let settings = user_addon_settings::Entity::find()
        .filter(user_addon_settings::Column::OwnerId.eq(user_id))
        .filter(user_addon_settings::Column::Provider.eq(provider))
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Addon `{provider}` is not enabled.")))?;

    user_addon_json(db, ctx, &settings).await
}
