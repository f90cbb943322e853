use std::collections::BTreeSet;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde_json::Value;

use entity::{institution, user, user_institution};

use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::serializers::institutions::{user_institutions_relationship_json, INSTITUTION_TYPE};

async fn ensure_user<C>(db: &C, user_id: &str) -> ApiResult<()>
where
    C: ConnectionTrait,
{
    user::Entity::find_by_id(user_id.to_string())
        .one(db)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApiError::NotFound(format!("User `{user_id}` not found.")))
}

pub async fn institutions_for_user<C>(db: &C, user_id: &str) -> ApiResult<Vec<institution::Model>>
where
    C: ConnectionTrait,
{
    let ids: Vec<String> = user_institution::Entity::find()
        .filter(user_institution::Column::UserId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|l| l.institution_id)
        .collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    Ok(institution::Entity::find()
        .filter(institution::Column::Id.is_in(ids))
        .order_by_asc(institution::Column::Name)
        .all(db)
        .await?)
}

/// Institution ids named by a relationship payload
/// `{"data": [{"type": "institutions", "id": ...}]}`.
fn relationship_ids(payload: &Value) -> ApiResult<BTreeSet<String>> {
    let data = payload
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::Validation("Request must include /data as a list.".to_string()))?;

    let mut ids = BTreeSet::new();
    for item in data {
        match item.get("type").and_then(Value::as_str) {
            Some(INSTITUTION_TYPE) => {}
            Some(other) => {
                return Err(ApiError::Conflict(format!(
                    "Resource type `{other}` does not match `{INSTITUTION_TYPE}`."
                )))
            }
            None => {
                return Err(ApiError::Validation(
                    "Request must include /data/type.".to_string(),
                ))
            }
        }
        let id = item
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::Validation("Request must include /data/id.".to_string()))?;
        ids.insert(id.to_string());
    }
    Ok(ids)
}

async fn ensure_institutions_exist<C>(db: &C, ids: &BTreeSet<String>) -> ApiResult<()>
where
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(());
    }
    let found: BTreeSet<String> = institution::Entity::find()
        .filter(institution::Column::Id.is_in(ids.iter().cloned()))
        .all(db)
        .await?
        .into_iter()
        .map(|i| i.id)
        .collect();

    match ids.difference(&found).next() {
        Some(missing) => Err(ApiError::NotFound(format!(
            "Institution `{missing}` not found."
        ))),
        None => Ok(()),
    }
}

pub async fn get_user_institutions<C>(
    db: &C,
    ctx: &RequestContext,
    user_id: &str,
) -> ApiResult<Value>
where
    C: ConnectionTrait,
{
    ensure_user(db, user_id).await?;
    let institutions = institutions_for_user(db, user_id).await?;
    Ok(user_institutions_relationship_json(&ctx.urls(), user_id, &institutions))
}

/// Affiliates the user with each listed institution. Existing affiliations are kept.
pub async fn add_user_institutions<C>(
    db: &C,
    ctx: &RequestContext,
    user_id: &str,
    payload: &Value,
) -> ApiResult<Value>
where
    C: ConnectionTrait,
{
    ctx.require_self(user_id)?;
    let ids = relationship_ids(payload)?;
    ensure_institutions_exist(db, &ids).await?;

    let current: BTreeSet<String> = institutions_for_user(db, user_id)
        .await?
        .into_iter()
        .map(|i| i.id)
        .collect();

    let new_links: Vec<user_institution::ActiveModel> = ids
        .difference(&current)
        .map(|id| user_institution::ActiveModel {
            user_id: Set(user_id.to_string()),
            institution_id: Set(id.clone()),
        })
        .collect();

    if !new_links.is_empty() {
        let added = new_links.len();
        user_institution::Entity::insert_many(new_links)
            .exec_without_returning(db)
            .await?;
        tracing::info!(user_id, added, "institution affiliations added");
    }

    get_user_institutions(db, ctx, user_id).await
}

pub async fn remove_user_institutions<C>(
    db: &C,
    ctx: &RequestContext,
    user_id: &str,
    payload: &Value,
) -> ApiResult<Value>
where
    C: ConnectionTrait,
{
    ctx.require_self(user_id)?;
    let ids = relationship_ids(payload)?;
    ensure_institutions_exist(db, &ids).await?;

    if !ids.is_empty() {
        let res = user_institution::Entity::delete_many()
            .filter(user_institution::Column::UserId.eq(user_id))
            .filter(user_institution::Column::InstitutionId.is_in(ids))
            .exec(db)
            .await?;
        tracing::info!(user_id, removed = res.rows_affected, "institution affiliations removed");
    }

    get_user_institutions(db, ctx, user_id).await
}
