use serde::Deserialize;
use serde_json::{Map, Value};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr,
};

use entity::{user, user::Entity as UserEntity};

use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::notifier::Notifier;
use crate::serializers::user::{filter_condition, user_json, USER_TYPE};
use crate::social::SocialUpdate;
use crate::util::{generate_guid, generate_token, now_ts};
use crate::validation::{normalize_email, validate_user};

const DUPLICATE_USERNAME: &str = "User with specified username already exists.";
const CONFIRMATION_TTL_SECS: i64 = 24 * 60 * 60;
const GUID_ATTEMPTS: u32 = 3;

const READ_ONLY_ATTRIBUTES: [&str; 3] = ["id", "date_registered", "active"];

#[derive(Debug, Default, Clone, Deserialize)]
pub struct UserCreate {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InsertConflict {
    Username,
    Id,
}

/// Which unique column an insert into `users` collided on, if any.
fn insert_conflict(err: &DbErr) -> Option<InsertConflict> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => Some(conflict_column(&msg)),
        _ => None,
    }
}

fn conflict_column(msg: &str) -> InsertConflict {
    if msg.contains("username") {
        InsertConflict::Username
    } else {
        InsertConflict::Id
    }
}

fn new_user_row(m: &user::Model) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(m.id.clone()),
        username: Set(m.username.clone()),
        fullname: Set(m.fullname.clone()),
        given_name: Set(m.given_name.clone()),
        middle_names: Set(m.middle_names.clone()),
        family_name: Set(m.family_name.clone()),
        suffix: Set(m.suffix.clone()),
        timezone: Set(m.timezone.clone()),
        locale: Set(m.locale.clone()),
        social: Set(m.social.clone()),
        email_verifications: Set(m.email_verifications.clone()),
        is_registered: Set(m.is_registered),
        registered_by_id: Set(m.registered_by_id.clone()),
        date_registered: Set(m.date_registered),
        date_confirmed: Set(m.date_confirmed),
        date_disabled: Set(m.date_disabled),
        created_at: Set(m.created_at),
        updated_at: Set(m.updated_at),
    }
}

async fn find_user<C>(db: &C, user_id: &str) -> ApiResult<user::Model>
where
    C: ConnectionTrait,
{
    UserEntity::find_by_id(user_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User `{user_id}` not found.")))
}

/// Registers an unregistered placeholder user on behalf of the requester.
pub async fn create_user<C>(
    db: &C,
    ctx: &RequestContext,
    notifier: &dyn Notifier,
    data: UserCreate,
) -> ApiResult<user::Model>
where
    C: ConnectionTrait,
{
    let actor = ctx.require_actor()?;

    let full_name = data
        .full_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            ApiError::Validation("A `full_name` is required to create a user.".to_string())
        })?
        .to_string();

    let username = match data.username.as_deref() {
        Some(raw) => normalize_email(raw).map_err(|e| ApiError::Validation(e.to_string()))?,
        None => None,
    };

    if let Some(email) = &username {
        let existing = UserEntity::find()
            .filter(user::Column::Username.eq(email.as_str()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ApiError::Conflict(DUPLICATE_USERNAME.to_string()));
        }
    }

    let now = now_ts();
    let token = generate_token();
    let mut email_verifications = Map::new();
    if let Some(email) = &username {
        email_verifications.insert(
            token.clone(),
            serde_json::json!({
                "email": email,
                "confirmed": false,
                "expiration": now + CONFIRMATION_TTL_SECS,
            }),
        );
    }

    let mut row = user::Model {
        id: generate_guid(),
        username: username.clone(),
        fullname: full_name,
        given_name: String::new(),
        middle_names: String::new(),
        family_name: String::new(),
        suffix: String::new(),
        timezone: "Etc/UTC".to_string(),
        locale: "en_US".to_string(),
        social: serde_json::json!({}),
        email_verifications: Value::Object(email_verifications),
        is_registered: false,
        registered_by_id: Some(actor.id.clone()),
        date_registered: now,
        date_confirmed: None,
        date_disabled: None,
        created_at: now,
        updated_at: now,
    };
    validate_user(&row).map_err(|e| ApiError::InvalidModelValue(e.to_string()))?;

    let mut attempt = 1;
    let created = loop {
        match new_user_row(&row).insert(db).await {
            Ok(u) => break u,
            Err(e) => match insert_conflict(&e) {
                Some(InsertConflict::Username) => {
                    return Err(ApiError::Conflict(DUPLICATE_USERNAME.to_string()))
                }
                Some(InsertConflict::Id) if attempt < GUID_ATTEMPTS => {
                    tracing::debug!(user_id = %row.id, attempt, "user id taken, drawing another");
                    row.id = generate_guid();
                    attempt += 1;
                }
                _ => return Err(ApiError::InvalidModelValue(e.to_string())),
            },
        }
    };

    tracing::info!(user_id = %created.id, registered_by = %actor.id, "unregistered user created");

    if let Some(email) = &username {
        if ctx.query_flag("send_email") {
            let confirm_url = ctx.urls().confirm_email(&created.id, &token);
            notifier
                .send_confirm_email(&created, email, &confirm_url)
                .await?;
        }
    }

    Ok(created)
}

pub async fn get_user<C>(db: &C, ctx: &RequestContext, user_id: &str) -> ApiResult<Value>
where
    C: ConnectionTrait,
{
    let user = find_user(db, user_id).await?;
    user_json(db, ctx, &user).await
}

/// Every user matching the `filter[<field>]` query parameters.
pub async fn list_users<C>(db: &C, ctx: &RequestContext) -> ApiResult<Vec<Value>>
where
    C: ConnectionTrait,
{
    let mut query = UserEntity::find();
    for (key, value) in &ctx.query {
        let Some(field) = key
            .strip_prefix("filter[")
            .and_then(|k| k.strip_suffix(']'))
        else {
            continue;
        };
        query = query.filter(filter_condition(field, value)?);
    }

    let users = query
        .order_by_asc(user::Column::CreatedAt)
        .order_by_asc(user::Column::Id)
        .all(db)
        .await?;

    let mut out = Vec::with_capacity(users.len());
    for user in &users {
        out.push(user_json(db, ctx, user).await?);
    }
    Ok(out)
}

fn text_attribute(key: &str, value: &Value) -> ApiResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok(String::new()),
        _ => Err(ApiError::Validation(format!("`{key}` must be a string."))),
    }
}

/// Checks the `data` member of a JSON-API document and returns its attributes.
fn document_attributes(payload: &Value, user_id: &str) -> ApiResult<Map<String, Value>> {
    let data = payload
        .get("data")
        .and_then(Value::as_object)
        .ok_or_else(|| ApiError::Validation("Request must include /data.".to_string()))?;

    match data.get("id").and_then(Value::as_str) {
        None => return Err(ApiError::Validation("Request must include /data/id.".to_string())),
        Some(id) if id != user_id => {
            return Err(ApiError::Conflict(format!(
                "Resource identifier `{id}` does not match the endpoint."
            )))
        }
        Some(_) => {}
    }

    match data.get("type").and_then(Value::as_str) {
        None => {
            return Err(ApiError::Validation(
                "Request must include /data/type.".to_string(),
            ))
        }
        Some(t) if t != USER_TYPE => {
            return Err(ApiError::Conflict(format!(
                "Resource type `{t}` does not match the endpoint type `{USER_TYPE}`."
            )))
        }
        Some(_) => {}
    }

    match data.get("attributes") {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(attrs)) => Ok(attrs.clone()),
        Some(_) => Err(ApiError::Validation(
            "`attributes` must be an object.".to_string(),
        )),
    }
}

/// Applies a `users` update document. `social` is merged key by key.
pub async fn update_user<C>(
    db: &C,
    ctx: &RequestContext,
    user_id: &str,
    payload: &Value,
) -> ApiResult<user::Model>
where
    C: ConnectionTrait,
{
    ctx.require_self(user_id)?;
    let attributes = document_attributes(payload, user_id)?;
    let existing = find_user(db, user_id).await?;

    let mut updated = existing.clone();
    for (key, value) in &attributes {
        match key.as_str() {
            "full_name" => updated.fullname = text_attribute(key, value)?,
            "given_name" => updated.given_name = text_attribute(key, value)?,
            "middle_names" => updated.middle_names = text_attribute(key, value)?,
            "family_name" => updated.family_name = text_attribute(key, value)?,
            "suffix" => updated.suffix = text_attribute(key, value)?,
            "timezone" => updated.timezone = text_attribute(key, value)?,
            "locale" => updated.locale = text_attribute(key, value)?,
            "social" => {
                let update = SocialUpdate::from_json(value)?;
                updated.social = update.apply_to(&updated.social);
            }
            k if READ_ONLY_ATTRIBUTES.contains(&k) => {
                return Err(ApiError::Validation(format!("`{k}` is read-only.")));
            }
            other => {
                tracing::debug!(user_id, attribute = other, "ignoring unknown attribute");
            }
        }
    }

    validate_user(&updated).map_err(|e| ApiError::InvalidModelValue(e.to_string()))?;

    let mut active: user::ActiveModel = existing.into();
    active.fullname = Set(updated.fullname);
    active.given_name = Set(updated.given_name);
    active.middle_names = Set(updated.middle_names);
    active.family_name = Set(updated.family_name);
    active.suffix = Set(updated.suffix);
    active.timezone = Set(updated.timezone);
    active.locale = Set(updated.locale);
    active.social = Set(updated.social);
    active.updated_at = Set(now_ts());

    let saved = active.update(db).await.map_err(|e| {
        tracing::warn!(user_id, error = %e, "user update rejected by the database");
        ApiError::InvalidModelValue(e.to_string())
    })?;

    tracing::info!(user_id = %saved.id, "user profile updated");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violations_are_told_apart_by_column() {
        assert_eq!(
            conflict_column("UNIQUE constraint failed: users.username"),
            InsertConflict::Username
        );
        assert_eq!(conflict_column("UNIQUE constraint failed: users.id"), InsertConflict::Id);
    }

    #[test]
    fn other_database_errors_are_not_conflicts() {
        assert_eq!(insert_conflict(&DbErr::Custom("disk full".to_string())), None);
    }
}
