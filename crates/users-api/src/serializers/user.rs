use std::collections::HashSet;

use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use entity::{node, node_contributor, user};

use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::social::{SocialAccounts, SocialProvider};
use crate::urls::Urls;
use crate::util::ts_to_rfc3339;

pub const USER_TYPE: &str = "users";

/// Attributes clients may filter user lists on.
pub const FILTERABLE_FIELDS: [&str; 5] = ["full_name", "given_name", "middle_names", "family_name", "id"];

pub const DEFAULT_PROFILE_IMAGE_SIZE: u32 = 25;
const MAX_PROFILE_IMAGE_SIZE: u32 = 2048;

/// Gravatar URL keyed by the SHA-256 of the user's primary email.
pub fn profile_image_url(user: &user::Model, size: Option<&str>) -> String {
    let size = size
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|s| (1..=MAX_PROFILE_IMAGE_SIZE).contains(s))
        .unwrap_or(DEFAULT_PROFILE_IMAGE_SIZE);

    let identity = user
        .username
        .as_deref()
        .map(|u| u.trim().to_lowercase())
        .unwrap_or_else(|| user.id.clone());
    let digest = hex::encode(Sha256::digest(identity.as_bytes()));

    format!("https://secure.gravatar.com/avatar/{digest}?d=identicon&s={size}")
}

/// The `social` attribute: a self link plus one URL list per provider.
pub fn social_links_json(user: &user::Model, urls: &Urls) -> Value {
    let accounts = SocialAccounts::from_stored(&user.social);

    let mut out = Map::new();
    out.insert("self".to_string(), Value::String(urls.user_detail(&user.id)));
    for provider in SocialProvider::ALL {
        out.insert(
            provider.link_field().to_string(),
            Value::from(accounts.links(provider)),
        );
    }
    Value::Object(out)
}

async fn project_ids<C>(db: &C, user_id: &str) -> Result<HashSet<String>, DbErr>
where
    C: ConnectionTrait,
{
    let node_ids: Vec<String> = node_contributor::Entity::find()
        .filter(node_contributor::Column::UserId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|c| c.node_id)
        .collect();
    if node_ids.is_empty() {
        return Ok(HashSet::new());
    }

    Ok(node::Entity::find()
        .filter(node::Column::Id.is_in(node_ids))
        .filter(node::Column::IsDeleted.eq(false))
        .filter(node::Column::IsRegistration.eq(false))
        .all(db)
        .await?
        .into_iter()
        .map(|n| n.id)
        .collect())
}

/// Projects shown as "in common" on a profile. Viewing yourself counts all of
/// your projects; anonymous viewers share none.
pub async fn projects_in_common<C>(
    db: &C,
    viewed: &user::Model,
    requester: Option<&user::Model>,
) -> Result<usize, DbErr>
where
    C: ConnectionTrait,
{
    let Some(requester) = requester else {
        return Ok(0);
    };

    let mine = project_ids(db, &requester.id).await?;
    if requester.id == viewed.id {
        return Ok(mine.len());
    }

    let theirs = project_ids(db, &viewed.id).await?;
    Ok(mine.intersection(&theirs).count())
}

fn related(href: String, meta: Value) -> Value {
    serde_json::json!({ "href": href, "meta": meta })
}

/// JSON-API `users` resource. Disabled accounts only expose their name parts.
pub async fn user_json<C>(db: &C, ctx: &RequestContext, user: &user::Model) -> ApiResult<Value>
where
    C: ConnectionTrait,
{
    let urls = ctx.urls();

    if user.is_disabled() {
        return Ok(serde_json::json!({
            "id": user.id,
            "type": USER_TYPE,
            "attributes": {
                "full_name": user.fullname,
                "given_name": user.given_name,
                "middle_names": user.middle_names,
                "family_name": user.family_name,
            },
        }));
    }

    let in_common = projects_in_common(db, user, ctx.actor.as_ref()).await?;

    let mut relationships = Map::new();
    relationships.insert(
        "nodes".to_string(),
        serde_json::json!({
            "links": {
                "related": related(
                    urls.user_nodes(&user.id),
                    serde_json::json!({ "projects_in_common": in_common }),
                ),
            }
        }),
    );
    relationships.insert(
        "institutions".to_string(),
        serde_json::json!({
            "links": {
                "related": related(urls.user_institutions(&user.id), serde_json::json!({})),
                "self": related(urls.user_institutions_relationship(&user.id), serde_json::json!({})),
            }
        }),
    );
    if ctx.config.dev_mode {
        for (name, href) in [
            ("registrations", urls.user_registrations(&user.id)),
            ("education", urls.user_education(&user.id)),
            ("employment", urls.user_employment(&user.id)),
        ] {
            relationships.insert(
                name.to_string(),
                serde_json::json!({ "links": { "related": related(href, serde_json::json!({})) } }),
            );
        }
    }

    Ok(serde_json::json!({
        "id": user.id,
        "type": USER_TYPE,
        "attributes": {
            "full_name": user.fullname,
            "given_name": user.given_name,
            "middle_names": user.middle_names,
            "family_name": user.family_name,
            "suffix": user.suffix,
            "date_registered": ts_to_rfc3339(user.date_registered),
            "active": user.is_active(),
            "timezone": user.timezone,
            "locale": user.locale,
            "social": social_links_json(user, &urls),
        },
        "relationships": Value::Object(relationships),
        "links": {
            "self": urls.user_detail(&user.id),
            "html": urls.user_profile_page(&user.id),
            "profile_image": profile_image_url(user, ctx.query_param("profile_image_size")),
        },
    }))
}

/// Case-insensitive exact match on one of [`FILTERABLE_FIELDS`], as a
/// condition for a `users` query.
pub fn filter_condition(field: &str, value: &str) -> ApiResult<SimpleExpr> {
    let column = match field {
        "full_name" => user::Column::Fullname,
        "given_name" => user::Column::GivenName,
        "middle_names" => user::Column::MiddleNames,
        "family_name" => user::Column::FamilyName,
        "id" => user::Column::Id,
        other => {
            return Err(ApiError::Validation(format!(
                "`{other}` is not a filterable field."
            )))
        }
    };
    Ok(Expr::expr(Func::lower(Expr::col((user::Entity, column))))
        .eq(value.trim().to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, QueryTrait};
    use serde_json::json;

    use super::*;

    fn sample() -> user::Model {
        user::Model {
            id: "abc12".into(),
            username: Some("Someone@Example.org".into()),
            fullname: "Some One".into(),
            given_name: "Some".into(),
            middle_names: String::new(),
            family_name: "One".into(),
            suffix: String::new(),
            timezone: "Etc/UTC".into(),
            locale: "en_US".into(),
            social: json!({ "github": "someone", "orcid": ["0000-0001", "0000-0002"] }),
            email_verifications: json!({}),
            is_registered: true,
            registered_by_id: None,
            date_registered: 0,
            date_confirmed: Some(0),
            date_disabled: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn social_object_lists_every_provider() {
        let urls = Urls::new("https://api.example.org/v2/", "https://example.org/");
        let social = social_links_json(&sample(), &urls);

        assert_eq!(social["self"], "https://api.example.org/v2/users/abc12/");
        assert_eq!(social["github"], json!(["http://github.com/someone/"]));
        assert_eq!(
            social["orcid"],
            json!(["http://orcid.org/0000-0001", "http://orcid.org/0000-0002"])
        );
        assert_eq!(social["twitter"], json!([]));
        assert_eq!(social.as_object().unwrap().len(), 14);
    }

    #[test]
    fn profile_image_hashes_lowercased_email_and_honours_size() {
        let user = sample();
        let expected = hex::encode(Sha256::digest(b"someone@example.org"));
        assert_eq!(
            profile_image_url(&user, Some("200")),
            format!("https://secure.gravatar.com/avatar/{expected}?d=identicon&s=200")
        );
        assert!(profile_image_url(&user, Some("huge")).ends_with("&s=25"));
        assert!(profile_image_url(&user, None).ends_with("&s=25"));
    }

    #[test]
    fn filters_compare_lowercased_columns() {
        let cond = filter_condition("family_name", " One ").unwrap();
        let sql = user::Entity::find()
            .filter(cond)
            .build(DbBackend::Sqlite)
            .to_string();
        assert!(sql.contains(r#"LOWER("users"."family_name") = 'one'"#), "{sql}");

        assert!(matches!(
            filter_condition("locale", "en_US"),
            Err(ApiError::Validation(_))
        ));
    }
}
