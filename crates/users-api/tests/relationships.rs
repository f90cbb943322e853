mod common;

use serde_json::json;

use users_api::error::ApiError;
use users_api::handlers::addons::{get_user_addon, list_user_addons};
use users_api::handlers::history::{
    create_education, create_employment, list_education, list_employment, update_education,
    HistoryAttributes,
};
use users_api::handlers::institutions::{
    add_user_institutions, get_user_institutions, remove_user_institutions,
};

use common::{
    add_external_account, add_institution, add_node, add_user, add_user_addon, affiliate,
    anonymous, connect_node_addon, ctx_as, test_db,
};

fn institutions_payload(ids: &[&str]) -> serde_json::Value {
    let data: Vec<_> = ids
        .iter()
        .map(|id| json!({ "type": "institutions", "id": id }))
        .collect();
    json!({ "data": data })
}

#[tokio::test]
async fn institutions_relationship_lists_affiliations() {
    let db = test_db().await;
    add_user(&db, "me111").await;
    add_institution(&db, "cos", "Center for Open Science").await;
    add_institution(&db, "uva", "University of Virginia").await;
    affiliate(&db, "me111", "uva").await;

    let doc = get_user_institutions(&db, &anonymous(), "me111").await.unwrap();
    assert_eq!(doc["data"].as_array().unwrap().len(), 1);
    assert_eq!(doc["data"][0]["id"], "uva");
    assert_eq!(
        doc["data"][0]["links"]["self"],
        "https://api.example.org/v2/institutions/uva/"
    );
    assert_eq!(doc["links"]["html"], "https://api.example.org/v2/users/me111/institutions/");
}

#[tokio::test]
async fn institutions_can_be_added_and_removed() {
    let db = test_db().await;
    let me = add_user(&db, "me111").await;
    add_institution(&db, "cos", "Center for Open Science").await;
    add_institution(&db, "uva", "University of Virginia").await;
    affiliate(&db, "me111", "uva").await;
    let ctx = ctx_as(&me);

    let doc = add_user_institutions(&db, &ctx, "me111", &institutions_payload(&["cos", "uva"]))
        .await
        .unwrap();
    let ids: Vec<_> = doc["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["cos", "uva"]);

    let doc = remove_user_institutions(&db, &ctx, "me111", &institutions_payload(&["uva"]))
        .await
        .unwrap();
    assert_eq!(doc["data"].as_array().unwrap().len(), 1);
    assert_eq!(doc["data"][0]["id"], "cos");

    let err = add_user_institutions(&db, &ctx, "me111", &institutions_payload(&["nowhere"]))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn institutions_belong_to_their_user() {
    let db = test_db().await;
    add_user(&db, "me111").await;
    let other = add_user(&db, "other").await;
    add_institution(&db, "cos", "Center for Open Science").await;

    let err = add_user_institutions(&db, &ctx_as(&other), "me111", &institutions_payload(&["cos"]))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
}

fn attrs(value: serde_json::Value) -> HistoryAttributes {
    HistoryAttributes::from_json(&value).unwrap()
}

#[tokio::test]
async fn education_entries_are_validated_and_ordered() {
    let db = test_db().await;
    let me = add_user(&db, "me111").await;
    let ctx = ctx_as(&me);

    let first = create_education(
        &db,
        &ctx,
        "me111",
        &attrs(json!({
            "institution": "State University",
            "degree": "BSc",
            "start_month": 9,
            "start_year": 2010,
            "end_month": 6,
            "end_year": 2014,
        })),
    )
    .await
    .unwrap();
    assert_eq!(first["type"], "education");
    assert_eq!(first["attributes"]["degree"], "BSc");
    assert_eq!(first["links"]["html"], "https://example.org/me111/");

    create_education(
        &db,
        &ctx,
        "me111",
        &attrs(json!({ "institution": "Grad School", "start_year": 2015, "ongoing": true })),
    )
    .await
    .unwrap();

    let err = create_education(
        &db,
        &ctx,
        "me111",
        &attrs(json!({ "institution": "Bad Month U", "start_month": 13, "start_year": 2000 })),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidModelValue(_)));

    let listed = list_education(&db, &ctx, "me111").await.unwrap();
    let names: Vec<_> = listed
        .iter()
        .map(|e| e["attributes"]["institution"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["State University", "Grad School"]);

    let id = first["id"].as_str().unwrap();
    let updated = update_education(&db, &ctx, "me111", id, &attrs(json!({ "ongoing": true })))
        .await
        .unwrap();
    assert_eq!(updated["attributes"]["ongoing"], true);
    assert_eq!(updated["attributes"]["end_year"], serde_json::Value::Null);
    assert_eq!(updated["attributes"]["start_year"], 2010);
}

#[tokio::test]
async fn employment_rejects_end_before_start() {
    let db = test_db().await;
    let me = add_user(&db, "me111").await;
    let ctx = ctx_as(&me);

    let err = create_employment(
        &db,
        &ctx,
        "me111",
        &attrs(json!({
            "institution": "Lab",
            "title": "Researcher",
            "start_year": 2020,
            "end_year": 2019,
        })),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidModelValue(_)));

    let job = create_employment(
        &db,
        &ctx,
        "me111",
        &attrs(json!({ "institution": "Lab", "title": "Researcher", "start_year": 2020 })),
    )
    .await
    .unwrap();
    assert_eq!(job["type"], "employment");
    assert_eq!(job["attributes"]["title"], "Researcher");
    assert_eq!(list_employment(&db, &ctx, "me111").await.unwrap().len(), 1);
}

#[tokio::test]
async fn user_addons_link_accounts_and_connected_nodes() {
    let db = test_db().await;
    let me = add_user(&db, "me111").await;
    add_node(&db, "proj1", false).await;
    add_user_addon(&db, "me111", "github", true).await;
    add_user_addon(&db, "me111", "wiki", false).await;
    add_external_account(&db, "acc01", "me111", "github").await;
    connect_node_addon(&db, "proj1", "github", "acc01").await;

    let ctx = ctx_as(&me).with_path("user_id", "me111");
    let github = get_user_addon(&db, &ctx, "github").await.unwrap();

    assert_eq!(github["id"], "github");
    assert_eq!(github["type"], "user_addons");
    assert_eq!(github["attributes"]["user_has_auth"], true);
    assert_eq!(
        github["links"]["self"],
        "https://api.example.org/v2/users/me111/addons/github/"
    );
    assert_eq!(
        github["links"]["accounts"]["acc01"],
        json!({
            "account": "https://api.example.org/v2/users/me111/addons/github/accounts/acc01/",
            "nodes_connected": ["https://api.example.org/v2/nodes/proj1/"],
        })
    );

    let all = list_user_addons(&db, &ctx).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[1]["id"], "wiki");
    assert_eq!(all[1]["links"]["accounts"], json!({}));

    let err = get_user_addon(&db, &ctx, "dropbox").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
