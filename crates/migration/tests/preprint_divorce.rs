use entity::{
    group_user, node, node_contributor, node_preprint, permission_group, preprint,
    preprint_contributor, user,
};
use migration::preprint_divorce::{
    divorce_preprints_from_nodes, DivorceReport, Permission, BATCH_SIZE,
};
use migration::{Migrator, MigratorTrait};
use sea_orm_migration::sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectOptions, Database,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

const SCHEMA_STEPS: u32 = 3;

async fn schema_only() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.expect("connect sqlite");
    Migrator::up(&db, Some(SCHEMA_STEPS)).await.expect("apply schema");
    db
}

fn user_row(id: &str) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(id.to_string()),
        username: Set(Some(format!("{id}@example.org"))),
        fullname: Set(format!("User {id}")),
        given_name: Set(String::new()),
        middle_names: Set(String::new()),
        family_name: Set(String::new()),
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
}

async fn add_user(db: &DatabaseConnection, id: &str) {
    user_row(id).insert(db).await.expect("insert user");
}

async fn add_node(db: &DatabaseConnection, id: &str, title: &str, creator: &str, created: i64) {
    node::ActiveModel {
        id: Set(id.to_string()),
        title: Set(title.to_string()),
        description: Set(Some(format!("{title} description"))),
        creator_id: Set(Some(creator.to_string())),
        is_registration: Set(false),
        is_deleted: Set(false),
        created: Set(created),
        modified: Set(created),
    }
    .insert(db)
    .await
    .expect("insert node");
}

async fn add_preprint(db: &DatabaseConnection, id: &str) {
    preprint::ActiveModel {
        id: Set(id.to_string()),
        title: Set(None),
        description: Set(None),
        creator_id: Set(None),
        is_published: Set(true),
        created: Set(1_600_000_000),
        modified: Set(1_600_000_000),
    }
    .insert(db)
    .await
    .expect("insert preprint");
}

async fn link(db: &DatabaseConnection, node_id: &str, preprint_id: &str) {
    node_preprint::ActiveModel {
        node_id: Set(node_id.to_string()),
        preprint_id: Set(preprint_id.to_string()),
    }
    .insert(db)
    .await
    .expect("link node to preprint");
}

fn contributor_row(
    node_id: &str,
    user_id: &str,
    flags: (bool, bool, bool),
    visible: bool,
    sort_order: i32,
) -> node_contributor::ActiveModel {
    node_contributor::ActiveModel {
        id: NotSet,
        node_id: Set(node_id.to_string()),
        user_id: Set(user_id.to_string()),
        admin: Set(flags.0),
        write: Set(flags.1),
        read: Set(flags.2),
        visible: Set(visible),
        sort_order: Set(sort_order),
    }
}

async fn group_members(db: &DatabaseConnection, preprint_id: &str, permission: Permission) -> Vec<String> {
    let group = permission_group::Entity::find()
        .filter(permission_group::Column::Name.eq(permission.group_name(preprint_id)))
        .one(db)
        .await
        .expect("query group")
        .expect("group exists");
    let mut members: Vec<String> = group_user::Entity::find()
        .filter(group_user::Column::GroupId.eq(group.id))
        .all(db)
        .await
        .expect("query members")
        .into_iter()
        .map(|m| m.user_id)
        .collect();
    members.sort();
    members
}

#[tokio::test]
async fn preprint_takes_fields_from_most_recent_node() {
    let db = schema_only().await;
    add_user(&db, "old01").await;
    add_user(&db, "new01").await;
    add_node(&db, "nodea", "Older project", "old01", 1_000).await;
    add_node(&db, "nodeb", "Newer project", "new01", 2_000).await;
    add_preprint(&db, "pp001").await;
    link(&db, "nodea", "pp001").await;
    link(&db, "nodeb", "pp001").await;

    let report = divorce_preprints_from_nodes(&db, BATCH_SIZE).await.expect("run divorce");
    assert_eq!(report.preprints_backfilled, 1);

    let pp = preprint::Entity::find_by_id("pp001".to_string())
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pp.title.as_deref(), Some("Newer project"));
    assert_eq!(pp.description.as_deref(), Some("Newer project description"));
    assert_eq!(pp.creator_id.as_deref(), Some("new01"));
}

#[tokio::test]
async fn creation_time_ties_resolve_to_the_same_node_every_time() {
    let db = schema_only().await;
    add_user(&db, "u0001").await;
    add_node(&db, "nodea", "A", "u0001", 5_000).await;
    add_node(&db, "nodeb", "B", "u0001", 5_000).await;
    add_preprint(&db, "pp001").await;
    link(&db, "nodea", "pp001").await;
    link(&db, "nodeb", "pp001").await;

    divorce_preprints_from_nodes(&db, BATCH_SIZE).await.unwrap();

    let pp = preprint::Entity::find_by_id("pp001".to_string())
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pp.title.as_deref(), Some("B"));
}

#[tokio::test]
async fn unlinked_preprints_are_left_alone() {
    let db = schema_only().await;
    preprint::ActiveModel {
        id: Set("solo1".to_string()),
        title: Set(Some("Standalone".to_string())),
        description: Set(None),
        creator_id: Set(None),
        is_published: Set(false),
        created: Set(1),
        modified: Set(1),
    }
    .insert(&db)
    .await
    .unwrap();

    let report = divorce_preprints_from_nodes(&db, BATCH_SIZE).await.unwrap();
    assert_eq!(report, DivorceReport::default());

    let pp = preprint::Entity::find_by_id("solo1".to_string())
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pp.title.as_deref(), Some("Standalone"));
}

#[tokio::test]
async fn contributors_land_in_exactly_one_permission_group() {
    let db = schema_only().await;
    for id in ["admin", "write", "readr", "flagz"] {
        add_user(&db, id).await;
    }
    add_node(&db, "node1", "Project", "admin", 1_000).await;
    add_preprint(&db, "pp001").await;
    link(&db, "node1", "pp001").await;

    node_contributor::Entity::insert_many(vec![
        contributor_row("node1", "admin", (true, true, true), true, 0),
        contributor_row("node1", "write", (false, true, true), false, 1),
        contributor_row("node1", "readr", (false, false, true), true, 2),
        contributor_row("node1", "flagz", (false, false, false), true, 3),
    ])
    .exec(&db)
    .await
    .unwrap();

    let report = divorce_preprints_from_nodes(&db, BATCH_SIZE).await.unwrap();
    assert_eq!(report.contributors_created, 4);
    assert_eq!(report.group_memberships_added, 4);

    assert_eq!(group_members(&db, "pp001", Permission::Admin).await, vec!["admin"]);
    assert_eq!(group_members(&db, "pp001", Permission::Write).await, vec!["write"]);
    assert_eq!(
        group_members(&db, "pp001", Permission::Read).await,
        vec!["flagz", "readr"]
    );

    let contributors = preprint_contributor::Entity::find()
        .filter(preprint_contributor::Column::PreprintId.eq("pp001"))
        .order_by_asc(preprint_contributor::Column::SortOrder)
        .all(&db)
        .await
        .unwrap();
    let shape: Vec<(&str, bool, i32)> = contributors
        .iter()
        .map(|c| (c.user_id.as_str(), c.visible, c.sort_order))
        .collect();
    assert_eq!(
        shape,
        vec![
            ("admin", true, 0),
            ("write", false, 1),
            ("readr", true, 2),
            ("flagz", true, 3),
        ]
    );
}

#[tokio::test]
async fn large_contributor_sets_are_inserted_in_fixed_batches() {
    let db = schema_only().await;
    add_user(&db, "owner").await;
    add_node(&db, "big01", "Big project", "owner", 1_000).await;
    add_preprint(&db, "pp001").await;
    link(&db, "big01", "pp001").await;

    let ids: Vec<String> = (0..2050).map(|i| format!("c{i:04}")).collect();
    for chunk in ids.chunks(500) {
        user::Entity::insert_many(chunk.iter().map(|id| user_row(id)))
            .exec(&db)
            .await
            .unwrap();
        node_contributor::Entity::insert_many(
            chunk
                .iter()
                .enumerate()
                .map(|(i, id)| contributor_row("big01", id, (false, false, true), true, i as i32)),
        )
        .exec(&db)
        .await
        .unwrap();
    }

    let report = divorce_preprints_from_nodes(&db, BATCH_SIZE).await.unwrap();
    assert_eq!(report.insert_batches, vec![1000, 1000, 50]);
    assert!(report.insert_batches.iter().all(|n| *n <= BATCH_SIZE));

    let stored = preprint_contributor::Entity::find()
        .filter(preprint_contributor::Column::PreprintId.eq("pp001"))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(stored, 2050);
}

#[tokio::test]
async fn migrator_applies_divorce_and_consumes_node_links() {
    let db = schema_only().await;
    add_user(&db, "u0001").await;
    add_node(&db, "node1", "Project", "u0001", 1_000).await;
    add_preprint(&db, "pp001").await;
    link(&db, "node1", "pp001").await;
    node_contributor::Entity::insert(contributor_row("node1", "u0001", (true, false, false), true, 0))
        .exec(&db)
        .await
        .unwrap();

    Migrator::up(&db, None).await.expect("apply divorce");
    assert!(Migrator::get_pending_migrations(&db).await.unwrap().is_empty());
    assert_eq!(node_preprint::Entity::find().count(&db).await.unwrap(), 0);

    // Links are gone, so a second pass has nothing to re-home.
    let again = divorce_preprints_from_nodes(&db, BATCH_SIZE).await.unwrap();
    assert_eq!(again.contributors_created, 0);
    assert_eq!(preprint_contributor::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn divorce_cannot_be_rolled_back() {
    let db = schema_only().await;
    Migrator::up(&db, None).await.unwrap();
    assert!(Migrator::down(&db, Some(1)).await.is_err());
}
