//! One-shot job that moves preprints off their legacy nodes.
//!
//! Preprints used to borrow their title, description, creator and
//! contributor list from a linked node. The job copies those values onto
//! the preprint and re-creates each node contributor as a preprint
//! contributor whose permission is expressed through group membership.
//!
//! Phases run in order and are not wrapped in a common transaction:
//!
//! 1. backfill descriptive fields from the most recently created linked node
//! 2. build preprint contributors and fill the admin/write/read groups
//! 3. insert the contributors in fixed-size batches
//! 4. delete the node links of every migrated preprint
//!
//! Running it twice against the same links would duplicate contributors,
//! which is why phase 4 removes the links it consumed.

use std::collections::{BTreeMap, HashMap, HashSet};

use entity::{
    group_user, node, node_contributor, node_preprint, permission_group, preprint,
    preprint_contributor,
};
use sea_orm_migration::sea_orm::sea_query::Expr;
use sea_orm_migration::sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::{debug, info};

/// Rows per `INSERT` when writing preprint contributors.
pub const BATCH_SIZE: usize = 1000;

/// Upper bound on ids bound into a single `IN (...)` filter.
const ID_CHUNK: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Permission {
    Admin,
    Write,
    Read,
}

impl Permission {
    pub const ALL: [Permission; 3] = [Permission::Admin, Permission::Write, Permission::Read];

    /// Admin wins over write, write over read. A contributor with no flag
    /// set still ends up with read access.
    pub fn from_flags(admin: bool, write: bool, _read: bool) -> Self {
        if admin {
            Permission::Admin
        } else if write {
            Permission::Write
        } else {
            Permission::Read
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::Admin => "admin",
            Permission::Write => "write",
            Permission::Read => "read",
        }
    }

    pub fn group_name(self, preprint_id: &str) -> String {
        format!("preprint_{preprint_id}_{}", self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DivorceReport {
    pub preprints_backfilled: u64,
    pub preprints_rehomed: usize,
    pub contributors_created: usize,
    pub group_memberships_added: usize,
    /// Row count of every insert batch, in order.
    pub insert_batches: Vec<usize>,
    pub links_severed: u64,
}

pub async fn divorce_preprints_from_nodes<C>(conn: &C, batch_size: usize) -> Result<DivorceReport, DbErr>
where
    C: ConnectionTrait,
{
    let mut report = DivorceReport::default();

    let primary = primary_nodes(conn).await?;
    info!(preprints = primary.len(), "preprint divorce: linked preprints loaded");

    report.preprints_backfilled = backfill_fields(conn, &primary).await?;
    info!(
        rows = report.preprints_backfilled,
        "preprint divorce: checkpoint 1/4 fields backfilled"
    );

    let (pending, memberships) = rehome_contributors(conn, &primary).await?;
    report.preprints_rehomed = primary.len();
    report.contributors_created = pending.len();
    report.group_memberships_added = memberships;
    info!(
        contributors = pending.len(),
        memberships, "preprint divorce: checkpoint 2/4 contributors built, groups assigned"
    );

    report.insert_batches = insert_contributors(conn, pending, batch_size).await?;
    info!(
        batches = report.insert_batches.len(),
        "preprint divorce: checkpoint 3/4 contributors inserted"
    );

    let preprint_ids: Vec<String> = primary.keys().cloned().collect();
    report.links_severed = sever_links(conn, &preprint_ids).await?;
    info!(
        links = report.links_severed,
        "preprint divorce: checkpoint 4/4 node links removed"
    );

    Ok(report)
}

/// Most recently created linked node per preprint. Ties on `created` go to
/// the higher node id so the choice is stable.
pub async fn primary_nodes<C>(conn: &C) -> Result<BTreeMap<String, node::Model>, DbErr>
where
    C: ConnectionTrait,
{
    let links = node_preprint::Entity::find().all(conn).await?;
    if links.is_empty() {
        return Ok(BTreeMap::new());
    }

    let node_ids: Vec<String> = links
        .iter()
        .map(|l| l.node_id.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let mut nodes: HashMap<String, node::Model> = HashMap::with_capacity(node_ids.len());
    for chunk in node_ids.chunks(ID_CHUNK) {
        let found = node::Entity::find()
            .filter(node::Column::Id.is_in(chunk.iter().cloned()))
            .all(conn)
            .await?;
        nodes.extend(found.into_iter().map(|n| (n.id.clone(), n)));
    }

    let mut primary: BTreeMap<String, node::Model> = BTreeMap::new();
    for link in links {
        let Some(candidate) = nodes.get(&link.node_id) else {
            continue;
        };
        let newer = match primary.get(&link.preprint_id) {
            Some(current) => (candidate.created, &candidate.id) > (current.created, &current.id),
            None => true,
        };
        if newer {
            primary.insert(link.preprint_id, candidate.clone());
        }
    }

    Ok(primary)
}

async fn backfill_fields<C>(conn: &C, primary: &BTreeMap<String, node::Model>) -> Result<u64, DbErr>
where
    C: ConnectionTrait,
{
    let mut updated = 0;
    for (preprint_id, node) in primary {
        let res = preprint::Entity::update_many()
            .col_expr(preprint::Column::Title, Expr::value(Some(node.title.clone())))
            .col_expr(preprint::Column::Description, Expr::value(node.description.clone()))
            .col_expr(preprint::Column::CreatorId, Expr::value(node.creator_id.clone()))
            .filter(preprint::Column::Id.eq(preprint_id.as_str()))
            .exec(conn)
            .await?;
        updated += res.rows_affected;
    }
    Ok(updated)
}

async fn rehome_contributors<C>(
    conn: &C,
    primary: &BTreeMap<String, node::Model>,
) -> Result<(Vec<preprint_contributor::ActiveModel>, usize), DbErr>
where
    C: ConnectionTrait,
{
    let mut pending = Vec::new();
    let mut memberships = 0;

    for (preprint_id, node) in primary {
        let contributors = node_contributor::Entity::find()
            .filter(node_contributor::Column::NodeId.eq(node.id.as_str()))
            .order_by_asc(node_contributor::Column::SortOrder)
            .order_by_asc(node_contributor::Column::Id)
            .all(conn)
            .await?;

        let mut by_permission: BTreeMap<Permission, Vec<String>> = BTreeMap::new();
        for contrib in &contributors {
            pending.push(preprint_contributor::ActiveModel {
                id: NotSet,
                preprint_id: Set(preprint_id.clone()),
                user_id: Set(contrib.user_id.clone()),
                visible: Set(contrib.visible),
                sort_order: Set(contrib.sort_order),
            });

            let permission = Permission::from_flags(contrib.admin, contrib.write, contrib.read);
            by_permission
                .entry(permission)
                .or_default()
                .push(contrib.user_id.clone());
        }

        for permission in Permission::ALL {
            let group = ensure_group(conn, preprint_id, permission).await?;
            let users = by_permission.remove(&permission).unwrap_or_default();
            memberships += add_users_to_group(conn, group.id, users).await?;
        }

        debug!(
            preprint_id = %preprint_id,
            node_id = %node.id,
            contributors = contributors.len(),
            "preprint divorce: preprint re-homed"
        );
    }

    Ok((pending, memberships))
}

/// Returns the named permission group of a preprint, creating it on first use.
pub async fn ensure_group<C>(
    conn: &C,
    preprint_id: &str,
    permission: Permission,
) -> Result<permission_group::Model, DbErr>
where
    C: ConnectionTrait,
{
    let name = permission.group_name(preprint_id);
    if let Some(existing) = permission_group::Entity::find()
        .filter(permission_group::Column::Name.eq(name.as_str()))
        .one(conn)
        .await?
    {
        return Ok(existing);
    }

    permission_group::ActiveModel {
        id: NotSet,
        name: Set(name),
        preprint_id: Set(preprint_id.to_string()),
        permission: Set(permission.as_str().to_string()),
    }
    .insert(conn)
    .await
}

/// Adds users to a group, skipping existing members. Returns the number added.
async fn add_users_to_group<C>(conn: &C, group_id: i32, users: Vec<String>) -> Result<usize, DbErr>
where
    C: ConnectionTrait,
{
    if users.is_empty() {
        return Ok(0);
    }

    let mut seen: HashSet<String> = group_user::Entity::find()
        .filter(group_user::Column::GroupId.eq(group_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|m| m.user_id)
        .collect();

    let rows: Vec<group_user::ActiveModel> = users
        .into_iter()
        .filter(|u| seen.insert(u.clone()))
        .map(|user_id| group_user::ActiveModel {
            group_id: Set(group_id),
            user_id: Set(user_id),
        })
        .collect();

    let added = rows.len();
    for chunk in rows.chunks(BATCH_SIZE) {
        group_user::Entity::insert_many(chunk.to_vec())
            .exec_without_returning(conn)
            .await?;
    }
    Ok(added)
}

/// Splits `pending` into consecutive batches of at most `batch_size` rows.
pub fn plan_batches<T>(pending: &[T], batch_size: usize) -> std::slice::Chunks<'_, T> {
    pending.chunks(batch_size.max(1))
}

async fn insert_contributors<C>(
    conn: &C,
    pending: Vec<preprint_contributor::ActiveModel>,
    batch_size: usize,
) -> Result<Vec<usize>, DbErr>
where
    C: ConnectionTrait,
{
    let mut sizes = Vec::new();
    for batch in plan_batches(&pending, batch_size) {
        preprint_contributor::Entity::insert_many(batch.to_vec())
            .exec_without_returning(conn)
            .await?;
        debug!(rows = batch.len(), "preprint divorce: contributor batch inserted");
        sizes.push(batch.len());
    }
    Ok(sizes)
}

async fn sever_links<C>(conn: &C, preprint_ids: &[String]) -> Result<u64, DbErr>
where
    C: ConnectionTrait,
{
    let mut removed = 0;
    for chunk in preprint_ids.chunks(ID_CHUNK) {
        let res = node_preprint::Entity::delete_many()
            .filter(node_preprint::Column::PreprintId.is_in(chunk.iter().cloned()))
            .exec(conn)
            .await?;
        removed += res.rows_affected;
    }
    Ok(removed)
}
