use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Descriptive columns are nullable: they are filled from the linked
        // node by the divorce migration.
        manager
            .create_table(
                Table::create()
                    .table(Preprints::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Preprints::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Preprints::Title).string())
                    .col(ColumnDef::new(Preprints::Description).text())
                    .col(ColumnDef::new(Preprints::CreatorId).string())
                    .col(
                        ColumnDef::new(Preprints::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Preprints::Created).big_integer().not_null())
                    .col(ColumnDef::new(Preprints::Modified).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_preprints_creator_id")
                            .from(Preprints::Table, Preprints::CreatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NodePreprints::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(NodePreprints::NodeId).string().not_null())
                    .col(ColumnDef::new(NodePreprints::PreprintId).string().not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_node_preprints")
                            .col(NodePreprints::NodeId)
                            .col(NodePreprints::PreprintId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_node_preprints_node_id")
                            .from(NodePreprints::Table, NodePreprints::NodeId)
                            .to(Nodes::Table, Nodes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_node_preprints_preprint_id")
                            .from(NodePreprints::Table, NodePreprints::PreprintId)
                            .to(Preprints::Table, Preprints::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_node_preprints_preprint_id")
                    .table(NodePreprints::Table)
                    .col(NodePreprints::PreprintId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PreprintContributors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PreprintContributors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PreprintContributors::PreprintId).string().not_null())
                    .col(ColumnDef::new(PreprintContributors::UserId).string().not_null())
                    .col(
                        ColumnDef::new(PreprintContributors::Visible)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PreprintContributors::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_preprint_contributors_preprint_id")
                            .from(PreprintContributors::Table, PreprintContributors::PreprintId)
                            .to(Preprints::Table, Preprints::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_preprint_contributors_user_id")
                            .from(PreprintContributors::Table, PreprintContributors::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_preprint_contributors_preprint_user")
                    .table(PreprintContributors::Table)
                    .col(PreprintContributors::PreprintId)
                    .col(PreprintContributors::UserId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PermissionGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PermissionGroups::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PermissionGroups::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(PermissionGroups::PreprintId).string().not_null())
                    .col(ColumnDef::new(PermissionGroups::Permission).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_permission_groups_preprint_id")
                            .from(PermissionGroups::Table, PermissionGroups::PreprintId)
                            .to(Preprints::Table, Preprints::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GroupUsers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GroupUsers::GroupId).integer().not_null())
                    .col(ColumnDef::new(GroupUsers::UserId).string().not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_group_users")
                            .col(GroupUsers::GroupId)
                            .col(GroupUsers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_users_group_id")
                            .from(GroupUsers::Table, GroupUsers::GroupId)
                            .to(PermissionGroups::Table, PermissionGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_users_user_id")
                            .from(GroupUsers::Table, GroupUsers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_group_users_user_id")
                    .table(GroupUsers::Table)
                    .col(GroupUsers::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GroupUsers::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PermissionGroups::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PreprintContributors::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(NodePreprints::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Preprints::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Nodes {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Preprints {
    Table,
    Id,
    Title,
    Description,
    CreatorId,
    IsPublished,
    Created,
    Modified,
}

#[derive(DeriveIden)]
enum NodePreprints {
    Table,
    NodeId,
    PreprintId,
}

#[derive(DeriveIden)]
enum PreprintContributors {
    Table,
    Id,
    PreprintId,
    UserId,
    Visible,
    SortOrder,
}

#[derive(DeriveIden)]
enum PermissionGroups {
    Table,
    Id,
    Name,
    PreprintId,
    Permission,
}

#[derive(DeriveIden)]
enum GroupUsers {
    Table,
    GroupId,
    UserId,
}
