use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Nodes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Nodes::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Nodes::Title).string().not_null())
                    .col(ColumnDef::new(Nodes::Description).text())
                    .col(ColumnDef::new(Nodes::CreatorId).string())
                    .col(
                        ColumnDef::new(Nodes::IsRegistration)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Nodes::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Nodes::Created).big_integer().not_null())
                    .col(ColumnDef::new(Nodes::Modified).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_nodes_creator_id")
                            .from(Nodes::Table, Nodes::CreatorId)
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
                    .table(NodeContributors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NodeContributors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(NodeContributors::NodeId).string().not_null())
                    .col(ColumnDef::new(NodeContributors::UserId).string().not_null())
                    .col(
                        ColumnDef::new(NodeContributors::Admin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(NodeContributors::Write)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(NodeContributors::Read)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(NodeContributors::Visible)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(NodeContributors::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_node_contributors_node_id")
                            .from(NodeContributors::Table, NodeContributors::NodeId)
                            .to(Nodes::Table, Nodes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_node_contributors_user_id")
                            .from(NodeContributors::Table, NodeContributors::UserId)
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
                    .name("uq_node_contributors_node_user")
                    .table(NodeContributors::Table)
                    .col(NodeContributors::NodeId)
                    .col(NodeContributors::UserId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_node_contributors_user_id")
                    .table(NodeContributors::Table)
                    .col(NodeContributors::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExternalAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExternalAccounts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExternalAccounts::OwnerId).string().not_null())
                    .col(ColumnDef::new(ExternalAccounts::Provider).string().not_null())
                    .col(ColumnDef::new(ExternalAccounts::ProviderId).string().not_null())
                    .col(ColumnDef::new(ExternalAccounts::DisplayName).string())
                    .col(ColumnDef::new(ExternalAccounts::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_external_accounts_owner_id")
                            .from(ExternalAccounts::Table, ExternalAccounts::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserAddonSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserAddonSettings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserAddonSettings::OwnerId).string().not_null())
                    .col(ColumnDef::new(UserAddonSettings::Provider).string().not_null())
                    .col(
                        ColumnDef::new(UserAddonSettings::HasAuth)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserAddonSettings::UsesExternalAccounts)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_addon_settings_owner_id")
                            .from(UserAddonSettings::Table, UserAddonSettings::OwnerId)
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
                    .name("uq_user_addon_settings_owner_provider")
                    .table(UserAddonSettings::Table)
                    .col(UserAddonSettings::OwnerId)
                    .col(UserAddonSettings::Provider)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NodeAddonSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NodeAddonSettings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(NodeAddonSettings::NodeId).string().not_null())
                    .col(ColumnDef::new(NodeAddonSettings::Provider).string().not_null())
                    .col(ColumnDef::new(NodeAddonSettings::ExternalAccountId).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_node_addon_settings_node_id")
                            .from(NodeAddonSettings::Table, NodeAddonSettings::NodeId)
                            .to(Nodes::Table, Nodes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_node_addon_settings_external_account_id")
                            .from(NodeAddonSettings::Table, NodeAddonSettings::ExternalAccountId)
                            .to(ExternalAccounts::Table, ExternalAccounts::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_node_addon_settings_external_account_id")
                    .table(NodeAddonSettings::Table)
                    .col(NodeAddonSettings::ExternalAccountId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NodeAddonSettings::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserAddonSettings::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExternalAccounts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(NodeContributors::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Nodes::Table).if_exists().to_owned())
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
    Title,
    Description,
    CreatorId,
    IsRegistration,
    IsDeleted,
    Created,
    Modified,
}

#[derive(DeriveIden)]
enum NodeContributors {
    Table,
    Id,
    NodeId,
    UserId,
    Admin,
    Write,
    Read,
    Visible,
    SortOrder,
}

#[derive(DeriveIden)]
enum ExternalAccounts {
    Table,
    Id,
    OwnerId,
    Provider,
    ProviderId,
    DisplayName,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserAddonSettings {
    Table,
    Id,
    OwnerId,
    Provider,
    HasAuth,
    UsesExternalAccounts,
}

#[derive(DeriveIden)]
enum NodeAddonSettings {
    Table,
    Id,
    NodeId,
    Provider,
    ExternalAccountId,
}
