use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Username).string().unique_key())
                    .col(ColumnDef::new(Users::Fullname).string().not_null())
                    .col(ColumnDef::new(Users::GivenName).string().not_null().default(""))
                    .col(ColumnDef::new(Users::MiddleNames).string().not_null().default(""))
                    .col(ColumnDef::new(Users::FamilyName).string().not_null().default(""))
                    .col(ColumnDef::new(Users::Suffix).string().not_null().default(""))
                    .col(
                        ColumnDef::new(Users::Timezone)
                            .string()
                            .not_null()
                            .default("Etc/UTC"),
                    )
                    .col(ColumnDef::new(Users::Locale).string().not_null().default("en_US"))
                    .col(ColumnDef::new(Users::Social).json().not_null())
                    .col(ColumnDef::new(Users::EmailVerifications).json().not_null())
                    .col(
                        ColumnDef::new(Users::IsRegistered)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Users::RegisteredById).string())
                    .col(ColumnDef::new(Users::DateRegistered).big_integer().not_null())
                    .col(ColumnDef::new(Users::DateConfirmed).big_integer())
                    .col(ColumnDef::new(Users::DateDisabled).big_integer())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Institutions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Institutions::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Institutions::Name).string().not_null())
                    .col(ColumnDef::new(Institutions::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserInstitutions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserInstitutions::UserId).string().not_null())
                    .col(ColumnDef::new(UserInstitutions::InstitutionId).string().not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_user_institutions")
                            .col(UserInstitutions::UserId)
                            .col(UserInstitutions::InstitutionId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_institutions_user_id")
                            .from(UserInstitutions::Table, UserInstitutions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_institutions_institution_id")
                            .from(UserInstitutions::Table, UserInstitutions::InstitutionId)
                            .to(Institutions::Table, Institutions::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Education and employment share a layout; only the role column differs.
        for (table, role, fk_name) in [
            (History::UserSchools, History::Degree, "fk_user_schools_user_id"),
            (History::UserJobs, History::Title, "fk_user_jobs_user_id"),
        ] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(ColumnDef::new(History::Id).string().not_null().primary_key())
                        .col(ColumnDef::new(History::UserId).string().not_null())
                        .col(ColumnDef::new(History::Institution).string().not_null().default(""))
                        .col(ColumnDef::new(History::Department).string().not_null().default(""))
                        .col(ColumnDef::new(role).string().not_null().default(""))
                        .col(ColumnDef::new(History::StartMonth).integer())
                        .col(ColumnDef::new(History::StartYear).integer())
                        .col(ColumnDef::new(History::EndMonth).integer())
                        .col(ColumnDef::new(History::EndYear).integer())
                        .col(
                            ColumnDef::new(History::Ongoing)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(History::SortOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name(fk_name)
                                .from(table, History::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_index(
                Index::create()
                    .name("idx_user_schools_user_id")
                    .table(History::UserSchools)
                    .col(History::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_user_jobs_user_id")
                    .table(History::UserJobs)
                    .col(History::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [History::UserJobs, History::UserSchools] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        manager
            .drop_table(Table::drop().table(UserInstitutions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Institutions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Fullname,
    GivenName,
    MiddleNames,
    FamilyName,
    Suffix,
    Timezone,
    Locale,
    Social,
    EmailVerifications,
    IsRegistered,
    RegisteredById,
    DateRegistered,
    DateConfirmed,
    DateDisabled,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Institutions {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserInstitutions {
    Table,
    UserId,
    InstitutionId,
}

#[derive(DeriveIden, Clone, Copy)]
enum History {
    UserSchools,
    UserJobs,
    Id,
    UserId,
    Institution,
    Department,
    Degree,
    Title,
    StartMonth,
    StartYear,
    EndMonth,
    EndYear,
    Ongoing,
    SortOrder,
}
