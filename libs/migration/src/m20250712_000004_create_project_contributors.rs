use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProjectContributors::Table)
                    .if_not_exists()
                    .col(integer(ProjectContributors::ProjectId))
                    .col(integer(ProjectContributors::UserId))
                    // Contributor order; the creator is always 0
                    .col(integer(ProjectContributors::Position).default(0))
                    .primary_key(
                        Index::create()
                            .col(ProjectContributors::ProjectId)
                            .col(ProjectContributors::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_contributors_project")
                            .from(ProjectContributors::Table, ProjectContributors::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_contributors_user")
                            .from(ProjectContributors::Table, ProjectContributors::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_project_contributors_user_id")
                    .table(ProjectContributors::Table)
                    .col(ProjectContributors::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProjectContributors::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ProjectContributors {
    Table,
    ProjectId,
    UserId,
    Position,
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
