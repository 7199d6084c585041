use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Composite primary key keeps (user, project) cardinality at 0 or 1;
        // the like toggle's conditional insert/delete depends on it.
        manager
            .create_table(
                Table::create()
                    .table(ProjectLikes::Table)
                    .if_not_exists()
                    .col(integer(ProjectLikes::ProjectId))
                    .col(integer(ProjectLikes::UserId))
                    .primary_key(
                        Index::create()
                            .col(ProjectLikes::ProjectId)
                            .col(ProjectLikes::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_likes_project")
                            .from(ProjectLikes::Table, ProjectLikes::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_likes_user")
                            .from(ProjectLikes::Table, ProjectLikes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_project_likes_user_id")
                    .table(ProjectLikes::Table)
                    .col(ProjectLikes::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProjectLikes::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ProjectLikes {
    Table,
    ProjectId,
    UserId,
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
