pub use sea_orm_migration::prelude::*;

mod m20250712_000000_bootstrap;
mod m20250712_000001_create_users;
mod m20250712_000002_create_projects;
mod m20250712_000003_create_tags_and_technologies;
mod m20250712_000004_create_project_contributors;
mod m20250712_000005_create_project_likes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250712_000000_bootstrap::Migration),
            Box::new(m20250712_000001_create_users::Migration),
            Box::new(m20250712_000002_create_projects::Migration),
            Box::new(m20250712_000003_create_tags_and_technologies::Migration),
            Box::new(m20250712_000004_create_project_contributors::Migration),
            Box::new(m20250712_000005_create_project_likes::Migration),
        ]
    }
}
