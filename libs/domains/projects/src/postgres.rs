use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use domain_users::entity as users;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    ExprTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

use crate::entity::{
    project, project_contributor, project_like, project_tag, project_technology, tag, technology,
};
use crate::error::{ProjectError, ProjectResult};
use crate::models::{Contributor, NewProject, Project, Tag, Technology, STATUS_ACTIVE};
use crate::relations;
use crate::repository::{ProjectReader, ProjectWriter};
use crate::visibility;

/// PostgreSQL implementation of the project store using SeaORM
#[derive(Clone)]
pub struct PgProjectRepository {
    db: DatabaseConnection,
}

impl PgProjectRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: sea_orm::DbErr) -> ProjectError {
    ProjectError::Internal(format!("Database error: {}", e))
}

/// The unique index on `projects.title` is the last line of defense against
/// racing creations; map its violation to the user-facing error kind.
fn map_title_conflict(e: sea_orm::DbErr, title: &str) -> ProjectError {
    let err_str = e.to_string();
    if err_str.contains("duplicate key") || err_str.contains("unique constraint") {
        ProjectError::DuplicateTitle(title.to_string())
    } else {
        db_err(e)
    }
}

fn contributor_from(user: users::Model) -> Contributor {
    Contributor::from(domain_users::User::from(user))
}

impl PgProjectRepository {
    /// Assemble full aggregates for a page of project rows with one batched
    /// query per relation instead of a query per row.
    async fn load_aggregates<C: ConnectionTrait>(
        conn: &C,
        models: Vec<project::Model>,
    ) -> ProjectResult<Vec<Project>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();

        let contributor_rows = project_contributor::Entity::find()
            .filter(project_contributor::Column::ProjectId.is_in(ids.clone()))
            .order_by_asc(project_contributor::Column::Position)
            .find_also_related(users::Entity)
            .all(conn)
            .await
            .map_err(db_err)?;
        let mut contributors_by_project: HashMap<i32, Vec<Contributor>> = HashMap::new();
        for (row, user) in contributor_rows {
            let user = user.ok_or_else(|| {
                ProjectError::Internal(format!(
                    "Contributor user {} missing for project {}",
                    row.user_id, row.project_id
                ))
            })?;
            contributors_by_project
                .entry(row.project_id)
                .or_default()
                .push(contributor_from(user));
        }

        let tag_rows = project_tag::Entity::find()
            .filter(project_tag::Column::ProjectId.is_in(ids.clone()))
            .find_also_related(tag::Entity)
            .all(conn)
            .await
            .map_err(db_err)?;
        let mut tags_by_project: HashMap<i32, Vec<Tag>> = HashMap::new();
        for (row, t) in tag_rows {
            let t = t.ok_or_else(|| {
                ProjectError::Internal(format!(
                    "Tag {} missing for project {}",
                    row.tag_id, row.project_id
                ))
            })?;
            tags_by_project
                .entry(row.project_id)
                .or_default()
                .push(t.into());
        }

        let technology_rows = project_technology::Entity::find()
            .filter(project_technology::Column::ProjectId.is_in(ids))
            .find_also_related(technology::Entity)
            .all(conn)
            .await
            .map_err(db_err)?;
        let mut technologies_by_project: HashMap<i32, Vec<Technology>> = HashMap::new();
        for (row, t) in technology_rows {
            let t = t.ok_or_else(|| {
                ProjectError::Internal(format!(
                    "Technology {} missing for project {}",
                    row.technology_id, row.project_id
                ))
            })?;
            technologies_by_project
                .entry(row.project_id)
                .or_default()
                .push(t.into());
        }

        let creator_ids: Vec<i32> = models
            .iter()
            .map(|m| m.created_by)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let creators: HashMap<i32, Contributor> = users::Entity::find()
            .filter(users::Column::Id.is_in(creator_ids))
            .all(conn)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|u| (u.id, contributor_from(u)))
            .collect();

        let mut aggregates = Vec::with_capacity(models.len());
        for model in models {
            let creator = creators.get(&model.created_by).cloned().ok_or_else(|| {
                ProjectError::Internal(format!(
                    "Creator {} missing for project {}",
                    model.created_by, model.id
                ))
            })?;
            aggregates.push(Project {
                id: model.id,
                title: model.title,
                description: model.description,
                image: model.image,
                github_link: model.github_link,
                live_url: model.live_url,
                status: model.status,
                visibility: model.visibility,
                category: model.category,
                likes: model.likes,
                views: model.views,
                created_by: model.created_by,
                modified_by: model.modified_by,
                created_at: model.created_at.into(),
                updated_at: model.updated_at.into(),
                creator,
                contributors: contributors_by_project.remove(&model.id).unwrap_or_default(),
                tags: tags_by_project.remove(&model.id).unwrap_or_default(),
                technologies: technologies_by_project
                    .remove(&model.id)
                    .unwrap_or_default(),
            });
        }
        Ok(aggregates)
    }
}

#[async_trait]
impl ProjectWriter for PgProjectRepository {
    async fn create(&self, record: NewProject) -> ProjectResult<Project> {
        let txn = self.db.begin().await.map_err(db_err)?;

        // Friendly pre-check; the unique index stays the real guard.
        let exists = project::Entity::find()
            .filter(project::Column::Title.eq(&record.title))
            .one(&txn)
            .await
            .map_err(db_err)?
            .is_some();
        if exists {
            return Err(ProjectError::DuplicateTitle(record.title));
        }

        let now = chrono::Utc::now();
        let model = project::ActiveModel {
            title: Set(record.title.clone()),
            description: Set(record.description.clone()),
            image: Set(record.image.clone()),
            github_link: Set(record.github_link.clone()),
            live_url: Set(record.live_url.clone()),
            status: Set(STATUS_ACTIVE.to_string()),
            visibility: Set(record.visibility),
            category: Set(record.category.clone()),
            likes: Set(0),
            views: Set(0),
            created_by: Set(record.created_by),
            modified_by: Set(Some(record.created_by)),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };
        let inserted = model
            .insert(&txn)
            .await
            .map_err(|e| map_title_conflict(e, &record.title))?;

        let contributor_rows: Vec<project_contributor::ActiveModel> = record
            .contributors
            .iter()
            .enumerate()
            .map(|(position, user)| project_contributor::ActiveModel {
                project_id: Set(inserted.id),
                user_id: Set(user.id),
                position: Set(position as i32),
            })
            .collect();
        if !contributor_rows.is_empty() {
            project_contributor::Entity::insert_many(contributor_rows)
                .exec_without_returning(&txn)
                .await
                .map_err(db_err)?;
        }

        let mut tags = Vec::with_capacity(record.tags.len());
        for name in &record.tags {
            let t = relations::find_or_create_tag(&txn, name).await?;
            project_tag::Entity::insert(project_tag::ActiveModel {
                project_id: Set(inserted.id),
                tag_id: Set(t.id),
            })
            .exec_without_returning(&txn)
            .await
            .map_err(db_err)?;
            tags.push(Tag::from(t));
        }

        let mut technologies = Vec::with_capacity(record.technologies.len());
        for name in &record.technologies {
            let t = relations::find_or_create_technology(&txn, name).await?;
            project_technology::Entity::insert(project_technology::ActiveModel {
                project_id: Set(inserted.id),
                technology_id: Set(t.id),
            })
            .exec_without_returning(&txn)
            .await
            .map_err(db_err)?;
            technologies.push(Technology::from(t));
        }

        txn.commit().await.map_err(db_err)?;

        let contributors: Vec<Contributor> = record
            .contributors
            .into_iter()
            .map(Contributor::from)
            .collect();
        let creator = contributors.first().cloned().ok_or_else(|| {
            ProjectError::Internal("Contributor list must start with the creator".to_string())
        })?;

        tracing::info!(project_id = inserted.id, title = %inserted.title, "Created project");
        Ok(Project {
            id: inserted.id,
            title: inserted.title,
            description: inserted.description,
            image: inserted.image,
            github_link: inserted.github_link,
            live_url: inserted.live_url,
            status: inserted.status,
            visibility: inserted.visibility,
            category: inserted.category,
            likes: inserted.likes,
            views: inserted.views,
            created_by: inserted.created_by,
            modified_by: inserted.modified_by,
            created_at: inserted.created_at.into(),
            updated_at: inserted.updated_at.into(),
            creator,
            contributors,
            tags,
            technologies,
        })
    }

    async fn toggle_like(&self, user_id: i32, project_id: i32) -> ProjectResult<bool> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let user_exists = users::Entity::find_by_id(user_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .is_some();
        if !user_exists {
            return Err(ProjectError::UserNotFound(user_id.to_string()));
        }

        let current = project::Entity::find_by_id(project_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(ProjectError::NotFound(project_id))?;

        let deleted = project_like::Entity::delete_many()
            .filter(project_like::Column::UserId.eq(user_id))
            .filter(project_like::Column::ProjectId.eq(project_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let now_liked = if deleted.rows_affected > 0 {
            if current.likes == 0 {
                tracing::warn!(
                    project_id,
                    "Like counter out of sync with like rows; clamping at zero"
                );
            }
            project::Entity::update_many()
                .col_expr(project::Column::Likes, Expr::cust("GREATEST(likes - 1, 0)"))
                .filter(project::Column::Id.eq(project_id))
                .exec(&txn)
                .await
                .map_err(db_err)?;
            false
        } else {
            // ON CONFLICT covers a racing like from the same user: the other
            // writer's insert wins and the counter is not bumped twice.
            let inserted_rows = project_like::Entity::insert(project_like::ActiveModel {
                project_id: Set(project_id),
                user_id: Set(user_id),
            })
            .on_conflict(
                OnConflict::columns([
                    project_like::Column::ProjectId,
                    project_like::Column::UserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(db_err)?;

            if inserted_rows > 0 {
                project::Entity::update_many()
                    .col_expr(
                        project::Column::Likes,
                        Expr::col(project::Column::Likes).add(1),
                    )
                    .filter(project::Column::Id.eq(project_id))
                    .exec(&txn)
                    .await
                    .map_err(db_err)?;
            }
            true
        };

        txn.commit().await.map_err(db_err)?;
        Ok(now_liked)
    }
}

#[async_trait]
impl ProjectReader for PgProjectRepository {
    async fn get_aggregate(&self, id: i32) -> ProjectResult<Option<Project>> {
        let model = project::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        match model {
            Some(model) => Ok(Self::load_aggregates(&self.db, vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        viewer: Option<i32>,
        limit: u64,
        offset: u64,
    ) -> ProjectResult<Vec<Project>> {
        let models = project::Entity::find()
            .filter(visibility::listing_condition(viewer))
            .order_by_desc(project::Column::CreatedAt)
            .order_by_desc(project::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Self::load_aggregates(&self.db, models).await
    }

    async fn count(&self) -> ProjectResult<u64> {
        project::Entity::find().count(&self.db).await.map_err(db_err)
    }

    async fn is_liked(&self, user_id: i32, project_id: i32) -> ProjectResult<bool> {
        let count = project_like::Entity::find()
            .filter(project_like::Column::UserId.eq(user_id))
            .filter(project_like::Column::ProjectId.eq(project_id))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn liked_project_ids(
        &self,
        user_id: i32,
        project_ids: &[i32],
    ) -> ProjectResult<HashSet<i32>> {
        if project_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let rows = project_like::Entity::find()
            .filter(project_like::Column::UserId.eq(user_id))
            .filter(project_like::Column::ProjectId.is_in(project_ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows.into_iter().map(|row| row.project_id).collect())
    }
}
