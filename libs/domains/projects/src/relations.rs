//! Find-or-create resolution for the Project aggregate's relations.
//!
//! Tags and technologies are resolved against any `ConnectionTrait` so the
//! lookups participate in the caller's transaction; contributor resolution
//! goes through the users domain and fails closed.

use std::collections::HashMap;

use domain_users::{User, UserRepository};
use sea_orm::sea_query::OnConflict;
use sea_orm::ActiveValue::Set;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::entity::{tag, technology};
use crate::error::{ProjectError, ProjectResult};

fn db_err(e: sea_orm::DbErr) -> ProjectError {
    ProjectError::Internal(format!("Database error: {}", e))
}

/// Resolve the full contributor list for a new project.
///
/// The creator always lands at position 0 and is not duplicated when the
/// request names them again. Remaining usernames are resolved as one batch;
/// if any name stays unresolved the whole operation fails with
/// `ContributorNotFound` - partial contributor sets are never persisted.
pub async fn resolve_contributors<U>(
    users: &U,
    creator: &User,
    requested: &[String],
) -> ProjectResult<Vec<User>>
where
    U: UserRepository + ?Sized,
{
    let mut contributors = vec![creator.clone()];

    let requested: Vec<String> = requested
        .iter()
        .filter(|name| *name != &creator.username)
        .cloned()
        .collect();
    if requested.is_empty() {
        return Ok(contributors);
    }

    let found = users
        .get_by_usernames(&requested)
        .await
        .map_err(|e| ProjectError::Internal(format!("Error fetching contributors: {}", e)))?;
    if found.len() != requested.len() {
        return Err(ProjectError::ContributorNotFound);
    }

    // Restore request order; the batch lookup makes no ordering promise.
    let mut by_name: HashMap<String, User> = found
        .into_iter()
        .map(|user| (user.username.clone(), user))
        .collect();
    for name in &requested {
        let user = by_name
            .remove(name)
            .ok_or(ProjectError::ContributorNotFound)?;
        contributors.push(user);
    }

    Ok(contributors)
}

/// Find a tag by exact name or create it.
///
/// Concurrency-safe through the unique index on `tags.name`: the insert uses
/// ON CONFLICT DO NOTHING and the follow-up read returns whichever row won a
/// racing creation.
pub async fn find_or_create_tag<C>(conn: &C, name: &str) -> ProjectResult<tag::Model>
where
    C: ConnectionTrait,
{
    if let Some(existing) = tag::Entity::find()
        .filter(tag::Column::Name.eq(name))
        .one(conn)
        .await
        .map_err(db_err)?
    {
        return Ok(existing);
    }

    tag::Entity::insert(tag::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    })
    .on_conflict(OnConflict::column(tag::Column::Name).do_nothing().to_owned())
    .exec_without_returning(conn)
    .await
    .map_err(db_err)?;

    tag::Entity::find()
        .filter(tag::Column::Name.eq(name))
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| ProjectError::Internal(format!("Tag '{}' missing after insert", name)))
}

/// Find a technology by exact name or create it. Same recovery path as
/// `find_or_create_tag`.
pub async fn find_or_create_technology<C>(conn: &C, name: &str) -> ProjectResult<technology::Model>
where
    C: ConnectionTrait,
{
    if let Some(existing) = technology::Entity::find()
        .filter(technology::Column::Name.eq(name))
        .one(conn)
        .await
        .map_err(db_err)?
    {
        return Ok(existing);
    }

    technology::Entity::insert(technology::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::column(technology::Column::Name)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(conn)
    .await
    .map_err(db_err)?;

    technology::Entity::find()
        .filter(technology::Column::Name.eq(name))
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| {
            ProjectError::Internal(format!("Technology '{}' missing after insert", name))
        })
}
