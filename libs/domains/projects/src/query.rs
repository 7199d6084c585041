use std::collections::HashSet;
use std::sync::Arc;

use domain_users::{User, UserRepository};

use crate::error::{ProjectError, ProjectResult};
use crate::models::ProjectView;
use crate::repository::ProjectReader;
use crate::visibility;

/// Query service: viewer-scoped listings and point lookups, enriched with
/// the viewer's like status.
#[derive(Clone)]
pub struct ProjectQuery<R: ProjectReader, U: UserRepository> {
    projects: Arc<R>,
    users: Arc<U>,
}

impl<R: ProjectReader, U: UserRepository> ProjectQuery<R, U> {
    pub fn new(projects: Arc<R>, users: Arc<U>) -> Self {
        Self { projects, users }
    }

    /// List projects readable by `viewer_username`, newest first, with
    /// caller-supplied pagination bounds (no clamping here).
    ///
    /// Personalization is best-effort: a username that does not resolve is
    /// treated as an anonymous request, never an error.
    pub async fn list(
        &self,
        limit: u64,
        offset: u64,
        viewer_username: Option<&str>,
    ) -> ProjectResult<Vec<ProjectView>> {
        let viewer = self.resolve_viewer(viewer_username).await;
        let viewer_id = viewer.as_ref().map(|u| u.id);

        let projects = self.projects.list(viewer_id, limit, offset).await?;

        let liked = match &viewer {
            Some(user) if !projects.is_empty() => {
                let ids: Vec<i32> = projects.iter().map(|p| p.id).collect();
                self.projects.liked_project_ids(user.id, &ids).await?
            }
            _ => HashSet::new(),
        };

        Ok(projects
            .into_iter()
            .map(|project| ProjectView {
                is_liked: liked.contains(&project.id),
                project,
            })
            .collect())
    }

    /// Viewer-aware point lookup. A project hidden from the viewer surfaces
    /// as `NotFound`, identical in shape to a missing row.
    pub async fn get(
        &self,
        id: i32,
        viewer_username: Option<&str>,
    ) -> ProjectResult<ProjectView> {
        let viewer = self.resolve_viewer(viewer_username).await;

        let project = self
            .projects
            .get_aggregate(id)
            .await?
            .ok_or(ProjectError::NotFound(id))?;

        if !visibility::can_view(
            project.visibility,
            project.created_by,
            viewer.as_ref().map(|u| u.id),
        ) {
            return Err(ProjectError::NotFound(id));
        }

        let is_liked = match &viewer {
            Some(user) => self.projects.is_liked(user.id, project.id).await?,
            None => false,
        };

        Ok(ProjectView { project, is_liked })
    }

    /// Best-effort viewer resolution: absent, blank, unknown, or failing
    /// lookups all degrade to anonymous.
    async fn resolve_viewer(&self, viewer_username: Option<&str>) -> Option<User> {
        let username = viewer_username?.trim();
        if username.is_empty() {
            return None;
        }

        match self.users.get_by_username(username).await {
            Ok(user) => user,
            Err(e) => {
                tracing::debug!(username, error = %e, "Viewer lookup failed; treating as anonymous");
                None
            }
        }
    }
}
