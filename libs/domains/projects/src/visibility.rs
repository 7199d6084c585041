//! Visibility policy: who may read which project.
//!
//! The policy is binary, not role-based: public projects are readable by
//! anyone (including anonymous viewers), non-public projects only by their
//! creator. Callers normalize a denied read to `ProjectError::NotFound` so a
//! hidden project is indistinguishable from a missing one.

use sea_orm::{ColumnTrait, Condition};

use crate::entity::project;
use crate::models::Visibility;

/// Whether `viewer` may read a project with the given visibility and owner.
pub fn can_view(visibility: Visibility, created_by: i32, viewer: Option<i32>) -> bool {
    match visibility {
        Visibility::Public => true,
        _ => viewer == Some(created_by),
    }
}

/// Listing predicate matching `can_view` row by row: `visibility = public`
/// for anonymous listings, `created_by = viewer OR visibility = public` for
/// an authenticated viewer (their own private projects plus everyone's
/// public ones).
pub fn listing_condition(viewer: Option<i32>) -> Condition {
    match viewer {
        None => Condition::all().add(project::Column::Visibility.eq(Visibility::Public)),
        Some(user_id) => Condition::any()
            .add(project::Column::Visibility.eq(Visibility::Public))
            .add(project::Column::CreatedBy.eq(user_id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_viewable_by_anyone() {
        assert!(can_view(Visibility::Public, 1, None));
        assert!(can_view(Visibility::Public, 1, Some(1)));
        assert!(can_view(Visibility::Public, 1, Some(2)));
    }

    #[test]
    fn test_private_viewable_only_by_creator() {
        assert!(can_view(Visibility::Private, 1, Some(1)));
        assert!(!can_view(Visibility::Private, 1, Some(2)));
        assert!(!can_view(Visibility::Private, 1, None));
    }
}
