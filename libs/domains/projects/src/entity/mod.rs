//! Sea-ORM entities for the projects schema
//!
//! `project` owns the scalar row; the join entities carry the many-to-many
//! edges to tags, technologies, contributors, and likes.

pub mod project;
pub mod project_contributor;
pub mod project_like;
pub mod project_tag;
pub mod project_technology;
pub mod tag;
pub mod technology;
