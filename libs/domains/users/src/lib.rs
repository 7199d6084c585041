//! Users Domain
//!
//! Owns the User entity referenced by the rest of the platform. The project
//! core only ever reads users (creator, contributors, acting viewer); user
//! creation belongs to whatever composes this module.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::InMemoryUserRepository;
//!
//! let repository = InMemoryUserRepository::new();
//! ```

pub mod entity;
pub mod error;
pub mod models;
pub mod postgres;
pub mod repository;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use models::{CreateUser, User};
pub use postgres::PostgresUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
