//! `classroom-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns)
//! shared by the catalog, the group allocation domain and the infrastructure
//! adapters.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;
pub mod version;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AuthorId, GroupId, LessonId, ProductId, StudentId};
pub use value_object::ValueObject;
pub use version::ExpectedVersion;
