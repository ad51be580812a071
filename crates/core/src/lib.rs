//! `devdiaries-core`: blog domain building blocks.
//!
//! This crate contains **pure domain** types shared by the auth and client
//! crates (no HTTP, no storage).

pub mod entity;
pub mod error;
pub mod id;
pub mod model;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{BlogId, CommentId};
pub use model::{BlogDraft, BlogPost, Comment, NewComment, PersonName, Registration};
