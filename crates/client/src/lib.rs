//! `devdiaries-client`
//!
//! **Responsibility:** the Dev Diaries client core.
//!
//! This crate provides:
//! - A typed request layer over the remote blog store (`api`)
//! - Per-resource in-memory caches kept in sync by refetch-after-mutation (`cache`)
//! - Sign-in / sign-out / registration flows over the session store (`flows`)
//! - File-backed credential storage and configuration
//!
//! The remote store stays the authority; nothing is written locally ahead of
//! a confirmed response.

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod flows;
pub mod storage;

pub use api::{ResourceApi, ResourceClient};
pub use app::ClientApp;
pub use cache::{CacheError, Confirmed, Operation, ResourceCache};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use storage::FileStorage;
