//! `devdiaries-auth`: session identity and access policy.
//!
//! This crate is intentionally decoupled from HTTP. Credential persistence is
//! reached only through the [`CredentialStorage`] seam.

pub mod actor;
pub mod authorize;
pub mod capability;
pub mod claims;
pub mod session;
pub mod storage;

pub use actor::{Actor, ActorData};
pub use authorize::{
    AuthzError, ListingView, Route, RouteDecision, allowed, authorize, guard, listing_view,
};
pub use capability::Capability;
pub use claims::{Claims, DecodeError, decode, try_decode};
pub use session::SessionStore;
pub use storage::{CREDENTIAL_KEY, CredentialStorage, MemoryStorage};
