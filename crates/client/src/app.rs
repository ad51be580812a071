//! Wiring of session, client and cache for one running process.

use std::sync::Arc;

use devdiaries_auth::{
    Actor, Capability, CredentialStorage, ListingView, Route, RouteDecision, SessionStore, guard,
    listing_view,
};
use devdiaries_core::Registration;

use crate::api::ResourceClient;
use crate::cache::ResourceCache;
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::flows;
use crate::storage::FileStorage;

/// Application state shared by every view.
#[derive(Clone)]
pub struct ClientApp {
    pub session: Arc<SessionStore>,
    pub client: Arc<ResourceClient>,
    pub cache: ResourceCache<ResourceClient>,
}

impl ClientApp {
    /// Build from configuration with file-backed storage and restore the
    /// previous session.
    pub fn bootstrap(config: &ClientConfig) -> Self {
        let storage = Arc::new(FileStorage::new(config.storage_path.clone()));
        Self::with_storage(config, storage)
    }

    /// Build over any storage backend and restore the previous session.
    pub fn with_storage(config: &ClientConfig, storage: Arc<dyn CredentialStorage>) -> Self {
        let session = Arc::new(SessionStore::new(storage));
        session.restore();

        let client = Arc::new(ResourceClient::new(config.api_url.clone(), session.clone()));
        let cache = ResourceCache::new(client.clone());

        tracing::info!(api_url = %config.api_url, "client ready");
        Self {
            session,
            client,
            cache,
        }
    }

    pub fn actor(&self) -> Actor {
        self.session.actor()
    }

    pub fn allows(&self, capability: Capability) -> bool {
        self.session.allows(capability)
    }

    pub fn navigate(&self, route: Route) -> RouteDecision {
        guard(&self.actor(), route)
    }

    pub fn listing_view(&self) -> ListingView {
        listing_view(&self.actor())
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> ClientResult<Actor> {
        flows::sign_in(&self.client, email, password).await
    }

    pub fn sign_out(&self) -> ClientResult<()> {
        flows::sign_out(&self.session, &self.cache)
    }

    pub async fn register(&self, registration: &Registration) -> ClientResult<()> {
        flows::register(&self.client, registration).await
    }
}
