//! Session store: the single source of truth for "who is acting".

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::actor::{Actor, ActorData};
use crate::authorize::allowed;
use crate::capability::Capability;
use crate::claims;
use crate::storage::{CREDENTIAL_KEY, CredentialStorage};

/// Holds the current [`Actor`] and owns the persisted credential.
///
/// Share it as `Arc<SessionStore>`; every consumer (policy checks, the
/// resource client) reads identity from here rather than decoding on its own.
pub struct SessionStore {
    actor: RwLock<Actor>,
    storage: Arc<dyn CredentialStorage>,
    restored: AtomicBool,
}

impl SessionStore {
    /// A fresh, anonymous session over `storage`. Call [`restore`](Self::restore)
    /// before showing any gated view.
    pub fn new(storage: Arc<dyn CredentialStorage>) -> Self {
        Self {
            actor: RwLock::new(Actor::Anonymous),
            storage,
            restored: AtomicBool::new(false),
        }
    }

    /// Rebuild the actor from a credential left by a previous run.
    ///
    /// Only the first call reads storage; later calls return the current actor.
    pub fn restore(&self) -> Actor {
        if self.restored.swap(true, Ordering::SeqCst) {
            tracing::debug!("session already restored");
            return self.actor();
        }

        let actor = match self.credential() {
            Some(token) => {
                let decoded = claims::try_decode(&token).unwrap_or_else(|err| {
                    tracing::warn!(error = %err, "stored credential is unusable; continuing anonymous");
                    claims::Claims::default()
                });
                Actor::from_claims(decoded)
            }
            None => Actor::Anonymous,
        };

        tracing::info!(actor = %actor, "session restored");
        self.set_actor(actor.clone());
        actor
    }

    /// Replace the actor. Persisting the credential is the login flow's job.
    pub fn login(&self, data: ActorData) -> Actor {
        let actor = Actor::from_data(data);
        tracing::info!(actor = %actor, "signed in");
        self.set_actor(actor.clone());
        actor
    }

    /// Reset to anonymous and forget the persisted credential.
    ///
    /// The in-memory actor is reset even when storage removal fails.
    pub fn logout(&self) -> anyhow::Result<()> {
        self.set_actor(Actor::Anonymous);
        tracing::info!("signed out");
        self.storage.remove(CREDENTIAL_KEY)
    }

    pub fn actor(&self) -> Actor {
        self.actor
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn allows(&self, capability: Capability) -> bool {
        allowed(&self.actor(), capability)
    }

    /// Navbar rule: someone with a usable email is signed in.
    pub fn is_signed_in(&self) -> bool {
        self.actor().is_authenticated()
    }

    /// The raw credential, if one is stored. Storage failures read as absent.
    pub fn credential(&self) -> Option<String> {
        match self.storage.get(CREDENTIAL_KEY) {
            Ok(Some(token)) if !token.trim().is_empty() => Some(token),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read credential from storage");
                None
            }
        }
    }

    /// Persist a freshly issued credential.
    pub fn store_credential(&self, token: &str) -> anyhow::Result<()> {
        self.storage.set(CREDENTIAL_KEY, token)
    }

    fn set_actor(&self, actor: Actor) {
        *self.actor.write().unwrap_or_else(PoisonError::into_inner) = actor;
    }
}

impl core::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionStore")
            .field("actor", &self.actor())
            .field("restored", &self.restored.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
