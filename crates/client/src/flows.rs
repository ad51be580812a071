//! Account flows: sign-in, sign-out, registration.

use devdiaries_auth::{Actor, ActorData, SessionStore, claims};
use devdiaries_core::{DomainError, Registration};

use crate::api::{ResourceApi, ResourceClient};
use crate::cache::ResourceCache;
use crate::error::{ClientError, ClientResult};

/// Message the store answers a successful registration with.
pub const REGISTERED_MESSAGE: &str = "User registered successfully";

/// Exchange email/password for a credential and make it the session's identity.
///
/// Order matters: the credential is persisted first, then decoded, then the
/// actor is replaced.
pub async fn sign_in(client: &ResourceClient, email: &str, password: &str) -> ClientResult<Actor> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(DomainError::validation("email and password are required").into());
    }

    let token = client.login(email, password).await?;
    let session = client.session();
    session.store_credential(&token).map_err(ClientError::storage)?;

    let decoded = claims::decode(&token);
    let email = if decoded.email.is_empty() {
        email.trim().to_string()
    } else {
        decoded.email
    };

    Ok(session.login(ActorData::new(email, decoded.is_admin)))
}

/// Reset the session and drop every cached view of the previous actor.
///
/// The cache is cleared even if removing the stored credential fails.
pub fn sign_out<A: ResourceApi + ?Sized>(session: &SessionStore, cache: &ResourceCache<A>) -> ClientResult<()> {
    cache.clear();
    session.logout().map_err(ClientError::storage)
}

/// Create an account. Does not sign the new user in.
pub async fn register(client: &ResourceClient, registration: &Registration) -> ClientResult<()> {
    registration.validate()?;

    if client.check_email(&registration.email).await? {
        tracing::info!("registration refused: email already registered");
        return Err(ClientError::EmailTaken);
    }

    let message = client.register(registration).await?;
    if message == REGISTERED_MESSAGE {
        tracing::info!("account registered");
        Ok(())
    } else {
        let message = if message.is_empty() {
            "Registration failed".to_string()
        } else {
            message
        };
        Err(ClientError::rejected(200, message))
    }
}
