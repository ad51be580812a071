use serde::{Deserialize, Serialize};

use crate::claims::Claims;

/// Identity fields handed to [`crate::SessionStore::login`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorData {
    pub email: String,
    pub is_admin: bool,
}

impl ActorData {
    pub fn new(email: impl Into<String>, is_admin: bool) -> Self {
        Self {
            email: email.into(),
            is_admin,
        }
    }
}

impl From<Claims> for ActorData {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.email,
            is_admin: claims.is_admin,
        }
    }
}

/// The resolved current user of the running session.
///
/// `Anonymous` is the only representation of "nobody": identity data with an
/// empty email is normalized to it on construction, so equality checks never
/// have to reconcile two shapes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Actor {
    #[default]
    Anonymous,
    Authenticated { email: String, is_admin: bool },
}

impl Actor {
    /// Build an actor from identity data.
    ///
    /// A blank email yields `Anonymous` whatever `is_admin` says, so claims
    /// carrying only `isAdmin: true` grant nothing.
    pub fn from_data(data: ActorData) -> Self {
        if data.email.trim().is_empty() {
            return Self::Anonymous;
        }
        Self::Authenticated {
            email: data.email,
            is_admin: data.is_admin,
        }
    }

    pub fn from_claims(claims: Claims) -> Self {
        Self::from_data(claims.into())
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Authenticated { is_admin: true, .. })
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { email, .. } => Some(email),
        }
    }
}

impl core::fmt::Display for Actor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Anonymous => f.write_str("anonymous"),
            Self::Authenticated { email, is_admin: true } => write!(f, "{email} (admin)"),
            Self::Authenticated { email, .. } => f.write_str(email),
        }
    }
}

impl From<ActorData> for Actor {
    fn from(value: ActorData) -> Self {
        Self::from_data(value)
    }
}
