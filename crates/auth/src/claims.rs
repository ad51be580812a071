//! Bearer credential decoding.
//!
//! The credential is a JWT-shaped string (`header.payload.signature`). Only the
//! payload is read; signature verification is the remote store's job.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde_json::Value;
use thiserror::Error;

/// Standard alphabet, padding optional, trailing bits ignored.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Identity attributes carried by a credential.
///
/// The default value (`email` empty, not admin) is the "no usable identity"
/// claims set that every decode failure collapses to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Claims {
    pub email: String,
    pub is_admin: bool,
}

impl Claims {
    pub fn is_empty(&self) -> bool {
        self.email.is_empty() && !self.is_admin
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("credential has no payload segment")]
    MissingPayload,

    #[error("payload is not valid base64: {0}")]
    Base64(String),

    #[error("payload is not a JSON document: {0}")]
    Json(String),
}

/// Decode a credential, reporting why it is unusable.
pub fn try_decode(credential: &str) -> Result<Claims, DecodeError> {
    let segment = credential
        .split('.')
        .nth(1)
        .ok_or(DecodeError::MissingPayload)?;

    let standard: String = segment
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    let bytes = PAYLOAD_ENGINE
        .decode(standard.as_bytes())
        .map_err(|e| DecodeError::Base64(e.to_string()))?;

    let doc: Value = serde_json::from_slice(&bytes).map_err(|e| DecodeError::Json(e.to_string()))?;

    // Non-object documents parse but carry no identity.
    let email = doc
        .get("email")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    // Only a literal `true` grants admin.
    let is_admin = doc.get("isAdmin") == Some(&Value::Bool(true));

    Ok(Claims { email, is_admin })
}

/// Decode a credential; any failure yields empty [`Claims`].
///
/// Total by construction: a corrupt or foreign credential never blocks the
/// caller.
pub fn decode(credential: &str) -> Claims {
    try_decode(credential).unwrap_or_default()
}
