//! Identity claims carried inside the encrypted payload
//!
//! Any `serde` type can be a claims document as long as it implements
//! [`SsoClaims`], which exposes the two fields the token machinery itself
//! needs. [`Claims`] is the ready-made record used by the sign-in services.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Fields every claims document must expose
pub trait SsoClaims {
    /// Subject identifier
    fn subject(&self) -> &str;

    /// Absolute expiry; `None` when the document carries none
    fn expires_at(&self) -> Option<DateTime<Utc>>;
}

/// Standard identity claims
///
/// Fields beyond the named ones are kept in `extra` and survive a round trip.
/// Keep the document small: it has to fit in a single RSA block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identifier
    pub sub: String,

    /// Email address of the subject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Password-derived hash, for services that re-check credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,

    /// Absolute expiry (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Application-defined fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Claims for `subject` expiring at `expires_at`
    pub fn new(subject: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: subject.into(),
            email: None,
            password_hash: None,
            expires_at: Some(expires_at),
            extra: Map::new(),
        }
    }

    /// Set the email address
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the password-derived hash
    pub fn password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = Some(hash.into());
        self
    }

    /// Add an application-defined field
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}

impl SsoClaims for Claims {
    fn subject(&self) -> &str {
        &self.sub
    }

    fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

/// Whether `expires_at` has passed at `now`, allowing `skew` of leeway
///
/// The boundary is exclusive: a token expiring exactly at `now` is expired.
pub(crate) fn is_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>, skew: Duration) -> bool {
    match expires_at.checked_add_signed(skew) {
        Some(deadline) => deadline <= now,
        None => false,
    }
}

/// Serialize claims to the JSON that gets encrypted
pub(crate) fn to_json<C: Serialize>(claims: &C) -> Result<Vec<u8>> {
    serde_json::to_vec(claims).map_err(|e| Error::InvalidClaims(format!("Failed to serialize: {e}")))
}

/// Parse decrypted JSON into claims
pub(crate) fn from_json<C: serde::de::DeserializeOwned>(json: &[u8]) -> Result<C> {
    serde_json::from_slice(json).map_err(|e| Error::InvalidClaims(format!("Failed to parse: {e}")))
}
