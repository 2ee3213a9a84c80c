//! Errors for ssotoken
//!
//! Every failure is a distinct variant so callers can log the precise cause.
//! HTTP layers should not forward that precision to clients: use
//! [`Error::public_message`] for anything user-visible.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::keys::KeyRole;

/// Message returned by [`Error::public_message`] for every rejection
pub const REJECTION_MESSAGE: &str = "authentication failed";

/// ssotoken Errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Token too large: {size} bytes (maximum: {max} bytes)")]
    TokenTooLarge { size: usize, max: usize },

    // ============================================================================
    // Format Errors
    // ============================================================================
    #[error("Malformed token: expected three segments separated by '.'")]
    Malformed,

    #[error("Base64URL decoding failed: {0}")]
    MalformedEncoding(String),

    // ============================================================================
    // Verification Errors
    // ============================================================================
    #[error("Signature verification failed")]
    SignatureInvalid,

    #[error("Token header invalid: {0}")]
    HeaderInvalid(String),

    #[error("Payload encryption scheme '{0}' is not supported")]
    UnsupportedEncryption(String),

    #[error("Payload decryption failed")]
    DecryptionFailed,

    #[error("Token claims invalid: {0}")]
    InvalidClaims(String),

    #[error("Token expired at {expires_at} (now: {now})")]
    Expired {
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    // ============================================================================
    // Issuance Errors
    // ============================================================================
    #[error("Payload encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    // ============================================================================
    // Key and Configuration Errors
    // ============================================================================
    #[error("{role} rejected: {reason}")]
    KeyRejected { role: KeyRole, reason: String },

    #[error("{0} is not available from this key provider")]
    KeyUnavailable(KeyRole),

    #[error("Clock skew too large: {value} seconds (maximum: {max} seconds)")]
    ClockSkewTooLarge { value: u64, max: u64 },
}

/// Fieldless tag for an [`Error`], suitable for log fields and metric labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Malformed,
    MalformedEncoding,
    SignatureInvalid,
    HeaderInvalid,
    UnsupportedEncryption,
    DecryptionFailed,
    InvalidClaims,
    Expired,
    EncryptionFailed,
    SigningFailed,
    KeyRejected,
    KeyUnavailable,
    Configuration,
}

impl ErrorKind {
    /// Stable snake_case name
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Malformed => "malformed",
            ErrorKind::MalformedEncoding => "malformed_encoding",
            ErrorKind::SignatureInvalid => "signature_invalid",
            ErrorKind::HeaderInvalid => "header_invalid",
            ErrorKind::UnsupportedEncryption => "unsupported_encryption",
            ErrorKind::DecryptionFailed => "decryption_failed",
            ErrorKind::InvalidClaims => "invalid_claims",
            ErrorKind::Expired => "expired",
            ErrorKind::EncryptionFailed => "encryption_failed",
            ErrorKind::SigningFailed => "signing_failed",
            ErrorKind::KeyRejected => "key_rejected",
            ErrorKind::KeyUnavailable => "key_unavailable",
            ErrorKind::Configuration => "configuration",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Tag for this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            // An oversized token is a structural rejection like a wrong segment count
            Error::TokenTooLarge { .. } | Error::Malformed => ErrorKind::Malformed,
            Error::MalformedEncoding(_) => ErrorKind::MalformedEncoding,
            Error::SignatureInvalid => ErrorKind::SignatureInvalid,
            Error::HeaderInvalid(_) => ErrorKind::HeaderInvalid,
            Error::UnsupportedEncryption(_) => ErrorKind::UnsupportedEncryption,
            Error::DecryptionFailed => ErrorKind::DecryptionFailed,
            Error::InvalidClaims(_) => ErrorKind::InvalidClaims,
            Error::Expired { .. } => ErrorKind::Expired,
            Error::EncryptionFailed(_) => ErrorKind::EncryptionFailed,
            Error::SigningFailed(_) => ErrorKind::SigningFailed,
            Error::KeyRejected { .. } => ErrorKind::KeyRejected,
            Error::KeyUnavailable(_) => ErrorKind::KeyUnavailable,
            Error::ClockSkewTooLarge { .. } => ErrorKind::Configuration,
        }
    }

    /// Whether this error rejects a presented token
    ///
    /// Key, configuration and issuance failures are operator problems, not
    /// verdicts on the token.
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::TokenTooLarge { .. }
                | Error::Malformed
                | Error::MalformedEncoding(_)
                | Error::SignatureInvalid
                | Error::HeaderInvalid(_)
                | Error::UnsupportedEncryption(_)
                | Error::DecryptionFailed
                | Error::InvalidClaims(_)
                | Error::Expired { .. }
        )
    }

    /// Text safe to show to the presenter of a token
    ///
    /// All rejections share one message so that responses cannot be used as
    /// an oracle.
    pub fn public_message(&self) -> String {
        if self.is_rejection() {
            REJECTION_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

/// Result type alias for ssotoken operations
pub type Result<T> = std::result::Result<T, Error>;
