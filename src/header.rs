use miniserde::{Deserialize, Serialize};

use crate::cipher::EncryptionScheme;
use crate::error::{Error, Result};
use crate::limits::MAX_ALG_LENGTH;

/// Label written to `alg` unless the issuer is told otherwise
pub const DEFAULT_ALG: &str = "RS256";

/// Token header
///
/// `alg` is descriptive only. Verification never reads it to pick a digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
    /// Declared signing algorithm
    #[serde(rename = "alg")]
    pub algorithm: String,

    /// Token type (typically "JWT")
    #[serde(rename = "typ")]
    pub token_type: Option<String>,

    /// Payload encryption scheme; absent means RSA-OAEP-256
    #[serde(rename = "enc")]
    pub encryption: Option<String>,
}

impl TokenHeader {
    pub(crate) fn new(algorithm: impl Into<String>, scheme: EncryptionScheme) -> Self {
        Self {
            algorithm: algorithm.into(),
            token_type: Some("JWT".into()),
            encryption: Some(scheme.label().into()),
        }
    }

    /// Serialize to the JSON placed in the first segment
    pub(crate) fn to_json(&self) -> String {
        miniserde::json::to_string(self)
    }

    /// Parse header JSON from a verified token
    pub(crate) fn from_json(json: &[u8]) -> Result<Self> {
        let json = std::str::from_utf8(json)
            .map_err(|e| Error::HeaderInvalid(format!("Invalid UTF-8: {e}")))?;
        let header: TokenHeader = miniserde::json::from_str(json)
            .map_err(|e| Error::HeaderInvalid(format!("Failed to parse header: {e}")))?;

        if header.algorithm.len() > MAX_ALG_LENGTH {
            return Err(Error::HeaderInvalid(format!(
                "alg too long: {} bytes (maximum: {MAX_ALG_LENGTH} bytes)",
                header.algorithm.len()
            )));
        }

        Ok(header)
    }

    /// Encryption scheme the payload was sealed with
    pub fn encryption_scheme(&self) -> Result<EncryptionScheme> {
        match self.encryption.as_deref() {
            Some(label) => EncryptionScheme::from_label(label),
            None => Ok(EncryptionScheme::RsaOaepSha256),
        }
    }

    /// Get algorithm as string
    pub fn algorithm_str(&self) -> &str {
        &self.algorithm
    }
}
