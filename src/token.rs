//! The token value: three Base64URL segments joined by `.`

use crate::error::{Error, Result};
use crate::limits::MAX_TOKEN_LENGTH;

/// A structurally well-formed token
///
/// Holds the segments exactly as received. Nothing has been decoded or
/// checked beyond the segment count and overall length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    header_b64: String,
    payload_b64: String,
    signature_b64: String,
}

impl Token {
    /// Split a token string into its three segments
    pub fn parse(token: &str) -> Result<Self> {
        if token.len() > MAX_TOKEN_LENGTH {
            return Err(Error::TokenTooLarge {
                size: token.len(),
                max: MAX_TOKEN_LENGTH,
            });
        }

        let mut parts = token.split('.');
        let header_b64 = parts.next().ok_or(Error::Malformed)?;
        let payload_b64 = parts.next().ok_or(Error::Malformed)?;
        let signature_b64 = parts.next().ok_or(Error::Malformed)?;
        if parts.next().is_some() {
            return Err(Error::Malformed);
        }

        Ok(Self {
            header_b64: header_b64.into(),
            payload_b64: payload_b64.into(),
            signature_b64: signature_b64.into(),
        })
    }

    pub(crate) fn from_segments(header_b64: String, payload_b64: String, signature_b64: String) -> Self {
        Self {
            header_b64,
            payload_b64,
            signature_b64,
        }
    }

    /// Encoded header segment
    pub fn header_b64(&self) -> &str {
        &self.header_b64
    }

    /// Encoded payload ciphertext segment
    pub fn payload_b64(&self) -> &str {
        &self.payload_b64
    }

    /// Encoded signature segment
    pub fn signature_b64(&self) -> &str {
        &self.signature_b64
    }

    /// The bytes the signature covers: `header_b64 + "." + payload_b64`
    pub fn signing_input(&self) -> String {
        signing_input(&self.header_b64, &self.payload_b64)
    }
}

pub(crate) fn signing_input(header_b64: &str, payload_b64: &str) -> String {
    format!("{header_b64}.{payload_b64}")
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.header_b64, self.payload_b64, self.signature_b64
        )
    }
}

impl std::str::FromStr for Token {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
