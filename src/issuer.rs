use chrono::{DateTime, Utc};
use serde::Serialize;
use zeroize::Zeroizing;

use crate::cipher::{self, EncryptionScheme};
use crate::claims::{self, SsoClaims};
use crate::error::{Error, Result};
use crate::header::{DEFAULT_ALG, TokenHeader};
use crate::keys::{PayloadPublicKey, SigningPrivateKey};
use crate::limits::MAX_ALG_LENGTH;
use crate::signature;
use crate::token::{self, Token};
use crate::utils::base64url;

/// Token issuer
///
/// Configured once, then used for any number of [`issue`](Self::issue)
/// calls. Issuance always signs with SHA-256 and encrypts with
/// RSA-OAEP-256, whatever `alg` label the header is told to carry.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    config_alg: String,
    config_allow_missing_expiry: bool,
}

impl TokenIssuer {
    /// Create an issuer that writes `RS256` and requires an expiry
    pub fn new() -> Self {
        Self {
            config_alg: DEFAULT_ALG.into(),
            config_allow_missing_expiry: false,
        }
    }

    /// Set the `alg` label written to the header
    ///
    /// The label is descriptive. Verifiers ignore it when checking the
    /// signature.
    pub fn header_alg(&mut self, alg: impl Into<String>) -> &mut Self {
        self.config_alg = alg.into();
        self
    }

    /// Issue tokens for claims without `expires_at`
    pub fn allow_missing_expiry(&mut self) -> &mut Self {
        self.config_allow_missing_expiry = true;
        self
    }

    /// Finish configuration
    pub fn build(&mut self) -> Self {
        self.clone()
    }

    /// Assemble a token for `claims`
    ///
    /// The claims are encrypted to `payload_key`, so only the holder of the
    /// matching private key can read them, and the envelope is signed with
    /// `signing_key`.
    pub fn issue<C>(
        &self,
        claims: &C,
        signing_key: &SigningPrivateKey,
        payload_key: &PayloadPublicKey,
        now: DateTime<Utc>,
    ) -> Result<Token>
    where
        C: Serialize + SsoClaims,
    {
        // 1. Refuse claims that are already dead on arrival
        match claims.expires_at() {
            Some(expires_at) if expires_at <= now => {
                return Err(Error::Expired { expires_at, now });
            }
            Some(_) => {}
            None if self.config_allow_missing_expiry => {}
            None => {
                return Err(Error::InvalidClaims("expires_at is required".into()));
            }
        }

        if self.config_alg.is_empty() || self.config_alg.len() > MAX_ALG_LENGTH {
            return Err(Error::HeaderInvalid(format!(
                "alg must be 1 to {MAX_ALG_LENGTH} bytes"
            )));
        }

        // 2. Encrypt and encode the claims
        let claims_json = Zeroizing::new(claims::to_json(claims)?);
        let ciphertext = cipher::encrypt(&claims_json, payload_key)?;
        let payload_b64 = base64url::encode(&ciphertext);

        // 3. Encode the header
        let header = TokenHeader::new(self.config_alg.as_str(), EncryptionScheme::default());
        let header_b64 = base64url::encode(header.to_json());

        // 4. Sign the segments exactly as they will be sent
        let signing_input = token::signing_input(&header_b64, &payload_b64);
        let signature = signature::sign(signing_input.as_bytes(), signing_key)?;
        let signature_b64 = base64url::encode(&signature);

        Ok(Token::from_segments(header_b64, payload_b64, signature_b64))
    }
}

impl Default for TokenIssuer {
    fn default() -> Self {
        Self::new()
    }
}

/// Issue a token with the default issuer configuration
pub fn issue<C>(
    claims: &C,
    signing_key: &SigningPrivateKey,
    payload_key: &PayloadPublicKey,
    now: DateTime<Utc>,
) -> Result<Token>
where
    C: Serialize + SsoClaims,
{
    TokenIssuer::new().issue(claims, signing_key, payload_key, now)
}
