use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;

use crate::algorithm::{DigestAlgorithm, VerificationPolicy};
use crate::cipher;
use crate::claims::{self, Claims, SsoClaims};
use crate::error::{Error, Result};
use crate::header::TokenHeader;
use crate::keys::{PayloadPrivateKey, SigningPublicKey};
use crate::limits::{
    MAX_CLOCK_SKEW_SECONDS, MAX_DECODED_HEADER_SIZE, MAX_DECODED_PAYLOAD_SIZE,
    MAX_DECODED_SIGNATURE_SIZE, MAX_SIGNATURE_B64_SIZE,
};
use crate::signature;
use crate::token::Token;
use crate::utils::base64url;

/// Outcome of a successful verification
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationResult<C = Claims> {
    /// Decrypted claims
    pub claims: C,

    /// Digest the signature actually verified under
    pub algorithm: DigestAlgorithm,

    /// Set when the signature only verified under SHA-1
    pub legacy: bool,

    /// Set when the claims have expired; only possible with
    /// [`TokenValidator::allow_expired`]
    pub expired: bool,

    /// The header's `alg` label, as the issuer declared it
    pub declared_alg: String,
}

/// Token validator
///
/// The validator is configured once and can be reused for multiple token
/// verifications. The claim type is specified when calling `verify`.
#[derive(Debug, Clone)]
pub struct TokenValidator {
    config_policy: VerificationPolicy,
    config_clock_skew_seconds: u64,
    config_require_expiry: bool,
    config_allow_expired: bool,
}

impl TokenValidator {
    /// Create a new validator with secure defaults
    ///
    /// SHA-256 with legacy SHA-1 fallback, no clock skew, expiry required
    /// and enforced.
    pub fn new() -> Self {
        Self {
            config_policy: VerificationPolicy::default(),
            config_clock_skew_seconds: 0,
            config_require_expiry: true,
            config_allow_expired: false,
        }
    }

    /// Configure the verification policy
    pub fn policy(&mut self, policy: VerificationPolicy) -> &mut Self {
        self.config_policy = policy;
        self
    }

    /// Set clock skew tolerance in seconds
    ///
    /// Clock skew is limited to 300 seconds so it cannot effectively disable
    /// expiry. A larger value makes every `verify` fail with
    /// [`Error::ClockSkewTooLarge`].
    pub fn clock_skew(&mut self, seconds: u64) -> &mut Self {
        self.config_clock_skew_seconds = seconds;
        self
    }

    /// Whether claims without `expires_at` are rejected (default: true)
    pub fn require_expiry(&mut self, required: bool) -> &mut Self {
        self.config_require_expiry = required;
        self
    }

    /// Return expired claims flagged with `expired = true` instead of
    /// rejecting them
    pub fn allow_expired(&mut self) -> &mut Self {
        self.config_allow_expired = true;
        self
    }

    /// Finish configuration
    pub fn build(&mut self) -> Self {
        self.clone()
    }
}

impl TokenValidator {
    /// Verify a token string
    pub fn verify<C>(
        &self,
        token: &str,
        signing_key: &SigningPublicKey,
        payload_key: &PayloadPrivateKey,
        now: DateTime<Utc>,
    ) -> Result<VerificationResult<C>>
    where
        C: DeserializeOwned + SsoClaims,
    {
        let token = Token::parse(token)?;
        self.verify_token(&token, signing_key, payload_key, now)
    }

    /// Verify an already-split token
    ///
    /// Nothing about the claims, including their expiry, is examined until
    /// the signature has verified and the payload has decrypted.
    pub fn verify_token<C>(
        &self,
        token: &Token,
        signing_key: &SigningPublicKey,
        payload_key: &PayloadPrivateKey,
        now: DateTime<Utc>,
    ) -> Result<VerificationResult<C>>
    where
        C: DeserializeOwned + SsoClaims,
    {
        let skew = self.skew()?;

        // 1-2. Decode all three segments with size limits
        if token.signature_b64().len() > MAX_SIGNATURE_B64_SIZE {
            return Err(Error::MalformedEncoding(format!(
                "signature segment is {} characters (maximum: {MAX_SIGNATURE_B64_SIZE})",
                token.signature_b64().len()
            )));
        }
        let header_json = base64url::decode_bounded(token.header_b64(), MAX_DECODED_HEADER_SIZE)?;
        let ciphertext = base64url::decode_bounded(token.payload_b64(), MAX_DECODED_PAYLOAD_SIZE)?;
        let signature_bytes =
            base64url::decode_bounded(token.signature_b64(), MAX_DECODED_SIGNATURE_SIZE)?;

        // 3. Verify the signature over the segments as received
        let signing_input = token.signing_input();
        let algorithm = signature::verify(
            signing_input.as_bytes(),
            &signature_bytes,
            signing_key,
            &self.config_policy,
        )?;

        // 4. Only now is the header trusted enough to read
        let header = TokenHeader::from_json(&header_json)?;
        header.encryption_scheme()?;

        // 5. Decrypt
        let claims_json = cipher::decrypt(&ciphertext, payload_key)?;

        // 6. Parse claims
        let claims: C = claims::from_json(&claims_json)?;

        // 7. Check expiry
        let expired = match claims.expires_at() {
            Some(expires_at) if claims::is_expired(expires_at, now, skew) => {
                if !self.config_allow_expired {
                    return Err(Error::Expired { expires_at, now });
                }
                true
            }
            Some(_) => false,
            None if self.config_require_expiry => {
                return Err(Error::InvalidClaims("expires_at is required".into()));
            }
            None => false,
        };

        Ok(VerificationResult {
            claims,
            algorithm,
            legacy: algorithm.is_legacy(),
            expired,
            declared_alg: header.algorithm,
        })
    }

    fn skew(&self) -> Result<Duration> {
        if self.config_clock_skew_seconds > MAX_CLOCK_SKEW_SECONDS {
            return Err(Error::ClockSkewTooLarge {
                value: self.config_clock_skew_seconds,
                max: MAX_CLOCK_SKEW_SECONDS,
            });
        }
        Ok(Duration::seconds(self.config_clock_skew_seconds as i64))
    }
}

impl Default for TokenValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Verify a token with the default validator and [`Claims`]
pub fn verify(
    token: &str,
    signing_key: &SigningPublicKey,
    payload_key: &PayloadPrivateKey,
    now: DateTime<Utc>,
) -> Result<VerificationResult<Claims>> {
    TokenValidator::new().verify(token, signing_key, payload_key, now)
}
