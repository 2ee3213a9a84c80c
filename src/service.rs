//! Key-provider backed issuing and verifying services
//!
//! These wrap [`TokenIssuer`] and [`TokenValidator`] for the common case of
//! a long-lived service object. Each call loads the two keys its role needs
//! from the [`KeyProvider`], uses them, and drops them before returning.
//!
//! This is also the only layer that logs. Outcomes are recorded with
//! `tracing` under the `ssotoken` target: successes at `debug`, legacy
//! SHA-1 matches at `warn` and rejections at `info` with their
//! [`ErrorKind`](crate::ErrorKind). Claims are never logged.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::claims::{Claims, SsoClaims};
use crate::error::Result;
use crate::issuer::TokenIssuer;
use crate::keys::KeyProvider;
use crate::token::Token;
use crate::validator::{TokenValidator, VerificationResult};

/// Issuing side: holds a signing private key and the target's payload
/// public key through `P`
#[derive(Debug, Clone)]
pub struct SsoIssuer<P> {
    keys: P,
    issuer: TokenIssuer,
}

impl<P: KeyProvider> SsoIssuer<P> {
    /// Issuer with the default [`TokenIssuer`] configuration
    pub fn new(keys: P) -> Self {
        Self::with_issuer(keys, TokenIssuer::new())
    }

    pub fn with_issuer(keys: P, issuer: TokenIssuer) -> Self {
        Self { keys, issuer }
    }

    /// Issue a token for `claims`
    pub fn issue<C>(&self, claims: &C, now: DateTime<Utc>) -> Result<Token>
    where
        C: Serialize + SsoClaims,
    {
        let result = self.keys.load_signing_private_key().and_then(|signing_key| {
            let payload_key = self.keys.load_payload_public_key()?;
            self.issuer.issue(claims, &signing_key, &payload_key, now)
        });

        match &result {
            Ok(_) => tracing::debug!(target: "ssotoken", "issued token"),
            Err(e) => tracing::warn!(target: "ssotoken", kind = %e.kind(), "token issuance failed: {e}"),
        }

        result
    }
}

/// Verifying side: holds the signing public key and its own payload
/// private key through `P`
#[derive(Debug, Clone)]
pub struct SsoVerifier<P> {
    keys: P,
    validator: TokenValidator,
}

impl<P: KeyProvider> SsoVerifier<P> {
    /// Verifier with the default [`TokenValidator`] configuration
    pub fn new(keys: P) -> Self {
        Self::with_validator(keys, TokenValidator::new())
    }

    pub fn with_validator(keys: P, validator: TokenValidator) -> Self {
        Self { keys, validator }
    }

    /// Verify `token` into the default [`Claims`]
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<VerificationResult<Claims>> {
        self.verify_with_custom(token, now)
    }

    /// Verify `token` into a custom claims type
    pub fn verify_with_custom<C>(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<VerificationResult<C>>
    where
        C: DeserializeOwned + SsoClaims,
    {
        let result = self.keys.load_signing_public_key().and_then(|signing_key| {
            let payload_key = self.keys.load_payload_private_key()?;
            self.validator.verify(token, &signing_key, &payload_key, now)
        });

        match &result {
            Ok(verified) if verified.legacy => tracing::warn!(
                target: "ssotoken",
                algorithm = %verified.algorithm,
                declared_alg = %verified.declared_alg,
                "token verified with legacy digest"
            ),
            Ok(verified) => tracing::debug!(
                target: "ssotoken",
                algorithm = %verified.algorithm,
                expired = verified.expired,
                "token verified"
            ),
            Err(e) if e.is_rejection() => {
                tracing::info!(target: "ssotoken", kind = %e.kind(), "token rejected")
            }
            Err(e) => {
                tracing::warn!(target: "ssotoken", kind = %e.kind(), "token verification failed: {e}")
            }
        }

        result
    }
}
