//! # ssotoken - Encrypted SSO Tokens
//!
//! > Issue and verify single-sign-on tokens whose claims only the target
//! > service can read.
//!
//! An SSO token looks like a JWT but its payload is ciphertext:
//!
//! ```text
//! base64url(header_json) . base64url(rsa_oaep(claims_json)) . base64url(rsa_sign(header_b64 "." payload_b64))
//! ```
//!
//! The header is `{"alg":"RS256","typ":"JWT","enc":"RSA-OAEP-256"}`. The
//! issuer signs with its signing private key and encrypts the claims to the
//! target service's payload public key. The target checks the signature with
//! the signing public key and decrypts with its own payload private key.
//!
//! ## Quick Start
//!
//! ```ignore
//! use chrono::{Duration, Utc};
//! use ssotoken::*;
//!
//! // Issuing service
//! let now = Utc::now();
//! let claims = Claims::new("DS123456", now + Duration::minutes(10)).email("test9@example.com");
//! let token = issue(&claims, &signing_private_key, &payload_public_key, now)?;
//!
//! // Target service
//! let verified = verify(&token.to_string(), &signing_public_key, &payload_private_key, Utc::now())?;
//! assert_eq!(verified.claims.sub, "DS123456");
//! if verified.legacy {
//!     // signed with SHA-1 by an old issuer
//! }
//! ```
//!
//! ## Verification Flow
//!
//! ```text
//! token string
//!     │ Token::parse          ── Malformed / TokenTooLarge
//!     ▼
//! three decoded segments      ── MalformedEncoding
//!     │ signature::verify     ── SignatureInvalid
//!     ▼
//! trusted header              ── HeaderInvalid / UnsupportedEncryption
//!     │ cipher::decrypt       ── DecryptionFailed
//!     ▼
//! claims JSON                 ── InvalidClaims
//!     │ expiry check          ── Expired
//!     ▼
//! VerificationResult
//! ```
//!
//! Expiry is only looked at once the signature has verified and the payload
//! has decrypted, so a forger learns nothing from it.
//!
//! ## Algorithm Confusion
//!
//! The header's `alg` is never used to choose a digest. The verifier tries
//! SHA-256 and then, for tokens from legacy issuers, SHA-1, as fixed by its
//! [`VerificationPolicy`]. A SHA-1 match is reported through
//! [`VerificationResult::legacy`] so it can be monitored. Issuance always
//! uses SHA-256.
//!
//! ## Keys
//!
//! Four key roles exist and none is interchangeable with another; see
//! [`keys`]. Key loading is left to a [`KeyProvider`]; [`SsoIssuer`] and
//! [`SsoVerifier`] load scoped handles from one per call and log outcomes
//! with `tracing`. The core functions never log and never do I/O.
//!
//! ## Errors
//!
//! Every failure is a distinct [`Error`] variant. Map rejections to a single
//! response with [`Error::public_message`] to avoid building an oracle.

mod error;

// Internal modules
pub(crate) mod algorithm;
pub(crate) mod cipher;
pub(crate) mod claims;
pub(crate) mod header;
pub(crate) mod issuer;
pub mod keys;
pub(crate) mod limits;
pub(crate) mod service;
pub mod signature;
pub(crate) mod token;
pub mod utils;
pub(crate) mod validator;

// Public Interface
pub use algorithm::{DigestAlgorithm, VerificationPolicy};
pub use cipher::{EncryptionScheme, decrypt, encrypt};
pub use claims::{Claims, SsoClaims};
pub use error::{Error, ErrorKind, REJECTION_MESSAGE, Result};
pub use header::{DEFAULT_ALG, TokenHeader};
pub use issuer::{TokenIssuer, issue};
pub use keys::{
    KeyProvider, KeyRole, PayloadPrivateKey, PayloadPublicKey, SigningPrivateKey,
    SigningPublicKey, StaticKeys,
};
pub use service::{SsoIssuer, SsoVerifier};
pub use token::Token;
pub use validator::{TokenValidator, VerificationResult, verify};
