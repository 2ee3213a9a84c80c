//! Shared fixtures for the integration suites
//!
//! RSA key generation dominates test time, so each test binary generates
//! two key sets once and shares them. `keys()` is the normal issuer/verifier
//! pair; `other_keys()` is an unrelated set for mismatch tests.
//!
//! Tokens that the crate itself refuses to produce (SHA-1 or SHA-512
//! signatures, odd headers, tampered ciphertext) are forged here with the
//! `rsa` crate.

#![allow(dead_code)]

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use rsa::pkcs1::EncodeRsaPublicKey;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use ssotoken::utils::base64url;
use ssotoken::{
    Claims, PayloadPrivateKey, PayloadPublicKey, SigningPrivateKey, SigningPublicKey, StaticKeys,
    VerificationResult,
};

/// One issuer/verifier deployment's worth of keys
pub struct KeySet {
    pub signing_rsa: RsaPrivateKey,
    pub payload_rsa: RsaPrivateKey,

    /// PKCS#8
    pub signing_private_der: Vec<u8>,
    /// PKCS#1 `RSAPublicKey`
    pub signing_public_der: Vec<u8>,
    /// X.509 `SubjectPublicKeyInfo`
    pub payload_public_der: Vec<u8>,
    /// PKCS#8
    pub payload_private_der: Vec<u8>,
}

impl KeySet {
    fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_rsa = RsaPrivateKey::new(&mut rng, 2048).expect("failed to generate signing key");
        let payload_rsa = RsaPrivateKey::new(&mut rng, 2048).expect("failed to generate payload key");

        let signing_private_der = signing_rsa
            .to_pkcs8_der()
            .expect("failed to encode signing key")
            .as_bytes()
            .to_vec();
        let signing_public_der = signing_rsa
            .to_public_key()
            .to_pkcs1_der()
            .expect("failed to encode signing public key")
            .as_bytes()
            .to_vec();
        let payload_public_der = payload_rsa
            .to_public_key()
            .to_public_key_der()
            .expect("failed to encode payload public key")
            .as_bytes()
            .to_vec();
        let payload_private_der = payload_rsa
            .to_pkcs8_der()
            .expect("failed to encode payload key")
            .as_bytes()
            .to_vec();

        Self {
            signing_rsa,
            payload_rsa,
            signing_private_der,
            signing_public_der,
            payload_public_der,
            payload_private_der,
        }
    }

    pub fn signing_private(&self) -> SigningPrivateKey {
        SigningPrivateKey::from_der(&self.signing_private_der).expect("signing private key")
    }

    pub fn signing_public(&self) -> SigningPublicKey {
        SigningPublicKey::from_der(self.signing_public_der.clone()).expect("signing public key")
    }

    pub fn payload_public(&self) -> PayloadPublicKey {
        PayloadPublicKey::from_der(&self.payload_public_der).expect("payload public key")
    }

    pub fn payload_private(&self) -> PayloadPrivateKey {
        PayloadPrivateKey::from_der(&self.payload_private_der).expect("payload private key")
    }

    pub fn issuer_keys(&self) -> StaticKeys {
        StaticKeys::issuer(self.signing_private_der.clone(), self.payload_public_der.clone())
    }

    pub fn verifier_keys(&self) -> StaticKeys {
        StaticKeys::verifier(self.signing_public_der.clone(), self.payload_private_der.clone())
    }

    pub fn issuer_keys_pem(&self) -> StaticKeys {
        let signing = self
            .signing_rsa
            .to_pkcs8_pem(LineEnding::LF)
            .expect("signing key PEM");
        let payload = self
            .payload_rsa
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .expect("payload public key PEM");
        StaticKeys::issuer_pem(signing.as_str(), payload)
    }

    pub fn verifier_keys_pem(&self) -> StaticKeys {
        let signing = self
            .signing_rsa
            .to_public_key()
            .to_pkcs1_pem(LineEnding::LF)
            .expect("signing public key PEM");
        let payload = self
            .payload_rsa
            .to_pkcs8_pem(LineEnding::LF)
            .expect("payload key PEM");
        StaticKeys::verifier_pem(signing, payload.as_str())
    }
}

static KEYS: OnceLock<KeySet> = OnceLock::new();
static OTHER_KEYS: OnceLock<KeySet> = OnceLock::new();

pub fn keys() -> &'static KeySet {
    KEYS.get_or_init(KeySet::generate)
}

pub fn other_keys() -> &'static KeySet {
    OTHER_KEYS.get_or_init(KeySet::generate)
}

pub fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("valid RFC 3339 timestamp")
        .with_timezone(&Utc)
}

/// Claims used throughout: DS123456, expiring 2025-08-30T09:41:36Z
pub fn sample_claims() -> Claims {
    Claims::new("DS123456", at("2025-08-30T09:41:36Z")).email("test9@example.com")
}

/// Issue time for [`sample_claims`]
pub fn issued_at() -> DateTime<Utc> {
    at("2025-08-30T09:00:00Z")
}

/// Verification time inside the lifetime of [`sample_claims`]
pub fn valid_now() -> DateTime<Utc> {
    at("2025-08-30T09:10:00Z")
}

/// Issue `claims` with the shared key set
pub fn issue(claims: &Claims, now: DateTime<Utc>) -> String {
    let keys = keys();
    ssotoken::issue(claims, &keys.signing_private(), &keys.payload_public(), now)
        .expect("issue")
        .to_string()
}

/// Verify `token` with the shared key set and the default validator
pub fn verify(token: &str, now: DateTime<Utc>) -> ssotoken::Result<VerificationResult> {
    let keys = keys();
    ssotoken::verify(token, &keys.signing_public(), &keys.payload_private(), now)
}

/// Digests a forged signature can be made with
#[derive(Debug, Clone, Copy)]
pub enum ForgedDigest {
    Sha1,
    Sha256,
    Sha512,
}

/// RSASSA-PKCS1-v1_5 signature over `message`, computed by the `rsa` crate
pub fn rsa_sign(key: &RsaPrivateKey, message: &[u8], digest: ForgedDigest) -> Vec<u8> {
    match digest {
        ForgedDigest::Sha1 => rsa::pkcs1v15::SigningKey::<sha1::Sha1>::new(key.clone())
            .sign(message)
            .to_vec(),
        ForgedDigest::Sha256 => rsa::pkcs1v15::SigningKey::<sha2::Sha256>::new(key.clone())
            .sign(message)
            .to_vec(),
        ForgedDigest::Sha512 => rsa::pkcs1v15::SigningKey::<sha2::Sha512>::new(key.clone())
            .sign(message)
            .to_vec(),
    }
}

/// Build a token by hand from raw header JSON and raw claims JSON
///
/// The claims are encrypted to the shared payload key and the envelope is
/// signed by `keys().signing_rsa` under `digest`.
pub fn forge(header_json: &str, claims_json: &[u8], digest: ForgedDigest) -> String {
    let keys = keys();
    let ciphertext =
        ssotoken::encrypt(claims_json, &keys.payload_public()).expect("claims fit in one block");
    forge_from_ciphertext(header_json, &ciphertext, &keys.signing_rsa, digest)
}

/// Build a token from raw header JSON and raw payload bytes, signed by `signer`
pub fn forge_from_ciphertext(
    header_json: &str,
    ciphertext: &[u8],
    signer: &RsaPrivateKey,
    digest: ForgedDigest,
) -> String {
    let header_b64 = base64url::encode(header_json);
    let payload_b64 = base64url::encode(ciphertext);
    let signing_input = format!("{header_b64}.{payload_b64}");
    let signature = rsa_sign(signer, signing_input.as_bytes(), digest);
    format!("{signing_input}.{}", base64url::encode(signature))
}

/// The three segments of a token string
pub fn segments(token: &str) -> (String, String, String) {
    let parts: Vec<&str> = token.split('.').collect();
    assert_eq!(parts.len(), 3, "token should have three segments");
    (parts[0].into(), parts[1].into(), parts[2].into())
}

/// Decoded bytes of segment `index` (0 header, 1 payload, 2 signature)
pub fn decoded_segment(token: &str, index: usize) -> Vec<u8> {
    let segment = token.split('.').nth(index).expect("segment exists");
    base64url::decode(segment).expect("segment decodes")
}
