//! Key material for token issuance and verification
//!
//! Four roles exist and each has its own handle type, so a payload key can
//! never be handed to the signer or the other way round:
//!
//! | Role                 | Held by   | Used for                      |
//! |----------------------|-----------|-------------------------------|
//! | [`SigningPrivateKey`] | issuer    | signing `header.payload`      |
//! | [`SigningPublicKey`]  | verifiers | checking that signature       |
//! | [`PayloadPublicKey`]  | issuers   | encrypting claims to a target |
//! | [`PayloadPrivateKey`] | target    | decrypting those claims       |
//!
//! An issuer needs only the first and third, a verifier only the second and
//! fourth. [`KeyProvider`] lets each side implement just its pair.
//!
//! Handles are meant to be short-lived: load them for an issue or verify
//! batch and drop them afterwards. The private handles free their key
//! material on drop, and every intermediate DER buffer is zeroized.

use aws_lc_rs::rsa::{
    OaepPrivateDecryptingKey, OaepPublicEncryptingKey, PrivateDecryptingKey, PublicEncryptingKey,
};
use aws_lc_rs::signature::{KeyPair, RsaKeyPair};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// The four key roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRole {
    SigningPrivate,
    SigningPublic,
    PayloadPublic,
    PayloadPrivate,
}

impl KeyRole {
    /// Human-readable name
    pub const fn as_str(&self) -> &'static str {
        match self {
            KeyRole::SigningPrivate => "signing private key",
            KeyRole::SigningPublic => "signing public key",
            KeyRole::PayloadPublic => "payload public key",
            KeyRole::PayloadPrivate => "payload private key",
        }
    }

    /// PEM labels accepted for this role
    const fn pem_labels(&self) -> &'static [&'static str] {
        match self {
            KeyRole::SigningPrivate => &["PRIVATE KEY", "RSA PRIVATE KEY"],
            KeyRole::SigningPublic => &["PUBLIC KEY", "RSA PUBLIC KEY"],
            KeyRole::PayloadPublic => &["PUBLIC KEY"],
            KeyRole::PayloadPrivate => &["PRIVATE KEY"],
        }
    }

    fn rejected(self, reason: impl Into<String>) -> Error {
        Error::KeyRejected {
            role: self,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for KeyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RSA key pair used to sign tokens (issuer only)
pub struct SigningPrivateKey {
    inner: RsaKeyPair,
}

impl SigningPrivateKey {
    /// Parse from PKCS#8 `PrivateKeyInfo` or PKCS#1 `RSAPrivateKey` DER
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner = RsaKeyPair::from_pkcs8(der)
            .or_else(|_| RsaKeyPair::from_der(der))
            .map_err(|e| KeyRole::SigningPrivate.rejected(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Parse from a `PRIVATE KEY` or `RSA PRIVATE KEY` PEM block
    pub fn from_pem(pem: &str) -> Result<Self> {
        let der = pem_to_der(pem, KeyRole::SigningPrivate)?;
        Self::from_der(&der)
    }

    /// The matching public key, for distribution to verifiers
    pub fn public_key(&self) -> SigningPublicKey {
        SigningPublicKey {
            der: self.inner.public_key().as_ref().to_vec(),
        }
    }

    /// Signature length in bytes
    pub fn modulus_len(&self) -> usize {
        self.inner.public_modulus_len()
    }

    pub(crate) fn key_pair(&self) -> &RsaKeyPair {
        &self.inner
    }
}

impl std::fmt::Debug for SigningPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningPrivateKey")
            .field("modulus_len", &self.modulus_len())
            .finish_non_exhaustive()
    }
}

/// RSA public key used to check token signatures
///
/// The DER is not parsed until verification; an unusable key simply makes
/// every signature fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningPublicKey {
    der: Vec<u8>,
}

impl SigningPublicKey {
    /// Create from PKCS#1 `RSAPublicKey` or X.509 `SubjectPublicKeyInfo` DER
    pub fn from_der(der: impl Into<Vec<u8>>) -> Result<Self> {
        let der = der.into();
        if der.is_empty() {
            return Err(KeyRole::SigningPublic.rejected("empty key"));
        }
        Ok(Self { der })
    }

    /// Create from a `PUBLIC KEY` or `RSA PUBLIC KEY` PEM block
    pub fn from_pem(pem: &str) -> Result<Self> {
        let der = pem_to_der(pem, KeyRole::SigningPublic)?;
        Self::from_der(der.to_vec())
    }

    /// Get the DER-encoded key bytes
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }
}

/// RSA public key used to encrypt claims for one target service
pub struct PayloadPublicKey {
    inner: OaepPublicEncryptingKey,
}

impl PayloadPublicKey {
    /// Parse from X.509 `SubjectPublicKeyInfo` DER
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let role = KeyRole::PayloadPublic;
        let key = PublicEncryptingKey::from_der(der).map_err(|e| role.rejected(e.to_string()))?;
        let inner = OaepPublicEncryptingKey::new(key).map_err(|e| role.rejected(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Parse from a `PUBLIC KEY` PEM block
    pub fn from_pem(pem: &str) -> Result<Self> {
        let der = pem_to_der(pem, KeyRole::PayloadPublic)?;
        Self::from_der(&der)
    }

    /// Largest claims document this key can encrypt, in bytes
    pub fn max_plaintext_size(&self) -> usize {
        crate::cipher::EncryptionScheme::RsaOaepSha256.max_plaintext_size(self)
    }

    pub(crate) fn oaep(&self) -> &OaepPublicEncryptingKey {
        &self.inner
    }
}

impl std::fmt::Debug for PayloadPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadPublicKey")
            .field("ciphertext_size", &self.inner.ciphertext_size())
            .finish()
    }
}

/// RSA private key used to decrypt claims (target service only)
pub struct PayloadPrivateKey {
    inner: OaepPrivateDecryptingKey,
}

impl PayloadPrivateKey {
    /// Parse from PKCS#8 `PrivateKeyInfo` DER
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let role = KeyRole::PayloadPrivate;
        let key = PrivateDecryptingKey::from_pkcs8(der).map_err(|e| role.rejected(e.to_string()))?;
        let inner = OaepPrivateDecryptingKey::new(key).map_err(|e| role.rejected(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Parse from a `PRIVATE KEY` PEM block
    pub fn from_pem(pem: &str) -> Result<Self> {
        let der = pem_to_der(pem, KeyRole::PayloadPrivate)?;
        Self::from_der(&der)
    }

    pub(crate) fn oaep(&self) -> &OaepPrivateDecryptingKey {
        &self.inner
    }
}

impl std::fmt::Debug for PayloadPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadPrivateKey").finish_non_exhaustive()
    }
}

/// Source of key handles
///
/// Every method defaults to [`Error::KeyUnavailable`], so an issuer-side
/// provider implements only the signing private and payload public loaders
/// and a verifier-side provider only the other two. Loading from disk, a
/// secret store or the network is the implementor's business; the token
/// code never does I/O of its own.
pub trait KeyProvider {
    fn load_signing_private_key(&self) -> Result<SigningPrivateKey> {
        Err(Error::KeyUnavailable(KeyRole::SigningPrivate))
    }

    fn load_signing_public_key(&self) -> Result<SigningPublicKey> {
        Err(Error::KeyUnavailable(KeyRole::SigningPublic))
    }

    fn load_payload_public_key(&self) -> Result<PayloadPublicKey> {
        Err(Error::KeyUnavailable(KeyRole::PayloadPublic))
    }

    fn load_payload_private_key(&self) -> Result<PayloadPrivateKey> {
        Err(Error::KeyUnavailable(KeyRole::PayloadPrivate))
    }
}

impl<P: KeyProvider + ?Sized> KeyProvider for &P {
    fn load_signing_private_key(&self) -> Result<SigningPrivateKey> {
        (**self).load_signing_private_key()
    }

    fn load_signing_public_key(&self) -> Result<SigningPublicKey> {
        (**self).load_signing_public_key()
    }

    fn load_payload_public_key(&self) -> Result<PayloadPublicKey> {
        (**self).load_payload_public_key()
    }

    fn load_payload_private_key(&self) -> Result<PayloadPrivateKey> {
        (**self).load_payload_private_key()
    }
}

#[derive(Clone)]
enum KeyBlob {
    Der(Zeroizing<Vec<u8>>),
    Pem(Zeroizing<String>),
}

/// In-memory [`KeyProvider`] over raw key blobs
///
/// Holds the blobs, not parsed handles: every load parses afresh, so each
/// caller gets handles scoped to its own call. The blobs are zeroized when
/// the provider is dropped.
#[derive(Clone, Default)]
pub struct StaticKeys {
    signing_private: Option<KeyBlob>,
    signing_public: Option<KeyBlob>,
    payload_public: Option<KeyBlob>,
    payload_private: Option<KeyBlob>,
}

impl StaticKeys {
    /// Provider for an issuing service, from DER blobs
    pub fn issuer(signing_private_der: impl Into<Vec<u8>>, payload_public_der: impl Into<Vec<u8>>) -> Self {
        Self {
            signing_private: Some(KeyBlob::Der(Zeroizing::new(signing_private_der.into()))),
            payload_public: Some(KeyBlob::Der(Zeroizing::new(payload_public_der.into()))),
            ..Self::default()
        }
    }

    /// Provider for a verifying service, from DER blobs
    pub fn verifier(signing_public_der: impl Into<Vec<u8>>, payload_private_der: impl Into<Vec<u8>>) -> Self {
        Self {
            signing_public: Some(KeyBlob::Der(Zeroizing::new(signing_public_der.into()))),
            payload_private: Some(KeyBlob::Der(Zeroizing::new(payload_private_der.into()))),
            ..Self::default()
        }
    }

    /// Provider for an issuing service, from PEM text
    pub fn issuer_pem(signing_private_pem: impl Into<String>, payload_public_pem: impl Into<String>) -> Self {
        Self {
            signing_private: Some(KeyBlob::Pem(Zeroizing::new(signing_private_pem.into()))),
            payload_public: Some(KeyBlob::Pem(Zeroizing::new(payload_public_pem.into()))),
            ..Self::default()
        }
    }

    /// Provider for a verifying service, from PEM text
    pub fn verifier_pem(signing_public_pem: impl Into<String>, payload_private_pem: impl Into<String>) -> Self {
        Self {
            signing_public: Some(KeyBlob::Pem(Zeroizing::new(signing_public_pem.into()))),
            payload_private: Some(KeyBlob::Pem(Zeroizing::new(payload_private_pem.into()))),
            ..Self::default()
        }
    }

    /// Roles this provider can load
    pub fn roles(&self) -> Vec<KeyRole> {
        [
            (KeyRole::SigningPrivate, &self.signing_private),
            (KeyRole::SigningPublic, &self.signing_public),
            (KeyRole::PayloadPublic, &self.payload_public),
            (KeyRole::PayloadPrivate, &self.payload_private),
        ]
        .into_iter()
        .filter_map(|(role, blob)| blob.as_ref().map(|_| role))
        .collect()
    }
}

impl KeyProvider for StaticKeys {
    fn load_signing_private_key(&self) -> Result<SigningPrivateKey> {
        match &self.signing_private {
            Some(KeyBlob::Der(der)) => SigningPrivateKey::from_der(der),
            Some(KeyBlob::Pem(pem)) => SigningPrivateKey::from_pem(pem),
            None => Err(Error::KeyUnavailable(KeyRole::SigningPrivate)),
        }
    }

    fn load_signing_public_key(&self) -> Result<SigningPublicKey> {
        match &self.signing_public {
            Some(KeyBlob::Der(der)) => SigningPublicKey::from_der(der.to_vec()),
            Some(KeyBlob::Pem(pem)) => SigningPublicKey::from_pem(pem),
            None => Err(Error::KeyUnavailable(KeyRole::SigningPublic)),
        }
    }

    fn load_payload_public_key(&self) -> Result<PayloadPublicKey> {
        match &self.payload_public {
            Some(KeyBlob::Der(der)) => PayloadPublicKey::from_der(der),
            Some(KeyBlob::Pem(pem)) => PayloadPublicKey::from_pem(pem),
            None => Err(Error::KeyUnavailable(KeyRole::PayloadPublic)),
        }
    }

    fn load_payload_private_key(&self) -> Result<PayloadPrivateKey> {
        match &self.payload_private {
            Some(KeyBlob::Der(der)) => PayloadPrivateKey::from_der(der),
            Some(KeyBlob::Pem(pem)) => PayloadPrivateKey::from_pem(pem),
            None => Err(Error::KeyUnavailable(KeyRole::PayloadPrivate)),
        }
    }
}

impl std::fmt::Debug for StaticKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticKeys")
            .field("roles", &self.roles())
            .finish()
    }
}

/// Strip PEM armor and decode the body
///
/// The label must be one the role accepts, so a private key pasted where a
/// public key belongs is refused instead of silently used.
fn pem_to_der(pem: &str, role: KeyRole) -> Result<Zeroizing<Vec<u8>>> {
    let mut lines = pem.lines().map(str::trim).filter(|line| !line.is_empty());

    let label = lines
        .next()
        .and_then(|line| line.strip_prefix("-----BEGIN "))
        .and_then(|line| line.strip_suffix("-----"))
        .ok_or_else(|| role.rejected("missing PEM BEGIN line"))?;

    if !role.pem_labels().iter().any(|accepted| *accepted == label) {
        return Err(role.rejected(format!("unexpected PEM label '{label}'")));
    }

    let end = format!("-----END {label}-----");
    let mut body = Zeroizing::new(String::with_capacity(pem.len()));
    let mut terminated = false;
    for line in lines {
        if line == end {
            terminated = true;
            break;
        }
        body.push_str(line);
    }

    if !terminated {
        return Err(role.rejected("missing PEM END line"));
    }

    STANDARD
        .decode(body.as_bytes())
        .map(Zeroizing::new)
        .map_err(|_| role.rejected("PEM body is not valid base64"))
}
