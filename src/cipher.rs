//! Payload encryption
//!
//! Claims travel as RSA-OAEP ciphertext (SHA-256, MGF1-SHA-256, no label)
//! under the target service's payload key. There is no chunking: a claims
//! document must fit in one RSA block, which for a 2048-bit key is 190 bytes.
//!
//! Decryption failures are deliberately featureless. A wrong key, a
//! truncated block and a corrupted block all surface as the same
//! [`Error::DecryptionFailed`], produced by aws-lc's constant-time OAEP
//! unpadding.

use aws_lc_rs::rsa::{OAEP_SHA256_MGF1SHA256, OaepAlgorithm};
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::keys::{PayloadPrivateKey, PayloadPublicKey};

/// Padding scheme for the payload segment, announced as `enc` in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EncryptionScheme {
    /// RSAES-OAEP with SHA-256 and MGF1-SHA-256
    #[default]
    RsaOaepSha256,
}

impl EncryptionScheme {
    /// Header label
    pub const fn label(&self) -> &'static str {
        match self {
            EncryptionScheme::RsaOaepSha256 => "RSA-OAEP-256",
        }
    }

    /// Resolve a header label
    pub fn from_label(label: &str) -> Result<Self> {
        match label {
            "RSA-OAEP-256" => Ok(EncryptionScheme::RsaOaepSha256),
            other => Err(Error::UnsupportedEncryption(other.into())),
        }
    }

    fn algorithm(&self) -> &'static OaepAlgorithm {
        match self {
            EncryptionScheme::RsaOaepSha256 => &OAEP_SHA256_MGF1SHA256,
        }
    }

    pub(crate) fn max_plaintext_size(&self, key: &PayloadPublicKey) -> usize {
        key.oaep().max_plaintext_size(self.algorithm())
    }
}

impl std::fmt::Display for EncryptionScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Encrypt serialized claims for the holder of the matching private key
pub fn encrypt(plaintext: &[u8], key: &PayloadPublicKey) -> Result<Vec<u8>> {
    let scheme = EncryptionScheme::RsaOaepSha256;
    let max = scheme.max_plaintext_size(key);
    if plaintext.len() > max {
        return Err(Error::EncryptionFailed(format!(
            "claims are {} bytes but this payload key can encrypt at most {max}",
            plaintext.len()
        )));
    }

    let oaep = key.oaep();
    let mut ciphertext = vec![0u8; oaep.ciphertext_size()];
    let written = oaep
        .encrypt(scheme.algorithm(), plaintext, &mut ciphertext, None)
        .map_err(|_| Error::EncryptionFailed("RSA-OAEP encryption failed".into()))?
        .len();
    ciphertext.truncate(written);

    Ok(ciphertext)
}

/// Decrypt a payload segment
///
/// The returned buffer is zeroized on drop.
pub fn decrypt(ciphertext: &[u8], key: &PayloadPrivateKey) -> Result<Zeroizing<Vec<u8>>> {
    let scheme = EncryptionScheme::RsaOaepSha256;
    let oaep = key.oaep();
    let mut plaintext = Zeroizing::new(vec![0u8; oaep.min_output_size()]);
    let written = oaep
        .decrypt(scheme.algorithm(), ciphertext, &mut plaintext, None)
        .map_err(|_| Error::DecryptionFailed)?
        .len();
    plaintext.truncate(written);

    Ok(plaintext)
}
