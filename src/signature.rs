//! Token signatures
//!
//! Issuance always signs with RSASSA-PKCS1-v1_5 over SHA-256. Verification
//! walks the verifier's [`VerificationPolicy`] in order and stops at the
//! first digest that verifies:
//!
//! ```text
//! Start ─▶ SHA-256 ─ ok ─▶ Verified(SHA-256)
//!             │ fail
//!             ▼
//!           SHA-1 ─── ok ─▶ Verified(SHA-1, legacy)
//!             │ fail
//!             ▼
//!          Rejected(SignatureInvalid)
//! ```

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{RSA_PKCS1_SHA256, UnparsedPublicKey};

use crate::algorithm::{DigestAlgorithm, VerificationPolicy};
use crate::error::{Error, Result};
use crate::keys::{SigningPrivateKey, SigningPublicKey};

/// Sign `signing_input` with SHA-256
pub fn sign(signing_input: &[u8], key: &SigningPrivateKey) -> Result<Vec<u8>> {
    let key_pair = key.key_pair();
    let rng = SystemRandom::new();
    let mut signature = vec![0u8; key.modulus_len()];
    key_pair
        .sign(&RSA_PKCS1_SHA256, &rng, signing_input, &mut signature)
        .map_err(|_| Error::SigningFailed("RSA PKCS#1 v1.5 SHA-256 signing failed".into()))?;
    Ok(signature)
}

/// Verify `signature` over `signing_input`
///
/// Returns the digest that matched. The caller decides what to do with a
/// legacy match; this function only reports it.
pub fn verify(
    signing_input: &[u8],
    signature: &[u8],
    key: &SigningPublicKey,
    policy: &VerificationPolicy,
) -> Result<DigestAlgorithm> {
    policy
        .algorithms()
        .iter()
        .copied()
        .find(|digest| {
            UnparsedPublicKey::new(digest.verification_algorithm(), key.as_der())
                .verify(signing_input, signature)
                .is_ok()
        })
        .ok_or(Error::SignatureInvalid)
}
