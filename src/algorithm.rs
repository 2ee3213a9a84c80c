//! Digest algorithms and the closed verification policy
//!
//! The `alg` label in a token header is never consulted here. Which digests
//! are tried, and in what order, is decided by the verifier's
//! [`VerificationPolicy`] alone.

use aws_lc_rs::signature;

/// Digest used with RSASSA-PKCS1-v1_5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    /// SHA-256, the only digest used for issuance
    Sha256,

    /// SHA-1, accepted for verification of tokens from legacy issuers
    Sha1,
}

impl DigestAlgorithm {
    /// Convert to string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha1 => "SHA-1",
        }
    }

    /// Whether a match under this digest should be reported as legacy
    pub const fn is_legacy(&self) -> bool {
        matches!(self, DigestAlgorithm::Sha1)
    }

    pub(crate) fn verification_algorithm(&self) -> &'static dyn signature::VerificationAlgorithm {
        match self {
            DigestAlgorithm::Sha256 => &signature::RSA_PKCS1_2048_8192_SHA256,
            DigestAlgorithm::Sha1 => &signature::RSA_PKCS1_2048_8192_SHA1_FOR_LEGACY_USE_ONLY,
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for DigestAlgorithm {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Ordered list of digests a verifier will try
///
/// Only the two fixed orderings below can be built, so a token can never
/// talk a verifier into a digest it did not already accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationPolicy {
    order: &'static [DigestAlgorithm],
}

impl VerificationPolicy {
    /// SHA-256 first, then SHA-1 for legacy issuers
    ///
    /// Equivalent to `Default::default()`.
    pub const fn sha256_with_legacy_sha1() -> Self {
        Self {
            order: &[DigestAlgorithm::Sha256, DigestAlgorithm::Sha1],
        }
    }

    /// SHA-256 only, for deployments with no legacy issuers left
    pub const fn sha256_only() -> Self {
        Self {
            order: &[DigestAlgorithm::Sha256],
        }
    }

    /// Digests in the order they are attempted
    pub fn algorithms(&self) -> &[DigestAlgorithm] {
        self.order
    }

    /// Whether the legacy fallback is enabled
    pub fn allows_legacy(&self) -> bool {
        self.order.iter().any(DigestAlgorithm::is_legacy)
    }
}

impl Default for VerificationPolicy {
    fn default() -> Self {
        Self::sha256_with_legacy_sha1()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_display() {
        assert_eq!(format!("{}", DigestAlgorithm::Sha256), "SHA-256");
        assert_eq!(format!("{}", DigestAlgorithm::Sha1), "SHA-1");
        assert_eq!(DigestAlgorithm::Sha1.as_ref(), "SHA-1");
    }

    #[test]
    fn test_only_sha1_is_legacy() {
        assert!(!DigestAlgorithm::Sha256.is_legacy());
        assert!(DigestAlgorithm::Sha1.is_legacy());
    }

    #[test]
    fn test_default_policy_order() {
        let policy = VerificationPolicy::default();
        assert_eq!(
            policy.algorithms(),
            &[DigestAlgorithm::Sha256, DigestAlgorithm::Sha1]
        );
        assert!(policy.allows_legacy());
    }

    #[test]
    fn test_sha256_only_policy() {
        let policy = VerificationPolicy::sha256_only();
        assert_eq!(policy.algorithms(), &[DigestAlgorithm::Sha256]);
        assert!(!policy.allows_legacy());
    }
}
