//! Size limit constants for input validation

/// Maximum length for a token string (16KB)
///
/// An 8192-bit payload key and signing key produce roughly 2.8KB of
/// segments, so this leaves generous room while bounding work on junk input.
pub(crate) const MAX_TOKEN_LENGTH: usize = 16 * 1024;

/// Maximum size for decoded header JSON (1KB)
pub(crate) const MAX_DECODED_HEADER_SIZE: usize = 1024;

/// Maximum size for decoded payload ciphertext (1KB)
/// RSA ciphertext is exactly one modulus long; 8192 bits is 1024 bytes
pub(crate) const MAX_DECODED_PAYLOAD_SIZE: usize = 1024;

/// Maximum size for decoded signature bytes (1KB)
pub(crate) const MAX_DECODED_SIGNATURE_SIZE: usize = 1024;

/// Maximum size for the Base64URL-encoded signature string
/// Padded encoding of 1024 bytes is 1368 characters
pub(crate) const MAX_SIGNATURE_B64_SIZE: usize = 1368;

/// Maximum length for the declared `alg` header label
pub(crate) const MAX_ALG_LENGTH: usize = 16;

/// Maximum clock skew tolerance (300 seconds = 5 minutes)
/// Prevents clock skew from effectively disabling expiration checks
pub(crate) const MAX_CLOCK_SKEW_SECONDS: u64 = 300;
