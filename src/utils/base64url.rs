//! Base64URL encoding/decoding per RFC 4648
//!
//! Encoding never pads. Decoding accepts both padded and unpadded input,
//! since issuers written against different encoders disagree on padding.

use crate::error::{Error, Result};
use base64::Engine;
use base64::alphabet::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode bytes to an unpadded Base64URL string
pub fn encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_LENIENT.encode(input)
}

/// Decode a Base64URL string, padded or not
pub fn decode(input: &str) -> Result<Vec<u8>> {
    URL_SAFE_LENIENT
        .decode(input)
        .map_err(|e| Error::MalformedEncoding(format!("Base64URL decode failed: {e}")))
}

/// Decode a Base64URL string, refusing results larger than `max_size`
///
/// The encoded length is checked first so oversized input is never decoded.
pub(crate) fn decode_bounded(input: &str, max_size: usize) -> Result<Vec<u8>> {
    let max_encoded = max_size.div_ceil(3) * 4;
    if input.len() > max_encoded {
        return Err(Error::MalformedEncoding(format!(
            "Encoded size exceeds limit: {} characters (max: {max_encoded})",
            input.len()
        )));
    }

    let result = decode(input)?;
    if result.len() > max_size {
        return Err(Error::MalformedEncoding(format!(
            "Decoded size exceeds limit: {} bytes (max: {max_size})",
            result.len()
        )));
    }

    Ok(result)
}
