use crate::error::UcanError;
use anyhow::Result;
use base64::Engine;
use serde::Serialize;

/// Multibase code for base64url without padding.
pub const MULTIBASE_BASE64URL_PREFIX: char = 'u';

/// Encode bytes as a multibase base64url string (`u` prefix, no
/// padding), the framing used for every segment of an encoded UCAN.
pub fn multibase_b64url_encode(bytes: &[u8]) -> String {
    format!(
        "{}{}",
        MULTIBASE_BASE64URL_PREFIX,
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
    )
}

/// Decode a multibase base64url segment.
pub fn multibase_b64url_decode(segment: &str) -> Result<Vec<u8>, UcanError> {
    let payload = segment
        .strip_prefix(MULTIBASE_BASE64URL_PREFIX)
        .ok_or_else(|| {
            UcanError::InvalidEncoding(format!(
                "Expected a '{MULTIBASE_BASE64URL_PREFIX}'-prefixed multibase segment, got: {segment}"
            ))
        })?;

    base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|error| UcanError::InvalidEncoding(error.to_string()))
}

/// Helper trait to encode values as JWT-style segments: JSON,
/// then multibase base64url.
pub trait Base64Encode: Serialize {
    fn jwt_base64_encode(&self) -> Result<String> {
        Ok(multibase_b64url_encode(&serde_json::to_vec(self)?))
    }
}

impl<T> Base64Encode for T where T: Serialize {}
