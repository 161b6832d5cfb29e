//! Base64 content codec used by the contents API.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("invalid base64 content: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("content is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Encode text the way the backend expects file content.
pub fn encode_content(content: &str) -> String {
    STANDARD.encode(content.as_bytes())
}

/// Decode backend file content.
///
/// The backend wraps encoded content in newlines, so whitespace is dropped
/// before decoding.
pub fn decode_content(encoded: &str) -> Result<String, ContentError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;
    Ok(String::from_utf8(bytes)?)
}
