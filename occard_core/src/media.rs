//! Data-URI helpers for card images.
//!
//! Card images travel as self-describing data URIs
//! (`data:image/png;base64,...`). This module parses them back into raw
//! bytes for archive export and builds them from files on import.

use crate::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// A decoded data URI: mime type plus raw payload
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataUri {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Parse a `data:<mime>;base64,<payload>` string
///
/// A missing mime defaults to `image/png`, mirroring how the authoring UI
/// treats unknown images. Anything not shaped like a base64 data URI is a
/// media error; export paths degrade on it rather than failing.
pub fn parse_data_uri(input: &str) -> Result<DataUri> {
    let rest = input
        .strip_prefix("data:")
        .ok_or_else(|| Error::Media("not a data URI".into()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::Media("data URI missing payload".into()))?;

    let mime = match header.strip_suffix(";base64") {
        Some("") => "image/png".to_string(),
        Some(mime) => mime.to_string(),
        None => return Err(Error::Media("data URI is not base64-encoded".into())),
    };

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| Error::Media(format!("invalid base64 payload: {}", e)))?;

    Ok(DataUri { mime, bytes })
}

/// Build a base64 data URI from raw bytes
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Image mime type for a file extension, if it is one we recognize
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}
