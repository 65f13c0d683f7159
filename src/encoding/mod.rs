//! Base64 encoding of image files
//!
//! Encoding is content-agnostic: any readable file is accepted, the bytes are
//! never decoded as an image.

use base64::Engine as _;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Encode arbitrary bytes as base64 using the standard alphabet.
pub fn encode_base64(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}

/// Read a whole file and return its base64-encoded bytes.
///
/// The file handle is dropped on every exit path, including a failed read.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn encode_image<P: AsRef<Path>>(path: P) -> crate::Result<Vec<u8>> {
    let mut file = File::open(path.as_ref())?;
    let mut content = Vec::new();
    file.read_to_end(&mut content)?;

    let encoded = encode_base64(&content).into_bytes();
    tracing::trace!(raw_bytes = content.len(), encoded_bytes = encoded.len(), "Encoded image");
    Ok(encoded)
}

/// Encode every file in order, returning one base64 string per path.
///
/// Stops at the first file that cannot be read; no partial result is returned.
pub fn encode_images<P: AsRef<Path>>(paths: &[P]) -> crate::Result<Vec<String>> {
    let mut encoded = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = encode_image(path)?;
        encoded.push(String::from_utf8(bytes)?);
    }

    tracing::debug!(count = encoded.len(), "Encoded image batch");
    Ok(encoded)
}
