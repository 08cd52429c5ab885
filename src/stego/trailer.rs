//! PNG trailer embedding.
//!
//! Appends the payload after the end of a PNG byte stream. Decoders stop
//! at the IEND chunk, so the appended bytes do not change how the image
//! renders.
//!
//! Format (end of file): [payload bytes] + [4 bytes magic] + [4 bytes length, BE]
//!
//! The last 8 bytes alone tell whether a trailer is present and how long
//! it is, so detection never scans the image body.

use log::debug;

use super::{StegoError, LENGTH_FIELD_SIZE, MAGIC, PNG_SIGNATURE};

/// Size of the fixed footer: magic + length field.
pub const FOOTER_SIZE: usize = MAGIC.len() + LENGTH_FIELD_SIZE;

/// Largest payload the 32-bit length field can describe.
pub const MAX_PAYLOAD: u64 = u32::MAX as u64;

/// Smallest stream that can carry a trailer: signature + footer.
const MIN_TRAILER_STREAM: usize = PNG_SIGNATURE.len() + FOOTER_SIZE;

/// Returns true if `bytes` starts with the PNG signature.
///
/// Only the signature is checked, not the chunk structure.
pub fn is_png(bytes: &[u8]) -> bool {
    bytes.starts_with(&PNG_SIGNATURE)
}

/// Appends `text` as a trailer to a PNG byte stream.
///
/// Returns a new buffer; `png` is left untouched.
pub fn embed(png: &[u8], text: &str) -> Result<Vec<u8>, StegoError> {
    if !is_png(png) {
        return Err(StegoError::NotPng);
    }

    let payload = text.as_bytes();
    let length =
        u32::try_from(payload.len()).map_err(|_| StegoError::PayloadTooLarge(payload.len()))?;

    let mut out = Vec::with_capacity(png.len() + payload.len() + FOOTER_SIZE);
    out.extend_from_slice(png);
    out.extend_from_slice(payload);
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&length.to_be_bytes());

    debug!(
        "Appended {} byte trailer to {} byte PNG",
        payload.len() + FOOTER_SIZE,
        png.len()
    );
    Ok(out)
}

/// Extracts a trailer payload.
///
/// Returns `None` when the stream is not a PNG, carries no trailer, or the
/// trailer is malformed. An empty payload is `Some("")`.
pub fn extract(bytes: &[u8]) -> Option<String> {
    let (start, length) = locate(bytes)?;
    if length == 0 {
        return Some(String::new());
    }

    let payload = &bytes[start..start + length];
    match std::str::from_utf8(payload) {
        Ok(text) => Some(text.to_owned()),
        Err(e) => {
            debug!("Trailer payload is not valid UTF-8: {}", e);
            None
        }
    }
}

/// Returns the stream with a valid trailer removed.
///
/// `None` if no trailer is present.
pub fn strip(bytes: &[u8]) -> Option<&[u8]> {
    locate(bytes).map(|(start, _)| &bytes[..start])
}

/// Finds the payload range `(start, length)` of a trailer.
fn locate(bytes: &[u8]) -> Option<(usize, usize)> {
    if !is_png(bytes) || bytes.len() < MIN_TRAILER_STREAM {
        return None;
    }

    let footer = &bytes[bytes.len() - FOOTER_SIZE..];
    if footer[..MAGIC.len()] != MAGIC {
        return None;
    }

    let mut len_bytes = [0u8; LENGTH_FIELD_SIZE];
    len_bytes.copy_from_slice(&footer[MAGIC.len()..]);
    let length = u32::from_be_bytes(len_bytes) as usize;

    // Length field larger than what precedes the footer: truncated or corrupt.
    let start = match (bytes.len() - FOOTER_SIZE).checked_sub(length) {
        Some(start) => start,
        None => {
            debug!(
                "Trailer length {} exceeds stream size {}",
                length,
                bytes.len()
            );
            return None;
        }
    };

    Some((start, length))
}
