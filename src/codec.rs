//! Method dispatch for embedding and extraction.
//!
//! Encoding converts the source into what the chosen method needs and
//! delegates to it. Decoding always tries the PNG trailer first (a cheap
//! look at the last 8 bytes) and falls back to the alpha channel, so images
//! written by either format stay readable.

use std::fmt;
use std::str::FromStr;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::source::{self, Source, SourceError};
use crate::stego::{alpha, trailer, AlphaStego, StegoError};

/// Errors that can occur while encoding or reading a source.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error(transparent)]
    Stego(#[from] StegoError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Embedding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EncodeMethod {
    /// Payload appended after the end of the PNG stream.
    #[default]
    #[value(name = "png-trailer")]
    PngTrailer,
    /// Payload stored one byte per pixel in the alpha channel (legacy).
    #[value(name = "alpha-channel")]
    AlphaChannel,
}

impl EncodeMethod {
    /// Returns the canonical tag for this method.
    pub fn as_str(&self) -> &'static str {
        match self {
            EncodeMethod::PngTrailer => "png-trailer",
            EncodeMethod::AlphaChannel => "alpha-channel",
        }
    }
}

impl fmt::Display for EncodeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncodeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "png-trailer" => Ok(EncodeMethod::PngTrailer),
            "alpha-channel" => Ok(EncodeMethod::AlphaChannel),
            other => Err(format!(
                "Unknown method '{}' (expected png-trailer or alpha-channel)",
                other
            )),
        }
    }
}

/// Result of a decode attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// A payload was found by the given method.
    Found { text: String, method: EncodeMethod },
    /// No embedded payload.
    NotFound,
}

impl Decoded {
    /// Returns the payload text, if found.
    pub fn text(&self) -> Option<&str> {
        match self {
            Decoded::Found { text, .. } => Some(text),
            Decoded::NotFound => None,
        }
    }

    /// Returns the method that produced the payload, if found.
    pub fn method(&self) -> Option<EncodeMethod> {
        match self {
            Decoded::Found { method, .. } => Some(*method),
            Decoded::NotFound => None,
        }
    }

    /// Returns true if a payload was found.
    pub fn is_found(&self) -> bool {
        matches!(self, Decoded::Found { .. })
    }

    /// Consumes self and returns the payload text, if found.
    pub fn into_text(self) -> Option<String> {
        match self {
            Decoded::Found { text, .. } => Some(text),
            Decoded::NotFound => None,
        }
    }
}

/// Embeds `text` in the image referenced by `source`.
///
/// Returns new PNG bytes.
pub fn encode(source: &Source, text: &str, method: EncodeMethod) -> Result<Vec<u8>, CodecError> {
    let bytes = source.fetch_bytes()?;
    info!("Encoding {} bytes into {} using {}", text.len(), source, method);
    encode_bytes(&bytes, text, method)
}

/// Embeds `text` in already-fetched image bytes.
///
/// The input bytes may be in any format the rasterizer understands; the
/// output is always PNG.
pub fn encode_bytes(bytes: &[u8], text: &str, method: EncodeMethod) -> Result<Vec<u8>, CodecError> {
    match method {
        EncodeMethod::PngTrailer => {
            if trailer::is_png(bytes) {
                Ok(trailer::embed(bytes, text)?)
            } else {
                debug!("Source is not a PNG, re-encoding before appending trailer");
                let png = source::to_png_bytes(source::rasterize(bytes)?)?;
                Ok(trailer::embed(&png, text)?)
            }
        }
        EncodeMethod::AlphaChannel => {
            let stego = AlphaStego::from_rgba(source::rasterize(bytes)?);
            let hidden = stego.hide(text)?;
            Ok(source::to_png_bytes(hidden)?)
        }
    }
}

/// Extracts an embedded payload from the image referenced by `source`.
///
/// Fails only when the source itself cannot be read; a missing or
/// malformed payload is [`Decoded::NotFound`].
pub fn decode(source: &Source) -> Result<Decoded, CodecError> {
    let bytes = source.fetch_bytes()?;
    let decoded = decode_bytes(&bytes);
    match &decoded {
        Decoded::Found { text, method } => {
            info!("Found {} byte payload in {} ({})", text.len(), source, method)
        }
        Decoded::NotFound => info!("No embedded payload in {}", source),
    }
    Ok(decoded)
}

/// Extracts an embedded payload from raw image bytes.
pub fn decode_bytes(bytes: &[u8]) -> Decoded {
    if let Some(text) = trailer::extract(bytes) {
        return Decoded::Found {
            text,
            method: EncodeMethod::PngTrailer,
        };
    }

    let pixels = match source::rasterize(bytes) {
        Ok(pixels) => pixels,
        Err(e) => {
            debug!("Skipping alpha-channel check: {}", e);
            return Decoded::NotFound;
        }
    };

    match alpha::extract_raw(pixels.as_raw()) {
        Some(text) => Decoded::Found {
            text,
            method: EncodeMethod::AlphaChannel,
        },
        None => Decoded::NotFound,
    }
}
