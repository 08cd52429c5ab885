//! Alpha-channel embedding (legacy format).
//!
//! Stores one payload byte in the alpha value of each pixel. RGB values
//! are never touched.
//!
//! Layout by pixel index:
//! - pixels 0..4: magic marker
//! - pixels 4..8: payload length (u32, big-endian)
//! - pixels 8..: payload bytes
//!
//! Rewriting alpha changes the transparency of the first `8 + len` pixels.

use image::{DynamicImage, RgbaImage};
use log::{debug, warn};

use super::{StegoError, LENGTH_FIELD_SIZE, MAGIC};

/// Pixels reserved for the magic marker and length field.
pub const HEADER_PIXELS: usize = MAGIC.len() + LENGTH_FIELD_SIZE;

const CHANNELS: usize = 4;
const ALPHA: usize = 3;

/// Returns the payload capacity in bytes for an image of `pixel_count` pixels.
pub fn capacity(pixel_count: usize) -> usize {
    pixel_count.saturating_sub(HEADER_PIXELS)
}

/// Embeds `text` in a raw RGBA buffer and returns the modified copy.
///
/// Fails with [`StegoError::CapacityExceeded`] before copying anything if
/// the payload does not fit.
pub fn embed_raw(pixels: &[u8], text: &str) -> Result<Vec<u8>, StegoError> {
    if pixels.len() % CHANNELS != 0 {
        return Err(StegoError::InvalidPixelBuffer(pixels.len()));
    }

    let payload = text.as_bytes();
    let capacity = capacity(pixels.len() / CHANNELS);
    if payload.len() > capacity {
        return Err(StegoError::CapacityExceeded {
            needed: payload.len(),
            capacity,
        });
    }

    let length =
        u32::try_from(payload.len()).map_err(|_| StegoError::PayloadTooLarge(payload.len()))?;

    if payload.is_empty() {
        warn!("Empty payload: an alpha-channel length of 0 reads back as no embedded data");
    }

    let touched = HEADER_PIXELS + payload.len();
    let translucent = pixels
        .chunks_exact(CHANNELS)
        .take(touched)
        .filter(|px| px[ALPHA] != u8::MAX)
        .count();
    if translucent > 0 {
        warn!(
            "{} of the first {} pixels were not fully opaque; their transparency is overwritten",
            translucent, touched
        );
    }

    let mut out = pixels.to_vec();
    let header = MAGIC.iter().copied().chain(length.to_be_bytes());
    for (px, byte) in out
        .chunks_exact_mut(CHANNELS)
        .zip(header.chain(payload.iter().copied()))
    {
        px[ALPHA] = byte;
    }

    debug!(
        "Wrote {} payload bytes into the alpha channel of {} pixels",
        payload.len(),
        touched
    );
    Ok(out)
}

/// Extracts a payload from a raw RGBA buffer.
///
/// Returns `None` when the magic marker is missing, the length is zero or
/// out of range, or the payload is not valid UTF-8.
pub fn extract_raw(pixels: &[u8]) -> Option<String> {
    let pixel_count = pixels.len() / CHANNELS;
    if pixel_count < HEADER_PIXELS {
        return None;
    }

    let mut alphas = pixels.chunks_exact(CHANNELS).map(|px| px[ALPHA]);

    let magic: Vec<u8> = alphas.by_ref().take(MAGIC.len()).collect();
    if magic != MAGIC {
        return None;
    }

    let mut len_bytes = [0u8; LENGTH_FIELD_SIZE];
    for (slot, byte) in len_bytes.iter_mut().zip(alphas.by_ref()) {
        *slot = byte;
    }
    let length = u32::from_be_bytes(len_bytes) as usize;

    if length == 0 || length > capacity(pixel_count) {
        debug!("Alpha-channel length {} is out of range", length);
        return None;
    }

    let payload: Vec<u8> = alphas.take(length).collect();
    match String::from_utf8(payload) {
        Ok(text) => Some(text),
        Err(e) => {
            debug!("Alpha-channel payload is not valid UTF-8: {}", e);
            None
        }
    }
}

/// Alpha-channel steganography over a decoded image.
pub struct AlphaStego {
    image: RgbaImage,
}

impl AlphaStego {
    /// Creates a new AlphaStego from any decoded image.
    pub fn from_image(image: &DynamicImage) -> Self {
        Self {
            image: image.to_rgba8(),
        }
    }

    /// Creates a new AlphaStego from an RGBA buffer.
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Returns the payload capacity in bytes.
    pub fn capacity(&self) -> usize {
        let (width, height) = self.image.dimensions();
        capacity((width as usize) * (height as usize))
    }

    /// Returns the image dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Hides `text` and returns a new image; `self` is unchanged.
    pub fn hide(&self, text: &str) -> Result<RgbaImage, StegoError> {
        let (width, height) = self.image.dimensions();
        let pixels = embed_raw(self.image.as_raw(), text)?;
        // Same dimensions and length as the source buffer.
        RgbaImage::from_raw(width, height, pixels)
            .ok_or(StegoError::InvalidPixelBuffer(self.image.as_raw().len()))
    }

    /// Extracts the hidden text, if any.
    pub fn extract(&self) -> Option<String> {
        extract_raw(self.image.as_raw())
    }

    /// Returns a reference to the underlying image.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Consumes self and returns the underlying image.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}
