//! Codec error types.

use thiserror::Error;

/// Errors that can occur while embedding a payload.
///
/// Extraction never produces these: a missing or malformed payload is
/// reported as `None`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StegoError {
    /// Payload does not fit in the available alpha-channel slots.
    #[error("Image too small to hide data: need {needed} bytes, have capacity for {capacity}")]
    CapacityExceeded {
        /// Payload size in bytes.
        needed: usize,
        /// Usable capacity in bytes.
        capacity: usize,
    },

    /// Trailer embedding requires a PNG byte stream.
    #[error("Not a PNG file (trailer embedding only works on PNG data)")]
    NotPng,

    /// Raw pixel buffer is not a whole number of RGBA pixels.
    #[error("Invalid RGBA buffer: {0} bytes is not a multiple of 4")]
    InvalidPixelBuffer(usize),

    /// Payload length does not fit in the 32-bit length field.
    #[error("Payload too large: {0} bytes exceeds the 32-bit length field")]
    PayloadTooLarge(usize),
}
