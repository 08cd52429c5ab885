//! # pngcard - text payloads inside PNG images
//!
//! pngcard embeds a UTF-8 payload (usually a JSON character card) in an
//! image and reads it back, while the image keeps rendering as before.
//!
//! ## Formats
//!
//! - **PNG trailer** (current): `[payload][PCAR][len u32 BE]` appended after
//!   the PNG stream. Decoders stop at IEND, so the image is unchanged.
//! - **Alpha channel** (legacy): magic, length and payload stored one byte
//!   per pixel in the alpha channel.
//!
//! Decoding always checks the trailer first and then falls back to the
//! alpha channel, so images from both eras remain readable.
//!
//! ## Example Usage
//!
//! ```rust
//! use pngcard::{decode_bytes, encode_bytes, Decoded, EncodeMethod};
//! use image::{ImageBuffer, Rgba, RgbaImage};
//!
//! let image: RgbaImage = ImageBuffer::from_pixel(16, 16, Rgba([10, 20, 30, 255]));
//! let png = pngcard::source::to_png_bytes(image).unwrap();
//!
//! let card = encode_bytes(&png, r#"{"name":"A"}"#, EncodeMethod::PngTrailer).unwrap();
//! assert_eq!(card.len(), png.len() + 12 + 8);
//!
//! match decode_bytes(&card) {
//!     Decoded::Found { text, method } => {
//!         assert_eq!(text, r#"{"name":"A"}"#);
//!         assert_eq!(method, EncodeMethod::PngTrailer);
//!     }
//!     Decoded::NotFound => unreachable!(),
//! }
//! ```
//!
//! ## Modules
//!
//! - [`stego`]: the two embedding formats
//! - [`codec`]: method dispatch and auto-detecting decode
//! - [`source`]: source resolution and byte/pixel conversion
//! - [`config`]: user defaults

pub mod codec;
pub mod config;
pub mod source;
pub mod stego;

// Re-export commonly used types at the crate root
pub use codec::{decode, decode_bytes, encode, encode_bytes, CodecError, Decoded, EncodeMethod};
pub use config::{CodecConfig, ConfigError};
pub use source::{Source, SourceError};
pub use stego::{AlphaStego, StegoError, MAGIC, PNG_SIGNATURE};
