//! Payload embedding formats.
//!
//! Supports:
//! - PNG trailer embedding (current format, appended after IEND)
//! - Alpha-channel embedding (legacy format, one byte per pixel)
//!
//! Both formats frame the payload with the same magic marker and a
//! big-endian u32 length field.

pub mod alpha;
pub mod error;
pub mod trailer;

pub use alpha::AlphaStego;
pub use error::StegoError;
pub use trailer::is_png;

/// Magic marker shared by both formats: `'P','C','A','R'`.
pub const MAGIC: [u8; 4] = *b"PCAR";

/// Size of the length field in bytes.
pub const LENGTH_FIELD_SIZE: usize = 4;

/// The 8-byte signature that opens every PNG file.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];
