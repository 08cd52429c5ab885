//! Integration tests for pngcard
//!
//! Note: decode never fails on a readable source - a missing or malformed
//! payload is `Decoded::NotFound`.

use image::{ImageBuffer, Rgba, RgbaImage};
use pngcard::source::{rasterize, to_data_url, to_png_bytes};
use pngcard::stego::alpha;
use pngcard::{
    decode, decode_bytes, encode, encode_bytes, CodecError, Decoded, EncodeMethod, Source,
    StegoError, PNG_SIGNATURE,
};

fn create_test_image(width: u32, height: u32) -> RgbaImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        Rgba([
            ((x * 17) % 256) as u8,
            ((y * 23) % 256) as u8,
            (((x + y) * 31) % 256) as u8,
            255,
        ])
    })
}

fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    to_png_bytes(create_test_image(width, height)).unwrap()
}

/// A stream of `len` bytes that passes the PNG signature check.
fn signed_stream(len: usize) -> Vec<u8> {
    let mut bytes = PNG_SIGNATURE.to_vec();
    bytes.resize(len, 0x42);
    bytes
}

fn character_card() -> String {
    r#"{"name":"Yuna","prompt":"A cheerful barista who remembers every order.","tone":2,"media":[],"stickers":[]}"#
        .to_string()
}

/// Test trailer encode/decode roundtrip
#[test]
fn test_trailer_roundtrip() {
    let png = create_test_png(32, 32);
    let card = character_card();

    let encoded = encode_bytes(&png, &card, EncodeMethod::PngTrailer).unwrap();

    // PNG bytes are kept verbatim in front of the trailer
    assert_eq!(&encoded[..png.len()], &png[..]);
    assert_eq!(
        decode_bytes(&encoded),
        Decoded::Found {
            text: card,
            method: EncodeMethod::PngTrailer
        }
    );
}

/// Test that a trailer does not change how the image renders
#[test]
fn test_trailer_keeps_image_renderable() {
    let png = create_test_png(20, 10);
    let encoded = encode_bytes(&png, &character_card(), EncodeMethod::PngTrailer).unwrap();

    assert_eq!(rasterize(&encoded).unwrap(), create_test_image(20, 10));
}

/// Test alpha-channel encode/decode roundtrip
#[test]
fn test_alpha_roundtrip() {
    let png = create_test_png(32, 32);
    let card = character_card();

    let encoded = encode_bytes(&png, &card, EncodeMethod::AlphaChannel).unwrap();

    assert_eq!(
        decode_bytes(&encoded),
        Decoded::Found {
            text: card,
            method: EncodeMethod::AlphaChannel
        }
    );
}

/// Test roundtrip over a range of payload lengths for both methods
#[test]
fn test_roundtrip_lengths() {
    let png = create_test_png(16, 16);
    let capacity = alpha::capacity(16 * 16);

    for len in [1, 2, 7, 64, capacity] {
        // Mixed ASCII and multi-byte text, at most `len` bytes
        let mut text = String::new();
        for c in "a한b".chars().cycle() {
            if text.len() + c.len_utf8() > len {
                break;
            }
            text.push(c);
        }

        for method in [EncodeMethod::PngTrailer, EncodeMethod::AlphaChannel] {
            let encoded = encode_bytes(&png, &text, method).unwrap();
            let decoded = decode_bytes(&encoded);
            assert_eq!(decoded.text(), Some(text.as_str()), "{} len {}", method, len);
            assert_eq!(decoded.method(), Some(method));
        }
    }
}

/// Test large trailer payloads (no capacity limit)
#[test]
fn test_trailer_large_payload() {
    let png = create_test_png(2, 2);
    let text = "x".repeat(100_000);

    let encoded = encode_bytes(&png, &text, EncodeMethod::PngTrailer).unwrap();
    assert_eq!(decode_bytes(&encoded).text(), Some(text.as_str()));
}

/// Concrete example: 12-byte card into a 500-byte PNG
#[test]
fn test_concrete_trailer_size() {
    let png = signed_stream(500);

    let encoded = encode_bytes(&png, r#"{"name":"A"}"#, EncodeMethod::PngTrailer).unwrap();

    assert_eq!(encoded.len(), 520);
    assert_eq!(
        decode_bytes(&encoded),
        Decoded::Found {
            text: r#"{"name":"A"}"#.to_string(),
            method: EncodeMethod::PngTrailer
        }
    );
}

/// Concrete example: 93 bytes do not fit in a 10x10 image
#[test]
fn test_concrete_capacity_exceeded() {
    let png = create_test_png(10, 10);
    let before = png.clone();

    let result = encode_bytes(&png, &"a".repeat(93), EncodeMethod::AlphaChannel);

    assert!(matches!(
        result,
        Err(CodecError::Stego(StegoError::CapacityExceeded {
            needed: 93,
            capacity: 92
        }))
    ));
    assert_eq!(png, before);

    // 92 still fits
    assert!(encode_bytes(&png, &"a".repeat(92), EncodeMethod::AlphaChannel).is_ok());
}

/// Test that a trailer wins over legacy alpha-channel data
#[test]
fn test_trailer_priority() {
    let png = create_test_png(24, 24);

    let legacy = encode_bytes(&png, "legacy card", EncodeMethod::AlphaChannel).unwrap();
    let both = encode_bytes(&legacy, "current card", EncodeMethod::PngTrailer).unwrap();

    assert_eq!(
        decode_bytes(&both),
        Decoded::Found {
            text: "current card".to_string(),
            method: EncodeMethod::PngTrailer
        }
    );
}

/// Test that a broken trailer falls back to the alpha channel
#[test]
fn test_fallback_to_alpha() {
    let png = create_test_png(24, 24);

    let legacy = encode_bytes(&png, "legacy card", EncodeMethod::AlphaChannel).unwrap();
    let mut both = encode_bytes(&legacy, "current card", EncodeMethod::PngTrailer).unwrap();
    let magic_at = both.len() - 8;
    both[magic_at] = b'X';

    assert_eq!(
        decode_bytes(&both),
        Decoded::Found {
            text: "legacy card".to_string(),
            method: EncodeMethod::AlphaChannel
        }
    );
}

/// Test that flipping any magic byte hides the trailer
#[test]
fn test_trailer_magic_mismatch() {
    let png = create_test_png(8, 8);
    let encoded = encode_bytes(&png, "card", EncodeMethod::PngTrailer).unwrap();
    let magic_at = encoded.len() - 8;

    for i in 0..4 {
        let mut corrupted = encoded.clone();
        corrupted[magic_at + i] = corrupted[magic_at + i].wrapping_add(1);
        assert_eq!(decode_bytes(&corrupted), Decoded::NotFound);
    }
}

/// Test that flipping any alpha magic byte hides the legacy payload
#[test]
fn test_alpha_magic_mismatch() {
    let png = create_test_png(8, 8);
    let encoded = encode_bytes(&png, "card", EncodeMethod::AlphaChannel).unwrap();
    let pixels = rasterize(&encoded).unwrap();

    for i in 0..4u32 {
        let mut corrupted = pixels.clone();
        corrupted.get_pixel_mut(i, 0).0[3] ^= 0x80;
        let bytes = to_png_bytes(corrupted).unwrap();
        assert_eq!(decode_bytes(&bytes), Decoded::NotFound);
    }
}

/// Test that an oversized length field is not trusted
#[test]
fn test_truncated_trailer() {
    let png = create_test_png(8, 8);
    let mut encoded = encode_bytes(&png, "card", EncodeMethod::PngTrailer).unwrap();
    let len_at = encoded.len() - 4;
    let bogus = (encoded.len() as u32).to_be_bytes();
    encoded[len_at..].copy_from_slice(&bogus);

    assert_eq!(decode_bytes(&encoded), Decoded::NotFound);
}

/// Test that non-PNG data carrying a trailer-shaped footer is ignored
#[test]
fn test_non_png_short_circuit() {
    let mut bytes = b"GIF89a".to_vec();
    bytes.extend_from_slice(b"card");
    bytes.extend_from_slice(b"PCAR");
    bytes.extend_from_slice(&4u32.to_be_bytes());

    assert_eq!(decode_bytes(&bytes), Decoded::NotFound);
}

/// Test that trailer encoding re-encodes non-PNG sources
#[test]
fn test_trailer_from_jpeg_source() {
    let rgb = image::DynamicImage::ImageRgba8(create_test_image(12, 12)).to_rgb8();
    let mut jpeg = Vec::new();
    image::DynamicImage::ImageRgb8(rgb)
        .write_to(&mut std::io::Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
        .unwrap();

    let encoded = encode_bytes(&jpeg, "card", EncodeMethod::PngTrailer).unwrap();

    assert!(encoded.starts_with(&PNG_SIGNATURE));
    assert_eq!(decode_bytes(&encoded).text(), Some("card"));
}

/// Test the path-based entry points
#[test]
fn test_file_source() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("avatar.png");
    std::fs::write(&input, create_test_png(16, 16)).unwrap();

    let source = Source::from_path(&input);
    let encoded = encode(&source, &character_card(), EncodeMethod::PngTrailer).unwrap();

    let output = dir.path().join("card.png");
    std::fs::write(&output, &encoded).unwrap();

    let decoded = decode(&Source::from_path(&output)).unwrap();
    assert_eq!(decoded.text(), Some(character_card().as_str()));
    assert_eq!(decoded.method(), Some(EncodeMethod::PngTrailer));
}

/// Test data: URI sources
#[test]
fn test_data_uri_source() {
    let png = create_test_png(10, 10);
    let encoded = encode_bytes(&png, "inline", EncodeMethod::AlphaChannel).unwrap();

    let source: Source = to_data_url(&encoded).parse().unwrap();
    let decoded = decode(&source).unwrap();

    assert_eq!(decoded.text(), Some("inline"));
    assert_eq!(decoded.method(), Some(EncodeMethod::AlphaChannel));
}

/// Test that an unreadable source is an error, not NotFound
#[test]
fn test_missing_source_errors() {
    let dir = tempfile::tempdir().unwrap();
    let result = decode(&Source::from_path(dir.path().join("nope.png")));
    assert!(matches!(result, Err(CodecError::Source(_))));
}

/// Test that an image without a payload decodes to NotFound
#[test]
fn test_plain_image() {
    assert_eq!(decode_bytes(&create_test_png(10, 10)), Decoded::NotFound);
}
