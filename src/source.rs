//! Image sources and byte/pixel conversion.
//!
//! A source is a file on disk, a network URL, or an embedded `data:` URI.
//! Sources resolve to raw bytes; bytes rasterize to RGBA pixels through the `image`
//! crate, and pixels serialize back to canonical PNG bytes.

use std::fmt;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::{DynamicImage, ImageFormat, RgbaImage};
use log::debug;
use thiserror::Error;

/// MIME type used for every image this crate produces.
pub const PNG_MIME: &str = "image/png";

/// Errors that can occur while resolving or converting a source.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    #[error("HTTP {status} fetching {url}")]
    Http { url: String, status: u16 },

    #[error("Could not fetch {url}: {message}")]
    Network { url: String, message: String },

    #[error("Image decode error: {0}")]
    Raster(String),

    #[error("Image encode error: {0}")]
    Serialize(String),
}

/// A reference to an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Image file on disk.
    Path(PathBuf),
    /// `http://` or `https://` URL.
    Url(String),
    /// Embedded `data:` URI.
    DataUri(String),
}

impl Source {
    /// Creates a source from a file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Source::Path(path.as_ref().to_path_buf())
    }

    /// Resolves the source to its raw bytes.
    pub fn fetch_bytes(&self) -> Result<Vec<u8>, SourceError> {
        match self {
            Source::Path(path) => {
                let bytes = std::fs::read(path).map_err(|source| SourceError::Io {
                    path: path.clone(),
                    source,
                })?;
                debug!("Read {} bytes from {}", bytes.len(), path.display());
                Ok(bytes)
            }
            Source::Url(url) => fetch_url(url),
            Source::DataUri(uri) => decode_data_uri(uri),
        }
    }
}

impl FromStr for Source {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim_start().to_ascii_lowercase();
        if lower.starts_with("data:") {
            Ok(Source::DataUri(s.trim().to_string()))
        } else if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(Source::Url(s.trim().to_string()))
        } else {
            Ok(Source::Path(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(path) => write!(f, "{}", path.display()),
            Source::Url(url) => f.write_str(url),
            Source::DataUri(uri) => {
                let header = uri.split(',').next().unwrap_or("data:");
                write!(f, "{},... ({} chars)", header, uri.len())
            }
        }
    }
}

/// Downloads `url`; non-2xx responses are errors.
fn fetch_url(url: &str) -> Result<Vec<u8>, SourceError> {
    let response = ureq::get(url).call().map_err(|e| match e {
        ureq::Error::Status(status, _) => SourceError::Http {
            url: url.to_string(),
            status,
        },
        other => SourceError::Network {
            url: url.to_string(),
            message: other.to_string(),
        },
    })?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| SourceError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;
    debug!("Fetched {} bytes from {}", bytes.len(), url);
    Ok(bytes)
}

/// Decodes the payload of a `data:[<mime>][;base64],<data>` URI.
///
/// Non-base64 data is taken verbatim.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, SourceError> {
    let rest = uri
        .get(..5)
        .filter(|scheme| scheme.eq_ignore_ascii_case("data:"))
        .map(|_| &uri[5..])
        .ok_or_else(|| SourceError::InvalidDataUri("missing data: scheme".to_string()))?;

    let (meta, data) = rest
        .split_once(',')
        .ok_or_else(|| SourceError::InvalidDataUri("missing ',' separator".to_string()))?;

    let is_base64 = meta
        .rsplit(';')
        .next()
        .is_some_and(|param| param.eq_ignore_ascii_case("base64"));

    if is_base64 {
        BASE64
            .decode(data.trim())
            .map_err(|e| SourceError::InvalidDataUri(e.to_string()))
    } else {
        Ok(data.as_bytes().to_vec())
    }
}

/// Encodes PNG bytes as a `data:image/png;base64,` URL.
pub fn to_data_url(png: &[u8]) -> String {
    format!("data:{};base64,{}", PNG_MIME, BASE64.encode(png))
}

/// Decodes image bytes of any supported format to an RGBA buffer.
pub fn rasterize(bytes: &[u8]) -> Result<RgbaImage, SourceError> {
    let image =
        image::load_from_memory(bytes).map_err(|e| SourceError::Raster(e.to_string()))?;
    debug!("Rasterized {}x{} image", image.width(), image.height());
    Ok(image.to_rgba8())
}

/// Serializes an RGBA buffer as PNG bytes.
pub fn to_png_bytes(image: RgbaImage) -> Result<Vec<u8>, SourceError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| SourceError::Serialize(e.to_string()))?;
    Ok(bytes)
}
