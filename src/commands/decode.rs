//! Decode command - extract an embedded payload from an image.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use log::{info, warn};

use pngcard::stego::trailer;
use pngcard::{decode_bytes, Decoded, Source};

use super::CommandExecutor;

/// Extract an embedded payload from an image.
///
/// The PNG trailer is checked first, then the legacy alpha channel.
/// The payload is printed to stdout and the method that found it to stderr.
#[derive(Args, Debug)]
pub struct DecodeCommand {
    /// Image to read (file path, http(s) URL, or data: URI)
    #[arg(short, long)]
    pub input: String,

    /// Pretty-print the payload if it is JSON
    #[arg(long)]
    pub pretty: bool,

    /// Write the image with its trailer removed to this path
    #[arg(long)]
    pub strip: Option<PathBuf>,
}

impl CommandExecutor for DecodeCommand {
    fn execute(&self) -> Result<()> {
        let source: Source = self.input.parse().context("Invalid input")?;
        let bytes = source
            .fetch_bytes()
            .with_context(|| format!("Failed to read {}", source))?;

        let (text, method) = match decode_bytes(&bytes) {
            Decoded::Found { text, method } => (text, method),
            Decoded::NotFound => bail!("No embedded data found in {}", source),
        };
        info!("Found {} byte payload in {} ({})", text.len(), source, method);

        if self.pretty {
            println!("{}", pretty_json(&text));
        } else {
            println!("{}", text);
        }
        eprintln!("Method: {}", method);

        if let Some(path) = &self.strip {
            write_stripped(&bytes, path)?;
        }

        Ok(())
    }
}

/// Writes `bytes` without their trailer.
///
/// Returns false (and writes nothing) when there is no trailer.
fn write_stripped(bytes: &[u8], path: &Path) -> Result<bool> {
    match trailer::strip(bytes) {
        Some(original) => {
            std::fs::write(path, original)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {} bytes without trailer to {}", original.len(), path.display());
            Ok(true)
        }
        None => {
            warn!("No PNG trailer, nothing to strip");
            Ok(false)
        }
    }
}

/// Re-formats a JSON payload; other payloads are returned verbatim.
fn pretty_json(text: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| text.to_string()),
        Err(e) => {
            warn!("Payload is not JSON ({}), printing as-is", e);
            text.to_string()
        }
    }
}
