//! Capacity command - report how much an image can carry.

use anyhow::{Context, Result};
use clap::Args;

use pngcard::source::rasterize;
use pngcard::stego::trailer;
use pngcard::{AlphaStego, Source};

use super::CommandExecutor;

/// Show how many payload bytes an image can carry.
///
/// The legacy alpha-channel format is bounded by the pixel count; the PNG
/// trailer only by its 32-bit length field.
#[derive(Args, Debug)]
pub struct CapacityCommand {
    /// Image to inspect (file path, http(s) URL, or data: URI)
    #[arg(short, long)]
    pub input: String,
}

impl CommandExecutor for CapacityCommand {
    fn execute(&self) -> Result<()> {
        let source: Source = self.input.parse().context("Invalid input")?;
        let bytes = source.fetch_bytes()?;
        let image = rasterize(&bytes).with_context(|| format!("Failed to decode {}", source))?;

        for line in capacity_report(&AlphaStego::from_rgba(image)) {
            println!("{}", line);
        }
        Ok(())
    }
}

/// Formats the capacity of both embedding methods.
fn capacity_report(stego: &AlphaStego) -> Vec<String> {
    let (width, height) = stego.dimensions();
    vec![
        format!(
            "Image:         {}x{} ({} pixels)",
            width,
            height,
            width as u64 * height as u64
        ),
        format!("alpha-channel: {} bytes", stego.capacity()),
        format!("png-trailer:   {} bytes (u32 length field)", trailer::MAX_PAYLOAD),
    ]
}
