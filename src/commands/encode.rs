//! Encode command - embed a payload in an image.

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use log::{debug, info};

use pngcard::source::to_data_url;
use pngcard::{encode, CodecConfig, EncodeMethod, Source};

use super::CommandExecutor;

/// Embed a text payload (usually a JSON character card) in an image.
///
/// The output is always a PNG. With png-trailer, PNG sources are kept
/// byte-for-byte and the payload is appended; other formats are re-encoded
/// to PNG first. With alpha-channel, the image is re-encoded and the
/// payload replaces the alpha of the first pixels.
///
/// Payload is read from --text, --file, or stdin (in that order).
#[derive(Args, Debug)]
pub struct EncodeCommand {
    /// Source image (file path, http(s) URL, or data: URI)
    #[arg(short, long)]
    pub input: String,

    /// Payload text (mutually exclusive with --file)
    #[arg(short, long, conflicts_with = "file")]
    pub text: Option<String>,

    /// File containing the payload (mutually exclusive with --text)
    #[arg(short, long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Embedding method (defaults to the configured method, png-trailer if unset)
    #[arg(short, long, value_enum)]
    pub method: Option<EncodeMethod>,

    /// Output PNG path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the result as a data:image/png;base64 URL
    #[arg(long)]
    pub data_url: bool,
}

impl CommandExecutor for EncodeCommand {
    fn execute(&self) -> Result<()> {
        let config = CodecConfig::load().context("Failed to load configuration")?;
        let (method, as_data_url) = self.resolve_options(&config)?;

        let source: Source = self.input.parse().context("Invalid input")?;
        let text = self.read_payload()?;
        debug!("Payload is {} bytes", text.len());

        let encoded = encode(&source, &text, method)
            .with_context(|| format!("Failed to encode payload into {}", source))?;

        if let Some(output) = &self.output {
            std::fs::write(output, &encoded)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!("Wrote {} bytes to {}", encoded.len(), output.display());
            eprintln!("Encoded with {} -> {}", method, output.display());
        }

        if as_data_url {
            println!("{}", to_data_url(&encoded));
        }

        Ok(())
    }
}

impl EncodeCommand {
    /// Applies configured defaults; returns the method and whether to print a data URL.
    fn resolve_options(&self, config: &CodecConfig) -> Result<(EncodeMethod, bool)> {
        let method = self.method.unwrap_or(config.default_method);
        let as_data_url = self.data_url || config.data_url;

        if self.output.is_none() && !as_data_url {
            bail!("No output given. Use --output <FILE> or --data-url");
        }
        Ok((method, as_data_url))
    }

    /// Resolves the payload from the various input sources.
    fn read_payload(&self) -> Result<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }

        if let Some(path) = &self.file {
            return std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read payload from {}", path.display()));
        }

        eprintln!("Reading payload from stdin (Ctrl+D to finish):");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read payload from stdin")?;
        Ok(buffer)
    }
}
