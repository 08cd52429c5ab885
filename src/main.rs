//! pngcard - text payloads inside PNG images
//!
//! A CLI tool for embedding and extracting character cards in images.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::{debug, Level};

use commands::{CapacityCommand, CommandExecutor, DecodeCommand, EncodeCommand};

/// pngcard - text payloads inside PNG images
///
/// Embeds a UTF-8 payload after the PNG stream (png-trailer) or in the
/// alpha channel (alpha-channel), and reads either back.
#[derive(Parser)]
#[command(name = "pngcard")]
#[command(version)]
#[command(about = "Embed and extract text payloads in PNG images")]
#[command(long_about = None)]
struct Cli {
    #[command(flatten)]
    logging: LoggingArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Global logging flags.
#[derive(Args)]
struct LoggingArgs {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

impl LoggingArgs {
    fn level(&self) -> Level {
        if self.verbose {
            Level::Debug
        } else if self.quiet {
            Level::Error
        } else {
            Level::Warn
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Embed a payload in an image
    Encode(EncodeCommand),

    /// Extract an embedded payload from an image
    Decode(DecodeCommand),

    /// Show how many bytes the alpha-channel format can hold
    Capacity(CapacityCommand),
}

impl Commands {
    fn executor(&self) -> &dyn CommandExecutor {
        match self {
            Commands::Encode(cmd) => cmd,
            Commands::Decode(cmd) => cmd,
            Commands::Capacity(cmd) => cmd,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = cli.logging.level();
    simple_logger::init_with_level(level)?;
    debug!("Log level: {}", level);

    cli.command.executor().execute()
}
