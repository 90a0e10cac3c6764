//! Entry point for snapviz.
//!
//! This file handles high-level application flow:
//! 1. Parse command-line arguments using `clap`.
//! 2. Decode every snapshot in the input document.
//! 3. Render all snapshots, in input order, into one in-memory document.
//! 4. Write the document to the output file or standard output.
//!
//! Error handling is done via `anyhow`.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;

use snapviz::config::Config;
use snapviz::{decode, logging, render};

fn main() -> Result<()> {
    let config = Config::parse();
    logging::init(&config.log_level)?;

    let layout = config.layout()?;

    tracing::info!("Reading snapshots from {}", config.input.display());
    let snapshots = decode::load(&config.input)?;
    tracing::info!("Decoded {} snapshots", snapshots.len());

    let document = render::render_document(&snapshots, config.format, layout)?;

    match &config.output {
        Some(path) => {
            std::fs::write(path, &document)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("Wrote {} ({} bytes)", path.display(), document.len());
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(&document).context("failed to write to standard output")?;
            lock.flush().context("failed to write to standard output")?;
        }
    }
    Ok(())
}
