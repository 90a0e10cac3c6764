//! Output backends.
//!
//! This module defines the `Renderer` trait implemented by each output format. A
//! renderer is handed the snapshots one at a time, in input order; each produces an
//! independent block in the output stream. Renderers only read the snapshot and the
//! layout tree, never modify them.

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::io::Write;

use crate::layout::LayoutConfig;
use crate::snapshot::Snapshot;

pub mod html;
pub mod text;

/// Selectable output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One HTML page with a scrollable diagram per snapshot.
    Html,
    /// A line-oriented ASCII report per snapshot.
    Text,
}

/// A serializer for a sequence of snapshots.
pub trait Renderer {
    /// Writes anything that precedes the first snapshot.
    fn begin(&mut self, _out: &mut dyn Write) -> Result<()> {
        Ok(())
    }

    /// Writes one snapshot's block. `ordinal` counts snapshots from 0 within the run.
    fn snapshot(&mut self, ordinal: usize, snapshot: &Snapshot, out: &mut dyn Write) -> Result<()>;

    /// Writes anything that follows the last snapshot.
    fn finish(&mut self, _out: &mut dyn Write) -> Result<()> {
        Ok(())
    }
}

pub fn renderer_for(format: Format, layout: LayoutConfig) -> Box<dyn Renderer> {
    match format {
        Format::Html => Box::new(html::HtmlRenderer::new(layout)),
        Format::Text => Box::new(text::TextRenderer),
    }
}

/// Renders every snapshot into an in-memory document.
///
/// Nothing reaches the real sink until the whole document has been produced, so a
/// failure never leaves a partial report behind. An invalid `layout` is rejected before
/// anything is rendered, whatever the format.
pub fn render_document(snapshots: &[Snapshot], format: Format, layout: LayoutConfig) -> Result<Vec<u8>> {
    layout.validate()?;
    let mut renderer = renderer_for(format, layout);
    let mut buffer = Vec::new();

    renderer.begin(&mut buffer)?;
    for (ordinal, snapshot) in snapshots.iter().enumerate() {
        tracing::debug!(
            "Rendering snapshot #{} (timestamp {}, {} sections)",
            ordinal,
            snapshot.timestamp,
            snapshot.sections.len()
        );
        renderer
            .snapshot(ordinal, snapshot, &mut buffer)
            .with_context(|| format!("failed to render snapshot #{}", ordinal))?;
    }
    renderer.finish(&mut buffer)?;

    Ok(buffer)
}
