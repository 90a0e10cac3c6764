//! Graphic output.
//!
//! Emits a single HTML page. Each snapshot becomes a scrollable block holding one
//! `<svg>` surface, with one bordered `<rect>` and at most one `<text>` label per
//! layout rectangle, written depth-first in child order.

use anyhow::Result;
use std::borrow::Cow;
use std::io::Write;

use super::Renderer;
use crate::layout::{LayoutBuilder, LayoutConfig, Rect, RectKind};
use crate::snapshot::Snapshot;

/// Gap between a section's right edge and its address annotation.
const ADDRESS_GAP: u32 = 6;
/// Horizontal padding of a label inside its rectangle.
const LABEL_PAD: u32 = 4;
/// Label baseline, measured from a rectangle's top.
const BASELINE: u32 = 14;

const STYLE: &str = "\
body { font-family: sans-serif; }
.snapshot { overflow: auto; border: 1px solid #888; margin: 1em 0; }
svg text { font-family: monospace; font-size: 11px; }
rect { stroke: #333; stroke-width: 1; }
rect.snapshot { fill: none; }
rect.section { fill: #e8eef8; }
rect.atom { fill: #d6f0d6; }
rect.unnamed { fill: #eeeeee; stroke-dasharray: 3 2; }
text.address { fill: #555; }";

pub struct HtmlRenderer {
    layout: LayoutConfig,
}

impl HtmlRenderer {
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    fn rect(&self, rect: &Rect, out: &mut dyn Write) -> Result<()> {
        let class = match rect.kind {
            RectKind::Snapshot => "snapshot",
            RectKind::Section => "section",
            RectKind::Atom if rect.is_named() => "atom",
            RectKind::Atom => "atom unnamed",
        };

        if rect.kind == RectKind::Atom {
            writeln!(out, "<g>")?;
            if let Some(tooltip) = tooltip(rect) {
                writeln!(out, "<title>{}</title>", escape(&tooltip))?;
            }
        }

        writeln!(
            out,
            r#"<rect class="{}" x="{}" y="{}" width="{}" height="{}"/>"#,
            class, rect.x, rect.y, rect.width, rect.height
        )?;

        if let Some(label) = display_label(rect) {
            writeln!(
                out,
                r#"<text x="{}" y="{}">{}</text>"#,
                rect.x + LABEL_PAD,
                rect.y + BASELINE,
                escape(&label)
            )?;
        }

        if rect.kind == RectKind::Section {
            if let Some(span) = rect.span {
                writeln!(
                    out,
                    r#"<text class="address" x="{}" y="{}">0x{:x}</text>"#,
                    rect.x + rect.width + ADDRESS_GAP,
                    rect.y + BASELINE,
                    span.address
                )?;
            }
        }

        if rect.kind == RectKind::Atom {
            writeln!(out, "</g>")?;
        }

        for child in &rect.children {
            self.rect(child, out)?;
        }
        Ok(())
    }
}

impl Renderer for HtmlRenderer {
    fn begin(&mut self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html>\n<head>\n<meta charset=\"utf-8\">")?;
        writeln!(out, "<title>Linker snapshots</title>")?;
        writeln!(out, "<style>\n{}\n</style>\n</head>\n<body>", STYLE)?;
        Ok(())
    }

    fn snapshot(&mut self, ordinal: usize, snapshot: &Snapshot, out: &mut dyn Write) -> Result<()> {
        let root = LayoutBuilder::new(&self.layout)?.build(snapshot);

        writeln!(out, "<h2>Snapshot {} (timestamp {})</h2>", ordinal, snapshot.timestamp)?;
        writeln!(out, r#"<div class="snapshot">"#)?;
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = root.width,
            h = root.height + 1
        )?;
        self.rect(&root, out)?;
        writeln!(out, "</svg>\n</div>")?;
        Ok(())
    }

    fn finish(&mut self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "</body>\n</html>")?;
        Ok(())
    }
}

fn display_label(rect: &Rect) -> Option<String> {
    match rect.kind {
        RectKind::Snapshot => None,
        RectKind::Section => rect.label.clone(),
        RectKind::Atom => {
            let span = rect.span?;
            let name = rect.label.as_deref().unwrap_or("(unnamed)");
            Some(format!("{} [0x{:x}-0x{:x}]", name, span.address, span.end()))
        }
    }
}

fn tooltip(rect: &Rect) -> Option<String> {
    if rect.aliases.is_empty() && rect.interior.is_empty() {
        return None;
    }
    let mut lines = Vec::new();
    for alias in &rect.aliases {
        lines.push(format!("alias {}", alias));
    }
    for sym in &rect.interior {
        lines.push(format!("{} @ 0x{:x}", sym.name, sym.address));
    }
    Some(lines.join("\n"))
}

fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(|c: char| matches!(c, '&' | '<' | '>' | '"' | '\'')) {
        return Cow::Borrowed(s);
    }
    let mut escaped = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Node, Section, Symbol, Symtab};

    fn render(snapshot: &Snapshot) -> String {
        let mut out = Vec::new();
        HtmlRenderer::new(LayoutConfig::default()).snapshot(0, snapshot, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("_main"), "_main");
        assert_eq!(escape("operator<<&"), "operator&lt;&lt;&amp;");
    }

    #[test]
    fn test_empty_snapshot_has_only_the_frame() {
        let html = render(&Snapshot::default());
        assert_eq!(html.matches("<svg").count(), 1);
        assert_eq!(html.matches("<rect").count(), 1);
        assert!(html.contains(r#"class="snapshot" x="0" y="0" width="600" height="0""#));
    }

    #[test]
    fn test_section_and_atoms_are_drawn() {
        let snapshot = Snapshot {
            sections: vec![Section {
                name: "__TEXT".into(),
                address: 0x1000,
                size: 0x100,
                nodes: vec![
                    Node { address: 0x1000, size: 0x20, links: Vec::new() },
                    Node { address: 0x1020, size: 0x10, links: Vec::new() },
                ],
            }],
            symtab: Symtab {
                globals: vec![
                    Symbol { name: "_main".into(), address: 0x1000, section: 1 },
                    Symbol { name: "_helper".into(), address: 0x1008, section: 1 },
                ],
                ..Default::default()
            },
            ..Default::default()
        };
        let html = render(&snapshot);

        assert_eq!(html.matches("<rect").count(), 4);
        assert!(html.contains(r#"<rect class="section" x="0" y="0" width="480" height="70"/>"#));
        assert!(html.contains(r#"<text class="address" x="486" y="14">0x1000</text>"#));
        assert!(html.contains("_main [0x1000-0x1020]"));
        assert!(html.contains("<title>_helper @ 0x1008</title>"));
        assert!(html.contains(r#"class="atom unnamed""#));
        assert!(html.contains("(unnamed) [0x1020-0x1030]"));
    }
}
