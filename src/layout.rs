//! Layout management.
//!
//! This module turns a `Snapshot` into a tree of positioned rectangles mirroring its
//! section/atom hierarchy: one root per snapshot, one child per section, one grandchild
//! per atom. Coordinates are absolute within the snapshot's drawing surface.
//!
//! Rectangles stack linearly. Every sibling's `y` is derived from the bottom of the
//! sibling before it, so siblings never overlap no matter how many there are.

use anyhow::{ensure, Result};

use crate::snapshot::{Section, Snapshot};
use crate::symbol::SymbolIndex;

/// Fixed geometry constants, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Width of the snapshot's drawing surface.
    pub root_width: u32,
    /// Space to the right of each section reserved for its address annotation.
    pub right_margin: u32,
    /// Height of a section before any atom is placed.
    pub header_height: u32,
    /// Distance from a section's top to its first atom row.
    pub header_offset: u32,
    /// Horizontal inset of atoms within their section.
    pub indent: u32,
    /// Height of one atom row, regardless of the atom's byte size.
    pub row_height: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            root_width: 600,
            right_margin: 120,
            header_height: 30,
            header_offset: 30,
            indent: 10,
            row_height: 20,
        }
    }
}

impl LayoutConfig {
    pub fn with_width(root_width: u32) -> Result<Self> {
        let config = Self { root_width, ..Self::default() };
        config.validate()?;
        Ok(config)
    }

    /// Atoms must keep a positive width after indenting on both sides.
    pub fn validate(&self) -> Result<()> {
        let reserved = self.right_margin as u64 + 2 * self.indent as u64;
        ensure!(
            self.root_width as u64 > reserved,
            "display width {} leaves no room for atoms (needs more than {})",
            self.root_width,
            reserved
        );
        Ok(())
    }

    fn section_width(&self) -> u32 {
        self.root_width - self.right_margin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectKind {
    Snapshot,
    Section,
    Atom,
}

/// A memory range shown next to a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub address: u64,
    pub size: u64,
}

impl Span {
    pub fn end(&self) -> u64 {
        self.address.saturating_add(self.size)
    }
}

/// A symbol placed inside an atom but not at its start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteriorSymbol {
    pub name: String,
    pub address: u64,
}

/// A positioned box in the diagram. Owns its children exclusively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rect {
    pub kind: RectKind,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Section name, or the atom's primary symbol. `None` for an unnamed atom.
    pub label: Option<String>,
    /// Further symbols bound at the atom's own address.
    pub aliases: Vec<String>,
    pub span: Option<Span>,
    pub interior: Vec<InteriorSymbol>,
    pub children: Vec<Rect>,
}

impl Rect {
    fn new(kind: RectKind, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            kind,
            x,
            y,
            width,
            height,
            label: None,
            aliases: Vec::new(),
            span: None,
            interior: Vec::new(),
            children: Vec::new(),
        }
    }

    /// First `y` below this rectangle.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Whether an atom rectangle had a symbol at its own address.
    pub fn is_named(&self) -> bool {
        self.label.is_some()
    }
}

/// Builds the rectangle tree of one snapshot.
pub struct LayoutBuilder<'a> {
    config: &'a LayoutConfig,
}

impl<'a> LayoutBuilder<'a> {
    /// Fails if `config` leaves no room for atoms.
    pub fn new(config: &'a LayoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn build(&self, snapshot: &Snapshot) -> Rect {
        let symbols = SymbolIndex::new(&snapshot.symtab);
        let mut root = Rect::new(RectKind::Snapshot, 0, 0, self.config.root_width, 0);

        for section in &snapshot.sections {
            let y = root.children.last().map_or(root.y, Rect::bottom);
            let rect = self.place_section(section, root.x, y, &symbols);
            root.height += rect.height;
            root.children.push(rect);
        }

        tracing::debug!(
            "Laid out snapshot {} ({} sections, height {})",
            snapshot.timestamp,
            root.children.len(),
            root.height
        );
        root
    }

    fn place_section(&self, section: &Section, x: u32, y: u32, symbols: &SymbolIndex) -> Rect {
        let cfg = self.config;
        let mut rect = Rect::new(RectKind::Section, x, y, cfg.section_width(), cfg.header_height);
        rect.label = Some(section.name.clone());
        rect.span = Some(Span { address: section.address, size: section.size });

        for node in &section.nodes {
            if !section.contains(node) {
                tracing::warn!(
                    "Atom 0x{:x}..0x{:x} lies outside section {} (0x{:x}..0x{:x})",
                    node.address,
                    node.end(),
                    section.name,
                    section.address,
                    section.end()
                );
            }

            let atom_y = rect.children.last().map_or(rect.y + cfg.header_offset, Rect::bottom);
            let mut atom = Rect::new(
                RectKind::Atom,
                rect.x + cfg.indent,
                atom_y,
                rect.width - 2 * cfg.indent,
                cfg.row_height,
            );
            atom.span = Some(Span { address: node.address, size: node.size });

            let mut names = symbols.names_of(node).into_iter().map(str::to_string);
            atom.label = names.next();
            atom.aliases = names.collect();
            atom.interior = symbols
                .symbols_in_range(node)
                .into_iter()
                .map(|s| InteriorSymbol { name: s.name.clone(), address: s.address })
                .collect();

            tracing::trace!(
                "Placed atom 0x{:x} at y={} ({} interior symbols)",
                node.address,
                atom.y,
                atom.interior.len()
            );
            rect.height += atom.height;
            rect.children.push(atom);
        }

        tracing::debug!(
            "Section {} holds {} atoms, height {}",
            section.name,
            rect.children.len(),
            rect.height
        );
        rect
    }
}
