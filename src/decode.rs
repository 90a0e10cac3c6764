//! Snapshot document decoding.
//!
//! The input document is a JSON array of snapshot records. A record describes its
//! sections either as a nested `sections` array or as a flat `nodes` event stream
//! (`section_start`, `atom_start`, `relocation`, `atom_end`, `section_end`). Both
//! encodings are normalized here into the same `Snapshot` model, so nothing past this
//! module ever sees an event tag.

use anyhow::{bail, Context, Result};
use memmap2::Mmap;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

use crate::snapshot::{Link, Node, ResolverEntry, Section, Snapshot, Symtab};

/// A snapshot record as it appears on the wire.
#[derive(Debug, Deserialize)]
struct RawSnapshot {
    timestamp: i64,
    #[serde(default)]
    objects: Vec<String>,
    #[serde(default)]
    sections: Option<Vec<Section>>,
    #[serde(default)]
    nodes: Option<Vec<Event>>,
    #[serde(default)]
    symtab: Symtab,
    #[serde(default)]
    resolver: Vec<ResolverEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Tag {
    SectionStart,
    SectionEnd,
    AtomStart,
    AtomEnd,
    Relocation,
}

#[derive(Debug, Default, Deserialize)]
struct Payload {
    #[serde(default)]
    name: String,
    #[serde(default)]
    target: u64,
}

#[derive(Debug, Deserialize)]
struct Event {
    tag: Tag,
    address: u64,
    #[serde(default)]
    payload: Payload,
}

/// Decodes a whole document. Fails without returning anything if any record is malformed.
pub fn from_slice(bytes: &[u8]) -> Result<Vec<Snapshot>> {
    let raw: Vec<RawSnapshot> =
        serde_json::from_slice(bytes).context("malformed snapshot document")?;

    raw.into_iter()
        .enumerate()
        .map(|(index, record)| {
            normalize(record).with_context(|| format!("malformed snapshot #{}", index))
        })
        .collect()
}

/// Maps `path` into memory and decodes it.
pub fn load(path: &Path) -> Result<Vec<Snapshot>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("failed to map {}", path.display()))?;
    from_slice(&mmap).with_context(|| format!("failed to decode {}", path.display()))
}

fn normalize(raw: RawSnapshot) -> Result<Snapshot> {
    let sections = match (raw.sections, raw.nodes) {
        (Some(_), Some(_)) => bail!("record has both `sections` and `nodes`"),
        (Some(sections), None) => sections,
        (None, Some(events)) => sections_from_events(events)?,
        (None, None) => Vec::new(),
    };

    Ok(Snapshot {
        timestamp: raw.timestamp,
        objects: raw.objects,
        sections,
        symtab: raw.symtab,
        resolver: raw.resolver,
    })
}

/// Folds an event stream into nested sections.
fn sections_from_events(events: Vec<Event>) -> Result<Vec<Section>> {
    let mut sections = Vec::new();
    let mut section: Option<Section> = None;
    let mut atom: Option<Node> = None;

    for (i, event) in events.into_iter().enumerate() {
        match event.tag {
            Tag::SectionStart => {
                if let Some(open) = &section {
                    bail!("event {}: section_start while `{}` is still open", i, open.name);
                }
                section = Some(Section {
                    name: event.payload.name,
                    address: event.address,
                    size: 0,
                    nodes: Vec::new(),
                });
            }
            Tag::SectionEnd => {
                if atom.is_some() {
                    bail!("event {}: section_end while an atom is still open", i);
                }
                let Some(mut open) = section.take() else {
                    bail!("event {}: section_end without a matching section_start", i);
                };
                open.size = span(open.address, event.address, i)?;
                sections.push(open);
            }
            Tag::AtomStart => {
                if section.is_none() {
                    bail!("event {}: atom_start outside of a section", i);
                }
                if atom.is_some() {
                    bail!("event {}: atom_start while another atom is still open", i);
                }
                atom = Some(Node { address: event.address, size: 0, links: Vec::new() });
            }
            Tag::AtomEnd => {
                let Some(mut open) = atom.take() else {
                    bail!("event {}: atom_end without a matching atom_start", i);
                };
                open.size = span(open.address, event.address, i)?;
                // atom_start guarantees a section is open
                if let Some(sec) = section.as_mut() {
                    sec.nodes.push(open);
                }
            }
            Tag::Relocation => {
                let Some(open) = atom.as_mut() else {
                    bail!("event {}: relocation outside of an atom", i);
                };
                open.links.push(Link {
                    source_address: event.address,
                    target_address: event.payload.target,
                });
            }
        }
    }

    if atom.is_some() {
        bail!("event stream ended inside an atom");
    }
    if let Some(open) = section {
        bail!("event stream ended inside section `{}`", open.name);
    }
    Ok(sections)
}

fn span(start: u64, end: u64, event: usize) -> Result<u64> {
    match end.checked_sub(start) {
        Some(size) => Ok(size),
        None => bail!("event {}: end address 0x{:x} precedes start 0x{:x}", event, end, start),
    }
}
