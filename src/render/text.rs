//! Text report output.
//!
//! Dumps a snapshot straight from the model, without building a layout tree. Each
//! section is framed as an ASCII block listing its atoms, their interior symbols and
//! relocations. The objects and resolver tables close the report.

use anyhow::Result;
use std::io::Write;

use super::Renderer;
use crate::snapshot::{Section, Snapshot};
use crate::symbol::SymbolIndex;

const RULE: &str = "================================================================";

pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn snapshot(&mut self, ordinal: usize, snapshot: &Snapshot, out: &mut dyn Write) -> Result<()> {
        let symbols = SymbolIndex::new(&snapshot.symtab);

        writeln!(out, "{}", RULE)?;
        writeln!(out, " snapshot {}  timestamp {}", ordinal, snapshot.timestamp)?;
        writeln!(out, "{}", RULE)?;

        for (number, section) in snapshot.sections.iter().enumerate() {
            write_section(number, section, &symbols, out)?;
        }

        write_tables(snapshot, out)?;
        writeln!(out)?;
        Ok(())
    }
}

fn write_section(number: usize, section: &Section, symbols: &SymbolIndex, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "+-- section {}: {} @ 0x{:x}", number, section.name, section.address)?;

    for node in &section.nodes {
        let names = symbols.names_of(node);
        let name = names.first().copied().unwrap_or("(unnamed)");
        writeln!(out, "|   atom 0x{:x} - 0x{:x}  {}", node.address, node.end(), name)?;
        for alias in names.iter().skip(1) {
            writeln!(out, "|       alias {}", alias)?;
        }
        for sym in symbols.symbols_in_range(node) {
            writeln!(out, "|       {} @ 0x{:x}", sym.name, sym.address)?;
        }
        for link in &node.links {
            writeln!(out, "|       reloc 0x{:x} -> 0x{:x}", link.source_address, link.target_address)?;
        }
        writeln!(out, "|")?;
    }

    writeln!(out, "+-- end of {} @ 0x{:x}", section.name, section.end())?;
    Ok(())
}

fn write_tables(snapshot: &Snapshot, out: &mut dyn Write) -> Result<()> {
    if !snapshot.objects.is_empty() {
        writeln!(out, "objects:")?;
        for (index, object) in snapshot.objects.iter().enumerate() {
            writeln!(out, "  [{}] {}", index, object)?;
        }
    }

    if !snapshot.resolver.is_empty() {
        writeln!(out, "resolver:")?;
        for entry in &snapshot.resolver {
            let owner = match entry.file {
                Some(index) => snapshot.object_name(index).unwrap_or("?"),
                None => "-",
            };
            writeln!(
                out,
                "  {} -> {}[{}] local {} in {}",
                entry.name,
                entry.location.as_str(),
                entry.where_index,
                entry.local_sym_index,
                owner
            )?;
        }
    }
    Ok(())
}
