//! Snapshot model.
//!
//! A `Snapshot` is one point-in-time capture of the linker's state: the input objects,
//! the output sections with the atoms placed inside them, the symbol table and the
//! resolver table. It is pure data; `decode` builds it and nothing mutates it afterwards.

use serde::Deserialize;

/// One point-in-time linker state.
///
/// Built by `decode`, which accepts more than one wire encoding, so this type is not
/// deserialized directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Identifier used for display and for ordering successive snapshots.
    pub timestamp: i64,
    /// Names of the input object files.
    pub objects: Vec<String>,
    /// Output sections in file order.
    pub sections: Vec<Section>,
    pub symtab: Symtab,
    pub resolver: Vec<ResolverEntry>,
}

/// A named contiguous region of the output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Section {
    /// Display label. Not unique.
    pub name: String,
    pub address: u64,
    pub size: u64,
    /// Atoms in placement order.
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Section {
    /// First address past the end of the section.
    pub fn end(&self) -> u64 {
        self.address.saturating_add(self.size)
    }

    /// Whether `node` lies within `[address, address + size)`.
    ///
    /// The atom must start inside the half-open range and end no later than the
    /// section. A zero-size atom at the section's end address is outside, and an empty
    /// section contains nothing.
    pub fn contains(&self, node: &Node) -> bool {
        if node.address < self.address {
            return false;
        }
        let offset = node.address - self.address;
        offset < self.size && node.size <= self.size - offset
    }
}

/// An atom: one allocated unit of code or data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Node {
    pub address: u64,
    pub size: u64,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Node {
    /// First address past the end of the atom.
    pub fn end(&self) -> u64 {
        self.address.saturating_add(self.size)
    }
}

/// A relocation edge. Descriptive only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Link {
    pub source_address: u64,
    pub target_address: u64,
}

/// A named address binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub address: u64,
    /// Section ordinal, informational only.
    #[serde(default)]
    pub section: u32,
}

/// The symbol table of a single snapshot.
///
/// `undefs` have no fixed address and never take part in attribution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Symtab {
    #[serde(default)]
    pub locals: Vec<Symbol>,
    #[serde(default)]
    pub globals: Vec<Symbol>,
    #[serde(default)]
    pub undefs: Vec<Symbol>,
}

/// Which table a resolved name ended up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Where {
    Global,
    Undef,
}

impl Where {
    pub fn as_str(&self) -> &'static str {
        match self {
            Where::Global => "global",
            Where::Undef => "undef",
        }
    }
}

/// Records where a symbol name was ultimately resolved.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResolverEntry {
    pub name: String,
    #[serde(rename = "where")]
    pub location: Where,
    /// Index into `globals` or `undefs`, depending on `location`.
    pub where_index: u32,
    pub local_sym_index: u32,
    /// Index into `objects`, if the entry is owned by an input file.
    #[serde(default)]
    pub file: Option<u32>,
}

impl Snapshot {
    /// Name of the input object at `index`, if any.
    pub fn object_name(&self, index: u32) -> Option<&str> {
        self.objects.get(index as usize).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(address: u64, size: u64) -> Section {
        Section { name: "s".into(), address, size, nodes: Vec::new() }
    }

    fn node(address: u64, size: u64) -> Node {
        Node { address, size, links: Vec::new() }
    }

    #[test]
    fn test_section_contains_half_open() {
        let sec = section(0x1000, 0x100);
        assert!(sec.contains(&node(0x1000, 0x100)));
        assert!(sec.contains(&node(0x10ff, 0)));
        assert!(!sec.contains(&node(0x1100, 0)));
        assert!(!sec.contains(&node(0x10f0, 0x20)));
        assert!(!sec.contains(&node(0xff0, 0x10)));
        assert!(!section(0x1000, 0).contains(&node(0x1000, 0)));
    }

    #[test]
    fn test_section_at_top_of_address_space() {
        let sec = section(u64::MAX - 0xff, 0x100);
        assert!(sec.contains(&node(u64::MAX - 0xf, 0x10)));
        assert!(!sec.contains(&node(u64::MAX - 0xf, 0x11)));
    }
}
