//! Symbol attribution.
//!
//! Builds an address lookup over one snapshot's defined symbols (globals, then locals)
//! and answers which symbols name an atom and which fall inside it. Undefined symbols
//! carry no address and are never indexed.

use std::collections::{HashMap, HashSet};

use crate::snapshot::{Node, Symbol, Symtab};

/// Address lookup scoped to a single snapshot's symbol table.
pub struct SymbolIndex<'a> {
    symtab: &'a Symtab,
    by_address: HashMap<u64, Vec<&'a Symbol>>,
}

impl<'a> SymbolIndex<'a> {
    pub fn new(symtab: &'a Symtab) -> Self {
        let mut by_address: HashMap<u64, Vec<&'a Symbol>> = HashMap::new();
        for sym in symtab.globals.iter().chain(symtab.locals.iter()) {
            by_address.entry(sym.address).or_default().push(sym);
        }
        Self { symtab, by_address }
    }

    /// All symbols bound exactly at `address`, globals first, in table order.
    pub fn lookup_exact(&self, address: u64) -> &[&'a Symbol] {
        self.by_address.get(&address).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Symbols strictly inside `node`: `node.address < s.address < node.address + node.size`.
    ///
    /// The symbol at `node.address` names the atom and is reported by `lookup_exact`
    /// instead. Only the first symbol seen at any given address is kept, so aliases at
    /// the same interior address collapse into one entry. Order follows the table scan
    /// (globals, then locals), not addresses.
    pub fn symbols_in_range(&self, node: &Node) -> Vec<&'a Symbol> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();

        for sym in self.symtab.globals.iter().chain(self.symtab.locals.iter()) {
            if sym.address == node.address {
                continue;
            }
            if sym.address < node.address || sym.address - node.address >= node.size {
                continue;
            }
            if seen.insert(sym.address) {
                found.push(sym);
            }
        }
        found
    }

    /// Names bound at the atom's own address. Empty for an unnamed atom.
    pub fn names_of(&self, node: &Node) -> Vec<&'a str> {
        self.lookup_exact(node.address).iter().map(|s| s.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str, address: u64) -> Symbol {
        Symbol { name: name.to_string(), address, section: 1 }
    }

    fn node(address: u64, size: u64) -> Node {
        Node { address, size, links: Vec::new() }
    }

    fn names(syms: &[&Symbol]) -> Vec<String> {
        syms.iter().map(|s| s.name.clone()).collect()
    }

    #[test]
    fn test_lookup_exact_keeps_duplicates_globals_first() {
        let symtab = Symtab {
            locals: vec![sym("l_alias", 0x1000)],
            globals: vec![sym("_main", 0x1000), sym("_start", 0x1000), sym("_other", 0x2000)],
            undefs: vec![sym("_printf", 0x1000)],
        };
        let index = SymbolIndex::new(&symtab);
        assert_eq!(names(index.lookup_exact(0x1000)), ["_main", "_start", "l_alias"]);
        assert!(index.lookup_exact(0x3000).is_empty());
    }

    #[test]
    fn test_own_address_is_not_interior() {
        let symtab = Symtab { globals: vec![sym("_main", 0x1000)], ..Default::default() };
        let index = SymbolIndex::new(&symtab);
        let atom = node(0x1000, 0x10);
        assert!(index.symbols_in_range(&atom).is_empty());
        assert_eq!(index.names_of(&atom), ["_main"]);
    }

    #[test]
    fn test_interior_symbol_found() {
        let symtab = Symtab {
            globals: vec![sym("_main", 0x1000), sym("_helper", 0x1008)],
            ..Default::default()
        };
        let index = SymbolIndex::new(&symtab);
        let inside = index.symbols_in_range(&node(0x1000, 0x20));
        assert_eq!(names(&inside), ["_helper"]);
    }

    #[test]
    fn test_range_is_half_open() {
        let symtab = Symtab {
            locals: vec![sym("before", 0xfff), sym("last", 0x101f), sym("past", 0x1020)],
            ..Default::default()
        };
        let index = SymbolIndex::new(&symtab);
        assert_eq!(names(&index.symbols_in_range(&node(0x1000, 0x20))), ["last"]);
        assert!(index.symbols_in_range(&node(0x1000, 0)).is_empty());
    }

    #[test]
    fn test_range_reaching_top_of_address_space() {
        let symtab = Symtab {
            globals: vec![sym("top", u64::MAX - 0xf), sym("last", u64::MAX)],
            ..Default::default()
        };
        let index = SymbolIndex::new(&symtab);
        let inside = index.symbols_in_range(&node(u64::MAX - 0xf, 0x10));
        assert_eq!(names(&inside), ["last"]);
    }

    #[test]
    fn test_same_address_dedup_first_wins() {
        let symtab = Symtab {
            locals: vec![sym("l_first", 0x1004), sym("l_second", 0x1004), sym("l_mid", 0x1002)],
            globals: vec![sym("g_inner", 0x1004)],
            undefs: vec![sym("u", 0x1006)],
        };
        let index = SymbolIndex::new(&symtab);
        let inside = index.symbols_in_range(&node(0x1000, 0x10));
        assert_eq!(names(&inside), ["g_inner", "l_mid"]);
    }
}
