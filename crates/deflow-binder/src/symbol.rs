//! Symbols and the qualified-path symbol table.

use deflow_ast::DeclId;
use deflow_common::Span;
use rustc_hash::FxHashMap;

/// Kind bits accumulated on a symbol, one per contributing declaration kind.
///
/// Merge rules are keyed on the set of bits present, so the bitset - not the
/// individual declarations - is what the merge resolver dispatches on.
pub mod symbol_flags {
    pub const INTERFACE: u32 = 1 << 0;
    pub const CLASS: u32 = 1 << 1;
    pub const TYPE_ALIAS: u32 = 1 << 2;
    pub const ENUM: u32 = 1 << 3;
    pub const FUNCTION: u32 = 1 << 4;
    pub const VARIABLE: u32 = 1 << 5;
    pub const NAMESPACE: u32 = 1 << 6;
    pub const MODULE: u32 = 1 << 7;
    /// `import * as x` binding; marks the frontier to an external module.
    pub const IMPORT_STAR: u32 = 1 << 8;
    pub const IMPORT_EQUALS: u32 = 1 << 9;

    /// Kinds that produce a runtime value in the source dialect.
    pub const VALUE: u32 = CLASS | ENUM | FUNCTION | VARIABLE;
    /// Kinds usable in a type position.
    pub const TYPE: u32 = INTERFACE | CLASS | TYPE_ALIAS | ENUM;
    pub const CONTAINER: u32 = NAMESPACE | MODULE;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One entry per unique qualified path.
#[derive(Clone, Debug)]
pub struct Symbol {
    /// Qualified path segments from the root.
    pub path: Vec<String>,
    /// Union of `symbol_flags` bits over all contributing declarations.
    pub flags: u32,
    /// The merge group: every contributing declaration, in source order.
    /// Never empty.
    pub declarations: Vec<DeclId>,
    /// The resolved merged shape: the declarations that survive merging.
    /// Defaults to the whole group; the merge resolver narrows it when a
    /// conflict drops contributions.
    pub retained: Vec<DeclId>,
    /// Some contributing declaration carries the `export` modifier.
    pub exported: bool,
    /// Registered from inside a `declare global` block; emitted with the
    /// top-level group that precedes ordinary declarations.
    pub from_global: bool,
    /// Dropped by the merge resolver; never flattened or emitted.
    pub suppressed: bool,
    /// Flat target identifier, assigned by the flattener.
    pub flat_name: Option<String>,
    /// Span of the first contributing declaration.
    pub span: Span,
}

impl Symbol {
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }

    pub const fn has(&self, flags: u32) -> bool {
        self.flags & flags != 0
    }

    /// Flat name; only valid after the flattener ran on a surviving symbol.
    pub fn flat(&self) -> &str {
        self.flat_name.as_deref().unwrap_or("")
    }
}

/// Mapping from qualified path to symbol, insertion-ordered.
///
/// Insertion order is first-appearance source order (containers register
/// before their children), which is exactly the order the emitter needs.
/// Read-only after the merge resolver completes, except for flat-name
/// assignment.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    by_path: FxHashMap<String, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable {
            symbols: Vec::new(),
            by_path: FxHashMap::default(),
        }
    }

    /// Symbol for `path`, creating an empty entry on first sight.
    pub fn ensure(&mut self, path: &[String], span: Span) -> SymbolId {
        let key = path.join(".");
        if let Some(&id) = self.by_path.get(&key) {
            return id;
        }
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol {
            path: path.to_vec(),
            flags: 0,
            declarations: Vec::new(),
            retained: Vec::new(),
            exported: false,
            from_global: false,
            suppressed: false,
            flat_name: None,
            span,
        });
        self.by_path.insert(key, id);
        id
    }

    pub fn lookup(&self, dotted_path: &str) -> Option<SymbolId> {
        self.by_path.get(dotted_path).copied()
    }

    pub fn lookup_segments(&self, segments: &[&str]) -> Option<SymbolId> {
        self.by_path.get(&segments.join(".")).copied()
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn get_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol ids in insertion (first-appearance) order.
    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + use<> {
        (0..self.symbols.len() as u32).map(SymbolId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId(i as u32), s))
    }
}
