//! Symbol table construction.
//!
//! One depth-first pass over the wrapped tree. Each declaration registers
//! under the concatenation of its enclosing container names and its own name;
//! same-path declarations group in source order, which is what enables
//! declaration merging downstream.
//!
//! Special cases handled here:
//! - `declare global` children register under the root path, not a nested
//!   one (the global-augmentation rule)
//! - members of ambient containers count as exported
//! - star-import bindings register so reference resolution can classify
//!   paths that cross into external modules

use crate::symbol::{SymbolTable, symbol_flags};
use deflow_ast::{DeclArena, DeclId, DeclKind, ImportClause};

/// Walk the arena and register every declaration.
///
/// Container symbols register before their children, so table insertion
/// order is first-appearance order with namespace members immediately
/// following their container.
pub fn build_symbol_table(arena: &DeclArena) -> SymbolTable {
    let mut builder = Builder {
        arena,
        table: SymbolTable::new(),
        path: Vec::new(),
        in_global: false,
    };
    for &root in &arena.roots {
        builder.visit(root);
    }
    tracing::debug!(symbols = builder.table.len(), "built symbol table");
    builder.table
}

struct Builder<'a> {
    arena: &'a DeclArena,
    table: SymbolTable,
    path: Vec<String>,
    in_global: bool,
}

impl Builder<'_> {
    fn visit(&mut self, id: DeclId) {
        let decl = self.arena.get(id);
        let flags = match &decl.kind {
            DeclKind::Interface { .. } => symbol_flags::INTERFACE,
            DeclKind::Class { .. } => symbol_flags::CLASS,
            DeclKind::TypeAlias { .. } => symbol_flags::TYPE_ALIAS,
            DeclKind::Enum { .. } => symbol_flags::ENUM,
            DeclKind::Function { .. } => symbol_flags::FUNCTION,
            DeclKind::Variable { .. } => symbol_flags::VARIABLE,
            DeclKind::Namespace { .. } => symbol_flags::NAMESPACE,
            DeclKind::Module { .. } => symbol_flags::MODULE,
            DeclKind::ImportEquals { .. } => symbol_flags::IMPORT_EQUALS,
            DeclKind::ImportBinding { clause, .. } => match clause {
                ImportClause::Star { .. } => symbol_flags::IMPORT_STAR,
                // Named bindings introduce bare identifiers, not qualified
                // paths; nothing to register.
                ImportClause::Named { .. } => return,
            },
            DeclKind::GlobalAugmentation { children } => {
                // Children contribute to the root scope regardless of where
                // the block itself sits.
                let was_global = self.in_global;
                let outer_path = std::mem::take(&mut self.path);
                self.in_global = true;
                for &child in children {
                    self.visit(child);
                }
                self.in_global = was_global;
                self.path = outer_path;
                return;
            }
            // Unsupported markers emit nothing and bind nothing.
            DeclKind::Unsupported { .. } => return,
        };

        self.path.push(decl.name.clone());
        let sym_id = self.table.ensure(&self.path, decl.span);
        let symbol = self.table.get_mut(sym_id);
        symbol.flags |= flags;
        symbol.declarations.push(id);
        symbol.retained.push(id);
        symbol.exported |= decl.exported || decl.ambient;
        symbol.from_global |= self.in_global;

        if let Some(children) = decl.kind.children() {
            // Container members never sit in the global block directly.
            let was_global = std::mem::replace(&mut self.in_global, false);
            for &child in children {
                self.visit(child);
            }
            self.in_global = was_global;
        }
        self.path.pop();
    }
}
