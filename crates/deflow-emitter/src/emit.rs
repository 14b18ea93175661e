//! Document emission.
//!
//! Output order: rewritten import statements first, then declarations that
//! global-augmentation blocks contributed to the top level, then every
//! remaining surviving symbol in first-appearance order. A flattened
//! namespace's members are emitted immediately after the declaration that
//! anchors the namespace, so related declarations stay adjacent in the
//! output.
//!
//! The emitter guarantees that no two emitted declarations share a flat
//! name; everything else about target-dialect validity was settled by the
//! earlier phases.

use crate::printer::Printer;
use deflow_ast::{
    Decl, DeclArena, DeclKind, EnumMember, ImportClause, Member, Param, Signature, TypeParam,
};
use deflow_binder::{Symbol, SymbolId, SymbolTable, symbol_flags};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

/// Print the final document for a merged, flattened, resolved model.
pub fn emit_document(arena: &DeclArena, table: &SymbolTable) -> String {
    let mut emitter = Emitter {
        arena,
        table,
        printer: Printer::new(),
        emitted: FxHashSet::default(),
        emitted_flat: FxHashSet::default(),
    };

    emitter.emit_imports();
    emitter.emit_global_augmentations();
    emitter.emit_remaining();
    emitter.printer.finish()
}

struct Emitter<'a> {
    arena: &'a DeclArena,
    table: &'a SymbolTable,
    printer: Printer,
    emitted: FxHashSet<SymbolId>,
    emitted_flat: FxHashSet<String>,
}

impl Emitter<'_> {
    // ====================================================================
    // Phase (a): imports and import-equals aliases
    // ====================================================================

    fn emit_imports(&mut self) {
        for &root in &self.arena.roots {
            let decl = self.arena.get(root);
            match &decl.kind {
                DeclKind::ImportBinding { specifier, clause } => match clause {
                    ImportClause::Named { names } => {
                        self.printer.write("import type { ");
                        for (i, (name, alias)) in names.iter().enumerate() {
                            if i > 0 {
                                self.printer.write(", ");
                            }
                            self.printer.write(name);
                            if let Some(alias) = alias {
                                self.printer.write(" as ");
                                self.printer.write(alias);
                            }
                        }
                        self.printer.write(" } from '");
                        self.printer.write(specifier);
                        self.printer.write("';");
                        self.printer.write_line();
                    }
                    ImportClause::Star { binding } => {
                        self.printer.write("import * as ");
                        self.printer.write(binding);
                        self.printer.write(" from '");
                        self.printer.write(specifier);
                        self.printer.write("';");
                        self.printer.write_line();
                        if let Some(id) = self.table.lookup(binding) {
                            self.emitted.insert(id);
                        }
                    }
                },
                DeclKind::ImportEquals { target } => {
                    self.printer.write("declare var ");
                    self.printer.write(&decl.name);
                    self.printer.write(": typeof ");
                    let target_text = target.join(".");
                    self.printer.write(&target_text);
                    self.printer.write(";");
                    self.printer.write_line();
                    if let Some(id) = self.table.lookup(&decl.name) {
                        self.emitted.insert(id);
                    }
                }
                _ => {}
            }
        }
    }

    // ====================================================================
    // Phase (b): global augmentation contributions
    // ====================================================================

    fn emit_global_augmentations(&mut self) {
        for id in self.table.ids() {
            if self.table.get(id).from_global {
                self.emit_symbol(id);
            }
        }
    }

    // ====================================================================
    // Phase (c): everything else, first-appearance order
    // ====================================================================

    fn emit_remaining(&mut self) {
        for id in self.table.ids() {
            self.emit_symbol(id);
        }
    }

    fn emit_symbol(&mut self, id: SymbolId) {
        if self.emitted.contains(&id) {
            return;
        }
        self.emitted.insert(id);

        let symbol = self.table.get(id);
        if symbol.suppressed
            || symbol.has(symbol_flags::IMPORT_STAR | symbol_flags::IMPORT_EQUALS)
        {
            return;
        }
        if !self.emitted_flat.insert(symbol.flat().to_string()) {
            return;
        }

        if symbol.has(symbol_flags::INTERFACE) {
            self.emit_interface_group(symbol);
        } else if symbol.has(symbol_flags::CLASS) {
            self.emit_class(symbol);
        } else if symbol.has(symbol_flags::FUNCTION) {
            self.emit_function_overloads(symbol);
        } else if symbol.has(symbol_flags::ENUM) {
            self.emit_enum(symbol);
        } else if symbol.has(symbol_flags::VARIABLE) {
            self.emit_variable(symbol);
        } else if symbol.has(symbol_flags::TYPE_ALIAS) {
            self.emit_type_alias(symbol);
        } else if symbol.has(symbol_flags::CONTAINER) {
            self.emit_namespace_object(symbol);
        }

        // Flattened members of any namespace anchored here come right after.
        self.emit_container_children(id);
    }

    fn emit_container_children(&mut self, id: SymbolId) {
        let symbol = self.table.get(id);
        let mut child_ids = Vec::new();
        for &decl_id in &symbol.retained {
            if let Some(children) = self.arena.get(decl_id).kind.children() {
                for &child in children {
                    let mut path = symbol.path.clone();
                    path.push(self.arena.get(child).name.clone());
                    if let Some(child_sym) = self.table.lookup(&path.join(".")) {
                        child_ids.push(child_sym);
                    }
                }
            }
        }
        for child_sym in child_ids {
            self.emit_symbol(child_sym);
        }
    }

    // ====================================================================
    // Declaration kinds
    // ====================================================================

    /// All interface contributions to one path print as a single interface
    /// with the unioned member list, in source order.
    fn emit_interface_group(&mut self, symbol: &Symbol) {
        let mut type_params: &[TypeParam] = &[];
        let mut extends: Vec<&str> = Vec::new();
        let mut members: Vec<&Member> = Vec::new();
        let mut exported = false;

        for &decl_id in &symbol.retained {
            let decl = self.arena.get(decl_id);
            if let DeclKind::Interface {
                type_params: tp,
                extends: ext,
                members: m,
            } = &decl.kind
            {
                if type_params.is_empty() {
                    type_params = tp;
                }
                extends.extend(ext.iter().map(String::as_str));
                members.extend(m.iter());
                exported |= decl.exported && symbol.path.len() == 1;
            }
        }

        self.write_declare(exported);
        self.printer.write("interface ");
        self.printer.write(symbol.flat());
        self.write_type_params(type_params);
        if !extends.is_empty() {
            self.printer.write(" extends ");
            for (i, text) in extends.iter().enumerate() {
                if i > 0 {
                    self.printer.write(", ");
                }
                self.printer.write(text);
            }
        }
        if members.is_empty() {
            self.printer.write(" {}");
            self.printer.write_line();
            return;
        }
        self.printer.write(" {");
        self.printer.write_line();
        self.printer.increase_indent();
        for member in members {
            self.emit_member(member, false);
        }
        self.printer.decrease_indent();
        self.printer.write("}");
        self.printer.write_line();
    }

    fn emit_class(&mut self, symbol: &Symbol) {
        let Some(decl) = first_retained(self.arena, symbol, |kind| {
            matches!(kind, DeclKind::Class { .. })
        }) else {
            return;
        };
        let DeclKind::Class {
            type_params,
            extends,
            implements,
            members,
        } = &decl.kind
        else {
            return;
        };

        self.write_declare(decl.exported && symbol.path.len() == 1);
        self.printer.write("class ");
        self.printer.write(symbol.flat());
        self.write_type_params(type_params);
        if let Some(extends) = extends {
            self.printer.write(" extends ");
            self.printer.write(extends);
        }
        if !implements.is_empty() {
            self.printer.write(" implements ");
            for (i, text) in implements.iter().enumerate() {
                if i > 0 {
                    self.printer.write(", ");
                }
                self.printer.write(text);
            }
        }
        if members.is_empty() {
            self.printer.write(" {}");
            self.printer.write_line();
            return;
        }
        self.printer.write(" {");
        self.printer.write_line();
        self.printer.increase_indent();
        for member in members {
            self.emit_member(member, true);
        }
        self.printer.decrease_indent();
        self.printer.write("}");
        self.printer.write_line();
    }

    /// One `declare function` line per contributing signature, source order.
    fn emit_function_overloads(&mut self, symbol: &Symbol) {
        for &decl_id in &symbol.retained {
            let decl = self.arena.get(decl_id);
            let DeclKind::Function { signature } = &decl.kind else {
                continue;
            };
            self.write_declare(decl.exported && symbol.path.len() == 1);
            self.printer.write("function ");
            self.printer.write(symbol.flat());
            self.write_signature(signature);
            self.printer.write(";");
            self.printer.write_line();
        }
    }

    /// Enums print as an exact frozen-object value; unspecified member
    /// values auto-increment the way the source dialect assigns them.
    fn emit_enum(&mut self, symbol: &Symbol) {
        let Some(decl) = first_retained(self.arena, symbol, |kind| {
            matches!(kind, DeclKind::Enum { .. })
        }) else {
            return;
        };
        let DeclKind::Enum { members, .. } = &decl.kind else {
            return;
        };

        self.write_declare(decl.exported && symbol.path.len() == 1);
        self.printer.write("var ");
        self.printer.write(symbol.flat());
        if members.is_empty() {
            self.printer.write(": {||};");
            self.printer.write_line();
            return;
        }
        self.printer.write(": {|");
        self.printer.write_line();
        self.printer.increase_indent();
        let mut next_value: i64 = 0;
        for member in members {
            self.printer.write("+");
            self.printer.write(&member.name);
            self.printer.write(": ");
            self.printer.write(&enum_member_value(member, &mut next_value));
            self.printer.write(",");
            self.printer.write_line();
        }
        self.printer.decrease_indent();
        self.printer.write("|};");
        self.printer.write_line();
    }

    fn emit_variable(&mut self, symbol: &Symbol) {
        let Some(decl) = first_retained(self.arena, symbol, |kind| {
            matches!(kind, DeclKind::Variable { .. })
        }) else {
            return;
        };
        let DeclKind::Variable { type_text, .. } = &decl.kind else {
            return;
        };

        self.write_declare(decl.exported && symbol.path.len() == 1);
        self.printer.write("var ");
        self.printer.write(symbol.flat());
        self.printer.write(": ");
        self.printer.write(type_text.as_deref().unwrap_or("any"));
        self.printer.write(";");
        self.printer.write_line();
    }

    fn emit_type_alias(&mut self, symbol: &Symbol) {
        let Some(decl) = first_retained(self.arena, symbol, |kind| {
            matches!(kind, DeclKind::TypeAlias { .. })
        }) else {
            return;
        };
        let DeclKind::TypeAlias {
            type_params,
            aliased,
        } = &decl.kind
        else {
            return;
        };

        self.write_declare(decl.exported && symbol.path.len() == 1);
        self.printer.write("type ");
        self.printer.write(symbol.flat());
        self.write_type_params(type_params);
        self.printer.write(" = ");
        self.printer.write(aliased);
        self.printer.write(";");
        self.printer.write_line();
    }

    /// A pure namespace (no fused value anchor) with value members gets a
    /// container object so qualified value access keeps working after
    /// flattening. Namespaces holding only types print nothing themselves -
    /// their members carry the full information under flattened names.
    fn emit_namespace_object(&mut self, symbol: &Symbol) {
        // Insertion-ordered and deduplicated: a member declared in several
        // merged blocks appears once, at its first position.
        let mut value_children: IndexMap<&str, String> = IndexMap::new();
        for &decl_id in &symbol.retained {
            let Some(children) = self.arena.get(decl_id).kind.children() else {
                continue;
            };
            for &child in children {
                let child_decl = self.arena.get(child);
                if !child_decl.kind.is_runtime_value()
                    || value_children.contains_key(child_decl.name.as_str())
                {
                    continue;
                }
                let mut path = symbol.path.clone();
                path.push(child_decl.name.clone());
                let Some(child_sym) = self.table.lookup(&path.join(".")) else {
                    continue;
                };
                let child_symbol = self.table.get(child_sym);
                if child_symbol.suppressed {
                    continue;
                }
                value_children.insert(&child_decl.name, child_symbol.flat().to_string());
            }
        }

        if value_children.is_empty() {
            return;
        }

        self.printer.write("declare var ");
        self.printer.write(symbol.flat());
        self.printer.write(": {|");
        self.printer.write_line();
        self.printer.increase_indent();
        for (name, flat) in value_children {
            self.printer.write("+");
            self.printer.write(name);
            self.printer.write(": typeof ");
            self.printer.write(&flat);
            self.printer.write(",");
            self.printer.write_line();
        }
        self.printer.decrease_indent();
        self.printer.write("|};");
        self.printer.write_line();
    }

    // ====================================================================
    // Members and fragments
    // ====================================================================

    fn emit_member(&mut self, member: &Member, in_class: bool) {
        match member {
            Member::Property {
                name,
                type_text,
                optional,
                readonly,
                is_static,
                ..
            } => {
                if *is_static && in_class {
                    self.printer.write("static ");
                }
                if *readonly {
                    self.printer.write("+");
                }
                self.printer.write(name);
                if *optional {
                    self.printer.write("?");
                }
                self.printer.write(": ");
                self.printer.write(type_text.as_deref().unwrap_or("any"));
                self.printer.write(";");
                self.printer.write_line();
            }
            Member::Method {
                name,
                signature,
                optional,
                is_static,
                ..
            } => {
                if *is_static && in_class {
                    self.printer.write("static ");
                }
                if *optional {
                    // Optional methods have no direct form; a function-typed
                    // optional property is the closest equivalent.
                    self.printer.write(name);
                    self.printer.write("?: ");
                    self.printer.write(&function_type_text(signature));
                    self.printer.write(";");
                } else {
                    self.printer.write(name);
                    self.write_signature(signature);
                    self.printer.write(";");
                }
                self.printer.write_line();
            }
            Member::Constructor { signature, .. } => {
                self.printer.write("constructor(");
                self.write_params(&signature.params);
                self.printer.write("): void;");
                self.printer.write_line();
            }
            Member::CallSignature { signature, .. } => {
                self.write_signature(signature);
                self.printer.write(";");
                self.printer.write_line();
            }
            Member::ConstructSignature { signature, .. } => {
                self.printer.write("new ");
                self.write_signature(signature);
                self.printer.write(";");
                self.printer.write_line();
            }
            Member::IndexSignature {
                key_name,
                key_type,
                value_type,
                readonly,
                ..
            } => {
                if *readonly {
                    self.printer.write("+");
                }
                self.printer.write("[");
                self.printer.write(key_name);
                self.printer.write(": ");
                self.printer.write(key_type);
                self.printer.write("]: ");
                self.printer.write(value_type);
                self.printer.write(";");
                self.printer.write_line();
            }
        }
    }

    fn write_declare(&mut self, exported: bool) {
        if exported {
            self.printer.write("declare export ");
        } else {
            self.printer.write("declare ");
        }
    }

    fn write_type_params(&mut self, type_params: &[TypeParam]) {
        if type_params.is_empty() {
            return;
        }
        self.printer.write("<");
        for (i, tp) in type_params.iter().enumerate() {
            if i > 0 {
                self.printer.write(", ");
            }
            self.printer.write(&tp.name);
            if let Some(constraint) = &tp.constraint {
                self.printer.write(": ");
                self.printer.write(constraint);
            }
            if let Some(default) = &tp.default {
                self.printer.write(" = ");
                self.printer.write(default);
            }
        }
        self.printer.write(">");
    }

    fn write_signature(&mut self, signature: &Signature) {
        self.write_type_params(&signature.type_params);
        self.printer.write("(");
        self.write_params(&signature.params);
        self.printer.write("): ");
        self.printer
            .write(signature.return_type.as_deref().unwrap_or("void"));
    }

    fn write_params(&mut self, params: &[Param]) {
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.printer.write(", ");
            }
            if param.rest {
                self.printer.write("...");
            }
            self.printer.write(&param.name);
            if param.optional {
                self.printer.write("?");
            }
            self.printer.write(": ");
            self.printer.write(param.type_text.as_deref().unwrap_or("any"));
        }
    }

}

fn first_retained<'a>(
    arena: &'a DeclArena,
    symbol: &Symbol,
    matches: impl Fn(&DeclKind) -> bool,
) -> Option<&'a Decl> {
    symbol
        .retained
        .iter()
        .map(|&id| arena.get(id))
        .find(|decl| matches(&decl.kind))
}

/// `(a: number, b?: string) => ret` form for positions needing a
/// function-typed expression rather than a method signature.
fn function_type_text(signature: &Signature) -> String {
    let mut out = String::from("(");
    for (i, param) in signature.params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        if param.rest {
            out.push_str("...");
        }
        out.push_str(&param.name);
        if param.optional {
            out.push('?');
        }
        out.push_str(": ");
        out.push_str(param.type_text.as_deref().unwrap_or("any"));
    }
    out.push_str(") => ");
    out.push_str(signature.return_type.as_deref().unwrap_or("void"));
    out
}

fn enum_member_value(member: &EnumMember, next_value: &mut i64) -> String {
    match &member.initializer {
        Some(text) => match text.trim().parse::<i64>() {
            Ok(n) => {
                *next_value = n + 1;
                n.to_string()
            }
            Err(_) => text.trim().to_string(),
        },
        None => {
            let n = *next_value;
            *next_value += 1;
            n.to_string()
        }
    }
}
