//! Qualified-reference resolution.
//!
//! Every dotted name embedded in type-reference text is looked up
//! root-absolutely against the symbol table and rewritten to the owning
//! symbol's flat name. Resolution never aborts the run: unresolvable
//! references are classified, rewritten best-effort, and recorded as
//! diagnostics so callers can assert on the failure mode.
//!
//! This is the one place wrapped declarations mutate after adaptation, and
//! only their embedded text changes - structural shape never does.

use crate::flatten::flatten_path;
use crate::symbol::{Symbol, SymbolTable, symbol_flags};
use deflow_ast::{Decl, DeclArena, DeclKind, Member, Signature, TypeParam};
use deflow_common::{Diagnostic, DiagnosticKind, Span};
use smallvec::SmallVec;

/// Position a qualified reference appears in. `typeof X.y` flips the
/// reference after it into value position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum RefPosition {
    Type,
    Value,
}

/// Rewrite every qualified reference in every retained declaration.
pub fn resolve_references(arena: &mut DeclArena, table: &SymbolTable) -> Vec<Diagnostic> {
    let mut resolver = Resolver {
        table,
        diagnostics: Vec::new(),
    };

    for id in table.ids() {
        let symbol = table.get(id);
        if symbol.suppressed {
            continue;
        }
        for &decl_id in &symbol.retained {
            let decl = arena.get_mut(decl_id);
            resolver.rewrite_decl(decl);
        }
    }

    tracing::debug!(
        failures = resolver.diagnostics.len(),
        "resolved qualified references"
    );
    resolver.diagnostics
}

struct Resolver<'a> {
    table: &'a SymbolTable,
    diagnostics: Vec<Diagnostic>,
}

impl Resolver<'_> {
    fn rewrite_decl(&mut self, decl: &mut Decl) {
        let span = decl.span;
        match &mut decl.kind {
            DeclKind::Interface {
                type_params,
                extends,
                members,
            } => {
                self.rewrite_type_params(type_params, span);
                for text in extends.iter_mut() {
                    *text = self.rewrite_text(text, RefPosition::Type, span);
                }
                self.rewrite_members(members, span);
            }
            DeclKind::Class {
                type_params,
                extends,
                implements,
                members,
            } => {
                self.rewrite_type_params(type_params, span);
                if let Some(text) = extends {
                    *text = self.rewrite_text(text, RefPosition::Value, span);
                }
                for text in implements.iter_mut() {
                    *text = self.rewrite_text(text, RefPosition::Type, span);
                }
                self.rewrite_members(members, span);
            }
            DeclKind::TypeAlias {
                type_params,
                aliased,
            } => {
                self.rewrite_type_params(type_params, span);
                *aliased = self.rewrite_text(aliased, RefPosition::Type, span);
            }
            DeclKind::Function { signature } => {
                self.rewrite_signature(signature, span);
            }
            DeclKind::Variable { type_text, .. } => {
                if let Some(text) = type_text {
                    *text = self.rewrite_text(text, RefPosition::Type, span);
                }
            }
            DeclKind::ImportEquals { target } => {
                let dotted = target.join(".");
                let segments: SmallVec<[&str; 4]> = target.iter().map(String::as_str).collect();
                let rewritten = if segments.len() < 2 {
                    // A single-segment alias target resolves like any other
                    // root name; flat name equals the name itself.
                    match lookup_live(self.table, &segments) {
                        Some(symbol) => symbol.flat().to_string(),
                        None => {
                            self.report(DiagnosticKind::CannotResolveName, &dotted, span);
                            dotted.clone()
                        }
                    }
                } else {
                    self.resolve_segments(&segments, RefPosition::Value, span)
                };
                drop(segments);
                *target = vec![rewritten];
            }
            DeclKind::Enum { .. }
            | DeclKind::Namespace { .. }
            | DeclKind::Module { .. }
            | DeclKind::GlobalAugmentation { .. }
            | DeclKind::ImportBinding { .. }
            | DeclKind::Unsupported { .. } => {}
        }
    }

    fn rewrite_members(&mut self, members: &mut [Member], span: Span) {
        for member in members {
            match member {
                Member::Property { type_text, .. } => {
                    if let Some(text) = type_text {
                        *text = self.rewrite_text(text, RefPosition::Type, span);
                    }
                }
                Member::Method { signature, .. }
                | Member::Constructor { signature, .. }
                | Member::CallSignature { signature, .. }
                | Member::ConstructSignature { signature, .. } => {
                    self.rewrite_signature(signature, span);
                }
                Member::IndexSignature {
                    key_type,
                    value_type,
                    ..
                } => {
                    *key_type = self.rewrite_text(key_type, RefPosition::Type, span);
                    *value_type = self.rewrite_text(value_type, RefPosition::Type, span);
                }
            }
        }
    }

    fn rewrite_signature(&mut self, signature: &mut Signature, span: Span) {
        self.rewrite_type_params(&mut signature.type_params, span);
        for param in &mut signature.params {
            if let Some(text) = &mut param.type_text {
                *text = self.rewrite_text(text, RefPosition::Type, span);
            }
        }
        if let Some(text) = &mut signature.return_type {
            *text = self.rewrite_text(text, RefPosition::Type, span);
        }
    }

    fn rewrite_type_params(&mut self, type_params: &mut [TypeParam], span: Span) {
        for tp in type_params {
            if let Some(text) = &mut tp.constraint {
                *text = self.rewrite_text(text, RefPosition::Type, span);
            }
            if let Some(text) = &mut tp.default {
                *text = self.rewrite_text(text, RefPosition::Type, span);
            }
        }
    }

    /// Scan raw type text for dotted identifier chains and rewrite each one.
    /// String literals pass through untouched; single identifiers are not
    /// qualified references and stay as written.
    fn rewrite_text(&mut self, text: &str, position: RefPosition, span: Span) -> String {
        let bytes = text.as_bytes();
        let mut out = String::with_capacity(text.len());
        let mut i = 0;
        let mut prev_word_typeof = false;

        while i < bytes.len() {
            let b = bytes[i];
            if b == b'\'' || b == b'"' || b == b'`' {
                let end = skip_string_literal(bytes, i);
                out.push_str(&text[i..end]);
                i = end;
                continue;
            }
            if is_ident_start(b) {
                let mut segments: SmallVec<[&str; 4]> = SmallVec::new();
                let mut j = i;
                loop {
                    let word_start = j;
                    while j < bytes.len() && is_ident_continue(bytes[j]) {
                        j += 1;
                    }
                    segments.push(&text[word_start..j]);
                    if j + 1 < bytes.len() && bytes[j] == b'.' && is_ident_start(bytes[j + 1]) {
                        j += 1;
                        continue;
                    }
                    break;
                }

                if segments.len() >= 2 {
                    let effective = if prev_word_typeof {
                        RefPosition::Value
                    } else {
                        position
                    };
                    let replacement = self.resolve_segments(&segments, effective, span);
                    out.push_str(&replacement);
                    prev_word_typeof = false;
                } else {
                    out.push_str(segments[0]);
                    prev_word_typeof = segments[0] == "typeof";
                }
                i = j;
                continue;
            }
            if !b.is_ascii_whitespace() {
                prev_word_typeof = false;
            }
            // Copy the whole UTF-8 sequence starting here untouched.
            let step = utf8_len(b);
            out.push_str(&text[i..i + step]);
            i += step;
        }
        out
    }

    /// Resolve one dotted chain root-absolutely. Returns the replacement
    /// text; classification diagnostics are recorded as a side effect.
    fn resolve_segments(
        &mut self,
        segments: &[&str],
        position: RefPosition,
        span: Span,
    ) -> String {
        let dotted = segments.join(".");

        if let Some(symbol) = lookup_live(self.table, segments) {
            if symbol.has(symbol_flags::IMPORT_STAR) {
                self.report(DiagnosticKind::CannotResolveModule, &dotted, span);
                return "any".to_string();
            }
            if position == RefPosition::Type
                && !symbol.has(symbol_flags::TYPE | symbol_flags::CONTAINER)
                && symbol.has(symbol_flags::VALUE)
            {
                self.report(DiagnosticKind::TypeAsValue, &dotted, span);
            }
            return symbol.flat().to_string();
        }

        // Longest resolvable prefix: the unmatched tail becomes member
        // access on the prefix symbol's flattened form.
        for split in (1..segments.len()).rev() {
            let Some(symbol) = lookup_live(self.table, &segments[..split]) else {
                continue;
            };
            if symbol.has(symbol_flags::IMPORT_STAR) {
                self.report(DiagnosticKind::CannotResolveModule, &dotted, span);
                return "any".to_string();
            }
            if symbol.has(symbol_flags::CONTAINER) {
                // The container exists but the member does not.
                self.report(DiagnosticKind::CannotResolveName, &dotted, span);
                return flatten_path(segments);
            }
            if position == RefPosition::Type
                && symbol.has(symbol_flags::FUNCTION | symbol_flags::VARIABLE)
                && !symbol.has(symbol_flags::TYPE | symbol_flags::CONTAINER)
            {
                self.report(DiagnosticKind::TypeAsValue, &dotted, span);
            }
            let mut out = symbol.flat().to_string();
            for tail in &segments[split..] {
                out.push('.');
                out.push_str(tail);
            }
            return out;
        }

        self.report(DiagnosticKind::CannotResolveName, &dotted, span);
        flatten_path(segments)
    }

    fn report(&mut self, kind: DiagnosticKind, dotted: &str, span: Span) {
        let message = match kind {
            DiagnosticKind::CannotResolveModule => {
                format!("cannot resolve module for reference `{dotted}`")
            }
            DiagnosticKind::TypeAsValue => {
                format!("`{dotted}` refers to a value but is used as a type")
            }
            _ => format!("cannot resolve name `{dotted}`"),
        };
        self.diagnostics
            .push(Diagnostic::new(kind, dotted, span, message));
    }
}

fn lookup_live<'t>(table: &'t SymbolTable, segments: &[&str]) -> Option<&'t Symbol> {
    let id = table.lookup_segments(segments)?;
    let symbol = table.get(id);
    if symbol.suppressed {
        return None;
    }
    Some(symbol)
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Length in bytes of the UTF-8 sequence starting with `b`.
fn utf8_len(b: u8) -> usize {
    match b {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    }
}

/// Byte index one past the end of the string literal starting at `start`.
fn skip_string_literal(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}
