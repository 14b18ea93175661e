//! Declaration-merge resolution.
//!
//! Applied to every same-path group the builder produced. Which rule fires
//! depends on the set of declaration kinds present in the group, and for the
//! value+namespace fusions also on nesting depth: the source dialect merges
//! a namespace onto a function, variable, or type alias only at the top
//! level, and that positional restriction is preserved here rather than
//! papered over.
//!
//! Outcomes are recorded on the symbols themselves: `retained` narrows to
//! the surviving declarations and dropped namespace contributions are
//! `suppressed` transitively. Groups of same-kind declarations that the
//! source dialect merges structurally (interfaces, overloaded functions,
//! namespaces) keep their whole group; the emitter unions them.

use crate::symbol::{SymbolId, SymbolTable, symbol_flags};
use deflow_ast::{DeclArena, DeclId, DeclKind};
use deflow_common::{Diagnostic, DiagnosticKind};

/// Apply the merge rules to every symbol group. The table is read-only for
/// every later phase once this returns.
pub fn resolve_merges(arena: &DeclArena, table: &mut SymbolTable) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for id in table.ids() {
        resolve_group(arena, table, id, &mut diagnostics);
    }
    diagnostics
}

fn resolve_group(
    arena: &DeclArena,
    table: &mut SymbolTable,
    id: SymbolId,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let symbol = table.get(id);
    if symbol.suppressed || symbol.declarations.len() < 2 {
        return;
    }

    let flags = symbol.flags;
    let depth = symbol.path.len();
    let nested = depth > 1;
    let has_container = flags & symbol_flags::CONTAINER != 0;

    // Distinct non-container kinds contributing to this group.
    let plain_kinds = [
        symbol_flags::INTERFACE,
        symbol_flags::CLASS,
        symbol_flags::TYPE_ALIAS,
        symbol_flags::ENUM,
        symbol_flags::FUNCTION,
        symbol_flags::VARIABLE,
    ]
    .iter()
    .filter(|&&kind| flags & kind != 0)
    .count();

    if plain_kinds >= 2 {
        merge_conflict(arena, table, id, diagnostics);
        return;
    }

    if plain_kinds == 0 {
        // Pure namespace/module group: children are their own path-keyed
        // symbols, so the union (and recursive child-path collisions) is
        // already in the table. Multiple same-kind plain declarations never
        // reach here because plain_kinds would be 1.
        duplicate_plain_kind_check(arena, table, id, diagnostics);
        return;
    }

    if !has_container {
        // Single kind, several declarations, no namespace involved.
        duplicate_plain_kind_check(arena, table, id, diagnostics);
        return;
    }

    // Exactly one plain kind fused with a namespace.
    let symbol = table.get(id);
    let path = symbol.dotted_path();
    let span = symbol.span;

    if flags & symbol_flags::FUNCTION != 0 {
        if nested {
            // Supported at the top level only; the nested form leaves the
            // namespace members unreachable in the target dialect.
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::CannotResolveName,
                path.clone(),
                span,
                format!("cannot resolve name `{path}`: namespace merged with a function below the top level"),
            ));
            suppress_namespace_contributions(arena, table, id);
        }
        // Top level: the function keeps its overload set, the namespace
        // members stay addressable through their flattened names.
        return;
    }

    if flags & symbol_flags::CLASS != 0 {
        // Class/namespace fusion is legal at any depth: the namespace
        // members form a sibling scope addressable as `Class.Member`.
        return;
    }

    if flags & symbol_flags::ENUM != 0 {
        // Enum members and namespace members share one object in the target
        // dialect and there is no sound way to synthesize the union, so the
        // namespace contribution is dropped outright.
        let dropped = namespace_child_names(arena, table, id).join(", ");
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::PropertyMissing,
            path.clone(),
            span,
            format!("enum `{path}` does not absorb namespace members; dropping: {dropped}"),
        ));
        suppress_namespace_contributions(arena, table, id);
        let symbol = table.get_mut(id);
        symbol.retained = symbol
            .declarations
            .iter()
            .copied()
            .filter(|&decl_id| matches!(arena.get(decl_id).kind, DeclKind::Enum { .. }))
            .collect();
        return;
    }

    if flags & (symbol_flags::VARIABLE | symbol_flags::TYPE_ALIAS) != 0 {
        if nested {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::CannotResolveName,
                path.clone(),
                span,
                format!("cannot resolve name `{path}`: namespace merged with a value below the top level"),
            ));
            suppress_namespace_contributions(arena, table, id);
        }
        return;
    }

    if flags & symbol_flags::INTERFACE != 0 {
        // A namespace fused with an interface contributes only when it has
        // no runtime-shaped member of its own.
        let runtime_members = namespace_runtime_members(arena, table, id);
        if !runtime_members.is_empty() {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::CannotResolveName,
                path.clone(),
                span,
                format!(
                    "cannot resolve name `{path}`: interface merged with a namespace carrying runtime members: {}",
                    runtime_members.join(", ")
                ),
            ));
            suppress_namespace_contributions(arena, table, id);
        }
    }
}

/// Same-kind plain groups: interfaces union and functions overload; the
/// remaining kinds do not merge at all, so the first declaration wins.
fn duplicate_plain_kind_check(
    arena: &DeclArena,
    table: &mut SymbolTable,
    id: SymbolId,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let symbol = table.get(id);
    let mergeable = symbol_flags::INTERFACE
        | symbol_flags::FUNCTION
        | symbol_flags::NAMESPACE
        | symbol_flags::MODULE;
    if symbol.flags & !mergeable == 0 {
        return;
    }
    let plain_decl_count = symbol
        .declarations
        .iter()
        .filter(|&&decl_id| !is_container_decl(arena, decl_id))
        .count();
    if plain_decl_count < 2 {
        return;
    }

    let path = symbol.dotted_path();
    let span = symbol.span;
    diagnostics.push(Diagnostic::new(
        DiagnosticKind::MergeConflict,
        path.clone(),
        span,
        format!("duplicate declarations of `{path}` do not merge; keeping the first"),
    ));
    let first = symbol
        .declarations
        .iter()
        .copied()
        .find(|&decl_id| !is_container_decl(arena, decl_id));
    let symbol = table.get_mut(id);
    symbol.retained = symbol
        .declarations
        .iter()
        .copied()
        .filter(|&decl_id| Some(decl_id) == first || is_container_decl(arena, decl_id))
        .collect();
}

/// Incompatible kind combination: keep the first-seen declaration, drop the
/// rest, suppress contributions of any dropped namespaces.
fn merge_conflict(
    arena: &DeclArena,
    table: &mut SymbolTable,
    id: SymbolId,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let symbol = table.get(id);
    let path = symbol.dotted_path();
    let span = symbol.span;
    let kinds: Vec<&str> = symbol
        .declarations
        .iter()
        .map(|&decl_id| kind_name(&arena.get(decl_id).kind))
        .collect();
    diagnostics.push(Diagnostic::new(
        DiagnosticKind::MergeConflict,
        path.clone(),
        span,
        format!(
            "declarations of `{path}` have incompatible kinds ({}); keeping the first",
            kinds.join(", ")
        ),
    ));

    let first = table.get(id).declarations[0];
    suppress_contributions_except(arena, table, id, Some(first));
    let symbol = table.get_mut(id);
    symbol.retained = vec![first];
    // Recompute flags to the surviving declaration so later phases see the
    // resolved shape, not the conflicted union.
    symbol.flags = decl_flags(&arena.get(first).kind);
}

/// Mark every symbol contributed by this group's namespace declarations as
/// suppressed, transitively.
fn suppress_namespace_contributions(arena: &DeclArena, table: &mut SymbolTable, id: SymbolId) {
    suppress_contributions_except(arena, table, id, None);
}

fn suppress_contributions_except(
    arena: &DeclArena,
    table: &mut SymbolTable,
    id: SymbolId,
    keep: Option<DeclId>,
) {
    let symbol = table.get(id);
    let base_path = symbol.path.clone();
    let mut pending: Vec<(Vec<String>, DeclId)> = Vec::new();
    for &decl_id in &symbol.declarations {
        if Some(decl_id) == keep {
            continue;
        }
        if let Some(children) = arena.get(decl_id).kind.children() {
            for &child in children {
                pending.push((base_path.clone(), child));
            }
        }
    }

    while let Some((parent_path, decl_id)) = pending.pop() {
        let decl = arena.get(decl_id);
        let mut child_path = parent_path.clone();
        child_path.push(decl.name.clone());
        if let Some(child_sym) = table.lookup(&child_path.join(".")) {
            table.get_mut(child_sym).suppressed = true;
        }
        if let Some(children) = decl.kind.children() {
            for &grandchild in children {
                pending.push((child_path.clone(), grandchild));
            }
        }
    }
}

fn namespace_child_names(arena: &DeclArena, table: &SymbolTable, id: SymbolId) -> Vec<String> {
    let symbol = table.get(id);
    let mut names = Vec::new();
    for &decl_id in &symbol.declarations {
        if let Some(children) = arena.get(decl_id).kind.children() {
            for &child in children {
                names.push(arena.get(child).name.clone());
            }
        }
    }
    names
}

/// Names of namespace members that produce runtime values.
fn namespace_runtime_members(arena: &DeclArena, table: &SymbolTable, id: SymbolId) -> Vec<String> {
    let symbol = table.get(id);
    let mut names = Vec::new();
    for &decl_id in &symbol.declarations {
        if let Some(children) = arena.get(decl_id).kind.children() {
            for &child in children {
                let child_decl = arena.get(child);
                if child_decl.kind.is_runtime_value() {
                    names.push(child_decl.name.clone());
                }
            }
        }
    }
    names
}

fn is_container_decl(arena: &DeclArena, id: DeclId) -> bool {
    arena.get(id).kind.children().is_some()
}

fn kind_name(kind: &DeclKind) -> &'static str {
    match kind {
        DeclKind::Interface { .. } => "interface",
        DeclKind::Class { .. } => "class",
        DeclKind::TypeAlias { .. } => "type alias",
        DeclKind::Enum { .. } => "enum",
        DeclKind::Function { .. } => "function",
        DeclKind::Variable { .. } => "variable",
        DeclKind::Namespace { .. } => "namespace",
        DeclKind::Module { .. } => "module",
        DeclKind::GlobalAugmentation { .. } => "global augmentation",
        DeclKind::ImportBinding { .. } => "import",
        DeclKind::ImportEquals { .. } => "import alias",
        DeclKind::Unsupported { .. } => "unsupported",
    }
}

fn decl_flags(kind: &DeclKind) -> u32 {
    match kind {
        DeclKind::Interface { .. } => symbol_flags::INTERFACE,
        DeclKind::Class { .. } => symbol_flags::CLASS,
        DeclKind::TypeAlias { .. } => symbol_flags::TYPE_ALIAS,
        DeclKind::Enum { .. } => symbol_flags::ENUM,
        DeclKind::Function { .. } => symbol_flags::FUNCTION,
        DeclKind::Variable { .. } => symbol_flags::VARIABLE,
        DeclKind::Namespace { .. } => symbol_flags::NAMESPACE,
        DeclKind::Module { .. } => symbol_flags::MODULE,
        _ => 0,
    }
}
