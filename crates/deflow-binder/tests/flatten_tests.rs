//! Flat-name assignment tests.

use deflow_ast::{RawKind, RawModifier, RawNode, adapt};
use deflow_binder::{assign_flat_names, build_symbol_table, resolve_merges};
use deflow_common::{FatalError, TranslateOptions};
use std::collections::HashSet;

fn flatten(root: &RawNode) -> Result<deflow_binder::SymbolTable, FatalError> {
    let (arena, _) = adapt(root, &TranslateOptions::quiet());
    let mut table = build_symbol_table(&arena);
    let _ = resolve_merges(&arena, &mut table);
    assign_flat_names(&mut table)?;
    Ok(table)
}

#[test]
fn nested_paths_join_with_dollar() {
    let root = RawNode::source_file(vec![
        RawNode::named(RawKind::Namespace, "A.B")
            .with_modifier(RawModifier::Declare)
            .with_child(RawNode::named(RawKind::Interface, "S")),
    ]);
    let table = flatten(&root).expect("no collisions");

    let s = table.get(table.lookup("A.B.S").expect("nested symbol"));
    assert_eq!(s.flat(), "A$B$S");
    let a = table.get(table.lookup("A").expect("root symbol"));
    assert_eq!(a.flat(), "A", "single-segment paths keep their name");
}

#[test]
fn flat_names_are_unique_across_a_run() {
    let root = RawNode::source_file(vec![
        RawNode::named(RawKind::Namespace, "E0")
            .with_modifier(RawModifier::Declare)
            .with_child(
                RawNode::named(RawKind::Namespace, "U1")
                    .with_child(RawNode::named(RawKind::Interface, "S3")),
            )
            .with_child(
                RawNode::named(RawKind::Namespace, "S1")
                    .with_child(RawNode::named(RawKind::Variable, "m3").with_type_text("string")),
            ),
    ]);
    let table = flatten(&root).expect("no collisions");

    let mut seen = HashSet::new();
    for (_, symbol) in table.iter() {
        assert!(
            seen.insert(symbol.flat().to_string()),
            "duplicate flat name {}",
            symbol.flat()
        );
    }
}

#[test]
fn deliberate_collision_aborts_the_run() {
    // `A$B` at the root flattens to the same identifier as `A.B`.
    let root = RawNode::source_file(vec![
        RawNode::named(RawKind::Interface, "A$B"),
        RawNode::named(RawKind::Namespace, "A")
            .with_modifier(RawModifier::Declare)
            .with_child(RawNode::named(RawKind::Interface, "B")),
    ]);
    let err = flatten(&root).expect_err("collision must be fatal");

    let FatalError::FlatNameCollision {
        flat_name,
        first_path,
        second_path,
    } = err
    else {
        panic!("expected collision, got {err:?}");
    };
    assert_eq!(flat_name, "A$B");
    assert_eq!(first_path, "A$B");
    assert_eq!(second_path, "A.B");
}

#[test]
fn suppressed_symbols_are_not_flattened() {
    let root = RawNode::source_file(vec![
        RawNode::named(RawKind::Enum, "Color")
            .with_child(RawNode::named(RawKind::EnumMember, "red")),
        RawNode::named(RawKind::Namespace, "Color").with_child(
            RawNode::named(RawKind::Variable, "dropped")
                .with_modifier(RawModifier::Export)
                .with_type_text("number"),
        ),
        // Would collide with `Color.dropped` if the suppressed member were
        // still assigned a flat name.
        RawNode::named(RawKind::Variable, "Color$dropped")
            .with_modifier(RawModifier::Declare)
            .with_type_text("number"),
    ]);
    let table = flatten(&root).expect("suppressed members never collide");

    assert!(table.get(table.lookup("Color.dropped").expect("member")).suppressed);
}

#[test]
fn module_specifiers_sanitize_into_identifiers() {
    let root = RawNode::source_file(vec![
        RawNode::named(RawKind::Module, "@scope/pkg")
            .with_child(RawNode::named(RawKind::Interface, "Thing")),
    ]);
    let table = flatten(&root).expect("no collisions");

    let thing = table.get(table.lookup("@scope/pkg.Thing").expect("module member"));
    assert_eq!(thing.flat(), "$scope$pkg$Thing");
}
