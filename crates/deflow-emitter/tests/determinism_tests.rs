//! Determinism and fatal-abort behavior.

use deflow_ast::{RawKind, RawModifier, RawNode};
use deflow_common::{FatalError, TranslateOptions};
use deflow_emitter::translate;

fn fixture() -> RawNode {
    RawNode::source_file(vec![
        RawNode::named(RawKind::Import, "external").with_module_specifier("external"),
        RawNode::named(RawKind::Function, "test")
            .with_modifier(RawModifier::Declare)
            .with_param("foo", "number")
            .with_type_text("string"),
        RawNode::named(RawKind::Namespace, "test").with_child(
            RawNode::named(RawKind::Interface, "Foo")
                .with_modifier(RawModifier::Export)
                .with_child(
                    RawNode::named(RawKind::Property, "external")
                        .with_type_text("external.Thing"),
                ),
        ),
        RawNode::named(RawKind::TypeAlias, "Broken").with_type_text("Missing.Name"),
    ])
}

#[test]
fn repeated_runs_are_byte_identical() {
    let root = fixture();
    let first = translate(&root, &TranslateOptions::quiet()).expect("run 1");
    let second = translate(&root, &TranslateOptions::quiet()).expect("run 2");

    assert_eq!(first.text, second.text);
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn quiet_changes_neither_text_nor_diagnostics() {
    let root = fixture();
    let loud = translate(
        &root,
        &TranslateOptions {
            quiet: false,
            report_unsupported: false,
        },
    )
    .expect("loud run");
    let quiet = translate(&root, &TranslateOptions::quiet()).expect("quiet run");

    assert_eq!(loud.text, quiet.text);
    assert_eq!(loud.diagnostics, quiet.diagnostics);
}

#[test]
fn flat_name_collision_aborts_with_no_output() {
    let root = RawNode::source_file(vec![
        RawNode::named(RawKind::Interface, "A$B"),
        RawNode::named(RawKind::Namespace, "A")
            .with_modifier(RawModifier::Declare)
            .with_child(RawNode::named(RawKind::Interface, "B")),
    ]);
    let err = translate(&root, &TranslateOptions::quiet()).expect_err("collision is fatal");

    assert!(
        matches!(err, FatalError::FlatNameCollision { .. }),
        "unexpected error: {err:?}"
    );
}

#[test]
fn resolved_references_never_leave_dotted_paths_behind() {
    let root = RawNode::source_file(vec![
        RawNode::named(RawKind::Class, "Album")
            .with_modifier(RawModifier::Declare)
            .with_child(
                RawNode::named(RawKind::Property, "label").with_type_text("Album.AlbumLabel"),
            ),
        RawNode::named(RawKind::Namespace, "Album").with_child(
            RawNode::named(RawKind::Class, "AlbumLabel")
                .with_modifier(RawModifier::Export)
                .with_modifier(RawModifier::Declare),
        ),
    ]);
    let result = translate(&root, &TranslateOptions::quiet()).expect("translation");

    assert!(
        result.text.contains("Album$AlbumLabel"),
        "flat name appears: {}",
        result.text
    );
    assert!(
        !result.text.contains("Album.AlbumLabel"),
        "dotted path is gone: {}",
        result.text
    );
}
