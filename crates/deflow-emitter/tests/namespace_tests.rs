//! Namespace flattening and document-shape tests.

use deflow_ast::{RawKind, RawModifier, RawNode};
use deflow_common::TranslateOptions;
use deflow_emitter::translate;

fn translate_quiet(root: &RawNode) -> deflow_emitter::Translation {
    translate(root, &TranslateOptions::quiet()).expect("translation must not abort")
}

#[test]
fn deeply_nested_namespaces_flatten_completely() {
    let root = RawNode::source_file(vec![
        RawNode::named(RawKind::Namespace, "E0")
            .with_modifier(RawModifier::Declare)
            .with_child(
                RawNode::named(RawKind::Namespace, "U1").with_child(
                    RawNode::named(RawKind::Interface, "S3")
                        .with_child(RawNode::named(RawKind::Property, "a").with_type_text("string")),
                ),
            )
            .with_child(
                RawNode::named(RawKind::Namespace, "U1")
                    .with_child(
                        RawNode::named(RawKind::Variable, "e2")
                            .with_modifier(RawModifier::Declare)
                            .with_type_text("number"),
                    )
                    .with_child(
                        RawNode::named(RawKind::Enum, "E2")
                            .with_child(RawNode::named(RawKind::EnumMember, "E").with_initializer("1")),
                    )
                    .with_child(
                        RawNode::named(RawKind::Interface, "S3")
                            .with_child(
                                RawNode::named(RawKind::Property, "b").with_type_text("string"),
                            ),
                    )
                    .with_child(
                        RawNode::named(RawKind::Namespace, "D1").with_child(
                            RawNode::named(RawKind::Namespace, "S2")
                                .with_child(RawNode::named(RawKind::Interface, "S3").with_child(
                                    RawNode::named(RawKind::Property, "b").with_type_text("string"),
                                ))
                                .with_child(RawNode::named(RawKind::Class, "N3")),
                        ),
                    ),
            )
            .with_child(
                RawNode::named(RawKind::Variable, "s1")
                    .with_modifier(RawModifier::Declare)
                    .with_type_text("string"),
            ),
    ]);
    let result = translate_quiet(&root);
    let text = &result.text;

    assert!(text.contains("declare interface E0$U1$S3 {"), "{text}");
    assert!(text.contains("a: string;"), "members from the first block: {text}");
    assert!(text.contains("b: string;"), "members from the second block: {text}");
    assert!(text.contains("declare var E0$U1$e2: number;"), "{text}");
    assert!(text.contains("declare var E0$U1$E2: {|"), "enum inside namespace: {text}");
    assert!(text.contains("declare interface E0$U1$D1$S2$S3"), "{text}");
    assert!(text.contains("declare class E0$U1$D1$S2$N3"), "{text}");
    assert!(text.contains("declare var E0$s1: string;"), "{text}");
    assert!(!text.contains("namespace"), "no namespace construct survives: {text}");
}

#[test]
fn merged_interface_blocks_emit_once() {
    let root = RawNode::source_file(vec![
        RawNode::named(RawKind::Interface, "S")
            .with_child(RawNode::named(RawKind::Property, "a").with_type_text("string")),
        RawNode::named(RawKind::Interface, "S")
            .with_child(RawNode::named(RawKind::Property, "b").with_type_text("number")),
    ]);
    let result = translate_quiet(&root);

    assert_eq!(
        result.text.matches("declare interface S {").count(),
        1,
        "one merged interface: {}",
        result.text
    );
    assert!(result.text.contains("a: string;"), "{}", result.text);
    assert!(result.text.contains("b: number;"), "{}", result.text);
}

#[test]
fn class_anchor_members_stay_adjacent() {
    let root = RawNode::source_file(vec![
        RawNode::named(RawKind::Class, "Album")
            .with_modifier(RawModifier::Declare)
            .with_child(
                RawNode::named(RawKind::Property, "label").with_type_text("Album.AlbumLabel"),
            ),
        RawNode::named(RawKind::Interface, "Unrelated"),
        RawNode::named(RawKind::Namespace, "Album").with_child(
            RawNode::named(RawKind::Class, "AlbumLabel")
                .with_modifier(RawModifier::Export)
                .with_modifier(RawModifier::Declare),
        ),
    ]);
    let result = translate_quiet(&root);
    let text = &result.text;

    assert!(text.contains("label: Album$AlbumLabel;"), "{text}");
    let class_pos = text.find("declare class Album {").expect("class");
    let member_pos = text.find("declare class Album$AlbumLabel").expect("flattened member");
    let unrelated_pos = text.find("declare interface Unrelated").expect("unrelated");
    assert!(
        class_pos < member_pos && member_pos < unrelated_pos,
        "flattened members follow their anchor: {text}"
    );
}

#[test]
fn imports_rewrite_and_lead_the_document() {
    let root = RawNode::source_file(vec![
        RawNode::named(RawKind::Interface, "Local"),
        RawNode::new(RawKind::Import)
            .with_module_specifier("mod")
            .with_import_name("A")
            .with_import_name("B"),
        RawNode::named(RawKind::Import, "external").with_module_specifier("external"),
    ]);
    let result = translate_quiet(&root);
    let text = &result.text;

    assert!(text.contains("import type { A, B } from 'mod';"), "{text}");
    assert!(text.contains("import * as external from 'external';"), "{text}");
    let import_pos = text.find("import type").expect("import");
    let local_pos = text.find("declare interface Local").expect("local decl");
    assert!(import_pos < local_pos, "imports come first: {text}");
}

#[test]
fn ambient_module_members_flatten_under_the_specifier() {
    let root = RawNode::source_file(vec![
        RawNode::named(RawKind::Module, "my-lib").with_child(
            RawNode::named(RawKind::Function, "greet")
                .with_modifier(RawModifier::Export)
                .with_param("name", "string")
                .with_type_text("string"),
        ),
    ]);
    let result = translate_quiet(&root);

    assert!(
        result.text.contains("declare function my$lib$greet(name: string): string;"),
        "{}",
        result.text
    );
}

#[test]
fn exported_top_level_declarations_carry_declare_export() {
    let root = RawNode::source_file(vec![
        RawNode::named(RawKind::Function, "visible")
            .with_modifier(RawModifier::Export)
            .with_modifier(RawModifier::Declare)
            .with_type_text("void"),
        RawNode::named(RawKind::Function, "hidden")
            .with_modifier(RawModifier::Declare)
            .with_type_text("void"),
    ]);
    let result = translate_quiet(&root);

    assert!(
        result.text.contains("declare export function visible(): void;"),
        "{}",
        result.text
    );
    assert!(
        result.text.contains("declare function hidden(): void;"),
        "{}",
        result.text
    );
}

#[test]
fn optional_and_static_members_keep_their_markers() {
    let root = RawNode::source_file(vec![
        RawNode::named(RawKind::Class, "Widget")
            .with_modifier(RawModifier::Declare)
            .with_child(
                RawNode::named(RawKind::Property, "id")
                    .with_modifier(RawModifier::Static)
                    .with_type_text("number"),
            )
            .with_child(
                RawNode::named(RawKind::Property, "title")
                    .with_type_text("string")
                    .with_optional(),
            )
            .with_child(RawNode::new(RawKind::Constructor).with_param("id", "number")),
    ]);
    let result = translate_quiet(&root);
    let text = &result.text;

    assert!(text.contains("static id: number;"), "{text}");
    assert!(text.contains("title?: string;"), "{text}");
    assert!(text.contains("constructor(id: number): void;"), "{text}");
}
