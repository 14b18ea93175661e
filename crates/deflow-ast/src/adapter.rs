//! Raw tree -> declaration arena wrapping pass.
//!
//! A single recursive walk over the externally-parsed tree. Each raw node
//! maps to exactly one wrapped declaration; unrecognized kinds become
//! `Unsupported` markers that emit nothing. The pass is pure apart from the
//! diagnostics it returns.
//!
//! Normalizations applied here, before any symbol work:
//! - dotted namespace names (`namespace A.B.C`) expand into nested namespaces
//! - get/set accessor pairs fold into a single property (getter-only becomes
//!   a readonly property)
//! - `declare global` blocks become `GlobalAugmentation` containers

use crate::arena::{DeclArena, DeclId};
use crate::decl::{
    Decl, DeclKind, EnumMember, ImportClause, Member, Param, Signature, TypeParam,
};
use crate::raw::{RawKind, RawModifier, RawNode, RawParam, RawTypeParam};
use deflow_common::{Diagnostic, DiagnosticKind, TranslateOptions};

/// Wrap a raw source-file tree into a declaration arena.
///
/// Accepts either a `SourceFile` root or a bare declaration node (treated as
/// a single-statement file). Never fails; unsupported constructs surface as
/// diagnostics when `report_unsupported` is set.
pub fn adapt(root: &RawNode, options: &TranslateOptions) -> (DeclArena, Vec<Diagnostic>) {
    let mut adapter = Adapter {
        arena: DeclArena::new(),
        diagnostics: Vec::new(),
        options: *options,
        ambient_depth: 0,
    };

    let statements: &[RawNode] = if root.kind == RawKind::SourceFile {
        &root.children
    } else {
        std::slice::from_ref(root)
    };

    for statement in statements {
        if let Some(id) = adapter.adapt_statement(statement) {
            adapter.arena.roots.push(id);
        }
    }

    tracing::debug!(
        decls = adapter.arena.len(),
        roots = adapter.arena.roots.len(),
        "wrapped raw tree"
    );
    (adapter.arena, adapter.diagnostics)
}

struct Adapter {
    arena: DeclArena,
    diagnostics: Vec<Diagnostic>,
    options: TranslateOptions,
    /// Nonzero while inside an ambient container (`declare namespace`,
    /// ambient module, global block). Children of ambient containers are
    /// themselves ambient.
    ambient_depth: u32,
}

impl Adapter {
    fn adapt_statement(&mut self, raw: &RawNode) -> Option<DeclId> {
        match raw.kind {
            RawKind::Interface => Some(self.adapt_interface(raw)),
            RawKind::Class => Some(self.adapt_class(raw)),
            RawKind::TypeAlias => Some(self.adapt_type_alias(raw)),
            RawKind::Enum => Some(self.adapt_enum(raw)),
            RawKind::Function => Some(self.adapt_function(raw)),
            RawKind::Variable => Some(self.adapt_variable(raw)),
            RawKind::Namespace => Some(self.adapt_namespace(raw)),
            RawKind::Module => Some(self.adapt_module(raw)),
            RawKind::Global => Some(self.adapt_global(raw)),
            RawKind::Import => self.adapt_import(raw),
            RawKind::ImportEquals => Some(self.adapt_import_equals(raw)),
            _ => {
                self.record_unsupported(raw);
                Some(self.alloc_unsupported(raw))
            }
        }
    }

    fn adapt_interface(&mut self, raw: &RawNode) -> DeclId {
        let members = self.adapt_members(&raw.children);
        self.alloc(
            raw,
            DeclKind::Interface {
                type_params: adapt_type_params(&raw.type_parameters),
                extends: raw.extends.clone(),
                members,
            },
        )
    }

    fn adapt_class(&mut self, raw: &RawNode) -> DeclId {
        let members = self.adapt_members(&raw.children);
        self.alloc(
            raw,
            DeclKind::Class {
                type_params: adapt_type_params(&raw.type_parameters),
                extends: raw.extends.first().cloned(),
                implements: raw.implements.clone(),
                members,
            },
        )
    }

    fn adapt_type_alias(&mut self, raw: &RawNode) -> DeclId {
        self.alloc(
            raw,
            DeclKind::TypeAlias {
                type_params: adapt_type_params(&raw.type_parameters),
                aliased: raw.type_text.clone().unwrap_or_else(|| "any".to_string()),
            },
        )
    }

    fn adapt_enum(&mut self, raw: &RawNode) -> DeclId {
        let mut members = Vec::with_capacity(raw.children.len());
        for child in &raw.children {
            if child.kind != RawKind::EnumMember {
                self.record_unsupported(child);
                continue;
            }
            members.push(EnumMember {
                name: child.name.clone().unwrap_or_default(),
                initializer: child.initializer.clone(),
                span: child.span,
            });
        }
        self.alloc(
            raw,
            DeclKind::Enum {
                is_const: raw.has_modifier(RawModifier::Const),
                members,
            },
        )
    }

    fn adapt_function(&mut self, raw: &RawNode) -> DeclId {
        self.alloc(
            raw,
            DeclKind::Function {
                signature: adapt_signature(raw),
            },
        )
    }

    fn adapt_variable(&mut self, raw: &RawNode) -> DeclId {
        self.alloc(
            raw,
            DeclKind::Variable {
                is_const: raw.has_modifier(RawModifier::Const),
                type_text: raw.type_text.clone(),
            },
        )
    }

    /// `namespace A.B.C { ... }` wraps into `A { B { C { ... } } }` so that
    /// the symbol table only ever sees single-segment container names.
    fn adapt_namespace(&mut self, raw: &RawNode) -> DeclId {
        let name = raw.name.as_deref().unwrap_or_default();
        let segments: Vec<&str> = if name.contains('.') {
            name.split('.').collect()
        } else {
            vec![name]
        };

        let was_ambient = self.ambient_depth;
        if raw.has_modifier(RawModifier::Declare) || self.ambient_depth > 0 {
            self.ambient_depth += 1;
        }

        let children = self.adapt_container_children(&raw.children);
        let innermost_name = segments[segments.len() - 1];
        let mut current = self.alloc_named(raw, innermost_name, DeclKind::Namespace { children });

        // Wrap outward: each outer segment owns exactly the next one in.
        for segment in segments[..segments.len() - 1].iter().rev() {
            current = self.alloc_named(
                raw,
                segment,
                DeclKind::Namespace {
                    children: vec![current],
                },
            );
        }

        self.ambient_depth = was_ambient;
        current
    }

    fn adapt_module(&mut self, raw: &RawNode) -> DeclId {
        let was_ambient = self.ambient_depth;
        self.ambient_depth += 1;
        let children = self.adapt_container_children(&raw.children);
        self.ambient_depth = was_ambient;
        self.alloc(raw, DeclKind::Module { children })
    }

    fn adapt_global(&mut self, raw: &RawNode) -> DeclId {
        let was_ambient = self.ambient_depth;
        self.ambient_depth += 1;
        let children = self.adapt_container_children(&raw.children);
        self.ambient_depth = was_ambient;
        self.alloc_named(raw, "global", DeclKind::GlobalAugmentation { children })
    }

    fn adapt_container_children(&mut self, raws: &[RawNode]) -> Vec<DeclId> {
        let mut children = Vec::with_capacity(raws.len());
        for child in raws {
            if let Some(id) = self.adapt_statement(child) {
                children.push(id);
            }
        }
        children
    }

    fn adapt_import(&mut self, raw: &RawNode) -> Option<DeclId> {
        let specifier = raw.module_specifier.clone()?;
        let clause = if raw.import_names.is_empty() {
            ImportClause::Star {
                binding: raw.name.clone()?,
            }
        } else {
            ImportClause::Named {
                names: raw
                    .import_names
                    .iter()
                    .map(|n| (n.name.clone(), n.alias.clone()))
                    .collect(),
            }
        };
        let binding_name = match &clause {
            ImportClause::Star { binding } => binding.clone(),
            ImportClause::Named { .. } => specifier.clone(),
        };
        let id = self.alloc_named(raw, &binding_name, DeclKind::ImportBinding { specifier, clause });
        Some(id)
    }

    fn adapt_import_equals(&mut self, raw: &RawNode) -> DeclId {
        let target = raw
            .reference_path
            .as_deref()
            .unwrap_or_default()
            .split('.')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        self.alloc(raw, DeclKind::ImportEquals { target })
    }

    // ====================================================================
    // Members
    // ====================================================================

    fn adapt_members(&mut self, raws: &[RawNode]) -> Vec<Member> {
        let mut members: Vec<Member> = Vec::with_capacity(raws.len());
        for raw in raws {
            match raw.kind {
                RawKind::Property => members.push(Member::Property {
                    name: raw.name.clone().unwrap_or_default(),
                    type_text: raw.type_text.clone(),
                    optional: raw.optional,
                    readonly: raw.has_modifier(RawModifier::Readonly),
                    is_static: raw.has_modifier(RawModifier::Static),
                    span: raw.span,
                }),
                RawKind::Method => members.push(Member::Method {
                    name: raw.name.clone().unwrap_or_default(),
                    signature: adapt_signature(raw),
                    optional: raw.optional,
                    is_static: raw.has_modifier(RawModifier::Static),
                    span: raw.span,
                }),
                RawKind::Constructor => members.push(Member::Constructor {
                    signature: adapt_signature(raw),
                    span: raw.span,
                }),
                RawKind::CallSignature => members.push(Member::CallSignature {
                    signature: adapt_signature(raw),
                    span: raw.span,
                }),
                RawKind::ConstructSignature => members.push(Member::ConstructSignature {
                    signature: adapt_signature(raw),
                    span: raw.span,
                }),
                RawKind::IndexSignature => {
                    let key = raw.parameters.first();
                    members.push(Member::IndexSignature {
                        key_name: key.map(|p| p.name.clone()).unwrap_or_default(),
                        key_type: key
                            .and_then(|p| p.type_text.clone())
                            .unwrap_or_else(|| "string".to_string()),
                        value_type: raw.type_text.clone().unwrap_or_else(|| "any".to_string()),
                        readonly: raw.has_modifier(RawModifier::Readonly),
                        span: raw.span,
                    });
                }
                RawKind::GetAccessor => {
                    self.fold_accessor(&mut members, raw, true);
                }
                RawKind::SetAccessor => {
                    self.fold_accessor(&mut members, raw, false);
                }
                _ => self.record_unsupported(raw),
            }
        }
        members
    }

    /// Accessors have no direct target-dialect form on ambient shapes; a
    /// get/set pair folds into one property, a lone getter into a readonly
    /// property.
    fn fold_accessor(&mut self, members: &mut Vec<Member>, raw: &RawNode, is_getter: bool) {
        let name = raw.name.clone().unwrap_or_default();
        let type_text = if is_getter {
            raw.type_text.clone()
        } else {
            raw.parameters.first().and_then(|p| p.type_text.clone())
        };

        for member in members.iter_mut() {
            if let Member::Property {
                name: existing,
                readonly,
                type_text: existing_type,
                ..
            } = member
            {
                if *existing == name {
                    // Second accessor of the pair: property becomes writable.
                    *readonly = false;
                    if existing_type.is_none() {
                        *existing_type = type_text;
                    }
                    return;
                }
            }
        }

        members.push(Member::Property {
            name,
            type_text,
            optional: false,
            readonly: is_getter,
            is_static: raw.has_modifier(RawModifier::Static),
            span: raw.span,
        });
    }

    // ====================================================================
    // Allocation helpers
    // ====================================================================

    fn alloc(&mut self, raw: &RawNode, kind: DeclKind) -> DeclId {
        let name = raw.name.clone().unwrap_or_default();
        self.alloc_named(raw, &name, kind)
    }

    fn alloc_named(&mut self, raw: &RawNode, name: &str, kind: DeclKind) -> DeclId {
        self.arena.alloc(Decl {
            name: name.to_string(),
            span: raw.span,
            exported: raw.has_modifier(RawModifier::Export),
            ambient: raw.has_modifier(RawModifier::Declare) || self.ambient_depth > 0,
            kind,
        })
    }

    fn alloc_unsupported(&mut self, raw: &RawNode) -> DeclId {
        self.alloc(
            raw,
            DeclKind::Unsupported {
                raw_kind: format!("{:?}", raw.kind),
            },
        )
    }

    fn record_unsupported(&mut self, raw: &RawNode) {
        if !self.options.report_unsupported {
            return;
        }
        self.diagnostics.push(Diagnostic::new(
            DiagnosticKind::UnsupportedConstruct,
            raw.name.as_deref().unwrap_or("<anonymous>"),
            raw.span,
            format!("unsupported construct of kind {:?}", raw.kind),
        ));
    }
}

fn adapt_type_params(raws: &[RawTypeParam]) -> Vec<TypeParam> {
    raws.iter()
        .map(|tp| TypeParam {
            name: tp.name.clone(),
            constraint: tp.constraint.clone(),
            default: tp.default.clone(),
        })
        .collect()
}

fn adapt_params(raws: &[RawParam]) -> Vec<Param> {
    raws.iter()
        .map(|p| Param {
            name: p.name.clone(),
            type_text: p.type_text.clone(),
            optional: p.optional,
            rest: p.rest,
        })
        .collect()
}

fn adapt_signature(raw: &RawNode) -> Signature {
    Signature {
        type_params: adapt_type_params(&raw.type_parameters),
        params: adapt_params(&raw.parameters),
        return_type: raw.type_text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::RawKind;

    fn adapt_quiet(root: &RawNode) -> (DeclArena, Vec<Diagnostic>) {
        adapt(root, &TranslateOptions::quiet())
    }

    #[test]
    fn wraps_interface_with_members() {
        let root = RawNode::source_file(vec![
            RawNode::named(RawKind::Interface, "Foo")
                .with_type_param("T")
                .with_child(
                    RawNode::named(RawKind::Property, "bar").with_type_text("number"),
                ),
        ]);
        let (arena, diagnostics) = adapt_quiet(&root);

        assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
        assert_eq!(arena.roots.len(), 1);
        let decl = arena.get(arena.roots[0]);
        assert_eq!(decl.name, "Foo");
        let DeclKind::Interface {
            type_params,
            members,
            ..
        } = &decl.kind
        else {
            panic!("expected interface, got {:?}", decl.kind);
        };
        assert_eq!(type_params.len(), 1);
        assert_eq!(members.len(), 1);
    }

    #[test]
    fn expands_dotted_namespace_names() {
        let root = RawNode::source_file(vec![
            RawNode::named(RawKind::Namespace, "A.B.C")
                .with_modifier(RawModifier::Declare)
                .with_child(RawNode::named(RawKind::Interface, "S")),
        ]);
        let (arena, _) = adapt_quiet(&root);

        let outer = arena.get(arena.roots[0]);
        assert_eq!(outer.name, "A");
        let DeclKind::Namespace { children } = &outer.kind else {
            panic!("expected namespace");
        };
        let middle = arena.get(children[0]);
        assert_eq!(middle.name, "B");
        let DeclKind::Namespace { children } = &middle.kind else {
            panic!("expected namespace");
        };
        let inner = arena.get(children[0]);
        assert_eq!(inner.name, "C");
        assert!(inner.ambient, "ambient context must propagate inward");
    }

    #[test]
    fn folds_accessor_pair_into_property() {
        let root = RawNode::source_file(vec![RawNode::named(RawKind::Class, "C")
            .with_child(RawNode::named(RawKind::GetAccessor, "value").with_type_text("number"))
            .with_child(RawNode::named(RawKind::SetAccessor, "value").with_param("v", "number"))]);
        let (arena, _) = adapt_quiet(&root);

        let DeclKind::Class { members, .. } = &arena.get(arena.roots[0]).kind else {
            panic!("expected class");
        };
        assert_eq!(members.len(), 1);
        let Member::Property { readonly, .. } = &members[0] else {
            panic!("expected property");
        };
        assert!(!readonly, "get/set pair must be writable");
    }

    #[test]
    fn lone_getter_becomes_readonly_property() {
        let root = RawNode::source_file(vec![RawNode::named(RawKind::Class, "C")
            .with_child(RawNode::named(RawKind::GetAccessor, "value").with_type_text("number"))]);
        let (arena, _) = adapt_quiet(&root);

        let DeclKind::Class { members, .. } = &arena.get(arena.roots[0]).kind else {
            panic!("expected class");
        };
        let Member::Property { readonly, .. } = &members[0] else {
            panic!("expected property");
        };
        assert!(readonly);
    }

    #[test]
    fn unknown_kind_becomes_unsupported_marker() {
        let options = TranslateOptions {
            quiet: true,
            report_unsupported: true,
        };
        let root = RawNode::source_file(vec![RawNode::named(RawKind::Unknown, "mystery")]);
        let (arena, diagnostics) = adapt(&root, &options);

        assert!(matches!(
            arena.get(arena.roots[0]).kind,
            DeclKind::Unsupported { .. }
        ));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::UnsupportedConstruct);
    }

    #[test]
    fn deserializes_raw_tree_from_json() {
        let json = serde_json::json!({
            "kind": "sourceFile",
            "children": [
                {
                    "kind": "function",
                    "name": "test",
                    "modifiers": ["declare"],
                    "parameters": [{"name": "foo", "typeText": "number"}],
                    "typeText": "string",
                    "span": {"start": 0, "end": 42}
                }
            ]
        });
        let root: RawNode = serde_json::from_value(json).expect("raw tree must deserialize");
        let (arena, diagnostics) = adapt_quiet(&root);

        assert!(diagnostics.is_empty());
        let decl = arena.get(arena.roots[0]);
        assert_eq!(decl.name, "test");
        assert!(decl.ambient);
        let DeclKind::Function { signature } = &decl.kind else {
            panic!("expected function");
        };
        assert_eq!(signature.params[0].type_text.as_deref(), Some("number"));
        assert_eq!(signature.return_type.as_deref(), Some("string"));
    }

    #[test]
    fn unknown_json_kind_maps_to_catch_all() {
        let json = serde_json::json!({"kind": "decorator", "name": "x"});
        let node: RawNode = serde_json::from_value(json).expect("must not fail on unknown kinds");
        assert_eq!(node.kind, RawKind::Unknown);
    }
}
