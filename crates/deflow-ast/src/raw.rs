//! The raw declaration tree, as produced by an external front-end parser.
//!
//! deflow does not parse source text. The front end (typically the TypeScript
//! compiler API with a small dump script) materializes its AST into this
//! shape, either as JSON fed through serde or programmatically through the
//! builder-style constructors below. Every type position arrives as raw
//! type-reference text; deflow only rewrites qualified names inside it.
//!
//! The tree is read-only: the adapter wraps it into `DeclArena` nodes and the
//! raw tree is never touched again.

use deflow_common::Span;
use serde::{Deserialize, Serialize};

/// Discriminant over the supported raw declaration kinds.
///
/// `Unknown` is the catch-all for node kinds this translator does not
/// understand; the adapter turns those into unsupported-construct markers
/// instead of failing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RawKind {
    SourceFile,
    Interface,
    Class,
    TypeAlias,
    Enum,
    EnumMember,
    Function,
    Variable,
    Namespace,
    /// Ambient module block: `declare module "x" { ... }`.
    Module,
    /// `declare global { ... }`.
    Global,
    Import,
    ImportEquals,
    Property,
    Method,
    Constructor,
    GetAccessor,
    SetAccessor,
    CallSignature,
    ConstructSignature,
    IndexSignature,
    #[serde(other)]
    Unknown,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RawModifier {
    Export,
    Declare,
    Readonly,
    Static,
    Abstract,
    Const,
    Private,
    Protected,
    Public,
    Default,
}

/// A type parameter with optional constraint and default, both as raw text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawTypeParam {
    pub name: String,
    pub constraint: Option<String>,
    pub default: Option<String>,
}

/// A function/method/constructor parameter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawParam {
    pub name: String,
    pub type_text: Option<String>,
    pub optional: bool,
    pub rest: bool,
}

/// One binding of a named import clause (`{ name as alias }`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawImportName {
    pub name: String,
    pub alias: Option<String>,
}

/// One node of the externally-parsed tree.
///
/// Which fields are meaningful depends on `kind`; the rest stay at their
/// defaults. Containers (source file, namespace, module, global block,
/// interface, class, enum) carry their body in `children`, in source order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    pub kind: RawKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub modifiers: Vec<RawModifier>,
    #[serde(default)]
    pub type_parameters: Vec<RawTypeParam>,
    #[serde(default)]
    pub parameters: Vec<RawParam>,
    #[serde(default)]
    pub children: Vec<RawNode>,
    /// Type annotation, alias right-hand side, or return type, as raw text.
    #[serde(default)]
    pub type_text: Option<String>,
    /// Heritage type texts (`extends` clause entries).
    #[serde(default)]
    pub extends: Vec<String>,
    /// `implements` clause entries (classes only).
    #[serde(default)]
    pub implements: Vec<String>,
    /// Enum member initializer text.
    #[serde(default)]
    pub initializer: Option<String>,
    /// Import source (`from "x"`).
    #[serde(default)]
    pub module_specifier: Option<String>,
    /// Named import bindings; empty for star imports.
    #[serde(default)]
    pub import_names: Vec<RawImportName>,
    /// Dotted entity reference of an `import x = A.B;` declaration.
    #[serde(default)]
    pub reference_path: Option<String>,
    /// Optional marker on members (`name?: T`).
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub span: Span,
}

impl RawNode {
    pub fn new(kind: RawKind) -> RawNode {
        RawNode {
            kind,
            name: None,
            modifiers: Vec::new(),
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            children: Vec::new(),
            type_text: None,
            extends: Vec::new(),
            implements: Vec::new(),
            initializer: None,
            module_specifier: None,
            import_names: Vec::new(),
            reference_path: None,
            optional: false,
            span: Span::DUMMY,
        }
    }

    pub fn named(kind: RawKind, name: impl Into<String>) -> RawNode {
        let mut node = RawNode::new(kind);
        node.name = Some(name.into());
        node
    }

    /// A source-file root owning the given statements.
    pub fn source_file(statements: Vec<RawNode>) -> RawNode {
        let mut node = RawNode::new(RawKind::SourceFile);
        node.children = statements;
        node
    }

    pub fn with_child(mut self, child: RawNode) -> RawNode {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: Vec<RawNode>) -> RawNode {
        self.children.extend(children);
        self
    }

    pub fn with_modifier(mut self, modifier: RawModifier) -> RawNode {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_type_text(mut self, text: impl Into<String>) -> RawNode {
        self.type_text = Some(text.into());
        self
    }

    pub fn with_type_param(mut self, name: impl Into<String>) -> RawNode {
        self.type_parameters.push(RawTypeParam {
            name: name.into(),
            constraint: None,
            default: None,
        });
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, type_text: impl Into<String>) -> RawNode {
        self.parameters.push(RawParam {
            name: name.into(),
            type_text: Some(type_text.into()),
            optional: false,
            rest: false,
        });
        self
    }

    pub fn with_extends(mut self, text: impl Into<String>) -> RawNode {
        self.extends.push(text.into());
        self
    }

    pub fn with_implements(mut self, text: impl Into<String>) -> RawNode {
        self.implements.push(text.into());
        self
    }

    pub fn with_initializer(mut self, text: impl Into<String>) -> RawNode {
        self.initializer = Some(text.into());
        self
    }

    pub fn with_module_specifier(mut self, specifier: impl Into<String>) -> RawNode {
        self.module_specifier = Some(specifier.into());
        self
    }

    pub fn with_import_name(mut self, name: impl Into<String>) -> RawNode {
        self.import_names.push(RawImportName {
            name: name.into(),
            alias: None,
        });
        self
    }

    pub fn with_reference_path(mut self, path: impl Into<String>) -> RawNode {
        self.reference_path = Some(path.into());
        self
    }

    pub fn with_optional(mut self) -> RawNode {
        self.optional = true;
        self
    }

    pub fn with_span(mut self, span: Span) -> RawNode {
        self.span = span;
        self
    }

    pub fn has_modifier(&self, modifier: RawModifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}
