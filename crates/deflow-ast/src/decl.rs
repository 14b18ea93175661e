//! Wrapped declaration nodes.
//!
//! One closed tagged variant per declaration kind the translator understands.
//! Printing dispatches by pattern matching over `DeclKind`, so an unsupported
//! kind that slips through the adapter is a compile-time hole, not a runtime
//! surprise.
//!
//! Nodes are created once by the adapter and are immutable afterwards, with
//! one exception: the reference-resolution phase rewrites the qualified-name
//! text embedded in type positions. Structural shape never changes.

use crate::arena::DeclId;
use deflow_common::Span;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decl {
    pub name: String,
    pub span: Span,
    /// Carries the `export` modifier.
    pub exported: bool,
    /// Has the `declare` modifier or sits inside an ambient container.
    pub ambient: bool,
    pub kind: DeclKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclKind {
    Interface {
        type_params: Vec<TypeParam>,
        extends: Vec<String>,
        members: Vec<Member>,
    },
    Class {
        type_params: Vec<TypeParam>,
        extends: Option<String>,
        implements: Vec<String>,
        members: Vec<Member>,
    },
    TypeAlias {
        type_params: Vec<TypeParam>,
        aliased: String,
    },
    Enum {
        is_const: bool,
        members: Vec<EnumMember>,
    },
    Function {
        signature: Signature,
    },
    Variable {
        is_const: bool,
        type_text: Option<String>,
    },
    Namespace {
        children: Vec<DeclId>,
    },
    /// Ambient module block; `name` holds the module specifier string.
    Module {
        children: Vec<DeclId>,
    },
    /// `declare global { ... }`; contributes its children to the root scope.
    GlobalAugmentation {
        children: Vec<DeclId>,
    },
    ImportBinding {
        specifier: String,
        clause: ImportClause,
    },
    /// `import name = A.B;` - target stored as path segments.
    ImportEquals {
        target: Vec<String>,
    },
    /// Marker for a raw node kind the wrapper layer does not recognize.
    /// Emits nothing.
    Unsupported {
        raw_kind: String,
    },
}

impl DeclKind {
    /// Kinds that introduce a nested declaration scope.
    pub fn children(&self) -> Option<&[DeclId]> {
        match self {
            DeclKind::Namespace { children }
            | DeclKind::Module { children }
            | DeclKind::GlobalAugmentation { children } => Some(children),
            _ => None,
        }
    }

    /// Whether this declaration produces a runtime value in the source
    /// dialect (as opposed to a pure type).
    pub const fn is_runtime_value(&self) -> bool {
        matches!(
            self,
            DeclKind::Class { .. }
                | DeclKind::Enum { .. }
                | DeclKind::Function { .. }
                | DeclKind::Variable { .. }
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportClause {
    /// `import * as binding from "mod";`
    Star { binding: String },
    /// `import { a, b as c } from "mod";`
    Named { names: Vec<(String, Option<String>)> },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeParam {
    pub name: String,
    pub constraint: Option<String>,
    pub default: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub type_text: Option<String>,
    pub optional: bool,
    pub rest: bool,
}

/// A call signature: type parameters, parameters, and return type text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Signature {
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub return_type: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub initializer: Option<String>,
    pub span: Span,
}

/// A member of an interface or class body, in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Member {
    Property {
        name: String,
        type_text: Option<String>,
        optional: bool,
        readonly: bool,
        is_static: bool,
        span: Span,
    },
    Method {
        name: String,
        signature: Signature,
        optional: bool,
        is_static: bool,
        span: Span,
    },
    Constructor {
        signature: Signature,
        span: Span,
    },
    CallSignature {
        signature: Signature,
        span: Span,
    },
    ConstructSignature {
        signature: Signature,
        span: Span,
    },
    IndexSignature {
        key_name: String,
        key_type: String,
        value_type: String,
        readonly: bool,
        span: Span,
    },
}

impl Member {
    pub fn name(&self) -> Option<&str> {
        match self {
            Member::Property { name, .. } | Member::Method { name, .. } => Some(name),
            _ => None,
        }
    }
}
