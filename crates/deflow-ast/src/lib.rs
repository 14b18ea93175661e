//! Declaration tree layers for the deflow translator.
//!
//! Two representations live here:
//! - `raw` - the read-only tree handed over by the external front-end parser.
//!   deflow never mutates it and never re-parses source text.
//! - `decl` / `arena` - the wrapped, kind-typed declaration nodes the rest of
//!   the pipeline works on, stored in a flat arena indexed by `DeclId`.
//!
//! The `adapter` module performs the single wrapping pass from the former to
//! the latter.

// Raw tree - external parser boundary
pub mod raw;
pub use raw::{RawImportName, RawKind, RawModifier, RawNode, RawParam, RawTypeParam};

// Wrapped declaration nodes
pub mod decl;
pub use decl::{
    Decl, DeclKind, EnumMember, ImportClause, Member, Param, Signature, TypeParam,
};

// Arena storage for wrapped nodes
pub mod arena;
pub use arena::{DeclArena, DeclId};

// Raw tree -> arena wrapping pass
pub mod adapter;
pub use adapter::adapt;
