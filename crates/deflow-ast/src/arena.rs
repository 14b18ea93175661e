//! Flat arena storage for wrapped declaration nodes.
//!
//! Declarations reference each other by `DeclId`, never by direct ownership,
//! so mutually-referring namespaces are representable without ownership
//! cycles. The arena is built once per translation run and discarded with it.

use crate::decl::Decl;

/// Index of a declaration inside its `DeclArena`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub u32);

impl DeclId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Default)]
pub struct DeclArena {
    decls: Vec<Decl>,
    /// Top-level statements of the translated document, in source order.
    pub roots: Vec<DeclId>,
}

impl DeclArena {
    pub fn new() -> DeclArena {
        DeclArena {
            decls: Vec::new(),
            roots: Vec::new(),
        }
    }

    pub fn alloc(&mut self, decl: Decl) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.decls.push(decl);
        id
    }

    pub fn get(&self, id: DeclId) -> &Decl {
        &self.decls[id.index()]
    }

    pub fn get_mut(&mut self, id: DeclId) -> &mut Decl {
        &mut self.decls[id.index()]
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Decl)> {
        self.decls
            .iter()
            .enumerate()
            .map(|(i, decl)| (DeclId(i as u32), decl))
    }
}
