use std::fmt;
use std::rc::Rc;

use earl_ir::DefDecl;

use super::{ContextRef, WeakContextRef};

/// A declared function or method: its blueprint plus the context it was
/// declared in.
///
/// The owner is held weakly. Contexts own their functions, so a strong
/// back-reference would keep every world and instance alive forever.
pub struct Function {
    decl: Rc<DefDecl>,
    owner: WeakContextRef,
}

impl Function {
    pub fn new(decl: Rc<DefDecl>, owner: &ContextRef) -> Self {
        Function {
            decl,
            owner: owner.downgrade(),
        }
    }

    pub fn name(&self) -> &str {
        &self.decl.id
    }

    pub fn decl(&self) -> &Rc<DefDecl> {
        &self.decl
    }

    #[inline]
    pub fn is_pub(&self) -> bool {
        self.decl.attrs.is_pub()
    }

    pub fn arity(&self) -> usize {
        self.decl.params.len()
    }

    /// The declaring context, if it is still alive.
    pub fn owner(&self) -> Option<ContextRef> {
        self.owner.upgrade()
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.decl.id)
            .field("arity", &self.arity())
            .finish_non_exhaustive()
    }
}
