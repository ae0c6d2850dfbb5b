use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use earl_ir::Attrs;

use crate::errors::{const_mutation, EvalError};
use crate::value::Value;

struct Slot {
    name: String,
    value: RefCell<Value>,
    attrs: Attrs,
}

/// A named, shared storage cell.
///
/// Cloning a `Variable` aliases the same cell; this is how `ref`
/// parameters see the caller's binding. `const` is checked on every write
/// through [`Variable::with_mut`].
#[derive(Clone)]
pub struct Variable(Rc<Slot>);

impl Variable {
    pub fn new(name: impl Into<String>, value: Value, attrs: Attrs) -> Self {
        Variable(Rc::new(Slot {
            name: name.into(),
            value: RefCell::new(value),
            attrs,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn attrs(&self) -> Attrs {
        self.0.attrs
    }

    #[inline]
    pub fn is_const(&self) -> bool {
        self.0.attrs.is_const()
    }

    #[inline]
    pub fn is_pub(&self) -> bool {
        self.0.attrs.is_pub()
    }

    /// The held value, copied out under binding semantics.
    pub fn get(&self) -> Value {
        self.0.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
        f(&self.0.value.borrow())
    }

    /// Mutate the held value in place; fails with `ConstError` on `const`
    /// bindings.
    pub fn with_mut<R>(
        &self,
        f: impl FnOnce(&mut Value) -> Result<R, EvalError>,
    ) -> Result<R, EvalError> {
        if self.is_const() {
            return Err(const_mutation(&self.0.name));
        }
        let mut slot = self
            .0
            .value
            .try_borrow_mut()
            .map_err(|_| EvalError::new(format!("`{}` is in use", self.0.name)))?;
        f(&mut slot)
    }

    pub fn ptr_eq(&self, other: &Variable) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("name", &self.0.name)
            .field("value", &*self.0.value.borrow())
            .field("attrs", &self.0.attrs)
            .finish()
    }
}
