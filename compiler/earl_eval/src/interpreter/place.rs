//! Assignable locations.
//!
//! A [`Place`] is a root (a variable cell, or a temporary for receivers
//! that are not lvalues) plus a path of index values. Reads walk the path
//! and clone only what they return; writes walk it mutably inside a single
//! borrow of the root cell.
//!
//! Indexing a string yields a fresh `char`. Writing through a string
//! position edits that char and stores it back into the string.

use std::borrow::Cow;
use std::cell::RefCell;

use earl_ir::MutOp;
use smallvec::SmallVec;

use crate::context::Variable;
use crate::errors::{
    cannot_index, index_out_of_bounds, key_not_found, type_mismatch, EvalError, EvalResult,
};
use crate::intrinsics::helpers::checked_index;
use crate::mutation::{mutate, mutate_with};
use crate::value::Value;

pub(crate) enum PlaceRoot {
    Var(Variable),
    Temp(RefCell<Value>),
}

pub(crate) struct Place {
    root: PlaceRoot,
    path: SmallVec<[Value; 2]>,
}

impl Place {
    pub(crate) fn var(var: Variable) -> Self {
        Place {
            root: PlaceRoot::Var(var),
            path: SmallVec::new(),
        }
    }

    pub(crate) fn temp(value: Value) -> Self {
        Place {
            root: PlaceRoot::Temp(RefCell::new(value)),
            path: SmallVec::new(),
        }
    }

    pub(crate) fn push_index(&mut self, index: Value) {
        self.path.push(index);
    }

    pub(crate) fn read<R>(
        &self,
        f: impl FnOnce(&Value) -> Result<R, EvalError>,
    ) -> Result<R, EvalError> {
        match &self.root {
            PlaceRoot::Var(var) => var.with(|root| read_path(root, &self.path, f)),
            PlaceRoot::Temp(cell) => read_path(&cell.borrow(), &self.path, f),
        }
    }

    pub(crate) fn get(&self) -> EvalResult {
        self.read(|v| Ok(v.clone()))
    }

    /// Edit the value in place; `const` roots fail with `ConstError`.
    pub(crate) fn modify<R>(
        &self,
        f: impl FnOnce(&mut Value) -> Result<R, EvalError>,
    ) -> Result<R, EvalError> {
        match &self.root {
            PlaceRoot::Var(var) => var.with_mut(|root| modify_path(root, &self.path, f)),
            PlaceRoot::Temp(cell) => modify_path(&mut cell.borrow_mut(), &self.path, f),
        }
    }

    /// `place op= rhs`. Plain assignment to an absent dictionary key
    /// inserts it.
    pub(crate) fn assign(&self, op: MutOp, rhs: Value) -> Result<(), EvalError> {
        match self.path.split_last() {
            Some((key, parents)) if op == MutOp::Assign => {
                let store = |parent: &mut Value| assign_element(parent, key, rhs);
                match &self.root {
                    PlaceRoot::Var(var) => var.with_mut(|root| modify_path(root, parents, store)),
                    PlaceRoot::Temp(cell) => modify_path(&mut cell.borrow_mut(), parents, store),
                }
            }
            _ => self.modify(|slot| mutate_with(slot, op, rhs)),
        }
    }
}

fn char_at(s: &str, index: &Value) -> Result<(usize, char), EvalError> {
    let Value::Int(i) = index else {
        return Err(cannot_index("str", &index.type_name()));
    };
    let len = s.chars().count();
    let at = checked_index(*i, len)?;
    s.chars()
        .nth(at)
        .map(|c| (at, c))
        .ok_or_else(|| index_out_of_bounds(*i, len))
}

fn replace_char(s: &mut String, at: usize, c: char) {
    if let Some((offset, old)) = s.char_indices().nth(at) {
        s.replace_range(offset..offset + old.len_utf8(), c.encode_utf8(&mut [0; 4]));
    }
}

fn element<'a>(value: &'a Value, index: &Value) -> Result<Cow<'a, Value>, EvalError> {
    match (value, index) {
        (Value::List(xs) | Value::Tuple(xs), Value::Int(i)) => {
            Ok(Cow::Borrowed(&xs[checked_index(*i, xs.len())?]))
        }
        (Value::Str(s), _) => char_at(s, index).map(|(_, c)| Cow::Owned(Value::Char(c))),
        (Value::Dict(d), key) => d
            .get(key)?
            .map(Cow::Borrowed)
            .ok_or_else(|| key_not_found(&format!("{key:?}"))),
        _ => Err(cannot_index(&value.type_name(), &index.type_name())),
    }
}

fn element_mut<'a>(value: &'a mut Value, index: &Value) -> Result<&'a mut Value, EvalError> {
    match (value, index) {
        (Value::List(xs), Value::Int(i)) => {
            let at = checked_index(*i, xs.len())?;
            Ok(&mut xs[at])
        }
        (Value::Tuple(_), _) => Err(type_mismatch("a mutable collection", "tuple")),
        (Value::Dict(d), key) => d
            .get_mut(key)?
            .ok_or_else(|| key_not_found(&format!("{key:?}"))),
        (value, index) => Err(cannot_index(&value.type_name(), &index.type_name())),
    }
}

fn read_path<R>(
    root: &Value,
    path: &[Value],
    f: impl FnOnce(&Value) -> Result<R, EvalError>,
) -> Result<R, EvalError> {
    let mut cur = Cow::Borrowed(root);
    for index in path {
        cur = match cur {
            Cow::Borrowed(v) => element(v, index)?,
            Cow::Owned(v) => Cow::Owned(element(&v, index)?.into_owned()),
        };
    }
    f(&cur)
}

fn modify_path<R>(
    root: &mut Value,
    path: &[Value],
    f: impl FnOnce(&mut Value) -> Result<R, EvalError>,
) -> Result<R, EvalError> {
    let Some((last, parents)) = path.split_last() else {
        return f(root);
    };
    let mut cur = root;
    for index in parents {
        cur = element_mut(cur, index)?;
    }
    if let Value::Str(s) = &mut *cur {
        let (at, c) = char_at(s, last)?;
        let mut slot = Value::Char(c);
        let result = f(&mut slot)?;
        match slot {
            Value::Char(c) => replace_char(s, at, c),
            other => return Err(type_mismatch("char", &other.type_name())),
        }
        return Ok(result);
    }
    f(element_mut(cur, last)?)
}

fn assign_element(parent: &mut Value, key: &Value, rhs: Value) -> Result<(), EvalError> {
    match parent {
        Value::Dict(d) if !d.contains(key)? => d.insert(key, rhs),
        Value::Str(s) => {
            let (at, _) = char_at(s, key)?;
            match rhs {
                Value::Char(c) => {
                    replace_char(s, at, c);
                    Ok(())
                }
                other => Err(type_mismatch("char", &other.type_name())),
            }
        }
        other => mutate(element_mut(other, key)?, rhs),
    }
}
