//! Intrinsics table.
//!
//! Free intrinsics are keyed by name and take precedence over user
//! functions. Member intrinsics are keyed by the receiver's [`ValueKind`]
//! and the member name. Every intrinsic validates its arity and argument
//! types before acting.
//!
//! Member intrinsics come in three shapes, matching how the receiver has
//! to be borrowed:
//!
//! - `Read` looks at the receiver in place,
//! - `Mutate` edits it in place (the receiver must be an assignable,
//!   non-`const` place for the change to stick),
//! - `Apply` calls back into the interpreter (closure arguments) and so
//!   works on a snapshot of the receiver.

mod collections;
mod dict;
mod free;
mod fs;
pub mod helpers;
mod string;

use earl_ir::Span;
use rustc_hash::FxHashMap;

use crate::errors::EvalResult;
use crate::interpreter::Interpreter;
use crate::value::{Value, ValueKind};

pub type FreeFn = fn(&mut Interpreter, &[Value]) -> EvalResult;

#[derive(Copy, Clone)]
pub enum MemberFn {
    Read(fn(&Value, &[Value]) -> EvalResult),
    Mutate(fn(&mut Value, &[Value]) -> EvalResult),
    Apply(fn(&mut Interpreter, &Value, &[Value], Span) -> EvalResult),
}

/// Registry of free and member intrinsics.
pub struct Intrinsics {
    free: FxHashMap<&'static str, FreeFn>,
    members: FxHashMap<ValueKind, FxHashMap<&'static str, MemberFn>>,
}

impl Intrinsics {
    pub fn new() -> Self {
        let mut table = Intrinsics {
            free: FxHashMap::default(),
            members: FxHashMap::default(),
        };
        free::register(&mut table);
        fs::register(&mut table);
        collections::register(&mut table);
        string::register(&mut table);
        dict::register(&mut table);
        table
    }

    pub(crate) fn add_free(&mut self, name: &'static str, f: FreeFn) {
        self.free.insert(name, f);
    }

    pub(crate) fn add_member(&mut self, kind: ValueKind, name: &'static str, f: MemberFn) {
        self.members.entry(kind).or_default().insert(name, f);
    }

    pub fn free(&self, name: &str) -> Option<FreeFn> {
        self.free.get(name).copied()
    }

    pub fn is_intrinsic(&self, name: &str) -> bool {
        self.free.contains_key(name)
    }

    pub fn member(&self, kind: ValueKind, name: &str) -> Option<MemberFn> {
        self.members.get(&kind)?.get(name).copied()
    }

    pub fn is_member_intrinsic(&self, kind: ValueKind, name: &str) -> bool {
        self.member(kind, name).is_some()
    }

    /// Sorted names of the free intrinsics.
    pub fn free_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.free.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Sorted member names available on `kind`.
    pub fn member_names(&self, kind: ValueKind) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .members
            .get(&kind)
            .map(|m| m.keys().copied().collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }
}

impl Default for Intrinsics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
