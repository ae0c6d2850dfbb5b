//! Insertion-ordered dictionaries with a fixed key kind.

use std::fmt;

use indexmap::IndexMap;

use super::{write_nested, Value, ValueKind};
use crate::errors::{type_mismatch, EvalError};

/// Kinds of value usable as dictionary keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Int,
    Bool,
    Char,
    Str,
}

impl KeyKind {
    fn value_kind(self) -> ValueKind {
        match self {
            KeyKind::Int => ValueKind::Int,
            KeyKind::Bool => ValueKind::Bool,
            KeyKind::Char => ValueKind::Char,
            KeyKind::Str => ValueKind::Str,
        }
    }
}

/// A hashable dictionary key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DictKey {
    Int(i64),
    Bool(bool),
    Char(char),
    Str(String),
}

impl DictKey {
    /// Convert a value into a key; floats, collections and handles are
    /// not hashable.
    pub fn from_value(v: &Value) -> Result<Self, EvalError> {
        match v {
            Value::Int(n) => Ok(DictKey::Int(*n)),
            Value::Bool(b) => Ok(DictKey::Bool(*b)),
            Value::Char(c) => Ok(DictKey::Char(*c)),
            Value::Str(s) => Ok(DictKey::Str(s.clone())),
            other => Err(type_mismatch("a hashable dict key", &other.type_name())),
        }
    }

    pub fn kind(&self) -> KeyKind {
        match self {
            DictKey::Int(_) => KeyKind::Int,
            DictKey::Bool(_) => KeyKind::Bool,
            DictKey::Char(_) => KeyKind::Char,
            DictKey::Str(_) => KeyKind::Str,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            DictKey::Int(n) => Value::Int(*n),
            DictKey::Bool(b) => Value::Bool(*b),
            DictKey::Char(c) => Value::Char(*c),
            DictKey::Str(s) => Value::Str(s.clone()),
        }
    }
}

/// Dictionary value. The key kind is fixed by the literal's annotation or
/// by the first key inserted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DictValue {
    key_kind: Option<KeyKind>,
    entries: IndexMap<DictKey, Value>,
}

impl DictValue {
    pub fn new(key_kind: Option<KeyKind>) -> Self {
        DictValue {
            key_kind,
            entries: IndexMap::new(),
        }
    }

    pub fn key_kind(&self) -> Option<KeyKind> {
        self.key_kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert and kind-check a key against this dictionary.
    pub fn key(&self, v: &Value) -> Result<DictKey, EvalError> {
        let key = DictKey::from_value(v)?;
        match self.key_kind {
            Some(kind) if kind != key.kind() => {
                Err(type_mismatch(kind.value_kind().as_str(), &v.type_name()))
            }
            _ => Ok(key),
        }
    }

    /// Insert or overwrite. The first key fixes the key kind.
    pub fn insert(&mut self, key: &Value, value: Value) -> Result<(), EvalError> {
        let key = self.key(key)?;
        self.key_kind.get_or_insert(key.kind());
        self.entries.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &Value) -> Result<Option<&Value>, EvalError> {
        let key = self.key(key)?;
        Ok(self.entries.get(&key))
    }

    pub fn get_mut(&mut self, key: &Value) -> Result<Option<&mut Value>, EvalError> {
        let key = self.key(key)?;
        Ok(self.entries.get_mut(&key))
    }

    pub fn contains(&self, key: &Value) -> Result<bool, EvalError> {
        let key = self.key(key)?;
        Ok(self.entries.contains_key(&key))
    }

    /// Remove a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &Value) -> Result<Option<Value>, EvalError> {
        let key = self.key(key)?;
        Ok(self.entries.shift_remove(&key))
    }

    pub fn keys(&self) -> impl Iterator<Item = Value> + '_ {
        self.entries.keys().map(DictKey::to_value)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.entries.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DictKey, &Value)> + '_ {
        self.entries.iter()
    }

    #[must_use]
    pub fn copy(&self) -> DictValue {
        DictValue {
            key_kind: self.key_kind,
            entries: self
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), v.copy()))
                .collect(),
        }
    }
}

impl fmt::Display for DictValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write_nested(f, &k.to_value())?;
            f.write_str(": ")?;
            write_nested(f, v)?;
        }
        f.write_str("}")
    }
}
