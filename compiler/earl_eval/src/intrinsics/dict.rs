//! Dictionary and option members.

use super::helpers::{len_to_value, require_args};
use super::{Intrinsics, MemberFn};
use crate::errors::{key_not_found, type_mismatch, EvalError, EvalResult};
use crate::value::{DictValue, Value, ValueKind};

pub(super) fn register(table: &mut Intrinsics) {
    use MemberFn::{Mutate, Read};

    let dict = ValueKind::Dict;
    table.add_member(dict, "len", Read(len));
    table.add_member(dict, "has_key", Read(has_key));
    table.add_member(dict, "get", Read(get));
    table.add_member(dict, "keys", Read(keys));
    table.add_member(dict, "values", Read(values));
    table.add_member(dict, "insert", Mutate(insert));
    table.add_member(dict, "remove", Mutate(remove));

    let option = ValueKind::Option;
    table.add_member(option, "is_some", Read(is_some));
    table.add_member(option, "is_none", Read(is_none));
    table.add_member(option, "unwrap", Read(unwrap));
    table.add_member(option, "unwrap_or", Read(unwrap_or));
}

fn dict_ref(recv: &Value) -> Result<&DictValue, EvalError> {
    match recv {
        Value::Dict(d) => Ok(d),
        other => Err(type_mismatch("dict", &other.type_name())),
    }
}

fn dict_mut(recv: &mut Value) -> Result<&mut DictValue, EvalError> {
    match recv {
        Value::Dict(d) => Ok(d),
        other => Err(type_mismatch("dict", &other.type_name())),
    }
}

fn len(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("len", 0, args)?;
    Ok(len_to_value(dict_ref(recv)?.len()))
}

fn has_key(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("has_key", 1, args)?;
    dict_ref(recv)?.contains(&args[0]).map(Value::Bool)
}

/// `d.get(k)`: `some(value)` or `none`.
fn get(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("get", 1, args)?;
    Ok(dict_ref(recv)?
        .get(&args[0])?
        .map_or_else(Value::none, |v| Value::some(v.clone())))
}

fn keys(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("keys", 0, args)?;
    Ok(Value::List(dict_ref(recv)?.keys().collect()))
}

fn values(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("values", 0, args)?;
    Ok(Value::List(dict_ref(recv)?.values().cloned().collect()))
}

fn insert(recv: &mut Value, args: &[Value]) -> EvalResult {
    require_args("insert", 2, args)?;
    dict_mut(recv)?.insert(&args[0], args[1].clone())?;
    Ok(Value::Unit)
}

/// Removing an absent key is an `IndexError`.
fn remove(recv: &mut Value, args: &[Value]) -> EvalResult {
    require_args("remove", 1, args)?;
    match dict_mut(recv)?.remove(&args[0])? {
        Some(_) => Ok(Value::Unit),
        None => Err(key_not_found(&format!("{:?}", args[0]))),
    }
}

fn option(recv: &Value) -> Result<Option<&Value>, EvalError> {
    match recv {
        Value::Option(opt) => Ok(opt.as_deref()),
        other => Err(type_mismatch("option", &other.type_name())),
    }
}

fn is_some(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("is_some", 0, args)?;
    Ok(Value::Bool(option(recv)?.is_some()))
}

fn is_none(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("is_none", 0, args)?;
    Ok(Value::Bool(option(recv)?.is_none()))
}

/// Unwrapping `none` is fatal.
fn unwrap(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("unwrap", 0, args)?;
    option(recv)?
        .cloned()
        .ok_or_else(|| EvalError::new("called unwrap on none"))
}

fn unwrap_or(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("unwrap_or", 1, args)?;
    Ok(option(recv)?.cloned().unwrap_or_else(|| args[0].clone()))
}
