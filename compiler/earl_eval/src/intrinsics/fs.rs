//! Files and directories.

use std::fs;

use super::helpers::{require_args, require_str_arg};
use super::{Intrinsics, MemberFn};
use crate::errors::{io_error, wrong_arg_type, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::{FileHandle, FileRef, Value, ValueKind};

pub(super) fn register(table: &mut Intrinsics) {
    table.add_free("open", open);
    table.add_free("ls", ls);
    table.add_free("mkdir", mkdir);
    table.add_free("move", rename);

    table.add_member(ValueKind::File, "read", MemberFn::Read(read));
    table.add_member(ValueKind::File, "write", MemberFn::Read(write));
    table.add_member(ValueKind::File, "writelines", MemberFn::Read(writelines));
    table.add_member(ValueKind::File, "close", MemberFn::Read(close));
    table.add_member(ValueKind::File, "is_open", MemberFn::Read(is_open));
}

/// `open(path, mode)`
fn open(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    require_args("open", 2, args)?;
    let path = require_str_arg("open", args, 0)?;
    let mode = require_str_arg("open", args, 1)?;
    FileHandle::open(path, mode).map(Value::file)
}

/// `ls(dir)`: entry paths, sorted.
fn ls(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    require_args("ls", 1, args)?;
    let dir = require_str_arg("ls", args, 0)?;
    let context = || format!("cannot list {dir}");
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| io_error(&context(), &e))? {
        let entry = entry.map_err(|e| io_error(&context(), &e))?;
        entries.push(entry.path().display().to_string());
    }
    entries.sort_unstable();
    Ok(Value::List(entries.into_iter().map(Value::Str).collect()))
}

fn mkdir(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    require_args("mkdir", 1, args)?;
    let dir = require_str_arg("mkdir", args, 0)?;
    fs::create_dir(dir).map_err(|e| io_error(&format!("cannot create {dir}"), &e))?;
    tracing::debug!(dir, "created directory");
    Ok(Value::Unit)
}

/// `move(from, to)`
fn rename(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    require_args("move", 2, args)?;
    let from = require_str_arg("move", args, 0)?;
    let to = require_str_arg("move", args, 1)?;
    fs::rename(from, to).map_err(|e| io_error(&format!("cannot move {from} to {to}"), &e))?;
    tracing::debug!(from, to, "moved path");
    Ok(Value::Unit)
}

fn file_arg(recv: &Value) -> Result<&FileRef, EvalError> {
    match recv {
        Value::File(handle) => Ok(handle),
        _ => Err(wrong_arg_type("file member", "a file receiver")),
    }
}

fn read(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("read", 0, args)?;
    let text = file_arg(recv)?.borrow_mut().read_to_string()?;
    Ok(Value::Str(text))
}

/// `f.write(x)` writes `x` as `print` would render it, without a newline.
fn write(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("write", 1, args)?;
    file_arg(recv)?.borrow_mut().write_str(&args[0].to_string())?;
    Ok(Value::Unit)
}

/// `f.writelines(list)` writes each element followed by a newline.
fn writelines(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("writelines", 1, args)?;
    let Value::List(lines) = &args[0] else {
        return Err(wrong_arg_type("writelines", "a list argument"));
    };
    let mut handle = file_arg(recv)?.borrow_mut();
    for line in lines {
        handle.write_str(&line.to_string())?;
        handle.write_str("\n")?;
    }
    Ok(Value::Unit)
}

fn close(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("close", 0, args)?;
    file_arg(recv)?.borrow_mut().close()?;
    Ok(Value::Unit)
}

fn is_open(recv: &Value, args: &[Value]) -> EvalResult {
    require_args("is_open", 0, args)?;
    Ok(Value::Bool(file_arg(recv)?.borrow().is_open()))
}
