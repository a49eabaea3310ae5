//! File access through handles stored in the context's resource table.
//!
//! Not part of the default set: a host has to opt in with
//! [`register_files`](crate::register_files), since these calls reach the
//! host filesystem.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};

use quill_eval::{CallbackCallHandler, EvalError, EvalResult, Flow, InterpreterContext};
use tracing::debug;

use crate::value::{require_arg_length, require_int};

fn open_options(mode: &str) -> Option<OpenOptions> {
    let mut options = OpenOptions::new();
    match mode {
        "r" => options.read(true),
        "w" => options.write(true).create(true).truncate(true),
        "a" => options.append(true).create(true),
        "r+" => options.read(true).write(true),
        _ => return None,
    };
    Some(options)
}

/// `$(file-open PATH [MODE])`, mode `r` by default. Returns the handle.
fn open(ctx: &mut InterpreterContext) -> EvalResult<Flow<String>> {
    require_arg_length(ctx, 1)?;
    let path = ctx.args()[0].clone();
    let mode = ctx.args().get(1).map_or("r", String::as_str);
    let Some(options) = open_options(mode) else {
        return Err(ctx.arg_error(1, format!("file-open: unsupported mode {mode:?}")));
    };
    let file = match options.open(&path) {
        Ok(file) => file,
        Err(e) => return Err(ctx.arg_error(0, format!("file-open: {path}: {e}"))),
    };
    let id = ctx.insert_resource(file);
    debug!(%path, id, "opened file");
    Ok(Flow::Continue(id.to_string()))
}

/// Handle of the open file named by argument 0.
fn handle(ctx: &InterpreterContext) -> EvalResult<u64> {
    require_arg_length(ctx, 1)?;
    let id = require_int(ctx, 0)?;
    u64::try_from(id)
        .ok()
        .filter(|&id| ctx.resource::<File>(id).is_some())
        .ok_or_else(|| ctx.arg_error(0, format!("{}: no open file {id}", ctx.call_name())))
}

fn with_file<R>(
    ctx: &mut InterpreterContext,
    op: impl FnOnce(&mut File) -> std::io::Result<R>,
) -> EvalResult<R> {
    let id = handle(ctx)?;
    let result = match ctx.resource_mut::<File>(id) {
        Some(file) => op(file),
        None => return Err(ctx.raise(EvalError::internal("open file missing from resource table"))),
    };
    result.map_err(|e| ctx.handler_error(format!("{}: {e}", ctx.call_name())))
}

fn read(ctx: &mut InterpreterContext) -> EvalResult<Flow<String>> {
    let mut contents = String::new();
    with_file(ctx, |file| file.read_to_string(&mut contents))?;
    Ok(Flow::Continue(contents))
}

/// `file-write ID TEXT...` writes the remaining arguments joined by spaces.
fn write(ctx: &mut InterpreterContext) -> EvalResult<Flow> {
    let text = ctx.args().get(1..).unwrap_or_default().join(" ");
    with_file(ctx, |file| file.write_all(text.as_bytes()))?;
    Ok(Flow::CONTINUE)
}

fn close(ctx: &mut InterpreterContext) -> EvalResult<Flow> {
    let id = handle(ctx)?;
    ctx.close_resource(id);
    debug!(id, "closed file");
    Ok(Flow::CONTINUE)
}

pub fn commands() -> CallbackCallHandler<()> {
    CallbackCallHandler::new()
        .with_call("file-write", |_, ctx| write(ctx))
        .with_call("file-close", |_, ctx| close(ctx))
}

pub fn expansions() -> CallbackCallHandler<String> {
    CallbackCallHandler::new()
        .with_call("file-open", |_, ctx| open(ctx))
        .with_call("file-read", |_, ctx| read(ctx))
}
