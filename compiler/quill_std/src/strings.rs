//! String and vector expansions. A vector is a whitespace-separated string.

use quill_eval::{CallbackCallHandler, EvalResult, Flow, InterpreterContext};

use crate::value::{bool_to_str, require_arg_length, require_int};

fn ok(value: impl Into<String>) -> EvalResult<Flow<String>> {
    Ok(Flow::Continue(value.into()))
}

/// `getc STRING INDEX`; negative indices count from the end.
fn getc(ctx: &mut InterpreterContext) -> EvalResult<Flow<String>> {
    require_arg_length(ctx, 2)?;
    let index = require_int(ctx, 1)?;
    let text = &ctx.args()[0];
    let len = text.chars().count();
    let resolved = if index < 0 {
        usize::try_from(index.unsigned_abs()).ok().and_then(|back| len.checked_sub(back))
    } else {
        usize::try_from(index).ok()
    };
    match resolved.and_then(|i| text.chars().nth(i)) {
        Some(c) => ok(c),
        None => Err(ctx.arg_error(1, format!("getc: index {index} out of range"))),
    }
}

fn ord(ctx: &mut InterpreterContext) -> EvalResult<Flow<String>> {
    require_arg_length(ctx, 1)?;
    let mut chars = ctx.args()[0].chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => ok(u32::from(c).to_string()),
        _ => Err(ctx.arg_error(0, "ord: expected a single character")),
    }
}

fn chr(ctx: &mut InterpreterContext) -> EvalResult<Flow<String>> {
    require_arg_length(ctx, 1)?;
    let code = require_int(ctx, 0)?;
    match u32::try_from(code).ok().and_then(char::from_u32) {
        Some(c) => ok(c),
        None => Err(ctx.arg_error(0, format!("chr: {code} is not a valid character code"))),
    }
}

fn vhead(ctx: &mut InterpreterContext) -> EvalResult<Flow<String>> {
    require_arg_length(ctx, 1)?;
    match ctx.args()[0].split_whitespace().next() {
        Some(head) => ok(head),
        None => Err(ctx.arg_error(0, "vhead: vector is empty")),
    }
}

/// Everything after the first element, with the separating whitespace removed.
fn vtail(ctx: &mut InterpreterContext) -> EvalResult<Flow<String>> {
    require_arg_length(ctx, 1)?;
    let tail = ctx.args()[0]
        .trim_start()
        .split_once(char::is_whitespace)
        .map_or("", |(_, rest)| rest.trim_start());
    ok(tail)
}

/// Longest vector `rangev` will build.
pub const MAX_RANGE_LEN: i64 = 100_000;

/// `rangev START END`: the integers from START up to, not including, END.
fn rangev(ctx: &mut InterpreterContext) -> EvalResult<Flow<String>> {
    require_arg_length(ctx, 2)?;
    let (start, end) = (require_int(ctx, 0)?, require_int(ctx, 1)?);
    let len = i128::from(end) - i128::from(start);
    if len > i128::from(MAX_RANGE_LEN) {
        return Err(ctx.handler_error(format!(
            "rangev: range of {len} elements exceeds the limit of {MAX_RANGE_LEN}"
        )));
    }
    let words: Vec<String> = (start..end).map(|i| i.to_string()).collect();
    ok(words.join(" "))
}

pub fn expansions() -> CallbackCallHandler<String> {
    CallbackCallHandler::new()
        .with_call("cat", |_, ctx| ok(ctx.args().concat()))
        .with_alias("concat", "cat")
        .with_call("getc", |_, ctx| getc(ctx))
        .with_call("len", |_, ctx| {
            require_arg_length(ctx, 1)?;
            ok(ctx.args()[0].chars().count().to_string())
        })
        .with_call("ord", |_, ctx| ord(ctx))
        .with_call("chr", |_, ctx| chr(ctx))
        .with_call("vempty?", |_, ctx| {
            require_arg_length(ctx, 1)?;
            ok(bool_to_str(ctx.args()[0].is_empty()))
        })
        .with_call("vhead", |_, ctx| vhead(ctx))
        .with_call("vtail", |_, ctx| vtail(ctx))
        .with_call("vlen", |_, ctx| {
            require_arg_length(ctx, 1)?;
            ok(ctx.args()[0].split_whitespace().count().to_string())
        })
        .with_call("rangev", |_, ctx| rangev(ctx))
}

#[cfg(test)]
mod tests;
