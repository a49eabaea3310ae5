//! Comparison expansions. `eq?` compares numerically when both sides are
//! numbers and as text otherwise; `===` always compares text.

use std::cmp::Ordering;

use quill_eval::{CallbackCallHandler, EvalResult, Flow, InterpreterContext};

use crate::value::{bool_to_str, require_all_numeric, require_exact_args, Number};

fn loose_equals(ctx: &InterpreterContext) -> EvalResult<bool> {
    require_exact_args(ctx, 2)?;
    let (a, b) = (&ctx.args()[0], &ctx.args()[1]);
    Ok(match (Number::parse(a), Number::parse(b)) {
        (Some(x), Some(y)) => x.compare(y) == Some(Ordering::Equal),
        _ => a == b,
    })
}

fn ordered(ctx: &InterpreterContext, test: fn(Ordering) -> bool) -> EvalResult<Flow<String>> {
    require_exact_args(ctx, 2)?;
    let nums = require_all_numeric(ctx, 0)?;
    let holds = nums[0].compare(nums[1]).is_some_and(test);
    Ok(Flow::Continue(bool_to_str(holds).to_owned()))
}

fn flag(b: bool) -> EvalResult<Flow<String>> {
    Ok(Flow::Continue(bool_to_str(b).to_owned()))
}

pub fn expansions() -> CallbackCallHandler<String> {
    CallbackCallHandler::new()
        .with_call("eq?", |_, ctx| flag(loose_equals(ctx)?))
        .with_alias("==", "eq?")
        .with_call("neq?", |_, ctx| flag(!loose_equals(ctx)?))
        .with_alias("!=", "neq?")
        .with_call("===", |_, ctx| {
            require_exact_args(ctx, 2)?;
            flag(ctx.args()[0] == ctx.args()[1])
        })
        .with_call(">", |_, ctx| ordered(ctx, Ordering::is_gt))
        .with_call("<", |_, ctx| ordered(ctx, Ordering::is_lt))
        .with_call(">=", |_, ctx| ordered(ctx, Ordering::is_ge))
        .with_call("<=", |_, ctx| ordered(ctx, Ordering::is_le))
        .with_call("in?", |_, ctx| {
            let Some((needle, haystack)) = ctx.args().split_first() else {
                return Err(ctx.handler_error(format!(
                    "{} requires at least one argument",
                    ctx.call_name()
                )));
            };
            flag(haystack.contains(needle))
        })
}
