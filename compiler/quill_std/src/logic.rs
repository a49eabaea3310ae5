//! Boolean expansions over `"1"`/`"0"` text.

use quill_eval::{CallbackCallHandler, EvalResult, Flow, InterpreterContext};

use crate::value::{bool_to_str, require_arg_length, str_to_bool};

fn fold(ctx: &InterpreterContext, op: fn(bool, bool) -> bool) -> EvalResult<Flow<String>> {
    require_arg_length(ctx, 1)?;
    let value = ctx
        .args()
        .iter()
        .map(|arg| str_to_bool(arg))
        .reduce(op)
        .unwrap_or_default();
    Ok(Flow::Continue(bool_to_str(value).to_owned()))
}

/// `not`, plus `and`, `or` and `xor` folded over all arguments. With more
/// than two arguments `xor` is a parity check.
pub fn expansions() -> CallbackCallHandler<String> {
    CallbackCallHandler::new()
        .with_call("not", |_, ctx| {
            require_arg_length(ctx, 1)?;
            Ok(Flow::Continue(bool_to_str(!str_to_bool(&ctx.args()[0])).to_owned()))
        })
        .with_call("and", |_, ctx| fold(ctx, |a, b| a && b))
        .with_call("or", |_, ctx| fold(ctx, |a, b| a || b))
        .with_call("xor", |_, ctx| fold(ctx, |a, b| a ^ b))
}
