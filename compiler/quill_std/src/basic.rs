//! Variable and flow commands, plus the initializer that seeds `$true` and `$false`.

use quill_eval::{CallbackCallHandler, EvalResult, Flow, InterpreterContext};

use crate::value::{require_arg_length, FALSE, TRUE};

/// Seed the constants every script can rely on.
pub fn initialize(ctx: &mut InterpreterContext) -> EvalResult<()> {
    ctx.set_var("true", TRUE);
    ctx.set_var("false", FALSE);
    Ok(())
}

/// `set NAME VALUE...` stores the remaining arguments joined by spaces.
fn set(ctx: &mut InterpreterContext) -> EvalResult<Flow> {
    let Some((name, value)) = ctx.args().split_first() else {
        return Err(ctx.handler_error("set: variable name is not specified"));
    };
    let (name, value) = (name.clone(), value.join(" "));
    ctx.set_var(name, value);
    Ok(Flow::CONTINUE)
}

fn unset(ctx: &mut InterpreterContext) -> EvalResult<Flow> {
    let Some(name) = ctx.args().first().cloned() else {
        return Err(ctx.handler_error("unset: variable name is not specified"));
    };
    if ctx.del_var(&name).is_none() {
        return Err(ctx.handler_error(format!("unset: no such variable {name}")));
    }
    Ok(Flow::CONTINUE)
}

fn nonlocal(ctx: &mut InterpreterContext) -> EvalResult<Flow> {
    require_arg_length(ctx, 1)?;
    let name = ctx.args()[0].clone();
    ctx.vars_mut().declare_nonlocal(name);
    Ok(Flow::CONTINUE)
}

fn global(ctx: &mut InterpreterContext) -> EvalResult<Flow> {
    require_arg_length(ctx, 1)?;
    let name = ctx.args()[0].clone();
    ctx.vars_mut().declare_global(name);
    Ok(Flow::CONTINUE)
}

pub fn commands() -> CallbackCallHandler<()> {
    CallbackCallHandler::new()
        .with_call("set", |_, ctx| set(ctx))
        .with_call("unset", |_, ctx| unset(ctx))
        .with_call("nonlocal", |_, ctx| nonlocal(ctx))
        .with_call("global", |_, ctx| global(ctx))
        .with_call("stop", |_, _| Ok(Flow::Stop))
        .with_call("return", |_, ctx| Ok(Flow::Return(ctx.args().join(" "))))
}
