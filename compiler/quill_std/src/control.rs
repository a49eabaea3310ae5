//! Control calls: definitions, loops and conditionals.
//!
//! Every control receives the statement it governs through
//! [`InterpreterContext::control_node`]. Conditionals talk to each other
//! through the else-signal of the frame they appear in: `if` and `elif`
//! set it when their branch was skipped, `elif` and `else` consume it.

use quill_eval::{
    proceed, AstNode, CallbackCallHandler, EvalResult, Flow, Interpreter, InterpreterContext,
    NodeKind, NodeRef,
};
use tracing::debug;

use crate::value::{require_arg_length, str_to_bool};

fn governed_statement(ctx: &InterpreterContext) -> EvalResult<NodeRef> {
    match ctx.control_node() {
        Some(node) => Ok(node.clone()),
        None => Err(ctx.handler_error(format!("{}: missing statement to control", ctx.call_name()))),
    }
}

fn require_single_arg(ctx: &InterpreterContext) -> EvalResult<()> {
    if ctx.args().len() != 1 {
        return Err(ctx.handler_error(format!(
            "{}: needs one and only one argument",
            ctx.call_name()
        )));
    }
    Ok(())
}

/// Whether `body` contains a `return` command, making it an expansion body.
fn returns_value(body: &NodeRef) -> bool {
    let is_return = |node: &AstNode| {
        node.kind() == NodeKind::CommandCall
            && node.call_name().and_then(|name| name.str_content()) == Some("return")
    };
    is_return(body) || !body.find_all(&is_return).is_empty()
}

/// `!def(NAME PARAMS...) BODY`
fn def(ctx: &mut InterpreterContext) -> EvalResult<Flow> {
    require_arg_length(ctx, 1)?;
    let body = governed_statement(ctx)?;
    let (name, params) = (ctx.args()[0].clone(), ctx.args()[1..].to_vec());

    if returns_value(&body) {
        debug!(%name, ?params, "defining expansion");
        ctx.runtime_expansions().define(name, body, params);
    } else {
        debug!(%name, ?params, "defining command");
        ctx.runtime_commands().define(name, body, params);
    }
    Ok(Flow::CONTINUE)
}

/// `!repeat(N) BODY`; a negative count runs nothing.
fn repeat(interp: &Interpreter, ctx: &mut InterpreterContext) -> EvalResult<Flow> {
    if ctx.args().len() != 1 {
        return Err(ctx.handler_error(
            "repeat requires exactly one argument, the number of times to repeat",
        ));
    }
    let times = match ctx.args()[0].trim().parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            let message = format!("'{}' is not a valid integer", ctx.args()[0]);
            return Err(ctx.arg_error(0, message));
        }
    };
    let body = governed_statement(ctx)?;

    for _ in 0..times.max(0) {
        proceed!(interp.interpret_statement(ctx, &body)?);
    }
    Ok(Flow::CONTINUE)
}

/// `!for(NAME in ITEMS...) BODY`. The loop variable is removed afterwards,
/// however the loop ends.
fn for_(interp: &Interpreter, ctx: &mut InterpreterContext) -> EvalResult<Flow> {
    if ctx.args().len() < 3 {
        return Err(ctx.handler_error("bad format in !for: expected !for(VARNAME in ARGS)"));
    }
    if ctx.args()[1] != "in" {
        let message = format!("unexpected token '{}', should be 'in'", ctx.args()[1]);
        return Err(ctx.arg_error(1, message));
    }
    let body = governed_statement(ctx)?;
    let var = ctx.args()[0].clone();
    let items = ctx.args()[2..].to_vec();

    let result = run_for(interp, ctx, &var, items, &body);
    ctx.del_var(&var);
    result
}

fn run_for(
    interp: &Interpreter,
    ctx: &mut InterpreterContext,
    var: &str,
    items: Vec<String>,
    body: &NodeRef,
) -> EvalResult<Flow> {
    for item in items {
        ctx.set_var(var, item);
        proceed!(interp.interpret_statement(ctx, body)?);
    }
    Ok(Flow::CONTINUE)
}

/// Run `body` when `cond` holds, and tell the enclosing frame whether a
/// following `elif`/`else` should run.
fn branch(
    interp: &Interpreter,
    ctx: &mut InterpreterContext,
    cond: bool,
) -> EvalResult<Flow> {
    let body = governed_statement(ctx)?;
    if let Some(parent) = ctx.parent_call_context_mut() {
        parent.set_else_signal(!cond);
    }
    if cond {
        proceed!(interp.interpret_statement(ctx, &body)?);
    }
    Ok(Flow::CONTINUE)
}

fn if_(interp: &Interpreter, ctx: &mut InterpreterContext) -> EvalResult<Flow> {
    require_single_arg(ctx)?;
    let cond = str_to_bool(&ctx.args()[0]);
    branch(interp, ctx, cond)
}

fn elif(interp: &Interpreter, ctx: &mut InterpreterContext) -> EvalResult<Flow> {
    require_single_arg(ctx)?;
    if !ctx.parent_call_context().is_some_and(|p| p.else_signal()) {
        return Ok(Flow::CONTINUE);
    }
    let cond = str_to_bool(&ctx.args()[0]);
    branch(interp, ctx, cond)
}

fn else_(interp: &Interpreter, ctx: &mut InterpreterContext) -> EvalResult<Flow> {
    if !ctx.args().is_empty() {
        return Err(ctx.handler_error("else: does not take arguments"));
    }
    let body = governed_statement(ctx)?;
    let signalled = match ctx.parent_call_context_mut() {
        Some(parent) if parent.else_signal() => {
            parent.set_else_signal(false);
            true
        }
        _ => false,
    };
    if signalled {
        proceed!(interp.interpret_statement(ctx, &body)?);
    }
    Ok(Flow::CONTINUE)
}

/// `!while(COND) BODY`. The condition's source node is re-evaluated after
/// every pass, so `!while($(< $i 10))` sees the updated `$i`.
fn while_(interp: &Interpreter, ctx: &mut InterpreterContext) -> EvalResult<Flow> {
    require_single_arg(ctx)?;
    let body = governed_statement(ctx)?;
    let Some(cond_node) = ctx.arg_node(0).cloned() else {
        return Err(ctx.handler_error("while: condition has no source"));
    };
    let mut cond = ctx.args()[0].clone();

    while str_to_bool(&cond) {
        proceed!(interp.interpret_statement(ctx, &body)?);
        let words = proceed!(interp.interpret_string_or_expansion(ctx, &cond_node)?);
        cond = match words.into_iter().next() {
            Some(word) => word,
            None => return Err(ctx.handler_error("while: condition expanded to nothing")),
        };
    }
    Ok(Flow::CONTINUE)
}

pub fn controls() -> CallbackCallHandler<()> {
    CallbackCallHandler::new()
        .with_call("def", |_, ctx| def(ctx))
        .with_call("repeat", repeat)
        .with_call("for", for_)
        .with_call("if", if_)
        .with_call("elif", elif)
        .with_call("else", else_)
        .with_call("while", while_)
}

#[cfg(test)]
mod tests;
