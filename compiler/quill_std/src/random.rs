//! Random choice, permutation and sampling, drawn from the thread-local RNG.

use quill_eval::{CallbackCallHandler, EvalResult, Flow, InterpreterContext};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::value::{require_arg_length, Number};

fn select(ctx: &mut InterpreterContext) -> EvalResult<Flow<String>> {
    require_arg_length(ctx, 1)?;
    let choice = ctx.args().choose(&mut rand::thread_rng()).cloned().unwrap_or_default();
    Ok(Flow::Continue(choice))
}

fn shuffle(ctx: &mut InterpreterContext) -> EvalResult<Flow<String>> {
    let mut items = ctx.args().to_vec();
    items.shuffle(&mut rand::thread_rng());
    Ok(Flow::Continue(items.join(" ")))
}

/// `uniform A B`: a float between the two bounds, in either order.
fn uniform(ctx: &mut InterpreterContext) -> EvalResult<Flow<String>> {
    let [a, b] = ctx.args() else {
        return Err(ctx.handler_error(format!(
            "uniform: must have two args. (got {})",
            ctx.args().join(", ")
        )));
    };
    let mut bounds = [0.0; 2];
    for (index, text) in [a, b].into_iter().enumerate() {
        bounds[index] = match Number::parse(text).map(Number::as_f64) {
            Some(x) if x.is_finite() => x,
            _ => {
                return Err(ctx.arg_error(index, format!("uniform: {text} is not a finite number")));
            }
        };
    }
    let (lo, hi) = (bounds[0].min(bounds[1]), bounds[0].max(bounds[1]));
    if !(hi - lo).is_finite() {
        return Err(ctx.handler_error("uniform: range is too wide"));
    }
    let x = rand::thread_rng().gen_range(lo..=hi);
    Ok(Flow::Continue(Number::Float(x).to_string()))
}

pub fn expansions() -> CallbackCallHandler<String> {
    CallbackCallHandler::new()
        .with_call("select", |_, ctx| select(ctx))
        .with_call("shuffle", |_, ctx| shuffle(ctx))
        .with_call("uniform", |_, ctx| uniform(ctx))
}
