//! Arithmetic expansions.
//!
//! | Call | Arguments | Result |
//! |------|-----------|--------|
//! | `+`, `*` | 1+ | left fold |
//! | `-` | 1 | negation |
//! | `-` | 2+ | first minus the sum of the rest |
//! | `/` | 2+ | first divided by the product of the rest, always a float |
//! | `//` | 2+ | as `/`, rounded toward negative infinity |
//! | `%` | 2 | remainder with the divisor's sign |
//! | `**` | 1+ | left fold of powers |
//! | `sqrt` | 1 | float |
//! | `round` | 1 or 2 | integer, or float rounded to N places |
//! | `floor`, `ceil`, `toint` | 1 | integer |
//! | `tofloat` | 1 | float |
//!
//! Integers are 64-bit; overflow is an error rather than a silent wrap.

use quill_eval::{CallbackCallHandler, EvalResult, Flow, InterpreterContext};

use crate::value::{
    float_to_int, require_all_numeric, require_arg_length, require_exact_args, require_int,
    require_numeric, Number,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Op {
    Add,
    Sub,
    Mul,
    TrueDiv,
    FloorDiv,
    Mod,
    Pow,
}

const DIVISION_BY_ZERO: &str = "division by zero";
const OVERFLOW: &str = "integer overflow";

fn apply(op: Op, a: Number, b: Number) -> Result<Number, &'static str> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => apply_int(op, x, y),
        _ => apply_float(op, a.as_f64(), b.as_f64()).map(Number::Float),
    }
}

fn apply_int(op: Op, x: i64, y: i64) -> Result<Number, &'static str> {
    let value = match op {
        Op::Add => x.checked_add(y),
        Op::Sub => x.checked_sub(y),
        Op::Mul => x.checked_mul(y),
        Op::TrueDiv => {
            return apply_float(op, Number::Int(x).as_f64(), Number::Int(y).as_f64())
                .map(Number::Float)
        }
        Op::FloorDiv | Op::Mod if y == 0 => return Err(DIVISION_BY_ZERO),
        Op::FloorDiv => floor_div(x, y),
        Op::Mod => floor_mod(x, y),
        Op::Pow => match u32::try_from(y) {
            Ok(exp) => x.checked_pow(exp),
            Err(_) if y < 0 => {
                return Ok(Number::Float(Number::Int(x).as_f64().powf(Number::Int(y).as_f64())))
            }
            Err(_) => None,
        },
    };
    value.map(Number::Int).ok_or(OVERFLOW)
}

fn apply_float(op: Op, x: f64, y: f64) -> Result<f64, &'static str> {
    Ok(match op {
        Op::Add => x + y,
        Op::Sub => x - y,
        Op::Mul => x * y,
        Op::TrueDiv | Op::FloorDiv | Op::Mod if y == 0.0 => return Err(DIVISION_BY_ZERO),
        Op::TrueDiv => x / y,
        Op::FloorDiv => (x / y).floor(),
        Op::Mod => {
            let r = x % y;
            if r != 0.0 && (r < 0.0) != (y < 0.0) {
                r + y
            } else {
                r
            }
        }
        Op::Pow => x.powf(y),
    })
}

fn floor_div(x: i64, y: i64) -> Option<i64> {
    let q = x.checked_div(y)?;
    if x % y != 0 && (x < 0) != (y < 0) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

fn floor_mod(x: i64, y: i64) -> Option<i64> {
    let r = x.checked_rem(y)?;
    if r != 0 && (r < 0) != (y < 0) {
        r.checked_add(y)
    } else {
        Some(r)
    }
}

fn result(ctx: &InterpreterContext, value: Result<Number, &'static str>) -> EvalResult<Flow<String>> {
    match value {
        Ok(n) => Ok(Flow::Continue(n.to_string())),
        Err(message) => Err(ctx.handler_error(format!("{}: {message}", ctx.call_name()))),
    }
}

fn fold(nums: &[Number], op: Op) -> Result<Number, &'static str> {
    let Some((&first, rest)) = nums.split_first() else {
        return Err("no operands");
    };
    rest.iter().try_fold(first, |acc, &n| apply(op, acc, n))
}

fn reduce(ctx: &mut InterpreterContext, op: Op) -> EvalResult<Flow<String>> {
    require_arg_length(ctx, 1)?;
    let nums = require_all_numeric(ctx, 0)?;
    result(ctx, fold(&nums, op))
}

/// `first final_op (rest folded with reduce_op)`.
fn mass(ctx: &mut InterpreterContext, reduce_op: Op, final_op: Op) -> EvalResult<Flow<String>> {
    require_arg_length(ctx, 2)?;
    if ctx.args().len() == 2 {
        let nums = require_all_numeric(ctx, 0)?;
        return result(ctx, apply(final_op, nums[0], nums[1]));
    }

    let mut first = require_numeric(ctx, 0)?;
    let rest = require_all_numeric(ctx, 1)?;
    let mut rest = match fold(&rest, reduce_op) {
        Ok(n) => n,
        Err(message) => return result(ctx, Err(message)),
    };
    if first.is_float() != rest.is_float() {
        first = first.to_float();
        rest = rest.to_float();
    }
    result(ctx, apply(final_op, first, rest))
}

fn sub(ctx: &mut InterpreterContext) -> EvalResult<Flow<String>> {
    require_arg_length(ctx, 1)?;
    if ctx.args().len() == 1 {
        let negated = match require_numeric(ctx, 0)? {
            Number::Int(i) => i.checked_neg().map(Number::Int).ok_or(OVERFLOW),
            Number::Float(f) => Ok(Number::Float(-f)),
        };
        return result(ctx, negated);
    }
    mass(ctx, Op::Add, Op::Sub)
}

fn modulo(ctx: &mut InterpreterContext) -> EvalResult<Flow<String>> {
    require_exact_args(ctx, 2)?;
    let nums = require_all_numeric(ctx, 0)?;
    result(ctx, apply(Op::Mod, nums[0], nums[1]))
}

/// Apply `op` to the first argument; further arguments are ignored.
fn unary(
    ctx: &mut InterpreterContext,
    op: fn(Number) -> Result<Number, &'static str>,
) -> EvalResult<Flow<String>> {
    require_arg_length(ctx, 1)?;
    let n = require_numeric(ctx, 0)?;
    result(ctx, op(n))
}

fn sqrt(n: Number) -> Result<Number, &'static str> {
    let x = n.as_f64();
    if x < 0.0 {
        return Err("math domain error");
    }
    Ok(Number::Float(x.sqrt()))
}

fn floor(n: Number) -> Result<Number, &'static str> {
    match n {
        Number::Int(_) => Ok(n),
        Number::Float(f) => float_to_int(f.floor()).ok_or(OVERFLOW),
    }
}

fn ceil(n: Number) -> Result<Number, &'static str> {
    match n {
        Number::Int(_) => Ok(n),
        Number::Float(f) => float_to_int(f.ceil()).ok_or(OVERFLOW),
    }
}

fn toint(n: Number) -> Result<Number, &'static str> {
    n.to_int().ok_or(OVERFLOW)
}

/// `round X` rounds half to even and yields an integer; `round X N` yields a
/// float with N decimal places.
fn round(ctx: &mut InterpreterContext) -> EvalResult<Flow<String>> {
    require_arg_length(ctx, 1)?;
    let x = require_numeric(ctx, 0)?.as_f64();
    if ctx.args().len() == 1 {
        return result(ctx, float_to_int(x.round_ties_even()).ok_or(OVERFLOW));
    }

    let places = require_int(ctx, 1)?;
    let places = i32::try_from(places).unwrap_or(if places < 0 { i32::MIN } else { i32::MAX });
    let scale = 10f64.powi(places);
    let rounded = if scale.is_finite() && scale != 0.0 {
        (x * scale).round_ties_even() / scale
    } else {
        x
    };
    result(ctx, Ok(Number::Float(rounded)))
}

pub fn expansions() -> CallbackCallHandler<String> {
    CallbackCallHandler::new()
        .with_call("+", |_, ctx| reduce(ctx, Op::Add))
        .with_call("-", |_, ctx| sub(ctx))
        .with_call("*", |_, ctx| reduce(ctx, Op::Mul))
        .with_call("/", |_, ctx| mass(ctx, Op::Mul, Op::TrueDiv))
        .with_call("//", |_, ctx| mass(ctx, Op::Mul, Op::FloorDiv))
        .with_call("%", |_, ctx| modulo(ctx))
        .with_call("**", |_, ctx| reduce(ctx, Op::Pow))
        .with_call("sqrt", |_, ctx| unary(ctx, sqrt))
        .with_call("round", |_, ctx| round(ctx))
        .with_call("floor", |_, ctx| unary(ctx, floor))
        .with_call("ceil", |_, ctx| unary(ctx, ceil))
        .with_call("toint", |_, ctx| unary(ctx, toint))
        .with_call("tofloat", |_, ctx| unary(ctx, |n| Ok(n.to_float())))
}

#[cfg(test)]
mod tests;
