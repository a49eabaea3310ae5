//! Text-to-value conversions shared by the standard handlers.
//!
//! Scripts only manipulate text. Booleans are `"1"` and `"0"`, where every
//! string other than `"0"` counts as true. Numbers are integers when the text
//! parses as one and floats otherwise; mixing the two promotes to float.

use std::cmp::Ordering;
use std::fmt;

use quill_eval::{EvalError, EvalResult, InterpreterContext};

pub const TRUE: &str = "1";
pub const FALSE: &str = "0";

pub fn bool_to_str(b: bool) -> &'static str {
    if b {
        TRUE
    } else {
        FALSE
    }
}

pub fn str_to_bool(s: &str) -> bool {
    s != FALSE
}

/// A parsed numeric argument.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn parse(s: &str) -> Option<Number> {
        let s = s.trim();
        if let Ok(i) = s.parse::<i64>() {
            return Some(Number::Int(i));
        }
        s.parse::<f64>().ok().map(Number::Float)
    }

    pub fn is_float(self) -> bool {
        matches!(self, Number::Float(_))
    }

    #[expect(clippy::cast_precision_loss, reason = "promotion to float is the language semantics")]
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub fn to_float(self) -> Number {
        Number::Float(self.as_f64())
    }

    /// Truncate toward zero.
    pub fn to_int(self) -> Option<Number> {
        match self {
            Number::Int(_) => Some(self),
            Number::Float(f) => float_to_int(f.trunc()),
        }
    }

    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

/// Whole-valued float to integer, if it fits.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "range is checked before the cast"
)]
pub fn float_to_int(f: f64) -> Option<Number> {
    if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(Number::Int(f as i64))
    } else {
        None
    }
}

/// Integers print plainly; floats always show a fractional part (`3.0`).
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(x) if x.is_nan() => f.write_str("nan"),
            Number::Float(x) if x.is_infinite() => f.write_str(if x > 0.0 { "inf" } else { "-inf" }),
            Number::Float(x) if x.fract() == 0.0 && x.abs() < 1e16 => write!(f, "{x:.1}"),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

// --- argument checks ---

/// Fail unless the current call has at least `n` arguments.
pub fn require_arg_length(ctx: &InterpreterContext, n: usize) -> EvalResult<()> {
    if ctx.args().len() < n {
        let plural = if n == 1 { "" } else { "s" };
        return Err(ctx.handler_error(format!(
            "{} requires at least {n} argument{plural}",
            ctx.call_name()
        )));
    }
    Ok(())
}

/// Fail unless the current call has exactly `n` arguments.
pub fn require_exact_args(ctx: &InterpreterContext, n: usize) -> EvalResult<()> {
    if ctx.args().len() != n {
        let plural = if n == 1 { "" } else { "s" };
        return Err(ctx.handler_error(format!(
            "{}: must have exactly {n} arg{plural}",
            ctx.call_name()
        )));
    }
    Ok(())
}

/// Parse argument `index` as a number, blaming that argument's source on failure.
pub fn require_numeric(ctx: &InterpreterContext, index: usize) -> EvalResult<Number> {
    let Some(text) = ctx.args().get(index) else {
        return Err(ctx.handler_error(format!("{}: missing argument", ctx.call_name())));
    };
    Number::parse(text).ok_or_else(|| not_numeric(ctx, index, text))
}

/// Parse every argument from `from` on. If any is a float, all become floats.
pub fn require_all_numeric(ctx: &InterpreterContext, from: usize) -> EvalResult<Vec<Number>> {
    let mut nums = Vec::with_capacity(ctx.args().len().saturating_sub(from));
    for index in from..ctx.args().len() {
        nums.push(require_numeric(ctx, index)?);
    }
    if nums.iter().any(|n| n.is_float()) {
        for n in &mut nums {
            *n = n.to_float();
        }
    }
    Ok(nums)
}

/// Parse argument `index` as an integer, truncating floats.
pub fn require_int(ctx: &InterpreterContext, index: usize) -> EvalResult<i64> {
    match require_numeric(ctx, index)?.to_int() {
        Some(Number::Int(i)) => Ok(i),
        _ => Err(ctx.arg_error(
            index,
            format!("{}: {} is out of integer range", ctx.call_name(), ctx.args()[index]),
        )),
    }
}

#[cold]
fn not_numeric(ctx: &InterpreterContext, index: usize, text: &str) -> EvalError {
    ctx.arg_error(
        index,
        format!("{}: {text} is not a valid int or float", ctx.call_name()),
    )
}
