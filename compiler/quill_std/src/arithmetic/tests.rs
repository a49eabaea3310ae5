use pretty_assertions::assert_eq;
use proptest::prelude::*;
use quill_eval::SourcePos;

use super::*;
use crate::test_helpers::{error, eval, eval_error};

#[test]
fn sums_and_products_fold_left() {
    assert_eq!(eval("+ 1 2 3"), "6");
    assert_eq!(eval("+ 5"), "5");
    assert_eq!(eval("+ 1 2.5"), "3.5");
    assert_eq!(eval("* 2 3 4"), "24");
    assert_eq!(eval("* 2 0.5"), "1.0");
}

#[test]
fn minus_negates_or_subtracts_the_rest() {
    assert_eq!(eval("- 4"), "-4");
    assert_eq!(eval("- 2.5"), "-2.5");
    assert_eq!(eval("- 10 3"), "7");
    assert_eq!(eval("- 10 1 2 3"), "4");
    assert_eq!(eval("- 10 1.5 2"), "6.5");
}

#[test]
fn true_division_always_gives_a_float() {
    assert_eq!(eval("/ 6 2"), "3.0");
    assert_eq!(eval("/ 7 2"), "3.5");
    assert_eq!(eval("/ 20 2 5"), "2.0");
}

#[test]
fn floor_division_and_modulo_round_down() {
    assert_eq!(eval("// 5 2"), "2");
    assert_eq!(eval("// -7 2"), "-4");
    assert_eq!(eval("// 20 2 3"), "3");
    assert_eq!(eval("// 7.5 2"), "3.0");
    assert_eq!(eval("% 5 2"), "1");
    assert_eq!(eval("% -7 3"), "2");
    assert_eq!(eval("% 7 -3"), "-2");
    assert_eq!(eval("% 5.5 2"), "1.5");
}

#[test]
fn powers_fold_left() {
    assert_eq!(eval("** 2 3"), "8");
    assert_eq!(eval("** 2 3 4"), "4096");
    assert_eq!(eval("** 2 -1"), "0.5");
    assert_eq!(eval("** 4 0.5"), "2.0");
}

#[test]
fn unary_functions() {
    assert_eq!(eval("sqrt 16"), "4.0");
    assert_eq!(eval("floor 4.6"), "4");
    assert_eq!(eval("floor -4.6"), "-5");
    assert_eq!(eval("ceil 4.6"), "5");
    assert_eq!(eval("ceil -4.6"), "-4");
    assert_eq!(eval("toint 3.9"), "3");
    assert_eq!(eval("toint -3.9"), "-3");
    assert_eq!(eval("tofloat 2"), "2.0");
}

#[test]
fn round_to_integer_or_places() {
    assert_eq!(eval("round 4.7281"), "5");
    assert_eq!(eval("round 2.5"), "2");
    assert_eq!(eval("round 3.5"), "4");
    assert_eq!(eval("round 4.7281 2"), "4.73");
    assert_eq!(eval("round 4.7281 0"), "5.0");
}

#[test]
fn arithmetic_errors_name_the_call() {
    assert_eq!(eval_error("/ 1 0"), "/: division by zero");
    assert_eq!(eval_error("% 1 0"), "%: division by zero");
    assert_eq!(eval_error("// 1.5 0"), "//: division by zero");
    assert_eq!(eval_error("+"), "+ requires at least 1 argument");
    assert_eq!(eval_error("/ 4"), "/ requires at least 2 arguments");
    assert_eq!(eval_error("% 1 2 3"), "%: must have exactly 2 args");
    assert_eq!(eval_error("* 9223372036854775807 2"), "*: integer overflow");
    assert_eq!(eval_error("- -9223372036854775808"), "-: integer overflow");
    assert_eq!(eval_error("sqrt -1"), "sqrt: math domain error");
}

#[test]
fn non_numbers_are_blamed_at_their_source() {
    let e = error("print $(+ 1 x)");
    assert_eq!(e.kind.to_string(), "+: x is not a valid int or float");
    assert_eq!(e.pos, Some(SourcePos::new(1, 13)));
}

proptest! {
    #[test]
    fn floor_division_and_modulo_agree(x in -1_000_000_000i64..1_000_000_000, y in -1000i64..1000) {
        prop_assume!(y != 0);
        let (q, r) = (floor_div(x, y), floor_mod(x, y));
        prop_assert_eq!(q.zip(r).map(|(q, r)| q * y + r), Some(x));
        let r = r.unwrap_or_default();
        prop_assert!(r == 0 || (r < 0) == (y < 0));
    }
}
