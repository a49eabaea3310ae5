use pretty_assertions::assert_eq;

use crate::test_helpers::{eval, eval_error};

#[test]
fn cat_concatenates() {
    assert_eq!(eval("cat a b c"), "abc");
    assert_eq!(eval("concat x \" \" y"), "x y");
}

#[test]
fn characters() {
    assert_eq!(eval("getc Hello 4"), "o");
    assert_eq!(eval("getc Hello -1"), "o");
    assert_eq!(eval("getc Hello -5"), "H");
    assert_eq!(eval("len héllo"), "5");
    assert_eq!(eval("len \"\""), "0");
    assert_eq!(eval("ord h"), "104");
    assert_eq!(eval("chr 104"), "h");
}

#[test]
fn character_errors() {
    assert_eq!(eval_error("getc Hello 5"), "getc: index 5 out of range");
    assert_eq!(eval_error("getc Hello -6"), "getc: index -6 out of range");
    assert_eq!(eval_error("getc Hello"), "getc requires at least 2 arguments");
    assert_eq!(eval_error("ord ab"), "ord: expected a single character");
    assert_eq!(eval_error("chr -1"), "chr: -1 is not a valid character code");
}

#[test]
fn vectors_split_on_whitespace() {
    assert_eq!(eval("vempty? \"\""), "1");
    assert_eq!(eval("vempty? a"), "0");
    assert_eq!(eval("vhead \"2 4 8\""), "2");
    assert_eq!(eval("vtail \"2 4  8 16\""), "4  8 16");
    assert_eq!(eval("vtail \"  one  two\""), "two");
    assert_eq!(eval("vtail one"), "");
    assert_eq!(eval("vlen \"a b  c d\""), "4");
    assert_eq!(eval("vlen \"\""), "0");
    assert_eq!(eval_error("vhead \" \""), "vhead: vector is empty");
}

#[test]
fn rangev_is_half_open() {
    assert_eq!(eval("rangev 0 4"), "0 1 2 3");
    assert_eq!(eval("rangev -2 1"), "-2 -1 0");
    assert_eq!(eval("rangev 3 1"), "");
}

#[test]
fn rangev_refuses_oversized_ranges() {
    assert_eq!(eval("vlen $(rangev 0 100000)"), "100000");
    assert_eq!(
        eval_error("rangev 0 100001"),
        "rangev: range of 100001 elements exceeds the limit of 100000"
    );
    assert_eq!(
        eval_error("rangev -9223372036854775808 9223372036854775807"),
        "rangev: range of 18446744073709551615 elements exceeds the limit of 100000"
    );
}
