use pretty_assertions::assert_eq;
use quill_eval::{CallKind, EvalErrorKind, SourcePos};

use crate::test_helpers::{error, run};

fn message(script: &str) -> String {
    error(script).kind.to_string()
}

// --- def ---

#[test]
fn def_without_return_defines_a_command() {
    assert_eq!(run("!def(greet name) { print hello $name }\ngreet bob"), "hello bob\n");
    assert_eq!(
        error("!def(greet name) { print hello $name }\nprint $(greet bob)").kind,
        EvalErrorKind::MissingCall {
            kind: CallKind::Expansion,
            name: "greet".into(),
        }
    );
}

#[test]
fn def_with_return_defines_an_expansion() {
    let script = "\
!def(abs x) {
    !if($(< $x 0)) { return $(- $x) }
    return $x
}
print $(abs -3) $(abs 4)";
    assert_eq!(run(script), "3 4\n");
}

#[test]
fn def_body_may_be_a_single_statement() {
    assert_eq!(run("!def(twice x) return $x $x\nprint $(twice ab)"), "ab ab\n");
}

#[test]
fn def_needs_a_name() {
    assert_eq!(message("!def { print x }"), "def requires at least 1 argument");
}

// --- repeat ---

#[test]
fn repeat_runs_its_body_n_times() {
    assert_eq!(run("!repeat(3) write x"), "xxx");
    assert_eq!(run("!repeat(0) write x"), "");
    assert_eq!(run("!repeat(-2) write x"), "");
}

#[test]
fn repeat_rejects_bad_counts() {
    let e = error("!repeat(abc) print x");
    assert_eq!(e.kind.to_string(), "'abc' is not a valid integer");
    assert_eq!(e.pos, Some(SourcePos::new(1, 9)));
    assert_eq!(
        message("!repeat(1 2) print x"),
        "repeat requires exactly one argument, the number of times to repeat"
    );
}

// --- for ---

#[test]
fn for_binds_each_item_in_turn() {
    assert_eq!(run("!for(i in a b c) print $i"), "a\nb\nc\n");
    assert_eq!(run("set v \"1 2 3\"\n!for(x in $^v) write $x"), "123");
}

#[test]
fn for_removes_its_variable_afterwards() {
    let e = error("!for(i in a b) write $i\nprint $i");
    assert_eq!(e.kind, EvalErrorKind::UndefinedVariable { name: "i".into() });
}

#[test]
fn for_checks_its_header() {
    assert_eq!(
        message("!for(i in) print"),
        "bad format in !for: expected !for(VARNAME in ARGS)"
    );
    let e = error("!for(i of a b) print $i");
    assert_eq!(e.kind.to_string(), "unexpected token 'of', should be 'in'");
    assert_eq!(e.pos, Some(SourcePos::new(1, 8)));
}

#[test]
fn for_stops_early_on_return() {
    let script = "\
!def(first *xs) {
    !for(x in $^xs) { return $x }
}
print $(first p q r)";
    assert_eq!(run(script), "p\n");
}

// --- if / elif / else ---

#[test]
fn conditionals_chain_through_the_else_signal() {
    let script = "\
!def(classify n) {
    !if($(< $n 0)) { return negative }
    !elif($(== $n 0)) { return zero }
    !else { return positive }
}
print $(classify -5) $(classify 0) $(classify 7)";
    assert_eq!(run(script), "negative zero positive\n");
}

#[test]
fn else_runs_at_most_once() {
    assert_eq!(run("!if(0) print a\n!else print b\n!else print c"), "b\n");
}

#[test]
fn elif_without_a_skipped_if_does_nothing() {
    assert_eq!(run("!elif(1) print a\n!if(1) print b\n!elif(1) print c"), "b\n");
}

#[test]
fn conditional_signals_are_per_frame() {
    let script = "\
!if(0) print outer
!if(1) {
    !if(1) print inner
    !else print inner-else
}
!else print outer-else";
    assert_eq!(run(script), "inner\n");
}

#[test]
fn conditionals_check_their_arguments() {
    assert_eq!(message("!if(1 2) print x"), "if: needs one and only one argument");
    assert_eq!(message("!if print x"), "if: needs one and only one argument");
    assert_eq!(message("!else(x) print y"), "else: does not take arguments");
}

// --- while ---

#[test]
fn while_reevaluates_its_condition() {
    let script = "\
set i 0
!while($(< $i 3)) {
    write $i
    set i $(+ $i 1)
}";
    assert_eq!(run(script), "012");
    assert_eq!(run("!while(0) print never"), "");
}

#[test]
fn while_follows_a_plain_variable() {
    let script = "\
set go 1
!while($go) {
    print once
    set go 0
}";
    assert_eq!(run(script), "once\n");
}
