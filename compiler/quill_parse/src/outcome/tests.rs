use crate::{ParseError, ParseErrorKind, ParseOutcome};

/// Minimal stand-in for the parser: a counter of consumed tokens.
struct Probe {
    consumed: usize,
}

impl Probe {
    fn consumed(&self) -> usize {
        self.consumed
    }

    fn soft(&mut self, eat: usize) -> ParseOutcome<&'static str> {
        self.consumed += eat;
        ParseOutcome::soft(err())
    }

    fn hard(&mut self) -> ParseOutcome<&'static str> {
        self.consumed += 1;
        ParseOutcome::hard(err())
    }

    fn ok(&mut self, value: &'static str) -> ParseOutcome<&'static str> {
        self.consumed += 1;
        ParseOutcome::Matched(value)
    }

    fn required(&mut self, eat: usize) -> ParseOutcome<&'static str> {
        let value = require!(self.soft(eat));
        ParseOutcome::Matched(value)
    }

    fn committed(&mut self, result: Result<&'static str, ParseError>) -> ParseOutcome<&'static str> {
        ParseOutcome::Matched(commit!(result))
    }
}

fn err() -> ParseError {
    ParseError::new(ParseErrorKind::UnexpectedBlockClose, 1, 1)
}

fn probe() -> Probe {
    Probe { consumed: 0 }
}

#[test]
fn first_match_wins() {
    let mut p = probe();
    let outcome = one_of!(p, p.soft(0), p.ok("second"), p.ok("third"));
    assert!(matches!(outcome, ParseOutcome::Matched("second")));
    assert_eq!(p.consumed, 1, "third alternative never ran");
}

#[test]
fn hard_error_stops_alternatives() {
    let mut p = probe();
    let outcome = one_of!(p, p.hard(), p.ok("unused"));
    assert!(matches!(outcome, ParseOutcome::Hard(ref e) if e.fatal));
}

#[test]
fn all_soft_stays_soft() {
    let mut p = probe();
    let outcome = one_of!(p, p.soft(0), p.soft(0));
    assert!(matches!(outcome, ParseOutcome::Soft(ref e) if !e.fatal));
}

#[test]
fn soft_after_consuming_is_promoted() {
    let mut p = probe();
    let outcome = one_of!(p, p.soft(2), p.ok("unreached"));
    assert!(matches!(outcome, ParseOutcome::Hard(ref e) if e.fatal));
}

#[test]
fn require_hardens_soft_failures() {
    let outcome = probe().required(0);
    assert!(matches!(outcome, ParseOutcome::Hard(ref e) if e.fatal));
}

#[test]
fn commit_turns_errors_hard() {
    let outcome = probe().committed(Err(err().soft()));
    assert!(matches!(outcome, ParseOutcome::Hard(ref e) if e.fatal));
    assert!(probe().committed(Ok("x")).is_matched());
}

#[test]
fn into_result_keeps_fatal_flag() {
    let soft: ParseOutcome<()> = ParseOutcome::soft(err());
    assert_eq!(soft.into_result().map_err(|e| e.fatal), Err(false));
    let hard: ParseOutcome<()> = ParseOutcome::hard(err());
    assert_eq!(hard.into_result().map_err(|e| e.fatal), Err(true));
}
