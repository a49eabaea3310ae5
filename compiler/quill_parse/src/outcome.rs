//! Soft/hard parse outcomes.
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | `Matched` | The production succeeded. |
//! | `Soft` | The production did not match and consumed nothing: try the next alternative. |
//! | `Hard` | The production committed and then failed: stop parsing. |
//!
//! The grammar is LL(1), so a production decides on its first token whether it
//! applies. Any failure after that point is hard; [`one_of!`] enforces this by
//! promoting a soft failure that nevertheless consumed tokens.

use crate::ParseError;

#[derive(Debug)]
pub enum ParseOutcome<T> {
    Matched(T),
    Soft(ParseError),
    Hard(ParseError),
}

impl<T> ParseOutcome<T> {
    #[inline]
    pub fn soft(error: ParseError) -> Self {
        ParseOutcome::Soft(error.soft())
    }

    #[inline]
    pub fn hard(error: ParseError) -> Self {
        ParseOutcome::Hard(error.hard())
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, ParseOutcome::Matched(_))
    }

    pub fn is_soft(&self) -> bool {
        matches!(self, ParseOutcome::Soft(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseOutcome<U> {
        match self {
            ParseOutcome::Matched(value) => ParseOutcome::Matched(f(value)),
            ParseOutcome::Soft(error) => ParseOutcome::Soft(error),
            ParseOutcome::Hard(error) => ParseOutcome::Hard(error),
        }
    }

    /// Collapse into a `Result`; the error's `fatal` flag records which kind of failure it was.
    pub fn into_result(self) -> Result<T, ParseError> {
        match self {
            ParseOutcome::Matched(value) => Ok(value),
            ParseOutcome::Soft(error) | ParseOutcome::Hard(error) => Err(error),
        }
    }
}

/// Try alternatives in order; the first that does not fail softly wins.
///
/// A soft failure that consumed tokens is promoted to a hard one. If every
/// alternative fails softly, the last soft error is returned.
macro_rules! one_of {
    ($parser:expr, $first:expr $(, $rest:expr)* $(,)?) => {{
        let start = $parser.consumed();
        let mut outcome = $first;
        $(
            if let $crate::ParseOutcome::Soft(_) = outcome {
                if $parser.consumed() == start {
                    outcome = $rest;
                }
            }
        )*
        match outcome {
            $crate::ParseOutcome::Soft(error) if $parser.consumed() != start => {
                $crate::ParseOutcome::Hard(error.hard())
            }
            other => other,
        }
    }};
}

/// Unwrap a mandatory element: soft failures become hard, hard failures return.
macro_rules! require {
    ($outcome:expr) => {
        match $outcome {
            $crate::ParseOutcome::Matched(value) => value,
            $crate::ParseOutcome::Soft(error) | $crate::ParseOutcome::Hard(error) => {
                return $crate::ParseOutcome::Hard(error.hard());
            }
        }
    };
}

/// Unwrap a match, returning any failure unchanged.
macro_rules! matched {
    ($outcome:expr) => {
        match $outcome {
            $crate::ParseOutcome::Matched(value) => value,
            $crate::ParseOutcome::Soft(error) => return $crate::ParseOutcome::Soft(error),
            $crate::ParseOutcome::Hard(error) => return $crate::ParseOutcome::Hard(error),
        }
    };
}

/// Propagate a `Result` error as a hard failure.
macro_rules! commit {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(error) => return $crate::ParseOutcome::hard(error),
        }
    };
}

pub(crate) use {commit, matched, one_of, require};

#[cfg(test)]
mod tests;
