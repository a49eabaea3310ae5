//! Diagnostic rendering for script errors.
//!
//! Errors with a known position are drawn with ariadne against the script
//! source; a runtime error is followed by its backtrace table.

use std::ops::Range;

use ariadne::{Config, Label, Report, ReportKind, Source};
use quill_eval::ScriptError;

/// Char offset of a 1-based line and column in `source`, clamped to its end.
pub fn char_offset(source: &str, line: usize, pos: usize) -> usize {
    let mut offset = 0;
    for (index, text) in source.split('\n').enumerate() {
        if index + 1 == line {
            return offset + pos.saturating_sub(1).min(text.chars().count());
        }
        offset += text.chars().count() + 1;
    }
    source.chars().count()
}

fn message(error: &ScriptError) -> String {
    match error {
        ScriptError::Parse(e) => e.kind.to_string(),
        ScriptError::Eval(e) => e.kind.to_string(),
    }
}

/// Render `error` raised by the script at `path` with contents `source`.
pub fn render(path: &str, source: &str, error: &ScriptError) -> String {
    let Some(pos) = error.pos() else {
        return error.report();
    };

    let offset = char_offset(source, pos.line, pos.pos);
    let span: Range<usize> = offset..(offset + 1).min(source.chars().count()).max(offset);
    let message = message(error);
    let mut buf = Vec::new();
    let written = Report::build(ReportKind::Error, path.to_owned(), offset)
        .with_config(Config::default().with_color(false))
        .with_message(format!("{pos}: {message}"))
        .with_label(Label::new((path.to_owned(), span)).with_message(&message))
        .finish()
        .write((path.to_owned(), Source::from(source)), &mut buf);

    let mut text = match written {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(_) => error.to_string(),
    };
    if let ScriptError::Eval(e) = error {
        if !e.backtrace.is_empty() {
            if !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&e.backtrace.to_string());
        }
    }
    text
}
