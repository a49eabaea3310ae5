//! Recursive descent parser for the Quill scripting language.
//!
//! The parser pulls tokens from a [`Tokenizer`] on demand and builds the
//! [`quill_ir`] tree. Productions report [`ParseOutcome`]s: a soft failure
//! means "not this production, try another", a hard failure aborts the parse.
//! Both surface to callers as a [`ParseError`] whose `fatal` flag tells them
//! apart.
//!
//! Whole scripts parse into `Root[Block[...]]`. Single statements are parsed
//! with [`Parser::parse_statement`], which never reads past the end of the
//! statement; the interactive interpreter relies on that.

mod error;
mod outcome;
mod parser;

pub use error::{ParseError, ParseErrorKind};
pub use outcome::ParseOutcome;
pub use parser::{Parser, DEFAULT_MAX_NESTING};
pub use quill_lexer::ConsumeRestTriggers;

use quill_ir::NodeRef;
use quill_lexer::{StringStream, Tokenizer};
use tracing::debug;

/// Parse a complete script.
pub fn parse_script(source: &str, triggers: &ConsumeRestTriggers) -> Result<NodeRef, ParseError> {
    parse_script_with(source, triggers, DEFAULT_MAX_NESTING)
}

/// Parse a complete script with a custom nesting ceiling.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse_script_with(
    source: &str,
    triggers: &ConsumeRestTriggers,
    max_nesting: usize,
) -> Result<NodeRef, ParseError> {
    let mut tokens = Tokenizer::with_triggers(StringStream::new(source), triggers.clone());
    let root = Parser::new(&mut tokens)
        .with_max_nesting(max_nesting)
        .parse_script()?;
    debug!(
        statements = root.child(0).map_or(0, |block| block.children().len()),
        "parsed script"
    );
    Ok(root)
}

/// Parse exactly one statement. Only separators may follow it.
///
/// Returns `None` for a source with no statement at all.
pub fn parse_statement(
    source: &str,
    triggers: &ConsumeRestTriggers,
) -> Result<Option<NodeRef>, ParseError> {
    let mut tokens = Tokenizer::with_triggers(StringStream::new(source), triggers.clone());
    let mut parser = Parser::new(&mut tokens);
    let statement = parser.parse_statement()?;
    parser.expect_end()?;
    Ok(statement)
}

#[cfg(test)]
mod tests;
