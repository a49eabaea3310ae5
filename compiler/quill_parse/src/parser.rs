//! Grammar productions.
//!
//! ```text
//! statement      := block | control_call | command_call
//! block          := '{' (SEP | statement)* '}'
//! control_call   := '!' name ('(' arg* ')')? SEP* statement
//! command_call   := name arg*
//! name, arg      := STRING | expansion
//! expansion      := '$' '^'? ( '(' name arg* ')' | name )
//! ```

use quill_ir::{AstNode, NodeKind, NodeRef, SourcePos};
use quill_lexer::{CharStream, Token, TokenKind, Tokenizer};
use quill_stack::ensure_sufficient_stack;

use crate::outcome::{commit, matched, one_of, require};
use crate::{ParseError, ParseErrorKind, ParseOutcome};

/// Default ceiling on nested blocks, control calls and expansions.
pub const DEFAULT_MAX_NESTING: usize = 256;

/// Recursive descent parser reading from a borrowed [`Tokenizer`].
///
/// The lookahead token lives in the tokenizer, so a parser can be created per
/// statement without losing input.
pub struct Parser<'t, S: CharStream> {
    tokens: &'t mut Tokenizer<S>,
    consumed: usize,
    depth: usize,
    max_nesting: usize,
}

impl<'t, S: CharStream> Parser<'t, S> {
    pub fn new(tokens: &'t mut Tokenizer<S>) -> Self {
        Parser {
            tokens,
            consumed: 0,
            depth: 0,
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }

    #[must_use]
    pub fn with_max_nesting(mut self, limit: usize) -> Self {
        self.max_nesting = limit;
        self
    }

    /// Number of tokens consumed so far.
    #[inline]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Parse everything up to EOF into `Root[Block[statements]]`.
    pub fn parse_script(&mut self) -> Result<NodeRef, ParseError> {
        let pos = pos_of(self.peek()?);
        let statements = self.block_body(true).into_result()?;
        let block = AstNode::new(NodeKind::Block, pos, statements);
        Ok(AstNode::new(NodeKind::Root, pos, vec![block]))
    }

    /// Parse the next statement, skipping leading separators.
    ///
    /// Returns `None` when the input ends before a statement starts. Nothing
    /// past the statement is read, so interactive input is not requested early.
    pub fn parse_statement(&mut self) -> Result<Option<NodeRef>, ParseError> {
        loop {
            match self.peek_kind()? {
                TokenKind::CommandSep => {
                    self.bump()?;
                }
                TokenKind::Eof => return Ok(None),
                _ => break,
            }
        }
        match self.statement() {
            ParseOutcome::Matched(node) => Ok(Some(node)),
            ParseOutcome::Soft(_) => Err(self.expected_statement()),
            ParseOutcome::Hard(error) => Err(error),
        }
    }

    /// Require that only separators remain before EOF.
    pub fn expect_end(&mut self) -> Result<(), ParseError> {
        loop {
            let token = self.peek()?;
            match token.kind {
                TokenKind::CommandSep => {
                    self.bump()?;
                }
                TokenKind::Eof => return Ok(()),
                _ => return Err(ParseError::unexpected("end of statement", token)),
            }
        }
    }

    // --- token access ---

    fn peek(&mut self) -> Result<&Token, ParseError> {
        Ok(self.tokens.peek_token()?)
    }

    fn peek_kind(&mut self) -> Result<TokenKind, ParseError> {
        Ok(self.peek()?.kind)
    }

    fn bump(&mut self) -> Result<Token, ParseError> {
        let token = self.tokens.next_token()?;
        self.consumed += 1;
        Ok(token)
    }

    /// Consume a token of `kind`, or fail softly without consuming.
    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> ParseOutcome<Token> {
        let token = commit!(self.peek());
        if token.kind != kind {
            return ParseOutcome::soft(ParseError::unexpected(expected, token));
        }
        ParseOutcome::Matched(commit!(self.bump()))
    }

    /// Hard error for a position where a statement was required.
    fn expected_statement(&mut self) -> ParseError {
        match self.peek() {
            Ok(token) => ParseError::unexpected("a command, control call or block", token),
            Err(error) => error,
        }
    }

    /// Run `f` one nesting level deeper.
    fn nested<T>(&mut self, pos: SourcePos, f: impl FnOnce(&mut Self) -> ParseOutcome<T>) -> ParseOutcome<T> {
        if self.depth >= self.max_nesting {
            return ParseOutcome::hard(ParseError::new(
                ParseErrorKind::NestingTooDeep {
                    limit: self.max_nesting,
                },
                pos.line,
                pos.pos,
            ));
        }
        self.depth += 1;
        let outcome = ensure_sufficient_stack(|| f(self));
        self.depth -= 1;
        outcome
    }

    // --- productions ---

    fn statement(&mut self) -> ParseOutcome<NodeRef> {
        one_of!(self, self.block(), self.control_call(), self.command_call())
    }

    /// Statements until `}` (or EOF at top level). The closing token is not consumed.
    fn block_body(&mut self, top_level: bool) -> ParseOutcome<Vec<NodeRef>> {
        let mut statements = Vec::new();
        loop {
            let token = commit!(self.peek());
            match token.kind {
                TokenKind::CommandSep => {
                    commit!(self.bump());
                    continue;
                }
                TokenKind::CloseBlock if top_level => {
                    return ParseOutcome::hard(ParseError::new(
                        ParseErrorKind::UnexpectedBlockClose,
                        token.line,
                        token.pos,
                    ));
                }
                TokenKind::CloseBlock => return ParseOutcome::Matched(statements),
                TokenKind::Eof if top_level => return ParseOutcome::Matched(statements),
                TokenKind::Eof => {
                    return ParseOutcome::hard(ParseError::unexpected("'}'", token));
                }
                _ => {}
            }

            match self.statement() {
                ParseOutcome::Matched(node) => statements.push(node),
                ParseOutcome::Soft(_) => {
                    return ParseOutcome::Hard(self.expected_statement());
                }
                ParseOutcome::Hard(error) => return ParseOutcome::Hard(error),
            }
        }
    }

    fn block(&mut self) -> ParseOutcome<NodeRef> {
        let open = matched!(self.expect(TokenKind::OpenBlock, "'{'"));
        let pos = pos_of(&open);
        self.nested(pos, |p| {
            let statements = require!(p.block_body(false));
            require!(p.expect(TokenKind::CloseBlock, "'}'"));
            ParseOutcome::Matched(AstNode::new(NodeKind::Block, pos, statements))
        })
    }

    fn control_call(&mut self) -> ParseOutcome<NodeRef> {
        let sigil = matched!(self.expect(TokenKind::ControlSigil, "'!'"));
        let pos = pos_of(&sigil);
        self.nested(pos, |p| {
            let name = require!(p.name_or_expansion());

            let args = if commit!(p.peek_kind()) == TokenKind::OpenArgs {
                commit!(p.bump());
                let args = require!(p.arguments());
                require!(p.expect(TokenKind::CloseArgs, "')'"));
                args
            } else {
                Vec::new()
            };

            while commit!(p.peek_kind()) == TokenKind::CommandSep {
                commit!(p.bump());
            }
            let body = match p.statement() {
                ParseOutcome::Matched(node) => node,
                ParseOutcome::Soft(_) => return ParseOutcome::Hard(p.expected_statement()),
                ParseOutcome::Hard(error) => return ParseOutcome::Hard(error),
            };

            let args = AstNode::new(NodeKind::Arguments, pos, args);
            ParseOutcome::Matched(AstNode::new(NodeKind::ControlCall, pos, vec![name, args, body]))
        })
    }

    fn command_call(&mut self) -> ParseOutcome<NodeRef> {
        let name = matched!(self.name_or_expansion());
        let pos = name.pos();
        let args = require!(self.arguments());
        let args = AstNode::new(NodeKind::Arguments, pos, args);
        ParseOutcome::Matched(AstNode::new(NodeKind::CommandCall, pos, vec![name, args]))
    }

    /// Zero or more arguments; stops at the first token that cannot start one.
    fn arguments(&mut self) -> ParseOutcome<Vec<NodeRef>> {
        let mut args = Vec::new();
        loop {
            match self.name_or_expansion() {
                ParseOutcome::Matched(node) => args.push(node),
                ParseOutcome::Soft(_) => return ParseOutcome::Matched(args),
                ParseOutcome::Hard(error) => return ParseOutcome::Hard(error),
            }
        }
    }

    fn name_or_expansion(&mut self) -> ParseOutcome<NodeRef> {
        one_of!(self, self.expansion(), self.string())
    }

    fn string(&mut self) -> ParseOutcome<NodeRef> {
        self.expect(TokenKind::StringLiteral, "text or '$'")
            .map(|token| {
                let pos = pos_of(&token);
                AstNode::string(token.value, pos)
            })
    }

    fn expansion(&mut self) -> ParseOutcome<NodeRef> {
        let sigil = matched!(self.expect(TokenKind::ExpansionSigil, "'$'"));
        let pos = pos_of(&sigil);
        self.nested(pos, |p| {
            let spread = commit!(p.peek_kind()) == TokenKind::SpreadSigil;
            if spread {
                commit!(p.bump());
            }

            let target = require!(one_of!(p, p.expansion_call(), p.expansion_var()));
            let marker = if spread {
                NodeKind::ExpansionSpread
            } else {
                NodeKind::ExpansionSingle
            };
            ParseOutcome::Matched(AstNode::new(
                NodeKind::Expansion,
                pos,
                vec![AstNode::new(marker, pos, Vec::new()), target],
            ))
        })
    }

    fn expansion_call(&mut self) -> ParseOutcome<NodeRef> {
        let open = matched!(self.expect(TokenKind::OpenArgs, "'('"));
        let pos = pos_of(&open);
        let name = require!(self.name_or_expansion());
        let args = require!(self.arguments());
        require!(self.expect(TokenKind::CloseArgs, "')'"));
        let args = AstNode::new(NodeKind::Arguments, pos, args);
        ParseOutcome::Matched(AstNode::new(NodeKind::ExpansionCall, pos, vec![name, args]))
    }

    fn expansion_var(&mut self) -> ParseOutcome<NodeRef> {
        self.name_or_expansion()
            .map(|name| AstNode::new(NodeKind::ExpansionVar, name.pos(), vec![name]))
    }
}

fn pos_of(token: &Token) -> SourcePos {
    SourcePos::new(token.line, token.pos)
}
