//! Syntactic position tracking inside the token stream.
//!
//! The tokenizer needs a little grammar knowledge: `!` only means "control
//! call" where a statement may start, and consume-rest needs to know which
//! command is being called and how many arguments it has received so far.
//! [`CallTracker`] follows the emitted tokens to answer both questions without
//! involving the parser.
//!
//! A *unit* is one name or argument: a literal, or an expansion (`$x`,
//! `$^x`, `$(...)`, `$$x`). Only units at parenthesis depth zero are counted;
//! everything inside an expansion call or a control call's argument list
//! belongs to that call.

use crate::TokenKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// Next unit is a command name.
    StatementStart,
    /// Next unit is an argument of the current command.
    CommandArgs,
    /// After `!`: next unit is the control name.
    ControlName,
    /// After the control name: either `(` args follow or the governed statement starts.
    ControlHeader,
    /// Inside the control call's `( )`.
    ControlArgs,
}

#[derive(Clone, Debug)]
pub(crate) struct CallTracker {
    phase: Phase,
    call: Option<String>,
    arg_index: usize,
    depth: usize,
    sigil_pending: bool,
    last: Option<TokenKind>,
}

impl Default for CallTracker {
    fn default() -> Self {
        CallTracker {
            phase: Phase::StatementStart,
            call: None,
            arg_index: 0,
            depth: 0,
            sigil_pending: false,
            last: None,
        }
    }
}

impl CallTracker {
    /// Parenthesis nesting depth.
    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn last(&self) -> Option<TokenKind> {
        self.last
    }

    /// Whether a `!` here starts a control call.
    pub(crate) fn control_allowed(&self) -> bool {
        self.depth == 0
            && !self.sigil_pending
            && matches!(self.phase, Phase::StatementStart | Phase::ControlHeader)
    }

    /// The command whose next argument is about to be read, with that argument's index.
    pub(crate) fn pending_argument(&self) -> Option<(&str, usize)> {
        if self.phase != Phase::CommandArgs || self.depth != 0 || self.sigil_pending {
            return None;
        }
        self.call.as_deref().map(|name| (name, self.arg_index))
    }

    pub(crate) fn observe(&mut self, kind: TokenKind, value: &str) {
        match kind {
            TokenKind::CommandSep | TokenKind::OpenBlock | TokenKind::CloseBlock | TokenKind::Eof => {
                if self.depth == 0 || kind == TokenKind::Eof {
                    *self = CallTracker::default();
                }
            }
            TokenKind::ControlSigil => {
                self.phase = Phase::ControlName;
                self.call = None;
            }
            TokenKind::ExpansionSigil => {
                if self.depth == 0 {
                    if !self.sigil_pending {
                        self.begin_unit(None);
                    }
                    self.sigil_pending = true;
                }
            }
            TokenKind::SpreadSigil => {}
            TokenKind::OpenArgs => {
                if self.depth == 0 {
                    if self.sigil_pending {
                        self.sigil_pending = false;
                    } else if self.phase == Phase::ControlHeader {
                        self.phase = Phase::ControlArgs;
                    }
                }
                self.depth += 1;
            }
            TokenKind::CloseArgs => {
                if self.depth > 0 {
                    self.depth -= 1;
                    if self.depth == 0 {
                        if self.phase == Phase::ControlArgs {
                            self.phase = Phase::StatementStart;
                        } else {
                            self.finish_unit();
                        }
                    }
                }
            }
            TokenKind::StringLiteral => {
                if self.depth == 0 {
                    if self.sigil_pending {
                        self.sigil_pending = false;
                    } else {
                        self.begin_unit(Some(value));
                    }
                    self.finish_unit();
                }
            }
        }
        if kind != TokenKind::Eof && kind != TokenKind::CommandSep {
            self.last = Some(kind);
        } else {
            self.last = None;
        }
    }

    fn begin_unit(&mut self, literal: Option<&str>) {
        if self.phase == Phase::ControlHeader {
            self.phase = Phase::StatementStart;
        }
        if self.phase == Phase::StatementStart {
            self.call = literal.map(str::to_owned);
            self.arg_index = 0;
        }
    }

    fn finish_unit(&mut self) {
        match self.phase {
            Phase::StatementStart => self.phase = Phase::CommandArgs,
            Phase::CommandArgs => self.arg_index += 1,
            Phase::ControlName => self.phase = Phase::ControlHeader,
            Phase::ControlHeader | Phase::ControlArgs => {}
        }
    }
}
