//! Syntax tree for the Quill scripting language.
//!
//! Every value a script manipulates is text, so the tree is small: calls,
//! blocks, expansions and literal strings. Nodes are reference counted
//! ([`NodeRef`]) because handlers keep subtrees alive beyond the parse: a
//! definition closes over its body, a loop re-runs its governed statement, and
//! every call frame records which node each argument came from.
//!
//! # Shapes
//!
//! | kind | children |
//! |------|----------|
//! | `Root` | `[Block]` |
//! | `Block` | statements |
//! | `CommandCall` | `[name, Arguments]` |
//! | `ControlCall` | `[name, Arguments, statement]` |
//! | `ExpansionCall` | `[name, Arguments]` |
//! | `Arguments` | `String` or `Expansion` nodes |
//! | `Expansion` | `[ExpansionSingle or ExpansionSpread, ExpansionVar or ExpansionCall]` |
//! | `ExpansionVar` | `[name]` |
//! | `String` | none; the literal lives in [`AstNode::text`] |
//!
//! A `name` is a `String` or an `Expansion`.

mod node;
mod print;

pub use node::{AstNode, NodeKind, NodeRef, SourcePos};
