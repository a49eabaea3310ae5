#![allow(clippy::unwrap_used, reason = "tests unwrap for brevity")]

use pretty_assertions::assert_eq;
use proptest::collection::vec;
use proptest::prelude::*;
use quill_ir::{AstNode, NodeKind, NodeRef, SourcePos};
use quill_lexer::Tokenizer;
use quill_lexer_core::{InteractiveStream, ScriptedLines};

use crate::{
    parse_script, parse_script_with, parse_statement, ConsumeRestTriggers, ParseError,
    ParseErrorKind, Parser,
};

fn parse(source: &str) -> NodeRef {
    match parse_script(source, &ConsumeRestTriggers::new()) {
        Ok(root) => root,
        Err(e) => panic!("parse failed for {source:?}: {e}"),
    }
}

fn parse_err(source: &str) -> ParseError {
    match parse_script(source, &ConsumeRestTriggers::new()) {
        Ok(root) => panic!("expected an error for {source:?}, got\n{}", root.dump()),
        Err(e) => e,
    }
}

fn statements(root: &NodeRef) -> Vec<NodeRef> {
    root.child(0).map(|b| b.children().to_vec()).unwrap_or_default()
}

#[test]
fn root_wraps_top_level_block() {
    let root = parse("set x 5\nprint $x\n");
    assert_eq!(root.kind(), NodeKind::Root);
    assert_eq!(root.children().len(), 1);
    assert_eq!(root.children()[0].kind(), NodeKind::Block);
    assert_eq!(statements(&root).len(), 2);
}

#[test]
fn command_shape() {
    let root = parse("set x 5");
    let call = &statements(&root)[0];
    assert_eq!(call.kind(), NodeKind::CommandCall);
    assert_eq!(call.call_name().unwrap().text(), "set");
    let args: Vec<&str> = call.call_args().unwrap().children().iter().map(|a| a.text()).collect();
    assert_eq!(args, vec!["x", "5"]);
    assert_eq!(call.pos(), SourcePos::new(1, 1));
}

#[test]
fn expansion_shapes() {
    let root = parse("print $x $^y $(cat a $b)");
    let dump = root.dump();
    assert_eq!(
        dump,
        "ROOT (1:1)
  BLOCK (1:1)
    COMMAND_CALL (1:1)
      STRING \"print\" (1:1)
      ARGUMENTS (1:1)
        EXPANSION (1:7)
          EXPANSION_SINGLE (1:7)
          EXPANSION_VAR (1:8)
            STRING \"x\" (1:8)
        EXPANSION (1:10)
          EXPANSION_SPREAD (1:10)
          EXPANSION_VAR (1:12)
            STRING \"y\" (1:12)
        EXPANSION (1:14)
          EXPANSION_SINGLE (1:14)
          EXPANSION_CALL (1:15)
            STRING \"cat\" (1:16)
            ARGUMENTS (1:15)
              STRING \"a\" (1:20)
              EXPANSION (1:22)
                EXPANSION_SINGLE (1:22)
                EXPANSION_VAR (1:23)
                  STRING \"b\" (1:23)
"
    );
}

#[test]
fn expanded_names() {
    let root = parse("$cmd x\n!$ctl(a) b\n$$indirect");
    let stmts = statements(&root);
    assert_eq!(stmts[0].call_name().unwrap().kind(), NodeKind::Expansion);
    assert_eq!(stmts[1].kind(), NodeKind::ControlCall);
    assert_eq!(stmts[1].call_name().unwrap().kind(), NodeKind::Expansion);

    let outer = stmts[2].call_name().unwrap();
    let inner_name = outer.expansion_target().unwrap().call_name().unwrap();
    assert_eq!(inner_name.kind(), NodeKind::Expansion);
}

#[test]
fn control_shapes() {
    let root = parse("!if($ok) {\n  print yes\n}\n!else print no\n!repeat(3)\n{ print x }");
    let stmts = statements(&root);
    assert_eq!(stmts.len(), 3);

    let if_call = &stmts[0];
    assert_eq!(if_call.call_args().unwrap().children().len(), 1);
    assert_eq!(if_call.control_node().unwrap().kind(), NodeKind::Block);

    let else_call = &stmts[1];
    assert!(else_call.call_args().unwrap().children().is_empty());
    assert_eq!(else_call.control_node().unwrap().kind(), NodeKind::CommandCall);

    // A newline may separate the header from the governed statement.
    assert_eq!(stmts[2].control_node().unwrap().kind(), NodeKind::Block);
}

#[test]
fn blank_lines_and_separators_are_skipped() {
    let root = parse("\n\n;a;;b\n{\n\n c ;\n}\n");
    assert_eq!(statements(&root).len(), 3);
}

#[test]
fn empty_script() {
    assert!(statements(&parse("")).is_empty());
    assert!(statements(&parse("# only a comment\n")).is_empty());
}

#[test]
fn stray_block_close_is_fatal() {
    let err = parse_err("print a\n}");
    assert_eq!(err.kind, ParseErrorKind::UnexpectedBlockClose);
    assert!(err.fatal);
    assert_eq!((err.line, err.pos), (2, 1));
}

#[test]
fn eof_inside_block_is_fatal_eof() {
    let err = parse_err("{ print a");
    assert_eq!(err.kind, ParseErrorKind::UnexpectedEof { expected: "'}'" });
    assert!(err.fatal);
    assert!(err.is_eof());
}

#[test]
fn dangling_sigil_is_fatal() {
    let err = parse_err("print $");
    assert!(err.fatal);
    assert!(err.is_eof());

    let err = parse_err("print $ {");
    assert_eq!(
        err.kind,
        ParseErrorKind::Expected {
            expected: "text or '$'",
            found: "'{'".to_owned()
        }
    );
}

#[test]
fn unclosed_expansion_call() {
    let err = parse_err("print $(cat a");
    assert_eq!(err.kind, ParseErrorKind::UnexpectedEof { expected: "')'" });
}

#[test]
fn control_needs_a_statement() {
    let err = parse_err("!if(x)");
    assert!(err.is_eof());
    let err = parse_err("!if(x) }");
    assert!(matches!(err.kind, ParseErrorKind::Expected { .. }));
}

#[test]
fn unexpected_token_where_statement_expected() {
    let err = parse_err("print )");
    assert_eq!(
        err.to_string(),
        "line 1, position 7: expected a command, control call or block, found ')'"
    );
}

#[test]
fn tokenize_errors_become_fatal_parse_errors() {
    let err = parse_err("print \"abc");
    assert!(err.fatal);
    assert!(err.is_eof());
    assert!(matches!(err.kind, ParseErrorKind::Tokenize(_)));
}

#[test]
fn nesting_ceiling() {
    let source = "{ { { print x } } }";
    assert!(parse_script_with(source, &ConsumeRestTriggers::new(), 3).is_ok());
    let err = parse_script_with(source, &ConsumeRestTriggers::new(), 2).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NestingTooDeep { limit: 2 });
    assert_eq!((err.line, err.pos), (1, 5));
}

#[test]
fn deep_nesting_does_not_overflow() {
    let depth = 5_000;
    let source = format!("{}print x{}", "{".repeat(depth), "}".repeat(depth));
    assert!(parse_script_with(&source, &ConsumeRestTriggers::new(), depth).is_ok());
}

#[test]
fn consume_rest_reaches_the_parser() {
    let triggers = ConsumeRestTriggers::new().with("say", 0);
    let root = parse_script("say hello, $who (and friends)", &triggers).unwrap();
    let call = &statements(&root)[0];
    let args = call.call_args().unwrap().children();
    assert_eq!(args.len(), 1);
    assert_eq!(args[0].text(), "hello, $who (and friends)");
}

#[test]
fn consume_rest_swallows_a_closing_brace_on_the_same_line() {
    let triggers = ConsumeRestTriggers::new().with("say", 0);
    let err = parse_script("!if(1) { say hi }", &triggers).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnexpectedEof { expected: "'}'" });
    assert!(err.fatal);

    let root = parse_script("!if(1) {\n    say hi }\n}", &triggers).unwrap();
    let block = statements(&root)[0].control_node().cloned().unwrap();
    let say = &block.children()[0];
    assert_eq!(say.call_args().unwrap().children()[0].text(), "hi }");
}

#[test]
fn single_statement() {
    let stmt = parse_statement("set x 5\n\n", &ConsumeRestTriggers::new()).unwrap();
    assert_eq!(stmt.unwrap().kind(), NodeKind::CommandCall);
    assert!(parse_statement("  ;\n", &ConsumeRestTriggers::new()).unwrap().is_none());

    let err = parse_statement("a; b", &ConsumeRestTriggers::new()).unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::Expected {
            expected: "end of statement",
            found: "\"b\"".to_owned()
        }
    );
}

#[test]
fn interactive_statements_do_not_read_ahead() {
    let lines = ScriptedLines::new(["set x 1", "!if($x) {", "print yes", "}", "print done"]);
    let mut tokens = Tokenizer::new(InteractiveStream::new(lines));
    let mut prompts_after = Vec::new();

    loop {
        let stmt = Parser::new(&mut tokens).parse_statement().unwrap();
        prompts_after.push(tokens.stream().source().prompts().len());
        if stmt.is_none() {
            break;
        }
    }
    assert_eq!(prompts_after, vec![1, 4, 5, 6]);
}

// --- printing round trip ---

fn literal() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-z][a-z0-9_?=-]{0,5}",
        1 => "[a-z !#$^(){};\"\\\\\t\n]{0,6}",
        1 => "\\PC{0,4}",
    ]
}

fn strings(items: Vec<String>) -> Vec<NodeRef> {
    let p = SourcePos::default();
    items.into_iter().map(|s| AstNode::string(s, p)).collect()
}

fn command(name: String, args: Vec<String>) -> NodeRef {
    let p = SourcePos::default();
    AstNode::new(
        NodeKind::CommandCall,
        p,
        vec![AstNode::string(name, p), AstNode::new(NodeKind::Arguments, p, strings(args))],
    )
}

fn statement() -> impl Strategy<Value = NodeRef> {
    let p = SourcePos::default();
    let leaf = (literal(), vec(literal(), 0..4)).prop_map(|(n, a)| command(n, a));
    leaf.prop_recursive(4, 24, 4, move |inner| {
        prop_oneof![
            vec(inner.clone(), 0..4).prop_map(move |body| AstNode::new(NodeKind::Block, p, body)),
            (literal(), vec(literal(), 0..3), inner).prop_map(move |(name, args, body)| {
                AstNode::new(
                    NodeKind::ControlCall,
                    p,
                    vec![
                        AstNode::string(name, p),
                        AstNode::new(NodeKind::Arguments, p, strings(args)),
                        body,
                    ],
                )
            }),
        ]
    })
}

proptest! {
    #[test]
    fn printed_literal_scripts_reparse_identically(stmts in vec(statement(), 0..5)) {
        let p = SourcePos::default();
        let root = AstNode::new(NodeKind::Root, p, vec![AstNode::new(NodeKind::Block, p, stmts)]);
        let script = root.to_script();
        let reparsed = parse_script(&script, &ConsumeRestTriggers::new());
        prop_assert!(reparsed.is_ok(), "{script:?} failed: {reparsed:?}");
        prop_assert_eq!(reparsed.unwrap(), root, "script was {:?}", script);
    }

    #[test]
    fn parse_print_parse_is_stable(stmts in vec(statement(), 0..5)) {
        let p = SourcePos::default();
        let root = AstNode::new(NodeKind::Root, p, vec![AstNode::new(NodeKind::Block, p, stmts)]);
        let first = parse_script(&root.to_script(), &ConsumeRestTriggers::new()).unwrap();
        let second = parse_script(&first.to_script(), &ConsumeRestTriggers::new()).unwrap();
        prop_assert_eq!(first.to_script(), second.to_script());
        prop_assert_eq!(first, second);
    }
}
