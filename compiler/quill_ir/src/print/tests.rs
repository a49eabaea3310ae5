use crate::{AstNode, NodeKind, NodeRef, SourcePos};
use pretty_assertions::assert_eq;

const P: SourcePos = SourcePos::new(1, 1);

fn s(text: &str) -> NodeRef {
    AstNode::string(text, P)
}

fn node(kind: NodeKind, children: Vec<NodeRef>) -> NodeRef {
    AstNode::new(kind, P, children)
}

fn args(items: Vec<NodeRef>) -> NodeRef {
    node(NodeKind::Arguments, items)
}

fn var(name: &str, spread: bool) -> NodeRef {
    let marker = if spread {
        NodeKind::ExpansionSpread
    } else {
        NodeKind::ExpansionSingle
    };
    node(
        NodeKind::Expansion,
        vec![
            node(marker, Vec::new()),
            node(NodeKind::ExpansionVar, vec![s(name)]),
        ],
    )
}

#[test]
fn plain_commands() {
    let root = node(
        NodeKind::Root,
        vec![node(
            NodeKind::Block,
            vec![
                node(NodeKind::CommandCall, vec![s("set"), args(vec![s("x"), s("5")])]),
                node(NodeKind::CommandCall, vec![s("stop"), args(Vec::new())]),
            ],
        )],
    );
    assert_eq!(root.to_script(), "set x 5\nstop\n");
}

#[test]
fn literals_are_quoted_when_special() {
    let cmd = node(
        NodeKind::CommandCall,
        vec![
            s("print"),
            args(vec![s("a b"), s(""), s("say \"hi\"\n"), s("!x"), s("x!"), s("$y")]),
        ],
    );
    assert_eq!(
        cmd.to_script(),
        r#"print "a b" "" "say \"hi\"\n" "!x" x! "$y""#
    );
}

#[test]
fn expansions() {
    let call = node(
        NodeKind::Expansion,
        vec![
            node(NodeKind::ExpansionSingle, Vec::new()),
            node(NodeKind::ExpansionCall, vec![s("cat"), args(vec![var("a", false), s("b")])]),
        ],
    );
    let cmd = node(
        NodeKind::CommandCall,
        vec![s("print"), args(vec![var("x", false), var("xs", true), call])],
    );
    assert_eq!(cmd.to_script(), "print $x $^xs $(cat $a b)");
}

#[test]
fn control_with_block() {
    let body = node(
        NodeKind::Block,
        vec![node(NodeKind::CommandCall, vec![s("print"), args(vec![s("yes")])])],
    );
    let ctrl = node(
        NodeKind::ControlCall,
        vec![s("if"), args(vec![var("ok", false)]), body],
    );
    let bare = node(
        NodeKind::ControlCall,
        vec![
            s("else"),
            args(Vec::new()),
            node(NodeKind::CommandCall, vec![s("print"), args(vec![s("no")])]),
        ],
    );
    let root = node(NodeKind::Root, vec![node(NodeKind::Block, vec![ctrl, bare])]);
    assert_eq!(
        root.to_script(),
        "!if($ok) {\n    print yes\n}\n!else print no\n"
    );
}

#[test]
fn empty_block() {
    assert_eq!(node(NodeKind::Block, Vec::new()).to_script(), "{}");
}
