//! Node types and accessors.

use std::fmt;
use std::rc::Rc;

/// Shared handle to a syntax tree node.
pub type NodeRef = Rc<AstNode>;

/// Kind tag of an [`AstNode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Block,
    CommandCall,
    ControlCall,
    ExpansionCall,
    Arguments,
    ExpansionVar,
    Expansion,
    ExpansionSpread,
    ExpansionSingle,
    String,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Root => "ROOT",
            NodeKind::Block => "BLOCK",
            NodeKind::CommandCall => "COMMAND_CALL",
            NodeKind::ControlCall => "CONTROL_CALL",
            NodeKind::ExpansionCall => "EXPANSION_CALL",
            NodeKind::Arguments => "ARGUMENTS",
            NodeKind::ExpansionVar => "EXPANSION_VAR",
            NodeKind::Expansion => "EXPANSION",
            NodeKind::ExpansionSpread => "EXPANSION_SPREAD",
            NodeKind::ExpansionSingle => "EXPANSION_SINGLE",
            NodeKind::String => "STRING",
        }
    }

    /// Kinds that may appear directly inside a block.
    pub fn is_statement(self) -> bool {
        matches!(self, NodeKind::Block | NodeKind::CommandCall | NodeKind::ControlCall)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 1-based line and column of a node's first token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SourcePos {
    pub line: usize,
    pub pos: usize,
}

impl SourcePos {
    pub const fn new(line: usize, pos: usize) -> Self {
        SourcePos { line, pos }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, position {}", self.line, self.pos)
    }
}

/// A syntax tree node.
///
/// Equality is structural: kinds, texts and children are compared, source
/// positions are not.
#[derive(Clone, Debug)]
pub struct AstNode {
    kind: NodeKind,
    pos: SourcePos,
    text: String,
    children: Vec<NodeRef>,
}

impl AstNode {
    pub fn new(kind: NodeKind, pos: SourcePos, children: Vec<NodeRef>) -> NodeRef {
        Rc::new(AstNode {
            kind,
            pos,
            text: String::new(),
            children,
        })
    }

    /// A `String` leaf.
    pub fn string(text: impl Into<String>, pos: SourcePos) -> NodeRef {
        Rc::new(AstNode {
            kind: NodeKind::String,
            pos,
            text: text.into(),
            children: Vec::new(),
        })
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[inline]
    pub fn pos(&self) -> SourcePos {
        self.pos
    }

    #[inline]
    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&NodeRef> {
        self.children.get(index)
    }

    /// Literal text of a `String` node; empty for every other kind.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The literal text if this is a `String` node.
    pub fn str_content(&self) -> Option<&str> {
        (self.kind == NodeKind::String).then_some(self.text.as_str())
    }

    /// Name node of a call, or of an `ExpansionVar`.
    pub fn call_name(&self) -> Option<&NodeRef> {
        match self.kind {
            NodeKind::CommandCall
            | NodeKind::ControlCall
            | NodeKind::ExpansionCall
            | NodeKind::ExpansionVar => self.children.first(),
            _ => None,
        }
    }

    /// Argument list node of a call.
    pub fn call_args(&self) -> Option<&NodeRef> {
        match self.kind {
            NodeKind::CommandCall | NodeKind::ControlCall | NodeKind::ExpansionCall => {
                self.children.get(1)
            }
            _ => None,
        }
    }

    /// Governed statement of a control call.
    pub fn control_node(&self) -> Option<&NodeRef> {
        match self.kind {
            NodeKind::ControlCall => self.children.get(2),
            _ => None,
        }
    }

    /// Whether an `Expansion` node splits its result on whitespace.
    pub fn is_spread(&self) -> bool {
        self.kind == NodeKind::Expansion
            && self
                .children
                .first()
                .is_some_and(|m| m.kind == NodeKind::ExpansionSpread)
    }

    /// The `ExpansionVar` or `ExpansionCall` wrapped by an `Expansion` node.
    pub fn expansion_target(&self) -> Option<&NodeRef> {
        match self.kind {
            NodeKind::Expansion => self.children.get(1),
            _ => None,
        }
    }

    /// All descendants (not including `self`) matching `pred`, in pre-order.
    pub fn find_all(&self, pred: &dyn Fn(&AstNode) -> bool) -> Vec<NodeRef> {
        let mut found = Vec::new();
        let mut stack: Vec<&NodeRef> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if pred(node.as_ref()) {
                found.push(Rc::clone(node));
            }
            stack.extend(node.children.iter().rev());
        }
        found
    }

    /// Indented tree listing with kinds, literal texts and positions.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        use std::fmt::Write;

        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(self.kind.as_str());
        if self.kind == NodeKind::String {
            let _ = write!(out, " {:?}", self.text);
        }
        let _ = writeln!(out, " ({}:{})", self.pos.line, self.pos.pos);
        for child in &self.children {
            child.dump_into(out, depth + 1);
        }
    }
}

impl PartialEq for AstNode {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.text == other.text && self.children == other.children
    }
}

impl Eq for AstNode {}
