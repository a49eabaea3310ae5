//! Rendering a tree back to script text.
//!
//! The output re-parses to a structurally equal tree. Literals are quoted
//! whenever they contain a character the tokenizer would treat specially.

use crate::{AstNode, NodeKind};

const INDENT: &str = "    ";

impl AstNode {
    /// Render this node as script source.
    pub fn to_script(&self) -> String {
        let mut out = String::new();
        match self.kind() {
            NodeKind::Root => {
                for child in self.children() {
                    write_statements(&mut out, child, 0);
                }
            }
            NodeKind::Block if self.children().is_empty() => out.push_str("{}"),
            _ => write_node(&mut out, self, 0),
        }
        out
    }
}

/// Statements of a top-level block, one per line, without braces.
fn write_statements(out: &mut String, block: &AstNode, depth: usize) {
    for statement in block.children() {
        indent(out, depth);
        write_node(out, statement, depth);
        out.push('\n');
    }
}

fn write_node(out: &mut String, node: &AstNode, depth: usize) {
    match node.kind() {
        NodeKind::Root => {
            for child in node.children() {
                write_statements(out, child, depth);
            }
        }
        NodeKind::Block => {
            out.push_str("{\n");
            write_statements(out, node, depth + 1);
            indent(out, depth);
            out.push('}');
        }
        NodeKind::CommandCall => {
            write_children(out, node, depth, " ");
        }
        NodeKind::ControlCall => {
            out.push('!');
            if let Some(name) = node.call_name() {
                write_node(out, name, depth);
            }
            if let Some(args) = node.call_args().filter(|a| !a.children().is_empty()) {
                out.push('(');
                write_node(out, args, depth);
                out.push(')');
            }
            if let Some(body) = node.control_node() {
                out.push(' ');
                write_node(out, body, depth);
            }
        }
        NodeKind::ExpansionCall => {
            out.push('(');
            write_children(out, node, depth, " ");
            out.push(')');
        }
        NodeKind::Arguments => write_children(out, node, depth, " "),
        NodeKind::Expansion => {
            out.push('$');
            if node.is_spread() {
                out.push('^');
            }
            if let Some(target) = node.expansion_target() {
                write_node(out, target, depth);
            }
        }
        NodeKind::ExpansionVar => write_children(out, node, depth, ""),
        NodeKind::ExpansionSpread | NodeKind::ExpansionSingle => {}
        NodeKind::String => write_literal(out, node.text()),
    }
}

/// Children separated by `sep`, skipping empty argument lists.
fn write_children(out: &mut String, node: &AstNode, depth: usize, sep: &str) {
    let mut first = true;
    for child in node.children() {
        if child.kind() == NodeKind::Arguments && child.children().is_empty() {
            continue;
        }
        if !first {
            out.push_str(sep);
        }
        first = false;
        write_node(out, child, depth);
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn needs_quotes(text: &str) -> bool {
    text.is_empty()
        || text.starts_with(['#', '!', '^'])
        || text.chars().any(|c| {
            c.is_whitespace()
                || c.is_control()
                || matches!(c, ';' | '(' | ')' | '{' | '}' | '$' | '"' | '\\')
        })
}

fn write_literal(out: &mut String, text: &str) {
    if !needs_quotes(text) {
        out.push_str(text);
        return;
    }
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests;
