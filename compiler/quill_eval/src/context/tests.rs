use pretty_assertions::assert_eq;
use quill_ir::{AstNode, SourcePos};

use super::*;
use crate::ArgSourceMap;

fn call(name: &str, args: &[&str]) -> CallContext {
    CallContext::new(
        name,
        args.iter().map(|a| (*a).to_owned()).collect(),
        ArgSourceMap::new(),
        None,
    )
}

#[test]
fn new_context_has_only_the_base_frame() {
    let ctx = InterpreterContext::new();
    assert_eq!(ctx.call_depth(), 0);
    assert_eq!(ctx.call_name(), MAIN_CALL);
    assert!(ctx.parent_call_context().is_none());
    assert!(!ctx.in_runtime_call());
    assert!(!ctx.is_bound());
    assert_eq!(ctx.statement_count(), 0);
}

#[test]
fn push_and_pop_track_the_active_call() {
    let mut ctx = InterpreterContext::new();
    ctx.push_call(call("outer", &[]));
    ctx.push_call(call("inner", &["a", "b"]));

    assert_eq!(ctx.call_depth(), 2);
    assert_eq!(ctx.call_name(), "inner");
    assert_eq!(ctx.args(), ["a", "b"]);
    assert_eq!(ctx.parent_call_context().map(CallContext::name), Some("outer"));

    let popped = ctx.pop_call();
    assert_eq!(popped.name(), "inner");
    assert_eq!(ctx.call_name(), "outer");
}

#[test]
#[should_panic(expected = "only the base frame")]
fn popping_the_base_frame_panics() {
    let mut ctx = InterpreterContext::new();
    ctx.pop_call();
}

#[test]
fn set_base_call_discards_frames() {
    let mut ctx = InterpreterContext::new();
    ctx.push_call(call("left", &[]));
    ctx.push_call(call("over", &[]));
    ctx.set_base_call();
    assert_eq!(ctx.call_depth(), 0);
    assert_eq!(ctx.call_name(), MAIN_CALL);
}

#[test]
fn else_signal_is_set_on_the_parent() {
    let mut ctx = InterpreterContext::new();
    ctx.push_call(call("if", &["0"]));
    if let Some(parent) = ctx.parent_call_context_mut() {
        parent.set_else_signal(true);
    }
    ctx.pop_call();
    assert!(ctx.call_context().else_signal());
}

#[test]
fn runtime_frames_are_detected_anywhere_on_the_stack() {
    let mut ctx = InterpreterContext::new();
    ctx.push_call(call("f", &[]));
    ctx.call_context_mut().mark_runtime_call();
    ctx.push_call(call("print", &[]));
    assert!(ctx.in_runtime_call());
}

#[test]
fn scoped_guard_closes_its_scope() {
    let mut ctx = InterpreterContext::new();
    ctx.set_var("x", "global");
    {
        let mut scope = ctx.scoped();
        assert_eq!(scope.vars().depth(), 2);
        scope.set_var("x", "local");
        scope.set_var("y", "local");
        assert_eq!(scope.get_var("x"), Some("local"));
    }
    assert_eq!(ctx.vars().depth(), 1);
    assert_eq!(ctx.get_var("x"), Some("global"));
    assert_eq!(ctx.get_var("y"), None);
}

#[test]
fn scoped_guard_closes_on_early_return() {
    fn fails(ctx: &mut InterpreterContext) -> Result<(), ()> {
        let mut scope = ctx.scoped();
        scope.set_var("tmp", "1");
        Err(())
    }

    let mut ctx = InterpreterContext::new();
    assert!(fails(&mut ctx).is_err());
    assert_eq!(ctx.vars().depth(), 1);
    assert_eq!(ctx.get_var("tmp"), None);
}

#[test]
fn errors_take_the_current_node_position_and_a_backtrace() {
    let mut ctx = InterpreterContext::new();
    ctx.set_current_node(&AstNode::string("x", SourcePos::new(3, 7)));
    ctx.push_call(call("f", &["1"]));

    let error = ctx.error(EvalErrorKind::UndefinedVariable {
        name: "x".to_owned(),
    });
    assert_eq!(error.pos, Some(SourcePos::new(3, 7)));
    assert_eq!(error.backtrace.len(), 2);
    assert_eq!(error.to_string(), "line 3, position 7: no such variable \"x\"");
}

#[test]
fn raise_keeps_an_explicit_position() {
    let mut ctx = InterpreterContext::new();
    ctx.set_current_node(&AstNode::string("x", SourcePos::new(3, 7)));
    let error = ctx.raise(EvalError::handler("bad").at(SourcePos::new(1, 1)));
    assert_eq!(error.pos, Some(SourcePos::new(1, 1)));
}

#[test]
fn arg_errors_point_at_the_argument_source() {
    let name = AstNode::string("f", SourcePos::new(1, 1));
    let arg = AstNode::string("abc", SourcePos::new(1, 3));
    let mut sources = ArgSourceMap::new();
    sources.add_args(1, &arg);

    let mut ctx = InterpreterContext::new();
    ctx.set_current_node(&name);
    ctx.push_call(CallContext::new("f", vec!["abc".to_owned()], sources, None));

    assert_eq!(ctx.arg_error(0, "not a number").pos, Some(SourcePos::new(1, 3)));
    assert_eq!(ctx.arg_error(5, "missing").pos, Some(SourcePos::new(1, 1)));
}

#[test]
fn resources_are_typed_handles() {
    let mut ctx = InterpreterContext::new();
    let a = ctx.insert_resource(String::from("log"));
    let b = ctx.insert_resource(vec![1u8, 2, 3]);
    assert_ne!(a, b);
    assert_eq!(ctx.resource_count(), 2);

    assert_eq!(ctx.resource::<String>(a).map(String::as_str), Some("log"));
    assert!(ctx.resource::<String>(b).is_none());

    if let Some(bytes) = ctx.resource_mut::<Vec<u8>>(b) {
        bytes.push(4);
    }
    assert_eq!(ctx.resource::<Vec<u8>>(b).map(Vec::len), Some(4));

    assert!(ctx.close_resource(a));
    assert!(!ctx.close_resource(a));
    assert_eq!(ctx.resource_count(), 1);
}

#[test]
fn host_data_round_trips_by_type() {
    #[derive(Debug, PartialEq)]
    struct Session {
        user: &'static str,
    }

    let mut ctx = InterpreterContext::new();
    assert!(ctx.host_data::<Session>().is_none());

    ctx.set_host_data(Session { user: "ada" });
    assert_eq!(ctx.host_data::<Session>(), Some(&Session { user: "ada" }));
    assert!(ctx.host_data::<u32>().is_none());

    if let Some(session) = ctx.host_data_mut::<Session>() {
        session.user = "grace";
    }
    assert_eq!(ctx.host_data::<Session>().map(|s| s.user), Some("grace"));
}

#[test]
fn runtime_definitions_are_visible_through_the_command_chain() {
    use crate::handler::CallHandlerContainer;

    let ctx = InterpreterContext::new();
    let body = AstNode::new(quill_ir::NodeKind::Block, SourcePos::default(), Vec::new());
    ctx.runtime_commands().define("greet", body, Vec::new());
    assert!(ctx.commands().contains("greet"));
    assert!(!ctx.expansions().contains("greet"));
}
