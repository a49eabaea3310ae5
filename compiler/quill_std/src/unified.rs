//! Settings that let scripts call expansions as commands.
//!
//! `use-unified-commands` turns the fallback on for the rest of the run: a
//! command name with no command handler is looked up among the expansions,
//! and the expansion's result is dropped. `use-print-on-unified` echoes each
//! such call and its result to the console.

use std::rc::Rc;
use std::sync::Arc;

use quill_eval::{CallbackCallHandler, Flow, InterpreterContext};

use crate::console::SharedConsole;

/// `$(name "a" "b"): returned "result"`
fn describe(ctx: &InterpreterContext, result: &str) -> String {
    let args: String = ctx.args().iter().map(|arg| format!(" \"{arg}\"")).collect();
    format!("$({}{args}): returned \"{result}\"", ctx.call_name())
}

pub fn commands(console: &SharedConsole) -> CallbackCallHandler<()> {
    let console = Arc::clone(console);
    CallbackCallHandler::new()
        .with_call("use-unified-commands", |_, ctx| {
            ctx.enable_unified_commands();
            Ok(Flow::CONTINUE)
        })
        .with_call("use-print-on-unified", move |_, ctx| {
            if ctx.unified_observer().is_none() {
                let console = Arc::clone(&console);
                ctx.set_unified_observer(Rc::new(move |ctx: &InterpreterContext, result: &str| {
                    console.println(&describe(ctx, result));
                }));
            }
            Ok(Flow::CONTINUE)
        })
}
