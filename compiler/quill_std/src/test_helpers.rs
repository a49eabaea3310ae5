//! Helpers for running scripts against the full standard set in unit tests.

#![allow(clippy::panic)]

use quill_eval::{EvalError, Interpreter, ScriptError};

use crate::{buffer_console, register, register_debug, SharedConsole};

pub struct Harness {
    pub console: SharedConsole,
    pub interp: Interpreter,
}

impl Harness {
    pub fn new() -> Self {
        let console = buffer_console();
        let interp = register_debug(register(Interpreter::builder(), &console), &console).build();
        Harness { console, interp }
    }

    pub fn run(&self, script: &str) -> Result<String, ScriptError> {
        self.console.clear();
        self.interp.run_fresh(script)?;
        Ok(self.console.get_output())
    }
}

/// Output of a script that must succeed.
pub fn run(script: &str) -> String {
    match Harness::new().run(script) {
        Ok(output) => output,
        Err(e) => panic!("script failed: {}\n{script}", e.report()),
    }
}

/// Value of a single expansion call, e.g. `eval("+ 1 2")`.
pub fn eval(call: &str) -> String {
    let output = run(&format!("print $({call})"));
    output.strip_suffix('\n').unwrap_or(&output).to_owned()
}

/// Runtime error of a script that must fail.
pub fn error(script: &str) -> EvalError {
    match Harness::new().run(script) {
        Ok(output) => panic!("expected an error, got output {output:?}\n{script}"),
        Err(ScriptError::Eval(e)) => e,
        Err(ScriptError::Parse(e)) => panic!("unexpected parse error: {e}\n{script}"),
    }
}

/// Message of the error raised by a single expansion call.
pub fn eval_error(call: &str) -> String {
    error(&format!("print $({call})")).kind.to_string()
}
