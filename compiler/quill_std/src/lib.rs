//! Standard handler set for Quill.
//!
//! The core interpreter knows no commands at all; this crate supplies the
//! usual ones. [`register`] adds everything that is safe to expose to
//! untrusted scripts. File access ([`register_files`]) and the `backtrace`
//! debug command ([`register_debug`]) are opt-in.
//!
//! ```text
//! let console = quill_std::buffer_console();
//! let interp = quill_std::register(Interpreter::builder(), &console).build();
//! interp.run_fresh("print $(+ 1 2)")?;
//! assert_eq!(console.get_output(), "3\n");
//! ```

mod arithmetic;
mod basic;
mod comparison;
pub mod console;
mod control;
mod files;
mod logic;
mod random;
mod stdio;
mod strings;
mod unified;
pub mod value;

#[cfg(test)]
mod test_helpers;

use quill_eval::{Interpreter, InterpreterBuilder};

pub use console::{buffer_console, silent_console, stdout_console, Console, SharedConsole};

/// Add the standard initializer, commands, controls and expansions, with
/// console I/O going to `console`.
pub fn register(builder: InterpreterBuilder, console: &SharedConsole) -> InterpreterBuilder {
    builder
        .initializer(basic::initialize)
        .command(basic::commands())
        .command(stdio::commands(console))
        .command(unified::commands(console))
        .control(control::controls())
        .expansion(arithmetic::expansions())
        .expansion(comparison::expansions())
        .expansion(logic::expansions())
        .expansion(strings::expansions())
        .expansion(random::expansions())
}

/// Add `file-open`, `file-read`, `file-write` and `file-close`.
pub fn register_files(builder: InterpreterBuilder) -> InterpreterBuilder {
    builder
        .command(files::commands())
        .expansion(files::expansions())
}

/// Add the `backtrace` command.
pub fn register_debug(builder: InterpreterBuilder, console: &SharedConsole) -> InterpreterBuilder {
    builder.command(stdio::debug_commands(console))
}

/// A fresh builder with the standard set registered.
pub fn builder(console: &SharedConsole) -> InterpreterBuilder {
    register(Interpreter::builder(), console)
}
