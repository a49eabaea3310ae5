//! Interactive sessions fed from pre-recorded lines.

use pretty_assertions::assert_eq;
use quill_eval::{InteractiveStream, Interpreter, ScriptError, ScriptedLines};
use quill_std::{buffer_console, register};

#[test]
fn session_survives_errors() {
    let console = buffer_console();
    let interp = register(Interpreter::builder(), &console).build();
    let lines = [
        "set x 2",
        "print $(* $x 21)",
        "!repeat(2) {",
        "  write ab",
        "}",
        "print",
        "print $nope",
        "print done",
    ];
    let mut errors = Vec::new();
    let mut on_error = |e: &ScriptError| errors.push(e.to_string());
    let session = interp.repl(
        InteractiveStream::new(ScriptedLines::new(lines)),
        Some(&mut on_error),
        None,
    );

    assert!(session.is_ok());
    assert_eq!(console.get_output(), "42\nabab\ndone\n");
    assert_eq!(errors, ["line 7, position 8: no such variable \"nope\""]);
}

#[test]
fn prelude_definitions_are_available() {
    let console = buffer_console();
    let interp = register(Interpreter::builder(), &console).build();
    let stream = InteractiveStream::new(ScriptedLines::new(["print $(double 21)", "stop", "print no"]));
    let session = interp.repl(stream, None, Some("!def(double x) return $(* $x 2)"));

    assert!(session.is_ok());
    assert_eq!(console.get_output(), "42\n");
}
