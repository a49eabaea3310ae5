use super::*;
use pretty_assertions::assert_eq;

fn read_until_newline<S: LineSource>(stream: &mut InteractiveStream<S>) -> String {
    let mut out = String::new();
    while let Ok(c) = stream.get_char() {
        stream.next_char();
        if c == '\n' {
            break;
        }
        out.push(c);
    }
    out
}

#[test]
fn fetches_lazily_and_skips_blank_lines() {
    let mut stream = InteractiveStream::new(ScriptedLines::new(["print a", "", "   ", "print b"]));
    assert!(stream.source().prompts().is_empty());

    assert_eq!(read_until_newline(&mut stream), "print a");
    // The newline was consumed but nothing new has been requested yet.
    assert_eq!(stream.source().prompts().len(), 1);

    assert_eq!(read_until_newline(&mut stream), "print b");
    assert_eq!(stream.current_line(), 5);
}

#[test]
fn closed_source_reaches_eof() {
    let mut stream = InteractiveStream::new(ScriptedLines::new(["x"]));
    assert_eq!(read_until_newline(&mut stream), "x");
    assert!(!stream.at_eof());

    assert!(stream.get_char().is_err_and(|e| e.is_eof()));
    assert!(stream.at_eof());
    assert!(!stream.after_eof());

    stream.next_char();
    assert!(stream.after_eof());
}

#[test]
fn continuation_prompt_until_statement_ends() {
    let source = ScriptedLines::new(["!while(1) {", "print x", "}"]);
    let mut stream = InteractiveStream::new(source).with_prompts("> ", ". ");

    read_until_newline(&mut stream);
    read_until_newline(&mut stream);
    read_until_newline(&mut stream);
    stream.set_statement();
    assert!(stream.get_char().is_err());

    assert_eq!(stream.into_source().prompts(), ["> ", ". ", ". ", "> "]);
}

#[test]
fn set_statement_keeps_unread_text() {
    let mut stream = InteractiveStream::new(ScriptedLines::new(["set a 1; set b 2"]));
    for _ in 0.."set a 1;".len() {
        stream.get_char().ok();
        stream.next_char();
    }
    stream.set_statement();
    assert_eq!(stream.history(), " set b 2\n");
    assert_eq!(stream.get_char(), Ok(' '));
}

#[test]
fn next_line_discards_rest_of_line() {
    let mut stream = InteractiveStream::new(ScriptedLines::new(["bad ( input", "good"]));
    assert_eq!(stream.get_char(), Ok('b'));
    stream.next_line();
    stream.set_statement();
    assert_eq!(read_until_newline(&mut stream), "good");
}

#[test]
fn io_errors_surface_as_input_errors() {
    struct Broken;
    impl LineSource for Broken {
        fn read_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    let mut stream = InteractiveStream::new(Broken);
    assert_eq!(
        stream.get_char(),
        Err(StreamError::Input {
            line: 1,
            message: "pipe closed".to_owned()
        })
    );
}
