//! Subcommand implementations.

use std::fs;
use std::process;

use quill_eval::{ConsumeRestTriggers, InteractiveStream, Interpreter, ScriptError, StdinLineSource};
use tracing::{debug, info};

use crate::options::Options;
use crate::report;

fn read_source(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: cannot read '{path}': {e}");
            process::exit(1);
        }
    }
}

fn triggers(options: &Options) -> ConsumeRestTriggers {
    let mut triggers = ConsumeRestTriggers::new();
    for (call, index) in &options.triggers {
        triggers.insert(call.clone(), *index);
    }
    triggers
}

/// Run the script at `path`, exiting with status 1 on failure.
pub fn run_file(path: &str, options: &Options) {
    let source = read_source(path);
    let console = quill_std::stdout_console();
    let interp = options.builder(&console).build();

    info!(path, "running script");
    match interp.run_fresh(&source) {
        Ok(ctx) => debug!(statements = ctx.statement_count(), "script finished"),
        Err(error) => {
            eprintln!("{}", report::render(path, &source, &error));
            process::exit(1);
        }
    }
}

/// Print the syntax tree of the script at `path`.
pub fn parse_file(path: &str, options: &Options) {
    let source = read_source(path);
    match Interpreter::test_parse(&source, &triggers(options)) {
        Ok(dump) => print!("{dump}"),
        Err(error) => {
            eprintln!("{}", report::render(path, &source, &ScriptError::Parse(error)));
            process::exit(1);
        }
    }
}

/// Interactive session on stdin. Errors are reported and the session resumes.
pub fn repl(options: &Options) {
    let prelude = options.prelude.as_deref().map(read_source);
    let console = quill_std::stdout_console();
    let interp = options.builder(&console).build();
    let stream = InteractiveStream::new(StdinLineSource).with_prompts("> ", ". ");

    let mut on_error = |error: &ScriptError| eprintln!("{}", error.report());
    match interp.repl(stream, Some(&mut on_error), prelude.as_deref()) {
        Ok(_) => info!("session closed"),
        Err(error) => {
            match (&options.prelude, &prelude) {
                (Some(path), Some(source)) => eprintln!("{}", report::render(path, source, &error)),
                _ => eprintln!("{}", error.report()),
            }
            process::exit(1);
        }
    }
}
