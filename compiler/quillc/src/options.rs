//! Command-line options, with defaults taken from the environment.

use quill_eval::{Interpreter, InterpreterBuilder, DEFAULT_CALL_DEPTH_LIMIT};
use quill_std::SharedConsole;
use thiserror::Error;

pub const STATEMENT_LIMIT_VAR: &str = "QUILL_STATEMENT_LIMIT";
pub const CALL_DEPTH_VAR: &str = "QUILL_CALL_DEPTH";

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("{source_name}: '{value}' is not a non-negative integer")]
    BadNumber { source_name: String, value: String },
    #[error("--consume-rest: expected NAME:INDEX, got '{0}'")]
    BadTrigger(String),
    #[error("unknown option '{0}'")]
    Unknown(String),
    #[error("unexpected argument '{0}'")]
    Extra(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub path: Option<String>,
    pub statement_limit: usize,
    pub call_depth: usize,
    pub triggers: Vec<(String, usize)>,
    pub allow_files: bool,
    pub debug: bool,
    pub prelude: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            path: None,
            statement_limit: 0,
            call_depth: DEFAULT_CALL_DEPTH_LIMIT,
            triggers: Vec::new(),
            allow_files: false,
            debug: false,
            prelude: None,
        }
    }
}

fn number(source_name: &str, value: &str) -> Result<usize, OptionError> {
    value.trim().parse().map_err(|_| OptionError::BadNumber {
        source_name: source_name.to_owned(),
        value: value.to_owned(),
    })
}

fn trigger(spec: &str) -> Result<(String, usize), OptionError> {
    let bad = || OptionError::BadTrigger(spec.to_owned());
    let (name, index) = spec.rsplit_once(':').ok_or_else(bad)?;
    if name.is_empty() {
        return Err(bad());
    }
    let index = index.parse().map_err(|_| bad())?;
    Ok((name.to_owned(), index))
}

impl Options {
    /// Parse the arguments after the subcommand. `env` looks up environment
    /// variables; flags override them.
    pub fn parse(
        args: &[String],
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Options, OptionError> {
        let mut options = Options::default();
        if let Some(value) = env(STATEMENT_LIMIT_VAR) {
            options.statement_limit = number(STATEMENT_LIMIT_VAR, &value)?;
        }
        if let Some(value) = env(CALL_DEPTH_VAR) {
            options.call_depth = number(CALL_DEPTH_VAR, &value)?;
        }

        for arg in args {
            if let Some(value) = arg.strip_prefix("--statement-limit=") {
                options.statement_limit = number("--statement-limit", value)?;
            } else if let Some(value) = arg.strip_prefix("--call-depth=") {
                options.call_depth = number("--call-depth", value)?;
            } else if let Some(spec) = arg.strip_prefix("--consume-rest=") {
                options.triggers.push(trigger(spec)?);
            } else if let Some(path) = arg.strip_prefix("--prelude=") {
                options.prelude = Some(path.to_owned());
            } else if arg == "--allow-files" {
                options.allow_files = true;
            } else if arg == "--debug" {
                options.debug = true;
            } else if arg.starts_with('-') {
                return Err(OptionError::Unknown(arg.clone()));
            } else if options.path.is_none() {
                options.path = Some(arg.clone());
            } else {
                return Err(OptionError::Extra(arg.clone()));
            }
        }
        Ok(options)
    }

    /// Interpreter configured with the standard set and these options.
    pub fn builder(&self, console: &SharedConsole) -> InterpreterBuilder {
        let mut builder = quill_std::register(Interpreter::builder(), console)
            .statement_limit(self.statement_limit)
            .call_depth_limit(self.call_depth);
        if self.allow_files {
            builder = quill_std::register_files(builder);
        }
        if self.debug {
            builder = quill_std::register_debug(builder, console);
        }
        for (call, index) in &self.triggers {
            builder = builder.consume_rest(call.clone(), *index);
        }
        builder
    }
}
