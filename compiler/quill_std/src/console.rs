//! The terminal a script talks to.
//!
//! A [`Console`] pairs an output sink with an input source. Hosts pick both
//! when they build the standard set, so a sandboxed run can capture output
//! and feed canned input while the `quill` binary uses the real terminal.
//!
//! Output is line-oriented. `print` ends a line, `write` leaves it open, and
//! a captured console records finished lines separately from the open one.
//! Reading input first flushes any open line, so a prompt written with
//! `write` is on screen before `input` blocks.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use parking_lot::Mutex;

/// Output recorded by a capturing console.
#[derive(Default)]
struct Transcript {
    lines: Vec<String>,
    open: String,
}

impl Transcript {
    fn push(&mut self, text: &str, end_line: bool) {
        let mut pieces = text.split('\n').peekable();
        while let Some(piece) = pieces.next() {
            self.open.push_str(piece);
            if pieces.peek().is_some() {
                self.lines.push(std::mem::take(&mut self.open));
            }
        }
        if end_line {
            self.lines.push(std::mem::take(&mut self.open));
        }
    }

    fn text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text.push_str(&self.open);
        text
    }
}

enum Sink {
    Stdout,
    Capture(Mutex<Transcript>),
    Discard,
}

enum Source {
    Stdin,
    Queue(Mutex<VecDeque<String>>),
    Closed,
}

pub struct Console {
    sink: Sink,
    source: Source,
}

/// Console shared between the handlers of one interpreter and its host.
pub type SharedConsole = Arc<Console>;

impl Console {
    /// Process stdout and stdin.
    pub fn stdio() -> Self {
        Console {
            sink: Sink::Stdout,
            source: Source::Stdin,
        }
    }

    /// Captured output; input served from [`push_input`](Self::push_input).
    pub fn buffered() -> Self {
        Console {
            sink: Sink::Capture(Mutex::new(Transcript::default())),
            source: Source::Queue(Mutex::new(VecDeque::new())),
        }
    }

    /// Output discarded; input always at its end.
    pub fn silent() -> Self {
        Console {
            sink: Sink::Discard,
            source: Source::Closed,
        }
    }

    /// Write `text` and end the line.
    pub fn println(&self, text: &str) {
        self.emit(text, true);
    }

    /// Write `text`, leaving the line open.
    pub fn print(&self, text: &str) {
        self.emit(text, false);
    }

    fn emit(&self, text: &str, end_line: bool) {
        match &self.sink {
            Sink::Stdout => {
                // A closed stdout must not abort the script.
                let mut out = io::stdout().lock();
                let _ = if end_line {
                    writeln!(out, "{text}")
                } else {
                    write!(out, "{text}").and_then(|()| out.flush())
                };
            }
            Sink::Capture(transcript) => transcript.lock().push(text, end_line),
            Sink::Discard => {}
        }
    }

    /// Push any open line out to the terminal.
    pub fn flush(&self) {
        if let Sink::Stdout = self.sink {
            let _ = io::stdout().flush();
        }
    }

    /// Next input line without its terminator; `Ok(None)` once input is exhausted.
    pub fn read_line(&self) -> io::Result<Option<String>> {
        self.flush();
        match &self.source {
            Source::Stdin => {
                let mut line = String::new();
                if io::stdin().lock().read_line(&mut line)? == 0 {
                    return Ok(None);
                }
                let len = line.trim_end_matches(['\n', '\r']).len();
                line.truncate(len);
                Ok(Some(line))
            }
            Source::Queue(queue) => Ok(queue.lock().pop_front()),
            Source::Closed => Ok(None),
        }
    }

    /// Queue input for later reads, one entry per line of `text`. Consoles
    /// without an input queue ignore it.
    pub fn push_input(&self, text: impl AsRef<str>) {
        if let Source::Queue(queue) = &self.source {
            let mut queue = queue.lock();
            let text = text.as_ref();
            if text.is_empty() {
                queue.push_back(String::new());
            }
            queue.extend(text.lines().map(str::to_owned));
        }
    }

    /// Everything captured so far, open line included. Empty for consoles
    /// that do not capture.
    pub fn get_output(&self) -> String {
        match &self.sink {
            Sink::Capture(transcript) => transcript.lock().text(),
            Sink::Stdout | Sink::Discard => String::new(),
        }
    }

    /// Finished lines captured so far.
    pub fn lines(&self) -> Vec<String> {
        match &self.sink {
            Sink::Capture(transcript) => transcript.lock().lines.clone(),
            Sink::Stdout | Sink::Discard => Vec::new(),
        }
    }

    /// Forget captured output.
    pub fn clear(&self) {
        if let Sink::Capture(transcript) = &self.sink {
            *transcript.lock() = Transcript::default();
        }
    }
}

pub fn stdout_console() -> SharedConsole {
    Arc::new(Console::stdio())
}

pub fn buffer_console() -> SharedConsole {
    Arc::new(Console::buffered())
}

pub fn silent_console() -> SharedConsole {
    Arc::new(Console::silent())
}
