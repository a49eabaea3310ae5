//! Quill command-line driver.

mod commands;
mod options;
mod report;
mod tracing_setup;

use options::Options;

fn main() {
    tracing_setup::init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = args[1].as_str();
    let options = match Options::parse(&args[2..], |name| std::env::var(name).ok()) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };

    match command {
        "run" => {
            let Some(path) = options.path.as_deref() else {
                eprintln!("Usage: quill run <file.qs> [options]");
                std::process::exit(2);
            };
            commands::run_file(path, &options);
        }
        "parse" => {
            let Some(path) = options.path.as_deref() else {
                eprintln!("Usage: quill parse <file.qs> [--consume-rest=NAME:INDEX]");
                std::process::exit(2);
            };
            commands::parse_file(path, &options);
        }
        "repl" => commands::repl(&options),
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-V" => println!("quill {}", env!("CARGO_PKG_VERSION")),
        other => {
            eprintln!("error: unknown command '{other}'");
            print_usage();
            std::process::exit(2);
        }
    }
}

fn print_usage() {
    println!("Quill scripting language");
    println!();
    println!("Usage: quill <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file>     Run a script");
    println!("  parse <file>   Print the syntax tree of a script");
    println!("  repl           Start an interactive session");
    println!("  help           Show this message");
    println!("  version        Show the version");
    println!();
    println!("Options:");
    println!("  --statement-limit=<n>      Stop after n statements (0 = unbounded)");
    println!("  --call-depth=<n>           Maximum call nesting (0 = unbounded, default 200)");
    println!("  --consume-rest=<name:idx>  Take the rest of the line verbatim from argument idx of name");
    println!("  --allow-files              Enable file-open, file-read, file-write, file-close");
    println!("  --debug                    Enable the backtrace command");
    println!("  --prelude=<file>           Script to run before the first prompt (repl only)");
    println!();
    println!("Environment:");
    println!("  QUILL_STATEMENT_LIMIT, QUILL_CALL_DEPTH  Defaults for the limits above");
    println!("  RUST_LOG                                 Enable tracing output on stderr");
    println!("  QUILL_LOG_TREE=1                         Hierarchical tracing output");
}
