mod output;

use lazylex::error::{LazylexError, LexError};
use lazylex::lexer::Lexer;
use output::{JsonlWriter, OutputMode, format_tokens_json};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::process;
use tracing::{Level, debug, info, warn};

#[cfg(feature = "profile")]
use std::fs::File;

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse flags
    let mut verbosity: u8 = 0;
    let mut output_mode = OutputMode::Text;
    let mut repl_mode = false;
    let mut eval_source: Option<String> = None;
    let mut source_path: Option<String> = None;
    let mut profile_mode = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            "-r" | "--repl" => {
                repl_mode = true;
            }
            "-p" | "--profile" => {
                profile_mode = true;
            }
            "-e" | "--eval" => {
                i += 1;
                if i < args.len() {
                    eval_source = Some(args[i].clone());
                } else {
                    eprintln!("Error: -e requires a source argument");
                    process::exit(1);
                }
            }
            "-o" | "--output" => {
                i += 1;
                match args.get(i).and_then(|name| OutputMode::parse(name)) {
                    Some(mode) => output_mode = mode,
                    None => {
                        eprintln!("Error: -o requires one of text, json, jsonl");
                        process::exit(1);
                    }
                }
            }
            "--verbose" => {
                verbosity = verbosity.saturating_add(1);
            }
            arg if arg.len() > 1 && arg.starts_with('-') && arg[1..].chars().all(|c| c == 'v') => {
                verbosity = verbosity.saturating_add((arg.len() - 1) as u8);
            }
            arg if !arg.starts_with('-') => {
                source_path = Some(arg.to_string());
            }
            unknown => {
                eprintln!("Unknown option: {}", unknown);
                process::exit(1);
            }
        }
        i += 1;
    }

    init_tracing(verbosity);

    if profile_mode && !cfg!(feature = "profile") {
        warn!("profiling requested but lazylex-cli was built without the profile feature");
    }

    if repl_mode {
        exit_with(run_repl());
    }

    // Determine source: -e > file > stdin
    let source = if let Some(source) = eval_source {
        source
    } else if let Some(path) = source_path {
        match fs::read_to_string(&path) {
            Ok(content) => {
                debug!(%path, "read source file");
                content
            }
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path, e);
                process::exit(1);
            }
        }
    } else if !atty::is(atty::Stream::Stdin) {
        let mut source = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut source) {
            eprintln!("Error reading from stdin: {}", e);
            process::exit(1);
        }
        source
    } else {
        print_help();
        process::exit(1);
    };

    #[cfg(feature = "profile")]
    let _guard = if profile_mode { start_profiler() } else { None };

    let result = run_source(&source, output_mode);

    #[cfg(feature = "profile")]
    if let Some(guard) = _guard {
        stop_profiler(guard);
    }

    exit_with(result);
}

enum ExitCode {
    ArgumentError,
    LexicalError,
}

fn exit_with(result: Result<(), ExitCode>) -> ! {
    match result {
        Ok(()) => process::exit(0),
        Err(ExitCode::ArgumentError) => process::exit(1),
        Err(ExitCode::LexicalError) => process::exit(3),
    }
}

/// Installs the stderr subscriber. `LAZYLEX_LOG` names a level and wins over
/// the `-v` count.
fn init_tracing(verbosity: u8) {
    let level = env::var("LAZYLEX_LOG")
        .ok()
        .and_then(|name| name.parse::<Level>().ok())
        .unwrap_or(match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        });
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}

fn print_help() {
    println!("lazylex - lazy JSON-like tokenizer");
    println!();
    println!("USAGE:");
    println!("    lazylex-cli <FILE>          Tokenize a file");
    println!("    lazylex-cli -e <SOURCE>     Tokenize inline source");
    println!("    lazylex-cli -r              Start REPL");
    println!("    lazylex-cli -p <FILE>       Tokenize with CPU profiling (requires --features profile)");
    println!("    lazylex-cli -h              Show this help");
    println!("    cat file | lazylex-cli      Read source from stdin");
    println!();
    println!("OPTIONS:");
    println!("    -e, --eval                  Tokenize inline source");
    println!("    -o, --output <MODE>         Output mode: text (default), json, jsonl");
    println!("    -v, --verbose               Log more; repeat for debug and trace");
    println!("    -p, --profile               Enable CPU profiling (outputs flamegraph.svg)");
    println!();
    println!("ENVIRONMENT:");
    println!("    LAZYLEX_LOG                 Log level (error, warn, info, debug, trace)");
    println!();
    println!("EXIT CODES:");
    println!("    0  all input tokenized");
    println!("    1  usage or I/O error");
    println!("    3  the input contains unknown characters");
}

fn run_source(source: &str, mode: OutputMode) -> Result<(), ExitCode> {
    info!(bytes = source.len(), ?mode, "tokenizing");
    let lexer = Lexer::new(source);

    let errors = write_tokens(&lexer, mode).map_err(|e| {
        eprintln!("Error writing output: {}", e);
        ExitCode::ArgumentError
    })?;

    if errors.is_empty() {
        return Ok(());
    }
    // Machine-readable modes already carry their errors on stdout.
    if mode == OutputMode::Text {
        for err in errors.iter().cloned() {
            print_diagnostic(source, &LazylexError::from(err));
        }
    }
    info!(errors = errors.len(), "input contains unknown characters");
    Err(ExitCode::LexicalError)
}

fn write_tokens(lexer: &Lexer, mode: OutputMode) -> io::Result<Vec<LexError>> {
    let mut out = io::stdout().lock();
    let mut errors = Vec::new();

    match mode {
        OutputMode::Text => {
            for token in lexer.tokens() {
                errors.extend(LexError::from_token(&token));
                writeln!(out, "{}", token)?;
            }
        }
        OutputMode::Json => {
            let tokens = lexer.tokenize();
            errors.extend(tokens.iter().filter_map(LexError::from_token));
            writeln!(out, "{}", format_tokens_json(&tokens)?)?;
        }
        OutputMode::Jsonl => {
            let mut writer = JsonlWriter::new(out);
            for token in lexer.tokens() {
                errors.extend(LexError::from_token(&token));
                writer.write_token(&token)?;
            }
            writer.finish()?;
        }
    }

    Ok(errors)
}

fn print_diagnostic(source: &str, error: &LazylexError) {
    if atty::is(atty::Stream::Stderr) {
        eprint!("{}", error.format_colored(source));
    } else {
        eprint!("{}", error.format_with_source(source));
    }
}

fn run_repl() -> Result<(), ExitCode> {
    println!("lazylex REPL. Each line is tokenized on its own; Ctrl-D exits.");

    let mut editor = DefaultEditor::new().map_err(|e| {
        eprintln!("Failed to initialize REPL: {}", e);
        ExitCode::ArgumentError
    })?;

    loop {
        match editor.readline(">> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                editor.add_history_entry(&line).ok();

                let lexer = Lexer::new(&line);
                for token in lexer.tokens() {
                    println!("{}", token);
                    if let Some(err) = LexError::from_token(&token) {
                        print_diagnostic(&line, &LazylexError::from(err));
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return Err(ExitCode::ArgumentError);
            }
        }
    }

    Ok(())
}

#[cfg(feature = "profile")]
fn start_profiler() -> Option<pprof::ProfilerGuard<'static>> {
    pprof::ProfilerGuardBuilder::default()
        .frequency(1000)
        .blocklist(&["libc", "libgcc", "pthread", "vdso"])
        .build()
        .inspect_err(|e| eprintln!("Profiler unavailable: {}", e))
        .ok()
}

#[cfg(feature = "profile")]
fn stop_profiler(guard: pprof::ProfilerGuard<'static>) {
    let written = guard
        .report()
        .build()
        .map_err(io::Error::other)
        .and_then(|report| {
            let file = File::create("flamegraph.svg")?;
            report.flamegraph(file).map_err(io::Error::other)
        });
    match written {
        Ok(()) => eprintln!("Wrote flamegraph.svg"),
        Err(e) => eprintln!("Failed to write flamegraph.svg: {}", e),
    }
}
