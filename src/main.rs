use std::{env, fs, io::{self, Write}, process::ExitCode, sync::Once};

use anyhow::{bail, Context};
use schemer::{Interpreter, Options, Program, SchemeError};

const USAGE: &str = "Usage: schemer [--strict] [--max-depth <n>] <file>";

static TRACING_INIT: Once = Once::new();

/// Logs go to stderr, and only when `RUST_LOG` is set (e.g. `RUST_LOG=schemer=debug`).
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Writes the reason arguments were rejected, if any, followed by the usage line.
fn print_usage(mut out: impl Write, error: Option<&anyhow::Error>) -> ExitCode {
    if let Some(error) = error {
        let _ = writeln!(out, "{:#}", error);
    }
    let _ = writeln!(out, "{}", USAGE);
    ExitCode::from(1)
}

struct Arguments {
    path: String,
    options: Options,
}

/// `Ok(None)` when no source file was given.
fn parse_arguments(mut args: impl Iterator<Item = String>) -> anyhow::Result<Option<Arguments>> {
    let mut options = Options::default();
    let mut path = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--strict" => options = options.strict(),
            "--max-depth" => {
                let depth = args.next().context("--max-depth needs a value")?;
                options = options.with_max_depth(depth.parse().with_context(|| format!("invalid depth {:?}", depth))?);
            }
            flag if flag.starts_with("--") => bail!("unknown option {}", flag),
            _ if path.is_some() => bail!("more than one source file given"),
            _ => path = Some(arg),
        }
    }

    Ok(path.map(|path| Arguments { path, options }))
}

fn run(arguments: Arguments) -> anyhow::Result<()> {
    let source = fs::read_to_string(&arguments.path)
        .with_context(|| format!("could not read {}", arguments.path))?;

    let program = Program::parse(&source)?;
    let mut interpreter = Interpreter::stdio(arguments.options);
    program.run(&mut interpreter).map_err(SchemeError::from)?;
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    let arguments = match parse_arguments(env::args().skip(1)) {
        Ok(Some(arguments)) => arguments,
        Ok(None) => return print_usage(io::stderr(), None),
        Err(error) => return print_usage(io::stderr(), Some(&error)),
    };

    match run(arguments) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => match error.downcast_ref::<SchemeError>() {
            Some(SchemeError::Syntax { .. }) => {
                eprintln!("\x1b[31m{}\x1b[0m", error);
                ExitCode::from(1)
            }
            Some(SchemeError::Eval(fault)) => {
                eprintln!("\x1b[31m{}: {}\x1b[0m", fault.kind(), fault);
                ExitCode::from(2)
            }
            None => {
                eprintln!("{:#}", error);
                ExitCode::from(1)
            }
        },
    }
}
