//! Entrypoint for CLI
mod error;

use std::{env, fs, path::PathBuf, time::Instant};

use crystal_compiler::{
    lex::{debug_print_lexer, Lexer},
    prelude::*,
    IMPL_VERSION,
};
use log::{error, info, warn};

use crate::error::AppError;

static USAGE: &str = r#"
usage: crystal FILE [OUTPUT] [--strict] [--tokens]

Compiles a Crystal source file into MVN assembly. The output defaults
to the source path with an .asm extension.

options:
    --strict    Fail on the first semantic warning
    --tokens    Print the token stream before compiling

examples:
    crystal fib.crystal
    crystal fib.crystal fib.asm --strict
"#;

struct Args {
    input: PathBuf,
    output: PathBuf,
    strict: bool,
    tokens: bool,
}

fn run(args: Args) -> Result<(), AppError> {
    let source = fs::read_to_string(&args.input)?;

    if args.tokens {
        debug_print_lexer(Lexer::new(source.as_str()));
    }

    let conf = CompileConf {
        strict: args.strict,
        header_comment: true,
        ..CompileConf::default()
    };

    let start = Instant::now();
    let compilation = compile_with(source.as_str(), conf)?;
    let end = Instant::now();

    for warning in &compilation.warnings {
        warn!("{}: {}", args.input.display(), warning);
    }
    info!(
        "compiled {} tokens in {}ms",
        compilation.stats.tokens,
        end.duration_since(start).as_nanos() as f64 / 1000000.0
    );

    fs::write(&args.output, compilation.assembly)?;
    info!("wrote {}", args.output.display());

    Ok(())
}

fn main() {
    simple_logger::SimpleLogger::new().env().init().unwrap();

    let Some(args) = parse_args(env::args().skip(1)) else {
        print_usage();
        // FreeBSD EX_USAGE (64)
        std::process::exit(64)
    };

    if let Err(err) = run(args) {
        error!("{err}");
        std::process::exit(1);
    }
}

fn parse_args(args: impl Iterator<Item = String>) -> Option<Args> {
    let mut paths = vec![];
    let mut strict = false;
    let mut tokens = false;

    for arg in args {
        match arg.as_str() {
            "--strict" => strict = true,
            "--tokens" => tokens = true,
            flag if flag.starts_with("--") => return None,
            _ => paths.push(PathBuf::from(arg)),
        }
    }

    let mut paths = paths.into_iter();
    let input = paths.next()?;
    let output = paths.next().unwrap_or_else(|| input.with_extension("asm"));
    if paths.next().is_some() {
        return None;
    }

    Some(Args {
        input,
        output,
        strict,
        tokens,
    })
}

fn print_usage() {
    println!("Crystal v{IMPL_VERSION}");
    println!("{USAGE}");
}
