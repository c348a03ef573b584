pub mod util;
pub mod interpreter;

use std::io::{BufRead, Write};
use std::path::PathBuf;
use clap::{CommandFactory, Parser as ClapParser};
use thiserror::Error;
use crate::interpreter::evaluator::{Evaluator, RuntimeError, DEFAULT_MAX_CALL_DEPTH};
use crate::interpreter::lexer::{tokenize, LexerError};
use crate::interpreter::parser::{parse, ParseError};

#[derive(ClapParser, Debug)]
#[clap(name = "chiken", author, version, about = "ChIkEn Programming Language interpreter", long_about = None)]
pub struct Config {
    #[clap(help = "ChIkEn source file to run (.chiken)")]
    pub file: Option<PathBuf>,
    #[clap(short, long, help = "Run code directly from the command line")]
    pub code: Option<String>,

    #[clap(long, default_value_t = DEFAULT_MAX_CALL_DEPTH, help = "Maximum depth of nested function calls")]
    pub max_call_depth: usize,

    #[clap(long, help = "Print the token stream instead of running the program")]
    pub dump_tokens: bool,
    #[clap(long, help = "Print the parsed program instead of running it")]
    pub dump_ast: bool,

    #[clap(short, long, help = "Print verbose log output")]
    pub verbose: bool,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Lexer(#[from] LexerError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("File '{}' not found", .path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Parses and runs `source`, writing everything it prints to `output`.
/// Returns the output sink once the program has finished.
pub fn execute<W: Write, R: BufRead>(source: &str, output: W, input: R) -> Result<W, Error> {
    let program = parse(source)?;

    let mut evaluator = Evaluator::new(output, input);
    evaluator.execute(&program)?;

    Ok(evaluator.into_output())
}

pub fn run(config: &Config) -> Result<(), Error> {
    crate::println_debug!("{:?}", config);

    let source = match (&config.code, &config.file) {
        (Some(code), _) => code.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .map_err(|source| Error::FileNotFound { path: path.clone(), source })?,
        (None, None) => {
            Config::command().print_help()?;
            return Ok(());
        },
    };

    crate::verbose!(config.verbose, "Read {} bytes of source", source.len());

    if config.dump_tokens {
        let tokens = tokenize(&source)?;

        for token in &tokens {
            println!("{}..{} {:?} {}", token.start(), token.end(), token.token_type(), token);
        }

        crate::verbose!(config.verbose, "Lexed {} tokens", tokens.len());
        return Ok(());
    }

    let program = parse(&source)?;
    crate::verbose!(config.verbose, "Parsed {} top-level statements", program.len());

    if config.dump_ast {
        for stmt in &program {
            println!("{}", stmt);
        }

        return Ok(());
    }

    let stdout = std::io::stdout();
    let stdin = std::io::stdin();
    let mut evaluator = Evaluator::new(stdout.lock(), stdin.lock())
        .with_max_call_depth(config.max_call_depth);

    evaluator.execute(&program)?;
    crate::verbose!(config.verbose, "Program finished");

    Ok(())
}
