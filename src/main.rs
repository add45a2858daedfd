use std::fmt::Display;
use std::{env, fs, process};

use anyhow::{bail, Context};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use rpal::flatten::flatten;
use rpal::lexer::lex;
use rpal::machine::Machine;
use rpal::parser::parse;
use rpal::standardize::standardize;

struct Options {
    print_ast: bool,
    print_st: bool,
    filename: String,
}

fn parse_args() -> anyhow::Result<Options> {
    let mut print_ast = false;
    let mut print_st = false;
    let mut filename = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-ast" => print_ast = true,
            "-st" => print_st = true,
            _ if filename.is_none() => filename = Some(arg),
            _ => bail!("usage: rpal [-ast] [-st] <file>"),
        }
    }

    match filename {
        Some(filename) => Ok(Options {
            print_ast,
            print_st,
            filename,
        }),
        None => bail!("usage: rpal [-ast] [-st] <file>"),
    }
}

/// Print a stage diagnostic and terminate with a nonzero status.
fn fail(error: impl Display) -> ! {
    eprintln!("{}", error);
    process::exit(1)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let options = parse_args()?;
    let source = fs::read_to_string(&options.filename)
        .with_context(|| format!("cannot read '{}'", options.filename))?;

    let tokens = match lex(&source) {
        Ok(tokens) => tokens,
        Err(error) => fail(error),
    };
    debug!(tokens = tokens.len(), "lexing finished");

    let tree = match parse(tokens) {
        Ok(tree) => tree,
        Err(error) => fail(error),
    };
    if options.print_ast {
        print!("{}", tree);
        return Ok(());
    }

    let standard = standardize(tree);
    if options.print_st {
        print!("{}", standard);
        return Ok(());
    }

    let deltas = flatten(&standard);
    debug!(deltas = deltas.len(), "control structures built");

    let mut machine = Machine::new(deltas);
    match machine.run() {
        Ok(_) => {
            let output = machine.output();
            if !output.is_empty() {
                println!("{}", output);
            }
            Ok(())
        }
        Err(error) => fail(error),
    }
}
