//! Compiles one source file to sjasmplus-flavoured Z80 assembly.

use std::{fs, process::ExitCode};

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use zx64c_compiler_lib::{analysis, compiler, parser, scanner};

use options::{Options, SNAPSHOT_VARIABLE};

mod options;

const LOG_VARIABLE: &str = "ZX64C_LOG";

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env(LOG_VARIABLE).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(status) => status,
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let snapshot_variable = std::env::var(SNAPSHOT_VARIABLE).ok();
    let options = Options::parse(std::env::args().skip(1), snapshot_variable.as_deref())?;
    debug!(?options, "parsed options");

    let source = fs::read_to_string(&options.input)
        .with_context(|| format!("Reading {}", options.input.display()))?;

    let Some(assembly) = compile(&source, options.snapshot.as_deref())? else {
        return Ok(ExitCode::FAILURE);
    };

    match &options.output {
        Some(path) => {
            fs::write(path, assembly).with_context(|| format!("Writing {}", path.display()))?;
            info!(path = %path.display(), "wrote assembly");
        }
        None => print!("{assembly}"),
    }

    Ok(ExitCode::SUCCESS)
}

/// Runs every stage over `source`. Diagnostics in the program itself are printed to stderr and
/// yield `None`; anything else is an error.
fn compile(source: &str, snapshot: Option<&str>) -> Result<Option<String>> {
    let tokens = match scanner::scan(source) {
        Ok(tokens) => tokens,
        Err(error) => {
            eprintln!("{error}");
            return Ok(None);
        }
    };

    let program = match parser::parse(&tokens) {
        Ok(program) => program,
        Err(error) => {
            eprintln!("{error}");
            return Ok(None);
        }
    };

    if let Err(error) = analysis::analyse(&program) {
        for message in error.messages() {
            eprintln!("{message}");
        }
        return Ok(None);
    }

    let listing = match snapshot {
        Some(name) => compiler::generate_snapshot(&program, name),
        None => compiler::generate(&program),
    }
    .context("Generating assembly")?;

    Ok(Some(listing.to_string()))
}
