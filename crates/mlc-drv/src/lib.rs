//! mlc-drv - Pipeline orchestration for the `mlc` binary.
//!
//! The driver routes command-line flags to pipeline phases:
//!
//! ```text
//! source --> lexer --> parser --> analyzer --> { interpreter, emitter }
//!              |          |           |
//!          --tokens     --ast     --symbols
//! ```
//!
//! Diagnostics go to stderr in the stable one-line format; data output
//! goes to stdout. The process exits 0 iff no error was reported.

pub mod pretty;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use tracing::debug;

use mlc_util::{Handler, SourceBuffer};

/// The Mini-Lang compiler and interpreter.
#[derive(ClapParser, Debug)]
#[command(name = "mlc")]
#[command(version)]
#[command(about = "Compile, inspect, and run Mini-Lang programs", long_about = None)]
pub struct Cli {
    /// Source file to compile.
    pub input: PathBuf,

    /// Write emitted Python source to this path.
    #[arg(short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Run the interpreter after successful analysis.
    #[arg(short = 'r')]
    pub run: bool,

    /// Print the AST as an ASCII tree and stop.
    #[arg(long)]
    pub ast: bool,

    /// Print the token stream and stop.
    #[arg(long)]
    pub tokens: bool,

    /// Print the symbol table and stop.
    #[arg(long)]
    pub symbols: bool,

    /// Enable debug-level phase tracing on stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Runs the pipeline for one invocation. Returns the process exit code.
pub fn run(cli: &Cli) -> Result<i32> {
    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let source = SourceBuffer::new(text);
    debug!(
        lines = source.line_count(),
        bytes = source.text().len(),
        "loaded {}",
        cli.input.display()
    );

    let handler = Handler::new();

    // Phase 1: lexing. The first lexical error is fatal.
    let Some(tokens) = mlc_lex::tokenize(source.text(), &handler) else {
        report(&handler);
        return Ok(1);
    };
    debug!(count = tokens.len(), "lexed token stream");

    if cli.tokens {
        print!("{}", pretty::render_tokens(&tokens));
        return Ok(0);
    }

    // Phase 2: parsing. The first syntax error is fatal.
    let Some(program) = mlc_par::Parser::new(tokens, &handler).parse() else {
        report(&handler);
        return Ok(1);
    };
    debug!(items = program.items.len(), "parsed program");

    if cli.ast {
        print!("{}", pretty::render_ast(&program));
        return Ok(0);
    }

    // Phase 3: semantic analysis. Errors batch.
    let Some(hir) = mlc_sem::analyze(&program, &handler) else {
        report(&handler);
        return Ok(1);
    };
    debug!(functions = hir.functions.len(), "analysis complete");

    if cli.symbols {
        print!("{}", pretty::render_symbols(&hir.table));
        return Ok(0);
    }

    if let Some(path) = &cli.output {
        let python = mlc_emit::emit(&hir);
        fs::write(path, python).with_context(|| format!("failed to write {}", path.display()))?;
        debug!("wrote emitted source to {}", path.display());
    }

    if cli.run {
        if let Err(err) = mlc_int::run(&hir) {
            eprintln!("{}", err.to_diagnostic());
            return Ok(1);
        }
    }

    Ok(0)
}

/// Prints every collected diagnostic to stderr, in emission order.
fn report(handler: &Handler) {
    for diagnostic in handler.diagnostics() {
        eprintln!("{}", diagnostic);
    }
}
