//! quillc: The quill compiler CLI.
//!
//! Usage:
//!   quillc [options] <file>...
//!
//! Compiles the given files as one program, prints diagnostics and
//! optionally dumps intermediate trees or runs the program.

mod report;

use clap::{Parser as ClapParser, ValueEnum};
use quill_compiler::{parse_files, Compilation, CompilationOptions};
use quill_core::text::SourceText;
use quill_core::CompilerArena;
use quill_evaluator::{Globals, StdHost};
use report::Reporter;
use std::io::IsTerminal;
use std::process;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser, Debug)]
#[command(name = "quillc", about = "quill - compiler for a small imperative language", version)]
struct Cli {
    /// Source files to compile as one program.
    #[arg(value_name = "FILE", required = true)]
    files: Vec<String>,

    /// Treat global statements as a script whose last expression is the result.
    #[arg(long)]
    script: bool,

    /// Run the program after a successful compilation.
    #[arg(long)]
    run: bool,

    /// Print an intermediate representation to stdout.
    #[arg(long, value_enum)]
    emit: Option<EmitKind>,

    /// Print diagnostics as plain `file(line,column): message` lines.
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum EmitKind {
    /// The syntax trees.
    Syntax,
    /// The bound function bodies.
    Bound,
    /// The lowered function bodies.
    Lowered,
    /// The control flow graphs in Graphviz format.
    Cfg,
}

const EXIT_USAGE: i32 = 1;
const EXIT_COMPILE_ERRORS: i32 = 2;
const EXIT_RUNTIME_ERROR: i32 = 3;

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    let exit_code = run_compile(&cli);
    process::exit(exit_code);
}

fn run_compile(cli: &Cli) -> i32 {
    let start = Instant::now();
    let reporter = Reporter::new(!cli.no_pretty && std::io::stderr().is_terminal());

    let mut sources = Vec::with_capacity(cli.files.len());
    for file in &cli.files {
        match std::fs::read_to_string(file) {
            Ok(text) => sources.push(SourceText::shared(file.as_str(), text)),
            Err(e) => {
                reporter.error(&format!("Failed to read '{}': {}", file, e));
                return EXIT_USAGE;
            }
        }
    }

    let arena = CompilerArena::new();
    let trees = parse_files(&arena, sources);
    let compilation = Compilation::new(CompilationOptions { is_script: cli.script }, trees);
    tracing::debug!(elapsed = ?start.elapsed(), "compilation finished");

    if let Some(kind) = cli.emit {
        let mut out = String::new();
        let written = match kind {
            EmitKind::Syntax => compilation.emit_syntax(&mut out),
            EmitKind::Bound => compilation.emit_bound(&mut out),
            EmitKind::Lowered => compilation.emit_lowered(&mut out),
            EmitKind::Cfg => compilation.emit_cfg(&mut out),
        };
        if written.is_err() {
            reporter.error("Failed to format output");
            return EXIT_USAGE;
        }
        print!("{}", out);
    }

    if !cli.run {
        let diagnostics = compilation.diagnostics();
        for diagnostic in &diagnostics {
            reporter.report(diagnostic);
        }
        reporter.summary(diagnostics.error_count(), diagnostics.warning_count());
        return if diagnostics.has_errors() { EXIT_COMPILE_ERRORS } else { 0 };
    }

    let mut globals = Globals::default();
    let mut host = StdHost::new();
    match compilation.evaluate(&mut globals, &mut host) {
        Ok(result) => {
            for diagnostic in &result.diagnostics {
                reporter.report(diagnostic);
            }
            reporter.summary(result.diagnostics.error_count(), result.diagnostics.warning_count());
            if result.diagnostics.has_errors() {
                return EXIT_COMPILE_ERRORS;
            }
            if let Some(value) = result.value {
                println!("{}", value);
            }
            0
        }
        Err(e) => {
            reporter.error(&e.to_string());
            EXIT_RUNTIME_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from(["quillc", "--script", "--run", "--emit", "lowered", "a.qs", "b.qs"]).unwrap();
        assert_eq!(cli.files, ["a.qs", "b.qs"]);
        assert!(cli.script);
        assert!(cli.run);
        assert_eq!(cli.emit, Some(EmitKind::Lowered));
        assert!(!cli.no_pretty);
    }

    #[test]
    fn test_files_required() {
        assert!(Cli::try_parse_from(["quillc"]).is_err());
        assert!(Cli::try_parse_from(["quillc", "--emit", "asm", "a.qs"]).is_err());
    }
}
