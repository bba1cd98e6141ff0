//! The mesh compiler driver CLI.
//!
//! Provides the `meshc` command with the following subcommands:
//!
//! - `meshc check <file>` - scan, parse, and atomize a source file,
//!   printing `ariadne`-rendered diagnostics
//! - `meshc dump-tokens <file>` - print the scanner's token stream
//! - `meshc dump-ast <file>` - print the parsed AST
//! - `meshc gen-tables <grammar-file>` - run the LR(1) generator on a
//!   grammar file in the line-oriented text format and print its
//!   pretty-printed table

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "meshc", version, about = "The mesh compiler driver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan, parse, and type-check a source file
    Check { file: PathBuf },
    /// Print the scanner's token stream
    DumpTokens { file: PathBuf },
    /// Print the parsed AST
    DumpAst { file: PathBuf },
    /// Run the LR(1) table generator on a grammar file and print the table
    GenTables { grammar_file: PathBuf },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { file } => check(&file),
        Commands::DumpTokens { file } => dump_tokens(&file),
        Commands::DumpAst { file } => dump_ast(&file),
        Commands::GenTables { grammar_file } => gen_tables(&grammar_file),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn read_source(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("failed to read '{}': {e}", path.display()))
}

/// `meshc check`: scan -> parse -> atomize, printing every diagnostic with
/// `ariadne` and exiting non-zero on any Error-severity diagnostic.
fn check(path: &Path) -> Result<(), String> {
    let source = read_source(path)?;

    let module = match mesh_parser::parse(&source) {
        Ok(module) => module,
        Err(err) => {
            eprintln!("{}", render_syntax_error(&err, &source));
            process::exit(1);
        }
    };

    let result = mesh_typeck::check(&module);
    for error in &result.errors {
        eprintln!("{}", mesh_typeck::diagnostics::render(error, &source));
    }
    if !result.is_ok() {
        process::exit(1);
    }
    Ok(())
}

fn render_syntax_error(err: &mesh_parser::SyntaxError, source: &str) -> String {
    use ariadne::{Color, Config, Label, Report, ReportKind, Source};
    let len = source.len();
    let start = (err.span.start as usize).min(len);
    let end = (err.span.end as usize).min(len).max(start + 1).min(len.max(start + 1));
    let range = start..end;

    let report = Report::build(ReportKind::Error, range.clone())
        .with_message(&err.message)
        .with_config(Config::default().with_color(false))
        .with_label(Label::new(range).with_message(&err.message).with_color(Color::Red))
        .finish();

    let mut buf = Vec::new();
    report.write(Source::from(source), &mut buf).expect("diagnostic render should not fail");
    String::from_utf8(buf).expect("diagnostic output should be valid UTF-8")
}

fn dump_tokens(path: &Path) -> Result<(), String> {
    let source = read_source(path)?;
    for token in mesh_lexer::Scanner::tokenize(&source) {
        println!("{:?} {:?}", token.kind, token.span);
    }
    Ok(())
}

fn dump_ast(path: &Path) -> Result<(), String> {
    let source = read_source(path)?;
    match mesh_parser::parse(&source) {
        Ok(module) => {
            println!("{module:#?}");
            Ok(())
        }
        Err(err) => Err(err.to_string()),
    }
}

/// `meshc gen-tables`: parse the text-format grammar file (§6), lower it,
/// build its canonical LR(1) table, and print it (§4.3/§4.4).
fn gen_tables(grammar_file: &Path) -> Result<(), String> {
    let text = read_source(grammar_file)?;
    let grammar = mesh_grammar::text::parse(&text)
        .map_err(|e| format!("invalid grammar file '{}': {e}", grammar_file.display()))?;

    let lowered = mesh_grammar::lower(&grammar);
    let table = mesh_grammar::build(&lowered).map_err(|e| e.to_string())?;
    println!("{}", mesh_grammar::dump_table(&table, &lowered.symbols));
    Ok(())
}
