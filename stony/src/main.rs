//! Stonylang CLI

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Once;
use stony::compilation::Compilation;
use stony::error::report_diagnostic;
use stony::interp::VariableStore;
use stony::syntax::SyntaxTree;

#[derive(Parser)]
#[command(name = "stony", version, about = "Stonylang interpreter")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a source file
    Run {
        /// Source file to run
        file: PathBuf,
        /// Print the syntax tree before running
        #[arg(long)]
        show_tree: bool,
        /// Print the lowered program before running
        #[arg(long)]
        show_program: bool,
    },
    /// Report diagnostics without running
    Check {
        /// Source file to check
        file: PathBuf,
    },
    /// Start the interactive REPL (default)
    Repl,
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
    /// Parse and dump the syntax tree as JSON (debug)
    Parse {
        /// Source file to parse
        file: PathBuf,
    },
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Command::Repl) {
        Command::Run {
            file,
            show_tree,
            show_program,
        } => run_file(&file, show_tree, show_program),
        Command::Check { file } => check_file(&file),
        Command::Repl => start_repl(),
        Command::Tokens { file } => tokenize_file(&file),
        Command::Parse { file } => parse_file(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Install a fmt subscriber when `RUST_LOG` is set
fn init_tracing() {
    static INIT: Once = Once::new();
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Parse and bind; prints diagnostics and returns `None` when there are any
fn compile(path: &Path) -> Result<Option<std::rc::Rc<Compilation>>, Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();

    let compilation = Compilation::new(SyntaxTree::parse(source));
    let diagnostics = compilation.diagnostics();
    if diagnostics.is_empty() {
        return Ok(Some(compilation));
    }

    let text = compilation.syntax().source.text();
    for diagnostic in &diagnostics {
        report_diagnostic(&filename, text, diagnostic);
    }
    Ok(None)
}

fn run_file(path: &Path, show_tree: bool, show_program: bool) -> CliResult {
    let Some(compilation) = compile(path)? else {
        std::process::exit(1);
    };

    if show_tree {
        print!("{}", stony::printer::tree_to_string(&compilation.syntax().root));
    }
    if show_program {
        compilation.emit_tree(&mut std::io::stdout())?;
    }

    let mut variables = VariableStore::new();
    let result = compilation.evaluate(&mut variables)?;
    if let Some(value) = result.value.filter(|v| !v.is_void()) {
        println!("{value}");
    }
    Ok(())
}

fn check_file(path: &Path) -> CliResult {
    if compile(path)?.is_none() {
        std::process::exit(1);
    }
    println!("✓ {} checks successfully", path.display());
    Ok(())
}

fn start_repl() -> CliResult {
    let mut repl = stony::repl::Repl::new()?;
    repl.run()?;
    Ok(())
}

fn tokenize_file(path: &Path) -> CliResult {
    let source = std::fs::read_to_string(path)?;

    let tokens = stony::lexer::tokenize(&source)?;
    for (tok, span) in &tokens {
        println!("{:?} @ {}..{}", tok, span.start, span.end);
    }

    Ok(())
}

fn parse_file(path: &Path) -> CliResult {
    let source = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();

    let tokens = stony::lexer::tokenize(&source)?;
    let unit = stony::parser::parse(&filename, &source, tokens)?;

    println!("{}", serde_json::to_string_pretty(&unit)?);
    Ok(())
}
