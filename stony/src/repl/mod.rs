//! REPL (Read-Eval-Print Loop) for Stonylang

use crate::compilation::Compilation;
use crate::error::report_diagnostic;
use crate::interp::{Value, VariableStore};
use crate::printer::tree_to_string;
use crate::symbols::VariableRef;
use crate::syntax::SyntaxTree;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

const PROMPT: &str = "» ";
const CONTINUATION_PROMPT: &str = "· ";
const HISTORY_FILE: &str = ".stony_history";
const FILENAME: &str = "<repl>";

/// A `#` command typed at the start of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaCommand {
    ShowTree,
    ShowProgram,
    Cls,
    Reset,
    Vars,
    Help,
    Quit,
    Unknown(String),
}

impl MetaCommand {
    /// `None` when `line` is not a meta command
    pub fn parse(line: &str) -> Option<MetaCommand> {
        let line = line.trim();
        let name = line.strip_prefix('#')?;
        let command = match name {
            "showtree" => MetaCommand::ShowTree,
            "showprogram" => MetaCommand::ShowProgram,
            "cls" => MetaCommand::Cls,
            "reset" => MetaCommand::Reset,
            "vars" => MetaCommand::Vars,
            "help" => MetaCommand::Help,
            "quit" | "exit" => MetaCommand::Quit,
            _ => MetaCommand::Unknown(line.to_string()),
        };
        Some(command)
    }
}

/// What one round of reading produced
enum Input {
    Meta(MetaCommand),
    Submission(SyntaxTree),
    Eof,
}

/// REPL state
pub struct Repl {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
    previous: Option<Rc<Compilation>>,
    variables: VariableStore,
    show_tree: bool,
    show_program: bool,
}

impl Repl {
    /// Create a new REPL
    pub fn new() -> RlResult<Self> {
        let editor = DefaultEditor::new()?;
        let history_path = dirs_home().map(|h| h.join(HISTORY_FILE));

        let mut repl = Repl {
            editor,
            history_path,
            previous: None,
            variables: VariableStore::new(),
            show_tree: false,
            show_program: false,
        };

        if let Some(ref path) = repl.history_path {
            let _ = repl.editor.load_history(path);
        }

        Ok(repl)
    }

    /// Run the REPL
    pub fn run(&mut self) -> RlResult<()> {
        println!("Stonylang REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type #help for help, #quit to exit.\n");

        loop {
            match self.read_input()? {
                Input::Meta(command) => {
                    if self.handle_command(&command) {
                        break;
                    }
                }
                Input::Submission(syntax) => self.evaluate_submission(syntax),
                Input::Eof => {
                    println!("Goodbye!");
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path {
            let _ = self.editor.save_history(path);
        }
        Ok(())
    }

    /// Read lines until the text forms a complete submission or a meta command
    fn read_input(&mut self) -> RlResult<Input> {
        let mut text = String::new();

        loop {
            let prompt = if text.is_empty() { PROMPT } else { CONTINUATION_PROMPT };
            let line = match self.editor.readline(prompt) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    text.clear();
                    continue;
                }
                Err(ReadlineError::Eof) => return Ok(Input::Eof),
                Err(err) => return Err(err),
            };

            if text.is_empty() {
                if line.trim().is_empty() {
                    continue;
                }
                if let Some(command) = MetaCommand::parse(&line) {
                    let _ = self.editor.add_history_entry(line.trim());
                    return Ok(Input::Meta(command));
                }
            }

            let force = line.trim().is_empty();
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&line);

            if let Some(syntax) = complete_submission(&text, force) {
                let _ = self.editor.add_history_entry(text.as_str());
                return Ok(Input::Submission(syntax));
            }
        }
    }

    /// Handle a meta command; returns true when the REPL should exit
    fn handle_command(&mut self, command: &MetaCommand) -> bool {
        match command {
            MetaCommand::Quit => {
                println!("Goodbye!");
                return true;
            }
            MetaCommand::Help => self.print_help(),
            MetaCommand::ShowTree => {
                self.show_tree = !self.show_tree;
                println!("{}", toggle_message("parse trees", self.show_tree));
            }
            MetaCommand::ShowProgram => {
                self.show_program = !self.show_program;
                println!("{}", toggle_message("bound programs", self.show_program));
            }
            MetaCommand::Cls => print!("\x1B[2J\x1B[1;1H"),
            MetaCommand::Reset => self.reset(),
            MetaCommand::Vars => {
                for (variable, value) in self.top_level_variables() {
                    match value {
                        Some(value) => println!("{}: {} = {value}", variable.name, variable.ty),
                        None => println!("{}: {}", variable.name, variable.ty),
                    }
                }
            }
            MetaCommand::Unknown(text) => {
                println!("Unknown command: {text}");
                println!("Type #help for help.");
            }
        }
        false
    }

    fn reset(&mut self) {
        self.previous = None;
        self.variables.clear();
    }

    /// Bind, lower and run one submission; only a clean run extends the chain
    fn evaluate_submission(&mut self, syntax: SyntaxTree) {
        if self.show_tree {
            print!("{}", tree_to_string(&syntax.root));
        }

        let compilation = match &self.previous {
            Some(previous) => previous.continue_with(syntax),
            None => Compilation::new(syntax),
        };

        let diagnostics = compilation.diagnostics();
        if !diagnostics.is_empty() {
            let source = compilation.syntax().source.text();
            for diagnostic in &diagnostics {
                report_diagnostic(FILENAME, source, diagnostic);
            }
            return;
        }

        if self.show_program {
            let _ = compilation.emit_tree(&mut io::stdout());
        }

        match compilation.evaluate(&mut self.variables) {
            Ok(result) => {
                if let Some(value) = result.value.filter(|v| !v.is_void()) {
                    println!("{value}");
                }
                self.previous = Some(compilation);
            }
            Err(err) => eprintln!("{err}"),
        }
    }

    /// Top-level variables of the chain, oldest first, with their current values
    fn top_level_variables(&self) -> Vec<(VariableRef, Option<Value>)> {
        let mut scopes = Vec::new();
        let mut current = self.previous.as_ref().map(|c| c.global_scope());
        while let Some(scope) = current {
            current = scope.previous.clone();
            scopes.push(scope);
        }

        scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.variables.iter())
            .map(|variable| (Rc::clone(variable), self.variables.get(variable.id).cloned()))
            .collect()
    }

    /// Print help message
    fn print_help(&self) {
        println!("Stonylang REPL Commands:");
        println!("  #help           Show this help");
        println!("  #quit           Exit the REPL");
        println!("  #cls            Clear the screen");
        println!("  #reset          Forget all variables");
        println!("  #vars           List declared variables");
        println!("  #showtree       Toggle parse tree output");
        println!("  #showprogram    Toggle lowered program output");
        println!();
        println!("An unfinished statement continues on the next line; an empty line submits it.");
        println!();
        println!("Built-in functions:");
        println!("  print(x)        Print value without newline");
        println!("  println(x)      Print value with newline");
        println!("  input()         Read one line");
        println!("  stringify(x)    Value as a string");
        println!("  random(n)       Random int in [0, n) or float in [0, n)");
    }
}

/// The parsed submission, unless the text still expects more input
fn complete_submission(text: &str, force: bool) -> Option<SyntaxTree> {
    let syntax = SyntaxTree::parse(text);
    (force || !syntax.incomplete).then_some(syntax)
}

fn toggle_message(what: &str, enabled: bool) -> String {
    if enabled {
        format!("Showing {what}.")
    } else {
        format!("Not showing {what}.")
    }
}

/// Get home directory
fn dirs_home() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}
