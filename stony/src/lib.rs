//! Stonylang library
//!
//! Statically bound scripting language: syntax trees are bound against a
//! scope chain, lowered to labels and gotos, and run by a small evaluator.

pub mod binding;
pub mod compilation;
pub mod diagnostics;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod lowering;
pub mod parser;
pub mod printer;
pub mod repl;
pub mod symbols;
pub mod syntax;
pub mod util;

pub use compilation::{Compilation, EvaluationResult};
pub use error::{CompileError, Result};
pub use syntax::{Span, SyntaxTree};
