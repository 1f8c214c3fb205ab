//! Syntax tree definitions

mod expr;
mod source;
mod span;
mod stmt;
mod tree;

pub use expr::*;
pub use source::SourceText;
pub use span::*;
pub use stmt::*;

use crate::diagnostics::DiagnosticBag;
use serde::Serialize;

/// Top-level statements of one submission, in source order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompilationUnit {
    pub statements: Vec<Spanned<Stmt>>,
    pub eof: Span,
}

/// Parsed source: the text, its tree, and whatever went wrong on the way
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub source: SourceText,
    pub root: CompilationUnit,
    pub diagnostics: DiagnosticBag,
    /// Input ended while the parser still expected more tokens
    pub incomplete: bool,
}

impl SyntaxTree {
    /// Lex and parse `text`, collecting syntax diagnostics instead of failing
    pub fn parse(text: impl Into<String>) -> Self {
        crate::parser::parse_source(SourceText::new(text))
    }
}
