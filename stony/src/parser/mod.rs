//! Parser implementation using lalrpop

use crate::diagnostics::{DiagnosticBag, DiagnosticKind};
use crate::error::{CompileError, Result};
use crate::lexer::{self, Token};
use crate::syntax::{CompilationUnit, SourceText, Span, SyntaxTree};
use lalrpop_util::ParseError;


lalrpop_util::lalrpop_mod!(
    #[allow(clippy::all)]
    grammar,
    "/parser/grammar.rs"
);

type GrammarError = ParseError<usize, Token, &'static str>;

/// Parse tokens into a compilation unit, failing on the first syntax error
pub fn parse(_filename: &str, source: &str, tokens: Vec<(Token, Span)>) -> Result<CompilationUnit> {
    let token_iter = tokens
        .into_iter()
        .map(|(tok, span)| (span.start, tok, span.end));

    let mut errors = Vec::new();
    let statements = grammar::UnitParser::new()
        .parse(&mut errors, token_iter)
        .map_err(|e| to_compile_error(&e))?;

    if let Some(recovery) = errors.first() {
        return Err(to_compile_error(&recovery.error));
    }

    Ok(CompilationUnit {
        statements,
        eof: Span::at(source.len()),
    })
}

/// Lex and parse `source`, turning every problem into a diagnostic
pub fn parse_source(source: SourceText) -> SyntaxTree {
    let _span = tracing::debug_span!("parse", bytes = source.len()).entered();

    let mut diagnostics = DiagnosticBag::new();
    let tokens = lexer::lex(&source, &mut diagnostics);
    let token_iter = tokens
        .into_iter()
        .map(|(tok, span)| (span.start, tok, span.end));

    let mut errors = Vec::new();
    let result = grammar::UnitParser::new().parse(&mut errors, token_iter);

    let mut incomplete = false;
    for recovery in &errors {
        incomplete |= matches!(recovery.error, ParseError::UnrecognizedEof { .. });
        let (span, message) = describe(&recovery.error);
        diagnostics.report(&source, span, DiagnosticKind::SyntaxException, message);
    }

    let statements = match result {
        Ok(statements) => statements,
        Err(e) => {
            incomplete |= matches!(e, ParseError::UnrecognizedEof { .. });
            let (span, message) = describe(&e);
            diagnostics.report(&source, span, DiagnosticKind::SyntaxException, message);
            Vec::new()
        }
    };

    tracing::debug!(
        statements = statements.len(),
        errors = diagnostics.len(),
        incomplete,
        "parsed"
    );

    let eof = Span::at(source.len());
    SyntaxTree {
        source,
        root: CompilationUnit { statements, eof },
        diagnostics,
        incomplete,
    }
}

fn to_compile_error(error: &GrammarError) -> CompileError {
    let (span, message) = describe(error);
    CompileError::parser(message, span)
}

/// Location and human-readable message for a grammar error
fn describe(error: &GrammarError) -> (Span, String) {
    match error {
        ParseError::InvalidToken { location } => {
            (Span::new(*location, *location + 1), "Invalid token.".to_string())
        }
        ParseError::UnrecognizedEof { location, expected } => (
            Span::at(*location),
            format!("Unexpected end of input{}.", expected_list(expected)),
        ),
        ParseError::UnrecognizedToken {
            token: (start, tok, end),
            expected,
        } => (
            Span::new(*start, *end),
            format!("Unexpected \"{tok}\"{}.", expected_list(expected)),
        ),
        ParseError::ExtraToken {
            token: (start, tok, end),
        } => (Span::new(*start, *end), format!("Unexpected \"{tok}\".")),
        ParseError::User { error } => (Span::at(0), (*error).to_string()),
    }
}

fn expected_list(expected: &[String]) -> String {
    if expected.is_empty() {
        String::new()
    } else {
        format!(", expected one of {}", expected.join(", "))
    }
}
