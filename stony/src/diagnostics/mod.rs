//! Structured diagnostics collected while parsing and binding

use crate::syntax::{SourceText, Span};
use serde::Serialize;
use std::fmt;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "Info",
            Severity::Warn => "Warn",
            Severity::Error => "Error",
        })
    }
}

/// Category tag carried by every diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    SyntaxException,
    TypeException,
    DeclarationException,
    KeyNotFoundException,
    AssignmentException,
    ArgumentException,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::SyntaxException => "SyntaxException",
            DiagnosticKind::TypeException => "TypeException",
            DiagnosticKind::DeclarationException => "DeclarationException",
            DiagnosticKind::KeyNotFoundException => "KeyNotFoundException",
            DiagnosticKind::AssignmentException => "AssignmentException",
            DiagnosticKind::ArgumentException => "ArgumentException",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported problem, already resolved to a 1-based line and column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub span: Span,
    pub line: usize,
    pub column: usize,
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    /// Optional follow-up note, e.g. a spelling suggestion
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn len(&self) -> usize {
        self.span.len()
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {}:{}] {}: {}",
            self.severity, self.line, self.column, self.kind, self.message
        )
    }
}

/// Append-only list of diagnostics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error at `span`, returning it so a help note can be attached
    pub fn report(
        &mut self,
        source: &SourceText,
        span: Span,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) -> &mut Diagnostic {
        self.report_with_severity(source, span, Severity::Error, kind, message)
    }

    pub fn report_with_severity(
        &mut self,
        source: &SourceText,
        span: Span,
        severity: Severity,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) -> &mut Diagnostic {
        let (line, column) = source.line_col(span.start);
        let diagnostic = Diagnostic {
            span,
            line,
            column,
            severity,
            kind,
            message: message.into(),
            help: None,
        };
        tracing::debug!(%diagnostic, "reported");
        self.diagnostics.push(diagnostic);
        let last = self.diagnostics.len() - 1;
        &mut self.diagnostics[last]
    }

    pub fn extend(&mut self, other: &DiagnosticBag) {
        self.diagnostics.extend(other.diagnostics.iter().cloned());
    }

    /// `self` followed by `other`
    pub fn concat(&self, other: &DiagnosticBag) -> DiagnosticBag {
        let mut bag = self.clone();
        bag.extend(other);
        bag
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl<'a> IntoIterator for &'a DiagnosticBag {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

impl IntoIterator for DiagnosticBag {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_resolves_line_and_column() {
        let source = SourceText::new("var x = 1\nx = y");
        let mut bag = DiagnosticBag::new();
        bag.report(
            &source,
            Span::new(14, 15),
            DiagnosticKind::KeyNotFoundException,
            "Could not find \"y\" in the current context.",
        );
        let d = bag.iter().next().unwrap();
        assert_eq!((d.line, d.column), (2, 5));
        assert_eq!((d.start(), d.len()), (14, 1));
        assert!(d.is_error());
    }

    #[test]
    fn test_display_format() {
        let source = SourceText::new("true + 1");
        let mut bag = DiagnosticBag::new();
        bag.report(&source, Span::new(5, 6), DiagnosticKind::TypeException, "bad");
        assert_eq!(bag.iter().next().unwrap().to_string(), "[Error 1:6] TypeException: bad");
    }

    #[test]
    fn test_help_attaches_to_reported() {
        let source = SourceText::new("pritn(1)");
        let mut bag = DiagnosticBag::new();
        bag.report(&source, Span::new(0, 5), DiagnosticKind::KeyNotFoundException, "missing")
            .help = Some("did you mean `print`?".to_string());
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.iter().next().unwrap().help.as_deref(), Some("did you mean `print`?"));
    }

    #[test]
    fn test_concat_preserves_order() {
        let source = SourceText::new("abc");
        let mut first = DiagnosticBag::new();
        first.report(&source, Span::new(0, 1), DiagnosticKind::SyntaxException, "one");
        let mut second = DiagnosticBag::new();
        second.report(&source, Span::new(1, 2), DiagnosticKind::TypeException, "two");

        let all = first.concat(&second);
        let messages: Vec<_> = all.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["one", "two"]);
        assert_eq!(all.count_of(DiagnosticKind::TypeException), 1);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn test_info_is_not_error() {
        let source = SourceText::new("x");
        let mut bag = DiagnosticBag::new();
        bag.report_with_severity(&source, Span::new(0, 1), Severity::Info, DiagnosticKind::TypeException, "note");
        assert!(!bag.is_empty());
        assert!(!bag.has_errors());
    }
}
