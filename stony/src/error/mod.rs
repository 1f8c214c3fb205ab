//! Error types and reporting

use crate::diagnostics::Diagnostic;
use crate::syntax::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CompileError>;

/// Error raised by the strict front-end entry points and the CLI
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Lexer error at {span}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span}: {message}")]
    Parser { message: String, span: Span },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexer { span, .. } | Self::Parser { span, .. } => Some(*span),
            Self::Io { .. } => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Lexer { message, .. } => message,
            Self::Parser { message, .. } => message,
            Self::Io { message } => message,
        }
    }
}

impl From<std::io::Error> for CompileError {
    fn from(err: std::io::Error) -> Self {
        Self::io_error(err.to_string())
    }
}

/// Report error with ariadne
pub fn report_error(filename: &str, source: &str, error: &CompileError) {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let kind = match error {
        CompileError::Lexer { .. } => "Lexer",
        CompileError::Parser { .. } => "Parser",
        CompileError::Io { .. } => "IO",
    };

    let printed = if let Some(span) = error.span() {
        Report::build(ReportKind::Error, (filename, span.start..span.end))
            .with_message(format!("{kind} error"))
            .with_label(
                Label::new((filename, span.start..span.end))
                    .with_message(error.message())
                    .with_color(Color::Red),
            )
            .finish()
            .eprint((filename, Source::from(source)))
    } else {
        Report::build(ReportKind::Error, (filename, 0..0))
            .with_message(format!("{kind} error: {}", error.message()))
            .finish()
            .eprint((filename, Source::from(source)))
    };

    if printed.is_err() {
        eprintln!("{error}");
    }
}

/// Render a binder or syntax diagnostic with ariadne
pub fn report_diagnostic(filename: &str, source: &str, diagnostic: &Diagnostic) {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let range = diagnostic.span.start..diagnostic.span.end;
    let kind = if diagnostic.is_error() {
        ReportKind::Error
    } else {
        ReportKind::Warning
    };

    let mut report = Report::build(kind, (filename, range.clone()))
        .with_message(diagnostic.kind.as_str())
        .with_label(
            Label::new((filename, range))
                .with_message(&diagnostic.message)
                .with_color(Color::Red),
        );
    if let Some(help) = &diagnostic.help {
        report = report.with_help(help);
    }

    if report.finish().eprint((filename, Source::from(source))).is_err() {
        eprintln!("{diagnostic}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_accessors() {
        let err = CompileError::parser("Unexpected \")\".", Span::new(4, 5));
        assert_eq!(err.span(), Some(Span::new(4, 5)));
        assert_eq!(err.message(), "Unexpected \")\".");
        assert_eq!(err.to_string(), "Parser error at 4..5: Unexpected \")\".");
    }

    #[test]
    fn test_io_error_has_no_span() {
        let err: CompileError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.span().is_none());
        assert_eq!(err.message(), "gone");
    }
}
