//! Lexer implementation using logos

mod token;

pub use token::Token;

use crate::diagnostics::{DiagnosticBag, DiagnosticKind};
use crate::error::{CompileError, Result};
use crate::syntax::{SourceText, Span};
use logos::Logos;

/// Tokenize source code, failing on the first character that starts no token
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::from(lexer.span());
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(_) => {
                return Err(CompileError::lexer(
                    format!("unexpected character: {:?}", lexer.slice()),
                    span,
                ));
            }
        }
    }

    Ok(tokens)
}

/// Tokenize leniently: bad input is reported and skipped
pub fn lex(source: &SourceText, diagnostics: &mut DiagnosticBag) -> Vec<(Token, Span)> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source.text());

    while let Some(result) = lexer.next() {
        let span = Span::from(lexer.span());
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(_) => {
                diagnostics.report(
                    source,
                    span,
                    DiagnosticKind::SyntaxException,
                    format!("Bad character input: {:?}.", lexer.slice()),
                );
            }
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("  // only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_keywords() {
        assert_eq!(
            kinds("var mut if else while do for to true false"),
            vec![
                Token::Var,
                Token::Mut,
                Token::If,
                Token::Else,
                Token::While,
                Token::Do,
                Token::For,
                Token::To,
                Token::True,
                Token::False
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(kinds("total"), vec![Token::Ident("total".to_string())]);
        assert_eq!(kinds("dox"), vec![Token::Ident("dox".to_string())]);
    }

    #[test]
    fn test_tokenize_numbers() {
        assert_eq!(kinds("42"), vec![Token::IntLit(42)]);
        assert_eq!(kinds("2.5"), vec![Token::FloatLit(2.5)]);
        assert_eq!(kinds("1e3"), vec![Token::FloatLit(1000.0)]);
    }

    #[test]
    fn test_tokenize_string_with_escape() {
        assert_eq!(kinds(r#""a\nb""#), vec![Token::StringLit("a\nb".to_string())]);
    }

    #[test]
    fn test_longest_operator_wins() {
        assert_eq!(
            kinds("** **= ++ += << <<= && &"),
            vec![
                Token::StarStar,
                Token::StarStarEq,
                Token::PlusPlus,
                Token::PlusEq,
                Token::Shl,
                Token::ShlEq,
                Token::AmpAmp,
                Token::Amp
            ]
        );
    }

    #[test]
    fn test_spans() {
        let tokens = tokenize("var x").unwrap();
        assert_eq!(tokens[0].1, Span::new(0, 3));
        assert_eq!(tokens[1].1, Span::new(4, 5));
    }

    #[test]
    fn test_tokenize_rejects_bad_character() {
        let err = tokenize("var x = $").unwrap_err();
        assert_eq!(err.span(), Some(Span::new(8, 9)));
        assert!(err.message().contains("$"));
    }

    #[test]
    fn test_lex_reports_and_skips() {
        let source = SourceText::new("1 @ 2");
        let mut diagnostics = DiagnosticBag::new();
        let tokens = lex(&source, &mut diagnostics);
        assert_eq!(tokens.len(), 2);
        assert_eq!(diagnostics.count_of(DiagnosticKind::SyntaxException), 1);
        let d = diagnostics.iter().next().unwrap();
        assert_eq!(d.column, 3);
    }
}
