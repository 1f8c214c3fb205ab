//! Expression syntax nodes

use super::{Span, Spanned};
use serde::Serialize;

/// Literal value as written in source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Int(n) => write!(f, "{n}"),
            Literal::Float(x) => write!(f, "{x}"),
            Literal::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// An identifier token.
///
/// `is_missing` marks a name the parser synthesized while recovering from a
/// syntax error; the binder stays silent about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Name {
    pub text: String,
    pub span: Span,
    pub is_missing: bool,
}

impl Name {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
            is_missing: false,
        }
    }

    pub fn missing(span: Span) -> Self {
        Self {
            text: String::new(),
            span,
            is_missing: true,
        }
    }
}

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Literal(Literal),

    /// Variable reference
    Name(Name),

    /// Prefix operator application
    Unary {
        op: Spanned<UnaryOp>,
        operand: Box<Spanned<Expr>>,
    },

    Binary {
        left: Box<Spanned<Expr>>,
        op: Spanned<BinaryOp>,
        right: Box<Spanned<Expr>>,
    },

    /// `target = value`; compound forms arrive already desugared
    Assignment {
        target: Name,
        value: Box<Spanned<Expr>>,
    },

    /// `callee(args)`; also the cast form `int(x)`
    Call {
        callee: Name,
        args: Vec<Spanned<Expr>>,
    },

    /// Parenthesized expression
    Paren(Box<Spanned<Expr>>),
}

impl Expr {
    pub fn name(name: Name) -> Spanned<Expr> {
        let span = name.span;
        Spanned::new(Expr::Name(name), span)
    }
}

/// Prefix operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOp {
    Identity,
    Negate,
    BitNot,
    Not,
    Increment,
    Decrement,
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            UnaryOp::Identity => "+",
            UnaryOp::Negate => "-",
            UnaryOp::BitNot => "~",
            UnaryOp::Not => "!",
            UnaryOp::Increment => "++",
            UnaryOp::Decrement => "--",
        };
        f.write_str(text)
    }
}

/// Infix operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,

    // Logical
    And,
    Or,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "**",
            BinaryOp::Mod => "%",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        };
        f.write_str(text)
    }
}
