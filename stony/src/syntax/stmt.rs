//! Statement syntax nodes

use super::{Expr, Name, Spanned};
use serde::Serialize;

/// `{ ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub statements: Vec<Spanned<Stmt>>,
}

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    Block(Block),

    /// `var [mut] name [: ty] = init`
    Var {
        name: Name,
        mutable: bool,
        ty: Option<Name>,
        init: Spanned<Expr>,
    },

    If {
        cond: Spanned<Expr>,
        then_block: Spanned<Block>,
        else_block: Option<Spanned<Block>>,
    },

    /// `while [cond] { }`; a missing condition loops forever
    While {
        cond: Option<Spanned<Expr>>,
        body: Spanned<Block>,
    },

    DoWhile {
        body: Spanned<Block>,
        cond: Spanned<Expr>,
    },

    /// `for [mut] var = lower to upper { }`
    For {
        var: Name,
        mutable: bool,
        lower: Spanned<Expr>,
        upper: Spanned<Expr>,
        body: Spanned<Block>,
    },

    Expr(Spanned<Expr>),
}
