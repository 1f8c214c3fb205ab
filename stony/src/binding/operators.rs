//! Operator tables: which operand types each operator accepts and what it yields

use crate::symbols::TypeSymbol;
use crate::syntax::{BinaryOp, UnaryOp};
use serde::Serialize;

/// A resolved prefix operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundUnaryOperator {
    pub op: UnaryOp,
    pub operand: TypeSymbol,
    pub result: TypeSymbol,
}

impl BoundUnaryOperator {
    const fn new(op: UnaryOp, operand: TypeSymbol) -> Self {
        Self {
            op,
            operand,
            result: operand,
        }
    }

    const TABLE: [BoundUnaryOperator; 9] = [
        Self::new(UnaryOp::Not, TypeSymbol::Bool),
        Self::new(UnaryOp::Identity, TypeSymbol::Int),
        Self::new(UnaryOp::Negate, TypeSymbol::Int),
        Self::new(UnaryOp::BitNot, TypeSymbol::Int),
        // integer `!` is the factorial of its operand
        Self::new(UnaryOp::Not, TypeSymbol::Int),
        Self::new(UnaryOp::Increment, TypeSymbol::Int),
        Self::new(UnaryOp::Decrement, TypeSymbol::Int),
        Self::new(UnaryOp::Identity, TypeSymbol::Float),
        Self::new(UnaryOp::Negate, TypeSymbol::Float),
    ];

    pub fn bind(op: UnaryOp, operand: TypeSymbol) -> Option<BoundUnaryOperator> {
        Self::TABLE
            .iter()
            .find(|o| o.op == op && o.operand == operand)
            .copied()
    }
}

/// A resolved infix operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundBinaryOperator {
    pub op: BinaryOp,
    pub left: TypeSymbol,
    pub right: TypeSymbol,
    pub result: TypeSymbol,
}

impl BoundBinaryOperator {
    pub const fn new(op: BinaryOp, left: TypeSymbol, right: TypeSymbol, result: TypeSymbol) -> Self {
        Self {
            op,
            left,
            right,
            result,
        }
    }

    pub fn bind(op: BinaryOp, left: TypeSymbol, right: TypeSymbol) -> Option<BoundBinaryOperator> {
        use BinaryOp::*;
        use TypeSymbol::{Bool, Float, Int, String as Str};

        let result = match (left, right) {
            (Bool, Bool) => match op {
                And | Or | Eq | Ne | BitOr | BitAnd | BitXor => Bool,
                _ => return None,
            },
            (Int, Int) => match op {
                Add | Sub | Mul | Div | Pow | Mod | BitOr | BitAnd | BitXor | Shr | Shl => Int,
                Eq | Ne | Gt | Ge | Lt | Le => Bool,
                _ => return None,
            },
            (Float, Float) => match op {
                Add | Sub | Mul | Div | Pow => Float,
                Eq | Ne | Gt | Ge | Lt | Le => Bool,
                _ => return None,
            },
            // mixed numerics promote; no mixed equality
            (Int, Float) | (Float, Int) => match op {
                Add | Sub | Mul | Div | Pow => Float,
                Gt | Ge | Lt | Le => Bool,
                _ => return None,
            },
            (Str, Str) => match op {
                Add => Str,
                Eq | Ne => Bool,
                _ => return None,
            },
            (Str, Int) => match op {
                Add | Mul | Sub => Str,
                _ => return None,
            },
            (Str, Bool | Float) | (Bool | Int | Float, Str) => match op {
                Add => Str,
                _ => return None,
            },
            _ => return None,
        };

        Some(Self::new(op, left, right, result))
    }
}
