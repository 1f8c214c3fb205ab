//! Bound tree: the typed, name-resolved form produced by the binder

use super::operators::{BoundBinaryOperator, BoundUnaryOperator};
use crate::interp::Value;
use crate::printer::TreeNode;
use crate::symbols::{FunctionRef, LabelId, TypeSymbol, VariableRef};

/// Typed expression
#[derive(Debug, Clone, PartialEq)]
pub enum BoundExpr {
    Literal(Value),
    Unary {
        op: BoundUnaryOperator,
        operand: Box<BoundExpr>,
    },
    Binary {
        left: Box<BoundExpr>,
        op: BoundBinaryOperator,
        right: Box<BoundExpr>,
    },
    Variable(VariableRef),
    Assignment {
        variable: VariableRef,
        value: Box<BoundExpr>,
    },
    Call {
        function: FunctionRef,
        args: Vec<BoundExpr>,
    },
    /// Implicit or explicit conversion to `ty`
    Conversion {
        ty: TypeSymbol,
        expr: Box<BoundExpr>,
    },
    /// Stand-in for an expression that failed to bind
    Error,
}

impl BoundExpr {
    pub fn ty(&self) -> TypeSymbol {
        match self {
            BoundExpr::Literal(value) => value.type_of(),
            BoundExpr::Unary { op, .. } => op.result,
            BoundExpr::Binary { op, .. } => op.result,
            BoundExpr::Variable(variable) => variable.ty,
            BoundExpr::Assignment { value, .. } => value.ty(),
            BoundExpr::Call { function, .. } => function.return_type,
            BoundExpr::Conversion { ty, .. } => *ty,
            BoundExpr::Error => TypeSymbol::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.ty().is_error()
    }
}

/// Typed statement. The last three kinds only appear after lowering.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundStmt {
    Block(Vec<BoundStmt>),
    Variable {
        variable: VariableRef,
        init: BoundExpr,
    },
    If {
        cond: BoundExpr,
        then_stmt: Box<BoundStmt>,
        else_stmt: Option<Box<BoundStmt>>,
    },
    While {
        cond: BoundExpr,
        body: Box<BoundStmt>,
    },
    DoWhile {
        body: Box<BoundStmt>,
        cond: BoundExpr,
    },
    For {
        variable: VariableRef,
        lower: BoundExpr,
        upper: BoundExpr,
        body: Box<BoundStmt>,
    },
    Expr(BoundExpr),
    Goto(LabelId),
    CondGoto {
        label: LabelId,
        cond: BoundExpr,
        jump_if_true: bool,
    },
    Label(LabelId),
}

impl BoundStmt {
    /// Node kind name, used in evaluator faults
    pub fn kind(&self) -> &'static str {
        match self {
            BoundStmt::Block(_) => "BlockStmt",
            BoundStmt::Variable { .. } => "VariableDeclaration",
            BoundStmt::If { .. } => "IfStmt",
            BoundStmt::While { .. } => "WhileStmt",
            BoundStmt::DoWhile { .. } => "DoWhileStmt",
            BoundStmt::For { .. } => "ForStmt",
            BoundStmt::Expr(_) => "ExpressionStmt",
            BoundStmt::Goto(_) => "GotoStmt",
            BoundStmt::CondGoto { .. } => "ConditionalGotoStmt",
            BoundStmt::Label(_) => "LabelStmt",
        }
    }
}

/// Flat statement list produced by lowering
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundBlock {
    pub statements: Vec<BoundStmt>,
}

impl TreeNode for BoundBlock {
    fn label(&self) -> String {
        "Program".to_string()
    }

    fn children(&self) -> Vec<&dyn TreeNode> {
        self.statements.iter().map(|s| s as &dyn TreeNode).collect()
    }
}

fn variable_label(variable: &VariableRef) -> String {
    format!(
        "{}{}: {}",
        if variable.mutable { "mut " } else { "" },
        variable.name,
        variable.ty
    )
}

impl TreeNode for BoundStmt {
    fn label(&self) -> String {
        match self {
            BoundStmt::Variable { variable, .. } => {
                format!("VariableDeclaration {}", variable_label(variable))
            }
            BoundStmt::For { variable, .. } => format!("ForStmt {}", variable_label(variable)),
            BoundStmt::Goto(label) => format!("goto {label}"),
            BoundStmt::CondGoto {
                label,
                jump_if_true,
                ..
            } => {
                let kind = if *jump_if_true { "gotoIfTrue" } else { "gotoIfFalse" };
                format!("{kind} {label}")
            }
            BoundStmt::Label(label) => format!("{label}:"),
            other => other.kind().to_string(),
        }
    }

    fn children(&self) -> Vec<&dyn TreeNode> {
        match self {
            BoundStmt::Block(statements) => statements.iter().map(|s| s as &dyn TreeNode).collect(),
            BoundStmt::Variable { init, .. } => vec![init as &dyn TreeNode],
            BoundStmt::If {
                cond,
                then_stmt,
                else_stmt,
            } => {
                let mut children: Vec<&dyn TreeNode> = vec![cond as &dyn TreeNode, &**then_stmt];
                if let Some(else_stmt) = else_stmt {
                    children.push(&**else_stmt);
                }
                children
            }
            BoundStmt::While { cond, body } => vec![cond as &dyn TreeNode, &**body],
            BoundStmt::DoWhile { body, cond } => vec![&**body as &dyn TreeNode, cond],
            BoundStmt::For {
                lower, upper, body, ..
            } => vec![lower as &dyn TreeNode, upper, &**body],
            BoundStmt::Expr(expr) => vec![expr as &dyn TreeNode],
            BoundStmt::CondGoto { cond, .. } => vec![cond as &dyn TreeNode],
            BoundStmt::Goto(_) | BoundStmt::Label(_) => Vec::new(),
        }
    }
}

impl TreeNode for BoundExpr {
    fn label(&self) -> String {
        match self {
            BoundExpr::Literal(Value::Str(s)) => format!("LiteralExpr {s:?}: string"),
            BoundExpr::Literal(value) => format!("LiteralExpr {value}: {}", value.type_of()),
            BoundExpr::Unary { op, .. } => format!("UnaryExpr {}: {}", op.op, op.result),
            BoundExpr::Binary { op, .. } => format!("BinaryExpr {}: {}", op.op, op.result),
            BoundExpr::Variable(variable) => format!("VariableExpr {}: {}", variable.name, variable.ty),
            BoundExpr::Assignment { variable, .. } => {
                format!("AssignmentExpr {}: {}", variable.name, variable.ty)
            }
            BoundExpr::Call { function, .. } => {
                format!("CallExpr {}: {}", function.name, function.return_type)
            }
            BoundExpr::Conversion { ty, .. } => format!("ConversionExpr {ty}"),
            BoundExpr::Error => "ErrorExpr".to_string(),
        }
    }

    fn children(&self) -> Vec<&dyn TreeNode> {
        match self {
            BoundExpr::Unary { operand, .. } => vec![&**operand as &dyn TreeNode],
            BoundExpr::Binary { left, right, .. } => vec![&**left as &dyn TreeNode, &**right],
            BoundExpr::Assignment { value, .. } => vec![&**value as &dyn TreeNode],
            BoundExpr::Call { args, .. } => args.iter().map(|a| a as &dyn TreeNode).collect(),
            BoundExpr::Conversion { expr, .. } => vec![&**expr as &dyn TreeNode],
            BoundExpr::Literal(_) | BoundExpr::Variable(_) | BoundExpr::Error => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::tree_to_string;
    use crate::symbols::{Builtin, VariableIds, VariableSymbol};
    use crate::syntax::BinaryOp;
    use std::rc::Rc;

    #[test]
    fn test_expression_types() {
        let ids = VariableIds::new();
        let x = VariableSymbol::new(&ids, "x", TypeSymbol::Int, true, None);
        assert_eq!(BoundExpr::Variable(Rc::clone(&x)).ty(), TypeSymbol::Int);
        assert_eq!(BoundExpr::Literal(Value::Float(1.5)).ty(), TypeSymbol::Float);
        assert_eq!(BoundExpr::Error.ty(), TypeSymbol::Error);

        let call = BoundExpr::Call {
            function: Rc::new(Builtin::Stringify.symbol()),
            args: vec![BoundExpr::Variable(x)],
        };
        assert_eq!(call.ty(), TypeSymbol::String);
    }

    #[test]
    fn test_assignment_takes_value_type() {
        let ids = VariableIds::new();
        let x = VariableSymbol::new(&ids, "x", TypeSymbol::Float, true, None);
        let assignment = BoundExpr::Assignment {
            variable: x,
            value: Box::new(BoundExpr::Conversion {
                ty: TypeSymbol::Float,
                expr: Box::new(BoundExpr::Literal(Value::Int(1))),
            }),
        };
        assert_eq!(assignment.ty(), TypeSymbol::Float);
    }

    #[test]
    fn test_print_lowered_shapes() {
        let ids = VariableIds::new();
        let x = VariableSymbol::new(&ids, "x", TypeSymbol::Int, true, None);
        let program = BoundBlock {
            statements: vec![
                BoundStmt::Label(LabelId(1)),
                BoundStmt::CondGoto {
                    label: LabelId(1),
                    cond: BoundExpr::Binary {
                        left: Box::new(BoundExpr::Variable(x)),
                        op: BoundBinaryOperator::new(
                            BinaryOp::Lt,
                            TypeSymbol::Int,
                            TypeSymbol::Int,
                            TypeSymbol::Bool,
                        ),
                        right: Box::new(BoundExpr::Literal(Value::Int(3))),
                    },
                    jump_if_true: true,
                },
                BoundStmt::Goto(LabelId(2)),
            ],
        };
        assert_eq!(
            tree_to_string(&program),
            "└── Program\n    \
             ├── Label1:\n    \
             ├── gotoIfTrue Label1\n    \
             │   └── BinaryExpr <: bool\n    \
             │       ├── VariableExpr x: int\n    \
             │       └── LiteralExpr 3: int\n    \
             └── goto Label2\n"
        );
    }
}
