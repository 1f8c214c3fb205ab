//! Tree rendering for syntax nodes (`#showtree`)

use super::{Block, CompilationUnit, Expr, Spanned, Stmt};
use crate::printer::TreeNode;

impl TreeNode for CompilationUnit {
    fn label(&self) -> String {
        "CompilationUnit".to_string()
    }

    fn children(&self) -> Vec<&dyn TreeNode> {
        self.statements.iter().map(|s| s as &dyn TreeNode).collect()
    }
}

impl TreeNode for Spanned<Block> {
    fn label(&self) -> String {
        "BlockStmt".to_string()
    }

    fn children(&self) -> Vec<&dyn TreeNode> {
        self.node.statements.iter().map(|s| s as &dyn TreeNode).collect()
    }
}

impl TreeNode for Spanned<Stmt> {
    fn label(&self) -> String {
        match &self.node {
            Stmt::Block(_) => "BlockStmt".to_string(),
            Stmt::Var { name, mutable, ty, .. } => {
                let mut label = format!("VariableStmt {}{}", if *mutable { "mut " } else { "" }, name.text);
                if let Some(ty) = ty {
                    label.push_str(": ");
                    label.push_str(&ty.text);
                }
                label
            }
            Stmt::If { .. } => "IfStmt".to_string(),
            Stmt::While { .. } => "WhileStmt".to_string(),
            Stmt::DoWhile { .. } => "DoWhileStmt".to_string(),
            Stmt::For { var, .. } => format!("ForStmt {}", var.text),
            Stmt::Expr(_) => "ExpressionStmt".to_string(),
        }
    }

    fn children(&self) -> Vec<&dyn TreeNode> {
        match &self.node {
            Stmt::Block(block) => block.statements.iter().map(|s| s as &dyn TreeNode).collect(),
            Stmt::Var { init, .. } => vec![init as &dyn TreeNode],
            Stmt::If {
                cond,
                then_block,
                else_block,
            } => {
                let mut children: Vec<&dyn TreeNode> = vec![cond as &dyn TreeNode, then_block];
                if let Some(else_block) = else_block {
                    children.push(else_block);
                }
                children
            }
            Stmt::While { cond, body } => {
                let mut children: Vec<&dyn TreeNode> = Vec::new();
                if let Some(cond) = cond {
                    children.push(cond);
                }
                children.push(body);
                children
            }
            Stmt::DoWhile { body, cond } => vec![body as &dyn TreeNode, cond],
            Stmt::For {
                lower, upper, body, ..
            } => vec![lower as &dyn TreeNode, upper, body],
            Stmt::Expr(expr) => vec![expr as &dyn TreeNode],
        }
    }
}

impl TreeNode for Spanned<Expr> {
    fn label(&self) -> String {
        match &self.node {
            Expr::Literal(lit) => format!("LiteralExpr {lit}"),
            Expr::Name(name) if name.is_missing => "NameExpr <missing>".to_string(),
            Expr::Name(name) => format!("NameExpr {}", name.text),
            Expr::Unary { op, .. } => format!("UnaryExpr {}", op.node),
            Expr::Binary { op, .. } => format!("BinaryExpr {}", op.node),
            Expr::Assignment { target, .. } => format!("AssignmentExpr {}", target.text),
            Expr::Call { callee, .. } => format!("CallExpr {}", callee.text),
            Expr::Paren(_) => "ParenExpr".to_string(),
        }
    }

    fn children(&self) -> Vec<&dyn TreeNode> {
        match &self.node {
            Expr::Literal(_) | Expr::Name(_) => Vec::new(),
            Expr::Unary { operand, .. } => vec![&**operand as &dyn TreeNode],
            Expr::Binary { left, right, .. } => vec![&**left as &dyn TreeNode, &**right],
            Expr::Assignment { value, .. } => vec![&**value as &dyn TreeNode],
            Expr::Call { args, .. } => args.iter().map(|a| a as &dyn TreeNode).collect(),
            Expr::Paren(inner) => vec![&**inner as &dyn TreeNode],
        }
    }
}
