//! Generic bound-tree rewriter.
//!
//! Every method returns `Cow::Borrowed` when nothing below the node changed,
//! so untouched subtrees are never copied.

use crate::binding::{BoundExpr, BoundStmt};
use crate::symbols::VariableRef;
use std::borrow::Cow;
use std::rc::Rc;

pub trait BoundTreeRewriter {
    fn rewrite_stmt<'a>(&mut self, stmt: &'a BoundStmt) -> Cow<'a, BoundStmt> {
        stacker::maybe_grow(32 * 1024, 1024 * 1024, || match stmt {
            BoundStmt::If {
                cond,
                then_stmt,
                else_stmt,
            } => self.rewrite_if(stmt, cond, then_stmt, else_stmt.as_deref()),
            BoundStmt::While { cond, body } => self.rewrite_while(stmt, cond, body),
            BoundStmt::DoWhile { body, cond } => self.rewrite_do_while(stmt, body, cond),
            BoundStmt::For {
                variable,
                lower,
                upper,
                body,
            } => self.rewrite_for(stmt, variable, lower, upper, body),
            _ => walk_stmt(self, stmt),
        })
    }

    fn rewrite_if<'a>(
        &mut self,
        stmt: &'a BoundStmt,
        _cond: &'a BoundExpr,
        _then_stmt: &'a BoundStmt,
        _else_stmt: Option<&'a BoundStmt>,
    ) -> Cow<'a, BoundStmt> {
        walk_stmt(self, stmt)
    }

    fn rewrite_while<'a>(
        &mut self,
        stmt: &'a BoundStmt,
        _cond: &'a BoundExpr,
        _body: &'a BoundStmt,
    ) -> Cow<'a, BoundStmt> {
        walk_stmt(self, stmt)
    }

    fn rewrite_do_while<'a>(
        &mut self,
        stmt: &'a BoundStmt,
        _body: &'a BoundStmt,
        _cond: &'a BoundExpr,
    ) -> Cow<'a, BoundStmt> {
        walk_stmt(self, stmt)
    }

    fn rewrite_for<'a>(
        &mut self,
        stmt: &'a BoundStmt,
        _variable: &'a VariableRef,
        _lower: &'a BoundExpr,
        _upper: &'a BoundExpr,
        _body: &'a BoundStmt,
    ) -> Cow<'a, BoundStmt> {
        walk_stmt(self, stmt)
    }

    fn rewrite_expr<'a>(&mut self, expr: &'a BoundExpr) -> Cow<'a, BoundExpr> {
        stacker::maybe_grow(32 * 1024, 1024 * 1024, || walk_expr(self, expr))
    }
}

fn unchanged<T: Clone>(parts: &[&Cow<'_, T>]) -> bool {
    parts.iter().all(|part| matches!(part, Cow::Borrowed(_)))
}

/// Rewrite the children of `stmt`, rebuilding it only if one of them changed
pub fn walk_stmt<'a, R: BoundTreeRewriter + ?Sized>(
    rewriter: &mut R,
    stmt: &'a BoundStmt,
) -> Cow<'a, BoundStmt> {
    match stmt {
        BoundStmt::Block(statements) => match rewrite_all(rewriter, statements) {
            Some(statements) => Cow::Owned(BoundStmt::Block(statements)),
            None => Cow::Borrowed(stmt),
        },

        BoundStmt::Variable { variable, init } => match rewriter.rewrite_expr(init) {
            Cow::Borrowed(_) => Cow::Borrowed(stmt),
            Cow::Owned(init) => Cow::Owned(BoundStmt::Variable {
                variable: Rc::clone(variable),
                init,
            }),
        },

        BoundStmt::If {
            cond,
            then_stmt,
            else_stmt,
        } => {
            let new_cond = rewriter.rewrite_expr(cond);
            let new_then = rewriter.rewrite_stmt(then_stmt);
            let new_else = else_stmt.as_deref().map(|e| rewriter.rewrite_stmt(e));
            let else_unchanged = new_else.as_ref().is_none_or(|e| matches!(e, Cow::Borrowed(_)));
            if matches!(new_cond, Cow::Borrowed(_)) && unchanged(&[&new_then]) && else_unchanged {
                return Cow::Borrowed(stmt);
            }
            Cow::Owned(BoundStmt::If {
                cond: new_cond.into_owned(),
                then_stmt: Box::new(new_then.into_owned()),
                else_stmt: new_else.map(|e| Box::new(e.into_owned())),
            })
        }

        BoundStmt::While { cond, body } => {
            let new_cond = rewriter.rewrite_expr(cond);
            let new_body = rewriter.rewrite_stmt(body);
            if matches!(new_cond, Cow::Borrowed(_)) && unchanged(&[&new_body]) {
                return Cow::Borrowed(stmt);
            }
            Cow::Owned(BoundStmt::While {
                cond: new_cond.into_owned(),
                body: Box::new(new_body.into_owned()),
            })
        }

        BoundStmt::DoWhile { body, cond } => {
            let new_body = rewriter.rewrite_stmt(body);
            let new_cond = rewriter.rewrite_expr(cond);
            if matches!(new_cond, Cow::Borrowed(_)) && unchanged(&[&new_body]) {
                return Cow::Borrowed(stmt);
            }
            Cow::Owned(BoundStmt::DoWhile {
                body: Box::new(new_body.into_owned()),
                cond: new_cond.into_owned(),
            })
        }

        BoundStmt::For {
            variable,
            lower,
            upper,
            body,
        } => {
            let new_lower = rewriter.rewrite_expr(lower);
            let new_upper = rewriter.rewrite_expr(upper);
            let new_body = rewriter.rewrite_stmt(body);
            if unchanged(&[&new_lower, &new_upper]) && unchanged(&[&new_body]) {
                return Cow::Borrowed(stmt);
            }
            Cow::Owned(BoundStmt::For {
                variable: Rc::clone(variable),
                lower: new_lower.into_owned(),
                upper: new_upper.into_owned(),
                body: Box::new(new_body.into_owned()),
            })
        }

        BoundStmt::Expr(expr) => match rewriter.rewrite_expr(expr) {
            Cow::Borrowed(_) => Cow::Borrowed(stmt),
            Cow::Owned(expr) => Cow::Owned(BoundStmt::Expr(expr)),
        },

        BoundStmt::CondGoto {
            label,
            cond,
            jump_if_true,
        } => match rewriter.rewrite_expr(cond) {
            Cow::Borrowed(_) => Cow::Borrowed(stmt),
            Cow::Owned(cond) => Cow::Owned(BoundStmt::CondGoto {
                label: *label,
                cond,
                jump_if_true: *jump_if_true,
            }),
        },

        BoundStmt::Goto(_) | BoundStmt::Label(_) => Cow::Borrowed(stmt),
    }
}

/// Rewrite the children of `expr`, rebuilding it only if one of them changed
pub fn walk_expr<'a, R: BoundTreeRewriter + ?Sized>(
    rewriter: &mut R,
    expr: &'a BoundExpr,
) -> Cow<'a, BoundExpr> {
    match expr {
        BoundExpr::Unary { op, operand } => match rewriter.rewrite_expr(operand) {
            Cow::Borrowed(_) => Cow::Borrowed(expr),
            Cow::Owned(operand) => Cow::Owned(BoundExpr::Unary {
                op: *op,
                operand: Box::new(operand),
            }),
        },

        BoundExpr::Binary { left, op, right } => {
            let new_left = rewriter.rewrite_expr(left);
            let new_right = rewriter.rewrite_expr(right);
            if unchanged(&[&new_left, &new_right]) {
                return Cow::Borrowed(expr);
            }
            Cow::Owned(BoundExpr::Binary {
                left: Box::new(new_left.into_owned()),
                op: *op,
                right: Box::new(new_right.into_owned()),
            })
        }

        BoundExpr::Assignment { variable, value } => match rewriter.rewrite_expr(value) {
            Cow::Borrowed(_) => Cow::Borrowed(expr),
            Cow::Owned(value) => Cow::Owned(BoundExpr::Assignment {
                variable: Rc::clone(variable),
                value: Box::new(value),
            }),
        },

        BoundExpr::Call { function, args } => {
            let mut rewritten: Option<Vec<BoundExpr>> = None;
            for (i, arg) in args.iter().enumerate() {
                let new_arg = rewriter.rewrite_expr(arg);
                if let Some(out) = rewritten.as_mut() {
                    out.push(new_arg.into_owned());
                } else if let Cow::Owned(new_arg) = new_arg {
                    let mut out = args[..i].to_vec();
                    out.push(new_arg);
                    rewritten = Some(out);
                }
            }
            match rewritten {
                Some(args) => Cow::Owned(BoundExpr::Call {
                    function: Rc::clone(function),
                    args,
                }),
                None => Cow::Borrowed(expr),
            }
        }

        BoundExpr::Conversion { ty, expr: inner } => match rewriter.rewrite_expr(inner) {
            Cow::Borrowed(_) => Cow::Borrowed(expr),
            Cow::Owned(inner) => Cow::Owned(BoundExpr::Conversion {
                ty: *ty,
                expr: Box::new(inner),
            }),
        },

        BoundExpr::Literal(_) | BoundExpr::Variable(_) | BoundExpr::Error => Cow::Borrowed(expr),
    }
}

/// `None` when every statement came back unchanged
pub fn rewrite_all<R: BoundTreeRewriter + ?Sized>(
    rewriter: &mut R,
    statements: &[BoundStmt],
) -> Option<Vec<BoundStmt>> {
    let mut rewritten: Option<Vec<BoundStmt>> = None;
    for (i, stmt) in statements.iter().enumerate() {
        let new_stmt = rewriter.rewrite_stmt(stmt);
        if let Some(out) = rewritten.as_mut() {
            out.push(new_stmt.into_owned());
        } else if let Cow::Owned(new_stmt) = new_stmt {
            let mut out = statements[..i].to_vec();
            out.push(new_stmt);
            rewritten = Some(out);
        }
    }
    rewritten
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::bind_global_scope;
    use crate::interp::Value;
    use crate::syntax::SyntaxTree;

    struct Identity;

    impl BoundTreeRewriter for Identity {}

    /// Replaces every integer literal 1 with 100
    struct BumpOnes;

    impl BoundTreeRewriter for BumpOnes {
        fn rewrite_expr<'a>(&mut self, expr: &'a BoundExpr) -> Cow<'a, BoundExpr> {
            match expr {
                BoundExpr::Literal(Value::Int(1)) => Cow::Owned(BoundExpr::Literal(Value::Int(100))),
                _ => walk_expr(self, expr),
            }
        }
    }

    fn bound(source: &str) -> BoundStmt {
        bind_global_scope(None, &SyntaxTree::parse(source)).statement
    }

    #[test]
    fn test_identity_borrows_whole_tree() {
        let stmt = bound("var mut x = 0; while x < 3 { x = x + 1 } if x > 2 { print(x) } else { }");
        assert!(matches!(Identity.rewrite_stmt(&stmt), Cow::Borrowed(_)));
    }

    #[test]
    fn test_change_rebuilds_path_only() {
        let stmt = bound("var a = 2; var b = 1; var c = 3");
        let rewritten = BumpOnes.rewrite_stmt(&stmt);
        let BoundStmt::Block(statements) = rewritten.as_ref() else {
            panic!("Expected Block");
        };
        let inits: Vec<&BoundExpr> = statements
            .iter()
            .map(|s| match s {
                BoundStmt::Variable { init, .. } => init,
                other => panic!("Expected Variable, got {other:?}"),
            })
            .collect();
        assert_eq!(*inits[1], BoundExpr::Literal(Value::Int(100)));
        assert_eq!(*inits[0], BoundExpr::Literal(Value::Int(2)));
        assert!(matches!(rewritten, Cow::Owned(_)));
    }

    #[test]
    fn test_rewrite_all_none_when_unchanged() {
        let stmt = bound("1; 2");
        let BoundStmt::Block(statements) = &stmt else {
            panic!("Expected Block");
        };
        assert!(rewrite_all(&mut Identity, statements).is_none());
        assert_eq!(rewrite_all(&mut BumpOnes, statements).map(|v| v.len()), Some(2));
    }
}
