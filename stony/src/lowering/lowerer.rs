//! Rewrites structured control flow into labels and jumps

use super::rewriter::BoundTreeRewriter;
use crate::binding::{BoundBinaryOperator, BoundExpr, BoundStmt};
use crate::interp::Value;
use crate::symbols::{LabelId, TypeSymbol, VariableIds, VariableRef, VariableSymbol};
use crate::syntax::BinaryOp;
use std::borrow::Cow;
use std::rc::Rc;

/// Label counter is per instance: one lowering run numbers labels from 1
pub struct Lowerer {
    next_label: u32,
    /// Source of ids for hidden variables
    variable_ids: VariableIds,
}

impl Lowerer {
    pub fn new(variable_ids: &VariableIds) -> Self {
        Lowerer {
            next_label: 1,
            variable_ids: variable_ids.clone(),
        }
    }

    /// Labels handed out so far
    pub fn label_count(&self) -> u32 {
        self.next_label - 1
    }

    fn make_label(&mut self) -> LabelId {
        let label = LabelId(self.next_label);
        self.next_label += 1;
        tracing::trace!(%label, "label allocated");
        label
    }

    fn lower_body(&mut self, body: &BoundStmt) -> BoundStmt {
        self.rewrite_stmt(body).into_owned()
    }

    /// goto check; continue: body; check: gotoIfTrue cond continue; end:
    fn lower_loop(&mut self, cond: BoundExpr, body: BoundStmt) -> BoundStmt {
        let continue_label = self.make_label();
        let check_label = self.make_label();
        let end_label = self.make_label();

        BoundStmt::Block(vec![
            BoundStmt::Goto(check_label),
            BoundStmt::Label(continue_label),
            body,
            BoundStmt::Label(check_label),
            BoundStmt::CondGoto {
                label: continue_label,
                cond,
                jump_if_true: true,
            },
            BoundStmt::Label(end_label),
        ])
    }
}

fn int_operator(op: BinaryOp, result: TypeSymbol) -> BoundBinaryOperator {
    BoundBinaryOperator::new(op, TypeSymbol::Int, TypeSymbol::Int, result)
}

impl BoundTreeRewriter for Lowerer {
    fn rewrite_if<'a>(
        &mut self,
        _stmt: &'a BoundStmt,
        cond: &'a BoundExpr,
        then_stmt: &'a BoundStmt,
        else_stmt: Option<&'a BoundStmt>,
    ) -> Cow<'a, BoundStmt> {
        let then_stmt = self.lower_body(then_stmt);
        let else_stmt = else_stmt.map(|e| self.lower_body(e));

        let lowered = match else_stmt {
            None => {
                let end_label = self.make_label();
                vec![
                    BoundStmt::CondGoto {
                        label: end_label,
                        cond: cond.clone(),
                        jump_if_true: false,
                    },
                    then_stmt,
                    BoundStmt::Label(end_label),
                ]
            }
            Some(else_stmt) => {
                let else_label = self.make_label();
                let end_label = self.make_label();
                vec![
                    BoundStmt::CondGoto {
                        label: else_label,
                        cond: cond.clone(),
                        jump_if_true: false,
                    },
                    then_stmt,
                    BoundStmt::Goto(end_label),
                    BoundStmt::Label(else_label),
                    else_stmt,
                    BoundStmt::Label(end_label),
                ]
            }
        };
        Cow::Owned(BoundStmt::Block(lowered))
    }

    fn rewrite_while<'a>(
        &mut self,
        _stmt: &'a BoundStmt,
        cond: &'a BoundExpr,
        body: &'a BoundStmt,
    ) -> Cow<'a, BoundStmt> {
        let body = self.lower_body(body);
        Cow::Owned(self.lower_loop(cond.clone(), body))
    }

    fn rewrite_do_while<'a>(
        &mut self,
        _stmt: &'a BoundStmt,
        body: &'a BoundStmt,
        cond: &'a BoundExpr,
    ) -> Cow<'a, BoundStmt> {
        let body = self.lower_body(body);
        let continue_label = self.make_label();
        Cow::Owned(BoundStmt::Block(vec![
            BoundStmt::Label(continue_label),
            body,
            BoundStmt::CondGoto {
                label: continue_label,
                cond: cond.clone(),
                jump_if_true: true,
            },
        ]))
    }

    /// `for x = a to b { B }` becomes
    /// `{ var x = a; var upperBound = b; while x < upperBound { B; x = x + 1 } }`
    fn rewrite_for<'a>(
        &mut self,
        _stmt: &'a BoundStmt,
        variable: &'a VariableRef,
        lower: &'a BoundExpr,
        upper: &'a BoundExpr,
        body: &'a BoundStmt,
    ) -> Cow<'a, BoundStmt> {
        let body = self.lower_body(body);
        let upper_bound = VariableSymbol::new(&self.variable_ids, "upperBound", TypeSymbol::Int, false, None);

        let cond = BoundExpr::Binary {
            left: Box::new(BoundExpr::Variable(Rc::clone(variable))),
            op: int_operator(BinaryOp::Lt, TypeSymbol::Bool),
            right: Box::new(BoundExpr::Variable(Rc::clone(&upper_bound))),
        };
        let increment = BoundStmt::Expr(BoundExpr::Assignment {
            variable: Rc::clone(variable),
            value: Box::new(BoundExpr::Binary {
                left: Box::new(BoundExpr::Variable(Rc::clone(variable))),
                op: int_operator(BinaryOp::Add, TypeSymbol::Int),
                right: Box::new(BoundExpr::Literal(Value::Int(1))),
            }),
        });
        let loop_stmt = self.lower_loop(cond, BoundStmt::Block(vec![body, increment]));

        Cow::Owned(BoundStmt::Block(vec![
            BoundStmt::Variable {
                variable: Rc::clone(variable),
                init: lower.clone(),
            },
            BoundStmt::Variable {
                variable: upper_bound,
                init: upper.clone(),
            },
            loop_stmt,
        ]))
    }
}
