//! Lowering: structured bound tree to a flat goto/label program

mod lowerer;
mod rewriter;

pub use lowerer::Lowerer;
pub use rewriter::{BoundTreeRewriter, rewrite_all, walk_expr, walk_stmt};

use crate::binding::{BoundBlock, BoundStmt};
use crate::symbols::VariableIds;

/// Lower `stmt` and flatten the result into one statement list; hidden
/// variables take their ids from `variable_ids`
pub fn lower(stmt: &BoundStmt, variable_ids: &VariableIds) -> BoundBlock {
    let _span = tracing::debug_span!("lower").entered();

    let mut lowerer = Lowerer::new(variable_ids);
    let rewritten = lowerer.rewrite_stmt(stmt).into_owned();
    let program = flatten(rewritten);

    tracing::debug!(
        statements = program.statements.len(),
        labels = lowerer.label_count(),
        "lowered"
    );
    program
}

/// Expand nested blocks depth-first, without recursion
pub fn flatten(stmt: BoundStmt) -> BoundBlock {
    let mut statements = Vec::new();
    let mut stack = vec![stmt];

    while let Some(current) = stack.pop() {
        match current {
            BoundStmt::Block(children) => stack.extend(children.into_iter().rev()),
            other => statements.push(other),
        }
    }

    BoundBlock { statements }
}
