//! Binding: from syntax to the typed bound tree

mod binder;
mod conversion;
mod operators;
mod scope;
mod tree;


pub use binder::Binder;
pub use conversion::Conversion;
pub use operators::{BoundBinaryOperator, BoundUnaryOperator};
pub use scope::{BoundScope, ScopeRef, child_scope};
pub use tree::{BoundBlock, BoundExpr, BoundStmt};

use crate::diagnostics::DiagnosticBag;
use crate::symbols::{Builtin, VariableIds, VariableRef};
use crate::syntax::SyntaxTree;
use std::rc::Rc;

/// Result of binding one submission, linked to the submissions before it
#[derive(Debug)]
pub struct GlobalScope {
    pub previous: Option<Rc<GlobalScope>>,
    pub diagnostics: DiagnosticBag,
    /// Top-level variables of this submission, in declaration order
    pub variables: Vec<VariableRef>,
    pub statement: BoundStmt,
    /// Shared with every submission of the same chain
    pub variable_ids: VariableIds,
}

/// Bind `syntax` on top of the variables declared by `previous` and its ancestors
pub fn bind_global_scope(previous: Option<Rc<GlobalScope>>, syntax: &SyntaxTree) -> GlobalScope {
    let _span = tracing::debug_span!("bind", statements = syntax.root.statements.len()).entered();

    let variable_ids = previous
        .as_ref()
        .map(|p| p.variable_ids.clone())
        .unwrap_or_default();
    let parent = create_parent_scope(previous.as_deref());
    let mut binder = Binder::new(&syntax.source, &parent, &variable_ids);
    let statement = binder.bind_unit(&syntax.root);
    let variables = binder.declared_variables();
    let mut diagnostics = binder.into_diagnostics();
    if let Some(previous) = &previous {
        diagnostics = diagnostics.concat(&previous.diagnostics);
    }

    tracing::debug!(
        variables = variables.len(),
        diagnostics = diagnostics.len(),
        "bound"
    );

    GlobalScope {
        previous,
        diagnostics,
        variables,
        statement,
        variable_ids,
    }
}

/// Fresh scope chain: built-ins at the root, then one scope per earlier submission, oldest first
fn create_parent_scope(previous: Option<&GlobalScope>) -> ScopeRef {
    let mut history = Vec::new();
    let mut current = previous;
    while let Some(global) = current {
        history.push(global);
        current = global.previous.as_deref();
    }

    let mut parent = root_scope();
    for global in history.into_iter().rev() {
        let scope = child_scope(&parent);
        for variable in &global.variables {
            scope.borrow_mut().declare_variable(Rc::clone(variable));
        }
        parent = scope;
    }
    parent
}

fn root_scope() -> ScopeRef {
    let mut root = BoundScope::new();
    for builtin in Builtin::ALL {
        root.declare_function(builtin.symbol());
    }
    root.into_ref()
}
