//! Compilation driver: parse, bind, lower and evaluate one submission

use crate::binding::{BoundBlock, GlobalScope, bind_global_scope};
use crate::diagnostics::DiagnosticBag;
use crate::interp::{EvalResult, Evaluator, Value, VariableStore};
use crate::lowering::lower;
use crate::printer::write_tree;
use crate::syntax::SyntaxTree;
use std::cell::OnceCell;
use std::collections::HashSet;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

/// One submission, chained to the submissions before it
#[derive(Debug)]
pub struct Compilation {
    previous: Option<Rc<Compilation>>,
    syntax: SyntaxTree,
    global_scope: OnceCell<Rc<GlobalScope>>,
}

/// Outcome of [`Compilation::evaluate`]
#[derive(Debug)]
pub struct EvaluationResult {
    pub diagnostics: DiagnosticBag,
    /// `None` when any diagnostic was reported
    pub value: Option<Value>,
}

impl Compilation {
    pub fn new(syntax: SyntaxTree) -> Rc<Self> {
        Rc::new(Compilation {
            previous: None,
            syntax,
            global_scope: OnceCell::new(),
        })
    }

    /// A compilation that sees every top-level variable declared by `self` and its ancestors
    pub fn continue_with(self: &Rc<Self>, syntax: SyntaxTree) -> Rc<Self> {
        Rc::new(Compilation {
            previous: Some(Rc::clone(self)),
            syntax,
            global_scope: OnceCell::new(),
        })
    }

    pub fn previous(&self) -> Option<&Rc<Compilation>> {
        self.previous.as_ref()
    }

    pub fn syntax(&self) -> &SyntaxTree {
        &self.syntax
    }

    /// Bound global scope, computed on first use
    pub fn global_scope(&self) -> Rc<GlobalScope> {
        let scope = self.global_scope.get_or_init(|| {
            let previous = self.previous.as_ref().map(|p| p.global_scope());
            Rc::new(bind_global_scope(previous, &self.syntax))
        });
        Rc::clone(scope)
    }

    /// Syntax diagnostics followed by binding diagnostics
    pub fn diagnostics(&self) -> DiagnosticBag {
        self.syntax.diagnostics.concat(&self.global_scope().diagnostics)
    }

    pub fn lowered_program(&self) -> BoundBlock {
        let scope = self.global_scope();
        lower(&scope.statement, &scope.variable_ids)
    }

    /// Evaluate against the process's stdin and stdout
    pub fn evaluate(&self, variables: &mut VariableStore) -> EvalResult<EvaluationResult> {
        self.evaluate_with(variables, Box::new(io::stdin().lock()), Box::new(io::stdout()))
    }

    pub fn evaluate_with<'s>(
        &self,
        variables: &'s mut VariableStore,
        input: Box<dyn BufRead + 's>,
        output: Box<dyn Write + 's>,
    ) -> EvalResult<EvaluationResult> {
        let diagnostics = self.diagnostics();
        if !diagnostics.is_empty() {
            return Ok(EvaluationResult {
                diagnostics,
                value: None,
            });
        }

        let program = self.lowered_program();
        let outcome = Evaluator::with_io(program, variables, input, output).evaluate();
        self.drop_local_slots(variables);
        let value = outcome?;
        Ok(EvaluationResult {
            diagnostics,
            value: Some(value),
        })
    }

    /// Keep only the top-level variables of this chain; block locals and
    /// loop bounds are unreachable once the submission has run
    fn drop_local_slots(&self, variables: &mut VariableStore) {
        let mut globals = HashSet::new();
        let mut scope = Some(self.global_scope());
        while let Some(current) = scope {
            globals.extend(current.variables.iter().map(|v| v.id));
            scope = current.previous.clone();
        }
        let before = variables.len();
        variables.retain(|slot| globals.contains(&slot.symbol.id));
        tracing::trace!(dropped = before - variables.len(), "pruned variable store");
    }

    /// Print the lowered program
    pub fn emit_tree(&self, out: &mut dyn Write) -> io::Result<()> {
        write_tree(&self.lowered_program(), out)
    }
}
