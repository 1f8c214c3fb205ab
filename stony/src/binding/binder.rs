//! Binder: resolves names, checks types and produces the bound tree

use super::conversion::Conversion;
use super::operators::{BoundBinaryOperator, BoundUnaryOperator};
use super::scope::{ScopeRef, child_scope};
use super::tree::{BoundExpr, BoundStmt};
use crate::diagnostics::{DiagnosticBag, DiagnosticKind};
use crate::interp::Value;
use crate::symbols::{FunctionRef, FunctionSymbol, TypeSymbol, VariableIds, VariableRef, VariableSymbol};
use crate::syntax::{
    BinaryOp, Block, CompilationUnit, Expr, Name, SourceText, Span, Spanned, Stmt, UnaryOp,
};
use crate::util;
use std::rc::Rc;

const RED_ZONE: usize = 32 * 1024;
const STACK_GROWTH: usize = 1024 * 1024;

pub struct Binder<'a> {
    source: &'a SourceText,
    /// Innermost scope; the outermost one the binder created is `global`
    scope: ScopeRef,
    global: ScopeRef,
    variable_ids: VariableIds,
    diagnostics: DiagnosticBag,
}

impl<'a> Binder<'a> {
    pub fn new(source: &'a SourceText, parent: &ScopeRef, variable_ids: &VariableIds) -> Self {
        let global = child_scope(parent);
        Binder {
            source,
            scope: Rc::clone(&global),
            global,
            variable_ids: variable_ids.clone(),
            diagnostics: DiagnosticBag::new(),
        }
    }

    /// Bind every top-level statement directly in the global scope
    pub fn bind_unit(&mut self, unit: &CompilationUnit) -> BoundStmt {
        let statements = unit.statements.iter().map(|s| self.bind_stmt(s)).collect();
        BoundStmt::Block(statements)
    }

    /// Variables declared at top level, in declaration order
    pub fn declared_variables(&self) -> Vec<VariableRef> {
        self.global.borrow().declared_variables().to_vec()
    }

    pub fn into_diagnostics(self) -> DiagnosticBag {
        self.diagnostics
    }

    fn report(&mut self, span: Span, kind: DiagnosticKind, message: impl Into<String>) {
        self.diagnostics.report(self.source, span, kind, message);
    }

    fn report_not_found(&mut self, name: &Name, message: String) {
        let visible = self.scope.borrow().visible_names();
        let help = util::suggest(&name.text, &visible);
        self.diagnostics
            .report(self.source, name.span, DiagnosticKind::KeyNotFoundException, message)
            .help = help;
    }

    fn push_scope(&mut self) {
        self.scope = child_scope(&self.scope);
    }

    fn pop_scope(&mut self) {
        let parent = self.scope.borrow().parent();
        if let Some(parent) = parent {
            self.scope = parent;
        }
    }

    fn lookup_variable(&self, name: &str) -> Option<VariableRef> {
        self.scope.borrow().lookup_variable(name)
    }

    // ============================================
    // Statements
    // ============================================

    fn bind_stmt(&mut self, stmt: &Spanned<Stmt>) -> BoundStmt {
        stacker::maybe_grow(RED_ZONE, STACK_GROWTH, || self.bind_stmt_inner(stmt))
    }

    fn bind_stmt_inner(&mut self, stmt: &Spanned<Stmt>) -> BoundStmt {
        match &stmt.node {
            Stmt::Block(block) => self.bind_statements(&block.statements),

            Stmt::Var {
                name,
                mutable,
                ty,
                init,
            } => {
                let bound_init = self.bind_expr(init, false);
                let var_ty = match ty {
                    Some(annotation) => self.bind_type(annotation),
                    None => bound_init.ty(),
                };
                let bound_init = self.convert(bound_init, init.span, var_ty, false);
                let variable = self.bind_variable(name, *mutable, var_ty);
                BoundStmt::Variable {
                    variable,
                    init: bound_init,
                }
            }

            Stmt::If {
                cond,
                then_block,
                else_block,
            } => {
                let cond = self.bind_expr_to(cond, TypeSymbol::Bool);
                let then_stmt = Box::new(self.bind_block(then_block));
                let else_stmt = else_block.as_ref().map(|b| Box::new(self.bind_block(b)));
                BoundStmt::If {
                    cond,
                    then_stmt,
                    else_stmt,
                }
            }

            Stmt::While { cond, body } => {
                let cond = match cond {
                    Some(cond) => self.bind_expr_to(cond, TypeSymbol::Bool),
                    None => BoundExpr::Literal(Value::Bool(true)),
                };
                let body = Box::new(self.bind_block(body));
                BoundStmt::While { cond, body }
            }

            Stmt::DoWhile { body, cond } => {
                let body = Box::new(self.bind_block(body));
                let cond = self.bind_expr_to(cond, TypeSymbol::Bool);
                BoundStmt::DoWhile { body, cond }
            }

            Stmt::For {
                var,
                mutable,
                lower,
                upper,
                body,
            } => {
                let lower = self.bind_expr_to(lower, TypeSymbol::Int);
                let upper = self.bind_expr_to(upper, TypeSymbol::Int);

                self.push_scope();
                let variable = self.bind_variable(var, *mutable, TypeSymbol::Int);
                let body = Box::new(self.bind_block(body));
                self.pop_scope();

                BoundStmt::For {
                    variable,
                    lower,
                    upper,
                    body,
                }
            }

            Stmt::Expr(expr) => BoundStmt::Expr(self.bind_expr(expr, true)),
        }
    }

    fn bind_block(&mut self, block: &Spanned<Block>) -> BoundStmt {
        self.bind_statements(&block.node.statements)
    }

    fn bind_statements(&mut self, statements: &[Spanned<Stmt>]) -> BoundStmt {
        self.push_scope();
        let bound = statements.iter().map(|s| self.bind_stmt(s)).collect();
        self.pop_scope();
        BoundStmt::Block(bound)
    }

    fn bind_type(&mut self, annotation: &Name) -> TypeSymbol {
        match TypeSymbol::lookup(&annotation.text) {
            Some(ty) => ty,
            None => {
                self.report(
                    annotation.span,
                    DiagnosticKind::TypeException,
                    format!("Unknown type \"{}\".", annotation.text),
                );
                TypeSymbol::Error
            }
        }
    }

    /// Declare `name` in the current scope. The symbol is returned even when
    /// the declaration clashes, so binding can continue.
    fn bind_variable(&mut self, name: &Name, mutable: bool, ty: TypeSymbol) -> VariableRef {
        let variable = VariableSymbol::new(&self.variable_ids, &name.text, ty, mutable, Some(name.span));
        if name.is_missing {
            return variable;
        }

        let names_function = self.scope.borrow().lookup_function(&name.text).is_some();
        let declared = !names_function && self.scope.borrow_mut().declare_variable(Rc::clone(&variable));
        if !declared {
            self.report(
                name.span,
                DiagnosticKind::DeclarationException,
                format!(
                    "\"{}\" was already declared in the current or a previous scope.",
                    name.text
                ),
            );
        }
        variable
    }

    // ============================================
    // Expressions
    // ============================================

    /// Bind `expr`; unless `can_be_void`, a `void` result is reported and replaced by an error
    fn bind_expr(&mut self, expr: &Spanned<Expr>, can_be_void: bool) -> BoundExpr {
        let bound = stacker::maybe_grow(RED_ZONE, STACK_GROWTH, || self.bind_expr_inner(expr));
        if !can_be_void && bound.ty() == TypeSymbol::Void {
            self.report(
                expr.span,
                DiagnosticKind::TypeException,
                "Expression must have a non-void value.",
            );
            return BoundExpr::Error;
        }
        bound
    }

    /// Bind and implicitly convert to `ty`
    fn bind_expr_to(&mut self, expr: &Spanned<Expr>, ty: TypeSymbol) -> BoundExpr {
        let bound = self.bind_expr(expr, false);
        self.convert(bound, expr.span, ty, false)
    }

    fn bind_expr_inner(&mut self, expr: &Spanned<Expr>) -> BoundExpr {
        match &expr.node {
            Expr::Literal(literal) => BoundExpr::Literal(Value::from(literal)),
            Expr::Name(name) => self.bind_name(name),
            Expr::Unary { op, operand } => self.bind_unary(op, operand),
            Expr::Binary { left, op, right } => self.bind_binary(left, op, right),
            Expr::Assignment { target, value } => self.bind_assignment(target, value),
            Expr::Call { callee, args } => self.bind_call(callee, args, expr.span),
            Expr::Paren(inner) => self.bind_expr_inner(inner),
        }
    }

    fn bind_name(&mut self, name: &Name) -> BoundExpr {
        if name.is_missing {
            // the parser already reported this
            return BoundExpr::Error;
        }
        match self.lookup_variable(&name.text) {
            Some(variable) => BoundExpr::Variable(variable),
            None => {
                self.report_not_found(
                    name,
                    format!("Could not find \"{}\" in the current context.", name.text),
                );
                BoundExpr::Error
            }
        }
    }

    fn bind_unary(&mut self, op: &Spanned<UnaryOp>, operand: &Spanned<Expr>) -> BoundExpr {
        let bound_operand = self.bind_expr(operand, false);
        if bound_operand.is_error() {
            return BoundExpr::Error;
        }

        let Some(bound_op) = BoundUnaryOperator::bind(op.node, bound_operand.ty()) else {
            self.report(
                op.span,
                DiagnosticKind::TypeException,
                format!(
                    "Unary operator '{}' is not defined for type \"{}\".",
                    op.node,
                    bound_operand.ty()
                ),
            );
            return BoundExpr::Error;
        };

        match op.node {
            UnaryOp::Increment => self.bind_increment(BinaryOp::Add, bound_operand, operand.span),
            UnaryOp::Decrement => self.bind_increment(BinaryOp::Sub, bound_operand, operand.span),
            _ => BoundExpr::Unary {
                op: bound_op,
                operand: Box::new(bound_operand),
            },
        }
    }

    /// `++x` / `--x` become `x = x + 1` / `x = x - 1`
    fn bind_increment(&mut self, step: BinaryOp, operand: BoundExpr, span: Span) -> BoundExpr {
        let BoundExpr::Variable(variable) = operand else {
            self.report(
                span,
                DiagnosticKind::AssignmentException,
                "The operand of an increment operator must be a variable.",
            );
            return BoundExpr::Error;
        };

        if !variable.mutable {
            self.report(
                span,
                DiagnosticKind::AssignmentException,
                format!("Cannot assign to \"{}\" since it is a read-only variable.", variable.name),
            );
        }

        let value = BoundExpr::Binary {
            left: Box::new(BoundExpr::Variable(Rc::clone(&variable))),
            op: BoundBinaryOperator::new(step, TypeSymbol::Int, TypeSymbol::Int, TypeSymbol::Int),
            right: Box::new(BoundExpr::Literal(Value::Int(1))),
        };
        BoundExpr::Assignment {
            variable,
            value: Box::new(value),
        }
    }

    fn bind_binary(
        &mut self,
        left: &Spanned<Expr>,
        op: &Spanned<BinaryOp>,
        right: &Spanned<Expr>,
    ) -> BoundExpr {
        let left = self.bind_expr(left, false);
        let right = self.bind_expr(right, false);
        if left.is_error() || right.is_error() {
            return BoundExpr::Error;
        }

        match BoundBinaryOperator::bind(op.node, left.ty(), right.ty()) {
            Some(bound_op) => BoundExpr::Binary {
                left: Box::new(left),
                op: bound_op,
                right: Box::new(right),
            },
            None => {
                self.report(
                    op.span,
                    DiagnosticKind::TypeException,
                    format!(
                        "Binary operator '{}' is not defined for types \"{}\" and \"{}\".",
                        op.node,
                        left.ty(),
                        right.ty()
                    ),
                );
                BoundExpr::Error
            }
        }
    }

    fn bind_assignment(&mut self, target: &Name, value: &Spanned<Expr>) -> BoundExpr {
        let bound_value = self.bind_expr(value, false);
        if target.is_missing {
            return BoundExpr::Error;
        }

        let Some(variable) = self.lookup_variable(&target.text) else {
            self.report_not_found(
                target,
                format!("Could not find \"{}\" in the current context.", target.text),
            );
            return bound_value;
        };

        if !variable.mutable {
            self.report(
                target.span,
                DiagnosticKind::AssignmentException,
                format!("Cannot assign to \"{}\" since it is a read-only variable.", target.text),
            );
        }

        let converted = self.convert(bound_value, value.span, variable.ty, false);
        BoundExpr::Assignment {
            variable,
            value: Box::new(converted),
        }
    }

    fn bind_call(&mut self, callee: &Name, args: &[Spanned<Expr>], span: Span) -> BoundExpr {
        // `int(x)` and friends are casts
        if let [arg] = args {
            if let Some(ty) = TypeSymbol::lookup(&callee.text) {
                let bound = self.bind_expr(arg, false);
                return self.convert(bound, arg.span, ty, true);
            }
        }

        let overloads = self.scope.borrow().lookup_overloads(&callee.text);
        if overloads.is_empty() {
            self.report_not_found(
                callee,
                format!("Function \"{}\" doesn't exist in the current context.", callee.text),
            );
            return BoundExpr::Error;
        }

        let bound_args: Vec<BoundExpr> = args.iter().map(|a| self.bind_expr(a, false)).collect();
        if bound_args.iter().any(BoundExpr::is_error) {
            return BoundExpr::Error;
        }

        let candidates: Vec<&FunctionRef> = overloads
            .iter()
            .filter(|f| f.parameters.len() == bound_args.len())
            .collect();
        if candidates.is_empty() {
            self.report_arity(&overloads[0], args, span);
            return BoundExpr::Error;
        }

        let best = candidates
            .iter()
            .filter_map(|f| call_cost(f, &bound_args).map(|cost| (cost, *f)))
            .min_by_key(|(cost, _)| *cost);

        let Some((_, function)) = best else {
            if let [function] = candidates.as_slice() {
                let function = Rc::clone(function);
                for ((arg, bound), param) in args.iter().zip(bound_args).zip(&function.parameters) {
                    if param.ty != TypeSymbol::Any {
                        self.convert(bound, arg.span, param.ty, false);
                    }
                }
            } else {
                let types: Vec<String> = bound_args.iter().map(|a| a.ty().to_string()).collect();
                self.report(
                    callee.span,
                    DiagnosticKind::ArgumentException,
                    format!(
                        "No overload of \"{}\" accepts arguments of types ({}).",
                        callee.text,
                        types.join(", ")
                    ),
                );
            }
            return BoundExpr::Error;
        };

        let function = Rc::clone(function);
        let converted: Vec<BoundExpr> = args
            .iter()
            .zip(bound_args)
            .zip(&function.parameters)
            .map(|((arg, bound), param)| {
                if param.ty == TypeSymbol::Any {
                    bound
                } else {
                    self.convert(bound, arg.span, param.ty, false)
                }
            })
            .collect();

        BoundExpr::Call {
            function,
            args: converted,
        }
    }

    fn report_arity(&mut self, function: &FunctionSymbol, args: &[Spanned<Expr>], span: Span) {
        let expected = function.parameters.len();
        let given = args.len();

        if given < expected {
            for param in &function.parameters[given..] {
                self.report(
                    span,
                    DiagnosticKind::ArgumentException,
                    format!(
                        "There is no given argument that corresponds to the required formal parameter \"{}\" of \"{}\".",
                        param.name, function.name
                    ),
                );
            }
        } else {
            let extra = args[expected].span.merge(args[given - 1].span);
            self.report(
                extra,
                DiagnosticKind::ArgumentException,
                format!("Expected {expected} arguments, but got {given}."),
            );
        }
    }

    /// Convert `expr` to `ty`, reporting when no conversion, or only an
    /// explicit one, is available
    fn convert(&mut self, expr: BoundExpr, span: Span, ty: TypeSymbol, allow_explicit: bool) -> BoundExpr {
        let from = expr.ty();
        let conversion = Conversion::classify(from, ty);

        if !conversion.exists() {
            if !from.is_error() && !ty.is_error() {
                self.report(
                    span,
                    DiagnosticKind::TypeException,
                    format!("Cannot convert a value of type \"{from}\" to a value of type \"{ty}\"."),
                );
            }
            return BoundExpr::Error;
        }

        if !conversion.is_implicit() && !allow_explicit {
            self.report(
                span,
                DiagnosticKind::TypeException,
                format!(
                    "Cannot implicitly convert a value of type \"{from}\" to a value of type \"{ty}\". \
                     An explicit conversion exists; are you missing a cast?"
                ),
            );
        }

        if conversion == Conversion::Identity {
            return expr;
        }
        BoundExpr::Conversion {
            ty,
            expr: Box::new(expr),
        }
    }
}

/// Number of implicit conversions a call needs, or `None` if it cannot match
fn call_cost(function: &FunctionSymbol, args: &[BoundExpr]) -> Option<usize> {
    function
        .parameters
        .iter()
        .zip(args)
        .try_fold(0, |cost, (param, arg)| {
            if param.ty == TypeSymbol::Any {
                return Some(cost);
            }
            match Conversion::classify(arg.ty(), param.ty) {
                Conversion::Identity => Some(cost),
                Conversion::Implicit => Some(cost + 1),
                Conversion::Explicit | Conversion::None => None,
            }
        })
}
