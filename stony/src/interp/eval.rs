//! Evaluator: runs a lowered program with a program counter and a label map

use super::error::{EvalResult, RuntimeError};
use super::store::VariableStore;
use super::value::Value;
use crate::binding::{BoundBlock, BoundExpr, BoundStmt};
use crate::symbols::{Builtin, FunctionSymbol, LabelId, TypeSymbol};
use crate::syntax::{BinaryOp, UnaryOp};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};

/// Stack growth parameters for deeply nested expressions
const STACK_RED_ZONE: usize = 32 * 1024;
const STACK_GROW_SIZE: usize = 1024 * 1024;

/// Largest string `s * n` may build
const MAX_STRING_BYTES: usize = 1 << 28;

/// The evaluator
pub struct Evaluator<'s> {
    program: BoundBlock,
    variables: &'s mut VariableStore,
    /// Label -> index of the statement after it
    labels: HashMap<LabelId, usize>,
    input: Box<dyn BufRead + 's>,
    output: Box<dyn Write + 's>,
    /// Created on the first `random` call
    rng: Option<fastrand::Rng>,
}

impl<'s> Evaluator<'s> {
    /// Evaluator wired to the process's stdin and stdout
    pub fn new(program: BoundBlock, variables: &'s mut VariableStore) -> Self {
        Self::with_io(
            program,
            variables,
            Box::new(io::stdin().lock()),
            Box::new(io::stdout()),
        )
    }

    pub fn with_io(
        program: BoundBlock,
        variables: &'s mut VariableStore,
        input: Box<dyn BufRead + 's>,
        output: Box<dyn Write + 's>,
    ) -> Self {
        let labels = program
            .statements
            .iter()
            .enumerate()
            .filter_map(|(i, stmt)| match stmt {
                BoundStmt::Label(label) => Some((*label, i + 1)),
                _ => None,
            })
            .collect();

        Evaluator {
            program,
            variables,
            labels,
            input,
            output,
            rng: None,
        }
    }

    /// Run to the end of the program; the result is the value of the last
    /// declaration or expression statement executed
    pub fn evaluate(&mut self) -> EvalResult<Value> {
        let _span = tracing::debug_span!("evaluate", statements = self.program.statements.len()).entered();

        let program = std::mem::take(&mut self.program);
        let result = self.run(&program.statements);
        self.program = program;
        result
    }

    fn run(&mut self, statements: &[BoundStmt]) -> EvalResult<Value> {
        let mut last = Value::Void;
        let mut pc = 0;

        while let Some(stmt) = statements.get(pc) {
            match stmt {
                BoundStmt::Variable { variable, init } => {
                    let value = self.eval_expr(init)?;
                    self.variables.upsert(variable, value.clone());
                    last = value;
                    pc += 1;
                }
                BoundStmt::Expr(expr) => {
                    last = self.eval_expr(expr)?;
                    pc += 1;
                }
                BoundStmt::Goto(label) => {
                    pc = self.jump_target(*label)?;
                }
                BoundStmt::CondGoto {
                    label,
                    cond,
                    jump_if_true,
                } => {
                    let value = self.eval_expr(cond)?;
                    let taken = value
                        .as_bool()
                        .ok_or_else(|| RuntimeError::type_error("bool", value.type_name()))?;
                    if taken == *jump_if_true {
                        pc = self.jump_target(*label)?;
                    } else {
                        pc += 1;
                    }
                }
                BoundStmt::Label(_) => pc += 1,
                other => return Err(RuntimeError::unexpected_node(other.kind())),
            }
        }

        Ok(last)
    }

    fn jump_target(&self, label: LabelId) -> EvalResult<usize> {
        let target = self
            .labels
            .get(&label)
            .copied()
            .ok_or_else(|| RuntimeError::undefined_label(label))?;
        tracing::trace!(%label, target, "jump");
        Ok(target)
    }

    // ============================================
    // Expressions
    // ============================================

    fn eval_expr(&mut self, expr: &BoundExpr) -> EvalResult<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.eval_expr_inner(expr))
    }

    fn eval_expr_inner(&mut self, expr: &BoundExpr) -> EvalResult<Value> {
        match expr {
            BoundExpr::Literal(value) => Ok(value.clone()),

            BoundExpr::Variable(variable) => self
                .variables
                .get(variable.id)
                .cloned()
                .ok_or_else(|| RuntimeError::undefined_variable(&variable.name)),

            BoundExpr::Assignment { variable, value } => {
                let value = self.eval_expr(value)?;
                if !self.variables.assign(variable.id, value.clone()) {
                    return Err(RuntimeError::undefined_variable(&variable.name));
                }
                Ok(value)
            }

            BoundExpr::Unary { op, operand } => {
                let operand = self.eval_expr(operand)?;
                eval_unary(op.op, operand)
            }

            // both sides are always evaluated, `&&` and `||` included
            BoundExpr::Binary { left, op, right } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                eval_binary(op.op, left, right)
            }

            BoundExpr::Call { function, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.eval_expr(arg))
                    .collect::<EvalResult<Vec<_>>>()?;
                self.call_builtin(function, args)
            }

            BoundExpr::Conversion { ty, expr } => {
                let value = self.eval_expr(expr)?;
                convert(value, *ty)
            }

            BoundExpr::Error => Err(RuntimeError::unexpected_node("ErrorExpr")),
        }
    }

    fn call_builtin(&mut self, function: &FunctionSymbol, args: Vec<Value>) -> EvalResult<Value> {
        let Some(builtin) = function.builtin else {
            return Err(RuntimeError::unexpected_node(&format!("call to {}", function.name)));
        };
        let mut args = args.into_iter();
        let mut next_arg = || {
            args.next().ok_or_else(|| {
                RuntimeError::invalid_argument(format!("missing argument to {}", function.name))
            })
        };

        match builtin {
            Builtin::Print => {
                let value = next_arg()?;
                write!(self.output, "{value}")?;
                self.output.flush()?;
                Ok(Value::Void)
            }
            Builtin::PrintLn => {
                let value = next_arg()?;
                writeln!(self.output, "{value}")?;
                self.output.flush()?;
                Ok(Value::Void)
            }
            Builtin::Input => {
                let mut line = String::new();
                self.input.read_line(&mut line)?;
                Ok(Value::Str(line.trim_end_matches(['\r', '\n']).to_string()))
            }
            Builtin::Stringify => Ok(Value::Str(next_arg()?.to_string())),
            Builtin::RandomInt => {
                let value = next_arg()?;
                let max = value
                    .as_int()
                    .ok_or_else(|| RuntimeError::type_error("int", value.type_name()))?;
                if max <= 0 {
                    return Err(RuntimeError::invalid_argument(format!(
                        "random: upper bound must be positive, got {max}"
                    )));
                }
                Ok(Value::Int(self.rng().i64(0..max)))
            }
            Builtin::RandomFloat => {
                let value = next_arg()?;
                let max = value
                    .as_float()
                    .ok_or_else(|| RuntimeError::type_error("float", value.type_name()))?;
                Ok(Value::Float(self.rng().f64() * max))
            }
        }
    }

    fn rng(&mut self) -> &mut fastrand::Rng {
        self.rng.get_or_insert_with(fastrand::Rng::new)
    }
}

// ============================================
// Operators
// ============================================

fn eval_unary(op: UnaryOp, operand: Value) -> EvalResult<Value> {
    match (op, operand) {
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Identity, value @ (Value::Int(_) | Value::Float(_))) => Ok(value),
        (UnaryOp::Negate, Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
        (UnaryOp::Negate, Value::Float(x)) => Ok(Value::Float(-x)),
        (UnaryOp::BitNot, Value::Int(n)) => Ok(Value::Int(!n)),
        (UnaryOp::Not, Value::Int(n)) => Ok(Value::Int(wrapping_factorial(n))),
        (op, value) => Err(RuntimeError::unsupported(op, value.type_name())),
    }
}

/// `!n` on integers: the product 1 * 2 * ... * n, wrapping, and 1 for n < 1
fn wrapping_factorial(n: i64) -> i64 {
    // 66! is a multiple of 2^64
    if n >= 66 {
        return 0;
    }
    (1..=n).fold(1i64, i64::wrapping_mul)
}

fn eval_binary(op: BinaryOp, left: Value, right: Value) -> EvalResult<Value> {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => int_binary(op, l, r),
        (Value::Float(l), Value::Float(r)) => float_binary(op, l, r),
        (Value::Int(l), Value::Float(r)) => float_binary(op, l as f64, r),
        (Value::Float(l), Value::Int(r)) => float_binary(op, l, r as f64),
        (Value::Bool(l), Value::Bool(r)) => bool_binary(op, l, r),
        (Value::Str(l), Value::Int(r)) if op == BinaryOp::Sub => string_truncate(l, r),
        (Value::Str(l), Value::Int(r)) if op == BinaryOp::Mul => string_repeat(l, r),
        (Value::Str(l), Value::Str(r)) if op == BinaryOp::Eq => Ok(Value::Bool(l == r)),
        (Value::Str(l), Value::Str(r)) if op == BinaryOp::Ne => Ok(Value::Bool(l != r)),
        (left, right)
            if op == BinaryOp::Add
                && (matches!(left, Value::Str(_)) || matches!(right, Value::Str(_))) =>
        {
            Ok(Value::Str(format!("{left}{right}")))
        }
        (left, right) => Err(RuntimeError::unsupported(
            op,
            &format!("{} and {}", left.type_name(), right.type_name()),
        )),
    }
}

fn int_binary(op: BinaryOp, l: i64, r: i64) -> EvalResult<Value> {
    let value = match op {
        BinaryOp::Add => Value::Int(l.wrapping_add(r)),
        BinaryOp::Sub => Value::Int(l.wrapping_sub(r)),
        BinaryOp::Mul => Value::Int(l.wrapping_mul(r)),
        BinaryOp::Div | BinaryOp::Mod if r == 0 => return Err(RuntimeError::division_by_zero()),
        BinaryOp::Div => Value::Int(l.wrapping_div(r)),
        BinaryOp::Mod => Value::Int(l.wrapping_rem(r)),
        BinaryOp::Pow => Value::Int(int_pow(l, r)),
        BinaryOp::BitAnd => Value::Int(l & r),
        BinaryOp::BitOr => Value::Int(l | r),
        BinaryOp::BitXor => Value::Int(l ^ r),
        BinaryOp::Shl => Value::Int(l.wrapping_shl(r as u32)),
        BinaryOp::Shr => Value::Int(l.wrapping_shr(r as u32)),
        BinaryOp::Eq => Value::Bool(l == r),
        BinaryOp::Ne => Value::Bool(l != r),
        BinaryOp::Lt => Value::Bool(l < r),
        BinaryOp::Le => Value::Bool(l <= r),
        BinaryOp::Gt => Value::Bool(l > r),
        BinaryOp::Ge => Value::Bool(l >= r),
        BinaryOp::And | BinaryOp::Or => return Err(RuntimeError::unsupported(op, "int and int")),
    };
    Ok(value)
}

fn int_pow(base: i64, exponent: i64) -> i64 {
    match u32::try_from(exponent) {
        Ok(exponent) => base.wrapping_pow(exponent),
        Err(_) => (base as f64).powf(exponent as f64) as i64,
    }
}

fn float_binary(op: BinaryOp, l: f64, r: f64) -> EvalResult<Value> {
    let value = match op {
        BinaryOp::Add => Value::Float(l + r),
        BinaryOp::Sub => Value::Float(l - r),
        BinaryOp::Mul => Value::Float(l * r),
        BinaryOp::Div => Value::Float(l / r),
        BinaryOp::Pow => Value::Float(l.powf(r)),
        BinaryOp::Eq => Value::Bool(l == r),
        BinaryOp::Ne => Value::Bool(l != r),
        BinaryOp::Lt => Value::Bool(l < r),
        BinaryOp::Le => Value::Bool(l <= r),
        BinaryOp::Gt => Value::Bool(l > r),
        BinaryOp::Ge => Value::Bool(l >= r),
        _ => return Err(RuntimeError::unsupported(op, "float operands")),
    };
    Ok(value)
}

fn bool_binary(op: BinaryOp, l: bool, r: bool) -> EvalResult<Value> {
    let value = match op {
        BinaryOp::And => l && r,
        BinaryOp::Or => l || r,
        BinaryOp::Eq => l == r,
        BinaryOp::Ne => l != r,
        BinaryOp::BitAnd => l & r,
        BinaryOp::BitOr => l | r,
        BinaryOp::BitXor => l ^ r,
        _ => return Err(RuntimeError::unsupported(op, "bool and bool")),
    };
    Ok(Value::Bool(value))
}

/// `s - n` drops the last `n` characters; a negative `n` appends `|n|` instead
fn string_truncate(s: String, n: i64) -> EvalResult<Value> {
    if n < 0 {
        return Ok(Value::Str(format!("{s}{}", n.unsigned_abs())));
    }
    let len = s.chars().count();
    match usize::try_from(n) {
        Ok(n) if n <= len => Ok(Value::Str(s.chars().take(len - n).collect())),
        _ => Err(RuntimeError::invalid_argument(format!(
            "cannot remove {n} characters from a string of length {len}"
        ))),
    }
}

fn string_repeat(s: String, n: i64) -> EvalResult<Value> {
    let count = usize::try_from(n)
        .map_err(|_| RuntimeError::invalid_argument(format!("cannot repeat a string {n} times")))?;
    match s.len().checked_mul(count) {
        Some(len) if len <= MAX_STRING_BYTES => Ok(Value::Str(s.repeat(count))),
        _ => Err(RuntimeError::invalid_argument(format!(
            "repeating a string of {} bytes {count} times exceeds {MAX_STRING_BYTES} bytes",
            s.len()
        ))),
    }
}

/// Runtime side of a conversion expression
fn convert(value: Value, ty: TypeSymbol) -> EvalResult<Value> {
    match (ty, value) {
        (TypeSymbol::String, value) => Ok(Value::Str(value.to_string())),
        (TypeSymbol::Int, Value::Int(n)) => Ok(Value::Int(n)),
        (TypeSymbol::Int, Value::Str(s)) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| RuntimeError::conversion_failed(&s, "int")),
        (TypeSymbol::Float, Value::Float(x)) => Ok(Value::Float(x)),
        (TypeSymbol::Float, Value::Int(n)) => Ok(Value::Float(n as f64)),
        (TypeSymbol::Float, Value::Str(s)) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| RuntimeError::conversion_failed(&s, "float")),
        (TypeSymbol::Bool, Value::Bool(b)) => Ok(Value::Bool(b)),
        (TypeSymbol::Bool, Value::Str(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(RuntimeError::conversion_failed(&s, "bool")),
        },
        (ty, value) => Err(RuntimeError::type_error(ty.name(), value.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::bind_global_scope;
    use crate::interp::ErrorKind;
    use crate::lowering::lower;
    use crate::syntax::SyntaxTree;

    /// Helper to run a program with the given stdin, returning the result and stdout
    fn run_with(source: &str, input: &str) -> (EvalResult<Value>, String) {
        let syntax = SyntaxTree::parse(source);
        let scope = bind_global_scope(None, &syntax);
        assert!(syntax.diagnostics.is_empty(), "{:?}", syntax.diagnostics);
        assert!(scope.diagnostics.is_empty(), "{:?}", scope.diagnostics);

        let program = lower(&scope.statement, &scope.variable_ids);
        let mut store = VariableStore::new();
        let mut out = Vec::new();
        let result = Evaluator::with_io(program, &mut store, Box::new(input.as_bytes()), Box::new(&mut out))
            .evaluate();
        (result, String::from_utf8_lossy(&out).into_owned())
    }

    /// Helper to run and expect success
    fn run(source: &str) -> Value {
        run_with(source, "").0.expect("evaluation should succeed")
    }

    fn run_err(source: &str) -> ErrorKind {
        run_with(source, "").0.expect_err("evaluation should fail").kind
    }

    // ============================================
    // Arithmetic
    // ============================================

    #[test]
    fn test_integer_arithmetic() {
        assert_eq!(run("2 + 3 * 4"), Value::Int(14));
        assert_eq!(run("7 / 2"), Value::Int(3));
        assert_eq!(run("7 % 3"), Value::Int(1));
        assert_eq!(run("2 ** 10"), Value::Int(1024));
        assert_eq!(run("-5 + +2"), Value::Int(-3));
    }

    #[test]
    fn test_negative_exponent_goes_through_float() {
        assert_eq!(run("2 ** -1"), Value::Int(0));
        assert_eq!(run("1 ** -3"), Value::Int(1));
    }

    #[test]
    fn test_bitwise_and_shifts() {
        assert_eq!(run("6 & 3"), Value::Int(2));
        assert_eq!(run("6 | 3"), Value::Int(7));
        assert_eq!(run("6 ^ 3"), Value::Int(5));
        assert_eq!(run("1 << 4"), Value::Int(16));
        assert_eq!(run("256 >> 2"), Value::Int(64));
        assert_eq!(run("~0"), Value::Int(-1));
    }

    #[test]
    fn test_float_promotion() {
        assert_eq!(run("1 + 2.5"), Value::Float(3.5));
        assert_eq!(run("5 / 2.0"), Value::Float(2.5));
        assert_eq!(run("2.0 ** 3"), Value::Float(8.0));
        assert_eq!(run("1 < 1.5"), Value::Bool(true));
    }

    #[test]
    fn test_integer_overflow_wraps() {
        assert_eq!(run("9223372036854775807 + 1"), Value::Int(i64::MIN));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(run_err("1 / 0"), ErrorKind::DivisionByZero);
        assert_eq!(run_err("1 % 0"), ErrorKind::DivisionByZero);
        // IEEE semantics for floats
        assert_eq!(run("1.0 / 0"), Value::Float(f64::INFINITY));
    }

    #[test]
    fn test_integer_not_is_factorial() {
        assert_eq!(run("!5"), Value::Int(120));
        assert_eq!(run("!0"), Value::Int(1));
        assert_eq!(run("!true"), Value::Bool(false));
    }

    #[test]
    fn test_integer_not_large_operand_wraps_to_zero() {
        assert_ne!(run("!65"), Value::Int(0));
        assert_eq!(run("!66"), Value::Int(0));
        assert_eq!(run("!9223372036854775807"), Value::Int(0));
    }

    // ============================================
    // Logic and comparison
    // ============================================

    #[test]
    fn test_bool_operators() {
        assert_eq!(run("true && false"), Value::Bool(false));
        assert_eq!(run("true || false"), Value::Bool(true));
        assert_eq!(run("true ^ true"), Value::Bool(false));
        assert_eq!(run("1 == 1 && 2 != 3"), Value::Bool(true));
    }

    #[test]
    fn test_logical_operators_evaluate_both_sides() {
        let (result, out) = run_with("var mut n = 0; false && (n = 1) == 1; n", "");
        assert_eq!(result.unwrap(), Value::Int(1));
        assert!(out.is_empty());
    }

    // ============================================
    // Strings
    // ============================================

    #[test]
    fn test_string_concatenation() {
        assert_eq!(run("\"a\" + 1"), Value::Str("a1".to_string()));
        assert_eq!(run("1.5 + \"b\""), Value::Str("1.5b".to_string()));
        assert_eq!(run("\"x\" + true"), Value::Str("xtrue".to_string()));
    }

    #[test]
    fn test_string_repeat_and_truncate() {
        assert_eq!(run("\"ab\" * 3"), Value::Str("ababab".to_string()));
        assert_eq!(run("\"ab\" * 0"), Value::Str(String::new()));
        assert_eq!(run("\"hello\" - 2"), Value::Str("hel".to_string()));
        assert_eq!(run("\"hi\" - (-1)"), Value::Str("hi1".to_string()));
    }

    #[test]
    fn test_string_operator_domain_errors() {
        assert_eq!(run_err("\"ab\" * -1"), ErrorKind::InvalidArgument);
        assert_eq!(run_err("\"ab\" - 3"), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_string_repeat_too_large() {
        assert_eq!(run_err("\"ab\" * 9223372036854775807"), ErrorKind::InvalidArgument);
        assert_eq!(run_err("\"ab\" * 268435456"), ErrorKind::InvalidArgument);
        assert_eq!(run("\"\" * 9223372036854775807"), Value::Str(String::new()));
    }

    #[test]
    fn test_string_equality() {
        assert_eq!(run("\"a\" == \"a\""), Value::Bool(true));
        assert_eq!(run("\"a\" != \"a\""), Value::Bool(false));
    }

    // ============================================
    // Conversions
    // ============================================

    #[test]
    fn test_casts() {
        assert_eq!(run("int(\" 42 \")"), Value::Int(42));
        assert_eq!(run("float(\"2.5\")"), Value::Float(2.5));
        assert_eq!(run("bool(\"TRUE\")"), Value::Bool(true));
        assert_eq!(run("string(3.0)"), Value::Str("3".to_string()));
        assert_eq!(run("var f: float = 2; f"), Value::Float(2.0));
    }

    #[test]
    fn test_failed_cast_is_runtime_error() {
        assert_eq!(run_err("int(\"abc\")"), ErrorKind::ConversionFailed);
        assert_eq!(run_err("bool(\"yes\")"), ErrorKind::ConversionFailed);
    }

    // ============================================
    // Control flow
    // ============================================

    #[test]
    fn test_if_else() {
        assert_eq!(run("var mut x = 0; if 1 < 2 { x = 1 } else { x = 2 } x"), Value::Int(1));
        assert_eq!(run("var mut x = 0; if 1 > 2 { x = 1 } else { x = 2 } x"), Value::Int(2));
    }

    #[test]
    fn test_while_loop() {
        assert_eq!(run("var mut i = 0; while i < 5 { i = i + 1 } i"), Value::Int(5));
    }

    #[test]
    fn test_do_while_runs_once() {
        assert_eq!(run("var mut i = 10; do { i = i + 1 } while i < 5; i"), Value::Int(11));
    }

    #[test]
    fn test_for_loop_sum() {
        assert_eq!(run("var mut s = 0; for i = 0 to 5 { s = s + i } s"), Value::Int(10));
    }

    #[test]
    fn test_for_upper_bound_evaluated_once() {
        let source = "var mut n = 3; var mut count = 0; for i = 0 to n { n = n + 1; count = count + 1 } count";
        assert_eq!(run(source), Value::Int(3));
    }

    #[test]
    fn test_last_value_and_void() {
        assert_eq!(run(""), Value::Void);
        assert_eq!(run("var x = 4"), Value::Int(4));
        assert_eq!(run_with("print(1)", "").0.unwrap(), Value::Void);
    }

    #[test]
    fn test_unlowered_statement_is_rejected() {
        let program = BoundBlock {
            statements: vec![BoundStmt::While {
                cond: BoundExpr::Literal(Value::Bool(false)),
                body: Box::new(BoundStmt::Block(Vec::new())),
            }],
        };
        let mut store = VariableStore::new();
        let err = Evaluator::new(program, &mut store).evaluate().unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedNode);
    }

    #[test]
    fn test_missing_label() {
        let program = BoundBlock {
            statements: vec![BoundStmt::Goto(LabelId(9))],
        };
        let mut store = VariableStore::new();
        let err = Evaluator::new(program, &mut store).evaluate().unwrap_err();
        assert_eq!(err.kind, ErrorKind::UndefinedLabel);
    }

    // ============================================
    // Built-ins
    // ============================================

    #[test]
    fn test_print_and_println() {
        let (_, out) = run_with("print(\"a\"); print(1); println(true); println(2.5)", "");
        assert_eq!(out, "a1true\n2.5\n");
    }

    #[test]
    fn test_input_strips_line_terminator() {
        let (result, _) = run_with("input() + \"!\"", "world\r\nrest\n");
        assert_eq!(result.unwrap(), Value::Str("world!".to_string()));
        let (result, _) = run_with("input()", "");
        assert_eq!(result.unwrap(), Value::Str(String::new()));
    }

    #[test]
    fn test_stringify() {
        assert_eq!(run("stringify(false)"), Value::Str("false".to_string()));
        assert_eq!(run("stringify(0.5)"), Value::Str("0.5".to_string()));
    }

    #[test]
    fn test_random_in_range() {
        for _ in 0..20 {
            let Value::Int(n) = run("random(3)") else {
                panic!("Expected Int");
            };
            assert!((0..3).contains(&n));
            let Value::Float(x) = run("random(2.0)") else {
                panic!("Expected Float");
            };
            assert!((0.0..2.0).contains(&x));
        }
    }

    #[test]
    fn test_random_rejects_non_positive_bound() {
        assert_eq!(run_err("random(0)"), ErrorKind::InvalidArgument);
    }
}
