use std::cmp::Ordering;
use std::io::{BufRead, Write};
use std::rc::Rc;
use thiserror::Error;
use crate::interpreter::ast::{BinaryOperator, ComparisonOperator, Expr, FunctionDef, Stmt, UnaryOperator};
use crate::interpreter::builtin::{self, Builtin};
use crate::interpreter::environment::Environment;
use crate::interpreter::value::Value;


pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Variable '{0}' not defined")]
    UndefinedVariable(String),
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
    #[error("{name}() expects {expected}, got {got}")]
    ArgumentCount {
        name: String,
        expected: String,
        got: usize,
    },

    #[error("Division by zero")]
    DivisionByZero,
    #[error("Modulo by zero")]
    ModuloByZero,
    #[error("Integer overflow")]
    IntegerOverflow,
    #[error("Cannot take sqrt of negative number")]
    NegativeSquareRoot,

    #[error("Unsupported operand types for {operator}: {left} and {right}")]
    UnsupportedOperands {
        operator: &'static str,
        left: &'static str,
        right: &'static str,
    },
    #[error("Unsupported operand type for {operation}: {operand}")]
    UnsupportedOperand {
        operation: &'static str,
        operand: &'static str,
    },
    #[error("Cannot compare {left} and {right} with '{operator}'")]
    IncomparableTypes {
        operator: &'static str,
        left: &'static str,
        right: &'static str,
    },

    #[error("Maximum recursion depth exceeded ({0} calls)")]
    RecursionLimit(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type EvalResult<T> = Result<T, RuntimeError>;

/// Tree-walking evaluator. Holds the environment for one run of a program.
///
/// Printed values go to `output`, one per line; the `input` built-in reads lines from `input`.
pub struct Evaluator<W: Write, R: BufRead> {
    environment: Environment,

    output: W,
    input: R,

    // Set by `return`; inside a function every statement list stops once this is filled
    pending_return: Option<Value>,

    call_depth: usize,
    max_call_depth: usize,
}

impl<W: Write, R: BufRead> Evaluator<W, R> {
    pub fn new(output: W, input: R) -> Evaluator<W, R> {
        Evaluator {
            environment: Environment::new(),
            output, input,
            pending_return: None,
            call_depth: 0,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    pub fn with_max_call_depth(self, max_call_depth: usize) -> Evaluator<W, R> {
        Evaluator { max_call_depth, ..self }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs the top-level statements of a program in order. A `return` outside of
    /// a function only evaluates its value.
    pub fn execute(&mut self, program: &[Stmt]) -> EvalResult<()> {
        for stmt in program {
            self.execute_statement(stmt)?;
            self.pending_return = None;
        }

        self.output.flush()?;
        Ok(())
    }

    /// Executes a single statement and returns the value it produced
    /// (the printed value for `say`, the bound value for `have`).
    pub fn execute_statement(&mut self, stmt: &Stmt) -> EvalResult<Value> {
        match stmt {
            Stmt::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.environment.set_variable(name, value.clone());
                Ok(value)
            },
            Stmt::Print(value) => {
                let value = self.evaluate(value)?;
                writeln!(self.output, "{}", value)?;
                Ok(value)
            },
            Stmt::If { condition, then_block, else_block } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute_block(then_block)?;
                } else if let Some(else_block) = else_block {
                    self.execute_block(else_block)?;
                }

                Ok(Value::Nothing)
            },
            Stmt::Repeat { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute_block(body)?;

                    if self.is_returning() {
                        break;
                    }
                }

                Ok(Value::Nothing)
            },
            Stmt::Function(function) => {
                self.environment.define_function(Rc::clone(function));
                Ok(Value::Nothing)
            },
            Stmt::Return(value) => {
                let value = match value {
                    Some(value) => self.evaluate(value)?,
                    None => Value::Nothing,
                };

                self.pending_return = Some(value.clone());
                Ok(value)
            },
        }
    }

    fn execute_block(&mut self, block: &[Stmt]) -> EvalResult<()> {
        for stmt in block {
            self.execute_statement(stmt)?;

            if self.is_returning() {
                break;
            }
        }

        Ok(())
    }

    // Outside of a function a `return` only evaluates its value, so blocks keep going
    fn is_returning(&self) -> bool {
        self.call_depth > 0 && self.pending_return.is_some()
    }

    pub fn evaluate(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Number(value) => Ok(Value::Int(*value)),
            Expr::String(value) => Ok(Value::Str(value.clone())),
            Expr::Variable(name) => self.environment.get_variable(name).cloned()
                .ok_or_else(|| RuntimeError::UndefinedVariable(name.clone())),
            Expr::Binary { left, operator, right } => {
                // Both sides are always evaluated; `and` and `or` do not short-circuit
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;

                match operator {
                    BinaryOperator::Add => left.add(&right),
                    BinaryOperator::Subtract => left.subtract(&right),
                    BinaryOperator::Multiply => left.multiply(&right),
                    BinaryOperator::Divide => left.divide(&right),
                    BinaryOperator::Modulo => left.modulo(&right),
                    BinaryOperator::And => Ok(if left.is_truthy() { right } else { left }),
                    BinaryOperator::Or => Ok(if left.is_truthy() { left } else { right }),
                }
            },
            Expr::Unary { operator: UnaryOperator::Not, operand } => {
                Ok(Value::Bool(!self.evaluate(operand)?.is_truthy()))
            },
            Expr::Comparison { left, operator, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;

                compare(*operator, &left, &right).map(Value::Bool)
            },
            Expr::Call { name, args } => self.call_function(name, args),
        }
    }

    fn call_function(&mut self, name: &str, args: &[Expr]) -> EvalResult<Value> {
        if let Some(function) = self.environment.find_function(name) {
            return self.call_user_function(&function, args);
        }

        let values = self.evaluate_arguments(args)?;

        match Builtin::from_name(name) {
            Some(builtin) => builtin::call_builtin(builtin, name, values, &mut self.output, &mut self.input),
            None => Err(RuntimeError::UnknownFunction(name.to_owned())),
        }
    }

    fn call_user_function(&mut self, function: &FunctionDef, args: &[Expr]) -> EvalResult<Value> {
        if args.len() != function.params.len() {
            return Err(RuntimeError::ArgumentCount {
                name: function.name.clone(),
                expected: format!("{} arguments", function.params.len()),
                got: args.len(),
            });
        }

        let values = self.evaluate_arguments(args)?;

        if self.call_depth >= self.max_call_depth {
            return Err(RuntimeError::RecursionLimit(self.max_call_depth));
        }

        // The callee runs on a copy of the caller's scope, which is put back afterwards
        let saved = self.environment.snapshot();

        for (param, value) in function.params.iter().zip(values) {
            self.environment.set_variable(param, value);
        }

        self.call_depth += 1;
        self.pending_return = None;
        let result = self.execute_block(&function.body);
        self.call_depth -= 1;

        let returned = self.pending_return.take().unwrap_or(Value::Nothing);
        self.environment.restore(saved);

        result.map(|_| returned)
    }

    fn evaluate_arguments(&mut self, args: &[Expr]) -> EvalResult<Vec<Value>> {
        args.iter().map(|arg| self.evaluate(arg)).collect()
    }
}

fn compare(operator: ComparisonOperator, left: &Value, right: &Value) -> EvalResult<bool> {
    let accepted: &[Ordering] = match operator {
        ComparisonOperator::Equal => return Ok(left.loose_eq(right)),
        ComparisonOperator::NotEqual => return Ok(!left.loose_eq(right)),
        ComparisonOperator::Greater => &[Ordering::Greater],
        ComparisonOperator::Less => &[Ordering::Less],
        ComparisonOperator::GreaterEqual => &[Ordering::Greater, Ordering::Equal],
        ComparisonOperator::LessEqual => &[Ordering::Less, Ordering::Equal],
    };

    match left.compare(right) {
        Some(ordering) => Ok(accepted.contains(&ordering)),
        // NaN is unordered but still a number: every ordering test is false
        None if left.as_number().is_some() && right.as_number().is_some() => Ok(false),
        None => Err(RuntimeError::IncomparableTypes {
            operator: operator.symbol(),
            left: left.type_name(),
            right: right.type_name(),
        }),
    }
}
