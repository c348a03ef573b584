use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::{BufRead, Write};
use lazy_static::lazy_static;
use crate::interpreter::evaluator::{EvalResult, RuntimeError};
use crate::interpreter::value::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    Input,
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Sqrt,
    Abs,
    Min,
    Max,
}

lazy_static! {
    static ref BUILTINS: HashMap<&'static str, Builtin> = HashMap::from([
        ("input", Builtin::Input),
        ("add", Builtin::Add),
        ("subtract", Builtin::Subtract), ("sub", Builtin::Subtract),
        ("multiply", Builtin::Multiply), ("mul", Builtin::Multiply),
        ("divide", Builtin::Divide), ("div", Builtin::Divide),
        ("power", Builtin::Power), ("pow", Builtin::Power),
        ("sqrt", Builtin::Sqrt),
        ("abs", Builtin::Abs),
        ("min", Builtin::Min),
        ("max", Builtin::Max),
    ]);
}

impl Builtin {
    /// Looks up a built-in by any of its names. User functions shadow these.
    pub fn from_name(name: &str) -> Option<Builtin> {
        BUILTINS.get(name).copied()
    }
}

/// Calls a built-in with already evaluated arguments. `name` is the spelling used
/// at the call site and only shows up in error messages.
pub fn call_builtin<W: Write, R: BufRead>(builtin: Builtin, name: &str, args: Vec<Value>,
                                          output: &mut W, input: &mut R) -> EvalResult<Value> {
    match builtin {
        Builtin::Input => {
            if args.len() > 1 {
                return Err(argument_count(name, "0 or 1 argument", args.len()));
            }

            read_input(args.first(), output, input)
        },
        Builtin::Add => binary(name, &args, Value::add),
        Builtin::Subtract => binary(name, &args, Value::subtract),
        Builtin::Multiply => binary(name, &args, Value::multiply),
        Builtin::Divide => binary(name, &args, Value::divide),
        Builtin::Power => binary(name, &args, Value::power),
        Builtin::Sqrt => unary(name, &args, Value::square_root),
        Builtin::Abs => unary(name, &args, Value::absolute),
        Builtin::Min => extremum(name, &args, Ordering::Less),
        Builtin::Max => extremum(name, &args, Ordering::Greater),
    }
}

fn argument_count(name: &str, expected: &'static str, got: usize) -> RuntimeError {
    RuntimeError::ArgumentCount { name: name.to_owned(), expected: expected.to_owned(), got }
}

fn binary(name: &str, args: &[Value], operation: fn(&Value, &Value) -> EvalResult<Value>) -> EvalResult<Value> {
    match args {
        [left, right] => operation(left, right),
        _ => Err(argument_count(name, "2 arguments", args.len())),
    }
}

fn unary(name: &str, args: &[Value], operation: fn(&Value) -> EvalResult<Value>) -> EvalResult<Value> {
    match args {
        [value] => operation(value),
        _ => Err(argument_count(name, "1 argument", args.len())),
    }
}

// Keeps the first of several equally extreme values
fn extremum(name: &str, args: &[Value], wanted: Ordering) -> EvalResult<Value> {
    if args.len() < 2 {
        return Err(argument_count(name, "at least 2 arguments", args.len()));
    }

    let mut best = &args[0];

    for candidate in &args[1..] {
        let ordering = candidate.compare(best).ok_or_else(|| RuntimeError::IncomparableTypes {
            operator: if wanted == Ordering::Less { "<" } else { ">" },
            left: candidate.type_name(),
            right: best.type_name(),
        })?;

        if ordering == wanted {
            best = candidate;
        }
    }

    Ok(best.clone())
}

fn read_input<W: Write, R: BufRead>(prompt: Option<&Value>, output: &mut W, input: &mut R) -> EvalResult<Value> {
    if let Some(prompt) = prompt {
        write!(output, "{}", prompt)?;
    }

    output.flush()?;

    let mut line = String::new();

    if input.read_line(&mut line)? == 0 {
        return Ok(Value::Str(String::new()));
    }

    if line.ends_with('\n') {
        line.pop();

        if line.ends_with('\r') {
            line.pop();
        }
    }

    Ok(Value::parse_input(&line))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: Vec<Value>) -> EvalResult<Value> {
        let builtin = Builtin::from_name(name).expect("unknown built-in");
        call_builtin(builtin, name, args, &mut Vec::<u8>::new(), &mut &b""[..])
    }

    #[test]
    fn test_aliases() {
        assert_eq!(Builtin::from_name("sub"), Some(Builtin::Subtract));
        assert_eq!(Builtin::from_name("subtract"), Some(Builtin::Subtract));
        assert_eq!(Builtin::from_name("pow"), Some(Builtin::Power));
        assert_eq!(Builtin::from_name("print"), None);
    }

    #[test]
    fn test_math() {
        assert_eq!(call("add", vec![Value::Int(2), Value::Int(3)]).ok(), Some(Value::Int(5)));
        assert_eq!(call("mul", vec![Value::Int(4), Value::Float(0.5)]).ok(), Some(Value::Float(2.0)));
        assert_eq!(call("div", vec![Value::Int(9), Value::Int(3)]).ok(), Some(Value::Float(3.0)));
        assert_eq!(call("power", vec![Value::Int(3), Value::Int(3)]).ok(), Some(Value::Int(27)));
        assert_eq!(call("sqrt", vec![Value::Int(16)]).ok(), Some(Value::Float(4.0)));
        assert_eq!(call("abs", vec![Value::Int(-16)]).ok(), Some(Value::Int(16)));
    }

    #[test]
    fn test_min_max() {
        assert_eq!(call("min", vec![Value::Int(3), Value::Float(1.5), Value::Int(2)]).ok(), Some(Value::Float(1.5)));
        assert_eq!(call("max", vec![Value::Int(3), Value::Float(1.5), Value::Int(7)]).ok(), Some(Value::Int(7)));
        assert_eq!(call("max", vec![Value::Int(1), Value::Float(1.0)]).ok(), Some(Value::Int(1)));
        assert!(matches!(call("min", vec![Value::Int(1), Value::Str(String::from("a"))]),
            Err(RuntimeError::IncomparableTypes { .. })));
    }

    #[test]
    fn test_argument_counts() {
        let err = call("add", vec![Value::Int(1)]).expect_err("add takes two arguments");
        assert_eq!(err.to_string(), "add() expects 2 arguments, got 1");

        let err = call("sqrt", vec![]).expect_err("sqrt takes one argument");
        assert_eq!(err.to_string(), "sqrt() expects 1 argument, got 0");

        let err = call("max", vec![Value::Int(1)]).expect_err("max takes at least two arguments");
        assert_eq!(err.to_string(), "max() expects at least 2 arguments, got 1");

        let err = call("input", vec![Value::Int(1), Value::Int(2)]).expect_err("input takes at most one argument");
        assert_eq!(err.to_string(), "input() expects 0 or 1 argument, got 2");
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(call("divide", vec![Value::Int(1), Value::Int(0)]).map_err(|err| err.to_string()),
                   Err(String::from("Division by zero")));
    }

    #[test]
    fn test_input() {
        let mut output = Vec::<u8>::new();
        let mut input = &b"42\n2.5\r\nhello world\n"[..];

        let prompt = Value::Str(String::from("Number? "));
        assert_eq!(call_builtin(Builtin::Input, "input", vec![prompt], &mut output, &mut input).ok(), Some(Value::Int(42)));
        assert_eq!(call_builtin(Builtin::Input, "input", vec![], &mut output, &mut input).ok(), Some(Value::Float(2.5)));
        assert_eq!(call_builtin(Builtin::Input, "input", vec![], &mut output, &mut input).ok(),
                   Some(Value::Str(String::from("hello world"))));
        assert_eq!(call_builtin(Builtin::Input, "input", vec![], &mut output, &mut input).ok(), Some(Value::Str(String::new())));

        assert_eq!(String::from_utf8_lossy(&output), "Number? ");
    }
}
