use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use crate::interpreter::evaluator::{EvalResult, RuntimeError};

/// A runtime value. `Nothing` is what statements and value-less returns produce.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Nothing,
}

/// Numeric view of a value; booleans count as 0 and 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(value) => value as f64,
            Number::Float(value) => value,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(value) => value == 0,
            Number::Float(value) => value == 0.0,
        }
    }

    pub fn is_negative(self) -> bool {
        match self {
            Number::Int(value) => value < 0,
            Number::Float(value) => value < 0.0,
        }
    }

    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl From<Number> for Value {
    fn from(number: Number) -> Self {
        match number {
            Number::Int(value) => Value::Int(value),
            Number::Float(value) => Value::Float(value),
        }
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "str",
            Value::Nothing => "none",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(value) => *value != 0,
            Value::Float(value) => *value != 0.0,
            Value::Bool(value) => *value,
            Value::Str(value) => !value.is_empty(),
            Value::Nothing => false,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Int(value) => Some(Number::Int(*value)),
            Value::Float(value) => Some(Number::Float(*value)),
            Value::Bool(value) => Some(Number::Int(i64::from(*value))),
            Value::Str(_) | Value::Nothing => None,
        }
    }

    /// Equality across types: numbers compare by value, everything else only within its own type.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.compare(b) == Some(Ordering::Equal),
            _ => match (self, other) {
                (Value::Str(a), Value::Str(b)) => a == b,
                (Value::Nothing, Value::Nothing) => true,
                _ => false,
            },
        }
    }

    /// Ordering between numbers or between strings; `None` for any other pairing.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.compare(b),
            _ => match (self, other) {
                (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
                _ => None,
            },
        }
    }

    /// Parses a line of user input: integer first, then float, otherwise the raw text.
    pub fn parse_input(text: &str) -> Value {
        let trimmed = text.trim();

        if let Ok(value) = trimmed.parse::<i64>() {
            Value::Int(value)
        } else if let Ok(value) = trimmed.parse::<f64>() {
            Value::Float(value)
        } else {
            Value::Str(text.to_owned())
        }
    }
}

// Arithmetic

impl Value {
    pub fn add(&self, other: &Value) -> EvalResult<Value> {
        if let (Value::Str(a), Value::Str(b)) = (self, other) {
            return Ok(Value::Str(format!("{}{}", a, b)));
        }

        self.numeric(other, "+", i64::checked_add, |a, b| a + b)
    }

    pub fn subtract(&self, other: &Value) -> EvalResult<Value> {
        self.numeric(other, "-", i64::checked_sub, |a, b| a - b)
    }

    pub fn multiply(&self, other: &Value) -> EvalResult<Value> {
        self.numeric(other, "*", i64::checked_mul, |a, b| a * b)
    }

    /// True division: the result is always a float.
    pub fn divide(&self, other: &Value) -> EvalResult<Value> {
        let (a, b) = self.numbers(other, "/")?;

        if b.is_zero() {
            return Err(RuntimeError::DivisionByZero);
        }

        Ok(Value::Float(a.as_f64() / b.as_f64()))
    }

    /// Remainder with the sign of the divisor.
    pub fn modulo(&self, other: &Value) -> EvalResult<Value> {
        let (a, b) = self.numbers(other, "%")?;

        if b.is_zero() {
            return Err(RuntimeError::ModuloByZero);
        }

        match (a, b) {
            (Number::Int(a), Number::Int(b)) => {
                let remainder = a.checked_rem(b).ok_or(RuntimeError::IntegerOverflow)?;

                Ok(Value::Int(if remainder != 0 && (remainder < 0) != (b < 0) { remainder + b } else { remainder }))
            },
            (a, b) => {
                let (a, b) = (a.as_f64(), b.as_f64());
                let remainder = a % b;

                Ok(Value::Float(if remainder != 0.0 && (remainder < 0.0) != (b < 0.0) { remainder + b } else { remainder }))
            },
        }
    }

    pub fn power(&self, other: &Value) -> EvalResult<Value> {
        let (base, exponent) = self.numbers(other, "**")?;

        match (base, exponent) {
            (Number::Int(base), Number::Int(exponent)) if exponent >= 0 => u32::try_from(exponent).ok()
                .and_then(|exponent| base.checked_pow(exponent))
                .map(Value::Int)
                .ok_or(RuntimeError::IntegerOverflow),
            (base, exponent) if base.is_zero() && exponent.is_negative() => Err(RuntimeError::DivisionByZero),
            (base, exponent) => Ok(Value::Float(base.as_f64().powf(exponent.as_f64()))),
        }
    }

    pub fn absolute(&self) -> EvalResult<Value> {
        match self.as_number() {
            Some(Number::Int(value)) => value.checked_abs().map(Value::Int).ok_or(RuntimeError::IntegerOverflow),
            Some(Number::Float(value)) => Ok(Value::Float(value.abs())),
            None => Err(RuntimeError::UnsupportedOperand { operation: "abs()", operand: self.type_name() }),
        }
    }

    pub fn square_root(&self) -> EvalResult<Value> {
        match self.as_number() {
            Some(number) if number.is_negative() => Err(RuntimeError::NegativeSquareRoot),
            Some(number) => Ok(Value::Float(number.as_f64().sqrt())),
            None => Err(RuntimeError::UnsupportedOperand { operation: "sqrt()", operand: self.type_name() }),
        }
    }

    fn numeric(&self, other: &Value, operator: &'static str,
               int_operation: fn(i64, i64) -> Option<i64>, float_operation: fn(f64, f64) -> f64) -> EvalResult<Value> {
        match self.numbers(other, operator)? {
            (Number::Int(a), Number::Int(b)) => int_operation(a, b).map(Value::Int).ok_or(RuntimeError::IntegerOverflow),
            (a, b) => Ok(Value::Float(float_operation(a.as_f64(), b.as_f64()))),
        }
    }

    fn numbers(&self, other: &Value, operator: &'static str) -> EvalResult<(Number, Number)> {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(RuntimeError::UnsupportedOperands { operator, left: self.type_name(), right: other.type_name() }),
        }
    }
}

fn format_float(value: f64, f: &mut Formatter<'_>) -> std::fmt::Result {
    if value.is_nan() {
        f.write_str("nan")
    } else if value.is_infinite() {
        f.write_str(if value > 0.0 { "inf" } else { "-inf" })
    } else {
        // `{:e}` yields the shortest round-trip digits, e.g. `1.5e-5`
        let scientific = format!("{:e}", value);

        match scientific.split_once('e').map(|(mantissa, exponent)| (mantissa, exponent.parse::<i32>())) {
            Some((mantissa, Ok(exponent))) if !(-4..16).contains(&exponent) => {
                let sign = if exponent < 0 { '-' } else { '+' };
                write!(f, "{}e{}{:02}", mantissa, sign, exponent.abs())
            },
            // Whole floats keep a trailing `.0` so they stay distinguishable from ints
            _ if value.fract() == 0.0 => write!(f, "{:.1}", value),
            _ => write!(f, "{}", value),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{}", value),
            Value::Float(value) => format_float(*value, f),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Str(value) => f.write_str(value),
            Value::Nothing => f.write_str("None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Float(5.0).to_string(), "5.0");
        assert_eq!(Value::Float(-0.0).to_string(), "-0.0");
        assert_eq!(Value::Float(f64::INFINITY).to_string(), "inf");
        assert_eq!(Value::Float(0.0001).to_string(), "0.0001");
        assert_eq!(Value::Float(1e-5).to_string(), "1e-05");
        assert_eq!(Value::Float(-2.5e-7).to_string(), "-2.5e-07");
        assert_eq!(Value::Float(1e15).to_string(), "1000000000000000.0");
        assert_eq!(Value::Float(1e16).to_string(), "1e+16");
        assert_eq!(Value::Float(1e17).to_string(), "1e+17");
        assert_eq!(Value::Float(1.5e300).to_string(), "1.5e+300");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Str(String::from("hi there")).to_string(), "hi there");
        assert_eq!(Value::Nothing.to_string(), "None");
    }

    #[test]
    fn test_truthiness() {
        assert!(Value::Int(-1).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(Value::Str(String::from("0")).is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());
        assert!(!Value::Nothing.is_truthy());
    }

    #[test]
    fn test_comparisons() {
        assert!(Value::Int(1).loose_eq(&Value::Float(1.0)));
        assert!(Value::Bool(true).loose_eq(&Value::Int(1)));
        assert!(!Value::Int(1).loose_eq(&Value::Str(String::from("1"))));
        assert_eq!(Value::Str(String::from("a")).compare(&Value::Str(String::from("b"))), Some(Ordering::Less));
        assert_eq!(Value::Int(3).compare(&Value::Float(2.5)), Some(Ordering::Greater));
        assert_eq!(Value::Int(3).compare(&Value::Str(String::from("3"))), None);
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(Value::Int(2).add(&Value::Int(3)).ok(), Some(Value::Int(5)));
        assert_eq!(Value::Int(2).add(&Value::Float(0.5)).ok(), Some(Value::Float(2.5)));
        assert_eq!(Value::Bool(true).add(&Value::Int(1)).ok(), Some(Value::Int(2)));
        assert_eq!(Value::Str(String::from("ab")).add(&Value::Str(String::from("cd"))).ok(), Some(Value::Str(String::from("abcd"))));
        assert_eq!(Value::Int(10).divide(&Value::Int(4)).ok(), Some(Value::Float(2.5)));
        assert_eq!(Value::Int(20).divide(&Value::Int(4)).ok(), Some(Value::Float(5.0)));
        assert_eq!(Value::Int(2).power(&Value::Int(10)).ok(), Some(Value::Int(1024)));
        assert_eq!(Value::Int(2).power(&Value::Int(-1)).ok(), Some(Value::Float(0.5)));
    }

    #[test]
    fn test_modulo_takes_divisor_sign() {
        assert_eq!(Value::Int(17).modulo(&Value::Int(5)).ok(), Some(Value::Int(2)));
        assert_eq!(Value::Int(-7).modulo(&Value::Int(3)).ok(), Some(Value::Int(2)));
        assert_eq!(Value::Int(7).modulo(&Value::Int(-3)).ok(), Some(Value::Int(-2)));
        assert_eq!(Value::Float(-1.5).modulo(&Value::Int(1)).ok(), Some(Value::Float(0.5)));
    }

    #[test]
    fn test_arithmetic_errors() {
        assert!(matches!(Value::Int(5).divide(&Value::Int(0)), Err(RuntimeError::DivisionByZero)));
        assert!(matches!(Value::Int(5).divide(&Value::Float(0.0)), Err(RuntimeError::DivisionByZero)));
        assert!(matches!(Value::Int(5).modulo(&Value::Int(0)), Err(RuntimeError::ModuloByZero)));
        assert!(matches!(Value::Int(i64::MAX).add(&Value::Int(1)), Err(RuntimeError::IntegerOverflow)));
        assert!(matches!(Value::Int(-4).square_root(), Err(RuntimeError::NegativeSquareRoot)));
        assert!(matches!(Value::Str(String::from("a")).subtract(&Value::Int(1)),
            Err(RuntimeError::UnsupportedOperands { operator: "-", left: "str", right: "int" })));
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(Value::parse_input("42"), Value::Int(42));
        assert_eq!(Value::parse_input(" -7 "), Value::Int(-7));
        assert_eq!(Value::parse_input("2.5"), Value::Float(2.5));
        assert_eq!(Value::parse_input("chicken"), Value::Str(String::from("chicken")));
        assert_eq!(Value::parse_input(""), Value::Str(String::new()));
    }
}
