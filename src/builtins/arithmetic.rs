//! Arithmetic operations: +, -, *, /
//!
//! Each takes exactly two Numbers and returns a Number. `/` truncates
//! toward zero (Rust's native integer division); dividing by zero and
//! overflow on `+`/`-`/`*` are runtime errors rather than host panics.

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;
use std::rc::Rc;

fn two_numbers(name: &str, args: &[Value]) -> Result<(i64, i64), EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error(name, "2", args.len()));
    }
    let a = match &args[0] {
        Value::Number(n) => *n,
        other => return Err(EvalError::type_error(name, "number", other, 1)),
    };
    let b = match &args[1] {
        Value::Number(n) => *n,
        other => return Err(EvalError::type_error(name, "number", other, 2)),
    };
    Ok((a, b))
}

pub fn builtin_add(args: &[Value]) -> Result<Value, EvalError> {
    let (a, b) = two_numbers("+", args)?;
    a.checked_add(b)
        .map(Value::Number)
        .ok_or_else(|| EvalError::runtime_error("+", "integer overflow"))
}

pub fn builtin_sub(args: &[Value]) -> Result<Value, EvalError> {
    let (a, b) = two_numbers("-", args)?;
    a.checked_sub(b)
        .map(Value::Number)
        .ok_or_else(|| EvalError::runtime_error("-", "integer overflow"))
}

pub fn builtin_mul(args: &[Value]) -> Result<Value, EvalError> {
    let (a, b) = two_numbers("*", args)?;
    a.checked_mul(b)
        .map(Value::Number)
        .ok_or_else(|| EvalError::runtime_error("*", "integer overflow"))
}

pub fn builtin_div(args: &[Value]) -> Result<Value, EvalError> {
    let (a, b) = two_numbers("/", args)?;
    if b == 0 {
        return Err(EvalError::runtime_error("/", "division by zero"));
    }
    Ok(Value::Number(a / b))
}

pub fn register(env: &Rc<Environment>) {
    env.set("+".to_string(), Value::BuiltIn("+", builtin_add));
    env.set("-".to_string(), Value::BuiltIn("-", builtin_sub));
    env.set("*".to_string(), Value::BuiltIn("*", builtin_mul));
    env.set("/".to_string(), Value::BuiltIn("/", builtin_div));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add() {
        assert!(matches!(builtin_add(&[Value::Number(2), Value::Number(3)]), Ok(Value::Number(5))));
    }

    #[test]
    fn test_sub() {
        assert!(matches!(builtin_sub(&[Value::Number(5), Value::Number(3)]), Ok(Value::Number(2))));
    }

    #[test]
    fn test_mul() {
        assert!(matches!(builtin_mul(&[Value::Number(4), Value::Number(3)]), Ok(Value::Number(12))));
    }

    #[test]
    fn test_div_truncates_toward_zero() {
        assert!(matches!(builtin_div(&[Value::Number(-7), Value::Number(2)]), Ok(Value::Number(-3))));
    }

    #[test]
    fn test_div_by_zero_is_runtime_error() {
        assert!(matches!(
            builtin_div(&[Value::Number(1), Value::Number(0)]),
            Err(EvalError::RuntimeError { .. })
        ));
    }

    #[test]
    fn test_add_overflow_is_runtime_error() {
        assert!(matches!(
            builtin_add(&[Value::Number(i64::MAX), Value::Number(1)]),
            Err(EvalError::RuntimeError { .. })
        ));
    }

    #[test]
    fn test_sub_overflow_is_runtime_error() {
        assert!(matches!(
            builtin_sub(&[Value::Number(i64::MIN), Value::Number(1)]),
            Err(EvalError::RuntimeError { .. })
        ));
    }

    #[test]
    fn test_mul_overflow_is_runtime_error() {
        assert!(matches!(
            builtin_mul(&[Value::Number(i64::MAX), Value::Number(2)]),
            Err(EvalError::RuntimeError { .. })
        ));
    }

    #[test]
    fn test_arity_error() {
        assert!(matches!(builtin_add(&[Value::Number(1)]), Err(EvalError::ArityError { .. })));
    }

    #[test]
    fn test_type_error() {
        assert!(matches!(
            builtin_add(&[Value::Number(1), Value::String("x".to_string())]),
            Err(EvalError::TypeMismatch { .. })
        ));
    }
}
