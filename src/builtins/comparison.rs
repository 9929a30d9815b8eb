//! Comparison operations: <, <=, >, >=, =
//!
//! The ordering operators take exactly two Numbers and return a Bool.
//! `=` is structural equality over any two Values, including the
//! List/Vector cross-equality rule from the value model.

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

pub fn builtin_lt(args: &[Value]) -> Result<Value, EvalError> {
    let (a, b) = two_numbers("<", args)?;
    Ok(Value::Bool(a < b))
}

pub fn builtin_le(args: &[Value]) -> Result<Value, EvalError> {
    let (a, b) = two_numbers("<=", args)?;
    Ok(Value::Bool(a <= b))
}

pub fn builtin_gt(args: &[Value]) -> Result<Value, EvalError> {
    let (a, b) = two_numbers(">", args)?;
    Ok(Value::Bool(a > b))
}

pub fn builtin_ge(args: &[Value]) -> Result<Value, EvalError> {
    let (a, b) = two_numbers(">=", args)?;
    Ok(Value::Bool(a >= b))
}

pub fn builtin_eq(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("=", "2", args.len()));
    }
    Ok(Value::Bool(Value::values_equal(&args[0], &args[1])))
}

pub fn register(env: &Rc<Environment>) {
    env.set("<".to_string(), Value::BuiltIn("<", builtin_lt));
    env.set("<=".to_string(), Value::BuiltIn("<=", builtin_le));
    env.set(">".to_string(), Value::BuiltIn(">", builtin_gt));
    env.set(">=".to_string(), Value::BuiltIn(">=", builtin_ge));
    env.set("=".to_string(), Value::BuiltIn("=", builtin_eq));
}
