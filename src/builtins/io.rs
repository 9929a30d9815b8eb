//! I/O operations: read-string, slurp

use super::with_sandbox;
use crate::env::Environment;
use crate::error::EvalError;
use crate::reader;
use crate::value::Value;
use std::rc::Rc;

pub fn builtin_read_string(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("read-string", "1", args.len()));
    }
    let text = match &args[0] {
        Value::String(s) => s,
        other => return Err(EvalError::type_error("read-string", "string", other, 1)),
    };
    match reader::read_str(text) {
        Ok(Some(v)) => Ok(v),
        Ok(None) => Ok(Value::Nil),
        Err(e) => Err(EvalError::runtime_error("read-string", e.to_string())),
    }
}

pub fn builtin_slurp(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("slurp", "1", args.len()));
    }
    let path = match &args[0] {
        Value::String(s) => s,
        other => return Err(EvalError::type_error("slurp", "string", other, 1)),
    };
    with_sandbox(|sandbox| {
        sandbox
            .slurp(path)
            .map(Value::String)
            .map_err(|e| EvalError::runtime_error("slurp", e.to_string()))
    })
}

pub fn register(env: &Rc<Environment>) {
    env.set("read-string".to_string(), Value::BuiltIn("read-string", builtin_read_string));
    env.set("slurp".to_string(), Value::BuiltIn("slurp", builtin_slurp));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_string_round_trip() {
        let result = builtin_read_string(&[Value::String("(1 2 3)".to_string())]).unwrap();
        assert!(matches!(result, Value::List(v) if v.len() == 3));
    }

    #[test]
    fn test_read_string_escapes() {
        let result = builtin_read_string(&[Value::String("\"a\\nb\"".to_string())]).unwrap();
        assert!(matches!(result, Value::String(s) if s == "a\nb"));
    }

    #[test]
    fn test_slurp_without_sandbox_errors() {
        assert!(builtin_slurp(&[Value::String("whatever.txt".to_string())]).is_err());
    }
}
