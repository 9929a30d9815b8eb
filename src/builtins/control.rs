//! Control operations: throw, eval
//!
//! `eval` always runs in the root environment, not the caller's lexical
//! environment — matching the reference MAL host's `eval = lambda ast:
//! EVAL(ast, repl_env)` rather than a closure-capturing `eval`.

use super::root_env;
use crate::env::Environment;
use crate::error::EvalError;
use crate::eval::eval;
use crate::value::Value;
use std::rc::Rc;

pub fn builtin_throw(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("throw", "1", args.len()));
    }
    Err(EvalError::thrown(args[0].clone()))
}

pub fn builtin_eval(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("eval", "1", args.len()));
    }
    let root = root_env().ok_or_else(|| EvalError::runtime_error("eval", "root environment not initialized"))?;
    eval(args[0].clone(), root)
}

pub fn register(env: &Rc<Environment>) {
    env.set("throw".to_string(), Value::BuiltIn("throw", builtin_throw));
    env.set("eval".to_string(), Value::BuiltIn("eval", builtin_eval));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throw_produces_thrown_error() {
        match builtin_throw(&[Value::String("boom".to_string())]) {
            Err(EvalError::Thrown(v)) => assert!(matches!(*v, Value::String(s) if s == "boom")),
            other => panic!("expected Thrown, got {:?}", other),
        }
    }

    #[test]
    fn test_eval_without_root_env_errors() {
        assert!(builtin_eval(&[Value::Number(1)]).is_err());
    }

    #[test]
    fn test_eval_uses_root_env_not_caller_env() {
        let root = Environment::new(None);
        root.set("x".to_string(), Value::Number(42));
        super::super::register_all(&root);

        // the caller shadows `x`, but eval must ignore that and resolve
        // against the root environment recorded at register_all time.
        let caller = Environment::new(Some(root));
        caller.set("x".to_string(), Value::Number(0));
        let _ = caller;

        let direct = builtin_eval(&[Value::Symbol("x".to_string())]);
        assert!(matches!(direct, Ok(Value::Number(42))));
    }
}
