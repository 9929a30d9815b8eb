//! Atom operations: atom, atom?, deref, reset!, swap!

use crate::env::Environment;
use crate::error::EvalError;
use crate::eval::eval;
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

pub fn builtin_atom(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("atom", "1", args.len()));
    }
    Ok(Value::Atom(Rc::new(RefCell::new(args[0].clone()))))
}

pub fn builtin_atom_p(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("atom?", "1", args.len()));
    }
    Ok(Value::Bool(matches!(args[0], Value::Atom(_))))
}

pub fn builtin_deref(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("deref", "1", args.len()));
    }
    match &args[0] {
        Value::Atom(cell) => Ok(cell.borrow().clone()),
        other => Err(EvalError::type_error("deref", "atom", other, 1)),
    }
}

pub fn builtin_reset(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("reset!", "2", args.len()));
    }
    match &args[0] {
        Value::Atom(cell) => {
            *cell.borrow_mut() = args[1].clone();
            Ok(args[1].clone())
        }
        other => Err(EvalError::type_error("reset!", "atom", other, 1)),
    }
}

pub fn builtin_swap(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() < 2 {
        return Err(EvalError::arity_error("swap!", "at least 2", args.len()));
    }
    let cell = match &args[0] {
        Value::Atom(cell) => cell.clone(),
        other => return Err(EvalError::type_error("swap!", "atom", other, 1)),
    };
    let current = cell.borrow().clone();
    let mut call_args = Vec::with_capacity(args.len() - 1);
    call_args.push(current);
    call_args.extend_from_slice(&args[2..]);

    let new_value = match &args[1] {
        Value::BuiltIn(_, f) => f(&call_args)?,
        Value::Closure(c) => {
            let bound = Environment::bind(c.env.clone(), &c.params, &call_args)?;
            eval((*c.body).clone(), bound)?
        }
        other => return Err(EvalError::type_error("swap!", "function", other, 2)),
    };
    *cell.borrow_mut() = new_value.clone();
    Ok(new_value)
}

pub fn register(env: &Rc<Environment>) {
    env.set("atom".to_string(), Value::BuiltIn("atom", builtin_atom));
    env.set("atom?".to_string(), Value::BuiltIn("atom?", builtin_atom_p));
    env.set("deref".to_string(), Value::BuiltIn("deref", builtin_deref));
    env.set("reset!".to_string(), Value::BuiltIn("reset!", builtin_reset));
    env.set("swap!".to_string(), Value::BuiltIn("swap!", builtin_swap));
}
