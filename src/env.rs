// ABOUTME: Environment module for managing variable bindings and lexical scope chains

use crate::error::EvalError;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new environment frame with an optional outer (parent) frame.
    pub fn new(outer: Option<Rc<Environment>>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            outer,
        })
    }

    /// Creates a child frame, binding `params` positionally against `exprs`.
    /// A literal `"&"` entry in `params` marks the following name as a
    /// variadic rest-parameter bound to a `List` of whatever remains in
    /// `exprs` (possibly empty).
    pub fn bind(outer: Rc<Environment>, params: &[String], exprs: &[Value]) -> Result<Rc<Self>, EvalError> {
        let env = Environment::new(Some(outer));
        let mut i = 0;
        while i < params.len() {
            if params[i] == "&" {
                let rest_name = params.get(i + 1).ok_or_else(|| {
                    EvalError::runtime_error("fn*", "'&' must be followed by a rest parameter name")
                })?;
                let rest: Vec<Value> = exprs.get(i..).unwrap_or(&[]).to_vec();
                env.set(rest_name.clone(), Value::List(rest));
                return Ok(env);
            }
            let value = exprs.get(i).cloned().ok_or_else(|| {
                EvalError::arity_error("fn*", format!("at least {}", i + 1), exprs.len())
            })?;
            env.set(params[i].clone(), value);
            i += 1;
        }
        if exprs.len() > params.len() {
            return Err(EvalError::arity_error("fn*", params.len().to_string(), exprs.len()));
        }
        Ok(env)
    }

    /// Binds `name` to `value` in this frame only (never walks the chain).
    pub fn set(&self, name: String, value: Value) {
        self.bindings.borrow_mut().insert(name, value);
    }

    /// Returns the nearest frame (this one, or an outer one) that defines
    /// `name`, without reading its value.
    pub fn find(self: &Rc<Self>, name: &str) -> Option<Rc<Environment>> {
        if self.bindings.borrow().contains_key(name) {
            return Some(self.clone());
        }
        match &self.outer {
            Some(outer) => outer.find(name),
            None => None,
        }
    }

    /// Looks up `name`, walking outward through enclosing frames.
    /// Errors with `EvalError::NotFound` if no frame defines it.
    pub fn get(self: &Rc<Self>, name: &str) -> Result<Value, EvalError> {
        match self.find(name) {
            Some(frame) => Ok(frame.bindings.borrow().get(name).cloned().unwrap()),
            None => Err(EvalError::NotFound(name.to_string())),
        }
    }
}
