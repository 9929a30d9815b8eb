//! Built-in functions seeded into the root environment.
//!
//! Grouped the way the interpreter's special forms are grouped: arithmetic,
//! comparison, sequence manipulation, printing, I/O, atoms, and a small
//! control category (`throw`, `eval`). Each sub-module exposes a plain
//! `register(env: &Rc<Environment>)` function; `register_all` calls each in
//! turn to seed a fresh root environment.

use crate::env::Environment;
use crate::sandbox::Sandbox;
use std::cell::RefCell;
use std::rc::Rc;

// ============================================================================
// Thread-local capability storage
// ============================================================================
//
// `Value::BuiltIn` is a bare `fn` pointer (see value.rs), so builtins that
// need access to ambient state they cannot receive as an argument — the
// sandboxed filesystem for `slurp`, the root environment for `eval` — reach
// it through a thread-local cell, set once by the host before any such
// builtin is called.

thread_local! {
    static SANDBOX: RefCell<Option<Sandbox>> = const { RefCell::new(None) };
    static ROOT_ENV: RefCell<Option<Rc<Environment>>> = const { RefCell::new(None) };
}

pub fn set_sandbox(sandbox: Sandbox) {
    SANDBOX.with(|s| *s.borrow_mut() = Some(sandbox));
}

pub(crate) fn with_sandbox<T>(f: impl FnOnce(&Sandbox) -> Result<T, crate::error::EvalError>) -> Result<T, crate::error::EvalError> {
    SANDBOX.with(|s| {
        let borrow = s.borrow();
        let sandbox = borrow
            .as_ref()
            .ok_or_else(|| crate::error::EvalError::runtime_error("slurp", crate::error::ERR_SANDBOX_NOT_INIT))?;
        f(sandbox)
    })
}

fn set_root_env(env: Rc<Environment>) {
    ROOT_ENV.with(|r| *r.borrow_mut() = Some(env));
}

pub(crate) fn root_env() -> Option<Rc<Environment>> {
    ROOT_ENV.with(|r| r.borrow().clone())
}

pub mod arithmetic;
pub mod atoms;
pub mod comparison;
pub mod control;
pub mod io;
pub mod print;
pub mod sequences;

/// Registers every builtin category into `env` and records it as the root
/// environment for the `eval` builtin.
pub fn register_all(env: &Rc<Environment>) {
    arithmetic::register(env);
    comparison::register(env);
    sequences::register(env);
    print::register(env);
    io::register(env);
    atoms::register(env);
    control::register(env);
    set_root_env(env.clone());
}
