// ABOUTME: Library module exposing internal components for testing and for the REPL host

pub mod builtins;
pub mod config;
pub mod env;
pub mod error;
pub mod eval;
pub mod printer;
pub mod reader;
pub mod sandbox;
pub mod value;

use env::Environment;
use error::EvalError;
use std::rc::Rc;

/// Lisp source evaluated into the root environment before anything else,
/// for the handful of forms that are easier to express in the language
/// itself than as Rust builtins.
const BOOTSTRAP: &[&str] = &[
    "(def! not (fn* (a) (if a false true)))",
    "(def! load-file (fn* (f) (eval (read-string (str \"(do \" (slurp f) \"\\nnil)\")))))",
    "(defmacro! cond (fn* (& xs) (if (> (count xs) 0) (list 'if (first xs) (if (> (count xs) 1) (nth xs 1) (throw \"odd number of forms to cond\")) (cons 'cond (rest (rest xs)))))))",
];

/// Builds a fresh root environment with every builtin and bootstrap form
/// installed. Does not touch the sandbox — callers that need `slurp` must
/// call `builtins::set_sandbox` separately.
pub fn root_environment() -> Rc<Environment> {
    let env = Environment::new(None);
    builtins::register_all(&env);
    for form in BOOTSTRAP {
        rep(form, &env).expect("bootstrap form must evaluate cleanly");
    }
    env
}

/// Read-eval-print-string: reads one form from `input`, evaluates it in
/// `env`, and returns its printed representation. Mirrors the reference
/// host's `rep(str)` but returns the string instead of printing it,
/// leaving I/O to the caller.
pub fn rep(input: &str, env: &Rc<Environment>) -> Result<String, String> {
    match reader::read_str(input) {
        Ok(Some(form)) => match eval::eval(form, env.clone()) {
            Ok(v) => Ok(printer::pr_str(&v, true)),
            Err(e) => Err(format_eval_error(&e)),
        },
        Ok(None) => Ok(String::new()),
        Err(e) => Err(e.to_string()),
    }
}

fn format_eval_error(e: &EvalError) -> String {
    match e {
        EvalError::Thrown(v) => printer::pr_str(v, true),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_installs_not() {
        let env = root_environment();
        assert_eq!(rep("(not false)", &env).unwrap(), "true");
        assert_eq!(rep("(not 1)", &env).unwrap(), "false");
    }

    #[test]
    fn test_bootstrap_installs_cond() {
        let env = root_environment();
        assert_eq!(rep("(cond false 1 true 2)", &env).unwrap(), "2");
        assert_eq!(rep("(cond false 1 false 2)", &env).unwrap(), "nil");
    }

    #[test]
    fn test_cond_with_trailing_clause_throws_odd_forms_error() {
        let env = root_environment();
        let err = rep("(cond true)", &env).unwrap_err();
        assert_eq!(err, "\"odd number of forms to cond\"");
        assert_eq!(rep("(try* (cond true) (catch* e e))", &env).unwrap(), "\"odd number of forms to cond\"");
    }

    #[test]
    fn test_rep_round_trip() {
        let env = root_environment();
        assert_eq!(rep("(+ 1 2)", &env).unwrap(), "3");
        assert_eq!(rep("(def! x 10)", &env).unwrap(), "10");
        assert_eq!(rep("x", &env).unwrap(), "10");
    }

    #[test]
    fn test_rep_reports_thrown_value_readably() {
        let env = root_environment();
        let err = rep("(throw \"boom\")", &env).unwrap_err();
        assert_eq!(err, "\"boom\"");
    }
}
