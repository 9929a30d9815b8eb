//! Printing operations: pr-str, str, prn, println
//!
//! `pr-str`/`prn` render readably (strings escaped and quoted); `str`/
//! `println` render for display (string contents raw). `pr-str`/`str` are
//! pure string constructors; `prn`/`println` additionally write to stdout
//! and return Nil.

use crate::env::Environment;
use crate::error::EvalError;
use crate::printer::pr_str;
use crate::value::Value;
use std::rc::Rc;

fn joined(args: &[Value], readable: bool, sep: &str) -> String {
    args.iter()
        .map(|v| pr_str(v, readable))
        .collect::<Vec<_>>()
        .join(sep)
}

pub fn builtin_pr_str(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::String(joined(args, true, " ")))
}

pub fn builtin_str(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::String(joined(args, false, "")))
}

pub fn builtin_prn(args: &[Value]) -> Result<Value, EvalError> {
    println!("{}", joined(args, true, " "));
    Ok(Value::Nil)
}

pub fn builtin_println(args: &[Value]) -> Result<Value, EvalError> {
    println!("{}", joined(args, false, " "));
    Ok(Value::Nil)
}

pub fn register(env: &Rc<Environment>) {
    env.set("pr-str".to_string(), Value::BuiltIn("pr-str", builtin_pr_str));
    env.set("str".to_string(), Value::BuiltIn("str", builtin_str));
    env.set("prn".to_string(), Value::BuiltIn("prn", builtin_prn));
    env.set("println".to_string(), Value::BuiltIn("println", builtin_println));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pr_str_escapes_and_separates_with_space() {
        let args = vec![Value::String("a\nb".to_string()), Value::Number(1)];
        assert!(matches!(
            builtin_pr_str(&args),
            Ok(Value::String(s)) if s == "\"a\\nb\" 1"
        ));
    }

    #[test]
    fn test_str_is_raw_and_unseparated() {
        let args = vec![Value::String("a".to_string()), Value::String("b".to_string())];
        assert!(matches!(builtin_str(&args), Ok(Value::String(s)) if s == "ab"));
    }

    #[test]
    fn test_prn_returns_nil() {
        assert!(matches!(builtin_prn(&[Value::Number(1)]), Ok(Value::Nil)));
    }
}
