// ABOUTME: The evaluator — dispatches special forms and applies functions with an explicit TCO loop

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{Closure, Value};
use std::rc::Rc;

/// Evaluates `ast` in `env`.
///
/// Tail positions (`let*`/`do`/`if` bodies, and closure application) rewrite
/// the loop's own `ast`/`env` locals and `continue` instead of recursing, so
/// deep tail recursion in user code does not grow the Rust call stack.
pub fn eval(mut ast: Value, mut env: Rc<Environment>) -> Result<Value, EvalError> {
    loop {
        match ast {
            Value::Symbol(ref name) => return env.get(name),
            Value::Vector(ref items) => {
                let evaluated = items
                    .iter()
                    .map(|v| eval(v.clone(), env.clone()))
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(Value::Vector(evaluated));
            }
            Value::HashMap(ref items) => {
                let mut out = Vec::with_capacity(items.len());
                for chunk in items.chunks(2) {
                    out.push(chunk[0].clone());
                    if let Some(v) = chunk.get(1) {
                        out.push(eval(v.clone(), env.clone())?);
                    }
                }
                return Ok(Value::HashMap(out));
            }
            Value::List(ref items) if items.is_empty() => return Ok(ast.clone()),
            Value::List(ref items) => {
                if let Value::Symbol(head) = &items[0] {
                    match head.as_str() {
                        "def!" => return eval_def(&items[1..], &env),
                        "let*" => {
                            let (new_env, body) = eval_let_bindings(&items[1..], &env)?;
                            env = new_env;
                            ast = body;
                            continue;
                        }
                        "do" => {
                            ast = eval_do(&items[1..], &env)?;
                            continue;
                        }
                        "if" => {
                            ast = eval_if(&items[1..], &env)?;
                            continue;
                        }
                        "fn*" => return eval_fn(&items[1..], &env),
                        "quote" => return Ok(items.get(1).cloned().unwrap_or(Value::Nil)),
                        "quasiquote" => {
                            ast = quasiquote(items.get(1).unwrap_or(&Value::Nil));
                            continue;
                        }
                        "quasiquoteexpand" => {
                            return Ok(quasiquote(items.get(1).unwrap_or(&Value::Nil)));
                        }
                        "defmacro!" => return eval_defmacro(&items[1..], &env),
                        "macroexpand" => {
                            return macroexpand(items.get(1).cloned().unwrap_or(Value::Nil), &env);
                        }
                        "try*" => return eval_try(&items[1..], &env),
                        _ => {}
                    }

                    if let Ok(Value::Closure(c)) = env.get(head) {
                        if c.is_macro {
                            ast = apply_macro(&c, &items[1..])?;
                            continue;
                        }
                    }
                }

                let func = eval(items[0].clone(), env.clone())?;
                let mut args = Vec::with_capacity(items.len() - 1);
                for a in &items[1..] {
                    args.push(eval(a.clone(), env.clone())?);
                }
                match func {
                    Value::BuiltIn(_, f) => return f(&args),
                    Value::Closure(c) => {
                        let new_env = Environment::bind(c.env.clone(), &c.params, &args)?;
                        env = new_env;
                        ast = (*c.body).clone();
                        continue;
                    }
                    _ => return Err(EvalError::NotCallable),
                }
            }
            other => return Ok(other),
        }
    }
}

fn eval_def(items: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    let name = expect_symbol("def!", items.first())?;
    let value_expr = items
        .get(1)
        .ok_or_else(|| EvalError::arity_error("def!", "2", items.len()))?;
    let value = eval(value_expr.clone(), env.clone())?;
    env.set(name, value.clone());
    Ok(value)
}

fn eval_let_bindings(items: &[Value], env: &Rc<Environment>) -> Result<(Rc<Environment>, Value), EvalError> {
    let bindings = match items.first() {
        Some(Value::List(b)) | Some(Value::Vector(b)) => b,
        _ => return Err(EvalError::runtime_error("let*", "first argument must be a list of bindings")),
    };
    let body = items
        .get(1)
        .cloned()
        .ok_or_else(|| EvalError::arity_error("let*", "2", items.len()))?;

    let let_env = Environment::new(Some(env.clone()));
    let mut i = 0;
    while i + 1 < bindings.len() {
        let name = expect_symbol("let*", Some(&bindings[i]))?;
        let value = eval(bindings[i + 1].clone(), let_env.clone())?;
        let_env.set(name, value);
        i += 2;
    }
    Ok((let_env, body))
}

fn eval_do(items: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    if items.is_empty() {
        return Ok(Value::Nil);
    }
    for expr in &items[..items.len() - 1] {
        eval(expr.clone(), env.clone())?;
    }
    Ok(items[items.len() - 1].clone())
}

fn eval_if(items: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    let cond_expr = items
        .first()
        .ok_or_else(|| EvalError::arity_error("if", "2-3", items.len()))?;
    let cond = eval(cond_expr.clone(), env.clone())?;
    if cond.is_truthy() {
        items
            .get(1)
            .cloned()
            .ok_or_else(|| EvalError::arity_error("if", "2-3", items.len()))
    } else {
        Ok(items.get(2).cloned().unwrap_or(Value::Nil))
    }
}

fn eval_fn(items: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    let params = match items.first() {
        Some(Value::List(p)) | Some(Value::Vector(p)) => p
            .iter()
            .map(|v| expect_symbol("fn*", Some(v)))
            .collect::<Result<Vec<_>, _>>()?,
        _ => return Err(EvalError::runtime_error("fn*", "first argument must be a parameter list")),
    };
    let body = items.get(1).cloned().unwrap_or(Value::Nil);
    Ok(Value::Closure(Rc::new(Closure {
        params,
        body: Box::new(body),
        env: env.clone(),
        is_macro: false,
    })))
}

fn eval_defmacro(items: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    let name = expect_symbol("defmacro!", items.first())?;
    let fn_expr = items
        .get(1)
        .ok_or_else(|| EvalError::arity_error("defmacro!", "2", items.len()))?;
    let value = eval(fn_expr.clone(), env.clone())?;
    let closure = match value {
        Value::Closure(c) => c,
        other => return Err(EvalError::type_error("defmacro!", "function", &other, 2)),
    };
    let macro_value = Value::Closure(Rc::new(Closure {
        params: closure.params.clone(),
        body: closure.body.clone(),
        env: closure.env.clone(),
        is_macro: true,
    }));
    env.set(name, macro_value.clone());
    Ok(macro_value)
}

fn eval_try(items: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    let body = items
        .first()
        .cloned()
        .ok_or_else(|| EvalError::arity_error("try*", "1-2", items.len()))?;
    match eval(body, env.clone()) {
        Ok(v) => Ok(v),
        Err(e) => {
            let catch_form = match items.get(1) {
                Some(Value::List(c)) if matches!(c.first(), Some(Value::Symbol(s)) if s == "catch*") => c,
                _ => return Err(e),
            };
            let sym = expect_symbol("catch*", catch_form.get(1))?;
            let handler = catch_form.get(2).cloned().unwrap_or(Value::Nil);
            let caught = match e {
                EvalError::Thrown(v) => *v,
                other => Value::String(other.to_string()),
            };
            let catch_env = Environment::new(Some(env.clone()));
            catch_env.set(sym, caught);
            eval(handler, catch_env)
        }
    }
}

fn expect_symbol(function: &str, v: Option<&Value>) -> Result<String, EvalError> {
    match v {
        Some(Value::Symbol(s)) => Ok(s.clone()),
        Some(other) => Err(EvalError::type_error(function, "symbol", other, 1)),
        None => Err(EvalError::arity_error(function, "at least 1", 0)),
    }
}

/// Expands a macro call: binds the (unevaluated) arguments against the
/// macro's parameters and evaluates its body.
fn apply_macro(closure: &Rc<Closure>, args: &[Value]) -> Result<Value, EvalError> {
    let bound = Environment::bind(closure.env.clone(), &closure.params, args)?;
    eval((*closure.body).clone(), bound)
}

/// Repeatedly expands `ast` while its head resolves to a macro, without
/// evaluating arguments. Used by both the evaluator's own dispatch and the
/// `macroexpand` special form.
pub fn macroexpand(mut ast: Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    loop {
        let expand = match &ast {
            Value::List(items) if !items.is_empty() => match &items[0] {
                Value::Symbol(name) => match env.get(name) {
                    Ok(Value::Closure(c)) if c.is_macro => Some((c, items[1..].to_vec())),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        };
        match expand {
            Some((c, args)) => ast = apply_macro(&c, &args)?,
            None => return Ok(ast),
        }
    }
}

fn sym(name: &str) -> Value {
    Value::Symbol(name.to_string())
}

fn is_sym(v: &Value, name: &str) -> bool {
    matches!(v, Value::Symbol(s) if s == name)
}

/// The quasiquote data-construction algorithm: rewrites `x` into an
/// expression of `cons`/`concat`/`vec` calls that, when evaluated, rebuild
/// `x` with any `unquote`/`splice-unquote` forms spliced in.
pub fn quasiquote(x: &Value) -> Value {
    match x {
        Value::List(items) if items.len() == 2 && is_sym(&items[0], "unquote") => items[1].clone(),
        Value::List(items) => qq_list(items),
        Value::Vector(items) => Value::List(vec![sym("vec"), qq_list(items)]),
        Value::Symbol(_) | Value::HashMap(_) => Value::List(vec![sym("quote"), x.clone()]),
        _ => x.clone(),
    }
}

fn qq_list(items: &[Value]) -> Value {
    let mut acc = Value::List(vec![]);
    for elt in items.iter().rev() {
        acc = match elt {
            Value::List(inner) if inner.len() == 2 && is_sym(&inner[0], "splice-unquote") => {
                Value::List(vec![sym("concat"), inner[1].clone(), acc])
            }
            _ => Value::List(vec![sym("cons"), quasiquote(elt), acc]),
        };
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins;
    use crate::reader::read_str;

    fn run(src: &str) -> Value {
        let env = Environment::new(None);
        builtins::register_all(&env);
        eval(read_str(src).unwrap().unwrap(), env).unwrap()
    }

    fn run_err(src: &str) -> EvalError {
        let env = Environment::new(None);
        builtins::register_all(&env);
        eval(read_str(src).unwrap().unwrap(), env).unwrap_err()
    }

    #[test]
    fn test_self_evaluating() {
        assert!(matches!(run("42"), Value::Number(42)));
        assert!(matches!(run("\"hi\""), Value::String(s) if s == "hi"));
        assert!(matches!(run("nil"), Value::Nil));
    }

    #[test]
    fn test_def_and_symbol_lookup() {
        assert!(matches!(run("(do (def! x 10) x)"), Value::Number(10)));
    }

    #[test]
    fn test_let_star_scoping() {
        assert!(matches!(run("(let* (x 2 y (+ x 3)) (+ x y))"), Value::Number(7)));
    }

    #[test]
    fn test_if_truthiness() {
        assert!(matches!(run("(if nil 1 2)"), Value::Number(2)));
        assert!(matches!(run("(if false 1 2)"), Value::Number(2)));
        assert!(matches!(run("(if 0 1 2)"), Value::Number(1)));
        assert!(matches!(run("(if true 1 2)"), Value::Number(1)));
        assert!(matches!(run("(if nil 1)"), Value::Nil));
    }

    #[test]
    fn test_fn_application_and_closures() {
        assert!(matches!(run("((fn* (a b) (+ a b)) 3 4)"), Value::Number(7)));
        assert!(matches!(
            run("(do (def! make-adder (fn* (n) (fn* (x) (+ x n)))) ((make-adder 5) 10))"),
            Value::Number(15)
        ));
    }

    #[test]
    fn test_variadic_fn() {
        assert!(matches!(
            run("((fn* (a & rest) (count rest)) 1 2 3 4)"),
            Value::Number(3)
        ));
    }

    #[test]
    fn test_tco_deep_recursion() {
        let src = "(do (def! count-to (fn* (n acc) (if (= n 0) acc (count-to (- n 1) (+ acc 1))))) (count-to 100000 0))";
        assert!(matches!(run(src), Value::Number(100000)));
    }

    #[test]
    fn test_quote() {
        assert!(matches!(run("(quote (1 2 3))"), Value::List(v) if v.len() == 3));
        assert!(matches!(run("'a"), Value::Symbol(s) if s == "a"));
    }

    #[test]
    fn test_quasiquote_unquote() {
        let v = run("(let* (x 5) `(a ~x c))");
        match v {
            Value::List(items) => {
                assert_eq!(items.len(), 3);
                assert!(matches!(&items[1], Value::Number(5)));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_quasiquote_splice_unquote() {
        let v = run("(let* (xs (list 2 3)) `(1 ~@xs 4))");
        match v {
            Value::List(items) => {
                let nums: Vec<i64> = items
                    .iter()
                    .map(|x| if let Value::Number(n) = x { *n } else { panic!() })
                    .collect();
                assert_eq!(nums, vec![1, 2, 3, 4]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_defmacro_and_macroexpand() {
        let src = "(do (defmacro! unless (fn* (pred a b) `(if ~pred ~b ~a))) (unless false 7 8))";
        assert!(matches!(run(src), Value::Number(7)));
    }

    #[test]
    fn test_try_catch_user_throw() {
        assert!(matches!(
            run("(try* (throw \"oops\") (catch* e e))"),
            Value::String(s) if s == "oops"
        ));
    }

    #[test]
    fn test_try_catch_host_error_as_string() {
        let v = run("(try* (nth (list 1 2) 5) (catch* e e))");
        assert!(matches!(v, Value::String(_)));
    }

    #[test]
    fn test_not_callable_error() {
        assert!(matches!(run_err("(1 2 3)"), EvalError::NotCallable));
    }

    #[test]
    fn test_not_found_error() {
        assert!(matches!(run_err("undefined-name"), EvalError::NotFound(_)));
    }
}
