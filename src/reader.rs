// ABOUTME: Tokenizer and recursive-descent parser turning text into Values (READ)

use crate::error::ReadError;
use crate::value::Value;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while1};
use nom::combinator::recognize;
use nom::IResult;

fn is_atom_char(c: char) -> bool {
    !(c.is_whitespace() || c == ',' || "[]{}('\"`,;)".contains(c))
}

/// Scans a (possibly unterminated) string literal starting at `"`.
/// Mirrors the tokenizer regex's `"(?:\\.|[^\\"])*"?` — if no closing quote
/// is found the whole remaining input becomes the token, so the caller can
/// report `Unbalanced` rather than silently truncating.
fn string_token(input: &str) -> IResult<&str, &str> {
    if !input.starts_with('"') {
        return Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Tag)));
    }
    let mut end = input.len();
    let mut escaped = false;
    let mut closed = false;
    for (i, c) in input.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => {
                end = i + 1;
                closed = true;
                break;
            }
            _ => {}
        }
    }
    let _ = closed;
    Ok((&input[end..], &input[..end]))
}

fn read_token(input: &str) -> IResult<&str, &str> {
    alt((
        tag("~@"),
        recognize(nom::character::complete::one_of("[]{}()'`~^@")),
        string_token,
        take_while1(is_atom_char),
    ))(input)
}

/// Splits `input` into MAL tokens, discarding whitespace, commas and
/// `;`-to-end-of-line comments.
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut rest = input;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        if rest.is_empty() {
            break;
        }
        if let Some(after) = rest.strip_prefix(';') {
            rest = match after.find('\n') {
                Some(i) => &after[i..],
                None => "",
            };
            continue;
        }
        match read_token(rest) {
            Ok((remaining, tok)) => {
                tokens.push(tok.to_string());
                rest = remaining;
            }
            Err(_) => break,
        }
    }
    tokens
}

struct TokenStream {
    tokens: Vec<String>,
    pos: usize,
}

impl TokenStream {
    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(|s| s.as_str())
    }

    fn next(&mut self) -> Option<String> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }
}

fn wrap(name: &str, form: Value) -> Value {
    Value::List(vec![Value::Symbol(name.to_string()), form])
}

fn read_form(ts: &mut TokenStream) -> Result<Option<Value>, ReadError> {
    let tok = match ts.peek() {
        Some(t) => t.to_string(),
        None => return Ok(None),
    };
    match tok.as_str() {
        "(" => {
            ts.next();
            Ok(Some(Value::List(read_seq(ts, ")")?)))
        }
        "[" => {
            ts.next();
            Ok(Some(Value::Vector(read_seq(ts, "]")?)))
        }
        "{" => {
            ts.next();
            Ok(Some(Value::HashMap(read_seq(ts, "}")?)))
        }
        ")" | "]" | "}" => Err(ReadError::FailToParse),
        "'" => {
            ts.next();
            Ok(Some(wrap("quote", read_form_required(ts)?)))
        }
        "`" => {
            ts.next();
            Ok(Some(wrap("quasiquote", read_form_required(ts)?)))
        }
        "~" => {
            ts.next();
            Ok(Some(wrap("unquote", read_form_required(ts)?)))
        }
        "~@" => {
            ts.next();
            Ok(Some(wrap("splice-unquote", read_form_required(ts)?)))
        }
        "@" => {
            ts.next();
            Ok(Some(wrap("deref", read_form_required(ts)?)))
        }
        "^" => {
            ts.next();
            let meta = read_form_required(ts)?;
            let form = read_form_required(ts)?;
            Ok(Some(Value::List(vec![
                Value::Symbol("with-meta".to_string()),
                form,
                meta,
            ])))
        }
        _ => {
            ts.next();
            Ok(Some(read_atom(&tok)?))
        }
    }
}

fn read_form_required(ts: &mut TokenStream) -> Result<Value, ReadError> {
    read_form(ts)?.ok_or(ReadError::FailToParse)
}

fn read_seq(ts: &mut TokenStream, close: &str) -> Result<Vec<Value>, ReadError> {
    let mut items = Vec::new();
    loop {
        match ts.peek() {
            None => return Err(ReadError::FailToParse),
            Some(t) if t == close => {
                ts.next();
                return Ok(items);
            }
            _ => items.push(read_form_required(ts)?),
        }
    }
}

fn is_integer(tok: &str) -> bool {
    let body = tok.strip_prefix('-').unwrap_or(tok);
    !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit())
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn read_atom(tok: &str) -> Result<Value, ReadError> {
    if is_integer(tok) {
        return Ok(Value::Number(tok.parse().map_err(|_| ReadError::FailToParse)?));
    }
    if let Some(rest) = tok.strip_prefix('"') {
        if tok.len() >= 2 && rest.ends_with('"') {
            let body = &rest[..rest.len() - 1];
            return Ok(Value::String(unescape(body)));
        }
        return Err(ReadError::Unbalanced);
    }
    if let Some(name) = tok.strip_prefix(':') {
        return Ok(Value::Keyword(name.to_string()));
    }
    match tok {
        "nil" => Ok(Value::Nil),
        "true" => Ok(Value::Bool(true)),
        "false" => Ok(Value::Bool(false)),
        _ => Ok(Value::Symbol(tok.to_string())),
    }
}

/// Parses exactly one form from `input`, ignoring any trailing tokens.
/// Returns `Ok(None)` if `input` contains no form at all (blank line or
/// comment-only input).
pub fn read_str(input: &str) -> Result<Option<Value>, ReadError> {
    let tokens = tokenize(input);
    let mut ts = TokenStream { tokens, pos: 0 };
    read_form(&mut ts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(s: &str) -> Value {
        read_str(s).unwrap().unwrap()
    }

    #[test]
    fn test_numbers() {
        assert!(matches!(read("42"), Value::Number(42)));
        assert!(matches!(read("-17"), Value::Number(-17)));
    }

    #[test]
    fn test_literals() {
        assert!(matches!(read("nil"), Value::Nil));
        assert!(matches!(read("true"), Value::Bool(true)));
        assert!(matches!(read("false"), Value::Bool(false)));
    }

    #[test]
    fn test_symbol_and_keyword() {
        assert!(matches!(read("foo-bar"), Value::Symbol(s) if s == "foo-bar"));
        assert!(matches!(read(":kw"), Value::Keyword(s) if s == "kw"));
    }

    #[test]
    fn test_string_escapes() {
        match read(r#""a\"b\nc""#) {
            Value::String(s) => assert_eq!(s, "a\"b\nc"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unbalanced_string() {
        assert_eq!(read_str(r#""unterminated"#), Err(ReadError::Unbalanced));
    }

    #[test]
    fn test_unbalanced_list() {
        assert_eq!(read_str("(1 2"), Err(ReadError::FailToParse));
    }

    #[test]
    fn test_list_vector_hashmap() {
        assert!(matches!(read("(1 2 3)"), Value::List(v) if v.len() == 3));
        assert!(matches!(read("[1 2]"), Value::Vector(v) if v.len() == 2));
        assert!(matches!(read("{:a 1}"), Value::HashMap(v) if v.len() == 2));
    }

    #[test]
    fn test_reader_macros() {
        assert!(matches!(read("'a"), Value::List(v) if matches!(&v[0], Value::Symbol(s) if s == "quote")));
        assert!(matches!(read("`a"), Value::List(v) if matches!(&v[0], Value::Symbol(s) if s == "quasiquote")));
        assert!(matches!(read("~a"), Value::List(v) if matches!(&v[0], Value::Symbol(s) if s == "unquote")));
        assert!(matches!(read("~@a"), Value::List(v) if matches!(&v[0], Value::Symbol(s) if s == "splice-unquote")));
        assert!(matches!(read("@a"), Value::List(v) if matches!(&v[0], Value::Symbol(s) if s == "deref")));
    }

    #[test]
    fn test_comments_and_whitespace_ignored() {
        let v = read_str("  ; comment\n  42 ; trailing\n").unwrap().unwrap();
        assert!(matches!(v, Value::Number(42)));
    }

    #[test]
    fn test_blank_input_is_none() {
        assert_eq!(read_str("   ; nothing here\n").unwrap(), None);
        assert_eq!(read_str("").unwrap(), None);
    }

    #[test]
    fn test_trailing_input_is_ignored() {
        let v = read_str("1 2 3").unwrap().unwrap();
        assert!(matches!(v, Value::Number(1)));
    }

    #[test]
    fn test_nested_collections() {
        let v = read("(1 [2 3] {:a 4})");
        match v {
            Value::List(items) => {
                assert_eq!(items.len(), 3);
                assert!(matches!(&items[1], Value::Vector(_)));
                assert!(matches!(&items[2], Value::HashMap(_)));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
