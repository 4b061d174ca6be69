use std::fmt;

use crate::grammar::is_string_literal;

/// A literal value built from a block-encoded sequence or mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Plain text, rendered as a single-quoted Python string.
    Text(String),
    /// A string literal kept exactly as written (quotes included).
    Quoted(String),
    /// Integer or decimal text, rendered as written.
    Number(String),
    Boolean(bool),
    /// An expression copied into the output (sequence items).
    Expression(String),
    List(Vec<Literal>),
    /// Key/value pairs in source order; keys are rendered quoted.
    Map(Vec<(String, Literal)>),
}

impl Literal {
    /// Type a scalar mapping value: quoted text stays as written, numerals
    /// become numbers, `true`/`false` become booleans, anything else is text.
    pub fn from_scalar(text: &str) -> Literal {
        if is_string_literal(text) {
            Literal::Quoted(text.to_string())
        } else if is_numeric(text) {
            Literal::Number(text.to_string())
        } else if text.eq_ignore_ascii_case("true") {
            Literal::Boolean(true)
        } else if text.eq_ignore_ascii_case("false") {
            Literal::Boolean(false)
        } else {
            Literal::Text(text.to_string())
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Text(_) | Literal::Quoted(_) => "string",
            Literal::Number(_) => "number",
            Literal::Boolean(_) => "boolean",
            Literal::Expression(_) => "expression",
            Literal::List(_) => "list",
            Literal::Map(_) => "mapping",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Text(s) => write!(f, "{}", quote(s)),
            Literal::Quoted(s) | Literal::Number(s) | Literal::Expression(s) => write!(f, "{}", s),
            Literal::Boolean(true) => write!(f, "True"),
            Literal::Boolean(false) => write!(f, "False"),
            Literal::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Literal::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", quote_key(key), value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Quote a mapping key unless it is already a string literal.
pub fn quote_key(key: &str) -> String {
    if is_string_literal(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

/// Render `s` as a single-quoted Python string literal.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Optionally signed integer or decimal numeral that Python accepts as written.
pub fn is_numeric(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits, None),
    };
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(int_part) || !frac_part.is_none_or(all_digits) {
        return false;
    }
    match frac_part {
        Some(frac) => !(int_part.is_empty() && frac.is_empty()),
        // Python rejects integer literals with leading zeros, except for zero itself.
        None => !int_part.is_empty() && (!int_part.starts_with('0') || int_part.chars().all(|c| c == '0')),
    }
}
