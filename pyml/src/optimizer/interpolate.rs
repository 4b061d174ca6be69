//! Rewriting of chained string concatenation into a single f-string.

use crate::grammar::{find_top_level, is_prefixed_string, is_string_literal, split_top_level};

/// Concatenations with this many terms or fewer are left alone.
pub const INTERPOLATION_THRESHOLD: usize = 2;

enum Term<'a> {
    /// Contents of a plain string literal, without its quotes.
    Text(&'a str),
    Expr(&'a str),
}

/// Rewrite `"a" + b + "c"` as `f"a{b}c"`, or return `None` when the
/// expression is not such a concatenation or cannot be expressed safely.
pub fn interpolate(expr: &str) -> Option<String> {
    let pieces = split_top_level(expr, '+');
    if pieces.len() <= INTERPOLATION_THRESHOLD {
        return None;
    }

    let mut terms = Vec::with_capacity(pieces.len());
    for piece in pieces {
        let piece = piece.trim();
        if piece.is_empty() || is_prefixed_string(piece) || piece.starts_with("\"\"\"") || piece.starts_with("'''") {
            return None;
        }
        if is_string_literal(piece) {
            terms.push(Term::Text(&piece[1..piece.len() - 1]));
        } else if is_embeddable(piece) {
            terms.push(Term::Expr(piece));
        } else {
            return None;
        }
    }

    if !terms.iter().any(|t| matches!(t, Term::Text(_))) {
        return None;
    }

    let quote = ['"', '\''].into_iter().find(|q| {
        terms.iter().all(|t| match t {
            Term::Text(s) => !s.contains(*q),
            Term::Expr(s) => !s.contains(*q),
        })
    })?;

    let mut out = String::with_capacity(expr.len() + 3);
    out.push('f');
    out.push(quote);
    for term in &terms {
        match term {
            Term::Text(s) => out.push_str(&s.replace('{', "{{").replace('}', "}}")),
            Term::Expr(s) => {
                out.push('{');
                out.push_str(s);
                out.push('}');
            }
        }
    }
    out.push(quote);
    Some(out)
}

/// Whether an operand can sit inside `{...}` of an f-string unchanged.
fn is_embeddable(term: &str) -> bool {
    !term.contains(['\\', '{', '}', '#'])
        && find_top_level(term, ':').is_none()
        && find_top_level(term, '!').is_none()
}
