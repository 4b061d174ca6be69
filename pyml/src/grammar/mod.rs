//! Pattern matchers for the individual PyML constructs.
//!
//! The classifier only decides which construct a line *looks like*; the
//! matchers here check the finer grammar of that construct and return its
//! fields. A matcher returning `None` means the line degrades to passthrough.

/// Keywords whose lines are copied through unchanged apart from indentation.
pub const CONTROL_KEYWORDS: &[&str] = &[
    "if ", "elif ", "else:", "else ", "while ", "try:", "except", "finally:", "with ",
];

/// Parameter list that stands for "no parameters".
pub const EMPTY_PARAMS: &str = "_";

/// Marker that introduces a sequence item or a package declaration.
pub const LIST_MARKER: char = '-';

// ---------------------------------------------------------------------------
// Structured match results
// ---------------------------------------------------------------------------

/// `function <name> define <params>:`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionHeader<'a> {
    pub name: &'a str,
    pub params: Vec<&'a str>,
}

/// Either form of `for ... :`.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopHeader<'a> {
    /// `for <var> in range.<a>[.<b>[.<c>]]:`
    Range { var: &'a str, bounds: Vec<&'a str> },
    /// `for <vars> in <collection>:`; `paired` when `vars` contains a comma.
    Collection {
        vars: &'a str,
        collection: &'a str,
        paired: bool,
    },
}

/// The argument of a `print:` line.
#[derive(Debug, Clone, PartialEq)]
pub enum PrintArg<'a> {
    Empty,
    /// Quoted text with `{...}` placeholders.
    QuotedTemplate(&'a str),
    /// Unquoted text with `{...}` placeholders.
    BareTemplate(&'a str),
    /// Anything else, passed as the call argument.
    Expression(&'a str),
}

/// `target: value` split on the first top-level colon.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding<'a> {
    pub target: &'a str,
    pub value: &'a str,
}

// ---------------------------------------------------------------------------
// Matchers
// ---------------------------------------------------------------------------

pub fn match_function(text: &str) -> Option<FunctionHeader<'_>> {
    let rest = strip_keyword(text, "function")?;
    let (name, rest) = split_word(rest)?;
    if !is_identifier(name) {
        return None;
    }
    let rest = strip_keyword(rest.trim_start(), "define")?;
    let params = rest.strip_suffix(':')?.trim();
    if params.is_empty() {
        return None;
    }
    let params = if params == EMPTY_PARAMS {
        Vec::new()
    } else {
        split_top_level(params, ',')
            .into_iter()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    };
    Some(FunctionHeader { name, params })
}

pub fn match_loop(text: &str) -> Option<LoopHeader<'_>> {
    let rest = strip_keyword(text, "for")?;
    let header = rest.strip_suffix(':')?.trim_end();
    let in_pos = find_in_keyword(header)?;
    let vars = header[..in_pos].trim();
    let iterable = header[in_pos + 2..].trim();

    if let Some(range) = iterable.strip_prefix("range.") {
        if !is_identifier(vars) {
            return None;
        }
        let bounds: Vec<&str> = range.split('.').map(str::trim).collect();
        if bounds.len() > 3 || bounds.iter().any(|b| !is_range_bound(b)) {
            return None;
        }
        return Some(LoopHeader::Range { var: vars, bounds });
    }

    let names: Vec<&str> = vars.split(',').map(str::trim).collect();
    if names.iter().any(|n| !is_identifier(n)) || !is_dotted_identifier(iterable) {
        return None;
    }
    Some(LoopHeader::Collection {
        vars,
        collection: iterable,
        paired: names.len() > 1,
    })
}

pub fn match_print(text: &str) -> Option<PrintArg<'_>> {
    let arg = text.strip_prefix("print:")?.trim();
    let has_braces = arg.contains('{') && arg.contains('}');
    let arg = if arg.is_empty() {
        PrintArg::Empty
    } else if is_prefixed_string(arg) {
        PrintArg::Expression(arg)
    } else if arg.starts_with(['"', '\'']) && has_braces {
        PrintArg::QuotedTemplate(arg)
    } else if !arg.starts_with(['"', '\'']) && has_braces {
        PrintArg::BareTemplate(arg)
    } else {
        PrintArg::Expression(arg)
    };
    Some(arg)
}

pub fn match_assignment(text: &str) -> Option<Binding<'_>> {
    let colon = find_top_level(text, ':')?;
    let target = text[..colon].trim();
    if !is_dotted_identifier(target) {
        return None;
    }
    Some(Binding {
        target,
        value: text[colon + 1..].trim(),
    })
}

pub fn match_bare_call(text: &str) -> Option<&str> {
    let name = text.strip_suffix(';')?.trim_end();
    is_dotted_identifier(name).then_some(name)
}

/// Text of a `- item` line, or `None` if the line is not a list item.
pub fn match_list_item(text: &str) -> Option<&str> {
    text.strip_prefix(LIST_MARKER).map(str::trim)
}

pub fn is_control(text: &str) -> bool {
    CONTROL_KEYWORDS.iter().any(|kw| text.starts_with(kw))
}

// ---------------------------------------------------------------------------
// Lexical helpers
// ---------------------------------------------------------------------------

/// Byte index of the first `needle` outside string literals and brackets.
pub fn find_top_level(text: &str, needle: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            _ if c == needle && depth == 0 => return Some(i),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}

/// Split on every top-level `sep`, keeping empty pieces.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = text;
    while let Some(pos) = find_top_level(rest, sep) {
        parts.push(&rest[..pos]);
        rest = &rest[pos + sep.len_utf8()..];
    }
    parts.push(rest);
    parts
}

pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// `a`, `a.b`, `self.items`, ...
pub fn is_dotted_identifier(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(is_identifier)
}

/// A plain `"..."` or `'...'` literal with no prefix and no unescaped inner delimiter.
pub fn is_string_literal(s: &str) -> bool {
    let Some(quote) = s.chars().next().filter(|c| *c == '"' || *c == '\'') else {
        return false;
    };
    if s.len() < 2 || !s.ends_with(quote) {
        return false;
    }
    let inner = &s[1..s.len() - 1];
    let mut escaped = false;
    for c in inner.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return false;
        }
    }
    !escaped
}

/// `f"..."`, `rb'...'` and friends.
pub fn is_prefixed_string(s: &str) -> bool {
    let prefix_len = s
        .chars()
        .take_while(|c| matches!(c.to_ascii_lowercase(), 'f' | 'r' | 'b' | 'u'))
        .count();
    (1..=2).contains(&prefix_len) && s[prefix_len..].starts_with(['"', '\''])
}

fn is_range_bound(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    is_identifier(s) || (!digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

/// Strip a leading keyword that must be followed by whitespace.
fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(keyword)?;
    rest.starts_with(char::is_whitespace).then(|| rest.trim_start())
}

fn split_word(text: &str) -> Option<(&str, &str)> {
    let end = text.find(char::is_whitespace)?;
    Some((&text[..end], &text[end..]))
}

/// Position of the ` in ` separator in a loop header.
fn find_in_keyword(header: &str) -> Option<usize> {
    header
        .match_indices("in")
        .map(|(i, _)| i)
        .find(|&i| {
            let before = header[..i].chars().next_back();
            let after = header[i + 2..].chars().next();
            before.is_some_and(char::is_whitespace) && after.is_some_and(char::is_whitespace)
        })
}
