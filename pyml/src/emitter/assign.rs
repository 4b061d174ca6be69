use crate::block::{self, Block};
use crate::emitter::Context;
use crate::grammar::{LIST_MARKER, find_top_level, is_string_literal, match_assignment, match_list_item};
use crate::line::{LineKind, SourceLine};
use crate::literal::Literal;

/// `name: value`, `name:` followed by a literal block, or `func: arg`.
pub fn emit(lines: &[SourceLine], i: usize, ctx: &mut Context) -> usize {
    let line = &lines[i];
    let Some(binding) = match_assignment(&line.text) else {
        ctx.mismatch(line, "assignment");
        return i + 1;
    };
    let target = binding.target;

    if binding.value.is_empty() {
        let body = block::scan(lines, i + 1, line.width);
        if let Some(literal) = structure(&body, ctx) {
            let rendered = literal.to_string();
            log::debug!("line {}: {} literal for {}", line.number, literal.type_name(), target);
            ctx.push(line, format!("{} = {}", target, rendered));
            ctx.symbols.assign(target, rendered);
            return body.next;
        }
    }

    if ctx.symbols.is_function(target) {
        ctx.push(line, format!("{}({})", target, binding.value));
        return i + 1;
    }

    let value = if binding.value.is_empty() {
        ctx.warn(line, format!("`{}` has no value; assigned None", target));
        "None".to_string()
    } else {
        ctx.optimizer.optimize(binding.value)
    };
    ctx.push(line, format!("{} = {}", target, value));
    ctx.symbols.assign(target, value);
    i + 1
}

/// Interpret a block as a literal sequence or mapping, judged by its first line.
fn structure(body: &Block<'_>, ctx: &mut Context) -> Option<Literal> {
    let first = body.children.iter().find(|l| l.kind != LineKind::Comment)?;
    if first.text.starts_with(LIST_MARKER) {
        Some(sequence(body, ctx))
    } else if first.text.contains(':') {
        Some(mapping(body, ctx))
    } else {
        None
    }
}

fn sequence(body: &Block<'_>, ctx: &mut Context) -> Literal {
    let mut items = Vec::new();

    for entry in body.entries() {
        if entry.line.kind == LineKind::Comment {
            continue;
        }
        let Some(item) = match_list_item(&entry.line.text) else {
            ctx.warn(entry.line, "expected `- item` in list literal; line ignored");
            continue;
        };

        match (item.is_empty(), structure(&entry.body, ctx)) {
            (true, Some(nested)) => items.push(nested),
            (true, None) => {
                if !entry.body.is_empty() {
                    ctx.warn(entry.line, "lines nested under an empty list item were ignored");
                }
            }
            // `- name` followed by `key: value` lines: a record tagged with its item text.
            (false, Some(Literal::Map(mut fields))) => {
                let tag = if is_string_literal(item) {
                    Literal::Quoted(item.to_string())
                } else {
                    Literal::Text(item.to_string())
                };
                fields.insert(0, ("item".to_string(), tag));
                items.push(Literal::Map(fields));
            }
            (false, _) => {
                if !entry.body.is_empty() {
                    ctx.warn(entry.line, "lines nested under a list item were ignored");
                }
                items.push(Literal::Expression(ctx.optimizer.optimize(item)));
            }
        }
    }

    Literal::List(items)
}

fn mapping(body: &Block<'_>, ctx: &mut Context) -> Literal {
    let mut fields = Vec::new();

    for entry in body.entries() {
        if entry.line.kind == LineKind::Comment {
            continue;
        }
        let text = &entry.line.text;
        let Some(colon) = find_top_level(text, ':').or_else(|| text.find(':')) else {
            ctx.warn(entry.line, "expected `key: value` in mapping literal; line ignored");
            continue;
        };
        let key = text[..colon].trim();
        let value = text[colon + 1..].trim();
        if key.is_empty() {
            ctx.warn(entry.line, "mapping entry without a key ignored");
            continue;
        }

        let value = if value.is_empty() {
            match structure(&entry.body, ctx) {
                Some(nested) => nested,
                None => {
                    if !entry.body.is_empty() {
                        ctx.warn(entry.line, "lines nested under a mapping entry were ignored");
                    }
                    Literal::Text(String::new())
                }
            }
        } else {
            if !entry.body.is_empty() {
                ctx.warn(entry.line, "lines nested under a mapping entry were ignored");
            }
            Literal::from_scalar(value)
        };
        fields.push((key.to_string(), value));
    }

    Literal::Map(fields)
}
