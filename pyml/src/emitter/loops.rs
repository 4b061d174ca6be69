use crate::block;
use crate::emitter::{Context, emit_line};
use crate::grammar::{LoopHeader, match_loop};
use crate::line::{LineKind, SourceLine};
use crate::transpiler::Diagnostic;

pub fn emit(lines: &[SourceLine], i: usize, ctx: &mut Context) -> usize {
    let line = &lines[i];
    let Some(header) = match_loop(&line.text) else {
        ctx.mismatch(line, "for loop");
        return i + 1;
    };

    match header {
        LoopHeader::Range { var, bounds } => {
            if ctx.options.loop_unrolling {
                if let Some(next) = try_unroll(lines, i, var, &bounds, ctx) {
                    return next;
                }
            }
            ctx.push(line, format!("for {} in range({}):", var, bounds.join(", ")));
        }
        LoopHeader::Collection {
            vars,
            collection,
            paired: true,
        } => ctx.push(line, format!("for {} in {}.items():", vars, collection)),
        LoopHeader::Collection { vars, collection, .. } => {
            ctx.push(line, format!("for {} in {}:", vars, collection))
        }
    }
    i + 1
}

/// Replace a short numeric loop by its iterations: `var = k` followed by the
/// body, once per value, at the loop's own indentation.
///
/// Only flat bodies of prints, assignments and calls qualify; anything that
/// could open a block or jump out of the loop keeps the loop rolled.
fn try_unroll(
    lines: &[SourceLine],
    i: usize,
    var: &str,
    bounds: &[&str],
    ctx: &mut Context,
) -> Option<usize> {
    let line = &lines[i];
    let values = range_values(bounds, ctx.options.max_unroll)?;
    let body = block::scan(lines, i + 1, line.width);
    let first = body.first()?;

    let flat = body.children.iter().all(|child| {
        child.width == first.width
            && matches!(
                child.kind,
                LineKind::Print | LineKind::Assignment | LineKind::BareCall
            )
    });
    if !flat || first.level() <= line.level() {
        return None;
    }

    let extra = first.level() - line.level();
    log::debug!("line {}: unrolling {} iterations", line.number, values.len());

    for value in &values {
        ctx.push(line, format!("{} = {}", var, value));
        ctx.shift += extra;
        let mut cursor = i + 1;
        while cursor < body.next {
            cursor = emit_line(lines, cursor, ctx);
        }
        ctx.shift -= extra;
    }

    ctx.diagnostics.push(Diagnostic::note(
        format!("loop unrolled into {} iterations", values.len()),
        line.span.clone(),
        ctx.file_id,
    ));
    Some(body.next)
}

/// Values produced by Python's `range` for literal bounds, if there are at most `limit`.
fn range_values(bounds: &[&str], limit: usize) -> Option<Vec<i64>> {
    let nums: Vec<i64> = bounds
        .iter()
        .map(|b| b.parse::<i64>().ok())
        .collect::<Option<_>>()?;
    let (start, stop, step) = match nums.as_slice() {
        [stop] => (0, *stop, 1),
        [start, stop] => (*start, *stop, 1),
        [start, stop, step] if *step != 0 => (*start, *stop, *step),
        _ => return None,
    };

    let mut values = Vec::new();
    let mut current = start;
    while (step > 0 && current < stop) || (step < 0 && current > stop) {
        if values.len() == limit {
            return None;
        }
        values.push(current);
        current = current.checked_add(step)?;
    }
    (!values.is_empty()).then_some(values)
}
