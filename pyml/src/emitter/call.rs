use crate::emitter::Context;
use crate::grammar::match_bare_call;
use crate::line::SourceLine;

/// `name;` -> `name()`
pub fn emit(lines: &[SourceLine], i: usize, ctx: &mut Context) -> usize {
    let line = &lines[i];
    match match_bare_call(&line.text) {
        Some(name) => ctx.push(line, format!("{}()", name)),
        None => ctx.mismatch(line, "call"),
    }
    i + 1
}
