use crate::emitter::Context;
use crate::grammar::match_function;
use crate::line::SourceLine;

/// `function <name> define <params>:` -> `def <name>(<params>):`
pub fn emit(lines: &[SourceLine], i: usize, ctx: &mut Context) -> usize {
    let line = &lines[i];
    let Some(header) = match_function(&line.text) else {
        ctx.mismatch(line, "function definition");
        return i + 1;
    };

    let params = header.params.join(", ");
    ctx.push(line, format!("def {}({}):", header.name, params));
    ctx.symbols.define_function(
        header.name,
        header.params.iter().map(|p| p.to_string()).collect(),
    );
    i + 1
}
