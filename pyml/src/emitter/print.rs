use crate::emitter::Context;
use crate::grammar::{PrintArg, match_print};
use crate::line::SourceLine;

pub fn emit(lines: &[SourceLine], i: usize, ctx: &mut Context) -> usize {
    let line = &lines[i];
    let Some(arg) = match_print(&line.text) else {
        ctx.mismatch(line, "print");
        return i + 1;
    };

    let call = match arg {
        PrintArg::Empty => "print()".to_string(),
        PrintArg::QuotedTemplate(text) => format!("print(f{})", text),
        PrintArg::BareTemplate(text) => {
            let quote = if text.contains('"') { '\'' } else { '"' };
            format!("print(f{quote}{text}{quote})")
        }
        PrintArg::Expression(expr) => format!("print({})", expr),
    };
    ctx.push(line, call);
    i + 1
}
