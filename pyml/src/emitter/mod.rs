//! One emitter per line kind. Each takes the cursor position, appends Python
//! lines to the context's output and returns where the driver resumes.

pub mod assign;
pub mod call;
pub mod context;
pub mod function;
pub mod loops;
pub mod print;
pub mod section;

pub use context::{Context, HOST_INDENT, OutputBuffer, SymbolTable};

use crate::line::{LineKind, SourceLine};

/// Emit the construct starting at `lines[i]` and return the next cursor position.
pub fn emit_line(lines: &[SourceLine], i: usize, ctx: &mut Context) -> usize {
    let line = &lines[i];
    log::debug!("line {}: {:?}", line.number, line.kind);

    match line.kind {
        LineKind::Comment => {
            if ctx.options.preserve_comments {
                ctx.passthrough(line);
            }
            i + 1
        }
        LineKind::SectionHeader => section::emit(lines, i, ctx),
        LineKind::FunctionDef => function::emit(lines, i, ctx),
        LineKind::Loop => loops::emit(lines, i, ctx),
        LineKind::Print => print::emit(lines, i, ctx),
        LineKind::Assignment => assign::emit(lines, i, ctx),
        LineKind::BareCall => call::emit(lines, i, ctx),
        LineKind::Control | LineKind::Unknown => {
            ctx.passthrough(line);
            i + 1
        }
    }
}
