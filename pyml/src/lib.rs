pub mod block;
pub mod emitter;
pub mod grammar;
pub mod imports;
pub mod line;
pub mod literal;
pub mod optimizer;
pub mod transpiler;

pub use line::{LineKind, SourceLine};
pub use transpiler::{Diagnostic, Options, Transpiled, Transpiler};

/// Transpile PyML source to Python with the default options, discarding diagnostics.
///
/// Empty input yields empty output. Never fails: lines the transpiler does not
/// understand are copied through at their indentation.
pub fn transpile(source: &str) -> String {
    Transpiler::default().transpile(source, 0).code
}
