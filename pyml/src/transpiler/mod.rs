pub mod error;

pub use error::Diagnostic;

use crate::emitter::{Context, emit_line};
use crate::imports::ImportResolver;
use crate::line::{self, LineKind, SourceLine};

/// Independently switchable rewrite stages.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Evaluate pure arithmetic at transpile time.
    pub constant_folding: bool,
    /// Turn long string concatenations into f-strings.
    pub string_interpolation: bool,
    /// Expand short literal `range` loops into straight-line code.
    pub loop_unrolling: bool,
    /// Largest iteration count the unroller will expand.
    pub max_unroll: usize,
    /// Memoise import resolution within a run.
    pub import_cache: bool,
    /// Classify large inputs on the rayon thread pool.
    pub parallel_classification: bool,
    /// Keep `#` comment lines in the output.
    pub preserve_comments: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            constant_folding: true,
            string_interpolation: true,
            loop_unrolling: false,
            max_unroll: 4,
            import_cache: true,
            parallel_classification: true,
            preserve_comments: false,
        }
    }
}

/// Result of one transpile call.
#[derive(Debug, Clone, PartialEq)]
pub struct Transpiled {
    /// Generated Python source.
    pub code: String,
    /// Warnings and notes, ordered by source position.
    pub diagnostics: Vec<Diagnostic>,
}

impl Transpiled {
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }
}

/// Transpiler entry point.
#[derive(Debug, Clone, Default)]
pub struct Transpiler {
    options: Options,
}

impl Transpiler {
    pub fn new(options: Options) -> Self {
        Transpiler { options }
    }

    /// Classify `source` into the lines the emitters will see: blank lines are
    /// always dropped, comments unless they are being preserved.
    pub fn prepare(&self, source: &str) -> Vec<SourceLine> {
        let preserve_comments = self.options.preserve_comments;
        line::read_lines(source, self.options.parallel_classification)
            .into_iter()
            .filter(|l| !l.text.is_empty())
            .filter(|l| preserve_comments || l.kind != LineKind::Comment)
            .collect()
    }

    /// Convert PyML source into Python source. Never fails; see `Transpiled::diagnostics`.
    pub fn transpile(&self, source: &str, file_id: usize) -> Transpiled {
        let lines = self.prepare(source);
        let mut ctx = Context::new(self.options.clone(), file_id);

        for line in lines.iter().filter(|l| l.is_misaligned()) {
            ctx.diagnostics.push(
                Diagnostic::warning(
                    format!(
                        "indentation of {} is not a multiple of {}; nesting level rounded down to {}",
                        line.width,
                        line::INDENT_UNIT,
                        line.level()
                    ),
                    line.span.clone(),
                    file_id,
                )
                .with_note("blocks are still delimited by raw indentation width"),
            );
        }

        let mut i = 0;
        while i < lines.len() {
            i = emit_line(&lines, i, &mut ctx);
        }

        let mut resolver = ImportResolver::new(self.options.import_cache);
        let mut statements = resolver.resolve_all(&ctx.imports);
        statements.sort();
        statements.dedup();
        log::debug!(
            "transpiled {} lines into {} body lines and {} imports",
            lines.len(),
            ctx.output.lines().len(),
            statements.len()
        );

        let mut diagnostics = ctx.diagnostics;
        diagnostics.sort_by_key(|d| d.span.start);
        Transpiled {
            code: ctx.output.assemble(&statements),
            diagnostics,
        }
    }
}
