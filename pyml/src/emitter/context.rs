use std::collections::HashMap;

use crate::imports::ImportSet;
use crate::line::SourceLine;
use crate::optimizer::Optimizer;
use crate::transpiler::{Diagnostic, Options};

/// Python's indentation for one nesting level.
pub const HOST_INDENT: &str = "    ";

/// What the forward pass knows about names declared so far.
///
/// Only consulted to tell `name: value` assignments apart from calls to
/// functions defined earlier in the file.
#[derive(Debug, Default)]
pub struct SymbolTable {
    /// Variable name -> last emitted value expression.
    pub variables: HashMap<String, String>,
    /// Function name -> parameter names.
    pub functions: HashMap<String, Vec<String>>,
}

impl SymbolTable {
    pub fn define_function(&mut self, name: &str, params: Vec<String>) {
        self.functions.insert(name.to_string(), params);
    }

    pub fn assign(&mut self, name: &str, value: impl Into<String>) {
        self.variables.insert(name.to_string(), value.into());
    }

    pub fn is_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
}

/// Emitted Python lines, in order. Imports are placed in front only when the
/// buffer is assembled.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    lines: Vec<String>,
}

impl OutputBuffer {
    pub fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Join the import block and the body into the final source text.
    pub fn assemble(self, imports: &[String]) -> String {
        let mut out = String::new();
        for statement in imports {
            out.push_str(statement);
            out.push('\n');
        }
        if !imports.is_empty() && !self.lines.is_empty() {
            out.push('\n');
        }
        for line in self.lines {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

/// Mutable state of a single transpile call, handed to every emitter.
#[derive(Debug)]
pub struct Context {
    pub options: Options,
    pub file_id: usize,
    pub symbols: SymbolTable,
    pub imports: ImportSet,
    pub output: OutputBuffer,
    pub diagnostics: Vec<Diagnostic>,
    pub optimizer: Optimizer,
    /// Nesting levels removed from every emitted line (set while replaying an unrolled loop body).
    pub shift: usize,
}

impl Context {
    pub fn new(options: Options, file_id: usize) -> Self {
        let optimizer = Optimizer::new(options.constant_folding, options.string_interpolation);
        Context {
            options,
            file_id,
            symbols: SymbolTable::default(),
            imports: ImportSet::new(),
            output: OutputBuffer::default(),
            diagnostics: Vec::new(),
            optimizer,
            shift: 0,
        }
    }

    pub fn indent(&self, line: &SourceLine) -> String {
        HOST_INDENT.repeat(line.level().saturating_sub(self.shift))
    }

    /// Append `code` at the indentation of `line`.
    pub fn push(&mut self, line: &SourceLine, code: impl AsRef<str>) {
        let indented = format!("{}{}", self.indent(line), code.as_ref());
        self.output.push(indented);
    }

    /// Copy the trimmed line through unchanged.
    pub fn passthrough(&mut self, line: &SourceLine) {
        self.push(line, &line.text);
    }

    /// A line looked like `construct` but did not match its grammar.
    pub fn mismatch(&mut self, line: &SourceLine, construct: &str) {
        log::debug!("line {}: malformed {}, passing through", line.number, construct);
        self.warn(line, format!("malformed {}; copied through unchanged", construct));
        self.passthrough(line);
    }

    pub fn warn(&mut self, line: &SourceLine, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::warning(message, line.span.clone(), self.file_id));
    }
}
