pub mod classify;

use std::ops::Range;

use rayon::prelude::*;

pub use classify::classify;

/// Number of leading whitespace characters that make up one nesting level.
pub const INDENT_UNIT: usize = 2;

/// Inputs shorter than this are classified on the calling thread.
pub const PARALLEL_THRESHOLD: usize = 2048;

/// Syntactic kind of a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Blank line or `# ...` comment.
    Comment,
    /// `packages:` introducing a block of declared imports.
    SectionHeader,
    /// `function <name> define <params>:`
    FunctionDef,
    /// `for ... :` in either range or collection form.
    Loop,
    /// `print: ...`
    Print,
    /// `name: value`, possibly introducing a literal structure.
    Assignment,
    /// `if`/`elif`/`else`/`while`/... passed through as written.
    Control,
    /// `name;`
    BareCall,
    /// Anything else, emitted verbatim.
    Unknown,
}

/// One physical line of PyML source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLine {
    /// 1-based line number in the original text.
    pub number: usize,
    /// Byte span of the line (without its terminator) in the original text.
    pub span: Range<usize>,
    /// The line with trailing whitespace removed.
    pub raw: String,
    /// The line with surrounding whitespace removed.
    pub text: String,
    /// Count of leading whitespace characters.
    pub width: usize,
    pub kind: LineKind,
}

impl SourceLine {
    pub fn new(number: usize, span: Range<usize>, raw: &str) -> Self {
        let raw = raw.trim_end();
        let text = raw.trim_start();
        let width = indent_width(raw);
        SourceLine {
            number,
            span,
            raw: raw.to_string(),
            text: text.to_string(),
            width,
            kind: classify(text),
        }
    }

    /// Nesting level derived from the indentation width (floor division).
    pub fn level(&self) -> usize {
        self.width / INDENT_UNIT
    }

    /// True when the width does not divide evenly into nesting levels.
    pub fn is_misaligned(&self) -> bool {
        self.width % INDENT_UNIT != 0
    }
}

/// Count of leading whitespace characters in `line`.
pub fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Split `source` into physical lines with their byte spans, without classifying them.
pub fn split_lines(source: &str) -> Vec<(usize, Range<usize>, &str)> {
    let body = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut lines = Vec::new();
    let mut offset = source.len() - body.len();
    for (idx, piece) in body.split_inclusive('\n').enumerate() {
        let content = piece
            .strip_suffix('\n')
            .map(|s| s.strip_suffix('\r').unwrap_or(s))
            .unwrap_or(piece);
        lines.push((idx + 1, offset..offset + content.len(), content));
        offset += piece.len();
    }
    lines
}

/// Split and classify every line of `source`, in order.
///
/// Classification depends only on each line's own text, so large inputs are
/// classified in parallel; the indexed collect keeps the input order.
pub fn read_lines(source: &str, parallel: bool) -> Vec<SourceLine> {
    let pieces = split_lines(source);
    if parallel && pieces.len() >= PARALLEL_THRESHOLD {
        log::trace!("classifying {} lines in parallel", pieces.len());
        pieces
            .into_par_iter()
            .map(|(number, span, raw)| SourceLine::new(number, span, raw))
            .collect()
    } else {
        pieces
            .into_iter()
            .map(|(number, span, raw)| SourceLine::new(number, span, raw))
            .collect()
    }
}
