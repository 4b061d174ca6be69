use crate::line::SourceLine;

/// The lines owned by one parent line: the maximal contiguous run of lines
/// indented deeper than the parent.
///
/// Blocks are recomputed whenever a construct needs its body and are never
/// stored; scanning the same parent twice yields the same children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block<'a> {
    pub children: &'a [SourceLine],
    /// Index of the first line after the block (where the caller resumes).
    pub next: usize,
}

/// Collect the lines from `start` whose width is strictly greater than `parent_width`.
///
/// Stops at the first line at or below the parent width, or at end of input.
pub fn scan(lines: &[SourceLine], start: usize, parent_width: usize) -> Block<'_> {
    let start = start.min(lines.len());
    let next = lines[start..]
        .iter()
        .position(|line| line.width <= parent_width)
        .map_or(lines.len(), |offset| start + offset);
    log::trace!("block scan from {} (parent width {}) -> {}", start, parent_width, next);
    Block {
        children: &lines[start..next],
        next,
    }
}

impl<'a> Block<'a> {
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn first(&self) -> Option<&'a SourceLine> {
        self.children.first()
    }

    /// Walk the direct children of this block, each paired with its own nested body.
    pub fn entries(&self) -> Entries<'a> {
        Entries {
            lines: self.children,
            pos: 0,
        }
    }
}

/// A direct child line and the lines nested beneath it.
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    pub line: &'a SourceLine,
    pub body: Block<'a>,
}

pub struct Entries<'a> {
    lines: &'a [SourceLine],
    pos: usize,
}

impl<'a> Iterator for Entries<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Entry<'a>> {
        let line = self.lines.get(self.pos)?;
        let body = scan(self.lines, self.pos + 1, line.width);
        self.pos = body.next;
        Some(Entry { line, body })
    }
}
