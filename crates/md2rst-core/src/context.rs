//! Position of a line within its document

/// The document a line belongs to and where it sits in it.
///
/// Lines are always looked at in the context of the original, unconverted
/// input: `previous()` returns the source line before this one, never a
/// line produced by an earlier conversion step.
#[derive(Debug, Clone, Copy)]
pub struct LineContext<'a> {
    lines: &'a [&'a str],
    index: usize,
}

impl<'a> LineContext<'a> {
    pub fn new(lines: &'a [&'a str], index: usize) -> Self {
        Self { lines, index }
    }

    /// All source lines of the document
    pub fn lines(&self) -> &'a [&'a str] {
        self.lines
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    /// The source line immediately before this one, if any
    pub fn previous(&self) -> Option<&'a str> {
        self.index
            .checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .copied()
    }
}
