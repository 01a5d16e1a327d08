//! Block-level line classification
//!
//! Decides what a single (already inline-rewritten) line is, looking only at
//! the line itself and the source line before it, and expands it into the
//! RST lines that replace it.
//!
//! The interesting case is [`LineKind::ForcedBreak`]. Markdown renders a
//! newline inside a paragraph as a line break, while RST joins adjacent
//! non-blank lines into one paragraph. Whenever indentation does not
//! increase from the previous line, a blank line is inserted so RST breaks
//! there too.

use std::sync::LazyLock;

use regex::Regex;

use crate::context::LineContext;
use crate::indent::{
    ConvertOptions, indent_level, is_blank, leading_whitespace, normalize_leading_whitespace,
};

/// `#` heading marker, only at the very start of the line
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[ \t]*").expect("Invalid heading regex"));

/// What a line is, in order of precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Indented literal text (leading tab after normalization)
    Preformatted,
    /// `#Title` heading
    Heading,
    /// Paragraph text that needs a blank line before it
    ForcedBreak,
    /// Anything else, passed through unchanged
    Plain,
}

impl LineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineKind::Preformatted => "preformatted",
            LineKind::Heading => "heading",
            LineKind::ForcedBreak => "forced-break",
            LineKind::Plain => "plain",
        }
    }
}

impl std::fmt::Display for LineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified line and the output lines it expands to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expanded {
    pub kind: LineKind,
    pub lines: Vec<String>,
}

impl Expanded {
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Classify a line given its predecessor in the source document
pub fn classify(line: &str, context: &LineContext<'_>, options: &ConvertOptions) -> LineKind {
    let line = normalize_leading_whitespace(line, options.unit());
    classify_normalized(&line, context, options)
}

fn classify_normalized(line: &str, context: &LineContext<'_>, options: &ConvertOptions) -> LineKind {
    if line.starts_with('\t') {
        LineKind::Preformatted
    } else if HEADING_RE.is_match(line) {
        LineKind::Heading
    } else if needs_line_break(line, context, options) {
        LineKind::ForcedBreak
    } else {
        LineKind::Plain
    }
}

/// Classify a line and produce the lines that replace it
pub fn classify_and_expand(
    line: &str,
    context: &LineContext<'_>,
    options: &ConvertOptions,
) -> Expanded {
    let line = normalize_leading_whitespace(line, options.unit());
    let kind = classify_normalized(&line, context, options);

    let lines = match kind {
        LineKind::Preformatted => expand_preformatted(&line, context),
        LineKind::Heading => expand_heading(&line),
        LineKind::ForcedBreak => vec![String::new(), line.into_owned()],
        LineKind::Plain => vec![line.into_owned()],
    };

    Expanded { kind, lines }
}

fn expand_preformatted(line: &str, context: &LineContext<'_>) -> Vec<String> {
    let previous_blank = context.previous().is_none_or(is_blank);
    if context.is_first() || is_blank(line) || previous_blank {
        vec![line.to_string()]
    } else {
        vec![String::new(), line.to_string()]
    }
}

fn expand_heading(line: &str) -> Vec<String> {
    let title = HEADING_RE.replace(line, "");
    let title = title.trim_end();
    let underline = "=".repeat(title.chars().count());
    vec![title.to_string(), underline]
}

/// Whether `line` starts an unordered list item (`* item`), allowing less
/// than one indent unit of leading whitespace
fn is_unordered_list_item(line: &str, options: &ConvertOptions) -> bool {
    let leading = leading_whitespace(line);
    if leading.chars().count() >= options.unit() {
        return false;
    }
    let mut rest = line[leading.len()..].chars();
    rest.next() == Some('*') && matches!(rest.next(), Some(' ' | '\t'))
}

/// Whether a blank line must be inserted before `line` to keep Markdown's
/// line break
fn needs_line_break(line: &str, context: &LineContext<'_>, options: &ConvertOptions) -> bool {
    let Some(previous) = context.previous() else {
        return false;
    };
    if is_blank(line) || is_blank(previous) {
        return false;
    }
    // Heading underlines and list dashes never get separated
    if starts_with_rule_char(previous) || starts_with_rule_char(line) {
        return false;
    }

    let width = options.unit();
    let previous = normalize_leading_whitespace(previous, width);

    let cur_level = indent_level(line, width);
    let prev_level = indent_level(&previous, width);
    let cur_ws = leading_whitespace(line).len();
    let prev_ws = leading_whitespace(&previous).len();

    if is_unordered_list_item(line, options) {
        return cur_level == 0 && prev_level == 0 && cur_ws >= prev_ws;
    }

    cur_level < prev_level || (cur_level == prev_level && cur_ws >= prev_ws)
}

fn starts_with_rule_char(line: &str) -> bool {
    line.starts_with(['-', '='])
}
