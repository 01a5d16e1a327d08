//! Indentation handling
//!
//! Markdown infers nesting from leading whitespace, mixing tabs and runs of
//! spaces. Everything that compares nesting depth goes through the helpers
//! here, which treat one tab or one full run of `indent_width` spaces as a
//! single indent unit.

use std::borrow::Cow;

use thiserror::Error;

/// Number of spaces that make up one indent unit unless configured otherwise
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Options for a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Spaces per indent unit
    pub indent_width: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }
}

/// Invalid conversion options
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("indent width must be at least 1, got {0}")]
    InvalidIndentWidth(usize),
}

impl ConvertOptions {
    /// Create options with a custom indent width
    pub fn with_indent_width(indent_width: usize) -> Result<Self, OptionsError> {
        if indent_width == 0 {
            return Err(OptionsError::InvalidIndentWidth(indent_width));
        }
        Ok(Self { indent_width })
    }

    /// Indent width, never zero even if the field was set directly
    pub(crate) fn unit(&self) -> usize {
        self.indent_width.max(1)
    }
}

/// Whether the line is empty or whitespace only
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// The leading run of spaces and tabs
pub fn leading_whitespace(line: &str) -> &str {
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

/// Rewrite the leading whitespace so that every full run of `width`
/// spaces becomes a tab.
///
/// A run of spaces that is not a multiple of `width` keeps its remainder as
/// plain spaces after the tabs, so six spaces with a width of four become
/// one tab and two spaces. Existing tabs and everything after the leading
/// whitespace are left alone.
pub fn normalize_leading_whitespace(line: &str, width: usize) -> Cow<'_, str> {
    let width = width.max(1);
    let leading = leading_whitespace(line);
    if !leading.contains(' ') {
        return Cow::Borrowed(line);
    }

    let mut normalized = String::with_capacity(line.len());
    let mut spaces = 0;
    for c in leading.chars() {
        if c == ' ' {
            spaces += 1;
        } else {
            flush_spaces(&mut normalized, spaces, width);
            spaces = 0;
            normalized.push(c);
        }
    }
    flush_spaces(&mut normalized, spaces, width);
    normalized.push_str(&line[leading.len()..]);

    if normalized == line {
        Cow::Borrowed(line)
    } else {
        Cow::Owned(normalized)
    }
}

fn flush_spaces(out: &mut String, spaces: usize, width: usize) {
    for _ in 0..spaces / width {
        out.push('\t');
    }
    for _ in 0..spaces % width {
        out.push(' ');
    }
}

/// Count indent units in the leading whitespace.
///
/// Each tab is one unit, and so is each complete run of `width` spaces.
/// Leftover spaces do not count.
pub fn indent_level(line: &str, width: usize) -> usize {
    let width = width.max(1);
    let mut level = 0;
    let mut spaces = 0;
    for c in leading_whitespace(line).chars() {
        if c == '\t' {
            level += spaces / width + 1;
            spaces = 0;
        } else {
            spaces += 1;
        }
    }
    level + spaces / width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_width() {
        assert_eq!(ConvertOptions::default().indent_width, 4);
    }

    #[test]
    fn test_zero_width_rejected() {
        assert_eq!(
            ConvertOptions::with_indent_width(0),
            Err(OptionsError::InvalidIndentWidth(0))
        );
        assert_eq!(
            ConvertOptions::with_indent_width(2).map(|o| o.indent_width),
            Ok(2)
        );
    }

    #[test]
    fn test_leading_whitespace() {
        assert_eq!(leading_whitespace("  \tfoo "), "  \t");
        assert_eq!(leading_whitespace("foo"), "");
        assert_eq!(leading_whitespace("   "), "   ");
        assert_eq!(leading_whitespace(""), "");
    }

    #[test]
    fn test_normalize_full_units() {
        assert_eq!(normalize_leading_whitespace("    code", 4), "\tcode");
        assert_eq!(normalize_leading_whitespace("        code", 4), "\t\tcode");
    }

    #[test]
    fn test_normalize_keeps_remainder() {
        assert_eq!(normalize_leading_whitespace("      x", 4), "\t  x");
        assert_eq!(normalize_leading_whitespace("  x", 4), "  x");
    }

    #[test]
    fn test_normalize_mixed_runs() {
        assert_eq!(normalize_leading_whitespace("\t    x", 4), "\t\tx");
        assert_eq!(normalize_leading_whitespace("  \tx", 4), "  \tx");
    }

    #[test]
    fn test_normalize_only_touches_leading_whitespace() {
        assert_eq!(normalize_leading_whitespace("a    b", 4), "a    b");
        assert_eq!(normalize_leading_whitespace("    a    b", 4), "\ta    b");
    }

    #[test]
    fn test_normalize_borrows_when_unchanged() {
        assert!(matches!(
            normalize_leading_whitespace("\tfoo", 4),
            Cow::Borrowed(_)
        ));
        assert!(matches!(
            normalize_leading_whitespace("  foo", 4),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_normalize_custom_width() {
        assert_eq!(normalize_leading_whitespace("     x", 2), "\t\t x");
    }

    #[test]
    fn test_indent_level() {
        assert_eq!(indent_level("foo", 4), 0);
        assert_eq!(indent_level("  foo", 4), 0);
        assert_eq!(indent_level("    foo", 4), 1);
        assert_eq!(indent_level("\t\tfoo", 4), 2);
        assert_eq!(indent_level("\t      foo", 4), 2);
        assert_eq!(indent_level("  \tfoo", 4), 1);
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" \t "));
        assert!(!is_blank("  x"));
    }
}
