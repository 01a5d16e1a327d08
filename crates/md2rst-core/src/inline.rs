//! Inline markup rewriting
//!
//! Rewrites the parts of a single line whose Markdown spelling has no
//! compatible reStructuredText equivalent:
//!
//! | Markdown | reStructuredText |
//! |----------|------------------|
//! | `<https://example.com>` | `https://example.com` |
//! | `[label](url "title")` | `` `label <url>`_ `` |
//! | `__bold__` | `**bold**` |
//! | `_emphasis_` | `*emphasis*` |
//!
//! Preformatted (indented) lines are not rewritten. Instead, every character
//! RST could interpret inside them is backslash-escaped.
//!
//! Constructs are applied one after another in the order above. An unwrapped
//! autolink is plain URL text and stays visible to the later constructs, but
//! RST markup produced by a hyperlink, bold or emphasis span is never scanned
//! again, so the trailing `_` of an RST hyperlink cannot be mistaken for an
//! emphasis delimiter.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::context::LineContext;
use crate::indent::{ConvertOptions, normalize_leading_whitespace};

/// Characters escaped inside preformatted lines
const PREFORMATTED_SPECIAL: [char; 4] = ['\\', '*', '-', '_'];

static AUTOLINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<(?P<url>(?:https?|ftp|smb|file)://[^>]+)>").expect("Invalid autolink regex")
});

static HYPERLINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\[(?P<label>(?:\\.|[^\]\\])*)\]\([ \t]*(?P<url>[^\s)]+)(?:[ \t]+(?P<title>"[^"]*"|'[^']*'))?[ \t]*\)"#,
    )
    .expect("Invalid hyperlink regex")
});

static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^__(?P<text>(?:\\.|[^_\\])+)__").expect("Invalid bold regex")
});

static EMPHASIS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^_(?P<text>(?:\\.|[^_\\])+)_").expect("Invalid emphasis regex")
});

/// An inline construct: where it starts, what it looks like, and how to
/// spell it in RST
pub struct Construct {
    /// Name used in diagnostics
    pub name: &'static str,
    /// Literal text every occurrence starts with
    pub start: &'static str,
    /// Whether an escaped start delimiter also escapes the rest of its
    /// character run (`\__` must not reopen as `_`)
    escape_run: bool,
    /// Whether the replacement is final RST markup, hidden from later
    /// constructs
    markup: bool,
    /// Pattern anchored at the start delimiter, ending after the end delimiter
    pattern: &'static LazyLock<Regex>,
    render: fn(&SpanMatch<'_>) -> String,
}

impl Construct {
    /// Try to match the construct at byte offset `start` of `text`
    pub fn match_at<'t>(&self, text: &'t str, start: usize) -> Option<SpanMatch<'t>> {
        let captures = self.pattern.captures(&text[start..])?;
        let len = captures.get(0)?.end();
        Some(SpanMatch {
            start,
            end: start + len,
            captures,
        })
    }

    /// RST replacement for a matched span
    pub fn render(&self, span: &SpanMatch<'_>) -> String {
        (self.render)(span)
    }
}

impl std::fmt::Debug for Construct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Construct")
            .field("name", &self.name)
            .field("start", &self.start)
            .finish()
    }
}

/// A located construct within a piece of text
#[derive(Debug)]
pub struct SpanMatch<'t> {
    /// Byte offset of the start delimiter
    pub start: usize,
    /// Byte offset just past the end delimiter
    pub end: usize,
    captures: Captures<'t>,
}

impl<'t> SpanMatch<'t> {
    /// A named capture, or the empty string if it did not participate
    pub fn field(&self, name: &str) -> &'t str {
        self.captures.name(name).map_or("", |m| m.as_str())
    }
}

pub static AUTOLINK: Construct = Construct {
    name: "autolink",
    start: "<",
    escape_run: false,
    markup: false,
    pattern: &AUTOLINK_RE,
    render: render_autolink,
};

pub static HYPERLINK: Construct = Construct {
    name: "hyperlink",
    start: "[",
    escape_run: false,
    markup: true,
    pattern: &HYPERLINK_RE,
    render: render_hyperlink,
};

pub static BOLD: Construct = Construct {
    name: "bold",
    start: "__",
    escape_run: true,
    markup: true,
    pattern: &BOLD_RE,
    render: render_bold,
};

pub static EMPHASIS: Construct = Construct {
    name: "emphasis",
    start: "_",
    escape_run: true,
    markup: true,
    pattern: &EMPHASIS_RE,
    render: render_emphasis,
};

/// Constructs in the order they are applied. Bold must come before
/// emphasis so that `__` is consumed before single underscores are looked at.
pub static CONSTRUCTS: [&Construct; 4] = [&AUTOLINK, &HYPERLINK, &BOLD, &EMPHASIS];

fn render_autolink(span: &SpanMatch<'_>) -> String {
    span.field("url").to_string()
}

fn render_hyperlink(span: &SpanMatch<'_>) -> String {
    let label = span.field("label").trim();
    let url = span.field("url").trim();
    if label.is_empty() {
        format!("`<{}>`_", url)
    } else {
        format!("`{} <{}>`_", label, url)
    }
}

fn render_bold(span: &SpanMatch<'_>) -> String {
    format!("**{}**", span.field("text"))
}

fn render_emphasis(span: &SpanMatch<'_>) -> String {
    format!("*{}*", span.field("text"))
}

/// Piece of a line during rewriting
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Original text, still subject to later constructs
    Literal(String),
    /// Output of a construct
    Markup(String),
}

impl Segment {
    fn into_text(self) -> String {
        match self {
            Segment::Literal(s) | Segment::Markup(s) => s,
        }
    }
}

/// Rewrite the inline markup of one line.
///
/// Lines that are preformatted once leading whitespace is normalized are
/// escaped with [`escape_preformatted`] instead. `context` does not affect
/// any current construct.
pub fn rewrite_inline(line: &str, _context: &LineContext<'_>, options: &ConvertOptions) -> String {
    if is_preformatted(line, options) {
        return escape_preformatted(line);
    }

    let mut segments = vec![Segment::Literal(line.to_string())];
    for construct in CONSTRUCTS {
        segments = segments
            .into_iter()
            .flat_map(|segment| match segment {
                Segment::Literal(text) => scan(&text, construct),
                markup => vec![markup],
            })
            .collect();
    }

    segments.into_iter().map(Segment::into_text).collect()
}

/// Whether the line starts with a tab once leading spaces are normalized
pub fn is_preformatted(line: &str, options: &ConvertOptions) -> bool {
    normalize_leading_whitespace(line, options.unit()).starts_with('\t')
}

/// Backslash-escape every RST-significant character of a preformatted line
pub fn escape_preformatted(line: &str) -> String {
    let mut escaped = String::with_capacity(line.len());
    for c in line.chars() {
        if PREFORMATTED_SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Replace every occurrence of `construct` in `text`.
///
/// Start delimiters preceded by an odd number of backslashes are literal.
/// A delimiter that does not begin a full match is kept as literal text and
/// scanning resumes right after it; after a match scanning resumes right
/// after the end delimiter.
pub fn replace_sections(text: &str, construct: &Construct) -> String {
    scan(text, construct)
        .into_iter()
        .map(Segment::into_text)
        .collect()
}

fn scan(text: &str, construct: &Construct) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut pos = 0;

    while let Some(found) = text[pos..].find(construct.start) {
        let idx = pos + found;

        if is_escaped(text, idx) {
            let skip_to = if construct.escape_run {
                delimiter_run_end(text, idx, construct.start)
            } else {
                idx + construct.start.len()
            };
            literal.push_str(&text[pos..skip_to]);
            pos = skip_to;
            continue;
        }

        literal.push_str(&text[pos..idx]);
        match construct.match_at(text, idx) {
            Some(span) => {
                let replacement = construct.render(&span);
                log::trace!(
                    target: "md2rst::inline",
                    "{} at {}..{}: {:?}",
                    construct.name,
                    span.start,
                    span.end,
                    replacement
                );
                if construct.markup {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Markup(replacement));
                } else {
                    literal.push_str(&replacement);
                }
                pos = span.end;
            }
            None => {
                literal.push_str(construct.start);
                pos = idx + construct.start.len();
            }
        }
    }

    literal.push_str(&text[pos..]);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

/// Whether the byte at `idx` is preceded by an odd run of backslashes
fn is_escaped(text: &str, idx: usize) -> bool {
    text[..idx].bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

/// End of the run of the delimiter's first character starting at `idx`
fn delimiter_run_end(text: &str, idx: usize, delimiter: &str) -> usize {
    let Some(first) = delimiter.chars().next() else {
        return idx;
    };
    let run: usize = text[idx..]
        .chars()
        .take_while(|&c| c == first)
        .map(char::len_utf8)
        .sum();
    idx + run.max(delimiter.len())
}
