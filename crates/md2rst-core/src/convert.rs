//! Markdown to reStructuredText document conversion
//!
//! Drives the per-line passes over a whole document: every source line is
//! rewritten by [`crate::inline`], classified and expanded by
//! [`crate::block`], and the resulting lines are joined with `\n`.

use crate::block::{LineKind, classify_and_expand};
use crate::context::LineContext;
use crate::indent::ConvertOptions;
use crate::inline::rewrite_inline;

/// One converted source line, as reported to a [`Trace`]
#[derive(Debug, Clone, Copy)]
pub struct LineEvent<'a> {
    /// Zero-based index of the source line
    pub index: usize,
    /// Line as it appears in the input
    pub source: &'a str,
    /// Line after inline rewriting
    pub rewritten: &'a str,
    pub kind: LineKind,
    /// Lines emitted for this source line
    pub output: &'a [String],
}

/// Receives an event for every converted line
pub trait Trace {
    fn line(&self, event: &LineEvent<'_>);
}

/// Discards all events
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl Trace for NoTrace {
    fn line(&self, _event: &LineEvent<'_>) {}
}

/// Forwards events to the `log` facade at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTrace;

impl Trace for LogTrace {
    fn line(&self, event: &LineEvent<'_>) {
        log::debug!(
            target: "md2rst::convert",
            "line {}: {} {:?} (rewritten {:?}) -> {:?}",
            event.index + 1,
            event.kind,
            event.source,
            event.rewritten,
            event.output
        );
    }
}

/// Convert a Markdown document to reStructuredText
pub fn convert(text: &str) -> String {
    convert_with_options(text, &ConvertOptions::default())
}

/// Convert a Markdown document to reStructuredText with options
pub fn convert_with_options(text: &str, options: &ConvertOptions) -> String {
    convert_with_trace(text, options, &NoTrace)
}

/// Convert a Markdown document, reporting every line to `trace`
pub fn convert_with_trace(text: &str, options: &ConvertOptions, trace: &dyn Trace) -> String {
    let converter = Converter::new(options, trace);
    converter.convert_document(text)
}

/// Converter state
struct Converter<'a> {
    options: &'a ConvertOptions,
    trace: &'a dyn Trace,
}

impl<'a> Converter<'a> {
    fn new(options: &'a ConvertOptions, trace: &'a dyn Trace) -> Self {
        Self { options, trace }
    }

    fn convert_document(&self, text: &str) -> String {
        let lines: Vec<&str> = text.split('\n').collect();
        let mut output = Vec::with_capacity(lines.len());

        for index in 0..lines.len() {
            output.extend(self.convert_line(&lines, index));
        }

        output.join("\n")
    }

    fn convert_line(&self, lines: &[&str], index: usize) -> Vec<String> {
        let context = LineContext::new(lines, index);
        let source = lines[index];

        let rewritten = rewrite_inline(source, &context, self.options);
        let expanded = classify_and_expand(&rewritten, &context, self.options);

        self.trace.line(&LineEvent {
            index,
            source,
            rewritten: &rewritten,
            kind: expanded.kind,
            output: &expanded.lines,
        });

        expanded.into_lines()
    }
}

#[cfg(test)]
mod tests;
