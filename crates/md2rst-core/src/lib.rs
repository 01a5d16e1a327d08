//! md2rst-core: Core library for converting Markdown to reStructuredText
//!
//! This crate provides:
//! - Inline markup rewriting (autolinks, hyperlinks, bold, emphasis)
//! - Line classification (preformatted, heading, forced line break)
//! - Whole-document conversion
//!
//! Conversion works line by line and never fails: malformed or unfinished
//! markup is passed through as literal text.
//!
//! # Example
//!
//! ```
//! use md2rst_core::convert;
//!
//! let rst = convert("#Title\nSee <https://example.com>");
//! assert_eq!(rst, "Title\n=====\n\nSee https://example.com");
//! ```

pub mod block;
pub mod context;
pub mod convert;
pub mod indent;
pub mod inline;

pub use block::{Expanded, LineKind, classify, classify_and_expand};
pub use context::LineContext;
pub use convert::{
    LineEvent, LogTrace, NoTrace, Trace, convert, convert_with_options, convert_with_trace,
};
pub use indent::{ConvertOptions, DEFAULT_INDENT_WIDTH, OptionsError};
pub use inline::{SpanMatch, rewrite_inline};
