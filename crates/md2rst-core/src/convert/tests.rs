use super::*;
use std::cell::RefCell;

#[derive(Default)]
struct Recorder {
    events: RefCell<Vec<(usize, LineKind, Vec<String>)>>,
    rewritten: RefCell<Vec<String>>,
}

impl Trace for Recorder {
    fn line(&self, event: &LineEvent<'_>) {
        self.events
            .borrow_mut()
            .push((event.index, event.kind, event.output.to_vec()));
        self.rewritten.borrow_mut().push(event.rewritten.to_string());
    }
}

#[test]
fn test_heading() {
    assert_eq!(convert("#Title\n"), "Title\n=====\n");
}

#[test]
fn test_heading_with_spacing() {
    assert_eq!(convert("#  My Title  "), "My Title\n========");
}

#[test]
fn test_autolink() {
    assert_eq!(
        convert("See <http://example.com> here"),
        "See http://example.com here"
    );
}

#[test]
fn test_hyperlink_with_title() {
    assert_eq!(
        convert("[Go](https://go.dev \"lang\")"),
        "`Go <https://go.dev>`_"
    );
}

#[test]
fn test_bold_and_emphasis() {
    assert_eq!(convert("__bold__ and _em_"), "**bold** and *em*");
}

#[test]
fn test_escaped_bold() {
    assert_eq!(convert("\\__not bold__"), "\\__not bold__");
}

#[test]
fn test_empty_document() {
    assert_eq!(convert(""), "");
    assert_eq!(convert("\n"), "\n");
}

#[test]
fn test_plain_lines_preserved() {
    let doc = "A paragraph.\n\nAnother paragraph.\n";
    assert_eq!(convert(doc), doc);
}

#[test]
fn test_forced_break_between_paragraph_lines() {
    assert_eq!(convert("line one\nline two"), "line one\n\nline two");
}

#[test]
fn test_deeper_indentation_not_separated() {
    assert_eq!(convert("line one\n  \tdeeper"), "line one\n  \tdeeper");
}

#[test]
fn test_preformatted_block() {
    let input = "Example:\n\tlet a_b = c * d - e;\n\t// \\n";
    let expected = "Example:\n\n\tlet a\\_b = c \\* d \\- e;\n\n\t// \\\\n";
    assert_eq!(convert(input), expected);
}

#[test]
fn test_preformatted_after_blank_line() {
    assert_eq!(convert("Example:\n\n    code_here"), "Example:\n\n\tcode\\_here");
}

#[test]
fn test_preformatted_first_line() {
    assert_eq!(convert("\t*x*"), "\t\\*x\\*");
}

#[test]
fn test_heading_underline_not_separated() {
    let input = "Title\n=====\nBody text";
    assert_eq!(convert(input), input);
}

#[test]
fn test_list_items_separated() {
    assert_eq!(convert("* one\n* two"), "* one\n\n* two");
}

#[test]
fn test_inline_rewrite_then_heading() {
    assert_eq!(
        convert("# See [docs](https://d.io)"),
        "See `docs <https://d.io>`_\n=========================="
    );
}

#[test]
fn test_custom_indent_width() {
    let options = ConvertOptions::with_indent_width(2).unwrap();
    assert_eq!(
        convert_with_options("Text:\n  a_b", &options),
        "Text:\n\n\ta\\_b"
    );
}

#[test]
fn test_deterministic() {
    let doc = "#Project\n\nSome _text_ with <https://x.y>.\nNext line\n\tcode -x\n* a\n* b";
    assert_eq!(convert(doc), convert(doc));
}

#[test]
fn test_never_removes_lines() {
    let docs = [
        "",
        "a",
        "a\nb\nc",
        "#T\n\tx\n\n\ty\n- z",
        "* a\n  * b\n* c\n\n  wrapped\ntext",
    ];
    for doc in docs {
        let input_lines = doc.split('\n').count();
        let output_lines = convert(doc).split('\n').count();
        assert!(output_lines >= input_lines, "lost lines converting {:?}", doc);
    }
}

#[test]
fn test_unterminated_markup_left_alone() {
    let doc = "[label]( and <http://x and __open";
    assert_eq!(convert(doc), doc);
}

#[test]
fn test_trace_receives_every_line() {
    let recorder = Recorder::default();
    let out = convert_with_trace(
        "#Title\nfirst\nsecond\n\tcode",
        &ConvertOptions::default(),
        &recorder,
    );
    assert_eq!(out, "Title\n=====\n\nfirst\n\nsecond\n\n\tcode");

    let events = recorder.events.borrow();
    let kinds: Vec<_> = events.iter().map(|(i, kind, _)| (*i, *kind)).collect();
    assert_eq!(
        kinds,
        vec![
            (0, LineKind::Heading),
            (1, LineKind::ForcedBreak),
            (2, LineKind::ForcedBreak),
            (3, LineKind::Preformatted),
        ]
    );
    assert_eq!(events[0].2, vec!["Title", "====="]);
}

#[test]
fn test_previous_line_is_source_line() {
    // The heading source line starts with '#', not '=', so the next line
    // is compared against it and gets a break.
    assert_eq!(convert("#T\nbody"), "T\n=\n\nbody");
}

#[test]
fn test_trace_sees_rewritten_line() {
    let recorder = Recorder::default();
    convert_with_trace(
        "#  [Go](https://go.dev)\n\ta_b",
        &ConvertOptions::default(),
        &recorder,
    );

    assert_eq!(
        *recorder.rewritten.borrow(),
        vec!["#  `Go <https://go.dev>`_", "\ta\\_b"]
    );
}

#[test]
fn test_autolink_inside_bold_and_link_target() {
    assert_eq!(convert("__see <http://x.y>__"), "**see http://x.y**");
    assert_eq!(convert("[x](<http://a.b>)"), "`x <http://a.b>`_");
}

#[test]
fn test_escaped_bracket_before_link() {
    assert_eq!(convert(r"\[[a](http://b)"), r"\[`a <http://b>`_");
    assert_eq!(convert(r"\<<http://x.y>"), r"\<http://x.y");
}
