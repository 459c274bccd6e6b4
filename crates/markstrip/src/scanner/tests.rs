use alloc::{
    format,
    string::{String, ToString},
    vec::Vec,
};
use core::fmt::Write as _;

use insta::assert_snapshot;

use super::MarkupScanner;
use crate::{
    chunk_utils::produce_chunks,
    options::StripOptions,
    span::{Capture, Markup, MarkupKind, Position, Span},
};

fn scan_chunks(options: &StripOptions, chunks: &[&str]) -> Vec<Span<'static>> {
    let mut scanner = MarkupScanner::new(options);
    let mut spans = Vec::new();
    for chunk in chunks {
        spans.extend(scanner.feed(chunk).map(Span::into_owned));
    }
    spans.extend(scanner.finish());
    spans
}

fn scan(input: &str) -> Vec<Span<'static>> {
    scan_chunks(&StripOptions::default(), &[input])
}

/// Merges adjacent text spans, whose boundaries depend on chunking.
fn merge_text(spans: Vec<Span<'static>>) -> Vec<Span<'static>> {
    let mut merged: Vec<Span<'static>> = Vec::with_capacity(spans.len());
    for span in spans {
        if let (Some(Span::Text(prev)), Span::Text(next)) = (merged.last_mut(), &span) {
            let mut text = core::mem::replace(prev, Capture::Borrowed("")).into_owned();
            text.push_str(next.as_str());
            *prev = Capture::Owned(text);
            continue;
        }
        merged.push(span);
    }
    merged
}

/// Text as written, entities re-rendered as `&body;`, markup dropped.
fn visible(spans: &[Span<'_>]) -> String {
    let mut out = String::new();
    for span in spans {
        match span {
            Span::Text(text) => out.push_str(text.as_str()),
            Span::Entity(body) => {
                let _ = write!(out, "&{body};");
            }
            Span::Markup(_) => {}
        }
    }
    out
}

fn describe(spans: &[Span<'_>]) -> String {
    let mut out = String::new();
    for span in spans {
        match span {
            Span::Text(text) => {
                let _ = writeln!(out, "text {:?}", text.as_str());
            }
            Span::Entity(body) => {
                let _ = writeln!(out, "entity {:?}", body.as_str());
            }
            Span::Markup(m) => {
                let _ = write!(out, "{:?} {} +{}", m.kind, m.start, m.len);
                let _ = writeln!(out, "{}", if m.terminated { "" } else { " unterminated" });
            }
        }
    }
    out.trim_end().to_string()
}

const CASES: &[(&str, &str)] = &[
    ("<b>hello</b>", "hello"),
    ("a <!-- comment --> b", "a  b"),
    ("x<script>if (a < b) {}</script>y", "xy"),
    ("x<SCRIPT>1</Script >y", "xy"),
    ("x<script>a</scripts>b</script>y", "xy"),
    ("x<style>a</st</style>y", "xy"),
    ("1 < 2 and 3 <= 4", "1 < 2 and 3 <= 4"),
    ("a<", "a<"),
    ("a< b", "a< b"),
    ("<<b>>", "<>"),
    ("<![CDATA[x<y]]>", "x<y"),
    ("<![CDATA[a]]]>", "a]"),
    ("<![CDATA[a]b]]c]]>", "a]b]]c"),
    ("a<!DOCTYPE html>b", "ab"),
    ("a<!-x>b", "ab"),
    ("a<?xml version=\"1.0\"?>b", "ab"),
    ("a<br/>b", "ab"),
    ("<p unterminated", ""),
    ("<p>unterminated", "unterminated"),
    ("a<!-->b-->c", "ac"),
    ("a<!---->b", "ab"),
    ("fish &amp chips", "fish &amp chips"),
    ("&lt;b&gt;", "&lt;b&gt;"),
    ("&;", "&;"),
    ("a & b", "a & b"),
    ("<script/>text", "text"),
    ("<scriptx>a</scriptx>", "a"),
    ("a<style>b", "a"),
    ("<a href=\"x>y\">link</a>", "y\">link"),
    ("π<i>≈</i>3.14", "π≈3.14"),
];

#[test]
fn visible_text_of_case() {
    for (input, expected) in CASES {
        assert_eq!(visible(&scan(input)), *expected, "input: {input:?}");
    }
}

#[test]
fn spans_independent_of_chunking() {
    for (input, _) in CASES {
        let whole = merge_text(scan(input));
        for parts in 1..=input.chars().count() {
            let chunks = produce_chunks(input, parts);
            let chunked = merge_text(scan_chunks(&StripOptions::default(), &chunks));
            assert_eq!(chunked, whole, "input: {input:?}, chunks: {chunks:?}");
        }

        let singles: Vec<String> = input.chars().map(String::from).collect();
        let singles: Vec<&str> = singles.iter().map(String::as_str).collect();
        let chunked = merge_text(scan_chunks(&StripOptions::default(), &singles));
        assert_eq!(chunked, whole, "input: {input:?} fed char by char");
    }
}

#[test]
fn snapshot_document_spans() {
    let input = "<p class=\"x\">Fish &amp; chips</p><!-- c --><script>x</script>";
    assert_snapshot!(describe(&scan(input)), @r#"
    Tag 1:1 +13
    text "Fish "
    entity "amp"
    text " chips"
    Tag 1:30 +4
    Comment 1:34 +10
    Tag 1:44 +8
    OpaqueBlock 1:52 +10
    "#);
}

#[test]
fn text_within_one_chunk_is_borrowed() {
    let mut scanner = MarkupScanner::new(&StripOptions::default());
    let spans: Vec<_> = scanner.feed("hello <b>world</b>").collect();
    assert_eq!(spans[0], Span::Text(Capture::Borrowed("hello ")));
    assert_eq!(spans[2], Span::Text(Capture::Borrowed("world")));
}

#[test]
fn text_across_chunks_is_owned() {
    let spans = merge_text(scan_chunks(&StripOptions::default(), &["&am", "p;x"]));
    assert_eq!(
        spans,
        [
            Span::Entity(Capture::Owned("amp".to_string())),
            Span::Text(Capture::Owned("x".to_string())),
        ]
    );
}

#[test]
fn unterminated_comment_is_reported() {
    let spans = scan("a<!-- x");
    assert_eq!(
        spans.last(),
        Some(&Span::Markup(Markup {
            kind: MarkupKind::Comment,
            start: Position {
                offset: 1,
                line: 1,
                column: 2,
            },
            len: 6,
            terminated: false,
        }))
    );
}

#[test]
fn markup_positions_span_lines() {
    let spans = scan("a\n<br>\n  <hr/>");
    let starts: Vec<_> = spans
        .iter()
        .filter_map(|span| match span {
            Span::Markup(m) => Some(format!("{} +{}", m.start, m.len)),
            _ => None,
        })
        .collect();
    assert_eq!(starts, ["2:1 +4", "3:3 +5"]);
}

#[test]
fn unterminated_cdata_keeps_content() {
    let spans = scan("<![CDATA[abc]");
    assert_eq!(visible(&spans), "abc]");
    assert!(matches!(
        spans.last(),
        Some(Span::Markup(Markup {
            kind: MarkupKind::CData,
            terminated: false,
            ..
        }))
    ));
}

#[test]
fn entity_length_is_bounded() {
    let options = StripOptions {
        max_entity_len: 4,
        ..StripOptions::default()
    };
    let spans = scan_chunks(&options, &["&abcd; &abcde;"]);
    assert_eq!(
        spans,
        [
            Span::Entity(Capture::Owned("abcd".to_string())),
            Span::Text(Capture::Owned(" ".to_string())),
            Span::Text(Capture::Owned("&abcde;".to_string())),
        ]
    );
}

#[test]
fn custom_opaque_elements() {
    let options = StripOptions {
        opaque_elements: ["noscript".to_string()].to_vec(),
        ..StripOptions::default()
    };
    let spans = scan_chunks(&options, &["a<noscript>b</noscript>c<script>d</script>"]);
    assert_eq!(visible(&spans), "acd");

    let spans = scan_chunks(&StripOptions::without_opaque_elements(), &["<style>p{}</style>"]);
    assert_eq!(visible(&spans), "p{}");
}

#[test]
fn dropped_iterator_keeps_unread_input() {
    let mut scanner = MarkupScanner::new(&StripOptions::default());
    let first = scanner.feed("a<b>c").next();
    assert_eq!(first, Some(Span::Text(Capture::Borrowed("a"))));

    let rest: Vec<_> = scanner.finish().collect();
    assert_eq!(visible(&rest), "c");
    assert!(matches!(
        rest[0],
        Span::Markup(Markup {
            kind: MarkupKind::Tag,
            start: Position { offset: 1, .. },
            len: 3,
            terminated: true,
        })
    ));
}
