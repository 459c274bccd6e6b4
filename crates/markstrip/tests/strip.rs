#![allow(missing_docs)]

mod common;

use insta::assert_snapshot;
use markstrip::{
    EntityTable, MarkupStripper, StripOptions, Stripper, normalize_space, produce_chunks,
    strip_markup,
};
use rstest::rstest;

#[test]
fn documented_examples() {
    assert_eq!(strip_markup("<b>hello</b>"), "hello");
    assert_eq!(strip_markup("a <!-- comment --> b"), "a  b");
    assert_eq!(strip_markup("&amp;&lt;&gt;"), "&<>");
    assert_eq!(strip_markup("<p>unterminated"), "unterminated");
    assert_eq!(strip_markup("<p unterminated"), "");
    assert_eq!(strip_markup(""), "");
    assert_eq!(strip_markup(None), "");
    assert_eq!(normalize_space("  a\u{A0}\u{A0} b   c  "), "a b c");
    assert_eq!(normalize_space(None), "");
}

#[rstest]
#[case::attribute_gt("<a title=\"a > b\">link</a>", " b\">link")]
#[case::attribute_lt("<a title=\"a < b\">link</a>", "link")]
#[case::uppercase_tags("<P>One</P><BR>Two", "OneTwo")]
#[case::inline_style("x<style type=\"text/css\">p > a { color: red }</style>y", "xy")]
#[case::script_with_markup("<script>document.write('<b>hi</b>')</script>done", "done")]
#[case::script_end_with_space("a<script>1</script\n>b", "ab")]
#[case::comment_with_dashes("a<!-- a -- b --->c", "ac")]
#[case::empty_comment("a<!---->b", "ab")]
#[case::processing_instruction("<?php echo 1; ?>text", "text")]
#[case::numeric_entities("&#169; &#xA9; &#XA9;", "© © ©")]
#[case::astral_entity("&#x1F41F;", "🐟")]
#[case::bare_ampersand("AT&T & co", "AT&T & co")]
#[case::long_entity("&abcdefghijklmnopqrstuvwxyzabcdefghij;", "&abcdefghijklmnopqrstuvwxyzabcdefghij;")]
fn strips(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(strip_markup(input), expected);
}

#[test]
fn snapshot_article() {
    let text = Stripper::default().strip(common::ARTICLE);
    assert_snapshot!(common::readable_lines(&text), @r"
    Fish & Chips — a history
    Fish & Chips
    First served in 1860, “chippies” cost £0.02.
    Temperature > 180°C & oil < 3 cm.
    raw <data> & stuff
    Unknown &entity; stays.
    ");
}

#[test]
fn article_streamed_in_any_chunking() {
    let expected = Stripper::default().strip(common::ARTICLE);
    for parts in [2, 3, 7, 64, common::ARTICLE.len()] {
        let mut stripper = MarkupStripper::new(&StripOptions::default());
        let mut text = String::new();
        for chunk in produce_chunks(common::ARTICLE, parts) {
            for piece in stripper.feed(chunk) {
                text.push_str(piece.as_str());
            }
        }
        for piece in stripper.finish() {
            text.push_str(piece.as_str());
        }
        assert_eq!(text, expected, "parts: {parts}");
    }
}

#[test]
fn custom_entities_and_opaque_elements() {
    let options = StripOptions {
        opaque_elements: vec!["template".into()],
        ..StripOptions::default()
    };
    let entities = EntityTable::new()
        .with_entity("company", "ACME")
        .with_entity("amp", "and");
    let stripper = Stripper::with_entities(&options, entities);
    assert_eq!(
        stripper.strip("&company; &amp; sons<template><b>x</b></template><script>y</script>"),
        "ACME and sonsy"
    );
}

#[test]
fn stripper_shared_across_threads() {
    let stripper = Stripper::default();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let stripper = &stripper;
                scope.spawn(move || stripper.strip(&format!("<i>{i}</i>&amp;")))
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), format!("{i}&"));
        }
    });
}
