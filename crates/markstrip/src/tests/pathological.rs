//! Adversarial inputs must finish in time linear in their length.

use alloc::{format, string::String};
use std::time::Duration;

use rstest::rstest;

use crate::{Stripper, strip_markup};

const N: usize = 1_000_000;

#[rstest]
#[timeout(Duration::from_millis(10_000))]
fn many_unmatched_lt_are_literal() {
    let input = "<".repeat(N);
    assert_eq!(strip_markup(input.as_str()), input);
}

#[rstest]
#[timeout(Duration::from_millis(10_000))]
fn lt_before_spaces_are_literal() {
    let input = "< ".repeat(N / 2);
    assert_eq!(strip_markup(input.as_str()), input);
}

#[rstest]
#[timeout(Duration::from_millis(10_000))]
fn unterminated_comment_is_dropped() {
    let input = format!("keep<!--{}", "- -> --!>".repeat(N / 10));
    assert_eq!(strip_markup(input.as_str()), "keep");
}

#[rstest]
#[timeout(Duration::from_millis(10_000))]
fn unterminated_tag_is_dropped() {
    let input = format!("keep<a{}", " x=\"<y\"".repeat(N / 8));
    assert_eq!(strip_markup(input.as_str()), "keep");
}

#[rstest]
#[timeout(Duration::from_millis(10_000))]
fn unterminated_script_with_near_misses() {
    let input = format!("keep<script>{}", "</scrip</script".repeat(N / 16));
    assert_eq!(strip_markup(input.as_str()), "keep");
}

#[rstest]
#[timeout(Duration::from_millis(10_000))]
fn entity_without_terminator_fails_open() {
    let input = format!("&{}", "a".repeat(N));
    assert_eq!(strip_markup(input.as_str()), input);

    let input = "&".repeat(N);
    assert_eq!(strip_markup(input.as_str()), input);
}

#[rstest]
#[timeout(Duration::from_millis(10_000))]
fn deep_nesting() {
    let input = format!("{}x{}", "<div>".repeat(N / 10), "</div>".repeat(N / 10));
    assert_eq!(strip_markup(input.as_str()), "x");
}

#[rstest]
#[timeout(Duration::from_millis(10_000))]
fn cdata_bracket_runs() {
    let input = format!("<![CDATA[{}", "]".repeat(N));
    let out = Stripper::default().strip(&input);
    assert_eq!(out, "]".repeat(N));

    let input: String = format!("<![CDATA[{}]]>", "]]x".repeat(N / 3));
    assert_eq!(strip_markup(input.as_str()), "]]x".repeat(N / 3));
}
