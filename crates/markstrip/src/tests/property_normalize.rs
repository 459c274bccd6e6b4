use alloc::{string::String, vec::Vec};

use quickcheck::QuickCheck;

use super::arbitrary::MarkupDoc;
use crate::{Stripper, normalize_space};

/// Property: normalizing twice is the same as normalizing once.
#[test]
fn normalize_idempotent_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(text: String, doc: MarkupDoc) -> bool {
        [text, Stripper::default().strip(&doc.0)].iter().all(|input| {
            let once = normalize_space(input.as_str());
            normalize_space(once.as_str()) == once
        })
    }

    QuickCheck::new()
        .tests(if is_ci::cached() { 10_000 } else { 1_000 })
        .quickcheck(prop as fn(String, MarkupDoc) -> bool);
}

/// Property: words joined by single spaces are already normal.
#[test]
fn normalized_words_identity_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(words: Vec<String>) -> bool {
        let words: Vec<String> = words
            .iter()
            .map(|w| w.chars().filter(|c| !c.is_whitespace() && *c != '\u{A0}').collect())
            .filter(|w: &String| !w.is_empty())
            .collect();
        let text = words.join(" ");
        normalize_space(text.as_str()) == text
    }

    QuickCheck::new()
        .tests(if is_ci::cached() { 10_000 } else { 1_000 })
        .quickcheck(prop as fn(Vec<String>) -> bool);
}

/// Property: the result has no leading, trailing or doubled whitespace and
/// no no-break spaces.
#[test]
fn normalized_shape_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(text: String) -> bool {
        let out = normalize_space(text.as_str());
        let chars: Vec<char> = out.chars().collect();
        !out.contains('\u{A0}')
            && chars.first().is_none_or(|c| !c.is_whitespace())
            && chars.last().is_none_or(|c| !c.is_whitespace())
            && chars
                .windows(2)
                .all(|pair| !(pair[0].is_whitespace() && pair[1].is_whitespace()))
    }

    QuickCheck::new()
        .tests(if is_ci::cached() { 10_000 } else { 1_000 })
        .quickcheck(prop as fn(String) -> bool);
}
