use alloc::string::String;

const NO_BREAK_SPACE: char = '\u{A0}';

/// Collapses whitespace in `text`.
///
/// No-break spaces become ordinary spaces, leading and trailing whitespace is
/// removed, and every run of two or more whitespace characters becomes a
/// single space. A lone whitespace character between words is kept as is.
/// `None` yields an empty string.
///
/// The result is a fixed point: normalizing it again changes nothing.
///
/// ```rust
/// use markstrip::normalize_space;
///
/// assert_eq!(normalize_space("  a\u{A0}\u{A0} b   c  "), "a b c");
/// assert_eq!(normalize_space("a\tb"), "a\tb");
/// assert_eq!(normalize_space(None), "");
/// ```
#[must_use]
pub fn normalize_space<'a>(text: impl Into<Option<&'a str>>) -> String {
    let Some(text) = text.into() else {
        return String::new();
    };
    let mut out = String::with_capacity(text.len());
    // First character of the pending whitespace run and its length.
    let mut run: Option<(char, usize)> = None;
    for ch in text.chars() {
        let ch = if ch == NO_BREAK_SPACE { ' ' } else { ch };
        if ch.is_whitespace() {
            run = Some(match run {
                Some((first, len)) => (first, len + 1),
                None => (ch, 1),
            });
            continue;
        }
        if let Some((first, len)) = run.take() {
            if !out.is_empty() {
                out.push(if len == 1 { first } else { ' ' });
            }
        }
        out.push(ch);
    }
    out
}
