//! Markup scanner: a resumable, single-pass span tokenizer.
//!
//! The scanner accepts input in chunks and yields [`Span`]s as soon as they
//! are classified. Every character is examined once; delimiter matching
//! (`-->`, `]]>`, `</script`) keeps a small amount of match progress in the
//! state rather than rescanning, so work is linear in the input.
//!
//! Text and entity spans borrow from the fed chunk when they lie entirely
//! inside it. Discarded markup is never buffered, only measured.
//!
//! Malformed input policy
//! - A `<` not followed by an ASCII letter, `/`, `!` or `?` is literal text.
//! - Markup still open at end of input is discarded and reported with
//!   `terminated: false`.
//! - An entity candidate that hits a non-name character, the length bound or
//!   end of input before `;` is emitted literally as text.
//! - `>` always terminates a tag, even inside a quoted attribute value.

mod cursor;

use alloc::string::String;
use core::mem;

use cursor::{Cursor, CursorState};

use crate::{
    options::{ScanConfig, StripOptions, is_name_char},
    span::{Flight, MarkupKind, Span},
};

const COMMENT_OPEN: &str = "--";
const CDATA_OPEN: &str = "[CDATA[";

/// What a `<` followed by `next` opens, if anything.
#[inline]
fn opens_markup(next: char) -> bool {
    next.is_ascii_alphabetic() || matches!(next, '/' | '!' | '?')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Text,
    /// Saw `<` at the end of a batch; the next character decides.
    TagOpen,
    /// Saw `<!`; matching the rest of `<!--` or `<![CDATA[`.
    Bang {
        target: Option<&'static str>,
        matched: usize,
    },
    InTag,
    InComment {
        dashes: u8,
    },
    InCData {
        brackets: u8,
    },
    /// Inside an opaque element, `matched` characters of `</name` seen.
    InOpaqueBlock {
        element: usize,
        matched: usize,
    },
    InEntity,
    Ended,
}

/// Tag being scanned. The name is only buffered as far as it could still
/// match an opaque element.
#[derive(Debug, Clone, Default)]
struct TagScan {
    name: String,
    name_done: bool,
    name_overflow: bool,
    closing: bool,
    last_slash: bool,
}

impl TagScan {
    fn start(&mut self, closing: bool) {
        self.name.clear();
        self.name_done = false;
        self.name_overflow = false;
        self.closing = closing;
        self.last_slash = false;
    }

    /// A tag-like construct whose name is irrelevant (`<!x>`, `<?x>`, the
    /// tail of an opaque end tag).
    fn start_unnamed(&mut self, closing: bool) {
        self.start(closing);
        self.name_done = true;
    }

    fn push_name(&mut self, ch: char, limit: usize) {
        if self.name_overflow {
            return;
        }
        if self.name.len() < limit {
            self.name.push(ch.to_ascii_lowercase());
        } else {
            self.name_overflow = true;
        }
    }
}

/// Outcome of one state handler invocation.
enum Step<'src> {
    /// State changed; run the next handler.
    Continue,
    Emit(Span<'src>),
    /// The current batch is exhausted.
    NeedInput,
    /// Input ended and everything has been emitted.
    Done,
}

/// Resumable markup scanner.
///
/// Feed input with [`feed`](Self::feed) and drain the returned iterator; call
/// [`finish`](Self::finish) once the input is complete to flush trailing text
/// and report unterminated markup.
///
/// # Examples
///
/// ```rust
/// use markstrip::{Capture, MarkupKind, MarkupScanner, Span, StripOptions};
///
/// let mut scanner = MarkupScanner::new(&StripOptions::default());
/// let spans: Vec<_> = scanner.feed("<b>bold</b>").collect();
/// assert!(matches!(spans[0], Span::Markup(m) if m.kind == MarkupKind::Tag));
/// assert_eq!(spans[1], Span::Text(Capture::Borrowed("bold")));
/// assert_eq!(scanner.finish().count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MarkupScanner {
    state: ScanState,
    flight: Option<Flight>,
    tag: TagScan,
    entity_len: usize,
    carry: CursorState,
    config: ScanConfig,
}

impl MarkupScanner {
    /// Creates a scanner for `options`.
    #[must_use]
    pub fn new(options: &StripOptions) -> Self {
        Self::with_config(ScanConfig::new(options))
    }

    pub(crate) fn with_config(config: ScanConfig) -> Self {
        Self {
            state: ScanState::Text,
            flight: None,
            tag: TagScan::default(),
            entity_len: 0,
            carry: CursorState::default(),
            config,
        }
    }

    /// Feeds a chunk and returns an iterator over the spans it completes.
    ///
    /// Dropping the iterator early is allowed: unread input is kept and
    /// scanned on the next feed.
    pub fn feed<'p, 'src>(&'p mut self, chunk: &'src str) -> Spans<'p, 'src> {
        let cursor = Cursor::from_state(mem::take(&mut self.carry), chunk);
        Spans {
            scanner: self,
            cursor,
        }
    }

    /// Marks the end of input and returns an iterator over the remaining
    /// spans.
    #[must_use]
    pub fn finish(mut self) -> ClosedSpans {
        let cursor = Cursor::from_state(mem::take(&mut self.carry), "");
        ClosedSpans {
            scanner: self,
            cursor,
        }
    }

    /// Drives the state machine until it produces a span or runs out of
    /// input.
    fn next_span<'src>(&mut self, cursor: &mut Cursor<'src>, end_of_input: bool) -> Option<Span<'src>> {
        loop {
            let step = match self.state {
                ScanState::Text => self.lex_text(cursor, end_of_input),
                ScanState::TagOpen => self.lex_tag_open(cursor),
                ScanState::Bang { target, matched } => self.lex_bang(cursor, target, matched),
                ScanState::InTag => self.lex_tag(cursor),
                ScanState::InComment { dashes } => self.lex_comment(cursor, dashes),
                ScanState::InCData { brackets } => self.lex_cdata(cursor, brackets),
                ScanState::InOpaqueBlock { element, matched } => {
                    self.lex_opaque_block(cursor, element, matched)
                }
                ScanState::InEntity => self.lex_entity(cursor),
                ScanState::Ended => Step::Done,
            };
            let step = match step {
                Step::NeedInput if end_of_input => self.end_of_input(cursor),
                step => step,
            };
            match step {
                Step::Continue => {}
                Step::Emit(span) => return Some(span),
                Step::NeedInput | Step::Done => return None,
            }
        }
    }

    /// Skips one markup character, counting it toward the span in flight.
    #[inline]
    fn skip(&mut self, cursor: &mut Cursor<'_>) -> Option<char> {
        let ch = cursor.skip()?;
        if let Some(flight) = &mut self.flight {
            flight.len += 1;
        }
        Some(ch)
    }

    #[inline]
    fn skip_while(&mut self, cursor: &mut Cursor<'_>, pred: impl Fn(char) -> bool) -> Option<char> {
        let (skipped, last) = cursor.skip_while(pred);
        if let Some(flight) = &mut self.flight {
            flight.len += skipped;
        }
        last
    }

    /// Completes the span in flight.
    fn land<'src>(&mut self, terminated: bool) -> Step<'src> {
        match self.flight.take() {
            Some(flight) => Step::Emit(Span::Markup(flight.land(terminated))),
            None => Step::Continue,
        }
    }

    fn lex_text<'src>(&mut self, cursor: &mut Cursor<'src>, end_of_input: bool) -> Step<'src> {
        loop {
            let Some(ch) = cursor.peek() else {
                return match cursor.emit() {
                    Some(text) => Step::Emit(Span::Text(text)),
                    None => Step::NeedInput,
                };
            };
            match ch {
                '<' => {
                    let literal = match cursor.peek_second() {
                        Some(next) => !opens_markup(next),
                        // Last character of the input.
                        None => end_of_input,
                    };
                    if literal {
                        cursor.consume();
                        continue;
                    }
                    if let Some(text) = cursor.emit() {
                        return Step::Emit(Span::Text(text));
                    }
                    self.flight = Some(Flight::new(MarkupKind::Tag, cursor.position()));
                    self.skip(cursor);
                    self.state = ScanState::TagOpen;
                    return Step::Continue;
                }
                '&' => {
                    if let Some(text) = cursor.emit() {
                        return Step::Emit(Span::Text(text));
                    }
                    // The `&` is captured so a failed entity flows on as text.
                    cursor.consume();
                    self.entity_len = 0;
                    self.state = ScanState::InEntity;
                    return Step::Continue;
                }
                _ => {
                    cursor.consume_while(|c| c != '<' && c != '&');
                }
            }
        }
    }

    fn lex_tag_open(&mut self, cursor: &mut Cursor<'_>) -> Step<'static> {
        let Some(ch) = cursor.peek() else {
            return Step::NeedInput;
        };
        if !opens_markup(ch) {
            self.literal_lt(cursor);
            return Step::Continue;
        }
        match ch {
            '/' => {
                self.skip(cursor);
                self.tag.start(true);
                self.state = ScanState::InTag;
            }
            '!' => {
                self.skip(cursor);
                self.set_kind(MarkupKind::Declaration);
                self.state = ScanState::Bang {
                    target: None,
                    matched: 0,
                };
            }
            '?' => {
                self.skip(cursor);
                self.set_kind(MarkupKind::ProcessingInstruction);
                self.tag.start_unnamed(false);
                self.state = ScanState::InTag;
            }
            _ => {
                self.tag.start(false);
                self.state = ScanState::InTag;
            }
        }
        Step::Continue
    }

    /// The held-back `<` turned out not to open markup.
    fn literal_lt(&mut self, cursor: &mut Cursor<'_>) {
        self.flight = None;
        cursor.push_text("<");
        self.state = ScanState::Text;
    }

    fn set_kind(&mut self, kind: MarkupKind) {
        if let Some(flight) = &mut self.flight {
            flight.kind = kind;
        }
    }

    fn lex_bang(
        &mut self,
        cursor: &mut Cursor<'_>,
        target: Option<&'static str>,
        matched: usize,
    ) -> Step<'static> {
        let Some(ch) = cursor.peek() else {
            return Step::NeedInput;
        };
        let target = match target {
            Some(target) => target,
            None => match ch {
                '-' => COMMENT_OPEN,
                '[' => CDATA_OPEN,
                _ => {
                    self.tag.start_unnamed(false);
                    self.state = ScanState::InTag;
                    return Step::Continue;
                }
            },
        };
        if !target[matched..].starts_with(ch) {
            // `<!-x>`, `<![if ...]>`: an ordinary declaration after all.
            self.tag.start_unnamed(false);
            self.state = ScanState::InTag;
            return Step::Continue;
        }
        self.skip(cursor);
        let matched = matched + 1;
        self.state = if matched < target.len() {
            ScanState::Bang {
                target: Some(target),
                matched,
            }
        } else if target == COMMENT_OPEN {
            self.set_kind(MarkupKind::Comment);
            ScanState::InComment { dashes: 0 }
        } else {
            self.set_kind(MarkupKind::CData);
            ScanState::InCData { brackets: 0 }
        };
        Step::Continue
    }

    fn lex_tag(&mut self, cursor: &mut Cursor<'_>) -> Step<'static> {
        while !self.tag.name_done {
            let Some(ch) = cursor.peek() else {
                return Step::NeedInput;
            };
            if !is_name_char(ch) {
                self.tag.name_done = true;
                break;
            }
            self.skip(cursor);
            self.tag.push_name(ch, self.config.name_limit);
        }

        if let Some(last) = self.skip_while(cursor, |c| c != '>') {
            self.tag.last_slash = last == '/';
        }
        if cursor.peek().is_none() {
            return Step::NeedInput;
        }
        self.skip(cursor);

        let opens_block = self.flight.is_some_and(|f| f.kind == MarkupKind::Tag)
            && !self.tag.closing
            && !self.tag.last_slash
            && !self.tag.name_overflow;
        let element = if opens_block {
            self.config.opaque_index(&self.tag.name)
        } else {
            None
        };
        let step = self.land(true);
        self.state = match element {
            Some(element) => {
                self.flight = Some(Flight::new(MarkupKind::OpaqueBlock, cursor.position()));
                ScanState::InOpaqueBlock { element, matched: 0 }
            }
            None => ScanState::Text,
        };
        step
    }

    fn lex_comment(&mut self, cursor: &mut Cursor<'_>, mut dashes: u8) -> Step<'static> {
        loop {
            if dashes == 0 {
                self.skip_while(cursor, |c| c != '-');
            }
            let Some(ch) = self.skip(cursor) else {
                self.state = ScanState::InComment { dashes };
                return Step::NeedInput;
            };
            match ch {
                '-' => dashes = (dashes + 1).min(2),
                '>' if dashes == 2 => {
                    self.state = ScanState::Text;
                    return self.land(true);
                }
                _ => dashes = 0,
            }
        }
    }

    fn lex_cdata<'src>(&mut self, cursor: &mut Cursor<'src>, mut brackets: u8) -> Step<'src> {
        loop {
            self.state = ScanState::InCData { brackets };
            let Some(ch) = cursor.peek() else {
                return match cursor.emit() {
                    Some(text) => Step::Emit(Span::Text(text)),
                    None => Step::NeedInput,
                };
            };
            match ch {
                ']' => {
                    if brackets == 0 {
                        if let Some(text) = cursor.emit() {
                            return Step::Emit(Span::Text(text));
                        }
                    }
                    self.skip(cursor);
                    brackets += 1;
                    if brackets > 2 {
                        // `]]]`: the oldest bracket is content.
                        self.release_brackets(cursor, 1);
                        brackets = 2;
                    }
                }
                '>' if brackets == 2 => {
                    if let Some(text) = cursor.emit() {
                        return Step::Emit(Span::Text(text));
                    }
                    self.skip(cursor);
                    self.state = ScanState::Text;
                    return self.land(true);
                }
                _ => {
                    self.release_brackets(cursor, brackets);
                    brackets = 0;
                    cursor.consume_while(|c| c != ']');
                }
            }
        }
    }

    /// Returns `count` held-back `]` to the CDATA content.
    fn release_brackets(&mut self, cursor: &mut Cursor<'_>, count: u8) {
        let count = usize::from(count);
        if count == 0 {
            return;
        }
        cursor.push_text(&"]]"[..count]);
        if let Some(flight) = &mut self.flight {
            flight.len -= count;
        }
    }

    fn lex_opaque_block(
        &mut self,
        cursor: &mut Cursor<'_>,
        element: usize,
        mut matched: usize,
    ) -> Step<'static> {
        let config = self.config.clone();
        let name = config.opaque_name(element).as_bytes();
        let target_len = 2 + name.len();
        loop {
            if matched == 0 {
                self.skip_while(cursor, |c| c != '<');
            }
            let Some(ch) = cursor.peek() else {
                self.state = ScanState::InOpaqueBlock { element, matched };
                return Step::NeedInput;
            };
            if matched == target_len {
                match ch {
                    '>' => {
                        self.skip(cursor);
                        self.state = ScanState::Text;
                        return self.land(true);
                    }
                    c if c.is_whitespace() || c == '/' => {
                        // `</script >`: skip the rest of the end tag.
                        self.skip(cursor);
                        self.tag.start_unnamed(true);
                        self.state = ScanState::InTag;
                        return Step::Continue;
                    }
                    // `</scripts`: not our end tag; rescan `ch` from scratch.
                    _ => {
                        matched = 0;
                        continue;
                    }
                }
            }
            let expected = match matched {
                0 => ch == '<',
                1 => ch == '/',
                n => u8::try_from(ch).is_ok_and(|b| name[n - 2].eq_ignore_ascii_case(&b)),
            };
            self.skip(cursor);
            matched = if expected {
                matched + 1
            } else if ch == '<' {
                1
            } else {
                0
            };
        }
    }

    fn lex_entity<'src>(&mut self, cursor: &mut Cursor<'src>) -> Step<'src> {
        loop {
            let Some(ch) = cursor.peek() else {
                return Step::NeedInput;
            };
            if ch == ';' {
                let body = cursor.emit().map(crate::span::Capture::drop_first_char);
                cursor.skip();
                self.state = ScanState::Text;
                return match body {
                    Some(body) => Step::Emit(Span::Entity(body)),
                    None => Step::Continue,
                };
            }
            if (ch.is_ascii_alphanumeric() || ch == '#') && self.entity_len < self.config.max_entity_len {
                cursor.consume();
                self.entity_len += 1;
                continue;
            }
            // Not an entity: the `&` and body stay in the capture as text.
            self.state = ScanState::Text;
            return Step::Continue;
        }
    }

    /// Resolves whatever is in flight once input has ended.
    fn end_of_input<'src>(&mut self, cursor: &mut Cursor<'src>) -> Step<'src> {
        match self.state {
            ScanState::Text => match cursor.emit() {
                Some(text) => Step::Emit(Span::Text(text)),
                None => {
                    self.state = ScanState::Ended;
                    Step::Done
                }
            },
            ScanState::TagOpen => {
                self.literal_lt(cursor);
                Step::Continue
            }
            ScanState::InEntity => {
                self.state = ScanState::Text;
                Step::Continue
            }
            ScanState::InCData { brackets } => {
                self.release_brackets(cursor, brackets);
                self.state = ScanState::InCData { brackets: 0 };
                match cursor.emit() {
                    Some(text) => Step::Emit(Span::Text(text)),
                    None => {
                        self.state = ScanState::Ended;
                        self.land(false)
                    }
                }
            }
            ScanState::Bang { .. }
            | ScanState::InTag
            | ScanState::InComment { .. }
            | ScanState::InOpaqueBlock { .. } => {
                self.state = ScanState::Ended;
                self.land(false)
            }
            ScanState::Ended => Step::Done,
        }
    }
}

/// Iterator over the spans completed by one [`MarkupScanner::feed`].
pub struct Spans<'p, 'src> {
    scanner: &'p mut MarkupScanner,
    cursor: Cursor<'src>,
}

impl<'src> Iterator for Spans<'_, 'src> {
    type Item = Span<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        self.scanner.next_span(&mut self.cursor, false)
    }
}

impl Drop for Spans<'_, '_> {
    fn drop(&mut self) {
        self.scanner.carry = mem::take(&mut self.cursor).finish();
    }
}

/// Iterator over the spans remaining after [`MarkupScanner::finish`].
pub struct ClosedSpans {
    scanner: MarkupScanner,
    cursor: Cursor<'static>,
}

impl Iterator for ClosedSpans {
    type Item = Span<'static>;

    fn next(&mut self) -> Option<Self::Item> {
        self.scanner.next_span(&mut self.cursor, true)
    }
}

#[cfg(test)]
mod tests;
