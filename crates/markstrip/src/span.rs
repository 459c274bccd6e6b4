//! Spans produced by the markup scanner.
//!
//! A [`Span`] is a contiguous run of input classified as visible text, an
//! entity reference, or discarded markup. Text and entity payloads are
//! [`Capture`]s: borrowed from the fed chunk whenever the run lies entirely
//! inside it, owned otherwise.

use alloc::string::{String, ToString};
use core::fmt;

/// Location of a character in the input stream.
///
/// `offset` counts characters from the start of the stream; `line` and
/// `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Position {
    #[inline]
    pub(crate) fn bump(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.offset += 1;
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Text payload of a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture<'src> {
    /// A slice of the chunk passed to `feed`.
    Borrowed(&'src str),
    /// Text assembled across chunks, or produced by a transform.
    Owned(String),
}

impl Capture<'_> {
    /// Returns the captured text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Capture::Borrowed(s) => s,
            Capture::Owned(s) => s.as_str(),
        }
    }

    /// Returns `true` if the capture holds no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// Converts the capture into an owned `String`.
    #[must_use]
    pub fn into_owned(self) -> String {
        match self {
            Capture::Borrowed(s) => s.to_string(),
            Capture::Owned(s) => s,
        }
    }

    /// Drops the first character of the capture.
    pub(crate) fn drop_first_char(self) -> Self {
        match self {
            Capture::Borrowed(s) => {
                let mut chars = s.chars();
                chars.next();
                Capture::Borrowed(chars.as_str())
            }
            Capture::Owned(mut s) => {
                if !s.is_empty() {
                    s.remove(0);
                }
                Capture::Owned(s)
            }
        }
    }
}

impl AsRef<str> for Capture<'_> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Capture<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of markup a discarded span held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum MarkupKind {
    /// A start or end tag, `<b>` or `</b>`.
    Tag,
    /// A `<!...>` declaration such as `<!DOCTYPE html>`.
    Declaration,
    /// A `<?...>` processing instruction.
    ProcessingInstruction,
    /// A `<!-- ... -->` comment.
    Comment,
    /// The `<![CDATA[` and `]]>` delimiters of a CDATA section. The content
    /// between them is emitted as text.
    CData,
    /// The content and end tag of an opaque element such as `script`.
    OpaqueBlock,
}

/// A discarded markup span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markup {
    pub kind: MarkupKind,
    /// Position of the first discarded character.
    pub start: Position,
    /// Number of characters discarded.
    pub len: usize,
    /// `false` when input ended before the closing delimiter.
    pub terminated: bool,
}

/// A classified run of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span<'src> {
    /// Visible text, emitted verbatim.
    Text(Capture<'src>),
    /// The body of an `&body;` entity reference, without `&` and `;`.
    Entity(Capture<'src>),
    /// Markup that contributes nothing to the output.
    Markup(Markup),
}

impl Span<'_> {
    /// Detaches the span from the chunk it was scanned from.
    #[must_use]
    pub fn into_owned(self) -> Span<'static> {
        match self {
            Span::Text(text) => Span::Text(Capture::Owned(text.into_owned())),
            Span::Entity(body) => Span::Entity(Capture::Owned(body.into_owned())),
            Span::Markup(markup) => Span::Markup(markup),
        }
    }
}

/// A markup span in flight: kind and extent are known, the end is not.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Flight {
    pub(crate) kind: MarkupKind,
    pub(crate) start: Position,
    pub(crate) len: usize,
}

impl Flight {
    pub(crate) fn new(kind: MarkupKind, start: Position) -> Self {
        Self {
            kind,
            start,
            len: 0,
        }
    }

    pub(crate) fn land(self, terminated: bool) -> Markup {
        Markup {
            kind: self.kind,
            start: self.start,
            len: self.len,
            terminated,
        }
    }
}
