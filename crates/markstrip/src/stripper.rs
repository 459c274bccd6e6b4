//! Stripper: turns scanner spans into visible text.
//!
//! [`MarkupStripper`] is the streaming form: feed it chunks and drain the
//! text pieces each chunk completes. [`Stripper`] holds the configuration and
//! entity table once and strips whole strings or readers; it is cheap to clone
//! and can be shared across threads.

use alloc::{format, string::String, sync::Arc};

use crate::{
    entities::EntityTable,
    observer::{NoopObserver, StripEvent, StripObserver},
    options::{ScanConfig, StripOptions},
    scanner::{ClosedSpans, MarkupScanner, Spans},
    span::{Capture, Span},
};
#[cfg(feature = "std")]
use crate::StripError;

/// Size of the read buffer used by [`Stripper::strip_reader`].
#[cfg(feature = "std")]
const READ_BUFFER_SIZE: usize = 4096;

/// Reusable, thread-safe markup stripper.
///
/// # Examples
///
/// ```rust
/// use markstrip::{EntityTable, StripOptions, Stripper};
///
/// let stripper = Stripper::with_entities(
///     &StripOptions::default(),
///     EntityTable::new().with_entity("shy", ""),
/// );
/// assert_eq!(stripper.strip("<p>hy&shy;phen &amp; co</p>"), "hyphen & co");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Stripper {
    config: ScanConfig,
    entities: Arc<EntityTable>,
}

impl Stripper {
    /// Creates a stripper with the built-in entity table.
    #[must_use]
    pub fn new(options: &StripOptions) -> Self {
        Self::with_entities(options, EntityTable::default())
    }

    /// Creates a stripper that decodes entities with `entities`.
    #[must_use]
    pub fn with_entities(options: &StripOptions, entities: EntityTable) -> Self {
        Self {
            config: ScanConfig::new(options),
            entities: Arc::new(entities),
        }
    }

    /// Starts a streaming strip.
    #[must_use]
    pub fn stream(&self) -> MarkupStripper {
        self.stream_with(NoopObserver)
    }

    /// Starts a streaming strip reporting to `observer`.
    pub fn stream_with<O: StripObserver>(&self, observer: O) -> MarkupStripper<O> {
        MarkupStripper {
            scanner: MarkupScanner::with_config(self.config.clone()),
            entities: Arc::clone(&self.entities),
            observer,
        }
    }

    /// Strips markup from `text`. Never fails.
    #[must_use]
    pub fn strip(&self, text: &str) -> String {
        self.strip_with(text, &mut NoopObserver)
    }

    /// Strips markup from `text`, reporting anomalies to `observer`.
    pub fn strip_with(&self, text: &str, observer: &mut dyn StripObserver) -> String {
        let mut out = String::with_capacity(text.len());
        let mut stream = self.stream_with(observer);
        for piece in stream.feed(text) {
            out.push_str(piece.as_str());
        }
        for piece in stream.finish() {
            out.push_str(piece.as_str());
        }
        out
    }

    /// Strips markup from a UTF-8 byte stream, reading it in fixed-size
    /// blocks.
    ///
    /// # Errors
    ///
    /// Fails if reading fails or the stream is not valid UTF-8. No partial
    /// result is returned.
    #[cfg(feature = "std")]
    pub fn strip_reader<R: std::io::Read>(&self, reader: R) -> Result<String, StripError> {
        self.strip_reader_with(reader, &mut NoopObserver)
    }

    /// Like [`strip_reader`](Self::strip_reader), reporting anomalies and the
    /// failure, if any, to `observer`.
    ///
    /// # Errors
    ///
    /// See [`strip_reader`](Self::strip_reader).
    #[cfg(feature = "std")]
    pub fn strip_reader_with<R: std::io::Read>(
        &self,
        mut reader: R,
        observer: &mut dyn StripObserver,
    ) -> Result<String, StripError> {
        use bstr::ByteSlice;

        let mut stream = self.stream_with(observer);
        let mut out = String::new();
        let mut buf = [0u8; READ_BUFFER_SIZE];
        // `buf[..carried]` holds the start of a UTF-8 sequence cut by the
        // previous read; `decoded` counts the stream bytes before it.
        let mut carried = 0;
        let mut decoded = 0;
        loop {
            let read = match reader.read(&mut buf[carried..]) {
                Ok(0) => break,
                Ok(read) => read,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(stream.fail(StripError::Io(err))),
            };
            let end = carried + read;
            let valid = match buf[..end].to_str() {
                Ok(text) => text.len(),
                Err(err) if err.error_len().is_none() => err.valid_up_to(),
                Err(err) => {
                    let offset = decoded + err.valid_up_to();
                    return Err(stream.fail(StripError::InvalidUtf8 { offset }));
                }
            };
            // SAFETY: `buf[..valid]` was validated as UTF-8 just above.
            let text = unsafe { core::str::from_utf8_unchecked(&buf[..valid]) };
            for piece in stream.feed(text) {
                out.push_str(piece.as_str());
            }
            buf.copy_within(valid..end, 0);
            carried = end - valid;
            decoded += valid;
        }
        if carried > 0 {
            return Err(stream.fail(StripError::TruncatedUtf8 { offset: decoded }));
        }
        for piece in stream.finish() {
            out.push_str(piece.as_str());
        }
        Ok(out)
    }
}

/// Strips markup from `text` with the default options. `None` yields an
/// empty string.
///
/// ```rust
/// use markstrip::strip_markup;
///
/// assert_eq!(strip_markup("<b>hello</b>"), "hello");
/// assert_eq!(strip_markup("&amp;&lt;&gt;"), "&<>");
/// assert_eq!(strip_markup(None), "");
/// ```
#[must_use]
pub fn strip_markup<'a>(text: impl Into<Option<&'a str>>) -> String {
    match text.into() {
        Some(text) => Stripper::default().strip(text),
        None => String::new(),
    }
}

/// Streaming markup stripper.
///
/// Yields the visible text of each fed chunk as [`Capture`]s: text runs and
/// known entities are borrowed where possible, anything else is owned.
/// Concatenating every piece from every [`feed`](Self::feed) and from
/// [`finish`](Self::finish) gives the same text as [`Stripper::strip`] on
/// the whole input, wherever the chunks were split.
///
/// ```rust
/// use markstrip::{MarkupStripper, StripOptions};
///
/// let mut stripper = MarkupStripper::new(&StripOptions::default());
/// let mut text = String::new();
/// for chunk in ["<p>Fish &am", "p; chi", "ps</p><scr", "ipt>x</script>"] {
///     text.extend(stripper.feed(chunk).map(|piece| piece.into_owned()));
/// }
/// text.extend(stripper.finish().map(|piece| piece.into_owned()));
/// assert_eq!(text, "Fish & chips");
/// ```
#[derive(Debug)]
pub struct MarkupStripper<O: StripObserver = NoopObserver> {
    scanner: MarkupScanner,
    entities: Arc<EntityTable>,
    observer: O,
}

impl MarkupStripper {
    /// Creates a streaming stripper for `options`.
    #[must_use]
    pub fn new(options: &StripOptions) -> Self {
        Stripper::new(options).stream()
    }
}

impl<O: StripObserver> MarkupStripper<O> {
    /// Feeds a chunk and returns an iterator over the text it completes.
    pub fn feed<'p, 'src>(&'p mut self, chunk: &'src str) -> Pieces<'p, 'src, O> {
        Pieces {
            spans: self.scanner.feed(chunk),
            entities: &self.entities,
            observer: &mut self.observer,
        }
    }

    /// Marks the end of input and returns an iterator over the remaining
    /// text.
    #[must_use]
    pub fn finish(self) -> ClosedPieces<O> {
        ClosedPieces {
            spans: self.scanner.finish(),
            entities: self.entities,
            observer: self.observer,
        }
    }

    #[cfg(feature = "std")]
    fn fail(&mut self, error: StripError) -> StripError {
        self.observer.on_event(&StripEvent::StreamFailed { error: &error });
        error
    }
}

/// Maps a span to the text it contributes, if any.
fn resolve<'src>(
    span: Span<'src>,
    entities: &EntityTable,
    observer: &mut impl StripObserver,
) -> Option<Capture<'src>> {
    match span {
        Span::Text(text) => Some(text),
        Span::Entity(body) => {
            if let Some(decoded) = entities.decode_capture(body.as_str()) {
                return Some(decoded);
            }
            observer.on_event(&StripEvent::EntityPassedThrough {
                entity: body.as_str(),
            });
            Some(Capture::Owned(format!("&{body};")))
        }
        Span::Markup(markup) => {
            if !markup.terminated {
                observer.on_event(&StripEvent::UnterminatedMarkup {
                    kind: markup.kind,
                    start: markup.start,
                    len: markup.len,
                });
            }
            None
        }
    }
}

/// Text pieces completed by one [`MarkupStripper::feed`].
pub struct Pieces<'p, 'src, O> {
    spans: Spans<'p, 'src>,
    entities: &'p EntityTable,
    observer: &'p mut O,
}

impl<'src, O: StripObserver> Iterator for Pieces<'_, 'src, O> {
    type Item = Capture<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let span = self.spans.next()?;
            if let Some(piece) = resolve(span, self.entities, self.observer) {
                return Some(piece);
            }
        }
    }
}

/// Text pieces remaining after [`MarkupStripper::finish`].
pub struct ClosedPieces<O> {
    spans: ClosedSpans,
    entities: Arc<EntityTable>,
    observer: O,
}

impl<O: StripObserver> Iterator for ClosedPieces<O> {
    type Item = Capture<'static>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let span = self.spans.next()?;
            if let Some(piece) = resolve(span, &self.entities, &mut self.observer) {
                return Some(piece);
            }
        }
    }
}
