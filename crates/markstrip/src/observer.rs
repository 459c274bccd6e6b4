//! Observability hook for stripping and field processing.
//!
//! The core never logs. Anything worth reporting is delivered as a
//! [`StripEvent`] to a caller-supplied [`StripObserver`]; hosts that use
//! `tracing` can plug in [`TracingObserver`] (feature `tracing`).

use crate::span::{MarkupKind, Position};
#[cfg(feature = "std")]
use crate::StripError;

/// Something noteworthy that happened while stripping or processing.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub enum StripEvent<'a> {
    /// A configured field is about to be processed.
    FieldStarted { field: &'a str, values: usize },
    /// A configured field is absent from the document.
    FieldSkipped { field: &'a str },
    /// Input ended inside markup; the partial markup was discarded.
    UnterminatedMarkup {
        kind: MarkupKind,
        start: Position,
        len: usize,
    },
    /// An entity reference could not be decoded and was kept literally.
    /// `entity` is the body without `&` and `;`.
    EntityPassedThrough { entity: &'a str },
    /// Reading the input stream failed; stripping was aborted.
    #[cfg(feature = "std")]
    StreamFailed { error: &'a StripError },
}

/// Receives [`StripEvent`]s.
pub trait StripObserver {
    /// Called synchronously, in input order.
    fn on_event(&mut self, event: &StripEvent<'_>);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopObserver;

impl StripObserver for NoopObserver {
    #[inline]
    fn on_event(&mut self, _event: &StripEvent<'_>) {}
}

impl<O: StripObserver + ?Sized> StripObserver for &mut O {
    #[inline]
    fn on_event(&mut self, event: &StripEvent<'_>) {
        (**self).on_event(event);
    }
}

/// Observer calling a closure for every event. See [`from_fn`].
#[derive(Debug, Clone, Copy)]
pub struct FnObserver<F>(F);

/// Wraps a closure as a [`StripObserver`].
///
/// ```rust
/// use markstrip::{Stripper, StripEvent, observer};
///
/// let mut passed = Vec::new();
/// let mut observer = observer::from_fn(|event: &StripEvent<'_>| {
///     if let StripEvent::EntityPassedThrough { entity } = event {
///         passed.push(entity.to_string());
///     }
/// });
/// let text = Stripper::default().strip_with("&bogus; &amp;", &mut observer);
/// assert_eq!(text, "&bogus; &");
/// assert_eq!(passed, ["bogus"]);
/// ```
pub fn from_fn<F>(f: F) -> FnObserver<F>
where
    F: FnMut(&StripEvent<'_>),
{
    FnObserver(f)
}

impl<F> StripObserver for FnObserver<F>
where
    F: FnMut(&StripEvent<'_>),
{
    fn on_event(&mut self, event: &StripEvent<'_>) {
        (self.0)(event);
    }
}

/// Forwards events to `tracing` with structured fields.
///
/// Field progress and entity pass-through are logged at `debug`, unterminated
/// markup at `warn`, stream failures at `error`.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

#[cfg(feature = "tracing")]
impl StripObserver for TracingObserver {
    fn on_event(&mut self, event: &StripEvent<'_>) {
        match *event {
            StripEvent::FieldStarted { field, values } => {
                tracing::debug!(field, values, "processing field");
            }
            StripEvent::FieldSkipped { field } => {
                tracing::debug!(field, "field not present, skipping");
            }
            StripEvent::UnterminatedMarkup { kind, start, len } => {
                tracing::warn!(?kind, %start, len, "discarded unterminated markup");
            }
            StripEvent::EntityPassedThrough { entity } => {
                tracing::debug!(entity, "unknown entity kept literally");
            }
            #[cfg(feature = "std")]
            StripEvent::StreamFailed { error } => {
                tracing::error!(%error, "failed to strip markup from stream");
            }
        }
    }
}
