//! Cursor: per-feed owner for unread input and the in-flight capture.
//!
//! What it does
//! - Reads from the carried-over unread text (`pending`) first, then from the
//!   current batch (`&'src str`), via `peek()`/`consume()`/`skip()` while
//!   maintaining the stream [`Position`].
//! - Captures consumed characters as the current text run. A run that lies
//!   entirely inside the batch is returned borrowed; anything read from
//!   `pending`, pushed explicitly, or interrupted by a `skip()` is coalesced
//!   into the owned `scratch` once and returned owned.
//! - On `finish()`, coalesces an un-emitted run into the scratch and moves the
//!   unread batch tail into `pending` so the next feed resumes exactly where
//!   this one stopped.
//!
//! Invariants
//! - The capture is always `scratch + batch[anchor..byte_idx]`.
//! - Borrowed slices only ever come from the batch, never from `pending`.
//! - Once the batch is being read, `pending` is empty for the rest of the
//!   feed, so the borrowed tail of a capture is contiguous.

use alloc::string::String;
use core::mem;

use crate::span::{Capture, Position};

/// Where the next character comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Source {
    Pending,
    Batch,
}

/// State persisted across feeds.
#[derive(Debug, Clone, Default)]
pub(crate) struct CursorState {
    pending: String,
    pos: Position,
    scratch: String,
}

impl CursorState {
    #[cfg(test)]
    pub(crate) fn test_pending(&self) -> &str {
        &self.pending
    }

    #[cfg(test)]
    pub(crate) fn test_scratch(&self) -> &str {
        &self.scratch
    }
}

#[derive(Debug, Default)]
pub(crate) struct Cursor<'src> {
    pending: String,
    pending_idx: usize,

    batch: &'src str,
    byte_idx: usize,

    pos: Position,

    scratch: String,
    /// Byte offset in `batch` where the borrowed tail of the capture starts.
    anchor: Option<usize>,
}

impl<'src> Cursor<'src> {
    pub(crate) fn from_state(state: CursorState, batch: &'src str) -> Self {
        Self {
            pending: state.pending,
            pending_idx: 0,
            batch,
            byte_idx: 0,
            pos: state.pos,
            scratch: state.scratch,
            anchor: None,
        }
    }

    /// Finalizes the feed and returns the state for the next one.
    pub(crate) fn finish(mut self) -> CursorState {
        self.coalesce();
        let mut pending = if self.pending_idx < self.pending.len() {
            self.pending.split_off(self.pending_idx)
        } else {
            String::new()
        };
        pending.push_str(&self.batch[self.byte_idx..]);
        CursorState {
            pending,
            pos: self.pos,
            scratch: self.scratch,
        }
    }

    #[inline]
    pub(crate) fn position(&self) -> Position {
        self.pos
    }

    /// Decodes but does not consume the next character.
    #[inline]
    pub(crate) fn peek(&self) -> Option<char> {
        self.peek_with_source().map(|(ch, _)| ch)
    }

    fn peek_with_source(&self) -> Option<(char, Source)> {
        if let Some(ch) = self.pending[self.pending_idx..].chars().next() {
            return Some((ch, Source::Pending));
        }
        self.batch[self.byte_idx..]
            .chars()
            .next()
            .map(|ch| (ch, Source::Batch))
    }

    /// Decodes the character after the next one, if it is already available.
    pub(crate) fn peek_second(&self) -> Option<char> {
        let (first, source) = self.peek_with_source()?;
        match source {
            Source::Pending => {
                let after = self.pending_idx + first.len_utf8();
                self.pending[after..]
                    .chars()
                    .next()
                    .or_else(|| self.batch[self.byte_idx..].chars().next())
            }
            Source::Batch => self.batch[self.byte_idx + first.len_utf8()..].chars().next(),
        }
    }

    #[inline]
    fn step(&mut self) -> Option<(char, Source)> {
        let (ch, source) = self.peek_with_source()?;
        match source {
            Source::Pending => self.pending_idx += ch.len_utf8(),
            Source::Batch => self.byte_idx += ch.len_utf8(),
        }
        self.pos.bump(ch);
        Some((ch, source))
    }

    /// Consumes one character into the capture.
    pub(crate) fn consume(&mut self) -> Option<char> {
        let start = self.byte_idx;
        let (ch, source) = self.step()?;
        match source {
            Source::Pending => self.scratch.push(ch),
            Source::Batch => {
                if self.anchor.is_none() {
                    self.anchor = Some(start);
                }
            }
        }
        Some(ch)
    }

    /// Consumes characters into the capture while `pred` holds. Returns the
    /// number consumed.
    pub(crate) fn consume_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut consumed = 0;
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.consume();
            consumed += 1;
        }
        consumed
    }

    /// Advances one character without capturing it.
    ///
    /// A skip inside a capture leaves a gap a single borrowed slice can't
    /// represent, so the borrowed prefix is coalesced into the scratch first.
    pub(crate) fn skip(&mut self) -> Option<char> {
        self.coalesce();
        self.step().map(|(ch, _)| ch)
    }

    /// Skips characters while `pred` holds. Returns the number skipped and the
    /// last character skipped.
    pub(crate) fn skip_while(&mut self, pred: impl Fn(char) -> bool) -> (usize, Option<char>) {
        self.coalesce();
        let mut skipped = 0;
        let mut last = None;
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.step();
            skipped += 1;
            last = Some(ch);
        }
        (skipped, last)
    }

    /// Appends text to the capture that is not part of the input at this
    /// position (e.g. a `<` held back across feeds).
    pub(crate) fn push_text(&mut self, text: &str) {
        self.coalesce();
        self.scratch.push_str(text);
    }

    /// Takes the capture, borrowed if it lies entirely in the batch. Returns
    /// `None` if it is empty.
    pub(crate) fn emit(&mut self) -> Option<Capture<'src>> {
        let borrowed = self
            .anchor
            .take()
            .map(|start| &self.batch[start..self.byte_idx])
            .filter(|s| !s.is_empty());
        if self.scratch.is_empty() {
            return borrowed.map(Capture::Borrowed);
        }
        let mut owned = mem::take(&mut self.scratch);
        if let Some(tail) = borrowed {
            owned.push_str(tail);
        }
        Some(Capture::Owned(owned))
    }

    /// Copies the borrowed tail of the capture into the scratch.
    fn coalesce(&mut self) {
        if let Some(start) = self.anchor.take() {
            self.scratch.push_str(&self.batch[start..self.byte_idx]);
        }
    }
}
