//! Streaming markup stripper for document field pre-processing.
//!
//! Removes tags, comments, declarations and the content of opaque elements
//! such as `script` from text, decodes character entities, and optionally
//! collapses whitespace. Input can be a string, a sequence of chunks, or
//! (with the `std` feature) any `std::io::Read`.
//!
//! ```rust
//! use markstrip::{normalize_space, strip_markup};
//!
//! let html = "<p>Fish &amp; chips<script>track()</script></p>\n<!-- menu -->";
//! assert_eq!(strip_markup(html), "Fish & chips\n");
//! assert_eq!(normalize_space(strip_markup(html).as_str()), "Fish & chips");
//! ```
//!
//! Malformed markup never fails: `<` that does not open a tag is kept as
//! text, markup left open at end of input is dropped, and unknown entities
//! are kept literally. See [`StripObserver`] for hearing about those cases.

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod chunk_utils;
mod document;
mod entities;
#[cfg(feature = "std")]
mod error;
mod normalize;
pub mod observer;
mod options;
mod processor;
mod scanner;
mod span;
mod stripper;

#[cfg(test)]
mod tests;

pub use chunk_utils::{produce_chunks, split_seeded};
pub use document::{Document, Field, FieldValue};
pub use entities::{EntityTable, NAMED_ENTITIES, decode_entity, decode_numeric, lookup_named};
#[cfg(feature = "std")]
pub use error::StripError;
pub use normalize::normalize_space;
#[cfg(feature = "tracing")]
pub use observer::TracingObserver;
pub use observer::{NoopObserver, StripEvent, StripObserver};
pub use options::{DEFAULT_MAX_ENTITY_LEN, StripOptions};
pub use processor::{HtmlStripProcessor, ProcessorConfig, UpdateStage};
pub use scanner::{ClosedSpans, MarkupScanner, Spans};
pub use span::{Capture, Markup, MarkupKind, Position, Span};
pub use stripper::{ClosedPieces, MarkupStripper, Pieces, Stripper, strip_markup};
