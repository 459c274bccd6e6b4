//! Field processor: strips markup from configured document fields before
//! handing the document to the next pipeline stage.

use alloc::{string::String, vec::Vec};
use core::convert::Infallible;

use crate::{
    document::{Document, FieldValue},
    normalize::normalize_space,
    observer::{NoopObserver, StripEvent, StripObserver},
    options::StripOptions,
    stripper::Stripper,
};

/// A stage in a document update pipeline.
///
/// Stages are composed explicitly: each stage owns the next one and forwards
/// to it. Only [`process_add`](Self::process_add) is required; the other
/// operations default to doing nothing.
pub trait UpdateStage {
    type Error;

    /// Adds or replaces a document.
    ///
    /// # Errors
    ///
    /// Stage specific.
    fn process_add(&mut self, doc: Document) -> Result<(), Self::Error>;

    /// Deletes the document with the given id.
    ///
    /// # Errors
    ///
    /// Stage specific.
    fn process_delete(&mut self, _id: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Commits pending updates.
    ///
    /// # Errors
    ///
    /// Stage specific.
    fn process_commit(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called once when the update request is complete.
    ///
    /// # Errors
    ///
    /// Stage specific.
    fn finish(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Terminal stage collecting every added document.
impl UpdateStage for Vec<Document> {
    type Error = Infallible;

    fn process_add(&mut self, doc: Document) -> Result<(), Self::Error> {
        self.push(doc);
        Ok(())
    }
}

/// Terminal stage handing each added document to a closure.
impl<F, E> UpdateStage for F
where
    F: FnMut(Document) -> Result<(), E>,
{
    type Error = E;

    fn process_add(&mut self, doc: Document) -> Result<(), Self::Error> {
        self(doc)
    }
}

/// Configuration for [`HtmlStripProcessor`].
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "serde")]
/// # {
/// use markstrip::ProcessorConfig;
///
/// let config: ProcessorConfig =
///     serde_json::from_str(r#"{"fields": ["title", "body"], "space_normalize": true}"#).unwrap();
/// assert_eq!(config.fields, ["title", "body"]);
/// assert_eq!(config.strip.opaque_elements, ["script", "style"]);
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ProcessorConfig {
    /// Fields to process, in processing order.
    pub fields: Vec<String>,
    /// Collapse whitespace after stripping.
    ///
    /// # Default
    ///
    /// `false`
    pub space_normalize: bool,
    /// Scanner options.
    pub strip: StripOptions,
}

/// Strips markup from the text values of configured fields, then forwards
/// the document to `next`.
///
/// Missing fields are skipped, non-text values keep their position, and
/// boosts and unconfigured fields are left alone.
///
/// ```rust
/// use markstrip::{Document, FieldValue, HtmlStripProcessor, ProcessorConfig, UpdateStage};
///
/// let config = ProcessorConfig {
///     fields: vec!["body".into()],
///     space_normalize: true,
///     ..Default::default()
/// };
/// let mut processor = HtmlStripProcessor::new(&config, Vec::<Document>::new());
///
/// let mut doc = Document::new();
/// doc.add_value("body", "<p>Fish  &amp;\n chips</p>");
/// doc.add_value("body", 42_i64);
/// processor.process_add(doc).unwrap();
///
/// let body = &processor.next()[0].field("body").unwrap().values;
/// assert_eq!(body, &[FieldValue::from("Fish & chips"), FieldValue::Integer(42)]);
/// ```
#[derive(Debug)]
pub struct HtmlStripProcessor<N, O = NoopObserver> {
    fields: Vec<String>,
    space_normalize: bool,
    stripper: Stripper,
    next: N,
    observer: O,
}

impl<N: UpdateStage> HtmlStripProcessor<N> {
    /// Creates a processor forwarding to `next`.
    pub fn new(config: &ProcessorConfig, next: N) -> Self {
        Self::with_observer(config, next, NoopObserver)
    }
}

impl<N: UpdateStage, O: StripObserver> HtmlStripProcessor<N, O> {
    /// Creates a processor forwarding to `next` and reporting to `observer`.
    pub fn with_observer(config: &ProcessorConfig, next: N, observer: O) -> Self {
        Self {
            fields: config.fields.clone(),
            space_normalize: config.space_normalize,
            stripper: Stripper::new(&config.strip),
            next,
            observer,
        }
    }

    /// The next stage.
    pub fn next(&self) -> &N {
        &self.next
    }

    /// Consumes the processor, returning the next stage.
    pub fn into_next(self) -> N {
        self.next
    }
}

impl<N: UpdateStage, O: StripObserver> UpdateStage for HtmlStripProcessor<N, O> {
    type Error = N::Error;

    fn process_add(&mut self, mut doc: Document) -> Result<(), Self::Error> {
        let Self {
            fields,
            space_normalize,
            stripper,
            next,
            observer,
        } = self;
        for name in fields.iter() {
            let Some(field) = doc.field_mut(name) else {
                observer.on_event(&StripEvent::FieldSkipped { field: name });
                continue;
            };
            observer.on_event(&StripEvent::FieldStarted {
                field: name,
                values: field.values.len(),
            });
            for value in &mut field.values {
                let FieldValue::Text(text) = value else {
                    continue;
                };
                let stripped = stripper.strip_with(text, &mut *observer);
                *text = if *space_normalize {
                    normalize_space(stripped.as_str())
                } else {
                    stripped
                };
            }
        }
        next.process_add(doc)
    }

    fn process_delete(&mut self, id: &str) -> Result<(), Self::Error> {
        self.next.process_delete(id)
    }

    fn process_commit(&mut self) -> Result<(), Self::Error> {
        self.next.process_commit()
    }

    fn finish(&mut self) -> Result<(), Self::Error> {
        self.next.finish()
    }
}
