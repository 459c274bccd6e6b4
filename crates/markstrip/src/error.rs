use thiserror::Error;

/// Failure while stripping markup from a stream.
///
/// In-memory stripping never fails; only [`Stripper::strip_reader`] returns
/// this. No partial output is produced when it does.
///
/// [`Stripper::strip_reader`]: crate::Stripper::strip_reader
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StripError {
    #[error("failed to read markup stream: {0}")]
    Io(#[from] std::io::Error),
    /// The stream holds bytes that are not UTF-8. `offset` is the byte
    /// position of the first invalid byte.
    #[error("invalid UTF-8 in markup stream at byte {offset}")]
    InvalidUtf8 { offset: usize },
    /// The stream ended inside a multi-byte UTF-8 sequence starting at byte
    /// `offset`.
    #[error("markup stream ends inside a UTF-8 sequence at byte {offset}")]
    TruncatedUtf8 { offset: usize },
}
