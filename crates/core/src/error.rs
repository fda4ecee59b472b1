//! Content model error type.

use thiserror::Error;

use crate::id::ContentReference;

/// Content-model error.
///
/// Keep this focused on deterministic model failures (malformed references,
/// content of the wrong kind). Host and transport failures belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A reference could not be built or parsed.
    #[error("invalid content reference: {0}")]
    InvalidReference(String),

    /// Content was loaded but is not of the expected catalog kind.
    #[error("content {reference} is not a {expected}")]
    WrongKind {
        reference: ContentReference,
        expected: &'static str,
    },
}

impl CatalogError {
    pub fn invalid_reference(msg: impl Into<String>) -> Self {
        Self::InvalidReference(msg.into())
    }

    pub fn wrong_kind(reference: ContentReference, expected: &'static str) -> Self {
        Self::WrongKind { reference, expected }
    }
}
