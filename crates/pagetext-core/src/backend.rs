use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    Open(String),
    #[error("failed to extract text: {0}")]
    Extraction(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for page-level PDF text extraction backends.
///
/// Implementors own the document parsing; numbering pages and stitching
/// them together with headers happens in [`crate::extract`].
pub trait PageBackend: Send + Sync {
    /// Extract the text of every page, in document order.
    ///
    /// A page without extractable text yields an empty string. A document
    /// with no pages yields an empty vector.
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError>;
}
