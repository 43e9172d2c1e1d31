//! Mock page backend for testing.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::backend::{BackendError, PageBackend};

/// A configurable mock response for [`MockBackend`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Simulate a document with these page texts.
    Pages(Vec<String>),
    /// Simulate a file the backend cannot open.
    OpenError(String),
    /// Simulate a failure partway through the page walk.
    ExtractionError(String),
}

/// A hand-rolled mock implementing [`PageBackend`] for tests.
///
/// Returns the same response on every call and counts calls via
/// [`call_count()`](MockBackend::call_count), so callers can assert that
/// extraction was never attempted.
pub struct MockBackend {
    response: MockResponse,
    call_count: AtomicUsize,
}

impl MockBackend {
    pub fn new(response: MockResponse) -> Self {
        Self {
            response,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Mock that reports the given page texts.
    pub fn with_pages<S: Into<String>>(pages: impl IntoIterator<Item = S>) -> Self {
        Self::new(MockResponse::Pages(
            pages.into_iter().map(Into::into).collect(),
        ))
    }

    /// How many times `extract_pages()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl PageBackend for MockBackend {
    fn extract_pages(&self, _path: &Path) -> Result<Vec<String>, BackendError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            MockResponse::Pages(pages) => Ok(pages.clone()),
            MockResponse::OpenError(msg) => Err(BackendError::Open(msg.clone())),
            MockResponse::ExtractionError(msg) => Err(BackendError::Extraction(msg.clone())),
        }
    }
}
