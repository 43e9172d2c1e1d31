use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod backend;
pub mod config_file;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod persist;
pub mod text;

pub use backend::{BackendError, PageBackend};
pub use persist::{PersistError, write_output};
pub use text::expand_ligatures;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("file not found: {}", .0.display())]
    PathNotFound(PathBuf),
    #[error("{source}")]
    Extraction {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
}

/// Text of a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-based page number.
    pub number: usize,
    pub text: String,
}

/// Every page of a document, numbered 1..=N in document order.
///
/// Only [`extract`] builds one, so the numbering cannot have gaps.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    source: PathBuf,
    pages: Vec<PageText>,
}

impl ExtractedDocument {
    fn from_page_texts(source: PathBuf, texts: Vec<String>) -> Self {
        let pages = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| PageText { number: i + 1, text })
            .collect();
        Self { source, pages }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn pages(&self) -> &[PageText] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Concatenate every page as a [`page_header`] followed by its text.
    ///
    /// A document without pages renders to the empty string.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.pages.iter().map(|p| p.text.len() + 20).sum());
        for page in &self.pages {
            out.push_str(&page_header(page.number));
            out.push_str(&page.text);
        }
        out
    }
}

/// Delimiter placed before the text of page `number`.
pub fn page_header(number: usize) -> String {
    format!("\n--- PAGE {number} ---\n")
}

/// Extract every page of the PDF at `path` through `backend`.
///
/// Any backend failure fails the whole extraction; pages processed before
/// the failure are discarded.
pub fn extract(
    path: &Path,
    backend: &dyn PageBackend,
) -> Result<ExtractedDocument, ExtractionError> {
    if !path.exists() {
        return Err(ExtractionError::PathNotFound(path.to_path_buf()));
    }

    tracing::debug!(path = %path.display(), "extracting pages");

    let texts = backend
        .extract_pages(path)
        .map_err(|source| ExtractionError::Extraction {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!(path = %path.display(), pages = texts.len(), "extraction complete");

    Ok(ExtractedDocument::from_page_texts(path.to_path_buf(), texts))
}

/// Extract the PDF at `path` and render it to a single string.
pub fn extract_text(path: &Path, backend: &dyn PageBackend) -> Result<String, ExtractionError> {
    extract(path, backend).map(|doc| doc.render())
}
