use std::path::Path;

use mupdf::{Document, TextPageFlags};

use pagetext_core::{BackendError, PageBackend, expand_ligatures};

/// Upper bound for either exclusion band, as a fraction of page height.
const MAX_EXCLUSION_RATIO: f32 = 0.5;

/// MuPDF-based implementation of [`PageBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// (which is AGPL-3.0) so that the rest of the workspace does not
/// transitively depend on it.
///
/// By default every text block on every page is extracted. Header and
/// footer bands can be cut off to drop running heads and page numbers.
#[derive(Debug, Clone, Default)]
pub struct MupdfBackend {
    /// Fraction of page height from bottom to exclude as footer.
    /// `None` disables footer exclusion.
    footer_exclusion_ratio: Option<f32>,
    /// Fraction of page height from top to exclude as header.
    /// `None` disables header exclusion.
    header_exclusion_ratio: Option<f32>,
    expand_ligatures: bool,
}

fn exclusion_ratio(ratio: f32) -> Option<f32> {
    if ratio > 0.0 {
        Some(ratio.min(MAX_EXCLUSION_RATIO))
    } else {
        None
    }
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the footer exclusion ratio. Pass `0.0` to disable.
    pub fn with_footer_exclusion(mut self, ratio: f32) -> Self {
        self.footer_exclusion_ratio = exclusion_ratio(ratio);
        self
    }

    /// Set the header exclusion ratio. Pass `0.0` to disable.
    pub fn with_header_exclusion(mut self, ratio: f32) -> Self {
        self.header_exclusion_ratio = exclusion_ratio(ratio);
        self
    }

    /// Replace typographic ligatures (ﬁ, ﬂ, ...) with plain letters.
    pub fn with_ligature_expansion(mut self, enabled: bool) -> Self {
        self.expand_ligatures = enabled;
        self
    }

    fn extract_page(&self, page: &mupdf::Page) -> Result<String, BackendError> {
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(|e| BackendError::Extraction(e.to_string()))?;

        // Get page bounds for header/footer exclusion
        let page_bounds = page
            .bounds()
            .map_err(|e| BackendError::Extraction(e.to_string()))?;
        let page_height = page_bounds.y1 - page_bounds.y0;

        let header_threshold = self
            .header_exclusion_ratio
            .map(|r| page_bounds.y0 + page_height * r);
        let footer_threshold = self
            .footer_exclusion_ratio
            .map(|r| page_bounds.y1 - page_height * r);

        let mut lines = Vec::new();
        for block in text_page.blocks() {
            let block_bounds = block.bounds();

            // Skip blocks entirely within the header region
            if let Some(threshold) = header_threshold
                && block_bounds.y1 <= threshold
            {
                continue;
            }

            // Skip blocks whose top edge is in the footer region
            if let Some(threshold) = footer_threshold
                && block_bounds.y0 >= threshold
            {
                continue;
            }

            for line in block.lines() {
                let line_text: String = line
                    .chars()
                    .map(|c| c.char().unwrap_or('\u{FFFD}'))
                    .collect();
                lines.push(line_text);
            }
        }

        let text = lines.join("\n");
        if self.expand_ligatures {
            Ok(expand_ligatures(&text))
        } else {
            Ok(text)
        }
    }
}

impl PageBackend for MupdfBackend {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::Open("invalid path encoding".into()))?;

        // The document is closed when it drops, on success and on every error path.
        let document = Document::open(path_str).map_err(|e| BackendError::Open(e.to_string()))?;

        let mut pages_text = Vec::new();

        for (index, page_result) in document
            .pages()
            .map_err(|e| BackendError::Extraction(e.to_string()))?
            .enumerate()
        {
            let page = page_result
                .map_err(|e| BackendError::Extraction(format!("page {}: {}", index + 1, e)))?;
            let text = self.extract_page(&page)?;
            tracing::trace!(page = index + 1, chars = text.len(), "page extracted");
            pages_text.push(text);
        }

        Ok(pages_text)
    }
}
