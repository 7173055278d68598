use anyhow::{anyhow, Result};

use crate::page_selection::parse_page_selection;
use crate::pdf::PdfDocument;

pub mod extract;
pub mod info;
pub mod merge;
pub mod protect;
pub mod remove;
pub mod reorder;
pub mod rotate;
pub mod select;
pub mod split;
pub mod watermark;

/// Parse `pages` against the document, naming the file in any error.
pub fn select_pages(doc: &PdfDocument, pages: &str) -> Result<Vec<u32>> {
    parse_page_selection(pages, doc.page_count()).map_err(|e| anyhow!("{}: {}", doc.path, e))
}
