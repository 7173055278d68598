use super::select_pages;
use crate::pdf::PdfDocument;
use anyhow::Result;
use std::path::Path;
use tracing::info;

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(input: P, pages: &str, output: Q) -> Result<()> {
    let doc = PdfDocument::open(&input)?;
    let page_list = select_pages(&doc, pages)?;

    let mut new_doc = doc.remove_pages(&page_list)?;
    let remaining = new_doc.get_pages().len();
    PdfDocument::save(&mut new_doc, &output)?;

    info!(removed = page_list.len(), remaining, "removed pages");
    println!(
        "Removed {} page(s), {} left in {}",
        page_list.len(),
        remaining,
        output.as_ref().display()
    );

    Ok(())
}
