use super::select_pages;
use crate::pdf::watermark::{watermark_pages, WatermarkOptions};
use crate::pdf::PdfDocument;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    pages: &str,
    options: &WatermarkOptions,
    output: Q,
) -> Result<()> {
    let mut doc = PdfDocument::open(&input)?;
    let page_list = select_pages(&doc, pages)?;

    watermark_pages(&mut doc.doc, &page_list, options)?;
    PdfDocument::save(&mut doc.doc, &output)?;

    println!(
        "Stamped \"{}\" on {} page(s) into {}",
        options.text,
        page_list.len(),
        output.as_ref().display()
    );

    Ok(())
}
