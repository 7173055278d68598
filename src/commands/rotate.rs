use super::select_pages;
use crate::pdf::edit::rotate_pages;
use crate::pdf::PdfDocument;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    pages: &str,
    angle: i64,
    output: Q,
) -> Result<()> {
    let mut doc = PdfDocument::open(&input)?;
    let page_list = select_pages(&doc, pages)?;

    rotate_pages(&mut doc.doc, &page_list, angle)?;
    PdfDocument::save(&mut doc.doc, &output)?;

    println!(
        "Rotated {} page(s) by {}° into {}",
        page_list.len(),
        angle,
        output.as_ref().display()
    );

    Ok(())
}
