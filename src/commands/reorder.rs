use crate::pdf::edit::{parse_page_order, reorder_pages};
use crate::pdf::PdfDocument;
use anyhow::{anyhow, Result};
use std::path::Path;

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(input: P, order: &str, output: Q) -> Result<()> {
    let mut doc = PdfDocument::open(&input)?;
    let new_order = parse_page_order(order, doc.page_count())
        .map_err(|e| anyhow!("{}: {}", doc.path, e))?;

    reorder_pages(&mut doc.doc, &new_order)?;
    PdfDocument::save(&mut doc.doc, &output)?;

    println!(
        "Reordered {} page(s) into {}",
        new_order.len(),
        output.as_ref().display()
    );

    Ok(())
}
