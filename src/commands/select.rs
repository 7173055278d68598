use crate::page_selection::PageSelection;
use crate::pdf::PdfDocument;
use anyhow::Result;
use std::path::PathBuf;

/// Where the page count for validation comes from.
#[derive(Debug, Clone)]
pub enum PageCountSource {
    File(PathBuf),
    Total(u32),
}

impl PageCountSource {
    fn page_count(&self) -> Result<u32> {
        match self {
            PageCountSource::File(path) => Ok(PdfDocument::open(path)?.page_count()),
            PageCountSource::Total(total) => Ok(*total),
        }
    }
}

pub fn run(pages: &str, source: &PageCountSource, json: bool) -> Result<()> {
    let selection = PageSelection::evaluate(pages, source.page_count()?);

    if json {
        println!("{}", serde_json::to_string_pretty(&selection)?);
    } else if selection.is_valid() {
        println!("Pages: {}", format_page_numbers(&selection.pages));
        println!("{}", selection.summary());
    }

    match selection.error {
        Some(error) => Err(anyhow::anyhow!(error)),
        None => Ok(()),
    }
}

/// Render 0-based indices as 1-based page numbers, collapsing runs ("1-3, 5").
fn format_page_numbers(indices: &[u32]) -> String {
    let mut parts = Vec::new();
    let mut iter = indices.iter().map(|index| index + 1).peekable();

    while let Some(start) = iter.next() {
        let mut end = start;
        while iter.peek() == Some(&(end + 1)) {
            end += 1;
            iter.next();
        }
        if start == end {
            parts.push(start.to_string());
        } else {
            parts.push(format!("{}-{}", start, end));
        }
    }

    parts.join(", ")
}
