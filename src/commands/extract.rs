use super::select_pages;
use crate::pdf::PdfDocument;
use anyhow::Result;
use std::path::Path;
use tracing::info;

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(input: P, pages: &str, output: Q) -> Result<()> {
    let doc = PdfDocument::open(&input)?;
    let page_list = select_pages(&doc, pages)?;

    let mut new_doc = doc.keep_pages(&page_list)?;
    PdfDocument::save(&mut new_doc, &output)?;

    info!(pages = page_list.len(), output = %output.as_ref().display(), "extracted pages");
    println!(
        "Extracted {} page(s) to {}",
        page_list.len(),
        output.as_ref().display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testing::{page_tags, save_sample};

    #[test]
    fn test_extract_writes_selection() {
        let dir = tempfile::tempdir().unwrap();
        let input = save_sample(dir.path(), "in.pdf", 6);
        let output = dir.path().join("out.pdf");

        run(&input, "5,1-2", &output).unwrap();
        let doc = PdfDocument::open(&output).unwrap();
        assert_eq!(page_tags(&doc.doc), vec![1, 2, 5]);
    }

    #[test]
    fn test_extract_rejects_bad_selection() {
        let dir = tempfile::tempdir().unwrap();
        let input = save_sample(dir.path(), "in.pdf", 2);
        let output = dir.path().join("out.pdf");

        let err = run(&input, "3-1", &output).unwrap_err();
        assert!(err
            .to_string()
            .ends_with("Range 3-1 is invalid (start greater than end)"));
        assert!(!output.exists());
    }
}
