use crate::pdf::merge::{merge_files, MergeInput};
use crate::pdf::PdfDocument;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub fn run<Q: AsRef<Path>>(inputs: &[PathBuf], pages: &[String], output: Q) -> Result<()> {
    if inputs.is_empty() {
        anyhow::bail!("No input files specified");
    }
    if pages.len() > inputs.len() {
        anyhow::bail!(
            "Got {} page selections for {} input file(s)",
            pages.len(),
            inputs.len()
        );
    }

    let merge_inputs: Vec<MergeInput> = inputs
        .iter()
        .enumerate()
        .map(|(i, path)| MergeInput::new(path, pages.get(i).cloned().unwrap_or_default()))
        .collect();

    let mut merged = merge_files(&merge_inputs)?;
    let total_pages = merged.get_pages().len();
    PdfDocument::save(&mut merged, &output)?;

    println!(
        "Merged {} files ({} pages) into {}",
        inputs.len(),
        total_pages,
        output.as_ref().display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testing::{page_tags, save_sample};

    #[test]
    fn test_missing_selections_mean_all_pages() {
        let dir = tempfile::tempdir().unwrap();
        let a = save_sample(dir.path(), "a.pdf", 3);
        let b = save_sample(dir.path(), "b.pdf", 2);
        let output = dir.path().join("merged.pdf");

        run(&[a, b], &["3".to_string()], &output).unwrap();
        let merged = PdfDocument::open(&output).unwrap();
        assert_eq!(page_tags(&merged.doc), vec![3, 1, 2]);
    }

    #[test]
    fn test_too_many_selections() {
        let dir = tempfile::tempdir().unwrap();
        let a = save_sample(dir.path(), "a.pdf", 1);
        let output = dir.path().join("merged.pdf");

        let err = run(&[a], &["1".to_string(), "1".to_string()], &output).unwrap_err();
        assert!(err.to_string().contains("2 page selections for 1 input"));
    }
}
