use crate::page_selection::parse_page_groups;
use crate::pdf::PdfDocument;
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Write one file per group into `output_dir`; returns the written paths.
pub fn split<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    groups: &str,
    output_dir: Q,
) -> Result<Vec<PathBuf>> {
    let input = input.as_ref();
    let output_dir = output_dir.as_ref();

    let doc = PdfDocument::open(input)?;
    let groups = parse_page_groups(groups, doc.page_count())
        .map_err(|e| anyhow!("{}: {}", doc.path, e))?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("page");

    let mut written = Vec::with_capacity(groups.len());
    for (i, group) in groups.iter().enumerate() {
        let output_path = output_dir.join(format!("{}_{:04}.pdf", stem, i + 1));
        let mut new_doc = doc.keep_pages(group)?;
        PdfDocument::save(&mut new_doc, &output_path)?;
        written.push(output_path);
    }

    info!(files = written.len(), dir = %output_dir.display(), "split document");
    Ok(written)
}

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(input: P, groups: &str, output_dir: Q) -> Result<()> {
    let written = split(&input, groups, &output_dir)?;
    println!(
        "Split {} into {} file(s) in {}",
        input.as_ref().display(),
        written.len(),
        output_dir.as_ref().display()
    );
    Ok(())
}
