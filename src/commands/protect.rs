use crate::pdf::protect::{save_protected, ProtectOptions};
use crate::pdf::PdfDocument;
use anyhow::Result;
use std::path::Path;
use tracing::info;

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    options: &ProtectOptions,
    output: Q,
) -> Result<()> {
    options.validate()?;
    let mut doc = PdfDocument::open(&input)?;
    let page_count = doc.page_count();

    save_protected(&mut doc.doc, options, &output)?;

    info!(output = %output.as_ref().display(), "protected document");
    println!(
        "Protected {} page(s) into {}",
        page_count,
        output.as_ref().display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testing::save_sample;

    #[test]
    fn test_protect_writes_encrypted_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = save_sample(dir.path(), "in.pdf", 2);
        let output = dir.path().join("out.pdf");
        let options = ProtectOptions {
            owner_password: "admin".to_string(),
            allow_print: false,
            ..Default::default()
        };

        run(&input, &options, &output).unwrap();
        let doc = PdfDocument::open(&output).unwrap();
        assert!(doc.doc.is_encrypted());
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn test_protect_without_password_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = save_sample(dir.path(), "in.pdf", 1);
        let output = dir.path().join("out.pdf");

        let err = run(&input, &ProtectOptions::default(), &output).unwrap_err();
        assert_eq!(err.to_string(), "Enter a user or owner password");
        assert!(!output.exists());
    }
}
