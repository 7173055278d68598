use crate::pdf::PdfDocument;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>>(path: P, json: bool) -> Result<()> {
    let doc = PdfDocument::open(&path)?;
    let info = doc.get_info();

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("File: {}", path.as_ref().display());
    println!("Pages: {}", info.page_count);

    if let Some(title) = &info.title {
        println!("Title: {}", title);
    }
    if let Some(author) = &info.author {
        println!("Author: {}", author);
    }
    if let Some(subject) = &info.subject {
        println!("Subject: {}", subject);
    }
    if let Some(keywords) = &info.keywords {
        println!("Keywords: {}", keywords);
    }
    if let Some(creator) = &info.creator {
        println!("Creator: {}", creator);
    }
    if let Some(producer) = &info.producer {
        println!("Producer: {}", producer);
    }
    if let Some(creation_date) = &info.creation_date {
        println!("Created: {}", format_pdf_date(creation_date));
    }
    if let Some(mod_date) = &info.mod_date {
        println!("Modified: {}", format_pdf_date(mod_date));
    }

    Ok(())
}

/// Render `D:YYYYMMDDHHmmSS...` as `YYYY-MM-DD HH:mm:SS`; anything else is returned as is.
fn format_pdf_date(date: &str) -> String {
    let Some(d) = date.strip_prefix("D:") else {
        return date.to_string();
    };
    let bytes = d.as_bytes();
    if bytes.len() < 8 || !bytes[..8].iter().all(u8::is_ascii_digit) {
        return date.to_string();
    }

    // The checked prefixes are ASCII, so these slices fall on char boundaries.
    let time = if bytes.len() >= 14 && bytes[8..14].iter().all(u8::is_ascii_digit) {
        format!(" {}:{}:{}", &d[8..10], &d[10..12], &d[12..14])
    } else {
        String::new()
    };
    format!("{}-{}-{}{}", &d[0..4], &d[4..6], &d[6..8], time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pdf_date() {
        assert_eq!(
            format_pdf_date("D:20240131093000+01'00'"),
            "2024-01-31 09:30:00"
        );
        assert_eq!(format_pdf_date("D:20240131"), "2024-01-31");
        assert_eq!(format_pdf_date("yesterday"), "yesterday");
        assert_eq!(format_pdf_date("D:2024"), "D:2024");
        assert_eq!(format_pdf_date("D:202\u{e9}4567"), "D:202\u{e9}4567");
        assert_eq!(format_pdf_date("D:2024abcd"), "D:2024abcd");
        assert_eq!(format_pdf_date("D:20240131\u{e9}93000"), "2024-01-31");
    }
}
