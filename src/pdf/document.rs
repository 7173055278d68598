use anyhow::{Context, Result};
use lopdf::{Document, Object, ObjectId};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

pub struct PdfDocument {
    pub doc: Document,
    pub path: String,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().display().to_string();
        let doc =
            Document::load(&path).with_context(|| format!("Failed to open PDF: {}", path_str))?;
        debug!(path = %path_str, pages = doc.get_pages().len(), "opened document");
        Ok(PdfDocument {
            doc,
            path: path_str,
        })
    }

    /// Wrap an already loaded document; `path` is only used in messages.
    #[cfg(test)]
    pub fn from_document(doc: Document, path: impl Into<String>) -> Self {
        PdfDocument {
            doc,
            path: path.into(),
        }
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get metadata from the document info dictionary
    pub fn get_info(&self) -> PdfInfo {
        let mut info = PdfInfo::default();

        let dict = match self.doc.trailer.get(b"Info") {
            Ok(Object::Reference(info_ref)) => self.doc.get_dictionary(*info_ref).ok(),
            Ok(Object::Dictionary(dict)) => Some(dict),
            _ => None,
        };

        if let Some(dict) = dict {
            info.title = get_string_from_dict(dict, b"Title");
            info.author = get_string_from_dict(dict, b"Author");
            info.creator = get_string_from_dict(dict, b"Creator");
            info.producer = get_string_from_dict(dict, b"Producer");
            info.creation_date = get_string_from_dict(dict, b"CreationDate");
            info.mod_date = get_string_from_dict(dict, b"ModDate");
            info.subject = get_string_from_dict(dict, b"Subject");
            info.keywords = get_string_from_dict(dict, b"Keywords");
        }

        info.page_count = self.page_count();
        info
    }

    /// New document holding only the given 0-based pages, in document order.
    pub fn keep_pages(&self, indices: &[u32]) -> Result<Document> {
        let total = self.page_count();
        let keep = self.checked_indices(indices, total)?;

        let to_delete: Vec<u32> = (0..total)
            .filter(|index| !keep.contains(index))
            .map(|index| index + 1)
            .collect();

        let mut new_doc = self.doc.clone();
        if !to_delete.is_empty() {
            new_doc.delete_pages(&to_delete);
        }
        debug!(path = %self.path, kept = keep.len(), "kept pages");
        Ok(new_doc)
    }

    /// New document without the given 0-based pages.
    pub fn remove_pages(&self, indices: &[u32]) -> Result<Document> {
        let total = self.page_count();
        let remove = self.checked_indices(indices, total)?;

        if remove.len() as u32 == total {
            anyhow::bail!("Cannot remove every page of {}", self.path);
        }

        let to_delete: Vec<u32> = remove.iter().map(|index| index + 1).collect();
        let mut new_doc = self.doc.clone();
        new_doc.delete_pages(&to_delete);
        debug!(path = %self.path, removed = to_delete.len(), "removed pages");
        Ok(new_doc)
    }

    fn checked_indices(&self, indices: &[u32], total: u32) -> Result<BTreeSet<u32>> {
        if indices.is_empty() {
            anyhow::bail!("No pages specified");
        }
        for &index in indices {
            if index >= total {
                anyhow::bail!(
                    "Page {} is out of range (1-{}) in {}",
                    index + 1,
                    total,
                    self.path
                );
            }
        }
        Ok(indices.iter().copied().collect())
    }

    /// Drop unreachable objects, compress and write to `path`.
    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<()> {
        doc.prune_objects();
        doc.compress();
        doc.save(&path)
            .with_context(|| format!("Failed to save PDF: {}", path.as_ref().display()))?;
        debug!(path = %path.as_ref().display(), "saved document");
        Ok(())
    }
}

/// Object id of the root `/Pages` node.
pub fn pages_root(doc: &Document) -> Result<ObjectId> {
    doc.catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .context("Document catalog has no /Pages reference")
}

/// Page object ids ordered by page number.
pub fn ordered_page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct PdfInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub mod_date: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub page_count: u32,
}

fn get_string_from_dict(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(|obj| match obj {
        Object::String(bytes, _) => decode_pdf_string(bytes),
        _ => None,
    })
}

fn decode_pdf_string(bytes: &[u8]) -> Option<String> {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let u16_chars: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        String::from_utf16(&u16_chars).ok()
    } else {
        // Latin-1 is close enough to PDFDocEncoding for metadata display
        Some(bytes.iter().map(|&b| b as char).collect())
    }
}
