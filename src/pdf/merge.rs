use anyhow::{anyhow, Context, Result};
use lopdf::{Document, Object, ObjectId};
use std::path::PathBuf;
use tracing::{debug, info};

use super::document::{ordered_page_ids, pages_root, PdfDocument};
use super::edit::materialize_inherited;
use crate::page_selection::parse_page_selection;

/// One merge input: a file plus the pages to take from it (blank means all).
#[derive(Debug, Clone)]
pub struct MergeInput {
    pub path: PathBuf,
    pub pages: String,
}

impl MergeInput {
    pub fn new(path: impl Into<PathBuf>, pages: impl Into<String>) -> Self {
        MergeInput {
            path: path.into(),
            pages: pages.into(),
        }
    }
}

/// Open every input, reduce it to its page selection and concatenate the results.
pub fn merge_files(inputs: &[MergeInput]) -> Result<Document> {
    if inputs.is_empty() {
        anyhow::bail!("No input files specified");
    }

    let mut parts = Vec::with_capacity(inputs.len());
    for input in inputs {
        let doc = PdfDocument::open(&input.path)?;
        let indices = parse_page_selection(&input.pages, doc.page_count())
            .map_err(|e| anyhow!("{}: {}", input.path.display(), e))?;
        debug!(path = %input.path.display(), selected = indices.len(), "selected pages for merge");
        parts.push(doc.keep_pages(&indices)?);
    }

    merge_documents(parts)
}

/// Append the pages of every document to the first one.
pub fn merge_documents(parts: Vec<Document>) -> Result<Document> {
    let mut parts = parts.into_iter();
    let mut merged = parts.next().context("No documents to merge")?;
    let root = pages_root(&merged)?;

    for mut doc in parts {
        doc.prune_objects();
        doc.renumber_objects_with(merged.max_id + 1);

        let page_ids = ordered_page_ids(&doc);
        for &page_id in &page_ids {
            materialize_inherited(&mut doc, page_id)?;
        }

        let max_id = doc.objects.keys().map(|(id, _)| *id).max().unwrap_or(0);
        merged.max_id = merged.max_id.max(max_id);
        merged.objects.extend(doc.objects);

        for &page_id in &page_ids {
            merged
                .get_dictionary_mut(page_id)?
                .set("Parent", Object::Reference(root));
        }
        append_kids(&mut merged, root, &page_ids)?;
    }

    info!(pages = merged.get_pages().len(), "merged documents");
    Ok(merged)
}

fn append_kids(doc: &mut Document, root: ObjectId, page_ids: &[ObjectId]) -> Result<()> {
    let root_dict = doc
        .get_dictionary_mut(root)
        .context("Root /Pages node is not a dictionary")?;

    let mut kids = root_dict
        .get(b"Kids")
        .and_then(Object::as_array)
        .cloned()
        .unwrap_or_default();
    kids.extend(page_ids.iter().map(|id| Object::Reference(*id)));

    let count = root_dict
        .get(b"Count")
        .and_then(Object::as_i64)
        .unwrap_or(0);

    root_dict.set("Kids", Object::Array(kids));
    root_dict.set("Count", Object::Integer(count + page_ids.len() as i64));
    Ok(())
}
