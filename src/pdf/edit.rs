use anyhow::{anyhow, bail, Context, Result};
use lopdf::{Document, Object, ObjectId};
use std::collections::BTreeSet;
use tracing::debug;

use super::document::{ordered_page_ids, pages_root};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

// Guards against malformed trees whose /Parent links form a cycle.
const MAX_TREE_DEPTH: usize = 64;

/// Look up `key` on the page or, failing that, on the nearest ancestor that has it.
pub fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Copy inherited attributes onto the page itself, so it can be moved to
/// another parent without changing how it renders.
pub fn materialize_inherited(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let page = doc.get_dictionary(page_id)?;
    let missing: Vec<(&[u8], Object)> = INHERITABLE
        .iter()
        .filter(|key| !page.has(key))
        .filter_map(|key| inherited_attribute(doc, page_id, key).map(|value| (*key, value)))
        .collect();

    let page = doc.get_dictionary_mut(page_id)?;
    for (key, value) in missing {
        page.set(key, value);
    }
    Ok(())
}

fn page_id_at(pages: &[ObjectId], index: u32) -> Result<ObjectId> {
    pages
        .get(index as usize)
        .copied()
        .ok_or_else(|| {
            anyhow!(
                "Page {} is out of range (1-{})",
                u64::from(index) + 1,
                pages.len()
            )
        })
}

/// Rotate the given 0-based pages clockwise by `angle` degrees.
pub fn rotate_pages(doc: &mut Document, indices: &[u32], angle: i64) -> Result<()> {
    if angle % 90 != 0 {
        bail!("Rotation must be a multiple of 90 degrees, got {}", angle);
    }

    let pages = ordered_page_ids(doc);
    for &index in indices {
        let page_id = page_id_at(&pages, index)?;
        let current = inherited_attribute(doc, page_id, b"Rotate")
            .and_then(|value| value.as_i64().ok())
            .unwrap_or(0);
        let rotation = (current.rem_euclid(360) + angle.rem_euclid(360)) % 360;
        doc.get_dictionary_mut(page_id)?
            .set("Rotate", Object::Integer(rotation));
        debug!(page = index + 1, rotation, "rotated page");
    }
    Ok(())
}

/// Parse a full page order like "3,1,2": every page exactly once, 1-based.
pub fn parse_page_order(input: &str, total_pages: u32) -> Result<Vec<u32>> {
    if total_pages == 0 {
        bail!("Unknown page count");
    }

    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        bail!("Enter the new page order");
    }

    let mut order = Vec::with_capacity(total_pages as usize);
    let mut seen = BTreeSet::new();
    for part in compact.split(',').filter(|part| !part.is_empty()) {
        let page: u32 = part
            .parse()
            .map_err(|_| anyhow!("\"{}\" is not a valid page number", part))?;
        if page == 0 || page > total_pages {
            bail!("Page {} is out of bounds", page);
        }
        if !seen.insert(page) {
            bail!("Page {} appears more than once", page);
        }
        order.push(page);
    }

    if order.len() as u32 != total_pages {
        let missing: Vec<String> = (1..=total_pages)
            .filter(|page| !seen.contains(page))
            .map(|page| page.to_string())
            .collect();
        bail!("Missing page(s) {}", missing.join(", "));
    }

    Ok(order)
}

/// Rearrange pages to `order` (1-based page numbers, a full permutation).
///
/// The page tree is flattened: every page becomes a direct kid of the root
/// `/Pages` node, with inherited attributes copied down first.
pub fn reorder_pages(doc: &mut Document, order: &[u32]) -> Result<()> {
    let pages = ordered_page_ids(doc);
    if order.len() != pages.len() {
        bail!(
            "Page order lists {} page(s) but the document has {}",
            order.len(),
            pages.len()
        );
    }

    let distinct: BTreeSet<u32> = order.iter().copied().collect();
    if distinct.len() != order.len() {
        bail!("Page order lists a page more than once");
    }

    let root = pages_root(doc)?;
    for &page_id in &pages {
        materialize_inherited(doc, page_id)?;
        doc.get_dictionary_mut(page_id)?
            .set("Parent", Object::Reference(root));
    }

    let kids = order
        .iter()
        .map(|&page| {
            let index = page
                .checked_sub(1)
                .ok_or_else(|| anyhow!("Page numbers start at 1"))?;
            page_id_at(&pages, index).map(Object::Reference)
        })
        .collect::<Result<Vec<_>>>()?;

    let root_dict = doc
        .get_dictionary_mut(root)
        .context("Root /Pages node is not a dictionary")?;
    root_dict.set("Kids", Object::Array(kids));
    root_dict.set("Count", Object::Integer(pages.len() as i64));
    debug!(pages = pages.len(), "reordered pages");
    Ok(())
}
