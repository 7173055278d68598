//! In-memory fixtures for the PDF unit tests.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// Every page carries a `/Tag` integer (its original 1-based number) so tests
/// can follow pages through edits.
pub const TAG: &[u8] = b"Tag";

fn letter_box() -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ])
}

fn font_resources() -> Dictionary {
    let mut font = Dictionary::new();
    font.set("Type", Object::Name(b"Font".to_vec()));
    font.set("Subtype", Object::Name(b"Type1".to_vec()));
    font.set("BaseFont", Object::Name(b"Helvetica".to_vec()));

    let mut fonts = Dictionary::new();
    fonts.set("F1", Object::Dictionary(font));

    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));
    resources
}

fn add_page(doc: &mut Document, parent: ObjectId, tag: u32) -> ObjectId {
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(12)]),
            Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
            Operation::new(
                "Tj",
                vec![Object::String(
                    format!("Page {}", tag).into_bytes(),
                    StringFormat::Literal,
                )],
            ),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

    let mut page = Dictionary::new();
    page.set("Type", Object::Name(b"Page".to_vec()));
    page.set("Parent", Object::Reference(parent));
    page.set("Contents", Object::Reference(content_id));
    page.set(TAG, Object::Integer(i64::from(tag)));
    doc.add_object(page)
}

fn finish(doc: &mut Document, pages_id: ObjectId, kids: &[ObjectId], count: u32) {
    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Count", Object::Integer(i64::from(count)));
    pages.set(
        "Kids",
        Object::Array(kids.iter().map(|id| Object::Reference(*id)).collect()),
    );
    // Inheritable attributes live on the root so edits must resolve them.
    pages.set("MediaBox", letter_box());
    pages.set("Resources", Object::Dictionary(font_resources()));
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));
}

/// A flat document with `num_pages` pages.
pub fn sample_document(num_pages: u32) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let kids: Vec<ObjectId> = (1..=num_pages)
        .map(|tag| add_page(&mut doc, pages_id, tag))
        .collect();
    finish(&mut doc, pages_id, &kids, num_pages);
    doc
}

/// A document whose pages sit under two intermediate `/Pages` nodes.
pub fn nested_document(num_pages: u32) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let split = num_pages / 2;

    let mut branches = Vec::new();
    for range in [1..=split, split + 1..=num_pages] {
        let branch_id = doc.new_object_id();
        let kids: Vec<Object> = range
            .map(|tag| Object::Reference(add_page(&mut doc, branch_id, tag)))
            .collect();
        let mut branch = Dictionary::new();
        branch.set("Type", Object::Name(b"Pages".to_vec()));
        branch.set("Parent", Object::Reference(pages_id));
        branch.set("Count", Object::Integer(kids.len() as i64));
        branch.set("Kids", Object::Array(kids));
        doc.objects.insert(branch_id, Object::Dictionary(branch));
        branches.push(branch_id);
    }

    finish(&mut doc, pages_id, &branches, num_pages);
    doc
}

/// `/Tag` values of the pages in page order.
pub fn page_tags(doc: &Document) -> Vec<i64> {
    doc.get_pages()
        .into_values()
        .map(|id| {
            doc.get_dictionary(id)
                .and_then(|page| page.get(TAG))
                .and_then(Object::as_i64)
                .unwrap()
        })
        .collect()
}

pub fn save_sample(dir: &std::path::Path, name: &str, num_pages: u32) -> std::path::PathBuf {
    let path = dir.join(name);
    sample_document(num_pages).save(&path).unwrap();
    path
}
