use anyhow::{bail, Result};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::f32::consts::FRAC_1_SQRT_2;
use tracing::debug;

use super::document::ordered_page_ids;
use super::edit::materialize_inherited;

const FONT_NAME: &str = "PdfPagesWm";
const GSTATE_NAME: &str = "PdfPagesGs";

// Average Helvetica glyph width as a fraction of the font size.
const HELVETICA_AVG_WIDTH: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct WatermarkOptions {
    pub text: String,
    pub font_size: f32,
    pub opacity: f32,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        WatermarkOptions {
            text: String::new(),
            font_size: 48.0,
            opacity: 0.3,
        }
    }
}

impl WatermarkOptions {
    fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            bail!("Watermark text must not be empty");
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            bail!("Opacity must be between 0 and 1, got {}", self.opacity);
        }
        if self.font_size.is_nan() || self.font_size <= 0.0 {
            bail!("Font size must be positive, got {}", self.font_size);
        }
        Ok(())
    }
}

/// Shared objects every stamped page points at.
struct StampObjects {
    font: ObjectId,
    gstate: ObjectId,
    save: ObjectId,
    restore: ObjectId,
}

impl StampObjects {
    fn add_to(doc: &mut Document, opacity: f32) -> Self {
        let mut font = Dictionary::new();
        font.set("Type", Object::Name(b"Font".to_vec()));
        font.set("Subtype", Object::Name(b"Type1".to_vec()));
        font.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
        font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));

        let mut gstate = Dictionary::new();
        gstate.set("Type", Object::Name(b"ExtGState".to_vec()));
        gstate.set("ca", Object::Real(opacity));
        gstate.set("CA", Object::Real(opacity));

        StampObjects {
            font: doc.add_object(font),
            gstate: doc.add_object(gstate),
            save: doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec())),
            restore: doc.add_object(Stream::new(Dictionary::new(), b"Q\n".to_vec())),
        }
    }
}

/// Stamp `options.text` diagonally across the given 0-based pages.
pub fn watermark_pages(doc: &mut Document, indices: &[u32], options: &WatermarkOptions) -> Result<()> {
    options.validate()?;

    let pages = ordered_page_ids(doc);
    for &index in indices {
        if index as usize >= pages.len() {
            bail!(
                "Page {} is out of range (1-{})",
                u64::from(index) + 1,
                pages.len()
            );
        }
    }

    let shared = StampObjects::add_to(doc, options.opacity);
    for &index in indices {
        stamp_page(doc, pages[index as usize], &shared, options)?;
        debug!(page = index + 1, "stamped watermark");
    }
    Ok(())
}

fn stamp_page(
    doc: &mut Document,
    page_id: ObjectId,
    shared: &StampObjects,
    options: &WatermarkOptions,
) -> Result<()> {
    materialize_inherited(doc, page_id)?;
    let page = doc.get_dictionary(page_id)?.clone();

    let mut resources = resolve_dictionary(doc, page.get(b"Resources").ok())?;
    let font_name = insert_resource(doc, &mut resources, b"Font", FONT_NAME, shared.font)?;
    let gstate_name = insert_resource(doc, &mut resources, b"ExtGState", GSTATE_NAME, shared.gstate)?;

    let (x0, y0, x1, y1) = media_box(&page);
    let text_width = options.text.chars().count() as f32 * options.font_size * HELVETICA_AVG_WIDTH;
    let (cos, sin) = (FRAC_1_SQRT_2, FRAC_1_SQRT_2);
    let center_x = (x0 + x1) / 2.0;
    let center_y = (y0 + y1) / 2.0;
    let start_x = center_x - text_width / 2.0 * cos + options.font_size / 3.0 * sin;
    let start_y = center_y - text_width / 2.0 * sin - options.font_size / 3.0 * cos;

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new("gs", vec![Object::Name(gstate_name.into_bytes())]),
            Operation::new("g", vec![Object::Real(0.5)]),
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(font_name.into_bytes()),
                    Object::Real(options.font_size),
                ],
            ),
            Operation::new(
                "Tm",
                vec![
                    Object::Real(cos),
                    Object::Real(sin),
                    Object::Real(-sin),
                    Object::Real(cos),
                    Object::Real(start_x),
                    Object::Real(start_y),
                ],
            ),
            Operation::new(
                "Tj",
                vec![Object::String(
                    encode_win_ansi(&options.text),
                    StringFormat::Literal,
                )],
            ),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
        ],
    };
    let stamp_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

    let existing = existing_contents(doc, &page);
    let mut contents = Vec::with_capacity(existing.len() + 3);
    if !existing.is_empty() {
        contents.push(Object::Reference(shared.save));
        contents.extend(existing);
        contents.push(Object::Reference(shared.restore));
    }
    contents.push(Object::Reference(stamp_id));

    let page = doc.get_dictionary_mut(page_id)?;
    page.set("Resources", Object::Dictionary(resources));
    page.set("Contents", Object::Array(contents));
    Ok(())
}

/// Content stream references of a page. A `/Contents` reference may point at
/// an array of streams, which is flattened.
fn existing_contents(doc: &Document, page: &Dictionary) -> Vec<Object> {
    match page.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

fn resolve_dictionary(doc: &Document, object: Option<&Object>) -> Result<Dictionary> {
    match object {
        None => Ok(Dictionary::new()),
        Some(Object::Reference(id)) => Ok(doc.get_dictionary(*id)?.clone()),
        Some(Object::Dictionary(dict)) => Ok(dict.clone()),
        Some(other) => bail!("Expected a dictionary, found {:?}", other),
    }
}

/// Register `id` in the `category` sub-dictionary under a name not already
/// taken, returning that name.
fn insert_resource(
    doc: &Document,
    resources: &mut Dictionary,
    category: &[u8],
    base: &str,
    id: ObjectId,
) -> Result<String> {
    let mut entries = resolve_dictionary(doc, resources.get(category).ok())?;

    let mut name = base.to_string();
    let mut suffix = 1;
    while entries.has(name.as_bytes()) {
        suffix += 1;
        name = format!("{}{}", base, suffix);
    }

    entries.set(name.as_bytes(), Object::Reference(id));
    resources.set(category, Object::Dictionary(entries));
    Ok(name)
}

fn media_box(page: &Dictionary) -> (f32, f32, f32, f32) {
    let letter = (0.0, 0.0, 612.0, 792.0);
    let Ok(values) = page.get(b"MediaBox").and_then(Object::as_array) else {
        return letter;
    };
    let numbers: Vec<f32> = values
        .iter()
        .filter_map(|v| match v {
            Object::Integer(i) => Some(*i as f32),
            Object::Real(r) => Some(*r),
            _ => None,
        })
        .collect();
    match numbers.as_slice() {
        [x0, y0, x1, y1] => (x0.min(*x1), y0.min(*y1), x0.max(*x1), y0.max(*y1)),
        _ => letter,
    }
}

// WinAnsi matches Latin-1 for printable characters; anything else becomes '?'.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            code @ 0x20..=0x7E | code @ 0xA0..=0xFF => code as u8,
            _ => b'?',
        })
        .collect()
}
