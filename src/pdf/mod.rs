pub mod document;
pub mod edit;
pub mod merge;
pub mod protect;
pub mod watermark;

#[cfg(test)]
pub(crate) mod testing;

pub use document::PdfDocument;
