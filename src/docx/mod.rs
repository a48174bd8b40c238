//! Word document synthesis.
//!
//! Two producers share one package writer:
//!
//! - [`text`]: one paragraph per non-blank line of plain text
//! - [`image`]: a single inline picture sized from its pixel dimensions
//!
//! Both hand a fixed set of parts to [`package::Package`], which knows
//! nothing about what the parts mean and in turn hands them to the ZIP
//! builder.

pub mod image;
pub mod options;
pub mod package;
pub mod text;
pub mod xml;

pub use image::{Extent, ImageFormat, ImageInput, PixelSize, build_image_docx};
pub use options::{BuildOptions, Timestamp};
pub use text::build_text_docx;

/// MIME type of a `.docx` file.
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// A finished Word document, ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxDocument {
    bytes: Vec<u8>,
}

impl DocxDocument {
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn mime_type(&self) -> &'static str {
        DOCX_MIME_TYPE
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
