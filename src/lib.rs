//! # mkdocx
//!
//! Build Word (`.docx`) documents from plain text or a single image.
//!
//! A `.docx` file is a ZIP archive of XML parts. This crate writes both
//! layers itself: the [`zip`] module lays out local headers, the central
//! directory and the end record by hand, and the [`docx`] module generates
//! the WordprocessingML parts that Word-compatible readers expect.
//!
//! ## Features
//!
//! - Text to document: one paragraph per non-blank line
//! - Image to document: one inline picture, aspect ratio preserved
//! - STORE archives by default, optional DEFLATE
//! - Reproducible output with a fixed timestamp
//!
//! ## Example
//!
//! ```
//! use mkdocx::docx::{BuildOptions, build_text_docx};
//!
//! let doc = build_text_docx("Hello\n\nWorld", &BuildOptions::reproducible())?;
//! assert_eq!(&doc.as_bytes()[0..4], b"PK\x03\x04");
//! assert_eq!(
//!     doc.mime_type(),
//!     "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
//! );
//! # Ok::<(), mkdocx::Error>(())
//! ```

pub mod cli;
pub mod docx;
pub mod error;
pub mod io;
pub mod zip;

pub use cli::{Cli, Command};
pub use docx::{BuildOptions, DocxDocument, build_image_docx, build_text_docx};
pub use error::{Error, ErrorKind, Result};
pub use zip::{ArchiveBuilder, crc32};
