//! OOXML package assembly.
//!
//! A Word package is a ZIP archive of named parts. Two of them describe the
//! others: `[Content_Types].xml` maps extensions and part names to MIME
//! types, and relationship parts (`*.rels`) wire parts together by ID.

use log::debug;

use crate::error::Result;
use crate::zip::ArchiveBuilder;

use super::DocxDocument;
use super::options::BuildOptions;
use super::xml::escape_attr;

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub const PACKAGE_RELS_PART: &str = "_rels/.rels";
pub const DOCUMENT_PART: &str = "word/document.xml";
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

pub mod content_type {
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const DOCUMENT_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
}

pub mod rel_type {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
}

const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// `[Content_Types].xml`
#[derive(Debug, Clone)]
pub struct ContentTypes {
    defaults: Vec<(String, &'static str)>,
    overrides: Vec<(String, &'static str)>,
}

impl ContentTypes {
    /// Defaults for `rels` and `xml`, plus the main document override.
    pub fn for_document() -> Self {
        let mut ct = Self {
            defaults: Vec::new(),
            overrides: Vec::new(),
        };
        ct.add_default("rels", content_type::RELATIONSHIPS);
        ct.add_default("xml", content_type::XML);
        ct.add_override(&format!("/{DOCUMENT_PART}"), content_type::DOCUMENT_MAIN);
        ct
    }

    pub fn add_default(&mut self, extension: &str, content_type: &'static str) -> &mut Self {
        self.defaults.push((extension.to_string(), content_type));
        self
    }

    pub fn add_override(&mut self, part_name: &str, content_type: &'static str) -> &mut Self {
        self.overrides.push((part_name.to_string(), content_type));
        self
    }

    pub fn to_xml(&self) -> String {
        let mut xml = format!("{XML_DECLARATION}\n<Types xmlns=\"{CONTENT_TYPES_NS}\">\n");
        for (ext, ct) in &self.defaults {
            xml.push_str(&format!(
                "  <Default Extension=\"{}\" ContentType=\"{}\"/>\n",
                escape_attr(ext),
                ct
            ));
        }
        for (part, ct) in &self.overrides {
            xml.push_str(&format!(
                "  <Override PartName=\"{}\" ContentType=\"{}\"/>\n",
                escape_attr(part),
                ct
            ));
        }
        xml.push_str("</Types>");
        xml
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: &'static str,
    pub target: String,
}

/// A relationships part, either package-level or owned by a part.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    rels: Vec<Relationship>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Package relationships: `rId1` pointing at the main document.
    pub fn for_package() -> Self {
        let mut rels = Self::new();
        rels.add("rId1", rel_type::OFFICE_DOCUMENT, DOCUMENT_PART);
        rels
    }

    pub fn add(&mut self, id: &str, rel_type: &'static str, target: &str) -> &mut Self {
        self.rels.push(Relationship {
            id: id.to_string(),
            rel_type,
            target: target.to_string(),
        });
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    pub fn to_xml(&self) -> String {
        let mut xml = format!("{XML_DECLARATION}\n<Relationships xmlns=\"{RELATIONSHIPS_NS}\">\n");
        for rel in &self.rels {
            xml.push_str(&format!(
                "  <Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"/>\n",
                escape_attr(&rel.id),
                rel.rel_type,
                escape_attr(&rel.target)
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// Parts of a package in the order they will be archived.
pub struct Package {
    archive: ArchiveBuilder,
}

impl Package {
    pub fn new(options: &BuildOptions) -> Self {
        let archive = ArchiveBuilder::new()
            .modified(options.timestamp.resolve())
            .compression(options.compression);
        Self { archive }
    }

    /// Add a part. Part names are archive entry names, without a leading
    /// slash.
    pub fn add_part(&mut self, name: &str, data: impl Into<Vec<u8>>) -> Result<&mut Self> {
        self.archive.add(name, data)?;
        Ok(self)
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.archive.entries().iter().map(|e| e.name.as_str())
    }

    /// Serialize the package into a `.docx` blob.
    pub fn finish(self) -> Result<DocxDocument> {
        let bytes = self.archive.build()?;
        debug!(
            "package: {} parts, {} bytes",
            self.archive.len(),
            bytes.len()
        );
        Ok(DocxDocument::new(bytes))
    }
}
