//! Plain text to Word: one paragraph per non-blank line.

use log::debug;

use crate::error::Result;

use super::DocxDocument;
use super::options::BuildOptions;
use super::package::*;
use super::xml::escape_text;

const WORDPROCESSING_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Lines that become paragraphs: split on `\n`, a trailing `\r` removed,
/// blank lines dropped. Kept lines are not trimmed.
pub fn paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
}

/// `word/document.xml` for the given text.
pub fn document_xml(text: &str) -> String {
    let mut body = String::with_capacity(text.len() + 64);
    for line in paragraphs(text) {
        body.push_str(r#"<w:p><w:r><w:t xml:space="preserve">"#);
        body.push_str(&escape_text(line));
        body.push_str("</w:t></w:r></w:p>");
    }

    format!(
        "{XML_DECLARATION}\n<w:document xmlns:w=\"{WORDPROCESSING_NS}\">\n  <w:body>{body}<w:sectPr/></w:body>\n</w:document>"
    )
}

/// Build a document from extracted text.
///
/// Empty input is fine: the body then holds only the section properties.
pub fn build_text_docx(text: &str, options: &BuildOptions) -> Result<DocxDocument> {
    debug!("text document: {} paragraphs", paragraphs(text).count());

    let mut package = Package::new(options);
    package
        .add_part(CONTENT_TYPES_PART, ContentTypes::for_document().to_xml())?
        .add_part(PACKAGE_RELS_PART, Relationships::for_package().to_xml())?
        .add_part(DOCUMENT_PART, document_xml(text))?
        .add_part(DOCUMENT_RELS_PART, Relationships::new().to_xml())?;
    package.finish()
}
