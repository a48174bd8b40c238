//! Single image to Word: one inline picture in one paragraph.
//!
//! Pixel dimensions come from the caller (whatever decoded the image). They
//! are only used for the drawing extents; the image bytes are embedded
//! as-is.

use log::debug;

use crate::error::{Error, Result};

use super::DocxDocument;
use super::options::BuildOptions;
use super::package::*;

/// EMU per source pixel.
///
/// Note this is 914400 / 100, not the 9525 EMU/px of a 96 dpi screen.
/// Existing documents were sized with it, so it stays.
pub const EMU_PER_PIXEL: u64 = 9144;

/// Widest picture placed on the page: 6 inches.
pub const MAX_WIDTH_EMU: u64 = 5_486_400;

/// Relationship ID the drawing uses to reference the media part.
pub const IMAGE_REL_ID: &str = "rId1";

/// Format tag of the embedded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// `png` (any case) is PNG; everything else is treated as JPEG.
    pub fn from_extension(ext: &str) -> Self {
        if ext.eq_ignore_ascii_case("png") {
            ImageFormat::Png
        } else {
            ImageFormat::Jpeg
        }
    }

    /// Format from the extension of a file name or URL path.
    pub fn from_file_name(name: &str) -> Self {
        let ext = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        Self::from_extension(ext)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => content_type::PNG,
            ImageFormat::Jpeg => content_type::JPEG,
        }
    }

    /// Archive entry name of the media part.
    pub fn media_part(&self) -> String {
        format!("word/media/image1.{}", self.extension())
    }

    /// Relationship target, relative to `word/`.
    pub fn media_target(&self) -> String {
        format!("media/image1.{}", self.extension())
    }
}

/// Decoded pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Drawing extents in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub cx: u64,
    pub cy: u64,
}

impl Extent {
    /// Width is `pixels * EMU_PER_PIXEL` capped at [`MAX_WIDTH_EMU`]; height
    /// follows from the source aspect ratio.
    pub fn from_pixels(size: PixelSize) -> Result<Self> {
        if size.width == 0 || size.height == 0 {
            return Err(Error::InvalidImageDimensions {
                width: size.width,
                height: size.height,
            });
        }

        let cx = (size.width as u64 * EMU_PER_PIXEL).min(MAX_WIDTH_EMU);
        let aspect = size.height as f64 / size.width as f64;
        let cy = (cx as f64 * aspect).round() as u64;
        Ok(Self { cx, cy })
    }
}

/// Input of the image producer.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub data: Vec<u8>,
    pub format: ImageFormat,
    /// `None` when decoding failed upstream.
    pub dimensions: Option<PixelSize>,
}

/// `word/document.xml` holding one inline picture.
pub fn drawing_document_xml(extent: Extent) -> String {
    let Extent { cx, cy } = extent;
    format!(
        r#"{XML_DECLARATION}
<w:document xmlns:wpc="http://schemas.microsoft.com/office/word/2010/wordprocessingCanvas"
  xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006"
  xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"
  xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"
  xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
  xmlns:w14="http://schemas.microsoft.com/office/word/2010/wordml"
  xmlns:wp14="http://schemas.microsoft.com/office/word/2010/wordprocessingDrawing"
  mc:Ignorable="w14 wp14">
  <w:body>
    <w:p>
      <w:r>
        <w:drawing>
          <wp:inline distT="0" distB="0" distL="0" distR="0">
            <wp:extent cx="{cx}" cy="{cy}"/>
            <wp:effectExtent l="0" t="0" r="0" b="0"/>
            <wp:docPr id="1" name="Image1"/>
            <wp:cNvGraphicFramePr>
              <a:graphicFrameLocks xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" noChangeAspect="1"/>
            </wp:cNvGraphicFramePr>
            <a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
              <a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">
                <pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">
                  <pic:nvPicPr>
                    <pic:cNvPr id="1" name="Image1"/>
                    <pic:cNvPicPr/>
                  </pic:nvPicPr>
                  <pic:blipFill>
                    <a:blip r:embed="{IMAGE_REL_ID}"/>
                    <a:stretch><a:fillRect/></a:stretch>
                  </pic:blipFill>
                  <pic:spPr>
                    <a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>
                    <a:prstGeom prst="rect"><a:avLst/></a:prstGeom>
                  </pic:spPr>
                </pic:pic>
              </a:graphicData>
            </a:graphic>
          </wp:inline>
        </w:drawing>
      </w:r>
    </w:p>
    <w:sectPr/>
  </w:body>
</w:document>"#
    )
}

/// Build a document embedding one image.
///
/// # Errors
///
/// [`Error::MissingImageDimensions`] if the image could not be decoded
/// upstream, [`Error::InvalidImageDimensions`] for a zero side.
pub fn build_image_docx(input: ImageInput, options: &BuildOptions) -> Result<DocxDocument> {
    let size = input.dimensions.ok_or(Error::MissingImageDimensions)?;
    let extent = Extent::from_pixels(size)?;
    let format = input.format;
    debug!(
        "image document: {}x{} px {} -> {}x{} EMU",
        size.width,
        size.height,
        format.extension(),
        extent.cx,
        extent.cy
    );

    let mut content_types = ContentTypes::for_document();
    content_types.add_default(format.extension(), format.content_type());

    let mut document_rels = Relationships::new();
    document_rels.add(IMAGE_REL_ID, rel_type::IMAGE, &format.media_target());

    let mut package = Package::new(options);
    package
        .add_part(CONTENT_TYPES_PART, content_types.to_xml())?
        .add_part(PACKAGE_RELS_PART, Relationships::for_package().to_xml())?
        .add_part(DOCUMENT_RELS_PART, document_rels.to_xml())?
        .add_part(DOCUMENT_PART, drawing_document_xml(extent))?
        .add_part(&format.media_part(), input.data)?;
    package.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn wide_image_is_capped() {
        let extent = Extent::from_pixels(PixelSize::new(2000, 1000)).unwrap();
        assert_eq!(extent, Extent { cx: 5_486_400, cy: 2_743_200 });
    }

    #[test]
    fn small_image_uses_pixel_multiplier() {
        let extent = Extent::from_pixels(PixelSize::new(100, 100)).unwrap();
        assert_eq!(extent, Extent { cx: 914_400, cy: 914_400 });
    }

    #[test]
    fn height_is_rounded_from_aspect_ratio() {
        // 300 * 9144 = 2_743_200; * 7/3 = 6_400_800
        let extent = Extent::from_pixels(PixelSize::new(300, 700)).unwrap();
        assert_eq!(extent.cx, 2_743_200);
        assert_eq!(extent.cy, 6_400_800);

        // capped width, 5_486_400 / 3 = 1_828_800
        let extent = Extent::from_pixels(PixelSize::new(3000, 1000)).unwrap();
        assert_eq!(extent.cy, 1_828_800);
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let err = Extent::from_pixels(PixelSize::new(0, 10)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Precondition);
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ImageFormat::from_extension("PNG"), ImageFormat::Png);
        assert_eq!(ImageFormat::from_extension("jpg"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_extension("webp"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_file_name("scan.final.png"), ImageFormat::Png);
        assert_eq!(ImageFormat::from_file_name("noext"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::Jpeg.media_part(), "word/media/image1.jpeg");
        assert_eq!(ImageFormat::Png.media_target(), "media/image1.png");
    }

    #[test]
    fn missing_dimensions_fail_before_building() {
        let input = ImageInput {
            data: vec![0x89, b'P', b'N', b'G'],
            format: ImageFormat::Png,
            dimensions: None,
        };
        let err = build_image_docx(input, &BuildOptions::reproducible()).unwrap_err();
        assert!(matches!(err, Error::MissingImageDimensions));
    }

    #[test]
    fn drawing_references_image_relationship() {
        let xml = drawing_document_xml(Extent { cx: 10, cy: 20 });
        assert!(xml.contains(r#"<wp:extent cx="10" cy="20"/>"#));
        assert!(xml.contains(r#"<a:ext cx="10" cy="20"/>"#));
        assert!(xml.contains(r#"<a:blip r:embed="rId1"/>"#));
        assert!(xml.contains(r#"noChangeAspect="1""#));
    }

    #[test]
    fn ignorable_prefixes_are_declared() {
        let xml = drawing_document_xml(Extent { cx: 10, cy: 20 });
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let root = doc.root_element();
        assert_eq!(
            root.lookup_namespace_uri(Some("w14")),
            Some("http://schemas.microsoft.com/office/word/2010/wordml")
        );
        assert_eq!(
            root.lookup_namespace_uri(Some("wp14")),
            Some("http://schemas.microsoft.com/office/word/2010/wordprocessingDrawing")
        );
    }
}
