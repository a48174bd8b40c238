use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use mkdocx::docx::{
    BuildOptions, DOCX_MIME_TYPE, ImageFormat, ImageInput, PixelSize, Timestamp, build_image_docx,
    build_text_docx,
};
use mkdocx::zip::DosDateTime;
use mkdocx::{Error, ErrorKind};

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const WP_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Part names in archive order, and their contents.
fn unpack(bytes: &[u8]) -> (Vec<String>, BTreeMap<String, Vec<u8>>) {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("readable docx");
    let mut order = Vec::new();
    let mut parts = BTreeMap::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        let mut data = Vec::new();
        file.read_to_end(&mut data).unwrap();
        order.push(file.name().to_string());
        parts.insert(file.name().to_string(), data);
    }
    (order, parts)
}

fn xml(parts: &BTreeMap<String, Vec<u8>>, name: &str) -> String {
    String::from_utf8(parts[name].clone()).unwrap()
}

fn paragraph_texts(document_xml: &str) -> Vec<String> {
    let doc = roxmltree::Document::parse(document_xml).expect("well-formed document.xml");
    doc.descendants()
        .filter(|n| n.has_tag_name((W_NS, "p")))
        .map(|p| {
            p.descendants()
                .filter(|n| n.has_tag_name((W_NS, "t")))
                .filter_map(|t| t.text())
                .collect::<String>()
        })
        .collect()
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::new(width, height);
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

#[test]
fn text_document_has_one_paragraph_per_line() {
    let doc = build_text_docx("Hello\n\nWorld", &BuildOptions::reproducible()).unwrap();
    assert_eq!(doc.mime_type(), DOCX_MIME_TYPE);

    let (order, parts) = unpack(doc.as_bytes());
    assert_eq!(
        order,
        [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/document.xml",
            "word/_rels/document.xml.rels",
        ]
    );
    assert_eq!(paragraph_texts(&xml(&parts, "word/document.xml")), ["Hello", "World"]);
}

#[test]
fn text_document_escapes_markup() {
    let doc = build_text_docx("A & B < C\nx > y", &BuildOptions::reproducible()).unwrap();
    let (_, parts) = unpack(doc.as_bytes());
    let document = xml(&parts, "word/document.xml");

    assert!(document.contains("A &amp; B &lt; C"));
    assert_eq!(paragraph_texts(&document), ["A & B < C", "x > y"]);
}

#[test]
fn control_characters_do_not_break_the_document() {
    let doc = build_text_docx("page one\x0Cpage two\nbell\x07", &BuildOptions::reproducible())
        .unwrap();
    let (_, parts) = unpack(doc.as_bytes());
    let document = xml(&parts, "word/document.xml");

    assert!(!document.contains('\x0C'));
    assert_eq!(paragraph_texts(&document), ["page onepage two", "bell"]);
}

#[test]
fn empty_text_is_still_a_valid_package() {
    let doc = build_text_docx("", &BuildOptions::reproducible()).unwrap();
    let (order, parts) = unpack(doc.as_bytes());
    assert_eq!(order.len(), 4);

    let document = xml(&parts, "word/document.xml");
    assert!(paragraph_texts(&document).is_empty());
    let parsed = roxmltree::Document::parse(&document).unwrap();
    assert!(parsed.descendants().any(|n| n.has_tag_name((W_NS, "sectPr"))));

    let rels = xml(&parts, "word/_rels/document.xml.rels");
    let rels = roxmltree::Document::parse(&rels).unwrap();
    assert_eq!(rels.root_element().children().filter(|n| n.is_element()).count(), 0);
}

#[test]
fn every_xml_part_is_well_formed() {
    let text = build_text_docx("one\ntwo", &BuildOptions::reproducible()).unwrap();
    let image = build_image_docx(
        ImageInput {
            data: png_bytes(4, 2),
            format: ImageFormat::Png,
            dimensions: Some(PixelSize::new(4, 2)),
        },
        &BuildOptions::reproducible(),
    )
    .unwrap();

    for doc in [text, image] {
        let (_, parts) = unpack(doc.as_bytes());
        for (name, data) in &parts {
            if name.ends_with(".xml") || name.ends_with(".rels") {
                let s = std::str::from_utf8(data).unwrap();
                roxmltree::Document::parse(s).unwrap_or_else(|e| panic!("{name}: {e}"));
            }
        }
    }
}

#[test]
fn package_relationship_points_at_document() {
    let doc = build_text_docx("x", &BuildOptions::reproducible()).unwrap();
    let (_, parts) = unpack(doc.as_bytes());
    let rels = xml(&parts, "_rels/.rels");
    let rels = roxmltree::Document::parse(&rels).unwrap();
    let rel = rels
        .descendants()
        .find(|n| n.has_tag_name("Relationship"))
        .unwrap();
    assert_eq!(rel.attribute("Id"), Some("rId1"));
    assert!(parts.contains_key(rel.attribute("Target").unwrap()));
}

#[test]
fn image_document_wires_media_part() {
    let png = png_bytes(20, 10);
    let doc = build_image_docx(
        ImageInput {
            data: png.clone(),
            format: ImageFormat::Png,
            dimensions: Some(PixelSize::new(2000, 1000)),
        },
        &BuildOptions::reproducible(),
    )
    .unwrap();

    let (order, parts) = unpack(doc.as_bytes());
    assert_eq!(
        order,
        [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/_rels/document.xml.rels",
            "word/document.xml",
            "word/media/image1.png",
        ]
    );
    assert_eq!(parts["word/media/image1.png"], png);

    // body -> relationship -> media part
    let document = xml(&parts, "word/document.xml");
    let document = roxmltree::Document::parse(&document).unwrap();
    let blip = document
        .descendants()
        .find(|n| n.has_tag_name((A_NS, "blip")))
        .unwrap();
    let embed = blip.attribute((R_NS, "embed")).unwrap();

    let rels = xml(&parts, "word/_rels/document.xml.rels");
    let rels = roxmltree::Document::parse(&rels).unwrap();
    let rel = rels
        .descendants()
        .find(|n| n.attribute("Id") == Some(embed))
        .expect("relationship for r:embed");
    let target = format!("word/{}", rel.attribute("Target").unwrap());
    assert!(parts.contains_key(&target));

    // extension -> content type
    let ct = xml(&parts, "[Content_Types].xml");
    assert!(ct.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));

    // capped extents, 2:1 preserved
    let extent = document
        .descendants()
        .find(|n| n.has_tag_name((WP_NS, "extent")))
        .unwrap();
    assert_eq!(extent.attribute("cx"), Some("5486400"));
    assert_eq!(extent.attribute("cy"), Some("2743200"));
}

#[test]
fn jpeg_is_the_default_format() {
    let doc = build_image_docx(
        ImageInput {
            data: vec![0xFF, 0xD8, 0xFF],
            format: ImageFormat::from_file_name("photo.jpg"),
            dimensions: Some(PixelSize::new(100, 100)),
        },
        &BuildOptions::reproducible(),
    )
    .unwrap();

    let (_, parts) = unpack(doc.as_bytes());
    assert!(parts.contains_key("word/media/image1.jpeg"));
    assert!(xml(&parts, "[Content_Types].xml")
        .contains(r#"<Default Extension="jpeg" ContentType="image/jpeg"/>"#));
    assert!(xml(&parts, "word/_rels/document.xml.rels").contains(r#"Target="media/image1.jpeg""#));
    assert!(xml(&parts, "word/document.xml").contains(r#"<wp:extent cx="914400" cy="914400"/>"#));
}

#[test]
fn image_without_dimensions_is_rejected() {
    let err = build_image_docx(
        ImageInput {
            data: b"not decodable".to_vec(),
            format: ImageFormat::Jpeg,
            dimensions: mkdocx::io::read_dimensions(b"not decodable"),
        },
        &BuildOptions::reproducible(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::MissingImageDimensions));
    assert_eq!(err.kind(), ErrorKind::Precondition);
}

#[test]
fn decoded_dimensions_feed_the_producer() {
    let png = png_bytes(30, 15);
    let dimensions = mkdocx::io::read_dimensions(&png);
    assert_eq!(dimensions, Some(PixelSize::new(30, 15)));

    let doc = build_image_docx(
        ImageInput {
            data: png,
            format: ImageFormat::Png,
            dimensions,
        },
        &BuildOptions::reproducible(),
    )
    .unwrap();
    let (_, parts) = unpack(doc.as_bytes());
    // 30 * 9144 = 274320, half of it for the height
    assert!(xml(&parts, "word/document.xml").contains(r#"cx="274320" cy="137160""#));
}

#[test]
fn fixed_timestamp_makes_output_reproducible() {
    let options = BuildOptions::default()
        .with_timestamp(Timestamp::Fixed(DosDateTime::from_unix(1_700_000_000)));
    let a = build_text_docx("same\ninput", &options).unwrap();
    let b = build_text_docx("same\ninput", &options).unwrap();
    assert_eq!(a, b);

    let input = || ImageInput {
        data: vec![1, 2, 3],
        format: ImageFormat::Png,
        dimensions: Some(PixelSize::new(8, 6)),
    };
    assert_eq!(
        build_image_docx(input(), &options).unwrap(),
        build_image_docx(input(), &options).unwrap()
    );
}

#[test]
fn deflated_document_reads_back_identically() {
    let text = "a line of text that repeats\n".repeat(50);
    let stored = build_text_docx(&text, &BuildOptions::reproducible()).unwrap();
    let deflated = build_text_docx(
        &text,
        &BuildOptions::reproducible().with_compression(mkdocx::zip::CompressionMethod::Deflate),
    )
    .unwrap();

    assert!(deflated.len() < stored.len());
    assert_eq!(unpack(stored.as_bytes()), unpack(deflated.as_bytes()));
}
