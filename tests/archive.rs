use std::io::{Cursor, Read};

use mkdocx::zip::{ArchiveBuilder, CompressionMethod, DosDateTime, build_archive, crc32};

fn read_back(bytes: &[u8]) -> Vec<(String, u32, zip::CompressionMethod, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("readable archive");
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut data = Vec::new();
            file.read_to_end(&mut data).unwrap();
            (file.name().to_string(), file.crc32(), file.compression(), data)
        })
        .collect()
}

#[test]
fn stored_entries_round_trip() {
    let bytes = build_archive([
        ("a.xml", b"<a/>".to_vec()),
        ("b.bin", vec![0x01, 0x02, 0x03]),
    ])
    .unwrap();

    let entries = read_back(&bytes);
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0].0, "a.xml");
    assert_eq!(entries[0].1, crc32(b"<a/>"));
    assert_eq!(entries[0].2, zip::CompressionMethod::Stored);
    assert_eq!(entries[0].3, b"<a/>");

    assert_eq!(entries[1].0, "b.bin");
    assert_eq!(entries[1].1, crc32(&[1, 2, 3]));
    assert_eq!(entries[1].3, [1, 2, 3]);
}

#[test]
fn deflated_entries_round_trip() {
    let text = "The quick brown fox jumps over the lazy dog.\n".repeat(100);
    let mut builder = ArchiveBuilder::new().compression(CompressionMethod::Deflate);
    builder.add("word/document.xml", text.as_str()).unwrap();
    builder.add("tiny", "x").unwrap();
    let bytes = builder.build().unwrap();

    let entries = read_back(&bytes);
    assert_eq!(entries[0].2, zip::CompressionMethod::Deflated);
    assert_eq!(entries[0].3, text.as_bytes());
    assert_eq!(entries[1].2, zip::CompressionMethod::Stored);
    assert_eq!(entries[1].3, b"x");
    assert!(bytes.len() < text.len());
}

#[test]
fn explicit_store_matches_default() {
    let entries = || [("a.xml", b"<a/>".to_vec())];
    let mut explicit = ArchiveBuilder::new().compression(CompressionMethod::Stored);
    explicit.add("a.xml", "<a/>").unwrap();
    assert_eq!(explicit.build().unwrap(), build_archive(entries()).unwrap());
}

#[test]
fn timestamp_lands_in_both_headers() {
    let ts = DosDateTime::from_unix(1_700_000_000); // 2023-11-14T22:13:20Z
    assert_eq!(ts.ymd(), (2023, 11, 14));
    assert_eq!(ts.hms(), (22, 13, 20));

    let mut builder = ArchiveBuilder::new().modified(ts);
    builder.add("a", "1").unwrap();
    let bytes = builder.build().unwrap();

    let le16 = |at: usize| u16::from_le_bytes([bytes[at], bytes[at + 1]]);
    // local header: time at 10, date at 12
    assert_eq!((le16(10), le16(12)), (ts.time(), ts.date()));
    // central directory follows the 30 + 1 + 1 byte entry: time at +12, date at +14
    assert_eq!((le16(32 + 12), le16(32 + 14)), (ts.time(), ts.date()));
}

#[test]
fn unicode_names_survive() {
    let bytes = build_archive([("word/médias/ümlaut.xml", b"<x/>".to_vec())]).unwrap();
    let entries = read_back(&bytes);
    assert_eq!(entries[0].0, "word/médias/ümlaut.xml");
}
