//! ZIP archive writer.
//!
//! Serializes an ordered list of named payloads into one in-memory archive.
//! Layout is the minimal single-disk form:
//!
//! 1. Local file header + payload, for each entry in insertion order
//! 2. Central directory, one header per entry, same order
//! 3. End of central directory record, no comment
//!
//! Writing happens in two phases. Phase one emits the entries and returns
//! an [`EntryRecord`] for each; phase two builds the central directory from
//! those records alone.

use flate2::Compression;
use flate2::write::DeflateEncoder;
use log::debug;
use std::borrow::Cow;
use std::collections::HashSet;
use std::io::Write;

use crate::error::{Error, Result};

use super::crc::crc32;
use super::structures::*;
use super::writer::ByteWriter;

/// One named payload destined for the archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub name: String,
    pub data: Vec<u8>,
}

/// What phase one learned about an entry, replayed by phase two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord<'a> {
    pub name: &'a str,
    pub method: CompressionMethod,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub offset: u32,
}

/// Entry after checksumming and optional compression, before layout.
struct PreparedEntry<'a> {
    name: &'a str,
    method: CompressionMethod,
    crc32: u32,
    uncompressed_size: u32,
    payload: Cow<'a, [u8]>,
}

/// Builder for an in-memory ZIP archive.
///
/// ## Example
///
/// ```
/// use mkdocx::zip::ArchiveBuilder;
///
/// let mut builder = ArchiveBuilder::new();
/// builder.add("a.xml", "<a/>")?;
/// builder.add("b.bin", vec![1u8, 2, 3])?;
/// let bytes = builder.build()?;
/// assert_eq!(&bytes[0..4], b"PK\x03\x04");
/// # Ok::<(), mkdocx::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArchiveBuilder {
    entries: Vec<ArchiveEntry>,
    names: HashSet<String>,
    modified: Option<DosDateTime>,
    method: CompressionMethod,
}

impl ArchiveBuilder {
    /// Create an empty builder that stores entries uncompressed and stamps
    /// them with the DOS epoch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp written into every header.
    pub fn modified(mut self, modified: DosDateTime) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Preferred compression method. DEFLATE is only used for entries it
    /// actually shrinks.
    pub fn compression(mut self, method: CompressionMethod) -> Self {
        self.method = method;
        self
    }

    /// Append an entry.
    ///
    /// # Errors
    ///
    /// Fails if the name is empty, malformed, or already present.
    pub fn add(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Result<&mut Self> {
        let name = name.into();
        validate_name(&name)?;
        if !self.names.insert(name.clone()) {
            return Err(Error::DuplicateEntry(name));
        }
        self.entries.push(ArchiveEntry {
            name,
            data: data.into(),
        });
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Serialize all entries into a complete archive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyArchive`] when nothing was added and
    /// [`Error::ArchiveTooLarge`] when a count, size or offset would need
    /// ZIP64. Nothing is written in either case.
    pub fn build(&self) -> Result<Vec<u8>> {
        if self.entries.is_empty() {
            return Err(Error::EmptyArchive);
        }
        let count =
            u16::try_from(self.entries.len()).map_err(|_| Error::ArchiveTooLarge("entry count"))?;

        let prepared = self
            .entries
            .iter()
            .map(|entry| prepare(entry, self.method))
            .collect::<Result<Vec<_>>>()?;

        let (entries_len, cd_len) = measure(&prepared)?;
        let modified = self.modified.unwrap_or(DosDateTime::EPOCH);

        let mut w = ByteWriter::with_capacity(entries_len + cd_len + EndOfCentralDirectory::SIZE);
        let records = write_entries(&prepared, modified, &mut w);
        let cd_offset = w.position() as u32;
        write_central_directory(&records, modified, &mut w);
        let cd_size = (w.position() - cd_offset as usize) as u32;
        EndOfCentralDirectory::new(count, cd_size, cd_offset).write_to(&mut w);

        debug!(
            "archive: {} entries, central directory {} bytes at {}, total {} bytes",
            count,
            cd_size,
            cd_offset,
            w.position()
        );
        Ok(w.into_inner())
    }
}

/// Build an archive from `(name, data)` pairs, stored, with the DOS epoch
/// as timestamp.
pub fn build_archive<I, N, D>(entries: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = (N, D)>,
    N: Into<String>,
    D: Into<Vec<u8>>,
{
    let mut builder = ArchiveBuilder::new();
    for (name, data) in entries {
        builder.add(name, data)?;
    }
    builder.build()
}

fn validate_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        return Err(Error::EmptyEntryName);
    } else if name.len() > u16::MAX as usize {
        "longer than 65535 bytes"
    } else if name.starts_with('/') {
        "absolute path"
    } else if name.contains('\\') {
        "backslash separator"
    } else if name.contains('\0') {
        "NUL byte"
    } else if name.split('/').any(|segment| segment == "..") {
        "parent directory segment"
    } else {
        return Ok(());
    };

    Err(Error::InvalidEntryName {
        name: name.to_string(),
        reason,
    })
}

fn prepare(entry: &ArchiveEntry, method: CompressionMethod) -> Result<PreparedEntry<'_>> {
    let uncompressed_size =
        u32::try_from(entry.data.len()).map_err(|_| Error::ArchiveTooLarge("entry size"))?;
    let crc32 = crc32(&entry.data);

    let (method, payload) = match method {
        CompressionMethod::Stored => (CompressionMethod::Stored, Cow::Borrowed(&entry.data[..])),
        CompressionMethod::Deflate => {
            let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&entry.data)?;
            let compressed = encoder.finish()?;
            if compressed.len() < entry.data.len() {
                (CompressionMethod::Deflate, Cow::Owned(compressed))
            } else {
                (CompressionMethod::Stored, Cow::Borrowed(&entry.data[..]))
            }
        }
    };

    Ok(PreparedEntry {
        name: &entry.name,
        method,
        crc32,
        uncompressed_size,
        payload,
    })
}

/// Byte lengths of the entry section and the central directory, checked
/// against the 32-bit fields that will hold them.
fn measure(prepared: &[PreparedEntry<'_>]) -> Result<(usize, usize)> {
    let entries_len: usize = prepared
        .iter()
        .map(|p| LocalFileHeader::SIZE + p.name.len() + p.payload.len())
        .sum();
    let cd_len: usize = prepared
        .iter()
        .map(|p| CentralDirectoryHeader::MIN_SIZE + p.name.len())
        .sum();

    if u32::try_from(entries_len).is_err() {
        return Err(Error::ArchiveTooLarge("central directory offset"));
    }
    if u32::try_from(cd_len).is_err() {
        return Err(Error::ArchiveTooLarge("central directory size"));
    }
    Ok((entries_len, cd_len))
}

/// Phase one: local headers and payloads.
fn write_entries<'a>(
    prepared: &'a [PreparedEntry<'a>],
    modified: DosDateTime,
    w: &mut ByteWriter,
) -> Vec<EntryRecord<'a>> {
    prepared
        .iter()
        .map(|p| {
            let record = EntryRecord {
                name: p.name,
                method: p.method,
                crc32: p.crc32,
                compressed_size: p.payload.len() as u32,
                uncompressed_size: p.uncompressed_size,
                offset: w.position() as u32,
            };

            LocalFileHeader {
                method: record.method,
                modified,
                crc32: record.crc32,
                compressed_size: record.compressed_size,
                uncompressed_size: record.uncompressed_size,
                file_name: p.name.as_bytes(),
            }
            .write_to(w);
            w.write_bytes(&p.payload);

            debug!(
                "entry {}: {} bytes ({} stored, method {}), crc {:08x}, offset {}",
                record.name,
                record.uncompressed_size,
                record.compressed_size,
                record.method.as_u16(),
                record.crc32,
                record.offset
            );
            record
        })
        .collect()
}

/// Phase two: central directory headers from the recorded entries.
fn write_central_directory(records: &[EntryRecord<'_>], modified: DosDateTime, w: &mut ByteWriter) {
    for record in records {
        CentralDirectoryHeader {
            method: record.method,
            modified,
            crc32: record.crc32,
            compressed_size: record.compressed_size,
            uncompressed_size: record.uncompressed_size,
            local_header_offset: record.offset,
            file_name: record.name.as_bytes(),
        }
        .write_to(w);
    }
}
