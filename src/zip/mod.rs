//! ZIP archive writing.
//!
//! This module produces the container a `.docx` file is built on, without
//! an archive library.
//!
//! ## Architecture
//!
//! - [`crc`]: CRC-32 checksum used by every header
//! - [`writer`]: growable buffer with little-endian writes
//! - [`structures`]: the fixed records (local header, central directory
//!   header, EOCD) and the DOS timestamp
//! - [`builder`]: lays out entries and replays them into the central directory
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! ## Limitations
//!
//! - STORE by default; DEFLATE only when requested
//! - No ZIP64: archives, entries and offsets must fit in 32 bits, and
//!   there can be at most 65535 entries
//! - No encryption, no multi-disk archives, no comments or extra fields

pub mod builder;
pub mod crc;
pub mod structures;
pub mod writer;

pub use builder::{ArchiveBuilder, ArchiveEntry, EntryRecord, build_archive};
pub use crc::crc32;
pub use structures::*;
pub use writer::ByteWriter;
