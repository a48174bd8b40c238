use byteorder::{LittleEndian, ReadBytesExt};
use chrono::{DateTime, Datelike, Local, NaiveDateTime, Timelike};
use std::io::{Cursor, Read};

use anyhow::{Result, bail};

use super::writer::ByteWriter;

/// Version 2.0: the minimum that covers STORE and DEFLATE.
pub const VERSION_NEEDED: u16 = 20;
/// Upper byte 0 (MS-DOS attribute compatibility), APPNOTE version 2.0.
pub const VERSION_MADE_BY: u16 = 20;

/// General purpose bit 11: file name is UTF-8.
pub const FLAG_UTF8_NAME: u16 = 0x0800;

/// General purpose flags for an entry name. ASCII names carry no flags;
/// anything else is marked UTF-8 so readers do not fall back to CP437.
pub fn name_flags(file_name: &[u8]) -> u16 {
    if file_name.is_ascii() {
        0
    } else {
        FLAG_UTF8_NAME
    }
}

/// ZIP compression methods
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompressionMethod {
    #[default]
    Stored,
    Deflate,
}

impl CompressionMethod {
    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
        }
    }
}

/// Modification timestamp in MS-DOS format (2-second resolution).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DosDateTime {
    time: u16,
    date: u16,
}

impl DosDateTime {
    /// 1980-01-01 00:00:00, the earliest representable instant.
    pub const EPOCH: DosDateTime = DosDateTime {
        time: 0,
        date: (1 << 5) | 1,
    };

    /// Encode a calendar date and time, clamping the year to 1980..=2107.
    pub fn from_naive(dt: NaiveDateTime) -> Self {
        let year = dt.year();
        if year < 1980 {
            return Self::EPOCH;
        }
        if year > 2107 {
            // 2107-12-31 23:59:58
            return Self {
                time: (23 << 11) | (59 << 5) | 29,
                date: (127 << 9) | (12 << 5) | 31,
            };
        }

        let time =
            ((dt.hour() as u16) << 11) | ((dt.minute() as u16) << 5) | ((dt.second() as u16) >> 1);
        let date =
            (((year - 1980) as u16) << 9) | ((dt.month() as u16) << 5) | dt.day() as u16;
        Self { time, date }
    }

    /// Encode a Unix timestamp, interpreted as UTC.
    pub fn from_unix(secs: i64) -> Self {
        DateTime::from_timestamp(secs, 0)
            .map(|dt| Self::from_naive(dt.naive_utc()))
            .unwrap_or(Self::EPOCH)
    }

    /// Current local wall-clock time.
    pub fn now() -> Self {
        Self::from_naive(Local::now().naive_local())
    }

    pub fn time(&self) -> u16 {
        self.time
    }

    pub fn date(&self) -> u16 {
        self.date
    }

    /// Decode to (year, month, day)
    pub fn ymd(&self) -> (u16, u8, u8) {
        let day = (self.date & 0x1F) as u8;
        let month = ((self.date >> 5) & 0x0F) as u8;
        let year = ((self.date >> 9) & 0x7F) + 1980;
        (year, month, day)
    }

    /// Decode to (hour, minute, second)
    pub fn hms(&self) -> (u8, u8, u8) {
        let second = ((self.time & 0x1F) * 2) as u8;
        let minute = ((self.time >> 5) & 0x3F) as u8;
        let hour = ((self.time >> 11) & 0x1F) as u8;
        (hour, minute, second)
    }
}

/// Local File Header (LFH) - 30 bytes plus the file name
#[derive(Debug, Clone)]
pub struct LocalFileHeader<'a> {
    pub method: CompressionMethod,
    pub modified: DosDateTime,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name: &'a [u8],
}

impl LocalFileHeader<'_> {
    pub const SIGNATURE: &'static [u8] = b"PK\x03\x04";
    pub const SIZE: usize = 30;

    /// Write the header. Name length is validated by the builder.
    pub fn write_to(&self, w: &mut ByteWriter) {
        w.write_bytes(Self::SIGNATURE);
        w.write_u16(VERSION_NEEDED);
        w.write_u16(name_flags(self.file_name));
        w.write_u16(self.method.as_u16());
        w.write_u16(self.modified.time());
        w.write_u16(self.modified.date());
        w.write_u32(self.crc32);
        w.write_u32(self.compressed_size);
        w.write_u32(self.uncompressed_size);
        w.write_u16(self.file_name.len() as u16);
        w.write_u16(0); // extra field length
        w.write_bytes(self.file_name);
    }
}

/// Central Directory File Header (CDFH) - 46 bytes plus the file name
#[derive(Debug, Clone)]
pub struct CentralDirectoryHeader<'a> {
    pub method: CompressionMethod,
    pub modified: DosDateTime,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub local_header_offset: u32,
    pub file_name: &'a [u8],
}

impl CentralDirectoryHeader<'_> {
    pub const SIGNATURE: &'static [u8] = b"PK\x01\x02";
    pub const MIN_SIZE: usize = 46;

    pub fn write_to(&self, w: &mut ByteWriter) {
        w.write_bytes(Self::SIGNATURE);
        w.write_u16(VERSION_MADE_BY);
        w.write_u16(VERSION_NEEDED);
        w.write_u16(name_flags(self.file_name));
        w.write_u16(self.method.as_u16());
        w.write_u16(self.modified.time());
        w.write_u16(self.modified.date());
        w.write_u32(self.crc32);
        w.write_u32(self.compressed_size);
        w.write_u32(self.uncompressed_size);
        w.write_u16(self.file_name.len() as u16);
        w.write_u16(0); // extra field length
        w.write_u16(0); // file comment length
        w.write_u16(0); // disk number start
        w.write_u16(0); // internal attributes
        w.write_u32(0); // external attributes
        w.write_u32(self.local_header_offset);
        w.write_bytes(self.file_name);
    }
}

/// End of Central Directory (EOCD) - 22 bytes minimum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndOfCentralDirectory {
    pub disk_number: u16,
    pub disk_with_cd: u16,
    pub disk_entries: u16,
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
    pub comment_len: u16,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: &'static [u8] = b"PK\x05\x06";
    pub const SIZE: usize = 22;

    /// Single-disk record without a comment.
    pub fn new(entries: u16, cd_size: u32, cd_offset: u32) -> Self {
        Self {
            disk_number: 0,
            disk_with_cd: 0,
            disk_entries: entries,
            total_entries: entries,
            cd_size,
            cd_offset,
            comment_len: 0,
        }
    }

    pub fn write_to(&self, w: &mut ByteWriter) {
        w.write_bytes(Self::SIGNATURE);
        w.write_u16(self.disk_number);
        w.write_u16(self.disk_with_cd);
        w.write_u16(self.disk_entries);
        w.write_u16(self.total_entries);
        w.write_u32(self.cd_size);
        w.write_u32(self.cd_offset);
        w.write_u16(self.comment_len);
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE {
            bail!("Invalid End of Central Directory");
        }

        // Verify signature
        if &data[0..4] != Self::SIGNATURE {
            bail!("Invalid End of Central Directory");
        }

        let mut cursor = Cursor::new(&data[4..]);

        Ok(Self {
            disk_number: cursor.read_u16::<LittleEndian>()?,
            disk_with_cd: cursor.read_u16::<LittleEndian>()?,
            disk_entries: cursor.read_u16::<LittleEndian>()?,
            total_entries: cursor.read_u16::<LittleEndian>()?,
            cd_size: cursor.read_u32::<LittleEndian>()?,
            cd_offset: cursor.read_u32::<LittleEndian>()?,
            comment_len: cursor.read_u16::<LittleEndian>()?,
        })
    }
}

/// Central directory record as read back from an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CentralDirectoryRecord {
    pub file_name: String,
    pub flags: u16,
    pub method: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub local_header_offset: u32,
}

/// Parse every central directory header in `cd`.
///
/// Only understands what this crate writes: no extra fields, no comments.
pub fn read_central_directory(cd: &[u8]) -> Result<Vec<CentralDirectoryRecord>> {
    let mut cursor = Cursor::new(cd);
    let mut records = Vec::new();

    while (cursor.position() as usize) < cd.len() {
        let mut sig = [0u8; 4];
        cursor.read_exact(&mut sig)?;
        if sig != CentralDirectoryHeader::SIGNATURE {
            bail!("Invalid Central Directory File Header");
        }

        let _version_made_by = cursor.read_u16::<LittleEndian>()?;
        let _version_needed = cursor.read_u16::<LittleEndian>()?;
        let flags = cursor.read_u16::<LittleEndian>()?;
        let method = cursor.read_u16::<LittleEndian>()?;
        let _last_mod_time = cursor.read_u16::<LittleEndian>()?;
        let _last_mod_date = cursor.read_u16::<LittleEndian>()?;
        let crc32 = cursor.read_u32::<LittleEndian>()?;
        let compressed_size = cursor.read_u32::<LittleEndian>()?;
        let uncompressed_size = cursor.read_u32::<LittleEndian>()?;
        let file_name_length = cursor.read_u16::<LittleEndian>()?;
        let extra_field_length = cursor.read_u16::<LittleEndian>()?;
        let file_comment_length = cursor.read_u16::<LittleEndian>()?;
        let _disk_number_start = cursor.read_u16::<LittleEndian>()?;
        let _internal_attrs = cursor.read_u16::<LittleEndian>()?;
        let _external_attrs = cursor.read_u32::<LittleEndian>()?;
        let local_header_offset = cursor.read_u32::<LittleEndian>()?;

        if extra_field_length != 0 || file_comment_length != 0 {
            bail!("Unexpected extra field or comment");
        }

        let mut file_name_bytes = vec![0u8; file_name_length as usize];
        cursor.read_exact(&mut file_name_bytes)?;

        records.push(CentralDirectoryRecord {
            file_name: String::from_utf8(file_name_bytes)?,
            flags,
            method,
            crc32,
            compressed_size,
            uncompressed_size,
            local_header_offset,
        });
    }

    Ok(records)
}
