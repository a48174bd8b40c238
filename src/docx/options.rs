use crate::zip::{CompressionMethod, DosDateTime};

/// Timestamp policy for archive headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Timestamp {
    /// Local wall-clock time when the document is built.
    #[default]
    Now,
    /// A fixed instant, for byte-reproducible output.
    Fixed(DosDateTime),
}

impl Timestamp {
    pub fn resolve(&self) -> DosDateTime {
        match self {
            Timestamp::Now => DosDateTime::now(),
            Timestamp::Fixed(ts) => *ts,
        }
    }
}

/// Settings shared by both document producers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub timestamp: Timestamp,
    pub compression: CompressionMethod,
}

impl BuildOptions {
    /// Stored entries stamped with the DOS epoch: identical input always
    /// yields identical bytes.
    pub fn reproducible() -> Self {
        Self {
            timestamp: Timestamp::Fixed(DosDateTime::EPOCH),
            compression: CompressionMethod::Stored,
        }
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_compression(mut self, compression: CompressionMethod) -> Self {
        self.compression = compression;
        self
    }
}
