use thiserror::Error;

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The archive cannot be laid out from the given entries.
    Construction,
    /// The caller did not supply what the operation requires.
    Precondition,
    /// The DEFLATE encoder failed.
    Io,
}

/// Errors produced while assembling an archive or a document package.
///
/// Every check runs before the first archive byte is written, so an error
/// never comes with a partial buffer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("archive entry name must not be empty")]
    EmptyEntryName,

    #[error("invalid archive entry name {name:?}: {reason}")]
    InvalidEntryName { name: String, reason: &'static str },

    #[error("duplicate archive entry: {0}")]
    DuplicateEntry(String),

    #[error("archive has no entries")]
    EmptyArchive,

    #[error("archive too large: {0} does not fit without ZIP64")]
    ArchiveTooLarge(&'static str),

    #[error("image dimensions are unavailable")]
    MissingImageDimensions,

    #[error("invalid image dimensions {width}x{height}")]
    InvalidImageDimensions { width: u32, height: u32 },

    #[error("compression failed: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyEntryName
            | Error::InvalidEntryName { .. }
            | Error::DuplicateEntry(_)
            | Error::ArchiveTooLarge(_) => ErrorKind::Construction,
            Error::EmptyArchive
            | Error::MissingImageDimensions
            | Error::InvalidImageDimensions { .. } => ErrorKind::Precondition,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}
