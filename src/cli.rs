use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use crate::docx::{BuildOptions, ImageFormat, Timestamp};
use crate::zip::{CompressionMethod, DosDateTime};

#[derive(Parser, Debug)]
#[command(name = "mkdocx")]
#[command(version)]
#[command(about = "Build Word documents from plain text or an image", long_about = None)]
#[command(after_help = "Examples:\n  \
  mkdocx text notes.txt                 one paragraph per line, writes notes.docx\n  \
  mkdocx image scan.png -o scan.docx    embed scan.png as a single picture\n  \
  mkdocx text - --timestamp 0 < a.txt   reproducible output from stdin")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output file (default: input name with .docx extension)
    #[arg(short = 'o', long, global = true, value_name = "FILE")]
    pub output: Option<String>,

    /// Compress parts with DEFLATE where that makes them smaller
    #[arg(long, global = true)]
    pub deflate: bool,

    /// Fixed modification time in Unix seconds, for reproducible output
    #[arg(long, global = true, env = "SOURCE_DATE_EPOCH", value_name = "EPOCH")]
    pub timestamp: Option<i64>,

    /// Quiet mode
    #[arg(short = 'q', global = true, action = clap::ArgAction::Count)]
    pub quiet: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// One paragraph per non-blank line of a text file
    Text {
        /// Text file path, HTTP URL, or - for stdin
        #[arg(value_name = "FILE")]
        input: String,
    },

    /// A single image as an inline picture
    Image {
        /// Image file path, HTTP URL, or - for stdin
        #[arg(value_name = "FILE")]
        input: String,

        /// Pixel width, instead of reading it from the image
        #[arg(long, requires = "height")]
        width: Option<u32>,

        /// Pixel height, instead of reading it from the image
        #[arg(long, requires = "width")]
        height: Option<u32>,

        /// Image format (default: from the file extension)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Png,
    Jpeg,
}

impl From<FormatArg> for ImageFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => ImageFormat::Png,
            FormatArg::Jpeg => ImageFormat::Jpeg,
        }
    }
}

impl Cli {
    pub fn input(&self) -> &str {
        match &self.command {
            Command::Text { input } | Command::Image { input, .. } => input,
        }
    }

    pub fn build_options(&self) -> BuildOptions {
        let timestamp = match self.timestamp {
            Some(secs) => Timestamp::Fixed(DosDateTime::from_unix(secs)),
            None => Timestamp::Now,
        };
        let compression = if self.deflate {
            CompressionMethod::Deflate
        } else {
            CompressionMethod::Stored
        };
        BuildOptions {
            timestamp,
            compression,
        }
    }

    /// Explicit `-o`, or the source's base name with a `.docx` extension.
    pub fn output_path(&self, source_name: &str) -> PathBuf {
        if let Some(ref output) = self.output {
            return PathBuf::from(output);
        }
        let fallback = match self.command {
            Command::Text { .. } => "document",
            Command::Image { .. } => "image",
        };
        default_output(source_name, fallback)
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0
    }
}

fn default_output(source_name: &str, fallback: &str) -> PathBuf {
    let stem = match source_name {
        "-" | "" => None,
        name => Path::new(name).file_stem().and_then(|s| s.to_str()),
    };
    PathBuf::from(format!("{}.docx", stem.unwrap_or(fallback)))
}
