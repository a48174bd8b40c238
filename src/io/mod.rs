mod http;
mod local;
mod dimensions;

pub use http::HttpSource;
pub use local::{LocalFileSource, StdinSource};
pub use dimensions::read_dimensions;

use anyhow::Result;
use async_trait::async_trait;

/// Trait for reading a whole input document from some location
#[async_trait]
pub trait Source: Send + Sync {
    /// Read the complete contents
    async fn read_all(&self) -> Result<Vec<u8>>;

    /// File name or URL path the contents came from, used to pick the
    /// image format and the default output name
    fn name(&self) -> &str;

    /// Bytes pulled over the network so far, for sources that use one
    fn transferred_bytes(&self) -> Option<u64> {
        None
    }
}

/// Pick the source for a CLI input argument: `-` for standard input,
/// `http://`/`https://` for a URL, anything else for a local path.
pub fn open(input: &str) -> Box<dyn Source> {
    if input == "-" {
        Box::new(StdinSource)
    } else if is_http_url(input) {
        Box::new(HttpSource::new(input.to_string()))
    } else {
        Box::new(LocalFileSource::new(input))
    }
}

pub fn is_http_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}
