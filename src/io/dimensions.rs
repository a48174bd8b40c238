use log::{debug, info};
use std::io::Cursor;

use crate::docx::PixelSize;

/// Pixel dimensions from an encoded image's header, or `None` if the
/// format is not recognized or the header cannot be read.
pub fn read_dimensions(data: &[u8]) -> Option<PixelSize> {
    let reader = image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?;
    match reader.into_dimensions() {
        Ok((width, height)) => {
            debug!("decoded image dimensions {}x{}", width, height);
            Some(PixelSize::new(width, height))
        }
        Err(e) => {
            info!("cannot read image dimensions: {}", e);
            None
        }
    }
}
