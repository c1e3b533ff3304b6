use std::io::{Cursor, Read, Write};
use std::path::Path;

use image::ImageOutputFormat;
use tracing::trace;

use crate::error::{DecodeError, EncodeError};
use crate::pixel_buffer::PixelBuffer;

/// Decode any format `image` recognises from `reader` into RGB8.
pub fn decode_image<R: Read>(mut reader: R) -> Result<PixelBuffer, DecodeError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    trace!(len = bytes.len(), "read encoded image");

    let rgb = image::load_from_memory(&bytes)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    PixelBuffer::from_rgb_image(rgb).map_err(|_| DecodeError::Empty { width, height })
}

/// Encode `buf` as PNG and write it to `writer`.
///
/// The PNG is built in memory first, so nothing reaches `writer` if encoding
/// fails.
pub fn encode_image<W: Write>(buf: &PixelBuffer, mut writer: W) -> Result<(), EncodeError> {
    let mut png = Cursor::new(Vec::new());
    buf.as_rgb_image().write_to(&mut png, ImageOutputFormat::Png)?;
    let png = png.into_inner();
    trace!(len = png.len(), "encoded png");

    writer.write_all(&png)?;
    writer.flush()?;
    Ok(())
}

/// Decode a pattern image from disk.
pub fn load_pattern<P: AsRef<Path>>(path: P) -> Result<PixelBuffer, DecodeError> {
    let file = std::fs::File::open(path.as_ref())?;
    decode_image(std::io::BufReader::new(file))
}
