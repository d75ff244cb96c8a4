use std::path::Path;

use image::{ImageReader, RgbImage};

use crate::foundation::error::{MorphError, MorphResult};

/// Decode an image file into RGB8. Alpha and higher bit depths are dropped.
pub fn decode_image(path: &Path) -> MorphResult<RgbImage> {
    let reader = ImageReader::open(path)
        .map_err(|e| MorphError::decode(path, e))?
        .with_guessed_format()
        .map_err(|e| MorphError::decode(path, e))?;
    let img = reader.decode().map_err(|e| MorphError::decode(path, e))?;
    if img.width() == 0 || img.height() == 0 {
        return Err(MorphError::decode(path, "image has zero width or height"));
    }
    Ok(img.to_rgb8())
}

/// Decode an in-memory encoded image into RGB8.
pub fn decode_image_bytes(bytes: &[u8]) -> MorphResult<RgbImage> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| MorphError::decode(Path::new("<memory>"), e))?;
    Ok(img.to_rgb8())
}
