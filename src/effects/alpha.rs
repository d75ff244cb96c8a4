use crate::foundation::error::{MorphError, MorphResult};
use crate::frame::{AlphaMask, RgbFrame, RgbaFrame};

/// Derive a binary foreground mask: 255 where any channel is non-zero, 0 where the pixel is
/// exactly pure black.
///
/// This is a heuristic, not segmentation. Legitimately black foreground pixels end up transparent.
pub fn build_alpha(frame: &RgbFrame) -> AlphaMask {
    let data = frame
        .data
        .chunks_exact(3)
        .map(|px| if px == [0, 0, 0] { 0 } else { 255 })
        .collect();
    AlphaMask {
        width: frame.width,
        height: frame.height,
        data,
    }
}

/// Append `mask` as a fourth channel. Color bytes are copied untouched.
pub fn attach_alpha(frame: &RgbFrame, mask: &AlphaMask) -> MorphResult<RgbaFrame> {
    if frame.width != mask.width || frame.height != mask.height {
        return Err(MorphError::dimension_mismatch(format!(
            "alpha mask {}x{} does not match frame {}x{}",
            mask.width, mask.height, frame.width, frame.height
        )));
    }
    if frame.data.len() != mask.data.len() * 3 {
        return Err(MorphError::dimension_mismatch(
            "alpha mask length does not match frame pixel count",
        ));
    }

    let mut data = Vec::with_capacity(mask.data.len() * 4);
    for (px, &a) in frame.data.chunks_exact(3).zip(&mask.data) {
        data.extend_from_slice(px);
        data.push(a);
    }
    Ok(RgbaFrame {
        width: frame.width,
        height: frame.height,
        data,
    })
}

/// [`build_alpha`] followed by [`attach_alpha`].
pub fn with_alpha(frame: &RgbFrame) -> MorphResult<RgbaFrame> {
    attach_alpha(frame, &build_alpha(frame))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/alpha.rs"]
mod tests;
