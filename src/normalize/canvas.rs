//! Letterboxing of arbitrary images onto the fixed output canvas.
//!
//! The image is scaled to fit with its aspect preserved. A heavily blurred copy of the scaled image
//! is reflect-padded out to the canvas size as background fill, then the sharp image is pasted
//! back on top at the center.

use image::RgbImage;
use image::imageops::{self, FilterType};

use crate::effects::blur::gaussian_blur_rgb8;
use crate::foundation::core::Canvas;
use crate::foundation::error::{MorphError, MorphResult};
use crate::foundation::math::reflect_index;
use crate::frame::RgbFrame;

/// Default background blur strength.
pub const DEFAULT_BLUR_SIGMA: f32 = 100.0;

/// Options for [`normalize_to_canvas`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NormalizeOpts {
    /// Gaussian sigma of the background fill. The kernel size follows from it.
    pub blur_sigma: f32,
}

impl Default for NormalizeOpts {
    fn default() -> Self {
        Self {
            blur_sigma: DEFAULT_BLUR_SIGMA,
        }
    }
}

/// Placement of a scaled image inside the canvas.
///
/// Excess space is split floor/ceil: `top = delta_h / 2`, `bottom = delta_h - top`, and the same
/// for `left` / `right`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Letterbox {
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Letterbox {
    pub fn has_margins(&self) -> bool {
        self.top + self.bottom + self.left + self.right > 0
    }
}

/// Compute the uniform fit of `src_width`x`src_height` into `canvas`.
///
/// The scale is `min(W/w, H/h)` and may be greater than one.
pub fn fit_letterbox(src_width: u32, src_height: u32, canvas: Canvas) -> MorphResult<Letterbox> {
    canvas.validate()?;
    if src_width == 0 || src_height == 0 {
        return Err(MorphError::validation(format!(
            "cannot fit an empty {src_width}x{src_height} image"
        )));
    }

    let scale = (f64::from(canvas.width) / f64::from(src_width))
        .min(f64::from(canvas.height) / f64::from(src_height));
    let scaled_width = scaled_len(src_width, scale, canvas.width);
    let scaled_height = scaled_len(src_height, scale, canvas.height);

    let delta_w = canvas.width - scaled_width;
    let delta_h = canvas.height - scaled_height;
    let top = delta_h / 2;
    let left = delta_w / 2;

    Ok(Letterbox {
        scaled_width,
        scaled_height,
        top,
        bottom: delta_h - top,
        left,
        right: delta_w - left,
    })
}

fn scaled_len(len: u32, scale: f64, max: u32) -> u32 {
    ((f64::from(len) * scale).round() as u32).clamp(1, max)
}

/// Letterbox `image` onto `canvas` with a blurred, reflected fill in the margins.
///
/// The returned frame is exactly `canvas.width`x`canvas.height`.
#[tracing::instrument(skip(image), fields(src_w = image.width(), src_h = image.height()))]
pub fn normalize_to_canvas(
    image: &RgbImage,
    canvas: Canvas,
    opts: &NormalizeOpts,
) -> MorphResult<RgbFrame> {
    let lb = fit_letterbox(image.width(), image.height(), canvas)?;
    tracing::debug!(?lb, "letterbox geometry");

    let resized = if image.dimensions() == (lb.scaled_width, lb.scaled_height) {
        image.clone()
    } else {
        imageops::resize(image, lb.scaled_width, lb.scaled_height, FilterType::Triangle)
    };
    let sharp = RgbFrame::from(resized);

    // Zero margins: the sharp image covers the whole canvas, the fill would be overwritten.
    if !lb.has_margins() {
        return Ok(sharp);
    }

    let blurred = gaussian_blur_rgb8(&sharp, opts.blur_sigma)?;
    let mut out = pad_reflect(&blurred, &lb, canvas)?;
    paste(&mut out, &sharp, lb.left, lb.top)?;
    Ok(out)
}

/// Grow `src` to `canvas` by mirroring it across each border (edge pixel repeated).
pub fn pad_reflect(src: &RgbFrame, lb: &Letterbox, canvas: Canvas) -> MorphResult<RgbFrame> {
    if src.width != lb.scaled_width || src.height != lb.scaled_height {
        return Err(MorphError::dimension_mismatch(format!(
            "pad source {}x{} does not match letterbox {}x{}",
            src.width, src.height, lb.scaled_width, lb.scaled_height
        )));
    }
    if lb.left + lb.scaled_width + lb.right != canvas.width
        || lb.top + lb.scaled_height + lb.bottom != canvas.height
    {
        return Err(MorphError::dimension_mismatch(
            "letterbox margins do not add up to the canvas size",
        ));
    }

    let sw = src.width as usize;
    let sh = src.height as usize;
    let cols: Vec<usize> = (0..canvas.width as i64)
        .map(|x| reflect_index(x - i64::from(lb.left), sw))
        .collect();

    let mut data = Vec::with_capacity(canvas.area() * 3);
    for y in 0..canvas.height as i64 {
        let sy = reflect_index(y - i64::from(lb.top), sh);
        let row = &src.data[sy * sw * 3..(sy + 1) * sw * 3];
        for &sx in &cols {
            data.extend_from_slice(&row[sx * 3..sx * 3 + 3]);
        }
    }
    RgbFrame::from_raw(canvas.width, canvas.height, data)
}

/// Overwrite the region of `dst` at (`left`, `top`) with `src`.
fn paste(dst: &mut RgbFrame, src: &RgbFrame, left: u32, top: u32) -> MorphResult<()> {
    if left + src.width > dst.width || top + src.height > dst.height {
        return Err(MorphError::dimension_mismatch(
            "pasted image does not fit inside the canvas",
        ));
    }
    let dst_stride = dst.width as usize * 3;
    let src_stride = src.width as usize * 3;
    for (y, src_row) in src.data.chunks_exact(src_stride).enumerate() {
        let start = (top as usize + y) * dst_stride + left as usize * 3;
        dst.data[start..start + src_stride].copy_from_slice(src_row);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/canvas.rs"]
mod tests;
