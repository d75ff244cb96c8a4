//! Pixel buffers passed between pipeline stages.
//!
//! All buffers are row-major and tightly packed, 8 bits per channel.

use image::RgbImage;

use crate::foundation::core::Canvas;
use crate::foundation::error::{MorphError, MorphResult};

/// Three-channel RGB8 frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RgbFrame {
    /// Wrap raw RGB8 bytes, checking the length against `width*height*3`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> MorphResult<Self> {
        let expected = buffer_len(width, height, 3)?;
        if data.len() != expected {
            return Err(MorphError::dimension_mismatch(format!(
                "rgb frame {width}x{height} expects {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A frame filled with one color.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let data = rgb.repeat((width as usize) * (height as usize));
        Self {
            width,
            height,
            data,
        }
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    pub fn into_image(self) -> MorphResult<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.data)
            .ok_or_else(|| MorphError::dimension_mismatch("rgb buffer does not match its size"))
    }

    /// Fail unless `other` has the same width and height.
    pub fn ensure_same_size(&self, other: &RgbFrame) -> MorphResult<()> {
        if self.width != other.width || self.height != other.height {
            return Err(MorphError::dimension_mismatch(format!(
                "frames differ in size: {}x{} vs {}x{}",
                self.width, self.height, other.width, other.height
            )));
        }
        Ok(())
    }
}

impl From<RgbImage> for RgbFrame {
    fn from(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

/// Single-channel opacity mask. Every value is either 0 or 255.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlphaMask {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl AlphaMask {
    pub fn opaque_count(&self) -> usize {
        self.data.iter().filter(|&&a| a == 255).count()
    }
}

/// Four-channel RGBA8 frame (straight alpha).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbaFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RgbaFrame {
    /// Drop the alpha channel, returning the color planes untouched.
    pub fn to_rgb(&self) -> RgbFrame {
        let mut data = Vec::with_capacity((self.width as usize) * (self.height as usize) * 3);
        for px in self.data.chunks_exact(4) {
            data.extend_from_slice(&px[..3]);
        }
        RgbFrame {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

pub(crate) fn buffer_len(width: u32, height: u32, channels: usize) -> MorphResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| MorphError::validation("frame buffer size overflow"))
}
