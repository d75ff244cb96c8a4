use crate::foundation::error::{MorphError, MorphResult};

/// Absolute 0-based frame index in output timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> MorphResult<Self> {
        let fps = Self { num, den };
        fps.validate()?;
        Ok(fps)
    }

    /// Whole-number frame rate (`num/1`).
    pub fn whole(num: u32) -> MorphResult<Self> {
        Self::new(num, 1)
    }

    pub fn validate(self) -> MorphResult<()> {
        if self.den == 0 {
            return Err(MorphError::validation("fps den must be > 0"));
        }
        if self.num == 0 {
            return Err(MorphError::validation("fps num must be > 0"));
        }
        Ok(())
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Convert a duration in seconds to a frame count, rounding to the nearest frame.
    ///
    /// Negative or non-finite durations are rejected, as are durations whose frame count does
    /// not fit in a `u64`.
    pub fn secs_to_frames(self, secs: f64) -> MorphResult<u64> {
        if !secs.is_finite() || secs < 0.0 {
            return Err(MorphError::validation(format!(
                "duration must be finite and >= 0 seconds, got {secs}"
            )));
        }
        let frames = (secs * self.as_f64()).round();
        // `u64::MAX as f64` is 2^64, the first value that no longer fits.
        if frames >= u64::MAX as f64 {
            return Err(MorphError::validation(format!(
                "duration of {secs} seconds at {self} fps is too many frames"
            )));
        }
        Ok(frames as u64)
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 60, den: 1 }
    }
}

impl std::fmt::Display for Fps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

/// Output canvas dimensions in pixels. Every input image is normalized into this size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> MorphResult<Self> {
        let canvas = Self { width, height };
        canvas.validate()?;
        Ok(canvas)
    }

    pub fn validate(self) -> MorphResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(MorphError::validation(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Number of pixels covered by the canvas.
    pub fn area(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
