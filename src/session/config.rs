use std::path::PathBuf;

use crate::assets::store::StorageStrategy;
use crate::encode::ffmpeg::VideoCodec;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{MorphError, MorphResult};
use crate::normalize::canvas::{DEFAULT_BLUR_SIGMA, NormalizeOpts};
use crate::timeline::plan::TimelineTiming;

/// Everything a run needs. Nothing is read from ambient process state.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MorphConfig {
    /// Directory scanned for `.png` / `.jpg` / `.jpeg` inputs.
    pub input_dir: PathBuf,
    /// Output MP4 path.
    pub output_path: PathBuf,
    /// Overwrite `output_path` if it already exists.
    pub overwrite: bool,
    pub canvas: Canvas,
    pub fps: Fps,
    /// Seconds each image is held.
    pub hold_secs: f64,
    /// Seconds each transition lasts.
    pub morph_secs: f64,
    /// Background fill blur strength.
    pub blur_sigma: f32,
    pub codec: VideoCodec,
    pub storage: StorageStrategy,
    /// Parent directory for the spool directory. `None` uses the system temp directory.
    pub spool_root: Option<PathBuf>,
    /// Normalize several images at once.
    pub parallel: bool,
    /// Rayon worker count. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Frames buffered between the render thread and the encoder thread.
    pub channel_capacity: usize,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_path: PathBuf::from("output.mp4"),
            overwrite: true,
            canvas: Canvas::default(),
            fps: Fps::default(),
            hold_secs: 5.0,
            morph_secs: 3.0,
            blur_sigma: DEFAULT_BLUR_SIGMA,
            codec: VideoCodec::default(),
            storage: StorageStrategy::default(),
            spool_root: None,
            parallel: false,
            threads: None,
            channel_capacity: 4,
        }
    }
}

impl MorphConfig {
    pub fn validate(&self) -> MorphResult<()> {
        self.canvas.validate()?;
        let timing = self.timing();
        timing.hold_frames()?;
        timing.morph_frames()?;
        if !self.blur_sigma.is_finite() || self.blur_sigma <= 0.0 {
            return Err(MorphError::validation(format!(
                "blur sigma must be finite and > 0, got {}",
                self.blur_sigma
            )));
        }
        if self.threads == Some(0) {
            return Err(MorphError::validation("'threads' must be >= 1 when set"));
        }
        if self.channel_capacity == 0 {
            return Err(MorphError::validation("'channel_capacity' must be >= 1"));
        }
        Ok(())
    }

    pub fn timing(&self) -> TimelineTiming {
        TimelineTiming {
            fps: self.fps,
            hold_secs: self.hold_secs,
            morph_secs: self.morph_secs,
        }
    }

    pub fn normalize_opts(&self) -> NormalizeOpts {
        NormalizeOpts {
            blur_sigma: self.blur_sigma,
        }
    }
}
