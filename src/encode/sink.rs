use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::MorphResult;
use crate::frame::RgbFrame;

/// Stream parameters handed to [`FrameSink::begin`]. Every pushed frame is `width`x`height`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    /// Exact number of `push_frame` calls that follow a successful `begin`.
    pub total_frames: u64,
}

/// Consumer of the rendered timeline.
///
/// A complete stream is `begin`, `total_frames` calls to `push_frame` with indices `0, 1, ..`,
/// then `end`. A stream that stops before `end` is abandoned and must not be treated as a valid
/// video.
pub trait FrameSink: Send {
    fn begin(&mut self, cfg: SinkConfig) -> MorphResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbFrame) -> MorphResult<()>;
    /// Finalize the stream.
    fn end(&mut self) -> MorphResult<()>;
}

/// Keeps every frame in memory. Used by tests and previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, RgbFrame)>,
    finished: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    pub fn frames(&self) -> &[(FrameIndex, RgbFrame)] {
        &self.frames
    }

    /// `true` once `end` has been called.
    pub fn finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> MorphResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbFrame) -> MorphResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> MorphResult<()> {
        self.finished = true;
        Ok(())
    }
}
