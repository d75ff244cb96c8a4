use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{MorphError, MorphResult};

/// Frame rate plus hold/morph durations.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimelineTiming {
    pub fps: Fps,
    /// Seconds each image is shown unchanged.
    pub hold_secs: f64,
    /// Seconds each cross-dissolve lasts.
    pub morph_secs: f64,
}

impl Default for TimelineTiming {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            hold_secs: 5.0,
            morph_secs: 3.0,
        }
    }
}

impl TimelineTiming {
    pub fn hold_frames(&self) -> MorphResult<u64> {
        self.fps.validate()?;
        self.fps.secs_to_frames(self.hold_secs)
    }

    pub fn morph_frames(&self) -> MorphResult<u64> {
        self.fps.validate()?;
        self.fps.secs_to_frames(self.morph_secs)
    }
}

/// One contiguous run of output frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    /// `frames` repeats of image `image`.
    Hold { image: usize, frames: u64 },
    /// `frames` blends from `from` toward `to`, frame `k` mixed at `t = k / frames`.
    Morph { from: usize, to: usize, frames: u64 },
}

impl Segment {
    pub fn frames(&self) -> u64 {
        match *self {
            Segment::Hold { frames, .. } | Segment::Morph { frames, .. } => frames,
        }
    }
}

/// What a single output frame is made of.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameSource {
    /// The stored image, unchanged.
    Still { image: usize },
    /// `(1-t)*from + t*to`.
    Blend { from: usize, to: usize, t: f32 },
}

/// Ordered segment list for an `n`-image timeline.
///
/// For each consecutive pair `(i, i+1)`: a hold of `i`, then a morph `i -> i+1`. After the last
/// pair, a final hold of the last image. Zero-length segments are omitted.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TimelinePlan {
    pub image_count: usize,
    pub hold_frames: u64,
    pub morph_frames: u64,
    pub total_frames: u64,
    pub segments: Vec<Segment>,
}

pub fn plan_timeline(image_count: usize, timing: &TimelineTiming) -> MorphResult<TimelinePlan> {
    if image_count == 0 {
        return Err(MorphError::validation(
            "timeline needs at least one image, got none",
        ));
    }
    let hold_frames = timing.hold_frames()?;
    let morph_frames = timing.morph_frames()?;

    let mut segments = Vec::with_capacity(image_count * 2);
    for i in 0..image_count - 1 {
        if hold_frames > 0 {
            segments.push(Segment::Hold {
                image: i,
                frames: hold_frames,
            });
        }
        if morph_frames > 0 {
            segments.push(Segment::Morph {
                from: i,
                to: i + 1,
                frames: morph_frames,
            });
        }
    }
    if hold_frames > 0 {
        segments.push(Segment::Hold {
            image: image_count - 1,
            frames: hold_frames,
        });
    }

    let total_frames = segments
        .iter()
        .try_fold(0u64, |acc, seg| acc.checked_add(seg.frames()))
        .ok_or_else(|| {
            MorphError::validation(format!(
                "timeline of {image_count} images overflows the frame counter"
            ))
        })?;
    if total_frames == 0 {
        return Err(MorphError::validation(
            "timeline has no frames (hold and morph durations are both zero)",
        ));
    }

    Ok(TimelinePlan {
        image_count,
        hold_frames,
        morph_frames,
        total_frames,
        segments,
    })
}

impl TimelinePlan {
    /// Every output frame in order, paired with its timeline index.
    pub fn frames(&self) -> impl Iterator<Item = (FrameIndex, FrameSource)> + '_ {
        self.segments
            .iter()
            .flat_map(|seg| (0..seg.frames()).map(move |k| segment_source(seg, k)))
            .enumerate()
            .map(|(i, src)| (FrameIndex(i as u64), src))
    }

    /// Resolve a single frame without walking the whole timeline.
    pub fn source_at(&self, idx: FrameIndex) -> MorphResult<FrameSource> {
        let mut remaining = idx.0;
        for seg in &self.segments {
            if remaining < seg.frames() {
                return Ok(segment_source(seg, remaining));
            }
            remaining -= seg.frames();
        }
        Err(MorphError::validation(format!(
            "frame {} is outside the timeline ({} frames)",
            idx.0, self.total_frames
        )))
    }

    /// Number of frames that are plain repeats of a stored image.
    pub fn held_frames(&self) -> u64 {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Hold { .. }))
            .map(Segment::frames)
            .sum()
    }
}

/// Source of frame `k` within `seg`. The blend ramp is `t = k / frames`.
pub(crate) fn segment_source(seg: &Segment, k: u64) -> FrameSource {
    match *seg {
        Segment::Hold { image, .. } => FrameSource::Still { image },
        Segment::Morph { from, to, frames } => FrameSource::Blend {
            from,
            to,
            t: (k as f64 / frames as f64) as f32,
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/plan.rs"]
mod tests;
