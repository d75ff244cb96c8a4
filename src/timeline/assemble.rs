use std::borrow::Cow;

use crate::effects::blend::blend;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{MorphError, MorphResult};
use crate::frame::RgbFrame;
use crate::timeline::plan::{FrameSource, TimelinePlan, TimelineTiming, plan_timeline};

/// Lazy, ordered sequence of output frames over in-memory images.
///
/// Held frames borrow the source image; morph frames are blended on demand.
pub struct Assembled<'a> {
    frames: &'a [RgbFrame],
    plan: TimelinePlan,
    next: u64,
}

/// Build the output frame sequence for `frames` in input order.
///
/// All frames must share one size. Fails for an empty input.
pub fn assemble<'a>(frames: &'a [RgbFrame], timing: &TimelineTiming) -> MorphResult<Assembled<'a>> {
    let Some(first) = frames.first() else {
        return Err(MorphError::validation("cannot assemble a timeline from zero frames"));
    };
    for f in &frames[1..] {
        first.ensure_same_size(f)?;
    }
    let plan = plan_timeline(frames.len(), timing)?;
    Ok(Assembled {
        frames,
        plan,
        next: 0,
    })
}

impl<'a> Assembled<'a> {
    pub fn plan(&self) -> &TimelinePlan {
        &self.plan
    }

    fn render(&self, src: FrameSource) -> MorphResult<Cow<'a, RgbFrame>> {
        match src {
            FrameSource::Still { image } => Ok(Cow::Borrowed(&self.frames[image])),
            FrameSource::Blend { from, to, t } => {
                blend(&self.frames[from], &self.frames[to], t).map(Cow::Owned)
            }
        }
    }
}

impl<'a> Iterator for Assembled<'a> {
    type Item = MorphResult<Cow<'a, RgbFrame>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.plan.total_frames {
            return None;
        }
        let src = match self.plan.source_at(FrameIndex(self.next)) {
            Ok(src) => src,
            Err(e) => return Some(Err(e)),
        };
        self.next += 1;
        Some(self.render(src))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.plan.total_frames - self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Assembled<'_> {}
