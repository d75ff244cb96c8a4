//! morphreel turns a folder of still images into a cross-dissolve slideshow video.
//!
//! Every image is letterboxed onto a fixed canvas over a blurred, mirrored copy of itself, held
//! for a while, then blended into the next one. The public API is session-oriented:
//!
//! - Describe a run with a [`MorphConfig`]
//! - Create a [`MorphSession`]
//! - Prepare frames into a [`FrameStore`] and stream the timeline into a [`FrameSink`]
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod assets;
pub(crate) mod effects;
/// Encoding sinks.
pub mod encode;
pub(crate) mod frame;
pub(crate) mod normalize;
/// Pipeline driver: configuration and session API.
pub mod session;
pub(crate) mod timeline;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex};
pub use crate::foundation::error::{MorphError, MorphResult};

pub use crate::assets::decode::{decode_image, decode_image_bytes};
pub use crate::assets::scan::{IMAGE_SUFFIXES, is_supported_image_name, scan_images};
pub use crate::assets::store::{
    FrameStore, InMemoryStore, SpoolStore, StorageStrategy, open_store,
};
pub use crate::effects::alpha::{attach_alpha, build_alpha, with_alpha};
pub use crate::effects::blend::blend;
pub use crate::effects::blur::gaussian_blur_rgb8;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, VideoCodec, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::frame::{AlphaMask, RgbFrame, RgbaFrame};
pub use crate::normalize::canvas::{
    DEFAULT_BLUR_SIGMA, Letterbox, NormalizeOpts, fit_letterbox, normalize_to_canvas,
};
pub use crate::session::config::MorphConfig;
pub use crate::session::morph_session::{CancelToken, MorphSession, RenderStats, RunReport};
pub use crate::timeline::assemble::{Assembled, assemble};
pub use crate::timeline::plan::{
    FrameSource, Segment, TimelinePlan, TimelineTiming, plan_timeline,
};
