use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};

use rayon::prelude::*;

use crate::assets::decode::decode_image;
use crate::assets::scan::scan_images;
use crate::assets::store::{FrameStore, open_store};
use crate::effects::alpha::with_alpha;
use crate::effects::blend::blend;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{MorphError, MorphResult};
use crate::frame::{RgbFrame, RgbaFrame};
use crate::normalize::canvas::normalize_to_canvas;
use crate::session::config::MorphConfig;
use crate::timeline::plan::{
    FrameSource, Segment, TimelinePlan, plan_timeline, segment_source,
};

/// Cooperative cancellation flag, checked between images and between output frames.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> MorphResult<()> {
        if self.is_cancelled() {
            Err(MorphError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Timeline render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RenderStats {
    /// Frames pushed to the sink.
    pub frames_total: u64,
    /// Frames that repeat a stored image (no pixel work).
    pub frames_held: u64,
    /// Frames produced by blending two images.
    pub frames_blended: u64,
}

/// Summary of a finished run.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RunReport {
    /// Input file names in timeline order.
    pub images: Vec<String>,
    pub output_path: PathBuf,
    pub canvas: Canvas,
    pub fps: Fps,
    pub hold_frames: u64,
    pub morph_frames: u64,
    pub stats: RenderStats,
}

/// Drives one run: scan, normalize, store, then render the timeline into a sink.
pub struct MorphSession {
    cfg: MorphConfig,
    cancel: CancelToken,
}

impl MorphSession {
    pub fn new(cfg: MorphConfig) -> MorphResult<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            cancel: CancelToken::new(),
        })
    }

    /// Replace the session's cancellation token with a caller-held one.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &MorphConfig {
        &self.cfg
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Plan the timeline for the images currently in the input directory, without decoding them.
    pub fn plan(&self) -> MorphResult<TimelinePlan> {
        let paths = scan_images(&self.cfg.input_dir)?;
        plan_timeline(paths.len(), &self.cfg.timing())
    }

    /// Full run into an MP4 through the system `ffmpeg`.
    #[tracing::instrument(skip_all, fields(out = %self.cfg.output_path.display()))]
    pub fn run(&self) -> MorphResult<RunReport> {
        // Output and encoder problems surface before any image is decoded.
        let opts = FfmpegSinkOpts {
            out_path: self.cfg.output_path.clone(),
            overwrite: self.cfg.overwrite,
            codec: self.cfg.codec,
        };
        opts.check_output(self.cfg.canvas.width, self.cfg.canvas.height)?;
        FfmpegSink::preflight(self.cfg.codec)?;
        let mut sink = FfmpegSink::new(opts);
        let report = self.run_with_sink(&mut sink)?;
        tracing::info!(frames = report.stats.frames_total, "morph video written");
        Ok(report)
    }

    /// Full run into any sink. Temporary storage is released on every exit path.
    pub fn run_with_sink(&self, sink: &mut dyn FrameSink) -> MorphResult<RunReport> {
        let mut store = open_store(self.cfg.storage, self.cfg.spool_root.as_deref())?;
        let images = self.prepare(store.as_mut())?;
        let stats = self.render(store.as_ref(), sink)?;
        let timing = self.cfg.timing();
        Ok(RunReport {
            images,
            output_path: self.cfg.output_path.clone(),
            canvas: self.cfg.canvas,
            fps: self.cfg.fps,
            hold_frames: timing.hold_frames()?,
            morph_frames: timing.morph_frames()?,
            stats,
        })
    }

    /// Decode, normalize and mask every input image, appending them to `store` in input order.
    ///
    /// Returns the input file names in that order.
    #[tracing::instrument(skip_all, fields(input = %self.cfg.input_dir.display()))]
    pub fn prepare(&self, store: &mut dyn FrameStore) -> MorphResult<Vec<String>> {
        let paths = scan_images(&self.cfg.input_dir)?;
        tracing::info!(count = paths.len(), "found input images");
        let pool = build_thread_pool(self.cfg.threads)?;
        let names: Vec<String> = paths.iter().map(|p| file_name(p)).collect();

        if self.cfg.parallel {
            // One chunk per pool width keeps at most that many full-size frames in flight.
            let width = pool.current_num_threads().max(1);
            for (chunk_paths, chunk_names) in paths.chunks(width).zip(names.chunks(width)) {
                self.cancel.check()?;
                let frames: Vec<MorphResult<RgbaFrame>> = pool.install(|| {
                    chunk_paths
                        .par_iter()
                        .map(|p| self.prepare_image(p))
                        .collect()
                });
                for (name, frame) in chunk_names.iter().zip(frames) {
                    store.put(name, &frame?)?;
                }
            }
        } else {
            for (path, name) in paths.iter().zip(&names) {
                self.cancel.check()?;
                let frame = pool.install(|| self.prepare_image(path))?;
                store.put(name, &frame)?;
            }
        }
        Ok(names)
    }

    fn prepare_image(&self, path: &Path) -> MorphResult<RgbaFrame> {
        tracing::info!(image = %file_name(path), "normalizing image");
        let raw = decode_image(path)?;
        let frame = normalize_to_canvas(&raw, self.cfg.canvas, &self.cfg.normalize_opts())?;
        with_alpha(&frame)
    }

    /// Render the timeline over the frames in `store` and stream it into `sink`.
    ///
    /// Frames are produced on the calling thread and handed to a dedicated encoder thread over a
    /// bounded channel. The sink only sees `end` once every planned frame was delivered; if the
    /// producer stops early the sink is left unfinished.
    #[tracing::instrument(skip_all, fields(images = store.len()))]
    pub fn render(
        &self,
        store: &dyn FrameStore,
        sink: &mut dyn FrameSink,
    ) -> MorphResult<RenderStats> {
        let plan = plan_timeline(store.len(), &self.cfg.timing())?;
        let cfg = SinkConfig {
            width: self.cfg.canvas.width,
            height: self.cfg.canvas.height,
            fps: self.cfg.fps,
            total_frames: plan.total_frames,
        };
        tracing::info!(
            frames = plan.total_frames,
            hold = plan.hold_frames,
            morph = plan.morph_frames,
            "rendering timeline"
        );

        let cap = self.cfg.channel_capacity.max(1);
        std::thread::scope(|scope| -> MorphResult<RenderStats> {
            let (tx, rx) = mpsc::sync_channel::<FrameMsg>(cap);
            let total = plan.total_frames;

            let enc = scope.spawn(move || -> MorphResult<()> {
                sink.begin(cfg)?;
                let mut delivered = 0u64;
                for msg in rx {
                    sink.push_frame(msg.idx, &msg.frame)?;
                    delivered += 1;
                }
                if delivered != total {
                    return Err(MorphError::encoder(format!(
                        "render stopped after {delivered} of {total} frames"
                    )));
                }
                sink.end()
            });

            let produced = self.produce(&plan, store, &tx);
            drop(tx);
            let encoded = enc
                .join()
                .map_err(|_| MorphError::encoder("encoder thread panicked"))?;

            match produced {
                Ok(stats) => encoded.map(|()| stats),
                // The encoder hung up first; its error is the real cause.
                Err(Halt::SinkGone) => Err(encoded.err().unwrap_or_else(|| {
                    MorphError::encoder("encoder thread stopped accepting frames")
                })),
                Err(Halt::Failed(e)) => Err(e),
            }
        })
    }

    fn produce(
        &self,
        plan: &TimelinePlan,
        store: &dyn FrameStore,
        tx: &mpsc::SyncSender<FrameMsg>,
    ) -> Result<RenderStats, Halt> {
        let mut cache = PairCache::new(store, self.cfg.canvas);
        let mut stats = RenderStats::default();
        let mut idx = 0u64;

        for seg in &plan.segments {
            match *seg {
                Segment::Hold { image, frames } => tracing::debug!(image, frames, "hold"),
                Segment::Morph { from, to, frames } => {
                    tracing::info!(from, to, frames, "morphing")
                }
            }
            for k in 0..seg.frames() {
                self.cancel.check()?;
                let frame = match segment_source(seg, k) {
                    FrameSource::Still { image } => {
                        stats.frames_held += 1;
                        cache.get(image)?
                    }
                    FrameSource::Blend { from, to, t } => {
                        stats.frames_blended += 1;
                        let a = cache.get(from)?;
                        let b = cache.get(to)?;
                        Arc::new(blend(&a, &b, t)?)
                    }
                };
                send(tx, &mut idx, frame)?;
            }
        }

        stats.frames_total = idx;
        Ok(stats)
    }

    /// Render a single timeline frame (preview).
    pub fn render_frame(&self, store: &dyn FrameStore, idx: FrameIndex) -> MorphResult<RgbFrame> {
        let plan = plan_timeline(store.len(), &self.cfg.timing())?;
        let mut cache = PairCache::new(store, self.cfg.canvas);
        match plan.source_at(idx)? {
            FrameSource::Still { image } => Ok(cache.get(image)?.as_ref().clone()),
            FrameSource::Blend { from, to, t } => {
                let a = cache.get(from)?;
                let b = cache.get(to)?;
                blend(&a, &b, t)
            }
        }
    }
}

#[derive(Debug)]
struct FrameMsg {
    idx: FrameIndex,
    frame: Arc<RgbFrame>,
}

/// Why the producer stopped.
enum Halt {
    Failed(MorphError),
    SinkGone,
}

impl From<MorphError> for Halt {
    fn from(e: MorphError) -> Self {
        Halt::Failed(e)
    }
}

fn send(tx: &mpsc::SyncSender<FrameMsg>, idx: &mut u64, frame: Arc<RgbFrame>) -> Result<(), Halt> {
    tx.send(FrameMsg {
        idx: FrameIndex(*idx),
        frame,
    })
    .map_err(|_| Halt::SinkGone)?;
    *idx += 1;
    Ok(())
}

/// Keeps the two most recently used stored frames resident.
struct PairCache<'a> {
    store: &'a dyn FrameStore,
    canvas: Canvas,
    slots: Vec<(usize, Arc<RgbFrame>)>,
}

impl<'a> PairCache<'a> {
    fn new(store: &'a dyn FrameStore, canvas: Canvas) -> Self {
        Self {
            store,
            canvas,
            slots: Vec::with_capacity(3),
        }
    }

    fn get(&mut self, index: usize) -> MorphResult<Arc<RgbFrame>> {
        if let Some((_, frame)) = self.slots.iter().find(|(i, _)| *i == index) {
            return Ok(frame.clone());
        }
        let frame = self.store.load_rgb(index)?;
        if frame.canvas() != self.canvas {
            return Err(MorphError::dimension_mismatch(format!(
                "stored frame {index} is {}x{}, canvas is {}x{}",
                frame.width, frame.height, self.canvas.width, self.canvas.height
            )));
        }
        let frame = Arc::new(frame);
        self.slots.push((index, frame.clone()));
        if self.slots.len() > 2 {
            self.slots.remove(0);
        }
        Ok(frame)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn build_thread_pool(threads: Option<usize>) -> MorphResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| MorphError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/morph_session.rs"]
mod tests;
