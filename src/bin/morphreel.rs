use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use morphreel::{
    Canvas, Fps, FrameIndex, MorphConfig, MorphSession, StorageStrategy, VideoCodec, open_store,
};

#[derive(Parser, Debug)]
#[command(name = "morphreel", version, about = "Cross-dissolve a folder of images into an MP4")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the full video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single timeline frame as a PNG.
    Frame(FrameArgs),
    /// Print the timeline plan as JSON without decoding any image.
    Plan(PlanArgs),
}

#[derive(Args, Debug)]
struct PipelineArgs {
    /// Directory holding the input images.
    #[arg(long, default_value = ".")]
    input: PathBuf,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Output frames per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Seconds each image is held.
    #[arg(long, default_value_t = 5.0)]
    hold: f64,

    /// Seconds each transition lasts.
    #[arg(long, default_value_t = 3.0)]
    morph: f64,

    /// Background fill blur strength.
    #[arg(long, default_value_t = morphreel::DEFAULT_BLUR_SIGMA)]
    blur_sigma: f32,

    /// Where normalized frames are kept between preparation and rendering.
    #[arg(long, value_enum, default_value_t = StorageArg::Spool)]
    storage: StorageArg,

    /// Parent directory for the temporary spool directory.
    #[arg(long)]
    spool_dir: Option<PathBuf>,

    /// Normalize several images at once.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    pipeline: PipelineArgs,

    /// Output MP4 path.
    #[arg(long, default_value = "output.mp4")]
    out: PathBuf,

    /// Overwrite output if it already exists.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    overwrite: bool,

    /// Video codec.
    #[arg(long, value_enum, default_value_t = CodecArg::Mpeg4)]
    codec: CodecArg,

    /// Write the run report as JSON to this path.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    pipeline: PipelineArgs,

    /// Frame index (0-based).
    #[arg(long)]
    index: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[command(flatten)]
    pipeline: PipelineArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StorageArg {
    Spool,
    Memory,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CodecArg {
    Mpeg4,
    H264,
}

impl PipelineArgs {
    fn to_config(&self) -> anyhow::Result<MorphConfig> {
        Ok(MorphConfig {
            input_dir: self.input.clone(),
            canvas: Canvas::new(self.width, self.height)?,
            fps: Fps::whole(self.fps)?,
            hold_secs: self.hold,
            morph_secs: self.morph,
            blur_sigma: self.blur_sigma,
            storage: match self.storage {
                StorageArg::Spool => StorageStrategy::Spool,
                StorageArg::Memory => StorageStrategy::InMemory,
            },
            spool_root: self.spool_dir.clone(),
            parallel: self.parallel,
            threads: self.threads,
            ..MorphConfig::default()
        })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = MorphConfig {
        output_path: args.out.clone(),
        overwrite: args.overwrite,
        codec: match args.codec {
            CodecArg::Mpeg4 => VideoCodec::Mpeg4,
            CodecArg::H264 => VideoCodec::H264,
        },
        ..args.pipeline.to_config()?
    };
    let session = MorphSession::new(cfg)?;
    let report = session.run()?;

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report).context("serialize run report")?;
        std::fs::write(path, json)
            .with_context(|| format!("write report '{}'", path.display()))?;
    }

    eprintln!(
        "wrote {} ({} frames from {} images)",
        args.out.display(),
        report.stats.frames_total,
        report.images.len()
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = args.pipeline.to_config()?;
    let session = MorphSession::new(cfg)?;
    let cfg = session.config();

    let mut store = open_store(cfg.storage, cfg.spool_root.as_deref())?;
    session.prepare(store.as_mut())?;
    let frame = session.render_frame(store.as_ref(), FrameIndex(args.index))?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    frame
        .into_image()?
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let session = MorphSession::new(args.pipeline.to_config()?)?;
    let plan = session.plan()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&plan).context("serialize plan")?
    );
    Ok(())
}
