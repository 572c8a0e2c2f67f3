//! posture-replay: render a recorded detection stream to annotated PNGs.
//!
//! ```text
//! posture-replay --recording session.json --background desk.png --out-dir frames/
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use posture_viz::analyzer::{Analysis, PostureAnalyzer};
use posture_viz::color::Rgba;
use posture_viz::config::Config;
use posture_viz::framebuffer::Framebuffer;
use posture_viz::output::{PngDecoder, PngEncoder};
use posture_viz::pipeline::FramePipeline;
use posture_viz::replay::{Recording, ReplayDetector};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_WIDTH: u32 = 1280;
const DEFAULT_HEIGHT: u32 = 720;

/// Render posture overlays for a recorded pose-detection session.
#[derive(Parser, Debug)]
#[command(name = "posture-replay", version, about)]
struct Args {
    /// Recorded detection stream (JSON).
    #[arg(short, long)]
    recording: PathBuf,

    /// Configuration file (YAML or JSON). Defaults to
    /// `<config dir>/posture-viz/config.yaml`, then built-in tables.
    #[arg(short, long, conflicts_with_all = ["thresholds", "advice"])]
    config: Option<PathBuf>,

    /// Threshold table (JSON), used together with --advice.
    #[arg(long, requires = "advice")]
    thresholds: Option<PathBuf>,

    /// Advice table (JSON), used together with --thresholds.
    #[arg(long, requires = "thresholds")]
    advice: Option<PathBuf>,

    /// Background image (PNG); frames are blank when omitted.
    #[arg(short, long)]
    background: Option<PathBuf>,

    /// Canvas width when no background is given.
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height when no background is given.
    #[arg(long)]
    height: Option<u32>,

    /// Output directory for numbered PNG frames.
    #[arg(short, long, default_value = "out")]
    out_dir: PathBuf,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;
    let recording = Recording::load(&args.recording)
        .with_context(|| format!("loading recording {}", args.recording.display()))?;
    if recording.is_empty() {
        bail!("recording {} has no frames", args.recording.display());
    }

    let canvas = canvas(&args, &recording)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let timestamps: Vec<Option<u64>> = recording.frames.iter().map(|f| f.timestamp_ms).collect();
    let analyzer = PostureAnalyzer::new(&config).context("building analyzer")?;
    let mut pipeline = FramePipeline::new(ReplayDetector::new(recording), analyzer);

    info!(
        frames = timestamps.len(),
        width = canvas.width(),
        height = canvas.height(),
        "replaying"
    );

    let (mut analyzed, mut skipped) = (0usize, 0usize);
    for (index, timestamp) in timestamps.into_iter().enumerate() {
        let mut frame = canvas.clone();
        let outcome = match timestamp {
            Some(ts) => pipeline.process_at(&mut frame, ts),
            None => pipeline.process_frame(&mut frame),
        };

        summarize(index, &outcome.analysis);
        if outcome.analysis.is_skipped() {
            skipped += 1;
        } else {
            analyzed += 1;
        }

        let path = args.out_dir.join(format!("frame_{index:05}.png"));
        PngEncoder::write_to_file(&frame, &path)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    info!(analyzed, skipped, out_dir = %args.out_dir.display(), "done");
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    if let (Some(thresholds), Some(advice)) = (&args.thresholds, &args.advice) {
        return Config::from_table_files(thresholds, advice).context("loading threshold tables");
    }
    if let Some(path) = &args.config {
        return Config::load(path).with_context(|| format!("loading {}", path.display()));
    }

    let default_path = dirs::config_dir().map(|d| d.join("posture-viz").join("config.yaml"));
    match default_path {
        Some(path) if path.exists() => {
            debug!(path = %path.display(), "using user configuration");
            Config::load(&path).with_context(|| format!("loading {}", path.display()))
        }
        _ => Ok(Config::default()),
    }
}

fn canvas(args: &Args, recording: &Recording) -> Result<Framebuffer> {
    if let Some(path) = &args.background {
        if args.width.is_some() || args.height.is_some() {
            warn!("--width/--height ignored, using background size");
        }
        return load_background(path);
    }

    let width = args.width.or(recording.width).unwrap_or(DEFAULT_WIDTH);
    let height = args.height.or(recording.height).unwrap_or(DEFAULT_HEIGHT);
    let mut fb = Framebuffer::new(width, height).context("creating canvas")?;
    fb.clear(Rgba::BLACK);
    Ok(fb)
}

fn load_background(path: &Path) -> Result<Framebuffer> {
    PngDecoder::read_file(path).with_context(|| format!("reading background {}", path.display()))
}

fn summarize(index: usize, analysis: &Analysis) {
    match analysis {
        Analysis::Full(report) | Analysis::Partial(report) => {
            let metrics: Vec<String> = report
                .metrics
                .readings()
                .iter()
                .map(|r| {
                    format!(
                        "{}={} ({})",
                        r.metric,
                        r.metric.format_value(r.value),
                        r.classification.tier
                    )
                })
                .collect();
            info!(
                frame = index,
                standing = report.metrics.is_standing,
                "{}",
                metrics.join(", ")
            );
        }
        Analysis::Skipped(reason) => debug!(frame = index, ?reason, "no posture overlay"),
    }
}
