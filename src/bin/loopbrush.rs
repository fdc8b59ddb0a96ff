use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "loopbrush", version)]
struct Cli {
    /// Engine config JSON (defaults plus `LOOPBRUSH_*` overrides when omitted).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one loop time of a session as a PNG.
    Frame(FrameArgs),
    /// Export one full loop cycle as MP4 or WebM (requires `ffmpeg` on PATH).
    Export(ExportArgs),
    /// Print the export frame schedule as JSON.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input session JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Loop time to render, in milliseconds.
    #[arg(long)]
    time_ms: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Output width and height in pixels.
    #[arg(long)]
    size: Option<u32>,

    /// Font file used for text and emoji stamps.
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input session JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output video path (`.mp4` or `.webm`).
    #[arg(long)]
    out: PathBuf,

    #[arg(long)]
    fps: Option<u32>,

    /// Output width and height in pixels.
    #[arg(long)]
    size: Option<u32>,

    /// Raw interleaved `f32le` PCM driving audio reactivity and muxed into the video.
    #[arg(long)]
    audio: Option<PathBuf>,

    #[arg(long, default_value_t = 48_000)]
    sample_rate: u32,

    #[arg(long, default_value_t = 2)]
    channels: u16,

    /// Font file used for text and emoji stamps.
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Input session JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long)]
    fps: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Frame(args) => cmd_frame(config, args),
        Command::Export(args) => cmd_export(config, args),
        Command::Plan(args) => cmd_plan(config, args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<loopbrush::EngineConfig> {
    let mut config = match path {
        Some(p) => loopbrush::EngineConfig::from_path(p)?,
        None => loopbrush::EngineConfig::default(),
    };
    config.apply_env_overrides();
    Ok(config)
}

fn load_engine(
    config: loopbrush::EngineConfig,
    session: &Path,
) -> anyhow::Result<loopbrush::LoopEngine> {
    let snapshot = loopbrush::SessionSnapshot::from_path(session)
        .with_context(|| format!("load session '{}'", session.display()))?;
    let mut engine = loopbrush::LoopEngine::new(config);
    engine.load_snapshot(snapshot);
    Ok(engine)
}

fn load_font(path: Option<&Path>) -> anyhow::Result<Option<loopbrush::FontSource>> {
    path.map(loopbrush::FontSource::from_path)
        .transpose()
        .map_err(Into::into)
}

fn cmd_frame(config: loopbrush::EngineConfig, args: FrameArgs) -> anyhow::Result<()> {
    let size = args.size.unwrap_or(config.export.size);
    let engine = load_engine(config, &args.in_path)?;

    let mut surface = loopbrush::CpuSurface::new(size, size)?;
    if let Some(font) = load_font(args.font.as_deref())? {
        surface = surface.with_font(&font)?;
    }
    let time = args.time_ms.clamp(0.0, engine.clock().duration());
    engine.render_frame(&mut surface, time, loopbrush::Resonance::SILENT);
    let frame = surface.finish()?;

    loopbrush::encode::ffmpeg::ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export(config: loopbrush::EngineConfig, args: ExportArgs) -> anyhow::Result<()> {
    let mut opts = loopbrush::ExportOptions::from_config(&config.export)?;
    if let Some(fps) = args.fps {
        opts.fps = fps;
    }
    if let Some(size) = args.size {
        opts.size = size;
    }
    opts.font = load_font(args.font.as_deref())?;

    let mut engine = load_engine(config, &args.in_path)?;

    if let Some(path) = args.audio {
        let samples = loopbrush::read_f32le_pcm(&path, args.channels)?;
        let source = loopbrush::PcmSpectrumSource::new(samples, args.sample_rate)?;
        engine.set_audio_source(Box::new(source));
        opts.audio = Some(loopbrush::AudioInputConfig {
            path,
            sample_rate: args.sample_rate,
            channels: args.channels,
        });
    }

    let bg = opts.background;
    let mut sink = loopbrush::FfmpegSink::new(loopbrush::FfmpegSinkOpts {
        out_path: args.out.clone(),
        overwrite: true,
        bg_rgba: [bg.r, bg.g, bg.b, 255],
    });
    let stats = loopbrush::export_loop(&engine, &mut sink, &opts)?;

    eprintln!(
        "wrote {} ({} frames, {:.0} ms)",
        args.out.display(),
        stats.frames,
        stats.record_length_ms
    );
    Ok(())
}

fn cmd_plan(config: loopbrush::EngineConfig, args: PlanArgs) -> anyhow::Result<()> {
    let fps = args.fps.unwrap_or(config.export.fps);
    let engine = load_engine(config, &args.in_path)?;
    let plan = loopbrush::ExportPlan::from_clock(engine.clock(), fps)?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
