use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use crownshy::{CanopyConfig, FrameRgba, Session};

#[derive(Parser, Debug)]
#[command(name = "crownshy", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the frame at a point in the loop as a PNG.
    Frame(FrameArgs),
    /// Render a stretch of the loop as a numbered PNG sequence.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Frame width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Frame height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Determinism seed; the same seed always grows the same forest.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Scene configuration JSON; defaults to the built-in scene.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ticks per second of simulated time.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Scripted drag event "x,y,t": opens a gap at (x, y) once t seconds of
    /// simulated time have passed. Repeatable.
    #[arg(long = "poke", value_parser = parse_poke)]
    pokes: Vec<Poke>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Point in the loop to render, in seconds.
    #[arg(long)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Length of simulated time to render, in seconds.
    #[arg(long)]
    duration: f64,

    /// Output directory for the PNG sequence.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug)]
struct Poke {
    x: f64,
    y: f64,
    at: f64,
}

fn parse_poke(s: &str) -> Result<Poke, String> {
    let parts: Vec<&str> = s.split(',').collect();
    let [x, y, at] = parts.as_slice() else {
        return Err("expected x,y,t".to_string());
    };
    let parse = |v: &str| v.trim().parse::<f64>().map_err(|e| format!("{v:?}: {e}"));
    Ok(Poke {
        x: parse(x)?,
        y: parse(y)?,
        at: parse(at)?,
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn build_session(scene: &SceneArgs) -> anyhow::Result<Session> {
    let cfg = match &scene.config {
        Some(path) => CanopyConfig::load_json(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => CanopyConfig::default(),
    };
    Ok(Session::new(cfg, scene.width, scene.height, scene.seed)?)
}

/// Advance the session to `until` seconds, applying scripted pokes as their
/// timestamps pass and handing every composited frame to `on_frame`.
fn run_until(
    session: &mut Session,
    scene: &SceneArgs,
    until: f64,
    mut on_frame: impl FnMut(u64, &FrameRgba) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    anyhow::ensure!(scene.fps > 0.0, "fps must be > 0");
    anyhow::ensure!(until >= 0.0, "time must be >= 0");

    let mut pokes: Vec<Poke> = scene.pokes.clone();
    pokes.sort_by(|a, b| a.at.total_cmp(&b.at));
    let mut next_poke = 0;

    let dt = 1.0 / scene.fps;
    let ticks = (until * scene.fps).ceil().max(1.0) as u64;
    for i in 0..ticks {
        let now = i as f64 * dt;
        while next_poke < pokes.len() && pokes[next_poke].at <= now {
            let p = pokes[next_poke];
            session.pointer_dragged(p.x, p.y);
            next_poke += 1;
        }
        let frame = session.tick(dt)?;
        on_frame(i, frame)?;
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut session = build_session(&args.scene)?;

    let mut last: Option<FrameRgba> = None;
    run_until(&mut session, &args.scene, args.time, |_, frame| {
        last = Some(frame.clone());
        Ok(())
    })?;
    let frame = last.context("no frames rendered")?;

    write_png(&args.out, &frame)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut session = build_session(&args.scene)?;

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    let mut written = 0u64;
    run_until(&mut session, &args.scene, args.duration, |i, frame| {
        let path = args.out.join(format!("frame_{i:05}.png"));
        write_png(&path, frame)?;
        written += 1;
        if written % 60 == 0 {
            eprintln!("rendered {written} frames");
        }
        Ok(())
    })?;

    eprintln!("wrote {} frames to {}", written, args.out.display());
    Ok(())
}

fn write_png(path: &Path, frame: &FrameRgba) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}
