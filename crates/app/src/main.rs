use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::{Parser, Subcommand};
use showcase_core::{
    CarouselController, ControlAction, ShowcaseConfig, ShowcaseError, SimulatedClip, SurfaceNotice,
};
use tracing_subscriber::EnvFilter;

fn main() -> showcase_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config } => run_validate(&config),
        Commands::Defaults => run_defaults(),
        Commands::Simulate(args) => run_simulate(&args),
    }
}

fn run_validate(path: &Path) -> showcase_core::Result<()> {
    let config = ShowcaseConfig::from_path(path)?;
    tracing::info!(?path, clips = config.clips.len(), "configuration is valid");
    Ok(())
}

fn run_defaults() -> showcase_core::Result<()> {
    println!("{}", serde_json::to_string_pretty(&ShowcaseConfig::default())?);
    Ok(())
}

fn run_simulate(args: &SimulateArgs) -> showcase_core::Result<()> {
    let frames = frame_count(args.seconds, args.fps)?;

    let config = match &args.config {
        Some(path) => ShowcaseConfig::from_path(path)?,
        None => ShowcaseConfig::default(),
    };
    let mut controller = CarouselController::<SimulatedClip>::from_config(&config)?;
    controller.set_viewport_width(args.width);

    let clips: Vec<Rc<RefCell<SimulatedClip>>> = controller
        .catalog()
        .iter()
        .map(|clip| Rc::new(RefCell::new(SimulatedClip::new(clip.duration_seconds))))
        .collect();
    for (index, clip) in clips.iter().enumerate() {
        controller.mount_clip(index, clip);
        controller.mount_indicator(index);
        controller.metadata_loaded(index);
    }

    tracing::info!(
        clips = clips.len(),
        seconds = args.seconds,
        fps = args.fps,
        "starting simulation"
    );
    controller.viewport_changed(1.0);

    let dt = 1.0 / args.fps as f32;
    let mut pause_pending = args.pause_at;
    let mut resume_pending = args.resume_at;

    for frame in 0..frames {
        let now = frame as f32 * dt;

        if pause_pending.is_some_and(|at| now >= at) && controller.control() == ControlAction::Pause {
            pause_pending = None;
            tracing::info!(now, "pressing pause");
            controller.press_control();
        }
        if pause_pending.is_none()
            && resume_pending.is_some_and(|at| now >= at)
            && controller.control() == ControlAction::Play
        {
            resume_pending = None;
            tracing::info!(now, "pressing play");
            controller.press_control();
        }

        for (index, clip) in clips.iter().enumerate() {
            let notices = clip.borrow_mut().advance(dt);
            for notice in notices {
                match notice {
                    SurfaceNotice::Started => controller.clip_started(index),
                    SurfaceNotice::Ended => controller.clip_ended(index),
                };
            }
        }

        controller.frame(dt);

        if args.replay && controller.control() == ControlAction::Replay {
            tracing::info!(now, "pressing replay");
            controller.press_control();
        }
    }

    let snapshot = controller.snapshot();
    tracing::info!(
        active = snapshot.state.active_index,
        control = %snapshot.control.label,
        "simulation finished"
    );
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// Number of frames needed to cover `seconds` at `fps`.
fn frame_count(seconds: f32, fps: u32) -> showcase_core::Result<u64> {
    if fps == 0 {
        return Err(ShowcaseError::msg("--fps must be greater than zero"));
    }
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(ShowcaseError::msg(
            "--seconds must be a finite, non-negative number",
        ));
    }
    Ok((seconds * fps as f32).ceil() as u64)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Showcase video carousel tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a clip configuration file.
    Validate {
        /// Path to the JSON configuration.
        config: PathBuf,
    },
    /// Print the built-in configuration as JSON.
    Defaults,
    /// Run the carousel headless against simulated clips.
    Simulate(SimulateArgs),
}

#[derive(clap::Args, Debug)]
struct SimulateArgs {
    /// Optional JSON configuration; the built-in highlights are used otherwise.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Simulated wall time in seconds.
    #[arg(short, long, default_value_t = 20.0)]
    seconds: f32,
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Viewport width in pixels, used by the indicator breakpoints.
    #[arg(short, long, default_value_t = showcase_core::DEFAULT_VIEWPORT_WIDTH)]
    width: f32,
    /// Press pause at this time.
    #[arg(long)]
    pause_at: Option<f32>,
    /// Press play again at this time (after a pause).
    #[arg(long)]
    resume_at: Option<f32>,
    /// Press replay whenever the sequence finishes.
    #[arg(long)]
    replay: bool,
}
