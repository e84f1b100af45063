mod autopilot;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use escape_common::GameConfig;
use escape_input::InputState;
use escape_kernel::{GameEvent, RoomLayout, Session};
use escape_render::{DebugTextRenderer, FrameSnapshot, Renderer};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::autopilot::Autopilot;

/// Aspect ratio used for headless frame captures.
const HEADLESS_ASPECT: f32 = 800.0 / 600.0;

#[derive(Parser)]
#[command(name = "escape-cli", about = "Headless tools for the escape room")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML file overriding camera and interaction tuning
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Dump the room geometry as seen from the start position
    Layout {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as YAML
    Config,
    /// Walk a scripted player through the whole room
    Simulate {
        /// Frame step in seconds
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// Give up after this many frames
        #[arg(long, default_value = "10000")]
        max_frames: u64,
        /// Print a frame dump whenever the status line changes
        #[arg(long)]
        verbose_frames: bool,
        /// Emit a JSON summary instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
struct EventRecord {
    frame: u64,
    event: GameEvent,
}

#[derive(Debug, Serialize)]
struct SimulationSummary {
    frames: u64,
    seconds: f32,
    escaped: bool,
    events: Vec<EventRecord>,
}

#[derive(Serialize)]
struct LayoutDump<'a> {
    layout: &'a RoomLayout,
    frame: &'a FrameSnapshot,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<GameConfig> {
    match path {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(GameConfig::default()),
    }
}

fn simulate(
    config: &GameConfig,
    dt: f32,
    max_frames: u64,
    verbose_frames: bool,
    quiet: bool,
) -> anyhow::Result<SimulationSummary> {
    if !(dt.is_finite() && dt > 0.0) {
        bail!("frame step must be positive, got {dt}");
    }

    let mut session = Session::new(config);
    let mut input = InputState::new();
    let mut pilot = Autopilot::new();
    let renderer = DebugTextRenderer::new();
    let mut events = Vec::new();
    let mut last_status = String::new();

    while session.frame() < max_frames && !session.game().game_won() {
        pilot.drive(&session, &mut input);
        let snapshot = input.snapshot();
        let frame = session.frame();
        for event in session.update(dt, &snapshot) {
            events.push(EventRecord { frame, event });
        }
        input.end_frame();

        let status = session.status_text();
        if status != last_status {
            if !quiet {
                if verbose_frames {
                    let capture = FrameSnapshot::capture(&session, HEADLESS_ASPECT);
                    print!("{}", renderer.render(&capture));
                } else {
                    println!("[{frame:>5}] {status}");
                }
            }
            last_status = status;
        }
    }

    let escaped = session.game().game_won();
    if !escaped {
        tracing::warn!(frames = session.frame(), "simulation stopped before escaping");
    }

    Ok(SimulationSummary {
        frames: session.frame(),
        seconds: session.frame() as f32 * dt,
        escaped,
        events,
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Info => {
            let session = Session::new(&config);
            println!("escape-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", escape_render::crate_info());
            println!(
                "room: {} walls, {} buttons",
                session.layout().walls().len(),
                session.game().total_buttons()
            );
            println!("status: {}", session.status_text());
        }
        Commands::Layout { json } => {
            let session = Session::new(&config);
            let frame = FrameSnapshot::capture(&session, HEADLESS_ASPECT);
            if json {
                let dump = LayoutDump {
                    layout: session.layout(),
                    frame: &frame,
                };
                println!("{}", serde_json::to_string_pretty(&dump)?);
            } else {
                print!("{}", DebugTextRenderer::with_static_geometry().render(&frame));
            }
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
        Commands::Simulate {
            dt,
            max_frames,
            verbose_frames,
            json,
        } => {
            let summary = simulate(&config, dt, max_frames, verbose_frames, json)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "{} after {} frames ({:.1}s)",
                    if summary.escaped { "Escaped" } else { "Still locked in" },
                    summary.frames,
                    summary.seconds
                );
            }
            if !summary.escaped {
                bail!("no escape within {max_frames} frames");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulation_escapes_with_default_config() {
        let summary = simulate(&GameConfig::default(), 1.0 / 60.0, 10_000, false, true)
            .expect("simulate");
        assert!(summary.escaped);
        assert_eq!(summary.events.len(), 5);
        assert_eq!(summary.events.last().map(|r| r.event), Some(GameEvent::Escaped));
        // Door opens on the frame of the final press.
        assert_eq!(summary.events[2].frame, summary.events[3].frame);
    }

    #[test]
    fn simulation_gives_up_at_frame_limit() {
        let summary =
            simulate(&GameConfig::default(), 1.0 / 60.0, 10, false, true).expect("simulate");
        assert!(!summary.escaped);
        assert_eq!(summary.frames, 10);
    }

    #[test]
    fn rejects_non_positive_step() {
        assert!(simulate(&GameConfig::default(), 0.0, 10, false, true).is_err());
    }

    #[test]
    fn summary_serializes() {
        let summary = SimulationSummary {
            frames: 3,
            seconds: 0.05,
            escaped: false,
            events: vec![EventRecord {
                frame: 1,
                event: GameEvent::DoorOpened,
            }],
        };
        let json = serde_json::to_value(&summary).expect("json");
        assert_eq!(json["events"][0]["event"], "DoorOpened");
    }
}
