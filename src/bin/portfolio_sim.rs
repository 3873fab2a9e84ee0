//! Portfolio Simulation
//!
//! Run with: `cargo run --bin portfolio_sim -- [--config PATH] [--level PATH] [--frames N]`
//!
//! Headless driver for the portfolio session. Loads a config and a level
//! (falling back to built-in defaults), then plays a scripted tour at 60 Hz:
//!
//! - Walk right and interact with the first island
//! - Browse to the next project and open the viewer
//! - Leave the viewer and the island
//! - Walk left into the room and open a trophy collection
//!
//! Set `RUST_LOG=debug` for per-event detail.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;

use glam::Vec3;
use log::{error, info, warn};
use winit::keyboard::KeyCode as WinitKey;

use island_portfolio_engine::config::SimConfig;
use island_portfolio_engine::scene::{
    CollectionPopup, CollectionPopupState, FadeViewer, LogBridge, PortfolioSession, Viewer,
};
use island_portfolio_engine::world::{
    LevelData, NamedBox, NamedPoint, Project, default_collections, ground_strip,
};

type Session = PortfolioSession<FadeViewer, CollectionPopupState, LogBridge>;

const FRAME_DT: f32 = 1.0 / 60.0;
const STATUS_EVERY: u64 = 60;
/// Frames a tour step may wait for its condition before it is skipped
const STEP_TIMEOUT: u32 = 600;

// ============================================================================
// ARGUMENTS
// ============================================================================

struct Args {
    config: Option<PathBuf>,
    level: Option<PathBuf>,
    frames: u64,
}

fn parse_args() -> Args {
    let mut args = Args {
        config: None,
        level: None,
        frames: 1800,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => args.config = iter.next().map(PathBuf::from),
            "--level" => args.level = iter.next().map(PathBuf::from),
            "--frames" => match iter.next().map(|n| n.parse::<u64>()) {
                Some(Ok(n)) => args.frames = n,
                _ => warn!("--frames expects a number; keeping {}", args.frames),
            },
            other => warn!("ignoring unknown argument `{other}`"),
        }
    }
    args
}

fn load_config(path: Option<&PathBuf>) -> SimConfig {
    let Some(path) = path else {
        return SimConfig::default();
    };
    match SimConfig::load(path) {
        Ok(config) => {
            info!("config loaded from {}", path.display());
            config
        }
        Err(e) => {
            warn!("{e}; using default config");
            SimConfig::default()
        }
    }
}

// ============================================================================
// DEMO LEVEL
// ============================================================================

fn zone(name: &str, x_min: f32, x_max: f32) -> NamedBox {
    NamedBox {
        name: name.to_string(),
        min: Vec3::new(x_min, -1.0, -3.0),
        max: Vec3::new(x_max, 6.0, 3.0),
    }
}

fn point(name: &str, x: f32) -> NamedPoint {
    NamedPoint {
        name: name.to_string(),
        position: Vec3::new(x, 0.0, 0.0),
    }
}

fn project(id: &str, name: &str, client: &str, year: &str) -> Project {
    Project {
        id: id.to_string(),
        name: name.to_string(),
        client: client.to_string(),
        year: year.to_string(),
        framer_hash: Some(format!("work-{id}")),
        ..Default::default()
    }
}

/// Three islands to the right of the spawn and a trophy room to the left.
fn demo_level() -> LevelData {
    LevelData {
        collision: ground_strip(-80.0, 80.0, 0.0),
        zones: vec![
            zone("IslandZone_1", 4.0, 20.0),
            zone("IslandZone_2", 24.0, 40.0),
            zone("IslandZone_3", 44.0, 60.0),
            zone("RoomZone", -60.0, -40.0),
        ],
        teleport_spots: vec![
            point("TeleportSpot_1", 6.0),
            point("TeleportSpot_2", 30.0),
            point("TeleportSpot_3", 50.0),
            point("spot-photography", -52.0),
            point("spot-sfx-edits", -46.0),
        ],
        trophy_markers: Vec::new(),
        projects: vec![
            project("tidal", "Tidal Echoes", "Harbor Films", "2023"),
            project("neon", "Neon Drift", "Arcadia", "2024"),
            project("ember", "Ember Season", "Northlight", "2025"),
        ],
        collections: default_collections(),
    }
}

// ============================================================================
// SCRIPTED TOUR
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    WalkRight { frames: u32 },
    InteractIsland,
    AwaitPanel,
    BrowseNext,
    EnterViewer,
    AwaitViewer,
    Watch { frames: u32 },
    ExitViewer,
    CloseIsland,
    WalkToRoom,
    AwaitPopup,
    Browse { frames: u32 },
    ClosePopup,
    Done,
}

struct Tour {
    step: Step,
    waited: u32,
}

impl Tour {
    fn new() -> Self {
        Self {
            step: Step::WalkRight { frames: 18 },
            waited: 0,
        }
    }

    fn go(&mut self, next: Step) {
        info!("tour: {:?} -> {:?}", self.step, next);
        self.step = next;
        self.waited = 0;
    }

    /// Feed this frame's input for the current step.
    fn drive(&mut self, s: &mut Session) {
        self.waited += 1;
        if self.waited > STEP_TIMEOUT && self.step != Step::Done {
            warn!("tour step {:?} timed out; stopping the script", self.step);
            self.go(Step::Done);
            return;
        }

        match self.step {
            Step::WalkRight { frames } => {
                if self.waited == 1 {
                    s.key_down(WinitKey::ArrowRight.into());
                }
                if self.waited >= frames {
                    s.key_up(WinitKey::ArrowRight.into());
                    self.go(Step::InteractIsland);
                }
            }
            Step::InteractIsland => {
                if s.affordance().is_visible() && s.character().velocity.x.abs() < 0.5 {
                    s.key_down(WinitKey::ArrowUp.into());
                    s.key_up(WinitKey::ArrowUp.into());
                    self.go(Step::AwaitPanel);
                }
            }
            Step::AwaitPanel => {
                if s.mode().project_select_visible() {
                    self.go(Step::BrowseNext);
                }
            }
            Step::BrowseNext => {
                s.key_down(WinitKey::ArrowRight.into());
                s.key_up(WinitKey::ArrowRight.into());
                self.go(Step::EnterViewer);
            }
            Step::EnterViewer => {
                s.key_down(WinitKey::Enter.into());
                self.go(Step::AwaitViewer);
            }
            Step::AwaitViewer => {
                if s.viewer().is_active() && !s.viewer().is_transitioning() {
                    self.go(Step::Watch { frames: 90 });
                }
            }
            Step::Watch { frames } => {
                if self.waited >= frames {
                    self.go(Step::ExitViewer);
                }
            }
            Step::ExitViewer => {
                if self.waited == 1 {
                    s.key_down(WinitKey::Escape.into());
                }
                if s.mode().project_select_visible() {
                    self.go(Step::CloseIsland);
                }
            }
            Step::CloseIsland => {
                if self.waited == 1 {
                    s.key_down(WinitKey::Escape.into());
                }
                if s.mode().is_free_roam() {
                    s.key_down(WinitKey::ArrowLeft.into());
                    self.go(Step::WalkToRoom);
                }
            }
            Step::WalkToRoom => {
                if s.in_room() && s.nearest_trophy().is_some() {
                    s.interact();
                    s.key_up(WinitKey::ArrowLeft.into());
                    self.go(Step::AwaitPopup);
                }
            }
            Step::AwaitPopup => {
                if s.popup().is_open() {
                    self.go(Step::Browse { frames: 60 });
                }
            }
            Step::Browse { frames } => {
                if self.waited >= frames {
                    self.go(Step::ClosePopup);
                }
            }
            Step::ClosePopup => {
                s.key_down(WinitKey::Escape.into());
                self.go(Step::Done);
            }
            Step::Done => {}
        }
    }
}

fn log_status(s: &Session) {
    let ch = s.character();
    info!(
        "t={:.2}s mode={} pos=({:.2}, {:.2}) vx={:.2} grounded={} fov={:.2} room={} button={}",
        s.clock(),
        s.mode(),
        ch.position.x,
        ch.position.y,
        ch.velocity.x,
        ch.is_grounded(),
        s.camera().current_fov(),
        s.in_room(),
        s.affordance().label().unwrap_or("-"),
    );
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args();
    let config = load_config(args.config.as_ref());
    let data = match &args.level {
        Some(path) => LevelData::load_or_default(path),
        None => demo_level(),
    };
    let level = data.assemble();

    let viewer = FadeViewer::new(level.islands.len());
    let popup = CollectionPopupState::new(level.collections.clone());
    let mut session = PortfolioSession::new(config, level, viewer, popup, LogBridge);
    let mut tour = Tour::new();
    let mut last_mode = session.mode();

    info!("running {} frames at 60 Hz", args.frames);
    for frame in 0..args.frames {
        tour.drive(&mut session);

        let result = catch_unwind(AssertUnwindSafe(|| session.frame(FRAME_DT)));
        if result.is_err() {
            error!("frame {frame} panicked; continuing");
        }

        if session.mode() != last_mode {
            info!("mode: {} -> {}", last_mode, session.mode());
            last_mode = session.mode();
        }
        if frame % STATUS_EVERY == 0 {
            log_status(&session);
        }
    }

    log_status(&session);
    info!(
        "finished after {} frames; tour ended at {:?}",
        session.frame_count(),
        tour.step
    );
}
