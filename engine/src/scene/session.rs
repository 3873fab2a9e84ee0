//! Portfolio Session
//!
//! The simulation context: owns the character, camera, level and mode, and
//! coordinates them each frame. A host forwards key events and calls
//! [`PortfolioSession::frame`] once per display frame.
//!
//! # Frame order
//!
//! 1. Clamp the delta and advance the clock; fire due timed events.
//! 2. Let the viewer advance its fades and react to its signals.
//! 3. Unless the viewer is active: character intent, physics, room check and
//!    fade, blob shadow, island proximity, trophy proximity.
//! 4. Unless the viewer is active or transitioning: camera.
//! 5. Recompute the interact affordance.
//!
//! # Key precedence
//!
//! Checked in this order, first match wins:
//!
//! 1. Viewer active: only Escape (exit the viewer)
//! 2. Viewer exiting: nothing
//! 3. Collection popup open: only Escape (close it)
//! 4. Project select visible: Escape closes, Left/Right browse, Enter opens the viewer
//! 5. In the room next to a trophy: ArrowUp walks to it
//! 6. Island locked without the panel: only Escape
//! 7. Movement keys; ArrowUp next to an island walks to it

use glam::Vec2;
use log::{debug, error, info, warn};

use super::collaborators::{
    CollectionPopup, HostBridge, HostEvent, SceneName, Viewer, ViewerAnchor, ViewerSignal,
};
use super::mode::{Mode, PanelState};
use super::proximity::{Affordance, IslandProximity, nearest_island, nearest_trophy, trophy_anchor};
use super::room::RoomFade;
use super::scheduler::Scheduler;
use super::shadow::BlobShadow;
use crate::camera::{CameraInputs, CameraRig, Framing};
use crate::config::SimConfig;
use crate::input::{InputGate, IntentMapper, KeyCode, KeyboardState};
use crate::player::{ArrivalAction, Character, CharacterController};
use crate::world::{Island, Level, find_project_by_hash};

/// Delayed work queued by the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimedEvent {
    /// Run an auto-walk's arrival action
    Arrival(ArrivalAction),
    /// Show the project-select panel if the lock from `epoch` still holds
    RevealPanel { epoch: u64 },
    /// Release the island lock if no newer transition happened since `epoch`
    ReleaseLock { epoch: u64 },
}

/// The whole interactive portfolio, minus rendering.
pub struct PortfolioSession<V: Viewer, P: CollectionPopup, B: HostBridge> {
    config: SimConfig,
    level: Level,
    controller: CharacterController,
    character: Character,
    camera: CameraRig,
    keys: KeyboardState,
    mode: Mode,
    /// Bumped by every island open/close; timed events from older epochs are stale
    epoch: u64,
    scheduler: Scheduler<TimedEvent>,
    clock: f64,
    frame_count: u64,
    spawn: Vec2,
    room_fade: RoomFade,
    in_room: bool,
    shadow: BlobShadow,
    nearest_island: Option<IslandProximity>,
    nearest_trophy: Option<usize>,
    affordance: Affordance,
    selected_project: usize,
    viewer: V,
    popup: P,
    bridge: B,
}

impl<V: Viewer, P: CollectionPopup, B: HostBridge> PortfolioSession<V, P, B> {
    /// Build a session. An invalid config is replaced by the defaults.
    pub fn new(config: SimConfig, level: Level, viewer: V, popup: P, bridge: B) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!("{e}; using default config");
                SimConfig::default()
            }
        };
        let spawn = level
            .spawn
            .unwrap_or(Vec2::new(config.character.start_x, 0.0));
        let controller = CharacterController::from_config(&config);
        let character = Character::new(spawn, &config.physics);
        let camera = CameraRig::new(&config.camera, &config.character, spawn);

        info!(
            "session ready: {} islands, {} trophies, spawn at ({:.2}, {:.2})",
            level.islands.len(),
            level.trophies.len(),
            spawn.x,
            spawn.y
        );

        Self {
            room_fade: RoomFade::new(&config.room),
            shadow: BlobShadow::new(&config.shadow),
            config,
            level,
            controller,
            character,
            camera,
            keys: KeyboardState::new(),
            mode: Mode::FreeRoam,
            epoch: 0,
            scheduler: Scheduler::new(),
            clock: 0.0,
            frame_count: 0,
            spawn,
            in_room: false,
            nearest_island: None,
            nearest_trophy: None,
            affordance: Affordance::Hidden,
            selected_project: 0,
            viewer,
            popup,
            bridge,
        }
    }

    /// Put the character back at the spawn point, standing still.
    pub fn spawn(&mut self) {
        self.character = Character::new(self.spawn, &self.config.physics);
        self.keys.clear();
        info!("character spawned at ({:.2}, {:.2})", self.spawn.x, self.spawn.y);
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    pub fn key_down(&mut self, key: KeyCode) {
        if self.viewer.is_active() {
            if key == KeyCode::Escape {
                self.exit_viewer();
            }
            return;
        }
        if self.mode.is_viewer() {
            return;
        }

        if self.popup.is_open() {
            if key == KeyCode::Escape {
                self.popup.close();
                debug!("collection popup closed");
            }
            return;
        }

        if self.mode.project_select_visible() {
            match key {
                KeyCode::Escape => self.close_island(),
                KeyCode::ArrowLeft => {
                    self.teleport_to_project(-1);
                }
                KeyCode::ArrowRight => {
                    self.teleport_to_project(1);
                }
                KeyCode::Enter => self.enter_viewer(),
                _ => {}
            }
            return;
        }

        if key == KeyCode::ArrowUp && self.walk_to_trophy() {
            return;
        }

        if self.mode.current_island().is_some() {
            if key == KeyCode::Escape {
                self.close_island();
            }
            return;
        }

        if key.is_movement() {
            self.keys.press(key);
            if key == KeyCode::ArrowUp {
                self.walk_to_island();
            }
        }
    }

    pub fn key_up(&mut self, key: KeyCode) {
        self.keys.release(key);
    }

    /// The on-screen interact button: trophy first, then island.
    pub fn interact(&mut self) -> bool {
        if self.viewer.is_active() || !self.mode.is_free_roam() || self.popup.is_open() {
            return false;
        }
        self.walk_to_trophy() || self.walk_to_island()
    }

    fn walk_to_trophy(&mut self) -> bool {
        if !self.in_room || self.popup.is_open() {
            return false;
        }
        let Some(trophy) = self.nearest_trophy.and_then(|i| self.level.trophies.get(i)) else {
            return false;
        };
        debug!("auto-walk to trophy {}", trophy.name);
        let (x, category) = (trophy.position.x, trophy.category);
        self.character
            .start_auto_walk(x, ArrivalAction::OpenCollection(category));
        true
    }

    fn walk_to_island(&mut self) -> bool {
        let Some(near) = self.nearest_island.filter(|n| n.can_interact) else {
            return false;
        };
        let Some(island) = self.level.islands.get(near.index) else {
            return false;
        };
        let target = island.anchor().x;
        debug!("auto-walk to island {} at x={target:.2}", island.project.name);
        self.character
            .start_auto_walk(target, ArrivalAction::OpenIsland(near.index));
        true
    }

    // =========================================================================
    // Mode transitions
    // =========================================================================

    /// Lock onto island `index`: freeze, frame it, reveal the panel after a delay.
    pub fn open_island(&mut self, index: usize) -> bool {
        let Some(island) = self.level.islands.get(index) else {
            warn!("open_island: no island at index {index}");
            return false;
        };
        if self.viewer.is_active() || self.mode.is_viewer() {
            return false;
        }
        info!("island locked: {} ({})", island.project.name, island.zone_name);

        self.epoch += 1;
        self.mode = Mode::IslandLocked {
            island: index,
            panel: PanelState::Pending,
        };
        self.selected_project = index;
        self.freeze_character();
        self.scheduler.schedule(
            self.config.timing.panel_reveal_delay,
            TimedEvent::RevealPanel { epoch: self.epoch },
        );
        true
    }

    /// Hide the panel and release the lock after a delay. A later open wins.
    pub fn close_island(&mut self) {
        let Mode::IslandLocked { island, .. } = self.mode else {
            return;
        };
        debug!("island {island} closing");
        self.epoch += 1;
        self.mode = Mode::IslandLocked {
            island,
            panel: PanelState::Releasing,
        };
        self.scheduler.schedule(
            self.config.timing.lock_release_delay,
            TimedEvent::ReleaseLock { epoch: self.epoch },
        );
    }

    /// Move instantly to the neighbouring island while the panel is showing.
    pub fn teleport_to_project(&mut self, direction: i32) -> bool {
        if !self.mode.project_select_visible() {
            return false;
        }
        let Some(index) = self
            .selected_project
            .checked_add_signed(direction as isize)
            .filter(|&i| i < self.level.islands.len())
        else {
            return false;
        };

        self.selected_project = index;
        self.mode = Mode::IslandLocked {
            island: index,
            panel: PanelState::Visible,
        };
        let island = &self.level.islands[index];
        let anchor = island.anchor();
        let camera_position = self.camera.island_position(anchor.x, island.center().y);
        info!("teleported to project {index}: {}", island.project.name);

        self.character.place_at(anchor);
        self.camera.snap_to(camera_position, self.camera.fov_min());
        true
    }

    /// Open the viewer on the selected project.
    pub fn enter_viewer(&mut self) {
        if !self.mode.project_select_visible() {
            return;
        }
        let index = self.selected_project;
        let position = self
            .level
            .islands
            .get(index)
            .and_then(|i| i.spot)
            .map_or(self.character.position, |s| Vec2::new(s.x, s.y));

        info!("entering viewer on project {index}");
        self.freeze_character();
        self.mode = Mode::Viewer {
            island: index,
            exiting: false,
        };
        self.viewer.enter(ViewerAnchor {
            project_index: index,
            position,
        });
    }

    /// Leave the viewer, returning to whichever project it was showing.
    pub fn exit_viewer(&mut self) {
        if !self.viewer.is_active() {
            return;
        }
        let shown = self.viewer.current_index();
        if shown < self.level.islands.len() {
            self.selected_project = shown;
        }
        info!("exiting viewer from project {}", self.selected_project);
        self.mode = Mode::Viewer {
            island: self.selected_project,
            exiting: true,
        };
        self.viewer.exit();
    }

    /// Open the island whose project matches a deep-link hash.
    pub fn open_deep_link(&mut self, hash: &str) -> bool {
        let projects: Vec<_> = self.level.islands.iter().map(|i| i.project.clone()).collect();
        match find_project_by_hash(&projects, hash) {
            Some(index) => {
                info!("deep link {hash} -> project {index}");
                self.open_island(index)
            }
            None => {
                debug!("deep link {hash} matches no project");
                false
            }
        }
    }

    fn freeze_character(&mut self) {
        self.character.freeze();
        self.keys.clear();
    }

    fn handle_timed(&mut self, event: TimedEvent) {
        match event {
            TimedEvent::Arrival(ArrivalAction::OpenIsland(index)) => {
                if self.mode.is_free_roam() {
                    self.open_island(index);
                }
            }
            TimedEvent::Arrival(ArrivalAction::OpenCollection(category)) => {
                if self.mode.is_free_roam() && !self.popup.is_open() {
                    self.freeze_character();
                    self.popup.open(category);
                }
            }
            TimedEvent::RevealPanel { epoch } if epoch == self.epoch => {
                if let Mode::IslandLocked {
                    island,
                    panel: PanelState::Pending,
                } = self.mode
                {
                    debug!("project select shown for {island}");
                    self.selected_project = island;
                    self.mode = Mode::IslandLocked {
                        island,
                        panel: PanelState::Visible,
                    };
                }
            }
            TimedEvent::ReleaseLock { epoch } if epoch == self.epoch => {
                if let Mode::IslandLocked {
                    panel: PanelState::Releasing,
                    ..
                } = self.mode
                {
                    info!("island lock released");
                    self.mode = Mode::FreeRoam;
                }
            }
            TimedEvent::RevealPanel { .. } | TimedEvent::ReleaseLock { .. } => {
                debug!("dropping stale {event:?}");
            }
        }
    }

    fn handle_viewer_signal(&mut self, signal: ViewerSignal) {
        match signal {
            ViewerSignal::EnterReady => {
                self.notify(HostEvent::SceneChanged(SceneName::Viewer));
                let index = self.viewer.current_index();
                self.notify_project_entered(index);
            }
            ViewerSignal::Navigated(index) => self.notify_project_entered(index),
            ViewerSignal::ExitReady => {
                self.notify(HostEvent::SceneChanged(SceneName::Ground));
                self.notify(HostEvent::ProjectExited);
                self.restore_island_after_viewer();
            }
        }
    }

    /// Runs while the exit fade covers the screen.
    fn restore_island_after_viewer(&mut self) {
        let index = self.selected_project;
        let Some(island) = self.level.islands.get(index) else {
            self.mode = Mode::FreeRoam;
            return;
        };
        if let Some(spot) = island.spot {
            self.character.place_at(Vec2::new(spot.x, spot.y));
        }
        let camera_position = self
            .camera
            .island_position(island.anchor().x, island.center().y);
        self.camera.snap_to(camera_position, self.camera.fov_min());

        self.epoch += 1;
        self.mode = Mode::IslandLocked {
            island: index,
            panel: PanelState::Visible,
        };
        info!("back on island {index} after viewer");
    }

    fn notify_project_entered(&mut self, index: usize) {
        let Some(island) = self.level.islands.get(index) else {
            return;
        };
        let project = &island.project;
        let hash = project.framer_hash.clone().unwrap_or_else(|| project.id.clone());
        let id = project.id.clone();
        self.notify(HostEvent::ProjectEntered { id, hash });
    }

    fn notify(&mut self, event: HostEvent) {
        let kind = event.kind();
        if let Err(e) = self.bridge.notify(event) {
            warn!("host notification {kind} dropped: {e}");
        }
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Advance the whole simulation by one display frame.
    pub fn frame(&mut self, dt: f32) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.physics.max_delta)
        } else {
            0.0
        };
        self.clock += f64::from(dt);
        self.frame_count += 1;

        for event in self.scheduler.advance(self.clock) {
            self.handle_timed(event);
        }

        if let Some(signal) = self.viewer.update(dt) {
            self.handle_viewer_signal(signal);
        }

        if !self.viewer.is_active() {
            self.update_character();
            self.controller
                .step(&mut self.character, &self.level.world, dt);
            self.guard_character();
            self.check_room();
            self.shadow.update(
                &self.level.world,
                &self.character.capsule,
                self.character.position,
            );
            self.update_island_proximity();
            self.update_trophy_proximity();
        }

        if !(self.viewer.is_active() || self.viewer.is_transitioning()) {
            let inputs = self.camera_inputs();
            self.camera.update(&inputs);
        }

        self.update_affordance();
    }

    fn input_gate(&self) -> InputGate {
        InputGate {
            project_select: self.mode.project_select_visible(),
            collection_popup: self.popup.is_open(),
            island_locked: self.mode.current_island().is_some(),
        }
    }

    fn update_character(&mut self) {
        let gate = self.input_gate();
        if gate.blocks_movement() {
            return;
        }
        let intent = IntentMapper::map(&self.keys, gate);
        if let Some(action) = self.controller.drive(&mut self.character, intent) {
            self.scheduler
                .schedule(self.config.timing.arrival_delay, TimedEvent::Arrival(action));
        }
    }

    fn guard_character(&mut self) {
        if !self.character.is_finite() {
            error!(
                "character state became non-finite (pos {:?}, vel {:?}); respawning",
                self.character.position, self.character.velocity
            );
            self.spawn();
        }
    }

    fn check_room(&mut self) {
        let Some(room) = self.level.room else {
            return;
        };
        let p = self.character.position;
        let inside = room.contains_xy(p.x, p.y);
        self.in_room = inside;
        if self.room_fade.set_inside(inside) {
            info!("{} the room", if inside { "entered" } else { "left" });
        }
        self.room_fade.update();
    }

    fn update_island_proximity(&mut self) {
        if !self.mode.is_free_roam() || self.level.islands.is_empty() {
            self.nearest_island = None;
            return;
        }
        self.nearest_island = nearest_island(
            &self.level.islands,
            self.character.position,
            self.config.interaction.zone_padding,
        );
    }

    fn update_trophy_proximity(&mut self) {
        if !self.in_room || self.level.trophies.is_empty() || self.popup.is_open() {
            self.nearest_trophy = None;
            return;
        }
        let found = nearest_trophy(
            &self.level.trophies,
            self.character.position,
            self.config.interaction.trophy_radius,
        );
        if found != self.nearest_trophy {
            if let Some(trophy) = found.and_then(|i| self.level.trophies.get(i)) {
                debug!("near trophy {}", trophy.name);
            }
        }
        self.nearest_trophy = found;
    }

    fn camera_inputs(&self) -> CameraInputs {
        let framing = match self.mode {
            Mode::FreeRoam => Framing::Follow,
            Mode::IslandLocked {
                panel: PanelState::Releasing,
                ..
            } => Framing::Releasing,
            Mode::IslandLocked { island, .. } | Mode::Viewer { island, .. } => {
                match self.level.islands.get(island) {
                    Some(i) => Framing::Locked {
                        x: i.anchor().x,
                        y: i.center().y,
                    },
                    None => Framing::Follow,
                }
            }
        };
        CameraInputs {
            framing,
            in_room: self.in_room,
            character: self.character.position,
            velocity_x: self.character.velocity.x,
        }
    }

    fn update_affordance(&mut self) {
        self.affordance = self.compute_affordance();
    }

    fn compute_affordance(&self) -> Affordance {
        if self.viewer.is_active() || self.character.is_auto_walking() || !self.mode.is_free_roam() {
            return Affordance::Hidden;
        }

        if self.in_room && !self.popup.is_open() {
            if let Some((index, trophy)) = self
                .nearest_trophy
                .and_then(|i| self.level.trophies.get(i).map(|t| (i, t)))
            {
                let anchor = trophy_anchor(trophy);
                if let Some(screen) = self.camera.project_to_screen(anchor) {
                    return Affordance::Trophy {
                        index,
                        label: trophy.name.to_uppercase(),
                        anchor,
                        screen,
                    };
                }
            }
        }

        let Some(near) = self.nearest_island.filter(|n| n.can_interact) else {
            return Affordance::Hidden;
        };
        let Some(island) = self.level.islands.get(near.index) else {
            return Affordance::Hidden;
        };
        let anchor = island.button_anchor();
        match self.camera.project_to_screen(anchor) {
            Some(screen) => Affordance::Island {
                index: near.index,
                label: island.project.name.to_uppercase(),
                anchor,
                screen,
            },
            None => Affordance::Hidden,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraRig {
        &mut self.camera
    }

    pub fn affordance(&self) -> &Affordance {
        &self.affordance
    }

    pub fn room_fade(&self) -> &RoomFade {
        &self.room_fade
    }

    pub fn shadow(&self) -> &BlobShadow {
        &self.shadow
    }

    pub fn selected_project(&self) -> usize {
        self.selected_project
    }

    pub fn selected_island(&self) -> Option<&Island> {
        self.mode
            .current_island()
            .and_then(|i| self.level.islands.get(i))
    }

    pub fn in_room(&self) -> bool {
        self.in_room
    }

    pub fn nearest_island(&self) -> Option<IslandProximity> {
        self.nearest_island
    }

    pub fn nearest_trophy(&self) -> Option<usize> {
        self.nearest_trophy
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn keyboard(&self) -> &KeyboardState {
        &self.keys
    }

    /// Seconds of simulated time.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn pending_events(&self) -> usize {
        self.scheduler.len()
    }

    /// The character and its shadow are hidden once the viewer fully covers the scene.
    pub fn character_visible(&self) -> bool {
        !(self.viewer.is_active() && !self.viewer.is_transitioning())
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut V {
        &mut self.viewer
    }

    pub fn popup(&self) -> &P {
        &self.popup
    }

    pub fn popup_mut(&mut self) -> &mut P {
        &mut self.popup
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// Mutable access for tests and hosts that poke state directly.
    pub fn character_mut(&mut self) -> &mut Character {
        &mut self.character
    }
}
