//! Collaborators
//!
//! Seams to the components the session drives but does not own: the
//! project viewer, the collection popup and the host page. Each is a trait so
//! a windowed host can plug in its real implementation; the reference
//! implementations here are headless and deterministic.

use std::fmt;

use glam::Vec2;
use log::{debug, info};

use crate::error::BridgeError;
use crate::world::{CollectionCategory, Collections};

// =============================================================================
// Viewer
// =============================================================================

/// Where the viewer should open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerAnchor {
    pub project_index: usize,
    /// Spot (or character) position the viewer is placed above
    pub position: Vec2,
}

/// Milestones the viewer reports back from [`Viewer::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerSignal {
    /// The enter fade is covering the screen; the viewer is now showing its project
    EnterReady,
    /// The exit fade is covering the screen; the caller may reposition the world
    ExitReady,
    /// The carousel moved to another project while showing
    Navigated(usize),
}

/// The project viewer (carousel and video player).
pub trait Viewer {
    fn enter(&mut self, anchor: ViewerAnchor);
    fn exit(&mut self);
    /// True from `enter` until `exit` is called.
    fn is_active(&self) -> bool;
    /// True while a fade is hiding the scene swap.
    fn is_transitioning(&self) -> bool;
    /// Project currently shown; may differ from the entered one after navigation.
    fn current_index(&self) -> usize;
    /// Advance fades by `dt` seconds and report at most one milestone.
    fn update(&mut self, dt: f32) -> Option<ViewerSignal>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FadePhase {
    Idle,
    EnterFadeOut { elapsed: f32 },
    Showing,
    ExitFadeOut { elapsed: f32 },
    ExitFadeIn { elapsed: f32 },
}

/// Headless viewer that models only the fade timing and the shown index.
///
/// Enter: fade to black, report [`ViewerSignal::EnterReady`], then the
/// carousel is live. Exit: fade to black, report [`ViewerSignal::ExitReady`],
/// then fade back in while still transitioning.
#[derive(Debug, Clone)]
pub struct FadeViewer {
    fade_duration: f32,
    project_count: usize,
    current_index: usize,
    phase: FadePhase,
    anchor: Option<ViewerAnchor>,
    /// Browse not yet reported through `update`
    navigated: Option<usize>,
}

impl FadeViewer {
    pub const DEFAULT_FADE: f32 = 0.4;

    pub fn new(project_count: usize) -> Self {
        Self::with_fade(project_count, Self::DEFAULT_FADE)
    }

    pub fn with_fade(project_count: usize, fade_duration: f32) -> Self {
        Self {
            fade_duration,
            project_count,
            current_index: 0,
            phase: FadePhase::Idle,
            anchor: None,
            navigated: None,
        }
    }

    /// Browse to a neighbouring project while showing. Out-of-range moves are ignored.
    pub fn navigate(&mut self, delta: i32) -> bool {
        if self.phase != FadePhase::Showing {
            return false;
        }
        let Some(next) = self.current_index.checked_add_signed(delta as isize) else {
            return false;
        };
        if next >= self.project_count {
            return false;
        }
        self.current_index = next;
        self.navigated = Some(next);
        debug!("viewer navigated to project {next}");
        true
    }

    pub fn anchor(&self) -> Option<ViewerAnchor> {
        self.anchor
    }
}

impl Viewer for FadeViewer {
    fn enter(&mut self, anchor: ViewerAnchor) {
        self.current_index = anchor.project_index;
        self.anchor = Some(anchor);
        self.navigated = None;
        self.phase = FadePhase::EnterFadeOut { elapsed: 0.0 };
    }

    fn exit(&mut self) {
        if matches!(self.phase, FadePhase::Idle | FadePhase::ExitFadeIn { .. }) {
            return;
        }
        self.navigated = None;
        self.phase = FadePhase::ExitFadeOut { elapsed: 0.0 };
    }

    fn is_active(&self) -> bool {
        matches!(self.phase, FadePhase::EnterFadeOut { .. } | FadePhase::Showing)
    }

    fn is_transitioning(&self) -> bool {
        matches!(
            self.phase,
            FadePhase::EnterFadeOut { .. } | FadePhase::ExitFadeOut { .. } | FadePhase::ExitFadeIn { .. }
        )
    }

    fn current_index(&self) -> usize {
        self.current_index
    }

    fn update(&mut self, dt: f32) -> Option<ViewerSignal> {
        match self.phase {
            FadePhase::EnterFadeOut { elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed >= self.fade_duration {
                    self.phase = FadePhase::Showing;
                    return Some(ViewerSignal::EnterReady);
                }
                self.phase = FadePhase::EnterFadeOut { elapsed };
            }
            FadePhase::ExitFadeOut { elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed >= self.fade_duration {
                    self.phase = FadePhase::ExitFadeIn { elapsed: 0.0 };
                    self.anchor = None;
                    return Some(ViewerSignal::ExitReady);
                }
                self.phase = FadePhase::ExitFadeOut { elapsed };
            }
            FadePhase::ExitFadeIn { elapsed } => {
                let elapsed = elapsed + dt;
                self.phase = if elapsed >= self.fade_duration {
                    FadePhase::Idle
                } else {
                    FadePhase::ExitFadeIn { elapsed }
                };
            }
            FadePhase::Showing => return self.navigated.take().map(ViewerSignal::Navigated),
            FadePhase::Idle => {}
        }
        None
    }
}

// =============================================================================
// Collection popup
// =============================================================================

/// Modal grid popup opened from a trophy.
pub trait CollectionPopup {
    fn open(&mut self, category: CollectionCategory);
    fn close(&mut self);
    fn is_open(&self) -> bool;
}

/// Headless popup that tracks the open category and selection.
#[derive(Debug, Clone, Default)]
pub struct CollectionPopupState {
    collections: Collections,
    open: Option<CollectionCategory>,
    selected: usize,
}

impl CollectionPopupState {
    pub fn new(collections: Collections) -> Self {
        Self {
            collections,
            open: None,
            selected: 0,
        }
    }

    pub fn category(&self) -> Option<CollectionCategory> {
        self.open
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Select an item of the open collection. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        let len = self
            .open
            .and_then(|c| self.collections.get(&c))
            .map_or(0, |c| c.items.len());
        if index < len {
            self.selected = index;
            true
        } else {
            false
        }
    }
}

impl CollectionPopup for CollectionPopupState {
    fn open(&mut self, category: CollectionCategory) {
        let Some(collection) = self.collections.get(&category) else {
            debug!("no collection for {}; popup stays closed", category.key());
            return;
        };
        info!(
            "collection popup: {} ({} items)",
            collection.title,
            collection.items.len()
        );
        self.open = Some(category);
        self.selected = 0;
    }

    fn close(&mut self) {
        self.open = None;
    }

    fn is_open(&self) -> bool {
        self.open.is_some()
    }
}

// =============================================================================
// Host bridge
// =============================================================================

/// Scene names reported to the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneName {
    Ground,
    Viewer,
}

impl fmt::Display for SceneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SceneName::Ground => "ground",
            SceneName::Viewer => "viewer",
        })
    }
}

/// Fire-and-forget notifications for the embedding page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// `hash` is the project's deep-link hash, or its id when it has none
    ProjectEntered { id: String, hash: String },
    ProjectExited,
    SceneChanged(SceneName),
}

impl HostEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            HostEvent::ProjectEntered { .. } => "projectEntered",
            HostEvent::ProjectExited => "projectExited",
            HostEvent::SceneChanged(_) => "sceneChanged",
        }
    }
}

/// Delivery channel to the host page. Failures are never retried.
pub trait HostBridge {
    fn notify(&mut self, event: HostEvent) -> Result<(), BridgeError>;
}

/// Bridge that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogBridge;

impl HostBridge for LogBridge {
    fn notify(&mut self, event: HostEvent) -> Result<(), BridgeError> {
        info!("host <- {event:?}");
        Ok(())
    }
}
