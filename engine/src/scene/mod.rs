//! Scene Module
//!
//! Everything above the character and camera: the interaction mode machine,
//! proximity and the interact button, the room fade, the blob shadow and the
//! session that ties them together each frame.
//!
//! # Example
//!
//! ```rust,ignore
//! use island_portfolio_engine::config::SimConfig;
//! use island_portfolio_engine::input::KeyCode;
//! use island_portfolio_engine::scene::{CollectionPopupState, FadeViewer, LogBridge, PortfolioSession};
//! use island_portfolio_engine::world::Level;
//!
//! let level: Level = load_level();
//! let viewer = FadeViewer::new(level.islands.len());
//! let popup = CollectionPopupState::new(level.collections.clone());
//! let mut session = PortfolioSession::new(SimConfig::default(), level, viewer, popup, LogBridge);
//!
//! session.key_down(KeyCode::ArrowRight);
//! session.frame(1.0 / 60.0);
//! ```

pub mod collaborators;
pub mod mode;
pub mod proximity;
pub mod room;
pub mod scheduler;
pub mod session;
pub mod shadow;

pub use collaborators::{
    CollectionPopup, CollectionPopupState, FadeViewer, HostBridge, HostEvent, LogBridge, SceneName,
    Viewer, ViewerAnchor, ViewerSignal,
};
pub use mode::{Mode, PanelState};
pub use proximity::{Affordance, IslandProximity, nearest_island, nearest_trophy, trophy_anchor};
pub use room::RoomFade;
pub use scheduler::Scheduler;
pub use session::{PortfolioSession, TimedEvent};
pub use shadow::BlobShadow;
