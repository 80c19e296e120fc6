//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Floors kept in level order
//! - No rendering or platform dependencies

pub mod arc;
pub mod ball;
pub mod collision;
pub mod floor;
pub mod layout;
pub mod slice;
pub mod stage;
pub mod state;
pub mod tick;
pub mod tower;

pub use arc::ArcSegment;
pub use ball::{Ball, BallState};
pub use collision::{ColliderKind, ColliderTag, ColliderTags, Outcome, Resolution, outcome_for, resolve};
pub use floor::Floor;
pub use layout::{SliceLayout, TemplateGroup, derive, reference_template, tile};
pub use slice::{Slice, SliceKind, SliceSpec};
pub use stage::Stage;
pub use state::{GameEvent, GameState};
pub use tick::{TickInput, rotation_for_pan, tick};
pub use tower::{ScoreUpdate, Tower, TowerStats};
