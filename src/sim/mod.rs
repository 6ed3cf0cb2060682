//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed tick per call, no wall clock
//! - Stable iteration order (by pool index)
//! - No rendering or platform dependencies

pub mod collision;
pub mod formation;
pub mod shots;
pub mod state;
pub mod tick;
pub mod timers;

pub use collision::{overlaps, sprites_overlap};
pub use formation::{Direction, Formation, FormationMove};
pub use state::{ENEMY_RANGE, EntityPool, Frame, GamePhase, GameState, Sprite, SpriteId};
pub use tick::{TickInput, demo_input, tick};
pub use timers::{TimerAction, TimerSlot, Timers};
