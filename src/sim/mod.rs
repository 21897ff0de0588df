//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through the `dt` handed to `tick`
//! - Seeded RNG only
//! - Stable iteration order (slot index, shape index)
//! - No rendering or platform dependencies

pub mod animation;
pub mod autopilot;
pub mod bounds;
pub mod collision;
pub mod motion;
pub mod patterns;
pub mod player;
pub mod recycle;
pub mod slots;
pub mod state;
pub mod tick;
pub mod timers;

pub use animation::{Animator, Clip, ClipLengths, LoopMode};
pub use bounds::Aabb;
pub use collision::{HazardHit, collect_coins, hazard_hits, shape_bounds};
pub use patterns::{
    CoinLibrary, CoinPattern, LibraryError, Maneuver, ObstacleLibrary, ObstaclePattern, PatternLibrary, ShapeKind,
    ShapeTemplate, standard_coins, standard_obstacles,
};
pub use player::{ActionState, Player, PlayerEvent};
pub use recycle::{Placeable, Terrain, TerrainSegment};
pub use slots::{CoinSlot, ObstacleSlot, ObstacleSlots};
pub use state::{GameEvent, GameState, Snapshot};
pub use tick::{Command, TickInput, game_over, restart, tick, toggle_pause};
pub use timers::{Task, Timers};
