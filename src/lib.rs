//! Cave Runner - endless three-lane runner core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player, scrolling slots, collisions, session state)
//! - `platform`: Timing source, persistence stores and input routing
//! - `persistence`: High score / total coin records
//! - `tuning`: Data-driven game balance
//! - `ui`: Display sink the core pushes HUD values into
//! - `game`: Frame harness tying the clock, simulation and collaborators together

pub mod game;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use game::Game;
pub use persistence::Records;
pub use tuning::Tuning;

use glam::Vec3;

/// World geometry constants
///
/// The travel axis is +Z: everything scrolls toward the camera, the player
/// stays at a fixed Z and only moves laterally (X) and vertically (Y).
pub mod consts {
    use glam::Vec3;

    /// Lateral distance between adjacent lanes
    pub const LANE_OFFSET: f32 = 18.0;

    /// Player resting height
    pub const GROUND_Y: f32 = -35.0;
    /// Player travel-axis position (never changes)
    pub const PLAYER_Z: f32 = -110.0;

    /// Facing while running (radians, yaw)
    pub const FACING_FORWARD: f32 = std::f32::consts::PI;
    /// Facing while shifting one lane left
    pub const FACING_LEFT: f32 = -140.0 * (std::f32::consts::PI / 180.0);
    /// Facing while shifting one lane right
    pub const FACING_RIGHT: f32 = 140.0 * (std::f32::consts::PI / 180.0);

    /// Collider center relative to the player origin
    pub const COLLIDER_OFFSET: Vec3 = Vec3::new(0.0, 9.0, 0.0);
    /// Collider half size (5 x 20 x 2 box)
    pub const COLLIDER_HALF_EXTENTS: Vec3 = Vec3::new(2.5, 10.0, 1.0);

    /// Initial position of the first terrain segment
    pub const TERRAIN_START_Z: f32 = -400.0;
    /// A terrain segment past this point is fully behind the camera
    pub const TERRAIN_RECYCLE_Z: f32 = 600.0;
    /// Subtracted from the measured segment length to hide the seam
    pub const TERRAIN_SEAM: f32 = 1.0;

    /// Where a recycled obstacle slot restarts
    pub const OBSTACLE_SPAWN_Z: f32 = -1100.0;
    /// An obstacle slot past this point has reached the player
    pub const OBSTACLE_RECYCLE_Z: f32 = -40.0;
    /// Travel-axis gap between slot one and slot two
    pub const OBSTACLE_SPACING: f32 = 450.0;
    /// Backward nudge applied to both obstacle slots on game over
    pub const GAME_OVER_NUDGE: f32 = 5.0;

    /// Where a recycled coin group restarts
    pub const COIN_SPAWN_Z: f32 = -1200.0;
    /// A coin group past this point is recycled
    pub const COIN_RECYCLE_Z: f32 = 50.0;
    /// Height of the coin group container
    pub const COIN_GROUP_Y: f32 = -20.0;

    /// Obstacle slot positions after a restart
    pub const RESTART_OBSTACLE_Z: [f32; 2] = [-1200.0, -1500.0];
    /// Coin group position after a restart
    pub const RESTART_COIN_Z: f32 = -1800.0;

    /// Travel distance of one radian of oscillation phase
    pub const DRIFT_PERIOD: f32 = 100.0;
    /// Peak lateral drift of an oscillating pattern
    pub const DRIFT_AMPLITUDE: f32 = 18.0;
    /// Peak X rotation of an oscillating pattern (radians)
    pub const WOBBLE_AMPLITUDE: f32 = 0.3;

    /// Upper bound on pickups in one coin pattern
    pub const MAX_PICKUPS: usize = 15;
}

/// Lateral lane the player can occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Lane {
    Left,
    #[default]
    Center,
    Right,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Center, Lane::Right];

    /// Fixed lateral offset of the lane
    pub fn offset(self) -> f32 {
        match self {
            Lane::Left => -consts::LANE_OFFSET,
            Lane::Center => 0.0,
            Lane::Right => consts::LANE_OFFSET,
        }
    }

    /// Adjacent lane to the left (saturating)
    pub fn left(self) -> Lane {
        match self {
            Lane::Left | Lane::Center => Lane::Left,
            Lane::Right => Lane::Center,
        }
    }

    /// Adjacent lane to the right (saturating)
    pub fn right(self) -> Lane {
        match self {
            Lane::Left => Lane::Center,
            Lane::Center | Lane::Right => Lane::Right,
        }
    }
}

/// Shift a position along the travel axis
#[inline]
pub fn advance_z(pos: Vec3, distance: f32) -> Vec3 {
    Vec3::new(pos.x, pos.y, pos.z + distance)
}
