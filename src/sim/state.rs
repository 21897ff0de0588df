//! Game session state
//!
//! Everything one run needs lives here: counters and flags, the player, the
//! scrolling terrain and slots, the shared pattern libraries and pending
//! session timers. Seeded so a run replays exactly from its seed and inputs.

use std::sync::Arc;

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::animation::Clip;
use super::patterns::{CoinLibrary, LibraryError, ObstacleLibrary, standard_coins, standard_obstacles};
use super::player::{ActionState, Player};
use super::recycle::Terrain;
use super::slots::{CoinSlot, ObstacleSlots};
use super::timers::{Task, Timers};
use crate::tuning::Tuning;

/// Things collaborators outside the simulation react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged(u64),
    CoinsChanged(u32),
    Paused,
    Resumed,
    /// Grace period over; obstacles and coins start spawning
    HeadStart,
    GameOver { score: u64, coins: u32 },
    /// Summary shown and player hidden, some time after game over
    GameOverRevealed { score: u64, coins: u32 },
    Restarted,
    ObstacleRecycled { slot: usize, pattern: usize },
    CoinGroupRecycled { pattern: usize },
    TerrainRecycled { segment: usize },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub(crate) rng: Pcg32,
    /// Distance-based score
    pub score: u64,
    /// Coins collected this run
    pub coins: u32,
    /// Scroll speed (units per second); zero once the run is over
    pub speed: f32,
    pub paused: bool,
    pub game_over: bool,
    /// True once the grace period after (re)start has elapsed
    pub head_start: bool,
    /// Simulated seconds (paused time excluded)
    pub time: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub terrain: Terrain,
    pub obstacles: ObstacleSlots,
    pub coin_slot: CoinSlot,
    pub obstacle_library: Arc<ObstacleLibrary>,
    pub coin_library: Arc<CoinLibrary>,
    pub timers: Timers,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// New session with the built-in catalogs and default balance
    pub fn new(seed: u64) -> Result<Self, LibraryError> {
        Ok(Self::with_config(
            seed,
            Tuning::default(),
            Arc::new(standard_obstacles()?),
            Arc::new(standard_coins()?),
        ))
    }

    /// New session from explicit balance and (already validated) libraries
    pub fn with_config(
        seed: u64,
        tuning: Tuning,
        obstacle_library: Arc<ObstacleLibrary>,
        coin_library: Arc<CoinLibrary>,
    ) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let obstacles = ObstacleSlots::new(&obstacle_library, &mut rng);
        let coin_slot = CoinSlot::new(&coin_library, &mut rng);

        let mut timers = Timers::new();
        timers.schedule(Task::HeadStart, tuning.head_start_delay);

        log::info!("Session started (seed {seed})");

        Self {
            seed,
            rng,
            score: 0,
            coins: 0,
            speed: tuning.initial_speed,
            paused: false,
            game_over: false,
            head_start: false,
            time: 0.0,
            time_ticks: 0,
            player: Player::new(tuning.clips),
            terrain: Terrain::new(tuning.terrain_extent),
            obstacles,
            coin_slot,
            obstacle_library,
            coin_library,
            timers,
            events: Vec::new(),
            tuning,
        }
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Serializable view for a renderer
    pub fn snapshot(&self) -> Snapshot {
        let obstacles = self.obstacles.slots.map(|slot| SlotView {
            pattern: self
                .obstacle_library
                .get(slot.pattern)
                .map(|p| p.name.clone())
                .unwrap_or_default(),
            position: slot.position,
            rotation_x: slot.rotation_x,
            visible: slot.visible,
        });

        let pickups = self
            .coin_library
            .get(self.coin_slot.pattern)
            .map(|p| p.pickups.len())
            .unwrap_or(0);
        let coin_group = CoinGroupView {
            pattern: self
                .coin_library
                .get(self.coin_slot.pattern)
                .map(|p| p.name.clone())
                .unwrap_or_default(),
            position: self.coin_slot.position,
            visible: self.coin_slot.visible,
            pickups_visible: (0..pickups).map(|i| self.coin_slot.pickup_visible(i)).collect(),
        };

        Snapshot {
            score: self.score,
            coins: self.coins,
            speed: self.speed,
            paused: self.paused,
            game_over: self.game_over,
            head_start: self.head_start,
            player: PlayerView {
                position: self.player.position,
                facing: self.player.facing,
                visible: self.player.visible,
                state: self.player.state(),
                clip: self.player.animator.current(),
                fading_out: self.player.animator.fading_out(),
                weight: self.player.animator.weight(),
                root_motion_stripped: self.player.animator.current().strips_root_motion()
                    || self.player.animator.fading_out().is_some_and(Clip::strips_root_motion),
            },
            terrain: self.terrain.segments.map(|s| s.position.z),
            obstacles,
            coin_group,
        }
    }
}

/// Player transform and animation blend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Vec3,
    pub facing: f32,
    pub visible: bool,
    pub state: ActionState,
    pub clip: Clip,
    pub fading_out: Option<Clip>,
    /// Blend weight of `clip`
    pub weight: f32,
    /// A blended clip plays in place; the renderer must not apply its
    /// root translation
    pub root_motion_stripped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotView {
    pub pattern: String,
    pub position: Vec3,
    pub rotation_x: f32,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinGroupView {
    pub pattern: String,
    pub position: Vec3,
    pub visible: bool,
    pub pickups_visible: Vec<bool>,
}

/// Everything a renderer or HUD needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub score: u64,
    pub coins: u32,
    pub speed: f32,
    pub paused: bool,
    pub game_over: bool,
    pub head_start: bool,
    pub player: PlayerView,
    /// Travel-axis position of each terrain segment
    pub terrain: [f32; 2],
    pub obstacles: [SlotView; 2],
    pub coin_group: CoinGroupView,
}
