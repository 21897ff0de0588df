//! Data-driven game balance
//!
//! Every timing and speed constant the simulation uses. Loaded from JSON on
//! top of the defaults, so a balance file only needs the fields it changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::animation::ClipLengths;

/// Balance values for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Scroll speed at start/restart (units per second)
    pub initial_speed: f32,
    /// Speed never ramps past this
    pub max_speed: f32,
    /// Added to the speed every live tick
    pub speed_ramp: f32,
    /// Coins scroll at this fraction of the obstacle speed
    pub coin_speed_factor: f32,

    /// Seconds after (re)start before obstacles and coins spawn
    pub head_start_delay: f32,
    /// Seconds between game over and the summary reveal
    pub game_over_reveal_delay: f32,

    /// Lane change duration (seconds)
    pub lane_change_duration: f32,
    /// Jump apex above ground
    pub jump_height: f32,
    /// Upward half of the jump arc (seconds)
    pub jump_rise_duration: f32,
    /// Downward half of the jump arc (seconds)
    pub jump_fall_duration: f32,
    /// Cross-fade from the jump clip back to running
    pub jump_fade: f32,

    /// How long a slide keeps the player lowered (seconds)
    pub slide_duration: f32,
    /// How far a slide lowers the player
    pub slide_drop: f32,
    /// Cross-fade from the slide clip back to running
    pub slide_fade: f32,

    /// Cross-fade into the stumble clip
    pub stumble_fade: f32,

    /// Measured length of one terrain segment along the travel axis
    pub terrain_extent: f32,
    /// Largest frame delta the harness feeds the simulation
    pub max_frame_delta: f32,

    /// Clip lengths reported by the animation provider
    pub clips: ClipLengths,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_speed: 100.0,
            max_speed: 200.0,
            speed_ramp: 0.01,
            coin_speed_factor: 0.8,

            head_start_delay: 3.0,
            game_over_reveal_delay: 3.0,

            lane_change_duration: 0.2,
            jump_height: 20.0,
            jump_rise_duration: 0.4,
            jump_fall_duration: 0.5,
            jump_fade: 0.1,

            slide_duration: 0.8,
            slide_drop: 5.0,
            slide_fade: 1.9,

            stumble_fade: 0.1,

            terrain_extent: 1001.0,
            max_frame_delta: 0.1,

            clips: ClipLengths::default(),
        }
    }
}

/// Why a tuning file was rejected
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(&'static str),
}

impl Tuning {
    /// Parse a (possibly partial) JSON balance file and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.initial_speed > 0.0) {
            return Err(TuningError::Invalid("initial_speed must be positive"));
        }
        if self.max_speed < self.initial_speed {
            return Err(TuningError::Invalid("max_speed below initial_speed"));
        }
        if self.speed_ramp < 0.0 {
            return Err(TuningError::Invalid("speed_ramp must not be negative"));
        }
        if !(self.coin_speed_factor > 0.0) {
            return Err(TuningError::Invalid("coin_speed_factor must be positive"));
        }
        let durations = [
            self.lane_change_duration,
            self.jump_rise_duration,
            self.jump_fall_duration,
            self.slide_duration,
        ];
        if durations.iter().any(|d| !(*d > 0.0)) {
            return Err(TuningError::Invalid("motion durations must be positive"));
        }
        if self.head_start_delay < 0.0 || self.game_over_reveal_delay < 0.0 {
            return Err(TuningError::Invalid("delays must not be negative"));
        }
        if self.jump_fade < 0.0 || self.slide_fade < 0.0 || self.stumble_fade < 0.0 {
            return Err(TuningError::Invalid("fades must not be negative"));
        }
        if self.terrain_extent <= crate::consts::TERRAIN_SEAM {
            return Err(TuningError::Invalid("terrain_extent too small"));
        }
        if !(self.max_frame_delta > 0.0) {
            return Err(TuningError::Invalid("max_frame_delta must be positive"));
        }
        self.clips.validate().map_err(TuningError::Invalid)
    }
}
