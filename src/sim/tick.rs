//! Per-frame simulation tick
//!
//! Order within one tick: commands, session timers, player animation and
//! tweens, scrolling, collisions, then score and speed. Collisions and
//! scoring both read post-scroll positions.

use serde::{Deserialize, Serialize};

use super::collision::{collect_coins, hazard_hits};
use super::state::{GameEvent, GameState};
use super::timers::Task;
use crate::consts::*;

/// Discrete player/session commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    MoveLeft,
    MoveRight,
    Jump,
    Slide,
    TogglePause,
    Restart,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Applied in order before anything advances
    pub commands: Vec<Command>,
}

impl TickInput {
    pub fn with(command: Command) -> Self {
        Self {
            commands: vec![command],
        }
    }
}

/// Advance the session by `dt` seconds of frame time
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    for &command in &input.commands {
        apply_command(state, command);
    }

    // Pause freezes motions and timers along with scrolling
    let dt = if state.paused { 0.0 } else { dt.max(0.0) };
    state.time_ticks += 1;
    state.time += dt;

    for task in state.timers.advance(dt) {
        match task {
            Task::HeadStart => {
                state.head_start = true;
                log::info!("Head start over at {:.2}s", state.time);
                state.emit(GameEvent::HeadStart);
            }
            Task::GameOverReveal => {
                state.player.visible = false;
                let (score, coins) = (state.score, state.coins);
                state.emit(GameEvent::GameOverRevealed { score, coins });
            }
        }
    }

    for event in state.player.advance(dt, &state.tuning) {
        log::debug!("Player: {event:?}");
    }

    let distance = state.speed * dt;
    if let Some(segment) = state.terrain.advance(distance) {
        state.emit(GameEvent::TerrainRecycled { segment });
    }

    if state.head_start {
        let recycled = state
            .obstacles
            .advance(distance, &state.obstacle_library, &mut state.rng);
        for (slot, pattern) in recycled.into_iter().enumerate() {
            if let Some(pattern) = pattern {
                state.emit(GameEvent::ObstacleRecycled { slot, pattern });
            }
        }

        let coin_distance = distance * state.tuning.coin_speed_factor;
        if let Some(pattern) = state
            .coin_slot
            .advance(coin_distance, &state.coin_library, &mut state.rng)
        {
            state.emit(GameEvent::CoinGroupRecycled { pattern });
        }
    }

    resolve_collisions(state);

    if !state.paused && !state.game_over {
        let gained = (state.speed * dt).round() as u64;
        if gained > 0 {
            state.score += gained;
            state.emit(GameEvent::ScoreChanged(state.score));
        }
        if state.speed < state.tuning.max_speed {
            state.speed = (state.speed + state.tuning.speed_ramp).min(state.tuning.max_speed);
        }
    }
}

fn apply_command(state: &mut GameState, command: Command) {
    match command {
        Command::TogglePause => {
            toggle_pause(state);
        }
        Command::Restart => {
            if state.game_over || state.paused {
                restart(state);
            }
        }
        _ if state.paused || state.game_over => {
            log::debug!("Ignoring {command:?} while inactive");
        }
        Command::MoveLeft => state.player.move_left(&state.tuning),
        Command::MoveRight => state.player.move_right(&state.tuning),
        Command::Jump => {
            state.player.jump(&state.tuning);
        }
        Command::Slide => {
            state.player.slide(&state.tuning);
        }
    }
}

/// Hazards first: a coin touched on the tick the run ends does not count
fn resolve_collisions(state: &mut GameState) {
    let collider = state.player.collider();

    for hit in hazard_hits(&collider, &state.obstacles, &state.obstacle_library) {
        if game_over(state) {
            log::debug!("Hit hazard {} of slot {}", hit.shape, hit.slot + 1);
        }
    }

    let collected = collect_coins(&collider, &mut state.coin_slot, &state.coin_library);
    if !collected.is_empty() && !state.paused && !state.game_over {
        state.coins += collected.len() as u32;
        state.emit(GameEvent::CoinsChanged(state.coins));
    }
}

/// Toggle pause. Ignored once the run is over. Returns true if toggled.
pub fn toggle_pause(state: &mut GameState) -> bool {
    if state.game_over {
        return false;
    }
    state.paused = !state.paused;
    if state.paused {
        log::info!("Paused (score {}, coins {})", state.score, state.coins);
        state.emit(GameEvent::Paused);
    } else {
        log::info!("Resumed");
        state.emit(GameEvent::Resumed);
    }
    true
}

/// End the run. Idempotent; returns true only on the transition.
pub fn game_over(state: &mut GameState) -> bool {
    if state.game_over {
        return false;
    }
    state.game_over = true;
    state.speed = 0.0;
    state.head_start = false;
    state.timers.cancel_task(Task::HeadStart);
    state.obstacles.nudge(-GAME_OVER_NUDGE);
    state.player.stumble(&state.tuning);
    state
        .timers
        .schedule(Task::GameOverReveal, state.tuning.game_over_reveal_delay);

    let (score, coins) = (state.score, state.coins);
    log::info!("Game over: score {score}, coins {coins}");
    state.emit(GameEvent::GameOver { score, coins });
    true
}

/// Start a fresh run in the same session
pub fn restart(state: &mut GameState) {
    state.timers.cancel_task(Task::GameOverReveal);
    state.obstacles.reset(RESTART_OBSTACLE_Z);
    state.coin_slot.reset(RESTART_COIN_Z);

    state.speed = state.tuning.initial_speed;
    state.score = 0;
    state.coins = 0;
    state.paused = false;
    state.game_over = false;
    state.head_start = false;
    state.player.reset();
    state
        .timers
        .schedule(Task::HeadStart, state.tuning.head_start_delay);

    log::info!("Restarted");
    state.emit(GameEvent::Restarted);
}
