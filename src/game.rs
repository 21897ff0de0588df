//! Frame harness
//!
//! Owns the clock, the store and the HUD around one `GameState`. Each frame
//! reads the clock, ticks the simulation and forwards the resulting events
//! to the collaborators.

use crate::persistence::Records;
use crate::platform::input::InputRouter;
use crate::platform::storage::Store;
use crate::platform::time::TimingSource;
use crate::sim::{Command, GameEvent, GameState, TickInput, tick};
use crate::ui::Hud;

pub struct Game<C: TimingSource, S: Store, H: Hud> {
    pub state: GameState,
    clock: C,
    store: S,
    hud: H,
    records: Records,
    /// Coins of the current run already added to the lifetime total
    banked_coins: u32,
    pending: Vec<Command>,
}

impl<C: TimingSource, S: Store, H: Hud> Game<C, S, H> {
    /// Load records, reset the HUD and start the clock
    pub fn new(state: GameState, mut clock: C, store: S, mut hud: H) -> Self {
        let records = Records::load(&store);
        hud.set_score(&state.score.to_string());
        hud.set_coins(&state.coins.to_string());
        hud.set_pause_overlay(false);
        hud.set_pause_control(true);
        hud.hide_game_over();
        clock.start();

        Self {
            state,
            clock,
            store,
            hud,
            records,
            banked_coins: 0,
            pending: Vec::new(),
        }
    }

    pub fn records(&self) -> Records {
        self.records
    }

    pub fn hud(&self) -> &H {
        &self.hud
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Queue a command for the next frame. Returns false if the router
    /// dropped it.
    pub fn queue(&mut self, command: Command) -> bool {
        match InputRouter::route(command, self.state.paused, self.state.game_over) {
            Some(command) => {
                self.pending.push(command);
                true
            }
            None => false,
        }
    }

    /// Queue the command bound to a DOM key name, if any
    pub fn handle_key(&mut self, code: &str) -> bool {
        match InputRouter::key(code, self.state.paused, self.state.game_over) {
            Some(command) => {
                self.pending.push(command);
                true
            }
            None => false,
        }
    }

    /// Run one frame; returns the events it produced
    pub fn frame(&mut self) -> Vec<GameEvent> {
        let dt = self.clock.elapsed().min(self.state.tuning.max_frame_delta);
        let input = TickInput {
            commands: std::mem::take(&mut self.pending),
        };
        tick(&mut self.state, &input, dt);

        let events = self.state.drain_events();
        for &event in &events {
            self.dispatch(event);
        }
        events
    }

    fn dispatch(&mut self, event: GameEvent) {
        match event {
            GameEvent::ScoreChanged(score) => self.hud.set_score(&score.to_string()),
            GameEvent::CoinsChanged(coins) => self.hud.set_coins(&coins.to_string()),
            GameEvent::Paused => {
                self.clock.stop();
                self.hud.set_pause_overlay(true);
                self.persist();
            }
            GameEvent::Resumed => {
                self.clock.start();
                self.hud.set_pause_overlay(false);
                self.persist();
            }
            GameEvent::GameOver { .. } => {
                self.hud.set_pause_control(false);
                self.persist();
            }
            GameEvent::GameOverRevealed { score, coins } => {
                self.clock.stop();
                self.hud.show_game_over(score, coins);
            }
            GameEvent::Restarted => {
                self.banked_coins = 0;
                self.clock.start();
                self.hud.hide_game_over();
                self.hud.set_pause_overlay(false);
                self.hud.set_pause_control(true);
                self.hud.set_score("0");
                self.hud.set_coins("0");
            }
            GameEvent::HeadStart
            | GameEvent::ObstacleRecycled { .. }
            | GameEvent::CoinGroupRecycled { .. }
            | GameEvent::TerrainRecycled { .. } => {}
        }
    }

    /// Best-effort write of the high score and newly earned coins
    fn persist(&mut self) {
        if let Err(e) = self.records.save_high_score(&mut self.store, self.state.score) {
            log::warn!("Could not save high score: {e}");
        }

        let delta = self.state.coins.saturating_sub(self.banked_coins);
        match self.records.bank_coins(&mut self.store, u64::from(delta)) {
            Ok(()) => self.banked_coins = self.state.coins,
            Err(e) => log::warn!("Could not save coin total: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{HIGH_SCORE_KEY, TOTAL_COINS_KEY};
    use crate::platform::storage::{MemoryStore, StorageError};
    use crate::platform::time::ManualClock;
    use crate::ui::HudState;

    fn game() -> Game<ManualClock, MemoryStore, HudState> {
        Game::new(
            GameState::new(2024).unwrap(),
            ManualClock::new(1.0 / 60.0),
            MemoryStore::new(),
            HudState::default(),
        )
    }

    #[test]
    fn test_frames_update_hud() {
        let mut game = game();
        assert!(game.clock().is_running());
        for _ in 0..30 {
            game.frame();
        }
        assert!(game.state.score > 0);
        assert_eq!(game.hud().score, game.state.score.to_string());
    }

    #[test]
    fn test_pause_stops_clock_and_persists_once() {
        let mut game = game();
        for _ in 0..30 {
            game.frame();
        }
        game.state.coins = 5;

        assert!(game.handle_key(" "));
        game.frame();
        assert!(game.state.paused);
        assert!(!game.clock().is_running());
        assert!(game.hud().pause_overlay);
        assert_eq!(game.store().get(HIGH_SCORE_KEY), Some(game.state.score.to_string()));
        assert_eq!(game.store().get(TOTAL_COINS_KEY).as_deref(), Some("5"));

        // Movement is dropped at the router while paused
        assert!(!game.handle_key("ArrowLeft"));
        let score = game.state.score;
        for _ in 0..10 {
            game.frame();
        }
        assert_eq!(game.state.score, score);

        assert!(game.queue(Command::TogglePause));
        game.frame();
        assert!(game.clock().is_running());
        assert!(!game.hud().pause_overlay);
        // Same coins again: nothing new to bank
        assert_eq!(game.records().total_coins, 5);
        assert_eq!(game.store().get(TOTAL_COINS_KEY).as_deref(), Some("5"));
    }

    #[test]
    fn test_game_over_reveal_and_restart() {
        let mut game = game();
        for _ in 0..30 {
            game.frame();
        }
        crate::sim::game_over(&mut game.state);
        game.frame();
        assert!(!game.hud().pause_control);
        assert_eq!(game.records().high_score, game.state.score);

        let mut revealed = false;
        for _ in 0..200 {
            if game
                .frame()
                .iter()
                .any(|e| matches!(e, GameEvent::GameOverRevealed { .. }))
            {
                revealed = true;
                break;
            }
        }
        assert!(revealed);
        assert!(!game.clock().is_running());
        assert_eq!(game.hud().game_over, Some((game.state.score, 0)));

        assert!(game.handle_key("Enter"));
        game.frame();
        assert!(!game.state.game_over);
        assert!(game.clock().is_running());
        assert_eq!(game.hud().game_over, None);
        assert!(game.hud().pause_control);
        assert_eq!(game.hud().coins, "0");
    }

    /// Every write fails, nothing is ever stored
    struct FailingStore;

    impl Store for FailingStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    #[test]
    fn test_storage_failures_never_stall_the_run() {
        let mut game = Game::new(
            GameState::new(77).unwrap(),
            ManualClock::new(1.0 / 60.0),
            FailingStore,
            HudState::default(),
        );
        for _ in 0..30 {
            game.frame();
        }
        game.state.coins = 2;

        assert!(game.queue(Command::TogglePause));
        game.frame();
        assert!(game.state.paused);
        assert!(game.hud().pause_overlay);
        assert_eq!(game.records().high_score, 0);
        assert_eq!(game.records().total_coins, 0);

        assert!(game.queue(Command::TogglePause));
        game.frame();
        assert!(!game.state.paused);
        assert!(game.clock().is_running());

        let score = game.state.score;
        for _ in 0..30 {
            game.frame();
        }
        assert!(game.state.score > score);
        assert_eq!(game.hud().score, game.state.score.to_string());

        crate::sim::game_over(&mut game.state);
        game.frame();
        assert!(game.state.game_over);
        assert!(!game.hud().pause_control);
        assert_eq!(game.records().high_score, 0);

        let revealed = (0..200).any(|_| {
            game.frame()
                .iter()
                .any(|e| matches!(e, GameEvent::GameOverRevealed { .. }))
        });
        assert!(revealed);
        assert_eq!(game.hud().game_over, Some((game.state.score, 2)));
    }
}
