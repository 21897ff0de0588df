//! HUD sink
//!
//! The core pushes display values and panel visibility here and never reads
//! anything back.

/// Presentation collaborator
pub trait Hud {
    fn set_score(&mut self, score: &str);
    fn set_coins(&mut self, coins: &str);
    fn set_pause_overlay(&mut self, visible: bool);
    /// The on-screen pause button
    fn set_pause_control(&mut self, visible: bool);
    fn show_game_over(&mut self, score: u64, coins: u32);
    fn hide_game_over(&mut self);
}

/// Remembers the last value of everything pushed to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudState {
    pub score: String,
    pub coins: String,
    pub pause_overlay: bool,
    pub pause_control: bool,
    /// Final (score, coins) while the summary is shown
    pub game_over: Option<(u64, u32)>,
}

impl Default for HudState {
    fn default() -> Self {
        Self {
            score: "0".to_string(),
            coins: "0".to_string(),
            pause_overlay: false,
            pause_control: true,
            game_over: None,
        }
    }
}

impl Hud for HudState {
    fn set_score(&mut self, score: &str) {
        self.score = score.to_string();
    }

    fn set_coins(&mut self, coins: &str) {
        self.coins = coins.to_string();
    }

    fn set_pause_overlay(&mut self, visible: bool) {
        self.pause_overlay = visible;
    }

    fn set_pause_control(&mut self, visible: bool) {
        self.pause_control = visible;
    }

    fn show_game_over(&mut self, score: u64, coins: u32) {
        self.game_over = Some((score, coins));
    }

    fn hide_game_over(&mut self) {
        self.game_over = None;
    }
}
