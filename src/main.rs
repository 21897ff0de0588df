//! Cave Runner entry point
//!
//! Native builds run a headless demo: the autopilot plays at 60 fps on a
//! manual clock for a number of simulated seconds, restarting after every
//! game over, then logs a summary.
//!
//! Usage: `cave-runner [seed] [seconds]`
//! - `CAVE_RUNNER_SAVE`: JSON file for high score / coin records
//! - `CAVE_RUNNER_TUNING`: JSON balance overrides

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    cave_runner::platform::init_logging();
    if let Err(e) = native::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::sync::Arc;
    use std::time::{SystemTime, UNIX_EPOCH};

    use cave_runner::platform::{JsonFileStore, ManualClock, MemoryStore, Store};
    use cave_runner::sim::{GameEvent, GameState, autopilot, standard_coins, standard_obstacles};
    use cave_runner::ui::HudState;
    use cave_runner::{Game, Tuning};

    const FRAME: f32 = 1.0 / 60.0;

    pub fn run() -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args().skip(1);
        let seed = match args.next() {
            Some(arg) => arg.parse::<u64>()?,
            None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos() as u64,
        };
        let seconds = match args.next() {
            Some(arg) => arg.parse::<f32>()?,
            None => 60.0,
        };

        let tuning = match std::env::var("CAVE_RUNNER_TUNING") {
            Ok(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
            Err(_) => Tuning::default(),
        };
        let store: Box<dyn Store> = match std::env::var("CAVE_RUNNER_SAVE") {
            Ok(path) => Box::new(JsonFileStore::open(path)?),
            Err(_) => Box::new(MemoryStore::new()),
        };

        log::info!("Cave Runner (native) starting: seed {seed}, {seconds}s simulated");

        let state = GameState::with_config(
            seed,
            tuning,
            Arc::new(standard_obstacles()?),
            Arc::new(standard_coins()?),
        );
        let mut game = Game::new(state, ManualClock::new(FRAME), store, HudState::default());

        let frames = (seconds / FRAME).round() as u64;
        let mut runs = 1u32;
        let mut best = 0u64;
        for _ in 0..frames {
            if let Some(command) = autopilot::decide(&game.state) {
                game.queue(command);
            }
            for event in game.frame() {
                if let GameEvent::GameOverRevealed { score, coins } = event {
                    log::info!("Run {runs}: score {score}, coins {coins}");
                    best = best.max(score);
                    runs += 1;
                    game.queue(cave_runner::sim::Command::Restart);
                }
            }
        }
        best = best.max(game.state.score);

        let records = game.records();
        log::info!(
            "Done: {} run(s), best {best}, high score {}, lifetime coins {}",
            runs,
            records.high_score,
            records.total_coins
        );
        println!("{}", serde_json::to_string_pretty(&game.state.snapshot())?);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web build embeds the library; the host page drives `Game::frame`
}
