//! Input routing
//!
//! Maps key names to commands and drops movement while the run is paused or
//! over. `TogglePause` always gets through; `Restart` only while there is
//! something to restart from.

use crate::sim::Command;

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    Enter,
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            "ArrowUp" | "w" | "W" => Some(Key::Up),
            "ArrowDown" | "s" | "S" => Some(Key::Down),
            " " | "Spacebar" => Some(Key::Space),
            "Enter" => Some(Key::Enter),
            _ => None,
        }
    }

    pub fn command(self) -> Command {
        match self {
            Key::Left => Command::MoveLeft,
            Key::Right => Command::MoveRight,
            Key::Up => Command::Jump,
            Key::Down => Command::Slide,
            Key::Space => Command::TogglePause,
            Key::Enter => Command::Restart,
        }
    }
}

/// Gatekeeper between raw input and the simulation
#[derive(Debug, Clone, Copy, Default)]
pub struct InputRouter;

impl InputRouter {
    /// Whether `command` may reach the core in the given session state
    pub fn route(command: Command, paused: bool, game_over: bool) -> Option<Command> {
        let deliver = match command {
            Command::TogglePause => true,
            Command::Restart => paused || game_over,
            _ => !paused && !game_over,
        };
        deliver.then_some(command)
    }

    /// Parse and route a key name in one step
    pub fn key(code: &str, paused: bool, game_over: bool) -> Option<Command> {
        Key::from_code(code).and_then(|key| Self::route(key.command(), paused, game_over))
    }
}
