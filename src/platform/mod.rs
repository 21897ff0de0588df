//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (frame deltas from a stoppable clock)
//! - Input events (key names to commands)
//! - Storage (LocalStorage on web, JSON file natively)
//! - Logger installation

pub mod input;
pub mod storage;
pub mod time;

pub use input::{InputRouter, Key};
pub use storage::{MemoryStore, StorageError, Store};
pub use time::{ManualClock, SystemClock, TimingSource};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

/// Install the platform logger. Call once from the binary entry point.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    if let Err(e) = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init() {
        log::debug!("Logger already initialized: {e}");
    }
}

/// Install the platform logger. Call once from the binary entry point.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("Logger already initialized");
    }
}
