//! High score and lifetime coin records
//!
//! Stored as plain numeric strings under fixed keys. Unreadable values count
//! as absent. Coins are banked as increments so writing the same session
//! twice never counts its coins twice.

use serde::{Deserialize, Serialize};

use crate::platform::storage::{StorageError, Store};

pub const HIGH_SCORE_KEY: &str = "high-score";
pub const TOTAL_COINS_KEY: &str = "total-coins";

/// Records carried across sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Records {
    pub high_score: u64,
    pub total_coins: u64,
}

fn read_number<S: Store + ?Sized>(store: &S, key: &str) -> u64 {
    match store.get(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring unreadable {key} value {raw:?}");
            0
        }),
        None => 0,
    }
}

impl Records {
    pub fn load<S: Store + ?Sized>(store: &S) -> Self {
        let records = Self {
            high_score: read_number(store, HIGH_SCORE_KEY),
            total_coins: read_number(store, TOTAL_COINS_KEY),
        };
        log::info!(
            "Loaded records: high score {}, total coins {}",
            records.high_score,
            records.total_coins
        );
        records
    }

    /// Write `score` if it beats the stored high score. Returns true if it did.
    pub fn save_high_score<S: Store + ?Sized>(&mut self, store: &mut S, score: u64) -> Result<bool, StorageError> {
        if score <= self.high_score {
            return Ok(false);
        }
        store.set(HIGH_SCORE_KEY, &score.to_string())?;
        self.high_score = score;
        log::info!("New high score {score}");
        Ok(true)
    }

    /// Add `delta` coins to the lifetime total
    pub fn bank_coins<S: Store + ?Sized>(&mut self, store: &mut S, delta: u64) -> Result<(), StorageError> {
        if delta == 0 {
            return Ok(());
        }
        let total = self.total_coins.saturating_add(delta);
        store.set(TOTAL_COINS_KEY, &total.to_string())?;
        self.total_coins = total;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::storage::MemoryStore;

    /// A store whose writes always fail
    struct ReadOnly;

    impl Store for ReadOnly {
        fn get(&self, _key: &str) -> Option<String> {
            Some("17".to_string())
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    #[test]
    fn test_load_defaults_and_garbage() {
        let mut store = MemoryStore::new();
        assert_eq!(Records::load(&store), Records::default());

        store.set(HIGH_SCORE_KEY, "not a number").unwrap();
        store.set(TOTAL_COINS_KEY, " 12 ").unwrap();
        let records = Records::load(&store);
        assert_eq!(records.high_score, 0);
        assert_eq!(records.total_coins, 12);
    }

    #[test]
    fn test_high_score_only_when_beaten() {
        let mut store = MemoryStore::new();
        let mut records = Records::load(&store);
        assert!(records.save_high_score(&mut store, 500).unwrap());
        assert!(!records.save_high_score(&mut store, 400).unwrap());
        assert!(!records.save_high_score(&mut store, 500).unwrap());
        assert_eq!(store.get(HIGH_SCORE_KEY).as_deref(), Some("500"));
        assert_eq!(Records::load(&store).high_score, 500);
    }

    #[test]
    fn test_bank_coins_accumulates() {
        let mut store = MemoryStore::new();
        let mut records = Records::load(&store);
        records.bank_coins(&mut store, 3).unwrap();
        records.bank_coins(&mut store, 0).unwrap();
        records.bank_coins(&mut store, 4).unwrap();
        assert_eq!(store.get(TOTAL_COINS_KEY).as_deref(), Some("7"));
    }

    #[test]
    fn test_failed_write_keeps_records() {
        let mut store = ReadOnly;
        let mut records = Records::load(&store);
        assert_eq!(records.high_score, 17);
        assert_eq!(records.save_high_score(&mut store, 100), Err(StorageError::Unavailable));
        assert_eq!(records.high_score, 17);
        assert!(records.bank_coins(&mut store, 2).is_err());
        assert_eq!(records.total_coins, 17);
    }
}
