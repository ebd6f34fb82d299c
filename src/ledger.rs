//! Score ledger and its persisted record.
//!
//! Only the two scores are stored; the win streak lives for the session.

use serde::{Deserialize, Serialize};

use crate::adapters::KeyValueStore;
use crate::rules::RoundResult;

/// Cumulative scores plus the current run of consecutive player wins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreLedger {
    pub player: u32,
    pub computer: u32,
    pub streak: u32,
}

/// On-disk shape: `{"player": n, "computer": n}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredScores {
    pub player: u32,
    pub computer: u32,
}

impl ScoreLedger {
    pub fn new(player: u32, computer: u32, streak: u32) -> Self {
        Self {
            player,
            computer,
            streak,
        }
    }

    /// Ledger after one completed round.
    pub fn apply(self, result: RoundResult) -> Self {
        match result {
            RoundResult::PlayerWins => Self {
                player: self.player.saturating_add(1),
                streak: self.streak.saturating_add(1),
                ..self
            },
            RoundResult::ComputerWins => Self {
                computer: self.computer.saturating_add(1),
                streak: 0,
                ..self
            },
            RoundResult::Draw => Self { streak: 0, ..self },
        }
    }

    pub fn snapshot(&self) -> StoredScores {
        StoredScores {
            player: self.player,
            computer: self.computer,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl From<StoredScores> for ScoreLedger {
    fn from(s: StoredScores) -> Self {
        Self::new(s.player, s.computer, 0)
    }
}

/// Read the ledger under `key`. Missing, unreadable or malformed records give an
/// all-zero ledger.
pub fn load<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> ScoreLedger {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return ScoreLedger::default(),
        Err(e) => {
            log::warn!("score store unavailable, starting from zero: {:#}", e);
            return ScoreLedger::default();
        }
    };
    match parse_record(&raw) {
        Ok(stored) => {
            log::debug!("loaded scores {:?}", stored);
            ScoreLedger::from(stored)
        }
        Err(e) => {
            log::warn!("ignoring malformed score record {:?}: {:#}", raw, e);
            ScoreLedger::default()
        }
    }
}

/// Only a JSON object counts as a record; serde would also take `[p, c]`.
fn parse_record(raw: &str) -> anyhow::Result<StoredScores> {
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(raw)?;
    Ok(serde_json::from_value(serde_json::Value::Object(map))?)
}

/// Write both scores under `key`.
pub fn persist<S: KeyValueStore + ?Sized>(
    store: &mut S,
    key: &str,
    ledger: &ScoreLedger,
) -> anyhow::Result<()> {
    let json = serde_json::to_string(&ledger.snapshot())?;
    store.set(key, &json)
}

/// Delete the stored record and hand back a fresh ledger. A failed delete is
/// logged; the in-memory ledger is cleared regardless.
pub fn reset<S: KeyValueStore + ?Sized>(store: &mut S, key: &str) -> ScoreLedger {
    if let Err(e) = store.remove(key) {
        log::warn!("could not delete score record: {:#}", e);
    }
    ScoreLedger::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;

    const KEY: &str = "jokenpoScores";

    #[test]
    fn apply_from_mid_game() {
        let start = ScoreLedger::new(2, 1, 2);
        assert_eq!(start.apply(RoundResult::PlayerWins), ScoreLedger::new(3, 1, 3));
        assert_eq!(start.apply(RoundResult::ComputerWins), ScoreLedger::new(2, 2, 0));
        assert_eq!(start.apply(RoundResult::Draw), ScoreLedger::new(2, 1, 0));
    }

    #[test]
    fn streak_counts_consecutive_wins_only() {
        let mut ledger = ScoreLedger::default();
        for n in 1..=4 {
            ledger = ledger.apply(RoundResult::PlayerWins);
            assert_eq!(ledger.streak, n);
        }
        ledger = ledger.apply(RoundResult::Draw);
        assert_eq!(ledger.streak, 0);
        ledger = ledger.apply(RoundResult::PlayerWins);
        assert_eq!(ledger.streak, 1);
        assert_eq!(ledger.player, 5);
    }

    #[test]
    fn persist_then_load_drops_streak() {
        let mut store = MemoryStore::new();
        let ledger = ScoreLedger::new(7, 4, 2);
        persist(&mut store, KEY, &ledger).unwrap();
        assert_eq!(
            store.get(KEY).unwrap().as_deref(),
            Some(r#"{"player":7,"computer":4}"#)
        );
        assert_eq!(load(&store, KEY), ScoreLedger::new(7, 4, 0));
    }

    #[test]
    fn malformed_records_load_as_zero() {
        let cases = [
            "",
            "null",
            "not json",
            r#"{"player":null,"computer":null}"#,
            r#"{"player":-1,"computer":2}"#,
            r#"{"player":3}"#,
            r#"[1,2]"#,
        ];
        for raw in cases {
            let mut store = MemoryStore::new();
            store.set(KEY, raw).unwrap();
            assert!(load(&store, KEY).is_zero(), "record {:?}", raw);
        }
    }

    #[test]
    fn two_element_array_is_not_a_record() {
        let mut store = MemoryStore::new();
        store.set(KEY, "[4,5]").unwrap();
        assert_eq!(load(&store, KEY), ScoreLedger::default());
        store.set(KEY, r#"{"player":4,"computer":5}"#).unwrap();
        assert_eq!(load(&store, KEY), ScoreLedger::new(4, 5, 0));
    }

    #[test]
    fn reset_is_idempotent() {
        let mut store = MemoryStore::new();
        persist(&mut store, KEY, &ScoreLedger::new(1, 1, 0)).unwrap();
        assert!(reset(&mut store, KEY).is_zero());
        assert!(reset(&mut store, KEY).is_zero());
        assert!(store.get(KEY).unwrap().is_none());
    }
}
