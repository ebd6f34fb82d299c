//! Collaborator interfaces the round controller talks to.
//!
//! The controller never touches the DOM, storage or timers directly; the browser
//! layer (`crate::web`) implements these traits, tests implement recording stubs.

use std::collections::HashMap;

use crate::ledger::ScoreLedger;
use crate::rules::{Choice, RoundResult};

/// Short audio / haptic cue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    Click,
    Win,
    Lose,
}

/// Rendering capability set. Every call is best-effort: an `Err` is logged by the
/// caller and the round carries on.
pub trait Display {
    /// Clear the previous round's styling and show both hands as pending.
    fn show_pending(&mut self, player: Choice, computer: Choice) -> anyhow::Result<()>;
    fn show_outcome(
        &mut self,
        result: RoundResult,
        player: Choice,
        computer: Choice,
        ledger: &ScoreLedger,
    ) -> anyhow::Result<()>;
    fn show_reset(&mut self, ledger: &ScoreLedger) -> anyhow::Result<()>;
    fn play_feedback(&mut self, kind: Feedback) -> anyhow::Result<()>;
    fn celebrate(&mut self) -> anyhow::Result<()>;
}

/// Durable string key-value store (`localStorage` in the browser).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&mut self, key: &str) -> anyhow::Result<()>;
}

/// Identifier of a scheduled callback, used to cancel it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub i32);

/// Identifies one in-flight round. A settle callback carries the ticket it was
/// scheduled with; the controller ignores tickets that no longer match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RoundTicket(pub u64);

/// Cancellable one-shot timers. `schedule_settle` must arrange for
/// `RoundController::settle(ticket)` to run after `delay_ms`.
pub trait Timers {
    fn schedule_settle(&mut self, delay_ms: u32, ticket: RoundTicket)
    -> anyhow::Result<TimerHandle>;
    fn cancel(&mut self, handle: TimerHandle);
}

/// In-memory store. Used by tests and when `localStorage` is unavailable.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
