//! Jokenpô core crate.
//!
//! Rock-paper-scissors against the computer, with scores that survive a page
//! reload. The gameplay rules, score ledger and round state machine are plain
//! Rust and run on the host; `web` binds them to the page through `web-sys`.
//! `start_game()` is the JS entrypoint.

use wasm_bindgen::prelude::*;

pub mod adapters;
pub mod config;
pub mod controller;
pub mod ledger;
pub mod rng;
pub mod rules;
pub mod title;
pub mod web;

pub use adapters::{
    Display, Feedback, KeyValueStore, MemoryStore, RoundTicket, TimerHandle, Timers,
};
pub use config::{GameConfig, ParticleConfig};
pub use controller::{RoundController, RoundState};
pub use ledger::{ScoreLedger, StoredScores};
pub use rng::{ChoiceSource, EntropySource, pick_computer_choice};
pub use rules::{Choice, RoundResult, resolve};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
