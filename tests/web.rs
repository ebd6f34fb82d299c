// Browser tests; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use jokenpo::web::{DomDisplay, LocalStore};
use jokenpo::{Display, Feedback, GameConfig, KeyValueStore};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn local_store_round_trips() {
    let mut store = LocalStore::open().expect("localStorage available");
    store.set("jokenpo-test", r#"{"player":1,"computer":2}"#).unwrap();
    let ledger = jokenpo::ledger::load(&store, "jokenpo-test");
    assert_eq!(ledger, jokenpo::ScoreLedger::new(1, 2, 0));
    store.remove("jokenpo-test").unwrap();
    assert!(store.get("jokenpo-test").unwrap().is_none());
}

#[wasm_bindgen_test]
fn second_start_is_rejected() {
    assert!(!jokenpo::web::play_choice("rock"));
    assert!(jokenpo::web::start_game(None).is_ok());
    assert!(jokenpo::web::start_game(None).is_err());
    jokenpo::web::reset_game();
}

#[wasm_bindgen_test]
fn audio_without_source_still_reports_ok() {
    let doc = web_sys::window().unwrap().document().unwrap();
    let audio = doc.create_element("audio").unwrap();
    audio.set_id("win-sound");
    doc.body().unwrap().append_child(&audio).unwrap();
    let mut display = DomDisplay::locate(&doc, &GameConfig::default());
    assert!(display.play_feedback(Feedback::Win).is_ok());
    assert!(display.play_feedback(Feedback::Lose).is_err());
}
