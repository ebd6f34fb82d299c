//! Browser front-end: wires the page's buttons to the round controller and
//! provides the DOM, localStorage and setTimeout implementations of the
//! collaborator traits. Also runs the cosmetic title typewriter and particle
//! background.
//!
//! Expected markup: `#rock`, `#paper`, `#scissors` buttons (each wrapping an
//! `<img>` icon), `#reset-button`, `#player-score`, `#computer-score`,
//! `#result-message`, `#player-choice-icon`, `#computer-choice-icon`,
//! `.player-choice-display`, `.computer-choice-display`, `#versus-text`,
//! `#main-title`, `#particles-js`, and `<audio>` elements `#click-sound`,
//! `#win-sound`, `#lose-sound`.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, window};

use crate::adapters::RoundTicket;
use crate::config::GameConfig;
use crate::controller::RoundController;
use crate::rng::EntropySource;
use crate::rules::Choice;
use crate::title::Typewriter;

mod console;
mod display;
mod storage;
mod timers;

pub use display::DomDisplay;
pub use storage::{BrowserStore, LocalStore};
pub use timers::BrowserTimers;

type BrowserController = RoundController<DomDisplay, BrowserStore, EntropySource>;

struct Game {
    controller: BrowserController,
    timers: BrowserTimers,
}

struct Title {
    element: HtmlElement,
    typewriter: Typewriter,
    timer: Option<i32>,
}

thread_local! {
    static GAME: RefCell<Option<Game>> = const { RefCell::new(None) };
    static TITLE: RefCell<Option<Title>> = const { RefCell::new(None) };
}

pub(crate) fn js_err(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

fn to_js(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{:#}", e))
}

/// Boot the game. `config_json` is an optional JSON object overriding
/// [`GameConfig`] defaults. Only the first call succeeds; later calls return an
/// error and leave the running game, its listeners and timers untouched.
#[wasm_bindgen]
pub fn start_game(config_json: Option<String>) -> Result<(), JsValue> {
    if GAME.with(|g| g.borrow().is_some()) {
        return Err(JsValue::from_str("game already started"));
    }
    let config = GameConfig::from_json(config_json.as_deref().unwrap_or("")).map_err(to_js)?;
    console::init(config.log_filter().map_err(to_js)?);

    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let display = DomDisplay::locate(&doc, &config);
    let controller = RoundController::new(
        config.clone(),
        display,
        BrowserStore::open(),
        EntropySource::new(),
    );
    let ledger = *controller.ledger();
    if let Err(e) = controller.display().update_scoreboard(&ledger) {
        log::warn!("initial scoreboard render failed: {:#}", e);
    }
    GAME.with(|g| {
        g.replace(Some(Game {
            controller,
            timers: BrowserTimers,
        }))
    });

    bind_choice_buttons(&doc)?;
    bind_reset_button(&doc)?;
    start_title(&doc, &config);
    setup_particles(&win, &config);
    Ok(())
}

/// Play a round with the choice whose element id is `id`. Returns false when the
/// input was ignored (round in flight, unknown id, or game not started).
#[wasm_bindgen]
pub fn play_choice(id: &str) -> bool {
    GAME.with(|cell| match cell.borrow_mut().as_mut() {
        Some(game) => game.controller.play_named(id, &mut game.timers).is_some(),
        None => false,
    })
}

/// Zero the scores and drop any in-flight round.
#[wasm_bindgen]
pub fn reset_game() {
    GAME.with(|cell| {
        if let Some(game) = cell.borrow_mut().as_mut() {
            game.controller.reset(&mut game.timers);
        }
    });
}

fn settle_round(ticket: RoundTicket) {
    GAME.with(|cell| {
        if let Some(game) = cell.borrow_mut().as_mut() {
            game.controller.settle(ticket);
        }
    });
}

fn bind_choice_buttons(doc: &Document) -> Result<(), JsValue> {
    for choice in Choice::ALL {
        let Some(el) = doc.get_element_by_id(choice.id()) else {
            log::warn!("missing #{} button", choice.id());
            continue;
        };
        let closure = Closure::wrap(Box::new(move |evt: web_sys::Event| {
            let id = evt
                .current_target()
                .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                .map(|el| el.id())
                .unwrap_or_default();
            play_choice(&id);
        }) as Box<dyn FnMut(_)>);
        el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn bind_reset_button(doc: &Document) -> Result<(), JsValue> {
    let Some(el) = doc.get_element_by_id("reset-button") else {
        log::warn!("missing #reset-button");
        return Ok(());
    };
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
        reset_game();
    }) as Box<dyn FnMut(_)>);
    el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

// --- Title typewriter ---------------------------------------------------------

fn start_title(doc: &Document, config: &GameConfig) {
    let Some(element) = doc
        .get_element_by_id("main-title")
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    TITLE.with(|cell| {
        let mut slot = cell.borrow_mut();
        if let Some(old) = slot.as_mut().and_then(|t| t.timer.take()) {
            timers::clear(old);
        }
        element.set_text_content(Some(""));
        *slot = Some(Title {
            element,
            typewriter: Typewriter::new(
                &config.title_text,
                config.title_char_delay_ms,
                config.title_pause_ms,
            ),
            timer: None,
        });
    });
    title_tick();
}

fn title_tick() {
    TITLE.with(|cell| {
        if let Some(title) = cell.borrow_mut().as_mut() {
            let frame = title.typewriter.step();
            title.element.set_text_content(Some(&frame.text));
            title.timer = timers::after(frame.delay_ms, title_tick);
        }
    });
}

// --- Particle background ------------------------------------------------------

fn setup_particles(win: &web_sys::Window, config: &GameConfig) {
    if let Err(e) = try_setup_particles(win, config) {
        log::debug!("particle background skipped: {:#}", e);
    }
}

fn try_setup_particles(win: &web_sys::Window, config: &GameConfig) -> anyhow::Result<()> {
    let init = js_sys::Reflect::get(win, &JsValue::from_str("particlesJS")).map_err(js_err)?;
    let init: js_sys::Function = init
        .dyn_into()
        .map_err(|_| anyhow::anyhow!("particlesJS is not loaded"))?;
    let options = js_sys::JSON::parse(&config.particles.to_particles_js().to_string())
        .map_err(js_err)?;
    init.call2(&JsValue::NULL, &JsValue::from_str("particles-js"), &options)
        .map_err(js_err)?;
    Ok(())
}
