// DOM renderer for the arena, scoreboard and feedback cues.
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, HtmlMediaElement};

use super::{js_err, timers};
use crate::adapters::{Display, Feedback};
use crate::config::GameConfig;
use crate::ledger::ScoreLedger;
use crate::rules::{Choice, RoundResult};

const PENDING_TEXT: &str = "...";
const RESET_TEXT: &str = "Escolha uma opção para começar!";

/// Element handles, looked up once. Anything missing from the page is skipped.
pub struct DomDisplay {
    doc: Document,
    player_score: Option<HtmlElement>,
    computer_score: Option<HtmlElement>,
    result_message: Option<HtmlElement>,
    reset_button: Option<HtmlElement>,
    player_icon: Option<HtmlElement>,
    computer_icon: Option<HtmlElement>,
    player_slot: Option<HtmlElement>,
    computer_slot: Option<HtmlElement>,
    versus: Option<HtmlElement>,
    score_pulse_ms: u32,
    vibrate_ms: u32,
    // Catch handler for audio play() promises rejected by autoplay policy.
    ignore_rejection: Closure<dyn FnMut(JsValue)>,
}

/// Runs every render step even when an earlier one fails, then reports the
/// failed step names together.
#[derive(Default)]
struct Steps {
    failed: Vec<String>,
}

impl Steps {
    fn run(&mut self, name: &str, result: anyhow::Result<()>) {
        if let Err(e) = result {
            log::debug!("render step {} failed: {:#}", name, e);
            self.failed.push(name.to_string());
        }
    }

    fn finish(self) -> anyhow::Result<()> {
        if self.failed.is_empty() {
            Ok(())
        } else {
            Err(anyhow::anyhow!("render steps failed: {}", self.failed.join(", ")))
        }
    }
}

fn by_id(doc: &Document, id: &str) -> Option<HtmlElement> {
    doc.get_element_by_id(id)?.dyn_into().ok()
}

fn by_selector(doc: &Document, sel: &str) -> Option<HtmlElement> {
    doc.query_selector(sel).ok().flatten()?.dyn_into().ok()
}

fn set_style(el: &Option<HtmlElement>, prop: &str, value: &str) -> anyhow::Result<()> {
    if let Some(el) = el {
        el.style().set_property(prop, value).map_err(js_err)?;
    }
    Ok(())
}

fn set_text(el: &Option<HtmlElement>, text: &str) {
    if let Some(el) = el {
        el.set_text_content(Some(text));
    }
}

fn add_class(el: &Option<HtmlElement>, class: &str) -> anyhow::Result<()> {
    if let Some(el) = el {
        el.class_list().add_1(class).map_err(js_err)?;
    }
    Ok(())
}

fn remove_class(el: &Option<HtmlElement>, class: &str) -> anyhow::Result<()> {
    if let Some(el) = el {
        el.class_list().remove_1(class).map_err(js_err)?;
    }
    Ok(())
}

fn color_var(name: &str) -> String {
    format!("var(--{}-color)", name)
}

impl DomDisplay {
    pub fn locate(doc: &Document, config: &GameConfig) -> Self {
        Self {
            doc: doc.clone(),
            player_score: by_id(doc, "player-score"),
            computer_score: by_id(doc, "computer-score"),
            result_message: by_id(doc, "result-message"),
            reset_button: by_id(doc, "reset-button"),
            player_icon: by_id(doc, "player-choice-icon"),
            computer_icon: by_id(doc, "computer-choice-icon"),
            player_slot: by_selector(doc, ".player-choice-display"),
            computer_slot: by_selector(doc, ".computer-choice-display"),
            versus: by_id(doc, "versus-text"),
            score_pulse_ms: config.score_pulse_ms,
            vibrate_ms: config.vibrate_ms,
            ignore_rejection: Closure::wrap(Box::new(|e: JsValue| {
                log::debug!("audio playback rejected: {:?}", e);
            }) as Box<dyn FnMut(JsValue)>),
        }
    }

    /// Icon markup for a choice, copied from the `<img>` inside its input button.
    fn icon(&self, choice: Choice) -> String {
        self.doc
            .query_selector(&format!("#{} img", choice.id()))
            .ok()
            .flatten()
            .map(|img| img.outer_html())
            .unwrap_or_else(|| choice.label().to_string())
    }

    pub fn update_scoreboard(&self, ledger: &ScoreLedger) -> anyhow::Result<()> {
        set_text(&self.player_score, &ledger.player.to_string());
        set_text(&self.computer_score, &ledger.computer.to_string());
        for el in [&self.player_score, &self.computer_score].into_iter().flatten() {
            self.pulse(el)?;
        }
        Ok(())
    }

    fn pulse(&self, el: &HtmlElement) -> anyhow::Result<()> {
        el.class_list().add_1("score-updated").map_err(js_err)?;
        let el = el.clone();
        timers::after(self.score_pulse_ms, move || {
            let _ = el.class_list().remove_1("score-updated");
        });
        Ok(())
    }

    fn clear_round(&self) -> anyhow::Result<()> {
        remove_class(&self.player_slot, "filled")?;
        remove_class(&self.computer_slot, "filled")?;
        set_style(&self.player_slot, "border-color", "var(--bg-light)")?;
        set_style(&self.computer_slot, "border-color", "var(--bg-light)")?;
        set_style(&self.result_message, "color", "var(--text-color)")
    }

    fn vibrate(&self) {
        if let Some(win) = web_sys::window() {
            let _ = win.navigator().vibrate_with_duration(self.vibrate_ms);
        }
    }
}

impl Display for DomDisplay {
    fn show_pending(&mut self, player: Choice, computer: Choice) -> anyhow::Result<()> {
        let mut steps = Steps::default();
        steps.run("clear", self.clear_round());
        steps.run("player slot", add_class(&self.player_slot, "filled"));
        if let Some(icon) = &self.player_icon {
            icon.set_inner_html(&self.icon(player));
        }
        steps.run("computer slot", add_class(&self.computer_slot, "filled"));
        if let Some(icon) = &self.computer_icon {
            icon.set_inner_html(&self.icon(computer));
        }
        steps.run("versus", set_style(&self.versus, "transform", "scale(1)"));
        set_text(&self.result_message, PENDING_TEXT);
        steps.finish()
    }

    fn show_outcome(
        &mut self,
        result: RoundResult,
        player: Choice,
        computer: Choice,
        ledger: &ScoreLedger,
    ) -> anyhow::Result<()> {
        let mut steps = Steps::default();
        set_text(&self.result_message, &result.message(player, computer));
        steps.run(
            "result colour",
            set_style(&self.result_message, "color", &color_var(result.tone())),
        );
        let (player_border, computer_border) = match result {
            RoundResult::PlayerWins => ("win", "lose"),
            RoundResult::ComputerWins => ("lose", "win"),
            RoundResult::Draw => ("draw", "draw"),
        };
        steps.run(
            "player border",
            set_style(&self.player_slot, "border-color", &color_var(player_border)),
        );
        steps.run(
            "computer border",
            set_style(&self.computer_slot, "border-color", &color_var(computer_border)),
        );
        self.vibrate();
        steps.run("scoreboard", self.update_scoreboard(ledger));
        steps.run("reset button", add_class(&self.reset_button, "visible"));
        steps.finish()
    }

    fn show_reset(&mut self, ledger: &ScoreLedger) -> anyhow::Result<()> {
        let mut steps = Steps::default();
        steps.run("scoreboard", self.update_scoreboard(ledger));
        steps.run("clear", self.clear_round());
        set_text(&self.result_message, RESET_TEXT);
        steps.run("reset button", remove_class(&self.reset_button, "visible"));
        steps.finish()
    }

    fn play_feedback(&mut self, kind: Feedback) -> anyhow::Result<()> {
        let id = match kind {
            Feedback::Click => "click-sound",
            Feedback::Win => "win-sound",
            Feedback::Lose => "lose-sound",
        };
        let audio: HtmlMediaElement = self
            .doc
            .get_element_by_id(id)
            .ok_or_else(|| anyhow::anyhow!("missing #{}", id))?
            .dyn_into()
            .map_err(|_| anyhow::anyhow!("#{} is not a media element", id))?;
        audio.set_current_time(0.0);
        let playing = audio.play().map_err(js_err)?;
        let _ = playing.catch(&self.ignore_rejection);
        Ok(())
    }

    fn celebrate(&mut self) -> anyhow::Result<()> {
        let win = web_sys::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let confetti = js_sys::Reflect::get(&win, &JsValue::from_str("confetti")).map_err(js_err)?;
        let confetti: js_sys::Function = confetti
            .dyn_into()
            .map_err(|_| anyhow::anyhow!("confetti is not loaded"))?;
        confetti.call0(&JsValue::NULL).map_err(js_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_failed_step_is_reported() {
        let mut steps = Steps::default();
        steps.run("result colour", Ok(()));
        steps.run("player border", Err(anyhow::anyhow!("detached")));
        steps.run("scoreboard", Ok(()));
        steps.run("reset button", Err(anyhow::anyhow!("detached")));
        assert_eq!(steps.failed, vec!["player border", "reset button"]);
        let err = steps.finish().unwrap_err();
        assert_eq!(err.to_string(), "render steps failed: player border, reset button");
    }

    #[test]
    fn clean_render_reports_ok() {
        let mut steps = Steps::default();
        steps.run("a", Ok(()));
        steps.run("b", Ok(()));
        assert!(steps.finish().is_ok());
    }
}
