// setTimeout-backed timers for the settle delay.
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::js_err;
use crate::adapters::{RoundTicket, TimerHandle, Timers};

pub struct BrowserTimers;

impl Timers for BrowserTimers {
    fn schedule_settle(
        &mut self,
        delay_ms: u32,
        ticket: RoundTicket,
    ) -> anyhow::Result<TimerHandle> {
        let win = web_sys::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        // once_into_js frees the closure after it runs. A cancelled timer leaks its
        // (tiny) closure, which only happens on reset mid-round.
        let cb = Closure::once_into_js(move || super::settle_round(ticket));
        let id = win
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.unchecked_ref(),
                delay_ms.min(i32::MAX as u32) as i32,
            )
            .map_err(js_err)?;
        Ok(TimerHandle(id))
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(win) = web_sys::window() {
            win.clear_timeout_with_handle(handle.0);
        }
    }
}

/// Schedule an arbitrary one-shot callback; used for cosmetic timers.
pub fn after(delay_ms: u32, f: impl FnOnce() + 'static) -> Option<i32> {
    let win = web_sys::window()?;
    let cb = Closure::once_into_js(f);
    win.set_timeout_with_callback_and_timeout_and_arguments_0(
        cb.unchecked_ref(),
        delay_ms.min(i32::MAX as u32) as i32,
    )
    .ok()
}

pub fn clear(id: i32) {
    if let Some(win) = web_sys::window() {
        win.clear_timeout_with_handle(id);
    }
}
