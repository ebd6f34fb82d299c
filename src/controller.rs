//! Round state machine.
//!
//! `Idle --play--> Resolving --settle--> Idle`, with `reset` allowed from either
//! state. Only one round is ever in flight; input while resolving is dropped.
//! The settle step is driven by a timer the caller schedules through [`Timers`];
//! each round gets a fresh [`RoundTicket`] so a callback that outlives a reset
//! cannot touch the new ledger.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::adapters::{Display, Feedback, KeyValueStore, RoundTicket, TimerHandle, Timers};
use crate::config::GameConfig;
use crate::ledger::{self, ScoreLedger};
use crate::rng::{ChoiceSource, pick_computer_choice};
use crate::rules::{Choice, RoundResult, resolve};

// Shared by every controller, so a ticket never matches another game's round.
static NEXT_TICKET: AtomicU64 = AtomicU64::new(0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundState {
    Idle,
    Resolving,
}

#[derive(Clone, Copy, Debug)]
struct PendingRound {
    ticket: RoundTicket,
    player: Choice,
    computer: Choice,
    timer: Option<TimerHandle>,
}

pub struct RoundController<D, S, R> {
    config: GameConfig,
    display: D,
    store: S,
    source: R,
    ledger: ScoreLedger,
    pending: Option<PendingRound>,
}

impl<D: Display, S: KeyValueStore, R: ChoiceSource> RoundController<D, S, R> {
    /// Build a controller and load the persisted scores.
    pub fn new(config: GameConfig, display: D, store: S, source: R) -> Self {
        let ledger = ledger::load(&store, &config.storage_key);
        log::info!(
            "jokenpo ready: player {} computer {}",
            ledger.player,
            ledger.computer
        );
        Self {
            config,
            display,
            store,
            source,
            ledger,
            pending: None,
        }
    }

    pub fn state(&self) -> RoundState {
        if self.pending.is_some() {
            RoundState::Resolving
        } else {
            RoundState::Idle
        }
    }

    /// True while new input is accepted.
    pub fn is_active(&self) -> bool {
        self.pending.is_none()
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Start a round. Returns the ticket of the new round, or `None` if a round
    /// is already resolving (the input is dropped).
    pub fn play<T: Timers + ?Sized>(
        &mut self,
        player: Choice,
        timers: &mut T,
    ) -> Option<RoundTicket> {
        if self.pending.is_some() {
            log::debug!("ignoring {} while a round is resolving", player);
            return None;
        }

        let computer = pick_computer_choice(&mut self.source);
        let ticket = RoundTicket(NEXT_TICKET.fetch_add(1, Ordering::Relaxed));
        self.pending = Some(PendingRound {
            ticket,
            player,
            computer,
            timer: None,
        });

        if let Err(e) = self.display.play_feedback(Feedback::Click) {
            log::debug!("click feedback failed: {:#}", e);
        }
        if let Err(e) = self.display.show_pending(player, computer) {
            log::warn!("display failed to show pending round: {:#}", e);
        }

        match timers.schedule_settle(self.config.settle_delay_ms, ticket) {
            Ok(handle) => {
                if let Some(p) = self.pending.as_mut() {
                    p.timer = Some(handle);
                }
            }
            Err(e) => {
                log::warn!("could not schedule settle timer, resolving now: {:#}", e);
                self.settle(ticket);
            }
        }
        Some(ticket)
    }

    /// Start a round from an input element id. Unknown ids are rejected without
    /// any state change.
    pub fn play_named<T: Timers + ?Sized>(
        &mut self,
        id: &str,
        timers: &mut T,
    ) -> Option<RoundTicket> {
        match Choice::try_from(id) {
            Ok(choice) => self.play(choice, timers),
            Err(e) => {
                log::warn!("rejected input: {:#}", e);
                None
            }
        }
    }

    /// Finish the round identified by `ticket`. Stale or unknown tickets do nothing.
    pub fn settle(&mut self, ticket: RoundTicket) -> Option<RoundResult> {
        let round = match self.pending {
            Some(p) if p.ticket == ticket => p,
            _ => {
                log::debug!("dropping stale settle for round {}", ticket.0);
                return None;
            }
        };

        let result = resolve(round.player, round.computer);
        self.ledger = self.ledger.apply(result);
        if let Err(e) = ledger::persist(&mut self.store, &self.config.storage_key, &self.ledger)
        {
            log::warn!("could not persist scores: {:#}", e);
        }

        if let Err(e) =
            self.display
                .show_outcome(result, round.player, round.computer, &self.ledger)
        {
            log::warn!("display failed to show outcome: {:#}", e);
        }
        let cue = match result {
            RoundResult::PlayerWins => Some(Feedback::Win),
            RoundResult::ComputerWins => Some(Feedback::Lose),
            RoundResult::Draw => None,
        };
        if let Some(kind) = cue {
            if let Err(e) = self.display.play_feedback(kind) {
                log::debug!("{:?} feedback failed: {:#}", kind, e);
            }
        }
        if result == RoundResult::PlayerWins && self.ledger.streak >= self.config.celebrate_streak
        {
            if let Err(e) = self.display.celebrate() {
                log::debug!("celebration failed: {:#}", e);
            }
        }

        log::info!(
            "round {}: {} vs {} -> {:?} ({}-{}, streak {})",
            ticket.0,
            round.player,
            round.computer,
            result,
            self.ledger.player,
            self.ledger.computer,
            self.ledger.streak
        );
        self.pending = None;
        Some(result)
    }

    /// Clear scores and any in-flight round. Not gated by the activity flag.
    pub fn reset<T: Timers + ?Sized>(&mut self, timers: &mut T) {
        if let Some(round) = self.pending.take() {
            if let Some(handle) = round.timer {
                timers.cancel(handle);
            }
            log::debug!("cancelled round {} on reset", round.ticket.0);
        }
        self.ledger = ledger::reset(&mut self.store, &self.config.storage_key);
        if let Err(e) = self.display.show_reset(&self.ledger) {
            log::warn!("display failed to reset: {:#}", e);
        }
        log::info!("scores reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;

    #[derive(Default)]
    struct NullDisplay {
        outcomes: usize,
        celebrations: usize,
    }

    impl Display for NullDisplay {
        fn show_pending(&mut self, _: Choice, _: Choice) -> anyhow::Result<()> {
            Ok(())
        }
        fn show_outcome(
            &mut self,
            _: RoundResult,
            _: Choice,
            _: Choice,
            _: &ScoreLedger,
        ) -> anyhow::Result<()> {
            self.outcomes += 1;
            Ok(())
        }
        fn show_reset(&mut self, _: &ScoreLedger) -> anyhow::Result<()> {
            Ok(())
        }
        fn play_feedback(&mut self, _: Feedback) -> anyhow::Result<()> {
            Ok(())
        }
        fn celebrate(&mut self) -> anyhow::Result<()> {
            self.celebrations += 1;
            Ok(())
        }
    }

    struct Always(u8);
    impl ChoiceSource for Always {
        fn draw(&mut self) -> u8 {
            self.0
        }
    }

    #[derive(Default)]
    struct ManualTimers {
        next: i32,
        cancelled: Vec<TimerHandle>,
    }

    impl Timers for ManualTimers {
        fn schedule_settle(
            &mut self,
            _delay_ms: u32,
            _ticket: RoundTicket,
        ) -> anyhow::Result<TimerHandle> {
            self.next += 1;
            Ok(TimerHandle(self.next))
        }
        fn cancel(&mut self, handle: TimerHandle) {
            self.cancelled.push(handle);
        }
    }

    fn controller(draw: u8) -> RoundController<NullDisplay, MemoryStore, Always> {
        RoundController::new(
            GameConfig::default(),
            NullDisplay::default(),
            MemoryStore::new(),
            Always(draw),
        )
    }

    #[test]
    fn round_goes_idle_resolving_idle() {
        let mut ctl = controller(2);
        let mut timers = ManualTimers::default();
        assert_eq!(ctl.state(), RoundState::Idle);
        let ticket = ctl.play(Choice::Rock, &mut timers).unwrap();
        assert_eq!(ctl.state(), RoundState::Resolving);
        assert!(!ctl.is_active());
        assert_eq!(ctl.settle(ticket), Some(RoundResult::PlayerWins));
        assert_eq!(ctl.state(), RoundState::Idle);
        assert_eq!(*ctl.ledger(), ScoreLedger::new(1, 0, 1));
    }

    #[test]
    fn settle_twice_is_a_no_op() {
        let mut ctl = controller(0);
        let mut timers = ManualTimers::default();
        let ticket = ctl.play(Choice::Paper, &mut timers).unwrap();
        assert!(ctl.settle(ticket).is_some());
        assert!(ctl.settle(ticket).is_none());
        assert_eq!(ctl.ledger().player, 1);
        assert_eq!(ctl.display().outcomes, 1);
    }

    #[test]
    fn reset_cancels_pending_timer() {
        let mut ctl = controller(0);
        let mut timers = ManualTimers::default();
        let ticket = ctl.play(Choice::Paper, &mut timers).unwrap();
        ctl.reset(&mut timers);
        assert_eq!(timers.cancelled, vec![TimerHandle(1)]);
        assert_eq!(ctl.state(), RoundState::Idle);
        assert!(ctl.settle(ticket).is_none());
        assert!(ctl.ledger().is_zero());
    }

    #[test]
    fn ticket_from_another_controller_is_stale() {
        let mut old = controller(2);
        let mut fresh = controller(2);
        let mut timers = ManualTimers::default();
        let stale = old.play(Choice::Rock, &mut timers).unwrap();
        let current = fresh.play(Choice::Rock, &mut timers).unwrap();
        assert_ne!(stale, current);
        assert!(fresh.settle(stale).is_none());
        assert_eq!(fresh.state(), RoundState::Resolving);
        assert!(fresh.ledger().is_zero());
        assert_eq!(fresh.settle(current), Some(RoundResult::PlayerWins));
    }

    #[test]
    fn celebrates_from_the_third_straight_win() {
        let mut ctl = controller(2);
        let mut timers = ManualTimers::default();
        for _ in 0..4 {
            let t = ctl.play(Choice::Rock, &mut timers).unwrap();
            ctl.settle(t);
        }
        assert_eq!(ctl.display().celebrations, 2);
    }
}
