use crate::game::keypad::{Companion, KeyPad};
use crate::game::link::DealerLink;
use crate::game::seat::{Seat, Verdict};
use crate::model::{Slot, Table};
use crate::sync::Wait;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const FREEZE_TICK: Duration = Duration::from_millis(500);

/// Freeze lengths applied after a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FreezeTimes {
    pub(crate) point: Duration,
    pub(crate) penalty: Duration,
}

/// One player's worker: consumes slot presses, toggles tokens, submits
/// full candidates and serves the dealer's verdicts.
pub(crate) struct Participant {
    seat: Arc<Seat>,
    table: Arc<Table>,
    link: Arc<DealerLink>,
    feature_size: usize,
    freeze: FreezeTimes,
    companion: Option<Box<dyn Companion>>,
}

impl Participant {
    pub(crate) fn new(
        seat: Arc<Seat>,
        table: Arc<Table>,
        link: Arc<DealerLink>,
        feature_size: usize,
        freeze: FreezeTimes,
    ) -> Self {
        Self {
            seat,
            table,
            link,
            feature_size,
            freeze,
            companion: None,
        }
    }

    pub(crate) fn seat(&self) -> &Arc<Seat> {
        &self.seat
    }

    pub(crate) fn set_companion(&mut self, companion: Box<dyn Companion>) {
        self.companion = Some(companion);
    }

    pub(crate) fn keypad(&self) -> KeyPad {
        KeyPad::new(
            Arc::clone(&self.seat),
            Arc::clone(&self.table),
            Arc::clone(&self.link),
        )
    }

    pub(crate) fn spawn(self) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(self.seat.id().to_string())
            .spawn(move || self.run())
    }

    fn run(mut self) {
        let player = self.seat.id();
        info!(%player, human = self.seat.is_human(), "thread starting");
        let companion = self.companion.take().and_then(|companion| {
            let keys = self.keypad();
            thread::Builder::new()
                .name(format!("computer-{}", player.index()))
                .spawn(move || companion.run(keys))
                .map_err(|err| warn!(%player, %err, "failed to start input companion"))
                .ok()
        });

        while !self.seat.is_stopping() {
            // `None` means the queue was closed; loop back to the stop check
            if let Some(slot) = self.seat.actions.take(Wait::Block) {
                if self.toggle(slot) {
                    self.submit();
                }
            }
        }

        if let Some(handle) = companion {
            if handle.join().is_err() {
                warn!(%player, "input companion panicked");
            }
        }
        info!(%player, "thread terminated");
    }

    /// Removes this player's token from `slot`, or places one if there is
    /// room. Returns `true` when the placement completed a candidate.
    pub(crate) fn toggle(&self, slot: Slot) -> bool {
        if self.seat.is_serving() {
            return false;
        }
        let player = self.seat.id();
        let Ok(mut guard) = self.table.lock_slot(slot) else {
            return false;
        };
        if !self.link.accepts(slot) {
            return false;
        }
        let mut tokens = self.seat.lock_tokens();
        if let Some(position) = tokens.iter().position(|&held| held == slot) {
            guard.remove_token(player);
            tokens.remove(position);
            false
        } else if tokens.len() < self.feature_size && guard.card().is_some() {
            guard.place_token(player);
            tokens.push(slot);
            tokens.len() == self.feature_size
        } else {
            false
        }
    }

    fn submit(&self) {
        let player = self.seat.id();
        if !self.link.submit(player) {
            warn!(%player, "submission queue closed");
            return;
        }
        debug!(%player, tokens = ?self.seat.tokens(), "candidate submitted");
        loop {
            match self.seat.inbox.take(Wait::Block) {
                Some(verdict) => return self.serve(verdict),
                None if self.seat.is_stopping() => return,
                None => continue,
            }
        }
    }

    fn serve(&self, verdict: Verdict) {
        let player = self.seat.id();
        debug!(%player, ?verdict, "verdict received");
        match verdict {
            // presses queued on live slots while waiting stay in order
            Verdict::Invalidated(_) => return,
            Verdict::Point => {
                let score = self.seat.add_point();
                self.table.view().set_score(player, score);
                self.hold_freeze(self.freeze.point);
            }
            Verdict::Penalty => self.hold_freeze(self.freeze.penalty),
        }
        // presses that slipped in around the freeze are stale by now
        self.seat.actions.clear();
        self.seat.finish_serving();
    }

    fn hold_freeze(&self, total: Duration) {
        let player = self.seat.id();
        let view = self.table.view();
        let until = Instant::now() + total;
        loop {
            let left = until.saturating_duration_since(Instant::now());
            if left.is_zero() {
                break;
            }
            view.set_freeze(player, left);
            if !self.seat.pause(left.min(FREEZE_TICK)) {
                debug!(%player, "freeze interrupted");
                break;
            }
        }
        view.set_freeze(player, Duration::ZERO);
    }
}
