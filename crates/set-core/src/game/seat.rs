use crate::model::{PlayerId, Slot};
use crate::sync::{BlockingQueue, Signal};
use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// A card of the candidate went out with another player's set.
    CardsRemoved,
    /// The round ended before the dealer got to the candidate.
    RoundOver,
    /// The candidate no longer had a full set of tokens on live cards.
    Stale,
}

/// The dealer's single reply to a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Point,
    Penalty,
    Invalidated(InvalidReason),
}

const IDLE: u8 = 0;
const SERVING_POINT: u8 = 1;
const SERVING_PENALTY: u8 = 2;

/// State of one participant shared between its own thread, its input
/// sources and the dealer.
///
/// The token list is only changed while the monitor of the slot being added
/// or removed is held, so it agrees with the table's per-slot token sets.
#[derive(Debug)]
pub(crate) struct Seat {
    id: PlayerId,
    human: bool,
    score: AtomicU32,
    tokens: Mutex<Vec<Slot>>,
    pub(crate) actions: BlockingQueue<Slot>,
    pub(crate) inbox: BlockingQueue<Verdict>,
    serving: AtomicU8,
    stopping: AtomicBool,
    wake: Signal,
}

impl Seat {
    pub(crate) fn new(id: PlayerId, human: bool, feature_size: usize) -> Self {
        Self {
            id,
            human,
            score: AtomicU32::new(0),
            tokens: Mutex::new(Vec::with_capacity(feature_size)),
            actions: BlockingQueue::bounded(feature_size),
            inbox: BlockingQueue::bounded(1),
            serving: AtomicU8::new(IDLE),
            stopping: AtomicBool::new(false),
            wake: Signal::new(),
        }
    }

    pub(crate) fn id(&self) -> PlayerId {
        self.id
    }

    pub(crate) fn is_human(&self) -> bool {
        self.human
    }

    pub(crate) fn score(&self) -> u32 {
        self.score.load(Ordering::Acquire)
    }

    pub(crate) fn add_point(&self) -> u32 {
        self.score.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub(crate) fn tokens(&self) -> Vec<Slot> {
        self.tokens.lock().clone()
    }

    pub(crate) fn lock_tokens(&self) -> MutexGuard<'_, Vec<Slot>> {
        self.tokens.lock()
    }

    pub(crate) fn begin_serving(&self, verdict: Verdict) {
        let mode = match verdict {
            Verdict::Point => SERVING_POINT,
            Verdict::Penalty => SERVING_PENALTY,
            Verdict::Invalidated(_) => return,
        };
        self.serving.store(mode, Ordering::Release);
    }

    pub(crate) fn finish_serving(&self) {
        self.serving.store(IDLE, Ordering::Release);
    }

    pub(crate) fn is_serving(&self) -> bool {
        self.serving.load(Ordering::Acquire) != IDLE
    }

    /// Flags the participant for shutdown and releases every wait it may be
    /// parked on.
    pub(crate) fn request_stop(&self) {
        self.stopping.store(true, Ordering::Release);
        self.actions.close();
        self.inbox.close();
        self.wake.raise();
    }

    pub(crate) fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::Acquire)
    }

    /// Interruptible sleep; `false` when cut short by [`Seat::request_stop`].
    pub(crate) fn pause(&self, duration: Duration) -> bool {
        self.wake.sleep(duration)
    }
}
