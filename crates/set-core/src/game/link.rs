use crate::model::{PlayerId, Slot};
use crate::sync::BlockingQueue;
use std::sync::atomic::{AtomicBool, Ordering};

/// What participants see of the dealer: the submission queue plus the
/// advisory gates raised while the dealer restructures the table.
///
/// The gates only let participants skip doomed writes early. Slot monitors
/// are what keep the table consistent; participants re-check the gates while
/// holding the monitor of the slot they are about to touch.
#[derive(Debug)]
pub(crate) struct DealerLink {
    pub(crate) submissions: BlockingQueue<PlayerId>,
    updating: AtomicBool,
    frozen: Vec<AtomicBool>,
}

impl DealerLink {
    pub(crate) fn new(table_size: usize) -> Self {
        Self {
            submissions: BlockingQueue::unbounded(),
            updating: AtomicBool::new(true),
            frozen: (0..table_size).map(|_| AtomicBool::new(false)).collect(),
        }
    }

    pub(crate) fn submit(&self, player: PlayerId) -> bool {
        self.submissions.offer(player)
    }

    pub(crate) fn set_updating(&self, updating: bool) {
        self.updating.store(updating, Ordering::SeqCst);
    }

    pub(crate) fn is_updating(&self) -> bool {
        self.updating.load(Ordering::SeqCst)
    }

    pub(crate) fn freeze(&self, slot: Slot) {
        if let Some(flag) = self.frozen.get(slot) {
            flag.store(true, Ordering::SeqCst);
        }
    }

    pub(crate) fn is_frozen(&self, slot: Slot) -> bool {
        self.frozen
            .get(slot)
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    pub(crate) fn thaw_all(&self) {
        for flag in &self.frozen {
            flag.store(false, Ordering::SeqCst);
        }
    }

    /// Whether the gates currently allow writes on `slot`.
    pub(crate) fn accepts(&self, slot: Slot) -> bool {
        !self.is_updating() && !self.is_frozen(slot)
    }
}
