use crate::policy::{Policy, PolicyContext};
use set_core::game::{Companion, KeyPad};
use std::time::Duration;
use tracing::{debug, trace};

pub const DEFAULT_PRESS_DELAY: Duration = Duration::from_millis(2);

/// Key presses generated for a computer player.
///
/// Runs beside its participant until the participant is stopped, asking the
/// policy for slots and pausing between presses.
pub struct SyntheticInput {
    policy: Box<dyn Policy>,
    delay: Duration,
}

impl SyntheticInput {
    pub fn new(policy: Box<dyn Policy>) -> Self {
        Self {
            policy,
            delay: DEFAULT_PRESS_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Companion for SyntheticInput {
    fn run(mut self: Box<Self>, keys: KeyPad) {
        let player = keys.player();
        debug!(%player, delay_ms = self.delay.as_millis() as u64, "synthetic input started");
        let mut presses: u64 = 0;
        while keys.is_active() {
            // wait for queued presses to land before re-reading tokens
            if !keys.is_frozen() && keys.queued_actions() == 0 {
                let table = keys.table_cards();
                let held = keys.tokens();
                let ctx = PolicyContext {
                    player,
                    table_size: keys.table_size(),
                    table: &table,
                    held: &held,
                };
                for slot in self.policy.next_slots(&ctx) {
                    let accepted = keys.key_pressed(slot);
                    trace!(%player, slot, accepted, "synthetic press");
                    presses += u64::from(accepted);
                }
            }
            if !keys.pause(self.delay) {
                break;
            }
        }
        debug!(%player, presses, "synthetic input stopped");
    }
}
