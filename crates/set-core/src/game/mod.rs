//! The dealer/participant coordination kernel.
//!
//! Participants talk to the dealer only through queues: a shared FIFO of
//! submissions and one single-slot verdict inbox per participant.

mod dealer;
mod keypad;
mod link;
mod outcome;
mod participant;
mod seat;

pub use dealer::{Dealer, Terminator};
pub use keypad::{Companion, KeyPad};
pub use outcome::{GameOutcome, PlayerScore};
pub use seat::{InvalidReason, Verdict};
