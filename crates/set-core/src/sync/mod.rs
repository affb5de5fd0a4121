mod queue;
mod signal;

pub use queue::{BlockingQueue, Wait};
pub use signal::Signal;
