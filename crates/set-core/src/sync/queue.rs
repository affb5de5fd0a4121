use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How long [`BlockingQueue::take`] may suspend the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    Block,
    For(Duration),
    Poll,
}

#[derive(Debug)]
struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
    wakeups: u64,
}

/// FIFO guarded by a monitor, optionally bounded.
///
/// A waiting consumer returns `None` when the queue is closed or when
/// [`BlockingQueue::wake`] is called; callers re-check their own
/// termination state and decide whether to wait again.
#[derive(Debug)]
pub struct BlockingQueue<T> {
    state: Mutex<QueueState<T>>,
    ready: Condvar,
    capacity: Option<usize>,
}

impl<T> BlockingQueue<T> {
    pub fn unbounded() -> Self {
        Self::with_capacity(None)
    }

    pub fn bounded(capacity: usize) -> Self {
        Self::with_capacity(Some(capacity.max(1)))
    }

    fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                closed: false,
                wakeups: 0,
            }),
            ready: Condvar::new(),
            capacity,
        }
    }

    /// Appends `item` unless the queue is full or closed.
    pub fn offer(&self, item: T) -> bool {
        let mut state = self.state.lock();
        if state.closed || self.capacity.is_some_and(|cap| state.items.len() >= cap) {
            return false;
        }
        state.items.push_back(item);
        drop(state);
        self.ready.notify_one();
        true
    }

    pub fn take(&self, wait: Wait) -> Option<T> {
        let mut state = self.state.lock();
        let generation = state.wakeups;
        let deadline = match wait {
            Wait::Poll => return state.items.pop_front(),
            Wait::For(timeout) => Some(Instant::now() + timeout),
            Wait::Block => None,
        };
        loop {
            if let Some(item) = state.items.pop_front() {
                return Some(item);
            }
            if state.closed || state.wakeups != generation {
                return None;
            }
            match deadline {
                Some(deadline) => {
                    if self.ready.wait_until(&mut state, deadline).timed_out() {
                        return state.items.pop_front();
                    }
                }
                None => self.ready.wait(&mut state),
            }
        }
    }

    pub fn contains_where(&self, mut predicate: impl FnMut(&T) -> bool) -> bool {
        self.state.lock().items.iter().any(|item| predicate(item))
    }

    /// Drops every queued item matching `predicate`, returning how many went.
    pub fn remove_where(&self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let mut state = self.state.lock();
        let before = state.items.len();
        state.items.retain(|item| !predicate(item));
        before - state.items.len()
    }

    pub fn clear(&self) -> Vec<T> {
        self.state.lock().items.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    /// Rejects further offers and releases every waiter.
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.ready.notify_all();
    }

    /// Releases current waiters empty-handed without closing the queue.
    pub fn wake(&self) {
        self.state.lock().wakeups += 1;
        self.ready.notify_all();
    }
}

impl<T: PartialEq> BlockingQueue<T> {
    pub fn contains(&self, item: &T) -> bool {
        self.contains_where(|queued| queued == item)
    }

    pub fn remove(&self, item: &T) -> bool {
        self.remove_where(|queued| queued == item) > 0
    }
}
