//! Broadcast Stream: a single-producer, multi-consumer asynchronous sequence.
//!
//! [`BroadcastStream::channel`] returns the producer half ([`Continuation`])
//! and a read handle. The stream keeps two FIFO queues:
//!
//! ```text
//!   push ──► pending pulls? ──yes──► hand off to the oldest pull
//!                 │
//!                 no
//!                 ▼
//!              backlog ◄── next() pops from here first
//! ```
//!
//! At any instant either the backlog or the pending queue is empty. Every
//! pushed value is delivered to exactly one pull: read handles that pull
//! concurrently *compete* for values rather than each seeing all of them.
//!
//! The backlog is unbounded and pushes never block.

use std::collections::VecDeque;
use std::sync::Arc;

use futures::Stream;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, trace};

struct State<T> {
    backlog: VecDeque<T>,
    pending: VecDeque<oneshot::Sender<T>>,
    closed: bool,
}

impl<T> State<T> {
    /// Give `value` to the oldest live pending pull, or return it if none is
    /// waiting. Pulls whose future was dropped are discarded on the way.
    fn hand_off(&mut self, mut value: T) -> Result<(), T> {
        while let Some(tx) = self.pending.pop_front() {
            match tx.send(value) {
                Ok(()) => return Ok(()),
                Err(returned) => value = returned,
            }
        }
        Err(value)
    }
}

type Shared<T> = Arc<Mutex<State<T>>>;

// ---------------------------------------------------------------------------
// Producer half
// ---------------------------------------------------------------------------

/// The producer half of a [`BroadcastStream`].
///
/// There is exactly one per stream. Dropping it closes the stream, so pulls
/// never wait on a producer that no longer exists.
pub struct Continuation<T> {
    shared: Shared<T>,
}

impl<T> Continuation<T> {
    /// Deliver `value` to the oldest pending pull, or append it to the backlog.
    ///
    /// No-op once the stream is closed.
    pub fn push(&self, value: T) {
        let handed_off = {
            let mut state = self.shared.lock();
            if state.closed {
                return;
            }
            match state.hand_off(value) {
                Ok(()) => true,
                Err(value) => {
                    state.backlog.push_back(value);
                    false
                }
            }
        };
        trace!(handed_off, "value pushed");
    }

    /// Mark the stream closed and resolve every pending pull with `None`,
    /// oldest first. Later calls are no-ops.
    pub fn close(&self) {
        let pending = {
            let mut state = self.shared.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            std::mem::take(&mut state.pending)
        };
        let waiters = pending.len();
        // Dropping a sender resolves its pull with `None`.
        for tx in pending {
            drop(tx);
        }
        debug!(waiters, "stream closed");
    }

    pub fn is_closed(&self) -> bool {
        self.shared.lock().closed
    }

    /// A new read handle on the same stream.
    pub fn stream(&self) -> BroadcastStream<T> {
        BroadcastStream {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Drop for Continuation<T> {
    fn drop(&mut self) {
        self.close();
    }
}

// ---------------------------------------------------------------------------
// Read handle
// ---------------------------------------------------------------------------

/// Read handle on a broadcast stream.
///
/// Cloning is cheap; all clones read the same backlog and pending queue.
pub struct BroadcastStream<T> {
    shared: Shared<T>,
}

impl<T> Clone for BroadcastStream<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> BroadcastStream<T> {
    /// Create an open, empty stream.
    pub fn channel() -> (Continuation<T>, BroadcastStream<T>) {
        let shared = Arc::new(Mutex::new(State {
            backlog: VecDeque::new(),
            pending: VecDeque::new(),
            closed: false,
        }));
        (
            Continuation {
                shared: Arc::clone(&shared),
            },
            BroadcastStream { shared },
        )
    }

    /// Pull the next value.
    ///
    /// Returns the oldest backlog value immediately if there is one, `None`
    /// if the stream is closed, and otherwise waits for the next `push` or
    /// `close`. Dropping the returned future is always safe: a value that was
    /// already handed to it goes back to the front of the stream.
    pub async fn next(&self) -> Option<T> {
        let rx = {
            let mut state = self.shared.lock();
            if let Some(value) = state.backlog.pop_front() {
                return Some(value);
            }
            if state.closed {
                return None;
            }
            let (tx, rx) = oneshot::channel();
            state.pending.push_back(tx);
            rx
        };

        PendingPull {
            shared: &self.shared,
            rx: Some(rx),
        }
        .wait()
        .await
    }

    pub fn is_closed(&self) -> bool {
        self.shared.lock().closed
    }

    /// Values pushed but not yet pulled.
    pub fn backlog_len(&self) -> usize {
        self.shared.lock().backlog.len()
    }

    /// Pulls currently waiting for a value.
    pub fn pending_len(&self) -> usize {
        self.shared
            .lock()
            .pending
            .iter()
            .filter(|tx| !tx.is_closed())
            .count()
    }

    /// Adapt this handle into a [`futures::Stream`] that ends when the
    /// broadcast stream closes.
    pub fn into_stream(self) -> impl Stream<Item = T>
    where
        T: 'static,
    {
        futures::stream::unfold(self, |stream| async move {
            let value = stream.next().await?;
            Some((value, stream))
        })
    }
}

// ---------------------------------------------------------------------------
// Pending pull
// ---------------------------------------------------------------------------

/// A registered pull awaiting its value.
///
/// If dropped before completing, any value already sent to it is returned
/// to the front of the stream, and its slot is pruned from the pending queue.
struct PendingPull<'a, T> {
    shared: &'a Mutex<State<T>>,
    rx: Option<oneshot::Receiver<T>>,
}

impl<T> PendingPull<'_, T> {
    async fn wait(mut self) -> Option<T> {
        let rx = self.rx.as_mut()?;
        let value = rx.await.ok();
        self.rx = None;
        value
    }
}

impl<T> Drop for PendingPull<'_, T> {
    fn drop(&mut self) {
        let Some(mut rx) = self.rx.take() else {
            return;
        };
        rx.close();

        let returned = {
            let mut state = self.shared.lock();
            match rx.try_recv() {
                Ok(value) => {
                    if let Err(value) = state.hand_off(value) {
                        state.backlog.push_front(value);
                    }
                    true
                }
                Err(_) => {
                    state.pending.retain(|tx| !tx.is_closed());
                    false
                }
            }
        };
        if returned {
            trace!("abandoned pull returned its value to the stream");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
