//! Running code on the UI thread from other threads

use std::fmt;
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};

use crate::error::{CoreError, Result};
use crate::state::State;

/// A function queued for the UI thread
pub type UiCallback = Box<dyn FnOnce(&mut State) + Send>;

/// Wakes the event loop after a callback was queued
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Single-slot queue of callbacks, drained by the frame driver
pub struct CallbackQueue {
    tx: Sender<UiCallback>,
    rx: Receiver<UiCallback>,
}

impl CallbackQueue {
    pub fn new() -> Self {
        let (tx, rx) = bounded(1);
        Self { tx, rx }
    }

    /// Create a sending handle that calls `waker` after every enqueue
    pub fn handle(&self, waker: Waker) -> UiHandle {
        UiHandle {
            tx: self.tx.clone(),
            waker,
        }
    }

    /// Run every queued callback; returns how many ran
    pub fn drain(&self, state: &mut State) -> usize {
        let mut count = 0;
        loop {
            match self.rx.try_recv() {
                Ok(callback) => {
                    callback(state);
                    count += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("Callback queue disconnected");
                    break;
                }
            }
        }
        count
    }
}

impl Default for CallbackQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable, `Send` handle for queueing UI callbacks
#[derive(Clone)]
pub struct UiHandle {
    tx: Sender<UiCallback>,
    waker: Waker,
}

impl UiHandle {
    /// Queue `f` to run on the UI thread before the next frame
    ///
    /// Blocks while a previous callback has not been picked up yet.
    pub fn run(&self, f: impl FnOnce(&mut State) + Send + 'static) -> Result<()> {
        self.tx
            .send(Box::new(f))
            .map_err(|_| CoreError::Disconnected)?;
        (self.waker)();
        Ok(())
    }
}

impl fmt::Debug for UiHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiHandle").finish_non_exhaustive()
    }
}
