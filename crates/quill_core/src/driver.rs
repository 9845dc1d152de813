//! The frame loop body
//!
//! The platform shim owns the event loop. For every batch of events it calls
//! [`FrameDriver::begin_cycle`], feeds the events into the [`BackendState`],
//! then calls [`FrameDriver::frame`] and renders the buffer.

use std::time::{Duration, Instant};

use quill_paint::{Buffer, Rect};
use serde::{Deserialize, Serialize};

use crate::backend::BackendState;
use crate::callback::CallbackQueue;
use crate::component::Component;
use crate::input::MouseButtons;
use crate::state::State;

/// Frame scheduling settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Immediate re-runs honored per input cycle before deferring to an animation frame
    pub max_immediate_updates: u32,
    /// Delay between animation frames, in milliseconds
    pub animation_interval_ms: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_immediate_updates: 3,
            animation_interval_ms: 16,
        }
    }
}

impl FrameConfig {
    pub fn animation_interval(&self) -> Duration {
        Duration::from_millis(self.animation_interval_ms)
    }
}

/// Application code run around the traversal
#[derive(Default)]
pub struct FrameHooks {
    /// Runs once, after the first traversal has attached the root
    pub init: Option<Box<dyn FnOnce(&mut State)>>,
    /// Runs before every traversal except the first
    pub update: Option<Box<dyn FnMut(&mut State)>>,
    /// Runs when the window is asked to close; defaults to [`State::quit`]
    pub close: Option<Box<dyn FnMut(&mut State)>>,
}

/// What happened during one [`FrameDriver::frame`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Immediate re-runs of the traversal
    pub reruns: u32,
    /// A further update request was deferred to an animation frame
    pub deferred: bool,
}

/// Drives one frame: hooks, traversal, refocus and re-runs
pub struct FrameDriver {
    config: FrameConfig,
    hooks: FrameHooks,
    callbacks: CallbackQueue,
}

impl FrameDriver {
    pub fn new(config: FrameConfig) -> Self {
        Self {
            config,
            hooks: FrameHooks::default(),
            callbacks: CallbackQueue::new(),
        }
    }

    pub fn with_hooks(mut self, hooks: FrameHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Queue for callbacks from other threads
    pub fn callbacks(&self) -> &CallbackQueue {
        &self.callbacks
    }

    /// Start an input cycle: clear per-update input and run queued callbacks
    pub fn begin_cycle(&mut self, state: &mut BackendState) {
        state.reset_events();
        let ran = self.callbacks.drain(state.state_mut());
        if ran > 0 {
            tracing::trace!("Ran {} queued callback(s)", ran);
        }
    }

    /// Traverse `root` for a `width`×`height` window, re-running as requested
    pub fn frame(
        &mut self,
        state: &mut BackendState,
        buf: &mut Buffer,
        root: &mut dyn Component,
        (width, height): (i32, i32),
        close_requested: bool,
        now: Instant,
    ) -> FrameReport {
        let bounds = Rect::wh(width, height);
        let mut report = FrameReport::default();

        buf.reset(width, height);
        state.reset_requests_at(now);
        if self.hooks.init.is_none() {
            if let Some(update) = self.hooks.update.as_mut() {
                update(state.state_mut());
            }
        }
        state.update_child(buf, bounds, root);
        if let Some(init) = self.hooks.init.take() {
            init(state.state_mut());
        }
        if close_requested {
            match self.hooks.close.as_mut() {
                Some(close) => close(state.state_mut()),
                None => state.quit(),
            }
        }

        if state.refocus_requested() {
            state.release_mouse(MouseButtons::NONE);
            buf.reset(width, height);
            state.update_child(buf, bounds, root);
            state.grab_mouse();
        }

        while state.update_requested() {
            if report.reruns >= self.config.max_immediate_updates {
                tracing::debug!(
                    "Update still requested after {} re-runs, deferring to animation frame",
                    report.reruns
                );
                state.request_animation();
                report.deferred = true;
                break;
            }
            state.clear_update();
            state.reset_events();
            buf.reset(width, height);
            state.update_child(buf, bounds, root);
            report.reruns += 1;
        }
        report
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(FrameConfig::default())
    }
}
