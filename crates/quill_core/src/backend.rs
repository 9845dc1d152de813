//! Input side of the state, written by the platform shim

use std::ops::{Deref, DerefMut};
use std::time::Instant;

use quill_paint::{Point, Rect};

use crate::input::{Cursor, Key, Modifiers, MouseButtons};
use crate::state::State;

/// [`State`] plus the operations only the platform shim may perform
#[derive(Debug, Default)]
pub struct BackendState {
    state: State,
    last: Option<Instant>,
}

impl BackendState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Clear the per-update input before collecting new events
    ///
    /// A Tab that nobody consumed still moves focus on. A finished drop ends
    /// the drag gesture.
    pub fn reset_events(&mut self) {
        let s = &mut self.state;
        s.scroll = Point::ZERO;
        s.visible = Rect::ZERO;
        s.text_input.clear();
        if s.key_presses.contains(&Key::TAB) {
            s.focus_next = true;
        }
        s.key_presses.clear();
        s.clicks = 0;
        s.click_buttons = MouseButtons::NONE;
        s.edits.clear();
        if s.drop {
            s.drag = None;
            s.drop = false;
        }
        s.time = 0.0;
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.state.modifiers = modifiers;
    }

    pub fn set_mouse_position(&mut self, x: i32, y: i32) {
        self.state.mouse_pos = Point::new(x, y);
    }

    pub fn set_mouse_buttons(&mut self, buttons: MouseButtons) {
        self.state.mouse_buttons = buttons;
    }

    pub fn set_mouse_clicks(&mut self, clicks: u32) {
        self.state.clicks = clicks;
    }

    /// Whether the mouse is inside the window
    pub fn set_hovered(&mut self, hovered: bool) {
        self.state.hovered = hovered;
    }

    pub fn add_scroll(&mut self, x: i32, y: i32) {
        self.state.scroll += Point::new(x, y);
    }

    pub fn add_key_press(&mut self, key: Key) {
        self.state.key_presses.push(key);
    }

    pub fn add_text_input(&mut self, text: &str) {
        self.state.text_input.push_str(text);
    }

    pub fn set_blink(&mut self, blink: bool) {
        self.state.blink = blink;
    }

    pub fn set_window_size(&mut self, w: i32, h: i32) {
        self.state.window_size = Rect::wh(w, h);
    }

    /// Give the mouse grab to the component under the mouse
    pub fn grab_mouse(&mut self) {
        self.state.grabbed = self.state.hovered_widget;
    }

    /// End the grab; `buttons` count as clicked if released over the grabbing component
    pub fn release_mouse(&mut self, buttons: MouseButtons) {
        let s = &mut self.state;
        if s.grabbed == s.hovered_widget {
            s.click_buttons = buttons;
        }
        s.grabbed = None;
        if s.drag.is_some() {
            s.drop = true;
        }
    }

    /// Clear the requests of the previous frame
    pub fn reset_requests(&mut self) {
        self.reset_requests_at(Instant::now());
    }

    /// [`BackendState::reset_requests`] with an explicit clock
    ///
    /// The animation time is only measured if the previous frame asked for animation.
    pub fn reset_requests_at(&mut self, now: Instant) {
        let s = &mut self.state;
        if s.animation {
            if let Some(last) = self.last {
                s.time = now.saturating_duration_since(last).as_secs_f32();
            }
        }
        self.last = Some(now);
        s.update = false;
        s.animation = false;
        s.refocus = false;
        s.cursor = Cursor::Normal;
    }

    pub fn cursor(&self) -> Cursor {
        self.state.cursor
    }

    pub fn window_title(&self) -> &str {
        &self.state.window_title
    }

    /// An update was requested, or a focus change is still pending
    pub fn update_requested(&self) -> bool {
        self.state.update || self.state.focus_next
    }

    pub fn animation_requested(&self) -> bool {
        self.state.animation
    }

    pub fn refocus_requested(&self) -> bool {
        self.state.refocus
    }

    pub fn quit_requested(&self) -> bool {
        self.state.quit
    }

    pub(crate) fn clear_update(&mut self) {
        self.state.update = false;
    }
}

impl Deref for BackendState {
    type Target = State;

    fn deref(&self) -> &State {
        &self.state
    }
}

impl DerefMut for BackendState {
    fn deref_mut(&mut self) -> &mut State {
        &mut self.state
    }
}
