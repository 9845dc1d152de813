//! Feeding platform input into the backend state

use std::time::{Duration, Instant};

use quill_core::{BackendState, MouseButtons};

use crate::event::InputEvent;

/// Longest pause between presses that still counts as a multi-click
pub const MULTI_CLICK_INTERVAL: Duration = Duration::from_millis(500);

/// How far the mouse may move between presses of a multi-click
pub const MULTI_CLICK_DISTANCE: i32 = 4;

/// Counts consecutive clicks for platforms that do not report them
#[derive(Debug, Default)]
pub struct ClickCounter {
    last: Option<(MouseButtons, (i32, i32), Instant)>,
    count: u32,
}

impl ClickCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a press and return its click count
    pub fn press(&mut self, button: MouseButtons, pos: (i32, i32), now: Instant) -> u32 {
        let repeated = self.last.is_some_and(|(b, p, t)| {
            b == button
                && now.saturating_duration_since(t) <= MULTI_CLICK_INTERVAL
                && (p.0 - pos.0).abs() <= MULTI_CLICK_DISTANCE
                && (p.1 - pos.1).abs() <= MULTI_CLICK_DISTANCE
        });
        self.count = if repeated { self.count + 1 } else { 1 };
        self.last = Some((button, pos, now));
        self.count
    }

    /// Click count reported with the matching release
    pub fn release(&self) -> u32 {
        self.count
    }
}

/// Applies [`InputEvent`]s to a [`BackendState`]
///
/// The first pressed button grabs the mouse for the component under it.
/// The grab ends only when that same button is released, so chords do not
/// move the grab around.
#[derive(Debug, Default)]
pub struct InputRouter {
    buttons: MouseButtons,
    grab: Option<MouseButtons>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buttons currently held down
    pub fn buttons(&self) -> MouseButtons {
        self.buttons
    }

    /// Button holding the mouse grab
    pub fn grab_button(&self) -> Option<MouseButtons> {
        self.grab
    }

    pub fn apply(&mut self, state: &mut BackendState, event: InputEvent) {
        match event {
            InputEvent::MouseMoved { x, y } => state.set_mouse_position(x, y),
            InputEvent::MouseDown { button, clicks } => {
                self.buttons.insert(button);
                state.set_mouse_buttons(self.buttons);
                if self.grab.is_none() {
                    self.grab = Some(button);
                    state.grab_mouse();
                }
                state.set_mouse_clicks(clicks);
            }
            InputEvent::MouseUp { button, clicks } => {
                self.buttons.remove(button);
                state.set_mouse_buttons(self.buttons);
                if self.grab == Some(button) {
                    self.grab = None;
                    state.release_mouse(button);
                }
                state.set_mouse_clicks(clicks);
            }
            InputEvent::Scroll { x, y } => state.add_scroll(x, y),
            InputEvent::Key(key) => state.add_key_press(key),
            InputEvent::Text(text) => state.add_text_input(&text),
            InputEvent::Modifiers(modifiers) => state.set_modifiers(modifiers),
            InputEvent::CursorEntered => state.set_hovered(true),
            InputEvent::CursorLeft => state.set_hovered(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_paint::Point;

    #[test]
    fn test_click_counter_counts_quick_presses_in_place() {
        let mut counter = ClickCounter::new();
        let t0 = Instant::now();
        assert_eq!(counter.press(MouseButtons::LEFT, (10, 10), t0), 1);
        assert_eq!(counter.release(), 1);
        let t1 = t0 + Duration::from_millis(200);
        assert_eq!(counter.press(MouseButtons::LEFT, (12, 9), t1), 2);
        let t2 = t1 + Duration::from_millis(200);
        assert_eq!(counter.press(MouseButtons::LEFT, (12, 9), t2), 3);
        assert_eq!(counter.release(), 3);
    }

    #[test]
    fn test_click_counter_restarts() {
        let mut counter = ClickCounter::new();
        let t0 = Instant::now();
        counter.press(MouseButtons::LEFT, (10, 10), t0);
        assert_eq!(
            counter.press(MouseButtons::LEFT, (10, 10), t0 + Duration::from_secs(1)),
            1,
            "too slow"
        );
        assert_eq!(
            counter.press(MouseButtons::LEFT, (30, 10), t0 + Duration::from_millis(1100)),
            1,
            "moved away"
        );
        assert_eq!(
            counter.press(MouseButtons::RIGHT, (30, 10), t0 + Duration::from_millis(1200)),
            1,
            "other button"
        );
    }

    #[test]
    fn test_first_button_owns_the_grab() {
        let mut router = InputRouter::new();
        let mut state = BackendState::new();
        router.apply(
            &mut state,
            InputEvent::MouseDown {
                button: MouseButtons::LEFT,
                clicks: 1,
            },
        );
        router.apply(
            &mut state,
            InputEvent::MouseDown {
                button: MouseButtons::RIGHT,
                clicks: 1,
            },
        );
        assert_eq!(router.grab_button(), Some(MouseButtons::LEFT));
        assert!(state.mouse_button_down(MouseButtons::LEFT | MouseButtons::RIGHT));

        router.apply(
            &mut state,
            InputEvent::MouseUp {
                button: MouseButtons::RIGHT,
                clicks: 1,
            },
        );
        assert_eq!(router.grab_button(), Some(MouseButtons::LEFT));
        router.apply(
            &mut state,
            InputEvent::MouseUp {
                button: MouseButtons::LEFT,
                clicks: 1,
            },
        );
        assert_eq!(router.grab_button(), None);
        assert_eq!(router.buttons(), MouseButtons::NONE);
    }

    #[test]
    fn test_text_and_keys_accumulate() {
        let mut router = InputRouter::new();
        let mut state = BackendState::new();
        router.apply(&mut state, InputEvent::CursorEntered);
        router.apply(&mut state, InputEvent::Key(quill_core::Key::A));
        router.apply(&mut state, InputEvent::Text("a".into()));
        router.apply(&mut state, InputEvent::Text("b".into()));
        router.apply(&mut state, InputEvent::Scroll { x: 0, y: 1 });
        router.apply(&mut state, InputEvent::Scroll { x: 0, y: 2 });
        assert_eq!(state.peek_key_presses(), &[quill_core::Key::A]);
        assert_eq!(state.scroll(), Point::new(0, 3));

        router.apply(&mut state, InputEvent::CursorLeft);
        assert_eq!(state.scroll(), Point::ZERO, "scrolling needs the mouse in the window");
    }
}
