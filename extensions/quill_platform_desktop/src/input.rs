//! winit input to Quill input

use quill_core::{Key, Modifiers, MouseButtons};
use winit::event::{MouseButton, MouseScrollDelta};
use winit::keyboard::{KeyCode, ModifiersState};

/// Pixels of trackpad scrolling that make one wheel step
pub const PIXELS_PER_STEP: f64 = 45.0;

pub fn convert_key(code: KeyCode) -> Key {
    match code {
        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,
        KeyCode::Digit0 | KeyCode::Numpad0 => Key::KEY_0,
        KeyCode::Digit1 | KeyCode::Numpad1 => Key::KEY_1,
        KeyCode::Digit2 | KeyCode::Numpad2 => Key::KEY_2,
        KeyCode::Digit3 | KeyCode::Numpad3 => Key::KEY_3,
        KeyCode::Digit4 | KeyCode::Numpad4 => Key::KEY_4,
        KeyCode::Digit5 | KeyCode::Numpad5 => Key::KEY_5,
        KeyCode::Digit6 | KeyCode::Numpad6 => Key::KEY_6,
        KeyCode::Digit7 | KeyCode::Numpad7 => Key::KEY_7,
        KeyCode::Digit8 | KeyCode::Numpad8 => Key::KEY_8,
        KeyCode::Digit9 | KeyCode::Numpad9 => Key::KEY_9,
        KeyCode::Backspace => Key::BACKSPACE,
        KeyCode::Tab => Key::TAB,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::ENTER,
        KeyCode::Escape => Key::ESCAPE,
        KeyCode::Space => Key::SPACE,
        KeyCode::Delete => Key::DELETE,
        KeyCode::Insert => Key::INSERT,
        KeyCode::ArrowLeft => Key::LEFT,
        KeyCode::ArrowUp => Key::UP,
        KeyCode::ArrowRight => Key::RIGHT,
        KeyCode::ArrowDown => Key::DOWN,
        KeyCode::Home => Key::HOME,
        KeyCode::End => Key::END,
        KeyCode::PageUp => Key::PAGE_UP,
        KeyCode::PageDown => Key::PAGE_DOWN,
        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,
        _ => Key::UNKNOWN,
    }
}

pub fn convert_modifiers(state: ModifiersState) -> Modifiers {
    let mut m = Modifiers::NONE;
    if state.shift_key() {
        m |= Modifiers::SHIFT;
    }
    if state.control_key() {
        m |= Modifiers::CONTROL;
    }
    if state.alt_key() {
        m |= Modifiers::ALT;
    }
    if state.super_key() {
        m |= Modifiers::SUPER;
    }
    m
}

pub fn convert_button(button: MouseButton) -> Option<MouseButtons> {
    match button {
        MouseButton::Left => Some(MouseButtons::LEFT),
        MouseButton::Right => Some(MouseButtons::RIGHT),
        MouseButton::Middle => Some(MouseButtons::MIDDLE),
        MouseButton::Back => Some(MouseButtons::BACK),
        MouseButton::Forward => Some(MouseButtons::FORWARD),
        MouseButton::Other(_) => None,
    }
}

/// Text a key press typed, without control characters
///
/// Keys pressed together with Control or Super are shortcuts, not typing.
pub fn typed_text(text: Option<&str>, modifiers: ModifiersState) -> Option<String> {
    if modifiers.control_key() || modifiers.super_key() {
        return None;
    }
    let text: String = text?.chars().filter(|c| !c.is_control()).collect();
    (!text.is_empty()).then_some(text)
}

/// Turns wheel and trackpad deltas into whole scroll steps
#[derive(Debug, Default)]
pub struct ScrollAccumulator {
    x: f64,
    y: f64,
}

impl ScrollAccumulator {
    /// Add a delta and take the whole steps collected so far
    pub fn add(&mut self, delta: MouseScrollDelta) -> (i32, i32) {
        match delta {
            MouseScrollDelta::LineDelta(x, y) => {
                self.x += x as f64;
                self.y += y as f64;
            }
            MouseScrollDelta::PixelDelta(pos) => {
                self.x += pos.x / PIXELS_PER_STEP;
                self.y += pos.y / PIXELS_PER_STEP;
            }
        }
        let steps = (self.x.trunc(), self.y.trunc());
        self.x -= steps.0;
        self.y -= steps.1;
        (steps.0 as i32, steps.1 as i32)
    }
}
