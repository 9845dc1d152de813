//! Application-wide keyboard shortcuts

use crate::component::EditCommand;
use crate::input::{Key, Modifiers};
use crate::state::State;

/// Handle the standard shortcuts without consuming any key presses
///
/// Ctrl+A, Ctrl+X, Ctrl+C and Ctrl+V are sent to the focused component if
/// it is [`crate::Editable`]. Escape closes all popups. Usually called from
/// the frame driver's update hook.
pub fn handle_keyboard_shortcuts(state: &mut State) {
    let control = state.has_modifiers(Modifiers::CONTROL);
    let keys = state.peek_key_presses().to_vec();
    for key in keys {
        if control {
            let edit = match key {
                Key::A => EditCommand::SelectAll,
                Key::X => EditCommand::Cut,
                Key::C => EditCommand::Copy,
                Key::V => EditCommand::Paste,
                _ => continue,
            };
            state.request_edit(edit);
        } else if key == Key::ESCAPE {
            state.close_popups();
        }
    }
}
