//! The component contract

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use quill_paint::{Buffer, FontLookup};
use quill_theme::Theme;

use crate::state::State;

/// Identity of a component across frames
///
/// The state machine remembers which component is grabbed, focused or
/// hovered by id, so a component must keep the same id for its whole life.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

impl WidgetId {
    /// Allocate a fresh, process-unique id
    pub fn new() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        WidgetId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl Default for WidgetId {
    fn default() -> Self {
        Self::new()
    }
}

/// A node of the UI tree
///
/// `update` runs once per traversal. It reads input through the [`State`],
/// draws into the [`Buffer`] in its own coordinate space, and visits its
/// children with [`State::update_child`] or [`State::draw_child`].
pub trait Component {
    fn id(&self) -> WidgetId;

    /// Preferred `(width, height)` in pixels
    fn preferred_size(&self, fonts: &dyn FontLookup) -> (i32, i32);

    fn update(&mut self, buf: &mut Buffer, state: &mut State);

    /// Rebind the theme of this component and its children
    fn set_theme(&mut self, _theme: &Arc<Theme>) {}

    /// Clipboard and selection capability, if the component has one
    fn as_editable(&mut self) -> Option<&mut dyn Editable> {
        None
    }
}

impl<C: Component + ?Sized> Component for Box<C> {
    fn id(&self) -> WidgetId {
        (**self).id()
    }

    fn preferred_size(&self, fonts: &dyn FontLookup) -> (i32, i32) {
        (**self).preferred_size(fonts)
    }

    fn update(&mut self, buf: &mut Buffer, state: &mut State) {
        (**self).update(buf, state)
    }

    fn set_theme(&mut self, theme: &Arc<Theme>) {
        (**self).set_theme(theme)
    }

    fn as_editable(&mut self) -> Option<&mut dyn Editable> {
        (**self).as_editable()
    }
}

/// Components that hold a text selection
///
/// Keyboard shortcuts reach the focused component through this trait.
pub trait Editable {
    fn select_all(&mut self, state: &mut State);
    fn cut(&mut self, state: &mut State);
    fn copy(&mut self, state: &mut State);
    fn paste(&mut self, state: &mut State);
}

/// A queued [`Editable`] operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditCommand {
    SelectAll,
    Cut,
    Copy,
    Paste,
}

impl EditCommand {
    pub(crate) fn apply(self, target: &mut dyn Editable, state: &mut State) {
        match self {
            EditCommand::SelectAll => target.select_all(state),
            EditCommand::Cut => target.cut(state),
            EditCommand::Copy => target.copy(state),
            EditCommand::Paste => target.paste(state),
        }
    }
}
