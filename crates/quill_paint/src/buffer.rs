//! Draw command buffer
//!
//! Components draw into a [`Buffer`] in their own coordinate space. Each
//! [`Buffer::push`] narrows the space to a child rectangle; commands emitted
//! inside it are translated by the rectangle's origin and clipped against the
//! intersection of every enclosing rectangle.
//!
//! Commands are grouped into [`CommandList`]s. A group is closed whenever the
//! coordinate space changes, so each list carries one absolute offset and one
//! clip rectangle, and the renderer never has to re-walk the component tree.

use std::mem;
use std::rc::Rc;

use crate::color::Color;
use crate::command::{Command, CommandList};
use crate::font::{Font, FontLookup};
use crate::geometry::{Point, Rect};
use crate::image::ImageHandle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ClipState {
    /// Absolute clip rectangle
    clip: Rect,
    /// Absolute bounds of the current drawing area
    bounds: Rect,
}

/// Accumulates draw commands for one frame
pub struct Buffer {
    fonts: Rc<dyn FontLookup>,
    lists: Vec<CommandList>,
    pending: Vec<Command>,
    state: ClipState,
    stack: Vec<ClipState>,
}

impl Buffer {
    pub fn new(fonts: Rc<dyn FontLookup>) -> Self {
        Self {
            fonts,
            lists: Vec::new(),
            pending: Vec::new(),
            state: ClipState {
                clip: Rect::ZERO,
                bounds: Rect::ZERO,
            },
            stack: Vec::new(),
        }
    }

    /// Font lookup used to measure text
    pub fn fonts(&self) -> &dyn FontLookup {
        self.fonts.as_ref()
    }

    pub fn fonts_rc(&self) -> Rc<dyn FontLookup> {
        Rc::clone(&self.fonts)
    }

    /// Clear all commands and make the whole `w`×`h` area drawable
    pub fn reset(&mut self, w: i32, h: i32) {
        self.lists.clear();
        self.pending.clear();
        self.stack.clear();
        self.state = ClipState {
            clip: Rect::wh(w, h),
            bounds: Rect::wh(w, h),
        };
    }

    /// Constrain drawing to `r`, relative to the current area
    pub fn push(&mut self, r: Rect) {
        self.flush();
        self.stack.push(self.state);
        let r = r.translate(self.state.bounds.min);
        self.state = ClipState {
            clip: self.state.clip.intersect(r),
            bounds: r,
        };
    }

    /// Undo the most recent [`Buffer::push`]
    pub fn pop(&mut self) {
        self.flush();
        match self.stack.pop() {
            Some(state) => self.state = state,
            None => tracing::warn!("Buffer::pop called without a matching push"),
        }
    }

    /// Size of the current drawing area
    pub fn size(&self) -> (i32, i32) {
        self.state.bounds.size()
    }

    /// Absolute origin of the current drawing area
    pub fn origin(&self) -> Point {
        self.state.bounds.min
    }

    /// Absolute clip rectangle of the current drawing area
    pub fn clip(&self) -> Rect {
        self.state.clip
    }

    /// Number of unmatched pushes
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Append a command in current coordinates
    ///
    /// Does nothing while the clip rectangle is empty.
    pub fn add(&mut self, command: Command) {
        if !self.state.clip.is_empty() {
            self.pending.push(command);
        }
    }

    pub fn fill(&mut self, rect: Rect, color: Color) {
        self.add(Command::Fill { rect, color });
    }

    pub fn outline(&mut self, rect: Rect, color: Color) {
        self.add(Command::Outline { rect, color });
    }

    /// Draw one line of text with its baseline starting at `position`
    pub fn text(&mut self, position: Point, text: &str, font: &Font, color: Color) {
        if text.is_empty() {
            return;
        }
        self.add(Command::Text {
            position,
            text: text.to_owned(),
            font: font.clone(),
            color,
        });
    }

    pub fn shadow(&mut self, rect: Rect, color: Color, radius: i32) {
        self.add(Command::Shadow {
            rect,
            color,
            radius,
        });
    }

    pub fn icon(&mut self, rect: Rect, name: &str, color: Color) {
        if name.is_empty() {
            return;
        }
        self.add(Command::Icon {
            rect,
            name: name.to_owned(),
            color,
        });
    }

    /// Draw an image; set `update` if its pixels may have changed since it was last drawn
    pub fn image(&mut self, rect: Rect, image: &ImageHandle, color: Color, update: bool) {
        self.add(Command::Image {
            rect,
            image: image.clone(),
            color,
            update,
        });
    }

    /// Draw the `source` region of an image
    pub fn sub_image(
        &mut self,
        rect: Rect,
        image: &ImageHandle,
        source: Rect,
        color: Color,
        update: bool,
    ) {
        if source.is_empty() {
            return;
        }
        self.add(Command::SubImage {
            rect,
            image: image.clone(),
            source,
            color,
            update,
        });
    }

    /// Close the pending group and return every command list of the frame
    pub fn finish(&mut self) -> &[CommandList] {
        self.flush();
        &self.lists
    }

    /// Command lists closed so far
    pub fn command_lists(&self) -> &[CommandList] {
        &self.lists
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        self.lists.push(CommandList {
            offset: self.state.bounds.min,
            clip: self.state.clip,
            commands: mem::take(&mut self.pending),
        });
    }
}
