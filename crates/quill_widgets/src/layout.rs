//! Layout containers
//!
//! Children are laid out from their preferred sizes on every update; no
//! layout is cached between frames.

use std::sync::Arc;

use quill_core::{Component, State, WidgetId};
use quill_paint::{Buffer, FontLookup, Rect};
use quill_theme::{default_theme, ColorToken, Theme};
use smallvec::SmallVec;

/// Children stacked top to bottom at their preferred heights, full width
#[derive(Default)]
pub struct Stack {
    id: WidgetId,
    children: Vec<Box<dyn Component>>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children(children: Vec<Box<dyn Component>>) -> Self {
        Self {
            id: WidgetId::new(),
            children,
        }
    }

    /// Append a child
    pub fn child(mut self, child: impl Component + 'static) -> Self {
        self.children.push(Box::new(child));
        self
    }

    pub fn push(&mut self, child: Box<dyn Component>) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[Box<dyn Component>] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Box<dyn Component>] {
        &mut self.children
    }
}

impl Component for Stack {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn preferred_size(&self, fonts: &dyn FontLookup) -> (i32, i32) {
        self.children.iter().fold((0, 0), |(w, h), c| {
            let (cw, ch) = c.preferred_size(fonts);
            (w.max(cw), h + ch)
        })
    }

    fn update(&mut self, buf: &mut Buffer, state: &mut State) {
        let (w, _) = buf.size();
        let mut y = 0;
        for child in &mut self.children {
            let (_, ch) = child.preferred_size(buf.fonts());
            state.update_child(buf, Rect::xywh(0, y, w, ch), child);
            y += ch;
        }
    }

    fn set_theme(&mut self, theme: &Arc<Theme>) {
        for child in &mut self.children {
            child.set_theme(theme);
        }
    }
}

/// Where a [`Bar`] puts its spare width
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BarFill {
    /// Children packed to the left
    #[default]
    None,
    /// Children packed to the right
    Right,
    /// The child at this index takes the spare width
    Child(usize),
}

/// Children side by side at their preferred widths, full height
pub struct Bar {
    id: WidgetId,
    theme: Arc<Theme>,
    fill: BarFill,
    children: Vec<Box<dyn Component>>,
}

impl Bar {
    pub fn new(fill: BarFill) -> Self {
        Self {
            id: WidgetId::new(),
            theme: default_theme(),
            fill,
            children: Vec::new(),
        }
    }

    pub fn child(mut self, child: impl Component + 'static) -> Self {
        self.children.push(Box::new(child));
        self
    }

    pub fn push(&mut self, child: Box<dyn Component>) {
        self.children.push(child);
    }

    pub fn children_mut(&mut self) -> &mut [Box<dyn Component>] {
        &mut self.children
    }

    /// Child rectangles for a bar `w`×`h` pixels large
    fn layout(&self, fonts: &dyn FontLookup, w: i32, h: i32) -> SmallVec<[Rect; 8]> {
        let widths: SmallVec<[i32; 8]> = self
            .children
            .iter()
            .map(|c| c.preferred_size(fonts).0)
            .collect();
        let spare = w - widths.iter().sum::<i32>();
        let mut x = match self.fill {
            BarFill::Right => spare,
            _ => 0,
        };
        widths
            .iter()
            .enumerate()
            .map(|(i, &cw)| {
                let cw = match self.fill {
                    BarFill::Child(f) if f == i => cw + spare,
                    _ => cw,
                };
                let r = Rect::xywh(x, 0, cw, h);
                x += cw;
                r
            })
            .collect()
    }
}

impl Component for Bar {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn preferred_size(&self, fonts: &dyn FontLookup) -> (i32, i32) {
        self.children.iter().fold((0, 0), |(w, h), c| {
            let (cw, ch) = c.preferred_size(fonts);
            (w + cw, h.max(ch))
        })
    }

    fn update(&mut self, buf: &mut Buffer, state: &mut State) {
        let (w, h) = buf.size();
        buf.fill(Rect::wh(w, h), self.theme.color(ColorToken::AltBackground));
        let rects = self.layout(buf.fonts(), w, h);
        for (child, r) in self.children.iter_mut().zip(rects) {
            state.update_child(buf, r, child);
        }
    }

    fn set_theme(&mut self, theme: &Arc<Theme>) {
        self.theme = Arc::clone(theme);
        for child in &mut self.children {
            child.set_theme(theme);
        }
    }
}

/// A center child surrounded by optional edge children
///
/// Top and bottom span the full width at their preferred heights; left and
/// right take their preferred widths between them. The center gets the rest.
#[derive(Default)]
pub struct Container {
    id: WidgetId,
    pub center: Option<Box<dyn Component>>,
    pub top: Option<Box<dyn Component>>,
    pub bottom: Option<Box<dyn Component>>,
    pub left: Option<Box<dyn Component>>,
    pub right: Option<Box<dyn Component>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn center(mut self, c: impl Component + 'static) -> Self {
        self.center = Some(Box::new(c));
        self
    }

    pub fn top(mut self, c: impl Component + 'static) -> Self {
        self.top = Some(Box::new(c));
        self
    }

    pub fn bottom(mut self, c: impl Component + 'static) -> Self {
        self.bottom = Some(Box::new(c));
        self
    }

    pub fn left(mut self, c: impl Component + 'static) -> Self {
        self.left = Some(Box::new(c));
        self
    }

    pub fn right(mut self, c: impl Component + 'static) -> Self {
        self.right = Some(Box::new(c));
        self
    }

    fn children_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Component>> {
        [
            &mut self.top,
            &mut self.left,
            &mut self.center,
            &mut self.right,
            &mut self.bottom,
        ]
        .into_iter()
        .flatten()
    }
}

impl Component for Container {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn preferred_size(&self, fonts: &dyn FontLookup) -> (i32, i32) {
        let size = |c: &Option<Box<dyn Component>>| {
            c.as_ref().map_or((0, 0), |c| c.preferred_size(fonts))
        };
        let (mut w, mut h) = size(&self.center);
        for side in [&self.left, &self.right] {
            let (cw, ch) = size(side);
            w += cw;
            h = h.max(ch);
        }
        for side in [&self.top, &self.bottom] {
            let (cw, ch) = size(side);
            w = w.max(cw);
            h += ch;
        }
        (w, h)
    }

    fn update(&mut self, buf: &mut Buffer, state: &mut State) {
        let (mut w, mut h) = buf.size();
        let (mut x, mut y) = (0, 0);

        if let Some(top) = self.top.as_mut() {
            let ch = top.preferred_size(buf.fonts()).1.min(h);
            state.update_child(buf, Rect::xywh(x, y, w, ch), top);
            y += ch;
            h -= ch;
        }
        let mut bottom = Rect::ZERO;
        if let Some(c) = self.bottom.as_ref() {
            let ch = c.preferred_size(buf.fonts()).1.min(h);
            bottom = Rect::xywh(x, y + h - ch, w, ch);
            h -= ch;
        }
        if let Some(left) = self.left.as_mut() {
            let cw = left.preferred_size(buf.fonts()).0.min(w);
            state.update_child(buf, Rect::xywh(x, y, cw, h), left);
            x += cw;
            w -= cw;
        }
        let mut right = Rect::ZERO;
        if let Some(c) = self.right.as_ref() {
            let cw = c.preferred_size(buf.fonts()).0.min(w);
            right = Rect::xywh(x + w - cw, y, cw, h);
            w -= cw;
        }
        if let Some(center) = self.center.as_mut() {
            state.update_child(buf, Rect::xywh(x, y, w, h), center);
        }
        if let Some(c) = self.right.as_mut() {
            state.update_child(buf, right, c);
        }
        if let Some(c) = self.bottom.as_mut() {
            state.update_child(buf, bottom, c);
        }
    }

    fn set_theme(&mut self, theme: &Arc<Theme>) {
        for child in self.children_mut() {
            child.set_theme(theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Separator;
    use quill_paint::FixedFontLookup;

    fn bar(fill: BarFill) -> Bar {
        Bar::new(fill)
            .child(Separator::new(10, 5))
            .child(Separator::new(20, 8))
            .child(Separator::new(30, 5))
    }

    #[test]
    fn test_bar_preferred_size() {
        assert_eq!(bar(BarFill::None).preferred_size(&FixedFontLookup), (60, 8));
    }

    #[test]
    fn test_bar_fill_modes() {
        let xs = |b: &Bar| -> Vec<(i32, i32)> {
            b.layout(&FixedFontLookup, 100, 10)
                .iter()
                .map(|r| (r.min.x, r.width()))
                .collect()
        };
        assert_eq!(xs(&bar(BarFill::None)), vec![(0, 10), (10, 20), (30, 30)]);
        assert_eq!(xs(&bar(BarFill::Right)), vec![(40, 10), (50, 20), (70, 30)]);
        assert_eq!(xs(&bar(BarFill::Child(1))), vec![(0, 10), (10, 60), (70, 30)]);
    }

    #[test]
    fn test_stack_and_container_sizes() {
        let stack = Stack::new()
            .child(Separator::new(10, 5))
            .child(Separator::new(30, 7));
        assert_eq!(stack.preferred_size(&FixedFontLookup), (30, 12));

        let container = Container::new()
            .center(Separator::new(50, 50))
            .left(Separator::new(10, 60))
            .bottom(Separator::new(80, 10));
        assert_eq!(container.preferred_size(&FixedFontLookup), (80, 70));
    }
}
