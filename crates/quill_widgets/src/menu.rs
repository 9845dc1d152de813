//! Menu bar, drop-down menus and menu items
//!
//! A [`Menu`] opens its items in a popup when it is pressed, or when the
//! mouse moves over it while another popup is open. Menus at the same level
//! share one open slot, so opening a menu closes its open sibling together
//! with everything that sibling had opened. A [`MenuBar`] also opens a
//! transparent copy of itself as a popup, which keeps the bar interactive
//! while its menus are open.
//!
//! ```rust,ignore
//! let bar = MenuBar::new()
//!     .menu(Menu::new("File").item("Quit", |s| s.quit()))
//!     .menu(
//!         Menu::new("Edit")
//!             .item_icon("copy", "Copy", |s| s.request_edit(EditCommand::Copy))
//!             .submenu(Menu::new("More").item("Select all", |s| s.request_edit(EditCommand::SelectAll))),
//!     );
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use quill_core::{Component, Key, MouseButtons, PopupHandle, State, WidgetId};
use quill_paint::{Buffer, FontLookup, Point, Rect};
use quill_text::TextLabel;
use quill_theme::{default_theme, ColorToken, FontToken, Theme};

/// Gap between icon and text
const ICON_GAP: i32 = 4;

/// Callback run when a menu item is chosen
pub type MenuAction = Box<dyn FnMut(&mut State)>;

type Items = Rc<RefCell<Vec<Box<dyn Component>>>>;

/// Payload of a press that started on a menu
///
/// Releasing it over an item chooses that item.
struct MenuDrag;

struct OpenMenu {
    /// Position among the menus sharing the slot
    index: usize,
    popup: PopupHandle,
    /// Slot of the submenus in the open popup
    children: MenuSlot,
}

/// The open menu among a set of siblings
#[derive(Clone, Default)]
struct MenuSlot(Rc<RefCell<Option<OpenMenu>>>);

impl MenuSlot {
    /// Replace the open menu, closing the previous one and its open submenus
    fn set_open(&self, open: Option<OpenMenu>) {
        let previous = self.0.replace(open);
        if let Some(previous) = previous {
            previous.popup.close();
            previous.children.close();
        }
    }

    fn close(&self) {
        self.set_open(None);
    }

    fn open_index(&self) -> Option<usize> {
        self.0
            .borrow()
            .as_ref()
            .filter(|m| !m.popup.is_closed())
            .map(|m| m.index)
    }

    fn is_open(&self) -> bool {
        self.open_index().is_some()
    }
}

fn is_open(popup: &Option<PopupHandle>) -> bool {
    popup.as_ref().is_some_and(|p| !p.is_closed())
}

fn focus(state: &mut State, id: WidgetId) {
    if state.keyboard_focus() != Some(id) {
        state.set_keyboard_focus(id);
    }
}

/// An entry of a [`Menu`]
///
/// Chosen by releasing a menu press over it, or by Space or Enter while it
/// has keyboard focus. Choosing an item closes all popups before its action
/// runs.
pub struct MenuItem {
    id: WidgetId,
    theme: Arc<Theme>,
    text: String,
    icon: String,
    action: Option<MenuAction>,
    label: TextLabel,
    /// Menu that owns the item
    parent: WidgetId,
    siblings: MenuSlot,
}

impl MenuItem {
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Component for MenuItem {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn preferred_size(&self, fonts: &dyn FontLookup) -> (i32, i32) {
        let font = self.theme.font(FontToken::Text);
        let (w, h) = TextLabel::new().size_icon(&self.text, &font, &self.icon, ICON_GAP, fonts);
        (w + 10, h + 6)
    }

    fn update(&mut self, buf: &mut Buffer, state: &mut State) {
        let (w, h) = buf.size();
        let mut chosen = false;
        if state.is_hovered() {
            focus(state, self.id);
            let dragged = state
                .dragged_content()
                .map(|(payload, drop)| (payload.is::<MenuDrag>(), drop));
            match dragged {
                None if state.mouse_button_down(MouseButtons::LEFT) => state.initiate_drag(MenuDrag),
                Some((true, true)) => chosen = true,
                _ => {}
            }
        }

        if state.has_keyboard_focus() {
            self.siblings.close();
            buf.fill(Rect::wh(w, h), self.theme.color(ColorToken::Selection));
            for key in state.key_presses() {
                match key {
                    Key::DOWN => state.focus_next(),
                    Key::UP => state.focus_previous(),
                    Key::LEFT => state.set_keyboard_focus(self.parent),
                    Key::SPACE | Key::ENTER => chosen = true,
                    _ => {}
                }
            }
        }

        if chosen {
            state.close_popups();
            if let Some(action) = self.action.as_mut() {
                action(state);
            }
        }

        self.label.draw_left_icon(
            buf,
            Rect::xyxy(5, 0, w - 5, h),
            &self.text,
            &self.theme.font(FontToken::Text),
            self.theme.color(ColorToken::Text),
            &self.icon,
            ICON_GAP,
        );
    }

    fn set_theme(&mut self, theme: &Arc<Theme>) {
        self.theme = Arc::clone(theme);
    }
}

/// Popup background holding the items of an open menu
struct MenuPopup {
    id: WidgetId,
    theme: Arc<Theme>,
    items: Items,
}

impl Component for MenuPopup {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn preferred_size(&self, fonts: &dyn FontLookup) -> (i32, i32) {
        let (w, h) = self.items.borrow().iter().fold((0, 0), |(w, h), item| {
            let (iw, ih) = item.preferred_size(fonts);
            (w.max(iw), h + ih)
        });
        (w + 6, h + 6)
    }

    fn update(&mut self, buf: &mut Buffer, state: &mut State) {
        let (w, h) = buf.size();
        buf.shadow(Rect::xyxy(3, 3, w - 3, h - 3), self.theme.color(ColorToken::Shadow), 4);
        let inner = Rect::xyxy(3, 1, w - 3, h - 5);
        buf.fill(inner, self.theme.color(ColorToken::Background));
        let mut y = inner.min.y;
        for item in self.items.borrow_mut().iter_mut() {
            let (_, ih) = item.preferred_size(buf.fonts());
            state.update_child(buf, Rect::xywh(inner.min.x, y, inner.width(), ih), item);
            y += ih;
        }
    }

    fn set_theme(&mut self, theme: &Arc<Theme>) {
        self.theme = Arc::clone(theme);
        for item in self.items.borrow_mut().iter_mut() {
            item.set_theme(theme);
        }
    }
}

/// A titled list of items and submenus
///
/// In a [`MenuBar`] the items drop down below the title; a submenu opens
/// them to its right. Arrow keys move between items, Right enters a
/// submenu and Left returns to the menu that owns it.
pub struct Menu {
    id: WidgetId,
    theme: Arc<Theme>,
    text: String,
    label: TextLabel,
    items: Items,
    /// Open state of this menu's submenus
    children: MenuSlot,
    /// Open state shared with the sibling menus
    siblings: MenuSlot,
    index: usize,
    parent: Option<WidgetId>,
    in_bar: bool,
    popup: Option<PopupHandle>,
}

impl Menu {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: WidgetId::new(),
            theme: default_theme(),
            text: text.into(),
            label: TextLabel::new(),
            items: Rc::default(),
            children: MenuSlot::default(),
            siblings: MenuSlot::default(),
            index: 0,
            parent: None,
            in_bar: false,
            popup: None,
        }
    }

    /// Append an item
    pub fn item(self, text: impl Into<String>, action: impl FnMut(&mut State) + 'static) -> Self {
        self.item_icon("", text, action)
    }

    /// Append an item with an icon left of the text
    pub fn item_icon(
        self,
        icon: impl Into<String>,
        text: impl Into<String>,
        action: impl FnMut(&mut State) + 'static,
    ) -> Self {
        let item = MenuItem {
            id: WidgetId::new(),
            theme: Arc::clone(&self.theme),
            text: text.into(),
            icon: icon.into(),
            action: Some(Box::new(action)),
            label: TextLabel::new(),
            parent: self.id,
            siblings: self.children.clone(),
        };
        self.items.borrow_mut().push(Box::new(item));
        self
    }

    /// Append a menu that opens to the right of this one
    pub fn submenu(self, mut menu: Menu) -> Self {
        let index = self.items.borrow().len();
        menu.attach(self.children.clone(), index, Some(self.id), false);
        self.items.borrow_mut().push(Box::new(menu));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Check whether this menu's popup is showing
    pub fn is_open(&self) -> bool {
        is_open(&self.popup)
    }

    fn attach(&mut self, siblings: MenuSlot, index: usize, parent: Option<WidgetId>, in_bar: bool) {
        self.siblings = siblings;
        self.index = index;
        self.parent = parent;
        self.in_bar = in_bar;
    }

    fn new_popup(&self) -> MenuPopup {
        MenuPopup {
            id: WidgetId::new(),
            theme: Arc::clone(&self.theme),
            items: Rc::clone(&self.items),
        }
    }

    /// Open the items as a context menu with a corner at `at`
    ///
    /// `at` is relative to the current component. The popup extends down and
    /// to the right unless that leaves the window, in which case it flips
    /// up or to the left.
    pub fn open_at(&mut self, state: &mut State, at: Point, fonts: &dyn FontLookup) {
        let popup = self.new_popup();
        let (w, h) = popup.preferred_size(fonts);
        let window = state.window_bounds();
        let fits = |r: Rect| window.intersect(r) == r;
        let bounds = [(w, h), (w, -h), (-w, h)]
            .into_iter()
            .map(|(w, h)| Rect::xywh(at.x, at.y, w, h))
            .find(|&r| fits(r))
            .unwrap_or(Rect::xywh(at.x, at.y, -w, -h));
        self.children.close();
        self.popup = Some(state.open_popup(bounds, Box::new(popup)));
    }

    fn handle_keys(&mut self, state: &mut State) {
        for key in state.key_presses() {
            match key {
                Key::DOWN => state.focus_next(),
                Key::UP => state.focus_previous(),
                Key::RIGHT => {
                    let first = self.items.borrow().first().map(|item| item.id());
                    if let Some(first) = first {
                        state.set_keyboard_focus(first);
                    }
                }
                Key::LEFT => {
                    if let Some(parent) = self.parent {
                        state.set_keyboard_focus(parent);
                    }
                }
                _ => {}
            }
        }
    }
}

impl Component for Menu {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn preferred_size(&self, fonts: &dyn FontLookup) -> (i32, i32) {
        let font = self.theme.font(FontToken::Text);
        let (w, h) = TextLabel::new().size(&self.text, &font, fonts);
        if self.in_bar {
            (w + 10, h + 6)
        } else {
            // room for the arrow
            (w + h + 10, h + 6)
        }
    }

    fn update(&mut self, buf: &mut Buffer, state: &mut State) {
        let (w, h) = buf.size();
        let submenu = !self.in_bar;
        if submenu && state.has_keyboard_focus() {
            self.handle_keys(state);
        }

        let hovered = state.is_hovered();
        let mut open = hovered && state.has_popups();
        if hovered {
            buf.fill(Rect::wh(w, h), self.theme.color(ColorToken::ButtonHovered));
            if state.mouse_button_down(MouseButtons::LEFT) {
                state.initiate_drag(MenuDrag);
                open = true;
            }
        }
        if submenu && state.has_keyboard_focus() {
            open = true;
        }

        if open {
            if !self.is_open() {
                let popup = self.new_popup();
                let (mw, mh) = popup.preferred_size(buf.fonts());
                let bounds = if submenu {
                    Rect::xywh(w - 3, -1, mw, mh)
                } else {
                    Rect::xywh(-3, h - 1, mw, mh)
                };
                let handle = state.open_popup(bounds, Box::new(popup));
                self.siblings.set_open(Some(OpenMenu {
                    index: self.index,
                    popup: handle.clone(),
                    children: self.children.clone(),
                }));
                self.popup = Some(handle);
                state.set_keyboard_focus(self.id);
                tracing::trace!("Menu {:?} opened", self.text);
            }
            if self.children.is_open() {
                self.children.close();
                focus(state, self.id);
            }
        }

        if submenu && self.is_open() {
            buf.fill(Rect::wh(w, h), self.theme.color(ColorToken::Selection));
        }
        let font = self.theme.font(FontToken::Text);
        let color = self.theme.color(ColorToken::Text);
        self.label.draw_left(buf, Rect::xyxy(5, 0, w - 5, h), &self.text, &font, color);
        if submenu {
            let (_, th) = self.label.size(&self.text, &font, buf.fonts());
            let y = (h - th) / 2;
            buf.icon(Rect::xywh(w - th - 5, y, th, th), "right", color);
        }
    }

    fn set_theme(&mut self, theme: &Arc<Theme>) {
        self.theme = Arc::clone(theme);
        for item in self.items.borrow_mut().iter_mut() {
            item.set_theme(theme);
        }
    }
}

struct BarMenus {
    theme: Arc<Theme>,
    menus: Vec<Menu>,
    open: MenuSlot,
    overlay: Option<PopupHandle>,
    overlay_id: WidgetId,
}

/// Horizontal row of [`Menu`] titles
pub struct MenuBar {
    id: WidgetId,
    bar: Rc<RefCell<BarMenus>>,
}

/// The bar again, as a popup over itself while a menu is open
struct MenuBarOverlay {
    id: WidgetId,
    bar: Rc<RefCell<BarMenus>>,
}

impl MenuBar {
    pub fn new() -> Self {
        Self {
            id: WidgetId::new(),
            bar: Rc::new(RefCell::new(BarMenus {
                theme: default_theme(),
                menus: Vec::new(),
                open: MenuSlot::default(),
                overlay: None,
                overlay_id: WidgetId::new(),
            })),
        }
    }

    /// Append a menu title
    pub fn menu(self, mut menu: Menu) -> Self {
        {
            let mut bar = self.bar.borrow_mut();
            let index = bar.menus.len();
            menu.attach(bar.open.clone(), index, None, true);
            bar.menus.push(menu);
        }
        self
    }

    /// Index of the menu whose popup is showing
    pub fn open_menu(&self) -> Option<usize> {
        self.bar.borrow().open.open_index()
    }
}

impl Default for MenuBar {
    fn default() -> Self {
        Self::new()
    }
}

fn bar_size(bar: &RefCell<BarMenus>, fonts: &dyn FontLookup) -> (i32, i32) {
    bar.borrow().menus.iter().fold((0, 0), |(w, h), menu| {
        let (mw, mh) = menu.preferred_size(fonts);
        (w + mw, h.max(mh))
    })
}

fn update_bar(bar: &Rc<RefCell<BarMenus>>, buf: &mut Buffer, state: &mut State) {
    let (w, h) = buf.size();
    let mut guard = bar.borrow_mut();
    let menus = &mut *guard;
    buf.fill(Rect::wh(w, h), menus.theme.color(ColorToken::AltBackground));
    let mut x = 0;
    for menu in menus.menus.iter_mut() {
        let (mw, _) = menu.preferred_size(buf.fonts());
        state.update_child(buf, Rect::xywh(x, 0, mw, h), menu);
        x += mw;
    }

    if menus.open.is_open() && !is_open(&menus.overlay) {
        let overlay = MenuBarOverlay {
            id: menus.overlay_id,
            bar: Rc::clone(bar),
        };
        let focused = state.keyboard_focus();
        menus.overlay = Some(state.open_popup(Rect::wh(w, h), Box::new(overlay)));
        if let Some(id) = focused {
            state.set_keyboard_focus(id);
        }
    }
    if state.mouse_click(MouseButtons::LEFT) {
        state.close_popups();
    }
}

fn set_bar_theme(bar: &RefCell<BarMenus>, theme: &Arc<Theme>) {
    let mut bar = bar.borrow_mut();
    bar.theme = Arc::clone(theme);
    for menu in &mut bar.menus {
        menu.set_theme(theme);
    }
}

impl Component for MenuBar {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn preferred_size(&self, fonts: &dyn FontLookup) -> (i32, i32) {
        bar_size(&self.bar, fonts)
    }

    fn update(&mut self, buf: &mut Buffer, state: &mut State) {
        update_bar(&self.bar, buf, state);
    }

    fn set_theme(&mut self, theme: &Arc<Theme>) {
        set_bar_theme(&self.bar, theme);
    }
}

impl Component for MenuBarOverlay {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn preferred_size(&self, fonts: &dyn FontLookup) -> (i32, i32) {
        bar_size(&self.bar, fonts)
    }

    fn update(&mut self, buf: &mut Buffer, state: &mut State) {
        update_bar(&self.bar, buf, state);
    }

    fn set_theme(&mut self, theme: &Arc<Theme>) {
        set_bar_theme(&self.bar, theme);
    }
}
