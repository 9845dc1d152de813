//! Quill widget set
//!
//! A small set of components built on the [`quill_core::Component`]
//! contract. [`Root`] belongs at the top of every tree: it owns the dialog
//! and popups that other components open through the state.
//!
//! ```rust,ignore
//! use quill_widgets::{Bar, BarFill, Button, Root, Stack, TextField};
//!
//! let root = Root::new(
//!     Stack::new()
//!         .child(TextField::new().with_text("hello"))
//!         .child(Bar::new(BarFill::Right).child(Button::new("Quit").on_click(|s| s.quit()))),
//! );
//! ```

pub mod anim;
pub mod button;
pub mod checkbox;
pub mod dialog;
pub mod frame;
pub mod label;
pub mod layout;
pub mod menu;
pub mod root;
pub mod scroll;
pub mod separator;
pub mod text_field;

pub use anim::animate;
pub use button::{Button, ButtonAction};
pub use checkbox::{CheckBox, CheckBoxAction};
pub use dialog::{show_confirm_dialog, show_error_dialog, show_input_dialog, show_message_dialog};
pub use frame::Frame;
pub use label::Label;
pub use layout::{Bar, BarFill, Container, Stack};
pub use menu::{Menu, MenuAction, MenuBar, MenuItem};
pub use root::Root;
pub use scroll::ScrollView;
pub use separator::Separator;
pub use text_field::{TextField, TextFieldAction};
