//! Quill core runtime
//!
//! The pieces every Quill application shares:
//!
//! - **Components**: the [`Component`] trait and [`WidgetId`] identity
//! - **State**: the per-frame input view threaded through the tree, with
//!   hover, mouse grab, keyboard focus, drag and drop, dialogs and popups
//! - **Frame driver**: one frame of traversal with update re-runs and the
//!   guard against components that request updates forever
//!
//! # Example
//!
//! ```rust,ignore
//! use quill_core::{BackendState, FrameDriver};
//!
//! let mut driver = FrameDriver::default();
//! let mut state = BackendState::new();
//! driver.begin_cycle(&mut state);
//! state.set_mouse_position(10, 10);
//! driver.frame(&mut state, &mut buffer, &mut root, (800, 600), false, Instant::now());
//! ```

pub mod backend;
pub mod callback;
pub mod component;
pub mod driver;
pub mod error;
pub mod input;
pub mod overlay;
pub mod shortcuts;
pub mod state;

pub use backend::BackendState;
pub use callback::{CallbackQueue, UiCallback, UiHandle, Waker};
pub use component::{Component, EditCommand, Editable, WidgetId};
pub use driver::{FrameConfig, FrameDriver, FrameHooks, FrameReport};
pub use error::{CoreError, Result};
pub use input::{Cursor, Key, Modifiers, MouseButtons};
pub use overlay::{DragPayload, OverlayRequest, PopupHandle};
pub use shortcuts::handle_keyboard_shortcuts;
pub use state::{KeyPresses, State};
