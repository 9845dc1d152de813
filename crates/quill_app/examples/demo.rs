//! Widget gallery
//!
//! Run with `cargo run -p quill_app --example demo`. Reads `quill.toml`
//! from the working directory when present.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use quill_app::{init_logging, App, AppConfig};
use quill_core::State;
use quill_widgets::{
    show_confirm_dialog, show_input_dialog, show_message_dialog, Bar, BarFill, Button, CheckBox,
    Container, Frame, Label, Menu, MenuBar, Root, ScrollView, Separator, Stack, TextField,
};

fn gallery() -> Stack {
    let mut list = Stack::new()
        .child(Label::new("Name"))
        .child(TextField::new().with_text("Quill").min_width(200))
        .child(CheckBox::new("Long title").on_change(|state, checked| {
            tracing::info!("Long title: {}", checked);
            state.set_window_title(if checked { "Quill widget gallery" } else { "Quill" });
        }))
        .child(Separator::new(0, 8));
    for i in 1..=20 {
        list = list.child(Label::new(format!("Row {}", i)));
    }
    list
}

fn buttons() -> Bar {
    Bar::new(BarFill::Right)
        .child(Button::new("About").icon("info").on_click(|state: &mut State| {
            show_message_dialog(state, "About", "A small immediate mode toolkit.", "Close")
        }))
        .child(Button::new("Rename").on_click(|state: &mut State| {
            show_input_dialog(state, "Rename", "New window title:", "OK", "Cancel", |state, text| {
                state.set_window_title(text)
            })
        }))
        .child(Button::new("Quit").on_click(|state: &mut State| {
            show_confirm_dialog(state, "Quit", "Really quit?", "Quit", "Stay", State::quit)
        }))
}

fn menus() -> MenuBar {
    MenuBar::new()
        .menu(
            Menu::new("File")
                .item("Rename", |state: &mut State| {
                    show_input_dialog(state, "Rename", "New window title:", "OK", "Cancel", |state, text| {
                        state.set_window_title(text)
                    })
                })
                .submenu(
                    Menu::new("Title")
                        .item("Short", |state: &mut State| state.set_window_title("Quill"))
                        .item("Long", |state: &mut State| state.set_window_title("Quill widget gallery")),
                )
                .item_icon("close", "Quit", State::quit),
        )
        .menu(Menu::new("Help").item_icon("info", "About", |state: &mut State| {
            show_message_dialog(state, "About", "A small immediate mode toolkit.", "Close")
        }))
}

fn main() -> anyhow::Result<()> {
    let mut config = if Path::new("quill.toml").exists() {
        AppConfig::load("quill.toml")?
    } else {
        let mut config = AppConfig::default();
        config.apply_env();
        config
    };
    init_logging(&config.log_filter);
    config.window.title = "Quill".to_string();

    let content = Container::new()
        .top(menus())
        .center(ScrollView::new(gallery()))
        .bottom(buttons());
    let ticks = Arc::new(AtomicUsize::new(0));

    App::new(Root::new(Frame::new("Gallery", content)))
        .with_config(config)
        .on_init(|state| show_message_dialog(state, "Welcome", "Hello from Quill!", "OK"))
        .on_handle(move |handle| {
            thread::spawn(move || loop {
                thread::sleep(Duration::from_secs(10));
                let n = ticks.fetch_add(1, Ordering::Relaxed) + 1;
                let sent = handle.run(move |_| tracing::debug!("Background tick {}", n));
                if sent.is_err() {
                    break;
                }
            });
        })
        .run()?;
    Ok(())
}
