//! winclock - a Direct2D analog clock for Windows
//!
//! Draws a clock face with hour/minute/second hands and an elapsed
//! counter, refreshed on a ~10ms timer.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

#[cfg(target_os = "windows")]
use std::cell::RefCell;
#[cfg(target_os = "windows")]
use std::rc::Rc;

#[cfg(target_os = "windows")]
use winclock::app::ClockView;
#[cfg(target_os = "windows")]
use winclock::config::ClockConfig;
#[cfg(target_os = "windows")]
use winclock::platform::win32::{
    enable_dpi_awareness, run_message_loop, show_window, CreateOptions, WindowShell,
};
#[cfg(target_os = "windows")]
use winclock::log;

#[cfg(target_os = "windows")]
fn main() {
    log::init();
    log!("main() starting");

    if let Err(e) = enable_dpi_awareness() {
        log!("Warning: failed to enable DPI awareness: {:?}", e);
    }

    let config = ClockConfig::load();
    log!(
        "Config: {}x{}, tick every {}ms",
        config.width,
        config.height,
        config.tick_ms
    );

    let options = CreateOptions {
        width: config.width,
        height: config.height,
        ..CreateOptions::default()
    };
    let title = config.title.clone();
    let view = Rc::new(RefCell::new(ClockView::new(config)));

    let shell = match WindowShell::create("Clock Window Class", &title, &options, view) {
        Ok(shell) => shell,
        Err(e) => {
            log!("FATAL: failed to create window: {:?}", e);
            return;
        }
    };
    log!("Window created: {:?}", shell.hwnd());

    show_window(shell.hwnd());
    run_message_loop();

    log!("winclock exited normally");
}

#[cfg(not(target_os = "windows"))]
fn main() {
    eprintln!("winclock only runs on Windows");
}
