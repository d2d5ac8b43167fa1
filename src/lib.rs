//! winclock library surface
//!
//! The binary lives in main.rs; the pure modules (clock geometry,
//! colors, config) are exposed here so tests run without Windows
//! dependencies. The platform layer only builds on Windows.

// Include the log module so the log! macro works
#[macro_use]
pub mod log;

pub mod clock;
pub mod color;
pub mod config;

#[cfg(target_os = "windows")]
pub mod app;
#[cfg(target_os = "windows")]
pub mod platform;
