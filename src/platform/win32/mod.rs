//! Win32 platform implementation

pub mod render;
pub mod window;

pub use render::Renderer;
pub use window::{
    begin_paint, enable_dpi_awareness, end_paint, get_client_size, invalidate_window, post_quit,
    run_message_loop, show_window, CreateOptions, WindowHandler, WindowShell,
};
