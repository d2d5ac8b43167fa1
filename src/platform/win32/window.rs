//! Win32 window creation and message dispatch
//!
//! Every window created through [`WindowShell::create`] is driven by a
//! single `wnd_proc` that recovers the owning handler object from a
//! thread-local registry keyed by window handle, instead of stashing a
//! raw pointer in the window's user-data slot. The handler is moved
//! into the registry on `WM_NCCREATE`, before that message is
//! forwarded; messages for windows with no registered handler go to
//! `DefWindowProcW`.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use windows::core::{Error, PCWSTR};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, EndPaint, InvalidateRect, HBRUSH, PAINTSTRUCT,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::HiDpi::{
    SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE,
    DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
};
use windows::Win32::UI::WindowsAndMessaging::*;

/// Per-window message handler, invoked for every message the window
/// receives. Returning `None` means "not handled": the message falls
/// through to default OS handling.
pub trait WindowHandler {
    fn handle_message(
        &mut self,
        hwnd: HWND,
        msg: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> Option<LRESULT>;
}

thread_local! {
    /// Handler for the window currently being created; moved into
    /// HANDLERS when its WM_NCCREATE arrives.
    static PENDING_HANDLER: RefCell<Option<Rc<RefCell<dyn WindowHandler>>>> =
        RefCell::new(None);
    /// Registry of live windows on this thread
    static HANDLERS: RefCell<HashMap<isize, Rc<RefCell<dyn WindowHandler>>>> =
        RefCell::new(HashMap::new());
    /// Window classes already registered with the OS
    static REGISTERED_CLASSES: RefCell<HashSet<String>> = RefCell::new(HashSet::new());
}

fn window_key(hwnd: HWND) -> isize {
    hwnd.0 as isize
}

fn set_pending_handler(handler: Rc<RefCell<dyn WindowHandler>>) {
    PENDING_HANDLER.with(|p| *p.borrow_mut() = Some(handler));
}

fn clear_pending_handler() {
    PENDING_HANDLER.with(|p| p.borrow_mut().take());
}

/// Move the pending handler into the registry under the given window
/// key. Returns whether a handler was pending.
fn associate_pending(key: isize) -> bool {
    let pending = PENDING_HANDLER.with(|p| p.borrow_mut().take());
    match pending {
        Some(handler) => {
            HANDLERS.with(|h| h.borrow_mut().insert(key, handler));
            true
        }
        None => false,
    }
}

fn lookup_handler(key: isize) -> Option<Rc<RefCell<dyn WindowHandler>>> {
    HANDLERS.with(|h| h.borrow().get(&key).cloned())
}

fn remove_handler(key: isize) {
    HANDLERS.with(|h| h.borrow_mut().remove(&key));
}

/// Window procedure shared by every shell-created window
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    // The association must happen before the creation message is
    // forwarded; the windowing API depends on this ordering.
    if msg == WM_NCCREATE {
        associate_pending(window_key(hwnd));
    }

    let result = lookup_handler(window_key(hwnd)).and_then(|handler| {
        // try_borrow_mut: the OS can deliver a message synchronously
        // while the handler is already borrowed (e.g. ShowWindow
        // sending WM_PAINT). Fall back to default handling then.
        match handler.try_borrow_mut() {
            Ok(mut handler) => handler.handle_message(hwnd, msg, wparam, lparam),
            Err(_) => {
                log!("re-entrant dispatch for msg=0x{:04X}, using default", msg);
                None
            }
        }
    });

    if msg == WM_NCDESTROY {
        remove_handler(window_key(hwnd));
    }

    result.unwrap_or_else(|| DefWindowProcW(hwnd, msg, wparam, lparam))
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Register a window class on first use; later calls with the same
/// name are no-ops.
fn register_class_once(class_name: &str) -> Result<(), Error> {
    let already = REGISTERED_CLASSES.with(|r| r.borrow().contains(class_name));
    if already {
        return Ok(());
    }

    let class_wide = wide(class_name);
    unsafe {
        let hinstance = GetModuleHandleW(None)?;

        let wc = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(wnd_proc),
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: hinstance.into(),
            hIcon: HICON::default(),
            hCursor: LoadCursorW(None, IDC_ARROW)?,
            hbrBackground: HBRUSH::default(), // no background brush, we paint everything
            lpszMenuName: PCWSTR::null(),
            lpszClassName: PCWSTR(class_wide.as_ptr()),
            hIconSm: HICON::default(),
        };

        let atom = RegisterClassExW(&wc);
        if atom == 0 {
            return Err(Error::from_win32());
        }
    }

    REGISTERED_CLASSES.with(|r| r.borrow_mut().insert(class_name.to_string()));
    Ok(())
}

/// Standard creation parameters for [`WindowShell::create`]
#[derive(Clone, Debug)]
pub struct CreateOptions {
    pub style: WINDOW_STYLE,
    pub ex_style: WINDOW_EX_STYLE,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub parent: HWND,
    pub menu: HMENU,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            style: WS_OVERLAPPEDWINDOW,
            ex_style: WINDOW_EX_STYLE::default(),
            x: CW_USEDEFAULT,
            y: CW_USEDEFAULT,
            width: CW_USEDEFAULT,
            height: CW_USEDEFAULT,
            parent: HWND::default(),
            menu: HMENU::default(),
        }
    }
}

/// A native window bound to a message handler
pub struct WindowShell {
    hwnd: HWND,
}

impl WindowShell {
    /// Register `class_name` (once) and create a native window whose
    /// messages are routed to `handler`. The handler receives every
    /// message from `WM_NCCREATE` onward; a failure from class
    /// registration, window creation, or the handler's own `WM_CREATE`
    /// processing surfaces as `Err`. No retry is attempted.
    pub fn create(
        class_name: &str,
        title: &str,
        options: &CreateOptions,
        handler: Rc<RefCell<dyn WindowHandler>>,
    ) -> Result<Self, Error> {
        register_class_once(class_name)?;

        let class_wide = wide(class_name);
        let title_wide = wide(title);

        set_pending_handler(handler);
        let created = unsafe {
            let hinstance = GetModuleHandleW(None)?;
            CreateWindowExW(
                options.ex_style,
                PCWSTR(class_wide.as_ptr()),
                PCWSTR(title_wide.as_ptr()),
                options.style,
                options.x,
                options.y,
                options.width,
                options.height,
                options.parent,
                options.menu,
                hinstance,
                None,
            )
        };
        // If creation failed before WM_NCCREATE was delivered the
        // handler is still parked here; drop it.
        clear_pending_handler();

        let hwnd = created?;
        Ok(Self { hwnd })
    }

    /// The native window handle
    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }
}

/// Enable per-monitor DPI awareness (call early in main)
pub fn enable_dpi_awareness() -> Result<(), Error> {
    unsafe {
        // Try V2 first (Windows 10 1703+)
        if SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2).is_ok() {
            return Ok(());
        }
        SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE)
    }
}

/// Show and foreground the window
pub fn show_window(hwnd: HWND) {
    unsafe {
        let _ = ShowWindow(hwnd, SW_SHOW);
    }
}

/// Request window repaint
pub fn invalidate_window(hwnd: HWND) {
    unsafe {
        let _ = InvalidateRect(hwnd, None, false);
    }
}

/// Get window client area size
pub fn get_client_size(hwnd: HWND) -> (i32, i32) {
    unsafe {
        let mut rect = RECT::default();
        let _ = GetClientRect(hwnd, &mut rect);
        (rect.right - rect.left, rect.bottom - rect.top)
    }
}

/// Begin a WM_PAINT cycle, validating the update region
pub fn begin_paint(hwnd: HWND) -> PAINTSTRUCT {
    unsafe {
        let mut ps = PAINTSTRUCT::default();
        let _ = BeginPaint(hwnd, &mut ps);
        ps
    }
}

/// End a WM_PAINT cycle started with [`begin_paint`]
pub fn end_paint(hwnd: HWND, ps: &PAINTSTRUCT) {
    unsafe {
        let _ = EndPaint(hwnd, ps);
    }
}

/// Signal the message loop to exit
pub fn post_quit() {
    unsafe {
        PostQuitMessage(0);
    }
}

/// Pump messages until WM_QUIT
pub fn run_message_loop() {
    unsafe {
        let mut msg = MSG::default();
        loop {
            let ret = GetMessageW(&mut msg, None, 0, 0);
            if ret.0 <= 0 {
                break;
            }
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingHandler {
        seen: Vec<u32>,
    }

    impl WindowHandler for RecordingHandler {
        fn handle_message(
            &mut self,
            _hwnd: HWND,
            msg: u32,
            _wparam: WPARAM,
            _lparam: LPARAM,
        ) -> Option<LRESULT> {
            self.seen.push(msg);
            Some(LRESULT(7))
        }
    }

    #[test]
    fn test_lookup_miss_before_association() {
        assert!(lookup_handler(0x1000).is_none());
        // Nothing pending either, so association is a no-op
        assert!(!associate_pending(0x1000));
        assert!(lookup_handler(0x1000).is_none());
    }

    #[test]
    fn test_pending_handler_associates_then_receives_messages() {
        let handler = Rc::new(RefCell::new(RecordingHandler::default()));
        set_pending_handler(handler.clone());

        assert!(associate_pending(0x2000));
        // Pending slot is consumed by the association
        assert!(!associate_pending(0x2001));

        let found = lookup_handler(0x2000).expect("handler should be registered");
        let result = found.borrow_mut().handle_message(
            HWND(0x2000 as *mut _),
            WM_USER,
            WPARAM(0),
            LPARAM(0),
        );
        assert_eq!(result, Some(LRESULT(7)));
        assert_eq!(handler.borrow().seen, vec![WM_USER]);

        remove_handler(0x2000);
        assert!(lookup_handler(0x2000).is_none());
    }

    #[test]
    fn test_messages_route_to_the_owning_window_only() {
        let first = Rc::new(RefCell::new(RecordingHandler::default()));
        let second = Rc::new(RefCell::new(RecordingHandler::default()));

        set_pending_handler(first.clone());
        associate_pending(0x3000);
        set_pending_handler(second.clone());
        associate_pending(0x3001);

        lookup_handler(0x3001).unwrap().borrow_mut().handle_message(
            HWND(0x3001 as *mut _),
            WM_USER + 1,
            WPARAM(0),
            LPARAM(0),
        );

        assert!(first.borrow().seen.is_empty());
        assert_eq!(second.borrow().seen, vec![WM_USER + 1]);

        remove_handler(0x3000);
        remove_handler(0x3001);
    }
}
