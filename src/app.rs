//! Clock view: the window message state machine
//!
//! Lifecycle: Uninitialized -> Created -> (Painting / Resized /
//! Ticking) -> Destroyed. The view owns the renderer and the elapsed
//! counter; everything is mutated on the single UI thread from
//! `handle_message`.

use chrono::{Local, Timelike};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    KillTimer, SetTimer, WM_CREATE, WM_DESTROY, WM_NCCREATE, WM_PAINT, WM_SIZE, WM_TIMER,
};

use crate::clock::{
    counter_text, rotation_about, FaceLayout, Hand, HandAngles, TickCounter, RIM_STROKE_WIDTH,
};
use crate::config::{ClockConfig, Palette};
use crate::platform::win32::{
    begin_paint, end_paint, get_client_size, invalidate_window, post_quit, Renderer, WindowHandler,
};

/// Refresh timer id for this view
const TIMER_TICK: usize = 1;

/// The analog clock window
pub struct ClockView {
    hwnd: HWND,
    config: ClockConfig,
    palette: Palette,
    renderer: Option<Renderer>,
    layout: FaceLayout,
    counter: TickCounter,
}

impl ClockView {
    pub fn new(config: ClockConfig) -> Self {
        let palette = config.palette();
        Self {
            hwnd: HWND::default(),
            config,
            palette,
            renderer: None,
            layout: FaceLayout::default(),
            counter: TickCounter::new(),
        }
    }

    /// Start the refresh timer and create the device-independent
    /// graphics resources. Returns -1 on failure, aborting window
    /// creation.
    fn on_create(&mut self) -> LRESULT {
        unsafe {
            SetTimer(self.hwnd, TIMER_TICK, self.config.tick_ms, None);
        }

        match Renderer::new(self.hwnd, &self.config.font_family, self.config.font_size) {
            Ok(renderer) => {
                self.renderer = Some(renderer);
                LRESULT(0)
            }
            Err(e) => {
                log!("failed to create graphics factories: {:?}", e);
                LRESULT(-1)
            }
        }
    }

    /// Stop the timer, release all graphics resources, and signal
    /// application exit.
    fn on_destroy(&mut self) {
        unsafe {
            let _ = KillTimer(self.hwnd, TIMER_TICK);
        }
        self.renderer = None;
        post_quit();
    }

    fn on_paint(&mut self) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        let had_device = renderer.has_device_resources();
        match renderer.ensure_device_resources() {
            Ok(true) => {}
            Ok(false) => return, // zero-size client, skip the frame
            Err(e) => {
                log!("failed to create device resources: {:?}", e);
                return;
            }
        }
        if !had_device {
            let (width, height) = get_client_size(self.hwnd);
            self.layout = FaceLayout::compute(width as f32, height as f32);
        }

        let ps = begin_paint(self.hwnd);
        renderer.begin_draw();

        renderer.clear(self.palette.background);
        renderer.fill_ellipse(&self.layout, self.palette.face);
        renderer.stroke_ellipse(&self.layout, self.palette.rim, RIM_STROKE_WIDTH);

        let now = Local::now();
        let angles = HandAngles::from_time(now.hour(), now.minute(), now.second());
        let hands = [
            (Hand::Hour, angles.hour_deg, self.palette.hands),
            (Hand::Minute, angles.minute_deg, self.palette.hands),
            (Hand::Second, angles.second_deg, self.palette.second_hand),
        ];
        let cx = self.layout.center_x;
        let cy = self.layout.center_y;
        for (hand, angle, color) in hands {
            renderer.set_transform(&rotation_about(angle, cx, cy));
            renderer.draw_line(
                cx,
                cy,
                cx,
                cy - self.layout.radius * hand.length_fraction(),
                color,
                hand.stroke_width(),
            );
        }
        renderer.reset_transform();

        log!(
            "paint at {}, counter {}",
            now.format("%H:%M:%S%.3f"),
            self.counter.ticks()
        );

        let (width, height) = get_client_size(self.hwnd);
        renderer.draw_text(
            &counter_text(self.counter.ticks(), self.config.tick_ms),
            width as f32,
            height as f32,
            self.palette.text,
        );

        if let Err(e) = renderer.end_draw() {
            // Lost or stale target; recreate lazily on the next paint
            log!("present failed, discarding device resources: {:?}", e);
            renderer.discard_device_resources();
        }
        end_paint(self.hwnd, &ps);
    }

    fn on_resize(&mut self) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        if !renderer.has_device_resources() {
            return;
        }

        if let Err(e) = renderer.resize_to_client() {
            log!("render target resize failed: {:?}", e);
            return;
        }
        let (width, height) = get_client_size(self.hwnd);
        self.layout = FaceLayout::compute(width as f32, height as f32);
        invalidate_window(self.hwnd);
    }
}

impl WindowHandler for ClockView {
    fn handle_message(
        &mut self,
        hwnd: HWND,
        msg: u32,
        wparam: WPARAM,
        _lparam: LPARAM,
    ) -> Option<LRESULT> {
        match msg {
            WM_NCCREATE => {
                // Record the handle on the very first message, then let
                // default handling complete the creation.
                self.hwnd = hwnd;
                None
            }
            WM_CREATE => Some(self.on_create()),
            WM_DESTROY => {
                self.on_destroy();
                Some(LRESULT(0))
            }
            WM_PAINT => {
                self.on_paint();
                Some(LRESULT(0))
            }
            WM_SIZE => {
                self.on_resize();
                Some(LRESULT(0))
            }
            WM_TIMER => {
                if self.counter.on_tick(wparam.0, TIMER_TICK) {
                    invalidate_window(self.hwnd);
                    Some(LRESULT(0))
                } else {
                    // Not our timer; leave it to default handling
                    None
                }
            }
            _ => None,
        }
    }
}
