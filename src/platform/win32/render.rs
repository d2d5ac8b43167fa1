//! Direct2D rendering for the clock window
//!
//! Device-independent resources (the D2D and DWrite factories plus the
//! counter text format) live for the whole window lifetime and are
//! created up front; the device-dependent render target and brush are
//! bundled in [`DeviceResources`] so they are either both present or
//! both absent, created lazily on the first paint and dropped together
//! on device loss.

use windows::core::{w, Error, PCWSTR};
use windows::Foundation::Numerics::Matrix3x2;
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Direct2D::Common::*;
use windows::Win32::Graphics::Direct2D::*;
use windows::Win32::Graphics::DirectWrite::*;
use windows::Win32::Graphics::Dxgi::Common::DXGI_FORMAT_UNKNOWN;

use super::window::get_client_size;
use crate::clock::FaceLayout;
use crate::color::Color;

/// Render target and brush, valid together or not at all
struct DeviceResources {
    target: ID2D1HwndRenderTarget,
    brush: ID2D1SolidColorBrush,
}

/// Direct2D rendering context for one window
pub struct Renderer {
    factory: ID2D1Factory,
    #[allow(dead_code)]
    dwrite_factory: IDWriteFactory,
    text_format: IDWriteTextFormat,
    device: Option<DeviceResources>,
    hwnd: HWND,
}

impl Renderer {
    /// Create the device-independent resources for a window. Called
    /// during window creation; failure here aborts the window.
    pub fn new(hwnd: HWND, font_family: &str, font_size: f32) -> Result<Self, Error> {
        let factory: ID2D1Factory =
            unsafe { D2D1CreateFactory(D2D1_FACTORY_TYPE_SINGLE_THREADED, None)? };

        let dwrite_factory: IDWriteFactory =
            unsafe { DWriteCreateFactory(DWRITE_FACTORY_TYPE_SHARED)? };

        let family: Vec<u16> = font_family
            .encode_utf16()
            .chain(std::iter::once(0))
            .collect();

        let text_format = unsafe {
            let format = dwrite_factory.CreateTextFormat(
                PCWSTR(family.as_ptr()),
                None,
                DWRITE_FONT_WEIGHT_NORMAL,
                DWRITE_FONT_STYLE_NORMAL,
                DWRITE_FONT_STRETCH_NORMAL,
                font_size,
                w!(""),
            )?;
            // Counter sits in the top-right corner of the client area
            format.SetTextAlignment(DWRITE_TEXT_ALIGNMENT_TRAILING)?;
            format.SetParagraphAlignment(DWRITE_PARAGRAPH_ALIGNMENT_NEAR)?;
            format
        };

        Ok(Self {
            factory,
            dwrite_factory,
            text_format,
            device: None,
            hwnd,
        })
    }

    /// Whether the device-dependent bundle currently exists
    pub fn has_device_resources(&self) -> bool {
        self.device.is_some()
    }

    /// Ensure the render target and brush exist, creating them if
    /// absent. Returns `Ok(false)` when the client area has zero size
    /// and the frame should be skipped.
    pub fn ensure_device_resources(&mut self) -> Result<bool, Error> {
        if self.device.is_some() {
            return Ok(true);
        }

        let (width, height) = get_client_size(self.hwnd);
        if width <= 0 || height <= 0 {
            return Ok(false);
        }

        let render_props = D2D1_RENDER_TARGET_PROPERTIES {
            r#type: D2D1_RENDER_TARGET_TYPE_DEFAULT,
            pixelFormat: D2D1_PIXEL_FORMAT {
                format: DXGI_FORMAT_UNKNOWN,
                alphaMode: D2D1_ALPHA_MODE_UNKNOWN,
            },
            // Pin DIPs to pixels; the face layout works in client pixels
            dpiX: 96.0,
            dpiY: 96.0,
            usage: D2D1_RENDER_TARGET_USAGE_NONE,
            minLevel: D2D1_FEATURE_LEVEL_DEFAULT,
        };

        let hwnd_props = D2D1_HWND_RENDER_TARGET_PROPERTIES {
            hwnd: self.hwnd,
            pixelSize: D2D_SIZE_U {
                width: width as u32,
                height: height as u32,
            },
            presentOptions: D2D1_PRESENT_OPTIONS_NONE,
        };

        let device = unsafe {
            let target = self
                .factory
                .CreateHwndRenderTarget(&render_props, &hwnd_props)?;
            let brush = target.CreateSolidColorBrush(&d2d_color(Color::BLACK), None)?;
            DeviceResources { target, brush }
        };
        self.device = Some(device);
        Ok(true)
    }

    /// Drop the device-dependent bundle; it will be recreated lazily on
    /// the next paint. This is the device-loss recovery path.
    pub fn discard_device_resources(&mut self) {
        self.device = None;
    }

    /// Resize the render target to the current client area
    pub fn resize_to_client(&mut self) -> Result<(), Error> {
        let (width, height) = get_client_size(self.hwnd);
        if let Some(ref device) = self.device {
            let size = D2D_SIZE_U {
                width: width.max(0) as u32,
                height: height.max(0) as u32,
            };
            unsafe {
                device.target.Resize(&size)?;
            }
        }
        Ok(())
    }

    pub fn begin_draw(&self) {
        if let Some(ref device) = self.device {
            unsafe {
                device.target.BeginDraw();
            }
        }
    }

    /// Present the frame. An error here means the target is lost or
    /// stale; the caller discards the device resources in response.
    pub fn end_draw(&self) -> Result<(), Error> {
        if let Some(ref device) = self.device {
            unsafe {
                device.target.EndDraw(None, None)?;
            }
        }
        Ok(())
    }

    pub fn clear(&self, color: Color) {
        if let Some(ref device) = self.device {
            unsafe {
                device.target.Clear(Some(&d2d_color(color)));
            }
        }
    }

    pub fn fill_ellipse(&self, layout: &FaceLayout, color: Color) {
        if let Some(ref device) = self.device {
            let ellipse = face_ellipse(layout);
            unsafe {
                device.brush.SetColor(&d2d_color(color));
                device.target.FillEllipse(&ellipse, &device.brush);
            }
        }
    }

    pub fn stroke_ellipse(&self, layout: &FaceLayout, color: Color, stroke_width: f32) {
        if let Some(ref device) = self.device {
            let ellipse = face_ellipse(layout);
            unsafe {
                device.brush.SetColor(&d2d_color(color));
                device
                    .target
                    .DrawEllipse(&ellipse, &device.brush, stroke_width, None);
            }
        }
    }

    pub fn draw_line(&self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color, stroke_width: f32) {
        if let Some(ref device) = self.device {
            unsafe {
                device.brush.SetColor(&d2d_color(color));
                device.target.DrawLine(
                    D2D_POINT_2F { x: x1, y: y1 },
                    D2D_POINT_2F { x: x2, y: y2 },
                    &device.brush,
                    stroke_width,
                    None,
                );
            }
        }
    }

    /// Apply a 3x2 affine transform (row-major, as produced by
    /// [`crate::clock::rotation_about`])
    pub fn set_transform(&self, m: &[f32; 6]) {
        if let Some(ref device) = self.device {
            let matrix = Matrix3x2 {
                M11: m[0],
                M12: m[1],
                M21: m[2],
                M22: m[3],
                M31: m[4],
                M32: m[5],
            };
            unsafe {
                device.target.SetTransform(&matrix);
            }
        }
    }

    /// Restore the identity transform
    pub fn reset_transform(&self) {
        self.set_transform(&[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    /// Draw text over the given client-area extent using the counter
    /// text format
    pub fn draw_text(&self, text: &str, width: f32, height: f32, color: Color) {
        if let Some(ref device) = self.device {
            let text_wide: Vec<u16> = text.encode_utf16().collect();
            let rect = D2D_RECT_F {
                left: 0.0,
                top: 0.0,
                right: width,
                bottom: height,
            };
            unsafe {
                device.brush.SetColor(&d2d_color(color));
                device.target.DrawText(
                    &text_wide,
                    &self.text_format,
                    &rect,
                    &device.brush,
                    D2D1_DRAW_TEXT_OPTIONS_NONE,
                    DWRITE_MEASURING_MODE_NATURAL,
                );
            }
        }
    }
}

fn d2d_color(color: Color) -> D2D1_COLOR_F {
    D2D1_COLOR_F {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

fn face_ellipse(layout: &FaceLayout) -> D2D1_ELLIPSE {
    D2D1_ELLIPSE {
        point: D2D_POINT_2F {
            x: layout.center_x,
            y: layout.center_y,
        },
        radiusX: layout.radius,
        radiusY: layout.radius,
    }
}
