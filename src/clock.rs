//! Pure clock geometry: face layout, hand angles, rotation transforms
//! and the elapsed-tick counter. No OS or graphics dependencies, so
//! everything here is unit-testable on any host.

/// Margin in DIPs between the clock face and the client-area edge
const FACE_MARGIN: f32 = 5.0;

/// Stroke width of the clock-face rim
pub const RIM_STROKE_WIDTH: f32 = 10.0;

/// Placement of the clock face inside the client area
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FaceLayout {
    pub center_x: f32,
    pub center_y: f32,
    pub radius: f32,
}

impl FaceLayout {
    /// Compute the face placement for a client area: centered, fitting
    /// the smaller dimension minus a small margin. Degenerate sizes
    /// clamp the radius to zero.
    pub fn compute(width: f32, height: f32) -> Self {
        let center_x = width / 2.0;
        let center_y = height / 2.0;
        let radius = (center_x.min(center_y) - FACE_MARGIN).max(0.0);
        Self {
            center_x,
            center_y,
            radius,
        }
    }
}

/// The three clock hands, each with its own length and stroke width
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hand {
    Hour,
    Minute,
    Second,
}

impl Hand {
    /// Hand length as a fraction of the face radius
    pub fn length_fraction(self) -> f32 {
        match self {
            Hand::Hour => 0.55,
            Hand::Minute => 0.7,
            Hand::Second => 0.9,
        }
    }

    /// Stroke width in DIPs
    pub fn stroke_width(self) -> f32 {
        match self {
            Hand::Hour => 6.0,
            Hand::Minute => 4.0,
            Hand::Second => 2.0,
        }
    }
}

/// Hand rotation angles in degrees, clockwise from 12 o'clock
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandAngles {
    pub hour_deg: f32,
    pub minute_deg: f32,
    pub second_deg: f32,
}

impl HandAngles {
    /// Compute hand angles from a wall-clock time.
    ///
    /// The hour hand advances continuously with the minutes; the minute
    /// and second hands step on whole units, as the rendering only
    /// refreshes a few times a second anyway.
    pub fn from_time(hour: u32, minute: u32, second: u32) -> Self {
        let hour_deg = 360.0 * (hour as f32 / 12.0) + 30.0 * (minute as f32 / 60.0);
        let minute_deg = 360.0 * (minute as f32 / 60.0);
        let second_deg = 360.0 * (second as f32 / 60.0);
        Self {
            hour_deg,
            minute_deg,
            second_deg,
        }
    }
}

/// 3x2 affine transform rotating clockwise by `angle_deg` about
/// `(cx, cy)`, as row-major [m11, m12, m21, m22, dx, dy]. Matches the
/// Direct2D matrix layout so it can be handed to `SetTransform`
/// verbatim.
pub fn rotation_about(angle_deg: f32, cx: f32, cy: f32) -> [f32; 6] {
    let rad = angle_deg.to_radians();
    let (s, c) = rad.sin_cos();
    [
        c,
        s,
        -s,
        c,
        cx - c * cx + s * cy,
        cy - s * cx - c * cy,
    ]
}

/// Apply a [rotation_about] transform to a point
pub fn transform_point(m: &[f32; 6], x: f32, y: f32) -> (f32, f32) {
    (x * m[0] + y * m[2] + m[4], x * m[1] + y * m[3] + m[5])
}

/// Elapsed-tick bookkeeping for the refresh timer
#[derive(Clone, Copy, Debug, Default)]
pub struct TickCounter {
    ticks: u64,
}

impl TickCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Record a timer tick. Only ticks carrying this counter's timer id
    /// advance the count; returns whether the tick was ours.
    pub fn on_tick(&mut self, timer_id: usize, own_id: usize) -> bool {
        if timer_id == own_id {
            self.ticks += 1;
            true
        } else {
            false
        }
    }
}

/// On-screen text for the counter: nominal elapsed milliseconds
pub fn counter_text(ticks: u64, tick_interval_ms: u32) -> String {
    (ticks * tick_interval_ms as u64).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-3, "{} != {}", a, b);
    }

    #[test]
    fn test_face_layout_centered() {
        let layout = FaceLayout::compute(640.0, 480.0);
        assert_close(layout.center_x, 320.0);
        assert_close(layout.center_y, 240.0);
        assert_close(layout.radius, 235.0);
    }

    #[test]
    fn test_face_layout_degenerate_clamps_radius() {
        let layout = FaceLayout::compute(6.0, 4.0);
        assert_close(layout.radius, 0.0);

        let layout = FaceLayout::compute(0.0, 0.0);
        assert_close(layout.radius, 0.0);
    }

    #[test]
    fn test_hand_angles_three_oclock() {
        let angles = HandAngles::from_time(3, 0, 0);
        assert_close(angles.hour_deg, 90.0);
        assert_close(angles.minute_deg, 0.0);
        assert_close(angles.second_deg, 0.0);
    }

    #[test]
    fn test_hand_angles_half_past_six() {
        let angles = HandAngles::from_time(6, 30, 0);
        assert_close(angles.hour_deg, 195.0);
        assert_close(angles.minute_deg, 180.0);
    }

    #[test]
    fn test_hand_angles_afternoon_wraps() {
        // 18:00 is the same hand position as 06:00, modulo a full turn
        let angles = HandAngles::from_time(18, 0, 0);
        assert_close(angles.hour_deg.rem_euclid(360.0), 180.0);
    }

    #[test]
    fn test_rotation_identity_at_zero() {
        let m = rotation_about(0.0, 100.0, 50.0);
        let (x, y) = transform_point(&m, 7.0, -3.0);
        assert_close(x, 7.0);
        assert_close(y, -3.0);
    }

    #[test]
    fn test_rotation_fixes_center() {
        let m = rotation_about(123.0, 100.0, 50.0);
        let (x, y) = transform_point(&m, 100.0, 50.0);
        assert_close(x, 100.0);
        assert_close(y, 50.0);
    }

    #[test]
    fn test_rotation_is_clockwise_in_screen_space() {
        // A point straight above the center, rotated 90 degrees, ends up
        // to the right of the center (y grows downward on screen).
        let m = rotation_about(90.0, 100.0, 50.0);
        let (x, y) = transform_point(&m, 100.0, 10.0);
        assert_close(x, 140.0);
        assert_close(y, 50.0);
    }

    #[test]
    fn test_tick_counter_matches_own_id_only() {
        let mut counter = TickCounter::new();
        assert!(counter.on_tick(1, 1));
        assert!(counter.on_tick(1, 1));
        assert!(!counter.on_tick(2, 1));
        assert!(!counter.on_tick(0, 1));
        assert_eq!(counter.ticks(), 2);
    }

    #[test]
    fn test_counter_text_is_elapsed_millis() {
        assert_eq!(counter_text(0, 10), "0");
        assert_eq!(counter_text(5, 10), "50");
        assert_eq!(counter_text(123, 10), "1230");
    }

    #[test]
    fn test_resize_then_paint_scenario() {
        // Resize to 200x100, paint at 06:30:00 with five ticks elapsed.
        let layout = FaceLayout::compute(200.0, 100.0);
        assert_close(layout.center_x, 100.0);
        assert_close(layout.center_y, 50.0);
        assert_close(layout.radius, 45.0);

        let angles = HandAngles::from_time(6, 30, 0);
        assert_close(angles.hour_deg, 195.0);
        assert_close(angles.minute_deg, 180.0);
        assert_close(angles.second_deg, 0.0);

        let mut counter = TickCounter::new();
        for _ in 0..5 {
            counter.on_tick(1, 1);
        }
        assert_eq!(counter_text(counter.ticks(), 10), "50");
    }
}
