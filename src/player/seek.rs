use std::f64::consts::{FRAC_PI_2, TAU};

/// Map a pointer position around a dial to a fractional track position in `[0, 1)`.
///
/// Angle zero points up and increases clockwise (screen coordinates, y grows
/// downwards): directly above the centre is `0.0`, directly below is `0.5`.
pub fn angular_fraction(pointer: (f64, f64), center: (f64, f64)) -> f64 {
    let dx = pointer.0 - center.0;
    let dy = pointer.1 - center.1;
    let mut angle = dy.atan2(dx) + FRAC_PI_2;
    if angle < 0.0 {
        angle += TAU;
    }
    angle / TAU
}

/// Format seconds as `MM:SS`. Non-finite or negative input renders as `00:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00".to_string();
    }
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{:02}:{:02}", minutes, secs)
}
