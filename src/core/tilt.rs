//! 3D tilt for the feature cards, following the pointer.

const MAX_TILT_DEG: f64 = 10.0;

pub const TILT_RESET: &str = "perspective(1000px) rotateX(0) rotateY(0)";

/// Pointer position relative to the card's top-left corner, and the card size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInCard {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// `(rotate_x, rotate_y)` in degrees. Pointer below center tips the card away
/// (negative X rotation); pointer right of center turns it right.
pub fn tilt_angles(p: PointerInCard) -> (f64, f64) {
    let cx = p.width / 2.0;
    let cy = p.height / 2.0;
    if cx <= 0.0 || cy <= 0.0 {
        return (0.0, 0.0);
    }
    let rotate_x = ((cy - p.y) / cy) * MAX_TILT_DEG;
    let rotate_y = ((p.x - cx) / cx) * MAX_TILT_DEG;
    (rotate_x, rotate_y)
}

pub fn tilt_transform(p: PointerInCard) -> String {
    let (rx, ry) = tilt_angles(p);
    format!("perspective(1000px) rotateX({rx}deg) rotateY({ry}deg) scale3d(1.02, 1.02, 1.02)")
}
