// Core types shared by the page, the button and the drawing helpers.

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A buffer filled with one solid colour.
    pub fn new(width: usize, height: usize, fill: u32) -> Self {
        Self { width, height, pixels: vec![fill; width * height] }
    }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }
}

/// Axis-aligned rectangle in window pixels (top-left origin, y grows down).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of size (w,h) whose centre sits at (cx,cy).
    pub fn centered(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self::new(cx - w * 0.5, cy - h * 0.5, w, h)
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Shrink on every side by `d` (negative grows).
    pub fn inset(&self, d: f32) -> Self {
        Self::new(self.x + d, self.y + d, self.w - 2.0 * d, self.h - 2.0 * d)
    }

    /// Scale around the centre (used for the pressed "squish").
    pub fn scaled(&self, s: f32) -> Self {
        let (cx, cy) = self.center();
        Self::centered(cx, cy, self.w * s, self.h * s)
    }

    /// True if (px,py) is inside the pill (fully rounded rectangle) inscribed in this rect.
    pub fn pill_contains(&self, px: f32, py: f32) -> bool {
        pill_distance(*self, px, py) <= 0.0
    }
}

/// Signed distance from (px,py) to the edge of the pill filling `r`.
/// Negative inside, positive outside.
pub fn pill_distance(r: Rect, px: f32, py: f32) -> f32 {
    let radius = r.w.min(r.h) * 0.5;
    let (cx, cy) = r.center();
    // Half-extents of the straight middle segment
    let hx = (r.w * 0.5 - radius).max(0.0);
    let hy = (r.h * 0.5 - radius).max(0.0);
    let dx = ((px - cx).abs() - hx).max(0.0);
    let dy = ((py - cy).abs() - hy).max(0.0);
    (dx * dx + dy * dy).sqrt() - radius
}

/// Pointer position relative to the button's top-left corner.
/// Not clamped: fast movement can leave it outside the button for a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerOffset {
    pub x: f32,
    pub y: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pill_contains_center_and_rejects_corners() {
        let r = Rect::new(0.0, 0.0, 200.0, 60.0);
        assert!(r.pill_contains(100.0, 30.0));
        assert!(r.pill_contains(5.0, 30.0));
        // The bounding box corner is outside the rounded cap
        assert!(!r.pill_contains(1.0, 1.0));
        assert!(!r.pill_contains(250.0, 30.0));
    }

    #[test]
    fn test_scaled_keeps_center() {
        let r = Rect::new(10.0, 20.0, 100.0, 40.0);
        let s = r.scaled(0.5);
        assert_eq!(s.center(), r.center());
        assert_eq!(s.w, 50.0);
        assert_eq!(s.h, 20.0);
    }
}
