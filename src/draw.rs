// Window + software drawing utilities.
// Visual effects provided here:
// 1) The window that shows the page.
// 2) Alpha-blended pills, rings, radial gradients and hairlines.
// 3) A tiny 5x7 bitmap font (scaled up) for the button label and toggle caption.

use crate::error::Error;
use crate::types::{FrameBuffer, Rect, pill_distance};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

pub struct Drawer {
    window: Window,     // the on-screen window you see
    left_was_down: bool, // last frame's button state, for click edges
}

impl Drawer {
    /// Create the page window.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window, left_was_down: false })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Keyboard shortcut for the camera toggle.
    pub fn c_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::C, KeyRepeat::No)
    }

    /// Mouse position in window pixels, *not* clamped: it can be negative or
    /// past the edge while the pointer is outside the window.
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Pass)
    }

    /// True on the single frame the left button goes down.
    /// Call once per frame.
    pub fn left_clicked(&mut self) -> bool {
        let down = self.window.get_mouse_down(MouseButton::Left);
        let clicked = down && !self.left_was_down;
        self.left_was_down = down;
        clicked
    }
}

/* ---------- Colour helpers ---------- */

#[inline]
pub fn rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

#[inline]
fn channels(c: u32) -> (f32, f32, f32) {
    (((c >> 16) & 0xFF) as f32, ((c >> 8) & 0xFF) as f32, (c & 0xFF) as f32)
}

/// Linear mix of two colours, t=0 → a, t=1 → b.
pub fn lerp_color(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let (ar, ag, ab) = channels(a);
    let (br, bg, bb) = channels(b);
    let mix = |x: f32, y: f32| (x + (y - x) * t).round().clamp(0.0, 255.0) as u8;
    rgb(mix(ar, br), mix(ag, bg), mix(ab, bb))
}

/* ---------- Pixels ---------- */

/// "Over" blend `color` at (x,y) with coverage `alpha` in [0,1].
/// Visual: alpha 1 paints the pixel, 0 leaves it untouched.
#[inline]
pub fn blend_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32, alpha: f32) {
    if x < 0 || y < 0 || alpha <= 0.0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = lerp_color(fb.pixels[idx], color, alpha);
}

/// Additive blend one RGB triplet at (x,y) with saturation to 255.
/// Visual: the pixel gets brighter; repeated draws stack until white.
#[inline]
pub fn add_rgb_saturating(fb: &mut FrameBuffer, x: i32, y: i32, r: u8, g: u8, b: u8) {
    if x < 0 || y < 0 { return; }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height { return; }

    let idx = y * fb.width + x;
    let old = fb.pixels[idx];

    let or = ((old >> 16) & 0xFF) as u16;
    let og = ((old >> 8)  & 0xFF) as u16;
    let ob = ( old        & 0xFF) as u16;

    let nr = (or + r as u16).min(255) as u32;
    let ng = (og + g as u16).min(255) as u32;
    let nb = (ob + b as u16).min(255) as u32;

    fb.pixels[idx] = (nr << 16) | (ng << 8) | nb;
}

/// Integer pixel bounds of `r`, clipped to the framebuffer.
fn clip(fb: &FrameBuffer, r: Rect) -> (i32, i32, i32, i32) {
    let x0 = r.x.floor().max(0.0) as i32;
    let y0 = r.y.floor().max(0.0) as i32;
    let x1 = (r.x + r.w).ceil().min(fb.width as f32) as i32;
    let y1 = (r.y + r.h).ceil().min(fb.height as f32) as i32;
    (x0, y0, x1, y1)
}

/// Anti-aliased coverage of pixel centre (x,y) for the pill in `r`.
#[inline]
pub fn pill_coverage(r: Rect, x: i32, y: i32) -> f32 {
    (0.5 - pill_distance(r, x as f32 + 0.5, y as f32 + 0.5)).clamp(0.0, 1.0)
}

/* ---------- Shapes ---------- */

/// Fill a fully rounded rectangle.
/// Visual: a soft-edged capsule of `color` at `alpha`.
pub fn fill_pill(fb: &mut FrameBuffer, r: Rect, color: u32, alpha: f32) {
    let (x0, y0, x1, y1) = clip(fb, r);
    for y in y0..y1 {
        for x in x0..x1 {
            let a = pill_coverage(r, x, y) * alpha;
            blend_pixel(fb, x, y, color, a);
        }
    }
}

/// Outline a pill with a ring `width` pixels thick, drawn just inside `r`.
pub fn stroke_pill(fb: &mut FrameBuffer, r: Rect, width: f32, color: u32, alpha: f32) {
    let inner = r.inset(width);
    let (x0, y0, x1, y1) = clip(fb, r);
    for y in y0..y1 {
        for x in x0..x1 {
            let a = (pill_coverage(r, x, y) - pill_coverage(inner, x, y)).max(0.0) * alpha;
            blend_pixel(fb, x, y, color, a);
        }
    }
}

/// Radial gradient: `color` at `peak` alpha in the centre, fading linearly to
/// transparent at `stop * radius`. Only pixels inside the pill `clip_to` change.
/// Visual: a disc of light; its centre may sit outside the pill (it just clips).
pub fn radial_glow(
    fb: &mut FrameBuffer,
    clip_to: Rect,
    (cx, cy): (f32, f32),
    radius: f32,
    stop: f32,
    color: u32,
    peak: f32,
) {
    if peak <= 0.0 || radius <= 0.0 {
        return;
    }
    let reach = radius * stop;
    let area = Rect::new(cx - reach, cy - reach, 2.0 * reach, 2.0 * reach);
    let (ax0, ay0, ax1, ay1) = clip(fb, area);
    let (bx0, by0, bx1, by1) = clip(fb, clip_to);
    for y in ay0.max(by0)..ay1.min(by1) {
        for x in ax0.max(bx0)..ax1.min(bx1) {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let t = (dx * dx + dy * dy).sqrt() / reach;
            if t >= 1.0 { continue; }
            let a = peak * (1.0 - t) * pill_coverage(clip_to, x, y);
            blend_pixel(fb, x, y, color, a);
        }
    }
}

/// 1px horizontal line from x0 to x1 that is transparent at both ends and
/// `peak` in the middle. Visual: the glass highlight along the pill's rim.
pub fn highlight_line(fb: &mut FrameBuffer, x0: f32, x1: f32, y: f32, color: u32, peak: f32) {
    let len = (x1 - x0).max(1.0);
    for x in x0.round() as i32..x1.round() as i32 {
        let t = (x as f32 + 0.5 - x0) / len; // 0..1 along the line
        let a = peak * (1.0 - (2.0 * t - 1.0).abs());
        blend_pixel(fb, x, y.round() as i32, color, a);
    }
}

/* ---------- 5x7 bitmap font ---------- */

/// Return a 5x7 glyph bitmap. Lowercase is drawn as uppercase.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),

        _ => None,
    }
}

/// Width in pixels of `text` drawn at `scale` (glyph 5 + 1 spacing per char).
pub fn text_width(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    (n * 6 - 1).max(0) * scale
}

/// Call `f(x, y)` for every lit pixel of `text` at `scale`.
/// Shared by plain text drawing and the glow pass underneath it.
pub fn for_each_text_pixel(text: &str, x: i32, y: i32, scale: i32, mut f: impl FnMut(i32, i32)) {
    let mut pen = x;
    for ch in text.chars() {
        if let Some(rows) = glyph5x7(ch) {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (rowbits & (1 << (4 - rx))) == 0 { continue; }
                    for sy in 0..scale {
                        for sx in 0..scale {
                            f(pen + rx * scale + sx, y + ry as i32 * scale + sy);
                        }
                    }
                }
            }
        }
        pen += 6 * scale; // 5 pixels glyph width + 1 pixel spacing
    }
}

/// Draw a text string using scaled 5x7 glyphs.
pub fn draw_text(fb: &mut FrameBuffer, x: i32, y: i32, text: &str, scale: i32, color: u32, alpha: f32) {
    for_each_text_pixel(text, x, y, scale, |px, py| blend_pixel(fb, px, py, color, alpha));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_pixel_ignores_out_of_bounds() {
        let mut fb = FrameBuffer::new(4, 4, 0);
        blend_pixel(&mut fb, -1, 0, 0xFFFFFF, 1.0);
        blend_pixel(&mut fb, 4, 0, 0xFFFFFF, 1.0);
        assert!(fb.pixels.iter().all(|&p| p == 0));

        blend_pixel(&mut fb, 1, 1, 0xFFFFFF, 1.0);
        assert_eq!(fb.pixels[5], 0xFFFFFF);
    }

    #[test]
    fn test_lerp_color_halfway() {
        assert_eq!(lerp_color(0x000000, 0xFFFFFF, 0.5), rgb(128, 128, 128));
        assert_eq!(lerp_color(0x102030, 0xFFFFFF, 0.0), 0x102030);
    }

    #[test]
    fn test_add_saturates() {
        let mut fb = FrameBuffer::new(1, 1, rgb(250, 10, 0));
        add_rgb_saturating(&mut fb, 0, 0, 20, 20, 20);
        assert_eq!(fb.pixels[0], rgb(255, 30, 20));
    }

    #[test]
    fn test_radial_glow_is_clipped_to_pill() {
        let mut fb = FrameBuffer::new(40, 20, 0);
        let pill = Rect::new(10.0, 0.0, 20.0, 20.0);
        radial_glow(&mut fb, pill, (0.0, 10.0), 30.0, 1.0, 0xFFFFFF, 1.0);
        // Glow centre is left of the pill; nothing left of the pill is touched.
        for y in 0..20 {
            for x in 0..10 {
                assert_eq!(fb.pixels[y * 40 + x], 0);
            }
        }
        assert_ne!(fb.pixels[10 * 40 + 12], 0);
    }

    #[test]
    fn test_text_width_and_unknown_glyphs() {
        assert_eq!(text_width("GET", 1), 17);
        assert_eq!(text_width("GET", 3), 51);
        assert_eq!(text_width("", 2), 0);

        let mut lit = 0;
        for_each_text_pixel("~", 0, 0, 1, |_, _| lit += 1);
        assert_eq!(lit, 0);
        for_each_text_pixel("i", 0, 0, 1, |_, _| lit += 1);
        assert_eq!(lit, 11);
    }
}
