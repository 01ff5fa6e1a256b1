// The cosmic pill button.
// Visual outcomes:
// - A dark glass capsule with a faint ring and a glowing label.
// - Hover: light pools under the cursor (behind, on the rim, and inside the glass).
// - Camera mode: your mirrored, softened reflection shows through the glass.
// - Click: the capsule squishes for a moment and `on_click` fires.

use image::RgbImage;
use rand::Rng;

use crate::draw::{draw_text, fill_pill, highlight_line, radial_glow, rgb, stroke_pill, text_width};
use crate::filter::{composite_in_pill, mirror_surface};
use crate::fx::{Fade, ParticleField, fog_band, text_glow};
use crate::lifecycle::{CameraManager, CaptureHost};
use crate::pointer::PointerTracker;
use crate::types::{FrameBuffer, PointerOffset, Rect};

const LABEL_SCALE: i32 = 4;      // 5x7 glyphs → 20x28 px
const PAD_X: f32 = 48.0;         // horizontal padding inside the glass
const PAD_Y: f32 = 20.0;
const RING: f32 = 1.5;           // visible border thickness
const PRESS_TIME: f32 = 0.12;    // seconds the squish lasts
const PRESS_SCALE: f32 = 0.95;

const NEUTRAL_900: u32 = 0x171717;

pub type ClickHandler = Box<dyn FnMut()>;

/// Width/height the button needs for `label`.
pub fn size_for(label: &str) -> (f32, f32) {
    let w = text_width(label, LABEL_SCALE) as f32 + 2.0 * (PAD_X + RING);
    let h = (7 * LABEL_SCALE) as f32 + 2.0 * (PAD_Y + RING);
    (w, h)
}

pub struct CosmicButton<H: CaptureHost> {
    label: String,
    on_click: ClickHandler,
    bounds: Rect,
    pointer: PointerTracker,
    last_pointer: Option<(f32, f32)>,
    camera: CameraManager<H>,
    surface: Option<RgbImage>, // latest mirrored frame, sized to the glass body
    particles: ParticleField,
    press_left: f32,

    backlight: Fade,
    border_light: Fade,
    reflection: Fade,
    camera_layer: Fade,
    fallback: Fade,
    label_glow: Fade,
}

impl<H: CaptureHost> CosmicButton<H> {
    /// Mount the button. If `camera_enabled`, the camera is requested now.
    pub fn new<R: Rng>(
        host: H,
        label: &str,
        camera_enabled: bool,
        bounds: Rect,
        on_click: ClickHandler,
        rng: &mut R,
    ) -> Self {
        Self {
            label: label.to_string(),
            on_click,
            bounds,
            pointer: PointerTracker::new(),
            last_pointer: None,
            camera: CameraManager::new(host, camera_enabled),
            surface: None,
            particles: ParticleField::generate(rng, ParticleField::COUNT),
            press_left: 0.0,
            backlight: Fade::new(0.0, 0.5),
            border_light: Fade::new(0.0, 0.3),
            reflection: Fade::new(0.0, 0.5),
            camera_layer: Fade::new(0.0, 0.7),
            fallback: Fade::new(1.0, 0.7),
            label_glow: Fade::new(0.5, 0.3),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Parent-owned camera toggle, passed down every frame.
    pub fn set_camera_enabled(&mut self, enabled: bool) {
        self.camera.set_enabled(enabled);
    }

    /// Feed the window pointer position (None = pointer not over the window).
    /// Generates enter/leave on hover changes and a move while over the pill.
    pub fn pointer(&mut self, pos: Option<(f32, f32)>) {
        let inside = pos.is_some_and(|(x, y)| self.bounds.pill_contains(x, y));

        if inside && !self.pointer.hovered() {
            self.pointer.on_enter();
        } else if !inside && self.pointer.hovered() {
            self.pointer.on_leave();
        }

        if let Some(p) = pos.filter(|_| inside) {
            if self.last_pointer != Some(p) {
                self.pointer.on_move(p, self.bounds);
            }
        }
        self.last_pointer = pos;
    }

    /// Left button went down somewhere. Returns true if it hit the button.
    pub fn click(&mut self) -> bool {
        if !self.pointer.hovered() {
            return false;
        }
        self.press_left = PRESS_TIME;
        (self.on_click)();
        true
    }

    pub fn hovered(&self) -> bool {
        self.pointer.hovered()
    }

    pub fn pointer_offset(&self) -> PointerOffset {
        self.pointer.offset()
    }

    pub fn camera_bound(&self) -> bool {
        self.camera.is_bound()
    }

    /// Where the camera layer's opacity is heading: 1 with a live stream, 0 otherwise
    /// (including "enabled but acquisition failed").
    pub fn camera_layer_target(&self) -> f32 {
        self.camera_layer.target()
    }

    fn outer(&self) -> Rect {
        if self.press_left > 0.0 { self.bounds.scaled(PRESS_SCALE) } else { self.bounds }
    }

    fn body(&self) -> Rect {
        self.outer().inset(RING)
    }

    /// Advance one frame: settle camera requests, pull a frame, move the fades.
    pub fn update(&mut self, dt: f32) {
        self.camera.pump();
        self.press_left = (self.press_left - dt).max(0.0);

        let hovered = self.pointer.hovered();
        let bound = self.camera.is_bound();

        self.backlight.set_target(if hovered { 0.4 } else { 0.0 });
        self.border_light.set_target(if hovered { 1.0 } else { 0.0 });
        self.reflection.set_target(if hovered { 1.0 } else { 0.0 });
        self.label_glow.set_target(if hovered { 0.8 } else { 0.5 });
        self.camera_layer.set_target(if bound { 1.0 } else { 0.0 });
        self.fallback.set_target(if bound { 0.5 } else { 1.0 });

        for fade in [
            &mut self.backlight,
            &mut self.border_light,
            &mut self.reflection,
            &mut self.label_glow,
            &mut self.camera_layer,
            &mut self.fallback,
        ] {
            fade.step(dt);
        }

        let body = self.body();
        if let Some(frame) = self.camera.latest_frame() {
            self.surface = Some(mirror_surface(&frame, body.w.max(1.0) as u32, body.h.max(1.0) as u32));
        } else if !bound && self.camera_layer.value() <= 0.0 {
            self.surface = None;
        }
    }

    /// Draw every layer, back to front.
    pub fn render(&self, fb: &mut FrameBuffer, t: f32) {
        let outer = self.outer();
        let body = self.body();
        let off = self.pointer.offset();
        let light = (self.bounds.x + off.x, self.bounds.y + off.y);

        // 1) Backlight: diffuse light behind the button; spills past the edge like a blur.
        radial_glow(fb, outer.inset(-15.0), light, 100.0, 0.6, 0xFFFFFF, 0.4 * self.backlight.value());

        // 2) Border container + the moving light that sticks to the rim.
        fill_pill(fb, outer, NEUTRAL_900, 0.8);
        stroke_pill(fb, outer, 1.0, 0xFFFFFF, 0.1);
        radial_glow(fb, outer, light, 120.0, 0.4, 0xFFFFFF, 0.9 * self.border_light.value());

        // 3) Glass body sits on top, leaving only the ring lit.
        fill_pill(fb, body, 0x000000, 0.5);

        // 4) Camera mirror (video itself is at 50%).
        if let Some(surface) = &self.surface {
            composite_in_pill(fb, surface, body, 0.5 * self.camera_layer.value());
        }

        // 5) Dark fallback keeps the label readable.
        fill_pill(fb, body, NEUTRAL_900, self.fallback.value());
        stroke_pill(fb, body, 1.0, 0xFFFFFF, 0.05);

        // 6) Fog, 7) inner reflection under the cursor.
        fog_band(fb, body, t, 0.02);
        radial_glow(fb, body, light, 150.0, 0.6, 0xFFFFFF, 0.15 * self.reflection.value());

        // 8) Glass highlights along the top and bottom rim.
        highlight_line(fb, body.x + 40.0, body.x + body.w - 40.0, body.y, 0xFFFFFF, 0.4 * 0.5);
        highlight_line(fb, body.x + 40.0, body.x + body.w - 40.0, body.y + body.h - 1.0, 0xFFFFFF, 0.1 * 0.3);

        // 9) Sparkles.
        self.particles.render(fb, body, t);

        // 10) Label with its glow.
        let scale = if self.press_left > 0.0 { LABEL_SCALE - 1 } else { LABEL_SCALE };
        let tw = text_width(&self.label, scale);
        let (cx, cy) = body.center();
        let tx = (cx - tw as f32 * 0.5).round() as i32;
        let ty = (cy - (7 * scale) as f32 * 0.5).round() as i32;
        text_glow(fb, &self.label, tx, ty, scale, 0.12 * self.label_glow.value());
        draw_text(fb, tx, ty, &self.label, scale, rgb(255, 255, 255), 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::tests::ManualHost;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::cell::Cell;
    use std::rc::Rc;

    const BOUNDS: Rect = Rect::new(100.0, 100.0, 360.0, 72.0);

    fn mount(host: &ManualHost, enabled: bool) -> (CosmicButton<ManualHost>, Rc<Cell<u32>>) {
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let button = CosmicButton::new(
            host.clone(),
            "Get Started",
            enabled,
            BOUNDS,
            Box::new(move || counter.set(counter.get() + 1)),
            &mut StdRng::seed_from_u64(1),
        );
        (button, clicks)
    }

    #[test]
    fn test_size_fits_label() {
        let (w, h) = size_for("Get Started");
        assert_eq!(w, 260.0 + 99.0);
        assert_eq!(h, 28.0 + 43.0);
    }

    #[test]
    fn test_pointer_enter_move_leave() {
        let host = ManualHost::default();
        let (mut b, _) = mount(&host, false);

        b.pointer(Some((150.0, 120.0)));
        assert!(b.hovered());
        assert_eq!(b.pointer_offset(), PointerOffset { x: 50.0, y: 20.0 });

        b.pointer(Some((10.0, 10.0)));
        assert!(!b.hovered());
        // Leaving doesn't touch the offset
        assert_eq!(b.pointer_offset(), PointerOffset { x: 50.0, y: 20.0 });

        b.pointer(None);
        assert!(!b.hovered());
    }

    #[test]
    fn test_click_only_when_hovered() {
        let host = ManualHost::default();
        let (mut b, clicks) = mount(&host, false);

        assert!(!b.click());
        assert_eq!(clicks.get(), 0);

        b.pointer(Some((280.0, 136.0)));
        assert!(b.click());
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_failed_camera_keeps_layer_hidden() {
        let host = ManualHost::default();
        let (mut b, _) = mount(&host, true);
        host.resolve_err(0);
        b.update(0.016);

        assert!(!b.camera_bound());
        assert_eq!(b.camera_layer_target(), 0.0);
        b.update(1.0);
        assert_eq!(b.camera_layer_target(), 0.0);
    }

    #[test]
    fn test_bound_camera_shows_layer_and_teardown_releases() {
        let host = ManualHost::default();
        let (mut b, _) = mount(&host, true);
        host.resolve_ok(0);
        b.update(0.016);

        assert!(b.camera_bound());
        assert_eq!(b.camera_layer_target(), 1.0);

        drop(b);
        assert_eq!(host.stops(), 1);
    }

    #[test]
    fn test_toggle_from_parent_releases() {
        let host = ManualHost::default();
        let (mut b, _) = mount(&host, false);
        assert_eq!(host.requests(), 0);

        b.set_camera_enabled(true);
        host.resolve_ok(0);
        b.update(0.016);
        b.set_camera_enabled(false);
        b.update(0.016);

        assert!(!b.camera_bound());
        assert_eq!(b.camera_layer_target(), 0.0);
        assert_eq!(host.stops(), 1);
    }

    #[test]
    fn test_render_stays_in_bounds() {
        let host = ManualHost::default();
        let (mut b, _) = mount(&host, true);
        host.resolve_ok(0);
        b.pointer(Some((120.0, 110.0)));
        b.update(0.5);

        // Button hanging off the right edge must not panic.
        let mut fb = FrameBuffer::new(400, 200, 0);
        b.render(&mut fb, 1.0);
        assert!(fb.pixels.iter().any(|&p| p != 0));
    }
}
