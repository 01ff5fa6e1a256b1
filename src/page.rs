// The page around the button: owns the camera toggle and the scenery.
// Visual outcomes:
// - Near-black background with a faint grid that fades out toward the edges.
// - A dim ambient glow in the centre and a field of twinkling stars.
// - The button, and below it a "CAMERA MODE" label with a sliding switch.

use rand::Rng;

use crate::button::{self, ClickHandler, CosmicButton};
use crate::draw::{blend_pixel, draw_text, fill_pill, lerp_color, radial_glow, stroke_pill, text_width};
use crate::fx::{Fade, Starfield};
use crate::lifecycle::CaptureHost;
use crate::types::{FrameBuffer, Rect};

const NEUTRAL_950: u32 = 0x0A0A0A;
const NEUTRAL_900: u32 = 0x171717;
const NEUTRAL_800: u32 = 0x262626;
const NEUTRAL_700: u32 = 0x404040;
const NEUTRAL_500: u32 = 0x737373;
const INDIGO_600: u32 = 0x4F46E5;

const GRID: usize = 60;          // px between grid lines
const GAP: f32 = 96.0;           // space between button and controls
const CAPTION: &str = "CAMERA MODE";
const CAPTION_SCALE: i32 = 2;

/// One frame's worth of window input.
#[derive(Clone, Copy, Debug, Default)]
pub struct Input {
    pub pointer: Option<(f32, f32)>,
    pub clicked: bool,    // left button went down this frame
    pub toggle_key: bool, // keyboard shortcut for camera mode
}

/// 48x24 switch. Visual: knob slides right and the track turns indigo when on.
pub struct ToggleSwitch {
    bounds: Rect,
    knob: Fade, // 0 = off position, 1 = on position
}

impl ToggleSwitch {
    pub fn new(bounds: Rect, checked: bool) -> Self {
        Self { bounds, knob: Fade::new(if checked { 1.0 } else { 0.0 }, 0.3) }
    }

    pub fn hit(&self, (x, y): (f32, f32)) -> bool {
        self.bounds.pill_contains(x, y)
    }

    pub fn update(&mut self, checked: bool, dt: f32) {
        self.knob.set_target(if checked { 1.0 } else { 0.0 });
        self.knob.step(dt);
    }

    pub fn render(&self, fb: &mut FrameBuffer) {
        let v = self.knob.value();
        fill_pill(fb, self.bounds, lerp_color(NEUTRAL_800, INDIGO_600, v), 1.0);
        stroke_pill(fb, self.bounds, 1.0, NEUTRAL_700, 1.0 - v);

        let knob = Rect::new(self.bounds.x + 4.0 + 24.0 * v, self.bounds.y + 4.0, 16.0, 16.0);
        fill_pill(fb, knob.inset(-1.0), 0x000000, 0.2); // soft shadow
        fill_pill(fb, knob, 0xFFFFFF, 1.0);
    }
}

pub struct Page<H: CaptureHost> {
    width: usize,
    height: usize,
    camera_enabled: bool,
    button: CosmicButton<H>,
    controls: Rect,
    toggle: ToggleSwitch,
    stars: Starfield,
    t: f32,
}

impl<H: CaptureHost> Page<H> {
    pub fn new<R: Rng>(
        host: H,
        (width, height): (usize, usize),
        label: &str,
        camera_enabled: bool,
        on_click: ClickHandler,
        rng: &mut R,
    ) -> Self {
        // Column: button, gap, controls row; centred on the page.
        let (bw, bh) = button::size_for(label);
        let ctrl_w = text_width(CAPTION, CAPTION_SCALE) as f32 + 12.0 + 48.0 + 40.0;
        let ctrl_h = 40.0;
        let top = (height as f32 - (bh + GAP + ctrl_h)) * 0.5;
        let cx = width as f32 * 0.5;

        let button_rect = Rect::centered(cx, top + bh * 0.5, bw, bh);
        let controls = Rect::centered(cx, top + bh + GAP + ctrl_h * 0.5, ctrl_w, ctrl_h);
        let toggle_rect = Rect::new(controls.x + controls.w - 20.0 - 48.0, controls.y + 8.0, 48.0, 24.0);

        Self {
            width,
            height,
            camera_enabled,
            stars: Starfield::generate(rng, Starfield::COUNT),
            button: CosmicButton::new(host, label, camera_enabled, button_rect, on_click, rng),
            controls,
            toggle: ToggleSwitch::new(toggle_rect, camera_enabled),
            t: 0.0,
        }
    }

    pub fn camera_enabled(&self) -> bool {
        self.camera_enabled
    }

    pub fn button(&self) -> &CosmicButton<H> {
        &self.button
    }

    pub fn toggle_bounds(&self) -> Rect {
        self.toggle.bounds
    }

    pub fn handle_input(&mut self, input: Input) {
        self.button.pointer(input.pointer);

        // A click lands on the button first; only a miss can reach the switch.
        if input.clicked
            && !self.button.click()
            && input.pointer.is_some_and(|p| self.toggle.hit(p))
        {
            self.camera_enabled = !self.camera_enabled;
        }
        if input.toggle_key {
            self.camera_enabled = !self.camera_enabled;
        }

        // Pass the flag down; the button decides what that means for the camera.
        self.button.set_camera_enabled(self.camera_enabled);
    }

    pub fn update(&mut self, dt: f32) {
        self.t += dt;
        self.button.update(dt);
        self.toggle.update(self.camera_enabled, dt);
    }

    pub fn render(&self, fb: &mut FrameBuffer) {
        fb.clear(NEUTRAL_950);
        self.render_grid(fb);

        // Ambient centre glow for atmosphere
        let centre = (self.width as f32 * 0.5, self.height as f32 * 0.5);
        let glow = Rect::centered(centre.0, centre.1, 700.0, 700.0);
        radial_glow(fb, glow, centre, 350.0, 1.0, NEUTRAL_800, 0.2);

        self.stars.render(fb, self.t);
        self.button.render(fb, self.t);
        self.render_controls(fb);
    }

    /// 1px lines every GRID px, masked by a radial falloff (solid to 40%, gone at the corners).
    fn render_grid(&self, fb: &mut FrameBuffer) {
        let (cx, cy) = (self.width as f32 * 0.5, self.height as f32 * 0.5);
        let far = (cx * cx + cy * cy).sqrt();
        let mask = |x: usize, y: usize| {
            let (dx, dy) = (x as f32 - cx, y as f32 - cy);
            let d = (dx * dx + dy * dy).sqrt() / far;
            (1.0 - (d - 0.4) / 0.6).clamp(0.0, 1.0)
        };
        for y in 0..self.height {
            for x in 0..self.width {
                if x % GRID == 0 || y % GRID == 0 {
                    blend_pixel(fb, x as i32, y as i32, 0xFFFFFF, 0.05 * mask(x, y));
                }
            }
        }
    }

    fn render_controls(&self, fb: &mut FrameBuffer) {
        fill_pill(fb, self.controls, NEUTRAL_900, 0.5);
        stroke_pill(fb, self.controls, 1.0, 0xFFFFFF, 0.05);

        let color = if self.camera_enabled { 0xFFFFFF } else { NEUTRAL_500 };
        let tx = (self.controls.x + 20.0) as i32;
        let ty = (self.controls.y + (self.controls.h - (7 * CAPTION_SCALE) as f32) * 0.5) as i32;
        draw_text(fb, tx, ty, CAPTION, CAPTION_SCALE, color, 1.0);

        self.toggle.render(fb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::tests::ManualHost;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn page(host: &ManualHost, enabled: bool) -> Page<ManualHost> {
        Page::new(
            host.clone(),
            (960, 600),
            "Get Started",
            enabled,
            Box::new(|| {}),
            &mut StdRng::seed_from_u64(3),
        )
    }

    fn click_at(p: (f32, f32)) -> Input {
        Input { pointer: Some(p), clicked: true, toggle_key: false }
    }

    #[test]
    fn test_layout_is_centred_and_ordered() {
        let host = ManualHost::default();
        let pg = page(&host, false);
        let b = pg.button().bounds();
        assert!((b.center().0 - 480.0).abs() < 0.01);
        assert!(pg.toggle_bounds().y > b.y + b.h);
    }

    #[test]
    fn test_switch_click_toggles_camera() {
        let host = ManualHost::default();
        let mut pg = page(&host, false);
        assert_eq!(host.requests(), 0);

        let knob = pg.toggle_bounds().center();
        pg.handle_input(click_at(knob));
        assert!(pg.camera_enabled());
        assert_eq!(host.requests(), 1);

        pg.handle_input(click_at(knob));
        assert!(!pg.camera_enabled());
    }

    #[test]
    fn test_key_toggles_and_button_click_does_not() {
        let host = ManualHost::default();
        let mut pg = page(&host, true);

        let centre = pg.button().bounds().center();
        pg.handle_input(click_at(centre));
        assert!(pg.camera_enabled());

        pg.handle_input(Input { pointer: None, clicked: false, toggle_key: true });
        assert!(!pg.camera_enabled());
    }

    #[test]
    fn test_full_frame_renders() {
        let host = ManualHost::default();
        let mut pg = page(&host, true);
        host.resolve_ok(0);
        pg.update(0.5);

        let mut fb = FrameBuffer::new(960, 600, 0);
        pg.render(&mut fb);
        assert!(fb.pixels.iter().all(|&p| p != 0));

        // Camera mode is on: the switch track left of the knob is indigo.
        let track = pg.toggle_bounds();
        let (x, y) = ((track.x + 10.0) as usize, track.center().1 as usize);
        assert_eq!(fb.pixels[y * 960 + x], INDIGO_600);
    }
}
