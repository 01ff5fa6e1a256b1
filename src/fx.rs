// FX: starfield, sparkles inside the button, fog band, glows and fades.
// Everything random here is generated once from a seedable RNG and never
// recomputed; only time moves things.

use rand::Rng;

use crate::draw::{add_rgb_saturating, blend_pixel, for_each_text_pixel, pill_coverage};
use crate::types::{FrameBuffer, Rect};

// ----------------------------- timing helpers ------------------------------------------

/// Opacity of a "pulse" keyframe loop: `base` → 0.5 → `base` over `period`.
/// Before `delay` has elapsed the element sits at `base`.
pub fn pulse(t: f32, delay: f32, period: f32, base: f32) -> f32 {
    if t < delay || period <= 0.0 {
        return base;
    }
    let phase = ((t - delay) / period).fract();
    let toward_half = 0.5 * (1.0 - (phase * std::f32::consts::TAU).cos());
    base + (0.5 - base) * toward_half
}

/// An eased opacity transition toward a target, like a CSS `transition-opacity`.
#[derive(Clone, Debug)]
pub struct Fade {
    from: f32,
    target: f32,
    progress: f32, // 0..1 through the current transition
    duration: f32, // seconds
}

impl Fade {
    pub fn new(value: f32, duration: f32) -> Self {
        Self { from: value, target: value, progress: 1.0, duration }
    }

    /// Retarget. Starts a new transition from wherever we are right now.
    pub fn set_target(&mut self, target: f32) {
        if (target - self.target).abs() < f32::EPSILON {
            return;
        }
        self.from = self.value();
        self.target = target;
        self.progress = 0.0;
    }

    pub fn step(&mut self, dt: f32) {
        if self.duration <= 0.0 {
            self.progress = 1.0;
        } else {
            self.progress = (self.progress + dt / self.duration).min(1.0);
        }
    }

    pub fn value(&self) -> f32 {
        // ease-in-out (smoothstep)
        let p = self.progress;
        let e = p * p * (3.0 - 2.0 * p);
        self.from + (self.target - self.from) * e
    }

    pub fn target(&self) -> f32 {
        self.target
    }
}

// ----------------------------- glow primitives -----------------------------------------

/// Draw a soft round glow disc centered at (cx,cy) with additive blending.
/// `radius` in pixels; `strength` in [0,1] scales brightness; `base` is the color.
/// Visual: a fuzzy dot of light. Nearby pixels brighten more than far pixels.
pub fn draw_additive_disc(
    fb: &mut FrameBuffer,
    cx: i32, cy: i32,
    radius: i32,
    base_r: u8, base_g: u8, base_b: u8,
    strength: f32
) {
    if radius <= 0 || strength <= 0.0 { return; }
    let r = radius;
    let r2 = (r * r) as f32;
    let sigma = (r as f32) * 0.5;             // softness; smaller = sharper edge
    let denom = 2.0 * sigma * sigma;

    for y in (cy - r)..=(cy + r) {
        for x in (cx - r)..=(cx + r) {
            let dx = (x - cx) as f32;
            let dy = (y - cy) as f32;
            let d2 = dx*dx + dy*dy;
            if d2 > r2 { continue; }

            // Gaussian falloff: 1.0 at center → ~0 at edge
            let w = (-d2 / denom).exp() * strength;

            let r = (base_r as f32 * w).round().clamp(0.0, 255.0) as u8;
            let g = (base_g as f32 * w).round().clamp(0.0, 255.0) as u8;
            let b = (base_b as f32 * w).round().clamp(0.0, 255.0) as u8;

            add_rgb_saturating(fb, x, y, r, g, b);
        }
    }
}

/// Soft white halo behind text; one disc per glyph cell (not per scaled pixel).
/// Visual: the label seems to emit light; `strength` rises on hover.
pub fn text_glow(fb: &mut FrameBuffer, text: &str, x: i32, y: i32, scale: i32, strength: f32) {
    let half = scale / 2;
    let radius = scale * 2;
    for_each_text_pixel(text, 0, 0, 1, |cx, cy| {
        draw_additive_disc(
            fb,
            x + cx * scale + half,
            y + cy * scale + half,
            radius,
            255, 255, 255,
            strength,
        );
    });
}

/// Diagonal band of faint light drifting across the pill (screen blend).
/// Visual: a slow "smoke" sheen; barely there, but the body never looks flat.
pub fn fog_band(fb: &mut FrameBuffer, pill: Rect, t: f32, strength: f32) {
    const PERIOD: f32 = 8.0; // seconds for one sweep
    let span = pill.w + pill.h;
    let centre = pill.x - pill.h + span * ((t / PERIOD).fract() * 2.0 - 0.5);
    let width = pill.h * 0.8;

    let x0 = pill.x.max(0.0) as i32;
    let y0 = pill.y.max(0.0) as i32;
    let x1 = ((pill.x + pill.w) as i32).min(fb.width as i32);
    let y1 = ((pill.y + pill.h) as i32).min(fb.height as i32);
    for y in y0..y1 {
        for x in x0..x1 {
            // 45° band: distance along x shifted by how far down we are
            let u = x as f32 + (y as f32 - pill.y) - centre;
            let w = (-(u * u) / (2.0 * width * width)).exp() * strength * pill_coverage(pill, x, y);
            let v = (255.0 * w).round() as u8;
            if v > 0 {
                add_rgb_saturating(fb, x, y, v, v, v);
            }
        }
    }
}

// ----------------------------- starfield -----------------------------------------------

/// One background star. Position is a fraction of the page (0..1).
#[derive(Clone, Debug)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub size: i32,     // 1 or 2 px
    pub delay: f32,    // seconds before it starts twinkling (invisible until then)
    pub duration: f32, // seconds per twinkle
}

pub struct Starfield {
    stars: Vec<Star>,
}

impl Starfield {
    pub const COUNT: usize = 70;

    pub fn generate<R: Rng>(rng: &mut R, count: usize) -> Self {
        let stars = (0..count)
            .map(|_| Star {
                x: rng.r#gen::<f32>(),
                y: rng.r#gen::<f32>(),
                size: if rng.r#gen::<f32>() > 0.8 { 2 } else { 1 },
                delay: rng.r#gen::<f32>() * 3.0,
                duration: 2.0 + rng.r#gen::<f32>() * 3.0,
            })
            .collect();
        Self { stars }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Visual: white dots scattered over the page, each gently breathing.
    pub fn render(&self, fb: &mut FrameBuffer, t: f32) {
        let (w, h) = (fb.width as f32, fb.height as f32);
        for s in &self.stars {
            // Stars start transparent and only ever brighten to half.
            let alpha = pulse(t, s.delay, s.duration, 0.0);
            if alpha <= 0.0 { continue; }
            let px = (s.x * w) as i32;
            let py = (s.y * h) as i32;
            for dy in 0..s.size {
                for dx in 0..s.size {
                    blend_pixel(fb, px + dx, py + dy, 0xFFFFFF, alpha);
                }
            }
        }
    }
}

// ----------------------------- particles (sparkles) ------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    Pulse,
    Float,
}

/// One sparkle inside the button. Position is a fraction of the pill's box.
#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub size: i32,     // 1 or 2 px
    pub motion: Motion,
    pub delay: f32,    // seconds
    pub opacity: f32,  // 0.3..0.8
}

pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub const COUNT: usize = 13;

    pub fn generate<R: Rng>(rng: &mut R, count: usize) -> Self {
        let particles = (0..count)
            .map(|_| Particle {
                x: rng.r#gen::<f32>(),
                y: rng.r#gen::<f32>(),
                size: if rng.r#gen::<f32>() < 0.3 { 2 } else { 1 },
                motion: if rng.r#gen::<f32>() > 0.5 { Motion::Pulse } else { Motion::Float },
                delay: rng.r#gen::<f32>() * 2.0,
                opacity: 0.3 + rng.r#gen::<f32>() * 0.5,
            })
            .collect();
        Self { particles }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Visual: tiny glinting dots inside the glass, clipped to the pill.
    pub fn render(&self, fb: &mut FrameBuffer, pill: Rect, t: f32) {
        for p in &self.particles {
            let (dy, opacity) = match p.motion {
                Motion::Pulse => (0.0, pulse(t, p.delay, 2.0, p.opacity)),
                Motion::Float => {
                    // Fast bob: 3 px up and down every 3 s
                    let phase = ((t - p.delay).max(0.0) / 3.0) * std::f32::consts::TAU;
                    (-3.0 * phase.sin(), p.opacity)
                }
            };
            let px = (pill.x + p.x * pill.w) as i32;
            let py = (pill.y + p.y * pill.h + dy) as i32;
            let alpha = opacity * pill_coverage(pill, px, py);
            if alpha <= 0.0 { continue; }

            // Halo first (box-shadow-ish), then the solid dot.
            draw_additive_disc(fb, px, py, 2 + p.size, 255, 255, 255, 0.8 * alpha * 0.5);
            for oy in 0..p.size {
                for ox in 0..p.size {
                    blend_pixel(fb, px + ox, py + oy, 0xFFFFFF, alpha);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_starfield_count_and_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let field = Starfield::generate(&mut rng, Starfield::COUNT);
        assert_eq!(field.stars().len(), 70);
        for s in field.stars() {
            assert!((0.0..1.0).contains(&s.x) && (0.0..1.0).contains(&s.y));
            assert!(s.size == 1 || s.size == 2);
            assert!((0.0..=3.0).contains(&s.delay));
            assert!((2.0..=5.0).contains(&s.duration));
        }
    }

    #[test]
    fn test_particle_field_count_and_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let field = ParticleField::generate(&mut rng, ParticleField::COUNT);
        assert_eq!(field.particles().len(), 13);
        for p in field.particles() {
            assert!((0.3..=0.8).contains(&p.opacity));
            assert!((0.0..=2.0).contains(&p.delay));
        }
    }

    #[test]
    fn test_same_seed_same_sky() {
        let a = Starfield::generate(&mut StdRng::seed_from_u64(42), 10);
        let b = Starfield::generate(&mut StdRng::seed_from_u64(42), 10);
        for (sa, sb) in a.stars().iter().zip(b.stars()) {
            assert_eq!((sa.x, sa.y, sa.size), (sb.x, sb.y, sb.size));
        }
    }

    #[test]
    fn test_pulse_holds_base_before_delay() {
        assert_eq!(pulse(0.5, 1.0, 2.0, 0.0), 0.0);
        assert_eq!(pulse(0.5, 1.0, 2.0, 0.7), 0.7);
        assert_eq!(pulse(1.0, 1.0, 2.0, 0.7), 0.7);
    }

    #[test]
    fn test_pulse_swings_between_base_and_half() {
        // Half a period in, every element sits at 0.5 whatever its base.
        for base in [0.0, 0.3, 0.8] {
            assert!((pulse(2.0, 1.0, 2.0, base) - 0.5).abs() < 1e-5);
            assert!((pulse(3.0, 1.0, 2.0, base) - base).abs() < 1e-5);
        }
        // A star (base 0) never gets brighter than half.
        let peak = (0..200).map(|i| pulse(i as f32 * 0.05, 0.0, 2.0, 0.0)).fold(0.0, f32::max);
        assert!(peak <= 0.5 + 1e-6 && peak > 0.49);
    }

    #[test]
    fn test_star_renders_at_most_half_bright() {
        for seed in 0..20 {
            let sky = Starfield::generate(&mut StdRng::seed_from_u64(seed), 1);
            let mut fb = FrameBuffer::new(200, 100, 0);
            sky.render(&mut fb, 0.0);
            assert!(fb.pixels.iter().all(|&p| p == 0), "seed {seed}: visible before its delay");

            let mut brightest = 0;
            for step in 0..160 {
                let mut fb = FrameBuffer::new(200, 100, 0);
                sky.render(&mut fb, step as f32 * 0.05);
                brightest = fb.pixels.iter().map(|&p| p & 0xFF).fold(brightest, u32::max);
            }
            assert!(brightest > 0 && brightest <= 0x80, "seed {seed}: peak {brightest:#x}");
        }
    }

    #[test]
    fn test_fade_reaches_target_after_duration() {
        let mut f = Fade::new(0.0, 0.5);
        f.set_target(0.4);
        f.step(0.25);
        let halfway = f.value();
        assert!(halfway > 0.0 && halfway < 0.4);
        f.step(0.25);
        assert!((f.value() - 0.4).abs() < 1e-6);
        f.step(1.0);
        assert!((f.value() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_fade_retarget_starts_from_current_value() {
        let mut f = Fade::new(1.0, 1.0);
        f.set_target(0.0);
        f.step(0.5);
        let v = f.value();
        f.set_target(1.0);
        assert!((f.value() - v).abs() < 1e-6);
    }
}
