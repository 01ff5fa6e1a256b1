// Turns a raw camera frame into the "mirror" inside the button.
// Visual: you see yourself flipped left↔right, slightly desaturated and soft,
// filling the pill edge to edge (cropped, never letterboxed).

use image::{RgbImage, imageops};

use crate::draw::{blend_pixel, pill_coverage, rgb};
use crate::types::{FrameBuffer, Rect};

/// How much colour is pulled toward gray (0 = none, 1 = full grayscale).
const GRAYSCALE: f32 = 0.2;
/// Gaussian blur sigma in pixels.
const BLUR_SIGMA: f32 = 2.0;

/// Scale `src` so it covers (w,h) completely, then crop the centre.
pub fn cover_fit(src: &RgbImage, w: u32, h: u32) -> RgbImage {
    let (sw, sh) = src.dimensions();
    if sw == 0 || sh == 0 || w == 0 || h == 0 {
        return RgbImage::new(w, h);
    }
    let scale = (w as f32 / sw as f32).max(h as f32 / sh as f32);
    let rw = ((sw as f32 * scale).ceil() as u32).max(w);
    let rh = ((sh as f32 * scale).ceil() as u32).max(h);
    let resized = imageops::resize(src, rw, rh, imageops::FilterType::Triangle);
    imageops::crop_imm(&resized, (rw - w) / 2, (rh - h) / 2, w, h).to_image()
}

/// Pull every pixel `amount` of the way toward its luma.
pub fn desaturate(img: &mut RgbImage, amount: f32) {
    for p in img.pixels_mut() {
        let [r, g, b] = p.0;
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        let mix = |c: u8| (c as f32 + (luma - c as f32) * amount).round().clamp(0.0, 255.0) as u8;
        p.0 = [mix(r), mix(g), mix(b)];
    }
}

/// Full pipeline for one frame: mirror → cover → desaturate → blur.
pub fn mirror_surface(frame: &RgbImage, w: u32, h: u32) -> RgbImage {
    let mirrored = imageops::flip_horizontal(frame);
    let mut fitted = cover_fit(&mirrored, w, h);
    desaturate(&mut fitted, GRAYSCALE);
    imageops::blur(&fitted, BLUR_SIGMA)
}

/// Paint `surface` (already sized to `pill`) into the framebuffer, clipped to the pill.
pub fn composite_in_pill(fb: &mut FrameBuffer, surface: &RgbImage, pill: Rect, alpha: f32) {
    if alpha <= 0.0 {
        return;
    }
    let ox = pill.x.round() as i32;
    let oy = pill.y.round() as i32;
    for (sx, sy, p) in surface.enumerate_pixels() {
        let (x, y) = (ox + sx as i32, oy + sy as i32);
        let a = alpha * pill_coverage(pill, x, y);
        blend_pixel(fb, x, y, rgb(p[0], p[1], p[2]), a);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_cover_fit_fills_target() {
        let src = RgbImage::from_pixel(64, 48, Rgb([10, 20, 30]));
        let out = cover_fit(&src, 300, 70);
        assert_eq!(out.dimensions(), (300, 70));
        assert_eq!(out.get_pixel(150, 35), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_cover_fit_empty_source() {
        let out = cover_fit(&RgbImage::new(0, 0), 8, 4);
        assert_eq!(out.dimensions(), (8, 4));
    }

    #[test]
    fn test_desaturate_partial() {
        let mut img = RgbImage::from_pixel(1, 1, Rgb([255, 0, 0]));
        desaturate(&mut img, 0.2);
        let [r, g, b] = img.get_pixel(0, 0).0;
        // Still mostly red, but pulled toward luma (~76)
        assert!(r < 255 && r > 200);
        assert_eq!(g, b);
        assert!(g > 0);
    }

    #[test]
    fn test_mirror_surface_flips_horizontally() {
        // Left half white, right half black
        let frame = RgbImage::from_fn(40, 20, |x, _| if x < 20 { Rgb([255; 3]) } else { Rgb([0; 3]) });
        let out = mirror_surface(&frame, 40, 20);
        assert!(out.get_pixel(2, 10)[0] < 40);
        assert!(out.get_pixel(37, 10)[0] > 200);
    }
}
