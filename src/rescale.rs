//! Lanczos image rescaling and 2x nearest-neighbor enlargement.

use crate::image_source::RgbImage;

/// Normalized sinc: `sin(pi*x) / (pi*x)`, with `sinc(0) == 1`.
fn normalized_sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        (x * std::f64::consts::PI).sin() / (x * std::f64::consts::PI)
    }
}

/// The Lanczos-`a` kernel.
fn lanczos(x: f64, a: i32) -> f64 {
    if x == 0.0 {
        1.0
    } else if -(a as f64) < x && x < a as f64 {
        normalized_sinc(x) / normalized_sinc(x / a as f64)
    } else {
        0.0
    }
}

/// Resample `src` to `target_width` x `target_height` using Lanczos-`a`
/// interpolation.
pub fn scale_lanczos(src: &RgbImage, target_width: u32, target_height: u32, a: i32) -> RgbImage {
    let mut out = RgbImage::blank(target_width, target_height);
    let scale_x = target_width as f64 / src.width as f64;
    let scale_y = target_height as f64 / src.height as f64;

    for y in 0..target_height {
        let sy = y as f64 / scale_y;
        for x in 0..target_width {
            let sx = x as f64 / scale_x;
            out.set_pixel(x, y, lanczos_at(src, sx, sy, a));
        }
    }
    out
}

fn lanczos_at(src: &RgbImage, source_x: f64, source_y: f64, a: i32) -> (u8, u8, u8) {
    let sx = source_x as i64;
    let sy = source_y as i64;

    let y_lo = (sy - a as i64 + 1).max(0);
    let y_hi = (sy + a as i64).min(src.height as i64 - 1);
    let x_lo = (sx - a as i64 + 1).max(0);
    let x_hi = (sx + a as i64).min(src.width as i64 - 1);

    let mut r = 0.0f64;
    let mut g = 0.0f64;
    let mut b = 0.0f64;

    for py in y_lo..=y_hi {
        for px in x_lo..=x_hi {
            let weight = lanczos(sx as f64 - px as f64, a) * lanczos(sy as f64 - py as f64, a);
            let (pr, pg, pb) = src.get_pixel(px as u32, py as u32);
            r += pr as f64 * weight;
            g += pg as f64 * weight;
            b += pb as f64 * weight;
        }
    }

    (saturate(r), saturate(g), saturate(b))
}

fn saturate(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Repeatedly double the image (nearest-neighbor) while `height*2 <= limit`.
pub fn scale_up_to_fit(src: &RgbImage, limit: u32) -> RgbImage {
    let mut current = RgbImage {
        width: src.width,
        height: src.height,
        pixels: src.pixels.clone(),
    };
    while current.height * 2 <= limit {
        current = double_nearest(&current);
    }
    current
}

fn double_nearest(src: &RgbImage) -> RgbImage {
    let mut out = RgbImage::blank(src.width * 2, src.height * 2);
    for y in 0..out.height {
        for x in 0..out.width {
            out.set_pixel(x, y, src.get_pixel(x / 2, y / 2));
        }
    }
    out
}
