//! Turns source image columns into framed raster command bytes.

use crate::dither;
use crate::image_source::RgbImage;
use crate::rle;
use crate::tape::Geometry;

/// Width of the printer head in bytes (560 pins / 8).
pub const LINE_BYTES: usize = 70;

/// Synthesizes and frames the 4 printer pin-lines for each source column.
///
/// The dither alternation flag lives here, per emitter instance, rather than
/// as module-level state (§4.2, §9) — building two emitters for two images
/// in the same [`crate::job::Job`] never causes one to perturb the other's
/// striping.
pub struct RasterEmitter {
    geometry: Geometry,
    compressed: bool,
    transpose: bool,
}

impl RasterEmitter {
    pub fn new(geometry: Geometry, compressed: bool) -> Self {
        RasterEmitter {
            geometry,
            compressed,
            transpose: false,
        }
    }

    /// Number of 70-byte pin-lines one source column contributes to the wire
    /// (always 4, independent of compression).
    pub const LINES_PER_COLUMN: usize = 4;

    /// Emit the framed raster payload for every column of `image`, appending
    /// to `out`.
    pub fn emit_image(&mut self, image: &RgbImage, out: &mut Vec<u8>) {
        for x in 0..image.width {
            self.emit_column(image.height, |y| image.get_pixel(x, y), out);
        }
    }

    /// Emit a synthetic test pattern (ignores any image): 75 columns, with
    /// intensity `v = x/8 + 1` held constant down the full usable height.
    pub fn emit_test_pattern(&mut self, out: &mut Vec<u8>) {
        const TEST_WIDTH: u32 = 75;
        let height = self.geometry.usable_height;
        for x in 0..TEST_WIDTH {
            let v = ((x / 8) + 1).min(15) as u8;
            self.emit_column(height, |_y| v_to_rgb(v), out);
        }
    }

    fn emit_column(
        &mut self,
        image_height: u32,
        pixel_at: impl Fn(u32) -> (u8, u8, u8),
        out: &mut Vec<u8>,
    ) {
        let mut vline = [[0u8; LINE_BYTES]; 4];
        let mut zero_line = [true; 4];

        for y in 0..image_height {
            let (r, g, b) = pixel_at(y);
            let v = dither::intensity(r, g, b);
            let p = dither::mask(v, self.transpose);
            for i in 0..4u32 {
                for j in 0..4u32 {
                    let bit_num = 4 * i + j;
                    if (p >> bit_num) & 1 != 0 {
                        let pin = self.geometry.left_margin_pins + y * 4 + j;
                        let byte = (pin / 8) as usize;
                        let bit = 7 - (pin % 8);
                        vline[i as usize][byte] |= 1 << bit;
                        zero_line[i as usize] = false;
                    }
                }
            }
        }

        for i in 0..4 {
            if zero_line[i] {
                out.push(b'Z');
            } else if self.compressed {
                let packets = rle::encode(&vline[i]);
                out.push(b'G');
                out.extend_from_slice(&(packets.len() as u16).to_le_bytes());
                out.extend_from_slice(&packets);
            } else {
                out.push(b'G');
                out.extend_from_slice(&(LINE_BYTES as u16).to_le_bytes());
                out.extend_from_slice(&vline[i]);
            }
        }

        self.transpose = !self.transpose;
    }
}

/// Inverse of [`dither::intensity`] for a gray pixel: picks a gray level
/// that `dither::intensity` maps back to exactly `v`.
fn v_to_rgb(v: u8) -> (u8, u8, u8) {
    let gray = ((15 - v) as u32 * 16) as u8;
    (gray, gray, gray)
}
