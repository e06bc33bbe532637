//! RGB pixel buffer abstraction over a PNG source, and the preview-image
//! side effect (§6.3).
//!
//! This is the concrete backend for the "RGB pixel buffer provider"
//! collaborator: width, height, and `get_pixel(x, y) -> (r, g, b)`. Alpha is
//! blended against white, matching how a label printed on white tape would
//! actually render a transparent pixel.

use crate::error::Error;
use png::ColorType;
use std::io::Write;
use std::path::Path;

/// An in-memory RGB image: one byte per channel, no alpha.
#[derive(Debug, Clone)]
pub struct RgbImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbImage {
    /// A black image of the given dimensions.
    pub fn blank(width: u32, height: u32) -> Self {
        RgbImage {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 3],
        }
    }

    /// Decode a PNG file into an [`RgbImage`].
    ///
    /// The decoder is asked to expand paletted images to RGB(A) and sub-byte
    /// grayscale depths to 8 bits, so `Indexed` should never reach [`to_rgb`]
    /// in practice; that branch is a hard rejection, not a silent
    /// misinterpretation of palette indices as color channels.
    pub fn decode_png(path: &Path) -> Result<Self, Error> {
        let file = std::fs::File::open(path)?;
        let mut decoder = png::Decoder::new(file);
        decoder.set_transformations(png::Transformations::EXPAND);
        let mut reader = decoder.read_info()?;
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;
        let width = info.width;
        let height = info.height;
        let pixels = to_rgb(&buf[..info.buffer_size()], info.color_type)?;
        log::debug!(
            "decoded PNG {}x{} ({:?}) from {}",
            width,
            height,
            info.color_type,
            path.display()
        );
        Ok(RgbImage { width, height, pixels })
    }

    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        (self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2])
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: (u8, u8, u8)) {
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        self.pixels[idx] = rgb.0;
        self.pixels[idx + 1] = rgb.1;
        self.pixels[idx + 2] = rgb.2;
    }

    /// Write this image out as a PNG, for the `/tmp/preview.png` convenience
    /// hook (§6.3, §9). Failures are the caller's concern to log and ignore.
    pub fn write_png(&self, path: &Path) -> Result<(), Error> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        let mut encoder = png::Encoder::new(&mut writer, self.width, self.height);
        encoder.set_color(ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut png_writer = encoder.write_header()?;
        png_writer.write_image_data(&self.pixels)?;
        png_writer.finish()?;
        writer.flush()?;
        Ok(())
    }
}

fn to_rgb(buf: &[u8], color_type: ColorType) -> Result<Vec<u8>, Error> {
    let pixels = match color_type {
        ColorType::Rgb => buf.to_vec(),
        ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g]).collect(),
        ColorType::Rgba => buf
            .chunks(4)
            .flat_map(|rgba| {
                let alpha = rgba[3] as f32 / 255.0;
                let blend = |c: u8| (c as f32 * alpha + 255.0 * (1.0 - alpha)) as u8;
                [blend(rgba[0]), blend(rgba[1]), blend(rgba[2])]
            })
            .collect(),
        ColorType::GrayscaleAlpha => buf
            .chunks(2)
            .flat_map(|ga| {
                let alpha = ga[1] as f32 / 255.0;
                let blend = (ga[0] as f32 * alpha + 255.0 * (1.0 - alpha)) as u8;
                [blend, blend, blend]
            })
            .collect(),
        ColorType::Indexed => return Err(Error::UnsupportedPngColor(color_type)),
    };
    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_image_is_all_black() {
        let img = RgbImage::blank(3, 2);
        assert_eq!(img.get_pixel(0, 0), (0, 0, 0));
        assert_eq!(img.get_pixel(2, 1), (0, 0, 0));
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut img = RgbImage::blank(2, 2);
        img.set_pixel(1, 0, (10, 20, 30));
        assert_eq!(img.get_pixel(1, 0), (10, 20, 30));
        assert_eq!(img.get_pixel(0, 0), (0, 0, 0));
    }

    #[test]
    fn rgba_fully_transparent_blends_to_white() {
        let buf = [0u8, 0, 0, 0];
        let rgb = to_rgb(&buf, ColorType::Rgba).unwrap();
        assert_eq!(&rgb[..3], &[255, 255, 255]);
    }

    #[test]
    fn rgba_fully_opaque_keeps_color() {
        let buf = [10u8, 20, 30, 255];
        let rgb = to_rgb(&buf, ColorType::Rgba).unwrap();
        assert_eq!(&rgb[..3], &[10, 20, 30]);
    }

    #[test]
    fn indexed_color_is_rejected_rather_than_misread() {
        let buf = [0u8, 1, 2, 3];
        assert!(matches!(
            to_rgb(&buf, ColorType::Indexed),
            Err(Error::UnsupportedPngColor(ColorType::Indexed))
        ));
    }
}
