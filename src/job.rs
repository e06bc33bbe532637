//! Orchestrates a multi-copy, multi-image print job into one command stream.

use crate::command::{CommandMode, CommandWriter, PageIndex};
use crate::error::Error;
use crate::image_source::RgbImage;
use crate::raster::RasterEmitter;
use crate::rescale;
use crate::tape::TapeGeometry;

/// Where one job entry's pixels come from.
pub enum ImageSource {
    /// A decoded source image.
    Image(RgbImage),
    /// The synthetic 75-column test pattern (the `-i test` sentinel).
    TestPattern,
}

/// Every CLI-level knob `Job` needs, collected and validated ahead of time
/// (§3: this is the "configuration source" the core codec is tested
/// against without ever invoking `clap`).
#[derive(Debug, Clone)]
pub struct PrintOptions {
    pub tape_id: String,
    pub compressed: bool,
    pub margin_dots: u16,
    pub no_auto_cut: bool,
    pub no_half_cut: bool,
    pub chain_printing: bool,
    pub mirror_printing: bool,
    pub scale_down: bool,
    pub scale_up: bool,
    pub center: bool,
    pub copies: u32,
}

impl Default for PrintOptions {
    fn default() -> Self {
        PrintOptions {
            tape_id: "12 mm".to_string(),
            compressed: false,
            margin_dots: 0,
            no_auto_cut: false,
            no_half_cut: false,
            chain_printing: false,
            mirror_printing: false,
            scale_down: false,
            scale_up: false,
            center: false,
            copies: 1,
        }
    }
}

/// One entry in the job: a source plus the options it prints with.
pub struct JobEntry {
    pub source: ImageSource,
    pub options: PrintOptions,
}

/// An ordered sequence of `(image, options)` entries, each expanded to its
/// `copies` count, forming the overall page sequence for one invocation.
pub struct Job {
    entries: Vec<JobEntry>,
}

impl Job {
    pub fn new(entries: Vec<JobEntry>) -> Self {
        Job { entries }
    }

    /// A job with a single entry, for the common case.
    pub fn single(source: ImageSource, options: PrintOptions) -> Self {
        Job::new(vec![JobEntry { source, options }])
    }

    /// Total number of pages this job will emit (sum of each entry's copies).
    pub fn page_count(&self) -> u32 {
        self.entries.iter().map(|e| e.options.copies.max(1)).sum()
    }

    /// Build the full command stream for this job.
    pub fn compile(self) -> Result<Vec<u8>, Error> {
        let total_pages = self.page_count();
        let mut out = Vec::new();
        let mut page_no = 0u32;

        for entry in self.entries {
            let options = &entry.options;
            let image = match entry.source {
                ImageSource::Image(img) => Some(resolve_image(img, options)?),
                ImageSource::TestPattern => None,
            };

            let geometry = match &image {
                Some(img) => TapeGeometry::resolve(&options.tape_id, options.center, img.height)?,
                None => {
                    let usable = TapeGeometry::usable_height(&options.tape_id)?;
                    TapeGeometry::resolve(&options.tape_id, false, usable)?
                }
            };
            let image_height = image.as_ref().map(|i| i.height).unwrap_or(geometry.usable_height);

            let image_width = image.as_ref().map(|i| i.width).unwrap_or(75);
            let raster_count = 4 * image_width;

            for _ in 0..options.copies.max(1) {
                let page_index = if total_pages == 1 {
                    PageIndex::Last
                } else if page_no == 0 {
                    PageIndex::Starting
                } else if page_no == total_pages - 1 {
                    PageIndex::Last
                } else {
                    PageIndex::Other
                };

                let mut writer = CommandWriter::new();
                writer
                    .switch_dynamic_command_mode(CommandMode::Raster)
                    .print_information_command(
                        false,
                        true,
                        None,
                        Some(geometry.media_width_byte),
                        None,
                        raster_count,
                        page_index,
                    )
                    .various_mode_settings(!options.no_auto_cut, options.mirror_printing)
                    .specify_page_number(1)
                    .advanced_mode_settings(
                        false,
                        !options.no_half_cut,
                        !options.chain_printing,
                        false,
                        false,
                        false,
                    )
                    .specify_margin_amount(options.margin_dots)
                    .select_compression_mode(options.compressed);

                let mut payload = Vec::new();
                let mut emitter = RasterEmitter::new(geometry, options.compressed);
                match &image {
                    Some(img) => emitter.emit_image(img, &mut payload),
                    None => emitter.emit_test_pattern(&mut payload),
                }
                writer.raw_raster_payload(&payload);

                if matches!(page_index, PageIndex::Last) {
                    writer.print_command_with_feeding();
                } else {
                    writer.print_command();
                }

                log::info!(
                    "emitted page {}/{} for tape {:?} ({}x{})",
                    page_no + 1,
                    total_pages,
                    options.tape_id,
                    image_width,
                    image_height
                );
                out.extend_from_slice(&writer.build());
                page_no += 1;
            }
        }

        Ok(out)
    }
}

/// Applies the scale-up/scale-down decision and, when scaling happened,
/// attempts the `/tmp/preview.png` convenience hook (§6.3, §9).
fn resolve_image(image: RgbImage, options: &PrintOptions) -> Result<RgbImage, Error> {
    let geometry = TapeGeometry::resolve(&options.tape_id, true, image.height)
        .or_else(|_| TapeGeometry::resolve(&options.tape_id, false, image.height));
    let usable = geometry.map(|g| g.usable_height).unwrap_or(image.height);

    let mut scaled = image;
    let mut did_scale = false;

    if options.scale_down && scaled.height > usable {
        scaled = rescale::scale_lanczos(&scaled, scaled.width, usable, 3);
        did_scale = true;
    } else if options.scale_up && scaled.height * 2 <= usable {
        scaled = rescale::scale_up_to_fit(&scaled, usable);
        did_scale = true;
    }

    if did_scale {
        if let Err(e) = scaled.write_png(std::path::Path::new("/tmp/preview.png")) {
            log::warn!("failed to write /tmp/preview.png: {e}");
        }
    }

    Ok(scaled)
}

/// Build the 202-byte `initialise` command stream: 200 zero bytes then
/// `ESC '@'`.
pub fn initialise_stream() -> Vec<u8> {
    let mut writer = CommandWriter::new();
    writer.invalidate().initialize();
    writer.build()
}

/// Build the 3-byte `status` request command stream.
pub fn status_request_stream() -> Vec<u8> {
    let mut writer = CommandWriter::new();
    writer.status_information_request();
    writer.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialise_stream_is_202_bytes() {
        let bytes = initialise_stream();
        assert_eq!(bytes.len(), 202);
        assert_eq!(&bytes[200..], b"\x1B\x40");
    }

    #[test]
    fn status_request_stream_is_3_bytes() {
        assert_eq!(status_request_stream(), vec![0x1B, 0x69, 0x53]);
    }

    #[test]
    fn single_copy_job_is_tagged_last() {
        let options = PrintOptions {
            tape_id: "3.5 mm".to_string(),
            copies: 1,
            ..Default::default()
        };
        let job = Job::single(ImageSource::TestPattern, options);
        let bytes = job.compile().unwrap();
        // page_index lives at offset 11 of the PrintInformation command,
        // which starts right after the 4-byte dynamic-mode command.
        assert_eq!(bytes[4..7], *b"\x1B\x69\x7A");
        assert_eq!(bytes[4 + 11], PageIndex::Last as u8);
        assert_eq!(*bytes.last().unwrap(), 0x1A);
    }

    #[test]
    fn multi_copy_job_tags_starting_other_last() {
        let options = PrintOptions {
            tape_id: "3.5 mm".to_string(),
            copies: 3,
            ..Default::default()
        };
        let job = Job::single(ImageSource::TestPattern, options);
        let bytes = job.compile().unwrap();
        // Locate each PrintInformation command by scanning for its prefix.
        let mut page_indices = Vec::new();
        let mut i = 0;
        while i + 3 <= bytes.len() {
            if &bytes[i..i + 3] == b"\x1B\x69\x7A" {
                page_indices.push(bytes[i + 11]);
            }
            i += 1;
        }
        assert_eq!(
            page_indices,
            vec![
                PageIndex::Starting as u8,
                PageIndex::Other as u8,
                PageIndex::Last as u8
            ]
        );
    }

    #[test]
    fn unknown_tape_aborts_before_any_bytes_matter() {
        let options = PrintOptions {
            tape_id: "not a tape".to_string(),
            ..Default::default()
        };
        let job = Job::single(ImageSource::TestPattern, options);
        assert!(job.compile().is_err());
    }
}
