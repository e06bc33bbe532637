//! Tape geometry: maps a human-readable tape id to the print head's pin layout.
//!
//! The print head has 560 pins. Every tape width leaves an unprintable margin
//! of pins on each side; the catalog below gives the raw `(low, high)` margin
//! pair for each tape as found on the device, and [`TapeGeometry::resolve`]
//! turns that into the `left`/`right`/`usable_height` a [`crate::raster`]
//! emitter actually needs.

use crate::error::GeometryError;

/// Total pin count across the print head.
pub const TOTAL_PINS: u32 = 560;

/// One catalog entry: a tape id, its raw margin pair (as read off the
/// device's own tables, before the left/right swap), and the byte placed in
/// the `PrintInformation` command's media-width field.
struct CatalogEntry {
    id: &'static str,
    margins: Option<(u32, u32)>,
    media_width_byte: u8,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry { id: "3.5 mm", margins: Some((248, 264)), media_width_byte: 4 },
    CatalogEntry { id: "6 mm", margins: Some((240, 256)), media_width_byte: 6 },
    CatalogEntry { id: "9 mm", margins: Some((219, 235)), media_width_byte: 9 },
    CatalogEntry { id: "12 mm", margins: Some((197, 213)), media_width_byte: 12 },
    CatalogEntry { id: "18 mm", margins: Some((155, 171)), media_width_byte: 18 },
    CatalogEntry { id: "24 mm", margins: Some((112, 128)), media_width_byte: 24 },
    CatalogEntry { id: "36 mm", margins: Some((45, 61)), media_width_byte: 36 },
    CatalogEntry { id: "HS 5.8 mm", margins: Some((244, 260)), media_width_byte: 6 },
    CatalogEntry { id: "HS 8.8 mm", margins: Some((224, 240)), media_width_byte: 9 },
    CatalogEntry { id: "HS 11.7 mm", margins: Some((206, 222)), media_width_byte: 12 },
    CatalogEntry { id: "HS 17.7 mm", margins: Some((166, 182)), media_width_byte: 18 },
    CatalogEntry { id: "HS 23.6 mm", margins: Some((144, 160)), media_width_byte: 24 },
    CatalogEntry { id: "FLe 21 mm x 45 mm", margins: None, media_width_byte: 21 },
];

fn lookup(tape_id: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|e| e.id == tape_id)
}

/// A resolved tape geometry: pin margins and the usable source-pixel height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub left_margin_pins: u32,
    pub right_margin_pins: u32,
    pub usable_height: u32,
    pub media_width_byte: u8,
}

/// Resolves tape ids to print-head geometry.
pub struct TapeGeometry;

impl TapeGeometry {
    /// Resolve `tape_id` against the catalog.
    ///
    /// `image_height_px` is the number of source image rows that will be
    /// printed. If `center` is true, any slack between the image height and
    /// the tape's usable height is distributed symmetrically; otherwise the
    /// image must exactly fill the usable height.
    pub fn resolve(
        tape_id: &str,
        center: bool,
        image_height_px: u32,
    ) -> Result<Geometry, GeometryError> {
        let entry =
            lookup(tape_id).ok_or_else(|| GeometryError::UnknownTape(tape_id.to_string()))?;
        let (low, high) = entry
            .margins
            .ok_or_else(|| GeometryError::UnknownTape(tape_id.to_string()))?;

        // Output is mirrored: the catalog's (low, high) become (right, left).
        let left = high;
        let mut right = low;
        let remainder = (left + right) % 4;
        if remainder != 0 {
            right += 4 - remainder;
        }
        let usable_height = (TOTAL_PINS - left - right) / 4;

        if left + image_height_px * 4 + right > TOTAL_PINS {
            return Err(GeometryError::ImageTooTall {
                tape: tape_id.to_string(),
                image_height: image_height_px,
                usable: usable_height,
            });
        }

        if center {
            let mut left = left;
            let mut right = right;
            if usable_height >= image_height_px {
                let slack = (usable_height - image_height_px) * 2;
                left += slack;
                right += slack;
            }
            Ok(Geometry {
                left_margin_pins: left,
                right_margin_pins: right,
                usable_height,
                media_width_byte: entry.media_width_byte,
            })
        } else if image_height_px != usable_height {
            Err(GeometryError::GeometryMismatch {
                tape: tape_id.to_string(),
                image_height: image_height_px,
                usable: usable_height,
            })
        } else {
            Ok(Geometry {
                left_margin_pins: left,
                right_margin_pins: right,
                usable_height,
                media_width_byte: entry.media_width_byte,
            })
        }
    }

    /// Look up just the media-width byte, without requiring pin geometry to
    /// be defined (some tapes, like `FLe 21 mm x 45 mm`, have a width byte
    /// but no published margin pair).
    pub fn media_width_byte(tape_id: &str) -> Option<u8> {
        lookup(tape_id).map(|e| e.media_width_byte)
    }

    /// The usable source-pixel height for `tape_id`, independent of any
    /// particular image (used by test-pattern emission, which always fills
    /// the full usable height).
    pub fn usable_height(tape_id: &str) -> Result<u32, GeometryError> {
        let entry =
            lookup(tape_id).ok_or_else(|| GeometryError::UnknownTape(tape_id.to_string()))?;
        let (low, high) = entry
            .margins
            .ok_or_else(|| GeometryError::UnknownTape(tape_id.to_string()))?;
        let left = high;
        let mut right = low;
        let remainder = (left + right) % 4;
        if remainder != 0 {
            right += 4 - remainder;
        }
        Ok((TOTAL_PINS - left - right) / 4)
    }

    /// All tape ids known to the catalog, in declaration order.
    pub fn known_tape_ids() -> impl Iterator<Item = &'static str> {
        CATALOG.iter().map(|e| e.id)
    }
}
