//! Decodes the 32-byte device status reply into typed, humanized fields.

use crate::error::DecodeError;
use std::fmt;

/// A decoded 32-byte status frame.
#[derive(Debug, Clone)]
pub struct Status {
    raw: [u8; 32],
}

impl Status {
    /// Parse a captured status reply. Must be exactly 32 bytes.
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() != 32 {
            return Err(DecodeError::WrongStatusLength(data.len()));
        }
        let mut raw = [0u8; 32];
        raw.copy_from_slice(data);
        let status = Status { raw };
        status.check_constants();
        Ok(status)
    }

    fn check_constants(&self) {
        if self.raw[0] != 0x80 {
            log::warn!("status printHeadMark mismatch: 0x{:02X}", self.raw[0]);
        }
        if self.raw[1] != 0x20 {
            log::warn!("status size mismatch: 0x{:02X}", self.raw[1]);
        }
        if self.raw[2] != 0x42 {
            log::warn!("status brotherCode mismatch: 0x{:02X}", self.raw[2]);
        }
        if self.raw[3] != 0x30 {
            log::warn!("status seriesCode mismatch: 0x{:02X}", self.raw[3]);
        }
        if self.raw[5] != 0x30 {
            log::warn!("status countryCode mismatch: 0x{:02X}", self.raw[5]);
        }
    }

    pub fn raw(&self) -> &[u8; 32] {
        &self.raw
    }

    pub fn model_code(&self) -> ModelCode {
        ModelCode(self.raw[4])
    }

    pub fn battery_level(&self) -> BatteryLevel {
        BatteryLevel(self.raw[6])
    }

    pub fn extended_error(&self) -> ExtendedError {
        ExtendedError(self.raw[7])
    }

    pub fn error_flags(&self) -> ErrorFlags {
        ErrorFlags(u16::from_le_bytes([self.raw[8], self.raw[9]]))
    }

    pub fn has_errors(&self) -> bool {
        self.error_flags().0 != 0
    }

    pub fn media_width(&self) -> MediaWidth {
        MediaWidth(self.raw[10])
    }

    pub fn media_type(&self) -> MediaType {
        MediaType(self.raw[11])
    }

    pub fn number_of_colours(&self) -> u8 {
        self.raw[12]
    }

    pub fn fonts(&self) -> u8 {
        self.raw[13]
    }

    pub fn japanese_fonts(&self) -> u8 {
        self.raw[14]
    }

    pub fn mode(&self) -> u8 {
        self.raw[15]
    }

    pub fn density(&self) -> u8 {
        self.raw[16]
    }

    pub fn media_length(&self) -> u8 {
        self.raw[17]
    }

    pub fn status_type(&self) -> StatusType {
        StatusType(self.raw[18])
    }

    pub fn phase(&self) -> Phase {
        Phase {
            phase_type: self.raw[19],
            phase_number1: self.raw[21],
        }
    }

    pub fn notification_number(&self) -> NotificationNumber {
        NotificationNumber(self.raw[22])
    }

    pub fn tape_colour(&self) -> TapeColour {
        TapeColour(self.raw[24])
    }

    pub fn text_colour(&self) -> TextColour {
        TextColour(self.raw[25])
    }
}

pub struct ModelCode(u8);
impl fmt::Display for ModelCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            0x71 => "PT-P900",
            0x69 => "PT-P900W",
            0x70 => "PT-P950NW",
            0x78 => "PT-P910BT",
            _ => return write!(f, "unknown (0x{:02X})", self.0),
        };
        write!(f, "{name}")
    }
}

pub struct BatteryLevel(u8);
impl fmt::Display for BatteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            0x00 => "full",
            0x01 => "half",
            0x02 => "low",
            0x03 => "charging needed",
            0x04 => "charging in AC adapter",
            0xFF => "AC adapter in use (no battery)",
            _ => return write!(f, "unknown (0x{:02X})", self.0),
        };
        write!(f, "{name}")
    }
}

pub struct ExtendedError(u8);
impl fmt::Display for ExtendedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            0x10 => "cover open while printing",
            0x1D => "wrong media",
            0x1E => "expansion buffer full",
            0x21 => "transmission error",
            _ => return write!(f, "unknown (0x{:02X})", self.0),
        };
        write!(f, "{name}")
    }
}

/// Bit-flags of the 16-bit error field (offsets 8..9).
pub struct ErrorFlags(u16);
impl ErrorFlags {
    pub fn no_media(&self) -> bool {
        self.0 & 0x0001 != 0
    }
    pub fn end_of_media(&self) -> bool {
        self.0 & 0x0002 != 0
    }
    pub fn cutter_jam(&self) -> bool {
        self.0 & 0x0004 != 0
    }
    pub fn weak_batteries(&self) -> bool {
        self.0 & 0x0008 != 0
    }
    pub fn printer_in_use(&self) -> bool {
        self.0 & 0x0010 != 0
    }
    pub fn high_voltage_adapter(&self) -> bool {
        self.0 & 0x0040 != 0
    }
    pub fn replace_media(&self) -> bool {
        self.0 & 0x0100 != 0
    }
    pub fn expansion_buffer(&self) -> bool {
        self.0 & 0x0200 != 0
    }
    pub fn communication(&self) -> bool {
        self.0 & 0x0400 != 0
    }
    pub fn communication_buffer_full(&self) -> bool {
        self.0 & 0x0800 != 0
    }
    pub fn cover_open(&self) -> bool {
        self.0 & 0x1000 != 0
    }
    pub fn overheating(&self) -> bool {
        self.0 & 0x2000 != 0
    }
    pub fn black_marking_not_detected(&self) -> bool {
        self.0 & 0x4000 != 0
    }
    pub fn system_error(&self) -> bool {
        self.0 & 0x8000 != 0
    }
}
impl fmt::Display for ErrorFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.no_media() {
            names.push("no media");
        }
        if self.end_of_media() {
            names.push("end of media");
        }
        if self.cutter_jam() {
            names.push("cutter jam");
        }
        if self.weak_batteries() {
            names.push("weak batteries");
        }
        if self.printer_in_use() {
            names.push("printer in use");
        }
        if self.high_voltage_adapter() {
            names.push("high-voltage adapter");
        }
        if self.replace_media() {
            names.push("replace media");
        }
        if self.expansion_buffer() {
            names.push("expansion buffer full");
        }
        if self.communication() {
            names.push("communication error");
        }
        if self.communication_buffer_full() {
            names.push("communication buffer full");
        }
        if self.cover_open() {
            names.push("cover open");
        }
        if self.overheating() {
            names.push("overheating");
        }
        if self.black_marking_not_detected() {
            names.push("black marking not detected");
        }
        if self.system_error() {
            names.push("system error");
        }
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join(", "))
        }
    }
}

pub struct MediaWidth(u8);
impl fmt::Display for MediaWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            0x00 => "no media",
            0x04 => "3.5 mm",
            0x06 => "6 mm",
            0x09 => "9 mm / HS 8.8 mm",
            0x0C => "12 mm / HS 11.7 mm",
            0x12 => "18 mm / HS 17.7 mm",
            0x18 => "24 mm / HS 23.6 mm",
            0x24 => "36 mm",
            0x15 => "FLe 21 mm x 45 mm",
            _ => return write!(f, "unknown (0x{:02X})", self.0),
        };
        write!(f, "{name}")
    }
}

pub struct MediaType(u8);
impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            0x00 => "no media",
            0x01 => "laminated tape",
            0x03 => "non-laminated tape",
            0x04 => "fabric tape",
            0x11 => "heat-shrink tube",
            0x13 => "fle tape",
            0x14 => "flexible ID tape",
            0x15 => "satin tape",
            0x17 => "heat-shrink tube (HS)",
            0xFF => "incompatible tape",
            _ => return write!(f, "unknown (0x{:02X})", self.0),
        };
        write!(f, "{name}")
    }
}

pub struct StatusType(u8);
impl fmt::Display for StatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            0x00 => "reply to status request",
            0x01 => "printing completed",
            0x02 => "error occurred",
            0x03 => "exit IF mode",
            0x04 => "turned off",
            0x05 => "notification",
            0x06 => "phase changed",
            _ => return write!(f, "unknown (0x{:02X})", self.0),
        };
        write!(f, "{name}")
    }
}

/// The coarse phase-type / phase-number pair (offsets 19, 21). The status
/// frame carries two phase-number bytes (offsets 20, 21); the humanized text
/// is keyed on the second one, phaseNumber1.
pub struct Phase {
    phase_type: u8,
    phase_number1: u8,
}
impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match (self.phase_type, self.phase_number1) {
            (0x00, 0x00) => "editing state",
            (0x00, 0x01) => "feed",
            (0x01, 0x00) => "printing",
            (0x01, 0x0A) => "not used",
            (0x01, 0x14) => "cover open while receiving",
            (0x01, 0x19) => "not used",
            _ => {
                return write!(
                    f,
                    "unknown (type 0x{:02X}, number 0x{:02X})",
                    self.phase_type, self.phase_number1
                );
            }
        };
        write!(f, "{name}")
    }
}

pub struct NotificationNumber(u8);
impl fmt::Display for NotificationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            0x00 => "not available",
            0x01 => "cover open",
            0x02 => "cover closed",
            0x03 => "cooling (started)",
            0x04 => "cooling (finished)",
            _ => return write!(f, "unknown (0x{:02X})", self.0),
        };
        write!(f, "{name}")
    }
}

pub struct TapeColour(u8);
impl fmt::Display for TapeColour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            0x01 => "white",
            0x02 => "other",
            0x03 => "clear",
            0x04 => "red",
            0x05 => "blue",
            0x06 => "yellow",
            0x07 => "green",
            0x08 => "black",
            0x09 => "clear white text",
            0x20 => "matte white",
            0x21 => "matte clear",
            0x22 => "matte silver",
            0x23 => "satin gold",
            0x24 => "satin silver",
            0x30 => "blue (D)",
            0x31 => "red (D)",
            0x40 => "fluorescent orange",
            0x41 => "fluorescent yellow",
            0x50 => "berry pink (S)",
            0x51 => "light gray (S)",
            0x60 => "yellow (F)",
            0x61 => "pink (F)",
            0x62 => "blue (F)",
            0x70 => "white (heat-shrink tube)",
            0x90 => "white (flex. ID)",
            0x91 => "yellow (flex. ID)",
            0xF0 => "cleaning",
            0xF1 => "stencil",
            0xFF => "incompatible",
            _ => return write!(f, "unknown (0x{:02X})", self.0),
        };
        write!(f, "{name}")
    }
}

pub struct TextColour(u8);
impl fmt::Display for TextColour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            0x01 => "white",
            0x02 => "other",
            0x04 => "red",
            0x05 => "blue",
            0x08 => "black",
            0x0A => "gold",
            0x62 => "blue (F)",
            0xF0 => "cleaning",
            0xF1 => "stencil",
            0xFF => "incompatible",
            _ => return write!(f, "unknown (0x{:02X})", self.0),
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_length_is_an_error() {
        assert!(matches!(
            Status::parse(&[0u8; 31]),
            Err(DecodeError::WrongStatusLength(31))
        ));
    }

    #[test]
    fn scenario_1_decodes_expected_fields() {
        let bytes: [u8; 32] = [
            0x80, 0x20, 0x42, 0x30, 0x71, 0x30, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x01, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x06, 0x01, 0x00, 0x00, 0x00, 0x00, 0x01, 0x08, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];
        let status = Status::parse(&bytes).unwrap();
        assert_eq!(status.model_code().to_string(), "PT-P900");
        assert_eq!(status.battery_level().to_string(), "full");
        assert!(!status.has_errors());
        assert_eq!(status.media_width().to_string(), "12 mm / HS 11.7 mm");
        assert_eq!(status.media_type().to_string(), "laminated tape");
        assert_eq!(status.status_type().to_string(), "phase changed");
        // phaseType=0x01 (raw[19]) puts this in the printing branch;
        // phaseNumber1=0x00 (raw[21]) selects "printing" within it. "feed"
        // only occurs under phaseType=0x00.
        assert_eq!(status.phase().to_string(), "printing");
        assert_eq!(status.tape_colour().to_string(), "white");
        assert_eq!(status.text_colour().to_string(), "black");
    }

    #[test]
    fn error_flags_report_individually() {
        let mut bytes = [0u8; 32];
        bytes[8] = 0x05; // noMedia | cutterJam
        let status = Status::parse(&bytes).unwrap();
        assert!(status.has_errors());
        assert!(status.error_flags().no_media());
        assert!(status.error_flags().cutter_jam());
        assert!(!status.error_flags().end_of_media());
    }
}
