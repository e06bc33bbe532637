//! Byte-exact builder for the PTCBP raster command set.
//!
//! Every method appends exactly the bytes it documents — there is no
//! `#[repr(C)]` struct overlaid on the wire anywhere in this module (§9):
//! each command is a function that writes a byte sequence.

/// Command mode selector for [`CommandWriter::switch_dynamic_command_mode`].
#[derive(Clone, Copy, Debug)]
pub enum CommandMode {
    /// ESC/P mode (legacy).
    EscP = 0,
    /// Raster mode, the one this crate speaks.
    Raster = 1,
    /// Template mode.
    Template = 3,
}

/// Position of a page within a print job, carried by `PrintInformation` and
/// governing mid-job cutter behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageIndex {
    /// The first page of a multi-page job.
    Starting = 0,
    /// A page in the middle of a multi-page job.
    Other = 1,
    /// The last page, or the only page, of a job.
    Last = 2,
}

/// Fluent byte-buffer builder for one print job's command stream.
pub struct CommandWriter {
    buffer: Vec<u8>,
}

impl Default for CommandWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandWriter {
    pub fn new() -> Self {
        CommandWriter { buffer: Vec::new() }
    }

    /// 200 null bytes, clearing any previous command fragment the printer
    /// might be holding.
    pub fn invalidate(&mut self) -> &mut Self {
        self.buffer.extend_from_slice(&[0x00; 200]);
        self
    }

    /// `ESC @` — resets the printer to its default state.
    pub fn initialize(&mut self) -> &mut Self {
        self.buffer.extend_from_slice(b"\x1B\x40");
        self
    }

    /// `ESC i S` — requests a 32-byte status reply.
    pub fn status_information_request(&mut self) -> &mut Self {
        self.buffer.extend_from_slice(b"\x1B\x69\x53");
        self
    }

    /// `ESC i a <mode>`.
    pub fn switch_dynamic_command_mode(&mut self, mode: CommandMode) -> &mut Self {
        self.buffer.extend_from_slice(b"\x1B\x69\x61");
        self.buffer.push(mode as u8);
        self
    }

    /// `ESC i z <used_flags> <media_type> <media_width> <media_length>
    /// <raster_count LE32> <page_index> 0x00`.
    ///
    /// `media_type`/`media_width`/`media_length` being `None` both omits the
    /// corresponding `used_flags` bit and writes `0` for that byte.
    #[allow(clippy::too_many_arguments)]
    pub fn print_information_command(
        &mut self,
        quality_priority: bool,
        recover_mode: bool,
        media_type: Option<u8>,
        media_width: Option<u8>,
        media_length: Option<u8>,
        raster_count: u32,
        page_index: PageIndex,
    ) -> &mut Self {
        let mut flags = 0u8;

        let media_type_val = media_type
            .inspect(|_| flags |= 0x02)
            .unwrap_or(0);
        let media_width_val = media_width
            .inspect(|_| flags |= 0x04)
            .unwrap_or(0);
        let media_length_val = media_length
            .inspect(|_| flags |= 0x08)
            .unwrap_or(0);

        flags |= (quality_priority as u8) << 6;
        flags |= (recover_mode as u8) << 7;

        self.buffer.extend_from_slice(b"\x1B\x69\x7A");
        self.buffer.push(flags);
        self.buffer.push(media_type_val);
        self.buffer.push(media_width_val);
        self.buffer.push(media_length_val);
        self.buffer.extend_from_slice(&raster_count.to_le_bytes());
        self.buffer.push(page_index as u8);
        self.buffer.push(0x00);
        self
    }

    /// `ESC i M <flags>`: bit6 auto-cut, bit7 mirror.
    pub fn various_mode_settings(&mut self, auto_cut: bool, mirror: bool) -> &mut Self {
        let flags = (auto_cut as u8) << 6 | (mirror as u8) << 7;
        self.buffer.extend_from_slice(b"\x1B\x69\x4D");
        self.buffer.push(flags);
        self
    }

    /// `ESC i K <flags>`: bit0 draft, bit2 half-cut, bit3 no-chain, bit4
    /// special-tape-no-cutting, bit6 high-resolution, bit7 no-buffer-clear.
    pub fn advanced_mode_settings(
        &mut self,
        draft: bool,
        half_cut: bool,
        no_chain: bool,
        special_tape: bool,
        high_resolution: bool,
        no_buffer_clear: bool,
    ) -> &mut Self {
        let flags = (draft as u8)
            | (half_cut as u8) << 2
            | (no_chain as u8) << 3
            | (special_tape as u8) << 4
            | (high_resolution as u8) << 6
            | (no_buffer_clear as u8) << 7;
        self.buffer.extend_from_slice(b"\x1B\x69\x4B");
        self.buffer.push(flags);
        self
    }

    /// `ESC i d <dots LE16>`.
    pub fn specify_margin_amount(&mut self, dots: u16) -> &mut Self {
        self.buffer.extend_from_slice(b"\x1B\x69\x64");
        self.buffer.extend_from_slice(&dots.to_le_bytes());
        self
    }

    /// `ESC i A <n>`.
    pub fn specify_page_number(&mut self, n: u8) -> &mut Self {
        self.buffer.extend_from_slice(b"\x1B\x69\x41");
        self.buffer.push(n);
        self
    }

    /// `'M' <0x02|0x00>`.
    pub fn select_compression_mode(&mut self, tiff: bool) -> &mut Self {
        self.buffer.push(b'M');
        self.buffer.push(if tiff { 0x02 } else { 0x00 });
        self
    }

    /// Append pre-framed raster payload bytes (produced by
    /// [`crate::raster::RasterEmitter`]) verbatim.
    pub fn raw_raster_payload(&mut self, framed: &[u8]) -> &mut Self {
        self.buffer.extend_from_slice(framed);
        self
    }

    /// `0x0C` — mid-job page terminator; more pages follow.
    pub fn print_command(&mut self) -> &mut Self {
        self.buffer.push(0x0C);
        self
    }

    /// `0x1A` — last-page terminator, feeds and cuts.
    pub fn print_command_with_feeding(&mut self) -> &mut Self {
        self.buffer.push(0x1A);
        self
    }

    /// Consume the builder, returning the accumulated bytes.
    pub fn build(self) -> Vec<u8> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialise_job_is_202_bytes() {
        let mut w = CommandWriter::new();
        w.invalidate().initialize();
        let bytes = w.build();
        assert_eq!(bytes.len(), 202);
        assert!(bytes[..200].iter().all(|&b| b == 0));
        assert_eq!(&bytes[200..], b"\x1B\x40");
    }

    #[test]
    fn status_job_is_exactly_3_bytes() {
        let mut w = CommandWriter::new();
        w.status_information_request();
        assert_eq!(w.build(), b"\x1B\x69\x53");
    }

    #[test]
    fn print_information_media_width_only_sets_flag_0x84() {
        let mut w = CommandWriter::new();
        w.print_information_command(false, true, None, Some(12), None, 40, PageIndex::Last);
        let bytes = w.build();
        assert_eq!(&bytes[..3], b"\x1B\x69\x7A");
        assert_eq!(bytes[3], 0x84);
        assert_eq!(bytes[4], 0); // media_type
        assert_eq!(bytes[5], 12); // media_width
        assert_eq!(bytes[6], 0); // media_length
        assert_eq!(u32::from_le_bytes(bytes[7..11].try_into().unwrap()), 40);
        assert_eq!(bytes[11], PageIndex::Last as u8);
        assert_eq!(bytes[12], 0);
        assert_eq!(bytes.len(), 13);
    }

    #[test]
    fn various_mode_sets_expected_bits() {
        let mut w = CommandWriter::new();
        w.various_mode_settings(true, true);
        assert_eq!(w.build(), vec![0x1B, 0x69, 0x4D, 0xC0]);
    }

    #[test]
    fn advanced_mode_defaults_half_cut_and_no_chain() {
        let mut w = CommandWriter::new();
        w.advanced_mode_settings(false, true, true, false, false, false);
        assert_eq!(w.build(), vec![0x1B, 0x69, 0x4B, 0x0C]);
    }

    #[test]
    fn margin_amount_is_little_endian() {
        let mut w = CommandWriter::new();
        w.specify_margin_amount(300);
        assert_eq!(w.build(), vec![0x1B, 0x69, 0x64, 0x2C, 0x01]);
    }

    #[test]
    fn compression_mode_bytes() {
        let mut w = CommandWriter::new();
        w.select_compression_mode(true);
        assert_eq!(w.build(), vec![b'M', 0x02]);
        let mut w = CommandWriter::new();
        w.select_compression_mode(false);
        assert_eq!(w.build(), vec![b'M', 0x00]);
    }
}
