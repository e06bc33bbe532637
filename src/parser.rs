//! Inverse of [`crate::command`] + [`crate::raster`]: classifies a captured
//! byte stream and prints one human-readable event per recognized command.

use crate::error::DecodeError;
use crate::rle;

/// One decoded command, in the order it appeared on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Initialize,
    StatusRequest,
    DynamicMode { mode: u8 },
    PrintInformation { used_flags: u8, media_type: u8, media_width: u8, media_length: u8, raster_count: u32, page_index: u8 },
    VariousMode { flags: u8 },
    AdvancedMode { flags: u8 },
    MarginAmount { dots: u16 },
    PageNumberInCut { n: u8 },
    OpaqueEsc { discriminator: u8, len: usize },
    CompressionMode { tiff: bool },
    RasterLine { bytes: Vec<u8> },
    ZeroLine,
    PageContinue,
    PageLast,
    UnknownOpcode { opcode: u8, offset: usize },
}

/// Walks `data` and returns every event it can classify. Unknown bytes are
/// reported as [`Event::UnknownOpcode`] and the cursor advances by one so
/// the rest of the stream is still attempted (§4.7: diagnostic, not a gate).
pub fn parse(data: &[u8]) -> Vec<Event> {
    parse_internal(data).0
}

/// Shared walk; returns the events found and how many leading bytes of
/// `data` were actually accounted for (less than `data.len()` means the
/// walk stopped early on a truncated command).
fn parse_internal(data: &[u8]) -> (Vec<Event>, usize) {
    let mut events = Vec::new();
    let mut compressed = false;
    let mut i = 0;

    while i < data.len() {
        match data[i] {
            b'M' => {
                if i + 1 >= data.len() {
                    log::warn!("truncated compression-mode command at offset {i}");
                    break;
                }
                compressed = data[i + 1] == 0x02;
                events.push(Event::CompressionMode { tiff: compressed });
                i += 2;
            }
            b'G' => {
                if i + 3 > data.len() {
                    log::warn!("truncated raster line header at offset {i}");
                    break;
                }
                let n = u16::from_le_bytes([data[i + 1], data[i + 2]]) as usize;
                if i + 3 + n > data.len() {
                    log::warn!("truncated raster line payload at offset {i}");
                    break;
                }
                let payload = &data[i + 3..i + 3 + n];
                let bytes = if compressed { rle::decode(payload) } else { payload.to_vec() };
                events.push(Event::RasterLine { bytes });
                i += 3 + n;
            }
            b'Z' => {
                events.push(Event::ZeroLine);
                i += 1;
            }
            0x0C => {
                events.push(Event::PageContinue);
                i += 1;
            }
            0x1A => {
                events.push(Event::PageLast);
                i += 1;
            }
            0x1B => match parse_esc(data, i) {
                Some((event, next)) => {
                    events.push(event);
                    i = next;
                }
                None => {
                    log::warn!("truncated ESC sequence at offset {i}");
                    break;
                }
            },
            opcode => {
                log::warn!("unknown opcode 0x{opcode:02X} at offset {i}");
                events.push(Event::UnknownOpcode { opcode, offset: i });
                i += 1;
            }
        }
    }

    (events, i)
}

/// Like [`parse`], but fails on the first unrecognized opcode or truncated
/// command instead of resynchronizing — for callers that need strict
/// decoding rather than best-effort diagnostics.
pub fn parse_strict(data: &[u8]) -> Result<Vec<Event>, DecodeError> {
    let (events, consumed) = parse_internal(data);

    if let Some(Event::UnknownOpcode { opcode, offset }) = events
        .iter()
        .find(|e| matches!(e, Event::UnknownOpcode { .. }))
    {
        return Err(DecodeError::UnknownOpcode { offset: *offset, opcode: *opcode });
    }

    if consumed < data.len() {
        return Err(DecodeError::Truncated {
            offset: consumed,
            expected: data.len() - consumed,
        });
    }

    Ok(events)
}

fn parse_esc(data: &[u8], i: usize) -> Option<(Event, usize)> {
    let discriminator = *data.get(i + 1)?;
    match discriminator {
        b'@' => Some((Event::Initialize, i + 2)),
        b'i' => parse_esc_i(data, i),
        _ => None,
    }
}

fn parse_esc_i(data: &[u8], i: usize) -> Option<(Event, usize)> {
    let sub = *data.get(i + 2)?;
    let base = i + 3;
    match sub {
        b'S' => Some((Event::StatusRequest, base)),
        b'a' => {
            let mode = *data.get(base)?;
            Some((Event::DynamicMode { mode }, base + 1))
        }
        b'z' => {
            if base + 10 > data.len() {
                return None;
            }
            let used_flags = data[base];
            let media_type = data[base + 1];
            let media_width = data[base + 2];
            let media_length = data[base + 3];
            let raster_count = u32::from_le_bytes(data[base + 4..base + 8].try_into().ok()?);
            let page_index = data[base + 8];
            Some((
                Event::PrintInformation {
                    used_flags,
                    media_type,
                    media_width,
                    media_length,
                    raster_count,
                    page_index,
                },
                base + 10,
            ))
        }
        b'M' => {
            let flags = *data.get(base)?;
            Some((Event::VariousMode { flags }, base + 1))
        }
        b'K' => {
            let flags = *data.get(base)?;
            Some((Event::AdvancedMode { flags }, base + 1))
        }
        b'd' => {
            if base + 2 > data.len() {
                return None;
            }
            let dots = u16::from_le_bytes([data[base], data[base + 1]]);
            Some((Event::MarginAmount { dots }, base + 2))
        }
        b'A' => {
            let n = *data.get(base)?;
            Some((Event::PageNumberInCut { n }, base + 1))
        }
        b'U' => {
            if base + 15 > data.len() {
                return None;
            }
            Some((Event::OpaqueEsc { discriminator: sub, len: 15 }, base + 15))
        }
        b'k' => {
            if base + 3 > data.len() {
                return None;
            }
            Some((Event::OpaqueEsc { discriminator: sub, len: 3 }, base + 3))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandMode, CommandWriter, PageIndex};

    #[test]
    fn status_request_round_trips() {
        let mut w = CommandWriter::new();
        w.status_information_request();
        let events = parse(&w.build());
        assert_eq!(events, vec![Event::StatusRequest]);
    }

    #[test]
    fn initialise_round_trips() {
        let mut w = CommandWriter::new();
        w.invalidate().initialize();
        let events = parse(&w.build());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], Event::Initialize);
    }

    #[test]
    fn print_information_round_trips() {
        let mut w = CommandWriter::new();
        w.print_information_command(false, true, None, Some(12), None, 40, PageIndex::Last);
        let events = parse(&w.build());
        assert_eq!(
            events,
            vec![Event::PrintInformation {
                used_flags: 0x84,
                media_type: 0,
                media_width: 12,
                media_length: 0,
                raster_count: 40,
                page_index: 2,
            }]
        );
    }

    #[test]
    fn dynamic_mode_round_trips() {
        let mut w = CommandWriter::new();
        w.switch_dynamic_command_mode(CommandMode::Raster);
        let events = parse(&w.build());
        assert_eq!(events, vec![Event::DynamicMode { mode: 1 }]);
    }

    #[test]
    fn zero_and_page_markers_round_trip() {
        let events = parse(&[b'Z', 0x0C, 0x1A]);
        assert_eq!(events, vec![Event::ZeroLine, Event::PageContinue, Event::PageLast]);
    }

    #[test]
    fn unknown_opcode_resyncs_and_continues() {
        let events = parse(&[0xFE, b'Z']);
        assert_eq!(
            events,
            vec![Event::UnknownOpcode { opcode: 0xFE, offset: 0 }, Event::ZeroLine]
        );
    }

    #[test]
    fn strict_parse_rejects_truncated_margin_command() {
        // ESC i d wants 2 trailing bytes; only 1 is present.
        let data = [0x1B, 0x69, 0x64, 0x00];
        assert!(matches!(
            parse_strict(&data),
            Err(DecodeError::Truncated { offset: 0, expected: 4 })
        ));
    }

    #[test]
    fn strict_parse_accepts_a_clean_stream() {
        let mut w = CommandWriter::new();
        w.status_information_request();
        assert!(parse_strict(&w.build()).is_ok());
    }

    #[test]
    fn compressed_raster_line_decodes_through_rle() {
        let mut data = vec![b'M', 0x02, b'G'];
        let packets = rle::encode(&[0xAAu8; 70]);
        data.extend_from_slice(&(packets.len() as u16).to_le_bytes());
        data.extend_from_slice(&packets);
        let events = parse(&data);
        assert_eq!(
            events,
            vec![
                Event::CompressionMode { tiff: true },
                Event::RasterLine { bytes: vec![0xAA; 70] }
            ]
        );
    }
}
