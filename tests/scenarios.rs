//! End-to-end scenarios, one per concrete example in the design ledger.

use ptcbp::job::{self, ImageSource, Job, PrintOptions};
use ptcbp::rle;
use ptcbp::status::Status;
use ptcbp::tape::TapeGeometry;

#[test]
fn scenario_1_status_frame_parse() {
    let bytes: [u8; 32] = [
        0x80, 0x20, 0x42, 0x30, 0x71, 0x30, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x01, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x06, 0x01, 0x00, 0x00, 0x00, 0x00, 0x01, 0x08, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00,
    ];
    let status = Status::parse(&bytes).unwrap();
    assert_eq!(status.model_code().to_string(), "PT-P900");
    assert_eq!(status.battery_level().to_string(), "full");
    assert!(!status.has_errors());
    assert_eq!(status.media_width().to_string(), "12 mm / HS 11.7 mm");
    assert_eq!(status.media_type().to_string(), "laminated tape");
    assert_eq!(status.status_type().to_string(), "phase changed");
    // phaseType=0x01 selects the printing branch; phaseNumber1=0x00 within
    // it is "printing" ("feed" only occurs under phaseType=0x00).
    assert_eq!(status.phase().to_string(), "printing");
    assert_eq!(status.tape_colour().to_string(), "white");
    assert_eq!(status.text_colour().to_string(), "black");
}

#[test]
fn scenario_2_packbits_encode() {
    let line = [0xAA, 0xAA, 0xAA, 0xBB, 0xBB, 0xCC, 0xCC, 0xCC, 0xCC, 0xCC];
    let packets = rle::encode(&line);
    assert_eq!(packets, vec![0xFE, 0xAA, 0xFF, 0xBB, 0xFC, 0xCC]);

    let mut framed = vec![b'G', packets.len() as u8, 0x00];
    framed.extend_from_slice(&packets);
    assert_eq!(framed, vec![0x47, 0x06, 0x00, 0xFE, 0xAA, 0xFF, 0xBB, 0xFC, 0xCC]);
}

#[test]
fn scenario_3_zero_line_shortcut() {
    let line = [0u8; 70];
    assert_eq!(rle::encode(&line), vec![0xBB, 0x00]);
}

#[test]
fn scenario_4_geometry_for_3_5mm() {
    let g = TapeGeometry::resolve("3.5 mm", false, 12).unwrap();
    assert_eq!(g.left_margin_pins, 264);
    assert_eq!(g.right_margin_pins, 248);
    assert_eq!(g.usable_height, 12);
}

#[test]
fn scenario_5_end_to_end_init_job() {
    let bytes = job::initialise_stream();
    assert_eq!(bytes.len(), 202);
    assert!(bytes[..200].iter().all(|&b| b == 0));
    assert_eq!(&bytes[200..], &[0x1B, 0x40]);
}

#[test]
fn scenario_6_end_to_end_status_job() {
    assert_eq!(job::status_request_stream(), vec![0x1B, 0x69, 0x53]);
}

#[test]
fn test_pattern_job_compiles_for_every_catalog_tape_with_margins() {
    for tape_id in TapeGeometry::known_tape_ids() {
        let options = PrintOptions { tape_id: tape_id.to_string(), ..Default::default() };
        let job = Job::single(ImageSource::TestPattern, options);
        let result = job.compile();
        if tape_id == "FLe 21 mm x 45 mm" {
            assert!(result.is_err(), "FLe has no margin entry and should fail geometry resolution");
        } else {
            assert!(result.is_ok(), "tape {tape_id} failed to compile a test-pattern job");
        }
    }
}

#[test]
fn frame_header_is_exactly_36_bytes_before_the_raster_payload() {
    let options = PrintOptions { tape_id: "3.5 mm".to_string(), ..Default::default() };
    let job = Job::single(ImageSource::TestPattern, options);
    let bytes = job.compile().unwrap();

    // Header = dyn-mode(4) + print-info(13) + mode(4) + cut-each(4) +
    // advanced(4) + margin(5) + compression(2) = 36 bytes.
    assert_eq!(bytes[0..4], [0x1B, 0x69, 0x61, 0x01]);
    assert_eq!(bytes[4..7], [0x1B, 0x69, 0x7A]);
    assert_eq!(bytes[17..20], [0x1B, 0x69, 0x4D]);
    assert_eq!(bytes[21..24], [0x1B, 0x69, 0x41]);
    assert_eq!(bytes[25..28], [0x1B, 0x69, 0x4B]);
    assert_eq!(bytes[29..32], [0x1B, 0x69, 0x64]);
    assert_eq!(bytes[34], b'M');
    // byte 36 onward is the raster payload; trailer is the final byte.
    assert_eq!(*bytes.last().unwrap(), 0x1A);
}
