use zio::*;
mod test_harness;
use test_harness::TestHarness;

#[test]
fn closed_stream_misuse_is_rejected() {
    // Purpose: every primitive after close() fails with Error::Closed, on both sides.
    let mut writer = ZioWriter::in_memory();
    writer.write_int(1).unwrap();
    writer.close().unwrap();
    assert!(matches!(writer.write_bool(true), Err(Error::Closed)));
    assert!(matches!(writer.write_str("late"), Err(Error::Closed)));
    assert!(matches!(writer.write_fully(b"late"), Err(Error::Closed)));
    assert!(matches!(writer.write_version(0), Err(Error::Closed)));
    assert!(matches!(writer.write_list(&[1i32]), Err(Error::Closed)));
    assert!(matches!(writer.position(), Err(Error::Closed)));
    // The array survives closing.
    assert_eq!(writer.to_bytes().unwrap(), vec![0, 0, 0, 1]);

    let mut reader = ZioReader::from_bytes(vec![0, 0, 0, 1]);
    reader.close().unwrap();
    assert!(matches!(reader.read_int(), Err(Error::Closed)));
    assert!(matches!(reader.read_version(), Err(Error::Closed)));
    assert!(matches!(reader.read_fully(&mut [0u8; 0]), Err(Error::Closed)));
    assert!(matches!(reader.available(), Err(Error::Closed)));
}

#[test]
fn reading_past_last_record_is_eof() {
    let mut writer = ZioWriter::in_memory();
    writer.write_version(1).unwrap();
    writer.write_int(9).unwrap();
    let mut reader = ZioReader::from_bytes(writer.into_bytes().unwrap());
    assert_eq!(reader.read_version().unwrap(), 1);
    assert_eq!(reader.read_int().unwrap(), 9);
    assert!(matches!(
        reader.read_version(),
        Err(Error::UnexpectedEof { needed: 1, available: 0 })
    ));
}

#[test]
fn oversized_string_is_fatal_before_any_byte() {
    let mut writer = ZioWriter::in_memory();
    writer.write_short(1).unwrap();
    let over = "é".repeat(0x8000); // 0x10000 UTF-8 bytes
    match writer.write_str(&over) {
        Err(Error::OversizedString { len, limit }) => {
            assert_eq!(len, 0x10000);
            assert_eq!(limit, 0xFFFE);
        }
        other => panic!("expected OversizedString, got {other:?}"),
    }
    assert_eq!(writer.into_bytes().unwrap(), vec![0, 1]);
}

#[test]
fn non_bmp_char_is_rejected() {
    let mut writer = ZioWriter::in_memory();
    assert!(matches!(writer.write_char('🦀'), Err(Error::InvalidData { .. })));
    assert_eq!(writer.position().unwrap(), 0);
}

#[test]
fn tiny_buffer_is_invalid_config() {
    assert!(matches!(
        StreamConfig::default().with_capacity(4),
        Err(Error::InvalidConfig { .. })
    ));
}

#[test]
fn missing_file_is_io_error() {
    let h = TestHarness::new();
    let missing = h.path().with_extension("missing");
    assert!(matches!(ZioReader::open(&missing), Err(Error::Io(_))));
}

#[test]
fn dropped_writer_still_drains_to_file() {
    let h = TestHarness::new();
    {
        let mut w = h.writer(StreamConfig::default());
        w.write_str("kept").unwrap();
        // No explicit close: drop performs it.
    }
    let mut r = h.reader(StreamConfig::default());
    assert_eq!(r.read_str().unwrap(), "kept");
}

#[test]
fn error_messages_are_descriptive() {
    let err = Error::key_mismatch(2, "width", "height");
    assert_eq!(
        err.to_string(),
        "Key mismatch at index 2: expected \"width\", stream holds \"height\""
    );
    let err = Error::count_mismatch(3, 4);
    assert_eq!(err.to_string(), "Count mismatch: expected 3 items, stream holds 4");
}
