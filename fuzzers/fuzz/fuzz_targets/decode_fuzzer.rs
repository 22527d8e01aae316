#![no_main]
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;
use zio::{Md5, StreamConfig, StreamSource, ZioReader};

// Arbitrary input must decode to values or errors, never a panic.
fuzz_target!(|data: &[u8]| {
    let _ = decode(ZioReader::from_bytes(data.to_vec()));
    let config = StreamConfig::default().with_capacity(8).unwrap();
    let source = StreamSource::new(Cursor::new(data));
    let _ = decode(ZioReader::with_digest(source, Md5::new(), config));
});

fn decode<S: zio::Source, D: zio::Digest>(mut reader: ZioReader<S, D>) -> zio::Result<()> {
    reader.read_version()?;
    reader.read_string()?;
    reader.read_list::<Option<i64>>()?;
    reader.read_map::<String>()?;
    reader.read_point()?;
    reader.checksum()?;
    reader.close()
}
