//! # zio
//!
//! Buffered binary streams for primitive values and self-serializing records.
//!
//! ## Overview
//!
//! `zio` provides a symmetric reader/writer pair that moves big-endian
//! primitives, length-prefixed strings and structured records between memory
//! and a byte resource. Each stream owns a bounded work buffer and talks to its
//! resource through a small backend trait, so files, in-memory arrays and
//! arbitrary `Read`/`Write` endpoints all share one engine.
//!
//! ## Key Features
//!
//! * **Composable Backends**: `Source`/`Sink` traits with file, byte-array and wrapped-stream adapters
//! * **Incremental Checksums**: an optional digest sees exactly the transferred bytes, whatever the buffer size
//! * **Compact Versioning**: one-byte version tags for the common case, five bytes otherwise
//! * **Self-Serializing Types**: `ZioWrite`/`ZioRead` plus list, map and nullable helpers
//! * **Type Safe**: generic over backend and digest, with `NoDigest` as the zero-cost default
//!
//! ## Quick Start
//!
//! ```rust
//! use zio::*;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Window {
//!     title: String,
//!     origin: Option<Point>,
//! }
//!
//! impl Versioned for Window {
//!     const VERSION: i32 = 0;
//!
//!     fn write_fields<S: Sink, D: Digest>(&self, out: &mut ZioWriter<S, D>) -> Result<()> {
//!         out.write_str(&self.title)?;
//!         out.write_point(self.origin.as_ref())
//!     }
//!
//!     fn read_fields<S: Source, D: Digest>(
//!         &mut self,
//!         _version: i32,
//!         input: &mut ZioReader<S, D>,
//!     ) -> Result<()> {
//!         self.title = input.read_str()?;
//!         self.origin = input.read_point()?;
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let window = Window { title: "main".into(), origin: Some(Point::new(10, 20)) };
//!
//!     let mut writer = ZioWriter::with_digest(ByteSink::new(), Md5::new(), StreamConfig::default());
//!     writer.write_record(&window)?;
//!     let written_sum = writer.checksum()?.map(str::to_owned);
//!     let bytes = writer.into_bytes()?;
//!
//!     let mut reader = ZioReader::from_bytes_with_digest(bytes, Md5::new());
//!     let mut copy = Window::default();
//!     reader.read_record_into(&mut copy)?;
//!     assert_eq!(copy, window);
//!     assert_eq!(reader.checksum()?.map(str::to_owned), written_sum);
//!     reader.close()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! * **`codec`**: stateless encode/decode of scalars, compact integers and strings
//! * **`ZioWriter` / `ZioReader`**: the buffered engines; drain or refill the work buffer on demand
//! * **`Sink` / `Source`**: backends that only move bytes and release their resource on close
//! * **`Digest`**: incremental checksum strategies fed by the engines
//! * **`ZioWrite` / `ZioRead` / `ZioSpawn` / `Versioned`**: the contract domain types implement
//!
//! Streams are single-owner and not synchronized. Close them explicitly to see
//! close-time errors; dropping a stream closes it and only logs failures.

mod buffer;

pub mod backend;
pub mod codec;
pub mod collections;
pub mod config;
pub mod digest;
pub mod error;
pub mod geometry;
pub mod reader;
pub mod traits;
pub mod writer;

// Re-export the main public API for user convenience.
pub use backend::{ByteSink, ByteSource, FileSink, FileSource, Sink, Source, StreamSink, StreamSource};
pub use config::{BufferMode, StreamConfig, DEFAULT_BUFFER_SIZE, DIRECT_BUFFER_SIZE};
pub use digest::{Digest, Md5, NoDigest};
pub use error::{Error, Result};
pub use geometry::{Color, Point, Size};
pub use indexmap::IndexMap;
pub use reader::ZioReader;
pub use traits::{Versioned, ZioRead, ZioSpawn, ZioWrite};
pub use writer::ZioWriter;

#[cfg(feature = "xxhash")]
pub use digest::XxHash64;

#[cfg(feature = "crc32")]
pub use digest::Crc32;

#[cfg(feature = "crc16")]
pub use digest::Crc16;
