//! The buffered write-side engine.

use crate::backend::{ByteSink, FileSink, Sink, StreamSink};
use crate::buffer::WorkBuffer;
use crate::codec::{self, FixedWidth, COMPACT_MAX_LEN};
use crate::config::StreamConfig;
use crate::digest::{Digest, NoDigest};
use crate::error::{Error, Result};
use std::io::Write;
use std::path::Path;

/// A writer for primitive values and self-serializing records.
///
/// Values are staged in a bounded work buffer which is drained to the `Sink`
/// whenever the next value would not fit. Bytes reach the digest only once the
/// sink has accepted them.
///
/// A failed drain is never retried: the writer keeps the error state, refuses
/// further writes with `Error::Failed` and discards the pending bytes on close.
///
/// `close()` performs the final drain; it also runs on drop, but only an
/// explicit call can report a failure.
pub struct ZioWriter<S: Sink, D: Digest = NoDigest> {
    sink: S,
    digest: D,
    buffer: WorkBuffer,
    drained: u64,
    open: bool,
    failed: bool,
    finalized: bool,
    checksum: Option<String>,
}

impl<S: Sink> ZioWriter<S> {
    /// Creates a writer over `sink` without a checksum.
    pub fn new(sink: S, config: StreamConfig) -> Self {
        Self::with_digest(sink, NoDigest, config)
    }
}

impl ZioWriter<FileSink> {
    /// Creates (or truncates) a file with the default buffer settings.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::create_with(path, StreamConfig::default())
    }

    /// Creates (or truncates) a file with explicit buffer settings.
    pub fn create_with(path: impl AsRef<Path>, config: StreamConfig) -> Result<Self> {
        Ok(Self::new(FileSink::create(path)?, config))
    }
}

impl ZioWriter<ByteSink> {
    /// Writes into a growable in-memory array.
    pub fn in_memory() -> Self {
        Self::new(ByteSink::new(), StreamConfig::default())
    }
}

impl<W: Write> ZioWriter<StreamSink<W>> {
    /// Writes to an arbitrary byte endpoint with the default buffer settings.
    pub fn from_writer(inner: W) -> Self {
        Self::new(StreamSink::new(inner), StreamConfig::default())
    }
}

impl<D: Digest> ZioWriter<ByteSink, D> {
    /// Everything written so far, trimmed to its exact length.
    ///
    /// An open writer is drained first, so the copy is always complete.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        if self.open {
            self.flush()?;
        }
        Ok(self.sink.bytes().to_vec())
    }

    /// Closes the writer and hands over the written array without copying.
    pub fn into_bytes(mut self) -> Result<Vec<u8>> {
        self.close()?;
        Ok(self.sink.take_bytes())
    }
}

impl<S: Sink, D: Digest> ZioWriter<S, D> {
    /// Creates a writer over `sink` that feeds every drained byte to `digest`.
    pub fn with_digest(sink: S, digest: D, config: StreamConfig) -> Self {
        log::debug!("opened zio writer with {}-byte buffer", config.capacity());
        Self {
            sink,
            digest,
            buffer: WorkBuffer::with_capacity(config.capacity()),
            drained: 0,
            open: true,
            failed: false,
            finalized: false,
            checksum: None,
        }
    }

    #[inline]
    fn check_open(&self) -> Result<()> {
        if !self.open {
            Err(Error::Closed)
        } else if self.failed {
            Err(Error::Failed {
                discarded: self.buffer.remaining(),
            })
        } else {
            Ok(())
        }
    }

    /// Hands the pending bytes to the sink and then the digest, then empties the buffer.
    fn drain(&mut self) -> Result<()> {
        let pending = self.buffer.live();
        if pending.is_empty() {
            return Ok(());
        }
        if let Err(e) = self.sink.drain(pending) {
            self.failed = true;
            log::warn!("zio writer drain of {} bytes failed: {e}", pending.len());
            return Err(e.into());
        }
        if !self.finalized {
            self.digest.update(pending);
        }
        self.drained += pending.len() as u64;
        self.buffer.clear();
        Ok(())
    }

    /// Returns `n` bytes of buffer space, draining first if they do not fit.
    #[inline]
    fn reserve(&mut self, n: usize) -> Result<&mut [u8]> {
        self.check_open()?;
        if self.buffer.free() < n {
            self.drain()?;
        }
        Ok(self.buffer.extend(n))
    }

    /// Writes any fixed-width primitive.
    #[inline]
    pub fn write_fixed<T: FixedWidth>(&mut self, value: T) -> Result<()> {
        value.put(self.reserve(T::WIDTH)?);
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_fixed(value)
    }

    /// Writes a signed byte.
    pub fn write_byte(&mut self, value: i8) -> Result<()> {
        self.write_fixed(value)
    }

    /// Writes an unsigned byte.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_fixed(value)
    }

    /// Writes a character as one UTF-16 code unit. Characters outside the
    /// Basic Multilingual Plane are rejected.
    pub fn write_char(&mut self, value: char) -> Result<()> {
        let unit = codec::encode_char(value)?;
        self.write_fixed(unit)
    }

    pub fn write_short(&mut self, value: i16) -> Result<()> {
        self.write_fixed(value)
    }

    pub fn write_int(&mut self, value: i32) -> Result<()> {
        self.write_fixed(value)
    }

    pub fn write_long(&mut self, value: i64) -> Result<()> {
        self.write_fixed(value)
    }

    pub fn write_float(&mut self, value: f32) -> Result<()> {
        self.write_fixed(value)
    }

    pub fn write_double(&mut self, value: f64) -> Result<()> {
        self.write_fixed(value)
    }

    /// Writes a version tag as a compact integer: one byte for `0..=254`, five otherwise.
    pub fn write_version(&mut self, version: i32) -> Result<()> {
        let mut encoded = [0u8; COMPACT_MAX_LEN];
        let n = codec::encode_compact(version, &mut encoded);
        self.reserve(n)?.copy_from_slice(&encoded[..n]);
        Ok(())
    }

    /// Writes an optional string with a 2-byte length prefix; `None` writes the null sentinel.
    ///
    /// Fails with `OversizedString` before anything is buffered when the UTF-8
    /// length reaches the sentinel.
    pub fn write_string(&mut self, value: Option<&str>) -> Result<()> {
        self.check_open()?;
        let prefix = codec::string_prefix(value)?;
        self.write_fixed(prefix)?;
        if let Some(s) = value {
            self.write_fully(s.as_bytes())?;
        }
        Ok(())
    }

    /// Writes a non-null string.
    pub fn write_str(&mut self, value: &str) -> Result<()> {
        self.write_string(Some(value))
    }

    /// Writes the Latin-1 bytes of `value` with no prefix and no terminator.
    ///
    /// The reader must know the length out of band; meant for fixed-layout headers.
    pub fn write_raw_string(&mut self, value: &str) -> Result<()> {
        self.write_fully(&codec::latin1_encode(value))
    }

    /// Writes all of `bytes`, draining as many times as the buffer fills up.
    pub fn write_fully(&mut self, bytes: &[u8]) -> Result<()> {
        self.check_open()?;
        let mut rest = bytes;
        loop {
            let n = self.buffer.append(rest);
            rest = &rest[n..];
            if rest.is_empty() {
                return Ok(());
            }
            self.drain()?;
        }
    }

    /// Drains pending bytes to the sink without closing.
    pub fn flush(&mut self) -> Result<()> {
        self.check_open()?;
        self.drain()
    }

    /// Bytes written since the stream was opened, drained or not.
    pub fn position(&self) -> Result<u64> {
        self.check_open()?;
        Ok(self.drained + self.buffer.remaining() as u64)
    }

    /// Work buffer capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn is_closed(&self) -> bool {
        !self.open
    }

    /// Hex digest of the bytes written so far, or `None` without a digest.
    ///
    /// The first call on an open writer drains and finalizes the digest; later
    /// calls, including after `close()`, return the same value. Bytes written
    /// after finalization still reach the sink but are not digested.
    ///
    /// A writer whose backend failed has no checksum: what the resource holds
    /// is unknown.
    pub fn checksum(&mut self) -> Result<Option<&str>> {
        if !self.finalized {
            if !self.failed {
                self.drain()?;
            }
            self.finalize();
        }
        Ok(self.checksum.as_deref())
    }

    fn finalize(&mut self) {
        self.finalized = true;
        if self.failed {
            self.checksum = None;
            return;
        }
        self.checksum = self.digest.finish();
        if let Some(sum) = &self.checksum {
            log::debug!("finalized write checksum {sum} at byte {}", self.drained);
        }
    }

    /// Drains, finalizes the checksum and releases the buffer and the backend.
    ///
    /// Resources are released even when the final drain fails. A writer that
    /// already failed skips the drain and reports `Error::Failed`. Closing an
    /// already closed writer is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if !self.open {
            return Ok(());
        }
        let drained = if self.failed {
            let discarded = self.buffer.remaining();
            log::warn!("discarding {discarded} buffered bytes of failed zio writer");
            Err(Error::Failed { discarded })
        } else {
            self.drain()
        };
        self.open = false;
        if !self.finalized {
            self.finalize();
        }
        self.buffer.release();
        let closed = self.sink.close();
        log::debug!("closed zio writer after {} bytes", self.drained);
        drained?;
        closed?;
        Ok(())
    }
}

impl<S: Sink, D: Digest> Drop for ZioWriter<S, D> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("failed to close zio writer: {e}");
        }
    }
}
