//! The buffered read-side engine.

use crate::backend::{ByteSource, FileSource, Source, StreamSource};
use crate::buffer::WorkBuffer;
use crate::codec::{self, FixedWidth, COMPACT_SENTINEL};
use crate::config::StreamConfig;
use crate::digest::{Digest, NoDigest};
use crate::error::{Error, Result};
use std::io::Read;
use std::path::Path;

/// A reader for primitive values and self-serializing records.
///
/// The reader owns a bounded work buffer and refills it from its `Source`
/// whenever a read needs more bytes than remain. Unread bytes are slid to the
/// front before each refill, so a primitive is never split across refills and
/// never returned partially.
///
/// With a digest other than `NoDigest`, every consumed byte is fed to it, a
/// buffer's worth at a time, and `checksum()` reports the digest of exactly the
/// bytes read so far.
///
/// ```rust
/// # use zio::{ZioReader, ZioWriter};
/// let mut writer = ZioWriter::in_memory();
/// writer.write_version(0)?;
/// writer.write_int(42)?;
/// let bytes = writer.into_bytes()?;
///
/// let mut reader = ZioReader::from_bytes(bytes);
/// assert_eq!(reader.read_version()?, 0);
/// assert_eq!(reader.read_int()?, 42);
/// assert_eq!(reader.available()?, 0);
/// # Ok::<(), zio::Error>(())
/// ```
pub struct ZioReader<S: Source, D: Digest = NoDigest> {
    source: S,
    digest: D,
    buffer: WorkBuffer,
    position: u64,
    open: bool,
    finalized: bool,
    checksum: Option<String>,
}

impl<S: Source> ZioReader<S> {
    /// Creates a reader over `source` without a checksum.
    pub fn new(source: S, config: StreamConfig) -> Self {
        Self::with_digest(source, NoDigest, config)
    }
}

impl ZioReader<FileSource> {
    /// Opens a file with the default buffer settings.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, StreamConfig::default())
    }

    /// Opens a file with explicit buffer settings.
    pub fn open_with(path: impl AsRef<Path>, config: StreamConfig) -> Result<Self> {
        Ok(Self::new(FileSource::open(path)?, config))
    }
}

impl ZioReader<ByteSource> {
    /// Reads from an in-memory array. The array itself becomes the work buffer.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::from_bytes_with_digest(bytes, NoDigest)
    }
}

impl<R: Read> ZioReader<StreamSource<R>> {
    /// Reads from an arbitrary byte endpoint with the default buffer settings.
    pub fn from_reader(inner: R) -> Self {
        Self::new(StreamSource::new(inner), StreamConfig::default())
    }
}

impl<D: Digest> ZioReader<ByteSource, D> {
    /// Like `from_bytes`, accumulating `digest` over the bytes read.
    pub fn from_bytes_with_digest(bytes: Vec<u8>, digest: D) -> Self {
        let source = ByteSource::new(bytes.len());
        Self::from_parts(source, digest, WorkBuffer::wrap(bytes))
    }

    /// Bytes left in the array. Same as `available()`.
    pub fn remaining_bytes(&self) -> Result<u64> {
        self.available()
    }
}

impl<S: Source, D: Digest> ZioReader<S, D> {
    /// Creates a reader over `source` that feeds every consumed byte to `digest`.
    pub fn with_digest(source: S, digest: D, config: StreamConfig) -> Self {
        Self::from_parts(source, digest, WorkBuffer::with_capacity(config.capacity()))
    }

    fn from_parts(source: S, digest: D, buffer: WorkBuffer) -> Self {
        log::debug!("opened zio reader with {}-byte buffer", buffer.capacity());
        Self {
            source,
            digest,
            buffer,
            position: 0,
            open: true,
            finalized: false,
            checksum: None,
        }
    }

    #[inline]
    fn check_open(&self) -> Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(Error::Closed)
        }
    }

    /// Feeds consumed-but-undigested bytes to the digest. Those are always `[0, pos)`.
    fn digest_consumed(&mut self) {
        if !self.finalized {
            self.digest.update(self.buffer.consumed());
        }
    }

    /// Makes at least `n` bytes available, refilling from the source if needed.
    fn ensure(&mut self, n: usize) -> Result<()> {
        self.check_open()?;
        if self.buffer.remaining() >= n {
            return Ok(());
        }
        self.refill(n)
    }

    /// One refill cycle: slide unread bytes to the front, then fill until `n` are live.
    fn refill(&mut self, n: usize) -> Result<()> {
        self.digest_consumed();
        self.buffer.compact();
        while self.buffer.remaining() < n {
            let got = self.source.fill(self.buffer.spare_mut())?;
            if got == 0 {
                return Err(Error::UnexpectedEof {
                    needed: n,
                    available: self.buffer.remaining(),
                });
            }
            self.buffer.commit(got);
        }
        log::trace!("refilled work buffer to {} bytes", self.buffer.remaining());
        Ok(())
    }

    #[inline]
    fn take(&mut self, n: usize) -> Result<&[u8]> {
        self.ensure(n)?;
        self.position += n as u64;
        Ok(self.buffer.take(n))
    }

    /// Reads any fixed-width primitive.
    #[inline]
    pub fn read_fixed<T: FixedWidth>(&mut self) -> Result<T> {
        self.take(T::WIDTH).map(T::get)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        self.read_fixed()
    }

    /// Reads a signed byte.
    pub fn read_byte(&mut self) -> Result<i8> {
        self.read_fixed()
    }

    /// Reads an unsigned byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_fixed()
    }

    /// Reads a character stored as one UTF-16 code unit.
    pub fn read_char(&mut self) -> Result<char> {
        let unit = self.read_fixed::<u16>()?;
        codec::decode_char(unit)
    }

    pub fn read_short(&mut self) -> Result<i16> {
        self.read_fixed()
    }

    pub fn read_int(&mut self) -> Result<i32> {
        self.read_fixed()
    }

    pub fn read_long(&mut self) -> Result<i64> {
        self.read_fixed()
    }

    pub fn read_float(&mut self) -> Result<f32> {
        self.read_fixed()
    }

    pub fn read_double(&mut self) -> Result<f64> {
        self.read_fixed()
    }

    /// Reads a compact-integer version tag.
    ///
    /// The value is returned as-is; deciding what a version means is up to the caller.
    pub fn read_version(&mut self) -> Result<i32> {
        match self.read_u8()? {
            COMPACT_SENTINEL => self.read_int(),
            small => Ok(small as i32),
        }
    }

    /// Reads a version tag and rejects any value newer than `max`.
    pub fn read_version_at_most(&mut self, max: i32) -> Result<i32> {
        let found = self.read_version()?;
        if found > max {
            return Err(Error::UnsupportedVersion { found, max });
        }
        Ok(found)
    }

    /// Reads a length-prefixed string; `None` when the null sentinel was written.
    pub fn read_string(&mut self) -> Result<Option<String>> {
        let prefix = self.read_fixed::<u16>()?;
        match codec::string_len(prefix) {
            None => Ok(None),
            Some(len) => {
                let mut bytes = vec![0u8; len];
                self.read_fully(&mut bytes)?;
                codec::decode_utf8(bytes).map(Some)
            }
        }
    }

    /// Reads a length-prefixed string that must not be null.
    pub fn read_str(&mut self) -> Result<String> {
        self.read_string()?
            .ok_or_else(|| Error::invalid_data("expected a string, found null"))
    }

    /// Reads exactly `len` Latin-1 bytes written without a length prefix.
    pub fn read_raw_string(&mut self, len: usize) -> Result<String> {
        let mut bytes = vec![0u8; len];
        self.read_fully(&mut bytes)?;
        Ok(codec::latin1_decode(&bytes))
    }

    /// Fills `dst` completely, refilling the work buffer as often as needed.
    pub fn read_fully(&mut self, dst: &mut [u8]) -> Result<()> {
        self.check_open()?;
        let mut filled = 0;
        while filled < dst.len() {
            if self.buffer.remaining() == 0 {
                self.refill(1).map_err(|e| match e {
                    Error::UnexpectedEof { .. } => Error::UnexpectedEof {
                        needed: dst.len() - filled,
                        available: 0,
                    },
                    other => other,
                })?;
            }
            let n = self.buffer.remaining().min(dst.len() - filled);
            dst[filled..filled + n].copy_from_slice(self.buffer.take(n));
            self.position += n as u64;
            filled += n;
        }
        Ok(())
    }

    /// Consumes and discards `n` bytes. Skipped bytes still count toward the checksum.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.check_open()?;
        let mut left = n;
        while left > 0 {
            if self.buffer.remaining() == 0 {
                self.refill(1).map_err(|e| match e {
                    Error::UnexpectedEof { .. } => Error::UnexpectedEof {
                        needed: left,
                        available: 0,
                    },
                    other => other,
                })?;
            }
            let step = self.buffer.remaining().min(left);
            self.buffer.take(step);
            self.position += step as u64;
            left -= step;
        }
        Ok(())
    }

    /// Bytes consumed since the stream was opened.
    pub fn position(&self) -> Result<u64> {
        self.check_open()?;
        Ok(self.position)
    }

    /// Bytes left in the resource, for backends that know their size.
    ///
    /// Wrapped streams have no size and report `Error::Unsupported`.
    pub fn available(&self) -> Result<u64> {
        self.check_open()?;
        match self.source.size_hint() {
            Some(len) => Ok(len.saturating_sub(self.position)),
            None => Err(Error::unsupported("available")),
        }
    }

    /// Work buffer capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn is_closed(&self) -> bool {
        !self.open
    }

    /// Hex digest of the bytes read so far, or `None` without a digest.
    ///
    /// The first call finalizes the digest; later calls, including after
    /// `close()`, return the same value. Bytes read after finalization are not
    /// included.
    pub fn checksum(&mut self) -> Result<Option<&str>> {
        if !self.finalized {
            self.finalize();
        }
        Ok(self.checksum.as_deref())
    }

    fn finalize(&mut self) {
        self.digest_consumed();
        self.finalized = true;
        self.checksum = self.digest.finish();
        if let Some(sum) = &self.checksum {
            log::debug!("finalized read checksum {sum} at byte {}", self.position);
        }
    }

    /// Finalizes the checksum and releases the buffer and the backend.
    ///
    /// Closing an already closed reader is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if !self.open {
            return Ok(());
        }
        if !self.finalized {
            self.finalize();
        }
        self.open = false;
        self.buffer.release();
        log::debug!("closed zio reader after {} bytes", self.position);
        self.source.close()?;
        Ok(())
    }
}

impl<S: Source, D: Digest> Drop for ZioReader<S, D> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("failed to close zio reader: {e}");
        }
    }
}
