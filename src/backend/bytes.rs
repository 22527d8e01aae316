//! In-memory byte-array streams.

use super::{Sink, Source};
use std::io;

/// Initial allocation of a `ByteSink` when no size is requested.
pub const DEFAULT_SINK_CAPACITY: usize = 256;

/// Read side of a byte-array stream.
///
/// The reader adopts the array itself as its work buffer, so there is never
/// anything left to fill: every refill reports end of resource.
#[derive(Debug, Clone, Copy)]
pub struct ByteSource {
    len: u64,
}

impl ByteSource {
    pub(crate) fn new(len: usize) -> Self {
        Self { len: len as u64 }
    }
}

impl Source for ByteSource {
    fn fill(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Ok(0)
    }

    fn size_hint(&self) -> Option<u64> {
        Some(self.len)
    }
}

/// Write side of a byte-array stream: a growable destination array.
///
/// When a drain does not fit, the array grows to at least double its size.
#[derive(Debug, Default)]
pub struct ByteSink {
    data: Vec<u8>,
    len: usize,
}

impl ByteSink {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SINK_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity],
            len: 0,
        }
    }

    /// The bytes drained so far, trimmed to their exact length.
    pub fn bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Moves the drained bytes out, leaving the sink empty.
    pub(crate) fn take_bytes(&mut self) -> Vec<u8> {
        let mut data = std::mem::take(&mut self.data);
        data.truncate(self.len);
        self.len = 0;
        data
    }

    fn grow_for(&mut self, needed: usize) {
        let grown = needed.max(self.data.len().saturating_mul(2));
        log::trace!(
            "byte sink growing from {} to {} bytes",
            self.data.len(),
            grown
        );
        self.data.resize(grown, 0);
    }
}

impl Sink for ByteSink {
    fn drain(&mut self, bytes: &[u8]) -> io::Result<()> {
        let end = self.len + bytes.len();
        if end > self.data.len() {
            self.grow_for(end);
        }
        self.data[self.len..end].copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }
}
