//! The bounded staging region between primitive calls and a backend.

/// A fixed-capacity byte region with two cursors.
///
/// Bytes in `[pos, limit)` are live: unread on the read side, pending on the
/// write side. `[limit, capacity)` is free space a refill or a primitive write
/// may occupy. `[0, pos)` holds bytes the reader already consumed.
pub(crate) struct WorkBuffer {
    data: Box<[u8]>,
    pos: usize,
    limit: usize,
}

impl WorkBuffer {
    /// An empty buffer of `capacity` bytes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            pos: 0,
            limit: 0,
        }
    }

    /// A buffer that already holds `bytes` as live content.
    pub(crate) fn wrap(bytes: Vec<u8>) -> Self {
        let limit = bytes.len();
        Self {
            data: bytes.into_boxed_slice(),
            pos: 0,
            limit,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of live bytes.
    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.limit - self.pos
    }

    /// Free space after the live region.
    #[inline]
    pub(crate) fn free(&self) -> usize {
        self.data.len() - self.limit
    }

    #[inline]
    pub(crate) fn live(&self) -> &[u8] {
        &self.data[self.pos..self.limit]
    }

    /// Bytes already consumed from the front of the buffer.
    #[inline]
    pub(crate) fn consumed(&self) -> &[u8] {
        &self.data[..self.pos]
    }

    /// Takes `n` live bytes from the front. The caller must check `remaining()` first.
    #[inline]
    pub(crate) fn take(&mut self, n: usize) -> &[u8] {
        let start = self.pos;
        self.pos += n;
        &self.data[start..self.pos]
    }

    /// Reserves `n` bytes after the live region and returns them for writing.
    /// The caller must check `free()` first.
    #[inline]
    pub(crate) fn extend(&mut self, n: usize) -> &mut [u8] {
        let start = self.limit;
        self.limit += n;
        &mut self.data[start..self.limit]
    }

    /// Appends as much of `bytes` as fits, returning how many were copied.
    pub(crate) fn append(&mut self, bytes: &[u8]) -> usize {
        let n = bytes.len().min(self.free());
        self.extend(n).copy_from_slice(&bytes[..n]);
        n
    }

    /// The free region, for a backend to fill. Follow with `commit`.
    #[inline]
    pub(crate) fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.limit..]
    }

    /// Marks `n` bytes of the free region as live after a backend fill.
    #[inline]
    pub(crate) fn commit(&mut self, n: usize) {
        debug_assert!(n <= self.free());
        self.limit += n;
    }

    /// Slides the live region to the front, preserving order.
    pub(crate) fn compact(&mut self) {
        if self.pos > 0 {
            self.data.copy_within(self.pos..self.limit, 0);
            self.limit -= self.pos;
            self.pos = 0;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.pos = 0;
        self.limit = 0;
    }

    /// Frees the backing allocation. The buffer has zero capacity afterwards.
    pub(crate) fn release(&mut self) {
        self.data = Box::default();
        self.clear();
    }
}
