//! Defines the `Digest` trait and concrete implementations.
//!
//! A digest is fed every byte a stream transfers, in order, a buffer's worth
//! at a time. The result depends only on the byte sequence, never on where
//! buffer refills or drains happened to fall.

/// An incremental checksum algorithm.
pub trait Digest {
    /// Feeds the next run of transferred bytes.
    fn update(&mut self, bytes: &[u8]);

    /// Completes the computation and renders it as a lowercase hex string.
    ///
    /// Called at most once per stream. Returns `None` for the no-op digest.
    fn finish(&mut self) -> Option<String>;
}

/// A no-op digest for streams that do not need a checksum.
#[derive(Default, Clone, Copy, Debug)]
pub struct NoDigest;

impl NoDigest {
    pub fn new() -> Self {
        Self
    }
}

impl Digest for NoDigest {
    #[inline(always)]
    fn update(&mut self, _bytes: &[u8]) {}

    fn finish(&mut self) -> Option<String> {
        None
    }
}

/// 128-bit MD5, rendered as 32 hex characters.
#[derive(Clone)]
pub struct Md5 {
    context: md5::Context,
}

impl Md5 {
    pub fn new() -> Self {
        Self {
            context: md5::Context::new(),
        }
    }
}

impl Default for Md5 {
    fn default() -> Self {
        Self::new()
    }
}

impl Digest for Md5 {
    fn update(&mut self, bytes: &[u8]) {
        self.context.consume(bytes);
    }

    fn finish(&mut self) -> Option<String> {
        let context = std::mem::replace(&mut self.context, md5::Context::new());
        Some(format!("{:x}", context.compute()))
    }
}

/// CRC32 (IEEE), rendered as 8 hex characters.
#[cfg(feature = "crc32")]
#[derive(Default, Clone)]
pub struct Crc32 {
    hasher: crc32fast::Hasher,
}

#[cfg(feature = "crc32")]
impl Crc32 {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "crc32")]
impl Digest for Crc32 {
    fn update(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    fn finish(&mut self) -> Option<String> {
        let hasher = std::mem::take(&mut self.hasher);
        Some(format!("{:08x}", hasher.finalize()))
    }
}

/// CRC16 (ARC), rendered as 4 hex characters.
#[cfg(feature = "crc16")]
pub struct Crc16 {
    state: crc16::State<crc16::ARC>,
}

#[cfg(feature = "crc16")]
impl Crc16 {
    pub fn new() -> Self {
        Self {
            state: crc16::State::<crc16::ARC>::new(),
        }
    }
}

#[cfg(feature = "crc16")]
impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "crc16")]
impl Digest for Crc16 {
    fn update(&mut self, bytes: &[u8]) {
        self.state.update(bytes);
    }

    fn finish(&mut self) -> Option<String> {
        Some(format!("{:04x}", self.state.get()))
    }
}

/// XXH3 64-bit, rendered as 16 hex characters.
#[cfg(feature = "xxhash")]
#[derive(Default, Clone)]
pub struct XxHash64 {
    hasher: xxhash_rust::xxh3::Xxh3,
}

#[cfg(feature = "xxhash")]
impl XxHash64 {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "xxhash")]
impl Digest for XxHash64 {
    fn update(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    fn finish(&mut self) -> Option<String> {
        Some(format!("{:016x}", self.hasher.digest()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunked<D: Digest>(mut digest: D, payload: &[u8], chunk: usize) -> Option<String> {
        for part in payload.chunks(chunk) {
            digest.update(part);
        }
        digest.finish()
    }

    #[test]
    fn test_no_digest() {
        let mut digest = NoDigest::new();
        digest.update(b"test data");
        assert_eq!(digest.finish(), None);
    }

    #[test]
    fn test_md5_known_value() {
        let mut digest = Md5::new();
        digest.update(b"hello");
        assert_eq!(
            digest.finish().as_deref(),
            Some("5d41402abc4b2a76b9719d911017c592")
        );
    }

    #[test]
    fn test_md5_chunking_invariance() {
        let payload: Vec<u8> = (0..1000u32).map(|i| (i * 7) as u8).collect();
        let expected = format!("{:x}", md5::compute(&payload));
        for chunk in [1, 3, 16, 64, 999, 1000] {
            assert_eq!(chunked(Md5::new(), &payload, chunk), Some(expected.clone()));
        }
    }

    #[cfg(feature = "crc32")]
    #[test]
    fn test_crc32_chunking_invariance() {
        let payload = b"consistent test data";
        let expected = format!("{:08x}", crc32fast::hash(payload));
        assert_eq!(chunked(Crc32::new(), payload, 3), Some(expected));
    }

    #[cfg(feature = "xxhash")]
    #[test]
    fn test_xxhash64_chunking_invariance() {
        let payload = b"consistent test data";
        let expected = format!("{:016x}", xxhash_rust::xxh3::xxh3_64(payload));
        assert_eq!(chunked(XxHash64::new(), payload, 5), Some(expected));
    }

    #[cfg(feature = "crc16")]
    #[test]
    fn test_crc16_chunking_invariance() {
        let payload = b"consistent test data";
        let whole = chunked(Crc16::new(), payload, payload.len());
        assert_eq!(chunked(Crc16::new(), payload, 4), whole);
        assert_eq!(whole.map(|s| s.len()), Some(4));
    }
}
