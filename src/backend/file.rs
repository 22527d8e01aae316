//! File-backed streams.

use super::{released, write_all_once, Sink, Source};
use std::fs::File;
use std::io::{self, Read, Seek, Write};
use std::path::Path;

/// Reads from a file handle. The file length is captured at open time as the size hint.
pub struct FileSource {
    file: Option<File>,
    len: u64,
}

impl FileSource {
    /// Opens `path` for reading.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::from_file(File::open(path)?)
    }

    /// Adopts an already open handle; reading starts at its current offset.
    pub fn from_file(mut file: File) -> io::Result<Self> {
        let offset = file.stream_position()?;
        let len = file.metadata()?.len().saturating_sub(offset);
        Ok(Self {
            file: Some(file),
            len,
        })
    }
}

impl Source for FileSource {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.as_mut().ok_or_else(released)?.read(buf)
    }

    fn size_hint(&self) -> Option<u64> {
        Some(self.len)
    }

    fn close(&mut self) -> io::Result<()> {
        self.file.take();
        Ok(())
    }
}

/// Writes to a file handle.
pub struct FileSink {
    file: Option<File>,
}

impl FileSink {
    /// Creates (or truncates) `path` for writing.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::from_file(File::create(path)?))
    }

    /// Adopts an already open handle; writing starts at its current offset.
    pub fn from_file(file: File) -> Self {
        Self { file: Some(file) }
    }
}

impl Sink for FileSink {
    fn drain(&mut self, bytes: &[u8]) -> io::Result<()> {
        write_all_once(self.file.as_mut().ok_or_else(released)?, bytes)
    }

    fn close(&mut self) -> io::Result<()> {
        match self.file.take() {
            Some(mut file) => file.flush(),
            None => Ok(()),
        }
    }
}
