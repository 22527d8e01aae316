//! Adapters over arbitrary `Read`/`Write` endpoints (pipes, sockets, cursors).
//!
//! These backends have no notion of total length, so readers built on them
//! report `available()` as unsupported.

use super::{released, write_all_once, Sink, Source};
use std::io::{self, Read, Write};

/// Reads from any `Read`. Pass `&mut R` to keep ownership of the endpoint.
pub struct StreamSource<R: Read> {
    inner: Option<R>,
}

impl<R: Read> StreamSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner: Some(inner) }
    }
}

impl<R: Read> Source for StreamSource<R> {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.as_mut().ok_or_else(released)?.read(buf)
    }

    fn close(&mut self) -> io::Result<()> {
        self.inner.take();
        Ok(())
    }
}

/// Writes to any `Write`. Pass `&mut W` to keep ownership of the endpoint.
pub struct StreamSink<W: Write> {
    inner: Option<W>,
}

impl<W: Write> StreamSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner: Some(inner) }
    }
}

impl<W: Write> Sink for StreamSink<W> {
    fn drain(&mut self, bytes: &[u8]) -> io::Result<()> {
        write_all_once(self.inner.as_mut().ok_or_else(released)?, bytes)
    }

    fn close(&mut self) -> io::Result<()> {
        match self.inner.take() {
            Some(mut inner) => inner.flush(),
            None => Ok(()),
        }
    }
}
