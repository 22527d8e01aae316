//! Backend adapters: where a stream's bytes come from and go to.
//!
//! A backend only moves bytes between the work buffer and its resource and
//! releases that resource on close. Buffering, digesting and encoding all live
//! in the engine, so a new backend is a handful of methods.

use std::io::{self, Write};

pub mod bytes;
pub mod file;
pub mod stream;

pub use self::bytes::{ByteSink, ByteSource};
pub use self::file::{FileSink, FileSource};
pub use self::stream::{StreamSink, StreamSource};

/// The read-side backend contract.
pub trait Source {
    /// Copies the next bytes of the resource into `buf`.
    ///
    /// Returns the number of bytes produced; `0` means the resource is exhausted.
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Total byte length of the resource, when the backend knows it upfront.
    fn size_hint(&self) -> Option<u64> {
        None
    }

    /// Releases the resource handle. Called once by the owning reader.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// The write-side backend contract.
pub trait Sink {
    /// Consumes all of `bytes` into the resource.
    ///
    /// Errors surface unchanged, `Interrupted` included. After a failure an
    /// unknown prefix of `bytes` may have reached the resource.
    fn drain(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Releases the resource handle. Called once by the owning writer after the final drain.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Like `Write::write_all`, but an `Interrupted` write is returned instead of retried.
pub(crate) fn write_all_once<W: Write + ?Sized>(inner: &mut W, mut bytes: &[u8]) -> io::Result<()> {
    while !bytes.is_empty() {
        match inner.write(bytes)? {
            0 => return Err(io::Error::from(io::ErrorKind::WriteZero)),
            n => bytes = &bytes[n..],
        }
    }
    Ok(())
}

pub(crate) fn released() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "backend resource already released")
}
