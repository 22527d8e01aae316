use std::io::{Read, Result, Write};

pub struct FaultyReader<R: Read> {
    inner: R,
    mode: FaultMode,
    counter: usize,
}

pub enum FaultMode {
    OneByteChunks,
    InterruptedEvery(usize),
    PrematureEofAt(usize),
}

impl<R: Read> FaultyReader<R> {
    pub fn new(inner: R, mode: FaultMode) -> Self {
        Self {
            inner,
            mode,
            counter: 0,
        }
    }
}

impl<R: Read> Read for FaultyReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.counter += 1;
        match self.mode {
            FaultMode::OneByteChunks => {
                let mut tmp = [0u8; 1];
                match self.inner.read(&mut tmp)? {
                    0 => Ok(0),
                    _ => {
                        buf[0] = tmp[0];
                        Ok(1)
                    }
                }
            }
            FaultMode::InterruptedEvery(n) if n != 0 && self.counter % n == 0 => {
                Err(std::io::Error::from(std::io::ErrorKind::Interrupted))
            }
            FaultMode::PrematureEofAt(n) if self.counter >= n => Ok(0),
            _ => self.inner.read(buf),
        }
    }
}

/// Accepts `fail_after` bytes, then fails every write with `BrokenPipe`.
#[allow(dead_code)]
pub struct FailingWriter {
    pub written: Vec<u8>,
    pub fail_after: usize,
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if self.written.len() >= self.fail_after {
            return Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "Simulated I/O error",
            ));
        }
        let n = (self.fail_after - self.written.len()).min(buf.len());
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Fails its first `failures` writes with `BrokenPipe`, then accepts everything.
#[allow(dead_code)]
pub struct FlakyWriter {
    pub written: Vec<u8>,
    pub failures: usize,
}

impl Write for FlakyWriter {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "Simulated transient I/O error",
            ));
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
