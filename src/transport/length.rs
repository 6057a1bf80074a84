//! Upload body reader that enforces its declared length.

use crate::errors::LengthMismatch;
use parking_lot::Mutex;
use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;

/// Shared record of a length violation.
///
/// The HTTP client consuming a request body reports read failures through its
/// own error type, so the reader also records the mismatch here. The executor
/// checks the guard after the round-trip and reports the mismatch in place of
/// whatever the client returned.
#[derive(Debug, Clone, Default)]
pub struct LengthGuard {
    tripped: Arc<Mutex<Option<LengthMismatch>>>,
}

impl LengthGuard {
    /// Returns the recorded mismatch, if any.
    pub fn tripped(&self) -> Option<LengthMismatch> {
        *self.tripped.lock()
    }

    fn trip(&self, mismatch: LengthMismatch) {
        let mut slot = self.tripped.lock();
        if slot.is_none() {
            *slot = Some(mismatch);
        }
    }

    fn reset(&self) {
        *self.tripped.lock() = None;
    }
}

/// Wraps a byte source and fails unless it yields exactly `expected` bytes.
///
/// An overrun fails on the read that reaches `expected` while the source still
/// has data, or on any read past it; an underrun fails when the source reports
/// end of stream. Consumers that stop at the declared length, such as a sized
/// request body, still see the overrun. Nothing is buffered.
#[derive(Debug)]
pub struct LengthEnforcingReader<R> {
    inner: R,
    expected: u64,
    read: u64,
    exhausted: bool,
    guard: LengthGuard,
}

impl<R: Read> LengthEnforcingReader<R> {
    /// Wraps `inner`, declaring `expected` bytes.
    pub fn new(inner: R, expected: u64) -> Self {
        Self {
            inner,
            expected,
            read: 0,
            exhausted: false,
            guard: LengthGuard::default(),
        }
    }

    /// Returns a handle that observes mismatches from this reader.
    pub fn guard(&self) -> LengthGuard {
        self.guard.clone()
    }

    /// Declared length.
    pub fn expected_length(&self) -> u64 {
        self.expected
    }

    /// Bytes read so far.
    pub fn bytes_read(&self) -> u64 {
        self.read
    }

    /// Unwraps the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fail(&self, actual: u64) -> io::Error {
        let mismatch = LengthMismatch {
            expected: self.expected,
            actual,
        };
        self.guard.trip(mismatch);
        io::Error::new(io::ErrorKind::InvalidData, mismatch)
    }

    /// Reads one byte past the declared length. True when the source is done.
    fn source_exhausted(&mut self) -> io::Result<bool> {
        let mut probe = [0u8; 1];
        loop {
            match self.inner.read(&mut probe) {
                Ok(0) => return Ok(true),
                Ok(_) => return Ok(false),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read + Seek> LengthEnforcingReader<R> {
    /// Seeks the source back to its start and resets the counter.
    pub fn rewind(&mut self) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(0))?;
        self.read = 0;
        self.exhausted = false;
        self.guard.reset();
        Ok(())
    }
}

impl<R: Read> Read for LengthEnforcingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(mismatch) = self.guard.tripped() {
            return Err(io::Error::new(io::ErrorKind::InvalidData, mismatch));
        }
        if buf.is_empty() || self.exhausted {
            return Ok(0);
        }
        if self.read == self.expected {
            if !self.source_exhausted()? {
                return Err(self.fail(self.expected + 1));
            }
            self.exhausted = true;
            return Ok(0);
        }

        let n = self.inner.read(buf)?;
        if n == 0 {
            if self.read != self.expected {
                return Err(self.fail(self.read));
            }
            return Ok(0);
        }

        let total = self.read + n as u64;
        if total > self.expected {
            return Err(self.fail(total));
        }
        self.read = total;
        if total == self.expected {
            if !self.source_exhausted()? {
                return Err(self.fail(total + 1));
            }
            self.exhausted = true;
        }
        Ok(n)
    }
}
