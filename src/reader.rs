//! Buffered reading with non-consuming peek.

use alloc::vec::Vec;
use std::io::{self, Read};

/// Default buffer capacity, comfortably above any built-in magic length.
const DEFAULT_CAPACITY: usize = 16 * 1024;

/// Buffered reader with non-consuming peek.
///
/// Bytes returned by [`peek`](PeekReader::peek) remain available to later
/// `peek` and [`Read`] calls, so format probes can inspect a stream prefix
/// without committing to a decoder. Capacity is fixed at construction and
/// bounds how far ahead `peek` can look.
pub struct PeekReader<R> {
    inner: R,
    buf: Vec<u8>,
    pos: usize,
    filled: usize,
}

impl<R: Read> PeekReader<R> {
    /// Wrap `inner` with the default 16 KiB buffer.
    pub fn new(inner: R) -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, inner)
    }

    /// Wrap `inner` with a caller-chosen buffer capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        assert!(capacity > 0, "peek capacity must be nonzero");
        let mut buf = Vec::new();
        buf.resize(capacity, 0);
        Self {
            inner,
            buf,
            pos: 0,
            filled: 0,
        }
    }

    /// Buffer capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes currently buffered and unconsumed.
    pub fn buffered(&self) -> usize {
        self.filled - self.pos
    }

    /// Peek up to `n` bytes without consuming them.
    ///
    /// Returns fewer than `n` bytes when the source ends first, and an empty
    /// slice at end of stream; neither is an error. `n` beyond the capacity
    /// is clamped to it.
    pub fn peek(&mut self, n: usize) -> io::Result<&[u8]> {
        let n = n.min(self.buf.len());
        if self.buffered() < n {
            if self.pos > 0 {
                self.buf.copy_within(self.pos..self.filled, 0);
                self.filled -= self.pos;
                self.pos = 0;
            }
            while self.filled < n {
                match self.inner.read(&mut self.buf[self.filled..]) {
                    Ok(0) => break,
                    Ok(read) => self.filled += read,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            }
        }
        let end = self.filled.min(self.pos + n);
        Ok(&self.buf[self.pos..end])
    }

    /// The wrapped reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Unwrap, discarding any buffered bytes.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for PeekReader<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let buffered = self.buffered();
        if buffered > 0 {
            let n = buffered.min(out.len());
            out[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
            self.pos += n;
            if self.pos == self.filled {
                self.pos = 0;
                self.filled = 0;
            }
            return Ok(n);
        }
        self.inner.read(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn peek_does_not_consume() {
        let mut r = PeekReader::new(Cursor::new(b"farbfeldXYZ".to_vec()));
        assert_eq!(r.peek(8).unwrap(), b"farbfeld");
        assert_eq!(r.peek(8).unwrap(), b"farbfeld");

        let mut magic = [0u8; 8];
        r.read_exact(&mut magic).unwrap();
        assert_eq!(&magic, b"farbfeld");
    }

    #[test]
    fn short_source_yields_short_peek() {
        let mut r = PeekReader::new(Cursor::new(b"abc".to_vec()));
        assert_eq!(r.peek(10).unwrap(), b"abc");
        assert_eq!(r.peek(10).unwrap(), b"abc");

        let mut rest = Vec::new();
        r.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"abc");
    }

    #[test]
    fn peek_clamps_to_capacity() {
        let mut r = PeekReader::with_capacity(4, Cursor::new(b"abcdefgh".to_vec()));
        assert_eq!(r.peek(100).unwrap(), b"abcd");
    }

    #[test]
    fn read_spans_buffer_and_source() {
        let mut r = PeekReader::new(Cursor::new(b"abcdefgh".to_vec()));
        assert_eq!(r.peek(4).unwrap(), b"abcd");

        let mut out = [0u8; 8];
        r.read_exact(&mut out).unwrap();
        assert_eq!(&out, b"abcdefgh");
    }

    #[test]
    fn partial_read_then_peek_stays_aligned() {
        let mut r = PeekReader::new(Cursor::new(b"abcdef".to_vec()));
        assert_eq!(r.peek(6).unwrap(), b"abcdef");

        let mut two = [0u8; 2];
        r.read_exact(&mut two).unwrap();
        assert_eq!(&two, b"ab");
        assert_eq!(r.peek(4).unwrap(), b"cdef");
    }

    #[test]
    fn empty_source() {
        let mut r = PeekReader::new(Cursor::new(Vec::new()));
        assert_eq!(r.peek(8).unwrap(), b"");
        let mut out = [0u8; 4];
        assert_eq!(r.read(&mut out).unwrap(), 0);
    }

    struct InterruptOnce {
        data: Cursor<Vec<u8>>,
        interrupted: bool,
    }

    impl Read for InterruptOnce {
        fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::new(io::ErrorKind::Interrupted, "try again"));
            }
            self.data.read(out)
        }
    }

    #[test]
    fn interrupted_reads_are_retried() {
        let src = InterruptOnce {
            data: Cursor::new(b"farbfeld".to_vec()),
            interrupted: false,
        };
        let mut r = PeekReader::new(src);
        assert_eq!(r.peek(8).unwrap(), b"farbfeld");
    }
}
