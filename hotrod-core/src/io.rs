//! Byte-stream capabilities driving the codec.
//!
//! The codec never touches a socket. It is parameterized over two small
//! capabilities: a [`ByteSource`] that fills a buffer with exactly N bytes
//! and a [`ByteSink`] that emits exactly N bytes. Callers implement them on
//! top of whatever transport they own; the in-memory implementations here
//! back the request assembler and the tests.

use std::io::{Read, Write};

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{HotRodError, Result};

/// Capability to read exactly `buf.len()` bytes from a stream.
pub trait ByteSource {
    /// Fills the whole buffer or fails.
    ///
    /// A short read is a failure; the capability is responsible for looping
    /// until every byte is delivered or reporting a transport error.
    fn fill(&mut self, buf: &mut [u8]) -> Result<()>;
}

/// Capability to write exactly `buf.len()` bytes to a stream.
pub trait ByteSink {
    /// Emits the whole buffer or fails.
    fn emit(&mut self, buf: &[u8]) -> Result<()>;
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).fill(buf)
    }
}

impl<T: ByteSink + ?Sized> ByteSink for &mut T {
    fn emit(&mut self, buf: &[u8]) -> Result<()> {
        (**self).emit(buf)
    }
}

/// A [`ByteSource`] over an in-memory byte slice.
///
/// Decoding past the end of the slice is a transport error, which makes this
/// the loopback half of codec tests: whatever a mock server encoded is the
/// whole stream.
#[derive(Debug)]
pub struct SliceSource<'a> {
    data: &'a [u8],
}

impl<'a> SliceSource<'a> {
    /// Creates a source reading from the given slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Returns the number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if every byte has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.data.is_empty()
    }
}

impl ByteSource for SliceSource<'_> {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.data.remaining() < buf.len() {
            return Err(HotRodError::Transport(format!(
                "stream ended: need {} bytes, have {}",
                buf.len(),
                self.data.remaining()
            )));
        }
        self.data.copy_to_slice(buf);
        Ok(())
    }
}

/// A [`ByteSink`] accumulating into a growable buffer.
///
/// This is the request assembler: operation writers append to it and the
/// caller flushes the finished request in one piece.
#[derive(Debug, Default)]
pub struct BufSink {
    buffer: BytesMut,
}

impl BufSink {
    /// Creates an empty sink with a small default capacity.
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(256),
        }
    }

    /// Creates an empty sink with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Returns the written bytes as a slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Consumes the sink and returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer.to_vec()
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clears the buffer, removing all written data.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl ByteSink for BufSink {
    fn emit(&mut self, buf: &[u8]) -> Result<()> {
        self.buffer.put_slice(buf);
        Ok(())
    }
}

/// Adapts any [`Read`] implementation into a [`ByteSource`].
///
/// A blocking socket wrapped in this type drives the codec without the codec
/// knowing about sockets. Read errors and timeouts surface as transport
/// errors.
#[derive(Debug)]
pub struct ReadSource<R> {
    inner: R,
}

impl<R: Read> ReadSource<R> {
    /// Wraps the given reader.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for ReadSource<R> {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner.read_exact(buf)?;
        Ok(())
    }
}

/// Adapts any [`Write`] implementation into a [`ByteSink`].
#[derive(Debug)]
pub struct WriteSink<W> {
    inner: W,
}

impl<W: Write> WriteSink<W> {
    /// Wraps the given writer.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> ByteSink for WriteSink<W> {
    fn emit(&mut self, buf: &[u8]) -> Result<()> {
        self.inner.write_all(buf)?;
        Ok(())
    }
}
