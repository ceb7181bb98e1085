//! Byte sources and sinks used by the field codecs.
//!
//! This module provides:
//! - [`ByteCursor`] - forward-only reader over a byte slice
//! - [`WriteBuffer`] - sequential byte sink trait
//! - [`EncoderBuffer`] - sink writing into a caller-provided fixed slice

use crate::error::{Error, Result};

/// Forward-only cursor over a borrowed byte slice.
///
/// Every read advances the position by exactly the number of bytes
/// returned. A read that needs more bytes than remain fails with
/// [`Error::InsufficientData`] and leaves the position unchanged.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    /// Creates a cursor positioned at the start of `data`.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Returns the current read position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Returns true if every byte has been read.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Returns the unread tail of the input without advancing.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.position..]
    }

    /// Reads a single byte.
    ///
    /// # Errors
    /// Returns `InsufficientData` if the cursor is exhausted.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = *self
            .data
            .get(self.position)
            .ok_or(Error::insufficient(1, 0))?;
        self.position += 1;
        Ok(byte)
    }

    /// Reads exactly `len` bytes.
    ///
    /// # Errors
    /// Returns `InsufficientData` if fewer than `len` bytes remain.
    #[inline]
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if len > available {
            return Err(Error::insufficient(len, available));
        }
        let start = self.position;
        self.position += len;
        Ok(&self.data[start..start + len])
    }

    /// Reads exactly `N` bytes into an array.
    ///
    /// # Errors
    /// Returns `InsufficientData` if fewer than `N` bytes remain.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Reads bytes up to and including `terminator`.
    ///
    /// The returned slice excludes the terminator. If the input ends before a
    /// terminator is found nothing is consumed.
    ///
    /// # Errors
    /// Returns `InsufficientData` if no terminator remains in the input.
    pub fn read_until(&mut self, terminator: u8) -> Result<&'a [u8]> {
        let rest = self.rest();
        match rest.iter().position(|&b| b == terminator) {
            Some(end) => {
                self.position += end + 1;
                Ok(&rest[..end])
            }
            None => Err(Error::insufficient(rest.len() + 1, rest.len())),
        }
    }
}

/// Sequential byte sink.
///
/// Writes append at the current position. Implementations with a bounded
/// capacity fail with [`Error::InsufficientData`] instead of truncating.
pub trait WriteBuffer {
    /// Appends a byte slice.
    ///
    /// # Errors
    /// Returns an error if the sink cannot hold the bytes.
    fn put_bytes(&mut self, src: &[u8]) -> Result<()>;

    /// Returns the number of bytes written so far.
    fn bytes_written(&self) -> usize;

    /// Appends a single byte.
    ///
    /// # Errors
    /// Returns an error if the sink is full.
    #[inline]
    fn put_u8(&mut self, value: u8) -> Result<()> {
        self.put_bytes(&[value])
    }

    /// Appends `count` zero bytes.
    ///
    /// # Errors
    /// Returns an error if the sink cannot hold the bytes.
    fn put_zeros(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            self.put_u8(0)?;
        }
        Ok(())
    }
}

impl WriteBuffer for Vec<u8> {
    #[inline]
    fn put_bytes(&mut self, src: &[u8]) -> Result<()> {
        self.extend_from_slice(src);
        Ok(())
    }

    #[inline]
    fn bytes_written(&self) -> usize {
        self.len()
    }

    fn put_zeros(&mut self, count: usize) -> Result<()> {
        self.resize(self.len() + count, 0);
        Ok(())
    }
}

/// Sink writing into a caller-provided fixed slice.
///
/// Tracks the current write position relative to a starting offset.
#[derive(Debug)]
pub struct EncoderBuffer<'a> {
    buffer: &'a mut [u8],
    offset: usize,
    position: usize,
}

impl<'a> EncoderBuffer<'a> {
    /// Creates a new encoder buffer.
    ///
    /// # Arguments
    /// * `buffer` - Mutable byte buffer to write to
    /// * `offset` - Starting offset in the buffer, clamped to its length
    #[must_use]
    pub fn new(buffer: &'a mut [u8], offset: usize) -> Self {
        let offset = offset.min(buffer.len());
        Self {
            buffer,
            offset,
            position: offset,
        }
    }

    /// Returns the underlying buffer.
    #[must_use]
    pub fn buffer(&self) -> &[u8] {
        self.buffer
    }

    /// Returns the starting offset.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the current write position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the remaining capacity.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// Returns the bytes written since the starting offset.
    #[must_use]
    pub fn written(&self) -> &[u8] {
        &self.buffer[self.offset..self.position]
    }
}

impl WriteBuffer for EncoderBuffer<'_> {
    fn put_bytes(&mut self, src: &[u8]) -> Result<()> {
        let available = self.remaining();
        if src.len() > available {
            return Err(Error::insufficient(src.len(), available));
        }
        self.buffer[self.position..self.position + src.len()].copy_from_slice(src);
        self.position += src.len();
        Ok(())
    }

    fn bytes_written(&self) -> usize {
        self.position - self.offset
    }

    fn put_zeros(&mut self, count: usize) -> Result<()> {
        let available = self.remaining();
        if count > available {
            return Err(Error::insufficient(count, available));
        }
        self.buffer[self.position..self.position + count].fill(0);
        self.position += count;
        Ok(())
    }
}
