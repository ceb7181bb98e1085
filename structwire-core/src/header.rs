//! Framing elements of the variable-length string encodings.
//!
//! - [`TERMINATOR`] - byte ending a null-terminated string
//! - [`LengthPrefix`] - one-byte length header of a length-prefixed string

use crate::buffer::{ByteCursor, WriteBuffer};
use crate::error::{Error, Result};

/// Byte ending a null-terminated string.
pub const TERMINATOR: u8 = 0x00;

/// One-byte length header preceding length-prefixed data.
///
/// # Wire Format
/// ```text
/// +0: length (u8, 1 byte)
/// +1: data   (length bytes)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LengthPrefix {
    /// Length of the data that follows, in bytes.
    pub length: u8,
}

impl LengthPrefix {
    /// Encoded length of the header in bytes.
    pub const ENCODED_LENGTH: usize = 1;

    /// Largest data length the header can describe.
    pub const MAX_DATA_LENGTH: usize = u8::MAX as usize;

    /// Creates a header for `length` data bytes.
    #[must_use]
    pub const fn new(length: u8) -> Self {
        Self { length }
    }

    /// Creates a header describing `data`.
    ///
    /// # Errors
    /// Returns a value-range error if `data` is longer than
    /// [`Self::MAX_DATA_LENGTH`].
    pub fn for_data(data: &[u8]) -> Result<Self> {
        u8::try_from(data.len()).map(Self::new).map_err(|_| {
            Error::value_range(format!(
                "length-prefixed data holds at most {} bytes, got {}",
                Self::MAX_DATA_LENGTH,
                data.len()
            ))
        })
    }

    /// Reads the header from the cursor.
    ///
    /// # Errors
    /// Returns `InsufficientData` if the cursor is exhausted.
    #[inline]
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Self::new(cursor.read_u8()?))
    }

    /// Writes the header to the sink.
    ///
    /// # Errors
    /// Returns an error if the sink is full.
    #[inline]
    pub fn encode<W: WriteBuffer + ?Sized>(&self, sink: &mut W) -> Result<()> {
        sink.put_u8(self.length)
    }

    /// Returns the total size (header + data).
    #[must_use]
    pub const fn total_size(&self) -> usize {
        Self::ENCODED_LENGTH + self.length as usize
    }

    /// Returns true if the data is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }
}
