//! Variable and fixed-length byte string fields.
//!
//! - [`CStringField`] - bytes followed by a terminator
//! - [`PStringField`] - one length byte followed by that many bytes
//! - [`BytesField`] - exactly `length` bytes

use structwire_core::{ByteCursor, Error, LengthPrefix, Result, TERMINATOR, Value, WriteBuffer};

use crate::codec::{Codec, Scope, mismatch, unset};

fn expect_bytes<'v>(kind: &str, value: &'v Value) -> Result<&'v [u8]> {
    value.as_bytes().ok_or_else(|| mismatch(kind, value))
}

/// Null-terminated byte string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CStringField {
    value: Option<Vec<u8>>,
}

impl CStringField {
    const KIND: &'static str = "cstring";

    /// Creates a field without a value.
    #[must_use]
    pub const fn new() -> Self {
        Self { value: None }
    }

    /// Returns the string bytes, without the terminator.
    #[must_use]
    pub fn value(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }

    /// Stores a byte string.
    ///
    /// # Errors
    /// Returns a value-range error if the value is not a byte string or
    /// contains the terminator.
    pub fn set(&mut self, value: &Value) -> Result<()> {
        let bytes = expect_bytes(Self::KIND, value)?;
        if let Some(at) = bytes.iter().position(|&b| b == TERMINATOR) {
            return Err(Error::value_range(format!(
                "null-terminated string contains a terminator at offset {at}"
            )));
        }
        self.value = Some(bytes.to_vec());
        Ok(())
    }
}

impl Codec for CStringField {
    fn size(&self) -> Result<usize> {
        self.value
            .as_ref()
            .map(|v| v.len() + 1)
            .ok_or_else(|| unset(Self::KIND))
    }

    fn consume(&mut self, cursor: &mut ByteCursor<'_>, _scope: &Scope<'_>) -> Result<()> {
        self.value = Some(cursor.read_until(TERMINATOR)?.to_vec());
        Ok(())
    }

    fn emit<W: WriteBuffer + ?Sized>(&self, sink: &mut W) -> Result<()> {
        let value = self.value.as_ref().ok_or_else(|| unset(Self::KIND))?;
        sink.put_bytes(value)?;
        sink.put_u8(TERMINATOR)
    }
}

/// Byte string preceded by its one-byte length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PStringField {
    value: Option<Vec<u8>>,
}

impl PStringField {
    const KIND: &'static str = "pstring";

    /// Creates a field without a value.
    #[must_use]
    pub const fn new() -> Self {
        Self { value: None }
    }

    /// Returns the string bytes, without the length byte.
    #[must_use]
    pub fn value(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }

    /// Stores a byte string.
    ///
    /// # Errors
    /// Returns a value-range error if the value is not a byte string or is
    /// longer than [`LengthPrefix::MAX_DATA_LENGTH`].
    pub fn set(&mut self, value: &Value) -> Result<()> {
        let bytes = expect_bytes(Self::KIND, value)?;
        LengthPrefix::for_data(bytes)?;
        self.value = Some(bytes.to_vec());
        Ok(())
    }
}

impl Codec for PStringField {
    fn size(&self) -> Result<usize> {
        self.value
            .as_ref()
            .map(|v| LengthPrefix::ENCODED_LENGTH + v.len())
            .ok_or_else(|| unset(Self::KIND))
    }

    fn consume(&mut self, cursor: &mut ByteCursor<'_>, _scope: &Scope<'_>) -> Result<()> {
        let header = LengthPrefix::read(cursor)?;
        self.value = Some(cursor.read_bytes(usize::from(header.length))?.to_vec());
        Ok(())
    }

    fn emit<W: WriteBuffer + ?Sized>(&self, sink: &mut W) -> Result<()> {
        let value = self.value.as_ref().ok_or_else(|| unset(Self::KIND))?;
        LengthPrefix::for_data(value)?.encode(sink)?;
        sink.put_bytes(value)
    }
}

/// Exactly `length` raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytesField {
    length: usize,
    value: Option<Vec<u8>>,
}

impl BytesField {
    const KIND: &'static str = "bytes";

    /// Creates a field of `length` bytes without a value.
    #[must_use]
    pub const fn new(length: usize) -> Self {
        Self {
            length,
            value: None,
        }
    }

    /// Returns the declared width.
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    /// Returns the bytes.
    #[must_use]
    pub fn value(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }

    /// Stores exactly [`Self::length`] bytes.
    ///
    /// # Errors
    /// Returns a value-range error if the value is not a byte string of the
    /// declared width.
    pub fn set(&mut self, value: &Value) -> Result<()> {
        let bytes = expect_bytes(Self::KIND, value)?;
        if bytes.len() != self.length {
            return Err(Error::value_range(format!(
                "expected {} bytes, got {}",
                self.length,
                bytes.len()
            )));
        }
        self.value = Some(bytes.to_vec());
        Ok(())
    }
}

impl Codec for BytesField {
    fn size(&self) -> Result<usize> {
        match self.value {
            Some(_) => Ok(self.length),
            None => Err(unset(Self::KIND)),
        }
    }

    fn consume(&mut self, cursor: &mut ByteCursor<'_>, _scope: &Scope<'_>) -> Result<()> {
        self.value = Some(cursor.read_bytes(self.length)?.to_vec());
        Ok(())
    }

    fn emit<W: WriteBuffer + ?Sized>(&self, sink: &mut W) -> Result<()> {
        let value = self.value.as_ref().ok_or_else(|| unset(Self::KIND))?;
        sink.put_bytes(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consume<C: Codec>(field: &mut C, data: &[u8]) -> Result<usize> {
        let mut cursor = ByteCursor::new(data);
        field.consume(&mut cursor, &Scope::detached())?;
        Ok(cursor.position())
    }

    #[test]
    fn test_cstring_consume() {
        let mut f = CStringField::new();
        assert_eq!(consume(&mut f, b"test\x00").unwrap(), 5);
        assert_eq!(f.value(), Some(&b"test"[..]));
        assert_eq!(f.size().unwrap(), 5);
    }

    #[test]
    fn test_cstring_stops_at_first_terminator() {
        let mut f = CStringField::new();
        assert_eq!(consume(&mut f, b"ab\x00cd\x00").unwrap(), 3);
        assert_eq!(f.value(), Some(&b"ab"[..]));
    }

    #[test]
    fn test_cstring_missing_terminator() {
        let mut f = CStringField::new();
        assert!(consume(&mut f, b"test").unwrap_err().is_insufficient_data());
        assert!(f.value().is_none());
    }

    #[test]
    fn test_cstring_empty_value() {
        let mut f = CStringField::new();
        f.set(&Value::from(b"")).unwrap();
        let mut out = Vec::new();
        f.emit(&mut out).unwrap();
        assert_eq!(out, b"\x00");
        assert_eq!(f.size().unwrap(), 1);
    }

    #[test]
    fn test_cstring_rejects_terminator_in_value() {
        let mut f = CStringField::new();
        assert!(f.set(&Value::from(b"a\x00b")).unwrap_err().is_value_range());
        assert!(f.set(&Value::UInt(1)).unwrap_err().is_value_range());
    }

    #[test]
    fn test_pstring_consume() {
        let mut f = PStringField::new();
        assert_eq!(consume(&mut f, b"\x04test").unwrap(), 5);
        assert_eq!(f.value(), Some(&b"test"[..]));
        assert_eq!(f.size().unwrap(), 5);
    }

    #[test]
    fn test_pstring_short_data() {
        let mut f = PStringField::new();
        assert!(consume(&mut f, b"\x05test").unwrap_err().is_insufficient_data());
    }

    #[test]
    fn test_pstring_zero_length() {
        let mut f = PStringField::new();
        assert_eq!(consume(&mut f, b"\x00").unwrap(), 1);
        assert_eq!(f.value(), Some(&b""[..]));
        assert_eq!(f.size().unwrap(), 1);
    }

    #[test]
    fn test_pstring_no_data() {
        let mut f = PStringField::new();
        assert!(consume(&mut f, b"").unwrap_err().is_insufficient_data());
    }

    #[test]
    fn test_pstring_emit() {
        let mut f = PStringField::new();
        f.set(&Value::from(b"test")).unwrap();
        let mut out = Vec::new();
        f.emit(&mut out).unwrap();
        assert_eq!(out, b"\x04test");
        assert_eq!(out[0] as usize, f.size().unwrap() - 1);
    }

    #[test]
    fn test_pstring_length_limit() {
        let mut f = PStringField::new();
        assert!(f.set(&Value::from(vec![b'x'; 255])).is_ok());
        assert!(
            f.set(&Value::from(vec![b'x'; 256]))
                .unwrap_err()
                .is_value_range()
        );
    }

    #[test]
    fn test_bytes_field() {
        let mut f = BytesField::new(3);
        assert!(f.size().unwrap_err().is_configuration());
        assert!(f.set(&Value::from(b"ab")).unwrap_err().is_value_range());
        assert_eq!(consume(&mut f, b"abcd").unwrap(), 3);
        assert_eq!(f.value(), Some(&b"abc"[..]));

        let mut out = Vec::new();
        f.emit(&mut out).unwrap();
        assert_eq!(out, b"abc");
    }

    #[test]
    fn test_bytes_field_short_input() {
        let mut f = BytesField::new(4);
        assert!(consume(&mut f, b"abc").unwrap_err().is_insufficient_data());
    }
}
