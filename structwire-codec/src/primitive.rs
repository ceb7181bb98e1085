//! Fixed-width primitive fields and padding.

use structwire_core::{ByteCursor, Endianness, Error, Result, Value, WriteBuffer};
use structwire_schema::PrimitiveDef;

use crate::codec::{Codec, Scope, unset};

/// A fixed-width numeric, boolean or character field.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveField {
    def: PrimitiveDef,
    endian: Endianness,
    value: Option<Value>,
}

impl PrimitiveField {
    /// Creates a field without a value.
    #[must_use]
    pub const fn new(def: PrimitiveDef, endian: Endianness) -> Self {
        Self {
            def,
            endian,
            value: None,
        }
    }

    /// Returns the definition.
    #[must_use]
    pub const fn def(&self) -> &PrimitiveDef {
        &self.def
    }

    /// Returns the byte order.
    #[must_use]
    pub const fn endianness(&self) -> Endianness {
        self.endian
    }

    /// Returns the current value.
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Validates and stores `value`.
    ///
    /// # Errors
    /// Returns a value-range error if the value does not fit; the previous
    /// value is kept.
    pub fn set(&mut self, value: &Value) -> Result<()> {
        self.value = Some(self.def.check(value)?);
        Ok(())
    }
}

impl Codec for PrimitiveField {
    fn size(&self) -> Result<usize> {
        match self.value {
            Some(_) => Ok(self.def.primitive_type.size()),
            None => Err(unset(self.def.primitive_type.name())),
        }
    }

    fn consume(&mut self, cursor: &mut ByteCursor<'_>, _scope: &Scope<'_>) -> Result<()> {
        let value = self.def.primitive_type.read(cursor, self.endian)?;
        self.set(&value)
    }

    fn emit<W: WriteBuffer + ?Sized>(&self, sink: &mut W) -> Result<()> {
        let value = self
            .value
            .as_ref()
            .ok_or_else(|| unset(self.def.primitive_type.name()))?;
        self.def.primitive_type.write(value, self.endian, sink)
    }
}

/// Zero bytes without a value.
///
/// Padding is always sized; consume skips `length` bytes whatever they hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddingField {
    length: usize,
}

impl PaddingField {
    /// Creates padding of `length` bytes.
    #[must_use]
    pub const fn new(length: usize) -> Self {
        Self { length }
    }

    /// Returns the width in bytes.
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    /// Accepts only [`Value::Unit`].
    ///
    /// # Errors
    /// Returns a value-range error for any other value.
    pub fn set(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Unit => Ok(()),
            other => Err(Error::value_range(format!(
                "padding holds no value, got {}",
                other.kind_name()
            ))),
        }
    }
}

impl Codec for PaddingField {
    fn size(&self) -> Result<usize> {
        Ok(self.length)
    }

    fn consume(&mut self, cursor: &mut ByteCursor<'_>, _scope: &Scope<'_>) -> Result<()> {
        cursor.read_bytes(self.length)?;
        Ok(())
    }

    fn emit<W: WriteBuffer + ?Sized>(&self, sink: &mut W) -> Result<()> {
        sink.put_zeros(self.length)
    }
}
