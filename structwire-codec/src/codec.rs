//! The consume/emit protocol shared by every field kind.
//!
//! This module provides the [`Codec`] trait and the [`Scope`] through which
//! a field reads the values of its already decoded siblings.

use structwire_core::{ByteCursor, Error, Result, Value, WriteBuffer};
use structwire_schema::Schema;

use crate::field::Field;

/// Trait implemented by every field kind.
///
/// For any field holding a value, emitting it and consuming the output into
/// a fresh field of the same declaration reproduces the value and the size.
pub trait Codec {
    /// Returns the encoded size in bytes.
    ///
    /// # Errors
    /// Returns a configuration error if the field holds no value.
    fn size(&self) -> Result<usize>;

    /// Decodes the field from the cursor, advancing it by exactly
    /// [`Self::size`] bytes of the decoded value.
    ///
    /// # Errors
    /// Returns `InsufficientData` if the input ends early, a value-range
    /// error for invalid bytes, or a configuration error if a sibling lookup
    /// fails.
    fn consume(&mut self, cursor: &mut ByteCursor<'_>, scope: &Scope<'_>) -> Result<()>;

    /// Encodes the field's value into the sink.
    ///
    /// # Errors
    /// Returns a configuration error if the field holds no value, or a sink
    /// error.
    fn emit<W: WriteBuffer + ?Sized>(&self, sink: &mut W) -> Result<()>;
}

/// Read-only view of the fields preceding the one being coded.
///
/// A scope borrows the owning record only for the duration of one consume
/// or assignment call.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    schema: Option<&'a Schema>,
    decoded: &'a [Field],
}

impl<'a> Scope<'a> {
    /// Creates a scope for the field at position `decoded.len()` of `schema`.
    pub(crate) fn new(schema: &'a Schema, decoded: &'a [Field]) -> Self {
        Self {
            schema: Some(schema),
            decoded,
        }
    }

    /// Creates a scope for a field coded outside any record.
    ///
    /// Every sibling lookup through it fails.
    #[must_use]
    pub const fn detached() -> Self {
        Self {
            schema: None,
            decoded: &[],
        }
    }

    /// Returns the value of the sibling field `name`.
    ///
    /// # Errors
    /// Returns a configuration error if the sibling does not exist, is
    /// declared at or after the current field, or holds no value.
    pub fn lookup(&self, name: &str) -> Result<Value> {
        let schema = self.schema.ok_or_else(|| {
            Error::configuration(format!(
                "field '{name}' cannot be looked up outside a record"
            ))
        })?;
        let index = schema
            .position(name)
            .ok_or_else(|| Error::unknown_field(name))?;
        let field = self.decoded.get(index).ok_or_else(|| {
            Error::configuration(format!("field '{name}' is not yet decoded"))
        })?;
        field
            .value()
            .ok_or_else(|| Error::configuration(format!("field '{name}' has no value")))
    }
}

impl Default for Scope<'_> {
    fn default() -> Self {
        Self::detached()
    }
}

/// Error for size or emit on a field without a value.
pub(crate) fn unset(kind: &str) -> Error {
    Error::configuration(format!("{kind} field has no value"))
}

/// Error for assigning a value of the wrong variant.
pub(crate) fn mismatch(kind: &str, value: &Value) -> Error {
    Error::value_range(format!(
        "{kind} field cannot hold a {} value",
        value.kind_name()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use structwire_schema::{FieldDecl, RecordType};

    #[test]
    fn test_detached_lookup_fails() {
        let err = Scope::detached().lookup("length").unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("'length'"));
    }

    #[test]
    fn test_lookup_rules() {
        let ty = RecordType::builder("Lookup")
            .field("a", FieldDecl::ubyte().with_default(7u8))
            .field("b", FieldDecl::ubyte())
            .field("c", FieldDecl::ubyte())
            .build()
            .unwrap();
        let schema = ty.schema();
        let a = Field::new(&FieldDecl::ubyte().with_default(7u8)).unwrap();
        let b = Field::new(&FieldDecl::ubyte()).unwrap();
        let decoded = [a, b];
        let scope = Scope::new(schema, &decoded);

        assert_eq!(scope.lookup("a").unwrap(), Value::UInt(7));
        assert!(
            scope
                .lookup("b")
                .unwrap_err()
                .to_string()
                .contains("has no value")
        );
        assert!(
            scope
                .lookup("c")
                .unwrap_err()
                .to_string()
                .contains("not yet decoded")
        );
        assert!(
            scope
                .lookup("zzz")
                .unwrap_err()
                .to_string()
                .contains("unknown field")
        );
    }
}
