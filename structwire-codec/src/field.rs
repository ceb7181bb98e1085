//! Field instances.
//!
//! A [`Field`] is the per-record cell created from a [`FieldDecl`]. It owns
//! its value and dispatches the [`Codec`] protocol to its kind.

use structwire_core::{ByteCursor, Endianness, Result, Value, WriteBuffer};
use structwire_schema::{FieldDecl, FieldKind};

use crate::codec::{Codec, Scope};
use crate::dependent::DependentField;
use crate::primitive::{PaddingField, PrimitiveField};
use crate::record::Record;
use crate::repeated::RepeatedField;
use crate::strings::{BytesField, CStringField, PStringField};

/// A field instance of any kind.
#[derive(Debug, Clone)]
pub enum Field {
    /// Fixed-width primitive.
    Primitive(PrimitiveField),
    /// Zero bytes without a value.
    Padding(PaddingField),
    /// Null-terminated byte string.
    NullTerminated(CStringField),
    /// Length-prefixed byte string.
    LengthPrefixed(PStringField),
    /// Fixed-length bytes.
    FixedBytes(BytesField),
    /// Nested record.
    Compound(Record),
    /// Repetition of a template.
    Repeated(RepeatedField),
    /// Kind resolved from sibling values.
    Dependent(DependentField),
}

impl Field {
    /// Creates a standalone field from a declaration.
    ///
    /// The field uses the declaration's endianness and starts with its
    /// default value, if any.
    ///
    /// # Errors
    /// Returns an error if the default value is invalid for the field.
    pub fn new(decl: &FieldDecl) -> Result<Self> {
        Self::instantiate(decl, decl.endianness(), &Scope::detached())
    }

    /// Creates a field for a record with the given endianness, seeded with
    /// the declaration's default value.
    pub(crate) fn instantiate(
        decl: &FieldDecl,
        endian: Endianness,
        scope: &Scope<'_>,
    ) -> Result<Self> {
        let mut field = Self::from_kind(decl.kind(), endian)?;
        if let Some(default) = decl.default_value() {
            field.set(default, scope)?;
        }
        Ok(field)
    }

    /// Creates a field of the given kind without a value.
    ///
    /// Compound fields get a fresh nested record seeded with its own
    /// defaults.
    pub(crate) fn from_kind(kind: &FieldKind, endian: Endianness) -> Result<Self> {
        Ok(match kind {
            FieldKind::Primitive(def) => Self::Primitive(PrimitiveField::new(*def, endian)),
            FieldKind::Padding { length } => Self::Padding(PaddingField::new(*length)),
            FieldKind::NullTerminated => Self::NullTerminated(CStringField::new()),
            FieldKind::LengthPrefixed => Self::LengthPrefixed(PStringField::new()),
            FieldKind::FixedBytes { length } => Self::FixedBytes(BytesField::new(*length)),
            FieldKind::Compound(record_type) => Self::Compound(Record::new(record_type, endian)?),
            FieldKind::Repeated(def) => Self::Repeated(RepeatedField::new(
                (*def.template).clone(),
                def.count,
                endian,
            )),
            FieldKind::Dependent(def) => Self::Dependent(DependentField::new(def.clone(), endian)),
        })
    }

    /// Returns the kind name.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Primitive(f) => f.def().primitive_type.name(),
            Self::Padding(_) => "padding",
            Self::NullTerminated(_) => "cstring",
            Self::LengthPrefixed(_) => "pstring",
            Self::FixedBytes(_) => "bytes",
            Self::Compound(_) => "compound",
            Self::Repeated(_) => "repeated",
            Self::Dependent(_) => "dependent",
        }
    }

    /// Returns the current value.
    ///
    /// Padding always yields [`Value::Unit`]; compound fields yield a
    /// [`Value::Record`] snapshot once every sub-field holds a value.
    #[must_use]
    pub fn value(&self) -> Option<Value> {
        match self {
            Self::Primitive(f) => f.value().cloned(),
            Self::Padding(_) => Some(Value::Unit),
            Self::NullTerminated(f) => f.value().map(Value::from),
            Self::LengthPrefixed(f) => f.value().map(Value::from),
            Self::FixedBytes(f) => f.value().map(Value::from),
            Self::Compound(record) => record.to_value().ok(),
            Self::Repeated(f) => f.value(),
            Self::Dependent(f) => f.value(),
        }
    }

    /// Returns true if the field holds a value.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.value().is_some()
    }

    /// Validates and assigns a value.
    ///
    /// Compound fields take a [`Value::Record`] and assign each named
    /// sub-field; repeated fields take a [`Value::List`].
    ///
    /// # Errors
    /// Returns a value-range error for values the field cannot hold, or a
    /// configuration error for unknown sub-fields and unresolvable dependent
    /// fields.
    pub fn set(&mut self, value: &Value, scope: &Scope<'_>) -> Result<()> {
        match self {
            Self::Primitive(f) => f.set(value),
            Self::Padding(f) => f.set(value),
            Self::NullTerminated(f) => f.set(value),
            Self::LengthPrefixed(f) => f.set(value),
            Self::FixedBytes(f) => f.set(value),
            Self::Compound(record) => record.assign(value),
            Self::Repeated(f) => f.set(value, scope),
            Self::Dependent(f) => f.set(value, scope),
        }
    }

    /// Decodes the field from a byte slice outside any record.
    ///
    /// Returns the number of bytes consumed.
    ///
    /// # Errors
    /// Returns the consume error; dependent fields always fail here.
    pub fn consume_bytes(&mut self, bytes: &[u8]) -> Result<usize> {
        let mut cursor = ByteCursor::new(bytes);
        self.consume(&mut cursor, &Scope::detached())?;
        Ok(cursor.position())
    }

    /// Encodes the field into a new vector.
    ///
    /// # Errors
    /// Returns a configuration error if the field holds no value.
    pub fn emit_to_vec(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.size()?);
        self.emit(&mut out)?;
        Ok(out)
    }
}

impl Codec for Field {
    fn size(&self) -> Result<usize> {
        match self {
            Self::Primitive(f) => f.size(),
            Self::Padding(f) => f.size(),
            Self::NullTerminated(f) => f.size(),
            Self::LengthPrefixed(f) => f.size(),
            Self::FixedBytes(f) => f.size(),
            Self::Compound(record) => record.size(),
            Self::Repeated(f) => f.size(),
            Self::Dependent(f) => f.size(),
        }
    }

    fn consume(&mut self, cursor: &mut ByteCursor<'_>, scope: &Scope<'_>) -> Result<()> {
        match self {
            Self::Primitive(f) => f.consume(cursor, scope),
            Self::Padding(f) => f.consume(cursor, scope),
            Self::NullTerminated(f) => f.consume(cursor, scope),
            Self::LengthPrefixed(f) => f.consume(cursor, scope),
            Self::FixedBytes(f) => f.consume(cursor, scope),
            Self::Compound(record) => record.consume(cursor),
            Self::Repeated(f) => f.consume(cursor, scope),
            Self::Dependent(f) => f.consume(cursor, scope),
        }
    }

    fn emit<W: WriteBuffer + ?Sized>(&self, sink: &mut W) -> Result<()> {
        match self {
            Self::Primitive(f) => f.emit(sink),
            Self::Padding(f) => f.emit(sink),
            Self::NullTerminated(f) => f.emit(sink),
            Self::LengthPrefixed(f) => f.emit(sink),
            Self::FixedBytes(f) => f.emit(sink),
            Self::Compound(record) => record.emit_to(sink),
            Self::Repeated(f) => f.emit(sink),
            Self::Dependent(f) => f.emit(sink),
        }
    }
}
