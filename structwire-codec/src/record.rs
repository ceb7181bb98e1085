//! Record instances.
//!
//! A [`Record`] holds one private [`Field`] cell per entry of its type's
//! schema, in schema order. Cells are created from the shared declarations
//! when the record is constructed, so records never share mutable state
//! with each other or with their type.

use std::fmt;
use std::io;
use std::sync::Arc;

use structwire_core::{ByteCursor, EncoderBuffer, Endianness, Error, Result, Value, WriteBuffer};
use structwire_schema::RecordType;
use tracing::trace;

use crate::codec::{Codec, Scope, mismatch};
use crate::field::Field;

/// One concrete record of a [`RecordType`].
#[derive(Debug, Clone)]
pub struct Record {
    record_type: Arc<RecordType>,
    endian: Endianness,
    cells: Vec<Field>,
}

impl Record {
    /// Creates a record whose fields hold their declared default values.
    ///
    /// # Errors
    /// Returns an error if a default value is invalid for its field.
    pub fn new(record_type: &Arc<RecordType>, endian: Endianness) -> Result<Self> {
        Self::build(record_type, endian, &[])
    }

    /// Creates a record and assigns the given named values.
    ///
    /// Values are applied in schema order, so a dependent field sees the
    /// values given for the fields before it. Fields without a given value
    /// take their declared default.
    ///
    /// # Errors
    /// Returns a configuration error naming the first unknown field, or the
    /// assignment error of the first invalid value.
    pub fn with_values<I, K, V>(
        record_type: &Arc<RecordType>,
        endian: Endianness,
        values: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let values: Vec<(String, Value)> = values
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        let schema = record_type.schema();
        if let Some((name, _)) = values.iter().find(|(name, _)| !schema.contains(name)) {
            return Err(Error::unknown_field(name));
        }
        Self::build(record_type, endian, &values)
    }

    fn build(
        record_type: &Arc<RecordType>,
        endian: Endianness,
        values: &[(String, Value)],
    ) -> Result<Self> {
        let schema = record_type.schema();
        let mut cells = Vec::with_capacity(schema.len());
        for (name, decl) in schema.iter() {
            let scope = Scope::new(schema, &cells);
            let given = values.iter().rev().find(|(n, _)| n == name);
            let cell = match given {
                Some((_, value)) => {
                    let mut cell = Field::from_kind(decl.kind(), endian)?;
                    cell.set(value, &scope).map(|()| cell)
                }
                None => Field::instantiate(decl, endian, &scope),
            }
            .map_err(|err| err.in_field(name))?;
            cells.push(cell);
        }

        Ok(Self {
            record_type: Arc::clone(record_type),
            endian,
            cells,
        })
    }

    /// Decodes a new record from `bytes`.
    ///
    /// Bytes after the record's encoding are ignored.
    ///
    /// # Errors
    /// Returns the first field's consume error.
    pub fn decode(record_type: &Arc<RecordType>, bytes: &[u8], endian: Endianness) -> Result<Self> {
        let mut record = Self::new(record_type, endian)?;
        record.consume(&mut ByteCursor::new(bytes))?;
        Ok(record)
    }

    /// Returns the record type.
    #[must_use]
    pub const fn record_type(&self) -> &Arc<RecordType> {
        &self.record_type
    }

    /// Returns the byte order applied to every field.
    #[must_use]
    pub const fn endianness(&self) -> Endianness {
        self.endian
    }

    /// Returns the field names in schema order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.record_type.schema().names()
    }

    /// Returns `(name, field)` pairs in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.names().zip(&self.cells)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.record_type
            .schema()
            .position(name)
            .ok_or_else(|| Error::unknown_field(name))
    }

    /// Returns a field by name.
    ///
    /// # Errors
    /// Returns a configuration error if the name is unknown.
    pub fn field(&self, name: &str) -> Result<&Field> {
        let index = self.position(name)?;
        self.cells.get(index).ok_or_else(|| Error::unknown_field(name))
    }

    /// Returns a field by name for direct modification.
    ///
    /// # Errors
    /// Returns a configuration error if the name is unknown.
    pub fn field_mut(&mut self, name: &str) -> Result<&mut Field> {
        let index = self.position(name)?;
        self.cells
            .get_mut(index)
            .ok_or_else(|| Error::unknown_field(name))
    }

    /// Returns the value of a field.
    ///
    /// # Errors
    /// Returns a configuration error if the name is unknown or the field
    /// holds no value.
    pub fn value(&self, name: &str) -> Result<Value> {
        self.field(name)?
            .value()
            .ok_or_else(|| Error::configuration(format!("field '{name}' has no value")))
    }

    /// Validates and assigns a field's value.
    ///
    /// Dependent fields resolve their target from the fields before them.
    /// Later dependent fields that hold a value are re-resolved against the
    /// new value and must still accept it.
    ///
    /// # Errors
    /// Returns a configuration error if the name is unknown, the field's
    /// assignment error, or the error of a later dependent field that no
    /// longer accepts its value. The record is unchanged on failure.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let index = self.position(name)?;
        let snapshot = self
            .cells
            .get(index + 1..)
            .is_some_and(|later| later.iter().any(|cell| matches!(cell, Field::Dependent(_))))
            .then(|| self.cells.clone());

        self.set_cell(index, name, &value)?;

        if let Some(snapshot) = snapshot {
            if let Err(err) = self.refresh_dependents(index + 1) {
                self.cells = snapshot;
                return Err(err);
            }
        }
        Ok(())
    }

    /// Assigns the cell at `index` with the cells before it in scope.
    fn set_cell(&mut self, index: usize, name: &str, value: &Value) -> Result<()> {
        let schema = self.record_type.schema();
        let (earlier, rest) = self.cells.split_at_mut(index);
        let scope = Scope::new(schema, earlier);
        let cell = rest
            .first_mut()
            .ok_or_else(|| Error::unknown_field(name))?;
        cell.set(value, &scope).map_err(|err| err.in_field(name))
    }

    /// Re-resolves every dependent field from `start` on that holds a value.
    fn refresh_dependents(&mut self, start: usize) -> Result<()> {
        let schema = self.record_type.schema();
        for (index, name) in schema.names().enumerate().skip(start) {
            let (earlier, rest) = self.cells.split_at_mut(index);
            let Some(Field::Dependent(dependent)) = rest.first_mut() else {
                continue;
            };
            let Some(current) = dependent.value() else {
                continue;
            };
            dependent
                .set(&current, &Scope::new(schema, earlier))
                .map_err(|err| err.in_field(name))?;
            trace!(field = name, "re-resolved dependent field");
        }
        Ok(())
    }

    /// Returns a nested record.
    ///
    /// # Errors
    /// Returns a configuration error if the name is unknown or the field is
    /// not a compound field.
    pub fn nested(&self, name: &str) -> Result<&Record> {
        match self.field(name)? {
            Field::Compound(record) => Ok(record),
            other => Err(not_compound(name, other)),
        }
    }

    /// Returns a nested record for modification.
    ///
    /// # Errors
    /// Returns a configuration error if the name is unknown or the field is
    /// not a compound field.
    pub fn nested_mut(&mut self, name: &str) -> Result<&mut Record> {
        match self.field_mut(name)? {
            Field::Compound(record) => Ok(record),
            other => Err(not_compound(name, other)),
        }
    }

    /// Assigns every field named in a [`Value::Record`], in schema order.
    ///
    /// # Errors
    /// Returns a value-range error if the value is not a record, a
    /// configuration error for unknown names, the first assignment error, or
    /// the error of a dependent field that no longer accepts its value. The
    /// record is unchanged on failure.
    pub fn assign(&mut self, value: &Value) -> Result<()> {
        let pairs = value
            .as_record()
            .ok_or_else(|| mismatch("compound", value))?;
        let schema = Arc::clone(&self.record_type);
        let schema = schema.schema();
        if let Some((name, _)) = pairs.iter().find(|(name, _)| !schema.contains(name)) {
            return Err(Error::unknown_field(name));
        }
        let snapshot = self.cells.clone();
        let assigned = schema.names().enumerate().try_for_each(|(index, name)| {
            match pairs.iter().rev().find(|(n, _)| n == name) {
                Some((_, value)) => self.set_cell(index, name, value),
                None => Ok(()),
            }
        });
        if let Err(err) = assigned.and_then(|()| self.refresh_dependents(0)) {
            self.cells = snapshot;
            return Err(err);
        }
        Ok(())
    }

    /// Returns a snapshot of every field value as a [`Value::Record`].
    ///
    /// # Errors
    /// Returns a configuration error naming the first field without a value.
    pub fn to_value(&self) -> Result<Value> {
        self.fields()
            .map(|(name, cell)| {
                cell.value()
                    .map(|value| (name.to_string(), value))
                    .ok_or_else(|| Error::configuration(format!("field '{name}' has no value")))
            })
            .collect::<Result<_>>()
            .map(Value::Record)
    }

    /// Returns the encoded size in bytes.
    ///
    /// # Errors
    /// Returns a configuration error naming the first field without a value.
    pub fn size(&self) -> Result<usize> {
        self.fields()
            .map(|(name, cell)| cell.size().map_err(|err| err.in_field(name)))
            .sum()
    }

    /// Decodes every field in schema order, advancing the cursor.
    ///
    /// Decoding is not transactional: fields decoded before a failure keep
    /// their new values.
    ///
    /// # Errors
    /// Returns the first field's consume error.
    pub fn consume(&mut self, cursor: &mut ByteCursor<'_>) -> Result<()> {
        let schema = self.record_type.schema();
        trace!(
            record = self.record_type.name(),
            position = cursor.position(),
            "consume record"
        );
        for (index, name) in schema.names().enumerate() {
            let (decoded, pending) = self.cells.split_at_mut(index);
            let scope = Scope::new(schema, decoded);
            let Some(cell) = pending.first_mut() else {
                break;
            };
            trace!(
                field = name,
                kind = cell.kind_name(),
                position = cursor.position(),
                "consume field"
            );
            cell.consume(cursor, &scope)
                .map_err(|err| err.in_field(name))?;
        }
        Ok(())
    }

    /// Encodes every field in schema order into the sink.
    ///
    /// # Errors
    /// Returns a configuration error naming the first field without a value,
    /// or a sink error.
    pub fn emit_to<W: WriteBuffer + ?Sized>(&self, sink: &mut W) -> Result<()> {
        trace!(record = self.record_type.name(), "emit record");
        for (name, cell) in self.fields() {
            trace!(
                field = name,
                kind = cell.kind_name(),
                offset = sink.bytes_written(),
                "emit field"
            );
            cell.emit(sink).map_err(|err| err.in_field(name))?;
        }
        Ok(())
    }

    /// Encodes the record into a new vector.
    ///
    /// # Errors
    /// Returns a configuration error naming the first field without a value.
    pub fn emit(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.emit_to(&mut out)?;
        Ok(out)
    }

    /// Encodes the record into a fixed buffer, returning the bytes written.
    ///
    /// # Errors
    /// Returns `InsufficientData` if the buffer is too small.
    pub fn emit_into(&self, buffer: &mut [u8]) -> Result<usize> {
        let mut encoder = EncoderBuffer::new(buffer, 0);
        self.emit_to(&mut encoder)?;
        Ok(encoder.bytes_written())
    }

    /// Encodes the record into an IO writer.
    ///
    /// # Errors
    /// Returns an encoding error or the writer's IO error.
    pub fn write_to<W: io::Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.emit()?)?;
        Ok(())
    }
}

fn not_compound(name: &str, field: &Field) -> Error {
    Error::configuration(format!(
        "field '{name}' is a {} field, not a compound field",
        field.kind_name()
    ))
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.record_type.name())?;
        for (i, (name, cell)) in self.fields().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            match cell {
                Field::Compound(record) => write!(f, " {name}: {record}")?,
                _ => match cell.value() {
                    Some(value) => write!(f, " {name}: {value}")?,
                    None => write!(f, " {name}: <unset>")?,
                },
            }
        }
        write!(f, " }}")
    }
}
