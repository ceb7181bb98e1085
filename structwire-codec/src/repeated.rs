//! Repeated fields.

use structwire_core::{ByteCursor, Endianness, Error, Result, Value, WriteBuffer};
use structwire_schema::FieldDecl;

use crate::codec::{Codec, Scope, mismatch};
use crate::field::Field;

/// Sequence of fields built from one template declaration.
///
/// Without a count, consume decodes elements until the input is exhausted.
/// A new field starts as an empty sequence.
#[derive(Debug, Clone)]
pub struct RepeatedField {
    template: FieldDecl,
    count: Option<usize>,
    endian: Endianness,
    elements: Vec<Field>,
}

impl RepeatedField {
    /// Creates an empty sequence.
    #[must_use]
    pub const fn new(template: FieldDecl, count: Option<usize>, endian: Endianness) -> Self {
        Self {
            template,
            count,
            endian,
            elements: Vec::new(),
        }
    }

    /// Returns the element template.
    #[must_use]
    pub const fn template(&self) -> &FieldDecl {
        &self.template
    }

    /// Returns the fixed element count, if any.
    #[must_use]
    pub const fn count(&self) -> Option<usize> {
        self.count
    }

    /// Returns the elements in order.
    #[must_use]
    pub fn elements(&self) -> &[Field] {
        &self.elements
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the element values, or `None` if any element has no value.
    #[must_use]
    pub fn value(&self) -> Option<Value> {
        self.elements
            .iter()
            .map(Field::value)
            .collect::<Option<Vec<_>>>()
            .map(Value::List)
    }

    /// Replaces the elements with one per item of a [`Value::List`].
    ///
    /// # Errors
    /// Returns a value-range error if the value is not a list, if its length
    /// differs from a fixed count, or if an item does not fit the template.
    /// The previous elements are kept on failure.
    pub fn set(&mut self, value: &Value, scope: &Scope<'_>) -> Result<()> {
        let items = value.as_list().ok_or_else(|| mismatch("repeated", value))?;
        if let Some(count) = self.count.filter(|&count| count != items.len()) {
            return Err(Error::value_range(format!(
                "expected {count} elements, got {}",
                items.len()
            )));
        }
        self.elements = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let mut element = self.element()?;
                element
                    .set(item, scope)
                    .map_err(|err| err.in_field(&index.to_string()))?;
                Ok(element)
            })
            .collect::<Result<_>>()?;
        Ok(())
    }

    /// Appends one element.
    ///
    /// # Errors
    /// Returns a value-range error if the item does not fit the template or
    /// the sequence already holds its fixed count.
    pub fn push(&mut self, item: &Value, scope: &Scope<'_>) -> Result<()> {
        if self.count.is_some_and(|count| self.elements.len() >= count) {
            return Err(Error::value_range(format!(
                "sequence already holds {} elements",
                self.elements.len()
            )));
        }
        let mut element = self.element()?;
        element.set(item, scope)?;
        self.elements.push(element);
        Ok(())
    }

    fn element(&self) -> Result<Field> {
        Field::from_kind(self.template.kind(), self.endian)
    }
}

impl Codec for RepeatedField {
    fn size(&self) -> Result<usize> {
        self.elements.iter().map(Codec::size).sum()
    }

    fn consume(&mut self, cursor: &mut ByteCursor<'_>, scope: &Scope<'_>) -> Result<()> {
        self.elements.clear();
        loop {
            let done = match self.count {
                Some(count) => self.elements.len() >= count,
                None => cursor.is_exhausted(),
            };
            if done {
                return Ok(());
            }

            let start = cursor.position();
            let mut element = self.element()?;
            element
                .consume(cursor, scope)
                .map_err(|err| err.in_field(&self.elements.len().to_string()))?;
            if self.count.is_none() && cursor.position() == start {
                return Err(Error::configuration(format!(
                    "repeated {} element consumed no bytes",
                    self.template.kind().name()
                )));
            }
            self.elements.push(element);
        }
    }

    fn emit<W: WriteBuffer + ?Sized>(&self, sink: &mut W) -> Result<()> {
        self.elements.iter().try_for_each(|element| element.emit(sink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consume(field: &mut RepeatedField, data: &[u8]) -> Result<usize> {
        let mut cursor = ByteCursor::new(data);
        field.consume(&mut cursor, &Scope::detached())?;
        Ok(cursor.position())
    }

    #[test]
    fn test_starts_empty() {
        let f = RepeatedField::new(FieldDecl::ushort(), None, Endianness::Network);
        assert!(f.is_empty());
        assert_eq!(f.size().unwrap(), 0);
        assert_eq!(f.value(), Some(Value::List(vec![])));
    }

    #[test]
    fn test_consume_until_exhausted() {
        let mut f = RepeatedField::new(FieldDecl::ushort(), None, Endianness::Network);
        assert_eq!(consume(&mut f, &[0, 1, 0, 2, 0, 3]).unwrap(), 6);
        assert_eq!(
            f.value().unwrap(),
            Value::List(vec![Value::UInt(1), Value::UInt(2), Value::UInt(3)])
        );
        assert_eq!(f.size().unwrap(), 6);

        let mut out = Vec::new();
        f.emit(&mut out).unwrap();
        assert_eq!(out, [0, 1, 0, 2, 0, 3]);
    }

    #[test]
    fn test_consume_partial_element_fails() {
        let mut f = RepeatedField::new(FieldDecl::ushort(), None, Endianness::Network);
        let err = consume(&mut f, &[0, 1, 0]).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_consume_fixed_count_leaves_rest() {
        let mut f = RepeatedField::new(FieldDecl::ubyte(), Some(2), Endianness::Network);
        assert_eq!(consume(&mut f, &[7, 8, 9]).unwrap(), 2);
        assert_eq!(f.len(), 2);
    }

    #[test]
    fn test_cstring_elements() {
        let mut f = RepeatedField::new(FieldDecl::cstring(), None, Endianness::Network);
        consume(&mut f, b"ab\x00\x00cd\x00").unwrap();
        assert_eq!(
            f.value().unwrap(),
            Value::List(vec![Value::from(b"ab"), Value::from(b""), Value::from(b"cd")])
        );
    }

    #[test]
    fn test_zero_width_elements_are_rejected() {
        let mut f = RepeatedField::new(FieldDecl::padding(0), None, Endianness::Network);
        assert!(consume(&mut f, &[1]).unwrap_err().is_configuration());
    }

    #[test]
    fn test_set_validates_items() {
        let mut f = RepeatedField::new(FieldDecl::byte(), None, Endianness::Network);
        f.set(&Value::List(vec![Value::Int(1), Value::Int(-1)]), &Scope::detached())
            .unwrap();
        let err = f
            .set(&Value::List(vec![Value::Int(1), Value::Int(200)]), &Scope::detached())
            .unwrap_err();
        assert!(err.is_value_range());
        assert!(err.to_string().contains("field '1'"));
        assert_eq!(f.len(), 2);
        assert!(f.set(&Value::UInt(1), &Scope::detached()).is_err());
    }

    #[test]
    fn test_fixed_count_set_and_push() {
        let mut f = RepeatedField::new(FieldDecl::ubyte(), Some(2), Endianness::Network);
        assert!(
            f.set(&Value::List(vec![Value::UInt(1)]), &Scope::detached())
                .unwrap_err()
                .is_value_range()
        );
        f.push(&Value::UInt(1), &Scope::detached()).unwrap();
        f.push(&Value::UInt(2), &Scope::detached()).unwrap();
        assert!(f.push(&Value::UInt(3), &Scope::detached()).is_err());
    }

    #[test]
    fn test_little_endian_elements() {
        let mut f = RepeatedField::new(FieldDecl::ushort(), None, Endianness::Little);
        f.set(&Value::List(vec![Value::UInt(1)]), &Scope::detached())
            .unwrap();
        let mut out = Vec::new();
        f.emit(&mut out).unwrap();
        assert_eq!(out, [1, 0]);
    }
}
