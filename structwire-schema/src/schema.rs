//! Composed record schemas.
//!
//! A [`Schema`] is the ordered mapping from field name to [`FieldDecl`]
//! for one record type. It is computed once per type and shared read-only.

use crate::declaration::FieldDecl;

/// Ordered, shadow-resolved mapping of field name to declaration.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    entries: Vec<(String, FieldDecl)>,
}

impl Schema {
    /// Inserts `decl` under `name`.
    ///
    /// An existing entry is replaced in place and keeps its position; a new
    /// entry is appended.
    pub(crate) fn upsert(&mut self, name: &str, decl: FieldDecl) {
        match self.position(name) {
            Some(index) => self.entries[index].1 = decl,
            None => self.entries.push((name.to_string(), decl)),
        }
    }

    /// Removes `name`, returning false if it was not present.
    pub(crate) fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the schema has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the field names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Returns `(name, declaration)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDecl)> {
        self.entries.iter().map(|(name, decl)| (name.as_str(), decl))
    }

    /// Looks up a declaration by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldDecl> {
        self.position(name).map(|index| &self.entries[index].1)
    }

    /// Returns the position of a field.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }

    /// Returns true if a field with the given name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns the total width if every field has a fixed width.
    #[must_use]
    pub fn fixed_size(&self) -> Option<usize> {
        self.entries
            .iter()
            .map(|(_, decl)| decl.fixed_size())
            .sum()
    }
}
