//! Record types and schema composition.
//!
//! A [`RecordType`] is defined once through [`RecordTypeBuilder`]: its
//! parents, the fields it declares and the inherited names it removes. The
//! composed [`Schema`] is built lazily on first use and cached for the
//! lifetime of the type.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use structwire_core::{Error, Result};
use tracing::debug;

use crate::declaration::FieldDecl;
use crate::lineage::linearize;
use crate::schema::Schema;

/// A named record layout.
pub struct RecordType {
    name: String,
    parents: Vec<Arc<RecordType>>,
    declared: Vec<(String, FieldDecl)>,
    removed: Vec<String>,
    resolution_order: Vec<Arc<RecordType>>,
    schema: OnceLock<Schema>,
}

impl RecordType {
    /// Starts defining a record type.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> RecordTypeBuilder {
        RecordTypeBuilder::new(name)
    }

    /// Returns the type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the direct parents in declaration order.
    #[must_use]
    pub fn parents(&self) -> &[Arc<RecordType>] {
        &self.parents
    }

    /// Returns every ancestor, most specific first.
    #[must_use]
    pub fn resolution_order(&self) -> &[Arc<RecordType>] {
        &self.resolution_order
    }

    /// Returns the fields this type declares itself, in sequence order.
    #[must_use]
    pub fn declared_fields(&self) -> &[(String, FieldDecl)] {
        &self.declared
    }

    /// Returns the inherited names this type removes.
    #[must_use]
    pub fn removed_fields(&self) -> &[String] {
        &self.removed
    }

    /// Returns true if `other` is this type or one of its ancestors.
    #[must_use]
    pub fn is_subtype_of(&self, other: &RecordType) -> bool {
        std::ptr::eq(self, other)
            || self
                .resolution_order
                .iter()
                .any(|ancestor| std::ptr::eq(ancestor.as_ref(), other))
    }

    /// Returns the composed schema, building it on first use.
    pub fn schema(&self) -> &Schema {
        self.schema.get_or_init(|| self.compose())
    }

    /// Composes the schema from the least specific ancestor to this type.
    fn compose(&self) -> Schema {
        let mut schema = Schema::default();
        let lineage = self
            .resolution_order
            .iter()
            .rev()
            .map(Arc::as_ref)
            .chain(std::iter::once(self));

        for ty in lineage {
            for (name, decl) in &ty.declared {
                schema.upsert(name, decl.clone());
            }
            for name in &ty.removed {
                if !schema.remove(name) {
                    debug!(
                        record = %self.name,
                        declared_by = %ty.name,
                        field = %name,
                        "removal of absent field ignored"
                    );
                }
            }
        }

        debug!(record = %self.name, fields = schema.len(), "composed schema");
        schema
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("name", &self.name)
            .field(
                "parents",
                &self.parents.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field(
                "declared",
                &self.declared.iter().map(|(n, _)| n).collect::<Vec<_>>(),
            )
            .field("removed", &self.removed)
            .finish()
    }
}

/// Builder for [`RecordType`].
///
/// Parents are listed most important first, like the bases of a class.
#[derive(Debug)]
pub struct RecordTypeBuilder {
    name: String,
    parents: Vec<Arc<RecordType>>,
    declared: Vec<(String, FieldDecl)>,
    removed: Vec<String>,
}

impl RecordTypeBuilder {
    /// Creates a builder for a type named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parents: Vec::new(),
            declared: Vec::new(),
            removed: Vec::new(),
        }
    }

    /// Adds a parent type.
    #[must_use]
    pub fn extends(mut self, parent: &Arc<RecordType>) -> Self {
        self.parents.push(Arc::clone(parent));
        self
    }

    /// Declares a field, or re-declares an inherited one.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, decl: FieldDecl) -> Self {
        self.declared.push((name.into(), decl));
        self
    }

    /// Removes an inherited field. Removing an absent name has no effect.
    #[must_use]
    pub fn remove(mut self, name: impl Into<String>) -> Self {
        self.removed.push(name.into());
        self
    }

    /// Builds the record type.
    ///
    /// # Errors
    /// Returns a configuration error if a name is registered twice on this
    /// builder or if the parents admit no consistent resolution order.
    pub fn build(self) -> Result<Arc<RecordType>> {
        let mut seen = HashSet::new();
        for name in self
            .declared
            .iter()
            .map(|(name, _)| name)
            .chain(self.removed.iter())
        {
            if !seen.insert(name.as_str()) {
                return Err(Error::configuration(format!(
                    "field '{name}' registered twice on record '{}'",
                    self.name
                )));
            }
        }

        let resolution_order = linearize(&self.name, &self.parents)?;

        let mut declared = self.declared;
        declared.sort_by_key(|(_, decl)| decl.sequence());

        Ok(Arc::new(RecordType {
            name: self.name,
            parents: self.parents,
            declared,
            removed: self.removed,
            resolution_order,
            schema: OnceLock::new(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(ty: &RecordType) -> Vec<&str> {
        ty.schema().names().collect()
    }

    fn ordered() -> Arc<RecordType> {
        let a = FieldDecl::ubyte();
        let b = FieldDecl::ubyte();
        let c = FieldDecl::ubyte();
        let d = FieldDecl::ubyte();
        RecordType::builder("Ordered")
            .field("a", a)
            .field("b", b)
            .field("c", c)
            .field("d", d)
            .build()
            .unwrap()
    }

    #[test]
    fn test_ordered_fields() {
        assert_eq!(names(&ordered()), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_reversed_fields() {
        let d = FieldDecl::ubyte();
        let c = FieldDecl::ubyte();
        let b = FieldDecl::ubyte();
        let a = FieldDecl::ubyte();
        let ty = RecordType::builder("Reversed")
            .field("a", a)
            .field("b", b)
            .field("c", c)
            .field("d", d)
            .build()
            .unwrap();
        assert_eq!(names(&ty), ["d", "c", "b", "a"]);
    }

    #[test]
    fn test_random_fields() {
        let ty = RecordType::builder("Random")
            .field("c", FieldDecl::ubyte())
            .field("a", FieldDecl::ubyte())
            .field("b", FieldDecl::ubyte())
            .field("d", FieldDecl::ubyte())
            .build()
            .unwrap();
        assert_eq!(names(&ty), ["c", "a", "b", "d"]);
    }

    #[test]
    fn test_subclass_fields() {
        let base = ordered();
        let ty = RecordType::builder("SubClass")
            .extends(&base)
            .field("x", FieldDecl::ubyte())
            .field("y", FieldDecl::ubyte())
            .build()
            .unwrap();
        assert_eq!(names(&ty), ["a", "b", "c", "d", "x", "y"]);
        assert_eq!(names(&base), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_subfield_fields() {
        let nested = ordered();
        let ty = RecordType::builder("SubField")
            .field("q", FieldDecl::ubyte())
            .field("r", FieldDecl::compound(&nested))
            .build()
            .unwrap();
        assert_eq!(names(&ty), ["q", "r"]);
    }

    #[test]
    fn test_empty_record() {
        let ty = RecordType::builder("Empty").build().unwrap();
        assert!(ty.schema().is_empty());
    }

    #[test]
    fn test_remove_inherited_field() {
        let base = ordered();
        let ty = RecordType::builder("WithoutC")
            .extends(&base)
            .remove("c")
            .build()
            .unwrap();
        assert_eq!(names(&ty), ["a", "b", "d"]);
    }

    #[test]
    fn test_remove_absent_field_is_noop() {
        let base = ordered();
        let ty = RecordType::builder("Tolerant")
            .extends(&base)
            .remove("zzz")
            .build()
            .unwrap();
        assert_eq!(names(&ty), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_redeclare_keeps_position() {
        let base = ordered();
        let ty = RecordType::builder("Override")
            .extends(&base)
            .field("e", FieldDecl::ubyte())
            .field("b", FieldDecl::cstring())
            .build()
            .unwrap();
        assert_eq!(names(&ty), ["a", "b", "c", "d", "e"]);
        assert_eq!(ty.schema().get("b").unwrap().kind().name(), "cstring");
        assert_eq!(base.schema().get("b").unwrap().kind().name(), "ubyte");
    }

    #[test]
    fn test_removal_survives_into_grandchild() {
        let base = ordered();
        let child = RecordType::builder("Child")
            .extends(&base)
            .remove("a")
            .build()
            .unwrap();
        let grandchild = RecordType::builder("Grandchild")
            .extends(&child)
            .field("z", FieldDecl::ubyte())
            .build()
            .unwrap();
        assert_eq!(names(&grandchild), ["b", "c", "d", "z"]);
    }

    #[test]
    fn test_multiple_parents_later_step_wins() {
        let left = RecordType::builder("Left")
            .field("shared", FieldDecl::ubyte())
            .field("l", FieldDecl::ubyte())
            .build()
            .unwrap();
        let right = RecordType::builder("Right")
            .field("r", FieldDecl::ubyte())
            .field("shared", FieldDecl::cstring())
            .build()
            .unwrap();
        let ty = RecordType::builder("Both")
            .extends(&left)
            .extends(&right)
            .build()
            .unwrap();

        // Right is less specific than Left, so it is merged first.
        assert_eq!(names(&ty), ["r", "shared", "l"]);
        assert_eq!(ty.schema().get("shared").unwrap().kind().name(), "ubyte");
    }

    #[test]
    fn test_diamond_resolution_order() {
        let root = RecordType::builder("Root")
            .field("id", FieldDecl::uint())
            .build()
            .unwrap();
        let left = RecordType::builder("Left").extends(&root).build().unwrap();
        let right = RecordType::builder("Right").extends(&root).build().unwrap();
        let ty = RecordType::builder("Diamond")
            .extends(&left)
            .extends(&right)
            .build()
            .unwrap();

        let order: Vec<&str> = ty.resolution_order().iter().map(|t| t.name()).collect();
        assert_eq!(order, ["Left", "Right", "Root"]);
        assert!(ty.is_subtype_of(&root));
        assert!(!root.is_subtype_of(&ty));
        assert_eq!(names(&ty), ["id"]);
    }

    #[test]
    fn test_inconsistent_hierarchy_is_rejected() {
        let a = RecordType::builder("A").build().unwrap();
        let b = RecordType::builder("B").extends(&a).build().unwrap();
        let err = RecordType::builder("Bad")
            .extends(&a)
            .extends(&b)
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let err = RecordType::builder("Dup")
            .field("a", FieldDecl::ubyte())
            .remove("a")
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("'a'"));
    }

    #[test]
    fn test_schema_is_cached() {
        let ty = ordered();
        let first: *const Schema = ty.schema();
        let second: *const Schema = ty.schema();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_record_type_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RecordType>();
        assert_send_sync::<Schema>();
    }
}
