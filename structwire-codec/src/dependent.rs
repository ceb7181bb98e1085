//! Fields whose kind depends on the values of earlier siblings.

use structwire_core::{ByteCursor, Endianness, Error, Result, Value, WriteBuffer};
use structwire_schema::DependentDef;
use tracing::trace;

use crate::codec::{Codec, Scope};
use crate::field::Field;

/// A field that builds its target from sibling values, then delegates to it.
///
/// The target is rebuilt on every consume and assignment, so it always
/// reflects the sibling values seen at that moment.
#[derive(Debug, Clone)]
pub struct DependentField {
    def: DependentDef,
    endian: Endianness,
    target: Option<Box<Field>>,
}

impl DependentField {
    /// Creates an unresolved field.
    #[must_use]
    pub const fn new(def: DependentDef, endian: Endianness) -> Self {
        Self {
            def,
            endian,
            target: None,
        }
    }

    /// Returns the definition.
    #[must_use]
    pub const fn def(&self) -> &DependentDef {
        &self.def
    }

    /// Returns the resolved target, if any.
    #[must_use]
    pub fn target(&self) -> Option<&Field> {
        self.target.as_deref()
    }

    /// Returns the target's value.
    #[must_use]
    pub fn value(&self) -> Option<Value> {
        self.target.as_ref().and_then(|target| target.value())
    }

    /// Resolves the target from `scope` and assigns `value` to it.
    ///
    /// # Errors
    /// Returns a configuration error if a bound sibling cannot be looked up,
    /// or the target's assignment error. The previous target is kept on
    /// failure.
    pub fn set(&mut self, value: &Value, scope: &Scope<'_>) -> Result<()> {
        let mut target = self.resolve(scope)?;
        target.set(value, scope)?;
        self.target = Some(Box::new(target));
        Ok(())
    }

    fn resolve(&self, scope: &Scope<'_>) -> Result<Field> {
        let kind = self.def.resolve(|sibling| scope.lookup(sibling))?;
        trace!(kind = kind.name(), "resolved dependent field");
        Field::from_kind(&kind, self.endian)
    }

    fn resolved(&self) -> Result<&Field> {
        self.target
            .as_deref()
            .ok_or_else(|| Error::configuration("dependent field is not resolved"))
    }
}

impl Codec for DependentField {
    fn size(&self) -> Result<usize> {
        self.resolved()?.size()
    }

    fn consume(&mut self, cursor: &mut ByteCursor<'_>, scope: &Scope<'_>) -> Result<()> {
        let mut target = self.resolve(scope)?;
        target.consume(cursor, scope)?;
        self.target = Some(Box::new(target));
        Ok(())
    }

    fn emit<W: WriteBuffer + ?Sized>(&self, sink: &mut W) -> Result<()> {
        self.resolved()?.emit(sink)
    }
}
