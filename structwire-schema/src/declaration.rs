//! Field declarations.
//!
//! A [`FieldDecl`] is created once, when a record layout is defined, and is
//! never mutated afterwards. Its name is assigned by the record type that
//! registers it. Every declaration receives a process-wide creation
//! sequence number which orders the fields a record type declares locally.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use structwire_core::{Endianness, Error, PrimitiveType, Result, Value};

use crate::record_type::RecordType;

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Immutable template describing one field.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    sequence: u64,
    kind: FieldKind,
    default: Option<Value>,
    endian: Endianness,
}

impl FieldDecl {
    /// Creates a declaration of the given kind with the next sequence number.
    #[must_use]
    pub fn new(kind: FieldKind) -> Self {
        Self {
            sequence: NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed),
            kind,
            default: None,
            endian: Endianness::default(),
        }
    }

    /// Declares a primitive field of the given type.
    #[must_use]
    pub fn primitive(primitive_type: PrimitiveType) -> Self {
        Self::new(FieldKind::Primitive(PrimitiveDef::new(primitive_type)))
    }

    /// Declares a primitive field from a full definition (e.g. with bounds).
    #[must_use]
    pub fn from_primitive(def: PrimitiveDef) -> Self {
        Self::new(FieldKind::Primitive(def))
    }

    /// Declares a primitive field from its format code.
    #[must_use]
    pub fn from_format_code(code: char) -> Option<Self> {
        PrimitiveType::from_format_code(code).map(Self::primitive)
    }

    /// Signed 8-bit integer.
    #[must_use]
    pub fn byte() -> Self {
        Self::primitive(PrimitiveType::Byte)
    }

    /// Unsigned 8-bit integer.
    #[must_use]
    pub fn ubyte() -> Self {
        Self::primitive(PrimitiveType::UByte)
    }

    /// Signed 16-bit integer.
    #[must_use]
    pub fn short() -> Self {
        Self::primitive(PrimitiveType::Short)
    }

    /// Unsigned 16-bit integer.
    #[must_use]
    pub fn ushort() -> Self {
        Self::primitive(PrimitiveType::UShort)
    }

    /// Signed 32-bit integer.
    #[must_use]
    pub fn int() -> Self {
        Self::primitive(PrimitiveType::Int)
    }

    /// Unsigned 32-bit integer.
    #[must_use]
    pub fn uint() -> Self {
        Self::primitive(PrimitiveType::UInt)
    }

    /// Signed 64-bit integer.
    #[must_use]
    pub fn long() -> Self {
        Self::primitive(PrimitiveType::Long)
    }

    /// Unsigned 64-bit integer.
    #[must_use]
    pub fn ulong() -> Self {
        Self::primitive(PrimitiveType::ULong)
    }

    /// 32-bit float.
    #[must_use]
    pub fn float() -> Self {
        Self::primitive(PrimitiveType::Float)
    }

    /// 64-bit float.
    #[must_use]
    pub fn double() -> Self {
        Self::primitive(PrimitiveType::Double)
    }

    /// One-byte boolean.
    #[must_use]
    pub fn boolean() -> Self {
        Self::primitive(PrimitiveType::Bool)
    }

    /// Single character byte.
    #[must_use]
    pub fn char() -> Self {
        Self::primitive(PrimitiveType::Char)
    }

    /// `length` zero bytes without a value.
    #[must_use]
    pub fn padding(length: usize) -> Self {
        Self::new(FieldKind::Padding { length })
    }

    /// Null-terminated byte string.
    #[must_use]
    pub fn cstring() -> Self {
        Self::new(FieldKind::NullTerminated)
    }

    /// Byte string preceded by a one-byte length.
    #[must_use]
    pub fn pstring() -> Self {
        Self::new(FieldKind::LengthPrefixed)
    }

    /// Exactly `length` raw bytes.
    #[must_use]
    pub fn fixed_bytes(length: usize) -> Self {
        Self::new(FieldKind::FixedBytes { length })
    }

    /// Nested record of the given type.
    #[must_use]
    pub fn compound(record_type: &Arc<RecordType>) -> Self {
        Self::new(FieldKind::Compound(Arc::clone(record_type)))
    }

    /// `template` repeated until the input is exhausted.
    #[must_use]
    pub fn repeated(template: FieldDecl) -> Self {
        Self::new(FieldKind::Repeated(RepeatedDef {
            template: Box::new(template),
            count: None,
        }))
    }

    /// `template` repeated exactly `count` times.
    #[must_use]
    pub fn repeated_count(template: FieldDecl, count: usize) -> Self {
        Self::new(FieldKind::Repeated(RepeatedDef {
            template: Box::new(template),
            count: Some(count),
        }))
    }

    /// Field whose kind is built from sibling values at decode time.
    #[must_use]
    pub fn dependent(def: DependentDef) -> Self {
        Self::new(FieldKind::Dependent(def))
    }

    /// Raw bytes whose length is the decoded value of `length_field`.
    #[must_use]
    pub fn dependent_bytes(length_field: &str) -> Self {
        Self::dependent(
            DependentDef::new(|params| {
                Ok(FieldKind::FixedBytes {
                    length: params.usize("length")?,
                })
            })
            .bind("length", length_field),
        )
    }

    /// `template` repeated as many times as the decoded value of `count_field`.
    #[must_use]
    pub fn dependent_repeated(template: FieldDecl, count_field: &str) -> Self {
        Self::dependent(
            DependentDef::new(move |params| {
                Ok(FieldKind::Repeated(RepeatedDef {
                    template: Box::new(template.clone()),
                    count: Some(params.usize("count")?),
                }))
            })
            .bind("count", count_field),
        )
    }

    /// Sets the value a freshly constructed field starts with.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the endianness used when the field is coded outside a record.
    #[must_use]
    pub fn with_endianness(mut self, endian: Endianness) -> Self {
        self.endian = endian;
        self
    }

    /// Returns the creation sequence number.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the field kind.
    #[must_use]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Returns the default value, if any.
    #[must_use]
    pub const fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Returns the endianness used outside a record.
    #[must_use]
    pub const fn endianness(&self) -> Endianness {
        self.endian
    }

    /// Returns the fixed encoded width, if the kind has one.
    #[must_use]
    pub fn fixed_size(&self) -> Option<usize> {
        match &self.kind {
            FieldKind::Primitive(def) => Some(def.primitive_type.size()),
            FieldKind::Padding { length } | FieldKind::FixedBytes { length } => Some(*length),
            _ => None,
        }
    }
}

/// The kind of a field and its kind-specific configuration.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Fixed-width primitive.
    Primitive(PrimitiveDef),
    /// Zero bytes without a value.
    Padding {
        /// Width in bytes.
        length: usize,
    },
    /// Bytes up to a terminator byte.
    NullTerminated,
    /// One length byte followed by that many bytes.
    LengthPrefixed,
    /// Exactly `length` bytes.
    FixedBytes {
        /// Width in bytes.
        length: usize,
    },
    /// Nested record.
    Compound(Arc<RecordType>),
    /// Repetition of a template field.
    Repeated(RepeatedDef),
    /// Kind resolved from sibling values.
    Dependent(DependentDef),
}

impl FieldKind {
    /// Returns the kind name, used in logs and error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Primitive(def) => def.primitive_type.name(),
            Self::Padding { .. } => "padding",
            Self::NullTerminated => "cstring",
            Self::LengthPrefixed => "pstring",
            Self::FixedBytes { .. } => "bytes",
            Self::Compound(_) => "compound",
            Self::Repeated(_) => "repeated",
            Self::Dependent(_) => "dependent",
        }
    }
}

/// Primitive field definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveDef {
    /// Underlying primitive type.
    pub primitive_type: PrimitiveType,
    /// Minimum valid value (integer types only).
    pub min_value: Option<i128>,
    /// Maximum valid value (integer types only).
    pub max_value: Option<i128>,
}

impl PrimitiveDef {
    /// Creates a definition covering the type's full range.
    #[must_use]
    pub const fn new(primitive_type: PrimitiveType) -> Self {
        Self {
            primitive_type,
            min_value: None,
            max_value: None,
        }
    }

    /// Narrows the valid range to `[min, max]`.
    #[must_use]
    pub const fn with_range(mut self, min: i128, max: i128) -> Self {
        self.min_value = Some(min);
        self.max_value = Some(max);
        self
    }

    /// Validates `value` and returns its canonical form.
    ///
    /// # Errors
    /// Returns a value-range error if the value does not fit the type or the
    /// declared bounds.
    pub fn check(&self, value: &Value) -> Result<Value> {
        let value = self.primitive_type.check(value)?;
        if let Some(v) = value.as_integer() {
            let below = self.min_value.is_some_and(|min| v < min);
            let above = self.max_value.is_some_and(|max| v > max);
            if below || above {
                return Err(Error::value_range(format!(
                    "{v} is outside the declared bounds [{}, {}]",
                    self.min_value
                        .map_or_else(|| "-inf".to_string(), |m| m.to_string()),
                    self.max_value
                        .map_or_else(|| "inf".to_string(), |m| m.to_string()),
                )));
            }
        }
        Ok(value)
    }
}

/// Repeated field definition.
#[derive(Debug, Clone)]
pub struct RepeatedDef {
    /// Declaration cloned for every element.
    pub template: Box<FieldDecl>,
    /// Exact element count; `None` repeats until the input is exhausted.
    pub count: Option<usize>,
}

type Constructor = Arc<dyn Fn(&Params) -> Result<FieldKind> + Send + Sync>;

/// Dependent field definition.
///
/// Holds a constructor for the target kind, base parameters, and bindings
/// from parameter names to sibling field names. The sibling values are
/// merged over the base parameters before the constructor runs.
#[derive(Clone)]
pub struct DependentDef {
    constructor: Constructor,
    params: Params,
    bindings: Vec<(String, String)>,
}

impl DependentDef {
    /// Creates a definition with the given target constructor.
    pub fn new<F>(constructor: F) -> Self
    where
        F: Fn(&Params) -> Result<FieldKind> + Send + Sync + 'static,
    {
        Self {
            constructor: Arc::new(constructor),
            params: Params::new(),
            bindings: Vec::new(),
        }
    }

    /// Adds a fixed parameter passed to the constructor.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name, value);
        self
    }

    /// Binds parameter `param` to the value of sibling field `sibling`.
    #[must_use]
    pub fn bind(mut self, param: impl Into<String>, sibling: impl Into<String>) -> Self {
        self.bindings.push((param.into(), sibling.into()));
        self
    }

    /// Returns the `(parameter, sibling)` bindings.
    #[must_use]
    pub fn bindings(&self) -> &[(String, String)] {
        &self.bindings
    }

    /// Returns the fixed parameters.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Builds the target kind, looking each bound sibling up with `lookup`.
    ///
    /// # Errors
    /// Propagates lookup failures and constructor errors.
    pub fn resolve<L>(&self, mut lookup: L) -> Result<FieldKind>
    where
        L: FnMut(&str) -> Result<Value>,
    {
        let mut params = self.params.clone();
        for (param, sibling) in &self.bindings {
            params.insert(param.clone(), lookup(sibling)?);
        }
        (self.constructor)(&params)
    }
}

impl fmt::Debug for DependentDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependentDef")
            .field("params", &self.params)
            .field("bindings", &self.bindings)
            .finish_non_exhaustive()
    }
}

/// Ordered named parameters passed to a dependent field's constructor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, Value)>,
}

impl Params {
    /// Creates an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts or replaces a parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Returns a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Returns a parameter by name.
    ///
    /// # Errors
    /// Returns a configuration error if the parameter is missing.
    pub fn require(&self, name: &str) -> Result<&Value> {
        self.get(name)
            .ok_or_else(|| Error::configuration(format!("missing parameter '{name}'")))
    }

    /// Returns a parameter as a non-negative size.
    ///
    /// # Errors
    /// Returns a configuration error if missing, or a value-range error if
    /// the value is not a non-negative integer.
    pub fn usize(&self, name: &str) -> Result<usize> {
        let value = self.require(name)?;
        value.as_usize().ok_or_else(|| {
            Error::value_range(format!(
                "parameter '{name}' must be a non-negative integer, got {value}"
            ))
        })
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let a = FieldDecl::byte();
        let b = FieldDecl::cstring();
        let c = FieldDecl::uint();
        assert!(a.sequence() < b.sequence());
        assert!(b.sequence() < c.sequence());
    }

    #[test]
    fn test_clone_keeps_sequence() {
        let a = FieldDecl::ushort();
        assert_eq!(a.clone().sequence(), a.sequence());
    }

    #[test]
    fn test_default_endianness_is_network() {
        let decl = FieldDecl::uint();
        assert_eq!(decl.endianness(), Endianness::Network);
        let decl = decl.with_endianness(Endianness::Little);
        assert_eq!(decl.endianness(), Endianness::Little);
    }

    #[test]
    fn test_fixed_size() {
        assert_eq!(FieldDecl::long().fixed_size(), Some(8));
        assert_eq!(FieldDecl::padding(3).fixed_size(), Some(3));
        assert_eq!(FieldDecl::fixed_bytes(6).fixed_size(), Some(6));
        assert_eq!(FieldDecl::cstring().fixed_size(), None);
    }

    #[test]
    fn test_from_format_code() {
        let decl = FieldDecl::from_format_code('I').unwrap();
        assert!(matches!(
            decl.kind(),
            FieldKind::Primitive(PrimitiveDef {
                primitive_type: PrimitiveType::UInt,
                ..
            })
        ));
        assert!(FieldDecl::from_format_code('z').is_none());
    }

    #[test]
    fn test_primitive_bounds() {
        let def = PrimitiveDef::new(PrimitiveType::UByte).with_range(1, 10);
        assert_eq!(def.check(&Value::UInt(10)).unwrap(), Value::UInt(10));
        assert!(def.check(&Value::UInt(0)).unwrap_err().is_value_range());
        assert!(def.check(&Value::UInt(11)).unwrap_err().is_value_range());
        assert!(def.check(&Value::UInt(300)).unwrap_err().is_value_range());
    }

    #[test]
    fn test_params() {
        let mut params = Params::new();
        assert!(params.is_empty());
        params.insert("length", 4u8);
        params.insert("length", 5u8);
        assert_eq!(params.len(), 1);
        assert_eq!(params.usize("length").unwrap(), 5);
        assert!(params.require("count").unwrap_err().is_configuration());

        params.insert("name", b"x");
        assert!(params.usize("name").unwrap_err().is_value_range());
    }

    #[test]
    fn test_dependent_resolve() {
        let def = DependentDef::new(|params| {
            Ok(FieldKind::FixedBytes {
                length: params.usize("length")? * params.usize("width")?,
            })
        })
        .param("width", 2u8)
        .bind("length", "len");

        let kind = def
            .resolve(|sibling| {
                assert_eq!(sibling, "len");
                Ok(Value::UInt(3))
            })
            .unwrap();
        assert!(matches!(kind, FieldKind::FixedBytes { length: 6 }));
    }

    #[test]
    fn test_dependent_resolve_propagates_lookup_error() {
        let decl = FieldDecl::dependent_bytes("len");
        let FieldKind::Dependent(def) = decl.kind() else {
            panic!("expected dependent kind");
        };
        let err = def
            .resolve(|name| Err(Error::unknown_field(name)))
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_dependent_debug_lists_bindings() {
        let decl = FieldDecl::dependent_bytes("len");
        let debug = format!("{decl:?}");
        assert!(debug.contains("DependentDef"));
        assert!(debug.contains("len"));
    }
}
