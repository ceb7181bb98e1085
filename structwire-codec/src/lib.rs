//! # structwire codec
//!
//! Field codecs and record instances.
//!
//! This crate provides:
//! - The [`Codec`] trait implemented by every field kind
//! - Field kinds: primitives, padding, null-terminated and length-prefixed
//!   strings, fixed-length bytes, nested records, repeated and dependent
//!   fields
//! - [`Record`], the per-instance store that consumes and emits a whole
//!   record in schema order
//!
//! ```
//! use structwire_codec::Record;
//! use structwire_core::{Endianness, Value};
//! use structwire_schema::{FieldDecl, RecordType};
//!
//! let ty = RecordType::builder("Struct")
//!     .field("code", FieldDecl::byte())
//!     .field("description", FieldDecl::cstring())
//!     .build()
//!     .unwrap();
//!
//! let record = Record::decode(&ty, b"\x01abcdf\x00", Endianness::Network).unwrap();
//! assert_eq!(record.value("code").unwrap(), Value::Int(1));
//! assert_eq!(record.size().unwrap(), 7);
//! assert_eq!(record.emit().unwrap(), b"\x01abcdf\x00");
//! ```

pub mod codec;
pub mod dependent;
pub mod field;
pub mod primitive;
pub mod record;
pub mod repeated;
pub mod strings;

pub use codec::{Codec, Scope};
pub use dependent::DependentField;
pub use field::Field;
pub use primitive::{PaddingField, PrimitiveField};
pub use record::Record;
pub use repeated::RepeatedField;
pub use strings::{BytesField, CStringField, PStringField};
