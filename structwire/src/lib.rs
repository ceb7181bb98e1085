//! # structwire
//!
//! Declarative binary record codec.
//!
//! A record layout is described once, as named field declarations attached
//! to a record type. The same layout decodes ("consumes") a byte stream into
//! a record and encodes ("emits") the record back into the exact bytes it
//! was decoded from.
//!
//! ## Features
//!
//! - **Declarative layouts** - fields are ordered by declaration, record
//!   types inherit, override and remove fields of their parents
//! - **Field kinds** - fixed-width primitives, padding, null-terminated and
//!   length-prefixed strings, fixed-length bytes, nested records, repeated
//!   fields and fields whose shape depends on earlier values
//! - **Endianness** - native, big, little or network order, chosen once per
//!   record and applied to every nested field
//! - **Validation** - values are range checked on assignment and on decode
//!
//! ## Quick Start
//!
//! ```
//! use structwire::prelude::*;
//!
//! let header = RecordType::builder("Header")
//!     .field("kind", FieldDecl::ubyte())
//!     .field("length", FieldDecl::ushort())
//!     .build()?;
//! let message = RecordType::builder("Message")
//!     .field("header", FieldDecl::compound(&header))
//!     .field("name", FieldDecl::cstring())
//!     .build()?;
//!
//! let record = Record::decode(&message, b"\x01\x00\x05ok\x00", Endianness::Network)?;
//! assert_eq!(record.nested("header")?.value("length")?, Value::UInt(5));
//! assert_eq!(record.value("name")?, Value::from(b"ok"));
//! assert_eq!(record.emit()?, b"\x01\x00\x05ok\x00");
//! # Ok::<(), structwire::core::Error>(())
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Byte cursor and sinks, primitive types, endianness, values, errors
//! - [`schema`] - Field declarations, record types and schema composition
//! - [`codec`] - Field codecs and record instances

pub mod prelude;

/// Byte plumbing, primitive types, values and errors.
pub mod core {
    pub use structwire_core::*;
}

/// Field declarations and record schemas.
pub mod schema {
    pub use structwire_schema::*;
}

/// Field codecs and record instances.
pub mod codec {
    pub use structwire_codec::*;
}
