//! # structwire schema
//!
//! Declarative record layouts.
//!
//! This crate provides:
//! - [`FieldDecl`] - immutable template describing one field
//! - [`RecordType`] - a named record built from parents, fields and removals
//! - [`Schema`] - the ordered, shadow-resolved field mapping of a record type
//!
//! Schemas are composed from the record type's resolution order: fields
//! first declared by an ancestor keep their position, re-declarations
//! replace the declaration in place and removals drop inherited fields.
//!
//! ```
//! use structwire_schema::{FieldDecl, RecordType};
//!
//! let base = RecordType::builder("Base")
//!     .field("a", FieldDecl::ubyte())
//!     .field("b", FieldDecl::ubyte())
//!     .build()
//!     .unwrap();
//! let derived = RecordType::builder("Derived")
//!     .extends(&base)
//!     .field("c", FieldDecl::cstring())
//!     .remove("a")
//!     .build()
//!     .unwrap();
//!
//! let names: Vec<&str> = derived.schema().names().collect();
//! assert_eq!(names, ["b", "c"]);
//! ```

pub mod declaration;
mod lineage;
pub mod record_type;
pub mod schema;

pub use declaration::{DependentDef, FieldDecl, FieldKind, Params, PrimitiveDef, RepeatedDef};
pub use record_type::{RecordType, RecordTypeBuilder};
pub use schema::Schema;
pub use structwire_core::{Endianness, Error, PrimitiveType, Result, Value};
