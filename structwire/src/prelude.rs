//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```
//! use structwire::prelude::*;
//! ```

// Core types
pub use structwire_core::buffer::{ByteCursor, EncoderBuffer, WriteBuffer};
pub use structwire_core::error::{Error, Result};
pub use structwire_core::types::{Endianness, PrimitiveType};
pub use structwire_core::value::Value;

// Schema types
pub use structwire_schema::{
    DependentDef, FieldDecl, FieldKind, Params, PrimitiveDef, RecordType, RecordTypeBuilder,
    Schema,
};

// Codec types
pub use structwire_codec::{Codec, Field, Record, Scope};
