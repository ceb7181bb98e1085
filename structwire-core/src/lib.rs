//! # structwire core
//!
//! Core types shared by every structwire crate.
//!
//! This crate provides:
//! - A forward-only [`ByteCursor`] used as the byte source for decoding
//! - The [`WriteBuffer`] sink trait and the fixed-size [`EncoderBuffer`]
//! - Primitive type definitions and their fixed-width wire encodings
//! - [`Endianness`] selection shared by a whole record
//! - The decoded [`Value`] model
//! - Error types for configuration, value-range and short-input failures

pub mod buffer;
pub mod error;
pub mod header;
pub mod types;
pub mod value;

pub use buffer::{ByteCursor, EncoderBuffer, WriteBuffer};
pub use error::{Error, Result};
pub use header::{LengthPrefix, TERMINATOR};
pub use types::{Endianness, PrimitiveType};
pub use value::Value;
